//! # カート放棄リマインダー Lambda
//!
//! カートに商品を残したままのユーザー全員へ、定型のリマインダーメールを送る。
//! スケジュール実行（EventBridge）または手動呼び出しで起動する。
//!
//! ## 処理の流れ
//!
//! ```text
//! DynamoDB (BeanUsers) ──scan cart <> []──→ ReminderSweep ──SMTPS──→ smtp.gmail.com:465
//!                                              ↑
//!                         Secrets Manager (beanEmailCredentials)
//! ```
//!
//! ## 環境変数
//!
//! | 変数名 | 必須 | 説明 |
//! |--------|------|------|
//! | `USERS_TABLE` | No | ユーザーテーブル名（デフォルト: `BeanUsers`） |
//! | `EMAIL_SECRET_NAME` | No | 送信元認証情報のシークレット名（デフォルト: `beanEmailCredentials`） |
//! | `SMTP_HOST` | No | SMTP リレーホスト（デフォルト: `smtp.gmail.com`） |
//! | `SMTP_PORT` | No | SMTP リレーポート（デフォルト: `465`） |
//! | `REMINDER_SUBJECT` | No | 件名 |
//! | `REMINDER_BODY` | No | 本文 |
//! | `NOTIFICATION_BACKEND` | No | `smtp` \| `noop`（デフォルト: `smtp`） |
//! | `DELIVERY_POLICY` | No | `fail_fast` \| `isolate`（デフォルト: `fail_fast`） |
//! | `DYNAMODB_ENDPOINT` | No | DynamoDB Local のエンドポイント |
//! | `LOG_FORMAT` | No | `json` \| `pretty`（デフォルト: `pretty`） |
//! | `RUST_LOG` | No | ログレベル（デフォルト: `info,bean=debug`） |
//!
//! ## ローカル実行
//!
//! ```bash
//! NOTIFICATION_BACKEND=noop DYNAMODB_ENDPOINT=http://localhost:18000 cargo lambda watch
//! cargo lambda invoke bean-cart-reminder --data-ascii '{}'
//! ```

use std::sync::Arc;

use anyhow::Context as _;
use bean_cart_reminder::{
    config::{NotificationBackend, ReminderConfig},
    handler,
    usecase::ReminderSweep,
};
use bean_infra::{
    dynamodb,
    notification::{NoopNotificationSender, NotificationSender, SmtpNotificationSender},
    repository::{CartUserRepository, DynamoDbCartUserRepository},
    secret::{SecretStore, SecretsManagerSecretStore},
};
use bean_shared::observability::TracingConfig;
use lambda_runtime::{LambdaEvent, service_fn};
use serde_json::Value;

/// リマインダー Lambda のエントリーポイント
///
/// クライアントとスイープは起動時に 1 度だけ組み立て、呼び出しごとに再利用する。
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env ファイルを読み込む（存在する場合）
    dotenvy::dotenv().ok();

    // トレーシング初期化
    let tracing_config = TracingConfig::from_env("cart-reminder");
    let _tracing_guard = bean_shared::observability::init_tracing(tracing_config);

    // 設定読み込み
    let config = ReminderConfig::from_env().context("設定の読み込みに失敗しました")?;

    tracing::info!(
        table = %config.user_table.table_name,
        backend = %config.notification_backend,
        policy = %config.delivery_policy,
        "カート放棄リマインダーを起動します"
    );

    // AWS クライアントを初期化
    let sdk_config = aws_config::load_from_env().await;
    let dynamodb_client =
        dynamodb::create_client(&sdk_config, config.dynamodb_endpoint.as_deref());
    let secrets_client = aws_sdk_secretsmanager::Client::new(&sdk_config);

    // 依存コンポーネントを初期化
    let user_repo: Arc<dyn CartUserRepository> = Arc::new(DynamoDbCartUserRepository::new(
        dynamodb_client,
        config.user_table.clone(),
    ));
    let secret_store: Arc<dyn SecretStore> =
        Arc::new(SecretsManagerSecretStore::new(secrets_client));
    let sender: Arc<dyn NotificationSender> = match config.notification_backend {
        NotificationBackend::Smtp => Arc::new(SmtpNotificationSender::new(
            config.smtp_host.clone(),
            config.smtp_port,
        )),
        NotificationBackend::Noop => Arc::new(NoopNotificationSender),
    };

    let sweep = ReminderSweep::new(user_repo, secret_store, sender)
        .with_template(config.template.clone())
        .with_secret_name(config.secret_name.clone())
        .with_policy(config.delivery_policy);
    let sweep = &sweep;

    lambda_runtime::run(service_fn(move |event: LambdaEvent<Value>| async move {
        handler::handle(sweep, event).await
    }))
    .await
    .map_err(|e| anyhow::anyhow!(e))
}
