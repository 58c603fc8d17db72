//! # DynamoDB 接続管理
//!
//! Amazon DynamoDB への接続管理を行う。
//!
//! ## 設計方針
//!
//! - **本番環境**: Lambda 実行ロールの認証情報で Amazon DynamoDB に接続
//! - **ローカル開発**: DynamoDB Local を使用（`DYNAMODB_ENDPOINT` を設定）
//! - **テーブル自動作成**: 統合テスト用（`test-utils` feature）。本番テーブルは既存のものを使う
//!
//! ## 使用例
//!
//! ```rust,ignore
//! use bean_infra::dynamodb;
//!
//! async fn setup() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = dynamodb::create_local_client("http://localhost:18000").await;
//!     dynamodb::ensure_user_table(&client, "BeanUsers").await?;
//!     Ok(())
//! }
//! ```

use aws_sdk_dynamodb::Client;
#[cfg(any(test, feature = "test-utils"))]
use aws_sdk_dynamodb::types::{
    AttributeDefinition,
    BillingMode,
    KeySchemaElement,
    KeyType,
    ScalarAttributeType,
};

#[cfg(any(test, feature = "test-utils"))]
use crate::InfraError;

/// ユーザーテーブルのパーティションキー属性名
pub const USER_TABLE_KEY: &str = "id";

/// 共有の AWS 設定から DynamoDB クライアントを作成する
///
/// `endpoint` を指定した場合はそのエンドポイントに向ける（DynamoDB Local 用）。
pub fn create_client(config: &aws_config::SdkConfig, endpoint: Option<&str>) -> Client {
    let mut builder = aws_sdk_dynamodb::config::Builder::from(config);
    if let Some(endpoint) = endpoint {
        builder = builder.endpoint_url(endpoint);
    }
    Client::from_conf(builder.build())
}

/// DynamoDB Local 用のクライアントを作成する
///
/// 認証情報はダミー値を使用する
/// （DynamoDB Local の `-sharedDb` モードでは認証情報を検証しない）。
///
/// # 引数
///
/// * `endpoint` - DynamoDB エンドポイント URL（例: `http://localhost:18000`）
#[cfg(any(test, feature = "test-utils"))]
pub async fn create_local_client(endpoint: &str) -> Client {
    let config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .endpoint_url(endpoint)
        .region(aws_config::Region::new("us-east-1"))
        // DynamoDB Local はクレデンシャルを検証しないが、SDK はプロバイダが必要
        .credentials_provider(aws_sdk_dynamodb::config::Credentials::new(
            "local", "local", None, None, "local",
        ))
        .load()
        .await;

    Client::new(&config)
}

/// ユーザーテーブルが存在しなければ作成する（冪等）
///
/// テーブルスキーマ:
/// - PK: `id` (String): ユーザー ID
///
/// `email` / `cart` はキーではないためスキーマに現れない。
///
/// # 引数
///
/// * `client` - DynamoDB クライアント
/// * `table_name` - テーブル名
#[cfg(any(test, feature = "test-utils"))]
pub async fn ensure_user_table(client: &Client, table_name: &str) -> Result<(), InfraError> {
    // テーブルの存在確認
    match client.describe_table().table_name(table_name).send().await {
        Ok(_) => {
            tracing::debug!("テーブル '{}' は既に存在します", table_name);
            return Ok(());
        }
        Err(err) => {
            // ResourceNotFoundException の場合のみテーブル作成に進む
            let is_not_found = err
                .as_service_error()
                .map(|e| e.is_resource_not_found_exception())
                .unwrap_or(false);
            if !is_not_found {
                return Err(InfraError::dynamo_db(format!(
                    "テーブル '{table_name}' の確認に失敗: {err}"
                )));
            }
        }
    }

    tracing::info!("テーブル '{}' を作成します", table_name);

    let create_result = client
        .create_table()
        .table_name(table_name)
        .key_schema(
            KeySchemaElement::builder()
                .attribute_name(USER_TABLE_KEY)
                .key_type(KeyType::Hash)
                .build()
                .map_err(|e| InfraError::dynamo_db(format!("KeySchema 構築エラー: {e}")))?,
        )
        .attribute_definitions(
            AttributeDefinition::builder()
                .attribute_name(USER_TABLE_KEY)
                .attribute_type(ScalarAttributeType::S)
                .build()
                .map_err(|e| {
                    InfraError::dynamo_db(format!("AttributeDefinition 構築エラー: {e}"))
                })?,
        )
        .billing_mode(BillingMode::PayPerRequest)
        .send()
        .await;

    if let Err(err) = create_result {
        // ResourceInUseException は並行呼び出し時に発生しうる（テーブルが作成中）
        let is_resource_in_use = err
            .as_service_error()
            .map(|e| e.is_resource_in_use_exception())
            .unwrap_or(false);
        if !is_resource_in_use {
            return Err(InfraError::dynamo_db(format!(
                "テーブル '{table_name}' の作成に失敗: {err}"
            )));
        }
        tracing::debug!(
            "テーブル '{}' は既に作成中または存在します（ResourceInUseException）",
            table_name
        );
        return Ok(());
    }

    tracing::info!("テーブル '{}' を作成しました", table_name);

    Ok(())
}
