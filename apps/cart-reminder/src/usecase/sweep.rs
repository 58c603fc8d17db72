//! # リマインダースイープ
//!
//! カート保有ユーザーの取得 → 送信元認証情報の取得 → 宛先ごとの送信を順に行う。
//!
//! ## 設計方針
//!
//! - **順序の保証**: ユーザー取得に失敗したらシークレットは取得しない。
//!   認証情報の取得・解析に失敗したら 1 通も送らない
//! - **ストア順で逐次送信**: 並列化せず、ストアが返した順に 1 宛先ずつ送る
//! - **送信失敗の扱い**: [`DeliveryPolicy`] に従う（既定は最初の失敗で中断）。
//!   宛先アドレスの検証失敗も、その宛先への送信失敗として扱う
//! - **都度取得**: 認証情報は実行ごとにシークレットストアから取得し、保持しない

use std::sync::Arc;

use bean_domain::{
    credential::{CredentialError, SenderCredentials},
    notification::{NotificationError, ReminderTemplate},
    user::{Email, UserId},
};
use bean_infra::{
    notification::NotificationSender,
    repository::CartUserRepository,
    secret::SecretStore,
};
use bean_shared::{event_log::event, log_business_event};

use crate::{
    config::{DEFAULT_SECRET_NAME, DeliveryPolicy},
    error::SweepError,
};

/// Lambda が成功時に返す値
pub const SUCCESS_TOKEN: &str = "Success";

/// スイープ結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SweepReport {
    /// 送信対象となったユーザー数
    pub recipients: usize,
    /// 送信に成功した数
    pub sent:       usize,
}

/// リマインダースイープ
pub struct ReminderSweep {
    user_repo:    Arc<dyn CartUserRepository>,
    secret_store: Arc<dyn SecretStore>,
    sender:       Arc<dyn NotificationSender>,
    template:     ReminderTemplate,
    secret_name:  String,
    policy:       DeliveryPolicy,
}

impl ReminderSweep {
    /// 既定のテンプレート・シークレット名・送信方針でスイープを作成する
    pub fn new(
        user_repo: Arc<dyn CartUserRepository>,
        secret_store: Arc<dyn SecretStore>,
        sender: Arc<dyn NotificationSender>,
    ) -> Self {
        Self {
            user_repo,
            secret_store,
            sender,
            template: ReminderTemplate::default(),
            secret_name: DEFAULT_SECRET_NAME.to_string(),
            policy: DeliveryPolicy::default(),
        }
    }

    pub fn with_template(mut self, template: ReminderTemplate) -> Self {
        self.template = template;
        self
    }

    pub fn with_secret_name(mut self, secret_name: impl Into<String>) -> Self {
        self.secret_name = secret_name.into();
        self
    }

    pub fn with_policy(mut self, policy: DeliveryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// スイープを 1 回実行する
    ///
    /// 対象ユーザーが 0 人でもシークレットは取得する。
    #[tracing::instrument(skip_all, fields(secret = %self.secret_name, policy = %self.policy))]
    pub async fn run(&self) -> Result<SweepReport, SweepError> {
        let users = self.user_repo.find_with_items_in_cart().await?;
        tracing::info!(count = users.len(), "カート保有ユーザーを取得");

        let credentials = self.load_credentials().await?;

        let mut sent = 0;
        let mut failed = Vec::new();

        for user in &users {
            let recipient = user.email();
            let entity_id = user.id().map_or("-", UserId::as_str);

            match self.deliver(&credentials, recipient).await {
                Ok(()) => {
                    log_business_event!(
                        event.category = event::category::REMINDER,
                        event.action = event::action::REMINDER_SENT,
                        event.entity_type = event::entity_type::CART_USER,
                        event.entity_id = entity_id,
                        event.result = event::result::SUCCESS,
                        reminder.recipient = recipient,
                        reminder.cart_items = user.cart_item_count(),
                        "リマインダー送信成功"
                    );
                    sent += 1;
                }
                Err(e) => {
                    log_business_event!(
                        event.category = event::category::REMINDER,
                        event.action = event::action::REMINDER_FAILED,
                        event.entity_type = event::entity_type::CART_USER,
                        event.entity_id = entity_id,
                        event.result = event::result::FAILURE,
                        reminder.recipient = recipient,
                        error = %e,
                        "リマインダー送信失敗"
                    );
                    match self.policy {
                        DeliveryPolicy::FailFast => {
                            return Err(SweepError::Delivery {
                                recipient: recipient.to_string(),
                                source:    e,
                            });
                        }
                        DeliveryPolicy::Isolate => failed.push(recipient.to_string()),
                    }
                }
            }
        }

        let report = SweepReport {
            recipients: users.len(),
            sent,
        };

        let result = if failed.is_empty() {
            event::result::SUCCESS
        } else {
            event::result::FAILURE
        };
        log_business_event!(
            event.category = event::category::REMINDER,
            event.action = event::action::SWEEP_COMPLETED,
            event.result = result,
            sweep.recipients = report.recipients,
            sweep.sent = report.sent,
            sweep.failed = failed.len(),
            "リマインダースイープ完了"
        );

        if !failed.is_empty() {
            return Err(SweepError::PartialDelivery { sent, failed });
        }

        Ok(report)
    }

    /// 宛先 1 件を検証し、リマインダーを送信する
    async fn deliver(
        &self,
        credentials: &SenderCredentials,
        recipient: &str,
    ) -> Result<(), NotificationError> {
        let to = Email::new(recipient)
            .map_err(|e| NotificationError::InvalidAddress(e.to_string()))?;
        let email = self.template.render(credentials.address(), &to);

        self.sender.send_email(credentials, &email).await
    }

    /// シークレットを取得し、送信元認証情報として解析する
    async fn load_credentials(&self) -> Result<SenderCredentials, SweepError> {
        let secret = self
            .secret_store
            .get_secret_string(&self.secret_name)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "送信元認証情報のシークレット取得に失敗");
                CredentialError::Unavailable(e.to_string())
            })?;

        Ok(SenderCredentials::from_secret_string(&secret)?)
    }
}
