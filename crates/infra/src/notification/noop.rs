//! Noop 通知送信実装
//!
//! メールを実際に送信せず、ログ出力のみ行う。
//! ローカル開発やドライラン（`NOTIFICATION_BACKEND=noop`）で使用する。

use async_trait::async_trait;
use bean_domain::{
    credential::SenderCredentials,
    notification::{EmailMessage, NotificationError},
};

use super::NotificationSender;

/// Noop 通知送信（ログ出力のみ）
#[derive(Debug, Clone)]
pub struct NoopNotificationSender;

#[async_trait]
impl NotificationSender for NoopNotificationSender {
    async fn send_email(
        &self,
        _credentials: &SenderCredentials,
        email: &EmailMessage,
    ) -> Result<(), NotificationError> {
        tracing::info!(
            from = %email.from,
            to = %email.to,
            subject = %email.subject,
            "Noop: メール送信をスキップ"
        );
        Ok(())
    }
}
