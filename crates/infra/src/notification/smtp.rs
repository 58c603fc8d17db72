//! SMTP 通知送信実装
//!
//! lettre の `AsyncSmtpTransport` を使用してメールを送信する。
//! 接続は暗黙的 TLS（SMTPS、既定ポート 465）で行い、送信元認証情報で AUTH する。
//!
//! 宛先ごとに新しいトランスポートを組み立てるため、1 宛先につき 1 セッションを張り、
//! 送信後に切断する。

use async_trait::async_trait;
use bean_domain::{
    credential::SenderCredentials,
    notification::{EmailMessage, NotificationError},
};
use lettre::{
    AsyncSmtpTransport,
    AsyncTransport,
    Tokio1Executor,
    message::{Mailbox, Message, header::ContentType},
    transport::smtp::authentication::Credentials,
};

use super::NotificationSender;

/// SMTP 通知送信
pub struct SmtpNotificationSender {
    host: String,
    port: u16,
}

impl SmtpNotificationSender {
    /// 新しい SMTP 送信インスタンスを作成
    ///
    /// # 引数
    ///
    /// - `host`: SMTP リレーのホスト名（例: "smtp.gmail.com"）
    /// - `port`: SMTP リレーのポート番号（例: 465）
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    fn transport(
        &self,
        credentials: &SenderCredentials,
    ) -> Result<AsyncSmtpTransport<Tokio1Executor>, NotificationError> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&self.host)
            .map_err(|e| NotificationError::SendFailed(format!("TLS 設定失敗: {e}")))?
            .port(self.port)
            .credentials(Credentials::new(
                credentials.address().as_str().to_string(),
                credentials.password().expose().to_string(),
            ))
            .build();

        Ok(transport)
    }
}

/// プレーンテキストのメッセージを組み立てる
pub(crate) fn build_message(email: &EmailMessage) -> Result<Message, NotificationError> {
    let from = email.from.parse::<Mailbox>().map_err(|e| {
        NotificationError::InvalidAddress(format!("送信元アドレス不正 {}: {e}", email.from))
    })?;
    let to = email.to.parse::<Mailbox>().map_err(|e| {
        NotificationError::InvalidAddress(format!("宛先アドレス不正 {}: {e}", email.to))
    })?;

    Message::builder()
        .from(from)
        .to(to)
        .subject(&email.subject)
        .header(ContentType::TEXT_PLAIN)
        .body(email.text_body.clone())
        .map_err(|e| NotificationError::BuildFailed(e.to_string()))
}

#[async_trait]
impl NotificationSender for SmtpNotificationSender {
    #[tracing::instrument(skip_all, level = "debug", fields(host = %self.host, port = self.port))]
    async fn send_email(
        &self,
        credentials: &SenderCredentials,
        email: &EmailMessage,
    ) -> Result<(), NotificationError> {
        let message = build_message(email)?;

        self.transport(credentials)?
            .send(message)
            .await
            .map_err(|e| NotificationError::SendFailed(format!("SMTP 送信失敗: {e}")))?;

        Ok(())
    }
}
