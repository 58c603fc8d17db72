//! # 通知送信
//!
//! リマインダーメールの送信を担当するインフラストラクチャモジュール。
//!
//! ## 設計方針
//!
//! - **trait による抽象化**: `NotificationSender` trait でメール送信を抽象化
//! - **2 つの実装**: SMTP リレー（本番）、Noop（ローカル開発・ドライラン）
//! - **認証情報は呼び出しごとに渡す**: 認証情報は実行時にシークレットストアから
//!   取得するため、送信側は保持しない
//! - **環境変数切替**: `NOTIFICATION_BACKEND` でランタイム選択

mod noop;
mod smtp;

use async_trait::async_trait;
use bean_domain::{
    credential::SenderCredentials,
    notification::{EmailMessage, NotificationError},
};
pub use noop::NoopNotificationSender;
pub use smtp::SmtpNotificationSender;

/// メール送信トレイト
///
/// 1 回の呼び出しが 1 宛先への送信に対応する。
#[async_trait]
pub trait NotificationSender: Send + Sync {
    /// 送信元認証情報でメールリレーに認証し、メールを送信する
    async fn send_email(
        &self,
        credentials: &SenderCredentials,
        email: &EmailMessage,
    ) -> Result<(), NotificationError>;
}
