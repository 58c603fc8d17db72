//! # 通知
//!
//! カートリマインダーメールに関するドメインモデルを定義する。
//!
//! ## ドメイン用語
//!
//! | 型 | ドメイン用語 | 用途 |
//! |---|------------|------|
//! | [`ReminderTemplate`] | リマインダーテンプレート | 固定の件名・本文 |
//! | [`EmailMessage`] | メールメッセージ | 1 宛先分の送信内容 |
//! | [`NotificationError`] | 通知送信エラー | 宛先ごとの送信失敗 |
//!
//! ## 設計方針
//!
//! - **固定文面**: 件名・本文は全宛先で同一（宛先による差し込みはしない）
//! - **使い捨て**: メッセージは宛先ごとに生成し、送信後に破棄する（永続化しない）

use thiserror::Error;

use crate::user::Email;

/// 件名のデフォルト値
pub const DEFAULT_REMINDER_SUBJECT: &str = "Oops, you didn't clicked purchase!";

/// 本文のデフォルト値
pub const DEFAULT_REMINDER_BODY: &str =
    "You still have items in your cart, don't hesitate to complete the order!";

/// 通知送信エラー
#[derive(Debug, Error)]
pub enum NotificationError {
    /// アドレスがメールヘッダとして解釈できない
    #[error("アドレスが不正: {0}")]
    InvalidAddress(String),

    /// メッセージの組み立てに失敗
    #[error("メッセージ構築に失敗: {0}")]
    BuildFailed(String),

    /// メール送信に失敗（接続・認証・送信）
    #[error("メール送信に失敗: {0}")]
    SendFailed(String),
}

/// メールメッセージ
///
/// [`ReminderTemplate::render`] の出力。NotificationSender に渡される。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    /// 送信元メールアドレス
    pub from:      String,
    /// 送信先メールアドレス
    pub to:        String,
    /// 件名
    pub subject:   String,
    /// プレーンテキスト本文
    pub text_body: String,
}

/// リマインダーテンプレート
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderTemplate {
    /// 件名
    pub subject: String,
    /// プレーンテキスト本文
    pub body:    String,
}

impl Default for ReminderTemplate {
    fn default() -> Self {
        Self {
            subject: DEFAULT_REMINDER_SUBJECT.to_string(),
            body:    DEFAULT_REMINDER_BODY.to_string(),
        }
    }
}

impl ReminderTemplate {
    /// 送信元・宛先を埋めたメールメッセージを生成する
    pub fn render(&self, from: &Email, to: &Email) -> EmailMessage {
        EmailMessage {
            from:      from.as_str().to_string(),
            to:        to.as_str().to_string(),
            subject:   self.subject.clone(),
            text_body: self.body.clone(),
        }
    }
}
