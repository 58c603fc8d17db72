//! # スイープエラー定義
//!
//! リマインダースイープで発生するエラーを定義する。
//! Lambda ハンドラからは `lambda_runtime::Error` に変換して返す。

use bean_domain::{credential::CredentialError, notification::NotificationError};
use bean_infra::InfraError;
use thiserror::Error;

/// リマインダースイープのエラー
#[derive(Debug, Error)]
pub enum SweepError {
    /// ユーザーストアの検索に失敗した（`email` 属性のデコード失敗を含む）
    #[error("ユーザーストアの検索に失敗しました: {0}")]
    StoreQuery(#[from] InfraError),

    /// 送信元認証情報を取得または解析できなかった
    #[error("送信元認証情報を読み込めません: {0}")]
    Credential(#[from] CredentialError),

    /// 宛先への送信に失敗した
    #[error("{recipient} へのリマインダー送信に失敗しました: {source}")]
    Delivery {
        recipient: String,
        source:    NotificationError,
    },

    /// 一部の宛先への送信に失敗した（`DeliveryPolicy::Isolate` のみ）
    #[error(
        "リマインダー送信に一部失敗しました（成功 {sent} 件、失敗: {}）",
        .failed.join(", ")
    )]
    PartialDelivery { sent: usize, failed: Vec<String> },
}
