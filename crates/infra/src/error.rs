//! # インフラ層エラー定義
//!
//! DynamoDB や Secrets Manager との通信、およびストアのレコード解釈で発生するエラーを表現する。
//!
//! ## 設計方針
//!
//! - **ドメインエラーとの分離**: インフラ固有のエラーを明示
//! - **ログ可能性**: Debug によりログ出力時に詳細情報を表示
//! - **SpanTrace 自動捕捉**: convenience constructor で
//!   エラー生成時の呼び出し経路を自動記録する
//!
//! ## 構造
//!
//! `std::io::Error` と同じ struct + enum パターンを採用:
//! - [`InfraError`]: エラー種別（[`InfraErrorKind`]）と [`SpanTrace`] を保持するラッパー
//! - [`InfraErrorKind`]: エラーの具体的な種別（DynamoDb, SecretsManager, Attribute 等）

use std::fmt;

use derive_more::Display;
use thiserror::Error;
use tracing_error::SpanTrace;

/// インフラ層で発生するエラー
///
/// エラー種別（[`InfraErrorKind`]）と [`SpanTrace`]（呼び出し経路）を保持する。
///
/// ## パターンマッチ
///
/// エラー種別に応じた処理には [`kind()`](InfraError::kind) を使用する:
///
/// ```ignore
/// match error.kind() {
///     InfraErrorKind::Attribute(msg) => { /* レコード不正 */ }
///     _ => { /* その他 */ }
/// }
/// ```
#[derive(Display)]
#[display("{kind}")]
pub struct InfraError {
    kind:       InfraErrorKind,
    span_trace: SpanTrace,
}

/// インフラ層エラーの種別
#[derive(Debug, Error)]
pub enum InfraErrorKind {
    /// DynamoDB エラー
    ///
    /// AWS SDK のエラー型はジェネリクスが深く `#[from]` が困難なため、
    /// 手動で String にマップする。
    #[error("DynamoDB エラー: {0}")]
    DynamoDb(String),

    /// Secrets Manager エラー
    ///
    /// AWS SDK のエラー型は手動で String にマップする。
    /// シークレットの値そのものはメッセージに含めない。
    #[error("Secrets Manager エラー: {0}")]
    SecretsManager(String),

    /// 型付き属性のデコードエラー
    ///
    /// 必須属性の欠落や、期待と異なるデータ型の場合に使用する。
    #[error("属性デコードエラー: {0}")]
    Attribute(String),
}

// ===== InfraError のメソッド =====

impl InfraError {
    /// エラー種別を取得する
    pub fn kind(&self) -> &InfraErrorKind {
        &self.kind
    }

    /// SpanTrace を取得する
    pub fn span_trace(&self) -> &SpanTrace {
        &self.span_trace
    }

    // ===== Convenience constructors =====

    /// DynamoDB エラーを生成する
    pub fn dynamo_db(msg: impl Into<String>) -> Self {
        Self::new(InfraErrorKind::DynamoDb(msg.into()))
    }

    /// Secrets Manager エラーを生成する
    pub fn secrets_manager(msg: impl Into<String>) -> Self {
        Self::new(InfraErrorKind::SecretsManager(msg.into()))
    }

    /// 属性デコードエラーを生成する
    pub fn attribute(msg: impl Into<String>) -> Self {
        Self::new(InfraErrorKind::Attribute(msg.into()))
    }

    fn new(kind: InfraErrorKind) -> Self {
        Self {
            kind,
            span_trace: SpanTrace::capture(),
        }
    }
}

// ===== トレイト実装 =====

impl fmt::Debug for InfraError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InfraError")
            .field("kind", &self.kind)
            .field("span_trace", &self.span_trace)
            .finish()
    }
}

impl std::error::Error for InfraError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.kind.source()
    }
}

#[cfg(test)]
mod tests {
    use tracing_subscriber::layer::SubscriberExt as _;

    use super::*;

    /// テスト用に ErrorLayer 付き subscriber を設定する
    fn with_error_layer(f: impl FnOnce()) {
        let subscriber = tracing_subscriber::registry().with(tracing_error::ErrorLayer::default());
        let _guard = tracing::subscriber::set_default(subscriber);
        f();
    }

    #[test]
    fn test_dynamo_dbでspan_traceがキャプチャされる() {
        with_error_layer(|| {
            let span = tracing::info_span!("test_scan", table = "BeanUsers");
            let _enter = span.enter();

            let err = InfraError::dynamo_db("接続失敗");

            assert!(matches!(err.kind(), InfraErrorKind::DynamoDb(msg) if msg == "接続失敗"));
            let trace_str = format!("{}", err.span_trace());
            assert!(trace_str.contains("test_scan"));
        });
    }

    #[test]
    fn test_secrets_managerで種別が設定される() {
        with_error_layer(|| {
            let err = InfraError::secrets_manager("アクセス拒否");
            assert!(matches!(
                err.kind(),
                InfraErrorKind::SecretsManager(msg) if msg == "アクセス拒否"
            ));
        });
    }

    #[test]
    fn test_attributeで種別が設定される() {
        let err = InfraError::attribute("email がありません");
        assert!(matches!(
            err.kind(),
            InfraErrorKind::Attribute(msg) if msg == "email がありません"
        ));
    }

    #[test]
    fn test_displayがinfra_error_kindのメッセージを出力する() {
        let err = InfraError::dynamo_db("スキャン失敗");
        assert_eq!(format!("{err}"), "DynamoDB エラー: スキャン失敗");
    }

    #[test]
    fn test_文字列メッセージの種別はsourceを持たない() {
        use std::error::Error;

        assert!(InfraError::attribute("x").source().is_none());
    }
}
