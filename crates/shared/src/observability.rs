//! # Observability 基盤
//!
//! トレーシングの初期化と、ログ出力形式の設定を提供する。
//!
//! 出力形式は `LOG_FORMAT`（`json` | `pretty`）で切り替える。Lambda 上
//! （`AWS_LAMBDA_FUNCTION_NAME` が設定済み）では ANSI カラーを無効にする。

use strum::{Display, EnumString};

/// ログ出力形式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum LogFormat {
    /// 1 行 1 イベントの JSON（CloudWatch Logs 向け）
    Json,
    /// 人間向けの複数行出力（ローカル開発向け）
    #[default]
    Pretty,
}

/// トレーシング初期化設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TracingConfig {
    /// ルートスパン `app` の `service` フィールドに出力するサービス名
    pub service_name: String,
    pub log_format:   LogFormat,
    pub ansi:         bool,
}

impl TracingConfig {
    /// 環境変数から設定を読み取る
    pub fn from_env(service_name: impl Into<String>) -> Self {
        Self::from_lookup(service_name, |key| std::env::var(key).ok())
    }

    /// 任意の参照関数から設定を読み取る
    ///
    /// `LOG_FORMAT` が解釈できない値の場合は stderr に警告を出し、
    /// [`LogFormat::Pretty`] を使う。subscriber の初期化前なので `tracing` は使えない。
    pub fn from_lookup(
        service_name: impl Into<String>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Self {
        let log_format = match lookup("LOG_FORMAT") {
            Some(value) => value.parse().unwrap_or_else(|_| {
                eprintln!("WARNING: unknown LOG_FORMAT={value:?}, falling back to pretty");
                LogFormat::default()
            }),
            None => LogFormat::default(),
        };

        Self {
            service_name: service_name.into(),
            log_format,
            ansi: lookup("AWS_LAMBDA_FUNCTION_NAME").is_none(),
        }
    }
}

/// グローバル subscriber を登録し、ルートスパン `app` に入る
///
/// 戻り値のガードを保持している間、以降のログはすべて `app` スパン配下に出力される。
/// `RUST_LOG` が未設定の場合のフィルタは `info,bean=debug`。
/// `ErrorLayer` を登録するので、インフラ層エラーの `SpanTrace` にスパンが記録される。
#[cfg(feature = "observability")]
pub fn init_tracing(config: TracingConfig) -> tracing::span::EnteredSpan {
    use tracing_subscriber::{Layer as _, layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,bean=debug".into());

    let fmt_layer = match config.log_format {
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_current_span(true)
            .with_span_list(false)
            .boxed(),
        LogFormat::Pretty => tracing_subscriber::fmt::layer()
            .with_ansi(config.ansi)
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .with(tracing_error::ErrorLayer::default())
        .init();

    tracing::info_span!("app", service = %config.service_name).entered()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> TracingConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        TracingConfig::from_lookup("cart-reminder", |key| vars.get(key).cloned())
    }

    #[test]
    fn 未設定ならprettyでansiを有効にする() {
        assert_eq!(
            load(&[]),
            TracingConfig {
                service_name: "cart-reminder".to_string(),
                log_format:   LogFormat::Pretty,
                ansi:         true,
            }
        );
    }

    #[rstest]
    #[case("json", LogFormat::Json)]
    #[case("pretty", LogFormat::Pretty)]
    #[case("JSON", LogFormat::Pretty)]
    #[case("", LogFormat::Pretty)]
    fn log_formatを解釈し不正値はprettyにする(#[case] value: &str, #[case] expected: LogFormat) {
        assert_eq!(load(&[("LOG_FORMAT", value)]).log_format, expected);
    }

    #[test]
    fn lambda上ではansiを無効にする() {
        let config = load(&[("AWS_LAMBDA_FUNCTION_NAME", "bean-cart-reminder")]);
        assert!(!config.ansi);
    }
}
