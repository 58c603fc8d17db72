//! # Bean 共有ユーティリティ
//!
//! このクレートは、Bean バックエンドの全クレートで使用される共通ユーティリティを提供する。
//!
//! ## 設計方針
//!
//! - 他のすべてのクレート（domain, infra, apps）から依存される
//! - ビジネスロジックを含まない純粋なユーティリティのみを配置
//! - 外部クレートへの依存は最小限に抑える（tracing 系は `observability` feature で有効化）

pub mod event_log;
pub mod observability;
