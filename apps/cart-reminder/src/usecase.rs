//! # ユースケース層
//!
//! リマインダー Lambda のビジネスロジックを実装する。
//!
//! ## 設計方針
//!
//! - **依存性注入**: リポジトリ・シークレットストア・送信実装を `Arc<dyn Trait>` で外部から注入
//! - **薄いハンドラ**: Lambda ハンドラは薄く保ち、ロジックはユースケースに集約

pub mod sweep;

pub use sweep::{ReminderSweep, SUCCESS_TOKEN, SweepReport};
