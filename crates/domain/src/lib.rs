//! # Bean ドメイン層
//!
//! カートリマインダーで扱う値オブジェクトとドメインエラーを定義する。
//!
//! ## 設計方針
//!
//! - 外部システム（DynamoDB、Secrets Manager、SMTP）の詳細に依存しない
//! - 生成時にバリデーションを行い、不正な値を型で排除する
//!
//! ## モジュール構成
//!
//! - [`error`] - ドメイン層で発生するエラーの定義
//! - [`user`] - 送信対象ユーザーとメールアドレス
//! - [`credential`] - メールリレーの送信元認証情報
//! - [`notification`] - リマインダーメールのテンプレートとメッセージ

pub mod credential;
pub mod error;
pub mod notification;
pub mod user;

pub use error::DomainError;
