//! # Bean インフラ層
//!
//! 外部システムとの接続・通信を担当するインフラストラクチャ層。
//!
//! ## 設計方針
//!
//! 外部サービスへのアクセスはすべてトレイトの背後に置き、ユースケース層からは
//! トレイトオブジェクトとして注入する。テストではインメモリのモックに差し替える。
//!
//! ## 責務
//!
//! - **ユーザーストア**: DynamoDB `BeanUsers` テーブルのスキャン
//! - **シークレットストア**: AWS Secrets Manager からの認証情報取得
//! - **メール送信**: SMTP リレー（本番）/ Noop（ローカル）
//!
//! ## 依存関係
//!
//! ```text
//! cart-reminder → infra → domain
//!       ↘                   ↑
//!         ─────────────────┘
//! ```
//!
//! ## モジュール構成
//!
//! - [`dynamodb`] - DynamoDB クライアント生成とテーブル準備
//! - [`attribute`] - DynamoDB の型付き属性（`{"S": "..."}`）のデコード
//! - [`repository`] - ユーザーストアのリポジトリ
//! - [`secret`] - シークレットストア
//! - [`notification`] - メール送信
//! - [`error`] - インフラ層エラー定義

pub mod attribute;
pub mod dynamodb;
pub mod error;
#[cfg(any(test, feature = "test-utils"))]
pub mod mock;
pub mod notification;
pub mod repository;
pub mod secret;

pub use error::{InfraError, InfraErrorKind};
