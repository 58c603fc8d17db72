//! # リポジトリ実装
//!
//! ユーザーストアへのアクセスを提供する。
//!
//! ## 設計方針
//!
//! - **読み取り専用**: このシステムはユーザーテーブルを書き換えない
//! - **ストア抽象化**: DynamoDB 固有の処理（スキャン、ページング、型付き属性）をカプセル化
//! - **テスタビリティ**: トレイト経由でモック可能な設計

pub mod cart_user_repository;

pub use cart_user_repository::{
    CartUserRepository,
    DynamoDbCartUserRepository,
    UserTableSchema,
};
