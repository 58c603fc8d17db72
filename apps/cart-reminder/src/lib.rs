//! # カート放棄リマインダー
//!
//! カートに商品を残したままのユーザーへリマインダーメールを送る Lambda 関数。
//! `main` から利用するモジュールを公開し、テストからもアクセスできるようにする。

pub mod config;
pub mod error;
pub mod handler;
pub mod usecase;
