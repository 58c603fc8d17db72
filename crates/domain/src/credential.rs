//! # 送信元認証情報
//!
//! メールリレーへの認証に使う送信元アドレスとパスワードを定義する。
//!
//! ## ドメイン用語
//!
//! | 型 | ドメイン用語 | 用途 |
//! |---|------------|------|
//! | [`SenderCredentials`] | 送信元認証情報 | SMTP 認証と `From` ヘッダ |
//! | [`SmtpPassword`] | SMTP パスワード | SMTP 認証 |
//! | [`CredentialError`] | 認証情報エラー | シークレットの取得・解析失敗 |
//!
//! ## シークレットの形式
//!
//! シークレットストアには 1 エントリだけの JSON オブジェクトとして格納されている:
//!
//! ```json
//! { "sender@example.com": "app-password" }
//! ```
//!
//! キーが送信元アドレス、値がパスワード。エントリが 0 件または 2 件以上の場合は
//! 設定ミスとして扱い、任意の 1 件を選ぶことはしない。
//!
//! ## セキュリティ
//!
//! パスワードはメモリ上にのみ保持し、Debug 出力ではマスクする。

use serde_json::Value;
use thiserror::Error;

use crate::{DomainError, user::Email};

/// 認証情報エラー
#[derive(Debug, Error)]
pub enum CredentialError {
    /// シークレットを取得できなかった
    #[error("シークレットを取得できません: {0}")]
    Unavailable(String),

    /// シークレットが JSON として解析できない
    #[error("シークレットが JSON ではありません: {0}")]
    InvalidJson(#[source] serde_json::Error),

    /// シークレットが JSON オブジェクトではない
    #[error("シークレットは JSON オブジェクトである必要があります")]
    NotAnObject,

    /// エントリ数が 1 件ではない
    #[error("シークレットはエントリを 1 件だけ持つ必要があります（実際: {0} 件）")]
    EntryCount(usize),

    /// パスワードが文字列ではない
    #[error("パスワードは文字列である必要があります")]
    PasswordNotString,

    /// 送信元アドレスが不正
    #[error("送信元アドレスが不正です: {0}")]
    InvalidAddress(#[source] DomainError),
}

/// SMTP パスワード
///
/// # セキュリティ
///
/// Debug 出力ではパスワードの値をマスクする。Display は実装しない。
#[derive(Clone)]
pub struct SmtpPassword(String);

impl std::fmt::Debug for SmtpPassword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("SmtpPassword").field(&"[REDACTED]").finish()
    }
}

impl SmtpPassword {
    /// パスワードを作成する
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// 文字列参照を取得する
    pub fn expose(&self) -> &str {
        &self.0
    }
}

/// 送信元認証情報
#[derive(Debug, Clone)]
pub struct SenderCredentials {
    address:  Email,
    password: SmtpPassword,
}

impl SenderCredentials {
    /// 送信元アドレスとパスワードから作成する
    pub fn new(address: Email, password: SmtpPassword) -> Self {
        Self { address, password }
    }

    /// シークレット文字列（`{"<address>": "<password>"}`）を解析する
    ///
    /// # エラー
    ///
    /// - JSON でない: [`CredentialError::InvalidJson`]
    /// - オブジェクトでない: [`CredentialError::NotAnObject`]
    /// - エントリが 1 件でない: [`CredentialError::EntryCount`]
    /// - 値が文字列でない: [`CredentialError::PasswordNotString`]
    /// - キーがメールアドレスとして不正: [`CredentialError::InvalidAddress`]
    pub fn from_secret_string(secret: &str) -> Result<Self, CredentialError> {
        let value: Value = serde_json::from_str(secret).map_err(CredentialError::InvalidJson)?;
        let Value::Object(entries) = value else {
            return Err(CredentialError::NotAnObject);
        };

        if entries.len() != 1 {
            return Err(CredentialError::EntryCount(entries.len()));
        }

        let Some((address, password)) = entries.into_iter().next() else {
            return Err(CredentialError::EntryCount(0));
        };
        let Value::String(password) = password else {
            return Err(CredentialError::PasswordNotString);
        };

        let address = Email::new(address).map_err(CredentialError::InvalidAddress)?;

        Ok(Self::new(address, SmtpPassword::new(password)))
    }

    /// 送信元アドレス
    pub fn address(&self) -> &Email {
        &self.address
    }

    /// SMTP パスワード
    pub fn password(&self) -> &SmtpPassword {
        &self.password
    }
}
