//! # ユーザー
//!
//! カートリマインダーの送信対象となるユーザーを定義する。
//!
//! ## ドメイン用語
//!
//! | 型 | ドメイン用語 | 用途 |
//! |---|------------|------|
//! | [`UserId`] | ユーザー ID | `BeanUsers` テーブルのパーティションキー |
//! | [`Email`] | メールアドレス | 検証済みの送信元・宛先 |
//! | [`CartUser`] | カート保有ユーザー | カートに商品が残っているユーザー |
//!
//! ## 設計方針
//!
//! - **読み取り専用**: このシステムはユーザーテーブルを書き換えない
//! - **カートの中身は解釈しない**: 要素の型に関わらず、件数のみ保持する
//! - **宛先は送信時に検証する**: [`CartUser`] はストアのアドレス文字列をそのまま持ち、
//!   1 件の不正なアドレスがクエリ全体を失敗させないようにする
//!
//! ## 使用例
//!
//! ```rust
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use bean_domain::user::{CartUser, Email, UserId};
//!
//! let user = CartUser::new(Some(UserId::new("user-001")), "user@example.com", 2);
//! let recipient = Email::new(user.email())?;
//!
//! assert_eq!(recipient.as_str(), "user@example.com");
//! # Ok(())
//! # }
//! ```

use derive_more::Display;

use crate::DomainError;

/// ユーザー ID
///
/// `BeanUsers` テーブルの `id` 属性。ユーザー作成時にクライアントが採番した文字列をそのまま使う。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Display)]
#[display("{_0}")]
pub struct UserId(String);

impl UserId {
    /// 文字列からユーザー ID を作成する
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// 文字列参照を取得する
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// メールアドレス（値オブジェクト）
///
/// 生成時にバリデーションを実行し、不正な値の作成を防ぐ。
/// ストアから取り出した値はトリムやエスケープを行わずそのまま保持する。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Email(String);

impl Email {
    /// メールアドレスを作成する
    ///
    /// # バリデーション
    ///
    /// - 空文字列ではない
    /// - `@` を含む
    /// - 最大 255 文字
    ///
    /// # エラー
    ///
    /// バリデーションに失敗した場合は `DomainError::Validation` を返す。
    pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
        let value = value.into();

        if value.is_empty() {
            return Err(DomainError::Validation(
                "メールアドレスは必須です".to_string(),
            ));
        }

        // 基本的な構造検証: local@domain の形式であること
        let Some((local, domain)) = value.split_once('@') else {
            return Err(DomainError::Validation(format!(
                "メールアドレスの形式が不正です: {value}"
            )));
        };

        if local.is_empty() || domain.is_empty() {
            return Err(DomainError::Validation(format!(
                "メールアドレスの形式が不正です: {value}"
            )));
        }

        if value.len() > 255 {
            return Err(DomainError::Validation(
                "メールアドレスは255文字以内である必要があります".to_string(),
            ));
        }

        Ok(Self(value))
    }

    /// 文字列参照を取得する
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Email {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// カートに商品が残っているユーザー
///
/// ユーザーストアのクエリ結果 1 件を表す。
/// カートが空でないことはストア側のフィルタで保証され、ここでは再検証しない。
/// `email` は型付き属性から取り出した文字列のままで、アドレスとしての検証は送信時に行う。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartUser {
    id:              Option<UserId>,
    email:           String,
    cart_item_count: usize,
}

impl CartUser {
    /// カート保有ユーザーを作成する
    pub fn new(id: Option<UserId>, email: impl Into<String>, cart_item_count: usize) -> Self {
        Self {
            id,
            email: email.into(),
            cart_item_count,
        }
    }

    /// ユーザー ID（レコードに `id` 属性が無い場合は `None`）
    pub fn id(&self) -> Option<&UserId> {
        self.id.as_ref()
    }

    /// リマインダーの宛先（ストアの値そのまま、未検証）
    pub fn email(&self) -> &str {
        &self.email
    }

    /// カート内の商品件数
    pub fn cart_item_count(&self) -> usize {
        self.cart_item_count
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    // Email のテスト

    #[test]
    fn test_メールアドレスは正常な形式を受け入れる() {
        assert!(Email::new("user@example.com").is_ok());
    }

    #[rstest]
    #[case("", "空文字列")]
    #[case("no-at-sign", "@記号なし")]
    #[case("@", "@のみ")]
    #[case("@example.com", "ローカル部分が空")]
    #[case("user@", "ドメイン部分が空")]
    #[case(&format!("{}@example.com", "a".repeat(256)), "255文字超過")]
    fn test_メールアドレスは不正な形式を拒否する(
        #[case] input: &str,
        #[case] _reason: &str,
    ) {
        assert!(Email::new(input).is_err());
    }

    #[test]
    fn test_メールアドレスは前後の空白を加工せず保持する() {
        // ストアの値をそのまま宛先にするため、トリムしない
        let email = Email::new(" a@x.com").unwrap();
        assert_eq!(email.as_str(), " a@x.com");
    }

    // CartUser のテスト

    #[test]
    fn test_cart_userは生成時の値を返す() {
        let user = CartUser::new(Some(UserId::new("user-001")), "a@x.com", 3);

        assert_eq!(user.id().map(UserId::as_str), Some("user-001"));
        assert_eq!(user.email(), "a@x.com");
        assert_eq!(user.cart_item_count(), 3);
    }

    #[test]
    fn test_cart_userは不正なアドレスも検証せず保持する() {
        let user = CartUser::new(None, "not-an-address", 1);

        assert_eq!(user.email(), "not-an-address");
        assert!(Email::new(user.email()).is_err());
    }
}
