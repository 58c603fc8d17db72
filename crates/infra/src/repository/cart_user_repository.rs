//! # CartUserRepository
//!
//! カートに商品が残っているユーザーの取得を担当するリポジトリ。
//!
//! ## 設計方針
//!
//! - **ストア側フィルタ**: `cart <> :empty_list` の FilterExpression で絞り込む。
//!   比較は構造比較（空リストかどうか）であり、属性の有無ではない。
//!   クライアント側ではカートを再検証しない
//! - **全件走査**: `LastEvaluatedKey` が返らなくなるまでスキャンを続ける
//! - **アドレスは検証しない**: `email` は型付き属性から取り出した文字列をそのまま返す。
//!   宛先としての検証は送信側で宛先ごとに行う
//! - **順序**: ストアが返した順序をそのまま保つ
//! - **属性名の設定化**: `email` / `cart` 属性名は [`UserTableSchema`] で差し替え可能

use std::collections::HashMap;

use async_trait::async_trait;
use aws_sdk_dynamodb::{Client, types::AttributeValue};
use bean_domain::user::{CartUser, UserId};

use crate::{
    InfraError,
    attribute::{TypedAttribute, required_string},
    dynamodb::USER_TABLE_KEY,
};

/// FilterExpression で使う属性名プレースホルダ
const CART_NAME_PLACEHOLDER: &str = "#cart";
/// FilterExpression で使う空リスト値プレースホルダ
const EMPTY_LIST_PLACEHOLDER: &str = ":empty_list";

/// ユーザーテーブルのスキーマ（テーブル名と属性名）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserTableSchema {
    /// テーブル名
    pub table_name:      String,
    /// メールアドレス属性名
    pub email_attribute: String,
    /// カート属性名
    pub cart_attribute:  String,
}

impl Default for UserTableSchema {
    fn default() -> Self {
        Self {
            table_name:      "BeanUsers".to_string(),
            email_attribute: "email".to_string(),
            cart_attribute:  "cart".to_string(),
        }
    }
}

/// スキャンのフィルタ条件
///
/// DynamoDB の `FilterExpression` / `ExpressionAttributeNames` /
/// `ExpressionAttributeValues` の 3 点セット。
#[derive(Debug, Clone, PartialEq)]
pub struct ScanFilter {
    pub expression: String,
    pub names:      HashMap<String, String>,
    pub values:     HashMap<String, AttributeValue>,
}

impl ScanFilter {
    /// 「カートが空リストと等しくない」フィルタを構築する
    pub fn non_empty_cart(cart_attribute: &str) -> Self {
        Self {
            expression: format!("{CART_NAME_PLACEHOLDER} <> {EMPTY_LIST_PLACEHOLDER}"),
            names:      HashMap::from([(
                CART_NAME_PLACEHOLDER.to_string(),
                cart_attribute.to_string(),
            )]),
            values:     HashMap::from([(
                EMPTY_LIST_PLACEHOLDER.to_string(),
                AttributeValue::from(TypedAttribute::List(Vec::new())),
            )]),
        }
    }
}

/// カート保有ユーザーのリポジトリトレイト
#[async_trait]
pub trait CartUserRepository: Send + Sync {
    /// カートが空でないユーザーをストアの返却順で取得する
    async fn find_with_items_in_cart(&self) -> Result<Vec<CartUser>, InfraError>;
}

/// DynamoDB 実装の CartUserRepository
pub struct DynamoDbCartUserRepository {
    client:    Client,
    schema:    UserTableSchema,
    page_size: Option<i32>,
}

impl DynamoDbCartUserRepository {
    pub fn new(client: Client, schema: UserTableSchema) -> Self {
        Self {
            client,
            schema,
            page_size: None,
        }
    }

    /// 1 回のスキャンで評価するアイテム数の上限（`Limit`）を設定する
    ///
    /// 未設定の場合は DynamoDB の既定（1 MB/ページ）に従う。
    pub fn with_page_size(mut self, page_size: i32) -> Self {
        self.page_size = Some(page_size);
        self
    }
}

#[async_trait]
impl CartUserRepository for DynamoDbCartUserRepository {
    #[tracing::instrument(skip_all, level = "debug", fields(table = %self.schema.table_name))]
    async fn find_with_items_in_cart(&self) -> Result<Vec<CartUser>, InfraError> {
        let filter = ScanFilter::non_empty_cart(&self.schema.cart_attribute);
        let mut users = Vec::new();
        let mut exclusive_start_key: Option<HashMap<String, AttributeValue>> = None;
        let mut page = 0_usize;

        loop {
            let output = self
                .client
                .scan()
                .table_name(&self.schema.table_name)
                .filter_expression(&filter.expression)
                .set_expression_attribute_names(Some(filter.names.clone()))
                .set_expression_attribute_values(Some(filter.values.clone()))
                .set_limit(self.page_size)
                .set_exclusive_start_key(exclusive_start_key.take())
                .send()
                .await
                .map_err(|e| {
                    InfraError::dynamo_db(format!(
                        "テーブル '{}' のスキャンに失敗: {e}",
                        self.schema.table_name
                    ))
                })?;

            page += 1;
            let items = output.items.unwrap_or_default();
            tracing::debug!(page, count = items.len(), "スキャン結果を受信");

            for item in &items {
                users.push(decode_cart_user(item, &self.schema)?);
            }

            match output.last_evaluated_key {
                Some(key) if !key.is_empty() => exclusive_start_key = Some(key),
                _ => break,
            }
        }

        Ok(users)
    }
}

/// スキャン結果の 1 アイテムを CartUser に変換する
///
/// - `email`: 必須。`S` 型から値をそのまま取り出す（アドレスとしては検証しない）
/// - `id`: 任意。`S` 型の場合のみ採用する
/// - `cart`: 件数のみ使う。リスト以外（ストアのフィルタで来ないはず）は 0 件とみなす
fn decode_cart_user(
    item: &HashMap<String, AttributeValue>,
    schema: &UserTableSchema,
) -> Result<CartUser, InfraError> {
    let email = required_string(item, &schema.email_attribute)?;

    let id = optional_attribute(item, USER_TABLE_KEY)?
        .as_ref()
        .and_then(TypedAttribute::as_str)
        .map(UserId::new);

    let cart_item_count = optional_attribute(item, &schema.cart_attribute)?
        .as_ref()
        .and_then(TypedAttribute::as_list)
        .map_or(0, <[TypedAttribute]>::len);

    Ok(CartUser::new(id, email, cart_item_count))
}

fn optional_attribute(
    item: &HashMap<String, AttributeValue>,
    name: &str,
) -> Result<Option<TypedAttribute>, InfraError> {
    item.get(name).map(TypedAttribute::try_from).transpose()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::InfraErrorKind;

    fn item(entries: &[(&str, AttributeValue)]) -> HashMap<String, AttributeValue> {
        entries
            .iter()
            .map(|(name, value)| (name.to_string(), value.clone()))
            .collect()
    }

    fn cart_of(len: usize) -> AttributeValue {
        AttributeValue::L(
            (0..len)
                .map(|i| {
                    AttributeValue::M(HashMap::from([
                        ("productId".to_string(), AttributeValue::S(format!("p-{i}"))),
                        ("quantity".to_string(), AttributeValue::N("1".to_string())),
                    ]))
                })
                .collect(),
        )
    }

    #[test]
    fn フィルタはカートと空リストの構造比較になる() {
        let filter = ScanFilter::non_empty_cart("cart");

        assert_eq!(filter.expression, "#cart <> :empty_list");
        assert_eq!(filter.names.get("#cart").map(String::as_str), Some("cart"));
        assert_eq!(
            filter.values.get(":empty_list"),
            Some(&AttributeValue::L(Vec::new()))
        );
    }

    #[test]
    fn フィルタの属性名は設定に従う() {
        let filter = ScanFilter::non_empty_cart("basket");
        assert_eq!(
            filter.names.get("#cart").map(String::as_str),
            Some("basket")
        );
    }

    #[test]
    fn デフォルトスキーマは_bean_users_テーブルを指す() {
        let schema = UserTableSchema::default();

        assert_eq!(schema.table_name, "BeanUsers");
        assert_eq!(schema.email_attribute, "email");
        assert_eq!(schema.cart_attribute, "cart");
    }

    #[test]
    fn アイテムからカート保有ユーザーを復元する() {
        let record = item(&[
            ("id", AttributeValue::S("user-001".to_string())),
            ("email", AttributeValue::S("a@x.com".to_string())),
            ("cart", cart_of(2)),
        ]);

        let user = decode_cart_user(&record, &UserTableSchema::default()).unwrap();

        assert_eq!(user.email(), "a@x.com");
        assert_eq!(user.id().map(UserId::as_str), Some("user-001"));
        assert_eq!(user.cart_item_count(), 2);
    }

    #[test]
    fn カートの要素型に関わらず件数を数える() {
        let record = item(&[
            ("email", AttributeValue::S("a@x.com".to_string())),
            (
                "cart",
                AttributeValue::L(vec![
                    AttributeValue::S("loose".to_string()),
                    AttributeValue::N("7".to_string()),
                    AttributeValue::Null(true),
                    AttributeValue::B(aws_sdk_dynamodb::primitives::Blob::new(vec![0x01])),
                ]),
            ),
        ]);

        let user = decode_cart_user(&record, &UserTableSchema::default()).unwrap();

        assert_eq!(user.cart_item_count(), 4);
        assert_eq!(user.id(), None);
    }

    #[test]
    fn emailが欠けたアイテムは属性デコードエラーになる() {
        let record = item(&[("cart", cart_of(1))]);

        let err = decode_cart_user(&record, &UserTableSchema::default()).unwrap_err();
        assert!(matches!(err.kind(), InfraErrorKind::Attribute(_)));
    }

    #[test]
    fn emailはアドレスとして検証せずそのまま返す() {
        let record = item(&[
            ("email", AttributeValue::S("not-an-address".to_string())),
            ("cart", cart_of(1)),
        ]);

        let user = decode_cart_user(&record, &UserTableSchema::default()).unwrap();
        assert_eq!(user.email(), "not-an-address");
    }

    #[test]
    fn emailが文字列型でないアイテムは属性デコードエラーになる() {
        let record = item(&[
            ("email", AttributeValue::Ss(vec!["a@x.com".to_string()])),
            ("cart", cart_of(1)),
        ]);

        let err = decode_cart_user(&record, &UserTableSchema::default()).unwrap_err();
        assert!(matches!(err.kind(), InfraErrorKind::Attribute(msg) if msg.contains("email")));
    }

    #[test]
    fn 文字列型でないidは無視する() {
        let record = item(&[
            ("id", AttributeValue::N("42".to_string())),
            ("email", AttributeValue::S("a@x.com".to_string())),
            ("cart", cart_of(1)),
        ]);

        let user = decode_cart_user(&record, &UserTableSchema::default()).unwrap();
        assert_eq!(user.id(), None);
    }

    #[test]
    fn リスト型でないカートは0件とみなす() {
        let record = item(&[
            ("email", AttributeValue::S("a@x.com".to_string())),
            ("cart", AttributeValue::S("p-1".to_string())),
        ]);

        let user = decode_cart_user(&record, &UserTableSchema::default()).unwrap();
        assert_eq!(user.cart_item_count(), 0);
    }
}
