//! # 型付き属性のデコード
//!
//! DynamoDB は値をデータ型タグ付きのエンベロープで表現する:
//!
//! ```json
//! { "email": { "S": "user@example.com" }, "cart": { "L": [ { "M": { ... } } ] } }
//! ```
//!
//! [`TypedAttribute`] はこのエンベロープを 1 か所でデコードし、スカラー値を取り出す。
//! SDK の [`AttributeValue`] との相互変換と、ワイヤ表現（JSON）の serde 実装を持つ。
//!
//! ## 対応する型タグ
//!
//! | タグ | バリアント |
//! |-----|-----------|
//! | `S` | [`TypedAttribute::String`] |
//! | `N` | [`TypedAttribute::Number`] |
//! | `BOOL` | [`TypedAttribute::Bool`] |
//! | `NULL` | [`TypedAttribute::Null`] |
//! | `L` | [`TypedAttribute::List`] |
//! | `M` | [`TypedAttribute::Map`] |
//! | `SS` | [`TypedAttribute::StringSet`] |
//! | `NS` | [`TypedAttribute::NumberSet`] |
//! | `B` | [`TypedAttribute::Binary`] |
//! | `BS` | [`TypedAttribute::BinarySet`] |
//!
//! バイナリは SDK の属性値からのみ変換する。JSON のワイヤ表現（base64）は扱わない。

use std::collections::HashMap;

use aws_sdk_dynamodb::{primitives::Blob, types::AttributeValue};
use serde::{Deserialize, Serialize};

use crate::InfraError;

/// 型付き属性（DynamoDB の属性エンベロープ）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TypedAttribute {
    #[serde(rename = "S")]
    String(String),
    /// 数値（DynamoDB の表現どおり文字列で保持する）
    #[serde(rename = "N")]
    Number(String),
    #[serde(rename = "BOOL")]
    Bool(bool),
    #[serde(rename = "NULL")]
    Null(bool),
    #[serde(rename = "L")]
    List(Vec<TypedAttribute>),
    #[serde(rename = "M")]
    Map(HashMap<String, TypedAttribute>),
    #[serde(rename = "SS")]
    StringSet(Vec<String>),
    #[serde(rename = "NS")]
    NumberSet(Vec<String>),
    #[serde(skip)]
    Binary(Vec<u8>),
    #[serde(skip)]
    BinarySet(Vec<Vec<u8>>),
}

impl TypedAttribute {
    /// 文字列型（`S`）ならその値を返す
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(value) => Some(value),
            _ => None,
        }
    }

    /// リスト型（`L`）なら要素を返す
    pub fn as_list(&self) -> Option<&[TypedAttribute]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// 型タグ名を返す（エラーメッセージ用）
    pub fn type_tag(&self) -> &'static str {
        match self {
            Self::String(_) => "S",
            Self::Number(_) => "N",
            Self::Bool(_) => "BOOL",
            Self::Null(_) => "NULL",
            Self::List(_) => "L",
            Self::Map(_) => "M",
            Self::StringSet(_) => "SS",
            Self::NumberSet(_) => "NS",
            Self::Binary(_) => "B",
            Self::BinarySet(_) => "BS",
        }
    }
}

impl TryFrom<&AttributeValue> for TypedAttribute {
    type Error = InfraError;

    fn try_from(value: &AttributeValue) -> Result<Self, Self::Error> {
        let attribute = match value {
            AttributeValue::S(s) => Self::String(s.clone()),
            AttributeValue::N(n) => Self::Number(n.clone()),
            AttributeValue::Bool(b) => Self::Bool(*b),
            AttributeValue::Null(n) => Self::Null(*n),
            AttributeValue::L(items) => Self::List(
                items
                    .iter()
                    .map(Self::try_from)
                    .collect::<Result<Vec<_>, _>>()?,
            ),
            AttributeValue::M(entries) => Self::Map(decode_item(entries)?),
            AttributeValue::Ss(values) => Self::StringSet(values.clone()),
            AttributeValue::Ns(values) => Self::NumberSet(values.clone()),
            AttributeValue::B(blob) => Self::Binary(blob.as_ref().to_vec()),
            AttributeValue::Bs(blobs) => {
                Self::BinarySet(blobs.iter().map(|blob| blob.as_ref().to_vec()).collect())
            }
            other => {
                return Err(InfraError::attribute(format!(
                    "未知の属性型です: {other:?}"
                )));
            }
        };
        Ok(attribute)
    }
}

impl From<TypedAttribute> for AttributeValue {
    fn from(value: TypedAttribute) -> Self {
        match value {
            TypedAttribute::String(s) => Self::S(s),
            TypedAttribute::Number(n) => Self::N(n),
            TypedAttribute::Bool(b) => Self::Bool(b),
            TypedAttribute::Null(n) => Self::Null(n),
            TypedAttribute::List(items) => Self::L(items.into_iter().map(Self::from).collect()),
            TypedAttribute::Map(entries) => Self::M(
                entries
                    .into_iter()
                    .map(|(key, value)| (key, Self::from(value)))
                    .collect(),
            ),
            TypedAttribute::StringSet(values) => Self::Ss(values),
            TypedAttribute::NumberSet(values) => Self::Ns(values),
            TypedAttribute::Binary(bytes) => Self::B(Blob::new(bytes)),
            TypedAttribute::BinarySet(values) => {
                Self::Bs(values.into_iter().map(Blob::new).collect())
            }
        }
    }
}

/// アイテム（属性名 → 属性値のマップ）全体をデコードする
pub fn decode_item(
    item: &HashMap<String, AttributeValue>,
) -> Result<HashMap<String, TypedAttribute>, InfraError> {
    item.iter()
        .map(|(name, value)| Ok((name.clone(), TypedAttribute::try_from(value)?)))
        .collect()
}

/// アイテムから文字列型の必須属性を取り出す
///
/// 値はトリムやアンエスケープを行わず、そのまま返す。
///
/// # エラー
///
/// 属性が存在しない、または `S` 型でない場合は属性デコードエラーを返す。
pub fn required_string(
    item: &HashMap<String, AttributeValue>,
    name: &str,
) -> Result<String, InfraError> {
    let value = item
        .get(name)
        .ok_or_else(|| InfraError::attribute(format!("`{name}` 属性がありません")))?;
    let attribute = TypedAttribute::try_from(value)?;

    match attribute {
        TypedAttribute::String(value) => Ok(value),
        other => Err(InfraError::attribute(format!(
            "`{name}` 属性は S 型である必要があります（実際: {}）",
            other.type_tag()
        ))),
    }
}
