//! DynamoDB ユーザーテーブルの統合テスト
//!
//! DynamoDB Local を使用したテスト。
//!
//! 実行方法:
//! ```bash
//! docker run -p 18000:8000 amazon/dynamodb-local -jar DynamoDBLocal.jar -sharedDb
//! cargo test -p bean-infra --test dynamodb_test
//! ```

use std::collections::HashMap;

use aws_sdk_dynamodb::{Client, types::AttributeValue};
use bean_infra::{
    InfraErrorKind,
    dynamodb,
    repository::{CartUserRepository, DynamoDbCartUserRepository, UserTableSchema},
};
use pretty_assertions::assert_eq;

/// テスト用の DynamoDB エンドポイント
///
/// 優先順位:
/// 1. `DYNAMODB_ENDPOINT`（CI で明示的に設定）
/// 2. `DYNAMODB_PORT` から構築
/// 3. フォールバック: `http://localhost:18000`
fn dynamodb_endpoint() -> String {
    std::env::var("DYNAMODB_ENDPOINT").unwrap_or_else(|_| {
        let port = std::env::var("DYNAMODB_PORT").unwrap_or_else(|_| "18000".to_string());
        format!("http://localhost:{port}")
    })
}

/// ランダムなテーブル名で分離（他テストとの競合を防止）
fn unique_table_name() -> String {
    format!("test_bean_users_{}", uuid::Uuid::now_v7())
}

fn cart(product_ids: &[&str]) -> AttributeValue {
    AttributeValue::L(
        product_ids
            .iter()
            .map(|id| {
                AttributeValue::M(HashMap::from([
                    ("productId".to_string(), AttributeValue::S(id.to_string())),
                    ("quantity".to_string(), AttributeValue::N("1".to_string())),
                ]))
            })
            .collect(),
    )
}

async fn put_user(client: &Client, table_name: &str, id: &str, email: &str, cart: AttributeValue) {
    client
        .put_item()
        .table_name(table_name)
        .item("id", AttributeValue::S(id.to_string()))
        .item("email", AttributeValue::S(email.to_string()))
        .item("cart", cart)
        .send()
        .await
        .expect("アイテムの登録に失敗");
}

async fn cleanup(client: &Client, table_name: &str) {
    let _ = client.delete_table().table_name(table_name).send().await;
}

#[tokio::test]
async fn test_ensure_user_tableが初回呼び出しでテーブルを作成する() {
    let client = dynamodb::create_local_client(&dynamodb_endpoint()).await;
    let table_name = unique_table_name();

    let result = dynamodb::ensure_user_table(&client, &table_name).await;
    assert!(result.is_ok(), "テーブル作成に失敗: {:?}", result.err());

    let describe = client.describe_table().table_name(&table_name).send().await;
    assert!(describe.is_ok(), "テーブルが存在しません");

    let table = describe.unwrap().table.unwrap();
    assert!(
        table
            .key_schema()
            .iter()
            .any(|ks| ks.attribute_name() == dynamodb::USER_TABLE_KEY
                && ks.key_type == aws_sdk_dynamodb::types::KeyType::Hash),
        "id HASH キーが見つかりません"
    );

    cleanup(&client, &table_name).await;
}

#[tokio::test]
async fn test_ensure_user_tableが既存テーブルに対して冪等に動作する() {
    let client = dynamodb::create_local_client(&dynamodb_endpoint()).await;
    let table_name = unique_table_name();

    let result1 = dynamodb::ensure_user_table(&client, &table_name).await;
    assert!(result1.is_ok(), "1回目のテーブル作成に失敗: {:?}", result1.err());

    let result2 = dynamodb::ensure_user_table(&client, &table_name).await;
    assert!(result2.is_ok(), "2回目の呼び出しでエラー: {:?}", result2.err());

    cleanup(&client, &table_name).await;
}

#[tokio::test]
async fn test_カートが空でないユーザーのみ取得される() {
    let client = dynamodb::create_local_client(&dynamodb_endpoint()).await;
    let table_name = unique_table_name();
    dynamodb::ensure_user_table(&client, &table_name).await.unwrap();

    put_user(&client, &table_name, "u1", "a@x.com", cart(&["p-1"])).await;
    put_user(&client, &table_name, "u2", "empty@x.com", cart(&[])).await;
    put_user(&client, &table_name, "u3", "b@x.com", cart(&["p-1", "p-2"])).await;
    put_user(&client, &table_name, "u4", "c@x.com", cart(&["p-3"])).await;

    let schema = UserTableSchema {
        table_name: table_name.clone(),
        ..UserTableSchema::default()
    };
    let repository = DynamoDbCartUserRepository::new(client.clone(), schema);

    let users = repository.find_with_items_in_cart().await.unwrap();

    // スキャン順はパーティションキーのハッシュ順のため、比較前に整列する
    let mut emails: Vec<_> = users
        .iter()
        .map(|user| user.email().to_string())
        .collect();
    emails.sort();
    assert_eq!(emails, vec!["a@x.com", "b@x.com", "c@x.com"]);

    let b = users
        .iter()
        .find(|user| user.email() == "b@x.com")
        .unwrap();
    assert_eq!(b.cart_item_count(), 2);

    cleanup(&client, &table_name).await;
}

#[tokio::test]
async fn test_複数ページにまたがるスキャンで全件取得される() {
    let client = dynamodb::create_local_client(&dynamodb_endpoint()).await;
    let table_name = unique_table_name();
    dynamodb::ensure_user_table(&client, &table_name).await.unwrap();

    let mut expected = Vec::new();
    for i in 0..7 {
        let email = format!("user{i}@x.com");
        put_user(&client, &table_name, &format!("u{i}"), &email, cart(&["p-1"])).await;
        expected.push(email);
    }
    put_user(&client, &table_name, "u-empty", "empty@x.com", cart(&[])).await;

    let schema = UserTableSchema {
        table_name: table_name.clone(),
        ..UserTableSchema::default()
    };
    // 1 ページ 2 件で評価させ、LastEvaluatedKey を複数回たどらせる
    let repository = DynamoDbCartUserRepository::new(client.clone(), schema).with_page_size(2);

    let users = repository.find_with_items_in_cart().await.unwrap();

    let mut emails: Vec<_> = users.iter().map(|user| user.email().to_string()).collect();
    emails.sort();
    expected.sort();
    assert_eq!(emails, expected);

    cleanup(&client, &table_name).await;
}

#[tokio::test]
async fn test_不正なアドレスのレコードもそのまま取得される() {
    let client = dynamodb::create_local_client(&dynamodb_endpoint()).await;
    let table_name = unique_table_name();
    dynamodb::ensure_user_table(&client, &table_name).await.unwrap();

    put_user(&client, &table_name, "u1", "bob", cart(&["p-1"])).await;

    let schema = UserTableSchema {
        table_name: table_name.clone(),
        ..UserTableSchema::default()
    };
    let repository = DynamoDbCartUserRepository::new(client.clone(), schema);

    let users = repository.find_with_items_in_cart().await.unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].email(), "bob");

    cleanup(&client, &table_name).await;
}

#[tokio::test]
async fn test_空テーブルでは空のリストを返す() {
    let client = dynamodb::create_local_client(&dynamodb_endpoint()).await;
    let table_name = unique_table_name();
    dynamodb::ensure_user_table(&client, &table_name).await.unwrap();

    let schema = UserTableSchema {
        table_name: table_name.clone(),
        ..UserTableSchema::default()
    };
    let repository = DynamoDbCartUserRepository::new(client.clone(), schema);

    let users = repository.find_with_items_in_cart().await.unwrap();
    assert!(users.is_empty());

    cleanup(&client, &table_name).await;
}

#[tokio::test]
async fn test_存在しないテーブルのスキャンはdynamodbエラーになる() {
    let client = dynamodb::create_local_client(&dynamodb_endpoint()).await;

    let schema = UserTableSchema {
        table_name: unique_table_name(),
        ..UserTableSchema::default()
    };
    let repository = DynamoDbCartUserRepository::new(client, schema);

    let err = repository.find_with_items_in_cart().await.unwrap_err();
    assert!(matches!(err.kind(), InfraErrorKind::DynamoDb(_)));
}
