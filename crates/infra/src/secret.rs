//! # シークレットストア
//!
//! メールリレーの認証情報を名前で取得する。
//!
//! ## 設計方針
//!
//! - **取得のみ**: 解析（JSON → 送信元認証情報）はドメイン層の責務
//! - **秘匿**: 取得した値はログにもエラーメッセージにも含めない
//! - **都度取得**: キャッシュせず、呼び出しごとにストアから取得する

use async_trait::async_trait;
use aws_sdk_secretsmanager::Client;

use crate::InfraError;

/// シークレットストアトレイト
#[async_trait]
pub trait SecretStore: Send + Sync {
    /// 名前を指定してシークレット文字列を取得する
    async fn get_secret_string(&self, name: &str) -> Result<String, InfraError>;
}

/// AWS Secrets Manager 実装の SecretStore
pub struct SecretsManagerSecretStore {
    client: Client,
}

impl SecretsManagerSecretStore {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SecretStore for SecretsManagerSecretStore {
    #[tracing::instrument(skip(self), level = "debug")]
    async fn get_secret_string(&self, name: &str) -> Result<String, InfraError> {
        let output = self
            .client
            .get_secret_value()
            .secret_id(name)
            .send()
            .await
            .map_err(|e| {
                InfraError::secrets_manager(format!("シークレット '{name}' の取得に失敗: {e}"))
            })?;

        // バイナリシークレット（SecretBinary）は想定していない
        output.secret_string.ok_or_else(|| {
            InfraError::secrets_manager(format!(
                "シークレット '{name}' に SecretString がありません"
            ))
        })
    }
}
