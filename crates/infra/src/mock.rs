//! # テスト用モック
//!
//! ユースケーステストで使用するインメモリのモック実装。
//! `test-utils` feature を有効にすることで、他クレートからも利用可能。
//!
//! ```toml
//! [dev-dependencies]
//! bean-infra = { workspace = true, features = ["test-utils"] }
//! ```
//!
//! 各モックは `Clone` で状態（`Arc<Mutex<..>>`）を共有するため、ユースケースに渡した後も
//! テスト側から呼び出し記録を参照できる。

use std::{
    collections::HashSet,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use bean_domain::{
    credential::SenderCredentials,
    notification::{EmailMessage, NotificationError},
    user::CartUser,
};

use crate::{
    error::InfraError,
    notification::NotificationSender,
    repository::CartUserRepository,
    secret::SecretStore,
};

// ===== MockCartUserRepository =====

#[derive(Clone, Default)]
pub struct MockCartUserRepository {
    users:      Arc<Mutex<Vec<CartUser>>>,
    fail_with:  Arc<Mutex<Option<String>>>,
    call_count: Arc<Mutex<usize>>,
}

impl MockCartUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// ストアが返すユーザーを追加する（追加順が返却順になる）
    pub fn add_user(&self, user: CartUser) {
        self.users.lock().unwrap().push(user);
    }

    /// 以降のクエリを DynamoDB エラーで失敗させる
    pub fn fail_with(&self, message: impl Into<String>) {
        *self.fail_with.lock().unwrap() = Some(message.into());
    }

    /// クエリの呼び出し回数
    pub fn call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }
}

#[async_trait]
impl CartUserRepository for MockCartUserRepository {
    async fn find_with_items_in_cart(&self) -> Result<Vec<CartUser>, InfraError> {
        *self.call_count.lock().unwrap() += 1;
        if let Some(message) = self.fail_with.lock().unwrap().clone() {
            return Err(InfraError::dynamo_db(message));
        }
        Ok(self.users.lock().unwrap().clone())
    }
}

// ===== MockSecretStore =====

#[derive(Clone, Default)]
pub struct MockSecretStore {
    secret:    Arc<Mutex<Option<String>>>,
    requested: Arc<Mutex<Vec<String>>>,
}

impl MockSecretStore {
    /// 指定したシークレット文字列を返すストアを作成する
    pub fn with_secret(secret: impl Into<String>) -> Self {
        let store = Self::default();
        *store.secret.lock().unwrap() = Some(secret.into());
        store
    }

    /// 常に取得に失敗するストアを作成する
    pub fn unavailable() -> Self {
        Self::default()
    }

    /// 取得を要求されたシークレット名（呼び出し順）
    pub fn requested_names(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }
}

#[async_trait]
impl SecretStore for MockSecretStore {
    async fn get_secret_string(&self, name: &str) -> Result<String, InfraError> {
        self.requested.lock().unwrap().push(name.to_string());
        self.secret
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| InfraError::secrets_manager(format!("シークレット '{name}' がありません")))
    }
}

// ===== MockNotificationSender =====

/// 送信 1 回分（= SMTP セッション 1 回分）の記録
#[derive(Debug, Clone)]
pub struct SentEmail {
    /// 認証に使った送信元アドレス
    pub auth_address:  String,
    /// 認証に使ったパスワード
    pub auth_password: String,
    /// 送信したメッセージ
    pub message:       EmailMessage,
}

#[derive(Clone, Default)]
pub struct MockNotificationSender {
    sessions:           Arc<Mutex<Vec<SentEmail>>>,
    failing_recipients: Arc<Mutex<HashSet<String>>>,
}

impl MockNotificationSender {
    pub fn new() -> Self {
        Self::default()
    }

    /// 指定した宛先への送信を失敗させる
    pub fn fail_for(&self, recipient: impl Into<String>) {
        self.failing_recipients
            .lock()
            .unwrap()
            .insert(recipient.into());
    }

    /// 送信に成功したメール（送信順）
    pub fn sent_emails(&self) -> Vec<EmailMessage> {
        self.sessions()
            .into_iter()
            .map(|session| session.message)
            .collect()
    }

    /// 送信に成功したセッションの記録（送信順）
    pub fn sessions(&self) -> Vec<SentEmail> {
        self.sessions.lock().unwrap().clone()
    }
}

#[async_trait]
impl NotificationSender for MockNotificationSender {
    async fn send_email(
        &self,
        credentials: &SenderCredentials,
        email: &EmailMessage,
    ) -> Result<(), NotificationError> {
        if self.failing_recipients.lock().unwrap().contains(&email.to) {
            return Err(NotificationError::SendFailed(format!(
                "550 宛先を受け付けられません: {}",
                email.to
            )));
        }

        self.sessions.lock().unwrap().push(SentEmail {
            auth_address:  credentials.address().as_str().to_string(),
            auth_password: credentials.password().expose().to_string(),
            message:       email.clone(),
        });
        Ok(())
    }
}
