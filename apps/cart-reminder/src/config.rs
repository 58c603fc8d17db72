//! # リマインダー設定
//!
//! 環境変数からリマインダー Lambda の設定を読み込む。
//! 未設定（または空文字）の項目は既定値を使う。既定値は本番構成そのもの。

use std::{env, num::ParseIntError};

use bean_domain::notification::ReminderTemplate;
use bean_infra::repository::UserTableSchema;
use strum::{Display, EnumString, IntoStaticStr};
use thiserror::Error;

/// シークレット名の既定値
pub const DEFAULT_SECRET_NAME: &str = "beanEmailCredentials";
/// SMTP リレーホストの既定値
pub const DEFAULT_SMTP_HOST: &str = "smtp.gmail.com";
/// SMTP リレーポートの既定値（SMTPS）
pub const DEFAULT_SMTP_PORT: u16 = 465;

/// 設定エラー
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("SMTP_PORT は有効なポート番号である必要があります: {value}")]
    InvalidPort {
        value:  String,
        #[source]
        source: ParseIntError,
    },

    #[error("NOTIFICATION_BACKEND が不正です: {0}（smtp | noop）")]
    UnknownBackend(String),

    #[error("DELIVERY_POLICY が不正です: {0}（fail_fast | isolate）")]
    UnknownDeliveryPolicy(String),
}

/// メール送信バックエンド
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum NotificationBackend {
    /// SMTP リレー経由で送信する
    #[default]
    Smtp,
    /// 送信せずログ出力のみ（ドライラン）
    Noop,
}

/// 宛先ごとの送信失敗の扱い
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum DeliveryPolicy {
    /// 最初の送信失敗でスイープを中断する
    #[default]
    FailFast,
    /// 全宛先へ送信を試み、失敗した宛先をまとめて報告する
    Isolate,
}

/// リマインダー Lambda の設定
#[derive(Debug, Clone)]
pub struct ReminderConfig {
    /// ユーザーテーブルのスキーマ
    pub user_table:           UserTableSchema,
    /// 送信元認証情報のシークレット名
    pub secret_name:          String,
    /// SMTP リレーホスト
    pub smtp_host:            String,
    /// SMTP リレーポート
    pub smtp_port:            u16,
    /// 件名・本文
    pub template:             ReminderTemplate,
    /// 送信バックエンド
    pub notification_backend: NotificationBackend,
    /// 送信失敗時の方針
    pub delivery_policy:      DeliveryPolicy,
    /// DynamoDB エンドポイント（DynamoDB Local 使用時に設定、未設定で AWS デフォルト）
    pub dynamodb_endpoint:    Option<String>,
}

impl Default for ReminderConfig {
    fn default() -> Self {
        Self {
            user_table:           UserTableSchema::default(),
            secret_name:          DEFAULT_SECRET_NAME.to_string(),
            smtp_host:            DEFAULT_SMTP_HOST.to_string(),
            smtp_port:            DEFAULT_SMTP_PORT,
            template:             ReminderTemplate::default(),
            notification_backend: NotificationBackend::default(),
            delivery_policy:      DeliveryPolicy::default(),
            dynamodb_endpoint:    None,
        }
    }
}

impl ReminderConfig {
    /// 環境変数から設定を読み込む
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// 任意の参照関数から設定を読み込む
    ///
    /// `lookup` が `None` または空文字を返した項目は既定値を使う。
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|value| !value.is_empty());
        let defaults = Self::default();

        let smtp_port = match get("SMTP_PORT") {
            Some(value) => value
                .parse()
                .map_err(|source| ConfigError::InvalidPort { value, source })?,
            None => defaults.smtp_port,
        };

        let notification_backend = match get("NOTIFICATION_BACKEND") {
            Some(value) => value
                .parse()
                .map_err(|_| ConfigError::UnknownBackend(value))?,
            None => defaults.notification_backend,
        };

        let delivery_policy = match get("DELIVERY_POLICY") {
            Some(value) => value
                .parse()
                .map_err(|_| ConfigError::UnknownDeliveryPolicy(value))?,
            None => defaults.delivery_policy,
        };

        Ok(Self {
            user_table: UserTableSchema {
                table_name: get("USERS_TABLE").unwrap_or(defaults.user_table.table_name),
                ..defaults.user_table
            },
            secret_name: get("EMAIL_SECRET_NAME").unwrap_or(defaults.secret_name),
            smtp_host: get("SMTP_HOST").unwrap_or(defaults.smtp_host),
            smtp_port,
            template: ReminderTemplate {
                subject: get("REMINDER_SUBJECT").unwrap_or(defaults.template.subject),
                body:    get("REMINDER_BODY").unwrap_or(defaults.template.body),
            },
            notification_backend,
            delivery_policy,
            dynamodb_endpoint: get("DYNAMODB_ENDPOINT"),
        })
    }
}
