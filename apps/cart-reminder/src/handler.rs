//! # Lambda ハンドラ
//!
//! イベントのペイロードは使わず、スイープを 1 回実行して `"Success"` を返す。
//! スイープの失敗は Lambda のエラーとして呼び出し元へ伝播する。

use lambda_runtime::{Error, LambdaEvent};
use serde_json::Value;

use crate::usecase::{ReminderSweep, SUCCESS_TOKEN};

/// Lambda 呼び出し 1 回分の処理
pub async fn handle(sweep: &ReminderSweep, event: LambdaEvent<Value>) -> Result<String, Error> {
    tracing::info!(request_id = %event.context.request_id, "リマインダースイープを開始");

    let report = sweep.run().await.inspect_err(|e| {
        tracing::error!(error = %e, "リマインダースイープに失敗");
    })?;

    tracing::info!(
        recipients = report.recipients,
        sent = report.sent,
        "リマインダースイープを終了"
    );
    Ok(SUCCESS_TOKEN.to_string())
}
