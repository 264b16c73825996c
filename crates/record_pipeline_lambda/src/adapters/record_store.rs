use async_trait::async_trait;
use record_pipeline_core::contract::{PersistedRecord, RecordId};
use serde_json::{Map, Value};

use crate::error::StoreError;

/// Opaque single-item write against a key-value table.
///
/// Writing an item whose key already exists overwrites it.
#[async_trait]
pub trait TableWriter: Send + Sync {
    async fn put_item(&self, table_name: &str, item: &Map<String, Value>) -> Result<(), String>;
}

/// Serializes `record` and performs exactly one `put_item` keyed by its id.
pub async fn persist_record<R>(
    writer: &dyn TableWriter,
    table_name: &str,
    record: &R,
) -> Result<RecordId, StoreError>
where
    R: PersistedRecord + Sync,
{
    let record_id = record.record_id().to_string();
    let store_error = |message: String| StoreError {
        table_name: table_name.to_string(),
        record_id: record_id.clone(),
        message,
    };

    let item = match serde_json::to_value(record) {
        Ok(Value::Object(item)) => item,
        Ok(other) => {
            return Err(store_error(format!(
                "record must serialize to a JSON object, got {other}"
            )));
        }
        Err(error) => return Err(store_error(format!("failed to serialize record: {error}"))),
    };

    writer
        .put_item(table_name, &item)
        .await
        .map_err(store_error)?;

    Ok(record_id)
}
