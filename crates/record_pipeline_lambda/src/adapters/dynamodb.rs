use std::collections::HashMap;

use async_trait::async_trait;
use aws_sdk_dynamodb::error::DisplayErrorContext;
use aws_sdk_dynamodb::types::AttributeValue;
use serde_json::{Map, Value};

use crate::adapters::record_store::TableWriter;

/// `TableWriter` backed by DynamoDB `PutItem`.
#[derive(Debug, Clone)]
pub struct DynamoTableWriter {
    client: aws_sdk_dynamodb::Client,
}

impl DynamoTableWriter {
    pub fn new(client: aws_sdk_dynamodb::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl TableWriter for DynamoTableWriter {
    async fn put_item(&self, table_name: &str, item: &Map<String, Value>) -> Result<(), String> {
        self.client
            .put_item()
            .table_name(table_name)
            .set_item(Some(json_object_to_item(item)))
            .send()
            .await
            .map(|_| ())
            .map_err(|error| {
                format!(
                    "failed to put item into dynamodb table {table_name}: {}",
                    DisplayErrorContext(&error)
                )
            })
    }
}

pub fn json_object_to_item(object: &Map<String, Value>) -> HashMap<String, AttributeValue> {
    object
        .iter()
        .map(|(key, value)| (key.clone(), json_to_attribute_value(value)))
        .collect()
}

/// Maps a JSON value onto the DynamoDB document model.
///
/// Numbers keep their JSON text so integers stay integral in `N` attributes.
pub fn json_to_attribute_value(value: &Value) -> AttributeValue {
    match value {
        Value::Null => AttributeValue::Null(true),
        Value::Bool(flag) => AttributeValue::Bool(*flag),
        Value::Number(number) => AttributeValue::N(number.to_string()),
        Value::String(text) => AttributeValue::S(text.clone()),
        Value::Array(items) => AttributeValue::L(items.iter().map(json_to_attribute_value).collect()),
        Value::Object(object) => AttributeValue::M(json_object_to_item(object)),
    }
}
