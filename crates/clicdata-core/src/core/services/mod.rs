//! Resource clients for accounts, dashboards, data sets and schedules.
//!
//! Each service borrows a [`ClicDataClient`](crate::api::client::ClicDataClient)
//! for its lifetime and never holds a session of its own.

pub mod account_service;
pub mod config_service;
pub mod dashboard_service;
pub mod data_service;
pub mod schedule_service;
pub mod types;

use serde_json::Value;

/// Pull the record array stored under `key` out of a response body.
///
/// A body that is already an array is returned whole.
pub(crate) fn records_at(body: Value, key: &str) -> Vec<Value> {
    match body {
        Value::Array(records) => records,
        Value::Object(mut map) => match map.remove(key) {
            Some(Value::Array(records)) => records,
            Some(Value::Null) | None => {
                log::warn!("Response has no '{}' array, treating it as empty", key);
                Vec::new()
            }
            Some(other) => vec![other],
        },
        other => {
            log::warn!("Expected an object holding '{}', got {}", key, other);
            Vec::new()
        }
    }
}
