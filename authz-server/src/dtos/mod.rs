pub mod auth;
pub mod clients;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Uniform success envelope: message, timestamp, payload.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(message: impl Into<String>, data: T) -> Self {
        Self {
            message: message.into(),
            timestamp: Utc::now(),
            data,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_carries_message_timestamp_and_data() {
        let res = ApiResponse::new("ok", serde_json::json!({"id": 7}));
        let value = serde_json::to_value(&res).unwrap();
        assert_eq!(value["message"], "ok");
        assert!(value["timestamp"].is_string());
        assert_eq!(value["data"]["id"], 7);
    }
}
