use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Status code the service uses for a successful envelope.
pub const SUCCESS_CODE: i64 = 200;

/// Uniform wrapper returned by every endpoint of the review service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T = serde_json::Value> {
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub data: Option<T>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub detail: Option<String>,
}

impl<T> Envelope<T> {
    pub fn is_success(&self) -> bool {
        self.code == SUCCESS_CODE
    }

    /// Human readable failure text, preferring `detail` over `message`.
    pub fn failure_message(&self) -> String {
        self.detail
            .clone()
            .or_else(|| self.message.clone())
            .unwrap_or_else(|| format!("unexpected response code {}", self.code))
    }
}

impl Envelope<serde_json::Value> {
    /// Decode the untyped payload into a concrete response type.
    pub fn decode_data<T: DeserializeOwned>(self) -> Result<Envelope<T>, serde_json::Error> {
        let data = match self.data {
            Some(serde_json::Value::Null) | None => None,
            Some(value) => Some(serde_json::from_value(value)?),
        };
        Ok(Envelope {
            code: self.code,
            data,
            message: self.message,
            detail: self.detail,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_code_is_not_success() {
        let envelope: Envelope = serde_json::from_value(json!({"data": []})).unwrap();
        assert_eq!(envelope.code, 0);
        assert!(!envelope.is_success());
    }

    #[test]
    fn failure_message_prefers_detail() {
        let envelope: Envelope = serde_json::from_value(json!({
            "code": 500,
            "message": "failed to list projects",
            "detail": "database unavailable"
        }))
        .unwrap();
        assert_eq!(envelope.failure_message(), "database unavailable");

        let envelope: Envelope = serde_json::from_value(json!({"code": 404})).unwrap();
        assert_eq!(envelope.failure_message(), "unexpected response code 404");
    }

    #[test]
    fn null_data_decodes_to_none() {
        let envelope: Envelope = serde_json::from_value(json!({"code": 200, "data": null})).unwrap();
        let typed: Envelope<Vec<String>> = envelope.decode_data().unwrap();
        assert!(typed.data.is_none());
    }
}
