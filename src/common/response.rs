// src/common/response.rs

use serde::Serialize;

/// Envelope de sucesso: `{ ok: true, message?, data? }`.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn data(data: T) -> Self {
        Self { ok: true, message: None, data: Some(data) }
    }

    pub fn with_message(data: T, message: impl Into<String>) -> Self {
        Self { ok: true, message: Some(message.into()), data: Some(data) }
    }
}

impl ApiResponse<()> {
    pub fn message(message: impl Into<String>) -> Self {
        Self { ok: true, message: Some(message.into()), data: None }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_only_response_omits_data() {
        let body = serde_json::to_value(ApiResponse::message("Gasto eliminado")).unwrap();
        assert_eq!(body, serde_json::json!({ "ok": true, "message": "Gasto eliminado" }));
    }

    #[test]
    fn data_response_has_ok_flag() {
        let body = serde_json::to_value(ApiResponse::data(vec![1, 2])).unwrap();
        assert_eq!(body["ok"], true);
        assert_eq!(body["data"], serde_json::json!([1, 2]));
    }
}
