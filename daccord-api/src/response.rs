/// Success envelope
///
/// Every API response body has the shape
/// `{ success, data?, error?, message?, details? }`. Failures are built by
/// [`crate::error::ApiError`]; successes by [`ApiResponse`].

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::error::FieldError;

/// Wire shape shared by success and failure responses
#[derive(Debug, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<FieldError>>,
}

/// Successful response with a status code
#[derive(Debug)]
pub struct ApiResponse<T> {
    status: StatusCode,
    body: Envelope<T>,
}

impl<T> ApiResponse<T> {
    fn new(status: StatusCode, data: Option<T>, message: Option<String>) -> Self {
        Self {
            status,
            body: Envelope {
                success: true,
                data,
                error: None,
                message,
                details: None,
            },
        }
    }

    /// 200 with data
    pub fn ok(data: T) -> Self {
        Self::new(StatusCode::OK, Some(data), None)
    }

    /// 201 with the created record
    pub fn created(data: T) -> Self {
        Self::new(StatusCode::CREATED, Some(data), None)
    }
}

impl ApiResponse<()> {
    /// 200 with only a message, e.g. after a delete
    pub fn message(message: impl Into<String>) -> Self {
        Self::new(StatusCode::OK, None, Some(message.into()))
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_created_envelope() {
        let response = ApiResponse::created(serde_json::json!({ "id": 1 }));
        assert_eq!(response.status, StatusCode::CREATED);

        let json = serde_json::to_value(&response.body).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["data"]["id"], 1);
        assert!(json.get("error").is_none());
    }

    #[test]
    fn test_message_envelope_has_no_data() {
        let response = ApiResponse::message("Playlist deleted");
        let json = serde_json::to_value(&response.body).unwrap();

        assert_eq!(json["message"], "Playlist deleted");
        assert!(json.get("data").is_none());
    }
}
