//! Standardized API response bodies (RFC 7807 for errors).

use indexmap::IndexMap;

use serde::{Deserialize, Serialize};

use press_core::validation::ValidationErrors;

/// A bare acknowledgement, e.g. `{"message": "deleted"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn deleted() -> Self {
        Self::new("deleted")
    }
}

/// Body of a 422 response: a summary line plus every message per field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationErrorResponse {
    pub message: String,
    pub errors: IndexMap<String, Vec<String>>,
}

impl From<&ValidationErrors> for ValidationErrorResponse {
    fn from(errors: &ValidationErrors) -> Self {
        Self {
            message: errors.to_string(),
            errors: errors.clone().into_inner(),
        }
    }
}

/// RFC 7807 Problem Details for HTTP APIs.
///
/// See: https://datatracker.ietf.org/doc/html/rfc7807
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// A URI reference that identifies the problem type.
    #[serde(rename = "type")]
    pub error_type: String,

    /// A short, human-readable summary of the problem type.
    pub title: String,

    /// The HTTP status code.
    pub status: u16,

    /// A human-readable explanation specific to this occurrence.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl ErrorResponse {
    pub fn new(status: u16, title: impl Into<String>) -> Self {
        Self {
            error_type: "about:blank".to_string(),
            title: title.into(),
            status,
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    // Common error constructors
    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self::new(400, "Bad Request").with_detail(detail)
    }

    pub fn unauthorized() -> Self {
        Self::new(401, "Unauthorized")
    }

    pub fn not_found(detail: impl Into<String>) -> Self {
        Self::new(404, "Not Found").with_detail(detail)
    }

    pub fn internal_error() -> Self {
        Self::new(500, "Internal Server Error")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_validation_body() {
        let mut errors = ValidationErrors::new();
        errors.add("image", "The image field must be a file.");
        errors.add("title", "The title field is required.");

        let body = serde_json::to_value(ValidationErrorResponse::from(&errors)).unwrap();

        assert_eq!(
            body,
            json!({
                "message": "The image field must be a file. (and 1 more error)",
                "errors": {
                    "image": ["The image field must be a file."],
                    "title": ["The title field is required."],
                }
            })
        );
    }

    #[test]
    fn test_problem_details_skip_empty_detail() {
        let body = serde_json::to_value(ErrorResponse::unauthorized()).unwrap();
        assert_eq!(
            body,
            json!({"type": "about:blank", "title": "Unauthorized", "status": 401})
        );
    }
}
