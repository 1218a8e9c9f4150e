use serde_json::Value;
use std::fmt;

/// Single failure shape surfaced by every [`super::AnalysisApi`] operation.
///
/// Local input rejection, transport faults, error statuses and undecodable
/// bodies all land here; callers render one value and never handle a raw
/// `reqwest::Error`.
#[derive(Debug, Clone)]
pub enum ApiError {
    /// Input rejected before any request was sent.
    Validation(String),

    /// No usable response: connect or timeout failures, an unreadable body,
    /// a 2xx body that does not decode, or an error status whose body is not
    /// a JSON object.
    Transport(String),

    /// Error status carrying the service's own JSON error object, verbatim.
    Server { status: u16, body: Value },
}

impl ApiError {
    pub(crate) fn transport(message: impl Into<String>) -> Self {
        ApiError::Transport(message.into())
    }

    /// The service's `error` message, when the body carries one.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Server { body, .. } => body.get("error").and_then(Value::as_str),
            _ => None,
        }
    }

    /// Name suggestions some lookup failures attach to the error body.
    ///
    /// The service sends either bare names or full records; both forms are
    /// reduced to names here.
    pub fn suggestions(&self) -> Vec<String> {
        let ApiError::Server { body, .. } = self else {
            return Vec::new();
        };
        let Some(items) = body.get("suggestions").and_then(Value::as_array) else {
            return Vec::new();
        };

        items
            .iter()
            .filter_map(|item| match item {
                Value::String(name) => Some(name.clone()),
                Value::Object(record) => record
                    .get("name")
                    .and_then(Value::as_str)
                    .map(str::to_string),
                _ => None,
            })
            .collect()
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Validation(msg) => write!(f, "invalid request: {msg}"),
            ApiError::Transport(msg) => write!(f, "{msg}"),
            ApiError::Server { status, body } => match self.server_message() {
                Some(msg) => write!(f, "service error (HTTP {status}): {msg}"),
                None => write!(f, "service error (HTTP {status}): {body}"),
            },
        }
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn display_includes_status_and_server_message() {
        let err = ApiError::Server {
            status: 400,
            body: json!({"success": false, "error": "No data loaded. Please upload a CSV file first."}),
        };

        let rendered = err.to_string();
        assert!(rendered.contains("400"));
        assert!(rendered.contains("No data loaded"));
    }

    #[test]
    fn suggestions_accept_both_names_and_records() {
        let from_names = ApiError::Server {
            status: 404,
            body: json!({"error": "Client not found", "suggestions": ["Akello Grace", "Akoth Mary"]}),
        };
        assert_eq!(from_names.suggestions(), vec!["Akello Grace", "Akoth Mary"]);

        let from_records = ApiError::Server {
            status: 404,
            body: json!({
                "error": "Client not found",
                "suggestions": [{"name": "Akello Grace", "group": "Gulu A"}]
            }),
        };
        assert_eq!(from_records.suggestions(), vec!["Akello Grace"]);
    }

    #[test]
    fn transport_errors_have_no_suggestions() {
        let err = ApiError::Transport("request failed: connection refused".to_string());
        assert!(err.suggestions().is_empty());
        assert_eq!(err.server_message(), None);
    }
}
