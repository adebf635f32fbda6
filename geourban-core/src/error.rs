use thiserror::Error;

pub type Result<T, E = GeoUrbanError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum GeoUrbanError {
    /// An input was rejected before any request was sent.
    #[error("invalid {field} value: {value} is not in the range of {range}")]
    Validation {
        field: &'static str,
        value: String,
        range: &'static str,
    },

    /// The service answered with a non-success status.
    #[error("request failed with status {status}: {}", truncate_body(.body))]
    Status { status: u16, body: String },

    #[error("failed to decode response body as JSON")]
    Decode(#[from] serde_json::Error),

    #[error("failed to send request")]
    Transport(#[from] reqwest::Error),

    #[error("{0}")]
    Config(String),
}

impl GeoUrbanError {
    pub fn status(&self) -> Option<u16> {
        match self {
            GeoUrbanError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, GeoUrbanError::Validation { .. })
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &body[..end])
    } else {
        body.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_message_names_field_value_and_range() {
        let err = GeoUrbanError::Validation {
            field: "latitude",
            value: "91".to_string(),
            range: "[-90.0, 90.0]",
        };

        assert_eq!(
            err.to_string(),
            "invalid latitude value: 91 is not in the range of [-90.0, 90.0]"
        );
        assert!(err.is_validation());
        assert_eq!(err.status(), None);
    }

    #[test]
    fn status_message_truncates_long_bodies() {
        let err = GeoUrbanError::Status { status: 500, body: "x".repeat(500) };

        let msg = err.to_string();
        assert!(msg.starts_with("request failed with status 500: "));
        assert!(msg.ends_with("..."));
        assert_eq!(err.status(), Some(500));
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        let body = "é".repeat(150);
        let out = truncate_body(&body);
        assert!(out.ends_with("..."));
    }
}
