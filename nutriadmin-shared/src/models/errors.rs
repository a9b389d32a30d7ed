use serde::{Deserialize, Serialize};

/// Error body returned by the platform API.
///
/// Controllers answer with `{ "message": ... }` (or `Message`); the identity
/// endpoints answer with problem details (`title`/`detail`). A body may carry
/// several of these keys at once, so each one gets its own field.
#[derive(Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct ErrorResponse {
    /// The main error message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// The same message, from controllers that capitalise their keys
    #[serde(default, rename = "Message", skip_serializing_if = "Option::is_none")]
    pub pascal_message: Option<String>,
    /// Problem-details summary
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Optional additional details about the error
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    /// Problem-details explanation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

fn non_blank(text: Option<&str>) -> Option<&str> {
    text.map(str::trim).filter(|text| !text.is_empty())
}

impl ErrorResponse {
    /// Parse an error body, returning `None` when it is not a recognisable error object.
    #[must_use]
    pub fn from_body(body: &[u8]) -> Option<Self> {
        serde_json::from_slice(body).ok()
    }

    /// The headline: `message`, then `Message`, then `title`, ignoring blanks.
    fn headline(&self) -> Option<&str> {
        non_blank(self.message.as_deref())
            .or_else(|| non_blank(self.pascal_message.as_deref()))
            .or_else(|| non_blank(self.title.as_deref()))
    }

    fn explanation(&self) -> Option<&str> {
        non_blank(self.details.as_deref()).or_else(|| non_blank(self.detail.as_deref()))
    }

    /// The text to show the operator: the headline, else the details.
    #[must_use]
    pub fn user_message(&self) -> Option<&str> {
        self.headline().or_else(|| self.explanation())
    }
}

impl std::fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (self.headline(), self.explanation()) {
            (Some(headline), Some(details)) => write!(f, "{headline}: {details}"),
            (Some(text), None) | (None, Some(text)) => f.write_str(text),
            (None, None) => f.write_str("unknown error"),
        }
    }
}

impl std::error::Error for ErrorResponse {}
