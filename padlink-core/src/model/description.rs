use serde::{Deserialize, Serialize};

/// Serialized session description exchanged through the signaling store.
///
/// The negotiator never looks inside; only the transport produces and consumes the contents.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct SessionDescription(String);

impl SessionDescription {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl From<String> for SessionDescription {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for SessionDescription {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}
