use crate::error::CodecError;
use crate::model::pad_state::PadState;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Tag of the only message kind currently defined.
pub const PAD_TAG: &str = "pad";

/// Envelope carried on the control channel: `{"t": <tag>, "s": <payload>}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "t", content = "s")]
pub enum ControlMessage {
    #[serde(rename = "pad")]
    Pad(PadState),
}

#[derive(Deserialize)]
struct Envelope {
    t: String,
    #[serde(default)]
    s: Value,
}

impl ControlMessage {
    pub fn encode(&self) -> Result<String, CodecError> {
        serde_json::to_string(self).map_err(CodecError::Malformed)
    }

    /// Decode one inbound payload. Unknown tags are reported separately from malformed input so the
    /// receiver can count them apart.
    pub fn decode(raw: &[u8]) -> Result<Self, CodecError> {
        let envelope: Envelope = serde_json::from_slice(raw).map_err(CodecError::Malformed)?;

        match envelope.t.as_str() {
            PAD_TAG => {
                let state = serde_json::from_value(envelope.s).map_err(CodecError::Malformed)?;
                Ok(Self::Pad(state))
            }
            _ => Err(CodecError::UnknownTag(envelope.t)),
        }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            Self::Pad(_) => PAD_TAG,
        }
    }
}

impl From<PadState> for ControlMessage {
    fn from(state: PadState) -> Self {
        Self::Pad(state)
    }
}
