use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque room identifier issued by the signaling store.
#[derive(Debug, Serialize, Deserialize, Clone, Hash, Eq, PartialEq)]
#[serde(transparent)]
pub struct RoomId(pub String);

/// Capability secret that authorizes publishing the offer.
#[derive(Serialize, Deserialize, Clone, Eq, PartialEq)]
#[serde(transparent)]
pub struct HostKey(pub String);

/// Capability secret that authorizes publishing the answer. Travels inside the invite.
#[derive(Serialize, Deserialize, Clone, Eq, PartialEq)]
#[serde(transparent)]
pub struct JoinKey(pub String);

/// Body returned by the create-room call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RoomCredentials {
    pub room_id: RoomId,
    pub host_key: HostKey,
    pub join_key: JoinKey,
}

impl From<&str> for RoomId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl From<String> for RoomId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl RoomId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

macro_rules! secret_key {
    ($name:ident) => {
        impl $name {
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        // Keys end up in logs through `{:?}` on larger structs; keep them out.
        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($name), "(***)"))
            }
        }
    };
}

secret_key!(HostKey);
secret_key!(JoinKey);
