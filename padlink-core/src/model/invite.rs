use crate::error::InviteError;
use crate::model::role::SessionRole;
use crate::model::room::{JoinKey, RoomId};
use url::Url;

const MODE_PARAM: &str = "p2p";
const MODE_JOIN: &str = "join";
const ROOM_PARAM: &str = "room";
const KEY_PARAM: &str = "key";

/// What the guest needs to join: the room and its join key, plus the page the link points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invite {
    pub base: Url,
    pub room_id: RoomId,
    pub join_key: JoinKey,
}

/// How the process was launched. Resolved once at start-up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Launch {
    Host,
    Join(Invite),
}

/// First value of `name`, the way a browser's `URLSearchParams.get` reads it.
fn query_param(url: &Url, name: &str) -> Option<String> {
    url.query_pairs()
        .find(|(k, _)| k == name)
        .map(|(_, v)| v.into_owned())
}

fn is_join(url: &Url) -> bool {
    query_param(url, MODE_PARAM).as_deref() == Some(MODE_JOIN)
}

impl Launch {
    /// Inspect a launch URL. `p2p=join` selects the guest path and then requires `room` and `key`.
    pub fn from_url(url: &Url) -> Result<Self, InviteError> {
        if !is_join(url) {
            return Ok(Self::Host);
        }

        Invite::parse_url(url).map(Self::Join)
    }

    pub fn role(&self) -> SessionRole {
        match self {
            Self::Host => SessionRole::Host,
            Self::Join(_) => SessionRole::Guest,
        }
    }
}

impl Invite {
    pub fn new(base: Url, room_id: RoomId, join_key: JoinKey) -> Self {
        let mut base = base;
        base.set_query(None);
        base.set_fragment(None);
        Self {
            base,
            room_id,
            join_key,
        }
    }

    pub fn parse(raw: &str) -> Result<Self, InviteError> {
        let url = Url::parse(raw.trim()).map_err(InviteError::InvalidUrl)?;
        Self::parse_url(&url)
    }

    pub fn parse_url(url: &Url) -> Result<Self, InviteError> {
        if !is_join(url) {
            return Err(InviteError::NotAnInvite);
        }

        let room = query_param(url, ROOM_PARAM).filter(|r| !r.is_empty()).ok_or(InviteError::MissingParam(ROOM_PARAM))?;
        let key = query_param(url, KEY_PARAM).filter(|k| !k.is_empty()).ok_or(InviteError::MissingParam(KEY_PARAM))?;

        Ok(Self::new(url.clone(), RoomId(room), JoinKey(key)))
    }

    /// The shareable link. Only the join parameters survive; anything else on the base page is dropped.
    pub fn to_url(&self) -> Url {
        let mut url = self.base.clone();
        url.set_query(None);
        url.query_pairs_mut()
            .append_pair(MODE_PARAM, MODE_JOIN)
            .append_pair(ROOM_PARAM, self.room_id.as_str())
            .append_pair(KEY_PARAM, self.join_key.as_str());
        url
    }

    /// Origin of the invite page, which also serves the signaling endpoints.
    pub fn origin_url(&self) -> Result<Url, InviteError> {
        let origin = self.base.origin();
        if !origin.is_tuple() {
            return Err(InviteError::OpaqueOrigin);
        }
        Url::parse(&origin.ascii_serialization()).map_err(InviteError::InvalidUrl)
    }
}
