use crate::error::EnvelopeError;
use crate::model::{ClientId, RoomId};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::value::RawValue;
use std::fmt;

/// Value of the `type` tag of an [`Envelope`].
#[derive(Debug, Clone, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EnvelopeKind {
    /// Peer asks to enter a room.
    Join,
    Offer,
    Answer,
    IceCandidate,
    /// Peer leaves its room but keeps the connection open.
    Leave,

    /// Server confirmation sent only to the peer that joined.
    Joined,
    /// Server notice to existing members about a newcomer.
    UserJoined,
    /// Server notice to remaining members about a departure.
    UserLeft,

    /// Any tag this relay does not understand. Kept verbatim for logging.
    #[serde(untagged)]
    Unknown(String),
}

impl EnvelopeKind {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Join => "join",
            Self::Offer => "offer",
            Self::Answer => "answer",
            Self::IceCandidate => "ice-candidate",
            Self::Leave => "leave",
            Self::Joined => "joined",
            Self::UserJoined => "user-joined",
            Self::UserLeft => "user-left",
            Self::Unknown(tag) => tag,
        }
    }

    /// Unicast kinds, which must name a recipient in `to`.
    pub fn is_signaling(&self) -> bool {
        matches!(self, Self::Offer | Self::Answer | Self::IceCandidate)
    }
}

impl fmt::Display for EnvelopeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One signaling message, encoded as a single JSON document per frame.
///
/// Empty strings in the optional fields are read as absent. `data` is kept
/// as the raw JSON text it arrived as and is never inspected; an explicit
/// `null` is kept too and forwarded as `null`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope {
    #[serde(rename = "type")]
    pub kind: EnvelopeKind,

    #[serde(default, deserialize_with = "non_empty", skip_serializing_if = "Option::is_none")]
    pub from: Option<ClientId>,

    #[serde(default, deserialize_with = "non_empty", skip_serializing_if = "Option::is_none")]
    pub to: Option<ClientId>,

    #[serde(default, deserialize_with = "non_empty", skip_serializing_if = "Option::is_none")]
    pub room_id: Option<RoomId>,

    #[serde(default, deserialize_with = "non_empty", skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    #[serde(default, deserialize_with = "raw_data", skip_serializing_if = "Option::is_none")]
    pub data: Option<Box<RawValue>>,
}

impl Envelope {
    pub fn new(kind: EnvelopeKind) -> Self {
        Self {
            kind,
            from: None,
            to: None,
            room_id: None,
            username: None,
            data: None,
        }
    }

    /// Confirmation for a successful join, addressed to the joiner only.
    pub fn joined(room_id: RoomId, assigned: ClientId) -> Self {
        Self::new(EnvelopeKind::Joined)
            .with_room(room_id)
            .with_from(assigned)
    }

    pub fn user_joined(from: ClientId, username: Option<String>, room_id: RoomId) -> Self {
        Self {
            username,
            ..Self::new(EnvelopeKind::UserJoined)
                .with_from(from)
                .with_room(room_id)
        }
    }

    pub fn user_left(from: ClientId, room_id: RoomId) -> Self {
        Self::new(EnvelopeKind::UserLeft)
            .with_from(from)
            .with_room(room_id)
    }

    pub fn with_from(mut self, from: impl Into<ClientId>) -> Self {
        self.from = Some(from.into());
        self
    }

    pub fn with_to(mut self, to: impl Into<ClientId>) -> Self {
        self.to = Some(to.into());
        self
    }

    pub fn with_room(mut self, room_id: impl Into<RoomId>) -> Self {
        self.room_id = Some(room_id.into());
        self
    }

    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    /// Attaches `data` from already-encoded JSON text.
    pub fn with_raw_data(mut self, json: &str) -> Result<Self, EnvelopeError> {
        let raw = RawValue::from_string(json.to_string()).map_err(EnvelopeError::Decode)?;
        self.data = Some(raw);
        Ok(self)
    }

    /// Raw JSON text of the payload, exactly as received.
    pub fn data_json(&self) -> Option<&str> {
        self.data.as_deref().map(RawValue::get)
    }

    pub fn decode(frame: &[u8]) -> Result<Self, EnvelopeError> {
        serde_json::from_slice(frame).map_err(EnvelopeError::Decode)
    }

    pub fn encode(&self) -> Result<String, EnvelopeError> {
        serde_json::to_string(self).map_err(EnvelopeError::Encode)
    }
}

fn non_empty<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: From<String>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.filter(|s| !s.is_empty()).map(T::from))
}

// `Option<Box<RawValue>>` alone would turn a literal `null` into `None`.
fn raw_data<'de, D>(deserializer: D) -> Result<Option<Box<RawValue>>, D::Error>
where
    D: Deserializer<'de>,
{
    Box::<RawValue>::deserialize(deserializer).map(Some)
}
