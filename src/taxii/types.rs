use serde::{Deserialize, Serialize};

/// An opaque threat-intelligence object as delivered by the feed.
///
/// Only the `type` attribute is ever inspected; all other attributes pass
/// through to storage verbatim. The internal structure is deliberately not
/// modeled — the feed's object vocabulary is open-ended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ThreatObject(pub serde_json::Map<String, serde_json::Value>);

impl ThreatObject {
    /// The object's declared `type` attribute, if present and a string.
    pub fn object_type(&self) -> Option<&str> {
        self.0.get("type").and_then(|v| v.as_str())
    }
}

/// TAXII 2.1 server discovery response.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct Discovery {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub api_roots: Vec<String>,
}

/// One entry from an API root's collection listing.
#[derive(Debug, Clone, Deserialize)]
pub struct CollectionInfo {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub can_read: bool,
}

/// TAXII 2.1 collection listing response.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct CollectionList {
    #[serde(default)]
    pub collections: Vec<CollectionInfo>,
}

/// TAXII 2.1 objects envelope. A response without an `objects` member is
/// treated as an empty result, not an error.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct Envelope {
    #[serde(default)]
    pub objects: Vec<ThreatObject>,
}
