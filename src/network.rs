use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Snapshot metadata from the snapshots endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Snapshot {
    #[serde(rename = "id")]
    pub id: i64,

    /// Snapshot creation time in milliseconds.
    #[serde(rename = "creationDateMillis")]
    pub creation_date_millis: f64,
}

/// Network metadata from the networks endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Network {
    #[serde(rename = "id")]
    pub id: i64,

    #[serde(rename = "name")]
    pub name: String,

    #[serde(rename = "orgId")]
    pub org_id: String,

    #[serde(rename = "creatorId")]
    pub creator_id: String,

    #[serde(rename = "snapshots", default)]
    pub snapshots: Vec<Snapshot>,
}

impl Network {
    /// Decode an already-parsed network body.
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        serde_json::from_value(value).map_err(|e| Error::Decode(e.to_string()))
    }

    /// Decode a list of networks, as returned by the networks endpoint.
    pub fn list_from_value(value: serde_json::Value) -> Result<Vec<Self>> {
        serde_json::from_value(value).map_err(|e| Error::Decode(e.to_string()))
    }
}
