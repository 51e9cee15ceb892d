use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// One device entry from the devices endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Device {
    #[serde(rename = "name")]
    pub name: String,

    #[serde(rename = "id")]
    pub id: i64,
}

/// Decoded response from the devices endpoint (a JSON array of devices).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DevicesResponse {
    devices: Vec<Device>,
}

impl DevicesResponse {
    /// Decode an already-parsed devices response body.
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        let devices = serde_json::from_value(value).map_err(|e| Error::Decode(e.to_string()))?;
        Ok(DevicesResponse { devices })
    }

    /// Decode a devices response body from its JSON text.
    pub fn from_json(s: &str) -> Result<Self> {
        let devices = serde_json::from_str(s).map_err(|e| Error::Decode(e.to_string()))?;
        Ok(DevicesResponse { devices })
    }

    pub fn devices(&self) -> &[Device] {
        &self.devices
    }

    pub fn device_by_name(&self, device_name: &str) -> Option<&Device> {
        self.devices.iter().find(|d| d.name == device_name)
    }
}
