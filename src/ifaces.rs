use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::path::{DeviceIfaceListPair, DeviceIfacePair};

/// One interface entry from the interfaces endpoint.
///
/// `member_ports` is non-empty only for aggregate interfaces (e.g. a port
/// channel), in which case it lists the physical member port names.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Iface {
    /// The interface's primary name.
    #[serde(rename = "name")]
    pub name: String,

    /// Every name the interface is known by, the primary name included.
    #[serde(rename = "aliases", default)]
    pub aliases: Vec<String>,

    #[serde(rename = "memberPorts", default, skip_serializing_if = "Vec::is_empty")]
    pub member_ports: Vec<String>,
}

impl Iface {
    pub fn matches_name(&self, iface_name: &str) -> bool {
        self.aliases.iter().any(|a| a == iface_name)
    }

    /// The member-port group of an aggregate interface on `device_name`,
    /// or `None` when no member ports are defined.
    pub fn member_port_group(&self, device_name: &str) -> Option<DeviceIfaceListPair> {
        if self.member_ports.is_empty() {
            return None;
        }
        Some(DeviceIfaceListPair::new(
            device_name,
            self.member_ports.clone(),
        ))
    }

    pub fn to_device_iface_pair(&self, device_name: &str) -> DeviceIfacePair {
        DeviceIfacePair::new(device_name, self.name.clone())
    }
}

/// Decoded response from the interfaces endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IfacesResponse {
    #[serde(rename = "interfaces")]
    pub interfaces: Vec<Iface>,
}

impl IfacesResponse {
    /// Decode an already-parsed interfaces response body.
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        serde_json::from_value(value).map_err(|e| Error::Decode(e.to_string()))
    }

    /// Decode an interfaces response body from its JSON text.
    pub fn from_json(s: &str) -> Result<Self> {
        serde_json::from_str(s).map_err(|e| Error::Decode(e.to_string()))
    }

    /// Look an interface up by any of its names.
    pub fn by_iface_name(&self, iface_name: &str) -> Option<&Iface> {
        self.interfaces.iter().find(|i| i.matches_name(iface_name))
    }
}
