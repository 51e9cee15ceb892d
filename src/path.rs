use serde::{Deserialize, Serialize};

/// One device name + interface name pair.
///
/// The server represents device+iface name pairs as single strings with a
/// whitespace separator between them; [`DeviceIfacePair::as_wire_repr`]
/// converts this crate's structured representation to that single-string
/// form.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DeviceIfacePair {
    /// Required: true
    #[serde(rename = "device_name")]
    pub device_name: String,

    /// Required: true
    #[serde(rename = "iface_name")]
    pub iface_name: String,
}

impl DeviceIfacePair {
    /// Both names must be non-empty.
    pub fn new(device_name: impl Into<String>, iface_name: impl Into<String>) -> Self {
        Self {
            device_name: device_name.into(),
            iface_name: iface_name.into(),
        }
    }

    /// The server-side single-string form: `"<device> <iface>"`.
    pub fn as_wire_repr(&self) -> String {
        format!("{} {}", self.device_name, self.iface_name)
    }
}

/// One device name + a group of interface names (e.g. the member ports of a
/// port channel). Equality and hashing are order-sensitive over the
/// interface list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DeviceIfaceListPair {
    #[serde(rename = "device_name")]
    pub device_name: String,

    #[serde(rename = "iface_names")]
    pub iface_names: Vec<String>,
}

impl DeviceIfaceListPair {
    pub fn new(device_name: impl Into<String>, iface_names: Vec<String>) -> Self {
        Self {
            device_name: device_name.into(),
            iface_names,
        }
    }
}

/// A device hop in a path.
///
/// `egress` is absent for a flow's final receiving hop, e.g. for dropped
/// flows or flows that terminate at a device's own interface.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Hop {
    #[serde(rename = "ingress")]
    pub ingress: DeviceIfaceListPair,

    #[serde(rename = "egress")]
    pub egress: Option<DeviceIfaceListPair>,
}

impl Hop {
    pub fn new(ingress: DeviceIfaceListPair, egress: Option<DeviceIfaceListPair>) -> Self {
        Self { ingress, egress }
    }
}

/// The series of device hops a flow traverses.
///
/// This is an "aggregated" path because it may stand for multiple physical
/// paths through the network due to port aggregation. A single-hop flow to
/// device D's loopback that can arrive on D.et1 or D.et2 actually traverses
/// two paths, D.et1 -> D.lo and D.et2 -> D.lo, but is represented here as
/// one aggregated path: D.[et1 or et2] -> D.lo.
///
/// Serialized form (a path that enters dev on et1 or et2, exits on et3, and
/// is consumed by dev2 on et1):
///
/// ```json
/// {
///   "hops": [
///     {
///       "ingress": { "device_name": "dev", "iface_names": ["et1", "et2"] },
///       "egress": { "device_name": "dev", "iface_names": ["et3"] }
///     },
///     {
///       "ingress": { "device_name": "dev2", "iface_names": ["et1"] },
///       "egress": null
///     }
///   ]
/// }
/// ```
// Serialized as a map rather than a bare list so that additional path
// information (e.g. path type) can be added without breaking consumers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AggregatedLinksPath {
    #[serde(rename = "hops")]
    pub hops: Vec<Hop>,
}

impl AggregatedLinksPath {
    pub fn new(hops: Vec<Hop>) -> Self {
        Self { hops }
    }
}
