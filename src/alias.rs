use log::error;
use serde_json::{json, Map, Value};

use crate::error::{Error, Result};

/// Ethernet type value selecting IPv4 traffic in a headers alias.
const ETH_TYPE_IPV4: &str = "0x800";
/// Ethernet type value selecting IPv6 traffic in a headers alias.
const ETH_TYPE_IPV6: &str = "0x86dd";

/// A server-side named shorthand for a set of interfaces, packet headers,
/// or hosts, referenced by name from filters.
#[derive(Debug, Clone, PartialEq)]
pub enum Alias {
    /// Interfaces on a device. `port` is always present when `dev` is
    /// (defaulted to the `"*"` wildcard by the constructor).
    Interface {
        name: String,
        dev: Option<String>,
        port: Option<String>,
    },
    /// Interfaces on a device, additionally scoped to VLAN ids. Each VLAN
    /// entry is a string and may be a range, e.g. `"1-5"`.
    VlanInterface {
        name: String,
        dev: Option<String>,
        port: Option<String>,
        vlans: Vec<String>,
    },
    /// A named set of traffic headers. Keys are the server's traffic-alias
    /// field names; values are lists.
    Traffic {
        name: String,
        values: Map<String, Value>,
    },
    /// A named list of hosts.
    Host { name: String, hosts: Vec<String> },
}

impl Alias {
    /// An interface alias. A `port` without a `dev` is rejected; a `dev`
    /// without a `port` gets the `"*"` wildcard port.
    pub fn interface(
        name: impl Into<String>,
        dev: Option<String>,
        port: Option<String>,
    ) -> Result<Self> {
        let name = non_empty_name(name)?;
        let (dev, port) = interface_target(dev, port)?;
        Ok(Alias::Interface { name, dev, port })
    }

    /// An interface alias scoped to VLANs. Either `vlans` or `dev` must be
    /// given; the dev/port rules match [`Alias::interface`].
    pub fn vlan_interface(
        name: impl Into<String>,
        dev: Option<String>,
        port: Option<String>,
        vlans: Vec<String>,
    ) -> Result<Self> {
        let name = non_empty_name(name)?;
        let (dev, port) = interface_target(dev, port)?;
        if vlans.is_empty() && dev.is_none() {
            let msg = "either vlans or dev+iface name must be specified";
            error!("{msg}");
            return Err(Error::Alias(msg.to_string()));
        }
        Ok(Alias::VlanInterface {
            name,
            dev,
            port,
            vlans,
        })
    }

    /// A traffic-headers alias from raw field-name/value-list entries.
    pub fn traffic(name: impl Into<String>, values: Map<String, Value>) -> Result<Self> {
        Ok(Alias::Traffic {
            name: non_empty_name(name)?,
            values,
        })
    }

    /// A traffic alias covering a list of IPv4 addresses or subnets.
    pub fn ipv4_traffic(name: impl Into<String>, ipv4_addrs: Vec<String>) -> Result<Self> {
        let mut values = Map::new();
        values.insert("eth_type".to_string(), json!([ETH_TYPE_IPV4]));
        values.insert("ip_addr".to_string(), json!(ipv4_addrs));
        Self::traffic(name, values)
    }

    /// A traffic alias covering a list of IPv6 addresses or subnets.
    pub fn ipv6_traffic(name: impl Into<String>, ipv6_addrs: Vec<String>) -> Result<Self> {
        let mut values = Map::new();
        values.insert("eth_type".to_string(), json!([ETH_TYPE_IPV6]));
        values.insert("ip_addr".to_string(), json!(ipv6_addrs));
        Self::traffic(name, values)
    }

    /// A traffic alias covering a list of VLAN ids.
    pub fn vlan_traffic(name: impl Into<String>, vlan_ids: Vec<String>) -> Result<Self> {
        let mut values = Map::new();
        values.insert("vlan_vid".to_string(), json!(vlan_ids));
        Self::traffic(name, values)
    }

    /// A host alias; each entry is a host name.
    pub fn host(name: impl Into<String>, hosts: Vec<String>) -> Result<Self> {
        Ok(Alias::Host {
            name: non_empty_name(name)?,
            hosts,
        })
    }

    pub fn name(&self) -> &str {
        match self {
            Alias::Interface { name, .. }
            | Alias::VlanInterface { name, .. }
            | Alias::Traffic { name, .. }
            | Alias::Host { name, .. } => name,
        }
    }

    /// The wire dictionary for this alias.
    pub fn to_alias_dict(&self) -> Value {
        match self {
            Alias::Interface { name, dev, port } => interface_dict(name, dev, port),
            Alias::VlanInterface {
                name,
                dev,
                port,
                vlans,
            } => {
                let mut d = interface_dict(name, dev, port);
                if !vlans.is_empty() {
                    d["vlanIds"] = json!(vlans);
                }
                d
            }
            Alias::Traffic { name, values } => json!({
                "type": "HEADERS",
                "name": name,
                "values": values,
            }),
            Alias::Host { name, hosts } => json!({
                "type": "HOSTS",
                "name": name,
                "values": hosts,
            }),
        }
    }

    pub fn upload_url_suffix(&self, snapshot_id: i64) -> String {
        format!("/api/snapshots/{snapshot_id}/aliases/{}", self.name())
    }
}

fn non_empty_name(name: impl Into<String>) -> Result<String> {
    let name = name.into();
    if name.is_empty() {
        let msg = "alias name must be non-empty";
        error!("{msg}");
        return Err(Error::Alias(msg.to_string()));
    }
    Ok(name)
}

fn interface_target(
    dev: Option<String>,
    port: Option<String>,
) -> Result<(Option<String>, Option<String>)> {
    match (&dev, &port) {
        (None, Some(_)) => {
            let msg = "if port is specified, dev must be as well";
            error!("{msg}");
            Err(Error::Alias(msg.to_string()))
        }
        (Some(_), None) => Ok((dev, Some("*".to_string()))),
        _ => Ok((dev, port)),
    }
}

fn interface_dict(name: &str, dev: &Option<String>, port: &Option<String>) -> Value {
    let mut d = json!({
        "type": "INTERFACES",
        "name": name,
    });
    if let Some(dev) = dev {
        let port = port.as_deref().unwrap_or("*");
        d["values"] = json!([format!("{dev} {port}")]);
    }
    d
}
