use std::str::FromStr;

use log::error;
use serde_json::{json, Map, Value};

use crate::err_protocol;
use crate::error::{Error, Result};
use crate::path::DeviceIfacePair;

/// One packet-header constraint usable inside a [`Filter::Packet`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PacketField {
    /// Source IP address or block. Keys as `ipv6_src` when the value
    /// carries a colon, else `ipv4_src` (a keying heuristic, not address
    /// validation).
    IpSrc(String),
    /// Destination IP address or block; same keying rule as [`PacketField::IpSrc`].
    IpDst(String),
    IpProto(i64),
    L4Src(i64),
    L4Dst(i64),
    IcmpType(i64),
}

impl PacketField {
    /// The wire key this field records under.
    pub fn field_name(&self) -> &'static str {
        match self {
            PacketField::IpSrc(val) => {
                if val.contains(':') {
                    "ipv6_src"
                } else {
                    "ipv4_src"
                }
            }
            PacketField::IpDst(val) => {
                if val.contains(':') {
                    "ipv6_dst"
                } else {
                    "ipv4_dst"
                }
            }
            PacketField::IpProto(_) => "ip_proto",
            PacketField::L4Src(_) => "tp_src",
            PacketField::L4Dst(_) => "tp_dst",
            PacketField::IcmpType(_) => "icmp_type",
        }
    }

    fn value(&self) -> Value {
        match self {
            PacketField::IpSrc(val) | PacketField::IpDst(val) => json!(val),
            PacketField::IpProto(val)
            | PacketField::L4Src(val)
            | PacketField::L4Dst(val)
            | PacketField::IcmpType(val) => json!(val),
        }
    }

    /// Add this field's clause to a packet-filter values map. A field with
    /// the same wire key overwrites any earlier one.
    fn add_clause(&self, values: &mut Map<String, Value>) {
        values.insert(self.field_name().to_string(), json!([self.value()]));
    }
}

/// Which directional headers a packet alias constrains, e.g. whether an IP
/// filter means IP source or IP destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Direction {
    Src,
    Dst,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Src => "SRC",
            Direction::Dst => "DST",
        }
    }
}

impl FromStr for Direction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "SRC" => Ok(Direction::Src),
            "DST" => Ok(Direction::Dst),
            _ => Err(err_protocol!("direction must be one of SRC or DST")),
        }
    }
}

/// A predicate restricting the results the server returns.
///
/// One closed set of variants covering packet-header filters, location
/// filters, alias references, negation, and the from/to composition root.
/// Every variant maps to a wire dictionary carrying a `type` discriminator
/// via [`Filter::as_dict`].
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// Scopes searches to packets with particular headers.
    Packet { values: Map<String, Value> },
    /// References a packet-headers alias by name.
    PacketAlias {
        alias_name: String,
        direction: Option<Direction>,
    },
    /// A specific host or set of hosts by name, IP address/block, or MAC
    /// address.
    Host { host_specifier: String },
    /// Restricts a search to a specific device.
    Device { device_name: String },
    /// Restricts a search to a device interface.
    Iface { pair: DeviceIfacePair },
    /// References a host alias by name.
    HostAlias { alias_name: String },
    /// References a device alias by name.
    DeviceAlias { alias_name: String },
    /// References an interface alias by name.
    InterfaceAlias { alias_name: String },
    /// Wraps and negates a location or headers filter; nesting is
    /// unrestricted.
    Not { clause: Box<Filter> },
    /// The "from" or "to" side of a search or check: an optional location
    /// plus any number of header filters. At least one of the two parts
    /// must be present (enforced by [`Filter::endpoint`]).
    Endpoint {
        location: Option<Box<Filter>>,
        headers: Vec<Filter>,
    },
}

impl Filter {
    /// Merge packet-field constraints into one packet filter. Fields added
    /// later silently overwrite earlier fields with the same wire key.
    pub fn packet(fields: &[PacketField]) -> Self {
        let mut values = Map::new();
        for field in fields {
            field.add_clause(&mut values);
        }
        Filter::Packet { values }
    }

    pub fn packet_alias(alias_name: impl Into<String>, direction: Option<Direction>) -> Self {
        Filter::PacketAlias {
            alias_name: alias_name.into(),
            direction,
        }
    }

    pub fn host(host_specifier: impl Into<String>) -> Self {
        Filter::Host {
            host_specifier: host_specifier.into(),
        }
    }

    pub fn device(device_name: impl Into<String>) -> Self {
        Filter::Device {
            device_name: device_name.into(),
        }
    }

    pub fn iface(pair: DeviceIfacePair) -> Self {
        Filter::Iface { pair }
    }

    pub fn host_alias(alias_name: impl Into<String>) -> Self {
        Filter::HostAlias {
            alias_name: alias_name.into(),
        }
    }

    pub fn device_alias(alias_name: impl Into<String>) -> Self {
        Filter::DeviceAlias {
            alias_name: alias_name.into(),
        }
    }

    pub fn interface_alias(alias_name: impl Into<String>) -> Self {
        Filter::InterfaceAlias {
            alias_name: alias_name.into(),
        }
    }

    pub fn negate(clause: Filter) -> Self {
        Filter::Not {
            clause: Box::new(clause),
        }
    }

    /// Compose an endpoint filter from an optional location and any header
    /// filters. Fails when both parts are absent.
    pub fn endpoint(location: Option<Filter>, headers: Vec<Filter>) -> Result<Self> {
        if location.is_none() && headers.is_empty() {
            let msg = "cannot create EndpointFilter with empty location and headers";
            error!("{msg}");
            return Err(Error::Filter(msg.to_string()));
        }
        Ok(Filter::Endpoint {
            location: location.map(Box::new),
            headers,
        })
    }

    /// The wire dictionary for this filter. Key names and shapes are a
    /// fixed server contract.
    pub fn as_dict(&self) -> Value {
        match self {
            Filter::Packet { values } => json!({
                "type": "PacketFilter",
                "values": values,
            }),
            Filter::PacketAlias {
                alias_name,
                direction,
            } => {
                let mut d = json!({
                    "type": "PacketAliasFilter",
                    "value": alias_name,
                });
                if let Some(direction) = direction {
                    d["direction"] = json!(direction.as_str());
                }
                d
            }
            Filter::Host { host_specifier } => json!({
                "type": "HostFilter",
                "values": [host_specifier],
            }),
            Filter::Device { device_name } => json!({
                "type": "DeviceFilter",
                "values": [device_name],
            }),
            Filter::Iface { pair } => json!({
                "type": "InterfaceFilter",
                "values": [pair.as_wire_repr()],
            }),
            Filter::HostAlias { alias_name } => json!({
                "type": "HostAliasFilter",
                "value": alias_name,
            }),
            Filter::DeviceAlias { alias_name } => json!({
                "type": "DeviceAliasFilter",
                "value": alias_name,
            }),
            Filter::InterfaceAlias { alias_name } => json!({
                "type": "InterfaceAliasFilter",
                "value": alias_name,
            }),
            Filter::Not { clause } => json!({
                "type": "NotFilter",
                "clause": clause.as_dict(),
            }),
            Filter::Endpoint { location, headers } => {
                let mut d = json!({ "type": "EndpointFilter" });
                if let Some(location) = location {
                    d["location"] = location.as_dict();
                }
                if !headers.is_empty() {
                    d["headers"] = Value::Array(headers.iter().map(Filter::as_dict).collect());
                }
                d
            }
        }
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::{Direction, Filter, PacketField};
    use crate::path::DeviceIfacePair;

    #[test]
    fn packet_filter_keys_ipv4_and_ipv6() {
        let v4 = Filter::packet(&[PacketField::IpSrc("10.0.0.1".to_string())]);
        assert_eq!(
            v4.as_dict(),
            json!({"type": "PacketFilter", "values": {"ipv4_src": ["10.0.0.1"]}})
        );

        let v6 = Filter::packet(&[PacketField::IpSrc("2001:db8::1".to_string())]);
        assert_eq!(
            v6.as_dict(),
            json!({"type": "PacketFilter", "values": {"ipv6_src": ["2001:db8::1"]}})
        );
    }

    #[test]
    fn packet_filter_merges_and_overwrites_fields() {
        let f = Filter::packet(&[
            PacketField::L4Dst(80),
            PacketField::IpDst("10.100.0.2".to_string()),
            PacketField::L4Dst(443),
        ]);
        assert_eq!(
            f.as_dict(),
            json!({
                "type": "PacketFilter",
                "values": {"tp_dst": [443], "ipv4_dst": ["10.100.0.2"]},
            })
        );
    }

    #[test]
    fn packet_alias_direction_is_optional() {
        let without = Filter::packet_alias("left_subnet", None);
        assert_eq!(
            without.as_dict(),
            json!({"type": "PacketAliasFilter", "value": "left_subnet"})
        );

        let with = Filter::packet_alias("right_subnet", Some(Direction::Dst));
        assert_eq!(
            with.as_dict(),
            json!({
                "type": "PacketAliasFilter",
                "value": "right_subnet",
                "direction": "DST",
            })
        );
    }

    #[test]
    fn location_filters_use_contract_type_names() {
        assert_eq!(
            Filter::host("left").as_dict(),
            json!({"type": "HostFilter", "values": ["left"]})
        );
        assert_eq!(
            Filter::device("veos-0").as_dict(),
            json!({"type": "DeviceFilter", "values": ["veos-0"]})
        );
        assert_eq!(
            Filter::iface(DeviceIfacePair::new("veos-0", "et3")).as_dict(),
            json!({"type": "InterfaceFilter", "values": ["veos-0 et3"]})
        );
        assert_eq!(
            Filter::interface_alias("edge_left").as_dict(),
            json!({"type": "InterfaceAliasFilter", "value": "edge_left"})
        );
    }

    #[test]
    fn not_filter_wraps_without_collapsing() {
        let once = Filter::negate(Filter::host("left"));
        assert_eq!(
            once.as_dict(),
            json!({
                "type": "NotFilter",
                "clause": {"type": "HostFilter", "values": ["left"]},
            })
        );

        let twice = Filter::negate(Filter::negate(Filter::host("left")));
        assert_eq!(
            twice.as_dict(),
            json!({
                "type": "NotFilter",
                "clause": {
                    "type": "NotFilter",
                    "clause": {"type": "HostFilter", "values": ["left"]},
                },
            })
        );
    }

    #[test]
    fn endpoint_filter_requires_location_or_headers() {
        assert!(Filter::endpoint(None, vec![]).is_err());

        let location_only = Filter::endpoint(Some(Filter::host_alias("left_host")), vec![]).unwrap();
        assert_eq!(
            location_only.as_dict(),
            json!({
                "type": "EndpointFilter",
                "location": {"type": "HostAliasFilter", "value": "left_host"},
            })
        );

        let headers_only = Filter::endpoint(
            None,
            vec![Filter::packet(&[PacketField::IpDst("10.0.0.2".to_string())])],
        )
        .unwrap();
        assert_eq!(
            headers_only.as_dict(),
            json!({
                "type": "EndpointFilter",
                "headers": [
                    {"type": "PacketFilter", "values": {"ipv4_dst": ["10.0.0.2"]}},
                ],
            })
        );
    }

    #[test]
    fn direction_parses_strictly() {
        assert_eq!("SRC".parse::<Direction>().unwrap(), Direction::Src);
        assert_eq!("DST".parse::<Direction>().unwrap(), Direction::Dst);
        assert!("BOTH".parse::<Direction>().is_err());
    }
}
