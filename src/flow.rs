use std::str::FromStr;

use log::{error, trace};
use serde::{Deserialize, Serialize};

use crate::err_protocol;
use crate::error::{Error, Result};
use crate::path::{AggregatedLinksPath, DeviceIfaceListPair, Hop};

/// Table-name suffix marking a hop in a device's ingress table.
pub const INPUT_TABLE_SUFFIX: &str = ".input";
/// Table-name suffix marking a hop in a device's egress table.
pub const OUTPUT_TABLE_SUFFIX: &str = ".output";

/// Sentinel the server puts in `out_ports` when a flow has no real egress.
const NO_EGRESS_SENTINEL: &str = "none";

/// Classification of a flow returned by the search endpoint.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum FlowType {
    Valid,
    Blackhole,
    Dropped,
    Unreachable,
    Inadmissible,
    Loop,
}

impl FlowType {
    /// The server-side string for this flow type.
    pub fn as_str(&self) -> &'static str {
        match self {
            FlowType::Valid => "VALID",
            FlowType::Blackhole => "BLACKHOLE",
            FlowType::Dropped => "DROPPED",
            FlowType::Unreachable => "UNREACHABLE",
            FlowType::Inadmissible => "INADMISSIBLE",
            FlowType::Loop => "LOOP",
        }
    }
}

impl FromStr for FlowType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "VALID" => Ok(FlowType::Valid),
            "BLACKHOLE" => Ok(FlowType::Blackhole),
            "DROPPED" => Ok(FlowType::Dropped),
            "UNREACHABLE" => Ok(FlowType::Unreachable),
            "INADMISSIBLE" => Ok(FlowType::Inadmissible),
            "LOOP" => Ok(FlowType::Loop),
            other => Err(err_protocol!("invalid flow type {other:?}")),
        }
    }
}

/// One raw per-port forwarding-table step of a flow.
///
/// `in_ports` and `out_ports` entries are device+iface names in the
/// server's `"<device> <iface>"` single-string form.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HopRecord {
    /// Forwarding-table name, e.g. `veos-0.fib`. Tables ending in
    /// `.input`/`.output` are boundary tables; everything else is internal.
    #[serde(rename = "table")]
    pub table: String,

    /// Name of the device that owns the table.
    #[serde(rename = "parent")]
    pub parent: String,

    #[serde(rename = "in_ports", default)]
    pub in_ports: Vec<String>,

    #[serde(rename = "out_ports", default)]
    pub out_ports: Vec<String>,
}

impl HopRecord {
    fn is_input_table(&self) -> bool {
        self.table.ends_with(INPUT_TABLE_SUFFIX)
    }

    fn is_output_table(&self) -> bool {
        self.table.ends_with(OUTPUT_TABLE_SUFFIX)
    }

    /// The device port-group this boundary record covers: `in_ports` for an
    /// input-table record, `out_ports` for an output-table record. Calling
    /// this on an internal record is a protocol error.
    fn port_group(&self) -> Result<DeviceIfaceListPair> {
        let device_ports = if self.is_input_table() {
            &self.in_ports
        } else if self.is_output_table() {
            &self.out_ports
        } else {
            error!("unexpected table hop named {}", self.table);
            return Err(err_protocol!("unexpected table hop named {}", self.table));
        };

        // Each entry carries a device name and an iface name separated by a
        // space; only the iface half is kept here.
        let iface_names = device_ports
            .iter()
            .map(|dp| {
                dp.split_whitespace()
                    .nth(1)
                    .map(str::to_owned)
                    .ok_or_else(|| {
                        err_protocol!("malformed port entry {dp:?} in table {}", self.table)
                    })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(DeviceIfaceListPair::new(self.parent.clone(), iface_names))
    }
}

/// One simulated packet flow returned by the server.
///
/// This carries only a subset of the flow information the server returns:
/// the flow's classification and its aggregated device-level path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flow {
    pub flow_type: FlowType,
    pub path: AggregatedLinksPath,
}

impl Flow {
    /// Fold a flow's raw per-port hop records into one aggregated path.
    ///
    /// Boundary records are collected in traversal order: every input-table
    /// record together with the record just before it (a device receiving a
    /// packet from the prior device's egress), plus the final record when it
    /// is an output-table record with a real egress port. Consecutive
    /// port-groups then pair up into ingress/egress hops; an unpaired
    /// trailing group is a packet that only ingresses its final device.
    pub fn from_hop_records(flow_type: FlowType, records: &[HopRecord]) -> Result<Self> {
        // Note that the following logic breaks if a device has a wire
        // connecting it to itself.
        let mut boundary: Vec<&HopRecord> = Vec::new();
        for (i, record) in records.iter().enumerate() {
            if record.is_input_table() {
                if i > 0 {
                    boundary.push(&records[i - 1]);
                }
                boundary.push(record);
            }
        }
        if let Some(last) = records.last() {
            if last.is_output_table()
                && !last.out_ports.iter().any(|p| p == NO_EGRESS_SENTINEL)
            {
                boundary.push(last);
            }
        }
        trace!(
            "aggregating {} of {} hop records into a path",
            boundary.len(),
            records.len()
        );

        let mut hops = Vec::new();
        let mut pending: Option<DeviceIfaceListPair> = None;
        for record in boundary {
            let group = record.port_group()?;
            match pending.take() {
                None => pending = Some(group),
                Some(ingress) => hops.push(Hop::new(ingress, Some(group))),
            }
        }
        // A packet that just ingresses a final device has no egress group.
        if let Some(ingress) = pending {
            hops.push(Hop::new(ingress, None));
        }

        Ok(Flow {
            flow_type,
            path: AggregatedLinksPath::new(hops),
        })
    }
}

/// Number of flows matching a search, with the server's count qualifier
/// (e.g. `EXACT`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TotalFlows {
    #[serde(rename = "value")]
    pub value: i64,

    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, Deserialize)]
struct RawFlow {
    #[serde(rename = "flowType")]
    flow_type: FlowType,
    #[serde(rename = "hops")]
    hops: Vec<HopRecord>,
}

#[derive(Debug, Clone, Deserialize)]
struct RawFlowsResponse {
    #[serde(rename = "pagedFlows")]
    paged_flows: i64,
    #[serde(rename = "totalFlows")]
    total_flows: TotalFlows,
    #[serde(rename = "flows")]
    flows: Vec<RawFlow>,
}

/// Decoded response from the flow-search endpoint, with every flow's hop
/// list already folded into an aggregated path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowsResponse {
    pub paged_flows: i64,
    pub total_flows: TotalFlows,
    pub flows: Vec<Flow>,
}

impl FlowsResponse {
    /// Decode an already-parsed flow-search response body.
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        let raw: RawFlowsResponse =
            serde_json::from_value(value).map_err(|e| Error::Decode(e.to_string()))?;
        let flows = raw
            .flows
            .into_iter()
            .map(|f| Flow::from_hop_records(f.flow_type, &f.hops))
            .collect::<Result<Vec<_>>>()?;
        Ok(FlowsResponse {
            paged_flows: raw.paged_flows,
            total_flows: raw.total_flows,
            flows,
        })
    }

    /// Decode a flow-search response body from its JSON text.
    pub fn from_json(s: &str) -> Result<Self> {
        let value = serde_json::from_str(s).map_err(|e| Error::Decode(e.to_string()))?;
        Self::from_value(value)
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::{Flow, FlowType, HopRecord};
    use crate::path::{DeviceIfaceListPair, Hop};

    fn input_record(device: &str, in_ports: &[&str]) -> HopRecord {
        HopRecord {
            table: format!("{device}.input"),
            parent: device.to_string(),
            in_ports: in_ports.iter().map(|p| p.to_string()).collect(),
            out_ports: vec![],
        }
    }

    fn output_record(device: &str, out_ports: &[&str]) -> HopRecord {
        HopRecord {
            table: format!("{device}.output"),
            parent: device.to_string(),
            in_ports: vec![],
            out_ports: out_ports.iter().map(|p| p.to_string()).collect(),
        }
    }

    fn internal_record(device: &str, table: &str) -> HopRecord {
        HopRecord {
            table: format!("{device}.{table}"),
            parent: device.to_string(),
            in_ports: vec![],
            out_ports: vec![],
        }
    }

    #[test]
    fn trailing_none_sentinel_produces_no_hop() {
        let records = vec![
            input_record("veos-0", &["veos-0 et1"]),
            internal_record("veos-0", "fib"),
            output_record("veos-0", &["none"]),
        ];
        let flow = Flow::from_hop_records(FlowType::Blackhole, &records).unwrap();
        assert_eq!(
            flow.path.hops,
            vec![Hop::new(
                DeviceIfaceListPair::new("veos-0", vec!["et1".to_string()]),
                None
            )]
        );
    }

    #[test]
    fn unpaired_trailing_record_becomes_receive_hop() {
        let records = vec![
            input_record("veos-0", &["veos-0 et1"]),
            output_record("veos-0", &["veos-0 et2"]),
            input_record("veos-1", &["veos-1 et1"]),
        ];
        let flow = Flow::from_hop_records(FlowType::Valid, &records).unwrap();
        assert_eq!(
            flow.path.hops,
            vec![
                Hop::new(
                    DeviceIfaceListPair::new("veos-0", vec!["et1".to_string()]),
                    Some(DeviceIfaceListPair::new("veos-0", vec!["et2".to_string()])),
                ),
                Hop::new(
                    DeviceIfaceListPair::new("veos-1", vec!["et1".to_string()]),
                    None
                ),
            ]
        );
    }

    #[test]
    fn parallel_ports_stay_grouped() {
        let records = vec![
            input_record("veos-0", &["veos-0 et1", "veos-0 et3"]),
            output_record("veos-0", &["veos-0 et2"]),
            input_record("veos-1", &["veos-1 et1"]),
        ];
        let flow = Flow::from_hop_records(FlowType::Valid, &records).unwrap();
        assert_eq!(
            flow.path.hops[0].ingress,
            DeviceIfaceListPair::new("veos-0", vec!["et1".to_string(), "et3".to_string()])
        );
    }

    #[test]
    fn internal_record_before_input_is_rejected() {
        // The record before an input-table record must itself be a boundary
        // record; anything else cannot be classified into a port-group.
        let records = vec![
            input_record("veos-0", &["veos-0 et1"]),
            internal_record("veos-0", "fib"),
            input_record("veos-1", &["veos-1 et1"]),
        ];
        let err = Flow::from_hop_records(FlowType::Valid, &records).unwrap_err();
        assert!(err.to_string().contains("unexpected table hop named"));
    }

    #[test]
    fn malformed_port_entry_is_rejected() {
        let records = vec![input_record("veos-0", &["et1-no-device-half"])];
        let err = Flow::from_hop_records(FlowType::Dropped, &records).unwrap_err();
        assert!(err.to_string().contains("malformed port entry"));
    }

    #[test]
    fn flow_type_round_trip() {
        for s in [
            "VALID",
            "BLACKHOLE",
            "DROPPED",
            "UNREACHABLE",
            "INADMISSIBLE",
            "LOOP",
        ] {
            let ft: FlowType = s.parse().unwrap();
            assert_eq!(ft.as_str(), s);
        }
        assert!("BOGUS".parse::<FlowType>().is_err());
    }
}
