use std::collections::BTreeMap;

use serde_json::{json, Value};

use crate::filter::{Filter, PacketField};
use crate::flow::FlowType;
use crate::path::DeviceIfacePair;

/// Packet-header fields settable on a search [`Context`]. Setting a field
/// twice replaces the earlier value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SearchField {
    IpSrc,
    IpDst,
    IpProto,
    L4Src,
    L4Dst,
}

/// Filtering for either the "from" or the "to" part of a query.
///
/// Built by chaining `set_*` calls, each of which consumes and returns the
/// context.
#[derive(Debug, Clone, Default)]
pub struct Context {
    location: Option<Filter>,
    fields: BTreeMap<SearchField, PacketField>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_device(mut self, device_name: impl Into<String>) -> Self {
        self.location = Some(Filter::device(device_name));
        self
    }

    pub fn set_iface(mut self, device_iface_pair: DeviceIfacePair) -> Self {
        self.location = Some(Filter::iface(device_iface_pair));
        self
    }

    /// Specifies a host or set of hosts by name, IP address/block, or MAC
    /// address.
    ///
    /// Note that compared to [`Context::set_ip_src`] and
    /// [`Context::set_ip_dst`], this call implies a location: the set of
    /// edge ports that are discovered to have one or more matching hosts.
    /// If no hosts match the supplied specifier, no paths will match the
    /// search query.
    pub fn set_host(mut self, host_specifier: impl Into<String>) -> Self {
        self.location = Some(Filter::host(host_specifier));
        self
    }

    /// Note that compared to [`Context::set_host`], this call is
    /// locationless: it asks the server to inject a packet at any edge port
    /// of the network with the given source IP address, regardless of where
    /// that edge port is.
    pub fn set_ip_src(mut self, ip_src: impl Into<String>) -> Self {
        self.fields
            .insert(SearchField::IpSrc, PacketField::IpSrc(ip_src.into()));
        self
    }

    /// See the note in [`Context::set_ip_src`] about the distinction
    /// between this call and [`Context::set_host`].
    pub fn set_ip_dst(mut self, ip_dst: impl Into<String>) -> Self {
        self.fields
            .insert(SearchField::IpDst, PacketField::IpDst(ip_dst.into()));
        self
    }

    pub fn set_ip_proto(mut self, ip_proto: i64) -> Self {
        self.fields
            .insert(SearchField::IpProto, PacketField::IpProto(ip_proto));
        self
    }

    pub fn set_l4_src(mut self, l4_src: i64) -> Self {
        self.fields
            .insert(SearchField::L4Src, PacketField::L4Src(l4_src));
        self
    }

    pub fn set_l4_dst(mut self, l4_dst: i64) -> Self {
        self.fields
            .insert(SearchField::L4Dst, PacketField::L4Dst(l4_dst));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.location.is_none() && self.fields.is_empty()
    }

    /// The endpoint-filter wire dictionary for this context. Only called on
    /// non-empty contexts, so the location/headers invariant always holds.
    fn as_dict(&self) -> Value {
        let fields: Vec<PacketField> = self.fields.values().cloned().collect();
        let headers = if fields.is_empty() {
            vec![]
        } else {
            vec![Filter::packet(&fields)]
        };
        Filter::Endpoint {
            location: self.location.clone().map(Box::new),
            headers,
        }
        .as_dict()
    }
}

/// Assembles a flow-search query dictionary for the server.
#[derive(Debug, Clone, Default)]
pub struct SearchBuilder {
    from_context: Context,
    to_context: Context,
    flow_types: Option<Vec<FlowType>>,
}

impl SearchBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the "from" part of the query.
    pub fn with_from(mut self, context: Context) -> Self {
        self.from_context = context;
        self
    }

    /// Replace the "to" part of the query.
    pub fn with_to(mut self, context: Context) -> Self {
        self.to_context = context;
        self
    }

    /// Restrict any query generated from this builder to `flow_type`.
    pub fn add_flow_type(mut self, flow_type: FlowType) -> Self {
        self.flow_types.get_or_insert_with(Vec::new).push(flow_type);
        self
    }

    /// Generate the search dictionary the server answers. Repeated calls
    /// without intervening mutation yield structurally-equal dictionaries.
    pub fn build_query(&self) -> Value {
        let mut query = json!({});
        if !self.from_context.is_empty() || !self.to_context.is_empty() {
            query["filters"] = json!({});
        }
        if !self.from_context.is_empty() {
            query["filters"]["from"] = self.from_context.as_dict();
        }
        if !self.to_context.is_empty() {
            query["filters"]["to"] = self.to_context.as_dict();
        }
        if let Some(flow_types) = &self.flow_types {
            query["flowTypes"] =
                json!(flow_types.iter().map(FlowType::as_str).collect::<Vec<_>>());
        }
        query
    }
}
