use log::*;
pub mod alias;
pub mod check;
pub mod devices;
pub mod error;
pub mod filter;
pub mod flow;
pub mod ifaces;
pub mod network;
pub mod notification;
pub mod path;
pub mod properties;
pub mod search;
pub use crate::error::{Error, Result};
pub use crate::filter::{Direction, Filter, PacketField};
pub use crate::flow::{Flow, FlowType, FlowsResponse};
pub use crate::path::{AggregatedLinksPath, DeviceIfaceListPair, DeviceIfacePair, Hop};
pub use crate::search::{Context, SearchBuilder};

#[doc(hidden)]
pub(crate) fn handle_entry<T>(option: Option<T>, name: &'static str) -> Result<T> {
    option.ok_or_else(|| {
        let msg = format!("Missing {name} entry");
        error!("{msg}");
        Error::Config(msg)
    })
}
