use std::str::FromStr;

use log::error;
use serde_json::{json, Value};

use crate::err_protocol;
use crate::error::{Error, Result};
use crate::filter::Filter;
use crate::path::DeviceIfacePair;

/// Status of a check evaluated by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CheckStatus {
    None,
    Pass,
    Fail,
    Error,
}

impl FromStr for CheckStatus {
    type Err = Error;

    // The server's "ERROR" string folds onto Fail.
    fn from_str(s: &str) -> Result<Self> {
        match s {
            "NONE" => Ok(CheckStatus::None),
            "PASS" => Ok(CheckStatus::Pass),
            "FAIL" => Ok(CheckStatus::Fail),
            "ERROR" => Ok(CheckStatus::Fail),
            _ => Err(err_protocol!("invalid check status {s:?}")),
        }
    }
}

/// Kind of a check as reported by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CheckType {
    Isolation,
    Reachability,
    Existential,
    QueryStringBased,
    Predefined,
}

impl CheckType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckType::Isolation => "Isolation",
            CheckType::Reachability => "Reachability",
            CheckType::Existential => "Existential",
            CheckType::QueryStringBased => "QueryStringBased",
            CheckType::Predefined => "Predefined",
        }
    }
}

impl FromStr for CheckType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "Isolation" => Ok(CheckType::Isolation),
            "Reachability" => Ok(CheckType::Reachability),
            "Existential" => Ok(CheckType::Existential),
            "QueryStringBased" => Ok(CheckType::QueryStringBased),
            "Predefined" => Ok(CheckType::Predefined),
            _ => Err(err_protocol!("invalid check type {s:?}")),
        }
    }
}

/// A verification assertion uploadable to the server.
#[derive(Debug, Clone, PartialEq)]
pub enum Check {
    /// Checks from-to existence.
    Existential {
        name: String,
        from: Filter,
        to: Filter,
    },
    /// Checks from-to isolation.
    Isolation {
        name: String,
        from: Filter,
        to: Filter,
    },
    /// Checks from-to full IP reachability. `to`, when present, validates
    /// that delivered packets reach locations matching that filter.
    Reachability {
        name: String,
        from: Filter,
        to: Option<Filter>,
    },
    /// Predefined check that a list of VLANs is configured on a list of
    /// edge interfaces.
    VlanExistence {
        interfaces: Vec<DeviceIfacePair>,
        vlans: Vec<i64>,
    },
}

impl Check {
    /// An existence check requires both a from and a to clause.
    pub fn existence(
        from: Option<Filter>,
        to: Option<Filter>,
        name: impl Into<String>,
    ) -> Result<Self> {
        let (from, to) = Self::both_clauses(from, to)?;
        Ok(Check::Existential {
            name: name.into(),
            from,
            to,
        })
    }

    /// An isolation check requires both a from and a to clause.
    pub fn isolation(
        from: Option<Filter>,
        to: Option<Filter>,
        name: impl Into<String>,
    ) -> Result<Self> {
        let (from, to) = Self::both_clauses(from, to)?;
        Ok(Check::Isolation {
            name: name.into(),
            from,
            to,
        })
    }

    /// A reachability check requires a from clause; the destination
    /// location filter is optional.
    pub fn reachability(
        from: Option<Filter>,
        to: Option<Filter>,
        name: impl Into<String>,
    ) -> Result<Self> {
        let Some(from) = from else {
            let msg = "cannot create reachability check without a from clause";
            error!("{msg}");
            return Err(Error::Check(msg.to_string()));
        };
        Ok(Check::Reachability {
            name: name.into(),
            from,
            to,
        })
    }

    pub fn vlan_existence(interfaces: Vec<DeviceIfacePair>, vlans: Vec<i64>) -> Self {
        Check::VlanExistence { interfaces, vlans }
    }

    fn both_clauses(from: Option<Filter>, to: Option<Filter>) -> Result<(Filter, Filter)> {
        match (from, to) {
            (Some(from), Some(to)) => Ok((from, to)),
            _ => {
                let msg = "cannot create check with empty from or to clause";
                error!("{msg}");
                Err(Error::Check(msg.to_string()))
            }
        }
    }

    /// The wire dictionary for this check.
    pub fn to_check_dict(&self) -> Value {
        match self {
            Check::Existential { name, from, to } => {
                structured_dict("Existential", name, Some(from), Some(to))
            }
            Check::Isolation { name, from, to } => {
                structured_dict("Isolation", name, Some(from), Some(to))
            }
            Check::Reachability { name, from, to } => {
                structured_dict("Reachability", name, Some(from), to.as_ref())
            }
            Check::VlanExistence { interfaces, vlans } => json!({
                "checkType": "Predefined",
                "predefinedCheckType": "VLAN_EXISTENCE",
                "params": {
                    "interfaces": interfaces
                        .iter()
                        .map(DeviceIfacePair::as_wire_repr)
                        .collect::<Vec<_>>(),
                    "vlans": vlans,
                },
            }),
        }
    }

    pub fn upload_url_suffix(snapshot_id: i64) -> String {
        format!("/api/snapshots/{snapshot_id}/checks")
    }

    pub fn delete_url_suffix(snapshot_id: i64, check_id: i64) -> String {
        format!("/api/snapshots/{snapshot_id}/checks/{check_id}")
    }
}

fn structured_dict(
    check_type: &str,
    name: &str,
    from: Option<&Filter>,
    to: Option<&Filter>,
) -> Value {
    let mut d = json!({
        "checkType": check_type,
        "name": name,
        "filters": {},
        "noiseTypes": [],
    });
    if let Some(from) = from {
        d["filters"]["from"] = from.as_dict();
    }
    if let Some(to) = to {
        d["filters"]["to"] = to.as_dict();
    }
    d
}

/// Decoded response from the check upload/get endpoints.
///
/// The server's full payload is retained verbatim in `raw`; the typed
/// fields cover the subset this crate interprets.
#[derive(Debug, Clone)]
pub struct CheckResponse {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub check_type: Option<CheckType>,
    pub status: Option<CheckStatus>,
    raw: Value,
}

impl CheckResponse {
    /// Decode an already-parsed check response body.
    pub fn from_value(value: Value) -> Result<Self> {
        let id = match value.get("id") {
            Some(id) => Some(
                id.as_i64()
                    .ok_or_else(|| err_protocol!("non-integer check id {id}"))?,
            ),
            None => None,
        };
        let definition = value.get("definition");
        let name = definition
            .and_then(|d| d.get("name"))
            .and_then(Value::as_str)
            .map(str::to_owned);
        let check_type = match definition.and_then(|d| d.get("checkType")) {
            Some(t) => Some(
                t.as_str()
                    .ok_or_else(|| err_protocol!("non-string checkType {t}"))?
                    .parse()?,
            ),
            None => None,
        };
        let status = match value.get("status") {
            Some(s) => Some(
                s.as_str()
                    .ok_or_else(|| err_protocol!("non-string check status {s}"))?
                    .parse()?,
            ),
            None => None,
        };
        Ok(CheckResponse {
            id,
            name,
            check_type,
            status,
            raw: value,
        })
    }

    /// Decode a check response body from its JSON text.
    pub fn from_json(s: &str) -> Result<Self> {
        let value = serde_json::from_str(s).map_err(|e| Error::Decode(e.to_string()))?;
        Self::from_value(value)
    }

    /// The raw response payload, for callers that need fields this crate
    /// does not model.
    pub fn raw(&self) -> &Value {
        &self.raw
    }
}
