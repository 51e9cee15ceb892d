use log::debug;
use serde::{Deserialize, Serialize};

use crate::err_protocol;
use crate::error::{Error, Result};

/// Kind of a server notification issue.
///
/// Unrecognized issue-type strings parse to the catch-all
/// [`IssueType::DoNotCare`], which [`Notification::from_value`] filters
/// out; every recognized value is kept.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssueType {
    LicenseExpired,
    LicenseWillExpire,
    LowStorage,
    NoStorage,
    CollectionErrors,
    CollectionWarnings,
    DoNotCare,
}

impl IssueType {
    pub fn parse(s: &str) -> IssueType {
        match s {
            "LICENSE_EXPIRED" => IssueType::LicenseExpired,
            "LICENSE_WILL_EXPIRE" => IssueType::LicenseWillExpire,
            "LOW_STORAGE" => IssueType::LowStorage,
            "NO_STORAGE" => IssueType::NoStorage,
            "COLLECTION_ERRORS" => IssueType::CollectionErrors,
            "COLLECTION_WARNINGS" => IssueType::CollectionWarnings,
            _ => IssueType::DoNotCare,
        }
    }
}

/// One notification issue reported by the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    pub issue_type: IssueType,
    pub title: String,
    pub body: String,
    pub creation_time: i64,
    /// Absent for issue types not tied to a snapshot.
    pub snapshot_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct RawIssue {
    #[serde(rename = "issueType")]
    issue_type: String,
}

#[derive(Debug, Clone, Deserialize)]
struct RawIssueGroup {
    #[serde(rename = "title")]
    title: String,
    #[serde(rename = "body")]
    body: String,
    #[serde(rename = "creationTime")]
    creation_time: i64,
    #[serde(rename = "snapshotId")]
    snapshot_id: Option<String>,
    #[serde(rename = "issues")]
    issues: Vec<RawIssue>,
}

#[derive(Debug, Clone, Deserialize)]
struct RawNotification {
    #[serde(rename = "notifications")]
    notifications: Vec<RawIssueGroup>,
}

/// Decoded response from the notifications endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    issues: Vec<Issue>,
}

impl Notification {
    /// Decode an already-parsed notifications response body. Issues whose
    /// type is unrecognized are dropped.
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        let raw: RawNotification =
            serde_json::from_value(value).map_err(|e| Error::Decode(e.to_string()))?;
        let mut issues = Vec::new();
        for group in raw.notifications {
            let first = group
                .issues
                .first()
                .ok_or_else(|| err_protocol!("notification {:?} carries no issues", group.title))?;
            let issue_type = IssueType::parse(&first.issue_type);
            if issue_type == IssueType::DoNotCare {
                debug!("dropping notification {:?} of unhandled type", group.title);
                continue;
            }
            issues.push(Issue {
                issue_type,
                title: group.title,
                body: group.body,
                creation_time: group.creation_time,
                snapshot_id: group.snapshot_id,
            });
        }
        Ok(Notification { issues })
    }

    /// Decode a notifications response body from its JSON text.
    pub fn from_json(s: &str) -> Result<Self> {
        let value = serde_json::from_str(s).map_err(|e| Error::Decode(e.to_string()))?;
        Self::from_value(value)
    }

    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::{IssueType, Notification};

    #[test]
    fn issue_type_parses_with_catch_all() {
        assert_eq!(IssueType::parse("LOW_STORAGE"), IssueType::LowStorage);
        assert_eq!(IssueType::parse("SOMETHING_NEW"), IssueType::DoNotCare);
    }

    #[test]
    fn unhandled_issue_types_are_dropped() {
        let body = json!({
            "notifications": [
                {
                    "title": "License expires soon",
                    "body": "Renew within 30 days",
                    "creationTime": 1438817467000i64,
                    "snapshotId": null,
                    "issues": [{"issueType": "LICENSE_WILL_EXPIRE"}],
                },
                {
                    "title": "Some new issue kind",
                    "body": "",
                    "creationTime": 1438817468000i64,
                    "snapshotId": "41",
                    "issues": [{"issueType": "SOMETHING_NEW"}],
                },
                {
                    "title": "Collection failed on veos-1",
                    "body": "ssh timeout",
                    "creationTime": 1438817469000i64,
                    "snapshotId": "42",
                    "issues": [{"issueType": "COLLECTION_ERRORS"}],
                },
            ],
        });
        let notification = Notification::from_value(body).unwrap();
        let issues = notification.issues();
        assert_eq!(issues.len(), 2);
        assert_eq!(issues[0].issue_type, IssueType::LicenseWillExpire);
        assert_eq!(issues[0].snapshot_id, None);
        assert_eq!(issues[1].issue_type, IssueType::CollectionErrors);
        assert_eq!(issues[1].snapshot_id.as_deref(), Some("42"));
    }

    #[test]
    fn notification_without_issues_is_rejected() {
        let body = json!({
            "notifications": [
                {
                    "title": "empty",
                    "body": "",
                    "creationTime": 0,
                    "snapshotId": null,
                    "issues": [],
                },
            ],
        });
        assert!(Notification::from_value(body).is_err());
    }
}
