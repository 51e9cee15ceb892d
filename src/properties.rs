//! Reads the properties file that specifies the parameters for connecting
//! to the verification server.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::handle_entry;

/// Directory under the user's home holding the system-wide properties file.
pub const PROPERTIES_DIR: &str = ".netverify";
/// File name of the system-wide properties file.
pub const PROPERTIES_FILE: &str = "netverify.properties";

/// Information required to connect to the verification server.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Properties {
    pub url: String,
    pub username: String,
    pub password: String,
}

impl Properties {
    /// Read properties from `filename`, or from the system-wide file at
    /// `~/.netverify/netverify.properties` when no filename is given.
    pub fn load(filename: Option<&Path>) -> Result<Self> {
        match filename {
            Some(path) => Self::from_file(path),
            None => {
                let path = system_wide_properties()?;
                if !path.exists() {
                    return Err(Error::Config(format!(
                        "error reading properties: please specify a properties file or set \
                         the variables \"url,\" \"username,\" and \"password\" in {}",
                        path.display()
                    )));
                }
                Self::from_file(&path)
            }
        }
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse the vendor's properties format: one `key=value` per line,
    /// `#`/`!` comment lines, no section headers.
    fn parse(contents: &str) -> Result<Self> {
        let mut url = None;
        let mut username = None;
        let mut password = None;
        for line in contents.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                return Err(Error::Config(format!(
                    "malformed properties line {line:?}"
                )));
            };
            let value = value.trim().to_string();
            match key.trim() {
                "url" => url = Some(value),
                "username" => username = Some(value),
                "password" => password = Some(value),
                // Unknown keys are tolerated so the file can carry
                // settings for other tools.
                _ => {}
            }
        }
        Ok(Properties {
            url: handle_entry(url, "url")?,
            username: handle_entry(username, "username")?,
            password: handle_entry(password, "password")?,
        })
    }
}

fn system_wide_properties() -> Result<PathBuf> {
    let home = std::env::var("HOME")
        .map_err(|_| Error::Config("HOME is not set; cannot locate properties".to_string()))?;
    Ok(Path::new(&home).join(PROPERTIES_DIR).join(PROPERTIES_FILE))
}
