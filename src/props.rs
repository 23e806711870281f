// Property set: the read-only string mapping (`apihost`, `apiversion`,
// `namespace`, `AUTH`, ...) that drives URL composition and namespace
// resolution. Properties come from a `KEY=VALUE` file in the user's home
// directory, in the same spirit as the token file the CLI keeps there.

use crate::error::{Error, Result};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Name of the property file looked up in the home directory.
pub const PROPS_FILE_NAME: &str = ".wskprops";

/// Environment variable that overrides the property file location.
pub const PROPS_FILE_ENV: &str = "WSK_CONFIG_FILE";

/// Read-only mapping of property names to values.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Properties {
    values: BTreeMap<String, String>,
}

impl Properties {
    pub fn new() -> Self {
        Self::default()
    }

    /// Location of the property file: `$WSK_CONFIG_FILE` when set, else
    /// `~/.wskprops` (falling back to the current directory when there is
    /// no home directory).
    pub fn default_path() -> PathBuf {
        Self::default_path_from(std::env::var(PROPS_FILE_ENV).ok())
    }

    /// `default_path` with the override value passed in.
    pub fn default_path_from(env_override: Option<String>) -> PathBuf {
        if let Some(path) = env_override.filter(|p| !p.trim().is_empty()) {
            return PathBuf::from(path);
        }
        let dir = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        dir.join(PROPS_FILE_NAME)
    }

    /// Load properties from `path`. A file that does not exist yields an
    /// empty set; any other read failure is an error.
    pub fn load(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(data) => {
                tracing::debug!(path = %path.display(), "loaded property file");
                Ok(Self::parse(&data))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no property file");
                Ok(Self::new())
            }
            Err(source) => Err(Error::Io {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    /// Parse `KEY=VALUE` lines. Blank lines, `#` comments and lines without
    /// `=` are skipped; keys and values are trimmed.
    pub fn parse(data: &str) -> Self {
        let values = data
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .filter_map(|line| line.split_once('='))
            .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
            .filter(|(k, _)| !k.is_empty())
            .collect();
        Properties { values }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Set or replace a property. Used while assembling the set (e.g. to
    /// apply command-line overrides); the set is treated as read-only once
    /// handed to the resolver.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    fn require(&self, key: &str) -> Result<&str> {
        self.get(key)
            .ok_or_else(|| Error::MissingProperty(key.to_string()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Properties {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Properties {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Base URL of the API host. A bare host without a scheme is assumed to be
/// served over HTTPS.
pub fn host_base(props: &Properties) -> Result<String> {
    let host = props.require("apihost")?;
    if host.contains("://") {
        Ok(host.to_string())
    } else {
        Ok(format!("https://{}", host))
    }
}

/// `host_base` plus the versioned API path, e.g. `https://host/api/v1`.
pub fn api_base(props: &Properties) -> Result<String> {
    let host = host_base(props)?;
    let version = props.require("apiversion")?;
    Ok(format!("{}/api/{}", host, version))
}
