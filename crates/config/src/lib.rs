//! `caomwatch-config`: the query topology for an audit run.
//!
//! One TOML file declares the AMS sites, the collections they serve, and
//! the collection to storage-inventory namespace mappings. Parsed and
//! validated once; the rest of the system receives resolved values.

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;

use serde::Deserialize;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct AuditConfig {
    #[serde(default)]
    pub service: ServiceConfig,
    pub sites: HashMap<String, SiteConfig>,
    pub collections: HashMap<String, CollectionConfig>,
    #[serde(default)]
    pub mappings: Vec<MappingConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    /// Storage-inventory TAP endpoint, shared by every collection.
    #[serde(default = "default_si_url")]
    pub si_url: String,
    /// Client certificate for both services. `~` expands to the home
    /// directory.
    #[serde(default = "default_cert_path")]
    pub cert_path: String,
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            si_url: default_si_url(),
            cert_path: default_cert_path(),
            output_dir: default_output_dir(),
        }
    }
}

fn default_si_url() -> String {
    "https://ws.cadc-ccda.hia-iha.nrc-cnrc.gc.ca/luskan".to_string()
}

fn default_cert_path() -> String {
    "~/.ssl/cadcproxy.pem".to_string()
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("reports")
}

impl ServiceConfig {
    /// Certificate path with a leading `~/` resolved against the home
    /// directory.
    pub fn resolved_cert_path(&self) -> PathBuf {
        if let Some(rest) = self.cert_path.strip_prefix("~/") {
            if let Some(home) = dirs::home_dir() {
                return home.join(rest);
            }
        }
        PathBuf::from(&self.cert_path)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CollectionConfig {
    /// AMS site serving this collection's CAOM repository.
    pub site: String,
    /// Whether the collection's artifacts live in storage inventory.
    /// Collections outside SI are skipped by audit runs.
    #[serde(default = "default_true")]
    pub in_si: bool,
}

fn default_true() -> bool {
    true
}

/// Collection to SI-namespace link. Many-to-many: a collection may use
/// several namespaces and a namespace may be shared by several
/// collections.
#[derive(Debug, Clone, Deserialize)]
pub struct MappingConfig {
    pub collection: String,
    pub namespace: String,
    /// Hex-bucket sharding width carried from the legacy tooling. Zero
    /// means unsharded; sharded queries are not supported.
    #[serde(default)]
    pub num_char: u32,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub enum ConfigError {
    /// TOML parse / deserialization error.
    Parse(String),
    /// Cross-reference validation error.
    Validation(String),
    /// A collection named on the command line is unknown or outside SI.
    UnknownCollection(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(msg) => write!(f, "config parse error: {msg}"),
            Self::Validation(msg) => write!(f, "config validation error: {msg}"),
            Self::UnknownCollection(name) => {
                write!(f, "collection '{name}' not found in configuration or not in SI")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl AuditConfig {
    pub fn from_toml(input: &str) -> Result<Self, ConfigError> {
        let config: AuditConfig =
            toml::from_str(input).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sites.is_empty() {
            return Err(ConfigError::Validation("at least one site is required".into()));
        }

        for (name, collection) in &self.collections {
            if !self.sites.contains_key(&collection.site) {
                return Err(ConfigError::Validation(format!(
                    "collection '{name}': site '{}' not found",
                    collection.site
                )));
            }
        }

        for mapping in &self.mappings {
            if !self.collections.contains_key(&mapping.collection) {
                return Err(ConfigError::Validation(format!(
                    "mapping for namespace '{}': collection '{}' not found",
                    mapping.namespace, mapping.collection
                )));
            }
        }

        Ok(())
    }

    /// Collections whose artifacts live in SI, sorted by name.
    pub fn collections_in_si(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .collections
            .iter()
            .filter(|(_, c)| c.in_si)
            .map(|(name, _)| name.clone())
            .collect();
        names.sort();
        names
    }

    /// SI namespaces mapped to a collection, in declaration order,
    /// deduplicated.
    pub fn namespaces_for(&self, collection: &str) -> Vec<String> {
        let mut namespaces = Vec::new();
        for mapping in &self.mappings {
            if mapping.collection == collection && !namespaces.contains(&mapping.namespace) {
                namespaces.push(mapping.namespace.clone());
            }
        }
        namespaces
    }

    /// Collections sharing a namespace, in declaration order, deduplicated.
    pub fn collections_for_namespace(&self, namespace: &str) -> Vec<String> {
        let mut names = Vec::new();
        for mapping in &self.mappings {
            if mapping.namespace == namespace && !names.contains(&mapping.collection) {
                names.push(mapping.collection.clone());
            }
        }
        names
    }

    /// CAOM repository URL for a collection, through its AMS site.
    pub fn site_url_for(&self, collection: &str) -> Result<&str, ConfigError> {
        let entry = self
            .collections
            .get(collection)
            .ok_or_else(|| ConfigError::UnknownCollection(collection.to_string()))?;
        let site = self.sites.get(&entry.site).ok_or_else(|| {
            ConfigError::Validation(format!("site '{}' not found", entry.site))
        })?;
        Ok(&site.url)
    }

    /// Resolve the collection list for a run. An empty request means every
    /// in-SI collection; explicit names must exist and be in SI.
    pub fn resolve_collections(&self, requested: &[String]) -> Result<Vec<String>, ConfigError> {
        if requested.is_empty() {
            return Ok(self.collections_in_si());
        }
        for name in requested {
            match self.collections.get(name) {
                Some(c) if c.in_si => {}
                _ => return Err(ConfigError::UnknownCollection(name.clone())),
            }
        }
        Ok(requested.to_vec())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
