//! Tizen application metadata and prompt defaults.

pub mod host;

use rand::Rng;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::OnceLock;

pub use host::{HostDefaults, read_cordova_config};

/// Length of a Tizen application id
pub const TIZEN_ID_LEN: usize = 10;

const GENERATED_ID_CHARSET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Metadata stored under the `tizen` key of `userconf.json`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationMetadata {
    /// Human-readable application name
    pub name: String,
    /// Tizen application id (10 alphanumeric characters)
    pub id: String,
    /// Application version (`major.minor.revision`)
    pub version: String,
    /// Free-text description
    pub description: String,
}

impl ApplicationMetadata {
    /// Placeholder values exposed to the templates
    pub fn template_data(&self) -> BTreeMap<&'static str, &str> {
        let mut data = BTreeMap::new();
        data.insert("name", self.name.as_str());
        data.insert("id", self.id.as_str());
        data.insert("version", self.version.as_str());
        data.insert("description", self.description.as_str());
        data
    }
}

/// Generate a default application id: 10 characters from `[0-9a-z]`.
pub fn generate_tizen_id() -> String {
    let mut rng = rand::thread_rng();
    (0..TIZEN_ID_LEN)
        .map(|_| GENERATED_ID_CHARSET[rng.gen_range(0..GENERATED_ID_CHARSET.len())] as char)
        .collect()
}

fn tizen_id_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[0-9a-zA-Z]{10}$").expect("valid id pattern"))
}

/// Prompt validator for the application id.
pub fn validate_tizen_id(input: &str) -> Result<(), String> {
    if tizen_id_regex().is_match(input) {
        Ok(())
    } else {
        Err("invalid id string for tizen platform".to_string())
    }
}
