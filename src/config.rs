//! Policy template configuration.
//!
//! The template holds every fixed part of the generated policy. It is loaded
//! once and passed by reference into [`crate::output::build_policy`].

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::path::Path;

/// Environment variable naming a template file, also read from `.env`.
pub const TEMPLATE_ENV: &str = "CAMPUS_POLICY_TEMPLATE";

/// Fixed parts of the access policy. Missing fields in a template file keep
/// their default values.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct PolicyTemplate {
    pub version: String,
    pub id: String,
    pub statement: StatementTemplate,
}

/// Fields copied into every per-campus statement.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct StatementTemplate {
    pub sid: String,
    pub effect: String,
    pub principal: String,
    pub action: String,
    pub resource: String,
    /// Condition key compared against the campus name.
    pub tag_key: String,
    /// Condition key holding the campus CIDR blocks.
    pub source_ip_key: String,
}

impl Default for PolicyTemplate {
    fn default() -> Self {
        PolicyTemplate {
            version: "2012-10-17".to_string(),
            id: "RestrictToUCbyTag".to_string(),
            statement: StatementTemplate::default(),
        }
    }
}

impl Default for StatementTemplate {
    fn default() -> Self {
        StatementTemplate {
            sid: "IPAllow".to_string(),
            effect: "Allow".to_string(),
            principal: "*".to_string(),
            action: "s3:GetObject".to_string(),
            resource: "arn:aws:s3:::ucldc-export/ip_restrict/*".to_string(),
            tag_key: "s3:ExistingObjectTag/campus".to_string(),
            source_ip_key: "aws:SourceIp".to_string(),
        }
    }
}

impl PolicyTemplate {
    /// Load a template from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<PolicyTemplate, Box<dyn Error>> {
        let path = path.as_ref();
        log::info!("Using policy template file: {}", path.display());
        let json = std::fs::read_to_string(path)
            .map_err(|e| format!("Error reading template file {}: {e}", path.display()))?;
        PolicyTemplate::from_json(&json)
            .map_err(|e| format!("Error in template file {}: {e}", path.display()).into())
    }

    /// Parse a template from JSON text, reporting the path of a bad field.
    pub fn from_json(json: &str) -> Result<PolicyTemplate, Box<dyn Error>> {
        let mut deserializer = serde_json::Deserializer::from_str(json);
        let template: PolicyTemplate = serde_path_to_error::deserialize(&mut deserializer)
            .map_err(|e| format!("Error parsing template JSON at '{}': {}", e.path(), e.inner()))?;
        Ok(template)
    }

    /// Load from `path` if given, otherwise use the defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<PolicyTemplate, Box<dyn Error>> {
        match path {
            Some(path) => PolicyTemplate::load(path),
            None => {
                log::info!("Using built-in policy template");
                Ok(PolicyTemplate::default())
            }
        }
    }
}
