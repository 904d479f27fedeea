use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{LayoutError, LayoutResult};

/// Settings shared by every instance driven from one root
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LayoutConfig {
    /// Attribute that carries an instance's fingerprint
    pub tag_attribute: String,
    /// Collapse whitespace in generated stylesheets
    pub minify: bool,
    /// Cancel size and mutation subscriptions when an instance is detached
    pub release_observers_on_detach: bool,
    /// Prepended to the fingerprint to form the id of an attached stylesheet
    pub style_id_prefix: String,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            tag_attribute: "data-i".to_string(),
            minify: true,
            release_observers_on_detach: true,
            style_id_prefix: String::new(),
        }
    }
}

impl LayoutConfig {
    pub fn from_yaml(yaml: &str) -> LayoutResult<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> LayoutResult<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    fn validate(&self) -> LayoutResult<()> {
        let attr = &self.tag_attribute;
        if attr.is_empty()
            || !attr
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(LayoutError::InvalidConfig(format!(
                "tagAttribute '{}' is not a valid attribute name",
                attr
            )));
        }
        Ok(())
    }
}
