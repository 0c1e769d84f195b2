use serde::{Deserialize, Serialize};
use tsify::Tsify;

use crate::error::ConfigError;
use crate::evaluator::DEFAULT_ENDPOINT;
use crate::region::RegionParameter;

/// Client settings. Every field is optional in serialized form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Tsify)]
#[serde(rename_all = "camelCase", default)]
pub struct ClientConfig {
    /// Evaluator URL (absolute, or a path on the page's origin)
    pub endpoint: String,
    /// The enumerated X choices, in display order
    pub x_values: Vec<f64>,
    /// Initial R field contents
    pub default_r: f64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            x_values: vec![-4., -3., -2., -1., 0., 1., 2., 3., 4.],
            default_r: RegionParameter::DEFAULT.value(),
        }
    }
}

impl ClientConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: ClientConfig = serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if RegionParameter::new(self.default_r).is_none() {
            return Err(ConfigError::DefaultR(self.default_r));
        }
        if self.x_values.is_empty() {
            return Err(ConfigError::NoXValues);
        }
        if let Some(bad) = self.x_values.iter().find(|v| !v.is_finite()) {
            return Err(ConfigError::XValue(*bad));
        }
        Ok(())
    }
}
