//! Server configuration.

use serde::{Deserialize, Serialize};

use bondstress_scenario::ScenarioConfig;

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,

    /// Curve points loaded at startup
    pub curves_file: Option<String>,

    /// Securities loaded at startup
    pub securities_file: Option<String>,

    /// Portfolio lots loaded at startup
    pub positions_file: Option<String>,

    /// Stress scenarios loaded at startup
    pub scenarios_file: Option<String>,

    /// Scenario engine settings
    #[serde(default)]
    pub scenario: ScenarioConfig,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            curves_file: None,
            securities_file: None,
            positions_file: None,
            scenarios_file: None,
            scenario: ScenarioConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &str) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, std::io::Error> {
        toml::from_str(content)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    }
}
