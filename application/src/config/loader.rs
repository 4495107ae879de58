//! Configuration file loader with multi-source merging

use super::VerifierConfig;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use vigil_domain::{ConsensusConfig, ExecutionParams, SovereigntyPolicy};

/// Serde-friendly mirror of [`ExecutionParams`] for TOML files.
///
/// The timeout is expressed in milliseconds rather than serde's
/// `{secs, nanos}` encoding of `Duration`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ExecutionSection {
    pub max_attempts: usize,
    pub verification_timeout_ms: u64,
    pub verification_enabled: bool,
}

impl Default for ExecutionSection {
    fn default() -> Self {
        let params = ExecutionParams::default();
        Self {
            max_attempts: params.max_attempts,
            verification_timeout_ms: params.verification_timeout.as_millis() as u64,
            verification_enabled: params.verification_enabled,
        }
    }
}

impl From<ExecutionSection> for ExecutionParams {
    fn from(section: ExecutionSection) -> Self {
        ExecutionParams::default()
            .with_max_attempts(section.max_attempts)
            .with_verification_timeout(Duration::from_millis(section.verification_timeout_ms))
            .with_verification_enabled(section.verification_enabled)
    }
}

/// On-disk configuration shape.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct FileConfig {
    pub consensus: ConsensusConfig,
    pub sovereignty: SovereigntyPolicy,
    pub execution: ExecutionSection,
}

impl From<FileConfig> for VerifierConfig {
    fn from(file: FileConfig) -> Self {
        VerifierConfig::new(file.consensus, file.sovereignty, file.execution.into())
    }
}

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources with proper priority
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables prefixed `VIGIL_` (`__` as section separator)
    /// 2. Explicit config path (if provided)
    /// 3. Project root: `./vigil.toml` or `./.vigil.toml`
    /// 4. Default values
    pub fn load(config_path: Option<&PathBuf>) -> Result<VerifierConfig, Box<figment::Error>> {
        let mut figment = Figment::new().merge(Serialized::defaults(FileConfig::default()));

        // Add project-level config files (check both names)
        for filename in &["vigil.toml", ".vigil.toml"] {
            let path = PathBuf::from(filename);
            if path.exists() {
                figment = figment.merge(Toml::file(&path));
                break;
            }
        }

        // Add explicit config path (highest priority for files)
        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        figment = figment.merge(Env::prefixed("VIGIL_").split("__"));

        let file: FileConfig = figment.extract().map_err(Box::new)?;
        Ok(file.into())
    }

    /// Load only default configuration (for environments without files)
    pub fn load_defaults() -> VerifierConfig {
        FileConfig::default().into()
    }
}
