//! Alignment settings, with defaults that suit typical chat answers.
//!
//! We look for a sourcemark.toml in the working directory, and if present load settings from
//! there. This provides the skip-step bound and the set of verbatim element tags.

use crate::error::{Error, Result};
use facet::Facet;
use std::fs;
use std::path::Path;

/// File consulted by [`AlignConfig::load`].
pub const CONFIG_FILE: &str = "sourcemark.toml";

/// Skip steps allowed per visible character before alignment gives up.
pub const DEFAULT_MAX_SKIP_STEPS: usize = 2000;

#[derive(Facet, Clone, Debug, PartialEq, Eq)]
/// Tunables for one alignment pass.
pub struct AlignConfig {
    #[facet(default = 2000)]
    /// Upper bound on formatting-noise skips while placing a single visible character.
    pub max_skip_steps: usize,
    #[facet(default = vec!["code".to_string(), "pre".to_string()])]
    /// Elements whose text is consumed without being split into spans.
    pub verbatim_tags: Vec<String>,
}

impl Default for AlignConfig {
    fn default() -> Self {
        Self {
            max_skip_steps: DEFAULT_MAX_SKIP_STEPS,
            verbatim_tags: vec!["code".to_string(), "pre".to_string()],
        }
    }
}

impl AlignConfig {
    #[must_use]
    /// Load configuration from sourcemark.toml if present and valid, else use the defaults.
    pub fn load() -> Self {
        if Path::new(CONFIG_FILE).exists() {
            match Self::load_from(CONFIG_FILE) {
                Ok(config) => return config,
                Err(e) => tracing::warn!(error = %e, "ignoring unusable {CONFIG_FILE}"),
            }
        }
        Self::default()
    }

    /// Load configuration from a specific TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid configuration.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        facet_toml::from_str::<Self>(&contents).map_err(|e| Error::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    #[must_use]
    /// Whether text under `tag` is verbatim.
    pub fn is_verbatim(&self, tag: &str) -> bool {
        self.verbatim_tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }
}

#[cfg(test)]
#[path = "tests/config.rs"]
mod tests;
