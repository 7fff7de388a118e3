//! Command-line configuration management.
//!
//! Consolidates environment variable reads; command-line flags take priority.

use std::path::PathBuf;

use rand::SeedableRng;
use rand::rngs::StdRng;

/// Settings shared by every subcommand
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliConfig {
    /// Seed for the random source (fresh OS entropy when unset)
    pub seed: Option<u64>,
    /// Pretty-print JSON output
    pub pretty: bool,
    /// Output file (stdout when unset)
    pub output: Option<PathBuf>,
}

impl CliConfig {
    /// Load configuration from environment variables
    ///
    /// # Arguments
    ///
    /// * `seed_override` - Seed from `--seed`
    /// * `pretty_override` - `--pretty` was passed
    /// * `output_override` - Path from `--out`
    ///
    /// # Errors
    ///
    /// Returns error if `LF_SEED` is set but is not an unsigned integer
    pub fn from_env(
        seed_override: Option<u64>,
        pretty_override: bool,
        output_override: Option<PathBuf>,
    ) -> Result<Self, ConfigError> {
        let seed = match seed_override {
            Some(seed) => Some(seed),
            None => match std::env::var("LF_SEED") {
                Ok(raw) if !raw.trim().is_empty() => {
                    Some(raw.trim().parse().map_err(|_| ConfigError::Invalid {
                        var: "LF_SEED".to_string(),
                        reason: format!("Expected an unsigned integer, got '{raw}'"),
                    })?)
                }
                _ => None,
            },
        };

        let pretty = pretty_override || parse_env_or("LF_PRETTY", false);

        let output = output_override.or_else(|| {
            std::env::var("LF_OUTPUT")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from)
        });

        Ok(CliConfig {
            seed,
            pretty,
            output,
        })
    }

    /// Random source for generation
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        }
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required option: {var}\nHint: {hint}")]
    MissingRequired { var: String, hint: String },

    #[error("Invalid configuration for {var}: {reason}")]
    Invalid { var: String, reason: String },
}

/// Helper to parse environment variable with default fallback
fn parse_env_or<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
