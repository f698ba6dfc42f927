//! TOML configuration for spotlight.
//!
//! Every section is optional and falls back to compiled-in defaults. The file
//! is looked up through `SPOTLIGHT_CONFIG`, then the standard system path.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::queue::DEFAULT_CAPACITY;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "SPOTLIGHT_CONFIG";

/// System-wide config location.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/spotlight/spotlight.toml";

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpotlightConfig {
    #[serde(default)]
    pub orchestrator: OrchestratorConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl SpotlightConfig {
    /// Load and validate the TOML file at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("failed to parse config file: {}", path.display()))?;
        config
            .validate()
            .with_context(|| format!("invalid config file: {}", path.display()))?;
        Ok(config)
    }

    /// Look up the effective configuration: `$SPOTLIGHT_CONFIG`, then the
    /// system path, then compiled-in defaults.
    ///
    /// Nothing is logged here because this runs before the subscriber that
    /// the result configures. Call [`ResolvedConfig::log`] once it is up.
    pub fn resolve() -> ResolvedConfig {
        let env_path = std::env::var_os(CONFIG_ENV).map(PathBuf::from);
        Self::resolve_from(env_path.as_deref(), Path::new(SYSTEM_CONFIG_PATH))
    }

    /// [`resolve`](Self::resolve) with explicit candidate paths.
    ///
    /// `env_path` is tried even if missing, since naming it was deliberate.
    /// `system_path` is only tried if it exists.
    pub fn resolve_from(env_path: Option<&Path>, system_path: &Path) -> ResolvedConfig {
        let mut skipped = Vec::new();

        let candidates = env_path
            .map(|p| (p, ConfigSource::Env(p.to_path_buf())))
            .into_iter()
            .chain(
                system_path
                    .exists()
                    .then(|| (system_path, ConfigSource::System(system_path.to_path_buf()))),
            );

        for (path, source) in candidates {
            match Self::load(path) {
                Ok(config) => {
                    return ResolvedConfig {
                        config,
                        source,
                        skipped,
                    }
                }
                Err(error) => skipped.push(SkippedConfig { source, error }),
            }
        }

        ResolvedConfig {
            config: Self::default(),
            source: ConfigSource::Defaults,
            skipped,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.orchestrator.capacity == 0 {
            anyhow::bail!("orchestrator.capacity must be at least 1");
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

/// Where the effective configuration came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Given with `--config`.
    Explicit(PathBuf),
    /// Named by `$SPOTLIGHT_CONFIG`.
    Env(PathBuf),
    System(PathBuf),
    Defaults,
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigSource::Explicit(p) => write!(f, "--config {}", p.display()),
            ConfigSource::Env(p) => write!(f, "{} ({})", CONFIG_ENV, p.display()),
            ConfigSource::System(p) => write!(f, "system config ({})", p.display()),
            ConfigSource::Defaults => f.write_str("compiled-in defaults"),
        }
    }
}

/// A candidate file that was tried and rejected.
#[derive(Debug)]
pub struct SkippedConfig {
    pub source: ConfigSource,
    pub error: anyhow::Error,
}

/// Outcome of a config lookup, kept so it can be logged after tracing is
/// initialised from it.
#[derive(Debug)]
pub struct ResolvedConfig {
    pub config: SpotlightConfig,
    pub source: ConfigSource,
    pub skipped: Vec<SkippedConfig>,
}

impl ResolvedConfig {
    /// Load `path` given on the command line. No fallback.
    pub fn explicit(path: &Path) -> Result<Self> {
        Ok(Self {
            config: SpotlightConfig::load(path)?,
            source: ConfigSource::Explicit(path.to_path_buf()),
            skipped: Vec::new(),
        })
    }

    /// Report the lookup: one warning per rejected file, then the source used.
    pub fn log(&self) {
        for skipped in &self.skipped {
            let error = format!("{:#}", skipped.error);
            warn!(
                source = %skipped.source,
                error = %error,
                "config file could not be loaded, falling back"
            );
        }
        match self.source {
            ConfigSource::Defaults => debug!("no usable config file, using compiled-in defaults"),
            ref source => info!(source = %source, "loaded configuration"),
        }
    }
}

// ---------------------------------------------------------------------------
// Orchestrator
// ---------------------------------------------------------------------------

/// Queue bound and activation pacing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrchestratorConfig {
    /// Maximum number of pending items (the active item is not counted).
    pub capacity: usize,
    /// Pause between a dismissal and the next activation, so the renderer's
    /// exit transition can finish.
    pub settle_delay_ms: u64,
}

impl OrchestratorConfig {
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            settle_delay_ms: 300,
        }
    }
}

// ---------------------------------------------------------------------------
// Logging
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter used when `RUST_LOG` is unset (`trace` .. `error`, or any
    /// `EnvFilter` directive).
    pub level: String,
    /// Emit JSON lines instead of human-readable output.
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
