//! Configuration resolution across call-site, environment, preset and
//! built-in default tiers.

use std::collections::HashMap;

use tracing::debug;

use crate::config::{LogConfig, LogOverrides, Preset};
use crate::level::Level;

pub const ENV_PRESET: &str = "LOG_PRESET";
pub const ENV_LEVEL: &str = "LOG_LEVEL";
pub const ENV_CONSOLE: &str = "LOG_CONSOLE";
pub const ENV_FILE: &str = "LOG_FILE";
pub const ENV_PERFORMANCE: &str = "LOG_PERFORMANCE";
pub const ENV_ELEMENT_SUCCESS: &str = "LOG_ELEMENT_SUCCESS";

type Lookup = Box<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Where environment-derived signals come from
pub struct EnvSource {
    lookup: Lookup,
}

impl EnvSource {
    /// Read signals from the process environment
    pub fn process() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        Self {
            lookup: Box::new(lookup),
        }
    }

    /// Fixed set of variables, for tests and embedding
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let vars: HashMap<String, String> = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self::from_lookup(move |key| vars.get(key).cloned())
    }

    /// No signals at all
    pub fn empty() -> Self {
        Self::from_lookup(|_| None)
    }

    fn get(&self, key: &str) -> Option<String> {
        (self.lookup)(key)
    }

    /// Preset name signal, if present
    pub fn preset(&self) -> Option<String> {
        self.get(ENV_PRESET)
    }

    /// Individual field overrides. Each one is set only when its signal is
    /// present; malformed levels are dropped.
    pub fn overrides(&self) -> LogOverrides {
        let level = self.get(ENV_LEVEL).and_then(|raw| match raw.parse::<Level>() {
            Ok(level) => Some(level),
            Err(e) => {
                debug!("Ignoring {}: {}", ENV_LEVEL, e);
                None
            }
        });

        LogOverrides {
            preset: None,
            level,
            console: self.flag(ENV_CONSOLE),
            file: self.flag(ENV_FILE),
            performance: self.flag(ENV_PERFORMANCE),
            element_success: self.flag(ENV_ELEMENT_SUCCESS),
        }
    }

    fn flag(&self, key: &str) -> Option<bool> {
        self.get(key).map(|v| v.trim().eq_ignore_ascii_case("true"))
    }
}

impl std::fmt::Debug for EnvSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnvSource").finish_non_exhaustive()
    }
}

/// Merges the configuration tiers into one effective [`LogConfig`]
#[derive(Debug)]
pub struct Resolver {
    env: EnvSource,
    default: LogConfig,
}

impl Resolver {
    pub fn new(env: EnvSource) -> Self {
        Self {
            env,
            default: LogConfig::default(),
        }
    }

    /// Resolver over the process environment
    pub fn from_env() -> Self {
        Self::new(EnvSource::process())
    }

    /// Replace the built-in default tier
    pub fn with_default(mut self, default: LogConfig) -> Self {
        self.default = default;
        self
    }

    /// Resolve the effective configuration.
    ///
    /// A recognized preset (call-site name first, then the environment's)
    /// is returned as is. Otherwise environment overrides are applied, the
    /// call-site overrides are layered on top, and anything still unset
    /// comes from the default.
    pub fn resolve(&self, explicit: &LogOverrides) -> LogConfig {
        if let Some(preset) = self.recognized_preset(explicit) {
            debug!("Using log preset '{}'", preset);
            return preset.config();
        }

        let layered = self.env.overrides().layered(explicit);
        self.default.merge(&layered)
    }

    fn recognized_preset(&self, explicit: &LogOverrides) -> Option<Preset> {
        let candidates = [explicit.preset.clone(), self.env.preset()];
        candidates.into_iter().flatten().find_map(|name| {
            let preset = Preset::from_name(&name);
            if preset.is_none() {
                debug!("Ignoring unknown log preset '{}'", name);
            }
            preset
        })
    }
}

impl Default for Resolver {
    fn default() -> Self {
        Self::from_env()
    }
}
