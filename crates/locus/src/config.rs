//! Resolver configuration: timeout tiers and recursion bounds

use crate::errors::AutomationError;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_REQUIRED_TIMEOUT_MS: u64 = 17_000;
pub const DEFAULT_OPTIONAL_TIMEOUT_MS: u64 = 7_000;
pub const DEFAULT_QUICK_TIMEOUT_MS: u64 = 1_000;
pub const DEFAULT_MAX_NESTING_DEPTH: usize = 16;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Timeout for lookups of elements a step requires
    pub required_timeout_ms: u64,
    /// Timeout for lookups flagged optional
    pub optional_timeout_ms: u64,
    /// Single-shot timeout for negative assertions and caller-driven polling
    pub quick_timeout_ms: u64,
    /// Deepest allowed anchor-of-anchor nesting
    pub max_nesting_depth: usize,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            required_timeout_ms: DEFAULT_REQUIRED_TIMEOUT_MS,
            optional_timeout_ms: DEFAULT_OPTIONAL_TIMEOUT_MS,
            quick_timeout_ms: DEFAULT_QUICK_TIMEOUT_MS,
            max_nesting_depth: DEFAULT_MAX_NESTING_DEPTH,
        }
    }
}

impl ResolverConfig {
    /// Defaults overlaid with `LOCUS_*` environment variables.
    pub fn from_env() -> Result<Self, AutomationError> {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// Load from a JSON or YAML file, chosen by extension.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, AutomationError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            AutomationError::Config(format!("Failed to read {}: {e}", path.display()))
        })?;
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("json") => serde_json::from_str(&raw)
                .map_err(|e| AutomationError::Config(format!("{}: {e}", path.display()))),
            Some("yaml") | Some("yml") => serde_yaml::from_str(&raw)
                .map_err(|e| AutomationError::Config(format!("{}: {e}", path.display()))),
            _ => Err(AutomationError::Config(format!(
                "Unsupported config format for {} (expected .json, .yaml or .yml)",
                path.display()
            ))),
        }
    }

    fn with_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, AutomationError> {
        if let Some(v) = parse_var(&lookup, "LOCUS_REQUIRED_TIMEOUT_MS")? {
            self.required_timeout_ms = v;
        }
        if let Some(v) = parse_var(&lookup, "LOCUS_OPTIONAL_TIMEOUT_MS")? {
            self.optional_timeout_ms = v;
        }
        if let Some(v) = parse_var(&lookup, "LOCUS_QUICK_TIMEOUT_MS")? {
            self.quick_timeout_ms = v;
        }
        if let Some(v) = parse_var(&lookup, "LOCUS_MAX_NESTING_DEPTH")? {
            self.max_nesting_depth = v;
        }
        Ok(self)
    }

    /// Effective timeout in milliseconds. A positive `timeout_ms` always wins.
    pub fn effective_timeout_ms(&self, optional: bool, timeout_ms: u64) -> u64 {
        if timeout_ms > 0 {
            timeout_ms
        } else if optional {
            self.optional_timeout_ms
        } else {
            self.required_timeout_ms
        }
    }

    pub fn quick_timeout_ms(&self, timeout_ms: u64) -> u64 {
        if timeout_ms > 0 {
            timeout_ms
        } else {
            self.quick_timeout_ms
        }
    }
}

fn parse_var<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Result<Option<T>, AutomationError> {
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw.trim().parse::<T>().map(Some).map_err(|_| {
            AutomationError::Config(format!("{key} must be a non-negative integer, got '{raw}'"))
        }),
    }
}
