use anyhow::{bail, Context, Result};
use std::path::Path;

/// Install the stderr subscriber; `RUST_LOG` overrides the `info` default.
pub fn init_logging() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

/// Deserialize a JSON or YAML file, picking the format from the extension.
pub fn read_structured<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("json") => serde_json::from_str(&raw)
            .with_context(|| format!("Invalid JSON in {}", path.display())),
        Some("yaml") | Some("yml") => serde_yaml::from_str(&raw)
            .with_context(|| format!("Invalid YAML in {}", path.display())),
        _ => bail!(
            "Unsupported file type for {} (expected .json, .yaml or .yml)",
            path.display()
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use locus::Selector;
    use std::io::Write;

    #[test]
    fn test_read_selector_yaml() {
        let mut file = tempfile::Builder::new().suffix(".yml").tempfile().unwrap();
        writeln!(file, "text: Login\nbelow:\n  text: Header").unwrap();
        let selector: Selector = read_structured(file.path()).unwrap();
        assert_eq!(selector.text.as_deref(), Some("Login"));
        assert!(selector.below.is_some());
    }

    #[test]
    fn test_unknown_extension() {
        let file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
        assert!(read_structured::<Selector>(file.path()).is_err());
    }
}
