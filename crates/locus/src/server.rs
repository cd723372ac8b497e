//! Automation server boundary
//!
//! The engine only needs two coarse primitives from a device backend (a
//! native locator query and a full hierarchy dump) plus a handful of element
//! accessors for populating results from a handle.

use crate::element::{Bounds, ElementHandle};
use crate::errors::AutomationError;
use std::collections::VecDeque;
use std::path::Path;
use std::sync::Mutex;
use tracing::debug;

/// Blocking client for a device's automation server.
///
/// Implementations must be shareable across threads; one resolution call
/// keeps at most one request in flight.
pub trait AutomationServer: Send + Sync {
    /// Native locator query. Not-found and transport failures are both errors.
    fn find_element(&self, strategy: &str, value: &str) -> Result<ElementHandle, AutomationError>;

    /// Full current hierarchy dump in the platform's native markup.
    fn source(&self) -> Result<String, AutomationError>;

    fn element_text(&self, handle: &ElementHandle) -> Result<String, AutomationError>;

    fn element_bounds(&self, handle: &ElementHandle) -> Result<Bounds, AutomationError>;

    fn element_displayed(&self, handle: &ElementHandle) -> Result<bool, AutomationError>;

    fn element_enabled(&self, handle: &ElementHandle) -> Result<bool, AutomationError>;

    /// Whether `find_element` can ever succeed. Backends without native
    /// locators have every selector resolved against `source()`.
    fn supports_locators(&self) -> bool {
        true
    }
}

/// Offline server replaying recorded hierarchy dumps.
///
/// Each `source()` call returns the next queued dump; once the queue is down
/// to its last entry that dump is returned forever. Locator queries always
/// fail, so every lookup goes through snapshot matching.
#[derive(Debug)]
pub struct SnapshotServer {
    dumps: Mutex<VecDeque<String>>,
}

impl SnapshotServer {
    pub fn new<I, S>(dumps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            dumps: Mutex::new(dumps.into_iter().map(Into::into).collect()),
        }
    }

    /// Server that always returns `dump`.
    pub fn single(dump: impl Into<String>) -> Self {
        Self::new([dump.into()])
    }

    /// Load a single dump from disk.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, AutomationError> {
        let path = path.as_ref();
        let dump = std::fs::read_to_string(path).map_err(|e| {
            AutomationError::Server(format!("Failed to read {}: {e}", path.display()))
        })?;
        Ok(Self::single(dump))
    }

    fn no_handles(handle: &ElementHandle) -> AutomationError {
        AutomationError::Server(format!(
            "Replayed hierarchy has no live element '{}'",
            handle.id()
        ))
    }
}

impl AutomationServer for SnapshotServer {
    fn find_element(&self, strategy: &str, value: &str) -> Result<ElementHandle, AutomationError> {
        debug!(strategy, value, "locator query unsupported by replay server");
        Err(AutomationError::Server(format!(
            "No element for {strategy} '{value}' (replay server has no locator support)"
        )))
    }

    fn source(&self) -> Result<String, AutomationError> {
        let mut dumps = self
            .dumps
            .lock()
            .map_err(|e| AutomationError::Server(format!("Replay queue poisoned: {e}")))?;
        let dump = if dumps.len() > 1 {
            dumps.pop_front()
        } else {
            dumps.front().cloned()
        };
        dump.ok_or_else(|| AutomationError::Server("No recorded hierarchy dumps".to_string()))
    }

    fn element_text(&self, handle: &ElementHandle) -> Result<String, AutomationError> {
        Err(Self::no_handles(handle))
    }

    fn element_bounds(&self, handle: &ElementHandle) -> Result<Bounds, AutomationError> {
        Err(Self::no_handles(handle))
    }

    fn element_displayed(&self, handle: &ElementHandle) -> Result<bool, AutomationError> {
        Err(Self::no_handles(handle))
    }

    fn element_enabled(&self, handle: &ElementHandle) -> Result<bool, AutomationError> {
        Err(Self::no_handles(handle))
    }

    fn supports_locators(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replays_in_order_then_repeats_last() {
        let server = SnapshotServer::new(["one", "two"]);
        assert_eq!(server.source().unwrap(), "one");
        assert_eq!(server.source().unwrap(), "two");
        assert_eq!(server.source().unwrap(), "two");
    }

    #[test]
    fn test_empty_queue_is_server_error() {
        let server = SnapshotServer::new(Vec::<String>::new());
        assert!(matches!(server.source(), Err(AutomationError::Server(_))));
    }

    #[test]
    fn test_find_element_never_succeeds() {
        let server = SnapshotServer::single("<hierarchy/>");
        assert!(server.find_element("class name", "x").is_err());
        assert!(!server.supports_locators());
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(&mut file, b"<hierarchy/>").unwrap();
        let server = SnapshotServer::from_file(file.path()).unwrap();
        assert_eq!(server.source().unwrap(), "<hierarchy/>");
    }
}
