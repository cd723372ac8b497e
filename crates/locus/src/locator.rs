use tracing::{debug, instrument};

use crate::element::ElementInfo;
use crate::errors::AutomationError;
use crate::resolver::Resolver;
use crate::selector::Selector;
use std::sync::Arc;
use std::time::Duration;
use tokio::task;

/// Async handle for one selector on one device
///
/// Resolution itself is a blocking poll loop, so every wait runs on tokio's
/// blocking pool and never stalls the async runtime.
#[derive(Clone)]
pub struct Locator {
    resolver: Arc<Resolver>,
    selector: Selector,
    timeout: Option<Duration>, // None uses the resolver's tier defaults
    optional: bool,
}

impl Locator {
    pub fn new(resolver: Arc<Resolver>, selector: Selector) -> Self {
        Self {
            resolver,
            selector,
            timeout: None,
            optional: false,
        }
    }

    /// Set a default timeout for waits on this locator.
    /// Used when no timeout is passed to `wait`/`first`.
    pub fn set_default_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Mark the lookup optional, which switches to the shorter timeout tier.
    pub fn optional(mut self, optional: bool) -> Self {
        self.optional = optional;
        self
    }

    pub fn selector(&self) -> &Selector {
        &self.selector
    }

    /// Wait for the element to resolve, up to `timeout` (or the locator's
    /// default when `None`).
    #[instrument(level = "debug", skip(self, timeout))]
    pub async fn wait(&self, timeout: Option<Duration>) -> Result<ElementInfo, AutomationError> {
        debug!("Waiting for element matching selector: {}", self.selector);

        let timeout_ms = timeout
            .or(self.timeout)
            .map(|t| t.as_millis().max(1) as u64)
            .unwrap_or(0);
        let resolver = self.resolver.clone();
        let selector = self.selector.clone();
        let optional = self.optional;

        task::spawn_blocking(move || resolver.resolve(&selector, optional, timeout_ms))
            .await
            .map_err(|e| AutomationError::Server(format!("Task join error: {e}")))?
    }

    pub async fn first(&self, timeout: Option<Duration>) -> Result<ElementInfo, AutomationError> {
        let element = self.wait(timeout).await?;
        Ok(element)
    }

    /// Quick-tier presence check; not-found outcomes are `Ok(false)`.
    #[instrument(level = "debug", skip(self))]
    pub async fn exists(&self) -> Result<bool, AutomationError> {
        let resolver = self.resolver.clone();
        let selector = self.selector.clone();

        let outcome = task::spawn_blocking(move || resolver.find_element_quick(&selector, 0))
            .await
            .map_err(|e| AutomationError::Server(format!("Task join error: {e}")))?;

        match outcome {
            Ok(_) => Ok(true),
            Err(
                e @ (AutomationError::ElementNotFound { .. }
                | AutomationError::AnchorNotFound { .. }
                | AutomationError::Timeout { .. }),
            ) => {
                debug!("Element absent: {e}");
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }
}
