//! Resolution controller
//!
//! Each call picks one strategy from the selector's shape and then polls:
//! one attempt, record the outcome, check the deadline, repeat. Attempts have
//! no delay between them; the server round trip paces the loop.
//!
//! Everything that decides *which* element matches is in the pure functions
//! [`find_candidates`] and [`resolve_in_snapshot`], which work on one
//! immutable [`Snapshot`] and never touch the server.

use crate::config::ResolverConfig;
use crate::element::{ElementHandle, ElementInfo, ParsedElement};
use crate::errors::{AttemptError, AutomationError};
use crate::filters::{filter_contains_descendants, filter_relative};
use crate::hierarchy::{Platform, Snapshot};
use crate::matcher::matches;
use crate::ranking;
use crate::selector::{Selector, SelectorShape};
use crate::server::AutomationServer;
use crate::strategies::{build_strategies, LocatorStrategy};
use crate::tree_formatter::format_snapshot_as_compact_yaml;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, instrument, trace, Level};

/// Resolves selectors against one device's automation server.
#[derive(Clone)]
pub struct Resolver {
    server: Arc<dyn AutomationServer>,
    platform: Platform,
    config: ResolverConfig,
}

impl Resolver {
    pub fn new(server: Arc<dyn AutomationServer>, platform: Platform) -> Self {
        Self {
            server,
            platform,
            config: ResolverConfig::default(),
        }
    }

    pub fn with_config(mut self, config: ResolverConfig) -> Self {
        self.config = config;
        self
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Resolve `selector`, polling until it matches or the timeout elapses.
    ///
    /// A `timeout_ms` of 0 picks the optional or required default depending
    /// on `optional`. The returned [`ElementInfo`] carries a native handle
    /// only when a locator query found the element.
    #[instrument(level = "debug", skip(self, selector), fields(selector = %selector))]
    pub fn resolve(
        &self,
        selector: &Selector,
        optional: bool,
        timeout_ms: u64,
    ) -> Result<ElementInfo, AutomationError> {
        let timeout_ms = self.config.effective_timeout_ms(optional, timeout_ms);
        self.poll(selector, timeout_ms)
    }

    /// Resolve with the quick timeout tier (used for negative assertions and
    /// callers running their own retry loop). A `timeout_ms` of 0 means the
    /// configured quick default.
    #[instrument(level = "debug", skip(self, selector), fields(selector = %selector))]
    pub fn find_element_quick(
        &self,
        selector: &Selector,
        timeout_ms: u64,
    ) -> Result<ElementInfo, AutomationError> {
        let timeout_ms = self.config.quick_timeout_ms(timeout_ms);
        self.poll(selector, timeout_ms)
    }

    fn validate(&self, selector: &Selector) -> Result<(), AutomationError> {
        if selector.is_empty() {
            return Err(AutomationError::InvalidSelector(
                "No selector predicate specified".to_string(),
            ));
        }
        let depth = selector.nesting_depth();
        if depth > self.config.max_nesting_depth {
            return Err(AutomationError::InvalidSelector(format!(
                "Selector nests {depth} levels deep, limit is {}",
                self.config.max_nesting_depth
            )));
        }
        Ok(())
    }

    fn poll(&self, selector: &Selector, timeout_ms: u64) -> Result<ElementInfo, AutomationError> {
        self.validate(selector)?;

        let shape = selector.shape();
        let locators = self.server.supports_locators();
        let strategies = match shape {
            SelectorShape::Direct if locators => build_strategies(selector, self.platform),
            _ => Vec::new(),
        };
        debug!(?shape, locators, timeout_ms, strategies = strategies.len(), "resolving");

        let deadline = Instant::now() + Duration::from_millis(timeout_ms);
        let mut last_error: Option<AttemptError> = None;
        let mut attempt = 0u32;

        loop {
            attempt += 1;
            let outcome = match shape {
                SelectorShape::Relative => self.resolve_relative(selector),
                SelectorShape::Size => self.resolve_by_snapshot(selector),
                SelectorShape::Direct if locators => self.resolve_direct(selector, &strategies),
                SelectorShape::Direct => self.resolve_by_snapshot(selector),
            };

            match outcome {
                Ok(info) => {
                    debug!(attempt, bounds = %info.bounds, "resolved");
                    return Ok(info);
                }
                Err(err) if !err.is_retryable() => {
                    return Err(err.into_automation_error(&selector.to_string(), timeout_ms));
                }
                Err(err) => {
                    debug!(attempt, error = %err, "attempt failed");
                    if err.is_distinguishing() {
                        last_error = Some(err);
                    }
                }
            }

            if Instant::now() >= deadline {
                break;
            }
        }

        debug!(attempts = attempt, "deadline reached");
        Err(last_error
            .unwrap_or(AttemptError::NoMatch)
            .into_automation_error(&selector.to_string(), timeout_ms))
    }

    fn fetch_snapshot(&self) -> Result<Snapshot, AttemptError> {
        let raw = self.server.source()?;
        let snapshot = Snapshot::parse(self.platform, &raw)?;
        if tracing::enabled!(Level::TRACE) {
            trace!(
                elements = snapshot.len(),
                "snapshot:\n{}",
                format_snapshot_as_compact_yaml(&snapshot)
            );
        }
        Ok(snapshot)
    }

    fn resolve_relative(&self, selector: &Selector) -> Result<ElementInfo, AttemptError> {
        let snapshot = self.fetch_snapshot()?;
        resolve_in_snapshot(&snapshot, selector, self.config.max_nesting_depth)
            .map(ElementInfo::from)
    }

    /// Match the selector's own predicates against a fresh snapshot.
    fn resolve_by_snapshot(&self, selector: &Selector) -> Result<ElementInfo, AttemptError> {
        let snapshot = self.fetch_snapshot()?;
        let candidates: Vec<&ParsedElement> = snapshot
            .elements()
            .iter()
            .filter(|e| matches(e, selector))
            .collect();
        ranking::select(&candidates, selector.index.as_deref())
            .map(ElementInfo::from)
            .ok_or(AttemptError::NoMatch)
    }

    fn resolve_direct(
        &self,
        selector: &Selector,
        strategies: &[LocatorStrategy],
    ) -> Result<ElementInfo, AttemptError> {
        for strategy in strategies {
            let handle = match self.server.find_element(&strategy.strategy, &strategy.value) {
                Ok(handle) => handle,
                Err(e) => {
                    debug!(%strategy, error = %e, "locator query failed");
                    continue;
                }
            };
            debug!(%strategy, handle = handle.id(), "locator matched");
            match self.info_from_handle(handle) {
                Ok(info) => return Ok(info),
                Err(e) => debug!(%strategy, error = %e, "element accessors failed"),
            }
        }

        // Placeholder/hint text is not visible to native text queries
        if selector.text_value().is_some() {
            debug!("locator queries exhausted, falling back to snapshot match");
            return self.resolve_by_snapshot(selector);
        }
        Err(AttemptError::NoMatch)
    }

    fn info_from_handle(&self, handle: ElementHandle) -> Result<ElementInfo, AttemptError> {
        Ok(ElementInfo {
            text: self.server.element_text(&handle)?,
            bounds: self.server.element_bounds(&handle)?,
            enabled: self.server.element_enabled(&handle)?,
            visible: self.server.element_displayed(&handle)?,
            handle: Some(handle),
        })
    }
}

/// Resolve `selector` against one snapshot and pick a single element.
pub fn resolve_in_snapshot<'a>(
    snapshot: &'a Snapshot,
    selector: &Selector,
    max_depth: usize,
) -> Result<&'a ParsedElement, AttemptError> {
    let candidates = find_candidates(snapshot, selector, 0, max_depth)?;
    ranking::select(&candidates, selector.index.as_deref()).ok_or(AttemptError::NoMatch)
}

/// Every element satisfying `selector`, relation and descendants included.
///
/// Relative selectors return candidates in distance order from the first
/// anchor that produced any; anchors nested inside anchors resolve against
/// the same snapshot. An empty result is reported as an error that says
/// which stage came up empty.
pub fn find_candidates<'a>(
    snapshot: &'a Snapshot,
    selector: &Selector,
    depth: usize,
    max_depth: usize,
) -> Result<Vec<&'a ParsedElement>, AttemptError> {
    if depth > max_depth {
        return Err(AttemptError::Invalid(format!(
            "Selector nesting exceeds {max_depth} levels"
        )));
    }

    let own: Vec<&ParsedElement> = snapshot
        .elements()
        .iter()
        .filter(|e| matches(e, selector))
        .collect();

    let mut candidates = match selector.relation() {
        None => own,
        Some((relation, anchor_selector)) => {
            let anchors = match find_candidates(snapshot, anchor_selector, depth + 1, max_depth) {
                Ok(anchors) => anchors,
                Err(AttemptError::NoMatch | AttemptError::NoCandidates { .. }) => {
                    return Err(AttemptError::AnchorMissing {
                        anchor: anchor_selector.to_string(),
                    })
                }
                Err(other) => return Err(other),
            };
            trace!(%relation, anchors = anchors.len(), "anchors matched");

            let found = anchors.iter().find_map(|anchor| {
                let pool: Vec<&ParsedElement> = own
                    .iter()
                    .copied()
                    .filter(|c| c.index != anchor.index)
                    .collect();
                let kept = filter_relative(relation, &pool, anchor);
                (!kept.is_empty()).then_some(kept)
            });
            found.ok_or_else(|| AttemptError::NoCandidates {
                relation: relation.phrase().to_string(),
                anchor: anchor_selector.to_string(),
            })?
        }
    };

    if !selector.contains_descendants.is_empty() {
        let mut descendant_sets = Vec::with_capacity(selector.contains_descendants.len());
        for descendant in &selector.contains_descendants {
            let set = match find_candidates(snapshot, descendant, depth + 1, max_depth) {
                Ok(set) => set,
                Err(err) if err.is_retryable() => Vec::new(),
                Err(err) => return Err(err),
            };
            descendant_sets.push(set);
        }
        candidates = filter_contains_descendants(&candidates, &descendant_sets);
    }

    if candidates.is_empty() {
        Err(AttemptError::NoMatch)
    } else {
        Ok(candidates)
    }
}
