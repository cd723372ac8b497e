//! Selector resolution for mobile UI test automation
//!
//! Resolves declarative element selectors (text, id, size, state flags and
//! relative-position constraints) against a device's live UI hierarchy within
//! a bounded time, using an automation server that only offers native
//! locator queries and full hierarchy dumps.

pub mod config;
pub mod element;
pub mod errors;
pub mod filters;
pub mod hierarchy;
pub mod locator;
pub mod matcher;
pub mod ranking;
pub mod resolver;
pub mod selector;
pub mod server;
pub mod strategies;
#[cfg(test)]
mod tests;
pub mod text_pattern;
pub mod tree_formatter;

pub use config::ResolverConfig;
pub use element::{Bounds, ElementHandle, ElementInfo, ParsedElement};
pub use errors::{AttemptError, AutomationError};
pub use hierarchy::{Platform, Snapshot};
pub use locator::Locator;
pub use resolver::{find_candidates, resolve_in_snapshot, Resolver};
pub use selector::{Relation, Selector, SelectorShape};
pub use server::{AutomationServer, SnapshotServer};
pub use strategies::{build_strategies, LocatorStrategy};
pub use tree_formatter::format_snapshot_as_compact_yaml;
