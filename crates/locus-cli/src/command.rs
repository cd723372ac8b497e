use crate::cli::{DumpArgs, ResolveArgs};
use crate::utils::read_structured;
use anyhow::{Context, Result};
use locus::{
    format_snapshot_as_compact_yaml, ElementInfo, Platform, Resolver, ResolverConfig, Selector,
    Snapshot, SnapshotServer,
};
use std::sync::Arc;
use tracing::{debug, info};

pub fn handle_resolve_command(args: ResolveArgs) -> Result<()> {
    let selector = load_selector(&args)?;
    let config = match &args.config {
        Some(path) => ResolverConfig::from_file(path)?,
        None => ResolverConfig::from_env()?,
    };
    debug!(?config, "resolver config");

    let server = SnapshotServer::from_file(&args.source.hierarchy)?;
    let platform: Platform = args.source.platform.into();
    let resolver = Resolver::new(Arc::new(server), platform).with_config(config);

    info!("Resolving {selector} on {platform}");
    let element = if args.quick {
        resolver.find_element_quick(&selector, args.timeout_ms)?
    } else {
        resolver.resolve(&selector, args.optional, args.timeout_ms)?
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&element)?);
    } else {
        print_element(&element);
    }
    Ok(())
}

pub fn handle_dump_command(args: DumpArgs) -> Result<()> {
    let path = &args.source.hierarchy;
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let snapshot = Snapshot::parse(args.source.platform.into(), &raw)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    info!("Parsed {} elements", snapshot.len());

    if args.json {
        println!("{}", serde_json::to_string_pretty(snapshot.elements())?);
    } else {
        print!("{}", format_snapshot_as_compact_yaml(&snapshot));
    }
    Ok(())
}

fn load_selector(args: &ResolveArgs) -> Result<Selector> {
    if let Some(path) = &args.selector_file {
        return read_structured(path);
    }
    let compact = args.selector.as_deref().unwrap_or_default();
    compact
        .parse()
        .with_context(|| format!("Could not parse selector \"{compact}\""))
}

fn print_element(element: &ElementInfo) {
    let b = element.bounds;
    let (cx, cy) = b.center();
    println!("text:    {}", element.text);
    println!("bounds:  {b} (center {cx},{cy})");
    println!("enabled: {}", element.enabled);
    println!("visible: {}", element.visible);
    if let Some(handle) = &element.handle {
        println!("handle:  {}", handle.id());
    }
}
