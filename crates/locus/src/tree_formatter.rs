//! Tree formatting for hierarchy snapshots
//!
//! Renders a snapshot as a compact YAML-like listing used by trace logging
//! and the `dump` command.

use crate::element::ParsedElement;
use crate::hierarchy::Snapshot;

/// Format a snapshot as compact YAML with `#index [Class] label` lines
///
/// Output format:
/// #0 [android.widget.FrameLayout] (id: root, bounds: [0,0,1080,1920])
///   #1 [android.widget.Button] Sign in (bounds: [40,600,1000,120], clickable)
///
/// The index is the element's flat snapshot index. Children are indented two
/// spaces per depth level.
pub fn format_snapshot_as_compact_yaml(snapshot: &Snapshot) -> String {
    let mut output = String::new();
    for root in snapshot.roots() {
        format_node(snapshot, root, 0, &mut output);
    }
    output
}

fn format_node(snapshot: &Snapshot, node: &ParsedElement, indent: usize, output: &mut String) {
    output.push_str(&"  ".repeat(indent));
    output.push_str(&format!("#{} [{}]", node.index, class_label(&node.class_name)));

    if !node.text.is_empty() {
        output.push_str(&format!(" {}", node.text));
    }

    let mut context_parts = Vec::new();
    if !node.content_desc.is_empty() && node.content_desc != node.text {
        context_parts.push(format!("desc: {}", node.content_desc));
    }
    if !node.resource_id.is_empty() {
        context_parts.push(format!("id: {}", node.resource_id));
    }
    context_parts.push(format!("bounds: {}", node.bounds));

    if node.clickable {
        context_parts.push("clickable".to_string());
    }
    if !node.enabled {
        context_parts.push("disabled".to_string());
    }
    if node.focused {
        context_parts.push("focused".to_string());
    }
    if node.selected {
        context_parts.push("selected".to_string());
    }
    if !node.displayed {
        context_parts.push("hidden".to_string());
    }

    output.push_str(&format!(" ({})", context_parts.join(", ")));
    output.push('\n');

    for child in snapshot.children(node) {
        format_node(snapshot, child, indent + 1, output);
    }
}

fn class_label(class_name: &str) -> &str {
    if class_name.is_empty() {
        "?"
    } else {
        class_name
    }
}
