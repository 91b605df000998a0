//! Plain-text rendering of tree rows

use treedata_core::{NodeWithChildCount, TreeNode, TreeOutline};

const EMPTY_LABEL: &str = "(empty)";

fn label(node: &TreeNode) -> String {
    if node.is_placeholder() {
        return EMPTY_LABEL.to_string();
    }
    let title = node.title.as_deref().unwrap_or_default();
    match node.value.as_deref() {
        Some(value) if !value.is_empty() => format!("{}: {}", title, value),
        _ => title.to_string(),
    }
}

/// Indented outline, two spaces per level
pub fn render_outline(roots: &[TreeOutline]) -> String {
    let mut out = String::new();
    for root in roots {
        push_outline(&mut out, root, 0);
    }
    out
}

fn push_outline(out: &mut String, outline: &TreeOutline, level: usize) {
    out.push_str(&format!(
        "{}{} {}\n",
        "  ".repeat(level),
        outline.node.full_position,
        label(&outline.node)
    ));
    for child in &outline.children {
        push_outline(out, child, level + 1);
    }
}

/// One line per node: id, path, label, child count
pub fn render_level(rows: &[NodeWithChildCount]) -> String {
    rows.iter()
        .map(|row| {
            format!(
                "[{}] {} {} ({} children)\n",
                row.node.id,
                row.node.full_position,
                label(&row.node),
                row.child_count
            )
        })
        .collect()
}
