//! JSX rendering of single components.

use crate::ident::sanitize_id;
use crate::layout::{ComponentNode, LayoutState, MODAL_ID_KEY, OPEN_MODAL};
use crate::value::{PropValue, format_number};

/// Reserved property rendered as element content instead of an attribute.
const CHILDREN_KEY: &str = "children";

/// Component names whose PascalCase form is spelled out explicitly.
const TAG_OVERRIDES: &[(&str, &str)] = &[
    ("side-navigation", "SideNavigation"),
    ("breadcrumb-group", "BreadcrumbGroup"),
    ("radio-group", "RadioGroup"),
    ("date-picker", "DatePicker"),
    ("help-panel", "HelpPanel"),
    ("column-layout", "ColumnLayout"),
];

/// `column-layout` -> `ColumnLayout`.
pub fn tag_name(type_id: &str) -> String {
    if let Some((_, tag)) = TAG_OVERRIDES.iter().find(|(id, _)| *id == type_id) {
        return (*tag).to_owned();
    }
    type_id
        .split('-')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}

/// `ContentLayout` -> `content-layout`, the package path of a component.
pub fn import_path(tag: &str) -> String {
    let mut out = String::with_capacity(tag.len() + 4);
    for (i, c) in tag.chars().enumerate() {
        if c.is_uppercase() && i > 0 {
            out.push('-');
        }
        out.extend(c.to_lowercase());
    }
    out
}

/// A string attribute. Values holding a double quote become a JS string
/// expression since JSX attribute strings have no escapes.
pub fn string_attr(s: &str) -> String {
    if s.contains('"') {
        format!("{{{}}}", PropValue::from(s).to_json())
    } else {
        format!("\"{s}\"")
    }
}

/// Right-hand side of `key=...` for one property, or `None` to omit it.
pub fn format_prop_value(value: &PropValue, node: &ComponentNode) -> Option<String> {
    match value {
        PropValue::Null => None,
        PropValue::String(s) if s.is_empty() => None,
        PropValue::String(s) if s == OPEN_MODAL => {
            let target = node
                .prop(MODAL_ID_KEY)
                .and_then(PropValue::as_str)
                .filter(|id| !id.is_empty())
                .map(sanitize_id)
                .unwrap_or_else(|| "modal_id".to_owned());
            Some(format!("{{() => setVisibleModal(\"{target}\")}}"))
        }
        PropValue::String(s) => Some(string_attr(s)),
        PropValue::Bool(b) => Some(format!("{{{b}}}")),
        PropValue::Number(n) => Some(format!("{{{}}}", format_number(*n))),
        PropValue::List(_) | PropValue::Map(_) => Some(format!("{{{}}}", value.to_json())),
    }
}

/// Element content for a `children` property.
pub fn format_children(value: &PropValue) -> String {
    match value {
        PropValue::String(s) if s.contains(['{', '}', '<', '>']) => {
            format!("{{{}}}", value.to_json())
        }
        PropValue::List(items) => items
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", "),
        other => other.to_string(),
    }
}

/// Render `nodes` and their subtrees at `indent` spaces.
pub fn render_nodes<'a>(
    state: &'a LayoutState,
    nodes: impl Iterator<Item = &'a ComponentNode>,
    indent: usize,
    out: &mut String,
) {
    for node in nodes {
        render_node(state, node, indent, out);
    }
}

fn render_node(state: &LayoutState, node: &ComponentNode, indent: usize, out: &mut String) {
    let pad = " ".repeat(indent);
    let tag = tag_name(node.type_id());

    out.push_str(&format!("{pad}<{tag}\n"));
    for (key, value) in node.props() {
        if key == CHILDREN_KEY {
            continue;
        }
        if let Some(formatted) = format_prop_value(value, node) {
            out.push_str(&format!("{pad}  {key}={formatted}\n"));
        }
    }

    if !node.children().is_empty() {
        out.push_str(&format!("{pad}>\n"));
        render_nodes(state, state.child_nodes(node.id()), indent + 2, out);
        out.push_str(&format!("{pad}</{tag}>\n"));
    } else if let Some(text) = node.prop(CHILDREN_KEY).filter(|v| v.is_truthy()) {
        out.push_str(&format!("{pad}>\n"));
        out.push_str(&format!("{pad}  {}\n", format_children(text)));
        out.push_str(&format!("{pad}</{tag}>\n"));
    } else {
        out.push_str(&format!("{pad}/>\n"));
    }
}
