//! React code generation for a layout.
//!
//! [`generate`] is a pure function of the [`LayoutState`]: it emits an
//! import header, a `CloudscapeApp` component with the dialog switch, and an
//! `AppLayout` element whose slots hold the generated region fragments.

mod jsx;

pub use jsx::{format_prop_value, import_path, tag_name};

use crate::ident::sanitize_id;
use crate::layout::{LayoutState, OPEN_MODAL, Region};
use std::collections::BTreeSet;

/// Output for a layout with no components at all.
pub const PLACEHOLDER: &str = "// Add components to see code here";

/// Components every generated app imports.
const BASE_IMPORTS: [&str; 2] = ["AppLayout", "ContentLayout"];

const PACKAGE: &str = "@cloudscape-design/components";

/// Depth of region content inside the `AppLayout` element.
const SLOT_INDENT: usize = 10;
/// Depth of dialog content inside `renderModal`.
const MODAL_INDENT: usize = 12;

pub fn generate(state: &LayoutState) -> String {
    if state.is_empty() {
        return PLACEHOLDER.to_owned();
    }

    let mut out = String::new();
    out.push_str("import React, { useState } from 'react';\n");
    for tag in collect_imports(state) {
        out.push_str(&format!(
            "import {tag} from '{PACKAGE}/{}';\n",
            import_path(&tag)
        ));
    }

    out.push_str("\nfunction CloudscapeApp() {\n");
    out.push_str("  const [toolsOpen, setToolsOpen] = useState(false);\n");

    let has_modals = !state.roots(Region::Modals).is_empty();
    if has_modals || calls_modal_setter(state) {
        out.push_str("  const [visibleModal, setVisibleModal] = useState(null);\n");
    }
    if has_modals {
        render_modal_switch(state, &mut out);
    }

    out.push_str("\n  return (\n");
    out.push_str("    <AppLayout\n");
    fragment_slot(state, Region::Navigation, &mut out);
    fragment_slot(state, Region::Tools, &mut out);
    if !state.roots(Region::Breadcrumbs).is_empty() {
        fragment_slot(state, Region::Breadcrumbs, &mut out);
    }
    if !state.roots(Region::Notifications).is_empty() {
        fragment_slot(state, Region::Notifications, &mut out);
    }
    out.push_str("      toolsOpen={toolsOpen}\n");
    out.push_str("      onToolsChange={({ detail }) => setToolsOpen(detail.open)}\n");
    content_slot(state, &mut out);

    if has_modals {
        out.push_str("    >\n");
        out.push_str("      {renderModal()}\n");
        out.push_str("    </AppLayout>\n");
    } else {
        out.push_str("    />\n");
    }
    out.push_str("  );\n");
    out.push_str("}\n\n");
    out.push_str("export default CloudscapeApp;\n");
    out
}

/// Distinct component names used anywhere in the layout, sorted.
pub fn collect_imports(state: &LayoutState) -> BTreeSet<String> {
    let mut imports: BTreeSet<String> = BASE_IMPORTS.iter().map(|s| (*s).to_owned()).collect();
    if !state.roots(Region::Modals).is_empty() {
        imports.insert("Modal".to_owned());
    }
    for node in state.iter() {
        imports.insert(tag_name(node.type_id()));
        if node.type_id() == "button"
            && node.prop("onClick").and_then(|v| v.as_str()) == Some(OPEN_MODAL)
        {
            imports.insert("Modal".to_owned());
        }
    }
    imports
}

/// Whether any rendered property becomes a `setVisibleModal` closure.
fn calls_modal_setter(state: &LayoutState) -> bool {
    state
        .iter()
        .flat_map(|node| node.props().values())
        .any(|v| v.as_str() == Some(OPEN_MODAL))
}

fn fragment_slot(state: &LayoutState, region: Region, out: &mut String) {
    let name = region.as_str();
    if state.roots(region).is_empty() {
        out.push_str(&format!("      {name}={{null}}\n"));
        return;
    }
    out.push_str(&format!("      {name}={{\n"));
    out.push_str("        <React.Fragment>\n");
    jsx::render_nodes(state, state.region_nodes(region), SLOT_INDENT, out);
    out.push_str("        </React.Fragment>\n");
    out.push_str("      }\n");
}

fn content_slot(state: &LayoutState, out: &mut String) {
    if state.roots(Region::Content).is_empty() {
        out.push_str("      content={<ContentLayout>Content goes here</ContentLayout>}\n");
        return;
    }
    out.push_str("      content={\n");
    out.push_str("        <ContentLayout>\n");
    jsx::render_nodes(state, state.region_nodes(Region::Content), SLOT_INDENT, out);
    out.push_str("        </ContentLayout>\n");
    out.push_str("      }\n");
}

fn render_modal_switch(state: &LayoutState, out: &mut String) {
    out.push_str("\n  // Render visible modal\n");
    out.push_str("  const renderModal = () => {\n");
    out.push_str("    switch (visibleModal) {\n");

    for modal in state.region_nodes(Region::Modals) {
        let header = modal
            .prop("header")
            .and_then(|v| v.as_str())
            .filter(|h| !h.is_empty())
            .unwrap_or("Modal");

        out.push_str(&format!("      case \"{}\":\n", sanitize_id(modal.id().as_str())));
        out.push_str("        return (\n");
        out.push_str("          <Modal\n");
        out.push_str("            visible={true}\n");
        out.push_str(&format!("            header={}\n", jsx::string_attr(header)));
        if let Some(size) = modal
            .prop("size")
            .and_then(|v| v.as_str())
            .filter(|s| !s.is_empty())
        {
            out.push_str(&format!("            size={}\n", jsx::string_attr(size)));
        }
        out.push_str("            onDismiss={() => setVisibleModal(null)}\n");
        out.push_str("          >\n");

        if modal.type_id() != "modal" {
            // Any other component in the dialog list is shown inside the dialog
            jsx::render_nodes(state, std::iter::once(modal), MODAL_INDENT, out);
        } else if modal.children().is_empty() {
            let text = modal
                .prop("children")
                .filter(|v| v.is_truthy())
                .map(jsx::format_children)
                .unwrap_or_else(|| "Modal content".to_owned());
            out.push_str(&format!("            <div>{text}</div>\n"));
        } else {
            jsx::render_nodes(state, state.child_nodes(modal.id()), MODAL_INDENT, out);
        }

        out.push_str("          </Modal>\n");
        out.push_str("        );\n");
    }

    out.push_str("      default:\n");
    out.push_str("        return null;\n");
    out.push_str("    }\n");
    out.push_str("  };\n");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::ident::IdGenerator;
    use crate::value::PropValue;

    fn setup() -> (Catalog, IdGenerator, LayoutState) {
        (Catalog::builtin(), IdGenerator::with_seed(21), LayoutState::new())
    }

    #[test]
    fn test_empty_layout_gives_placeholder() {
        assert_eq!(generate(&LayoutState::new()), PLACEHOLDER);
    }

    #[test]
    fn test_nested_button_inside_container() {
        let (catalog, mut ids, mut state) = setup();
        let container = state
            .insert(&catalog, &mut ids, "container", Region::Content, None)
            .unwrap();
        state.insert_nested(&catalog, &mut ids, &container, "button");

        let expected = "\
import React, { useState } from 'react';
import AppLayout from '@cloudscape-design/components/app-layout';
import Button from '@cloudscape-design/components/button';
import Container from '@cloudscape-design/components/container';
import ContentLayout from '@cloudscape-design/components/content-layout';

function CloudscapeApp() {
  const [toolsOpen, setToolsOpen] = useState(false);

  return (
    <AppLayout
      navigation={null}
      tools={null}
      toolsOpen={toolsOpen}
      onToolsChange={({ detail }) => setToolsOpen(detail.open)}
      content={
        <ContentLayout>
          <Container
            header=\"Container header\"
            disableContentPaddings={false}
          >
            <Button
              variant=\"primary\"
              disabled={false}
            >
              Button text
            </Button>
          </Container>
        </ContentLayout>
      }
    />
  );
}

export default CloudscapeApp;
";
        assert_eq!(generate(&state), expected);
    }

    #[test]
    fn test_navigation_fragment_embeds_json() {
        let (catalog, mut ids, mut state) = setup();
        state.insert(&catalog, &mut ids, "side-navigation", Region::Navigation, None);

        let code = generate(&state);
        assert!(code.contains("import SideNavigation from '@cloudscape-design/components/side-navigation';"));
        assert!(code.contains("      navigation={\n        <React.Fragment>\n          <SideNavigation\n"));
        assert!(code.contains("            header={{\"text\":\"Navigation\"}}\n"));
        assert!(code.contains("      content={<ContentLayout>Content goes here</ContentLayout>}\n"));
        assert!(!code.contains("breadcrumbs="));
    }

    #[test]
    fn test_optional_slots_only_when_populated() {
        let (catalog, mut ids, mut state) = setup();
        state.insert(&catalog, &mut ids, "breadcrumb-group", Region::Breadcrumbs, None);
        state.insert(&catalog, &mut ids, "flashbar", Region::Notifications, None);

        let code = generate(&state);
        assert!(code.contains("      breadcrumbs={\n"));
        assert!(code.contains("      notifications={\n"));
        assert!(code.contains("<BreadcrumbGroup\n"));
        assert!(code.contains("<Flashbar\n"));
    }

    #[test]
    fn test_modal_switch_and_button_closure() {
        let (catalog, mut ids, mut state) = setup();
        let button = state
            .insert(&catalog, &mut ids, "button", Region::Content, None)
            .unwrap();
        let update = state
            .update_property(&catalog, &mut ids, &button, "onClick", PropValue::from("openModal"))
            .unwrap();
        let modal = update.modal.unwrap();
        let case_id = sanitize_id(modal.as_str());

        let code = generate(&state);
        assert!(code.contains("import Modal from '@cloudscape-design/components/modal';"));
        assert!(code.contains("  const [visibleModal, setVisibleModal] = useState(null);\n"));
        assert!(code.contains(&format!("      case \"{case_id}\":\n")));
        assert!(code.contains("            header=\"Modal title\"\n            size=\"medium\"\n"));
        assert!(code.contains("            <div>Modal content goes here</div>\n"));
        assert!(code.contains(&format!("onClick={{() => setVisibleModal(\"{case_id}\")}}")));
        assert!(code.contains("      {renderModal()}\n    </AppLayout>\n"));
    }

    #[test]
    fn test_modal_with_children() {
        let (catalog, mut ids, mut state) = setup();
        let modal = state
            .insert(&catalog, &mut ids, "modal", Region::Modals, None)
            .unwrap();
        state.insert_nested(&catalog, &mut ids, &modal, "input");
        state.set_property(&modal, "header", PropValue::from(""));

        let code = generate(&state);
        assert!(code.contains("            header=\"Modal\"\n"));
        assert!(code.contains("            <Input\n              placeholder=\"Enter text...\"\n"));
        assert!(!code.contains("<div>"));
    }

    #[test]
    fn test_other_component_in_modal_list() {
        let (catalog, mut ids, mut state) = setup();
        let button = state
            .insert(&catalog, &mut ids, "button", Region::Modals, None)
            .unwrap();

        let code = generate(&state);
        assert!(collect_imports(&state).contains("Modal"));
        assert!(code.contains("import Modal from '@cloudscape-design/components/modal';"));
        assert!(code.contains(&format!("      case \"{}\":\n", sanitize_id(button.as_str()))));
        assert!(code.contains("          >\n            <Button\n              variant=\"primary\"\n"));
        assert!(code.contains("              Button text\n            </Button>\n          </Modal>\n"));
        assert!(!code.contains("<div>"));
    }

    #[test]
    fn test_setter_declared_after_dialog_removed() {
        let (catalog, mut ids, mut state) = setup();
        let button = state
            .insert(&catalog, &mut ids, "button", Region::Content, None)
            .unwrap();
        let modal = state
            .update_property(&catalog, &mut ids, &button, "onClick", PropValue::from("openModal"))
            .unwrap()
            .modal
            .unwrap();
        state.remove(&modal).unwrap();

        let code = generate(&state);
        assert!(code.contains("setVisibleModal(\""));
        assert!(code.contains("  const [visibleModal, setVisibleModal] = useState(null);\n"));
        assert!(!code.contains("renderModal"));
        assert!(code.contains("\n    />\n"));
    }

    #[test]
    fn test_imports_are_sorted_and_deduplicated() {
        let (catalog, mut ids, mut state) = setup();
        for t in ["spinner", "alert", "spinner", "badge"] {
            state.insert(&catalog, &mut ids, t, Region::Content, None);
        }
        let imports: Vec<String> = collect_imports(&state).into_iter().collect();
        assert_eq!(
            imports,
            ["Alert", "AppLayout", "Badge", "ContentLayout", "Spinner"]
        );
    }

    #[test]
    fn test_generate_is_deterministic() {
        let (catalog, mut ids, mut state) = setup();
        let tabs = state
            .insert(&catalog, &mut ids, "tabs", Region::Tools, None)
            .unwrap();
        state.insert_nested(&catalog, &mut ids, &tabs, "table");
        assert_eq!(generate(&state), generate(&state.clone()));
        assert!(generate(&state).contains("      tools={\n        <React.Fragment>\n          <Tabs\n"));
    }
}
