//! Line-oriented command interpreter driving a [`Builder`].

use crate::builder::Builder;
use crate::catalog::Category;
use crate::error::{BuilderError, Result};
use crate::highlight::Highlighter;
use crate::ident::ComponentId;
use crate::layout::{ComponentNode, LayoutState, Region};
use crate::persistence::KeyValueStore;
use std::io::Write;

pub const HELP: &str = "\
commands:
  catalog [term] [category]          list placeable components
  add <type> <region> [index]        place a component in a region
  nest <parent> <type>               add a child component
  select <id>                        select a component and show its properties
  set <id> <key> <text>              edit a property
  rm <id>                            remove a component and its children
  mv <id> <region> <index> [parent]  move a component
  undo | redo                        step through history
  tree                               show the layout outline
  code                               print the generated code
  save <name> [description]          save the layout as a named design
  load <id>                          restore a saved design
  designs                            list saved designs
  help | quit
regions: navigation content tools notifications breadcrumbs modals";

#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    Catalog {
        term: String,
        category: Option<Category>,
    },
    Add {
        type_id: String,
        region: Region,
        index: Option<usize>,
    },
    Nest {
        parent: ComponentId,
        type_id: String,
    },
    Select(ComponentId),
    Set {
        id: ComponentId,
        key: String,
        text: String,
    },
    Remove(ComponentId),
    Move {
        id: ComponentId,
        region: Region,
        index: usize,
        parent: Option<ComponentId>,
    },
    Undo,
    Redo,
    Tree,
    Code,
    Save {
        name: String,
        description: String,
    },
    Load(ComponentId),
    Designs,
    Help,
    Quit,
}

/// Whether the interpreter should keep reading.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Split off the first word. A word opening with `"` runs to the next `"`.
fn next_word(s: &str) -> Option<(&str, &str)> {
    let s = s.trim_start();
    if s.is_empty() {
        return None;
    }
    if let Some(quoted) = s.strip_prefix('"') {
        let end = quoted.find('"').unwrap_or(quoted.len());
        let rest = quoted.get(end + 1..).unwrap_or("");
        return Some((&quoted[..end], rest));
    }
    let end = s.find(char::is_whitespace).unwrap_or(s.len());
    Some((&s[..end], &s[end..]))
}

fn parse_index(s: &str, usage: &'static str) -> Result<usize> {
    s.parse().map_err(|_| BuilderError::Usage(usage))
}

/// Parse one input line. Blank lines and `#` comments yield `None`.
pub fn parse(line: &str) -> Result<Option<Command>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    let Some((verb, rest)) = next_word(line) else {
        return Ok(None);
    };
    let args: Vec<&str> = rest.split_whitespace().collect();

    let command = match verb {
        "catalog" => {
            const USAGE: &str = "catalog [term] [category]";
            let (term, rest) = next_word(rest).unwrap_or_default();
            let category = match next_word(rest) {
                None => None,
                Some((_, tail)) if !tail.trim().is_empty() => {
                    return Err(BuilderError::Usage(USAGE));
                }
                Some((c, _)) if c.eq_ignore_ascii_case("all") => None,
                Some((c, _)) => Some(Category::parse(c).ok_or(BuilderError::Usage(USAGE))?),
            };
            Command::Catalog {
                term: term.to_owned(),
                category,
            }
        }
        "add" => {
            const USAGE: &str = "add <type> <region> [index]";
            let [type_id, region, tail @ ..] = args.as_slice() else {
                return Err(BuilderError::Usage(USAGE));
            };
            let index = match tail {
                [] => None,
                [i] => Some(parse_index(i, USAGE)?),
                _ => return Err(BuilderError::Usage(USAGE)),
            };
            Command::Add {
                type_id: (*type_id).to_owned(),
                region: region.parse()?,
                index,
            }
        }
        "nest" => match args.as_slice() {
            [parent, type_id] => Command::Nest {
                parent: ComponentId::from(*parent),
                type_id: (*type_id).to_owned(),
            },
            _ => return Err(BuilderError::Usage("nest <parent> <type>")),
        },
        "select" => match args.as_slice() {
            [id] => Command::Select(ComponentId::from(*id)),
            _ => return Err(BuilderError::Usage("select <id>")),
        },
        "set" => {
            const USAGE: &str = "set <id> <key> <text>";
            let (id, rest) = next_word(rest).ok_or(BuilderError::Usage(USAGE))?;
            let (key, rest) = next_word(rest).ok_or(BuilderError::Usage(USAGE))?;
            Command::Set {
                id: ComponentId::from(id),
                key: key.to_owned(),
                text: rest.trim().to_owned(),
            }
        }
        "rm" | "remove" => match args.as_slice() {
            [id] => Command::Remove(ComponentId::from(*id)),
            _ => return Err(BuilderError::Usage("rm <id>")),
        },
        "mv" | "move" => {
            const USAGE: &str = "mv <id> <region> <index> [parent]";
            let [id, region, index, tail @ ..] = args.as_slice() else {
                return Err(BuilderError::Usage(USAGE));
            };
            let parent = match tail {
                [] => None,
                [p] => Some(ComponentId::from(*p)),
                _ => return Err(BuilderError::Usage(USAGE)),
            };
            Command::Move {
                id: ComponentId::from(*id),
                region: region.parse()?,
                index: parse_index(index, USAGE)?,
                parent,
            }
        }
        "save" => {
            let (name, rest) = next_word(rest).ok_or(BuilderError::Usage("save <name> [description]"))?;
            Command::Save {
                name: name.to_owned(),
                description: rest.trim().to_owned(),
            }
        }
        "load" => match args.as_slice() {
            [id] => Command::Load(ComponentId::from(*id)),
            _ => return Err(BuilderError::Usage("load <id>")),
        },
        "undo" => Command::Undo,
        "redo" => Command::Redo,
        "tree" => Command::Tree,
        "code" => Command::Code,
        "designs" => Command::Designs,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => return Err(BuilderError::UnknownCommand(other.to_owned())),
    };
    Ok(Some(command))
}

/// Run `command` against `builder`, writing feedback to `out`.
///
/// Generated code is coloured when a `highlighter` is given.
pub fn execute<S: KeyValueStore>(
    builder: &mut Builder<S>,
    command: Command,
    out: &mut impl Write,
    highlighter: Option<&Highlighter>,
) -> Result<Flow> {
    match command {
        Command::Catalog { term, category } => {
            for def in builder.catalog().search(&term, category) {
                writeln!(out, "  {:<18} {:<20} {}", def.id, def.name, def.category)?;
            }
        }
        Command::Add {
            type_id,
            region,
            index,
        } => {
            if builder.catalog().contains(&type_id) && !builder.catalog().allows(&type_id, region) {
                tracing::warn!("{type_id} is not meant for the {region} region");
                writeln!(out, "note: {type_id} is not meant for the {region} region")?;
            }
            match builder.insert(&type_id, region, index) {
                Some(node) => writeln!(out, "added {}", node.id())?,
                None => writeln!(out, "unknown component type {type_id}")?,
            }
        }
        Command::Nest { parent, type_id } => match builder.insert_nested(&parent, &type_id) {
            Some(node) => writeln!(out, "added {} under {parent}", node.id())?,
            None => writeln!(out, "cannot nest {type_id} under {parent}")?,
        },
        Command::Select(id) => match builder.select(&id) {
            Some(node) => write_properties(node, out)?,
            None => writeln!(out, "no component {id}")?,
        },
        Command::Set { id, key, text } => {
            match builder.update_property_from_text(&id, &key, &text)? {
                Some(update) => {
                    writeln!(out, "updated {id}.{key}")?;
                    if let Some(modal) = update.modal {
                        writeln!(out, "created modal {modal}")?;
                    }
                }
                None => writeln!(out, "no component {id}")?,
            }
        }
        Command::Remove(id) => match builder.remove(&id) {
            Some(_) => writeln!(out, "removed {id}")?,
            None => writeln!(out, "no component {id}")?,
        },
        Command::Move {
            id,
            region,
            index,
            parent,
        } => {
            if builder.move_node(&id, region, index, parent.as_ref()) {
                writeln!(out, "moved {id}")?;
            } else {
                writeln!(out, "cannot move {id} there")?;
            }
        }
        Command::Undo => {
            let msg = if builder.undo() { "undone" } else { "nothing to undo" };
            writeln!(out, "{msg}")?;
        }
        Command::Redo => {
            let msg = if builder.redo() { "redone" } else { "nothing to redo" };
            writeln!(out, "{msg}")?;
        }
        Command::Tree => {
            let selected = builder.selected().map(|n| n.id().clone());
            out.write_all(outline(builder.layout(), selected.as_ref()).as_bytes())?;
        }
        Command::Code => {
            let code = builder.generated();
            match highlighter {
                Some(h) => writeln!(out, "{}", h.terminal(code))?,
                None => writeln!(out, "{code}")?,
            }
        }
        Command::Save { name, description } => {
            let saved = builder.save(&name, &description)?;
            writeln!(out, "saved {} as {}", saved.name, saved.id)?;
        }
        Command::Load(id) => {
            if builder.load(&id) {
                writeln!(out, "loaded {}", builder.design_name())?;
            } else {
                writeln!(out, "no saved design {id}")?;
            }
        }
        Command::Designs => {
            let designs = builder.saved_designs();
            if designs.is_empty() {
                writeln!(out, "no saved designs")?;
            }
            for d in designs {
                writeln!(
                    out,
                    "  {}  {}  {}  {}",
                    d.id,
                    d.name,
                    d.created_at.to_rfc3339(),
                    d.description
                )?;
            }
        }
        Command::Help => writeln!(out, "{HELP}")?,
        Command::Quit => return Ok(Flow::Quit),
    }
    Ok(Flow::Continue)
}

fn write_properties(node: &ComponentNode, out: &mut impl Write) -> Result<()> {
    writeln!(out, "{} ({})", node.id(), node.type_id())?;
    for (key, value) in node.props() {
        writeln!(out, "  {key} = {}", value.to_json())?;
    }
    Ok(())
}

/// Indented outline of every non-empty region. The selected node is starred.
pub fn outline(state: &LayoutState, selected: Option<&ComponentId>) -> String {
    fn walk<'a>(
        state: &'a LayoutState,
        nodes: impl Iterator<Item = &'a ComponentNode>,
        depth: usize,
        selected: Option<&ComponentId>,
        out: &mut String,
    ) {
        for node in nodes {
            let mark = if Some(node.id()) == selected { "*" } else { "-" };
            out.push_str(&format!(
                "{}{mark} {} [{}]\n",
                "  ".repeat(depth),
                node.type_id(),
                node.id()
            ));
            walk(state, state.child_nodes(node.id()), depth + 1, selected, out);
        }
    }

    if state.is_empty() {
        return "(empty layout)\n".to_owned();
    }
    let mut out = String::new();
    for region in Region::ALL {
        if state.roots(region).is_empty() {
            continue;
        }
        out.push_str(&format!("{region}:\n"));
        walk(state, state.region_nodes(region), 1, selected, &mut out);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::history::History;
    use crate::ident::IdGenerator;
    use crate::persistence::MemoryStore;

    fn builder() -> Builder<MemoryStore> {
        Builder::with_parts(
            Catalog::builtin(),
            MemoryStore::default(),
            History::new(),
            IdGenerator::with_seed(5),
        )
    }

    fn run(b: &mut Builder<MemoryStore>, line: &str) -> String {
        let mut out = Vec::new();
        if let Some(cmd) = parse(line).unwrap() {
            execute(b, cmd, &mut out, None).unwrap();
        }
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_parse_add() {
        assert_eq!(
            parse("add button content 2").unwrap(),
            Some(Command::Add {
                type_id: "button".into(),
                region: Region::Content,
                index: Some(2),
            })
        );
        assert_eq!(
            parse("  add alert notifications ").unwrap(),
            Some(Command::Add {
                type_id: "alert".into(),
                region: Region::Notifications,
                index: None,
            })
        );
        assert!(matches!(parse("add button"), Err(BuilderError::Usage(_))));
        assert!(matches!(parse("add button sidebar"), Err(BuilderError::UnknownRegion(_))));
        assert!(matches!(parse("add button content x"), Err(BuilderError::Usage(_))));
    }

    #[test]
    fn test_parse_set_keeps_rest_of_line() {
        assert_eq!(
            parse(r#"set grid_1_2 gridDefinition [{"colspan": 6}, {"colspan": 6}]"#).unwrap(),
            Some(Command::Set {
                id: ComponentId::from("grid_1_2"),
                key: "gridDefinition".into(),
                text: r#"[{"colspan": 6}, {"colspan": 6}]"#.into(),
            })
        );
        assert!(parse("set only_id").is_err());
    }

    #[test]
    fn test_parse_move_and_save() {
        assert_eq!(
            parse("mv a_1_1 tools 0 c_2_2").unwrap(),
            Some(Command::Move {
                id: ComponentId::from("a_1_1"),
                region: Region::Tools,
                index: 0,
                parent: Some(ComponentId::from("c_2_2")),
            })
        );
        assert_eq!(
            parse(r#"save "My Page" landing layout"#).unwrap(),
            Some(Command::Save {
                name: "My Page".into(),
                description: "landing layout".into(),
            })
        );
    }

    #[test]
    fn test_parse_misc() {
        assert_eq!(parse("").unwrap(), None);
        assert_eq!(parse("# comment").unwrap(), None);
        assert_eq!(parse("undo").unwrap(), Some(Command::Undo));
        assert_eq!(
            parse("catalog nav all").unwrap(),
            Some(Command::Catalog {
                term: "nav".into(),
                category: None,
            })
        );
        assert_eq!(
            parse("catalog \"\" feedback").unwrap(),
            Some(Command::Catalog {
                term: "".into(),
                category: Some(Category::Feedback),
            })
        );
        assert!(matches!(parse("frobnicate"), Err(BuilderError::UnknownCommand(_))));
    }

    #[test]
    fn test_session_flow() {
        let mut b = builder();
        let added = run(&mut b, "add container content");
        let id = added.trim().strip_prefix("added ").unwrap().to_owned();

        let nested = run(&mut b, &format!("nest {id} button"));
        assert!(nested.starts_with("added button_"));

        let tree = run(&mut b, "tree");
        assert!(tree.starts_with("content:\n  - container ["));
        assert!(tree.contains("\n    * button ["));

        let code = run(&mut b, "code");
        assert!(code.contains("<Container"));
        assert!(!code.contains('\x1b'));

        assert_eq!(run(&mut b, "undo"), "undone\n");
        assert_eq!(run(&mut b, "redo"), "redone\n");
        assert_eq!(run(&mut b, "redo"), "nothing to redo\n");
        assert!(run(&mut b, "quit").is_empty());
    }

    #[test]
    fn test_set_open_modal_reports_dialog() {
        let mut b = builder();
        let added = run(&mut b, "add button content");
        let id = added.trim().strip_prefix("added ").unwrap().to_owned();

        let out = run(&mut b, &format!("set {id} onClick openModal"));
        assert!(out.starts_with(&format!("updated {id}.onClick\ncreated modal modal_")));
    }

    #[test]
    fn test_set_malformed_json_is_error() {
        let mut b = builder();
        let added = run(&mut b, "add grid content");
        let id = added.trim().strip_prefix("added ").unwrap().to_owned();

        let cmd = parse(&format!("set {id} gridDefinition [oops")).unwrap().unwrap();
        let mut out = Vec::new();
        let err = execute(&mut b, cmd, &mut out, None).unwrap_err();
        assert!(matches!(err, BuilderError::InvalidProperty { .. }));
    }

    #[test]
    fn test_placement_note() {
        let mut b = builder();
        let out = run(&mut b, "add side-navigation content");
        assert!(out.starts_with("note: side-navigation is not meant for the content region\nadded "));
    }

    #[test]
    fn test_save_and_list_designs() {
        let mut b = builder();
        assert_eq!(run(&mut b, "designs"), "no saved designs\n");
        run(&mut b, "add badge content");
        let out = run(&mut b, "save Draft first cut");
        assert!(out.starts_with("saved Draft as design_"));
        let listing = run(&mut b, "designs");
        assert!(listing.contains("  Draft  "));
        assert!(listing.trim_end().ends_with("first cut"));
    }

    #[test]
    fn test_outline_empty() {
        assert_eq!(outline(&LayoutState::new(), None), "(empty layout)\n");
    }
}
