//! The widget catalog: every component type the builder can place.

use crate::error::{BuilderError, Result};
use crate::layout::Region;
use crate::value::{PropValue, Properties};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

const BUILTIN_CATALOG: &str = include_str!("builtin.json");

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Layout,
    Navigation,
    Input,
    Data,
    Feedback,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Layout,
        Category::Navigation,
        Category::Input,
        Category::Data,
        Category::Feedback,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Category::Layout => "layout",
            Category::Navigation => "navigation",
            Category::Input => "input",
            Category::Data => "data",
            Category::Feedback => "feedback",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str().eq_ignore_ascii_case(s))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the property editor should treat a property.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyType {
    Simple(SimpleType),
    Select {
        #[serde(rename = "type")]
        kind: SelectTag,
        options: Vec<SelectOption>,
    },
}

impl PropertyType {
    /// Turn editor text into a value of this type.
    ///
    /// Unparsable numbers become `0`. Malformed JSON for object and array
    /// properties is an error so the caller can keep the prior value.
    pub fn coerce(&self, key: &str, text: &str) -> Result<PropValue> {
        let simple = match self {
            PropertyType::Select { .. } => return Ok(PropValue::from(text)),
            PropertyType::Simple(simple) => simple,
        };
        match simple {
            SimpleType::String | SimpleType::Textarea => Ok(PropValue::from(text)),
            SimpleType::Number => Ok(PropValue::Number(text.trim().parse().unwrap_or(0.0))),
            SimpleType::Boolean => match text.trim() {
                "true" => Ok(PropValue::Bool(true)),
                "false" => Ok(PropValue::Bool(false)),
                other => Err(BuilderError::InvalidProperty {
                    key: key.to_owned(),
                    reason: format!("expected true or false, got {other:?}"),
                }),
            },
            SimpleType::Object | SimpleType::Array => {
                let value = PropValue::parse_json(text).map_err(|e| BuilderError::InvalidProperty {
                    key: key.to_owned(),
                    reason: e.to_string(),
                })?;
                let (shape_ok, expected) = match simple {
                    SimpleType::Object => (matches!(value, PropValue::Map(_)), "object"),
                    _ => (matches!(value, PropValue::List(_)), "array"),
                };
                if !shape_ok {
                    return Err(BuilderError::InvalidProperty {
                        key: key.to_owned(),
                        reason: format!("expected a JSON {expected}"),
                    });
                }
                Ok(value)
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SimpleType {
    String,
    Textarea,
    Number,
    Boolean,
    Object,
    Array,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectTag {
    Select,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

/// One catalog entry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentDefinition {
    pub id: String,
    pub name: String,
    pub icon: String,
    pub category: Category,
    /// Placement hints: region names plus `modal`/`modals` and `nested`.
    pub sections: Vec<String>,
    #[serde(default)]
    pub allows_nesting: bool,
    pub default_props: Properties,
    #[serde(default)]
    pub property_types: IndexMap<String, PropertyType>,
}

impl ComponentDefinition {
    pub fn allows_region(&self, region: Region) -> bool {
        self.sections.iter().any(|s| match region {
            Region::Modals => s == "modal" || s == "modals",
            _ => s == region.as_str(),
        })
    }

    pub fn allows_nested_placement(&self) -> bool {
        self.sections.iter().any(|s| s == "nested")
    }
}

/// Read-only registry of component types, in palette order.
#[derive(Clone, Debug)]
pub struct Catalog {
    entries: Vec<ComponentDefinition>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Catalog {
    /// The Cloudscape widget set shipped with the builder.
    pub fn builtin() -> Self {
        Self::from_json(BUILTIN_CATALOG).expect("builtin catalog is valid JSON")
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let entries: Vec<ComponentDefinition> = serde_json::from_str(json)?;
        Ok(Self { entries })
    }

    pub fn get(&self, type_id: &str) -> Option<&ComponentDefinition> {
        self.entries.iter().find(|d| d.id == type_id)
    }

    pub fn contains(&self, type_id: &str) -> bool {
        self.get(type_id).is_some()
    }

    pub fn allows_nesting(&self, type_id: &str) -> bool {
        self.get(type_id).is_some_and(|d| d.allows_nesting)
    }

    /// Whether the palette offers `type_id` for `region`. Advisory only.
    pub fn allows(&self, type_id: &str, region: Region) -> bool {
        self.get(type_id).is_some_and(|d| d.allows_region(region))
    }

    pub fn property_type(&self, type_id: &str, key: &str) -> Option<&PropertyType> {
        self.get(type_id)?.property_types.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ComponentDefinition> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Palette filter: case-insensitive match on id or display name, optionally
    /// narrowed to one category.
    pub fn search(&self, term: &str, category: Option<Category>) -> Vec<&ComponentDefinition> {
        let term = term.trim().to_lowercase();
        self.entries
            .iter()
            .filter(|d| category.is_none_or(|c| d.category == c))
            .filter(|d| {
                term.is_empty()
                    || d.id.to_lowercase().contains(&term)
                    || d.name.to_lowercase().contains(&term)
            })
            .collect()
    }
}
