// ABOUTME: Serde data models for ClickUp Docs API responses
// ABOUTME: Tolerant parsing with ordered field fallbacks for drifting page schemas

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Fields that may carry a page's markdown body, in priority order.
pub const CONTENT_FIELDS: &[&str] = &["content", "body", "markdown"];

/// Fields that may carry a page's child nodes, in priority order.
pub const CHILDREN_FIELDS: &[&str] = &["children", "sub_pages", "pages"];

/// Fields that may wrap the top-level list of a page listing response.
pub const LISTING_FIELDS: &[&str] = &["pages", "children"];

/// Returns the first value among `fields` that satisfies `accept`.
pub fn lookup<'a>(
    map: &'a Map<String, Value>,
    fields: &[&str],
    accept: fn(&Value) -> bool,
) -> Option<&'a Value> {
    fields
        .iter()
        .filter_map(|field| map.get(*field))
        .find(|value| accept(value))
}

fn non_empty_str(value: &Value) -> bool {
    value.as_str().is_some_and(|s| !s.is_empty())
}

fn non_empty_array(value: &Value) -> bool {
    value.as_array().is_some_and(|a| !a.is_empty())
}

fn is_array(value: &Value) -> bool {
    value.is_array()
}

/// ClickUp hands out ids as strings on v3 and sometimes as numbers on v2.
fn id_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    id_value(&value)
        .ok_or_else(|| serde::de::Error::custom(format!("expected string or number id, got {value}")))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workspace {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
}

impl Workspace {
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    /// Inline content blocks, present on docs that have no page tree.
    #[serde(default)]
    pub content: Option<Value>,
}

impl Document {
    pub fn display_name(&self) -> &str {
        match self.name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => "unnamed-doc",
        }
    }

    /// Inline blocks that parse as `{type, content}`; anything else is dropped.
    pub fn content_blocks(&self) -> Vec<ContentBlock> {
        match &self.content {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|item| serde_json::from_value(item.clone()).ok())
                .collect(),
            _ => Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentBlock {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub content: Value,
}

impl ContentBlock {
    /// Markdown blocks, plus untyped blocks whose content is already text.
    pub fn is_markdown(&self) -> bool {
        self.kind == "markdown" || (self.kind.is_empty() && self.content.is_string())
    }

    pub fn text(&self) -> &str {
        self.content.as_str().unwrap_or("")
    }
}

/// One entry of a document's page hierarchy, kept as a raw JSON map.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageNode(Map<String, Value>);

impl PageNode {
    /// Non-object entries (nulls, strings) are not page nodes.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(PageNode(map)),
            _ => None,
        }
    }

    pub fn id(&self) -> Option<String> {
        self.0.get("id").and_then(id_value)
    }

    pub fn name(&self) -> &str {
        match self.0.get("name").and_then(Value::as_str) {
            Some(name) if !name.is_empty() => name,
            _ => "unnamed-page",
        }
    }

    pub fn has_children(&self) -> bool {
        lookup(&self.0, CHILDREN_FIELDS, non_empty_array).is_some()
    }

    /// Removes and returns the first non-empty child list.
    pub fn take_children(&mut self) -> Vec<PageNode> {
        let field = CHILDREN_FIELDS
            .iter()
            .find(|field| self.0.get(**field).is_some_and(non_empty_array));

        match field.and_then(|field| self.0.remove(*field)) {
            Some(Value::Array(items)) => items.into_iter().filter_map(PageNode::from_value).collect(),
            _ => Vec::new(),
        }
    }
}

/// Number of nodes in a listing, counted through every child field fallback.
pub fn count_nodes(nodes: &[PageNode]) -> usize {
    let mut count = 0;
    let mut stack: Vec<PageNode> = nodes.to_vec();
    while let Some(mut node) = stack.pop() {
        count += 1;
        stack.extend(node.take_children());
    }
    count
}

/// Normalizes a page listing response: a bare list, or an object wrapping one.
pub fn page_listing(response: Value) -> Vec<PageNode> {
    let items = match response {
        Value::Array(items) => items,
        Value::Object(map) => match lookup(&map, LISTING_FIELDS, is_array) {
            Some(Value::Array(items)) => items.clone(),
            _ => Vec::new(),
        },
        _ => Vec::new(),
    };

    items.into_iter().filter_map(PageNode::from_value).collect()
}

/// Markdown body of a page content response; empty when no field carries text.
pub fn page_content(response: &Value) -> String {
    response
        .as_object()
        .and_then(|map| lookup(map, CONTENT_FIELDS, non_empty_str))
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}
