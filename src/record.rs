//! Conversation records as found in ChatGPT exports.
//!
//! A [`Record`] is one conversation. Exports have shipped two shapes over time:
//!
//! - **Graph form**: a `mapping` object of node id → node, where each node
//!   optionally carries a message and links to its `parent` and `children`.
//!   Regenerated answers show up as sibling branches.
//! - **List form**: a `messages` array of `{role, content}` entries.
//!
//! The shape is resolved once, when the record is built, into a
//! [`MessageTree`]. Everything that does not fit the expected shape degrades
//! to defaults instead of failing, so a single odd conversation never sinks
//! a batch.
//!
//! # Examples
//!
//! ```
//! use convopack::record::{MessageTree, Record};
//! use serde_json::json;
//!
//! let record = Record::from_value(json!({
//!     "id": "abc",
//!     "title": "Greeting",
//!     "create_time": 1700000000.0,
//!     "mapping": {
//!         "root": null,
//!         "n1": {"message": {"author": {"role": "user"}, "content": {"parts": ["hi"]}}}
//!     }
//! }))
//! .unwrap();
//!
//! assert_eq!(record.id(), Some("abc"));
//! assert!(matches!(record.tree(), MessageTree::Graph(_)));
//! ```
//!
//! # Serialization
//!
//! A record serializes back to exactly the object it was read from, with
//! every field (interpreted or not) in its original order.
//!
//! ```
//! use convopack::Record;
//! use serde_json::json;
//!
//! let source = json!({"title": "T", "update_time": 5, "moderation_results": []});
//! let record = Record::from_value(source.clone()).unwrap();
//! assert_eq!(serde_json::to_value(&record)?, source);
//! # Ok::<(), serde_json::Error>(())
//! ```

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::core::timestamp::Timestamp;

/// Role used when a message does not name its author.
pub const UNKNOWN_ROLE: &str = "unknown";

/// One conversation.
///
/// Interpreted fields are read-only; the source object is kept for
/// serialization.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    id: Option<String>,
    title: Option<String>,
    create_time: Timestamp,
    current_node: Option<String>,
    tree: MessageTree,
    source: Map<String, Value>,
}

/// The message structure of a [`Record`].
#[derive(Debug, Clone, PartialEq, Default)]
pub enum MessageTree {
    /// `mapping` form, entries in source order. `None` marks a null or non-object node.
    Graph(Vec<(String, Option<Node>)>),
    /// `messages` form.
    List(Vec<FlatMessage>),
    /// Neither field, or a field of an unrecognized shape.
    #[default]
    Absent,
}

/// One node of a graph-form conversation.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Node {
    /// Parent node id, `None` for a root.
    pub parent: Option<String>,
    /// Child node ids, in source order.
    pub children: Vec<String>,
    /// Message payload, `None` when absent or not an object.
    pub message: Option<NodeMessage>,
}

/// The message carried by a graph [`Node`].
#[derive(Debug, Clone, PartialEq)]
pub struct NodeMessage {
    /// `author.role`, `"unknown"` if missing.
    pub role: String,
    /// String entries of `content.parts`, in order. Non-string parts are dropped.
    pub parts: Vec<String>,
}

/// One entry of a list-form conversation.
#[derive(Debug, Clone, PartialEq)]
pub struct FlatMessage {
    /// `role`, `"unknown"` if missing.
    pub role: String,
    /// `content` as a string, or the first of its `parts`.
    pub content: String,
}

impl Record {
    /// Builds a record from any JSON value. Returns `None` if it is not an object.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self::from_map(map)),
            _ => None,
        }
    }

    /// Builds a record from a JSON object.
    pub fn from_map(source: Map<String, Value>) -> Self {
        let id = source.get("id").and_then(scalar_string);
        let title = source
            .get("title")
            .and_then(Value::as_str)
            .filter(|t| !t.is_empty())
            .map(ToString::to_string);
        let create_time = Timestamp::from_value(source.get("create_time"));
        let current_node = source
            .get("current_node")
            .and_then(Value::as_str)
            .map(ToString::to_string);

        // `mapping` wins whenever the key exists, even if its value is unusable.
        let body = source.get("mapping").or_else(|| source.get("messages"));
        let tree = body.map(MessageTree::from_value).unwrap_or_default();

        Self {
            id,
            title,
            create_time,
            current_node,
            tree,
            source,
        }
    }

    /// Conversation id, stringified if numeric.
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Title, `None` if absent or empty.
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Title, or `Conversation <position>` if the record has none or it is blank.
    pub fn title_or(&self, position: usize) -> String {
        match self.title() {
            Some(title) if !title.trim().is_empty() => title.to_string(),
            _ => format!("Conversation {position}"),
        }
    }

    /// Creation time.
    pub fn create_time(&self) -> &Timestamp {
        &self.create_time
    }

    /// Id of the node the conversation was last viewed at.
    pub fn current_node(&self) -> Option<&str> {
        self.current_node.as_deref()
    }

    /// Message structure.
    pub fn tree(&self) -> &MessageTree {
        &self.tree
    }

    /// The source object.
    pub fn source(&self) -> &Map<String, Value> {
        &self.source
    }

    /// Key used to spot the same conversation across archives.
    ///
    /// `id`, else `title`, else `create_time`; `None` means the record has no
    /// identity and is never treated as a duplicate.
    pub fn identity_key(&self) -> Option<&str> {
        self.id()
            .filter(|s| !s.is_empty())
            .or_else(|| self.title())
            .or_else(|| self.create_time.identity())
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.source.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Record {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Map::deserialize(deserializer).map(Record::from_map)
    }
}

impl MessageTree {
    /// Dispatches on the JSON shape of a `mapping`/`messages` value.
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Object(nodes) => MessageTree::Graph(
                nodes
                    .iter()
                    .map(|(id, node)| (id.clone(), Node::from_value(node)))
                    .collect(),
            ),
            Value::Array(entries) => MessageTree::List(
                entries
                    .iter()
                    .filter_map(FlatMessage::from_value)
                    .collect(),
            ),
            _ => MessageTree::Absent,
        }
    }

    /// Returns `true` if there is no message structure at all.
    pub fn is_absent(&self) -> bool {
        matches!(self, MessageTree::Absent)
    }
}

impl Node {
    /// Reads a node. Returns `None` for null and non-object values.
    pub fn from_value(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;
        Some(Self {
            parent: obj
                .get("parent")
                .and_then(Value::as_str)
                .map(ToString::to_string),
            children: obj
                .get("children")
                .and_then(Value::as_array)
                .map(|ids| {
                    ids.iter()
                        .filter_map(Value::as_str)
                        .map(ToString::to_string)
                        .collect()
                })
                .unwrap_or_default(),
            message: obj
                .get("message")
                .and_then(Value::as_object)
                .map(NodeMessage::from_object),
        })
    }
}

impl NodeMessage {
    fn from_object(obj: &Map<String, Value>) -> Self {
        let role = obj
            .get("author")
            .and_then(|a| a.get("role"))
            .and_then(Value::as_str)
            .unwrap_or(UNKNOWN_ROLE)
            .to_string();
        let parts = obj
            .get("content")
            .and_then(|c| c.get("parts"))
            .and_then(Value::as_array)
            .map(|parts| {
                parts
                    .iter()
                    .filter_map(Value::as_str)
                    .map(ToString::to_string)
                    .collect()
            })
            .unwrap_or_default();
        Self { role, parts }
    }
}

impl FlatMessage {
    /// Reads a list entry. Returns `None` for non-object entries.
    pub fn from_value(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;
        let role = obj
            .get("role")
            .and_then(Value::as_str)
            .unwrap_or(UNKNOWN_ROLE)
            .to_string();
        let content = match obj.get("content") {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Object(c)) => c
                .get("parts")
                .and_then(Value::as_array)
                .and_then(|parts| parts.first())
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            _ => String::new(),
        };
        Some(Self { role, content })
    }
}

/// Strings as-is, numbers stringified, everything else ignored.
fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
