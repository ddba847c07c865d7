//! Projects a conversation's message structure into a linear transcript.
//!
//! # Modes
//!
//! | Mode | Graph form | List form |
//! |------|-----------|-----------|
//! | [`InsertionOrder`](FlattenMode::InsertionOrder) | every node, in `mapping` order | entries in order |
//! | [`MainLine`](FlattenMode::MainLine) | root → current leaf only | entries in order |
//!
//! `InsertionOrder` is the default. It does not follow parent links, so a
//! conversation with regenerated answers shows every branch, in the order
//! the export lists its nodes.
//!
//! # Example
//!
//! ```
//! use convopack::core::flatten::{Turn, flatten};
//! use convopack::Record;
//! use serde_json::json;
//!
//! let record = Record::from_value(json!({
//!     "messages": [{"role": "assistant", "content": {"parts": ["ok"]}}]
//! }))
//! .unwrap();
//!
//! assert_eq!(flatten(&record), vec![Turn::new("assistant", "ok")]);
//! ```

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::record::{MessageTree, Node, Record};

/// One rendered message: who spoke and what they said.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    pub role: String,
    pub text: String,
}

impl Turn {
    pub fn new(role: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            text: text.into(),
        }
    }
}

/// How graph-form conversations are linearized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FlattenMode {
    /// Every node in collection order, all branches included.
    #[default]
    InsertionOrder,
    /// Only the path from the root to the current leaf.
    MainLine,
}

impl std::fmt::Display for FlattenMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FlattenMode::InsertionOrder => write!(f, "insertion order"),
            FlattenMode::MainLine => write!(f, "main line"),
        }
    }
}

/// Flattens a record in [`FlattenMode::InsertionOrder`].
pub fn flatten(record: &Record) -> Vec<Turn> {
    flatten_with(record, FlattenMode::InsertionOrder)
}

/// Flattens a record in the given mode.
pub fn flatten_with(record: &Record, mode: FlattenMode) -> Vec<Turn> {
    match (record.tree(), mode) {
        (MessageTree::Graph(nodes), FlattenMode::InsertionOrder) => graph_turns(nodes.iter()),
        (MessageTree::Graph(nodes), FlattenMode::MainLine) => {
            match main_line(nodes, record.current_node()) {
                Some(path) => graph_turns(path.into_iter()),
                None => graph_turns(nodes.iter()),
            }
        }
        (MessageTree::List(entries), _) => entries
            .iter()
            .filter(|m| !m.content.trim().is_empty())
            .map(|m| Turn::new(m.role.clone(), m.content.clone()))
            .collect(),
        (MessageTree::Absent, _) => Vec::new(),
    }
}

fn graph_turns<'a>(nodes: impl Iterator<Item = &'a (String, Option<Node>)>) -> Vec<Turn> {
    nodes
        .filter_map(|(_, node)| node.as_ref()?.message.as_ref())
        .flat_map(|msg| {
            msg.parts
                .iter()
                .filter(|part| !part.trim().is_empty())
                .map(move |part| Turn::new(msg.role.clone(), part.clone()))
        })
        .collect()
}

/// Root-to-leaf path through the mapping, or `None` if no path exists.
///
/// Walks up from `current` when it names a node, otherwise walks down from
/// the first root taking the last child at every fork.
fn main_line<'a>(
    nodes: &'a [(String, Option<Node>)],
    current: Option<&str>,
) -> Option<Vec<&'a (String, Option<Node>)>> {
    let index: HashMap<&str, &'a (String, Option<Node>)> =
        nodes.iter().map(|entry| (entry.0.as_str(), entry)).collect();
    let mut seen = HashSet::new();
    let mut path = Vec::new();

    let current = current.filter(|id| index.get(id).is_some_and(|entry| entry.1.is_some()));

    if let Some(leaf) = current {
        let mut cursor = Some(leaf);
        while let Some(id) = cursor {
            let Some(entry) = index.get(id) else { break };
            if !seen.insert(id) {
                break;
            }
            path.push(*entry);
            cursor = entry.1.as_ref().and_then(|n| n.parent.as_deref());
        }
        path.reverse();
    } else {
        let root = nodes.iter().find(|(_, node)| {
            node.as_ref().is_some_and(|n| {
                n.parent
                    .as_deref()
                    .is_none_or(|parent| !index.contains_key(parent))
            })
        })?;
        let mut cursor = Some(root);
        while let Some(entry) = cursor {
            if !seen.insert(entry.0.as_str()) {
                break;
            }
            path.push(entry);
            cursor = entry.1.as_ref().and_then(|n| {
                n.children
                    .iter()
                    .rev()
                    .find_map(|child| index.get(child.as_str()).copied())
            });
        }
    }

    (!path.is_empty()).then_some(path)
}
