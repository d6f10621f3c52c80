//! Structured-document (JSON) representation
//!
//! Each node is either `{order, messages: {...}}` for a table or
//! `{order, message, suffix}` for a leaf. Map keys are display names only;
//! the `order` field is authoritative for sibling order.

use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use serde_json::{json, Value};
use tracing::debug;

use crate::error::{Error, Result};
use crate::locale::Locale;
use crate::message::{Message, MessageContainer, MessageTable};

use super::{child_name, suffix_from_hex, suffix_hex};

/// Write a container out as a JSON document.
///
/// # Errors
///
/// Returns an IO or serialization error.
pub fn export_json(container: &MessageContainer, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();

    let mut doc: IndexMap<String, Value> = IndexMap::new();
    for (i, (name, table)) in container
        .table_names()
        .iter()
        .zip(container.root().tables())
        .enumerate()
    {
        doc.insert(
            name.clone(),
            json!({ "order": i, "messages": table_value(table)? }),
        );
    }

    fs::write(path, serde_json::to_string_pretty(&doc)?)?;
    debug!(path = %path.display(), "exported JSON document");
    Ok(())
}

fn table_value(table: &MessageTable) -> Result<Value> {
    let mut map: IndexMap<String, Value> = IndexMap::new();

    if !table.tables().is_empty() {
        let count = table.tables().len();
        for (i, subtable) in table.tables().iter().enumerate() {
            map.insert(
                child_name(i, count),
                json!({ "order": i, "messages": table_value(subtable)? }),
            );
        }
    } else {
        let count = table.messages().len();
        for (i, message) in table.messages().iter().enumerate() {
            map.insert(
                child_name(i, count),
                json!({
                    "order": i,
                    "message": message.text,
                    "suffix": suffix_hex(&message.suffix),
                }),
            );
        }
    }

    Ok(serde_json::to_value(map)?)
}

/// Rebuild a container from a JSON document.
///
/// Top-level keys are not carried over as table names; like every import,
/// the result is renamed on the next extraction.
///
/// # Errors
///
/// Returns [`Error::InvalidDocument`] when a node matches neither the table
/// nor the leaf shape, or `order` values are missing or break the 0..N
/// sibling sequence.
pub fn import_json(path: impl AsRef<Path>, locale: Locale) -> Result<MessageContainer> {
    let text = fs::read_to_string(path)?;
    let doc: Value = serde_json::from_str(&text)?;
    let top = doc
        .as_object()
        .ok_or_else(|| Error::InvalidDocument("document root is not an object".into()))?;

    let mut root = MessageTable::new(0);
    for node in sorted_children(top.values())? {
        if !is_table_node(node) {
            return Err(Error::InvalidDocument(
                "top-level node is not a table".into(),
            ));
        }
        let mut table = MessageTable::new(node_order(node)?);
        read_node(node, &mut table, locale)?;
        root.add_table(table)?;
    }

    Ok(MessageContainer::from_root(root, None, locale))
}

fn read_node(node: &Value, parent: &mut MessageTable, locale: Locale) -> Result<()> {
    let children = node
        .get("messages")
        .and_then(Value::as_object)
        .ok_or_else(|| Error::InvalidDocument("table node without a messages map".into()))?;

    for child in sorted_children(children.values())? {
        if is_table_node(child) {
            let mut table = MessageTable::new(node_order(child)?);
            read_node(child, &mut table, locale)?;
            parent.add_table(table)?;
        } else if is_message_node(child) {
            parent.add_message(read_message(child, locale)?)?;
        } else {
            return Err(Error::InvalidDocument(
                "node is neither a table nor a message".into(),
            ));
        }
    }

    Ok(())
}

fn read_message(node: &Value, locale: Locale) -> Result<Message> {
    let order = node_order(node)?;
    let text = node
        .get("message")
        .and_then(Value::as_str)
        .ok_or_else(|| Error::InvalidDocument("message node without text".into()))?;
    let suffix = node
        .get("suffix")
        .and_then(Value::as_str)
        .ok_or_else(|| Error::InvalidDocument("message node without suffix".into()))?;
    Ok(Message::from_text(
        order,
        text,
        locale,
        suffix_from_hex(suffix)?,
    ))
}

fn sorted_children<'a>(values: impl Iterator<Item = &'a Value>) -> Result<Vec<&'a Value>> {
    let mut children: Vec<(usize, &Value)> = values
        .map(|v| node_order(v).map(|o| (o, v)))
        .collect::<Result<_>>()?;
    children.sort_by_key(|(order, _)| *order);
    Ok(children.into_iter().map(|(_, v)| v).collect())
}

fn node_order(node: &Value) -> Result<usize> {
    node.get("order")
        .and_then(Value::as_u64)
        .map(|o| o as usize)
        .ok_or_else(|| Error::InvalidDocument("node without a numeric order".into()))
}

fn is_table_node(node: &Value) -> bool {
    node.get("messages").is_some()
}

fn is_message_node(node: &Value) -> bool {
    node.get("message").is_some() && node.get("suffix").is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn sample_container() -> MessageContainer {
        let mut table0 = MessageTable::new(0);
        table0
            .add_message(Message::from_text(0, "Hello\nthere", Locale::En, b"\xFF".to_vec()))
            .unwrap();

        let mut inner = MessageTable::new(0);
        inner
            .add_message(Message::from_text(0, "Deep", Locale::En, b"\xFA\xFF".to_vec()))
            .unwrap();
        let mut table1 = MessageTable::new(1);
        table1.add_table(inner).unwrap();

        let mut root = MessageTable::new(0);
        root.add_table(table0).unwrap();
        root.add_table(table1).unwrap();
        MessageContainer::from_root(root, None, Locale::En)
    }

    #[test]
    fn test_json_roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("messages.json");
        let container = sample_container();

        export_json(&container, &path).unwrap();
        let imported = import_json(&path, Locale::En).unwrap();
        assert!(container.content_eq(&imported));
    }

    #[test]
    fn test_json_shape() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("messages.json");
        export_json(&sample_container(), &path).unwrap();

        let doc: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        let leaf = &doc["0"]["messages"]["0000"];
        assert_eq!(leaf["order"], 0);
        assert_eq!(leaf["message"], "Hello\nthere");
        assert_eq!(leaf["suffix"], "ff");
    }

    #[test]
    fn test_order_beats_key_names() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("messages.json");
        // keys deliberately disagree with the order fields
        let doc = json!({
            "zz": { "order": 0, "messages": {
                "b": { "order": 1, "message": "second", "suffix": "ff" },
                "a": { "order": 0, "message": "first", "suffix": "ff" },
            }},
        });
        fs::write(&path, serde_json::to_string(&doc).unwrap()).unwrap();

        let imported = import_json(&path, Locale::En).unwrap();
        let messages = imported.root().tables()[0].messages();
        assert_eq!(messages[0].text, "first");
        assert_eq!(messages[1].text, "second");
    }

    #[test]
    fn test_malformed_node_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("messages.json");
        let doc = json!({
            "00": { "order": 0, "messages": {
                "0000": { "order": 0, "message": "text without suffix" },
            }},
        });
        fs::write(&path, serde_json::to_string(&doc).unwrap()).unwrap();

        let err = import_json(&path, Locale::En).unwrap_err();
        assert!(matches!(err, Error::InvalidDocument(_)));
    }
}
