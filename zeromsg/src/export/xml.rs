//! Markup-document (XML) representation
//!
//! A `<localization>` root holds nested `<messages order name>` elements for
//! tables and `<message order name suffix>` leaves whose text carries line
//! breaks as literal `\n`. Shape violations are fatal on import.

use std::fs;
use std::io;
use std::path::Path;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use tracing::debug;

use crate::error::{Error, Result};
use crate::locale::Locale;
use crate::message::{Message, MessageContainer, MessageTable};

use super::{child_name, suffix_from_hex, suffix_hex};

const ROOT_TAG: &str = "localization";
const TABLE_TAG: &str = "messages";
const MESSAGE_TAG: &str = "message";

/// Write a container out as an XML document.
///
/// # Errors
///
/// Returns an IO or XML serialization error.
pub fn export_xml(container: &MessageContainer, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let mut output = Vec::new();
    let mut writer = Writer::new_with_indent(&mut output, b' ', 2);

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
    writer.write_event(Event::Start(BytesStart::new(ROOT_TAG)))?;

    for (i, (name, table)) in container
        .table_names()
        .iter()
        .zip(container.root().tables())
        .enumerate()
    {
        write_table(&mut writer, table, i, name)?;
    }

    writer.write_event(Event::End(BytesEnd::new(ROOT_TAG)))?;
    fs::write(path, output)?;

    debug!(path = %path.display(), "exported XML document");
    Ok(())
}

fn write_table<W: io::Write>(
    writer: &mut Writer<W>,
    table: &MessageTable,
    order: usize,
    name: &str,
) -> Result<()> {
    let mut tag = BytesStart::new(TABLE_TAG);
    tag.push_attribute(("order", order.to_string().as_str()));
    tag.push_attribute(("name", name));
    writer.write_event(Event::Start(tag))?;

    if !table.tables().is_empty() {
        let count = table.tables().len();
        for (i, subtable) in table.tables().iter().enumerate() {
            write_table(writer, subtable, i, &child_name(i, count))?;
        }
    } else {
        let count = table.messages().len();
        for (i, message) in table.messages().iter().enumerate() {
            let mut tag = BytesStart::new(MESSAGE_TAG);
            tag.push_attribute(("order", i.to_string().as_str()));
            tag.push_attribute(("name", child_name(i, count).as_str()));
            tag.push_attribute(("suffix", suffix_hex(&message.suffix).as_str()));
            writer.write_event(Event::Start(tag))?;
            // text always written, keeping the closing tag inline
            writer.write_event(Event::Text(BytesText::new(
                &message.text.replace('\n', "\\n"),
            )))?;
            writer.write_event(Event::End(BytesEnd::new(MESSAGE_TAG)))?;
        }
    }

    writer.write_event(Event::End(BytesEnd::new(TABLE_TAG)))?;
    Ok(())
}

/// Rebuild a container from an XML document.
///
/// # Errors
///
/// Returns [`Error::InvalidDocument`] when the root tag is wrong or any
/// element fails the table/message shape check, [`Error::InvalidSuffix`] for
/// bad suffix attributes, and [`Error::Xml`] for malformed markup.
pub fn import_xml(path: impl AsRef<Path>, locale: Locale) -> Result<MessageContainer> {
    let text = fs::read_to_string(path)?;
    let root = read_document(&text)?;

    if root.tag != ROOT_TAG {
        return Err(Error::InvalidDocument(format!(
            "unexpected root element <{}>",
            root.tag
        )));
    }

    let children = sorted_children(&root)?;
    let mut names = Vec::with_capacity(children.len());
    let mut tree = MessageTable::new(0);

    for child in children {
        if !is_table_element(child) {
            return Err(Error::InvalidDocument(
                "top-level element is not a messages table".into(),
            ));
        }
        names.push(child.attr_or_empty("name").to_owned());
        tree.add_table(build_table(child, locale)?)?;
    }

    Ok(MessageContainer::from_root(tree, Some(names), locale))
}

fn build_table(element: &RawElement, locale: Locale) -> Result<MessageTable> {
    let mut table = MessageTable::new(element.order()?);

    for child in sorted_children(element)? {
        if is_table_element(child) {
            table.add_table(build_table(child, locale)?)?;
        } else if is_message_element(child)? {
            let text = child.text.replace("\\n", "\n");
            let suffix = suffix_from_hex(child.attr_or_empty("suffix"))?;
            table.add_message(Message::from_text(child.order()?, text, locale, suffix))?;
        } else {
            return Err(Error::InvalidDocument(format!(
                "element <{}> is neither a table nor a message",
                child.tag
            )));
        }
    }

    Ok(table)
}

fn sorted_children(element: &RawElement) -> Result<Vec<&RawElement>> {
    let mut children: Vec<(usize, &RawElement)> = element
        .children
        .iter()
        .map(|c| c.order().map(|o| (o, c)))
        .collect::<Result<_>>()?;
    children.sort_by_key(|(order, _)| *order);
    Ok(children.into_iter().map(|(_, c)| c).collect())
}

fn is_table_element(element: &RawElement) -> bool {
    element.tag == TABLE_TAG
        && element.order().is_ok()
        && !element.attr_or_empty("name").is_empty()
}

fn is_message_element(element: &RawElement) -> Result<bool> {
    let shaped = element.tag == MESSAGE_TAG
        && element.order().is_ok()
        && !element.attr_or_empty("name").is_empty()
        && element.suffix.is_some();
    if !shaped {
        return Ok(false);
    }
    // the suffix must parse even when the message is otherwise well-formed
    suffix_from_hex(element.attr_or_empty("suffix")).map(|_| true)
}

/// A raw parsed element, shape-checked after the whole document is read.
#[derive(Debug, Default)]
struct RawElement {
    tag: String,
    order: Option<String>,
    name: Option<String>,
    suffix: Option<String>,
    text: String,
    children: Vec<RawElement>,
}

impl RawElement {
    fn from_tag(e: &BytesStart<'_>) -> Result<Self> {
        let mut element = RawElement {
            tag: String::from_utf8_lossy(e.name().as_ref()).into_owned(),
            ..RawElement::default()
        };
        for attr in e.attributes() {
            let attr = attr?;
            let value = String::from_utf8_lossy(&attr.value).into_owned();
            match attr.key.as_ref() {
                b"order" => element.order = Some(value),
                b"name" => element.name = Some(value),
                b"suffix" => element.suffix = Some(value),
                _ => {}
            }
        }
        Ok(element)
    }

    fn order(&self) -> Result<usize> {
        self.order
            .as_deref()
            .and_then(|o| o.parse().ok())
            .ok_or_else(|| {
                Error::InvalidDocument(format!("element <{}> without a numeric order", self.tag))
            })
    }

    fn attr_or_empty(&self, key: &str) -> &str {
        let slot = match key {
            "name" => &self.name,
            "suffix" => &self.suffix,
            _ => &self.order,
        };
        slot.as_deref().unwrap_or("")
    }
}

fn read_document(text: &str) -> Result<RawElement> {
    let mut reader = Reader::from_str(text);
    let mut buf = Vec::new();
    let mut stack: Vec<RawElement> = Vec::new();
    let mut root: Option<RawElement> = None;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => stack.push(RawElement::from_tag(&e)?),
            Ok(Event::Empty(e)) => {
                let element = RawElement::from_tag(&e)?;
                attach(&mut stack, &mut root, element)?;
            }
            Ok(Event::Text(e)) => {
                if let Some(top) = stack.last_mut() {
                    // indentation between child elements is not message text
                    if top.children.is_empty() {
                        top.text.push_str(&e.unescape()?);
                    }
                }
            }
            Ok(Event::End(_)) => {
                let element = stack.pop().ok_or_else(|| {
                    Error::InvalidDocument("unbalanced closing element".into())
                })?;
                attach(&mut stack, &mut root, element)?;
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(Error::Xml(e)),
            _ => {}
        }
        buf.clear();
    }

    root.ok_or_else(|| Error::InvalidDocument("empty document".into()))
}

fn attach(
    stack: &mut Vec<RawElement>,
    root: &mut Option<RawElement>,
    element: RawElement,
) -> Result<()> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(element);
    } else if root.is_none() {
        *root = Some(element);
    } else {
        return Err(Error::InvalidDocument(
            "multiple root elements".into(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn sample_container() -> MessageContainer {
        let mut table0 = MessageTable::new(0);
        table0
            .add_message(Message::from_text(0, "Line one\nLine two", Locale::En, b"\xFF".to_vec()))
            .unwrap();
        table0
            .add_message(Message::from_text(1, "", Locale::En, b"\xFA\xFF".to_vec()))
            .unwrap();

        let mut inner = MessageTable::new(0);
        inner
            .add_message(Message::from_text(0, "Deep <&> text", Locale::En, b"".to_vec()))
            .unwrap();
        let mut table1 = MessageTable::new(1);
        table1.add_table(inner).unwrap();

        let mut root = MessageTable::new(0);
        root.add_table(table0).unwrap();
        root.add_table(table1).unwrap();
        MessageContainer::from_root(root, Some(vec!["STATUS".into(), "EVENTS".into()]), Locale::En)
    }

    #[test]
    fn test_xml_roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("messages.xml");
        let container = sample_container();

        export_xml(&container, &path).unwrap();
        let imported = import_xml(&path, Locale::En).unwrap();

        assert!(container.content_eq(&imported));
        assert_eq!(imported.table_names(), ["STATUS", "EVENTS"]);
    }

    #[test]
    fn test_newlines_escape_to_literal_backslash_n() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("messages.xml");
        export_xml(&sample_container(), &path).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains(r"Line one\nLine two"));
    }

    #[test]
    fn test_order_attribute_governs() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("messages.xml");
        fs::write(
            &path,
            r#"<?xml version="1.0" encoding="utf-8"?>
<localization>
  <messages order="1" name="B">
    <message order="0" name="0000" suffix="ff">later</message>
  </messages>
  <messages order="0" name="A">
    <message order="0" name="0000" suffix="ff">earlier</message>
  </messages>
</localization>"#,
        )
        .unwrap();

        let imported = import_xml(&path, Locale::En).unwrap();
        assert_eq!(imported.table_names(), ["A", "B"]);
        assert_eq!(imported.root().tables()[0].messages()[0].text, "earlier");
    }

    #[test]
    fn test_shape_violation_is_fatal() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("messages.xml");
        fs::write(
            &path,
            r#"<localization>
  <messages order="0" name="A">
    <message order="0" name="0000">missing suffix</message>
  </messages>
</localization>"#,
        )
        .unwrap();

        let err = import_xml(&path, Locale::En).unwrap_err();
        assert!(matches!(err, Error::InvalidDocument(_)));
    }

    #[test]
    fn test_bad_suffix_hex_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("messages.xml");
        fs::write(
            &path,
            r#"<localization>
  <messages order="0" name="A">
    <message order="0" name="0000" suffix="zz">text</message>
  </messages>
</localization>"#,
        )
        .unwrap();

        let err = import_xml(&path, Locale::En).unwrap_err();
        assert!(matches!(err, Error::InvalidSuffix(_)));
    }
}
