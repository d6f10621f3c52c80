//! Container parsing: inferring the table tree from a flat blob
//!
//! The format carries no counts or type tags. Structure is inferred from the
//! dword offsets alone: a region is a table when every offset it lists stays
//! inside the file and above the region's own start; anything that fails the
//! scan is a leaf message. Leaf sizes depend on the offsets of *every* table
//! discovered anywhere in the tree, so sizing runs as a second pass over the
//! accumulated boundary set once the whole tree is known.

use tracing::debug;

use crate::charset::Charset;
use crate::error::{Error, Result};
use crate::locale::Locale;

use super::{Message, MessageTable};

/// A parsed (or imported) message container: the table tree plus the names
/// of its top-level tables.
#[derive(Debug, Clone)]
pub struct MessageContainer {
    root: MessageTable,
    table_names: Vec<String>,
    locale: Locale,
}

impl MessageContainer {
    /// Parse a container blob starting at offset 0.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoMessageTables`] if the blob does not open with a
    /// valid offset table.
    pub fn parse(blob: &[u8], locale: Locale) -> Result<Self> {
        Self::parse_named(blob, locale, None)
    }

    /// Parse a container blob, naming its top-level tables.
    ///
    /// `names` is used when its length matches the number of top-level
    /// tables; otherwise zero-padded numbers are generated.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoMessageTables`] if the blob does not open with a
    /// valid offset table.
    pub fn parse_named(blob: &[u8], locale: Locale, names: Option<Vec<String>>) -> Result<Self> {
        Self::parse_at(blob, 0, locale, names)
    }

    /// Parse a container blob whose root table starts at `root_offset`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoMessageTables`] if no valid table starts there.
    pub fn parse_at(
        blob: &[u8],
        root_offset: u32,
        locale: Locale,
        names: Option<Vec<String>>,
    ) -> Result<Self> {
        let mut boundaries = Vec::new();
        let mut root = parse_table(blob, 0, root_offset, locale, &mut boundaries)?
            .ok_or(Error::NoMessageTables)?;

        // the boundary set is only complete after the whole tree is walked
        boundaries.push(blob.len() as u32);
        boundaries.sort_unstable();
        boundaries.dedup();

        let charset = locale.config().font.charset();
        size_and_decode(&mut root, blob, &boundaries, &charset)?;

        debug!(
            tables = root.tables().len(),
            boundaries = boundaries.len(),
            "parsed message container"
        );

        Ok(Self::assemble(root, names, locale))
    }

    /// Wrap an authored root table, e.g. one rebuilt from an export.
    #[must_use]
    pub fn from_root(root: MessageTable, names: Option<Vec<String>>, locale: Locale) -> Self {
        Self::assemble(root, names, locale)
    }

    fn assemble(root: MessageTable, names: Option<Vec<String>>, locale: Locale) -> Self {
        let count = root.tables().len();
        let table_names = match names {
            Some(names) if names.len() == count => names,
            _ => default_names(count),
        };
        Self {
            root,
            table_names,
            locale,
        }
    }

    /// The root table of the container.
    #[must_use]
    pub fn root(&self) -> &MessageTable {
        &self.root
    }

    /// Names of the top-level tables, aligned with `root().tables()`.
    #[must_use]
    pub fn table_names(&self) -> &[String] {
        &self.table_names
    }

    #[must_use]
    pub fn locale(&self) -> Locale {
        self.locale
    }

    /// Look up a top-level table by its name.
    #[must_use]
    pub fn table_by_name(&self, name: &str) -> Option<&MessageTable> {
        let idx = self.table_names.iter().position(|n| n == name)?;
        self.root.tables().get(idx)
    }

    /// Encode the whole tree back into a container blob.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoEncoding`] if any message text fails to encode.
    pub fn encode(&self) -> Result<Vec<u8>> {
        let charset = self.locale.config().font.charset();
        self.root.encode(0, &charset)
    }

    /// All messages whose text contains `needle`, case-insensitively.
    #[must_use]
    pub fn find_messages_containing(&self, needle: &str) -> Vec<&Message> {
        let mut results = Vec::new();
        self.root.find_messages_containing(needle, &mut results);
        results
    }

    /// Structural equality over order, text and suffix, ignoring offsets
    /// and table names.
    #[must_use]
    pub fn content_eq(&self, other: &Self) -> bool {
        self.root.content_eq(&other.root)
    }
}

/// Zero-padded decimal names for unnamed top-level tables.
fn default_names(count: usize) -> Vec<String> {
    let width = count.to_string().len();
    (0..count).map(|i| format!("{i:0width$}")).collect()
}

/// Scan a candidate offset table at `offset`.
///
/// Reads little-endian dwords while the read position stays below the
/// running ceiling (the smallest offset collected so far, capped by the file
/// size). Returns the collected offsets and the table's span, or `None` when
/// the region is not a table: an offset past the file end, an offset below
/// the table's own start, or a scan running into the last dword of the file.
fn scan_table(blob: &[u8], offset: u32) -> Option<(Vec<u32>, u32)> {
    let file_size = blob.len() as u32;
    let mut ceiling = file_size;
    let mut pos = offset;
    let mut entries = Vec::new();

    loop {
        if !entries.is_empty() && ceiling <= pos {
            break;
        }
        if pos.checked_add(4)? as usize >= blob.len() {
            return None;
        }
        let raw: [u8; 4] = blob[pos as usize..pos as usize + 4].try_into().ok()?;
        let address = u32::from_le_bytes(raw);
        pos += 4;

        ceiling = ceiling.min(address);
        if address > file_size || ceiling < offset {
            return None;
        }
        entries.push(address);
    }

    Some((entries, ceiling - offset))
}

/// Recursively parse the table at `offset`, accumulating every discovered
/// start offset into `boundaries`. Child offsets that fail the table scan
/// are registered as leaf messages instead.
fn parse_table(
    blob: &[u8],
    number: usize,
    offset: u32,
    locale: Locale,
    boundaries: &mut Vec<u32>,
) -> Result<Option<MessageTable>> {
    let Some((child_offsets, size)) = scan_table(blob, offset) else {
        return Ok(None);
    };

    let mut table = MessageTable::parsed(number, offset, size);
    boundaries.push(offset);

    for (n, child_offset) in child_offsets.into_iter().enumerate() {
        // a child listed at the table's own start cannot be a table; the
        // scan would reproduce this one and never terminate
        let subtable = if child_offset == offset {
            None
        } else {
            parse_table(blob, n, child_offset, locale, boundaries)?
        };
        match subtable {
            Some(subtable) => table.add_table(subtable)?,
            None => {
                table.add_message(Message::placeholder(n, child_offset, locale))?;
                boundaries.push(child_offset);
            }
        }
    }

    Ok(Some(table))
}

/// Second pass: size every leaf against the global boundary set, then decode
/// its bytes.
fn size_and_decode(
    table: &mut MessageTable,
    blob: &[u8],
    boundaries: &[u32],
    charset: &Charset,
) -> Result<()> {
    if !table.tables().is_empty() {
        for subtable in table.tables_mut() {
            size_and_decode(subtable, blob, boundaries, charset)?;
        }
        return Ok(());
    }

    for message in table.messages_mut() {
        let Some(offset) = message.offset else {
            // authored leaves carry no source bytes
            continue;
        };
        let next = boundaries
            .iter()
            .copied()
            .find(|b| *b > offset)
            .ok_or(Error::MessageBounds { offset })?;
        let raw = &blob[offset as usize..next as usize];
        *message = Message::from_data(message.number, offset, raw, message.locale, charset)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tree(locale: Locale) -> MessageTable {
        let mut table0 = MessageTable::new(0);
        table0
            .add_message(Message::from_text(0, "AB", locale, b"\xFA\xFF".to_vec()))
            .unwrap();
        table0
            .add_message(Message::from_text(1, "C", locale, b"\xFF".to_vec()))
            .unwrap();

        let mut table1 = MessageTable::new(1);
        table1
            .add_message(Message::from_text(0, "DE\n", locale, b"\xFF\xFF".to_vec()))
            .unwrap();

        let mut root = MessageTable::new(0);
        root.add_table(table0).unwrap();
        root.add_table(table1).unwrap();
        root
    }

    #[test]
    fn test_authored_tree_roundtrip() {
        let container =
            MessageContainer::from_root(sample_tree(Locale::En), None, Locale::En);
        let blob = container.encode().unwrap();

        let reparsed = MessageContainer::parse(&blob, Locale::En).unwrap();
        assert!(container.content_eq(&reparsed));

        let table0 = &reparsed.root().tables()[0];
        assert_eq!(table0.messages()[0].text, "AB");
        assert_eq!(table0.messages()[0].suffix, b"\xFA\xFF");
        assert_eq!(table0.messages()[1].text, "C");
        assert_eq!(reparsed.root().tables()[1].messages()[0].text, "DE\n");
    }

    #[test]
    fn test_reencode_is_byte_identical() {
        let container =
            MessageContainer::from_root(sample_tree(Locale::En), None, Locale::En);
        let blob = container.encode().unwrap();
        let reparsed = MessageContainer::parse(&blob, Locale::En).unwrap();
        assert_eq!(reparsed.encode().unwrap(), blob);
    }

    #[test]
    fn test_parsed_offsets_match_offset_table() {
        let container =
            MessageContainer::from_root(sample_tree(Locale::En), None, Locale::En);
        let blob = container.encode().unwrap();
        let reparsed = MessageContainer::parse(&blob, Locale::En).unwrap();

        // the root offset array names where each top-level table starts
        for (i, table) in reparsed.root().tables().iter().enumerate() {
            let at = i * 4;
            let listed = u32::from_le_bytes(blob[at..at + 4].try_into().unwrap());
            assert_eq!(table.offset, Some(listed));
        }

        // every leaf spans exactly up to the next boundary in the blob
        let table0 = &reparsed.root().tables()[0];
        let m0 = &table0.messages()[0];
        let m1 = &table0.messages()[1];
        assert_eq!(m0.offset.unwrap() + m0.size, m1.offset.unwrap());
    }

    #[test]
    fn test_garbage_is_rejected() {
        // an offset table whose first dword points past the file end
        let err = MessageContainer::parse(&[0xFF; 16], Locale::En).unwrap_err();
        assert!(matches!(err, Error::NoMessageTables));

        // too short to hold even one dword plus content
        let err = MessageContainer::parse(&[0x04, 0x00], Locale::En).unwrap_err();
        assert!(matches!(err, Error::NoMessageTables));
    }

    #[test]
    fn test_self_referential_offset_becomes_leaf() {
        // a dword of 0 at offset 0 lists the root table itself as a child
        let container = MessageContainer::parse(&[0u8; 8], Locale::En).unwrap();
        assert_eq!(container.root().messages().len(), 1);
    }

    #[test]
    fn test_scan_rejects_offset_below_table_start() {
        // second dword points before the table start
        let mut blob = Vec::new();
        blob.extend_from_slice(&12u32.to_le_bytes());
        blob.extend_from_slice(&0u32.to_le_bytes());
        blob.extend_from_slice(&[0xAA; 8]);
        assert_eq!(scan_table(&blob, 4), None);
    }

    #[test]
    fn test_table_names() {
        let container = MessageContainer::from_root(
            sample_tree(Locale::En),
            Some(vec!["STATUS".into(), "ITEMS".into()]),
            Locale::En,
        );
        assert_eq!(container.table_names(), ["STATUS", "ITEMS"]);
        assert!(container.table_by_name("ITEMS").is_some());
        assert!(container.table_by_name("CAMERA").is_none());

        // a mismatched name list falls back to generated numbers
        let container = MessageContainer::from_root(
            sample_tree(Locale::En),
            Some(vec!["ONLY_ONE".into()]),
            Locale::En,
        );
        assert_eq!(container.table_names(), ["0", "1"]);
    }

    #[test]
    fn test_find_messages_containing() {
        let container =
            MessageContainer::from_root(sample_tree(Locale::En), None, Locale::En);
        let hits = container.find_messages_containing("ab");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].text, "AB");
        assert!(container.find_messages_containing("zz").is_empty());
    }
}
