//! Message tree model: leaf messages and the recursive table structure
//!
//! A container blob is a tree of offset tables. Every table holds either
//! child tables or leaf messages, never both; a leaf is encoded text followed
//! by a suffix run of filler/terminator bytes.

mod parser;

pub use parser::MessageContainer;

use crate::charset::{Charset, SUFFIX_FILLER, SUFFIX_TERMINATOR};
use crate::error::{Error, Result};
use crate::locale::Locale;

/// A leaf text unit of a message container.
#[derive(Debug, Clone)]
pub struct Message {
    /// Sibling order within the parent table.
    pub number: usize,
    /// Start offset in the source blob; `None` for authored messages.
    pub offset: Option<u32>,
    /// Byte length including the suffix. Zero until encoded or parsed.
    pub size: u32,
    /// The locale the message text is encoded for.
    pub locale: Locale,
    /// Decoded display text.
    pub text: String,
    /// Raw trailing filler/terminator bytes, appended verbatim on encode.
    pub suffix: Vec<u8>,
    /// Cached encoded payload (excluding the suffix).
    pub data: Vec<u8>,
}

impl Message {
    /// Create an authored message from display text.
    ///
    /// The payload cache stays empty until the message is encoded as part of
    /// a table; unknown tokens surface there as [`Error::NoEncoding`].
    #[must_use]
    pub fn from_text(
        number: usize,
        text: impl Into<String>,
        locale: Locale,
        suffix: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            number,
            offset: None,
            size: 0,
            locale,
            text: text.into(),
            suffix: suffix.into(),
            data: Vec::new(),
        }
    }

    /// Decode a message from its raw blob bytes.
    ///
    /// Splits off the trailing suffix, decodes the payload, then re-encodes
    /// it so `data` and `size` hold the canonical encoding of the text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoEncoding`] if the decoded text fails to re-encode.
    pub fn from_data(
        number: usize,
        offset: u32,
        raw: &[u8],
        locale: Locale,
        charset: &Charset,
    ) -> Result<Self> {
        let (payload, suffix) = split_suffix(raw);
        let text = charset.decode(payload, locale.is_packed());
        let data = charset.encode(&text)?;
        let size = (data.len() + suffix.len()) as u32;
        Ok(Self {
            number,
            offset: Some(offset),
            size,
            locale,
            text,
            suffix: suffix.to_vec(),
            data,
        })
    }

    /// Parser-side stub carrying only order and offset; filled in by the
    /// sizing pass once the whole tree is known.
    pub(crate) fn placeholder(number: usize, offset: u32, locale: Locale) -> Self {
        Self {
            number,
            offset: Some(offset),
            size: 0,
            locale,
            text: String::new(),
            suffix: Vec::new(),
            data: Vec::new(),
        }
    }

    /// Encode the message back into blob bytes: payload plus stored suffix.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoEncoding`] naming the first unresolvable token.
    pub fn encode(&self, charset: &Charset) -> Result<Vec<u8>> {
        let mut out = charset.encode(&self.text)?;
        out.extend_from_slice(&self.suffix);
        Ok(out)
    }

    /// True if both byte ranges `[offset, offset + size)` intersect.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        match (self.offset, other.offset) {
            (Some(a), Some(b)) => {
                self.size > 0 && other.size > 0 && a < b + other.size && b < a + self.size
            }
            _ => false,
        }
    }

    /// Structural equality: same order, text and suffix.
    #[must_use]
    pub fn content_eq(&self, other: &Self) -> bool {
        self.number == other.number && self.text == other.text && self.suffix == other.suffix
    }
}

/// Messages are equal when they describe the same blob range.
impl PartialEq for Message {
    fn eq(&self, other: &Self) -> bool {
        self.offset == other.offset && self.size == other.size
    }
}

/// Split raw message bytes into payload and suffix.
///
/// The suffix is the maximal trailing run of an optional filler byte followed
/// by terminator bytes. The match is greedy on purpose: payload bytes that
/// happen to end in terminator values become suffix, byte-compatible with
/// the shipped containers.
#[must_use]
pub fn split_suffix(raw: &[u8]) -> (&[u8], &[u8]) {
    let mut cut = raw.len();
    while cut > 0 && raw[cut - 1] == SUFFIX_TERMINATOR {
        cut -= 1;
    }
    if cut > 0 && raw[cut - 1] == SUFFIX_FILLER {
        cut -= 1;
    }
    raw.split_at(cut)
}

/// What a table holds: nothing yet, child tables, or leaf messages.
#[derive(Debug, Clone)]
enum TableEntries {
    Empty,
    Tables(Vec<MessageTable>),
    Messages(Vec<Message>),
}

/// A node of the container tree.
#[derive(Debug, Clone)]
pub struct MessageTable {
    /// Sibling order within the parent table.
    pub number: usize,
    /// Start offset in the source blob; `None` for authored tables.
    pub offset: Option<u32>,
    /// Size spanned in the source blob; zero for authored tables.
    pub size: u32,
    entries: TableEntries,
}

impl MessageTable {
    /// Create an empty authored table.
    #[must_use]
    pub fn new(number: usize) -> Self {
        Self {
            number,
            offset: None,
            size: 0,
            entries: TableEntries::Empty,
        }
    }

    /// Parser-side constructor carrying the source layout.
    pub(crate) fn parsed(number: usize, offset: u32, size: u32) -> Self {
        Self {
            number,
            offset: Some(offset),
            size,
            entries: TableEntries::Empty,
        }
    }

    /// Child tables, or an empty slice for leaf-holding tables.
    #[must_use]
    pub fn tables(&self) -> &[MessageTable] {
        match &self.entries {
            TableEntries::Tables(tables) => tables,
            _ => &[],
        }
    }

    /// Leaf messages, or an empty slice for table-holding tables.
    #[must_use]
    pub fn messages(&self) -> &[Message] {
        match &self.entries {
            TableEntries::Messages(messages) => messages,
            _ => &[],
        }
    }

    /// Number of direct children of either kind.
    #[must_use]
    pub fn len(&self) -> usize {
        match &self.entries {
            TableEntries::Empty => 0,
            TableEntries::Tables(tables) => tables.len(),
            TableEntries::Messages(messages) => messages.len(),
        }
    }

    /// True while the table holds no children of either kind.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Append a child table.
    ///
    /// # Errors
    ///
    /// [`Error::MixedTableChildren`] if the table already holds messages,
    /// [`Error::SiblingOrder`] if the child's number breaks the 0..N order.
    pub fn add_table(&mut self, table: MessageTable) -> Result<()> {
        let expected = self.len();
        if table.number != expected {
            return Err(Error::SiblingOrder {
                expected,
                found: table.number,
            });
        }
        match &mut self.entries {
            TableEntries::Messages(_) => Err(Error::MixedTableChildren),
            TableEntries::Tables(tables) => {
                tables.push(table);
                Ok(())
            }
            TableEntries::Empty => {
                self.entries = TableEntries::Tables(vec![table]);
                Ok(())
            }
        }
    }

    /// Append a leaf message.
    ///
    /// # Errors
    ///
    /// [`Error::MixedTableChildren`] if the table already holds subtables,
    /// [`Error::SiblingOrder`] if the message's number breaks the 0..N order.
    pub fn add_message(&mut self, message: Message) -> Result<()> {
        let expected = self.len();
        if message.number != expected {
            return Err(Error::SiblingOrder {
                expected,
                found: message.number,
            });
        }
        match &mut self.entries {
            TableEntries::Tables(_) => Err(Error::MixedTableChildren),
            TableEntries::Messages(messages) => {
                messages.push(message);
                Ok(())
            }
            TableEntries::Empty => {
                self.entries = TableEntries::Messages(vec![message]);
                Ok(())
            }
        }
    }

    pub(crate) fn tables_mut(&mut self) -> &mut [MessageTable] {
        match &mut self.entries {
            TableEntries::Tables(tables) => tables,
            _ => &mut [],
        }
    }

    pub(crate) fn messages_mut(&mut self) -> &mut [Message] {
        match &mut self.entries {
            TableEntries::Messages(messages) => messages,
            _ => &mut [],
        }
    }

    /// Encode the subtree into blob bytes starting at `base_offset`.
    ///
    /// Reserves the leading offset array, encodes every child in stored
    /// order, then patches the array with the children's absolute offsets.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoEncoding`] if any descendant message fails.
    pub fn encode(&self, base_offset: u32, charset: &Charset) -> Result<Vec<u8>> {
        let count = self.len();
        let mut out = vec![0u8; count * 4];
        let mut cursor = base_offset + (count as u32) * 4;
        let mut offsets = Vec::with_capacity(count);

        match &self.entries {
            TableEntries::Empty => {}
            TableEntries::Tables(tables) => {
                for table in tables {
                    offsets.push(cursor);
                    let encoded = table.encode(cursor, charset)?;
                    cursor += encoded.len() as u32;
                    out.extend_from_slice(&encoded);
                }
            }
            TableEntries::Messages(messages) => {
                for message in messages {
                    offsets.push(cursor);
                    let encoded = message.encode(charset)?;
                    cursor += encoded.len() as u32;
                    out.extend_from_slice(&encoded);
                }
            }
        }

        for (i, offset) in offsets.iter().enumerate() {
            out[i * 4..i * 4 + 4].copy_from_slice(&offset.to_le_bytes());
        }

        Ok(out)
    }

    /// True if both tables span intersecting blob ranges.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        match (self.offset, other.offset) {
            (Some(a), Some(b)) => {
                self.size > 0 && other.size > 0 && a < b + other.size && b < a + self.size
            }
            _ => false,
        }
    }

    /// Structural equality over order, text and suffix, ignoring offsets.
    #[must_use]
    pub fn content_eq(&self, other: &Self) -> bool {
        if self.number != other.number {
            return false;
        }
        match (&self.entries, &other.entries) {
            (TableEntries::Empty, TableEntries::Empty) => true,
            (TableEntries::Tables(a), TableEntries::Tables(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.content_eq(y))
            }
            (TableEntries::Messages(a), TableEntries::Messages(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.content_eq(y))
            }
            _ => false,
        }
    }

    /// Collect every message of the subtree whose text contains `needle`,
    /// case-insensitively.
    pub fn find_messages_containing<'a>(&'a self, needle: &str, results: &mut Vec<&'a Message>) {
        let needle = needle.to_lowercase();
        self.collect_matches(&needle, results);
    }

    fn collect_matches<'a>(&'a self, lowered: &str, results: &mut Vec<&'a Message>) {
        for table in self.tables() {
            table.collect_matches(lowered, results);
        }
        for message in self.messages() {
            if message.text.to_lowercase().contains(lowered) {
                results.push(message);
            }
        }
    }
}
