//! Error types for `zeromsg`

use std::path::PathBuf;

use thiserror::Error;

/// The error type for `zeromsg` operations.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum Error {
    // ==================== IO Errors ====================
    /// IO error from file operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ==================== Container Format Errors ====================
    /// The blob does not start with a valid offset table.
    #[error("cannot find message tables")]
    NoMessageTables,

    /// A leaf message offset has no boundary above it to size against.
    #[error("message at offset {offset:#x} has no upper boundary")]
    MessageBounds {
        /// The unsizable leaf offset.
        offset: u32,
    },

    // ==================== Character Codec Errors ====================
    /// A text token has no encoding in any glyph table of the locale.
    #[error("no encoding found in language table for token {token:?}")]
    NoEncoding {
        /// The token that could not be encoded.
        token: String,
    },

    // ==================== Archive Errors ====================
    /// The index file length is not a whole number of entry records.
    #[error("invalid index length: {length} is not a multiple of 8")]
    InvalidIndexLength {
        /// The index file length in bytes.
        length: usize,
    },

    /// The TOC name list and the index disagree on entry count.
    #[error("entry count mismatch: {names} names, {entries} index entries")]
    EntryCountMismatch {
        /// Number of names in the TOC list.
        names: usize,
        /// Number of entries in the index.
        entries: usize,
    },

    /// An index entry extends past the end of the archive data.
    #[error("archive truncated: entries end at {expected:#x}, archive is {actual:#x} bytes")]
    ArchiveTruncated {
        /// Byte position the furthest entry ends at.
        expected: u64,
        /// Actual archive data size.
        actual: u64,
    },

    /// The named entry does not exist in the archive.
    #[error("entry not found in archive: {0}")]
    EntryNotFound(String),

    /// No alignment value lets the content fit the fixed slot.
    #[error("cannot find align value: need {required:#x} bytes, slot holds {available:#x}")]
    NoAlignmentFits {
        /// Smallest total the layout can reach (alignment 1).
        required: u64,
        /// The slot capacity.
        available: u64,
    },

    /// An entry size does not fit an index dword record.
    #[error("entry too large for index record: {size} bytes")]
    EntryTooLarge {
        /// The oversized entry's byte count.
        size: u64,
    },

    /// The requested alignment is not one of the supported values.
    #[error("invalid alignment: {align}")]
    InvalidAlignment {
        /// The rejected alignment value.
        align: u32,
    },

    /// A required archive file is missing on disk.
    #[error("archive file not found: {path}")]
    MissingArchiveFile {
        /// The expected path.
        path: PathBuf,
    },

    // ==================== Locator Errors ====================
    /// The executable image carries no recognizable name table.
    #[error("cannot find name table in executable image")]
    NameTableNotFound,

    // ==================== Consistency Errors ====================
    /// A table already holds the other kind of children.
    #[error("table cannot hold both subtables and messages")]
    MixedTableChildren,

    /// A child was appended out of sibling order.
    #[error("sibling order broken: expected {expected}, found {found}")]
    SiblingOrder {
        /// The next number the table expected.
        expected: usize,
        /// The number the child carried.
        found: usize,
    },

    /// A directory-tree manifest failed the permutation/shape check.
    #[error("invalid manifest: {0}")]
    InvalidManifest(String),

    /// A structured/markup document node failed the shape check.
    #[error("invalid document: {0}")]
    InvalidDocument(String),

    /// A suffix attribute is not valid hex.
    #[error("invalid suffix hex: {0:?}")]
    InvalidSuffix(String),

    // ==================== Parsing Errors ====================
    /// XML parsing error.
    #[error("XML parse error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// XML attribute error.
    #[error("XML attribute error: {0}")]
    XmlAttr(String),

    /// JSON parsing or serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// UTF-8 conversion error.
    #[error("UTF-8 conversion error: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

impl From<quick_xml::events::attributes::AttrError> for Error {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        Error::XmlAttr(err.to_string())
    }
}

/// A specialized Result type for `zeromsg` operations.
pub type Result<T> = std::result::Result<T, Error>;
