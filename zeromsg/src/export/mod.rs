//! Lossless external views over a decoded container
//!
//! Three interchangeable representations carry the same payload — sibling
//! order, message text and suffix bytes — and nothing else. Source byte
//! offsets are never exported; they are recomputed on the next encode.

pub mod json;
pub mod tree;
pub mod xml;

pub use json::{export_json, import_json};
pub use tree::{export_tree, import_tree};
pub use xml::{export_xml, import_xml};

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Minimum digit width of generated child names.
pub const NAME_MIN_DIGITS: usize = 4;

/// The supported external representations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// One directory per table with hidden `.info` manifests.
    Tree,
    /// A single structured JSON document.
    Json,
    /// A single XML document.
    Xml,
}

impl ExportFormat {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ExportFormat::Tree => "FS",
            ExportFormat::Json => "JSON",
            ExportFormat::Xml => "XML",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "FS" => Ok(ExportFormat::Tree),
            "JSON" => Ok(ExportFormat::Json),
            "XML" => Ok(ExportFormat::Xml),
            other => Err(Error::InvalidDocument(format!(
                "{other} is not an export format"
            ))),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Zero-padded decimal name for child `index` among `count` siblings.
pub(crate) fn child_name(index: usize, count: usize) -> String {
    let width = NAME_MIN_DIGITS.max(count.to_string().len());
    format!("{index:0width$}")
}

/// Lowercase hex rendering of suffix bytes.
pub(crate) fn suffix_hex(suffix: &[u8]) -> String {
    suffix.iter().map(|b| format!("{b:02x}")).collect()
}

/// Parse a hex suffix attribute; the empty string is a valid empty suffix.
pub(crate) fn suffix_from_hex(hex: &str) -> Result<Vec<u8>> {
    if hex.len() % 2 != 0 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(Error::InvalidSuffix(hex.to_owned()));
    }
    (0..hex.len())
        .step_by(2)
        .map(|i| {
            u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| Error::InvalidSuffix(hex.to_owned()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_child_name_widths() {
        assert_eq!(child_name(3, 20), "0003");
        assert_eq!(child_name(12345, 99999), "12345");
    }

    #[test]
    fn test_suffix_hex_roundtrip() {
        assert_eq!(suffix_hex(&[0xFA, 0xFF]), "faff");
        assert_eq!(suffix_from_hex("faff").unwrap(), vec![0xFA, 0xFF]);
        assert_eq!(suffix_from_hex("").unwrap(), Vec::<u8>::new());
        assert!(suffix_from_hex("fzf").is_err());
        assert!(suffix_from_hex("abc").is_err());
    }

    #[test]
    fn test_format_from_str() {
        assert_eq!("json".parse::<ExportFormat>().unwrap(), ExportFormat::Json);
        assert_eq!("fs".parse::<ExportFormat>().unwrap(), ExportFormat::Tree);
        assert!("yaml".parse::<ExportFormat>().is_err());
    }
}
