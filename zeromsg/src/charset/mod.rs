//! Glyph tables and the byte ↔ text character codec
//!
//! Message payloads store one glyph per byte in the plain range, with kanji
//! pages reached through selector bytes on the packed (NTSC) containers.
//! Decoded text is plain UTF-8 plus bracketed tokens: `{Color#RRGGBB}` for
//! color escapes, `{0xNN}` for bytes with no glyph, and named tokens such as
//! `{pts}` for glyphs with no single-character equivalent.

mod fonts;

use crate::error::{Error, Result};

/// Highest byte value looked up in a font's default page.
pub const LAST_PLAIN: u8 = 0xD1;

/// Color escape code; followed by an RGB byte triple.
pub const COLOR: u8 = 0xF8;

/// Line break code.
pub const NEWLINE: u8 = 0xF9;

/// Optional filler byte opening a message suffix.
pub const SUFFIX_FILLER: u8 = 0xFA;

/// Terminator byte; a suffix ends in a run of these.
pub const SUFFIX_TERMINATOR: u8 = 0xFF;

/// Extension page selector bytes, in encode search order.
pub const EXTENSION_SELECTORS: [u8; 4] = [0xF0, 0xF1, 0xF2, 0xF3];

/// The three glyph font sets burned into the game builds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FontSet {
    /// North American font (Latin-first default page).
    Us,
    /// Japanese font (kana-first default page).
    Jp,
    /// PAL font (accented Latin, kanji only on the shared pages).
    Eu,
}

impl FontSet {
    /// Build the glyph tables for this font set.
    #[must_use]
    pub fn charset(self) -> Charset {
        let pages = fonts::pages(self);
        Charset::from_pages(&pages)
    }
}

/// One glyph page: a byte-indexed list of display tokens.
#[derive(Debug, Clone)]
pub struct GlyphTable {
    glyphs: Vec<String>,
}

impl GlyphTable {
    fn from_page(page: &str) -> Self {
        let glyphs = tokenize(page)
            .into_iter()
            .filter(|t| *t != "\n")
            .map(str::to_owned)
            .collect::<Vec<_>>();
        debug_assert_eq!(glyphs.len(), LAST_PLAIN as usize + 1);
        Self { glyphs }
    }

    /// The display token for a byte value, if the page covers it.
    #[must_use]
    pub fn glyph(&self, byte: u8) -> Option<&str> {
        self.glyphs.get(byte as usize).map(String::as_str)
    }

    /// The byte value of a display token, if the page contains it.
    #[must_use]
    pub fn find(&self, token: &str) -> Option<u8> {
        self.glyphs.iter().position(|g| g == token).map(|i| i as u8)
    }
}

/// A font's complete table set: the default page plus selector-keyed
/// extension pages.
#[derive(Debug, Clone)]
pub struct Charset {
    default: GlyphTable,
    extensions: Vec<(u8, GlyphTable)>,
}

impl Charset {
    fn from_pages(pages: &[&str; 5]) -> Self {
        let default = GlyphTable::from_page(pages[0]);
        let extensions = EXTENSION_SELECTORS
            .iter()
            .zip(&pages[1..])
            .map(|(&sel, page)| (sel, GlyphTable::from_page(page)))
            .collect();
        Self {
            default,
            extensions,
        }
    }

    /// The extension page registered for a selector byte.
    #[must_use]
    pub fn extension(&self, selector: u8) -> Option<&GlyphTable> {
        self.extensions
            .iter()
            .find(|(sel, _)| *sel == selector)
            .map(|(_, table)| table)
    }

    /// Translate payload bytes into display text.
    ///
    /// Never fails: bytes without a glyph come out as `{0xNN}` tokens so the
    /// payload survives a later [`encode`](Self::encode) unchanged. Selector
    /// bytes are only honored for `packed` containers; the European builds
    /// address every glyph through the default page.
    #[must_use]
    pub fn decode(&self, payload: &[u8], packed: bool) -> String {
        let mut text = String::new();
        let mut idx = 0;

        while idx < payload.len() {
            let byte = payload[idx];
            let extension = if packed { self.extension(byte) } else { None };

            if byte == COLOR {
                if payload.len() - 1 - idx >= 3 {
                    text.push_str(&format!(
                        "{{Color#{:02X}{:02X}{:02X}}}",
                        payload[idx + 1],
                        payload[idx + 2],
                        payload[idx + 3]
                    ));
                    idx += 3;
                } else {
                    // truncated triple at the payload tail
                    text.push_str("{Color}");
                }
            } else if byte == NEWLINE {
                text.push('\n');
            } else if let (Some(table), true) = (extension, idx + 1 < payload.len()) {
                idx += 1;
                match table.glyph(payload[idx]) {
                    Some(glyph) => text.push_str(glyph),
                    None => {
                        // index past the page end; keep both bytes visible
                        text.push_str(&format!("{{0x{byte:02X}}}{{0x{:02X}}}", payload[idx]));
                    }
                }
            } else if byte <= LAST_PLAIN {
                match self.default.glyph(byte) {
                    Some(glyph) => text.push_str(glyph),
                    None => text.push_str(&format!("{{0x{byte:02X}}}")),
                }
            } else {
                text.push_str(&format!("{{0x{byte:02X}}}"));
            }

            idx += 1;
        }

        text
    }

    /// Translate display text back into payload bytes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoEncoding`] naming the first token found in no table.
    pub fn encode(&self, text: &str) -> Result<Vec<u8>> {
        let mut out = Vec::new();

        for token in tokenize(text) {
            if token == "\n" {
                out.push(NEWLINE);
            } else if token == "{Color}" {
                out.push(COLOR);
            } else if let Some(rgb) = parse_color_token(token) {
                out.push(COLOR);
                out.extend_from_slice(&rgb);
            } else if let Some(byte) = parse_hex_token(token) {
                out.push(byte);
            } else if let Some(byte) = self.default.find(token) {
                out.push(byte);
            } else if let Some((selector, byte)) = self.find_extension(token) {
                out.push(selector);
                out.push(byte);
            } else {
                return Err(Error::NoEncoding {
                    token: token.to_owned(),
                });
            }
        }

        Ok(out)
    }

    fn find_extension(&self, token: &str) -> Option<(u8, u8)> {
        self.extensions
            .iter()
            .find_map(|(sel, table)| table.find(token).map(|byte| (*sel, byte)))
    }
}

/// Split text into single characters and bracketed tokens.
///
/// An unterminated `{` falls back to a single-character token.
fn tokenize(text: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut rest = text;

    while let Some(first) = rest.chars().next() {
        if first == '{' {
            if let Some(end) = rest.find('}') {
                tokens.push(&rest[..=end]);
                rest = &rest[end + 1..];
                continue;
            }
        }
        let len = first.len_utf8();
        tokens.push(&rest[..len]);
        rest = &rest[len..];
    }

    tokens
}

/// Parse a `{0xNN}` token into its byte value.
fn parse_hex_token(token: &str) -> Option<u8> {
    if token.len() == 6 && token.starts_with("{0x") && token.ends_with('}') {
        u8::from_str_radix(&token[3..5], 16).ok()
    } else {
        None
    }
}

/// Parse a `{Color#RRGGBB}` token into its RGB triple.
fn parse_color_token(token: &str) -> Option<[u8; 3]> {
    let hex = token.strip_prefix("{Color#")?.strip_suffix('}')?;
    if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_digit() || (b'A'..=b'F').contains(&b)) {
        return None;
    }
    Some([
        u8::from_str_radix(&hex[0..2], 16).ok()?,
        u8::from_str_radix(&hex[2..4], 16).ok()?,
        u8::from_str_radix(&hex[4..6], 16).ok()?,
    ])
}
