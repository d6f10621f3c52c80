//! Name tables embedded in the game executable
//!
//! The executable carries two comma-separated directive lists the archive
//! format itself lacks: the TOC file names of the archive entries, and the
//! display names of the in-game message tables. Entries look like
//! `NAME_EXT:NUMBER`; a literal comma is escaped as `,\x00` and each list
//! ends at `,;`. Both lookups are pure: an absent anchor yields `None`.

use std::fs;
use std::path::Path;

use crate::error::Result;
use crate::locale::Locale;

/// PAL executable name (boot file on the EU disc).
pub const EXECUTABLE_EU: &str = "SLES_508.21";

/// Japanese executable name.
pub const EXECUTABLE_JP: &str = "SLPS_250.74";

/// North American executable name.
pub const EXECUTABLE_US: &str = "SLUS_203.88";

const TOC_ANCHOR: &[u8] = b"CD_FILE_DAT:T";
const LIST_END: &[u8] = b",;";
const LIST_OPEN: &[u8] = b"=e";
const MSG_TABLE_ANCHOR: &[u8] = b",IGMSG_SND_TST:52,";
const MSG_TABLE_FIRST: &[u8] = b"=eIGMSG_GET_FILE0:0,";
const ESCAPED_COMMA: &[u8] = b",\\\x00";

/// Map an executable name to the locale its disc build carries.
///
/// The PAL build holds all five European languages; `En` stands in for it.
#[must_use]
pub fn locale_for_executable(name: &str) -> Option<Locale> {
    match name {
        EXECUTABLE_EU => Some(Locale::En),
        EXECUTABLE_JP => Some(Locale::Jp),
        EXECUTABLE_US => Some(Locale::Us),
        _ => None,
    }
}

/// Extract the archive TOC file names from an executable image.
///
/// Entries are sorted by their trailing number; `NAME_EXT` becomes
/// `NAME.EXT`. Returns `None` when the anchor is absent or an entry is
/// malformed.
#[must_use]
pub fn toc_names(exe: &[u8]) -> Option<Vec<String>> {
    let start = find(exe, TOC_ANCHOR, 0)?;
    let end = find(exe, LIST_END, start)?;
    let section = unescape(&exe[start..end]);
    let text = std::str::from_utf8(&section).ok()?;

    let list_at = find(text.as_bytes(), LIST_OPEN, 0)?;
    let list = &text[list_at + LIST_OPEN.len()..];

    let mut entries = Vec::new();
    for item in list.trim_end_matches(',').split(',') {
        let (name_ext, number) = item.rsplit_once(':')?;
        let number: u32 = number.parse().ok()?;
        let name = match name_ext.rsplit_once('_') {
            Some((stem, ext)) => format!("{stem}.{ext}"),
            None => name_ext.to_owned(),
        };
        entries.push((number, name));
    }

    entries.sort_by_key(|(number, _)| *number);
    Some(entries.into_iter().map(|(_, name)| name).collect())
}

/// Extract the in-game message table names from an executable image.
///
/// The list is located between the first `IGMSG_GET_FILE` entry and the list
/// terminator, validated to be numbered `0..N`. Returns `None` when the
/// anchors are absent or the numbering has gaps.
#[must_use]
pub fn message_table_names(exe: &[u8]) -> Option<Vec<String>> {
    let anchor = find(exe, MSG_TABLE_ANCHOR, 0)?;
    let start = rfind(&exe[..anchor], MSG_TABLE_FIRST)? + LIST_OPEN.len();
    let end = find(exe, LIST_END, anchor)?;

    let section = unescape(&exe[start..end]);
    let text = std::str::from_utf8(&section).ok()?;

    let mut entries = Vec::new();
    for item in text.trim_end_matches(',').split(',') {
        let (name, number) = item.rsplit_once(':')?;
        let number: usize = number.parse().ok()?;
        entries.push((number, name.to_owned()));
    }

    entries.sort_by_key(|(number, _)| *number);
    if entries.iter().enumerate().any(|(i, (number, _))| i != *number) {
        return None;
    }

    Some(entries.into_iter().map(|(_, name)| name).collect())
}

/// Read a name list from a plain text file, one name per line.
///
/// # Errors
///
/// Returns an IO error if the file cannot be read.
pub fn read_name_list(path: impl AsRef<Path>) -> Result<Vec<String>> {
    let text = fs::read_to_string(path)?;
    Ok(text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_owned)
        .collect())
}

fn unescape(section: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(section.len());
    let mut rest = section;
    while let Some(at) = find(rest, ESCAPED_COMMA, 0) {
        out.extend_from_slice(&rest[..at]);
        out.push(b',');
        rest = &rest[at + ESCAPED_COMMA.len()..];
    }
    out.extend_from_slice(rest);
    out
}

fn find(haystack: &[u8], needle: &[u8], from: usize) -> Option<usize> {
    if from > haystack.len() {
        return None;
    }
    haystack[from..]
        .windows(needle.len())
        .position(|w| w == needle)
        .map(|at| at + from)
}

fn rfind(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .rposition(|w| w == needle)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toc_exe() -> Vec<u8> {
        let mut exe = b"\x7fELF... padding ...".to_vec();
        exe.extend_from_slice(b"CD_FILE_DAT:T12=eSND_BD_BIN:2,IG_MSG_OBJ:1,IMG_BD_BIN:0,;");
        exe.extend_from_slice(b" trailing junk");
        exe
    }

    // the anchor entry is number 52, so a valid list carries 53 entries
    fn msg_list_exe(gap: bool) -> Vec<u8> {
        let mut exe = b"padding ".to_vec();
        exe.extend_from_slice(b"=eIGMSG_GET_FILE0:0,");
        for i in 1..52 {
            if gap && i == 30 {
                continue;
            }
            exe.extend_from_slice(format!("TBL{i:02}:{i},").as_bytes());
        }
        exe.extend_from_slice(b"IGMSG_SND_TST:52,;");
        exe
    }

    #[test]
    fn test_toc_names_sorted_by_number() {
        let names = toc_names(&toc_exe()).unwrap();
        assert_eq!(names, ["IMG_BD.BIN", "IG_MSG.OBJ", "SND_BD.BIN"]);
    }

    #[test]
    fn test_toc_names_absent_anchor() {
        assert_eq!(toc_names(b"no directives here"), None);
    }

    #[test]
    fn test_unescape_literal_comma() {
        assert_eq!(unescape(b"A,\\\x00B"), b"A,B".to_vec());
        assert_eq!(unescape(b"plain"), b"plain".to_vec());
    }

    #[test]
    fn test_message_table_names() {
        let names = message_table_names(&msg_list_exe(false)).unwrap();
        assert_eq!(names.len(), 53);
        assert_eq!(names[0], "IGMSG_GET_FILE0");
        assert_eq!(names[1], "TBL01");
        assert_eq!(names[52], "IGMSG_SND_TST");
    }

    #[test]
    fn test_message_table_names_gap_rejected() {
        assert_eq!(message_table_names(&msg_list_exe(true)), None);
    }

    #[test]
    fn test_message_table_names_absent_anchor() {
        assert_eq!(message_table_names(b"nothing to see"), None);
    }

    #[test]
    fn test_locale_for_executable() {
        assert_eq!(locale_for_executable(EXECUTABLE_JP), Some(Locale::Jp));
        assert_eq!(locale_for_executable(EXECUTABLE_EU), Some(Locale::En));
        assert_eq!(locale_for_executable("SLES_000.00"), None);
    }
}
