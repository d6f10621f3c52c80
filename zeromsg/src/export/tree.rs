//! Directory-tree representation
//!
//! One directory per table level. Each directory carries a hidden `.info`
//! manifest: `order,childName` lines for table levels, `order,suffixHex`
//! lines for leaf levels, with each message's text in a sibling `NNNN.TXT`
//! file. Manifests are validated as permutations of `0..N` before use.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{Error, Result};
use crate::locale::Locale;
use crate::message::{Message, MessageContainer, MessageTable};

use super::{child_name, suffix_from_hex, suffix_hex};

const MANIFEST: &str = ".info";
const TEXT_EXT: &str = "TXT";

/// Write a container out as a directory tree.
///
/// # Errors
///
/// Returns an IO error if any directory or file cannot be written.
pub fn export_tree(container: &MessageContainer, out_dir: impl AsRef<Path>) -> Result<()> {
    let out_dir = out_dir.as_ref();
    fs::create_dir_all(out_dir)?;

    let mut manifest = String::new();
    for (i, (name, table)) in container
        .table_names()
        .iter()
        .zip(container.root().tables())
        .enumerate()
    {
        write_table(table, &out_dir.join(name))?;
        manifest.push_str(&format!("{i},{name}\n"));
    }
    fs::write(out_dir.join(MANIFEST), manifest)?;

    debug!(path = %out_dir.display(), "exported directory tree");
    Ok(())
}

fn write_table(table: &MessageTable, dir: &Path) -> Result<()> {
    fs::create_dir_all(dir)?;
    let mut manifest = String::new();

    if !table.tables().is_empty() {
        let count = table.tables().len();
        for (i, subtable) in table.tables().iter().enumerate() {
            let name = child_name(i, count);
            write_table(subtable, &dir.join(&name))?;
            manifest.push_str(&format!("{i},{name}\n"));
        }
    } else {
        let count = table.messages().len();
        for (i, message) in table.messages().iter().enumerate() {
            let name = child_name(i, count);
            fs::write(dir.join(format!("{name}.{TEXT_EXT}")), &message.text)?;
            manifest.push_str(&format!("{name},{}\n", suffix_hex(&message.suffix)));
        }
    }

    fs::write(dir.join(MANIFEST), manifest)?;
    Ok(())
}

/// Rebuild a container from a directory tree.
///
/// # Errors
///
/// Returns [`Error::InvalidManifest`] when a `.info` file is missing or its
/// order column is not a permutation of `0..N`, and propagates IO errors.
pub fn import_tree(dir: impl AsRef<Path>, locale: Locale) -> Result<MessageContainer> {
    let dir = dir.as_ref();

    if !is_table_dir(dir)? {
        return Err(Error::InvalidManifest(format!(
            "{} does not hold a table directory per entry",
            dir.display()
        )));
    }

    let manifest = read_manifest(dir)?;
    let mut names = Vec::with_capacity(manifest.len());
    let mut root = MessageTable::new(0);

    for line in &manifest {
        let mut table = MessageTable::new(line.order);
        read_table(&dir.join(&line.value), &mut table, locale)?;
        root.add_table(table)?;
        names.push(line.value.clone());
    }

    Ok(MessageContainer::from_root(root, Some(names), locale))
}

fn read_table(dir: &Path, table: &mut MessageTable, locale: Locale) -> Result<()> {
    if is_table_dir(dir)? {
        for line in read_manifest(dir)? {
            let mut subtable = MessageTable::new(line.order);
            read_table(&dir.join(&line.value), &mut subtable, locale)?;
            table.add_table(subtable)?;
        }
        return Ok(());
    }

    if is_message_dir(dir)? {
        for line in read_manifest(dir)? {
            // the zero-padded order column doubles as the text file stem
            let text = fs::read_to_string(dir.join(format!("{}.{TEXT_EXT}", line.stem)))?;
            let suffix = suffix_from_hex(&line.value)?;
            table.add_message(Message::from_text(line.order, text, locale, suffix))?;
        }
        return Ok(());
    }

    Err(Error::InvalidManifest(format!(
        "{} is neither a table nor a message directory",
        dir.display()
    )))
}

/// One validated `.info` line.
struct ManifestLine {
    /// Parsed order.
    order: usize,
    /// Raw first column, padding preserved.
    stem: String,
    /// Second column: a child name or a suffix hex string.
    value: String,
}

/// Parse and validate a `.info` manifest: two comma-separated columns, the
/// first numeric and forming a permutation of `0..N`. Lines come back sorted
/// by order.
fn read_manifest(dir: &Path) -> Result<Vec<ManifestLine>> {
    let path = dir.join(MANIFEST);
    if !path.is_file() {
        return Err(Error::InvalidManifest(format!(
            "missing {} in {}",
            MANIFEST,
            dir.display()
        )));
    }

    let text = fs::read_to_string(&path)?;
    let mut lines = Vec::new();
    for line in text.lines().filter(|l| !l.trim().is_empty()) {
        let (stem, value) = line.split_once(',').ok_or_else(|| {
            Error::InvalidManifest(format!("malformed line {line:?} in {}", path.display()))
        })?;
        let order: usize = stem.parse().map_err(|_| {
            Error::InvalidManifest(format!("non-numeric order {stem:?} in {}", path.display()))
        })?;
        lines.push(ManifestLine {
            order,
            stem: stem.to_owned(),
            value: value.to_owned(),
        });
    }

    lines.sort_by_key(|line| line.order);
    if lines.iter().enumerate().any(|(i, line)| i != line.order) {
        return Err(Error::InvalidManifest(format!(
            "orders are not a permutation of 0..{} in {}",
            lines.len(),
            path.display()
        )));
    }

    Ok(lines)
}

/// A table directory holds only the manifest plus one subdirectory per line.
fn is_table_dir(dir: &Path) -> Result<bool> {
    let (files, dirs) = list_dir(dir)?;
    if !files.iter().any(|f| f == MANIFEST) {
        return Err(Error::InvalidManifest(format!(
            "missing {} in {}",
            MANIFEST,
            dir.display()
        )));
    }
    if files.len() != 1 || dirs.is_empty() {
        return Ok(false);
    }

    let manifest = read_manifest(dir)?;
    Ok(manifest.iter().all(|line| dir.join(&line.value).is_dir()))
}

/// A message directory holds the manifest plus exactly the listed text files.
fn is_message_dir(dir: &Path) -> Result<bool> {
    let (files, dirs) = list_dir(dir)?;
    if !files.iter().any(|f| f == MANIFEST) {
        return Err(Error::InvalidManifest(format!(
            "missing {} in {}",
            MANIFEST,
            dir.display()
        )));
    }
    if !dirs.is_empty() {
        return Ok(false);
    }

    let manifest = read_manifest(dir)?;
    if files.len() != manifest.len() + 1 {
        return Ok(false);
    }
    Ok(manifest
        .iter()
        .all(|line| dir.join(format!("{}.{TEXT_EXT}", line.stem)).is_file()))
}

fn list_dir(dir: &Path) -> Result<(Vec<String>, Vec<PathBuf>)> {
    let mut files = Vec::new();
    let mut dirs = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            dirs.push(entry.path());
        } else {
            files.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    Ok((files, dirs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn sample_container() -> MessageContainer {
        let mut table0 = MessageTable::new(0);
        table0
            .add_message(Message::from_text(0, "First\nline", Locale::En, b"\xFF".to_vec()))
            .unwrap();
        table0
            .add_message(Message::from_text(1, "Second", Locale::En, b"\xFA\xFF".to_vec()))
            .unwrap();

        let mut inner = MessageTable::new(0);
        inner
            .add_message(Message::from_text(0, "Nested", Locale::En, b"".to_vec()))
            .unwrap();
        let mut table1 = MessageTable::new(1);
        table1.add_table(inner).unwrap();

        let mut root = MessageTable::new(0);
        root.add_table(table0).unwrap();
        root.add_table(table1).unwrap();
        MessageContainer::from_root(root, Some(vec!["STATUS".into(), "EVENTS".into()]), Locale::En)
    }

    #[test]
    fn test_tree_roundtrip() {
        let dir = tempdir().unwrap();
        let container = sample_container();

        export_tree(&container, dir.path()).unwrap();
        let imported = import_tree(dir.path(), Locale::En).unwrap();

        assert!(container.content_eq(&imported));
        assert_eq!(imported.table_names(), ["STATUS", "EVENTS"]);
    }

    #[test]
    fn test_tree_layout_on_disk() {
        let dir = tempdir().unwrap();
        export_tree(&sample_container(), dir.path()).unwrap();

        assert_eq!(
            fs::read_to_string(dir.path().join(".info")).unwrap(),
            "0,STATUS\n1,EVENTS\n"
        );
        assert_eq!(
            fs::read_to_string(dir.path().join("STATUS").join("0000.TXT")).unwrap(),
            "First\nline"
        );
        assert_eq!(
            fs::read_to_string(dir.path().join("STATUS").join(".info")).unwrap(),
            "0000,ff\n0001,faff\n"
        );
        assert!(dir.path().join("EVENTS").join("0000").is_dir());
    }

    #[test]
    fn test_broken_permutation_rejected() {
        let dir = tempdir().unwrap();
        export_tree(&sample_container(), dir.path()).unwrap();
        fs::write(dir.path().join(".info"), "0,STATUS\n2,EVENTS\n").unwrap();

        let err = import_tree(dir.path(), Locale::En).unwrap_err();
        assert!(matches!(err, Error::InvalidManifest(_)));
    }

    #[test]
    fn test_missing_manifest_rejected() {
        let dir = tempdir().unwrap();
        export_tree(&sample_container(), dir.path()).unwrap();
        fs::remove_file(dir.path().join("STATUS").join(".info")).unwrap();

        let err = import_tree(dir.path(), Locale::En).unwrap_err();
        assert!(matches!(err, Error::InvalidManifest(_)));
    }
}
