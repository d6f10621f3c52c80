//! Archive writing: packing, zero padding and single-entry replacement
//!
//! Writes are sequenced data-first: the index file is only rewritten after
//! the data file write completes, so a readable index always describes
//! written data. Crash-atomic staging is left to the caller.

use std::fs::{self, File, OpenOptions};
use std::io::{Seek, SeekFrom, Write};
use std::path::Path;

use tracing::info;

use crate::error::{Error, Result};

use super::{build_index, fit_layout, Archive, Layout, DATA_FILE, INDEX_FILE};
use super::{compute_layout, ALIGN_DEFAULT};

const WRITE_BLOCK: usize = 16 * 1024;

/// How a single-entry replacement was carried out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplaceOutcome {
    /// The new bytes fit the old slot; no other entry moved and the index
    /// was left untouched.
    InPlace,
    /// The entry outgrew its slot; the whole archive was re-laid-out and
    /// both files rewritten.
    Rebuilt(Layout),
}

/// Pack a directory of named files into a fresh archive.
///
/// Entries are placed in `names` order at the given alignment; both archive
/// files are written into `out_dir`.
///
/// # Errors
///
/// Returns [`Error::MissingArchiveFile`] if a named file is absent from
/// `src_dir`, [`Error::InvalidAlignment`] for an unsupported alignment, or
/// an IO error.
pub fn pack_directory(
    src_dir: impl AsRef<Path>,
    names: &[String],
    out_dir: impl AsRef<Path>,
    align: Option<u32>,
) -> Result<Layout> {
    let src_dir = src_dir.as_ref();
    let out_dir = out_dir.as_ref();

    let mut sizes = Vec::with_capacity(names.len());
    for name in names {
        let path = src_dir.join(name);
        if !path.is_file() {
            return Err(Error::MissingArchiveFile { path });
        }
        sizes.push(fs::metadata(&path)?.len());
    }

    let layout = compute_layout(&sizes, align.unwrap_or(ALIGN_DEFAULT))?;

    fs::create_dir_all(out_dir)?;

    let mut data = File::create(out_dir.join(DATA_FILE))?;
    for (i, name) in names.iter().enumerate() {
        let mut src = File::open(src_dir.join(name))?;
        let written = std::io::copy(&mut src, &mut data)?;
        write_zeros(&mut data, layout.byte_end(i) - (layout.byte_offset(i) + written))?;
    }
    data.flush()?;

    let index = build_index(&layout.sector_offsets, &sizes)?;
    fs::write(out_dir.join(INDEX_FILE), index)?;

    info!(
        align = layout.align,
        total = layout.total_size,
        entries = names.len(),
        "packed archive"
    );

    Ok(layout)
}

/// Replace one entry's content, preferring the in-place fast path.
///
/// When the new bytes fit the entry's slot they are written straight into
/// the old byte range and the slot remainder is re-zeroed; nothing else in
/// the archive moves. When they do not fit, the whole archive is re-laid-out
/// inside its current capacity, reusing the old bytes for every other entry,
/// and both files are rewritten.
///
/// # Errors
///
/// Returns [`Error::EntryNotFound`] for an unknown name,
/// [`Error::NoAlignmentFits`] when a rebuild cannot fit the capacity, or
/// any validation error from [`Archive::open`].
pub fn replace_entry(
    archive_dir: impl AsRef<Path>,
    names: &[String],
    name: &str,
    new_data: &[u8],
) -> Result<ReplaceOutcome> {
    let archive = Archive::open(&archive_dir, names)?;
    let entry = archive
        .find(name)
        .ok_or_else(|| Error::EntryNotFound(name.to_owned()))?
        .clone();

    let new_size = new_data.len() as u64;

    if new_size <= entry.max_size {
        let mut data = OpenOptions::new().write(true).open(archive.data_path())?;
        data.seek(SeekFrom::Start(entry.offset))?;
        data.write_all(new_data)?;
        write_zeros(&mut data, entry.max_size - new_size)?;
        data.flush()?;

        info!(name, size = new_size, slot = entry.max_size, "replaced entry in place");
        return Ok(ReplaceOutcome::InPlace);
    }

    // slot overflow: re-fit the complete entry list with the one size swapped
    let sizes: Vec<u64> = archive
        .entries()
        .iter()
        .map(|e| if e.name == name { new_size } else { e.size })
        .collect();
    let layout = fit_layout(&sizes, archive.data_size())?;

    let contents: Vec<Vec<u8>> = archive
        .entries()
        .iter()
        .map(|e| {
            if e.name == name {
                Ok(new_data.to_vec())
            } else {
                archive.read(&e.name)
            }
        })
        .collect::<Result<_>>()?;

    let mut data = File::create(archive.data_path())?;
    for (i, content) in contents.iter().enumerate() {
        data.write_all(content)?;
        write_zeros(&mut data, layout.byte_end(i) - (layout.byte_offset(i) + content.len() as u64))?;
    }
    data.flush()?;

    let index = build_index(&layout.sector_offsets, &sizes)?;
    fs::write(archive.index_path(), index)?;

    info!(
        name,
        align = layout.align,
        total = layout.total_size,
        "rebuilt archive around grown entry"
    );

    Ok(ReplaceOutcome::Rebuilt(layout))
}

/// Write exactly `padding` zero bytes.
fn write_zeros<W: Write>(writer: &mut W, mut padding: u64) -> Result<()> {
    let block = [0u8; WRITE_BLOCK];
    while padding > 0 {
        let chunk = padding.min(WRITE_BLOCK as u64) as usize;
        writer.write_all(&block[..chunk])?;
        padding -= chunk as u64;
    }
    Ok(())
}
