//! Reading an extracted archive directory
//!
//! Opens a directory holding `IMG_BD.BIN` and `IMG_HD.BIN`, pairs the index
//! records with the externally supplied TOC names, and validates the whole
//! table before anything is read.

use std::fs::{self, File};
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{Error, Result};

use super::{parse_index, TocEntry, DATA_FILE, INDEX_FILE};

/// An opened archive directory.
#[derive(Debug)]
pub struct Archive {
    root: PathBuf,
    data_size: u64,
    entries: Vec<TocEntry>,
}

impl Archive {
    /// Open an archive directory, naming its entries from `names`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingArchiveFile`] if either archive file is
    /// absent, [`Error::InvalidIndexLength`] for a ragged index,
    /// [`Error::EntryCountMismatch`] when names and index disagree, and
    /// [`Error::ArchiveTruncated`] if an entry points past the data end.
    pub fn open(root: impl AsRef<Path>, names: &[String]) -> Result<Self> {
        let root = root.as_ref().to_path_buf();

        for file in [DATA_FILE, INDEX_FILE] {
            let path = root.join(file);
            if !path.is_file() {
                return Err(Error::MissingArchiveFile { path });
            }
        }

        let index_bytes = fs::read(root.join(INDEX_FILE))?;
        let file_entries = parse_index(&index_bytes)?;

        if names.len() != file_entries.len() {
            return Err(Error::EntryCountMismatch {
                names: names.len(),
                entries: file_entries.len(),
            });
        }

        let data_size = fs::metadata(root.join(DATA_FILE))?.len();
        let furthest = file_entries
            .iter()
            .map(|e| e.offset + e.size)
            .max()
            .unwrap_or(0);
        if furthest > data_size {
            return Err(Error::ArchiveTruncated {
                expected: furthest,
                actual: data_size,
            });
        }

        // each entry may grow up to its neighbor's offset (or the data end)
        let mut entries = Vec::with_capacity(file_entries.len());
        for (i, (name, file_entry)) in names.iter().zip(&file_entries).enumerate() {
            let next_offset = file_entries
                .get(i + 1)
                .map_or(data_size, |next| next.offset);
            entries.push(TocEntry {
                name: name.clone(),
                offset: file_entry.offset,
                size: file_entry.size,
                max_size: next_offset - file_entry.offset,
            });
        }

        debug!(entries = entries.len(), data_size, "opened archive");

        Ok(Self {
            root,
            data_size,
            entries,
        })
    }

    /// The archive directory this was opened from.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the archive data file.
    #[must_use]
    pub fn data_path(&self) -> PathBuf {
        self.root.join(DATA_FILE)
    }

    /// Path of the archive index file.
    #[must_use]
    pub fn index_path(&self) -> PathBuf {
        self.root.join(INDEX_FILE)
    }

    /// Total size of the data file: the fixed capacity a rebuild must fit.
    #[must_use]
    pub fn data_size(&self) -> u64 {
        self.data_size
    }

    /// All entries, in archive order.
    #[must_use]
    pub fn entries(&self) -> &[TocEntry] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up an entry by name.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&TocEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.find(name).is_some()
    }

    /// Read one entry's bytes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EntryNotFound`] for unknown names, or an IO error.
    pub fn read(&self, name: &str) -> Result<Vec<u8>> {
        let entry = self
            .find(name)
            .ok_or_else(|| Error::EntryNotFound(name.to_owned()))?;

        let mut file = File::open(self.data_path())?;
        file.seek(SeekFrom::Start(entry.offset))?;
        let mut data = vec![0u8; entry.size as usize];
        file.read_exact(&mut data)?;
        Ok(data)
    }

    /// Write every entry out as a named file under `out_dir`.
    ///
    /// # Errors
    ///
    /// Returns an IO error if the directory or any file cannot be written.
    pub fn extract_all(&self, out_dir: impl AsRef<Path>) -> Result<()> {
        let out_dir = out_dir.as_ref();
        fs::create_dir_all(out_dir)?;

        let mut file = File::open(self.data_path())?;
        for entry in &self.entries {
            file.seek(SeekFrom::Start(entry.offset))?;
            let mut data = vec![0u8; entry.size as usize];
            file.read_exact(&mut data)?;
            fs::write(out_dir.join(&entry.name), data)?;
        }

        Ok(())
    }
}
