//! IMG_BD/IMG_HD asset archive handling
//!
//! The game stores its assets as one fixed-capacity data file (`IMG_BD.BIN`)
//! whose entries sit at sector-aligned offsets, described by a bare index
//! file (`IMG_HD.BIN`) of `(offset_in_sectors, size_in_bytes)` dword pairs.
//! Entry names come from the companion executable's TOC, not the archive.

mod index;
mod layout;
mod reader;
mod rebuild;

pub use index::{build_index, parse_index};
pub use layout::{compute_layout, fit_layout, Layout};
pub use reader::Archive;
pub use rebuild::{pack_directory, replace_entry, ReplaceOutcome};

/// Disc sector size; archive offsets are counted in these.
pub const SECTOR_SIZE: u32 = 0x800;

/// Alignment candidates in sectors, tried largest first when fitting a
/// rebuild into the archive's fixed capacity.
pub const ALIGN_VALUES: [u32; 5] = [16, 8, 4, 2, 1];

/// Default alignment for fresh archives.
pub const ALIGN_DEFAULT: u32 = ALIGN_VALUES[0];

/// Archive data file name.
pub const DATA_FILE: &str = "IMG_BD.BIN";

/// Archive index file name.
pub const INDEX_FILE: &str = "IMG_HD.BIN";

/// A named archive entry with its slot geometry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TocEntry {
    /// Entry name from the executable TOC.
    pub name: String,
    /// Byte offset of the entry's data in the archive.
    pub offset: u64,
    /// Occupied bytes.
    pub size: u64,
    /// Distance to the next entry's offset (or the archive end): the hard
    /// ceiling before the entry collides with its neighbor.
    pub max_size: u64,
}

/// A raw index record: where an entry's bytes live.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileEntry {
    /// Byte offset in the archive data file.
    pub offset: u64,
    /// Size in bytes.
    pub size: u64,
}
