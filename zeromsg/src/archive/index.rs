//! Index file (`IMG_HD.BIN`) reading and writing
//!
//! The index is a bare sequence of little-endian dword pairs, one per entry:
//! offset in sectors, then size in bytes. Nothing else — names live in the
//! executable TOC.

use std::io::Cursor;

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use crate::error::{Error, Result};

use super::{FileEntry, SECTOR_SIZE};

/// Parse index bytes into file entries.
///
/// # Errors
///
/// Returns [`Error::InvalidIndexLength`] if the data is not a whole number
/// of 8-byte records.
pub fn parse_index(data: &[u8]) -> Result<Vec<FileEntry>> {
    if data.len() % 8 != 0 {
        return Err(Error::InvalidIndexLength { length: data.len() });
    }

    let mut cursor = Cursor::new(data);
    let mut entries = Vec::with_capacity(data.len() / 8);

    for _ in 0..data.len() / 8 {
        let sectors = cursor.read_u32::<LittleEndian>()?;
        let size = cursor.read_u32::<LittleEndian>()?;
        entries.push(FileEntry {
            offset: u64::from(sectors) * u64::from(SECTOR_SIZE),
            size: u64::from(size),
        });
    }

    Ok(entries)
}

/// Build index bytes from sector offsets and entry sizes.
///
/// # Errors
///
/// Returns [`Error::EntryTooLarge`] if a size does not fit the dword record.
pub fn build_index(sector_offsets: &[u32], sizes: &[u64]) -> Result<Vec<u8>> {
    debug_assert_eq!(sector_offsets.len(), sizes.len());

    let mut out = Vec::with_capacity(sector_offsets.len() * 8);
    for (&sectors, &size) in sector_offsets.iter().zip(sizes) {
        let size = u32::try_from(size).map_err(|_| Error::EntryTooLarge { size })?;
        out.write_u32::<LittleEndian>(sectors)?;
        out.write_u32::<LittleEndian>(size)?;
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_roundtrip() {
        let bytes = build_index(&[0, 16, 32], &[100, 5000, 1]).unwrap();
        assert_eq!(bytes.len(), 24);

        let entries = parse_index(&bytes).unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[1].offset, 16 * u64::from(SECTOR_SIZE));
        assert_eq!(entries[1].size, 5000);
    }

    #[test]
    fn test_ragged_index_rejected() {
        let err = parse_index(&[0u8; 12]).unwrap_err();
        assert!(matches!(err, Error::InvalidIndexLength { length: 12 }));
    }
}
