//! Extraction of a single face from a TrueType/OpenType collection.
//!
//! PDF font programs must be standalone sfnt files, while `.ttc` files bundle
//! several faces that share tables. [`extract_face`] rebuilds one face as a
//! self-contained font: a fresh table directory followed by copies of the
//! tables it references.

use crate::error::{Error, Result};

const TTC_TAG: &[u8; 4] = b"ttcf";
const SFNT_HEADER_LEN: usize = 12;
const TABLE_RECORD_LEN: usize = 16;

/// Whether the data starts with a collection header.
pub fn is_collection(data: &[u8]) -> bool {
    data.len() >= 4 && &data[..4] == TTC_TAG
}

/// Whether the data is a CFF-flavoured OpenType font (`OTTO` magic).
pub fn is_cff(data: &[u8]) -> bool {
    data.len() >= 4 && &data[..4] == b"OTTO"
}

fn read_u16(data: &[u8], offset: usize) -> Result<u16> {
    data.get(offset..offset + 2)
        .map(|b| u16::from_be_bytes([b[0], b[1]]))
        .ok_or_else(|| Error::Font(format!("truncated font data at offset {}", offset)))
}

fn read_u32(data: &[u8], offset: usize) -> Result<u32> {
    data.get(offset..offset + 4)
        .map(|b| u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
        .ok_or_else(|| Error::Font(format!("truncated font data at offset {}", offset)))
}

/// Number of faces in a collection, or 1 for a plain font file.
pub fn face_count(data: &[u8]) -> Result<u32> {
    if is_collection(data) {
        read_u32(data, 8)
    } else {
        Ok(1)
    }
}

/// Return the font program for face `index`.
///
/// Plain font files are returned unchanged (only index 0 is valid).
pub fn extract_face(data: &[u8], index: u32) -> Result<Vec<u8>> {
    if !is_collection(data) {
        if index != 0 {
            return Err(Error::Font(format!("face index {} out of range for single font", index)));
        }
        return Ok(data.to_vec());
    }

    let count = read_u32(data, 8)?;
    if index >= count {
        return Err(Error::Font(format!(
            "face index {} out of range, collection has {} faces",
            index, count
        )));
    }
    let face_offset = read_u32(data, 12 + 4 * index as usize)? as usize;

    let sfnt_version = read_u32(data, face_offset)?;
    let num_tables = read_u16(data, face_offset + 4)? as usize;

    // (tag, checksum, offset, length) from the shared directory
    let mut tables = Vec::with_capacity(num_tables);
    for i in 0..num_tables {
        let rec = face_offset + SFNT_HEADER_LEN + i * TABLE_RECORD_LEN;
        let tag = read_u32(data, rec)?;
        let checksum = read_u32(data, rec + 4)?;
        let offset = read_u32(data, rec + 8)? as usize;
        let length = read_u32(data, rec + 12)? as usize;
        if data.len() < offset.saturating_add(length) {
            return Err(Error::Font(format!("table {:08X} extends past end of file", tag)));
        }
        tables.push((tag, checksum, offset, length));
    }

    let directory_len = SFNT_HEADER_LEN + num_tables * TABLE_RECORD_LEN;
    let body_len: usize = tables.iter().map(|t| padded(t.3)).sum();
    let mut out = Vec::with_capacity(directory_len + body_len);

    // Binary search hints as defined for the table directory
    let mut entry_selector = 0u16;
    while (2usize << entry_selector) <= num_tables {
        entry_selector += 1;
    }
    let search_range = (1u16 << entry_selector) * 16;
    let range_shift = (num_tables as u16 * 16).saturating_sub(search_range);

    out.extend_from_slice(&sfnt_version.to_be_bytes());
    out.extend_from_slice(&(num_tables as u16).to_be_bytes());
    out.extend_from_slice(&search_range.to_be_bytes());
    out.extend_from_slice(&entry_selector.to_be_bytes());
    out.extend_from_slice(&range_shift.to_be_bytes());

    let mut next_offset = directory_len;
    for &(tag, checksum, _, length) in &tables {
        out.extend_from_slice(&tag.to_be_bytes());
        out.extend_from_slice(&checksum.to_be_bytes());
        out.extend_from_slice(&(next_offset as u32).to_be_bytes());
        out.extend_from_slice(&(length as u32).to_be_bytes());
        next_offset += padded(length);
    }

    for &(_, _, offset, length) in &tables {
        out.extend_from_slice(&data[offset..offset + length]);
        out.resize(out.len() + padded(length) - length, 0);
    }

    log::debug!(
        "Extracted face {} of {} from font collection ({} tables, {} bytes)",
        index,
        count,
        num_tables,
        out.len()
    );
    Ok(out)
}

fn padded(len: usize) -> usize {
    (len + 3) & !3
}
