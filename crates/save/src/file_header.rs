// ---------------------------------------------------------------------------
// file_header – Save file header with magic bytes, version, and checksum
// ---------------------------------------------------------------------------
//
// Header format (24 bytes, fixed-size, little-endian):
//   [0..4]   Magic bytes: "HSIM" (0x4853494D)
//   [4..8]   Format version (u32)
//   [8..12]  Flags (u32: bit 0 = lz4 compressed)
//   [12..16] Uncompressed data size (u32)
//   [16..20] Stored payload size (u32)
//   [20..24] xxHash32 checksum of the stored payload
//
// On save: encode SaveData -> compress -> prepend header (checksum of stored bytes)
// On load: check magic -> check sizes -> validate checksum -> strip header

use xxhash_rust::xxh32::xxh32;

use crate::save_error::SaveError;

/// Magic bytes identifying a housing market save file.
pub const MAGIC: [u8; 4] = *b"HSIM";

/// Size of the file header in bytes.
pub const HEADER_SIZE: usize = 24;

/// Current header layout version. Distinct from `SaveData::version`, which
/// tracks the payload schema.
pub const HEADER_FORMAT_VERSION: u32 = 1;

/// Payload is lz4 block-compressed with a size prefix.
pub const FLAG_COMPRESSED: u32 = 1;

const XXHASH_SEED: u32 = 0;

/// Parsed file header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileHeader {
    pub format_version: u32,
    pub flags: u32,
    pub uncompressed_size: u32,
    pub stored_size: u32,
    pub checksum: u32,
}

impl FileHeader {
    /// Header for a stored payload that decodes to `uncompressed_size` bytes.
    pub fn new(stored: &[u8], uncompressed_size: usize, flags: u32) -> Result<Self, SaveError> {
        Ok(Self {
            format_version: HEADER_FORMAT_VERSION,
            flags,
            uncompressed_size: size_field(uncompressed_size)?,
            stored_size: size_field(stored.len())?,
            checksum: xxh32(stored, XXHASH_SEED),
        })
    }

    pub fn is_compressed(&self) -> bool {
        self.flags & FLAG_COMPRESSED != 0
    }

    fn write_to(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&MAGIC);
        out.extend_from_slice(&self.format_version.to_le_bytes());
        out.extend_from_slice(&self.flags.to_le_bytes());
        out.extend_from_slice(&self.uncompressed_size.to_le_bytes());
        out.extend_from_slice(&self.stored_size.to_le_bytes());
        out.extend_from_slice(&self.checksum.to_le_bytes());
    }
}

fn size_field(len: usize) -> Result<u32, SaveError> {
    u32::try_from(len).map_err(|_| SaveError::TooLarge(len))
}

fn read_u32(bytes: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        bytes[offset],
        bytes[offset + 1],
        bytes[offset + 2],
        bytes[offset + 3],
    ])
}

/// Wrap a stored payload with a file header.
///
/// Returns bytes: [header (24 bytes)] ++ [stored payload].
pub fn wrap_with_header(
    stored: &[u8],
    uncompressed_size: usize,
    flags: u32,
) -> Result<Vec<u8>, SaveError> {
    let header = FileHeader::new(stored, uncompressed_size, flags)?;
    let mut out = Vec::with_capacity(HEADER_SIZE + stored.len());
    header.write_to(&mut out);
    out.extend_from_slice(stored);
    Ok(out)
}

/// Parse and validate the file header, returning it with the stored payload.
///
/// # Errors
///
/// Returns an error if:
/// - The file does not start with "HSIM" or is shorter than a header
/// - The header format version is from a newer build
/// - The stored size disagrees with the file length (truncation)
/// - The checksum does not match (data corruption)
pub fn unwrap_header(bytes: &[u8]) -> Result<(FileHeader, &[u8]), SaveError> {
    if bytes.len() < MAGIC.len() || bytes[..MAGIC.len()] != MAGIC {
        return Err(SaveError::InvalidHeader(
            "missing HSIM magic bytes; not a housing market save".to_string(),
        ));
    }
    if bytes.len() < HEADER_SIZE {
        return Err(SaveError::InvalidHeader(format!(
            "file is too short ({} bytes, need at least {} for header)",
            bytes.len(),
            HEADER_SIZE
        )));
    }

    let header = FileHeader {
        format_version: read_u32(bytes, 4),
        flags: read_u32(bytes, 8),
        uncompressed_size: read_u32(bytes, 12),
        stored_size: read_u32(bytes, 16),
        checksum: read_u32(bytes, 20),
    };

    if header.format_version > HEADER_FORMAT_VERSION {
        return Err(SaveError::VersionMismatch {
            expected_max: HEADER_FORMAT_VERSION,
            found: header.format_version,
        });
    }

    let payload = &bytes[HEADER_SIZE..];
    if payload.len() != header.stored_size as usize {
        return Err(SaveError::InvalidHeader(format!(
            "payload is {} bytes but header records {}",
            payload.len(),
            header.stored_size
        )));
    }

    let computed = xxh32(payload, XXHASH_SEED);
    if computed != header.checksum {
        return Err(SaveError::ChecksumMismatch {
            expected: header.checksum,
            found: computed,
        });
    }

    Ok((header, payload))
}

#[cfg(test)]
#[path = "file_header_tests.rs"]
mod tests;
