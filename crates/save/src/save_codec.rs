// ---------------------------------------------------------------------------
// save_codec – payload compression
// ---------------------------------------------------------------------------

use crate::file_header::{wrap_with_header, FileHeader, FLAG_COMPRESSED};
use crate::save_error::SaveError;

/// Compress an encoded payload and wrap it in a file header.
pub fn compress_and_wrap(encoded: &[u8]) -> Result<Vec<u8>, SaveError> {
    let stored = lz4_flex::compress_prepend_size(encoded);
    wrap_with_header(&stored, encoded.len(), FLAG_COMPRESSED)
}

/// Recover the encoded payload described by `header`.
pub fn decompress_payload(header: &FileHeader, stored: &[u8]) -> Result<Vec<u8>, SaveError> {
    if !header.is_compressed() {
        return Ok(stored.to_vec());
    }
    let encoded = lz4_flex::decompress_size_prepended(stored)?;
    if encoded.len() != header.uncompressed_size as usize {
        return Err(SaveError::Decompress(format!(
            "expected {} bytes, got {}",
            header.uncompressed_size,
            encoded.len()
        )));
    }
    Ok(encoded)
}
