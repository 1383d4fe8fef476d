// ---------------------------------------------------------------------------
// SaveError: error types for save/load operations
// ---------------------------------------------------------------------------

use std::fmt;

/// Errors that can occur during save/load operations.
#[derive(Debug)]
pub enum SaveError {
    /// I/O error (file not found, permission denied, disk full, etc.)
    Io(std::io::Error),
    /// The file is not a save file or its header is damaged.
    InvalidHeader(String),
    /// The stored payload does not match the header checksum.
    ChecksumMismatch { expected: u32, found: u32 },
    /// lz4 decompression failed or produced the wrong size.
    Decompress(String),
    /// Bitcode decoding failed (corrupt or invalid save data).
    Decode(String),
    /// Save file version is newer than this build supports.
    VersionMismatch { expected_max: u32, found: u32 },
    /// Payload does not fit the header's 32-bit size fields.
    TooLarge(usize),
    /// A required resource was missing from the ECS world.
    MissingResource(String),
}

impl fmt::Display for SaveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SaveError::Io(e) => write!(f, "I/O error: {e}"),
            SaveError::InvalidHeader(msg) => write!(f, "Invalid save header: {msg}"),
            SaveError::ChecksumMismatch { expected, found } => write!(
                f,
                "Save file is corrupted: checksum mismatch (expected {expected:#010X}, got {found:#010X})"
            ),
            SaveError::Decompress(msg) => write!(f, "Decompression error: {msg}"),
            SaveError::Decode(msg) => write!(f, "Decoding error: {msg}"),
            SaveError::VersionMismatch {
                expected_max,
                found,
            } => write!(
                f,
                "Version mismatch: save is v{found}, but this build only supports up to v{expected_max}"
            ),
            SaveError::TooLarge(len) => write!(f, "Save data too large: {len} bytes"),
            SaveError::MissingResource(name) => {
                write!(f, "Missing required resource: {name}")
            }
        }
    }
}

impl std::error::Error for SaveError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SaveError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for SaveError {
    fn from(e: std::io::Error) -> Self {
        SaveError::Io(e)
    }
}

impl From<bitcode::Error> for SaveError {
    fn from(e: bitcode::Error) -> Self {
        SaveError::Decode(e.to_string())
    }
}

impl From<lz4_flex::block::DecompressError> for SaveError {
    fn from(e: lz4_flex::block::DecompressError) -> Self {
        SaveError::Decompress(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_error_display_io() {
        let err = SaveError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "file not found",
        ));
        let msg = format!("{err}");
        assert!(msg.contains("I/O error"), "got: {msg}");
        assert!(msg.contains("file not found"), "got: {msg}");
    }

    #[test]
    fn test_save_error_display_checksum() {
        let err = SaveError::ChecksumMismatch {
            expected: 0xDEAD_BEEF,
            found: 0x1234,
        };
        let msg = format!("{err}");
        assert!(msg.contains("corrupted"), "got: {msg}");
        assert!(msg.contains("0xDEADBEEF"), "got: {msg}");
        assert!(msg.contains("0x00001234"), "got: {msg}");
    }

    #[test]
    fn test_save_error_display_version_mismatch() {
        let err = SaveError::VersionMismatch {
            expected_max: 1,
            found: 99,
        };
        let msg = format!("{err}");
        assert!(msg.contains("v99"), "got: {msg}");
        assert!(msg.contains("v1"), "got: {msg}");
    }

    #[test]
    fn test_save_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let save_err: SaveError = io_err.into();
        assert!(matches!(save_err, SaveError::Io(_)));
        assert!(std::error::Error::source(&save_err).is_some());
    }

    #[test]
    fn test_save_error_from_decompress() {
        let err = lz4_flex::decompress_size_prepended(&[0x10, 0x00, 0x00, 0x00, 0xFF])
            .expect_err("garbage must not decompress");
        let save_err: SaveError = err.into();
        assert!(matches!(save_err, SaveError::Decompress(_)));
    }
}
