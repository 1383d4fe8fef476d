// ---------------------------------------------------------------------------
// SaveData: the top-level save payload
// ---------------------------------------------------------------------------

use std::collections::BTreeMap;

use bitcode::{Decode, Encode};

use crate::save_error::SaveError;

/// Current payload schema version.
pub const CURRENT_SAVE_VERSION: u32 = 1;

/// Everything written to disk: the extension map produced by
/// `SaveableRegistry::save_all`, keyed by `Saveable::SAVE_KEY`.
#[derive(Debug, Clone, PartialEq, Encode, Decode)]
pub struct SaveData {
    pub version: u32,
    pub extensions: BTreeMap<String, Vec<u8>>,
}

impl SaveData {
    pub fn new(extensions: BTreeMap<String, Vec<u8>>) -> Self {
        Self {
            version: CURRENT_SAVE_VERSION,
            extensions,
        }
    }

    pub fn encode(&self) -> Vec<u8> {
        bitcode::encode(self)
    }

    /// Decode a payload, rejecting versions newer than this build.
    pub fn decode(bytes: &[u8]) -> Result<Self, SaveError> {
        let save: Self = bitcode::decode(bytes)?;
        if save.version > CURRENT_SAVE_VERSION {
            return Err(SaveError::VersionMismatch {
                expected_max: CURRENT_SAVE_VERSION,
                found: save.version,
            });
        }
        Ok(save)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_data_roundtrip() {
        let mut extensions = BTreeMap::new();
        extensions.insert("housing_market".to_string(), vec![1, 2, 3]);
        let save = SaveData::new(extensions);

        let decoded = SaveData::decode(&save.encode()).unwrap();
        assert_eq!(decoded, save);
        assert_eq!(decoded.version, CURRENT_SAVE_VERSION);
    }

    #[test]
    fn test_newer_version_rejected() {
        let save = SaveData {
            version: CURRENT_SAVE_VERSION + 1,
            extensions: BTreeMap::new(),
        };
        assert!(matches!(
            SaveData::decode(&save.encode()),
            Err(SaveError::VersionMismatch { found, .. }) if found == CURRENT_SAVE_VERSION + 1
        ));
    }

    #[test]
    fn test_garbage_is_decode_error() {
        assert!(matches!(
            SaveData::decode(&[0xFF; 3]),
            Err(SaveError::Decode(_))
        ));
    }
}
