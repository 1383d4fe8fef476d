//! Binary save files for the housing market.
//!
//! Every resource registered with the `SaveableRegistry` is encoded into an
//! extension map, bitcode-encoded, lz4-compressed and written atomically
//! behind a checksummed `HSIM` header.

mod atomic_write;
mod exclusive_load;
mod exclusive_save;
pub mod file_header;
mod save_codec;
mod save_error;
mod save_plugin;
mod save_types;
pub mod saveable_ext;

pub use exclusive_load::{load_world_from_bytes, load_world_from_path};
pub use exclusive_save::{save_world_to_bytes, save_world_to_path};
pub use save_error::SaveError;
pub use save_plugin::{LoadGameEvent, SaveGameEvent, SaveOutcome, SavePlugin};
pub use save_types::{SaveData, CURRENT_SAVE_VERSION};
pub use saveable_ext::SaveableAppExt;

#[cfg(test)]
mod roundtrip_tests;
