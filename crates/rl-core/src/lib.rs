#![deny(missing_docs)]
#![doc = "Core error, seed and RNG types shared by the randomize-label crates."]

pub mod errors;
pub mod provenance;
pub mod rng;
pub mod seed;

/// Version of this crate, recorded in run provenance.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use errors::{ErrorInfo, ErrorKind, RlError};
pub use provenance::{RunProvenance, SchemaVersion};
pub use rng::{derive_substream_seed, stable_key_id, RngHandle};
pub use seed::{
    CommittedSeed, FileSeedStore, MemorySeedStore, Seed, SeedManager, SeedPolicy, SeedStore,
};
