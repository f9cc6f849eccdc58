//! # Schema Sources
//!
//! Implementors of the [`crate::Loader`] contract.
//!
//! * **[`MemoryLoader`]**: A fixed, in-memory mapping from identifiers to bytes. Used as the
//!   reference fake when testing callers and the wire protocol.
//! * **[`DirectoryLoader`]**: Serves `<package>.json` / `<package>@<version>.json` files
//!   from a directory on disk.
mod directory;
mod memory;

pub use directory::{DirectoryLoader, DirectoryLoaderError};
pub use memory::MemoryLoader;
