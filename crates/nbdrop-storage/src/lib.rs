//! nbdrop storage library
//!
//! The local store is the source of truth: a single flat directory holding one
//! file per upload, listed and served by name. The remote mirror is an
//! optional, best-effort copy in a Google Drive folder; its failures never
//! surface to callers.
//!
//! # Storage names
//!
//! A storage name is a single plain filename component. Anything with a path
//! separator, a `.`/`..` component or a NUL byte is rejected before touching
//! the filesystem, and served files must canonicalize inside the directory.

#[cfg(feature = "mirror-drive")]
pub mod drive;
pub mod factory;
pub mod local;
pub mod traits;

// Re-export commonly used types
#[cfg(feature = "mirror-drive")]
pub use drive::DriveMirror;
pub use factory::{create_mirror, DisabledMirror};
pub use local::{LocalStore, ServedFile};
pub use traits::{Mirror, MirrorError, RemoteFile, StorageError, StorageResult};
