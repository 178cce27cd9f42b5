//! Release catalog model and version resolution for OpenModelica installs.
//!
//! This crate holds everything that is pure or shared across the installer
//! implementations:
//! - Version value types with the ordering the release stream needs.
//! - The per-platform release catalog, embedded at build time.
//! - The resolver mapping loose specifiers onto one catalog entry.
//! - The [`PlatformInstaller`] strategy trait and the error taxonomy.

pub mod catalog;
pub mod error;
pub mod resolve;
pub mod traits;
pub mod types;

pub use catalog::{Catalog, ReleaseEntry};
pub use error::{CatalogError, InstallError, ResolveError};
pub use resolve::resolve;
pub use traits::PlatformInstaller;
pub use types::{Channel, DevVersion, ReleaseVersion, VersionFilter, VersionParseError};
