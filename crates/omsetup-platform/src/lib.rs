//! Host platform primitives shared across the omsetup workspace.

pub mod commands;
pub mod env_export;
pub mod host;
pub mod paths;

pub use commands::HideWindow;
pub use host::{BitWidth, BitWidthParseError, Platform};
pub use paths::{AppPaths, AppPathsError};
