use thiserror::Error;

/// Failure while loading the embedded release catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to parse release catalog: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Duplicate version {version} in {platform} catalog")]
    DuplicateVersion { platform: String, version: String },
}

/// Failure while mapping a version specifier onto a catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("Could not find an OpenModelica version that matches {specifier}")]
    SpecifierNotFound { specifier: String },

    #[error("Platform {platform} is not supported")]
    UnsupportedPlatform { platform: String },

    /// A maximal match key was computed but no catalog row carries it.
    /// Defensive; only reachable through pass-through specifiers or a
    /// catalog whose version strings do not round-trip.
    #[error("Could not find version {version} in database.")]
    MissingCatalogEntry { version: String },
}

/// Failure anywhere in the install, verify or library flow.
///
/// Every variant is raised at the point of detection and propagates uncaught
/// to the top-level caller; no inner layer retries or converts.
#[derive(Debug, Error)]
pub enum InstallError {
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("Architecture doesn't match architecture of version: requested {requested}bit, release is {release}bit")]
    ArchitectureMismatch { requested: String, release: String },

    #[error("Architecture is \"{arch}\", {bit}bit not supported.")]
    UnsupportedBitWidth { arch: String, bit: &'static str },

    #[error("Unknown architecture {arch}.")]
    UnknownArchitecture { arch: String },

    // External consumers pattern-match on this exact wording.
    #[error("Distribution {codename} not available for OpenModelica version {version}.")]
    DistributionUnavailable { codename: String, version: String },

    #[error("Command `{command}` failed with {status}: {stderr}")]
    SubprocessFailure {
        command: String,
        status: String,
        stderr: String,
    },

    #[error("Invalid library name {entry}")]
    MalformedLibrarySpec { entry: String },

    #[error("Couldn't find installer name in url {url}")]
    MalformedDownloadUrl { url: String },

    #[error("Couldn't find installer executable in {path}")]
    ArtifactNotFound { path: String },

    #[error("Could not locate a freshly installed {product} directory under {parent}")]
    InstallRootNotFound {
        product: &'static str,
        parent: String,
    },

    #[error("Unexpected --version output from {program}: {output:?}")]
    UnexpectedVersionOutput { program: String, output: String },

    #[error("{program} could not be installed properly.")]
    VerificationFailed { program: String },

    #[error("omc-diff not available for platform {platform}.")]
    OmcDiffUnavailable { platform: String },

    #[error("Network error during {operation}: {details}")]
    Network {
        operation: &'static str,
        details: String,
    },

    #[error("IO error ({kind}): {message}")]
    Io {
        kind: std::io::ErrorKind,
        message: String,
    },
}

impl InstallError {
    pub fn network<E>(operation: &'static str, error: E) -> Self
    where
        E: std::fmt::Display,
    {
        Self::Network {
            operation,
            details: error.to_string(),
        }
    }
}

impl From<std::io::Error> for InstallError {
    fn from(err: std::io::Error) -> Self {
        InstallError::Io {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}
