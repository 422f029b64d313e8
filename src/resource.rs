//! Resource providers for operator-supplied artifacts.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Why a named resource could not be produced.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The operator has not supplied this resource.
    #[error("resource '{0}' not supplied")]
    NotSupplied(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Produces artifact paths by resource name.
pub trait ResourceProvider {
    fn fetch(&self, resource: &str) -> Result<PathBuf, FetchError>;
}

/// Resources as files in a directory, named exactly after the resource.
pub struct DirResourceProvider {
    dir: PathBuf,
}

impl DirResourceProvider {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        DirResourceProvider { dir: dir.into() }
    }
}

impl ResourceProvider for DirResourceProvider {
    fn fetch(&self, resource: &str) -> Result<PathBuf, FetchError> {
        let path = self.dir.join(resource);
        if path.is_file() {
            Ok(path)
        } else {
            Err(FetchError::NotSupplied(resource.to_string()))
        }
    }
}

/// A provider that supplies nothing, for runs without a resource directory.
pub struct NoResources;

impl ResourceProvider for NoResources {
    fn fetch(&self, resource: &str) -> Result<PathBuf, FetchError> {
        Err(FetchError::NotSupplied(resource.to_string()))
    }
}
