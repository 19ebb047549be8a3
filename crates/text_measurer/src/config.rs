//! Loader configuration
//!
//! Says where the bundled width tables live and what they are called.

use crate::ResourceEncoding;
use std::path::{Path, PathBuf};

/// Environment variable that overrides the resource directory
pub const RESOURCE_DIR_ENV: &str = "TEXT_MEASURER_RESOURCE_DIR";

/// File stem shared by the compressed and plain resources
pub const DEFAULT_RESOURCE_STEM: &str = "default-widths";

/// Configuration for locating width table resources
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeasurerConfig {
    /// Directory searched for the resources
    pub resource_dir: PathBuf,
    /// File name without extension, e.g. `default-widths`
    pub resource_stem: String,
}

impl Default for MeasurerConfig {
    fn default() -> Self {
        Self {
            resource_dir: PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/resources")),
            resource_stem: DEFAULT_RESOURCE_STEM.to_string(),
        }
    }
}

impl MeasurerConfig {
    /// Default configuration, with the resource directory taken from
    /// `TEXT_MEASURER_RESOURCE_DIR` when it is set to a non-empty value
    pub fn from_env() -> Self {
        Self::default().with_env_override(std::env::var(RESOURCE_DIR_ENV).ok().as_deref())
    }

    fn with_env_override(self, value: Option<&str>) -> Self {
        match value {
            Some(dir) if !dir.trim().is_empty() => self.with_resource_dir(dir),
            _ => self,
        }
    }

    pub fn with_resource_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.resource_dir = dir.into();
        self
    }

    pub fn with_resource_stem(mut self, stem: impl Into<String>) -> Self {
        self.resource_stem = stem.into();
        self
    }

    pub fn resource_dir(&self) -> &Path {
        &self.resource_dir
    }

    /// Full path of the resource stored with `encoding`
    pub fn resource_path(&self, encoding: ResourceEncoding) -> PathBuf {
        self.resource_dir
            .join(format!("{}{}", self.resource_stem, encoding.extension()))
    }
}
