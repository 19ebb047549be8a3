//! Lazily loaded default measurer
//!
//! Loading the bundled table means touching the filesystem and possibly
//! decompressing, so it happens once and the result is shared. The first
//! caller builds the table while concurrent callers wait for it; a failed
//! load is returned to the caller and not remembered.

use crate::resource::{resolve, ResourceCandidate, DEFAULT_CANDIDATES};
use crate::{MeasurerConfig, PrecalculatedTextMeasurer, Result};
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

/// Process-wide default measurer
static GLOBAL_DEFAULT: OnceLock<DefaultMeasurer> = OnceLock::new();

/// Get the process-wide default measurer cache.
///
/// Configured from the environment the first time it is requested; see
/// [`MeasurerConfig::from_env`].
pub fn default_measurer() -> &'static DefaultMeasurer {
    GLOBAL_DEFAULT.get_or_init(|| DefaultMeasurer::new(MeasurerConfig::from_env()))
}

/// Loads a width table on first use and hands out the same instance after.
#[derive(Debug)]
pub struct DefaultMeasurer {
    config: MeasurerConfig,
    candidates: Vec<ResourceCandidate>,
    cell: OnceLock<Arc<PrecalculatedTextMeasurer>>,
    /// Held while a load is in progress
    build_guard: Mutex<()>,
}

impl DefaultMeasurer {
    /// Create a cache that tries the compressed file, then the plain file,
    /// then the table compiled into the crate
    pub fn new(config: MeasurerConfig) -> Self {
        Self::with_candidates(config, DEFAULT_CANDIDATES.to_vec())
    }

    pub fn with_candidates(config: MeasurerConfig, candidates: Vec<ResourceCandidate>) -> Self {
        Self {
            config,
            candidates,
            cell: OnceLock::new(),
            build_guard: Mutex::new(()),
        }
    }

    pub fn config(&self) -> &MeasurerConfig {
        &self.config
    }

    /// Whether the table has been loaded
    pub fn is_loaded(&self) -> bool {
        self.cell.get().is_some()
    }

    /// Get the table, loading it if this is the first successful call.
    pub fn get(&self) -> Result<Arc<PrecalculatedTextMeasurer>> {
        if let Some(measurer) = self.cell.get() {
            return Ok(Arc::clone(measurer));
        }

        let _guard = self
            .build_guard
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        // Another caller may have finished loading while we waited
        if let Some(measurer) = self.cell.get() {
            return Ok(Arc::clone(measurer));
        }

        tracing::debug!(dir = %self.config.resource_dir().display(), "loading default width table");
        let measurer = Arc::new(resolve(&self.config, &self.candidates)?);
        Ok(Arc::clone(self.cell.get_or_init(|| measurer)))
    }
}

impl PrecalculatedTextMeasurer {
    /// Returns the shared measurer built from the bundled width table.
    ///
    /// The table is loaded on the first successful call; later calls
    /// return the same instance.
    pub fn default_instance() -> Result<Arc<PrecalculatedTextMeasurer>> {
        default_measurer().get()
    }
}
