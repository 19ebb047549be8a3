//! Width table resources
//!
//! A width table may be stored compressed or as plain JSON in a resource
//! directory, and a copy is compiled into the crate. Each source is a
//! [`ResourceCandidate`]; [`resolve`] tries a list of them in order and
//! returns the first table that exists.

use crate::{MeasureError, MeasurerConfig, PrecalculatedTextMeasurer, Result};
use flate2::read::GzDecoder;
use std::fs::File;
use std::io::ErrorKind;

/// Width table compiled into the crate
pub const BUNDLED_WIDTHS: &[u8] = include_bytes!("../resources/default-widths.json");

/// How a width table resource is stored on disk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceEncoding {
    /// Gzip-compressed JSON (`.json.gz`).
    ///
    /// xz-compressed `.json.xz` files are not read. A directory holding
    /// only an xz table resolves to the next candidate instead.
    Gzip,
    /// Plain UTF-8 JSON
    Plain,
}

impl ResourceEncoding {
    /// File extension, including the leading dot
    pub fn extension(self) -> &'static str {
        match self {
            ResourceEncoding::Gzip => ".json.gz",
            ResourceEncoding::Plain => ".json",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ResourceEncoding::Gzip => "gzip",
            ResourceEncoding::Plain => "plain",
        }
    }
}

/// One place a width table might be loaded from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceCandidate {
    /// A file in the configured resource directory
    File(ResourceEncoding),
    /// JSON compiled into the binary
    Embedded(&'static [u8]),
}

/// Directory candidates only: compressed first, then plain
pub const FILE_CANDIDATES: [ResourceCandidate; 2] = [
    ResourceCandidate::new(ResourceEncoding::Gzip),
    ResourceCandidate::new(ResourceEncoding::Plain),
];

/// Compressed file, plain file, then the table compiled into the crate
pub const DEFAULT_CANDIDATES: [ResourceCandidate; 3] = [
    ResourceCandidate::new(ResourceEncoding::Gzip),
    ResourceCandidate::new(ResourceEncoding::Plain),
    ResourceCandidate::bundled(),
];

impl ResourceCandidate {
    pub const fn new(encoding: ResourceEncoding) -> Self {
        ResourceCandidate::File(encoding)
    }

    pub const fn bundled() -> Self {
        ResourceCandidate::Embedded(BUNDLED_WIDTHS)
    }

    /// Load the table this candidate points at.
    ///
    /// Returns `Ok(None)` if the file does not exist. A file that exists but
    /// cannot be opened, decompressed or parsed is an error, as are
    /// embedded bytes that do not parse.
    pub fn load(&self, config: &MeasurerConfig) -> Result<Option<PrecalculatedTextMeasurer>> {
        match *self {
            ResourceCandidate::File(encoding) => load_file(config, encoding),
            ResourceCandidate::Embedded(bytes) => {
                let measurer = PrecalculatedTextMeasurer::from_json_slice(bytes)?;
                tracing::debug!(
                    characters = measurer.char_count(),
                    pairs = measurer.pair_count(),
                    "embedded width table loaded"
                );
                Ok(Some(measurer))
            }
        }
    }
}

fn load_file(
    config: &MeasurerConfig,
    encoding: ResourceEncoding,
) -> Result<Option<PrecalculatedTextMeasurer>> {
    let path = config.resource_path(encoding);

    let file = match File::open(&path) {
        Ok(file) => file,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            tracing::trace!(
                path = %path.display(),
                encoding = encoding.name(),
                "width table not found"
            );
            return Ok(None);
        }
        Err(source) => return Err(MeasureError::Io { path, source }),
    };

    let measurer = match encoding {
        ResourceEncoding::Gzip => PrecalculatedTextMeasurer::from_reader(GzDecoder::new(file))?,
        ResourceEncoding::Plain => PrecalculatedTextMeasurer::from_reader(file)?,
    };

    tracing::debug!(
        path = %path.display(),
        encoding = encoding.name(),
        characters = measurer.char_count(),
        pairs = measurer.pair_count(),
        "width table loaded"
    );

    Ok(Some(measurer))
}

/// Load the first candidate that exists.
///
/// Fails with [`MeasureError::ResourceMissing`] if none of them do. Errors
/// from a candidate that exists are returned as-is, later candidates are
/// not tried.
pub fn resolve(
    config: &MeasurerConfig,
    candidates: &[ResourceCandidate],
) -> Result<PrecalculatedTextMeasurer> {
    for candidate in candidates {
        if let Some(measurer) = candidate.load(config)? {
            return Ok(measurer);
        }
    }

    tracing::warn!(
        dir = %config.resource_dir().display(),
        stem = %config.resource_stem,
        "no width table resource found"
    );
    Err(MeasureError::ResourceMissing {
        dir: config.resource_dir.clone(),
    })
}
