//! Text Measurer - Text width estimation for badge layout
//!
//! This crate estimates how wide a string will be when drawn in a given
//! font, without rendering it, so that badge images can be sized before
//! anything is rasterized.
//!
//! # Modules
//!
//! - `measurer`: The `TextMeasurer` capability shared by all strategies
//! - `precalculated`: Width and kerning tables and the estimator over them
//! - `approximate`: Character-class heuristic used when no table exists
//! - `config`: Where bundled width tables are found
//! - `resource`: Loading tables from compressed, plain or embedded resources
//! - `default_instance`: Lazily loaded, shared default table

mod error;
mod measurer;
mod precalculated;
mod approximate;
mod config;
pub mod resource;
pub mod default_instance;

pub use error::*;
pub use measurer::*;
pub use precalculated::*;
pub use approximate::*;
pub use config::*;

pub use default_instance::{default_measurer, DefaultMeasurer};
pub use resource::{
    resolve, ResourceCandidate, ResourceEncoding, BUNDLED_WIDTHS, DEFAULT_CANDIDATES, FILE_CANDIDATES,
};
