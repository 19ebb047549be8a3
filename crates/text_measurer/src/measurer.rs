//! The text measurement capability
//!
//! Layout code only needs to know how wide a string will be. Anything that
//! can answer that question implements [`TextMeasurer`], so a precalculated
//! table, a heuristic estimate or a live font renderer can be swapped
//! without touching the caller.

use std::sync::Arc;

/// Measures the rendered width of a string.
pub trait TextMeasurer: Send + Sync {
    /// Returns the width, in pixels, that `text` would occupy when drawn.
    fn text_width(&self, text: &str) -> f64;
}

impl<T: TextMeasurer + ?Sized> TextMeasurer for &T {
    fn text_width(&self, text: &str) -> f64 {
        (**self).text_width(text)
    }
}

impl<T: TextMeasurer + ?Sized> TextMeasurer for Box<T> {
    fn text_width(&self, text: &str) -> f64 {
        (**self).text_width(text)
    }
}

impl<T: TextMeasurer + ?Sized> TextMeasurer for Arc<T> {
    fn text_width(&self, text: &str) -> f64 {
        (**self).text_width(text)
    }
}
