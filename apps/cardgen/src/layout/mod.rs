// Text layout: font measurement and character-granular wrapping.
// Pure functions of their inputs; painting lives in `render`.

pub mod font_metrics;
pub mod wrap;

// Re-export the font handle consumed by startup and the router tests.
pub use font_metrics::FontBook;
