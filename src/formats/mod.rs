//! Container signature detection. Each detector is a pure function over a
//! borrowed buffer that returns `None` for anything it does not recognize.

pub mod jpeg;
pub mod png;

pub use jpeg::{is_sof_marker, jpeg_dimensions};
pub use png::png_dimensions;
