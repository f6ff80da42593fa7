//! Small shared helpers used across the parsing crates.

pub mod utf8;

pub use utf8::Utf8Decoder;
