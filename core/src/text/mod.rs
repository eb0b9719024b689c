//! Speakable text helpers

mod normalize;

pub use normalize::{normalize, strip_bidi};
