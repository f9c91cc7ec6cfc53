//! 문자 정규화와 그래핌 분할

pub mod alphabet;
pub mod grapheme;
pub mod normalize;

pub use grapheme::{grapheme_count, graphemes, is_atomic};
pub use normalize::{canonical_base, canonical_variant};
