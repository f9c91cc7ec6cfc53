//! 그룹 순위, 점유율 표기, long-press 순서

pub mod longpress;
pub mod ranker;
pub mod share;

pub use longpress::{build_longpress, LongpressOptions, LongpressOrder, MissingRow, BASE_NOT_IN_KEYBOARD, SEQ_BASE_NOT_IN_KEYBOARD};
pub use ranker::{rank, BaseSummary, Group, RankedVariant};
pub use share::{format_coverage, format_share, Precision};
