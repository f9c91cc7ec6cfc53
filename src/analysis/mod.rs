//! 매핑 분석 (충돌, 수식 문자)

pub mod conflict;
pub mod modifier;

pub use conflict::{detect_conflicts, Conflict, ConflictBase};
pub use modifier::{aggregate_modifiers, classify_tail, ModifierRow};
