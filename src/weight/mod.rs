//! 가중치 집계 (변형 단위, 기호 단위)

pub mod aggregator;
pub mod script;
pub mod symbol;

pub use aggregator::{aggregate, AlphaPolicy, ContributionSource, GlobalWeights, LanguageContribution, WeightedVariant};
pub use script::{non_russian_letters, sequence_weight_containing, sequences, SequenceWeight};
pub use symbol::{aggregate_symbols, SymbolWeight, SymbolWeights};
