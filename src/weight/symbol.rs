//! 기호(그래핌) 단위 가중치
//!
//! 변형 가중치를 구성 그래핌에 나눠 줍니다. 변형 표와 합이 맞을 필요는 없는 별도 표입니다.
//! - 그래핌 1개: 그 그래핌에 전체 가중치
//! - 그래핌 2..=max개: 각 그래핌 출현마다 전체 가중치 (반복 출현도 각각)
//! - 그 이상: 제외

use std::collections::{BTreeMap, BTreeSet};

use crate::core::grapheme::graphemes;

use super::aggregator::GlobalWeights;

/// 기본 최대 그래핌 수
pub const DEFAULT_MAX_GRAPHEMES: usize = 4;

/// 그래핌 하나의 가중치
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolWeight {
    pub symbol: String,
    pub weight: f64,
    pub share: f64,
    pub languages: BTreeSet<String>,
}

impl SymbolWeight {
    pub fn langs_count(&self) -> usize {
        self.languages.len()
    }
}

/// 기호 가중치 표
#[derive(Debug, Clone, Default)]
pub struct SymbolWeights {
    symbols: BTreeMap<String, SymbolWeight>,
    total: f64,
}

impl SymbolWeights {
    pub fn get(&self, symbol: &str) -> Option<&SymbolWeight> {
        self.symbols.get(symbol)
    }

    /// 가중치 내림차순, 같으면 기호 오름차순
    pub fn ranked(&self) -> Vec<&SymbolWeight> {
        let mut ranked: Vec<&SymbolWeight> = self.symbols.values().collect();
        ranked.sort_by(|a, b| b.weight.total_cmp(&a.weight).then_with(|| a.symbol.cmp(&b.symbol)));
        ranked
    }

    pub fn total(&self) -> f64 {
        self.total
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

/// 변형 가중치를 그래핌 단위로 분배
pub fn aggregate_symbols(weights: &GlobalWeights, max_graphemes: usize) -> SymbolWeights {
    let mut acc: BTreeMap<String, (f64, BTreeSet<String>)> = BTreeMap::new();
    let mut excluded = 0;

    for variant in weights.iter() {
        let clusters = graphemes(&variant.variant);
        if clusters.len() > max_graphemes {
            excluded += 1;
            continue;
        }
        for cluster in clusters {
            let slot = acc.entry(cluster.to_string()).or_default();
            slot.0 += variant.weight;
            slot.1.extend(variant.languages.iter().cloned());
        }
    }

    let total: f64 = acc.values().map(|(w, _)| w).sum();
    let symbols: BTreeMap<String, SymbolWeight> = acc
        .into_iter()
        .map(|(symbol, (weight, languages))| {
            let share = if total > 0.0 { weight / total } else { 0.0 };
            let entry = SymbolWeight {
                symbol: symbol.clone(),
                weight,
                share,
                languages,
            };
            (symbol, entry)
        })
        .collect();

    log::info!("[symbols] 기호 {}개 (제외된 긴 변형 {}개)", symbols.len(), excluded);
    SymbolWeights { symbols, total }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{FrequencyEntry, FrequencyTable, MappingTable, PopulationEntry, PopulationTable};
    use crate::weight::aggregator::{aggregate, AlphaPolicy};

    fn weights(entries: &[(&str, &str, f64)]) -> GlobalWeights {
        let population = PopulationTable::from_entries([
            PopulationEntry::new("kbd", 1.0, None),
            PopulationEntry::new("ady", 1.0, None),
        ]);
        let frequency =
            FrequencyTable::from_entries(entries.iter().map(|(l, v, f)| FrequencyEntry::new(l, v, *f)));
        aggregate(&population, &frequency, &MappingTable::default(), &AlphaPolicy::default())
    }

    #[test]
    fn test_fan_out_counts_occurrences() {
        let table = aggregate_symbols(&weights(&[("kbd", "АБА", 0.5)]), DEFAULT_MAX_GRAPHEMES);
        assert_eq!(table.get("А").unwrap().weight, 1.0);
        assert_eq!(table.get("Б").unwrap().weight, 0.5);
        assert_eq!(table.ranked()[0].symbol, "А");
    }

    #[test]
    fn test_long_variants_excluded() {
        let table = aggregate_symbols(&weights(&[("kbd", "АБВГД", 0.5), ("kbd", "Ӏ", 0.5)]), DEFAULT_MAX_GRAPHEMES);
        assert_eq!(table.len(), 1);
        assert!(table.get("А").is_none());
        assert_eq!(table.get("Ӏ").unwrap().share, 1.0);
    }

    #[test]
    fn test_combining_marks_stay_in_cluster() {
        let table = aggregate_symbols(&weights(&[("kbd", "А\u{0304}Ӏ", 0.4)]), DEFAULT_MAX_GRAPHEMES);
        assert_eq!(table.get("А\u{0304}").unwrap().weight, 0.4);
        assert_eq!(table.get("Ӏ").unwrap().weight, 0.4);
    }

    #[test]
    fn test_contributors_unioned() {
        let table = aggregate_symbols(&weights(&[("kbd", "КӀ", 0.5), ("ady", "Ӏ", 0.5)]), DEFAULT_MAX_GRAPHEMES);
        assert_eq!(table.get("Ӏ").unwrap().langs_count(), 2);
        assert_eq!(table.get("К").unwrap().langs_count(), 1);
    }
}
