//! 매핑 충돌 탐지
//!
//! 같은 정규 변형이 둘 이상의 기준 문자 아래에 있으면 충돌입니다.
//! 대상 알파벳의 단일 문자 변형은 무시합니다. 충돌은 보고만 하고 해결하지 않습니다.

use std::collections::{BTreeMap, BTreeSet};

use crate::core::alphabet::is_target_letter;
use crate::table::MappingTable;
use crate::weight::GlobalWeights;

/// 충돌 변형의 기준 문자 하나
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConflictBase {
    pub base: String,
    /// 이 기준 문자 아래의 원래 표기
    pub originals: BTreeSet<String>,
    pub languages: BTreeSet<String>,
}

/// 둘 이상의 기준 문자에 걸친 변형
#[derive(Debug, Clone, PartialEq)]
pub struct Conflict {
    pub variant: String,
    /// 기준 문자 오름차순
    pub bases: Vec<ConflictBase>,
    pub has_sequence: bool,
    /// 전역 가중치 (없으면 None)
    pub weight: Option<f64>,
    pub share: Option<f64>,
}

impl Conflict {
    pub fn base_letters(&self) -> Vec<&str> {
        self.bases.iter().map(|b| b.base.as_str()).collect()
    }
}

/// 매핑 전체에서 충돌 탐지
///
/// 정렬: 전역 가중치 내림차순, 가중치 없는 변형은 뒤, 그다음 변형 오름차순
pub fn detect_conflicts(mapping: &MappingTable, weights: &GlobalWeights) -> Vec<Conflict> {
    let mut index: BTreeMap<&str, (bool, BTreeMap<&str, ConflictBase>)> = BTreeMap::new();

    for entry in mapping.entries() {
        if is_target_letter(&entry.variant) {
            continue;
        }
        let (has_sequence, bases) = index.entry(entry.variant.as_str()).or_default();
        *has_sequence |= entry.is_sequence;
        let slot = bases.entry(entry.base.as_str()).or_insert_with(|| ConflictBase {
            base: entry.base.clone(),
            originals: BTreeSet::new(),
            languages: BTreeSet::new(),
        });
        slot.originals.extend(entry.originals.iter().cloned());
        slot.languages.extend(entry.languages.iter().cloned());
    }

    let mut conflicts: Vec<Conflict> = index
        .into_iter()
        .filter(|(_, (_, bases))| bases.len() > 1)
        .map(|(variant, (has_sequence, bases))| {
            let weighted = weights.get(variant);
            Conflict {
                variant: variant.to_string(),
                bases: bases.into_values().collect(),
                has_sequence,
                weight: weighted.map(|w| w.weight),
                share: weighted.map(|w| w.share),
            }
        })
        .collect();

    conflicts.sort_by(|a, b| match (a.weight, b.weight) {
        (Some(wa), Some(wb)) => wb.total_cmp(&wa).then_with(|| a.variant.cmp(&b.variant)),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => a.variant.cmp(&b.variant),
    });

    if !conflicts.is_empty() {
        log::warn!("[conflicts] 기준 문자가 둘 이상인 변형 {}개", conflicts.len());
    }
    conflicts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{FrequencyEntry, FrequencyTable, MappingRow, PopulationEntry, PopulationTable};
    use crate::weight::{aggregate, AlphaPolicy};

    fn run(rows: &[(&str, &str, &[&str])], freq: &[(&str, &str, f64)]) -> Vec<Conflict> {
        let mapping = MappingTable::from_rows(rows.iter().map(|(b, v, l)| MappingRow::new(b, v, l)));
        let population = PopulationTable::from_entries([
            PopulationEntry::new("l1", 100.0, None),
            PopulationEntry::new("l2", 100.0, None),
        ]);
        let frequency = FrequencyTable::from_entries(freq.iter().map(|(l, v, f)| FrequencyEntry::new(l, v, *f)));
        let weights = aggregate(&population, &frequency, &mapping, &AlphaPolicy::default());
        detect_conflicts(&mapping, &weights)
    }

    #[test]
    fn test_two_bases_conflict() {
        let conflicts = run(&[("А", "Ӡ", &["l1"]), ("Б", "ӡ", &["l2"])], &[("l1", "Ӡ", 1.0)]);
        assert_eq!(conflicts.len(), 1);
        let conflict = &conflicts[0];
        assert_eq!(conflict.variant, "Ӡ");
        assert_eq!(conflict.base_letters(), vec!["А", "Б"]);
        assert_eq!(conflict.bases[0].languages.iter().collect::<Vec<_>>(), vec!["l1"]);
        assert_eq!(conflict.bases[1].languages.iter().collect::<Vec<_>>(), vec!["l2"]);
        assert!(conflict.bases[1].originals.contains("ӡ"));
        assert!(!conflict.has_sequence);
        assert!(conflict.weight.is_some());
    }

    #[test]
    fn test_target_letters_ignored() {
        let conflicts = run(&[("Е", "Ё", &["l1"]), ("Ё", "Ё", &["l2"])], &[("l1", "Ё", 1.0)]);
        assert!(conflicts.is_empty());
    }

    #[test]
    fn test_sort_weighted_first() {
        let rows: &[(&str, &str, &[&str])] = &[
            ("А", "Ӓ", &["l1"]),
            ("Е", "Ӓ", &["l1"]),
            ("К", "Кᵸ", &["l1"]),
            ("Х", "Кᵸ", &["l1"]),
            ("О", "Ӧ", &["l1"]),
            ("У", "Ӧ", &["l1"]),
        ];
        let conflicts = run(rows, &[("l1", "Ӧ", 0.7), ("l1", "Ӓ", 0.3)]);
        let order: Vec<_> = conflicts.iter().map(|c| c.variant.as_str()).collect();
        assert_eq!(order, vec!["Ӧ", "Ӓ", "Кᵸ"]);
        assert!(conflicts[2].weight.is_none());
        assert!(conflicts[2].has_sequence);
    }
}
