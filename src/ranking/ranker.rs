//! 기준 문자별 변형 순위
//!
//! 매핑 항목을 기준 문자로 묶고, 그룹 안에서 전역 가중치 내림차순(같으면 변형 오름차순)으로
//! 정렬합니다. 그룹 점유율은 `W_i / Σ_group W`이고, 그룹 합이 0이면 모두 0입니다.

use std::collections::{BTreeMap, BTreeSet};

use crate::core::normalize::unicode_codes;
use crate::table::{MappingEntry, MappingTable, PopulationTable};
use crate::weight::GlobalWeights;

use super::share::{format_coverage, format_share, Precision};

/// 그룹 안에서 순위가 매겨진 변형
#[derive(Debug, Clone, PartialEq)]
pub struct RankedVariant {
    pub base: String,
    pub variant: String,
    /// 1부터 시작
    pub rank: usize,
    /// 전역 가중치 (없으면 0)
    pub weight: f64,
    /// 전역 가중치 표에 있는지
    pub weighted: bool,
    pub group_share: f64,
    /// 소수 1자리 표기
    pub share_low: String,
    /// 소수 2자리 표기
    pub share_high: String,
    /// 이 항목 언어들의 화자 수 합
    pub speakers: f64,
    pub languages: BTreeSet<String>,
    pub is_sequence: bool,
}

/// 기준 문자 하나의 그룹
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    pub base: String,
    pub members: Vec<RankedVariant>,
    /// 그룹 언어 합집합이 전체 인구에서 차지하는 비율
    pub coverage: f64,
}

/// 그룹 요약 (우선순위 줄, 코드포인트 줄)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseSummary {
    /// `А (12.5%)`
    pub base_label: String,
    /// `Ӓ (55.0%); А̄ (<1%)`
    pub priorities: String,
    /// `А (U+0410)`
    pub unicode_label: String,
    /// `Ӓ (U+04D2); А̄ (U+0410 U+0304)`
    pub unicode: String,
}

impl Group {
    pub fn total_weight(&self) -> f64 {
        self.members.iter().map(|m| m.weight).sum()
    }

    pub fn summary(&self) -> BaseSummary {
        let priorities = self
            .members
            .iter()
            .map(|m| format!("{} ({})", m.variant, m.share_low))
            .collect::<Vec<_>>()
            .join("; ");
        let unicode = self
            .members
            .iter()
            .map(|m| format!("{} ({})", m.variant, unicode_codes(&m.variant)))
            .collect::<Vec<_>>()
            .join("; ");
        BaseSummary {
            base_label: format!("{} ({})", self.base, format_coverage(self.coverage)),
            priorities,
            unicode_label: format!("{} ({})", self.base, unicode_codes(&self.base)),
            unicode,
        }
    }
}

/// 매핑 전체를 기준 문자 그룹으로 나눠 순위 매김 (기준 문자 오름차순)
pub fn rank(mapping: &MappingTable, weights: &GlobalWeights, population: &PopulationTable) -> Vec<Group> {
    let mut by_base: BTreeMap<&str, Vec<&MappingEntry>> = BTreeMap::new();
    for entry in mapping.entries() {
        by_base.entry(entry.base.as_str()).or_default().push(entry);
    }

    let grand_total = population.total();
    let groups: Vec<Group> = by_base
        .into_iter()
        .map(|(base, entries)| rank_group(base, entries, weights, population, grand_total))
        .collect();

    log::info!("[ranking] 기준 문자 {}개, 항목 {}개", groups.len(), mapping.len());
    groups
}

fn rank_group(
    base: &str,
    entries: Vec<&MappingEntry>,
    weights: &GlobalWeights,
    population: &PopulationTable,
    grand_total: f64,
) -> Group {
    let mut scored: Vec<(&MappingEntry, Option<f64>)> =
        entries.into_iter().map(|e| (e, weights.weight(&e.variant))).collect();
    scored.sort_by(|(a, wa), (b, wb)| {
        let wa = wa.unwrap_or(0.0);
        let wb = wb.unwrap_or(0.0);
        wb.total_cmp(&wa).then_with(|| a.variant.cmp(&b.variant))
    });

    let group_total: f64 = scored.iter().map(|(_, w)| w.unwrap_or(0.0)).sum();
    let multi = scored.len() > 1;
    let speakers_of = |languages: &BTreeSet<String>| -> f64 {
        languages.iter().filter_map(|l| population.speakers(l)).sum()
    };

    let members = scored
        .into_iter()
        .enumerate()
        .map(|(idx, (entry, weight))| {
            let group_share = match weight {
                Some(w) if group_total > 0.0 => w / group_total,
                _ => 0.0,
            };
            let is_top = idx == 0;
            RankedVariant {
                base: base.to_string(),
                variant: entry.variant.clone(),
                rank: idx + 1,
                weight: weight.unwrap_or(0.0),
                weighted: weight.is_some(),
                group_share,
                share_low: format_share(group_share, multi, is_top, Precision::Low),
                share_high: format_share(group_share, multi, is_top, Precision::High),
                speakers: speakers_of(&entry.languages),
                languages: entry.languages.clone(),
                is_sequence: entry.is_sequence,
            }
        })
        .collect::<Vec<_>>();

    let union: BTreeSet<String> = members.iter().flat_map(|m| m.languages.iter().cloned()).collect();
    let coverage = if grand_total > 0.0 {
        speakers_of(&union) / grand_total
    } else {
        0.0
    };

    Group {
        base: base.to_string(),
        members,
        coverage,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{FrequencyEntry, FrequencyTable, MappingRow, PopulationEntry};
    use crate::weight::{aggregate, AlphaPolicy};

    fn setup(
        freq: &[(&str, &str, f64)],
        rows: &[(&str, &str, &[&str])],
    ) -> (MappingTable, GlobalWeights, PopulationTable) {
        let population = PopulationTable::from_entries([
            PopulationEntry::new("kbd", 800.0, None),
            PopulationEntry::new("ady", 200.0, None),
        ]);
        let frequency = FrequencyTable::from_entries(freq.iter().map(|(l, v, f)| FrequencyEntry::new(l, v, *f)));
        let mapping = MappingTable::from_rows(rows.iter().map(|(b, v, l)| MappingRow::new(b, v, l)));
        let weights = aggregate(&population, &frequency, &mapping, &AlphaPolicy::default());
        (mapping, weights, population)
    }

    #[test]
    fn test_group_order_and_shares() {
        let (mapping, weights, population) = setup(
            &[("kbd", "Ӓ", 0.25), ("kbd", "Ә", 0.75)],
            &[("А", "Ӓ", &["kbd"]), ("А", "Ә", &["kbd"]), ("А", "А\u{0304}", &["kbd"])],
        );
        let groups = rank(&mapping, &weights, &population);
        assert_eq!(groups.len(), 1);
        let order: Vec<_> = groups[0].members.iter().map(|m| m.variant.as_str()).collect();
        assert_eq!(order, vec!["Ә", "Ӓ", "А\u{0304}"]);

        let members = &groups[0].members;
        assert_eq!(members[0].rank, 1);
        assert_eq!(members[0].share_low, "75.0%");
        assert_eq!(members[1].share_high, "25.00%");
        assert_eq!(members[2].share_low, "<1%");
        assert!(!members[2].weighted);

        let sum: f64 = members.iter().map(|m| m.group_share).sum();
        assert!((sum - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_ties_by_variant() {
        let (mapping, weights, population) = setup(
            &[("kbd", "Ӧ", 0.5), ("kbd", "Ө", 0.5)],
            &[("О", "Ө", &["kbd"]), ("О", "Ӧ", &["kbd"])],
        );
        let groups = rank(&mapping, &weights, &population);
        let order: Vec<_> = groups[0].members.iter().map(|m| m.variant.as_str()).collect();
        // U+04E6 < U+04E8
        assert_eq!(order, vec!["Ӧ", "Ө"]);
    }

    #[test]
    fn test_zero_weight_group() {
        let (mapping, weights, population) = setup(&[("kbd", "Ӏ", 1.0)], &[("У", "Ӱ", &["xx"]), ("У", "Ӯ", &["yy"])]);
        let groups = rank(&mapping, &weights, &population);
        assert!(groups[0].members.iter().all(|m| m.group_share == 0.0));
        assert!(groups[0].members.iter().all(|m| m.share_low == "<1%"));
        assert_eq!(groups[0].coverage, 0.0);
    }

    #[test]
    fn test_summary_lines() {
        let (mapping, weights, population) = setup(
            &[("kbd", "Ӓ", 1.0), ("ady", "А\u{0304}", 1.0)],
            &[("А", "Ӓ", &["kbd"]), ("А", "А\u{0304}", &["ady"])],
        );
        let groups = rank(&mapping, &weights, &population);
        let summary = groups[0].summary();
        assert_eq!(summary.base_label, "А (100.0%)");
        assert_eq!(summary.priorities, "Ӓ (80.0%); А\u{0304} (20.0%)");
        assert_eq!(summary.unicode_label, "А (U+0410)");
        assert_eq!(summary.unicode, "Ӓ (U+04D2); А\u{0304} (U+0410 U+0304)");
        assert_eq!(groups[0].members[0].speakers, 800.0);
    }
}
