//! 수식 문자별 가중치 합산
//!
//! 그래핌이 둘 이상인 변형에서 기준 문자 뒤에 붙는 꼬리를 보고
//! H 계열(→ `ᵸ`) 또는 팔로치카(`Ӏ`) 수식으로 분류한 뒤 가중치를 모읍니다.

use std::collections::{BTreeMap, BTreeSet};

use crate::core::alphabet::{contains_h_modifier, is_standalone_letter, MODIFIER_CYRILLIC_EN, PALOCHKA};
use crate::core::grapheme::is_atomic;
use crate::ranking::Group;
use crate::weight::GlobalWeights;

/// 기본 예시 개수
pub const DEFAULT_MODIFIER_EXAMPLES: usize = 6;

/// 수식 문자 하나의 합계
#[derive(Debug, Clone, PartialEq)]
pub struct ModifierRow {
    pub modifier: String,
    pub weight: f64,
    pub share: f64,
    pub samples: usize,
    /// 순회 중 먼저 만난 예시 최대 N개, 정렬해서 보관
    pub examples: Vec<String>,
}

/// 꼬리의 수식 문자 분류
pub fn classify_tail(base: &str, variant: &str) -> Option<char> {
    let tail = variant.strip_prefix(base).unwrap_or(variant);
    if contains_h_modifier(tail) {
        Some(MODIFIER_CYRILLIC_EN)
    } else if tail.contains(PALOCHKA) {
        Some(PALOCHKA)
    } else {
        None
    }
}

/// 순위 그룹의 (기준, 변형) 쌍마다 수식 문자 합계
///
/// 예시는 기준 문자 순, 그룹 안에서는 순위 순으로 먼저 만난 `max_examples`개를 고릅니다.
pub fn aggregate_modifiers(groups: &[Group], weights: &GlobalWeights, max_examples: usize) -> Vec<ModifierRow> {
    let mut acc: BTreeMap<char, (f64, f64, usize, BTreeSet<String>)> = BTreeMap::new();

    for group in groups {
        for member in &group.members {
            if is_atomic(&member.variant) || is_standalone_letter(&member.variant) {
                continue;
            }
            let Some(modifier) = classify_tail(&group.base, &member.variant) else {
                continue;
            };
            let share = weights.get(&member.variant).map_or(0.0, |w| w.share);
            let slot = acc.entry(modifier).or_default();
            slot.0 += member.weight;
            slot.1 += share;
            slot.2 += 1;
            if slot.3.len() < max_examples {
                slot.3.insert(member.variant.clone());
            }
        }
    }

    let mut rows: Vec<ModifierRow> = acc
        .into_iter()
        .map(|(modifier, (weight, share, samples, examples))| ModifierRow {
            modifier: modifier.to_string(),
            weight,
            share,
            samples,
            examples: examples.into_iter().collect(),
        })
        .collect();
    rows.sort_by(|a, b| b.weight.total_cmp(&a.weight).then_with(|| a.modifier.cmp(&b.modifier)));
    rows
}
