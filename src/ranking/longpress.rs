//! 길게 누르기(long-press) 후보 순서
//!
//! ЙЦУКЕН 자판 순서로 키를 돌며, 각 키 그룹의 순위에서 자판에 올릴 수 있는 글자
//! (그래핌 하나짜리 변형, 독립 글리프 Ӏ/ᵸ)만 남깁니다.
//! - 가중치가 있는 변형 → 필수 추가 글자(hard extras) → 가중치 없는 변형 순
//! - 필수 추가 글자끼리는 그 글자를 포함한 시퀀스의 가중치 합 내림차순
//! - 고정(pin) 글자는 있으면 맨 앞으로
//! - `top_k`가 있으면 잘라냄
//!
//! 참고용으로 거르지 않은 전체 순서와 키별 시퀀스 목록도 함께 만듭니다.

use std::collections::BTreeMap;

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::core::alphabet::{is_keyboard_key, is_standalone_letter, KEYBOARD_KEYS};
use crate::core::grapheme::is_atomic;
use crate::core::normalize::{canonical_base, canonical_variant};
use crate::weight::{sequence_weight_containing, sequences, GlobalWeights};

use super::ranker::Group;

/// 자판에 없는 기준 문자
pub const BASE_NOT_IN_KEYBOARD: &str = "base_not_in_keyboard";
/// 첫 글자가 자판에 없는 시퀀스
pub const SEQ_BASE_NOT_IN_KEYBOARD: &str = "seq_base_not_in_keyboard";

/// 순서 구성 옵션
#[derive(Debug, Clone, PartialEq)]
pub struct LongpressOptions {
    pub top_k: Option<usize>,
    /// 키 → 맨 앞으로 옮길 변형
    pub pins: BTreeMap<String, String>,
    /// 키 → 없으면 추가할 변형
    pub hard_extras: BTreeMap<String, Vec<String>>,
}

impl Default for LongpressOptions {
    fn default() -> Self {
        Self {
            top_k: None,
            pins: BTreeMap::from([("Е".to_string(), "Ё".to_string())]),
            hard_extras: BTreeMap::from([("Н".to_string(), vec!["ᵸ".to_string()])]),
        }
    }
}

/// 누락 보고 행
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingRow {
    pub kind: &'static str,
    pub value: String,
}

/// 키별 후보 순서
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LongpressOrder {
    keys: Vec<(String, Vec<String>)>,
    full: Vec<(String, Vec<String>)>,
    sequences: Vec<(String, Vec<String>)>,
    missing: Vec<MissingRow>,
}

impl LongpressOrder {
    /// 키 순서대로 (키, 후보 목록), 후보가 없는 키는 빠짐
    pub fn keys(&self) -> &[(String, Vec<String>)] {
        &self.keys
    }

    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.keys.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_slice())
    }

    /// 자판 32키 전부, 거르지 않은 매핑 변형 순서
    pub fn full(&self) -> &[(String, Vec<String>)] {
        &self.full
    }

    /// 자판 32키 전부, 첫 글자 기준 시퀀스 (가중치 내림차순)
    pub fn sequences(&self) -> &[(String, Vec<String>)] {
        &self.sequences
    }

    pub fn missing(&self) -> &[MissingRow] {
        &self.missing
    }
}

/// JSON 객체로 직렬화 (자판 순서 유지)
impl Serialize for LongpressOrder {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.keys.len()))?;
        for (key, variants) in &self.keys {
            map.serialize_entry(key, variants)?;
        }
        map.end()
    }
}

/// 자판에 올릴 수 있는 글자인지
pub fn is_keyboard_letter(variant: &str) -> bool {
    is_atomic(variant) || is_standalone_letter(variant)
}

/// 가중치 있는 변형 → 없던 필수 글자 → 나머지
fn with_extras(weighted: Vec<String>, tail: Vec<String>, extras: &[(String, f64)]) -> Vec<String> {
    let mut order = weighted;
    for (extra, _) in extras {
        if !order.contains(extra) && !tail.contains(extra) {
            order.push(extra.clone());
        }
    }
    order.extend(tail);
    order
}

/// 그룹 멤버를 (가중치 있음, 없음)으로 나눔
fn split_members(group: Option<&Group>, keep: impl Fn(&str) -> bool) -> (Vec<String>, Vec<String>) {
    let mut weighted = Vec::new();
    let mut tail = Vec::new();
    for member in group.into_iter().flat_map(|g| &g.members) {
        if !keep(&member.variant) {
            continue;
        }
        if member.weighted && member.weight > 0.0 {
            weighted.push(member.variant.clone());
        } else {
            tail.push(member.variant.clone());
        }
    }
    (weighted, tail)
}

/// 순위 그룹에서 long-press 순서 구성
pub fn build_longpress(groups: &[Group], weights: &GlobalWeights, options: &LongpressOptions) -> LongpressOrder {
    let by_base: BTreeMap<&str, &Group> = groups.iter().map(|g| (g.base.as_str(), g)).collect();
    let pins: BTreeMap<String, String> = options
        .pins
        .iter()
        .map(|(k, v)| (canonical_base(k), canonical_variant(v)))
        .collect();
    let extras: BTreeMap<String, Vec<(String, f64)>> = options
        .hard_extras
        .iter()
        .map(|(k, vs)| {
            let mut ranked: Vec<(String, f64)> = vs
                .iter()
                .map(|v| {
                    let v = canonical_variant(v);
                    let w = sequence_weight_containing(weights, &v);
                    (v, w)
                })
                .collect();
            ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
            (canonical_base(k), ranked)
        })
        .collect();

    let mut keys = Vec::new();
    let mut full = Vec::new();
    for key in KEYBOARD_KEYS {
        let group = by_base.get(key).copied();
        let key_extras = extras.get(key).map(Vec::as_slice).unwrap_or_default();

        let (weighted, tail) = split_members(group, |_| true);
        full.push((key.to_string(), with_extras(weighted, tail, key_extras)));

        let (weighted, tail) = split_members(group, is_keyboard_letter);
        let mut order = with_extras(weighted, tail, key_extras);
        if let Some(pin) = pins.get(key) {
            if let Some(pos) = order.iter().position(|v| v == pin) {
                let pinned = order.remove(pos);
                order.insert(0, pinned);
            }
        }
        if let Some(k) = options.top_k {
            order.truncate(k);
        }
        if !order.is_empty() {
            keys.push((key.to_string(), order));
        }
    }

    let mut missing: Vec<MissingRow> = groups
        .iter()
        .filter(|g| !is_keyboard_key(&g.base))
        .map(|g| MissingRow {
            kind: BASE_NOT_IN_KEYBOARD,
            value: g.base.clone(),
        })
        .collect();

    let mut buckets: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for seq in sequences(weights) {
        let Some(first) = seq.variant.variant.chars().next().map(String::from) else {
            continue;
        };
        if is_keyboard_key(&first) {
            buckets.entry(first).or_default().push(seq.variant.variant.clone());
        } else if !missing.iter().any(|m| m.kind == SEQ_BASE_NOT_IN_KEYBOARD && m.value == first) {
            missing.push(MissingRow {
                kind: SEQ_BASE_NOT_IN_KEYBOARD,
                value: first,
            });
        }
    }
    let sequences = KEYBOARD_KEYS
        .iter()
        .map(|key| (key.to_string(), buckets.remove(*key).unwrap_or_default()))
        .collect();

    log::info!("[longpress] 키 {}개, 누락 {}개", keys.len(), missing.len());
    LongpressOrder {
        keys,
        full,
        sequences,
        missing,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ranking::ranker::RankedVariant;
    use std::collections::BTreeSet;

    fn member(base: &str, variant: &str, weight: Option<f64>) -> RankedVariant {
        RankedVariant {
            base: base.to_string(),
            variant: variant.to_string(),
            rank: 0,
            weight: weight.unwrap_or(0.0),
            weighted: weight.is_some(),
            group_share: 0.0,
            share_low: String::new(),
            share_high: String::new(),
            speakers: 0.0,
            languages: BTreeSet::new(),
            is_sequence: variant.chars().count() > 1,
        }
    }

    fn group(base: &str, members: Vec<RankedVariant>) -> Group {
        Group {
            base: base.to_string(),
            members,
            coverage: 0.0,
        }
    }

    #[test]
    fn test_keyboard_order_and_filter() {
        let groups = vec![
            group("А", vec![member("А", "Ӓ", Some(2.0)), member("А", "А\u{0304}", Some(1.0))]),
            group("Й", vec![member("Й", "Ҋ", Some(1.0))]),
        ];
        let order = build_longpress(&groups, &GlobalWeights::default(), &LongpressOptions::default());
        let keys: Vec<_> = order.keys().iter().map(|(k, _)| k.as_str()).collect();
        // Й가 А보다 앞 (ЙЦУКЕН)
        assert_eq!(keys, vec!["Й", "Н", "А"]);
        // 결합 문자 시퀀스는 그래핌 하나이므로 유지
        assert_eq!(order.get("А").unwrap(), ["Ӓ", "А\u{0304}"]);
    }

    #[test]
    fn test_sequences_dropped() {
        let groups = vec![group(
            "К",
            vec![member("К", "Кᵸ", Some(5.0)), member("К", "Ӄ", Some(1.0)), member("К", "Ӏ", None)],
        )];
        let order = build_longpress(&groups, &GlobalWeights::default(), &LongpressOptions::default());
        assert_eq!(order.get("К").unwrap(), ["Ӄ", "Ӏ"]);
    }

    #[test]
    fn test_pins_and_hard_extras() {
        let groups = vec![
            group("Е", vec![member("Е", "Ә", Some(9.0)), member("Е", "Ё", Some(1.0))]),
            group("Н", vec![member("Н", "Ң", Some(3.0)), member("Н", "Ӈ", None)]),
        ];
        let order = build_longpress(&groups, &GlobalWeights::default(), &LongpressOptions::default());
        assert_eq!(order.get("Е").unwrap(), ["Ё", "Ә"]);
        assert_eq!(order.get("Н").unwrap(), ["Ң", "ᵸ", "Ӈ"]);
    }

    #[test]
    fn test_top_k_and_missing() {
        let groups = vec![
            group("О", vec![member("О", "Ӧ", Some(3.0)), member("О", "Ө", Some(2.0)), member("О", "Ӫ", Some(1.0))]),
            group("Ӏ", vec![member("Ӏ", "Ӏ", None)]),
        ];
        let options = LongpressOptions {
            top_k: Some(2),
            ..LongpressOptions::default()
        };
        let order = build_longpress(&groups, &GlobalWeights::default(), &options);
        assert_eq!(order.get("О").unwrap(), ["Ӧ", "Ө"]);
        assert_eq!(
            order.missing(),
            [MissingRow {
                kind: BASE_NOT_IN_KEYBOARD,
                value: "Ӏ".to_string()
            }]
        );
    }

    fn weights(entries: &[(&str, f64)]) -> GlobalWeights {
        use crate::table::{FrequencyEntry, FrequencyTable, MappingTable, PopulationEntry, PopulationTable};
        use crate::weight::{aggregate, AlphaPolicy};

        let population = PopulationTable::from_entries([PopulationEntry::new("kbd", 100.0, None)]);
        let frequency = FrequencyTable::from_entries(entries.iter().map(|(v, f)| FrequencyEntry::new("kbd", v, *f)));
        aggregate(&population, &frequency, &MappingTable::default(), &AlphaPolicy::default())
    }

    #[test]
    fn test_hard_extras_ordered_by_sequence_weight() {
        let groups = vec![group("Н", vec![member("Н", "Ң", Some(3.0)), member("Н", "Ӈ", None)])];
        let options = LongpressOptions {
            hard_extras: BTreeMap::from([("Н".to_string(), vec!["Ӏ".to_string(), "ᵸ".to_string()])]),
            ..LongpressOptions::default()
        };

        // 시퀀스 가중치가 없으면 글자 순
        let order = build_longpress(&groups, &GlobalWeights::default(), &options);
        assert_eq!(order.get("Н").unwrap(), ["Ң", "Ӏ", "ᵸ", "Ӈ"]);

        let weights = weights(&[("Кᵸ", 0.6), ("ГӀ", 0.3), ("А", 0.1)]);
        let order = build_longpress(&groups, &weights, &options);
        assert_eq!(order.get("Н").unwrap(), ["Ң", "ᵸ", "Ӏ", "Ӈ"]);
    }

    #[test]
    fn test_full_view_keeps_sequences() {
        let groups = vec![
            group("К", vec![member("К", "Кᵸ", Some(5.0)), member("К", "Ӄ", Some(1.0)), member("К", "КӀ", None)]),
            group("Н", vec![member("Н", "Ң", Some(1.0))]),
        ];
        let order = build_longpress(&groups, &GlobalWeights::default(), &LongpressOptions::default());
        assert_eq!(order.full().len(), 32);
        let full: BTreeMap<&str, &Vec<String>> = order.full().iter().map(|(k, v)| (k.as_str(), v)).collect();
        assert_eq!(full["К"], &vec!["Кᵸ".to_string(), "Ӄ".to_string(), "КӀ".to_string()]);
        assert_eq!(full["Н"], &vec!["Ң".to_string(), "ᵸ".to_string()]);
        assert!(full["Й"].is_empty());
    }

    #[test]
    fn test_sequence_view_and_missing() {
        let weights = weights(&[("Кᵸ", 0.2), ("КӀ", 0.3), ("ӀУ", 0.1), ("ӀА", 0.1), ("Ӧ", 0.3)]);
        let order = build_longpress(&[], &weights, &LongpressOptions::default());
        assert_eq!(order.sequences().len(), 32);
        let (key, seqs) = order.sequences().iter().find(|(k, _)| k == "К").unwrap();
        assert_eq!(key, "К");
        assert_eq!(seqs, &vec!["КӀ".to_string(), "Кᵸ".to_string()]);
        // 자판 밖 첫 글자는 한 번만 보고
        assert_eq!(
            order.missing(),
            [MissingRow {
                kind: SEQ_BASE_NOT_IN_KEYBOARD,
                value: "Ӏ".to_string()
            }]
        );
    }

    #[test]
    fn test_json_keeps_keyboard_order() {
        let groups = vec![
            group("А", vec![member("А", "Ӓ", Some(1.0))]),
            group("У", vec![member("У", "Ӱ", Some(1.0))]),
        ];
        let order = build_longpress(&groups, &GlobalWeights::default(), &LongpressOptions::default());
        let json = serde_json::to_string(&order).unwrap();
        assert_eq!(json, r#"{"У":["Ӱ"],"Н":["ᵸ"],"А":["Ӓ"]}"#);
    }
}
