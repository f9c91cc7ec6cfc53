//! 출력 표 렌더링
//!
//! 가중치 `{:.6}`, 점유율 `{:.10}`, 수식 문자 합계 `{:.12}`.

use std::collections::BTreeSet;

use crate::analysis::{Conflict, ModifierRow};
use crate::ranking::{Group, LongpressOrder};
use crate::table::MappingEntry;
use crate::weight::{GlobalWeights, SequenceWeight, SymbolWeights, WeightedVariant};

use super::csv::CsvTable;

fn weight(w: f64) -> String {
    format!("{:.6}", w)
}

fn share(p: f64) -> String {
    format!("{:.10}", p)
}

fn flag(value: bool) -> String {
    String::from(if value { "1" } else { "0" })
}

fn join(items: &BTreeSet<String>, sep: &str) -> String {
    items.iter().map(|s| s.as_str()).collect::<Vec<_>>().join(sep)
}

/// 화자 수: 정수면 소수점 없이
fn speakers(s: f64) -> String {
    if s.fract() == 0.0 {
        format!("{:.0}", s)
    } else {
        format!("{}", s)
    }
}

pub fn global_weights(weights: &GlobalWeights) -> CsvTable {
    let mut table = CsvTable::new(&["rank", "variant", "weight", "share", "langs_count"]);
    for (idx, v) in weights.ranked().into_iter().enumerate() {
        table.push(vec![
            (idx + 1).to_string(),
            v.variant.clone(),
            weight(v.weight),
            share(v.share),
            v.langs_count().to_string(),
        ]);
    }
    table
}

pub fn symbol_weights(symbols: &SymbolWeights) -> CsvTable {
    let mut table = CsvTable::new(&["rank", "symbol", "weight", "share", "langs_count"]);
    for (idx, s) in symbols.ranked().into_iter().enumerate() {
        table.push(vec![
            (idx + 1).to_string(),
            s.symbol.clone(),
            weight(s.weight),
            share(s.share),
            s.langs_count().to_string(),
        ]);
    }
    table
}

/// 집계된 매핑 (기준 문자 → 변형 순)
pub fn variant_mapping<'a>(entries: impl IntoIterator<Item = &'a MappingEntry>) -> CsvTable {
    let mut table = CsvTable::new(&["base_letter", "variant", "source_languages", "has_sequence"]);
    for e in entries {
        table.push(vec![
            e.base.clone(),
            e.variant.clone(),
            join(&e.languages, ","),
            flag(e.is_sequence),
        ]);
    }
    table
}

pub fn non_russian_letters(letters: &[&WeightedVariant]) -> CsvTable {
    let mut table = CsvTable::new(&["variant", "W", "p", "langs_count"]);
    for v in letters {
        table.push(vec![
            v.variant.clone(),
            weight(v.weight),
            share(v.share),
            v.langs_count().to_string(),
        ]);
    }
    table
}

pub fn sequences(rows: &[SequenceWeight<'_>]) -> CsvTable {
    let mut table = CsvTable::new(&["variant", "W", "p", "langs_count", "contains_non_russian"]);
    for row in rows {
        let v = row.variant;
        table.push(vec![
            v.variant.clone(),
            weight(v.weight),
            share(v.share),
            v.langs_count().to_string(),
            flag(row.contains_non_russian),
        ]);
    }
    table
}

/// 자판 키 → 공백으로 이은 목록
pub fn keyed_lists(header: &'static str, rows: &[(String, Vec<String>)]) -> CsvTable {
    let mut table = CsvTable::new(&["key", header]);
    for (key, items) in rows {
        table.push(vec![key.clone(), items.join(" ")]);
    }
    table
}

pub fn mapping_stats(groups: &[Group]) -> CsvTable {
    let mut table = CsvTable::new(&[
        "base_letter",
        "variant",
        "source_languages",
        "total_speakers",
        "share_low",
        "share_high",
    ]);
    for group in groups {
        for m in &group.members {
            table.push(vec![
                m.base.clone(),
                m.variant.clone(),
                join(&m.languages, ","),
                speakers(m.speakers),
                m.share_low.clone(),
                m.share_high.clone(),
            ]);
        }
    }
    table
}

pub fn priorities(groups: &[Group]) -> CsvTable {
    let mut table = CsvTable::new(&["base_letter", "priorities"]);
    for summary in groups.iter().map(Group::summary) {
        table.push(vec![summary.base_label, summary.priorities]);
    }
    table
}

pub fn unicode_priorities(groups: &[Group]) -> CsvTable {
    let mut table = CsvTable::new(&["base_letter", "priorities"]);
    for summary in groups.iter().map(Group::summary) {
        table.push(vec![summary.unicode_label, summary.unicode]);
    }
    table
}

pub fn conflicts_overview(conflicts: &[Conflict]) -> CsvTable {
    let mut table = CsvTable::new(&["variant", "bases", "count_bases", "has_sequence", "W", "p"]);
    for c in conflicts {
        table.push(vec![
            c.variant.clone(),
            c.base_letters().join(";"),
            c.bases.len().to_string(),
            flag(c.has_sequence),
            c.weight.map(weight).unwrap_or_default(),
            c.share.map(share).unwrap_or_default(),
        ]);
    }
    table
}

/// 변형 오름차순 → 기준 문자 오름차순
pub fn conflicts_breakdown(conflicts: &[Conflict]) -> CsvTable {
    let mut sorted: Vec<&Conflict> = conflicts.iter().collect();
    sorted.sort_by(|a, b| a.variant.cmp(&b.variant));

    let mut table = CsvTable::new(&["variant", "base_letter", "originals", "source_languages"]);
    for c in sorted {
        for base in &c.bases {
            table.push(vec![
                c.variant.clone(),
                base.base.clone(),
                join(&base.originals, ","),
                join(&base.languages, ","),
            ]);
        }
    }
    table
}

pub fn modifier_priority(rows: &[ModifierRow]) -> CsvTable {
    let mut table = CsvTable::new(&["modifier", "W_total", "p_total", "samples", "examples"]);
    for r in rows {
        table.push(vec![
            r.modifier.clone(),
            format!("{:.12}", r.weight),
            format!("{:.12}", r.share),
            r.samples.to_string(),
            r.examples.join("; "),
        ]);
    }
    table
}

pub fn longpress_missing(order: &LongpressOrder) -> CsvTable {
    let mut table = CsvTable::new(&["type", "value"]);
    for row in order.missing() {
        table.push(vec![row.kind.to_string(), row.value.clone()]);
    }
    table
}
