//! 인구(화자 수) 테이블
//!
//! 언어마다 화자 수 하나를 고릅니다. 같은 언어의 행이 여러 개면 연도가 가장 큰 행,
//! 연도가 같으면 값이 가장 큰 행을 씁니다. 연도가 없는 행은 연도가 있는 행이
//! 하나도 없을 때만 후보가 됩니다.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

use crate::core::normalize::language_code;

use super::error::TableError;
use super::number::{parse_count, parse_year};
use super::reader::RawTable;
use super::schema::{Schema, LANGUAGE_CODE, POPULATION, YEAR};
use super::LoadStats;

/// 언어 하나의 화자 수
#[derive(Debug, Clone, PartialEq)]
pub struct PopulationEntry {
    pub language: String,
    pub speakers: f64,
    pub year: Option<i32>,
}

impl PopulationEntry {
    pub fn new(language: impl Into<String>, speakers: f64, year: Option<i32>) -> Self {
        Self {
            language: language_code(&language.into()),
            speakers,
            year,
        }
    }

    /// 선택 우선순위: 연도(없음 < 있음) → 값
    fn precedence(&self, other: &Self) -> Ordering {
        self.year
            .cmp(&other.year)
            .then_with(|| self.speakers.total_cmp(&other.speakers))
    }
}

/// 언어 → 화자 수
#[derive(Debug, Clone, Default)]
pub struct PopulationTable {
    entries: BTreeMap<String, PopulationEntry>,
    stats: LoadStats,
}

impl PopulationTable {
    /// 원시 테이블에서 로드
    pub fn from_raw(raw: &RawTable, schema: &Schema, excluded: &BTreeSet<String>) -> Result<Self, TableError> {
        let resolved = schema.resolve(raw.headers())?;
        let mut stats = LoadStats::new(raw.len());
        let mut candidates = Vec::new();

        for (idx, row) in raw.rows().iter().enumerate() {
            let line = idx + 2;
            let Some(language) = resolved.get(row, LANGUAGE_CODE).map(language_code) else {
                log::warn!("[population] {}행: 언어 코드 없음, 버림", line);
                stats.dropped += 1;
                continue;
            };
            if excluded.contains(&language) {
                stats.skipped += 1;
                continue;
            }

            let speakers = resolved.get(row, POPULATION).and_then(parse_count);
            let Some(speakers) = speakers.filter(|s| *s >= 0.0) else {
                log::warn!("[population] {}행 ({}): 화자 수를 해석할 수 없음, 버림", line, language);
                stats.dropped += 1;
                continue;
            };

            let year = match resolved.get(row, YEAR) {
                Some(raw_year) => match parse_year(raw_year) {
                    Some(y) => Some(y),
                    None => {
                        log::warn!("[population] {}행 ({}): 연도 '{}' 해석 실패, 버림", line, language, raw_year);
                        stats.dropped += 1;
                        continue;
                    }
                },
                None => None,
            };

            candidates.push(PopulationEntry { language, speakers, year });
        }

        let table = Self::from_entries(candidates).with_stats(stats);
        if table.is_empty() {
            return Err(TableError::Empty {
                table: schema.table(),
                total: table.stats.total,
                dropped: table.stats.dropped,
            });
        }

        log::info!(
            "[population] 언어 {}개 로드 (행 {}, 버림 {}, 제외 {})",
            table.len(),
            table.stats.total,
            table.stats.dropped,
            table.stats.skipped
        );
        Ok(table)
    }

    /// 후보 목록에서 언어별 대표 행을 골라 테이블 구성
    pub fn from_entries(entries: impl IntoIterator<Item = PopulationEntry>) -> Self {
        let mut best: BTreeMap<String, PopulationEntry> = BTreeMap::new();
        let mut count = 0;
        for entry in entries {
            count += 1;
            let replace = best
                .get(&entry.language)
                .map_or(true, |current| current.precedence(&entry) == Ordering::Less);
            if replace {
                best.insert(entry.language.clone(), entry);
            }
        }
        let stats = LoadStats {
            total: count,
            accepted: count,
            ..LoadStats::default()
        };
        Self { entries: best, stats }
    }

    fn with_stats(mut self, stats: LoadStats) -> Self {
        self.stats = LoadStats {
            accepted: stats.total - stats.dropped - stats.skipped,
            ..stats
        };
        self
    }

    /// 화자 수 조회
    pub fn speakers(&self, language: &str) -> Option<f64> {
        self.entries.get(language).map(|e| e.speakers)
    }

    /// 언어 코드 (정렬 순)
    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(|k| k.as_str())
    }

    pub fn entries(&self) -> impl Iterator<Item = &PopulationEntry> {
        self.entries.values()
    }

    /// 전체 화자 수
    pub fn total(&self) -> f64 {
        self.entries.values().map(|e| e.speakers).sum()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> &LoadStats {
        &self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::schema::population_schema;

    fn load(csv: &str) -> Result<PopulationTable, TableError> {
        let raw = RawTable::from_csv("population", csv).unwrap();
        let excluded: BTreeSet<String> = ["ru".to_string()].into_iter().collect();
        PopulationTable::from_raw(&raw, &population_schema(), &excluded)
    }

    #[test]
    fn test_highest_year_wins() {
        let table = load("lang_code,population,year\nkbd,500000,2002\nkbd,516826,2010\nkbd,490000,2021\n").unwrap();
        assert_eq!(table.speakers("kbd"), Some(490_000.0));
    }

    #[test]
    fn test_same_year_highest_value() {
        let table = load("lang_code,population,year\nady,100,2010\nady,300,2010\nady,200,2010\n").unwrap();
        assert_eq!(table.speakers("ady"), Some(300.0));
    }

    #[test]
    fn test_dated_rows_beat_undated() {
        let table = load("lang_code,population,year\nav,900000,\nav,700000,2010\n").unwrap();
        assert_eq!(table.speakers("av"), Some(700_000.0));
    }

    #[test]
    fn test_drops_and_exclusions() {
        let table = load("lang_code,population,year\nkbd,abc,2010\n,100,2010\nru,1000,2010\nady,1 000,2010\n").unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.speakers("ady"), Some(1000.0));
        assert_eq!(table.stats().dropped, 2);
        assert_eq!(table.stats().skipped, 1);
        assert_eq!(table.stats().accepted, 1);
    }

    #[test]
    fn test_empty_table_is_fatal() {
        let result = load("lang_code,population\nkbd,n/a\n");
        assert!(matches!(result, Err(TableError::Empty { table: "population", total: 1, dropped: 1 })));
    }

    #[test]
    fn test_missing_column_is_fatal() {
        let result = load("lang_code,year\nkbd,2010\n");
        assert!(matches!(result, Err(TableError::MissingField { field: "population", .. })));
    }

    #[test]
    fn test_language_codes_normalized() {
        let table = PopulationTable::from_entries(vec![PopulationEntry::new(" KBD ", 10.0, None)]);
        assert_eq!(table.speakers("kbd"), Some(10.0));
        assert_eq!(table.total(), 10.0);
    }
}
