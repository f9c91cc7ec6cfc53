//! 기준 문자 → 변형 매핑 테이블
//!
//! 행은 (기준 문자, 변형, 언어 목록)입니다. 정규화 후 같은 (기준, 변형) 쌍이 된
//! 행은 하나로 합쳐집니다: 언어는 합집합, 원래 표기는 집합으로 보존합니다.
//!
//! 언어별 키 매핑 JSON 문서(`{ "А": ["Ӓ", "А̄"] }`)도 같은 집계를 거칩니다.
//! 제외 변형(기본 Ё, Ъ)은 정규화 후 키로 비교해 건너뜁니다.

use std::collections::{BTreeMap, BTreeSet};

use crate::core::alphabet::MODIFIER_CYRILLIC_EN;
use crate::core::grapheme::is_atomic;
use crate::core::normalize::{canonical_base, canonical_variant, language_code, nfc, split_languages};

use super::error::TableError;
use super::number::parse_flag;
use super::reader::RawTable;
use super::schema::{Schema, BASE_LETTER, HAS_SEQUENCE, MAPPING_TABLE, SOURCE_LANGUAGES, VARIANT};
use super::LoadStats;

/// 정규화 전 매핑 행
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingRow {
    pub base: String,
    pub variant: String,
    pub languages: Vec<String>,
}

impl MappingRow {
    pub fn new(base: &str, variant: &str, languages: &[&str]) -> Self {
        Self {
            base: base.to_string(),
            variant: variant.to_string(),
            languages: languages.iter().map(|l| language_code(l)).collect(),
        }
    }
}

/// 매핑 테이블 로드 옵션
#[derive(Debug, Clone, Default)]
pub struct MappingOptions {
    pub excluded_languages: BTreeSet<String>,
    /// 정규 키 기준
    pub excluded_variants: BTreeSet<String>,
}

impl MappingOptions {
    fn excluded_variant_keys(&self) -> BTreeSet<String> {
        self.excluded_variants.iter().map(|v| canonical_variant(v)).collect()
    }
}

/// 집계된 매핑 항목
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingEntry {
    /// 정규화된 기준 문자 (그래핌 하나)
    pub base: String,
    /// 정규 변형 키
    pub variant: String,
    /// 이 쌍을 쓰는 언어
    pub languages: BTreeSet<String>,
    /// 정규화 후 코드포인트가 둘 이상인지
    pub is_sequence: bool,
    /// 합쳐진 원래 표기 (NFC)
    pub originals: BTreeSet<String>,
}

/// (기준 문자, 변형) → 매핑 항목
#[derive(Debug, Clone, Default)]
pub struct MappingTable {
    entries: BTreeMap<(String, String), MappingEntry>,
    stats: LoadStats,
}

impl MappingTable {
    /// 원시 테이블에서 로드
    ///
    /// 언어 목록이 있었지만 모두 제외 대상이면 행을 건너뜁니다.
    /// 언어 목록이 처음부터 비어 있는 행은 유지합니다 (가중치는 받지 못함).
    pub fn from_raw(raw: &RawTable, schema: &Schema, options: &MappingOptions) -> Result<Self, TableError> {
        let resolved = schema.resolve(raw.headers())?;
        let mut stats = LoadStats::new(raw.len());
        let mut rows = Vec::with_capacity(raw.len());

        for (idx, row) in raw.rows().iter().enumerate() {
            let line = idx + 2;
            let (Some(base), Some(variant)) = (resolved.get(row, BASE_LETTER), resolved.get(row, VARIANT)) else {
                log::warn!("[mapping] {}행: 기준 문자 또는 변형 없음, 버림", line);
                stats.dropped += 1;
                continue;
            };

            let listed = resolved.get(row, SOURCE_LANGUAGES).map(split_languages).unwrap_or_default();
            let languages: Vec<String> = listed
                .iter()
                .filter(|l| !options.excluded_languages.contains(*l))
                .cloned()
                .collect();
            if !listed.is_empty() && languages.is_empty() {
                stats.skipped += 1;
                continue;
            }

            if let Some(flag) = resolved.get(row, HAS_SEQUENCE).and_then(parse_flag) {
                let computed = canonical_variant(variant).chars().count() > 1;
                if flag != computed {
                    log::debug!("[mapping] {}행 ({} → {}): 입력 시퀀스 플래그 무시", line, base, variant);
                }
            }

            rows.push(MappingRow {
                base: base.to_string(),
                variant: variant.to_string(),
                languages,
            });
        }

        let mut table = Self::aggregate_rows(rows, &options.excluded_variant_keys());
        table.stats = LoadStats {
            dropped: stats.dropped + table.stats.dropped,
            skipped: stats.skipped + table.stats.skipped,
            total: stats.total,
            accepted: 0,
        };
        table.stats.accepted = table.stats.total - table.stats.dropped - table.stats.skipped;

        if table.is_empty() {
            return Err(TableError::Empty {
                table: schema.table(),
                total: table.stats.total,
                dropped: table.stats.dropped,
            });
        }

        log::info!(
            "[mapping] 항목 {}개 로드 (행 {}, 버림 {}, 제외 {})",
            table.len(),
            table.stats.total,
            table.stats.dropped,
            table.stats.skipped
        );
        Ok(table)
    }

    /// 정규화 전 행을 정규화하고 (기준, 변형) 쌍별로 집계
    ///
    /// 기준 문자가 비었거나 그래핌 하나가 아니면, 또는 변형이 비었으면 버립니다.
    pub fn from_rows(rows: impl IntoIterator<Item = MappingRow>) -> Self {
        Self::aggregate_rows(rows, &BTreeSet::new())
    }

    fn aggregate_rows(rows: impl IntoIterator<Item = MappingRow>, excluded_variants: &BTreeSet<String>) -> Self {
        let mut entries: BTreeMap<(String, String), MappingEntry> = BTreeMap::new();
        let mut stats = LoadStats::default();

        for row in rows {
            stats.total += 1;
            let base = canonical_base(&row.base);
            let variant = canonical_variant(&row.variant);
            if base.is_empty() || variant.is_empty() {
                stats.dropped += 1;
                continue;
            }
            if !is_atomic(&base) {
                log::warn!("[mapping] 기준 문자 '{}'가 그래핌 하나가 아님, 버림", base);
                stats.dropped += 1;
                continue;
            }
            if excluded_variants.contains(&variant) {
                stats.skipped += 1;
                continue;
            }

            let is_sequence = variant.chars().count() > 1;
            let entry = entries
                .entry((base.clone(), variant.clone()))
                .or_insert_with(|| MappingEntry {
                    base,
                    variant,
                    languages: BTreeSet::new(),
                    is_sequence,
                    originals: BTreeSet::new(),
                });
            entry.is_sequence |= is_sequence;
            entry.languages.extend(row.languages.into_iter().filter(|l| !l.is_empty()));
            entry.originals.insert(nfc(&row.variant));
        }

        stats.accepted = stats.total - stats.dropped - stats.skipped;
        Self { entries, stats }
    }

    /// 언어별 키 매핑 문서 여러 개로 테이블 구성
    pub fn from_key_mappings<'a>(
        documents: impl IntoIterator<Item = (&'a str, &'a serde_json::Value)>,
        options: &MappingOptions,
    ) -> Result<Self, TableError> {
        let mut rows = Vec::new();
        for (language, document) in documents {
            if options.excluded_languages.contains(&language_code(language)) {
                continue;
            }
            rows.extend(key_mapping_rows(language, document)?);
        }
        let table = Self::aggregate_rows(rows, &options.excluded_variant_keys());
        if table.is_empty() {
            return Err(TableError::Empty {
                table: MAPPING_TABLE,
                total: table.stats.total,
                dropped: table.stats.dropped,
            });
        }
        Ok(table)
    }

    /// 기준 문자 → 변형 순서로 정렬된 항목
    pub fn entries(&self) -> impl Iterator<Item = &MappingEntry> {
        self.entries.values()
    }

    /// 그래핌 하나짜리 항목만 남긴 보기
    ///
    /// `ᵸ`가 시퀀스 안에만 나오면 그 언어들을 모아 (Н, ᵸ) 항목 하나로 추가합니다.
    pub fn atomic_view(&self) -> Vec<MappingEntry> {
        let modifier = MODIFIER_CYRILLIC_EN.to_string();
        let mut atomic: Vec<MappingEntry> = Vec::new();
        let mut rolled_languages = BTreeSet::new();
        let mut rolled_originals = BTreeSet::new();
        let mut rolled = false;

        for entry in self.entries.values() {
            if is_atomic(&entry.variant) {
                atomic.push(MappingEntry {
                    is_sequence: false,
                    ..entry.clone()
                });
            } else if entry.variant.contains(MODIFIER_CYRILLIC_EN) {
                rolled = true;
                rolled_languages.extend(entry.languages.iter().cloned());
                rolled_originals.extend(entry.originals.iter().cloned());
            }
        }

        let has_special = atomic.iter().any(|e| e.base == "Н" && e.variant == modifier);
        if rolled && !has_special {
            atomic.push(MappingEntry {
                base: "Н".to_string(),
                variant: modifier,
                languages: rolled_languages,
                is_sequence: false,
                originals: rolled_originals,
            });
            atomic.sort_by(|a, b| (&a.base, &a.variant).cmp(&(&b.base, &b.variant)));
        }
        atomic
    }

    /// 항목 조회
    pub fn get(&self, base: &str, variant: &str) -> Option<&MappingEntry> {
        self.entries.get(&(base.to_string(), variant.to_string()))
    }

    /// 언어 → 그 언어가 쓰는 정규 변형 집합
    pub fn variants_by_language(&self) -> BTreeMap<&str, BTreeSet<&str>> {
        let mut result: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
        for entry in self.entries.values() {
            for language in &entry.languages {
                result.entry(language.as_str()).or_default().insert(entry.variant.as_str());
            }
        }
        result
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

/// 키 매핑 문서 하나를 행으로 펼침
///
/// # 형식
/// ```json
/// { "А": ["Ӓ", "А̄"], "Н": "Ң" }
/// ```
pub fn key_mapping_rows(language: &str, document: &serde_json::Value) -> Result<Vec<MappingRow>, TableError> {
    use serde_json::Value;

    let obj = document.as_object().ok_or_else(|| TableError::Format {
        table: MAPPING_TABLE,
        message: format!("{} 키 매핑의 최상위 값이 객체가 아닙니다", language),
    })?;

    let language = language_code(language);
    let mut rows = Vec::new();
    for (base, value) in obj {
        let variants: Vec<&str> = match value {
            Value::String(s) => vec![s.as_str()],
            Value::Array(items) => items.iter().filter_map(|v| v.as_str()).collect(),
            Value::Null => Vec::new(),
            other => {
                return Err(TableError::Format {
                    table: MAPPING_TABLE,
                    message: format!("{} 키 매핑의 '{}' 값이 문자열/배열이 아닙니다: {}", language, base, other),
                });
            }
        };
        for variant in variants {
            if variant.trim().is_empty() {
                continue;
            }
            rows.push(MappingRow {
                base: base.clone(),
                variant: variant.to_string(),
                languages: vec![language.clone()],
            });
        }
    }
    Ok(rows)
}
