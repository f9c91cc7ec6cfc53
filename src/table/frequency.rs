//! 언어별 문자 빈도 테이블
//!
//! 레코드 하나는 (언어, 변형, 상대 빈도 f)입니다. `f_i`가 없으면 `C_i / M_i`로 계산합니다.
//! 변형은 수집 시점에 정규 키로 바뀌므로, 정규화 후 같은 키가 된 행은 합산됩니다.
//! 선택된 벤더의 행이 하나라도 해석되면 "실제 데이터가 있는 언어"입니다.
//! f = 0인 행도 여기에 포함되며, 기여만 하지 않습니다.

use std::collections::{BTreeMap, BTreeSet};

use crate::core::normalize::{canonical_variant, language_code};

use super::error::TableError;
use super::number::parse_decimal;
use super::reader::RawTable;
use super::schema::{Schema, COUNT, FREQUENCY, LANGUAGE_CODE, TOTAL, VARIANT, VENDOR};
use super::selection::SelectionPolicy;
use super::LoadStats;

/// 빈도 테이블 로드 옵션
#[derive(Debug, Clone)]
pub struct FrequencyOptions {
    pub excluded_languages: BTreeSet<String>,
    /// 분석에서 빼는 변형 (정규 키 기준)
    pub excluded_variants: BTreeSet<String>,
    pub selection: SelectionPolicy,
    /// 언어별 Σf 허용 범위
    pub sum_band: (f64, f64),
}

impl Default for FrequencyOptions {
    fn default() -> Self {
        Self {
            excluded_languages: BTreeSet::new(),
            excluded_variants: BTreeSet::new(),
            selection: SelectionPolicy::default(),
            sum_band: (0.98, 1.02),
        }
    }
}

/// 빈도 레코드 (정규화 완료)
#[derive(Debug, Clone, PartialEq)]
pub struct FrequencyEntry {
    pub language: String,
    pub variant: String,
    pub frequency: f64,
}

impl FrequencyEntry {
    pub fn new(language: &str, variant: &str, frequency: f64) -> Self {
        Self {
            language: language_code(language),
            variant: canonical_variant(variant),
            frequency,
        }
    }
}

/// 행 하나를 해석한 결과
struct Candidate {
    vendor: String,
    entry: FrequencyEntry,
}

/// 언어 → (정규 변형 → f)
#[derive(Debug, Clone, Default)]
pub struct FrequencyTable {
    by_language: BTreeMap<String, BTreeMap<String, f64>>,
    /// 해석된 행이 있는 언어 (f = 0만 있는 언어 포함)
    with_data: BTreeSet<String>,
    vendors: BTreeMap<String, String>,
    /// Σf가 허용 범위를 벗어난 언어
    out_of_band: Vec<String>,
    stats: LoadStats,
}

impl FrequencyTable {
    /// 원시 테이블에서 로드
    pub fn from_raw(raw: &RawTable, schema: &Schema, options: &FrequencyOptions) -> Result<Self, TableError> {
        let resolved = schema.resolve(raw.headers())?;
        if !resolved.has(FREQUENCY) && !(resolved.has(COUNT) && resolved.has(TOTAL)) {
            let tried = schema
                .fields()
                .iter()
                .filter(|f| [FREQUENCY, COUNT, TOTAL].contains(&f.field))
                .flat_map(|f| f.aliases.iter().cloned())
                .collect();
            return Err(TableError::MissingField {
                table: schema.table(),
                field: FREQUENCY,
                tried,
                available: raw.headers().to_vec(),
            });
        }

        let excluded_variants: BTreeSet<String> =
            options.excluded_variants.iter().map(|v| canonical_variant(v)).collect();
        let mut stats = LoadStats::new(raw.len());
        let mut candidates: Vec<Candidate> = Vec::new();

        for (idx, row) in raw.rows().iter().enumerate() {
            let line = idx + 2;
            let language = resolved.get(row, LANGUAGE_CODE).map(language_code);
            let variant = resolved.get(row, VARIANT).map(canonical_variant).filter(|v| !v.is_empty());
            let (Some(language), Some(variant)) = (language, variant) else {
                log::warn!("[frequency] {}행: 언어 또는 변형 없음, 버림", line);
                stats.dropped += 1;
                continue;
            };

            if options.excluded_languages.contains(&language) || excluded_variants.contains(&variant) {
                stats.skipped += 1;
                continue;
            }

            let frequency = match resolved.get(row, FREQUENCY) {
                Some(f) => parse_decimal(f),
                None => {
                    let count = resolved.get(row, COUNT).and_then(parse_decimal);
                    let total = resolved.get(row, TOTAL).and_then(parse_decimal);
                    match (count, total) {
                        (Some(c), Some(m)) if m > 0.0 => Some(c / m),
                        _ => None,
                    }
                }
            };
            let Some(frequency) = frequency.filter(|f| *f >= 0.0) else {
                log::warn!("[frequency] {}행 ({} {}): 빈도를 해석할 수 없음, 버림", line, language, variant);
                stats.dropped += 1;
                continue;
            };
            let vendor = resolved.get(row, VENDOR).unwrap_or_default().to_string();
            candidates.push(Candidate {
                vendor,
                entry: FrequencyEntry {
                    language,
                    variant,
                    frequency,
                },
            });
        }

        // 언어별 벤더 선택
        let mut vendors_by_language: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for c in &candidates {
            let list = vendors_by_language.entry(c.entry.language.clone()).or_default();
            if !list.contains(&c.vendor) {
                list.push(c.vendor.clone());
            }
        }
        let mut chosen: BTreeMap<String, String> = BTreeMap::new();
        for (language, vendors) in &vendors_by_language {
            if let Some(vendor) = options.selection.choose(language, vendors) {
                chosen.insert(language.clone(), vendor.to_string());
            }
        }

        let mut entries = Vec::with_capacity(candidates.len());
        for c in candidates {
            if chosen.get(&c.entry.language) == Some(&c.vendor) {
                entries.push(c.entry);
            } else {
                stats.skipped += 1;
            }
        }

        let mut table = Self::from_entries(entries);
        table.vendors = chosen.into_iter().filter(|(_, v)| !v.is_empty()).collect();
        table.stats = LoadStats {
            accepted: stats.total - stats.dropped - stats.skipped,
            ..stats
        };

        if table.is_empty() {
            return Err(TableError::Empty {
                table: schema.table(),
                total: table.stats.total,
                dropped: table.stats.dropped,
            });
        }

        table.out_of_band = table.check_normalization(options.sum_band);
        log::info!(
            "[frequency] 언어 {}개 로드 (행 {}, 버림 {}, 제외 {})",
            table.len(),
            table.stats.total,
            table.stats.dropped,
            table.stats.skipped
        );
        Ok(table)
    }

    /// 정규화된 레코드로 테이블 구성 (같은 언어/변형은 합산)
    ///
    /// f = 0인 레코드는 언어를 "데이터 있음"으로 표시만 하고 변형은 넣지 않습니다.
    pub fn from_entries(entries: impl IntoIterator<Item = FrequencyEntry>) -> Self {
        let mut by_language: BTreeMap<String, BTreeMap<String, f64>> = BTreeMap::new();
        let mut with_data = BTreeSet::new();
        let mut count = 0;
        for entry in entries {
            count += 1;
            with_data.insert(entry.language.clone());
            if entry.frequency == 0.0 {
                continue;
            }
            *by_language
                .entry(entry.language)
                .or_default()
                .entry(entry.variant)
                .or_insert(0.0) += entry.frequency;
        }
        Self {
            by_language,
            with_data,
            vendors: BTreeMap::new(),
            out_of_band: Vec::new(),
            stats: LoadStats {
                total: count,
                accepted: count,
                ..LoadStats::default()
            },
        }
    }

    /// Σf가 허용 범위를 벗어난 언어를 경고하고 반환
    fn check_normalization(&self, (low, high): (f64, f64)) -> Vec<String> {
        let mut out_of_band = Vec::new();
        for language in self.languages() {
            let sum = self.sum_for(language);
            if sum < low || sum > high {
                log::warn!("[frequency] {}: Σf = {:.4} (허용 범위 {}..{})", language, sum, low, high);
                out_of_band.push(language.to_string());
            }
        }
        out_of_band
    }

    /// 실제 빈도 데이터가 있는지 (대체 경로 제외 기준)
    pub fn has_data(&self, language: &str) -> bool {
        self.with_data.contains(language)
    }

    /// 언어의 (변형, f) 목록
    pub fn variants(&self, language: &str) -> Option<&BTreeMap<String, f64>> {
        self.by_language.get(language)
    }

    /// 언어별 Σf
    pub fn sum_for(&self, language: &str) -> f64 {
        self.by_language
            .get(language)
            .map(|v| v.values().sum())
            .unwrap_or(0.0)
    }

    /// 데이터가 있는 언어 (정렬 순)
    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.with_data.iter().map(|k| k.as_str())
    }

    /// Σf가 허용 범위를 벗어난 언어
    pub fn out_of_band(&self) -> &[String] {
        &self.out_of_band
    }

    /// 언어별로 선택된 벤더
    pub fn vendor(&self, language: &str) -> Option<&str> {
        self.vendors.get(language).map(|v| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.with_data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.with_data.is_empty()
    }

    pub fn stats(&self) -> &LoadStats {
        &self.stats
    }
}
