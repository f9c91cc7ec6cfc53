//! 명시적 스키마와 열 이름 해석기
//!
//! 논리 필드마다 허용하는 원본 열 이름 목록(순서 있음)을 두고, 헤더에서 처음
//! 일치하는 열을 고릅니다. 필수 필드가 해석되지 않으면 치명적 에러입니다.
//! 비교는 공백 제거 + 소문자 기준입니다.
//!
//! 기본 목록은 아래 상수로 두고, 설정 파일의 `schema` 항목으로 덮어쓸 수 있습니다.

use std::collections::{BTreeMap, HashMap};

use super::error::TableError;

pub const POPULATION_TABLE: &str = "population";
pub const FREQUENCY_TABLE: &str = "frequency";
pub const MAPPING_TABLE: &str = "mapping";

pub const LANGUAGE_CODE: &str = "language_code";
pub const POPULATION: &str = "population";
pub const YEAR: &str = "year";
pub const VARIANT: &str = "variant";
pub const FREQUENCY: &str = "f_i";
pub const COUNT: &str = "C_i";
pub const TOTAL: &str = "M_i";
pub const VENDOR: &str = "vendor";
pub const BASE_LETTER: &str = "base_letter";
pub const SOURCE_LANGUAGES: &str = "source_languages";
pub const HAS_SEQUENCE: &str = "has_sequence";

const LANGUAGE_ALIASES: &[&str] = &["language_code", "lang_code", "lang", "language"];
const POPULATION_ALIASES: &[&str] = &[
    "population",
    "total_speakers_global",
    "total_speakers_rf",
    "speakers",
    "s_i",
];
const YEAR_ALIASES: &[&str] = &["year"];
const VARIANT_ALIASES: &[&str] = &["variant", "letter", "symbol", "char"];
const FREQUENCY_ALIASES: &[&str] = &["f_i", "f", "freq_share"];
const COUNT_ALIASES: &[&str] = &["c_i", "c", "count"];
const TOTAL_ALIASES: &[&str] = &["m_i", "m", "total"];
const VENDOR_ALIASES: &[&str] = &["vendor", "source"];
const BASE_ALIASES: &[&str] = &["base_letter", "base", "key"];
const MAPPING_VARIANT_ALIASES: &[&str] = &["variant", "letter", "char"];
const LANGUAGES_ALIASES: &[&str] = &["source_languages", "languages", "langs"];
const SEQUENCE_ALIASES: &[&str] = &["has_sequence", "sequence"];

/// 설정에서 읽은 별칭 덮어쓰기: 테이블 → 필드 → 별칭 목록
pub type SchemaOverrides = BTreeMap<String, BTreeMap<String, Vec<String>>>;

/// 논리 필드 하나
#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub field: &'static str,
    pub aliases: Vec<String>,
    pub required: bool,
}

/// 테이블 스키마
#[derive(Debug, Clone)]
pub struct Schema {
    table: &'static str,
    fields: Vec<FieldSpec>,
}

impl Schema {
    pub fn new(table: &'static str) -> Self {
        Self {
            table,
            fields: Vec::new(),
        }
    }

    /// 필수 필드 추가
    pub fn required(self, field: &'static str, aliases: &[&str]) -> Self {
        self.field(field, aliases, true)
    }

    /// 선택 필드 추가
    pub fn optional(self, field: &'static str, aliases: &[&str]) -> Self {
        self.field(field, aliases, false)
    }

    fn field(mut self, field: &'static str, aliases: &[&str], required: bool) -> Self {
        self.fields.push(FieldSpec {
            field,
            aliases: aliases.iter().map(|a| a.to_string()).collect(),
            required,
        });
        self
    }

    /// 설정의 별칭 목록으로 기본 목록을 교체
    pub fn with_overrides(mut self, overrides: &SchemaOverrides) -> Self {
        if let Some(table) = overrides.get(self.table) {
            for spec in &mut self.fields {
                if let Some(aliases) = table.get(spec.field) {
                    if !aliases.is_empty() {
                        spec.aliases = aliases.clone();
                    }
                }
            }
        }
        self
    }

    pub fn table(&self) -> &'static str {
        self.table
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// 헤더에 대해 필드별 열 위치를 해석
    pub fn resolve(&self, headers: &[String]) -> Result<ResolvedSchema, TableError> {
        let normalized: Vec<String> = headers.iter().map(|h| h.trim().to_lowercase()).collect();
        let mut columns = HashMap::new();

        for spec in &self.fields {
            let found = spec
                .aliases
                .iter()
                .find_map(|alias| normalized.iter().position(|h| *h == alias.trim().to_lowercase()));

            match found {
                Some(idx) => {
                    columns.insert(spec.field, idx);
                }
                None if spec.required => {
                    return Err(TableError::MissingField {
                        table: self.table,
                        field: spec.field,
                        tried: spec.aliases.clone(),
                        available: headers.to_vec(),
                    });
                }
                None => {}
            }
        }

        Ok(ResolvedSchema { columns })
    }
}

/// 해석된 스키마: 논리 필드 → 열 위치
#[derive(Debug, Clone)]
pub struct ResolvedSchema {
    columns: HashMap<&'static str, usize>,
}

impl ResolvedSchema {
    /// 필드가 헤더에 있는지
    pub fn has(&self, field: &str) -> bool {
        self.columns.contains_key(field)
    }

    /// 행에서 필드 값 (앞뒤 공백 제거, 비어 있으면 None)
    pub fn get<'r>(&self, row: &'r [String], field: &str) -> Option<&'r str> {
        let idx = *self.columns.get(field)?;
        row.get(idx).map(|cell| cell.trim()).filter(|cell| !cell.is_empty())
    }
}

/// 인구 테이블 기본 스키마
pub fn population_schema() -> Schema {
    Schema::new(POPULATION_TABLE)
        .required(LANGUAGE_CODE, LANGUAGE_ALIASES)
        .required(POPULATION, POPULATION_ALIASES)
        .optional(YEAR, YEAR_ALIASES)
}

/// 빈도 테이블 기본 스키마 (`f_i` 또는 `C_i`/`M_i` 중 하나는 로더가 확인)
pub fn frequency_schema() -> Schema {
    Schema::new(FREQUENCY_TABLE)
        .required(LANGUAGE_CODE, LANGUAGE_ALIASES)
        .required(VARIANT, VARIANT_ALIASES)
        .optional(FREQUENCY, FREQUENCY_ALIASES)
        .optional(COUNT, COUNT_ALIASES)
        .optional(TOTAL, TOTAL_ALIASES)
        .optional(VENDOR, VENDOR_ALIASES)
}

/// 매핑 테이블 기본 스키마
pub fn mapping_schema() -> Schema {
    Schema::new(MAPPING_TABLE)
        .required(BASE_LETTER, BASE_ALIASES)
        .required(VARIANT, MAPPING_VARIANT_ALIASES)
        .required(SOURCE_LANGUAGES, LANGUAGES_ALIASES)
        .optional(HAS_SEQUENCE, SEQUENCE_ALIASES)
}
