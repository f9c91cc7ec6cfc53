//! 실행 설정 로드/저장 (JSON)

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::analysis::modifier::DEFAULT_MODIFIER_EXAMPLES;
use crate::core::normalize::language_code;
use crate::ranking::LongpressOptions;
use crate::table::schema::{frequency_schema, mapping_schema, population_schema};
use crate::table::{FrequencyOptions, MappingOptions, Schema, SchemaOverrides, SelectionPolicy};
use crate::weight::aggregator::DEFAULT_ALPHA;
use crate::weight::symbol::DEFAULT_MAX_GRAPHEMES;
use crate::weight::AlphaPolicy;

/// 설정 에러
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("설정 파일을 읽을 수 없습니다 ({}): {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("설정 파일 파싱 실패 ({}): {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("설정 직렬화 실패: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("잘못된 설정값: {0}")]
    Invalid(String),
}

/// long-press 순서 설정
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct LongpressConfig {
    /// 키당 최대 후보 수 (없으면 전체)
    #[serde(default)]
    pub top_k: Option<usize>,
    /// 키 → 맨 앞에 둘 변형
    #[serde(default = "default_pins")]
    pub pins: BTreeMap<String, String>,
    /// 키 → 항상 넣을 변형
    #[serde(default = "default_hard_extras")]
    pub hard_extras: BTreeMap<String, Vec<String>>,
}

fn default_pins() -> BTreeMap<String, String> {
    LongpressOptions::default().pins
}

fn default_hard_extras() -> BTreeMap<String, Vec<String>> {
    LongpressOptions::default().hard_extras
}

impl Default for LongpressConfig {
    fn default() -> Self {
        Self {
            top_k: None,
            pins: default_pins(),
            hard_extras: default_hard_extras(),
        }
    }
}

/// 파이프라인 설정
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct PipelineConfig {
    /// 빈도 데이터가 없는 언어의 대체 가중치 비율
    #[serde(default = "default_alpha")]
    pub alpha: f64,
    /// 언어별 alpha
    #[serde(default = "default_alpha_overrides")]
    pub alpha_overrides: BTreeMap<String, f64>,
    /// 분석에서 뺄 언어 코드
    #[serde(default = "default_excluded_languages")]
    pub excluded_languages: BTreeSet<String>,
    /// 분석에서 뺄 독립 변형 (시퀀스 안의 글자는 유지)
    #[serde(default = "default_excluded_variants")]
    pub excluded_variants: BTreeSet<String>,
    /// 언어 → 우선 사용할 빈도 데이터 벤더
    #[serde(default = "default_vendor_overrides")]
    pub vendor_overrides: BTreeMap<String, String>,
    /// 언어별 Σf 허용 범위
    #[serde(default = "default_frequency_sum_band")]
    pub frequency_sum_band: (f64, f64),
    /// 수식 문자 표의 예시 수
    #[serde(default = "default_modifier_examples")]
    pub modifier_examples: usize,
    /// 기호 표에 넣을 변형의 최대 그래핌 수
    #[serde(default = "default_symbol_max_graphemes")]
    pub symbol_max_graphemes: usize,
    #[serde(default)]
    pub longpress: LongpressConfig,
    /// 테이블 → 필드 → 열 이름 별칭 (기본 목록 교체)
    #[serde(default)]
    pub schema: SchemaOverrides,
}

fn default_alpha() -> f64 {
    DEFAULT_ALPHA
}

fn default_alpha_overrides() -> BTreeMap<String, f64> {
    BTreeMap::from([("akv".to_string(), 0.001)])
}

fn default_excluded_languages() -> BTreeSet<String> {
    ["lang", "ru", "rus"].iter().map(|s| s.to_string()).collect()
}

fn default_excluded_variants() -> BTreeSet<String> {
    ["Ё", "Ъ"].iter().map(|s| s.to_string()).collect()
}

fn default_vendor_overrides() -> BTreeMap<String, String> {
    BTreeMap::from([("abk".to_string(), "Tamaz_Kharchlaa".to_string())])
}

fn default_frequency_sum_band() -> (f64, f64) {
    (0.98, 1.02)
}

fn default_modifier_examples() -> usize {
    DEFAULT_MODIFIER_EXAMPLES
}

fn default_symbol_max_graphemes() -> usize {
    DEFAULT_MAX_GRAPHEMES
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            alpha: default_alpha(),
            alpha_overrides: default_alpha_overrides(),
            excluded_languages: default_excluded_languages(),
            excluded_variants: default_excluded_variants(),
            vendor_overrides: default_vendor_overrides(),
            frequency_sum_band: default_frequency_sum_band(),
            modifier_examples: default_modifier_examples(),
            symbol_max_graphemes: default_symbol_max_graphemes(),
            longpress: LongpressConfig::default(),
            schema: SchemaOverrides::new(),
        }
    }
}

impl PipelineConfig {
    /// 새 설정 생성
    pub fn new() -> Self {
        Self::default()
    }

    /// 기본 alpha 설정
    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    /// 언어별 alpha 설정
    pub fn with_alpha_override(mut self, language: &str, alpha: f64) -> Self {
        self.alpha_overrides.insert(language.to_string(), alpha);
        self
    }

    /// 제외 언어 추가
    pub fn with_excluded_language(mut self, language: &str) -> Self {
        self.excluded_languages.insert(language.to_string());
        self
    }

    /// 벤더 지정
    pub fn with_vendor(mut self, language: &str, vendor: &str) -> Self {
        self.vendor_overrides.insert(language.to_string(), vendor.to_string());
        self
    }

    /// 키당 후보 수 제한
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.longpress.top_k = Some(top_k);
        self
    }

    /// 값 범위 검사
    pub fn validate(&self) -> Result<(), ConfigError> {
        let alphas = std::iter::once(self.alpha).chain(self.alpha_overrides.values().copied());
        for alpha in alphas {
            if !(0.0..=1.0).contains(&alpha) {
                return Err(ConfigError::Invalid(format!("alpha는 0..1 범위여야 합니다: {}", alpha)));
            }
        }
        let (low, high) = self.frequency_sum_band;
        if !(low.is_finite() && high.is_finite() && low <= high) {
            return Err(ConfigError::Invalid(format!("frequency_sum_band가 잘못되었습니다: ({}, {})", low, high)));
        }
        if self.symbol_max_graphemes == 0 {
            return Err(ConfigError::Invalid("symbol_max_graphemes는 1 이상이어야 합니다".into()));
        }
        Ok(())
    }

    /// 정규화된 제외 언어 집합
    pub fn excluded_language_set(&self) -> BTreeSet<String> {
        self.excluded_languages.iter().map(|l| language_code(l)).collect()
    }

    pub fn alpha_policy(&self) -> AlphaPolicy {
        let overrides = self
            .alpha_overrides
            .iter()
            .map(|(lang, alpha)| (language_code(lang), *alpha))
            .collect();
        AlphaPolicy::new(self.alpha, overrides)
    }

    pub fn selection_policy(&self) -> SelectionPolicy {
        let overrides = self
            .vendor_overrides
            .iter()
            .map(|(lang, vendor)| (language_code(lang), vendor.trim().to_string()))
            .collect();
        SelectionPolicy::new(overrides)
    }

    pub fn frequency_options(&self) -> FrequencyOptions {
        FrequencyOptions {
            excluded_languages: self.excluded_language_set(),
            excluded_variants: self.excluded_variants.clone(),
            selection: self.selection_policy(),
            sum_band: self.frequency_sum_band,
        }
    }

    pub fn mapping_options(&self) -> MappingOptions {
        MappingOptions {
            excluded_languages: self.excluded_language_set(),
            excluded_variants: self.excluded_variants.clone(),
        }
    }

    pub fn longpress_options(&self) -> LongpressOptions {
        LongpressOptions {
            top_k: self.longpress.top_k,
            pins: self.longpress.pins.clone(),
            hard_extras: self.longpress.hard_extras.clone(),
        }
    }

    pub fn population_schema(&self) -> Schema {
        population_schema().with_overrides(&self.schema)
    }

    pub fn frequency_schema(&self) -> Schema {
        frequency_schema().with_overrides(&self.schema)
    }

    pub fn mapping_schema(&self) -> Schema {
        mapping_schema().with_overrides(&self.schema)
    }
}

/// 설정 파일 로드 (파일이 없으면 기본값)
pub fn load_config(path: &Path) -> Result<PipelineConfig, ConfigError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            log::info!("설정 파일 없음 ({}), 기본값 사용", path.display());
            return Ok(PipelineConfig::default());
        }
        Err(source) => {
            return Err(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    let config: PipelineConfig = serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    config.validate()?;
    Ok(config)
}

/// 설정 파일 저장
pub fn save_config(config: &PipelineConfig, path: &Path) -> Result<(), ConfigError> {
    let io_error = |source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_error)?;
    }
    let json = serde_json::to_string_pretty(config)?;
    fs::write(path, json).map_err(io_error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PipelineConfig::default();
        assert!((config.alpha - 0.01).abs() < f64::EPSILON);
        assert_eq!(config.alpha_policy().alpha("akv"), 0.001);
        assert_eq!(config.alpha_policy().alpha("kbd"), 0.01);
        assert!(config.excluded_languages.contains("ru"));
        assert_eq!(config.mapping_options().excluded_variants.len(), 2);
        assert!(config.frequency_options().excluded_variants.contains("Ё"));
        assert_eq!(config.modifier_examples, 6);
        assert_eq!(config.symbol_max_graphemes, 4);
        assert_eq!(config.longpress.pins.get("Е").map(String::as_str), Some("Ё"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_pattern() {
        let config = PipelineConfig::new()
            .with_alpha(0.05)
            .with_alpha_override("AV ", 0.2)
            .with_excluded_language("kk")
            .with_vendor("kbd", "leipzig")
            .with_top_k(3);

        assert_eq!(config.alpha_policy().alpha("av"), 0.2);
        assert_eq!(config.alpha_policy().alpha("ady"), 0.05);
        assert!(config.excluded_language_set().contains("kk"));
        assert_eq!(config.longpress_options().top_k, Some(3));
        let policy = config.selection_policy();
        assert_eq!(policy.choose("kbd", &["a".to_string(), "leipzig".to_string()]), Some("leipzig"));
    }

    #[test]
    fn test_backward_compat_missing_field() {
        // 일부 필드만 있는 설정 파일은 나머지를 기본값으로 채움
        let json = r#"{"alpha": 0.02, "longpress": {"top_k": 5}}"#;
        let config: PipelineConfig = serde_json::from_str(json).unwrap();
        assert!((config.alpha - 0.02).abs() < f64::EPSILON);
        assert_eq!(config.longpress.top_k, Some(5));
        assert_eq!(config.longpress.hard_extras.get("Н"), Some(&vec!["ᵸ".to_string()]));
        assert_eq!(config.vendor_overrides.get("abk").map(String::as_str), Some("Tamaz_Kharchlaa"));
    }

    #[test]
    fn test_load_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(&dir.path().join("absent.json")).unwrap();
        assert_eq!(config, PipelineConfig::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("longpress.json");
        let config = PipelineConfig::new().with_top_k(2).with_alpha(0.03);
        save_config(&config, &path).unwrap();
        assert_eq!(load_config(&path).unwrap(), config);
    }

    #[test]
    fn test_invalid_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(load_config(&path), Err(ConfigError::Parse { .. })));

        fs::write(&path, r#"{"alpha": 2.0}"#).unwrap();
        assert!(matches!(load_config(&path), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_schema_overrides_applied() {
        let json = r#"{"schema": {"population": {"population": ["speakers_2021"]}}}"#;
        let config: PipelineConfig = serde_json::from_str(json).unwrap();
        let headers = vec!["lang".to_string(), "speakers_2021".to_string()];
        assert!(config.population_schema().resolve(&headers).is_ok());
    }
}
