//! 전역 변형 가중치 집계
//!
//! 언어마다 정확히 한 경로로만 기여합니다:
//! 1. 실제 빈도 데이터가 있으면 `S(lang) × f` (f = 0인 행만 있어도 이 경로)
//! 2. 없으면 (인구 + 매핑에 있는 경우) `alpha(lang) × S(lang)`를 그 언어의 변형에 균등 분배
//!
//! 언어는 정렬 순서로 순회하고, 언어별 기여를 불변 맵으로 접어(fold) 결과를 만듭니다.

use std::collections::{BTreeMap, BTreeSet};

use crate::table::{FrequencyTable, MappingTable, PopulationTable};

/// 대체 가중치 비율 기본값
pub const DEFAULT_ALPHA: f64 = 0.01;

/// 언어별 대체 가중치 비율
#[derive(Debug, Clone, PartialEq)]
pub struct AlphaPolicy {
    default: f64,
    overrides: BTreeMap<String, f64>,
}

impl Default for AlphaPolicy {
    fn default() -> Self {
        Self {
            default: DEFAULT_ALPHA,
            overrides: BTreeMap::new(),
        }
    }
}

impl AlphaPolicy {
    pub fn new(default: f64, overrides: BTreeMap<String, f64>) -> Self {
        Self { default, overrides }
    }

    /// 언어의 alpha
    pub fn alpha(&self, language: &str) -> f64 {
        self.overrides.get(language).copied().unwrap_or(self.default)
    }
}

/// 언어 기여 경로
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ContributionSource {
    /// 실제 빈도 데이터
    Frequency,
    /// 균등 분배 대체 가중치
    Fallback { alpha: f64 },
}

/// 언어 하나의 기여 요약
#[derive(Debug, Clone, PartialEq)]
pub struct LanguageContribution {
    pub language: String,
    pub source: ContributionSource,
    pub speakers: f64,
    /// 기여한 가중치 합
    pub weight: f64,
    /// 가중치를 받은 변형 수
    pub variants: usize,
}

/// 가중치가 붙은 정규 변형
#[derive(Debug, Clone, PartialEq)]
pub struct WeightedVariant {
    pub variant: String,
    pub weight: f64,
    /// 전역 점유율 `W / ΣW`
    pub share: f64,
    pub languages: BTreeSet<String>,
}

impl WeightedVariant {
    pub fn langs_count(&self) -> usize {
        self.languages.len()
    }
}

/// 집계 결과
#[derive(Debug, Clone, Default)]
pub struct GlobalWeights {
    variants: BTreeMap<String, WeightedVariant>,
    contributions: Vec<LanguageContribution>,
    missing_population: Vec<String>,
    total: f64,
}

impl GlobalWeights {
    /// 정규 변형의 가중치
    pub fn get(&self, variant: &str) -> Option<&WeightedVariant> {
        self.variants.get(variant)
    }

    pub fn weight(&self, variant: &str) -> Option<f64> {
        self.variants.get(variant).map(|v| v.weight)
    }

    /// 가중치 내림차순, 같으면 변형 오름차순
    pub fn ranked(&self) -> Vec<&WeightedVariant> {
        let mut ranked: Vec<&WeightedVariant> = self.variants.values().collect();
        ranked.sort_by(|a, b| b.weight.total_cmp(&a.weight).then_with(|| a.variant.cmp(&b.variant)));
        ranked
    }

    /// 정렬된 맵 순서 (변형 오름차순)
    pub fn iter(&self) -> impl Iterator<Item = &WeightedVariant> {
        self.variants.values()
    }

    pub fn total(&self) -> f64 {
        self.total
    }

    pub fn contributions(&self) -> &[LanguageContribution] {
        &self.contributions
    }

    /// 빈도 데이터는 있지만 인구 항목이 없는 언어
    pub fn missing_population(&self) -> &[String] {
        &self.missing_population
    }

    pub fn len(&self) -> usize {
        self.variants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }
}

/// 언어 하나의 기여: 요약 + (변형, 가중치) 목록
struct Contribution {
    summary: LanguageContribution,
    credits: Vec<(String, f64)>,
}

/// 세 테이블에서 전역 가중치 계산
pub fn aggregate(
    population: &PopulationTable,
    frequency: &FrequencyTable,
    mapping: &MappingTable,
    alpha: &AlphaPolicy,
) -> GlobalWeights {
    let mapped = mapping.variants_by_language();
    let languages: BTreeSet<String> = frequency
        .languages()
        .map(str::to_string)
        .chain(mapped.keys().map(|l| l.to_string()))
        .collect();

    let mut missing_population = Vec::new();
    let contributions: Vec<Contribution> = languages
        .iter()
        .filter_map(|language| {
            let language = language.as_str();
            let speakers = population.speakers(language);
            if frequency.has_data(language) {
                let Some(speakers) = speakers else {
                    log::warn!("[weights] {}: 빈도 데이터는 있지만 인구 항목이 없음", language);
                    missing_population.push(language.to_string());
                    return None;
                };
                let credits = frequency
                    .variants(language)
                    .into_iter()
                    .flatten()
                    .map(|(variant, f)| (variant.clone(), speakers * f))
                    .collect();
                Some(Contribution::new(language, ContributionSource::Frequency, speakers, credits))
            } else {
                let speakers = speakers?;
                let variants = mapped.get(language).filter(|v| !v.is_empty())?;
                let alpha = alpha.alpha(language);
                let each = alpha * speakers / variants.len() as f64;
                let credits = variants.iter().map(|v| (v.to_string(), each)).collect();
                Some(Contribution::new(language, ContributionSource::Fallback { alpha }, speakers, credits))
            }
        })
        .collect();

    let folded = contributions.iter().fold(
        BTreeMap::<String, (f64, BTreeSet<String>)>::new(),
        |mut acc, contribution| {
            for (variant, weight) in &contribution.credits {
                let slot = acc.entry(variant.clone()).or_default();
                slot.0 += weight;
                slot.1.insert(contribution.summary.language.clone());
            }
            acc
        },
    );

    let total: f64 = folded.values().map(|(w, _)| w).sum();
    let variants = folded
        .into_iter()
        .map(|(variant, (weight, languages))| {
            let share = if total > 0.0 { weight / total } else { 0.0 };
            let weighted = WeightedVariant {
                variant: variant.clone(),
                weight,
                share,
                languages,
            };
            (variant, weighted)
        })
        .collect();

    let contributions: Vec<LanguageContribution> = contributions.into_iter().map(|c| c.summary).collect();
    let fallback = contributions
        .iter()
        .filter(|c| matches!(c.source, ContributionSource::Fallback { .. }))
        .count();
    log::info!(
        "[weights] 언어 {}개 기여 (빈도 {}, 대체 {}), ΣW = {:.3}",
        contributions.len(),
        contributions.len() - fallback,
        fallback,
        total
    );

    GlobalWeights {
        variants,
        contributions,
        missing_population,
        total,
    }
}

impl Contribution {
    fn new(language: &str, source: ContributionSource, speakers: f64, credits: Vec<(String, f64)>) -> Self {
        let weight: f64 = credits.iter().map(|(_, w)| w).sum();
        log::debug!("[weights] {}: {:?}, S = {}, 기여 {:.3}", language, source, speakers, weight);
        Self {
            summary: LanguageContribution {
                language: language.to_string(),
                source,
                speakers,
                weight,
                variants: credits.len(),
            },
            credits,
        }
    }
}
