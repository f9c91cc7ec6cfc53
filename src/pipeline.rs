//! 전체 실행 흐름
//!
//! 입력 로드 → 가중치 집계 → 순위 → 분석 → 출력 렌더링 → 파일 쓰기.
//! 계산(`run`)은 부수 효과가 없고, 파일 입출력은 양 끝에서만 일어납니다.
//! 출력은 모든 표가 메모리에서 완성된 뒤에만 씁니다.

use std::fs;
use std::path::{Path, PathBuf};

use crate::analysis::{aggregate_modifiers, detect_conflicts, Conflict, ModifierRow};
use crate::config::{ConfigError, PipelineConfig};
use crate::core::normalize::language_code;
use crate::ranking::{build_longpress, rank, Group, LongpressOrder};
use crate::report::{render, ReportError};
use crate::table::schema::{FREQUENCY_TABLE, MAPPING_TABLE, POPULATION_TABLE};
use crate::table::{FrequencyTable, LoadStats, MappingTable, PopulationTable, RawTable, TableError};
use crate::weight::{aggregate, aggregate_symbols, GlobalWeights, LanguageContribution, SymbolWeights};

/// 파이프라인 에러
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Table(#[from] TableError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Report(#[from] ReportError),

    #[error("입력 파일이 지정되지 않았습니다: --{0}")]
    MissingInput(&'static str),
}

/// 입력 파일 경로
#[derive(Debug, Clone)]
pub struct PipelineInputs {
    pub population: PathBuf,
    pub frequencies: PathBuf,
    /// 매핑 표 파일, 또는 언어별 키 매핑 JSON(`<lang>.json`)이 든 디렉터리
    pub mapping: PathBuf,
}

impl PipelineInputs {
    /// 선택 인자로 받은 경로에서 구성 (하나라도 없으면 에러)
    pub fn from_paths(
        population: Option<PathBuf>,
        frequencies: Option<PathBuf>,
        mapping: Option<PathBuf>,
    ) -> Result<Self, PipelineError> {
        Ok(Self {
            population: population.ok_or(PipelineError::MissingInput("population"))?,
            frequencies: frequencies.ok_or(PipelineError::MissingInput("frequencies"))?,
            mapping: mapping.ok_or(PipelineError::MissingInput("mapping"))?,
        })
    }
}

/// 로드된 세 테이블
#[derive(Debug, Clone)]
pub struct Tables {
    pub population: PopulationTable,
    pub frequency: FrequencyTable,
    pub mapping: MappingTable,
}

/// 진단 정보
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    pub population: LoadStats,
    pub frequency: LoadStats,
    pub mapping: LoadStats,
    /// 빈도 데이터는 있지만 인구 항목이 없는 언어
    pub missing_population: Vec<String>,
    /// Σf가 허용 범위를 벗어난 언어
    pub out_of_band: Vec<String>,
    pub contributions: Vec<LanguageContribution>,
}

/// 한 번의 실행 결과 (모두 메모리 안)
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    /// 집계된 매핑 (출력 보기용)
    pub mapping: MappingTable,
    pub weights: GlobalWeights,
    pub symbols: SymbolWeights,
    pub groups: Vec<Group>,
    pub conflicts: Vec<Conflict>,
    pub modifiers: Vec<ModifierRow>,
    pub longpress: LongpressOrder,
    pub diagnostics: Diagnostics,
}

/// 입력 파일에서 세 테이블 로드
pub fn load_tables(inputs: &PipelineInputs, config: &PipelineConfig) -> Result<Tables, PipelineError> {
    let excluded = config.excluded_language_set();

    let raw = RawTable::load(POPULATION_TABLE, &inputs.population)?;
    let population = PopulationTable::from_raw(&raw, &config.population_schema(), &excluded)?;

    let raw = RawTable::load(FREQUENCY_TABLE, &inputs.frequencies)?;
    let frequency = FrequencyTable::from_raw(&raw, &config.frequency_schema(), &config.frequency_options())?;

    let mapping = if inputs.mapping.is_dir() {
        load_key_mappings(&inputs.mapping, config)?
    } else {
        let raw = RawTable::load(MAPPING_TABLE, &inputs.mapping)?;
        MappingTable::from_raw(&raw, &config.mapping_schema(), &config.mapping_options())?
    };

    Ok(Tables {
        population,
        frequency,
        mapping,
    })
}

/// 언어별 키 매핑 문서 디렉터리 로드 (파일 이름 = 언어 코드)
fn load_key_mappings(dir: &Path, config: &PipelineConfig) -> Result<MappingTable, PipelineError> {
    let io_error = |path: &Path, source| TableError::Io {
        table: MAPPING_TABLE,
        path: path.to_path_buf(),
        source,
    };
    let excluded = config.excluded_language_set();

    let mut paths: Vec<PathBuf> = Vec::new();
    for entry in fs::read_dir(dir).map_err(|e| io_error(dir, e))? {
        let path = entry.map_err(|e| io_error(dir, e))?.path();
        if path.extension().and_then(|e| e.to_str()).is_some_and(|e| e.eq_ignore_ascii_case("json")) {
            paths.push(path);
        }
    }
    paths.sort();

    let mut documents = Vec::with_capacity(paths.len());
    for path in &paths {
        let Some(language) = path.file_stem().and_then(|s| s.to_str()).map(language_code) else {
            continue;
        };
        if excluded.contains(&language) {
            log::info!("[mapping] {} 제외", language);
            continue;
        }
        let text = fs::read_to_string(path).map_err(|e| io_error(path, e))?;
        let value: serde_json::Value = serde_json::from_str(&text).map_err(|e| TableError::Format {
            table: MAPPING_TABLE,
            message: format!("{}: JSON 파싱 오류: {}", path.display(), e),
        })?;
        documents.push((language, value));
    }

    let table =
        MappingTable::from_key_mappings(documents.iter().map(|(l, v)| (l.as_str(), v)), &config.mapping_options())?;
    log::info!("[mapping] 키 매핑 문서 {}개에서 항목 {}개", documents.len(), table.len());
    Ok(table)
}

/// 로드된 테이블로 전체 계산 (부수 효과 없음)
pub fn run(tables: &Tables, config: &PipelineConfig) -> PipelineOutput {
    let weights = aggregate(&tables.population, &tables.frequency, &tables.mapping, &config.alpha_policy());
    let symbols = aggregate_symbols(&weights, config.symbol_max_graphemes);
    let groups = rank(&tables.mapping, &weights, &tables.population);
    let conflicts = detect_conflicts(&tables.mapping, &weights);
    let modifiers = aggregate_modifiers(&groups, &weights, config.modifier_examples);
    let longpress = build_longpress(&groups, &weights, &config.longpress_options());

    let diagnostics = Diagnostics {
        population: *tables.population.stats(),
        frequency: *tables.frequency.stats(),
        mapping: *tables.mapping.stats(),
        missing_population: weights.missing_population().to_vec(),
        out_of_band: tables.frequency.out_of_band().to_vec(),
        contributions: weights.contributions().to_vec(),
    };

    PipelineOutput {
        mapping: tables.mapping.clone(),
        weights,
        symbols,
        groups,
        conflicts,
        modifiers,
        longpress,
        diagnostics,
    }
}

/// 로드 → 계산 → 렌더링 → 쓰기
///
/// 어느 단계든 실패하면 출력 디렉터리에는 아무것도 쓰지 않습니다.
pub fn execute(
    inputs: &PipelineInputs,
    config: &PipelineConfig,
    out_dir: &Path,
) -> Result<PipelineOutput, PipelineError> {
    let tables = load_tables(inputs, config)?;
    let output = run(&tables, config);
    render(&output)?.write_to(out_dir)?;
    Ok(output)
}
