//! 출력 렌더링과 쓰기
//!
//! 모든 파일 내용을 먼저 메모리에 만들고, 전부 성공했을 때만 디렉터리에 씁니다.
//! 쓰기는 출력 디렉터리 안의 임시 디렉터리를 거쳐 파일마다 이름 바꾸기로 교체합니다.

pub mod csv;
pub mod tables;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::pipeline::PipelineOutput;
use crate::weight::{non_russian_letters, sequences};

pub use csv::CsvTable;

pub const GLOBAL_WEIGHTS_FILE: &str = "global_weights.csv";
pub const SYMBOL_WEIGHTS_FILE: &str = "symbol_weights.csv";
pub const VARIANT_MAPPING_FILE: &str = "variant_mapping.csv";
pub const VARIANT_MAPPING_ATOMIC_FILE: &str = "variant_mapping_atomic.csv";
pub const NON_RUSSIAN_LETTERS_FILE: &str = "non_russian_letters_global.csv";
pub const SEQUENCES_FILE: &str = "sequences_global.csv";
pub const MAPPING_STATS_FILE: &str = "variant_mapping_stats.csv";
pub const PRIORITIES_FILE: &str = "variant_mapping_priorities.csv";
pub const UNICODE_FILE: &str = "variant_mapping_unicode.csv";
pub const CONFLICTS_OVERVIEW_FILE: &str = "conflicts_overview.csv";
pub const CONFLICTS_BREAKDOWN_FILE: &str = "conflicts_breakdown.csv";
pub const MODIFIER_FILE: &str = "modifier_priority.csv";
pub const LONGPRESS_FILE: &str = "longpress_order.json";
pub const MAPPED_LETTERS_FULL_FILE: &str = "mapped_letters_full.csv";
pub const MAPPED_SEQUENCES_FILE: &str = "mapped_sequences.csv";
pub const LONGPRESS_MISSING_FILE: &str = "longpress_missing.csv";

/// 출력 에러
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("출력 파일을 쓸 수 없습니다 ({}): {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("JSON 직렬화 실패: {0}")]
    Json(#[from] serde_json::Error),
}

/// 렌더링된 파일 하나
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedFile {
    pub name: &'static str,
    pub contents: String,
}

/// 렌더링된 출력 전체
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    files: Vec<RenderedFile>,
}

impl Report {
    pub fn files(&self) -> &[RenderedFile] {
        &self.files
    }

    /// 파일 내용 조회
    pub fn get(&self, name: &str) -> Option<&str> {
        self.files.iter().find(|f| f.name == name).map(|f| f.contents.as_str())
    }

    /// 디렉터리에 모든 파일 쓰기 (기존 파일은 교체)
    ///
    /// 임시 디렉터리에 전부 쓴 뒤 하나씩 옮깁니다. 옮기다 실패하면 이미 옮긴 파일을
    /// 이전 내용으로 되돌리므로, 디렉터리에는 이전 출력 또는 새 출력 한 벌만 남습니다.
    pub fn write_to(&self, dir: &Path) -> Result<(), ReportError> {
        fs::create_dir_all(dir).map_err(io_error(dir))?;

        let staging = tempfile::Builder::new()
            .prefix(".longpress-")
            .tempdir_in(dir)
            .map_err(io_error(dir))?;
        for file in &self.files {
            let path = staging.path().join(file.name);
            fs::write(&path, &file.contents).map_err(io_error(&path))?;
        }
        let backup = staging.path().join("previous");
        fs::create_dir(&backup).map_err(io_error(&backup))?;

        let mut committed: Vec<(PathBuf, Option<PathBuf>)> = Vec::with_capacity(self.files.len());
        for file in &self.files {
            let target = dir.join(file.name);
            match commit(&staging.path().join(file.name), &target, &backup.join(file.name)) {
                Ok(previous) => committed.push((target, previous)),
                Err(e) => {
                    rollback(&committed);
                    return Err(e);
                }
            }
        }

        log::info!("[report] {}에 파일 {}개 저장", dir.display(), self.files.len());
        Ok(())
    }
}

fn io_error(path: &Path) -> impl FnOnce(io::Error) -> ReportError {
    let path = path.to_path_buf();
    move |source| ReportError::Io { path, source }
}

/// 새 파일을 제자리로 옮기고, 있던 파일은 백업 경로로 보냄
fn commit(staged: &Path, target: &Path, backup: &Path) -> Result<Option<PathBuf>, ReportError> {
    let previous = if target.is_file() {
        fs::rename(target, backup).map_err(io_error(target))?;
        Some(backup.to_path_buf())
    } else {
        None
    };
    if let Err(source) = fs::rename(staged, target) {
        if let Some(previous) = &previous {
            restore(previous, target);
        }
        return Err(ReportError::Io {
            path: target.to_path_buf(),
            source,
        });
    }
    Ok(previous)
}

/// 옮긴 순서의 역순으로 되돌림
fn rollback(committed: &[(PathBuf, Option<PathBuf>)]) {
    for (target, previous) in committed.iter().rev() {
        match previous {
            Some(previous) => restore(previous, target),
            None => {
                if let Err(e) = fs::remove_file(target) {
                    log::error!("[report] {} 삭제 실패: {}", target.display(), e);
                }
            }
        }
    }
}

fn restore(previous: &Path, target: &Path) {
    if let Err(e) = fs::rename(previous, target) {
        log::error!("[report] {} 복구 실패: {}", target.display(), e);
    }
}

/// 실행 결과를 출력 파일 내용으로 렌더링
pub fn render(output: &PipelineOutput) -> Result<Report, ReportError> {
    let mut longpress = serde_json::to_string_pretty(&output.longpress)?;
    longpress.push('\n');

    let files = vec![
        (GLOBAL_WEIGHTS_FILE, tables::global_weights(&output.weights).to_csv()),
        (SYMBOL_WEIGHTS_FILE, tables::symbol_weights(&output.symbols).to_csv()),
        (VARIANT_MAPPING_FILE, tables::variant_mapping(output.mapping.entries()).to_csv()),
        (VARIANT_MAPPING_ATOMIC_FILE, tables::variant_mapping(&output.mapping.atomic_view()).to_csv()),
        (
            NON_RUSSIAN_LETTERS_FILE,
            tables::non_russian_letters(&non_russian_letters(&output.weights)).to_csv(),
        ),
        (SEQUENCES_FILE, tables::sequences(&sequences(&output.weights)).to_csv()),
        (MAPPING_STATS_FILE, tables::mapping_stats(&output.groups).to_csv()),
        (PRIORITIES_FILE, tables::priorities(&output.groups).to_csv()),
        (UNICODE_FILE, tables::unicode_priorities(&output.groups).to_csv()),
        (CONFLICTS_OVERVIEW_FILE, tables::conflicts_overview(&output.conflicts).to_csv()),
        (CONFLICTS_BREAKDOWN_FILE, tables::conflicts_breakdown(&output.conflicts).to_csv()),
        (MODIFIER_FILE, tables::modifier_priority(&output.modifiers).to_csv()),
        (LONGPRESS_FILE, longpress),
        (
            MAPPED_LETTERS_FULL_FILE,
            tables::keyed_lists("variants", output.longpress.full()).to_csv(),
        ),
        (
            MAPPED_SEQUENCES_FILE,
            tables::keyed_lists("sequences", output.longpress.sequences()).to_csv(),
        ),
        (LONGPRESS_MISSING_FILE, tables::longpress_missing(&output.longpress).to_csv()),
    ];

    Ok(Report {
        files: files
            .into_iter()
            .map(|(name, contents)| RenderedFile { name, contents })
            .collect(),
    })
}
