//! 입력 테이블 에러

use std::path::PathBuf;

/// 입력 테이블 로드/해석 에러
///
/// 모두 치명적입니다. 해당 테이블을 쓰는 이후 단계는 실행되지 않습니다.
#[derive(Debug, thiserror::Error)]
pub enum TableError {
    /// 파일 읽기 실패
    #[error("{table} 테이블 파일을 읽을 수 없습니다 ({}): {source}", .path.display())]
    Io {
        table: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// 파일 형식 오류 (CSV/JSON 구조)
    #[error("{table} 테이블 형식 오류: {message}")]
    Format { table: &'static str, message: String },

    /// 필수 필드에 해당하는 열이 없음
    #[error(
        "{table} 테이블에 필수 필드 '{field}'가 없습니다 (허용 이름: {}; 실제 열: {})",
        .tried.join(", "),
        .available.join(", ")
    )]
    MissingField {
        table: &'static str,
        field: &'static str,
        tried: Vec<String>,
        available: Vec<String>,
    },

    /// 사용 가능한 레코드가 하나도 없음
    #[error("{table} 테이블에 사용 가능한 레코드가 없습니다 (전체 {total}행, 버림 {dropped}행)")]
    Empty {
        table: &'static str,
        total: usize,
        dropped: usize,
    },
}
