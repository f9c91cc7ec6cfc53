//! 입력 테이블 로드
//!
//! 세 테이블(인구, 빈도, 매핑)을 읽어 정규화된 레코드로 바꿉니다.
//! 열 이름은 스키마로 해석하고, 해석할 수 없는 행은 버린 뒤 개수를 기록합니다.

pub mod error;
pub mod frequency;
pub mod mapping;
pub mod number;
pub mod population;
pub mod reader;
pub mod schema;
pub mod selection;

pub use error::TableError;
pub use frequency::{FrequencyEntry, FrequencyOptions, FrequencyTable};
pub use mapping::{MappingEntry, MappingOptions, MappingRow, MappingTable};
pub use population::{PopulationEntry, PopulationTable};
pub use reader::RawTable;
pub use schema::{Schema, SchemaOverrides};
pub use selection::SelectionPolicy;

/// 테이블 로드 통계
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct LoadStats {
    /// 전체 행 수
    pub total: usize,
    /// 사용된 행 수
    pub accepted: usize,
    /// 해석 실패로 버린 행 수
    pub dropped: usize,
    /// 제외 목록 등으로 건너뛴 행 수
    pub skipped: usize,
}

impl LoadStats {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            ..Self::default()
        }
    }
}
