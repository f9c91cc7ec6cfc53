//! 언어별 데이터 출처(벤더) 선택 정책
//!
//! 한 언어에 여러 벤더의 빈도 데이터가 있으면 하나만 사용합니다.
//! 명시적 지정(override)이 우선이고, 없으면 이름순으로 첫 번째 벤더를 고릅니다.

use std::collections::BTreeMap;

/// 벤더 선택 정책
#[derive(Debug, Clone, Default)]
pub struct SelectionPolicy {
    overrides: BTreeMap<String, String>,
}

impl SelectionPolicy {
    pub fn new(overrides: BTreeMap<String, String>) -> Self {
        Self { overrides }
    }

    /// 후보 벤더 중 하나 선택
    ///
    /// 지정된 벤더가 후보에 없으면 경고 후 기본 규칙으로 돌아갑니다.
    pub fn choose<'a>(&self, language: &str, candidates: &'a [String]) -> Option<&'a str> {
        if let Some(preferred) = self.overrides.get(language) {
            if let Some(found) = candidates.iter().find(|c| *c == preferred) {
                return Some(found.as_str());
            }
            log::warn!("[{}] 지정 벤더 '{}'가 없어 기본 규칙을 사용합니다", language, preferred);
        }
        candidates.iter().min().map(|c| c.as_str())
    }
}
