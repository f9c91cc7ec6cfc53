//! 그래핌 분할
//!
//! 결합 클래스(canonical combining class)가 0인 코드포인트에서 새 클러스터가 시작되고,
//! 0이 아닌 코드포인트는 앞 클러스터에 붙습니다. 문자열이 결합 문자로 시작하면
//! 그 문자 하나가 독립 클러스터가 됩니다.
//!
//! 키릴 기본 문자 + 발음 구별 부호에는 충분한 근사이며, 완전한 그래핌 경계 알고리즘은 아닙니다.

use unicode_normalization::char::canonical_combining_class;

/// 결합 문자인지 확인 (결합 클래스 0이 아님)
pub fn is_combining(c: char) -> bool {
    canonical_combining_class(c) != 0
}

/// 문자열을 그래핌 클러스터로 분할
pub fn graphemes(input: &str) -> Vec<&str> {
    let mut clusters = Vec::new();
    let mut start: Option<usize> = None;

    for (idx, c) in input.char_indices() {
        match start {
            // 클러스터 시작 전이면 결합 여부와 관계없이 새 클러스터
            None => start = Some(idx),
            Some(s) => {
                if !is_combining(c) {
                    clusters.push(&input[s..idx]);
                    start = Some(idx);
                }
            }
        }
    }

    if let Some(s) = start {
        clusters.push(&input[s..]);
    }

    clusters
}

/// 그래핌 수
pub fn grapheme_count(input: &str) -> usize {
    graphemes(input).len()
}

/// 그래핌 하나로 이루어진 "원자" 변형인지 확인
pub fn is_atomic(input: &str) -> bool {
    grapheme_count(input) == 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_letter_with_marks() {
        // А + 마크론
        assert_eq!(graphemes("А\u{0304}"), vec!["А\u{0304}"]);
        // 마크 두 개도 한 클러스터
        assert_eq!(graphemes("А\u{0304}\u{0301}"), vec!["А\u{0304}\u{0301}"]);
    }

    #[test]
    fn test_sequences() {
        assert_eq!(graphemes("КӀ"), vec!["К", "Ӏ"]);
        assert_eq!(graphemes("Кᵸ"), vec!["К", "ᵸ"]);
        assert_eq!(graphemes("ЛЛЪ"), vec!["Л", "Л", "Ъ"]);
        assert_eq!(graphemes("Г\u{0304}Ь"), vec!["Г\u{0304}", "Ь"]);
    }

    #[test]
    fn test_leading_combining_mark() {
        assert_eq!(graphemes("\u{0304}"), vec!["\u{0304}"]);
        assert_eq!(graphemes("\u{0304}А"), vec!["\u{0304}", "А"]);
    }

    #[test]
    fn test_empty() {
        assert!(graphemes("").is_empty());
        assert_eq!(grapheme_count(""), 0);
        assert!(!is_atomic(""));
    }

    #[test]
    fn test_atomic() {
        assert!(is_atomic("Ӓ"));
        assert!(is_atomic("Ӏ"));
        assert!(!is_atomic("ХЬ"));
    }
}
