//! 고정 문자 목록
//!
//! 대상 알파벳(러시아어 키릴), ЙЦУКЕН 자판 키 배열, 그리고 수식 문자(H 계열)와
//! 팔로치카처럼 파이프라인 전체에서 공유하는 특수 글리프를 정의합니다.

use std::collections::HashSet;
use std::sync::LazyLock;

/// 키릴 경음 부호 (Ъ)
pub const HARD_SIGN: char = '\u{042A}';
/// 키릴 연음 부호 (Ь)
pub const SOFT_SIGN: char = '\u{042C}';

/// MODIFIER LETTER CAPITAL H (ᴴ)
pub const MODIFIER_CAPITAL_H: char = '\u{1D34}';
/// MODIFIER LETTER SMALL H (ʰ)
pub const MODIFIER_SMALL_H: char = '\u{02B0}';
/// MODIFIER LETTER CYRILLIC EN (ᵸ) - H 계열의 대표 글리프
pub const MODIFIER_CYRILLIC_EN: char = '\u{1D78}';

/// H 계열 동치류. 어느 멤버든 대표 글리프 `ᵸ`로 모입니다.
pub const H_MODIFIER_CLASS: [char; 3] = [MODIFIER_CAPITAL_H, MODIFIER_SMALL_H, MODIFIER_CYRILLIC_EN];

/// 팔로치카 (Ӏ, 대문자형)
pub const PALOCHKA: char = '\u{04C0}';

/// 러시아어 알파벳 33자 (대문자)
pub const TARGET_ALPHABET: &str = "АБВГДЕЁЖЗИЙКЛМНОПРСТУФХЦЧШЩЪЫЬЭЮЯ";

/// ЙЦУКЕН 자판의 문자 키 (왼쪽 위부터 행 순서)
pub const KEYBOARD_KEYS: [&str; 32] = [
    "Й", "Ц", "У", "К", "Е", "Н", "Г", "Ш", "Щ", "З", "Х", "Ъ",
    "Ф", "Ы", "В", "А", "П", "Р", "О", "Л", "Д", "Ж", "Э",
    "Я", "Ч", "С", "М", "И", "Т", "Ь", "Б", "Ю",
];

static TARGET_LETTERS: LazyLock<HashSet<char>> = LazyLock::new(|| TARGET_ALPHABET.chars().collect());

/// 대상 알파벳의 단일 문자인지 확인 (대문자 기준)
pub fn is_target_letter(s: &str) -> bool {
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => TARGET_LETTERS.contains(&c),
        _ => false,
    }
}

/// H 계열 수식 문자인지 확인
pub fn is_h_modifier(c: char) -> bool {
    H_MODIFIER_CLASS.contains(&c)
}

/// 문자열 어디든 H 계열 수식 문자가 포함되어 있는지 확인
pub fn contains_h_modifier(s: &str) -> bool {
    s.chars().any(is_h_modifier)
}

/// 자판에서 독립 문자로 취급하는 글리프 (Ӏ, ᵸ)
pub fn is_standalone_letter(s: &str) -> bool {
    let mut chars = s.chars();
    matches!(
        (chars.next(), chars.next()),
        (Some(PALOCHKA), None) | (Some(MODIFIER_CYRILLIC_EN), None)
    )
}

/// ЙЦУКЕН 자판 키인지 확인
pub fn is_keyboard_key(s: &str) -> bool {
    KEYBOARD_KEYS.contains(&s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_alphabet() {
        assert_eq!(TARGET_ALPHABET.chars().count(), 33);
        assert!(is_target_letter("Ё"));
        assert!(is_target_letter("Ъ"));
        assert!(!is_target_letter("Ӓ"));
        assert!(!is_target_letter("АА"));
        assert!(!is_target_letter(""));
    }

    #[test]
    fn test_h_modifier_class() {
        for c in H_MODIFIER_CLASS {
            assert!(is_h_modifier(c));
        }
        assert!(!is_h_modifier('Н'));
        assert!(contains_h_modifier("Кʰ"));
        assert!(!contains_h_modifier("КӀ"));
    }

    #[test]
    fn test_standalone_letters() {
        assert!(is_standalone_letter("Ӏ"));
        assert!(is_standalone_letter("ᵸ"));
        assert!(!is_standalone_letter("ᴴ"));
        assert!(!is_standalone_letter("КӀ"));
    }

    #[test]
    fn test_keyboard_keys() {
        assert!(is_keyboard_key("Й"));
        assert!(is_keyboard_key("Ю"));
        // Ё는 자판 키가 아님
        assert!(!is_keyboard_key("Ё"));
    }
}
