//! 문자열 정규화
//!
//! 모든 입력(기준 문자, 변형, 언어 코드)을 안정적인 표현으로 바꿉니다.
//! 정규화는 수집 단계에서 한 번만 적용되고, 이후 단계는 이미 정규화된 키만 다룹니다.
//!
//! - `nfc`: 앞뒤 공백 제거 + NFC 조합형
//! - `upper`: NFC + 대문자 (비교 키)
//! - `canonical_variant`: 대문자 키 + H 계열 수식 문자 병합
//! - `canonical_base`: 대문자 키 + H 계열 병합 + 경음 부호(Ъ) → 연음 부호(Ь)

use unicode_normalization::UnicodeNormalization;

use super::alphabet::{is_h_modifier, HARD_SIGN, MODIFIER_CYRILLIC_EN, SOFT_SIGN};

/// 앞뒤 공백을 제거하고 NFC로 조합
pub fn nfc(input: &str) -> String {
    input.trim().nfc().collect()
}

/// NFC + 대문자
///
/// 대문자 변환이 조합형을 깨뜨리는 경우(예: ǰ → J̌)가 있으므로 다시 NFC를 적용합니다.
/// 그래야 두 번 적용해도 결과가 같습니다.
pub fn upper(input: &str) -> String {
    nfc(input).to_uppercase().nfc().collect()
}

/// H 계열 수식 문자(ᴴ, ʰ, ᵸ)를 모두 대표 글리프 ᵸ로 치환
///
/// 글리프 하나를 글리프 하나로 바꾸므로 그래핌 수는 변하지 않습니다.
pub fn collapse_modifiers(input: &str) -> String {
    input
        .chars()
        .map(|c| if is_h_modifier(c) { MODIFIER_CYRILLIC_EN } else { c })
        .collect()
}

/// 변형(variant)의 정규 키
pub fn canonical_variant(input: &str) -> String {
    collapse_modifiers(&upper(input))
}

/// 기준 문자(base letter)의 정규 키
///
/// 경음 부호 Ъ는 이 문자 목록의 역사적 대체 관례에 따라 연음 부호 Ь로 바뀝니다.
/// 변형에는 적용하지 않습니다.
pub fn canonical_base(input: &str) -> String {
    let key = collapse_modifiers(&upper(input));
    let mut chars = key.chars();
    match (chars.next(), chars.next()) {
        (Some(HARD_SIGN), None) => SOFT_SIGN.to_string(),
        _ => key,
    }
}

/// 언어 코드 정규화 (공백 제거 + ASCII 소문자)
pub fn language_code(input: &str) -> String {
    input.trim().to_ascii_lowercase()
}

/// 쉼표로 연결된 언어 코드 목록을 분해
pub fn split_languages(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(language_code)
        .filter(|code| !code.is_empty())
        .collect()
}

/// 코드포인트 표기 ("U+0410 U+0304")
pub fn unicode_codes(input: &str) -> String {
    input
        .chars()
        .map(|c| format!("U+{:04X}", c as u32))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_nfc_composes() {
        // А + 결합 분음 부호 → Ӓ
        assert_eq!(nfc("А\u{0308}"), "Ӓ");
        assert_eq!(nfc("  ӓ "), "ӓ");
    }

    #[test]
    fn test_upper_key() {
        assert_eq!(upper("ӓ"), "Ӓ");
        assert_eq!(upper("а\u{0304}"), "А\u{0304}");
        assert_eq!(upper(" ң "), "Ң");
    }

    #[test]
    fn test_modifier_collapse() {
        let a = canonical_variant("кᴴ");
        let b = canonical_variant("кʰ");
        let c = canonical_variant("кᵸ");
        assert_eq!(a, "Кᵸ");
        assert_eq!(a, b);
        assert_eq!(b, c);
    }

    #[test]
    fn test_hard_sign_base_rewrite() {
        assert_eq!(canonical_base("ъ"), "Ь");
        assert_eq!(canonical_base("Ъ"), "Ь");
        assert_eq!(canonical_base("к"), "К");
        // 변형에는 적용하지 않음
        assert_eq!(canonical_variant("ъ"), "Ъ");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(nfc(""), "");
        assert_eq!(canonical_variant(""), "");
        assert_eq!(canonical_base("   "), "");
        assert_eq!(language_code(""), "");
    }

    #[test]
    fn test_split_languages() {
        assert_eq!(split_languages(" kbd, ady ,,AV"), vec!["kbd", "ady", "av"]);
        assert!(split_languages("").is_empty());
    }

    #[test]
    fn test_unicode_codes() {
        assert_eq!(unicode_codes("А\u{0304}"), "U+0410 U+0304");
        assert_eq!(unicode_codes("ᵸ"), "U+1D78");
    }

    proptest! {
        #[test]
        fn prop_canonical_variant_idempotent(s in "[\\x{0400}-\\x{04FF}\\x{0300}-\\x{036F}\\x{1D34}\\x{02B0}\\x{1D78} a-z]{0,8}") {
            let once = canonical_variant(&s);
            prop_assert_eq!(canonical_variant(&once), once.clone());
        }

        #[test]
        fn prop_canonical_base_idempotent(s in "[\\x{0400}-\\x{04FF}\\x{0300}-\\x{036F}\\x{1D34}\\x{02B0}\\x{1D78}]{0,4}") {
            let once = canonical_base(&s);
            prop_assert_eq!(canonical_base(&once), once.clone());
        }

        #[test]
        fn prop_modifier_substitution_same_key(prefix in "[а-я]{1,3}", idx in 0usize..3) {
            let members = ['\u{1D34}', '\u{02B0}', '\u{1D78}'];
            let a = format!("{}{}", prefix, members[idx]);
            let b = format!("{}{}", prefix, '\u{1D78}');
            prop_assert_eq!(canonical_variant(&a), canonical_variant(&b));
        }
    }
}
