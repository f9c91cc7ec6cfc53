//! 숫자 필드 파싱
//!
//! 인구 수치는 "516 826", "1,234,567", "12.3 млн", "12k" 같은 표기가 섞여 있습니다.
//! 파싱할 수 없으면 `None`을 돌려주고, 호출 측에서 해당 행을 버립니다.

/// 구분 공백 (일반 공백, NBSP, 좁은 NBSP, 얇은 공백)
fn is_group_space(c: char) -> bool {
    matches!(c, ' ' | '\u{00A0}' | '\u{202F}' | '\u{2009}' | '_')
}

/// 단위 접미사 → 배수
fn unit_multiplier(unit: &str) -> Option<f64> {
    let unit = unit.trim().trim_end_matches('.').to_lowercase();
    match unit.as_str() {
        "" => Some(1.0),
        "k" | "тыс" => Some(1_000.0),
        "m" | "mn" | "млн" | "million" => Some(1_000_000.0),
        "b" | "bn" | "млрд" | "billion" => Some(1_000_000_000.0),
        _ => None,
    }
}

/// 소수 파싱 (빈도, 개수)
///
/// `.`과 `,`가 함께 있으면 `,`는 자릿수 구분, `,`만 있으면 소수점으로 봅니다.
pub fn parse_decimal(input: &str) -> Option<f64> {
    let cleaned: String = input.chars().filter(|c| !is_group_space(*c)).collect();
    if cleaned.is_empty() {
        return None;
    }
    let cleaned = if cleaned.contains('.') {
        cleaned.replace(',', "")
    } else {
        cleaned.replace(',', ".")
    };
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// 인구 수치 파싱 (자릿수 구분 + 단위 접미사 지원)
pub fn parse_count(input: &str) -> Option<f64> {
    let text = input.trim();
    if text.is_empty() {
        return None;
    }

    // 마지막 숫자 뒤는 단위
    let split = text
        .char_indices()
        .filter(|(_, c)| c.is_ascii_digit())
        .last()
        .map(|(idx, c)| idx + c.len_utf8())?;
    let (number, unit) = text.split_at(split);
    let multiplier = unit_multiplier(unit)?;

    let number: String = number.chars().filter(|c| !is_group_space(*c)).collect();
    let number = if multiplier > 1.0 {
        number.replace(',', ".")
    } else if number.contains('.') {
        number.replace(',', "")
    } else if is_thousands_grouping(&number) {
        number.replace(',', "")
    } else {
        number.replace(',', ".")
    };

    number
        .parse::<f64>()
        .ok()
        .map(|v| v * multiplier)
        .filter(|v| v.is_finite())
}

/// "1,234,567"처럼 쉼표 뒤 그룹이 모두 세 자리인지 확인
fn is_thousands_grouping(number: &str) -> bool {
    let mut groups = number.split(',');
    let head_ok = groups
        .next()
        .is_some_and(|g| !g.is_empty() && g.len() <= 3 && g.chars().all(|c| c.is_ascii_digit()));
    let rest: Vec<&str> = groups.collect();
    head_ok && !rest.is_empty() && rest.iter().all(|g| g.len() == 3 && g.chars().all(|c| c.is_ascii_digit()))
}

/// 연도 파싱
pub fn parse_year(input: &str) -> Option<i32> {
    let value = parse_decimal(input)?;
    if value.fract() != 0.0 || value < i32::MIN as f64 || value > i32::MAX as f64 {
        return None;
    }
    Some(value as i32)
}

/// 시퀀스 플래그 파싱 ("1"/"0", "true"/"false")
pub fn parse_flag(input: &str) -> Option<bool> {
    match input.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Some(true),
        "0" | "false" | "no" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_decimal() {
        assert_eq!(parse_decimal("0.25"), Some(0.25));
        assert_eq!(parse_decimal("0,25"), Some(0.25));
        assert_eq!(parse_decimal(" 1 000.5 "), Some(1000.5));
        assert_eq!(parse_decimal("1,000.5"), Some(1000.5));
        assert_eq!(parse_decimal(""), None);
        assert_eq!(parse_decimal("n/a"), None);
        assert_eq!(parse_decimal("inf"), None);
    }

    #[test]
    fn test_parse_count_grouping() {
        assert_eq!(parse_count("516826"), Some(516_826.0));
        assert_eq!(parse_count("516 826"), Some(516_826.0));
        assert_eq!(parse_count("516\u{00A0}826"), Some(516_826.0));
        assert_eq!(parse_count("1,234,567"), Some(1_234_567.0));
        assert_eq!(parse_count("12,5"), Some(12.5));
    }

    #[test]
    fn test_parse_count_units() {
        assert_eq!(parse_count("12k"), Some(12_000.0));
        assert_eq!(parse_count("1.5 млн"), Some(1_500_000.0));
        assert_eq!(parse_count("1,5 млн."), Some(1_500_000.0));
        assert_eq!(parse_count("2 тыс"), Some(2_000.0));
        assert_eq!(parse_count("1.2e6"), Some(1_200_000.0));
        assert_eq!(parse_count("12 people"), None);
        assert_eq!(parse_count("—"), None);
    }

    #[test]
    fn test_parse_year() {
        assert_eq!(parse_year("2010"), Some(2010));
        assert_eq!(parse_year("2010.0"), Some(2010));
        assert_eq!(parse_year("2010.5"), None);
        assert_eq!(parse_year(""), None);
    }

    #[test]
    fn test_parse_flag() {
        assert_eq!(parse_flag("1"), Some(true));
        assert_eq!(parse_flag(" FALSE "), Some(false));
        assert_eq!(parse_flag("maybe"), None);
    }
}
