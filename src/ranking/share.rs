//! 점유율 표기
//!
//! 규칙 (순서대로):
//! 1. `s < 0.01` → `<1%`
//! 2. 그룹에 변형이 둘 이상이고 1위이며 `s ≥ 0.995` → `>99%`
//! 3. 그 외에는 `s × 100`의 최단 10진 표현을 반올림(half-up)해 `%`를 붙임 (끝자리 0 유지)

/// `<1%` 경계
pub const LESS_THAN_ONE: f64 = 0.01;
/// `>99%` 경계
pub const ALMOST_ONE: f64 = 0.995;

/// 표기 정밀도
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precision {
    /// 소수 1자리 (우선순위 목록)
    Low,
    /// 소수 2자리 (상세 표)
    High,
}

impl Precision {
    pub fn digits(self) -> usize {
        match self {
            Precision::Low => 1,
            Precision::High => 2,
        }
    }
}

/// 그룹 내 점유율 표기
pub fn format_share(share: f64, multi: bool, is_top: bool, precision: Precision) -> String {
    if share < LESS_THAN_ONE {
        return "<1%".to_string();
    }
    if multi && is_top && share >= ALMOST_ONE {
        return ">99%".to_string();
    }
    format!("{}%", round_half_up(share * 100.0, precision.digits()))
}

/// 기준 문자의 화자 비율 표기 (`<1%` 또는 소수 1자리)
pub fn format_coverage(fraction: f64) -> String {
    if fraction < LESS_THAN_ONE {
        return "<1%".to_string();
    }
    format!("{}%", round_half_up(fraction * 100.0, 1))
}

/// 최단 10진 표현 기준 반올림 (half-up)
///
/// 이진 부동소수점 값을 직접 반올림하면 `1.005`가 `1.00`이 되는 경우가 있어,
/// 먼저 최단 10진 문자열로 바꾼 뒤 자릿수 단위로 올림합니다.
pub fn round_half_up(value: f64, digits: usize) -> String {
    let repr = format!("{}", value);
    let (negative, repr) = match repr.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, repr.as_str()),
    };
    let (int_part, frac_part) = repr.split_once('.').unwrap_or((repr, ""));

    let mut kept: Vec<u8> = int_part
        .bytes()
        .chain(frac_part.bytes().chain(std::iter::repeat(b'0')).take(digits))
        .map(|b| b - b'0')
        .collect();
    let mut int_len = int_part.len();

    let round_up = frac_part.as_bytes().get(digits).is_some_and(|d| *d >= b'5');
    if round_up {
        let mut idx = kept.len();
        loop {
            if idx == 0 {
                kept.insert(0, 1);
                int_len += 1;
                break;
            }
            idx -= 1;
            if kept[idx] == 9 {
                kept[idx] = 0;
            } else {
                kept[idx] += 1;
                break;
            }
        }
    }

    let mut out = String::with_capacity(kept.len() + 2);
    if negative && kept.iter().any(|d| *d != 0) {
        out.push('-');
    }
    for (idx, digit) in kept.iter().enumerate() {
        if idx == int_len {
            out.push('.');
        }
        out.push(char::from(b'0' + digit));
    }
    out
}
