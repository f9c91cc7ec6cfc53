//! 전역 가중치를 글자/시퀀스로 나눈 보기
//!
//! 코드포인트 하나짜리 변형 중 러시아 자모가 아닌 글자, 그리고 코드포인트가 둘 이상인
//! 시퀀스를 각각 가중치 내림차순으로 뽑습니다.

use crate::core::alphabet::TARGET_ALPHABET;

use super::aggregator::{GlobalWeights, WeightedVariant};

/// 시퀀스 하나와 러시아 자모 밖 문자 포함 여부
#[derive(Debug, Clone, PartialEq)]
pub struct SequenceWeight<'a> {
    pub variant: &'a WeightedVariant,
    pub contains_non_russian: bool,
}

fn is_sequence(variant: &str) -> bool {
    variant.chars().count() > 1
}

fn is_russian(c: char) -> bool {
    TARGET_ALPHABET.contains(c)
}

/// 러시아 자모 밖의 단일 글자 (가중치 내림차순)
pub fn non_russian_letters(weights: &GlobalWeights) -> Vec<&WeightedVariant> {
    weights
        .ranked()
        .into_iter()
        .filter(|v| !is_sequence(&v.variant) && !v.variant.chars().all(is_russian))
        .collect()
}

/// 시퀀스 (가중치 내림차순)
pub fn sequences(weights: &GlobalWeights) -> Vec<SequenceWeight<'_>> {
    weights
        .ranked()
        .into_iter()
        .filter(|v| is_sequence(&v.variant))
        .map(|variant| SequenceWeight {
            variant,
            contains_non_russian: !variant.variant.chars().all(is_russian),
        })
        .collect()
}

/// 글자를 포함하는 모든 시퀀스의 가중치 합
pub fn sequence_weight_containing(weights: &GlobalWeights, letter: &str) -> f64 {
    weights
        .iter()
        .filter(|v| is_sequence(&v.variant) && v.variant.contains(letter))
        .map(|v| v.weight)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{FrequencyEntry, FrequencyTable, MappingTable, PopulationEntry, PopulationTable};
    use crate::weight::{aggregate, AlphaPolicy};

    fn weights(entries: &[(&str, f64)]) -> GlobalWeights {
        let population = PopulationTable::from_entries([PopulationEntry::new("kbd", 100.0, None)]);
        let frequency = FrequencyTable::from_entries(entries.iter().map(|(v, f)| FrequencyEntry::new("kbd", v, *f)));
        aggregate(&population, &frequency, &MappingTable::default(), &AlphaPolicy::default())
    }

    #[test]
    fn test_letters_and_sequences_split() {
        let weights = weights(&[
            ("А", 0.3),
            ("Ӏ", 0.2),
            ("Ӓ", 0.1),
            ("Кᵸ", 0.15),
            ("ЛЛ", 0.05),
            ("А\u{0304}", 0.2),
        ]);

        let letters: Vec<&str> = non_russian_letters(&weights).iter().map(|v| v.variant.as_str()).collect();
        assert_eq!(letters, vec!["Ӏ", "Ӓ"]);

        let seqs: Vec<(&str, bool)> = sequences(&weights)
            .iter()
            .map(|s| (s.variant.variant.as_str(), s.contains_non_russian))
            .collect();
        assert_eq!(seqs, vec![("А\u{0304}", true), ("Кᵸ", true), ("ЛЛ", false)]);
    }

    #[test]
    fn test_sequence_weight_containing() {
        let weights = weights(&[("Кᵸ", 0.2), ("Хᵸ", 0.3), ("ᵸ", 0.4), ("ГӀ", 0.1)]);
        assert!((sequence_weight_containing(&weights, "ᵸ") - 50.0).abs() < 1e-9);
        assert!((sequence_weight_containing(&weights, "Ӏ") - 10.0).abs() < 1e-9);
        assert_eq!(sequence_weight_containing(&weights, "Ӧ"), 0.0);
    }
}
