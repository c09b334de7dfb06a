// src/config/amino_acid.rs
use serde::{Serialize, Deserialize};
use super::Locale;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AminoAcid {
    pub name: String,
    pub name_ru: String,
    pub amount: f64,        // mg per 100 g of protein
    pub ideal_score: f64,   // FAO/WHO reference, same unit as amount
    pub score: f64,         // percent of the reference
    pub essential: bool,
}

impl AminoAcid {
    pub fn new(name: &str, name_ru: &str, amount: f64, ideal_score: f64, score: f64, essential: bool) -> Self {
        Self {
            name: name.to_string(),
            name_ru: name_ru.to_string(),
            amount,
            ideal_score,
            score,
            essential,
        }
    }

    pub fn label(&self, locale: Locale) -> &str {
        match locale {
            Locale::En => &self.name,
            Locale::Ru => &self.name_ru,
        }
    }
}

/// FAO/WHO reference pattern for the essential amino acids, in mg per g of protein.
pub const FAO_WHO_PATTERN: [(&str, &str, f64); 8] = [
    ("Leucine", "Лейцин", 59.0),
    ("Isoleucine", "Изолейцин", 30.0),
    ("Valine", "Валин", 39.0),
    ("Lysine", "Лизин", 45.0),
    ("Methionine", "Метионин", 16.0),
    ("Threonine", "Треонин", 23.0),
    ("Phenylalanine", "Фенилаланин", 30.0),
    ("Tryptophan", "Триптофан", 6.0),
];

/// The fixed profile returned by the simulated analyzer.
pub fn reference_profile() -> Vec<AminoAcid> {
    vec![
        AminoAcid::new("Leucine", "Лейцин", 1890.0, 1950.0, 97.0, true),
        AminoAcid::new("Isoleucine", "Изолейцин", 1240.0, 1300.0, 95.0, true),
        AminoAcid::new("Valine", "Валин", 1350.0, 1400.0, 96.0, true),
        AminoAcid::new("Lysine", "Лизин", 1680.0, 1600.0, 105.0, true),
        AminoAcid::new("Methionine", "Метионин", 520.0, 700.0, 74.0, true),
        AminoAcid::new("Threonine", "Треонин", 1050.0, 1050.0, 100.0, true),
        AminoAcid::new("Phenylalanine", "Фенилаланин", 1180.0, 1300.0, 91.0, true),
        AminoAcid::new("Tryptophan", "Триптофан", 280.0, 280.0, 100.0, true),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_profile_covers_every_essential_amino_acid() {
        let profile = reference_profile();
        assert_eq!(profile.len(), 8);
        assert!(profile.iter().all(|aa| aa.essential));

        for ((name, name_ru, _), aa) in FAO_WHO_PATTERN.iter().zip(&profile) {
            assert_eq!(*name, aa.name);
            assert_eq!(*name_ru, aa.name_ru);
        }
    }

    #[test]
    fn label_follows_locale() {
        let lysine = AminoAcid::new("Lysine", "Лизин", 1680.0, 1600.0, 105.0, true);
        assert_eq!(lysine.label(Locale::En), "Lysine");
        assert_eq!(lysine.label(Locale::Ru), "Лизин");
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let aa = AminoAcid::new("Valine", "Валин", 1350.0, 1400.0, 96.0, true);
        let json = serde_json::to_value(&aa).unwrap();
        assert_eq!(json["nameRu"], "Валин");
        assert_eq!(json["idealScore"], 1400.0);
    }
}
