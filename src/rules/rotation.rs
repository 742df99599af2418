/// A mixed-game rotation: an ordered list of variant names played in
/// sequence (HORSE, eight-game, and friends). The core only loads and
/// exposes the list; switching variants between orbits happens above it.
#[derive(Debug, Clone, Deserialize)]
pub struct Rotation {
    pub name: String,
    pub variants: Vec<String>,
    #[serde(default = "default_hands_per_variant")]
    pub hands_per_variant: usize,
}

fn default_hands_per_variant() -> usize {
    1
}

impl Rotation {
    pub fn from_json(text: &str) -> Result<Vec<Rotation>, RulesError> {
        let rotations: Vec<Rotation> = serde_json::from_str(text)?;
        for rotation in rotations.iter() {
            if rotation.variants.is_empty() {
                return Err(RulesError::InvalidField {
                    field: "rotation.variants".to_string(),
                    message: format!("rotation '{}' lists no variants", rotation.name),
                });
            }
        }
        Ok(rotations)
    }

    /// the variant to play on a given hand number (0-based)
    pub fn variant_for_hand(&self, hand: usize) -> &str {
        let index = (hand / self.hands_per_variant.max(1)) % self.variants.len();
        &self.variants[index]
    }
}

use super::loader::RulesError;
use serde::Deserialize;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn horse_rotates_in_order() {
        let text = r#"[{
            "name": "HORSE",
            "variants": ["Hold'em", "Omaha 8", "Razz", "Seven Card Stud", "Stud 8"],
            "hands_per_variant": 2
        }]"#;
        let rotations = Rotation::from_json(text).unwrap();
        let horse = &rotations[0];
        assert_eq!(horse.variant_for_hand(0), "Hold'em");
        assert_eq!(horse.variant_for_hand(1), "Hold'em");
        assert_eq!(horse.variant_for_hand(2), "Omaha 8");
        assert_eq!(horse.variant_for_hand(9), "Stud 8");
        assert_eq!(horse.variant_for_hand(10), "Hold'em");
    }

    #[test]
    fn bundled_rotations_load() {
        let rotations = Rotation::from_json(include_str!("../../demos/rotations.json")).unwrap();
        assert_eq!(rotations[0].name, "HORSE");
        assert_eq!(rotations[0].variants.len(), 5);
    }

    #[test]
    fn empty_rotation_fails() {
        let text = r#"[{"name": "Broken", "variants": []}]"#;
        assert!(Rotation::from_json(text).is_err());
    }
}
