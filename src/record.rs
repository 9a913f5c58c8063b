//! Canonical creature record shared by both feeds.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::sprite::SpriteData;

/// Which fetched collection a record (or viewer session) belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum Feed {
    Ranked,
    Gallery,
}

impl Feed {
    pub fn label(self) -> &'static str {
        match self {
            Feed::Ranked => "ranked",
            Feed::Gallery => "gallery",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct BaseStats {
    pub hp: u16,
    pub attack: u16,
    pub defense: u16,
    pub special_attack: u16,
    pub special_defense: u16,
    pub speed: u16,
}

impl BaseStats {
    pub fn total(&self) -> u32 {
        [
            self.hp,
            self.attack,
            self.defense,
            self.special_attack,
            self.special_defense,
            self.speed,
        ]
        .iter()
        .map(|value| u32::from(*value))
        .sum()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Record {
    pub name: String,
    pub stats: BaseStats,
    pub types: Vec<String>,
    /// Metres.
    pub height: f32,
    /// Kilograms.
    pub weight: f32,
    pub abilities: Vec<String>,
    #[serde(default)]
    pub image: Option<SpriteData>,
}

impl Record {
    pub fn type_line(&self) -> String {
        self.types.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stat_total_sums_all_six() {
        let stats = BaseStats {
            hp: 35,
            attack: 55,
            defense: 40,
            special_attack: 50,
            special_defense: 50,
            speed: 90,
        };
        assert_eq!(stats.total(), 320);
    }

    #[test]
    fn type_line_joins_labels() {
        let record = Record {
            name: "Bulbasaur".into(),
            types: vec!["Grass".into(), "Poison".into()],
            ..Default::default()
        };
        assert_eq!(record.type_line(), "Grass, Poison");
    }
}
