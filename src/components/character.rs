use std::collections::HashSet;

use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};

use crate::rules::snapshot::AbilityScores;

#[derive(Component, Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Abilities(pub AbilityScores);

#[derive(Component, Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrainedSkills(pub HashSet<String>);

/// Feats by display name, as the host's sheet records them.
#[derive(Component, Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeatSet(pub HashSet<String>);

#[derive(Component, Debug, Clone, Default, Serialize, Deserialize)]
pub struct TalentSet(pub HashSet<String>);

#[derive(Component, Debug, Clone, Default, Serialize, Deserialize)]
pub struct ForceRepertoire {
    pub powers: HashSet<String>,
    pub techniques: HashSet<String>,
    pub secrets: HashSet<String>,
}

#[derive(Component, Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Progression {
    pub level: i32,
    pub base_attack: i32,
}

impl Default for Progression {
    fn default() -> Self {
        Self {
            level: 1,
            base_attack: 0,
        }
    }
}

#[derive(Component, Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct DarkSide {
    pub score: i32,
}

#[derive(Component, Debug, Clone, Serialize, Deserialize)]
pub struct Species {
    pub id: String,
}

/// Marker for the entity whose eligibility the board tracks.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Player;

pub type CharacterParts = (
    Abilities,
    TrainedSkills,
    FeatSet,
    TalentSet,
    ForceRepertoire,
    Progression,
    DarkSide,
    Species,
);

/// A low-level soldier used by the debug binary and tests.
pub fn soldier_recruit() -> CharacterParts {
    let mut abilities = AbilityScores::default();
    abilities.strength = 13;
    abilities.constitution = 12;
    abilities.dexterity = 11;

    let mut skills = HashSet::new();
    skills.insert("Endurance".to_string());
    skills.insert("Mechanics".to_string());

    let mut feats = HashSet::new();
    feats.insert("Armor Proficiency (light)".to_string());
    feats.insert("Weapon Proficiency (rifles)".to_string());

    (
        Abilities(abilities),
        TrainedSkills(skills),
        FeatSet(feats),
        TalentSet::default(),
        ForceRepertoire::default(),
        Progression {
            level: 2,
            base_attack: 2,
        },
        DarkSide::default(),
        Species {
            id: "Human".to_string(),
        },
    )
}
