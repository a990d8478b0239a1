use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::rules::condition::Ability;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityScores {
    pub strength: i32,
    pub dexterity: i32,
    pub constitution: i32,
    pub intelligence: i32,
    pub wisdom: i32,
    pub charisma: i32,
}

impl Default for AbilityScores {
    fn default() -> Self {
        Self {
            strength: 10,
            dexterity: 10,
            constitution: 10,
            intelligence: 10,
            wisdom: 10,
            charisma: 10,
        }
    }
}

impl AbilityScores {
    pub fn get(&self, ability: Ability) -> i32 {
        match ability {
            Ability::Strength => self.strength,
            Ability::Dexterity => self.dexterity,
            Ability::Constitution => self.constitution,
            Ability::Intelligence => self.intelligence,
            Ability::Wisdom => self.wisdom,
            Ability::Charisma => self.charisma,
        }
    }

    /// d20 modifier: floor((score - 10) / 2). Euclidean division so odd
    /// scores below 10 round down, not toward zero.
    pub fn modifier(&self, ability: Ability) -> i32 {
        (self.get(ability) - 10).div_euclid(2)
    }
}

/// Read-only view of one character, rebuilt by the caller per evaluation.
/// Name matching throughout the engine is ASCII case-insensitive, so the
/// sets hold names exactly as the host supplied them.
#[derive(Debug, Clone, Default)]
pub struct CharacterSnapshot {
    pub abilities: AbilityScores,
    pub trained_skills: HashSet<String>,
    pub feats: HashSet<String>,
    pub talents: HashSet<String>,
    /// Trees the character owns at least one talent from, precomputed by
    /// the snapshot builder so tree conditions stay snapshot-evaluable.
    pub talent_trees: HashSet<String>,
    pub base_attack: i32,
    pub level: i32,
    pub species: Option<String>,
    pub dark_side_score: i32,
    pub force_powers: HashSet<String>,
    pub force_techniques: HashSet<String>,
    pub force_secrets: HashSet<String>,
}

impl CharacterSnapshot {
    pub fn has_feat(&self, name: &str) -> bool {
        contains_ci(&self.feats, name)
    }

    /// First feat whose full name contains the pattern, case-insensitively.
    pub fn feat_matching(&self, pattern: &str) -> Option<&str> {
        let needle = pattern.to_ascii_lowercase();
        self.feats
            .iter()
            .find(|name| name.to_ascii_lowercase().contains(&needle))
            .map(String::as_str)
    }

    pub fn has_talent(&self, name: &str) -> bool {
        contains_ci(&self.talents, name)
    }

    pub fn has_talent_from_tree(&self, tree: &str) -> bool {
        contains_ci(&self.talent_trees, tree)
    }

    pub fn is_trained(&self, skill: &str) -> bool {
        contains_ci(&self.trained_skills, skill)
    }

    pub fn is_species(&self, species: &str) -> bool {
        self.species
            .as_deref()
            .map(|own| own.eq_ignore_ascii_case(species))
            .unwrap_or(false)
    }

    /// First name in `any_of` the character knows within `known`.
    pub fn first_known<'a>(known: &HashSet<String>, any_of: &'a [String]) -> Option<&'a str> {
        any_of
            .iter()
            .find(|name| contains_ci(known, name))
            .map(String::as_str)
    }
}

fn contains_ci(set: &HashSet<String>, name: &str) -> bool {
    set.iter().any(|entry| entry.eq_ignore_ascii_case(name))
}
