use std::fmt;
use std::str::FromStr;

use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FeatureId(pub String);

impl FeatureId {
    pub fn matches(&self, other: &str) -> bool {
        self.0.eq_ignore_ascii_case(other)
    }
}

impl fmt::Display for FeatureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Ability {
    Strength,
    Dexterity,
    Constitution,
    Intelligence,
    Wisdom,
    Charisma,
}

impl fmt::Display for Ability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Ability::Strength => "Strength",
            Ability::Dexterity => "Dexterity",
            Ability::Constitution => "Constitution",
            Ability::Intelligence => "Intelligence",
            Ability::Wisdom => "Wisdom",
            Ability::Charisma => "Charisma",
        };
        write!(f, "{}", label)
    }
}

#[derive(Debug)]
pub struct ParseEnumError {
    pub value: String,
}

impl fmt::Display for ParseEnumError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown enum value: {}", self.value)
    }
}

impl std::error::Error for ParseEnumError {}

impl FromStr for Ability {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "strength" | "str" => Ok(Ability::Strength),
            "dexterity" | "dex" => Ok(Ability::Dexterity),
            "constitution" | "con" => Ok(Ability::Constitution),
            "intelligence" | "int" => Ok(Ability::Intelligence),
            "wisdom" | "wis" => Ok(Ability::Wisdom),
            "charisma" | "cha" => Ok(Ability::Charisma),
            _ => Err(ParseEnumError {
                value: s.to_string(),
            }),
        }
    }
}

/// How a dynamic dark-side requirement compares the score against an ability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DarkSideComparison {
    /// Dark-side score >= the named ability score.
    AtLeastScore,
    /// Dark-side score strictly below the named ability score.
    BelowScore,
}

impl FromStr for DarkSideComparison {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "AT_LEAST_SCORE" | "AT_LEAST" => Ok(DarkSideComparison::AtLeastScore),
            "BELOW_SCORE" | "BELOW" => Ok(DarkSideComparison::BelowScore),
            _ => Err(ParseEnumError {
                value: s.to_string(),
            }),
        }
    }
}

/// One atomic, self-contained requirement evaluable from a character
/// snapshot alone. Conditions never read evaluation state from each other.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    Feat { id: String },
    FeatPattern { pattern: String },
    Talent { id: String },
    TalentFromTree { tree: String },
    Attribute { ability: Ability, minimum: i32 },
    SkillTrained { skill: String },
    BaseAttack { minimum: i32 },
    Level { minimum: i32 },
    DarkSideScore { minimum: i32 },
    DarkSideVersusAbility { ability: Ability, comparison: DarkSideComparison },
    Species { species: String },
    ForcePower { any_of: Vec<String> },
    ForceTechnique { any_of: Vec<String> },
    ForceSecret { any_of: Vec<String> },
    /// Preserved for authored content the loader could not understand.
    /// Always evaluates unsatisfied.
    Unknown { kind: String },
}

impl Condition {
    pub fn kind(&self) -> &'static str {
        match self {
            Condition::Feat { .. } => "feat",
            Condition::FeatPattern { .. } => "featPattern",
            Condition::Talent { .. } => "talent",
            Condition::TalentFromTree { .. } => "talentFromTree",
            Condition::Attribute { .. } => "attribute",
            Condition::SkillTrained { .. } => "skillTrained",
            Condition::BaseAttack { .. } => "bab",
            Condition::Level { .. } => "level",
            Condition::DarkSideScore { .. } => "darkSideScore",
            Condition::DarkSideVersusAbility { .. } => "darkSideScoreDynamic",
            Condition::Species { .. } => "species",
            Condition::ForcePower { .. } => "forcePower",
            Condition::ForceTechnique { .. } => "forceTechnique",
            Condition::ForceSecret { .. } => "forceSecret",
            Condition::Unknown { .. } => "unknown",
        }
    }

    /// The sibling-feature id this condition may refer to, used when wiring
    /// dependency edges inside one collection.
    pub fn referenced_feature(&self) -> Option<&str> {
        match self {
            Condition::Feat { id } => Some(id),
            Condition::Talent { id } => Some(id),
            Condition::TalentFromTree { tree } => Some(tree),
            _ => None,
        }
    }

    /// Decode a condition from loose catalog JSON. Unrecognized or
    /// incomplete entries degrade to `Condition::Unknown` so one bad row
    /// cannot abort a batch load.
    pub fn from_json(value: &Value) -> Condition {
        let kind = match value.get("kind").and_then(Value::as_str) {
            Some(kind) => kind,
            None => {
                return Condition::Unknown {
                    kind: "(missing kind)".to_string(),
                }
            }
        };

        match kind {
            "feat" => match string_field(value, "id") {
                Some(id) => Condition::Feat { id },
                None => malformed(kind, "id"),
            },
            "featPattern" => match string_field(value, "pattern") {
                Some(pattern) => Condition::FeatPattern { pattern },
                None => malformed(kind, "pattern"),
            },
            "talent" => match string_field(value, "id") {
                Some(id) => Condition::Talent { id },
                None => malformed(kind, "id"),
            },
            "talentFromTree" => match string_field(value, "tree") {
                Some(tree) => Condition::TalentFromTree { tree },
                None => malformed(kind, "tree"),
            },
            "attribute" => {
                let ability = string_field(value, "ability")
                    .and_then(|raw| Ability::from_str(&raw).ok());
                match (ability, int_field(value, "minimum")) {
                    (Some(ability), Some(minimum)) => Condition::Attribute { ability, minimum },
                    _ => malformed(kind, "ability/minimum"),
                }
            }
            "skillTrained" => match string_field(value, "skill") {
                Some(skill) => Condition::SkillTrained { skill },
                None => malformed(kind, "skill"),
            },
            "bab" => match int_field(value, "minimum") {
                Some(minimum) => Condition::BaseAttack { minimum },
                None => malformed(kind, "minimum"),
            },
            "level" => match int_field(value, "minimum") {
                Some(minimum) => Condition::Level { minimum },
                None => malformed(kind, "minimum"),
            },
            "darkSideScore" => match int_field(value, "minimum") {
                Some(minimum) => Condition::DarkSideScore { minimum },
                None => malformed(kind, "minimum"),
            },
            "darkSideScoreDynamic" => {
                let ability = string_field(value, "ability")
                    .and_then(|raw| Ability::from_str(&raw).ok());
                let comparison = string_field(value, "comparison")
                    .and_then(|raw| DarkSideComparison::from_str(&raw).ok());
                match (ability, comparison) {
                    (Some(ability), Some(comparison)) => {
                        Condition::DarkSideVersusAbility { ability, comparison }
                    }
                    _ => malformed(kind, "ability/comparison"),
                }
            }
            "species" => match string_field(value, "species") {
                Some(species) => Condition::Species { species },
                None => malformed(kind, "species"),
            },
            "forcePower" => Condition::ForcePower {
                any_of: name_list(value),
            },
            "forceTechnique" => Condition::ForceTechnique {
                any_of: name_list(value),
            },
            "forceSecret" => Condition::ForceSecret {
                any_of: name_list(value),
            },
            other => Condition::Unknown {
                kind: other.to_string(),
            },
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            Condition::Feat { id } => json!({ "kind": "feat", "id": id }),
            Condition::FeatPattern { pattern } => {
                json!({ "kind": "featPattern", "pattern": pattern })
            }
            Condition::Talent { id } => json!({ "kind": "talent", "id": id }),
            Condition::TalentFromTree { tree } => {
                json!({ "kind": "talentFromTree", "tree": tree })
            }
            Condition::Attribute { ability, minimum } => {
                json!({ "kind": "attribute", "ability": ability, "minimum": minimum })
            }
            Condition::SkillTrained { skill } => {
                json!({ "kind": "skillTrained", "skill": skill })
            }
            Condition::BaseAttack { minimum } => json!({ "kind": "bab", "minimum": minimum }),
            Condition::Level { minimum } => json!({ "kind": "level", "minimum": minimum }),
            Condition::DarkSideScore { minimum } => {
                json!({ "kind": "darkSideScore", "minimum": minimum })
            }
            Condition::DarkSideVersusAbility { ability, comparison } => {
                json!({
                    "kind": "darkSideScoreDynamic",
                    "ability": ability,
                    "comparison": comparison,
                })
            }
            Condition::Species { species } => json!({ "kind": "species", "species": species }),
            Condition::ForcePower { any_of } => {
                json!({ "kind": "forcePower", "anyOf": any_of })
            }
            Condition::ForceTechnique { any_of } => {
                json!({ "kind": "forceTechnique", "anyOf": any_of })
            }
            Condition::ForceSecret { any_of } => {
                json!({ "kind": "forceSecret", "anyOf": any_of })
            }
            Condition::Unknown { kind } => json!({ "kind": kind }),
        }
    }
}

impl Serialize for Condition {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Condition {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(Condition::from_json(&value))
    }
}

fn malformed(kind: &str, field: &str) -> Condition {
    Condition::Unknown {
        kind: format!("{} (missing {})", kind, field),
    }
}

fn string_field(value: &Value, field: &str) -> Option<String> {
    value
        .get(field)
        .and_then(Value::as_str)
        .map(|raw| raw.to_string())
        .filter(|raw| !raw.trim().is_empty())
}

fn int_field(value: &Value, field: &str) -> Option<i32> {
    value
        .get(field)
        .and_then(Value::as_i64)
        .map(|raw| raw as i32)
}

fn name_list(value: &Value) -> Vec<String> {
    value
        .get("anyOf")
        .and_then(Value::as_array)
        .map(|entries| {
            entries
                .iter()
                .filter_map(Value::as_str)
                .map(|name| name.to_string())
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_structured_conditions() {
        let raw = json!({ "kind": "attribute", "ability": "str", "minimum": 13 });
        assert_eq!(
            Condition::from_json(&raw),
            Condition::Attribute {
                ability: Ability::Strength,
                minimum: 13
            }
        );

        let raw = json!({ "kind": "bab", "minimum": 5 });
        assert_eq!(Condition::from_json(&raw), Condition::BaseAttack { minimum: 5 });
    }

    #[test]
    fn unknown_kind_degrades_instead_of_failing() {
        let raw = json!({ "kind": "alignmentShift", "minimum": 2 });
        assert_eq!(
            Condition::from_json(&raw),
            Condition::Unknown {
                kind: "alignmentShift".to_string()
            }
        );
    }

    #[test]
    fn missing_parameter_is_preserved_as_unknown() {
        let raw = json!({ "kind": "feat" });
        let condition = Condition::from_json(&raw);
        assert_eq!(condition.kind(), "unknown");
        match condition {
            Condition::Unknown { kind } => assert!(kind.contains("feat")),
            other => panic!("expected unknown, got {:?}", other),
        }
    }

    #[test]
    fn json_round_trip_preserves_meaning() {
        let condition = Condition::DarkSideVersusAbility {
            ability: Ability::Wisdom,
            comparison: DarkSideComparison::AtLeastScore,
        };
        assert_eq!(Condition::from_json(&condition.to_json()), condition);
    }

    #[test]
    fn referenced_feature_only_for_feature_kinds() {
        let feat = Condition::Feat {
            id: "Power Attack".to_string(),
        };
        assert_eq!(feat.referenced_feature(), Some("Power Attack"));

        let level = Condition::Level { minimum: 3 };
        assert_eq!(level.referenced_feature(), None);
    }
}
