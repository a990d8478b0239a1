use crate::rules::condition::{Condition, DarkSideComparison};
use crate::rules::snapshot::CharacterSnapshot;

/// Outcome of checking one condition. The reason is always populated so a
/// selection UI can show why an option is open or greyed out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConditionCheck {
    pub satisfied: bool,
    pub reason: String,
}

impl ConditionCheck {
    fn met(reason: String) -> Self {
        Self {
            satisfied: true,
            reason,
        }
    }

    fn unmet(reason: String) -> Self {
        Self {
            satisfied: false,
            reason,
        }
    }
}

/// Evaluate one condition against a character snapshot. Data-quality
/// problems in authored content (unknown kinds, empty patterns, empty name
/// lists) fail closed with a distinct reason instead of panicking, so a
/// single bad entry cannot abort a batch evaluation.
pub fn evaluate_condition(condition: &Condition, snapshot: &CharacterSnapshot) -> ConditionCheck {
    match condition {
        Condition::Feat { id } => {
            if snapshot.has_feat(id) {
                ConditionCheck::met(format!("has feat {}", id))
            } else {
                ConditionCheck::unmet(format!("missing feat {}", id))
            }
        }
        Condition::FeatPattern { pattern } => {
            if pattern.trim().is_empty() {
                return ConditionCheck::unmet("feat pattern is empty (content error)".to_string());
            }
            match snapshot.feat_matching(pattern) {
                Some(name) => ConditionCheck::met(format!("{} matches \"{}\"", name, pattern)),
                None => ConditionCheck::unmet(format!("no feat matching \"{}\"", pattern)),
            }
        }
        Condition::Talent { id } => {
            if snapshot.has_talent(id) {
                ConditionCheck::met(format!("has talent {}", id))
            } else {
                ConditionCheck::unmet(format!("missing talent {}", id))
            }
        }
        Condition::TalentFromTree { tree } => {
            if snapshot.has_talent_from_tree(tree) {
                ConditionCheck::met(format!("has a talent from {}", tree))
            } else {
                ConditionCheck::unmet(format!("no talent from {}", tree))
            }
        }
        Condition::Attribute { ability, minimum } => {
            let score = snapshot.abilities.get(*ability);
            if score >= *minimum {
                ConditionCheck::met(format!("{} {} meets {}", ability, score, minimum))
            } else {
                ConditionCheck::unmet(format!(
                    "requires {} {} (have {})",
                    ability, minimum, score
                ))
            }
        }
        Condition::SkillTrained { skill } => {
            if snapshot.is_trained(skill) {
                ConditionCheck::met(format!("trained in {}", skill))
            } else {
                ConditionCheck::unmet(format!("not trained in {}", skill))
            }
        }
        Condition::BaseAttack { minimum } => {
            if snapshot.base_attack >= *minimum {
                ConditionCheck::met(format!(
                    "base attack +{} meets +{}",
                    snapshot.base_attack, minimum
                ))
            } else {
                ConditionCheck::unmet(format!(
                    "requires base attack +{} (have +{})",
                    minimum, snapshot.base_attack
                ))
            }
        }
        Condition::Level { minimum } => {
            if snapshot.level >= *minimum {
                ConditionCheck::met(format!("level {} meets {}", snapshot.level, minimum))
            } else {
                ConditionCheck::unmet(format!(
                    "requires level {} (have {})",
                    minimum, snapshot.level
                ))
            }
        }
        Condition::DarkSideScore { minimum } => {
            if snapshot.dark_side_score >= *minimum {
                ConditionCheck::met(format!(
                    "dark side score {} meets {}",
                    snapshot.dark_side_score, minimum
                ))
            } else {
                ConditionCheck::unmet(format!(
                    "requires dark side score {} (have {})",
                    minimum, snapshot.dark_side_score
                ))
            }
        }
        Condition::DarkSideVersusAbility { ability, comparison } => {
            let score = snapshot.dark_side_score;
            let threshold = snapshot.abilities.get(*ability);
            match comparison {
                DarkSideComparison::AtLeastScore => {
                    if score >= threshold {
                        ConditionCheck::met(format!(
                            "dark side score {} meets {} {}",
                            score, ability, threshold
                        ))
                    } else {
                        ConditionCheck::unmet(format!(
                            "dark side score {} below {} {}",
                            score, ability, threshold
                        ))
                    }
                }
                DarkSideComparison::BelowScore => {
                    if score < threshold {
                        ConditionCheck::met(format!(
                            "dark side score {} below {} {}",
                            score, ability, threshold
                        ))
                    } else {
                        ConditionCheck::unmet(format!(
                            "dark side score {} not below {} {}",
                            score, ability, threshold
                        ))
                    }
                }
            }
        }
        Condition::Species { species } => {
            if snapshot.is_species(species) {
                ConditionCheck::met(format!("species {}", species))
            } else {
                ConditionCheck::unmet(format!(
                    "requires species {} (is {})",
                    species,
                    snapshot.species.as_deref().unwrap_or("unknown")
                ))
            }
        }
        Condition::ForcePower { any_of } => {
            known_any(&snapshot.force_powers, any_of, "Force power")
        }
        Condition::ForceTechnique { any_of } => {
            known_any(&snapshot.force_techniques, any_of, "Force technique")
        }
        Condition::ForceSecret { any_of } => {
            known_any(&snapshot.force_secrets, any_of, "Force secret")
        }
        Condition::Unknown { kind } => {
            ConditionCheck::unmet(format!("unrecognized requirement kind: {}", kind))
        }
    }
}

fn known_any(
    known: &std::collections::HashSet<String>,
    any_of: &[String],
    label: &str,
) -> ConditionCheck {
    if any_of.is_empty() {
        return ConditionCheck::unmet(format!("{} list is empty (content error)", label));
    }
    match CharacterSnapshot::first_known(known, any_of) {
        Some(name) => ConditionCheck::met(format!("knows {} {}", label, name)),
        None => ConditionCheck::unmet(format!("knows no {} of: {}", label, any_of.join(", "))),
    }
}
