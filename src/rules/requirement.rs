use serde::{Deserialize, Serialize};

use crate::rules::condition::Condition;
use crate::rules::evaluate::evaluate_condition;
use crate::rules::snapshot::CharacterSnapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequireMode {
    All,
    Any,
}

/// A combination of conditions gating one feature. An empty condition list
/// is vacuously satisfied under `All` and vacuously unsatisfied under `Any`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Requirement {
    pub mode: RequireMode,
    #[serde(default)]
    pub conditions: Vec<Condition>,
}

impl Default for Requirement {
    fn default() -> Self {
        Self {
            mode: RequireMode::All,
            conditions: Vec::new(),
        }
    }
}

impl Requirement {
    pub fn all(conditions: Vec<Condition>) -> Self {
        Self {
            mode: RequireMode::All,
            conditions,
        }
    }

    pub fn any(conditions: Vec<Condition>) -> Self {
        Self {
            mode: RequireMode::Any,
            conditions,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FailedCondition {
    pub condition: Condition,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RequirementVerdict {
    pub satisfied: bool,
    /// Under `All`, every failing condition (the complete gap list). Under
    /// `Any`, the full list when nothing passed, empty otherwise.
    pub failed: Vec<FailedCondition>,
}

/// Evaluate a requirement against a snapshot. Every condition is checked;
/// nothing short-circuits, so the reported failure set is complete by
/// construction.
pub fn evaluate_requirement(
    requirement: &Requirement,
    snapshot: &CharacterSnapshot,
) -> RequirementVerdict {
    let mut any_passed = false;
    let mut failed = Vec::new();

    for condition in &requirement.conditions {
        let check = evaluate_condition(condition, snapshot);
        if check.satisfied {
            any_passed = true;
        } else {
            failed.push(FailedCondition {
                condition: condition.clone(),
                reason: check.reason,
            });
        }
    }

    match requirement.mode {
        RequireMode::All => RequirementVerdict {
            satisfied: failed.is_empty(),
            failed,
        },
        RequireMode::Any => {
            if any_passed {
                RequirementVerdict {
                    satisfied: true,
                    failed: Vec::new(),
                }
            } else {
                RequirementVerdict {
                    satisfied: false,
                    failed,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::condition::Ability;

    #[test]
    fn empty_all_is_vacuously_satisfied() {
        let verdict = evaluate_requirement(&Requirement::all(vec![]), &CharacterSnapshot::default());
        assert!(verdict.satisfied);
        assert!(verdict.failed.is_empty());
    }

    #[test]
    fn empty_any_is_vacuously_unsatisfied() {
        let verdict = evaluate_requirement(&Requirement::any(vec![]), &CharacterSnapshot::default());
        assert!(!verdict.satisfied);
        assert!(verdict.failed.is_empty());
    }

    #[test]
    fn all_mode_reports_every_gap() {
        let snapshot = CharacterSnapshot {
            abilities: crate::rules::snapshot::AbilityScores {
                strength: 12,
                ..Default::default()
            },
            ..CharacterSnapshot::default()
        };
        let requirement = Requirement::all(vec![
            Condition::Attribute {
                ability: Ability::Strength,
                minimum: 13,
            },
            Condition::Feat {
                id: "Power Attack".to_string(),
            },
        ]);

        let verdict = evaluate_requirement(&requirement, &snapshot);
        assert!(!verdict.satisfied);
        assert_eq!(verdict.failed.len(), 2);
    }

    #[test]
    fn any_mode_clears_failures_once_one_passes() {
        let mut snapshot = CharacterSnapshot::default();
        snapshot.feats.insert("Force Sensitivity".to_string());

        let requirement = Requirement::any(vec![
            Condition::Feat {
                id: "Force Sensitivity".to_string(),
            },
            Condition::Level { minimum: 20 },
        ]);

        let verdict = evaluate_requirement(&requirement, &snapshot);
        assert!(verdict.satisfied);
        assert!(verdict.failed.is_empty());

        let requirement = Requirement::any(vec![
            Condition::Feat {
                id: "Cleave".to_string(),
            },
            Condition::Level { minimum: 20 },
        ]);
        let verdict = evaluate_requirement(&requirement, &snapshot);
        assert!(!verdict.satisfied);
        assert_eq!(verdict.failed.len(), 2);
    }
}
