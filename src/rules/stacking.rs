use serde::{Deserialize, Serialize};

use crate::rules::condition::FeatureId;
use crate::rules::graph::FeatureNode;
use crate::rules::requirement::Requirement;

/// A gear template as authored: a feature node plus the stacking flag.
/// Loaded from the content database; see `content::sqlite`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateDef {
    pub id: FeatureId,
    pub name: String,
    #[serde(default)]
    pub can_stack: bool,
    #[serde(default)]
    pub requirement: Requirement,
    #[serde(default)]
    pub unresolved_text: Vec<String>,
}

impl TemplateDef {
    pub fn feature_node(&self) -> FeatureNode {
        FeatureNode {
            id: self.id.clone(),
            name: self.name.clone(),
            requirement: self.requirement.clone(),
            unresolved_text: self.unresolved_text.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackingVerdict {
    pub valid: bool,
    pub reason: Option<String>,
}

impl StackingVerdict {
    fn ok() -> Self {
        Self {
            valid: true,
            reason: None,
        }
    }

    fn rejected(reason: String) -> Self {
        Self {
            valid: false,
            reason: Some(reason),
        }
    }
}

/// Whether `candidate` may be applied on top of `current`. With nothing
/// applied the candidate is always allowed; reapplying the same template is
/// not; otherwise either side's global `can_stack` flag or an entry in the
/// unordered allow-list permits the pair. Ids that resolve to no template
/// are rejected rather than waved through.
pub fn can_apply(
    current: Option<&FeatureId>,
    candidate: &FeatureId,
    catalog: &[TemplateDef],
    allowed_pairs: &[(FeatureId, FeatureId)],
) -> StackingVerdict {
    let Some(candidate_def) = find_template(catalog, candidate) else {
        return StackingVerdict::rejected(format!("unknown template {}", candidate));
    };

    let Some(current_id) = current else {
        return StackingVerdict::ok();
    };

    if current_id.matches(&candidate.0) {
        return StackingVerdict::rejected(format!("{} is already applied", candidate_def.name));
    }

    let Some(current_def) = find_template(catalog, current_id) else {
        return StackingVerdict::rejected(format!("unknown template {}", current_id));
    };

    if current_def.can_stack || candidate_def.can_stack {
        return StackingVerdict::ok();
    }

    if pair_allowed(allowed_pairs, current_id, candidate) {
        return StackingVerdict::ok();
    }

    StackingVerdict::rejected(format!(
        "{} cannot be combined with {}",
        current_def.name, candidate_def.name
    ))
}

fn find_template<'a>(catalog: &'a [TemplateDef], id: &FeatureId) -> Option<&'a TemplateDef> {
    catalog.iter().find(|template| template.id.matches(&id.0))
}

/// Pair matching is order-independent: (A, B) authored once covers both
/// application orders.
fn pair_allowed(pairs: &[(FeatureId, FeatureId)], left: &FeatureId, right: &FeatureId) -> bool {
    pairs.iter().any(|(a, b)| {
        (a.matches(&left.0) && b.matches(&right.0)) || (a.matches(&right.0) && b.matches(&left.0))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn template(id: &str, can_stack: bool) -> TemplateDef {
        TemplateDef {
            id: FeatureId(id.to_string()),
            name: id.to_string(),
            can_stack,
            requirement: Requirement::default(),
            unresolved_text: Vec::new(),
        }
    }

    fn id(raw: &str) -> FeatureId {
        FeatureId(raw.to_string())
    }

    fn catalog() -> Vec<TemplateDef> {
        vec![
            template("Prototype", true),
            template("Cortosis Weave", false),
            template("Masterwork", false),
        ]
    }

    fn pairs() -> Vec<(FeatureId, FeatureId)> {
        vec![(id("Prototype"), id("Cortosis Weave"))]
    }

    #[test]
    fn empty_slot_accepts_any_known_template() {
        let verdict = can_apply(None, &id("Masterwork"), &catalog(), &pairs());
        assert!(verdict.valid);
    }

    #[test]
    fn reapplying_the_same_template_is_invalid() {
        let verdict = can_apply(
            Some(&id("Masterwork")),
            &id("masterwork"),
            &catalog(),
            &pairs(),
        );
        assert!(!verdict.valid);
        assert!(verdict.reason.unwrap().contains("already applied"));
    }

    #[test]
    fn global_can_stack_permits_any_partner() {
        let verdict = can_apply(
            Some(&id("Prototype")),
            &id("Masterwork"),
            &catalog(),
            &pairs(),
        );
        assert!(verdict.valid);
    }

    #[test]
    fn allow_list_matches_unordered() {
        let strict_catalog = vec![
            template("Prototype", false),
            template("Cortosis Weave", false),
            template("Masterwork", false),
        ];

        let forward = can_apply(
            Some(&id("Prototype")),
            &id("Cortosis Weave"),
            &strict_catalog,
            &pairs(),
        );
        let backward = can_apply(
            Some(&id("Cortosis Weave")),
            &id("Prototype"),
            &strict_catalog,
            &pairs(),
        );
        assert!(forward.valid);
        assert_eq!(forward.valid, backward.valid);

        let unlisted = can_apply(
            Some(&id("Cortosis Weave")),
            &id("Masterwork"),
            &strict_catalog,
            &pairs(),
        );
        assert!(!unlisted.valid);
        assert!(unlisted.reason.unwrap().contains("cannot be combined"));
    }

    #[test]
    fn unknown_ids_are_rejected() {
        let verdict = can_apply(None, &id("Ancient Relic"), &catalog(), &pairs());
        assert!(!verdict.valid);
        assert!(verdict.reason.unwrap().contains("unknown template"));

        let verdict = can_apply(
            Some(&id("Ancient Relic")),
            &id("Masterwork"),
            &catalog(),
            &pairs(),
        );
        assert!(!verdict.valid);
    }
}
