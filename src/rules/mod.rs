pub mod condition;
pub mod evaluate;
pub mod graph;
pub mod requirement;
pub mod snapshot;
pub mod stacking;
pub mod tiers;

pub use condition::{Ability, Condition, DarkSideComparison, FeatureId, ParseEnumError};
pub use evaluate::{evaluate_condition, ConditionCheck};
pub use graph::{
    build_dependency_graph, DependencyGraph, ExternalReference, FeatureNode, GraphBuildError,
    UnresolvedText,
};
pub use requirement::{
    evaluate_requirement, FailedCondition, RequireMode, Requirement, RequirementVerdict,
};
pub use snapshot::{AbilityScores, CharacterSnapshot};
pub use stacking::{can_apply, StackingVerdict, TemplateDef};
pub use tiers::{compute_tiers, TierLayout};
