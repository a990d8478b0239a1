// Re-export core modules for use by the binary or other consumers
pub mod components;
pub mod content;
pub mod core;
pub mod data;
pub mod rules;
pub mod systems;

// Expose the evaluation engine and the types callers hand it
pub use crate::rules::{
    build_dependency_graph, can_apply, compute_tiers, evaluate_condition, evaluate_requirement,
    CharacterSnapshot, Condition, DependencyGraph, FeatureId, FeatureNode, Requirement,
    TierLayout,
};
pub use crate::systems::eligibility::{EligibilityBoard, ProgressionLibrary};
