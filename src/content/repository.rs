use crate::rules::condition::FeatureId;
use crate::rules::stacking::TemplateDef;

#[derive(Debug, Clone, Copy)]
pub struct TemplateStats {
    pub template_count: i64,
    pub stack_pair_count: i64,
}

/// Read-only access to the gear-template catalog. The engine itself never
/// loads content; callers hand it the already-materialized defs and pairs.
pub trait TemplateRepository {
    fn stats(&self) -> Result<TemplateStats, Box<dyn std::error::Error>>;
    fn template(&self, id: &FeatureId) -> Result<Option<TemplateDef>, Box<dyn std::error::Error>>;
    fn templates(&self) -> Result<Vec<TemplateDef>, Box<dyn std::error::Error>>;
    fn allowed_pairs(&self) -> Result<Vec<(FeatureId, FeatureId)>, Box<dyn std::error::Error>>;
}
