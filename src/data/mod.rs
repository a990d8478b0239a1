pub mod feats;
pub mod legacy;
pub mod talents;

pub use feats::{load_feat_catalog, FeatCatalog, FeatDef};
pub use legacy::{parse_prerequisite_text, LegacyKind, LegacyParse, DEFAULT_SEPARATOR};
pub use talents::{load_talent_catalog, TalentDef, TalentTree, TalentTreeCatalog};

/// Shared failure type for the JSON catalog loaders.
#[derive(Debug)]
pub enum CatalogDataError {
    Io {
        path: String,
        source: std::io::Error,
    },
    Json {
        path: String,
        source: serde_json::Error,
    },
    Validation(String),
}

impl std::fmt::Display for CatalogDataError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogDataError::Io { path, source } => {
                write!(f, "failed to read {}: {}", path, source)
            }
            CatalogDataError::Json { path, source } => {
                write!(f, "failed to parse {}: {}", path, source)
            }
            CatalogDataError::Validation(message) => write!(f, "{}", message),
        }
    }
}

impl std::error::Error for CatalogDataError {}
