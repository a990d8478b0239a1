use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::data::legacy::{name_index, parse_prerequisite_text, LegacyKind, DEFAULT_SEPARATOR};
use crate::data::CatalogDataError;
use crate::rules::condition::FeatureId;
use crate::rules::graph::FeatureNode;
use crate::rules::requirement::Requirement;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatCatalog {
    pub schema_version: u32,
    pub feats: Vec<FeatDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatDef {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub requirement: Requirement,
    #[serde(default)]
    pub prerequisite_text: Option<String>,
    #[serde(default)]
    pub unresolved_text: Vec<String>,
}

pub fn load_feat_catalog(path: impl AsRef<Path>) -> Result<FeatCatalog, CatalogDataError> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path).map_err(|source| CatalogDataError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let mut catalog: FeatCatalog =
        serde_json::from_str(&raw).map_err(|source| CatalogDataError::Json {
            path: path.display().to_string(),
            source,
        })?;
    catalog.validate()?;
    catalog.resolve_legacy_text(DEFAULT_SEPARATOR);
    Ok(catalog)
}

impl FeatCatalog {
    pub fn validate(&self) -> Result<(), CatalogDataError> {
        let mut ids = HashSet::new();
        for feat in &self.feats {
            if feat.id.trim().is_empty() {
                return Err(CatalogDataError::Validation(
                    "feat id cannot be empty".to_string(),
                ));
            }
            if feat.name.trim().is_empty() {
                return Err(CatalogDataError::Validation(format!(
                    "feat {} missing name",
                    feat.id
                )));
            }
            if !ids.insert(feat.id.to_ascii_lowercase()) {
                return Err(CatalogDataError::Validation(format!(
                    "duplicate feat id {}",
                    feat.id
                )));
            }
        }
        Ok(())
    }

    pub fn resolve_legacy_text(&mut self, separator: char) {
        let index = name_index(
            self.feats
                .iter()
                .map(|feat| (feat.name.as_str(), feat.id.as_str())),
        );
        for feat in &mut self.feats {
            let Some(text) = feat.prerequisite_text.take() else {
                continue;
            };
            let parse = parse_prerequisite_text(&text, separator, LegacyKind::Feat, &index);
            feat.requirement.conditions.extend(parse.conditions);
            feat.unresolved_text.extend(parse.unresolved);
        }
    }

    pub fn feature_nodes(&self) -> Vec<FeatureNode> {
        self.feats
            .iter()
            .map(|feat| FeatureNode {
                id: FeatureId(feat.id.clone()),
                name: feat.name.clone(),
                requirement: feat.requirement.clone(),
                unresolved_text: feat.unresolved_text.clone(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn sample_json() -> &'static str {
        r#"{
            "schema_version": 1,
            "feats": [
                { "id": "power-attack", "name": "Power Attack",
                  "requirement": { "mode": "ALL", "conditions": [
                      { "kind": "attribute", "ability": "STR", "minimum": 13 }
                  ] } },
                { "id": "mighty-swing", "name": "Mighty Swing",
                  "prerequisite_text": "Power Attack" },
                { "id": "cleave", "name": "Cleave",
                  "prerequisite_text": "Power Attack, Str 13" }
            ]
        }"#
    }

    #[test]
    fn loads_with_mixed_structured_and_legacy_requirements() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(sample_json().as_bytes()).unwrap();

        let catalog = load_feat_catalog(file.path()).unwrap();
        assert_eq!(catalog.feats.len(), 3);

        let mighty = &catalog.feats[1];
        assert_eq!(mighty.requirement.conditions.len(), 1);

        let cleave = &catalog.feats[2];
        assert_eq!(cleave.requirement.conditions.len(), 1);
        assert_eq!(cleave.unresolved_text, vec!["Str 13".to_string()]);
    }

    #[test]
    fn empty_id_fails_validation() {
        let catalog = FeatCatalog {
            schema_version: 1,
            feats: vec![FeatDef {
                id: "  ".to_string(),
                name: "Broken".to_string(),
                description: None,
                requirement: Requirement::default(),
                prerequisite_text: None,
                unresolved_text: Vec::new(),
            }],
        };
        assert!(catalog.validate().is_err());
    }
}
