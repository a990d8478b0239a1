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
pub struct TalentTreeCatalog {
    pub schema_version: u32,
    pub trees: Vec<TalentTree>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TalentTree {
    pub id: String,
    pub name: String,
    pub talents: Vec<TalentDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TalentDef {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub requirement: Requirement,
    /// Legacy comma-separated prerequisite string, converted into
    /// structured conditions at load.
    #[serde(default)]
    pub prerequisite_text: Option<String>,
    #[serde(default)]
    pub unresolved_text: Vec<String>,
}

pub fn load_talent_catalog(path: impl AsRef<Path>) -> Result<TalentTreeCatalog, CatalogDataError> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path).map_err(|source| CatalogDataError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let mut catalog: TalentTreeCatalog =
        serde_json::from_str(&raw).map_err(|source| CatalogDataError::Json {
            path: path.display().to_string(),
            source,
        })?;
    catalog.validate()?;
    catalog.resolve_legacy_text(DEFAULT_SEPARATOR);
    Ok(catalog)
}

impl TalentTreeCatalog {
    pub fn validate(&self) -> Result<(), CatalogDataError> {
        let mut tree_ids = HashSet::new();
        for tree in &self.trees {
            if tree.id.trim().is_empty() {
                return Err(CatalogDataError::Validation(
                    "talent tree id cannot be empty".to_string(),
                ));
            }
            if !tree_ids.insert(tree.id.to_ascii_lowercase()) {
                return Err(CatalogDataError::Validation(format!(
                    "duplicate talent tree id {}",
                    tree.id
                )));
            }
            let mut talent_ids = HashSet::new();
            for talent in &tree.talents {
                if talent.id.trim().is_empty() {
                    return Err(CatalogDataError::Validation(format!(
                        "tree {} contains a talent with an empty id",
                        tree.id
                    )));
                }
                if talent.name.trim().is_empty() {
                    return Err(CatalogDataError::Validation(format!(
                        "talent {} missing name",
                        talent.id
                    )));
                }
                if !talent_ids.insert(talent.id.to_ascii_lowercase()) {
                    return Err(CatalogDataError::Validation(format!(
                        "duplicate talent id {} in tree {}",
                        talent.id, tree.id
                    )));
                }
            }
        }
        Ok(())
    }

    /// Convert legacy prerequisite strings into structured conditions,
    /// resolving tokens against sibling talents of the same tree.
    pub fn resolve_legacy_text(&mut self, separator: char) {
        for tree in &mut self.trees {
            let index = name_index(
                tree.talents
                    .iter()
                    .map(|talent| (talent.name.as_str(), talent.id.as_str())),
            );
            for talent in &mut tree.talents {
                let Some(text) = talent.prerequisite_text.take() else {
                    continue;
                };
                let parse = parse_prerequisite_text(&text, separator, LegacyKind::Talent, &index);
                talent.requirement.conditions.extend(parse.conditions);
                talent.unresolved_text.extend(parse.unresolved);
            }
        }
    }

    pub fn tree(&self, id: &str) -> Option<&TalentTree> {
        self.trees.iter().find(|tree| tree.id.eq_ignore_ascii_case(id))
    }

    pub fn talent_count(&self) -> usize {
        self.trees.iter().map(|tree| tree.talents.len()).sum()
    }
}

impl TalentTree {
    pub fn feature_nodes(&self) -> Vec<FeatureNode> {
        self.talents
            .iter()
            .map(|talent| FeatureNode {
                id: FeatureId(talent.id.clone()),
                name: talent.name.clone(),
                requirement: talent.requirement.clone(),
                unresolved_text: talent.unresolved_text.clone(),
            })
            .collect()
    }

    /// Whether the character's talent set contains any talent of this tree.
    pub fn owns_any(&self, talents: &HashSet<String>) -> bool {
        self.talents.iter().any(|talent| {
            talents
                .iter()
                .any(|owned| owned.eq_ignore_ascii_case(&talent.name) || owned.eq_ignore_ascii_case(&talent.id))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn sample_json() -> &'static str {
        r#"{
            "schema_version": 1,
            "trees": [
                {
                    "id": "armored-defense",
                    "name": "Armored Defense",
                    "talents": [
                        { "id": "armored-defense", "name": "Armored Defense" },
                        {
                            "id": "improved-armored-defense",
                            "name": "Improved Armored Defense",
                            "prerequisite_text": "Armored Defense"
                        },
                        {
                            "id": "second-skin",
                            "name": "Second Skin",
                            "requirement": {
                                "mode": "ALL",
                                "conditions": [
                                    { "kind": "talent", "id": "armored-defense" },
                                    { "kind": "featPattern", "pattern": "Armor Proficiency" }
                                ]
                            }
                        }
                    ]
                }
            ]
        }"#
    }

    #[test]
    fn loads_and_resolves_legacy_text() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(sample_json().as_bytes()).unwrap();

        let catalog = load_talent_catalog(file.path()).unwrap();
        let tree = catalog.tree("armored-defense").unwrap();
        let improved = &tree.talents[1];

        assert!(improved.prerequisite_text.is_none());
        assert_eq!(improved.requirement.conditions.len(), 1);
        assert!(improved.unresolved_text.is_empty());
    }

    #[test]
    fn duplicate_talent_ids_fail_validation() {
        let mut catalog: TalentTreeCatalog = serde_json::from_str(sample_json()).unwrap();
        let duplicate = catalog.trees[0].talents[0].clone();
        catalog.trees[0].talents.push(duplicate);

        let err = catalog.validate().unwrap_err();
        assert!(err.to_string().contains("duplicate talent id"));
    }

    #[test]
    fn unmatched_legacy_tokens_survive_as_display_text() {
        let mut catalog: TalentTreeCatalog = serde_json::from_str(sample_json()).unwrap();
        catalog.trees[0].talents[1].prerequisite_text =
            Some("Armored Defense, trained in Endurance".to_string());
        catalog.resolve_legacy_text(',');

        let improved = &catalog.trees[0].talents[1];
        assert_eq!(improved.requirement.conditions.len(), 1);
        assert_eq!(
            improved.unresolved_text,
            vec!["trained in Endurance".to_string()]
        );
    }
}
