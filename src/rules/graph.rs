use std::collections::HashMap;
use std::fmt;

use crate::rules::condition::FeatureId;
use crate::rules::requirement::Requirement;

/// One entry of a feature collection (a talent in a tree, a feat in a feat
/// list, a gear template in a catalog) as seen by the graph builder.
#[derive(Debug, Clone)]
pub struct FeatureNode {
    pub id: FeatureId,
    pub name: String,
    pub requirement: Requirement,
    /// Legacy prerequisite tokens that matched nothing at load time,
    /// preserved verbatim for display.
    pub unresolved_text: Vec<String>,
}

/// A condition referencing a feature id that is not part of this
/// collection. External references are satisfied (or not) purely by the
/// condition evaluator against the live snapshot and never tier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalReference {
    pub node: FeatureId,
    pub referenced: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnresolvedText {
    pub node: FeatureId,
    pub text: String,
}

/// Directed depends-on graph over one collection, nodes in catalog order.
/// `depends_on[i]` lists the indices feature `i` requires; `dependents` is
/// the reverse adjacency.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    pub nodes: Vec<FeatureId>,
    pub names: Vec<String>,
    pub depends_on: Vec<Vec<usize>>,
    pub dependents: Vec<Vec<usize>>,
    pub external: Vec<ExternalReference>,
    pub unresolved: Vec<UnresolvedText>,
}

impl DependencyGraph {
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.nodes.iter().position(|node| node.matches(id))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphBuildError {
    /// A feature whose requirement names itself. Rejected at build time so
    /// content authors get a precise diagnostic instead of a cycle report.
    SelfReference { id: FeatureId },
    DuplicateId { id: FeatureId },
}

impl fmt::Display for GraphBuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GraphBuildError::SelfReference { id } => {
                write!(f, "feature {} requires itself", id)
            }
            GraphBuildError::DuplicateId { id } => {
                write!(f, "duplicate feature id {}", id)
            }
        }
    }
}

impl std::error::Error for GraphBuildError {}

/// Build the depends-on graph for one collection. A condition referencing
/// a sibling id becomes an edge; a condition referencing anything else is
/// recorded as an external dependency.
pub fn build_dependency_graph(features: &[FeatureNode]) -> Result<DependencyGraph, GraphBuildError> {
    let mut index: HashMap<String, usize> = HashMap::new();
    for (idx, feature) in features.iter().enumerate() {
        let key = feature.id.0.to_ascii_lowercase();
        if index.insert(key, idx).is_some() {
            return Err(GraphBuildError::DuplicateId {
                id: feature.id.clone(),
            });
        }
    }

    let mut depends_on: Vec<Vec<usize>> = vec![Vec::new(); features.len()];
    let mut external = Vec::new();

    for (idx, feature) in features.iter().enumerate() {
        for condition in &feature.requirement.conditions {
            let Some(referenced) = condition.referenced_feature() else {
                continue;
            };
            match index.get(&referenced.to_ascii_lowercase()) {
                Some(&dep) if dep == idx => {
                    return Err(GraphBuildError::SelfReference {
                        id: feature.id.clone(),
                    });
                }
                Some(&dep) => {
                    if !depends_on[idx].contains(&dep) {
                        depends_on[idx].push(dep);
                    }
                }
                None => {
                    let reference = ExternalReference {
                        node: feature.id.clone(),
                        referenced: referenced.to_string(),
                    };
                    if !external.contains(&reference) {
                        external.push(reference);
                    }
                }
            }
        }
    }

    let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); features.len()];
    for (idx, deps) in depends_on.iter().enumerate() {
        for &dep in deps {
            dependents[dep].push(idx);
        }
    }

    let unresolved = features
        .iter()
        .flat_map(|feature| {
            feature.unresolved_text.iter().map(|text| UnresolvedText {
                node: feature.id.clone(),
                text: text.clone(),
            })
        })
        .collect();

    Ok(DependencyGraph {
        nodes: features.iter().map(|feature| feature.id.clone()).collect(),
        names: features.iter().map(|feature| feature.name.clone()).collect(),
        depends_on,
        dependents,
        external,
        unresolved,
    })
}
