use std::collections::HashSet;

use crate::rules::condition::FeatureId;
use crate::rules::graph::DependencyGraph;

/// Layered layout of one collection. Tier 0 holds features with no
/// in-collection prerequisites; for every edge A -> B, B sits in a strictly
/// higher tier than A. Features that cannot tier are partitioned into
/// cycle groups and (for features merely downstream of a cycle) `blocked`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TierLayout {
    pub tiers: Vec<Vec<FeatureId>>,
    pub cycles: Vec<Vec<FeatureId>>,
    pub blocked: Vec<FeatureId>,
}

impl TierLayout {
    pub fn tier_of(&self, id: &FeatureId) -> Option<usize> {
        self.tiers
            .iter()
            .position(|layer| layer.iter().any(|entry| entry == id))
    }

    pub fn has_structural_errors(&self) -> bool {
        !self.cycles.is_empty() || !self.blocked.is_empty()
    }
}

/// Layered topological ordering by bounded passes. Each pass assigns every
/// still-unassigned feature whose in-collection dependencies all carry a
/// tier; the pass index becomes the tier, so output order within a tier is
/// catalog order and repeated calls are identical. A pass that assigns
/// nothing ends the loop, so cyclic content terminates instead of spinning.
pub fn compute_tiers(graph: &DependencyGraph) -> TierLayout {
    let count = graph.len();
    let mut tier: Vec<Option<usize>> = vec![None; count];
    let mut tiers: Vec<Vec<FeatureId>> = Vec::new();

    loop {
        let current = tiers.len();
        let mut layer = Vec::new();
        for idx in 0..count {
            if tier[idx].is_some() {
                continue;
            }
            if graph.depends_on[idx].iter().all(|&dep| tier[dep].is_some()) {
                layer.push(idx);
            }
        }
        if layer.is_empty() {
            break;
        }
        for &idx in &layer {
            tier[idx] = Some(current);
        }
        tiers.push(layer.iter().map(|&idx| graph.nodes[idx].clone()).collect());
    }

    let unassigned: Vec<usize> = (0..count).filter(|&idx| tier[idx].is_none()).collect();
    let (cycles, blocked) = partition_unassigned(graph, &unassigned);

    TierLayout {
        tiers,
        cycles,
        blocked,
    }
}

/// Group unassigned features into cycle groups by mutual reachability over
/// the unassigned subgraph. Whatever is unassigned but not on a cycle only
/// depends on one, and is reported separately so authors fix the right
/// features.
fn partition_unassigned(
    graph: &DependencyGraph,
    unassigned: &[usize],
) -> (Vec<Vec<FeatureId>>, Vec<FeatureId>) {
    let count = graph.len();
    let mut open = vec![false; count];
    for &idx in unassigned {
        open[idx] = true;
    }

    let reach: Vec<HashSet<usize>> = unassigned
        .iter()
        .map(|&idx| reach_set(idx, &open, &graph.depends_on))
        .collect();
    let slot: std::collections::HashMap<usize, usize> = unassigned
        .iter()
        .enumerate()
        .map(|(pos, &idx)| (idx, pos))
        .collect();

    let mut grouped = vec![false; count];
    let mut cycles = Vec::new();
    let mut blocked = Vec::new();

    for (pos, &idx) in unassigned.iter().enumerate() {
        if grouped[idx] {
            continue;
        }
        if !reach[pos].contains(&idx) {
            blocked.push(graph.nodes[idx].clone());
            continue;
        }
        grouped[idx] = true;
        let mut group = vec![graph.nodes[idx].clone()];
        for &other in unassigned.iter().skip(pos + 1) {
            if grouped[other] {
                continue;
            }
            let Some(&other_pos) = slot.get(&other) else {
                continue;
            };
            if reach[pos].contains(&other) && reach[other_pos].contains(&idx) {
                grouped[other] = true;
                group.push(graph.nodes[other].clone());
            }
        }
        cycles.push(group);
    }

    (cycles, blocked)
}

/// Every feature reachable from `origin` by following one or more
/// depends-on edges, visiting unassigned features only.
fn reach_set(origin: usize, open: &[bool], depends_on: &[Vec<usize>]) -> HashSet<usize> {
    let mut seen = HashSet::new();
    let mut stack: Vec<usize> = depends_on[origin]
        .iter()
        .copied()
        .filter(|&dep| open[dep])
        .collect();

    while let Some(node) = stack.pop() {
        if !seen.insert(node) {
            continue;
        }
        for &dep in &depends_on[node] {
            if open[dep] && !seen.contains(&dep) {
                stack.push(dep);
            }
        }
    }

    seen
}
