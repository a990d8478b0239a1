use std::collections::{HashMap, HashSet};

use bevy_ecs::prelude::*;

use crate::components::character::{
    Abilities, DarkSide, FeatSet, ForceRepertoire, Player, Progression, Species, TalentSet,
    TrainedSkills,
};
use crate::data::feats::FeatDef;
use crate::data::talents::TalentTree;
use crate::rules::requirement::{evaluate_requirement, RequirementVerdict};
use crate::rules::snapshot::CharacterSnapshot;

/// Progression content loaded for this session. Owned by the world and
/// treated as read-only; reloading content means replacing the resource
/// and letting the next refresh rebuild the board.
#[derive(Resource, Debug, Default, Clone)]
pub struct ProgressionLibrary {
    pub trees: Vec<TalentTree>,
    pub feats: Vec<FeatDef>,
}

/// Per-feature verdicts for the player, rebuilt by
/// `eligibility_refresh_system`. Selection UIs read this to grey out
/// options and show the gap list.
#[derive(Resource, Debug, Default)]
pub struct EligibilityBoard {
    pub talents: HashMap<String, RequirementVerdict>,
    pub feats: HashMap<String, RequirementVerdict>,
}

impl EligibilityBoard {
    pub fn talent(&self, id: &str) -> Option<&RequirementVerdict> {
        self.talents.get(id)
    }

    pub fn feat(&self, id: &str) -> Option<&RequirementVerdict> {
        self.feats.get(id)
    }
}

#[allow(clippy::too_many_arguments)]
pub fn build_snapshot(
    abilities: &Abilities,
    skills: &TrainedSkills,
    feats: &FeatSet,
    talents: &TalentSet,
    force: &ForceRepertoire,
    progression: &Progression,
    dark_side: &DarkSide,
    species: &Species,
    trees: &[TalentTree],
) -> CharacterSnapshot {
    let talent_trees: HashSet<String> = trees
        .iter()
        .filter(|tree| tree.owns_any(&talents.0))
        .map(|tree| tree.id.clone())
        .collect();

    CharacterSnapshot {
        abilities: abilities.0,
        trained_skills: skills.0.clone(),
        feats: feats.0.clone(),
        talents: talents.0.clone(),
        talent_trees,
        base_attack: progression.base_attack,
        level: progression.level,
        species: Some(species.id.clone()),
        dark_side_score: dark_side.score,
        force_powers: force.powers.clone(),
        force_techniques: force.techniques.clone(),
        force_secrets: force.secrets.clone(),
    }
}

/// System: rebuilds the eligibility board from the player's current state.
pub fn eligibility_refresh_system(
    library: Res<ProgressionLibrary>,
    mut board: ResMut<EligibilityBoard>,
    query: Query<
        (
            &Abilities,
            &TrainedSkills,
            &FeatSet,
            &TalentSet,
            &ForceRepertoire,
            &Progression,
            &DarkSide,
            &Species,
        ),
        With<Player>,
    >,
) {
    let Ok((abilities, skills, feats, talents, force, progression, dark_side, species)) =
        query.get_single()
    else {
        return;
    };

    let snapshot = build_snapshot(
        abilities,
        skills,
        feats,
        talents,
        force,
        progression,
        dark_side,
        species,
        &library.trees,
    );

    board.talents.clear();
    board.feats.clear();
    for tree in &library.trees {
        for talent in &tree.talents {
            board.talents.insert(
                talent.id.clone(),
                evaluate_requirement(&talent.requirement, &snapshot),
            );
        }
    }
    for feat in &library.feats {
        board.feats.insert(
            feat.id.clone(),
            evaluate_requirement(&feat.requirement, &snapshot),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::character::soldier_recruit;
    use crate::data::talents::TalentDef;
    use crate::rules::condition::{Ability, Condition};
    use crate::rules::requirement::Requirement;

    fn library() -> ProgressionLibrary {
        ProgressionLibrary {
            trees: vec![TalentTree {
                id: "weapon-specialist".to_string(),
                name: "Weapon Specialist".to_string(),
                talents: vec![
                    TalentDef {
                        id: "devastating-attack".to_string(),
                        name: "Devastating Attack".to_string(),
                        description: None,
                        requirement: Requirement::default(),
                        prerequisite_text: None,
                        unresolved_text: Vec::new(),
                    },
                    TalentDef {
                        id: "penetrating-attack".to_string(),
                        name: "Penetrating Attack".to_string(),
                        description: None,
                        requirement: Requirement::all(vec![Condition::Talent {
                            id: "devastating-attack".to_string(),
                        }]),
                        prerequisite_text: None,
                        unresolved_text: Vec::new(),
                    },
                ],
            }],
            feats: vec![FeatDef {
                id: "power-attack".to_string(),
                name: "Power Attack".to_string(),
                description: None,
                requirement: Requirement::all(vec![Condition::Attribute {
                    ability: Ability::Strength,
                    minimum: 13,
                }]),
                prerequisite_text: None,
                unresolved_text: Vec::new(),
            }],
        }
    }

    fn run_once(world: &mut World) {
        let mut schedule = Schedule::default();
        schedule.add_systems(eligibility_refresh_system);
        schedule.run(world);
    }

    #[test]
    fn board_reflects_the_player_components() {
        let mut world = World::new();
        world.insert_resource(library());
        world.insert_resource(EligibilityBoard::default());
        world.spawn((soldier_recruit(), Player));

        run_once(&mut world);

        let board = world.resource::<EligibilityBoard>();
        assert!(board.feat("power-attack").unwrap().satisfied);
        assert!(board.talent("devastating-attack").unwrap().satisfied);

        let gated = board.talent("penetrating-attack").unwrap();
        assert!(!gated.satisfied);
        assert_eq!(gated.failed.len(), 1);
    }

    #[test]
    fn tree_membership_feeds_tree_conditions() {
        let (abilities, skills, feats, mut talents, force, progression, dark_side, species) =
            soldier_recruit();
        talents.0.insert("Devastating Attack".to_string());

        let snapshot = build_snapshot(
            &abilities,
            &skills,
            &feats,
            &talents,
            &force,
            &progression,
            &dark_side,
            &species,
            &library().trees,
        );

        assert!(snapshot.has_talent_from_tree("weapon-specialist"));
        assert!(!snapshot.has_talent_from_tree("lightsaber-combat"));
    }

    #[test]
    fn refresh_is_deterministic_and_leaves_content_untouched() {
        let mut world = World::new();
        world.insert_resource(library());
        world.insert_resource(EligibilityBoard::default());
        world.spawn((soldier_recruit(), Player));

        run_once(&mut world);
        let first: Vec<(String, bool)> = {
            let board = world.resource::<EligibilityBoard>();
            let mut entries: Vec<_> = board
                .talents
                .iter()
                .map(|(id, verdict)| (id.clone(), verdict.satisfied))
                .collect();
            entries.sort();
            entries
        };

        run_once(&mut world);
        let board = world.resource::<EligibilityBoard>();
        let mut second: Vec<_> = board
            .talents
            .iter()
            .map(|(id, verdict)| (id.clone(), verdict.satisfied))
            .collect();
        second.sort();

        assert_eq!(first, second);
        assert_eq!(world.resource::<ProgressionLibrary>().trees.len(), 1);
    }
}
