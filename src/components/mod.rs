pub mod character;

pub use character::{
    soldier_recruit, Abilities, CharacterParts, DarkSide, FeatSet, ForceRepertoire, Player,
    Progression, Species, TalentSet, TrainedSkills,
};
