pub mod eligibility;

pub use eligibility::{
    build_snapshot, eligibility_refresh_system, EligibilityBoard, ProgressionLibrary,
};
