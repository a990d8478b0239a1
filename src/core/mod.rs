pub mod ecs;

pub use ecs::{create_schedule, create_world, load_default_library};
