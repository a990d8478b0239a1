pub mod repository;
pub mod schema;
pub mod sqlite;

pub use repository::{TemplateRepository, TemplateStats};
pub use sqlite::SqliteTemplateRepository;
