pub const CONTENT_SCHEMA_VERSION: i64 = 1;
pub const CONTENT_VERSION: &str = "v1";
