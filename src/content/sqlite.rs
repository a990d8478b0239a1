use std::path::Path;

use rusqlite::{Connection, OptionalExtension};
use tracing::warn;

use crate::content::repository::{TemplateRepository, TemplateStats};
use crate::content::schema::{CONTENT_SCHEMA_VERSION, CONTENT_VERSION};
use crate::data::legacy::{name_index, parse_prerequisite_text, LegacyKind, DEFAULT_SEPARATOR};
use crate::rules::condition::FeatureId;
use crate::rules::requirement::Requirement;
use crate::rules::stacking::TemplateDef;

#[derive(Debug)]
pub struct SqliteTemplateRepository {
    conn: Connection,
}

impl SqliteTemplateRepository {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, Box<dyn std::error::Error>> {
        let conn = Connection::open(path)?;
        Self::from_connection(conn)
    }

    /// Wrap an existing connection (e.g. an in-memory content pack). The
    /// meta check still applies.
    pub fn from_connection(conn: Connection) -> Result<Self, Box<dyn std::error::Error>> {
        validate_content_meta(&conn)?;
        Ok(Self { conn })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl TemplateRepository for SqliteTemplateRepository {
    fn stats(&self) -> Result<TemplateStats, Box<dyn std::error::Error>> {
        Ok(TemplateStats {
            template_count: count_rows(&self.conn, "gear_template")?,
            stack_pair_count: count_rows(&self.conn, "template_stack_pair")?,
        })
    }

    fn template(&self, id: &FeatureId) -> Result<Option<TemplateDef>, Box<dyn std::error::Error>> {
        Ok(self
            .templates()?
            .into_iter()
            .find(|template| template.id.matches(&id.0)))
    }

    fn templates(&self) -> Result<Vec<TemplateDef>, Box<dyn std::error::Error>> {
        let mut stmt = self.conn.prepare(
            "SELECT template_id, name, can_stack, requirement, prerequisite_text \
             FROM gear_template \
             WHERE is_enabled = 1 \
             ORDER BY rowid",
        )?;

        let rows = stmt.query_map([], |row| {
            let template_id: String = row.get(0)?;
            let name: String = row.get(1)?;
            let can_stack: i64 = row.get(2)?;
            let requirement_raw: Option<String> = row.get(3)?;
            let prerequisite_text: Option<String> = row.get(4)?;
            Ok((template_id, name, can_stack, requirement_raw, prerequisite_text))
        })?;

        let mut raw = Vec::new();
        for row in rows {
            raw.push(row?);
        }

        let index = name_index(
            raw.iter()
                .map(|(id, name, _, _, _)| (name.as_str(), id.as_str())),
        );

        let mut out = Vec::new();
        for (template_id, name, can_stack, requirement_raw, prerequisite_text) in raw {
            let mut requirement = decode_requirement(&template_id, requirement_raw.as_deref());
            let mut unresolved_text = Vec::new();
            if let Some(text) = prerequisite_text {
                let parse =
                    parse_prerequisite_text(&text, DEFAULT_SEPARATOR, LegacyKind::Feat, &index);
                requirement.conditions.extend(parse.conditions);
                unresolved_text.extend(parse.unresolved);
            }
            out.push(TemplateDef {
                id: FeatureId(template_id),
                name,
                can_stack: can_stack != 0,
                requirement,
                unresolved_text,
            });
        }

        Ok(out)
    }

    fn allowed_pairs(&self) -> Result<Vec<(FeatureId, FeatureId)>, Box<dyn std::error::Error>> {
        let mut stmt = self.conn.prepare(
            "SELECT first_id, second_id FROM template_stack_pair ORDER BY rowid",
        )?;
        let rows = stmt.query_map([], |row| {
            let first: String = row.get(0)?;
            let second: String = row.get(1)?;
            Ok((FeatureId(first), FeatureId(second)))
        })?;

        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }
}

/// A malformed requirement column degrades to "no requirement" with a
/// warning; one bad row must not hide the rest of the catalog.
fn decode_requirement(template_id: &str, raw: Option<&str>) -> Requirement {
    let Some(raw) = raw else {
        return Requirement::default();
    };
    if raw.trim().is_empty() {
        return Requirement::default();
    }
    match serde_json::from_str(raw) {
        Ok(requirement) => requirement,
        Err(err) => {
            warn!(template_id, %err, "ignoring malformed requirement column");
            Requirement::default()
        }
    }
}

fn count_rows(conn: &Connection, table: &str) -> Result<i64, Box<dyn std::error::Error>> {
    let sql = format!("SELECT COUNT(*) FROM {}", table);
    let count = conn.query_row(&sql, [], |row| row.get::<_, i64>(0))?;
    Ok(count)
}

fn validate_content_meta(conn: &Connection) -> Result<(), Box<dyn std::error::Error>> {
    let table = conn
        .query_row(
            "SELECT name FROM sqlite_master WHERE type='table' AND name='content_meta'",
            [],
            |row| row.get::<_, String>(0),
        )
        .optional()?;
    if table.is_none() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            "content_meta table missing (rebuild the content db)",
        )
        .into());
    }

    let meta = conn
        .query_row(
            "SELECT schema_version, content_version FROM content_meta WHERE id = 1",
            [],
            |row| Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?)),
        )
        .optional()?;

    let Some((schema_version, content_version)) = meta else {
        return Err(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            "content_meta missing row id=1",
        )
        .into());
    };

    if schema_version != CONTENT_SCHEMA_VERSION {
        return Err(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!(
                "content_meta schema_version {} != expected {}",
                schema_version, CONTENT_SCHEMA_VERSION
            ),
        )
        .into());
    }
    if content_version != CONTENT_VERSION {
        return Err(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!(
                "content_meta content_version {} != expected {}",
                content_version, CONTENT_VERSION
            ),
        )
        .into());
    }

    Ok(())
}
