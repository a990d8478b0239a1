use std::collections::HashMap;

use crate::rules::condition::Condition;

pub const DEFAULT_SEPARATOR: char = ',';

/// Which structured condition a matched legacy token becomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegacyKind {
    Feat,
    Talent,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LegacyParse {
    pub conditions: Vec<Condition>,
    /// Tokens that matched no name in the collection, kept verbatim for
    /// display. Never treated as satisfied.
    pub unresolved: Vec<String>,
}

/// Best-effort adapter for free-text prerequisite strings, used only at
/// the content-loading boundary. Splits on the separator, trims, and
/// matches each token case-insensitively by exact name against the
/// collection. Display names that themselves contain the separator will
/// split wrong; such content should migrate to structured conditions.
pub fn parse_prerequisite_text(
    text: &str,
    separator: char,
    kind: LegacyKind,
    names_to_ids: &HashMap<String, String>,
) -> LegacyParse {
    let mut parse = LegacyParse::default();
    for token in text.split(separator) {
        let token = token.trim();
        if token.is_empty() {
            continue;
        }
        match names_to_ids.get(&token.to_ascii_lowercase()) {
            Some(id) => {
                let condition = match kind {
                    LegacyKind::Feat => Condition::Feat { id: id.clone() },
                    LegacyKind::Talent => Condition::Talent { id: id.clone() },
                };
                parse.conditions.push(condition);
            }
            None => parse.unresolved.push(token.to_string()),
        }
    }
    parse
}

/// Lowercased display name -> id, as the adapter expects.
pub fn name_index<'a>(entries: impl Iterator<Item = (&'a str, &'a str)>) -> HashMap<String, String> {
    entries
        .map(|(name, id)| (name.to_ascii_lowercase(), id.to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index() -> HashMap<String, String> {
        name_index(
            [
                ("Power Attack", "power-attack"),
                ("Mighty Swing", "mighty-swing"),
            ]
            .into_iter(),
        )
    }

    #[test]
    fn comma_separated_names_become_conditions() {
        let parse = parse_prerequisite_text(
            "Power Attack, mighty swing",
            DEFAULT_SEPARATOR,
            LegacyKind::Feat,
            &index(),
        );

        assert_eq!(
            parse.conditions,
            vec![
                Condition::Feat {
                    id: "power-attack".to_string()
                },
                Condition::Feat {
                    id: "mighty-swing".to_string()
                },
            ]
        );
        assert!(parse.unresolved.is_empty());
    }

    #[test]
    fn unmatched_tokens_are_preserved_not_guessed() {
        let parse = parse_prerequisite_text(
            "Power Attack, Strength 13",
            DEFAULT_SEPARATOR,
            LegacyKind::Feat,
            &index(),
        );

        assert_eq!(parse.conditions.len(), 1);
        assert_eq!(parse.unresolved, vec!["Strength 13".to_string()]);
    }

    #[test]
    fn separator_is_configurable() {
        let parse = parse_prerequisite_text(
            "Power Attack; Mighty Swing",
            ';',
            LegacyKind::Feat,
            &index(),
        );
        assert_eq!(parse.conditions.len(), 2);
    }

    #[test]
    fn names_containing_the_separator_fall_to_unresolved() {
        let index = name_index([("Skill Focus (Use the Force)", "skill-focus-utf")].into_iter());
        let parse = parse_prerequisite_text(
            "Skill Focus (Use the Force)",
            DEFAULT_SEPARATOR,
            LegacyKind::Feat,
            &index,
        );
        assert_eq!(parse.conditions.len(), 1);

        let broken = parse_prerequisite_text(
            "Rapid Shot (pistols, rifles)",
            DEFAULT_SEPARATOR,
            LegacyKind::Feat,
            &index,
        );
        assert!(broken.conditions.is_empty());
        assert_eq!(broken.unresolved.len(), 2);
    }

    #[test]
    fn empty_tokens_are_skipped() {
        let parse = parse_prerequisite_text(
            " , Power Attack, ",
            DEFAULT_SEPARATOR,
            LegacyKind::Feat,
            &index(),
        );
        assert_eq!(parse.conditions.len(), 1);
        assert!(parse.unresolved.is_empty());
    }
}
