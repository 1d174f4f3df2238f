//! CSV row parser.
//!
//! A glossary CSV holds one entity or relationship per row, discriminated by
//! the `type` column (`glossary`, `category`, `term`, `relationship`). Rows are
//! folded into a [`GlossarySet`]; the first row for a given key wins and later
//! duplicates are ignored.
//!
//! ```text
//! type,glossary_name,name,category_names,short_description,long_description,status,...
//! glossary,Finance
//! term,Finance,Revenue,,,,Active
//! relationship,Finance,Revenue,...,synonym,Finance,Income
//! ```

mod error;

pub use error::ParseError;

use csv::{ReaderBuilder, StringRecord, Trim};
use std::collections::BTreeSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info, warn};

use crate::config::{RelationshipsConfig, DEFAULT_ENTITY_STATUS};
use crate::model::{
    Category, EntityKey, Glossary, GlossarySet, Relationship, RelationshipType, Term,
};

/// Columns every file must declare.
pub const REQUIRED_COLUMNS: &[&str] = &["type", "glossary_name"];

pub const COL_TYPE: &str = "type";
pub const COL_GLOSSARY: &str = "glossary_name";
pub const COL_NAME: &str = "name";
pub const COL_PARENT: &str = "parent_category_name";
pub const COL_CATEGORIES: &str = "category_names";
pub const COL_SHORT_DESCRIPTION: &str = "short_description";
pub const COL_LONG_DESCRIPTION: &str = "long_description";
pub const COL_STATUS: &str = "status";
pub const COL_STEWARD: &str = "steward";
pub const COL_ABBREVIATION: &str = "abbreviation";
pub const COL_EXAMPLES: &str = "examples";
pub const COL_RELATIONSHIP_TYPE: &str = "relationship_type";
pub const COL_LINKED_GLOSSARY: &str = "linked_glossary_name";
pub const COL_LINKED_ENTITY: &str = "linked_entity_name";

/// Parses glossary CSV files into a [`GlossarySet`].
///
/// Which relationship kinds get a reverse edge is injected, normally from
/// [`RelationshipsConfig::bidirectional_types`].
#[derive(Debug, Clone)]
pub struct CsvParser {
    bidirectional: BTreeSet<String>,
}

impl CsvParser {
    /// Creates a parser that expands the given kind names in both directions.
    pub fn new<I, S>(bidirectional_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            bidirectional: bidirectional_types
                .into_iter()
                .map(|t| t.as_ref().trim().to_lowercase())
                .collect(),
        }
    }

    /// Creates a parser from relationship configuration.
    pub fn from_config(config: &RelationshipsConfig) -> Self {
        Self {
            bidirectional: config.bidirectional_set(),
        }
    }

    /// Whether the given kind is expanded in both directions.
    pub fn is_bidirectional(&self, kind: RelationshipType) -> bool {
        self.bidirectional.contains(kind.as_str())
    }

    /// Parses a CSV file.
    pub fn parse_path(&self, path: impl AsRef<Path>) -> Result<GlossarySet, ParseError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ParseError::NotFound {
                path: path.to_path_buf(),
            });
        }

        info!(path = %path.display(), "Parsing CSV file");
        let file = File::open(path).map_err(|e| ParseError::io(path, e))?;
        self.parse_reader(file)
    }

    /// Parses CSV text.
    pub fn parse_str(&self, text: &str) -> Result<GlossarySet, ParseError> {
        self.parse_reader(text.as_bytes())
    }

    /// Parses CSV from any reader.
    pub fn parse_reader<R: Read>(&self, reader: R) -> Result<GlossarySet, ParseError> {
        let mut reader = ReaderBuilder::new()
            .flexible(true)
            .trim(Trim::All)
            .from_reader(reader);

        let headers = reader.headers()?.clone();
        if headers.is_empty() || headers.iter().all(str::is_empty) {
            return Err(ParseError::Empty);
        }

        let mut missing: Vec<String> = REQUIRED_COLUMNS
            .iter()
            .filter(|col| !headers.iter().any(|h| h == **col))
            .map(|col| col.to_string())
            .collect();
        if !missing.is_empty() {
            missing.sort();
            return Err(ParseError::MissingColumns { columns: missing });
        }

        let mut set = GlossarySet::default();
        let mut record = StringRecord::new();
        let mut index: u64 = 0;

        while reader.read_record(&mut record)? {
            index += 1;
            // Header is line 1.
            let line = record.position().map(|p| p.line()).unwrap_or(index + 1);
            let row = Row {
                headers: &headers,
                record: &record,
                line,
            };
            self.parse_row(&row, &mut set)?;
        }

        info!(
            glossaries = set.glossaries.len(),
            categories = set.categories.len(),
            terms = set.terms.len(),
            relationships = set.relationships.len(),
            "Parsed glossary CSV"
        );

        Ok(set)
    }

    fn parse_row(&self, row: &Row<'_>, set: &mut GlossarySet) -> Result<(), ParseError> {
        let entity_type = row.get(COL_TYPE).unwrap_or_default().to_lowercase();

        match entity_type.as_str() {
            "glossary" => parse_glossary_row(row, set),
            "category" => parse_category_row(row, set),
            "term" => parse_term_row(row, set),
            "relationship" => self.parse_relationship_row(row, set),
            other => {
                warn!(
                    line = row.line,
                    entity_type = other,
                    "Unknown entity type, skipping row"
                );
                set.skipped_rows += 1;
                Ok(())
            }
        }
    }

    fn parse_relationship_row(
        &self,
        row: &Row<'_>,
        set: &mut GlossarySet,
    ) -> Result<(), ParseError> {
        let source_glossary = row.get(COL_GLOSSARY);
        let source_name = row.get(COL_NAME);
        let target_glossary = row.get(COL_LINKED_GLOSSARY);
        let target_name = row.get(COL_LINKED_ENTITY);
        let kind = row.get(COL_RELATIONSHIP_TYPE);

        let (
            Some(source_glossary),
            Some(source_name),
            Some(target_glossary),
            Some(target_name),
            Some(kind),
        ) = (source_glossary, source_name, target_glossary, target_name, kind)
        else {
            let fields = [
                (COL_GLOSSARY, source_glossary),
                (COL_NAME, source_name),
                (COL_LINKED_GLOSSARY, target_glossary),
                (COL_LINKED_ENTITY, target_name),
                (COL_RELATIONSHIP_TYPE, kind),
            ]
            .into_iter()
            .filter(|(_, value)| value.is_none())
            .map(|(col, _)| col)
            .collect();
            return Err(ParseError::MissingRelationshipFields {
                line: row.line,
                fields,
            });
        };

        for (column, value) in [
            (COL_GLOSSARY, source_glossary),
            (COL_NAME, source_name),
            (COL_LINKED_GLOSSARY, target_glossary),
            (COL_LINKED_ENTITY, target_name),
        ] {
            row.undotted(column, "Relationship", value)?;
        }

        let relationship_type: RelationshipType =
            kind.parse().map_err(|_| ParseError::UnknownRelationshipType {
                line: row.line,
                value: kind.to_lowercase(),
                valid: RelationshipType::valid_names(),
            })?;

        let is_bidirectional = self.is_bidirectional(relationship_type);
        let relationship = Relationship {
            source_glossary: source_glossary.to_string(),
            source_name: source_name.to_string(),
            target_glossary: target_glossary.to_string(),
            target_name: target_name.to_string(),
            relationship_type,
            is_bidirectional,
        };

        debug!(
            "Relationship: {}.{} {} {}.{} (bidirectional: {})",
            source_glossary,
            source_name,
            relationship_type,
            target_glossary,
            target_name,
            is_bidirectional
        );

        if is_bidirectional {
            let reverse = relationship.reversed();
            set.relationships.push(relationship);
            set.relationships.push(reverse);
        } else {
            set.relationships.push(relationship);
        }

        Ok(())
    }
}

/// One data row with access by column name.
struct Row<'a> {
    headers: &'a StringRecord,
    record: &'a StringRecord,
    line: u64,
}

impl<'a> Row<'a> {
    /// Trimmed cell value; empty cells and missing columns are `None`.
    fn get(&self, column: &str) -> Option<&'a str> {
        self.headers
            .iter()
            .position(|h| h == column)
            .and_then(|idx| self.record.get(idx))
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    fn owned(&self, column: &str) -> Option<String> {
        self.get(column).map(str::to_string)
    }

    /// Comma-separated cell split into trimmed, non-empty items.
    fn list(&self, column: &str) -> Vec<String> {
        self.get(column)
            .map(|value| {
                value
                    .split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Required name cell. Names are joined with '.' into qualified names,
    /// so a dot inside one is rejected.
    fn require(&self, column: &'static str, entity: &'static str) -> Result<&'a str, ParseError> {
        let value = self.get(column).ok_or(ParseError::MissingField {
            line: self.line,
            entity,
            field: column,
        })?;
        self.undotted(column, entity, value)
    }

    fn undotted<'v>(
        &self,
        column: &'static str,
        entity: &'static str,
        value: &'v str,
    ) -> Result<&'v str, ParseError> {
        if value.contains('.') {
            return Err(ParseError::DottedName {
                line: self.line,
                entity,
                field: column,
                value: value.to_string(),
            });
        }
        Ok(value)
    }
}

fn ensure_glossary(set: &mut GlossarySet, name: &str) {
    if !set.glossaries.contains_key(name) {
        set.glossaries.insert(name.to_string(), Glossary::new(name));
        debug!(glossary = name, "Registered glossary");
    }
}

fn parse_glossary_row(row: &Row<'_>, set: &mut GlossarySet) -> Result<(), ParseError> {
    let name = row.require(COL_GLOSSARY, "Glossary")?;
    ensure_glossary(set, name);
    Ok(())
}

fn parse_category_row(row: &Row<'_>, set: &mut GlossarySet) -> Result<(), ParseError> {
    let glossary_name = row.require(COL_GLOSSARY, "Category")?;
    let name = row.require(COL_NAME, "Category")?;

    if let Some(parent) = row.get(COL_PARENT) {
        row.undotted(COL_PARENT, "Category", parent)?;
    }

    ensure_glossary(set, glossary_name);

    let key = EntityKey::new(glossary_name, name);
    if set.categories.contains_key(&key) {
        return Ok(());
    }

    let category = Category {
        parent_category_name: row.owned(COL_PARENT),
        short_description: row.owned(COL_SHORT_DESCRIPTION),
        long_description: row.owned(COL_LONG_DESCRIPTION),
        status: row.get(COL_STATUS).unwrap_or(DEFAULT_ENTITY_STATUS).to_string(),
        ..Category::new(glossary_name, name)
    };
    debug!(category = %key, "Registered category");
    set.categories.insert(key, category);
    Ok(())
}

fn parse_term_row(row: &Row<'_>, set: &mut GlossarySet) -> Result<(), ParseError> {
    let glossary_name = row.require(COL_GLOSSARY, "Term")?;
    let name = row.require(COL_NAME, "Term")?;
    let category_names = row.list(COL_CATEGORIES);
    for category in &category_names {
        row.undotted(COL_CATEGORIES, "Term", category)?;
    }

    ensure_glossary(set, glossary_name);

    let key = EntityKey::new(glossary_name, name);
    if set.terms.contains_key(&key) {
        return Ok(());
    }

    let term = Term {
        category_names,
        short_description: row.owned(COL_SHORT_DESCRIPTION),
        long_description: row.owned(COL_LONG_DESCRIPTION),
        status: row.get(COL_STATUS).unwrap_or(DEFAULT_ENTITY_STATUS).to_string(),
        steward: row.owned(COL_STEWARD),
        abbreviation: row.owned(COL_ABBREVIATION),
        examples: row.list(COL_EXAMPLES),
        ..Term::new(glossary_name, name)
    };
    debug!(term = %key, "Registered term");
    set.terms.insert(key, term);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parser() -> CsvParser {
        CsvParser::from_config(&RelationshipsConfig::default())
    }

    #[test]
    fn test_short_rows_are_padded() {
        let csv = "type,glossary_name,name,category_names\nglossary,Finance\n";
        let set = parser().parse_str(csv).unwrap();
        assert!(set.glossaries.contains_key("Finance"));
    }

    #[test]
    fn test_type_is_case_insensitive() {
        let csv = "type,glossary_name,name\nTERM,Finance,Revenue\n";
        let set = parser().parse_str(csv).unwrap();
        assert!(set.terms.contains_key(&EntityKey::new("Finance", "Revenue")));
    }

    #[test]
    fn test_missing_field_reports_line() {
        let csv = "type,glossary_name,name\nglossary,Finance\nterm,Finance,\n";
        let err = parser().parse_str(csv).unwrap_err();
        assert!(matches!(
            err,
            ParseError::MissingField { line: 3, entity: "Term", field: COL_NAME }
        ));
    }

    #[test]
    fn test_dotted_term_name_is_rejected() {
        let csv = "type,glossary_name,name\nglossary,Finance\nterm,Finance,v1.0\n";
        let err = parser().parse_str(csv).unwrap_err();
        assert!(matches!(
            err,
            ParseError::DottedName { line: 3, entity: "Term", field: COL_NAME, ref value }
                if value == "v1.0"
        ));
        assert_eq!(err.to_string(), "Row 3: Term name 'v1.0' must not contain '.'");
    }

    #[test]
    fn test_unidirectional_kind_is_not_reversed() {
        let csv = "type,glossary_name,name,relationship_type,\
                   linked_glossary_name,linked_entity_name\n\
                   relationship,Finance,Revenue,is_a,Finance,Income\n";
        let set = parser().parse_str(csv).unwrap();
        assert_eq!(set.relationships.len(), 1);
        assert!(!set.relationships[0].is_bidirectional);
    }
}
