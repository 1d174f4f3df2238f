mod common;

use gloss_core::config::RelationshipsConfig;
use gloss_core::graph::{self, GraphBuilder, GraphError};
use gloss_core::model::{EntityKey, QualifiedName, RelationshipType, TermMap};
use gloss_core::CsvParser;

use common::{CATALOG_CSV, FINANCE_CSV};

fn build(csv: &str) -> (GraphBuilder, usize) {
    let set = CsvParser::from_config(&RelationshipsConfig::default())
        .parse_str(csv)
        .unwrap();
    let mut builder = GraphBuilder::new(set.terms);
    let added = builder.apply(&set.relationships).unwrap();
    (builder, added)
}

fn edges(terms: &TermMap, glossary: &str, name: &str, kind: RelationshipType) -> Vec<String> {
    terms[&EntityKey::new(glossary, name)].relations.get(kind).to_vec()
}

#[test]
fn test_finance_synonym_is_symmetric() {
    let (builder, added) = build(FINANCE_CSV);
    assert_eq!(added, 2);

    let terms = builder.terms();
    assert_eq!(
        edges(terms, "Finance", "Revenue", RelationshipType::Synonym),
        ["Finance.Income@glossary"]
    );
    assert_eq!(
        edges(terms, "Finance", "Income", RelationshipType::Synonym),
        ["Finance.Revenue@glossary"]
    );
    assert!(builder.validate_all().is_empty());
}

#[test]
fn test_bidirectional_kinds_are_symmetric() {
    let (builder, _) = build(CATALOG_CSV);
    let terms = builder.terms();

    for (key, term) in terms {
        for (kind, targets) in term.relations.iter() {
            if !kind.is_bidirectional_by_default() {
                continue;
            }
            let own = QualifiedName::term(&key.glossary, &key.name).to_string();
            for target in targets {
                let target_key = QualifiedName::parse(target).unwrap().key();
                assert!(
                    terms[&target_key].relations.get(kind).contains(&own),
                    "{kind} edge {key} -> {target} has no reverse"
                );
            }
        }
    }

    // preferred_term stays one-way
    assert_eq!(
        edges(terms, "Finance", "Turnover", RelationshipType::PreferredTerm),
        ["Finance.Revenue@glossary"]
    );
    assert!(edges(terms, "Finance", "Revenue", RelationshipType::PreferredTerm).is_empty());
}

#[test]
fn test_cross_glossary_edges() {
    let (builder, added) = build(CATALOG_CSV);
    assert_eq!(added, 5);
    assert_eq!(
        edges(builder.terms(), "Finance", "Revenue", RelationshipType::RelatedTerm),
        ["Sales.Deal@glossary"]
    );
}

#[test]
fn test_reapplying_adds_nothing() {
    let set = CsvParser::from_config(&RelationshipsConfig::default())
        .parse_str(CATALOG_CSV)
        .unwrap();
    let mut builder = GraphBuilder::new(set.terms);
    builder.apply(&set.relationships).unwrap();
    let before = builder.terms().clone();

    assert_eq!(builder.apply(&set.relationships).unwrap(), 0);
    assert_eq!(builder.terms(), &before);
}

#[test]
fn test_dangling_target_warns_once() {
    let csv = "type,glossary_name,name,relationship_type,linked_glossary_name,linked_entity_name\n\
               term,Finance,Revenue\n\
               relationship,Finance,Revenue,is_a,Finance,Metric\n\
               relationship,Finance,Revenue,is_a,Finance,Metric\n";
    let (builder, added) = build(csv);
    assert_eq!(added, 1);

    let warnings = builder.validate_all();
    assert_eq!(warnings.len(), 1);
    assert!(warnings
        .contains("Relationship target not found: Finance.Revenue -> Finance.Metric@glossary"));
}

#[test]
fn test_dangling_source_is_fatal() {
    let csv = "type,glossary_name,name,relationship_type,linked_glossary_name,linked_entity_name\n\
               term,Finance,Income\n\
               relationship,Finance,Revenue,synonym,Finance,Income\n";
    let set = CsvParser::from_config(&RelationshipsConfig::default())
        .parse_str(csv)
        .unwrap();

    let err = graph::apply(set.terms, &set.relationships).unwrap_err();
    assert!(matches!(err, GraphError::MissingSource { ref name, .. } if name == "Revenue"));
    assert_eq!(err.to_string(), "Source term not found: Finance.Revenue");
}
