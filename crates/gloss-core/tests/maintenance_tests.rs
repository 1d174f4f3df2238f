mod common;

use gloss_core::catalog::GlossaryHeader;
use gloss_core::cleanup::{delete_glossaries, select_glossaries, DeletionOutcome};
use gloss_core::export::export_glossaries;
use gloss_core::model::GlossarySet;
use gloss_core::{CsvParser, Publisher};

use common::{FakeCatalog, CATALOG_CSV};

async fn populated() -> FakeCatalog {
    let set: GlossarySet = CsvParser::new(["synonym"]).parse_str(CATALOG_CSV).unwrap();
    let publisher = Publisher::new(FakeCatalog::new());
    publisher.publish(&set, false).await.unwrap();
    publisher.into_catalog()
}

#[tokio::test]
async fn test_export_lists_contents() {
    let catalog = populated().await;
    let exports = export_glossaries(&catalog).await.unwrap();

    let names: Vec<_> = exports.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, ["Finance", "Sales"]);

    let finance = &exports[0];
    assert_eq!(finance.guid, catalog.glossary_guid("Finance"));
    let categories: Vec<_> = finance.categories.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(categories, ["Accounting", "Ledgers"]);
    assert_eq!(finance.terms.len(), 3);
    assert_eq!(exports[1].terms[0].name, "Deal");
}

#[tokio::test]
async fn test_select_glossaries() {
    let catalog = populated().await;

    let all = select_glossaries(&catalog, &[]).await.unwrap();
    assert_eq!(all.len(), 2);

    let named = select_glossaries(&catalog, &["Sales".to_string(), "Missing".to_string()])
        .await
        .unwrap();
    assert_eq!(named.len(), 1);
    assert_eq!(named[0].name, "Sales");
}

#[tokio::test]
async fn test_delete_outcomes() {
    let catalog = populated().await;
    let finance = catalog.glossary_guid("Finance").unwrap();
    let sales = catalog.glossary_guid("Sales").unwrap();
    catalog.state().undeletable.insert(sales.clone());

    let header = |name: &str, guid: Option<&str>| GlossaryHeader {
        guid: guid.map(str::to_string),
        name: name.to_string(),
        short_description: None,
    };
    let targets = [
        header("Finance", Some(finance.as_str())),
        header("Sales", Some(sales.as_str())),
        header("Stale", Some("glossary-404")),
        header("Anonymous", None),
    ];

    let results = delete_glossaries(&catalog, &targets).await;
    let outcomes: Vec<_> = results.iter().map(|d| &d.outcome).collect();

    assert_eq!(outcomes[0], &DeletionOutcome::Deleted);
    assert!(matches!(outcomes[1], DeletionOutcome::Failed(msg) if msg.contains("500")));
    assert_eq!(outcomes[2], &DeletionOutcome::NotFound);
    assert_eq!(outcomes[3], &DeletionOutcome::MissingGuid);

    assert!(outcomes[0].is_success());
    assert!(outcomes[2].is_success());
    assert!(!outcomes[1].is_success());

    // a failure does not stop the rest, and nothing is sent without a GUID
    assert_eq!(catalog.count("delete_glossary:"), 3);
    assert!(catalog.glossary_guid("Finance").is_none());
    assert!(catalog.glossary_guid("Sales").is_some());
}
