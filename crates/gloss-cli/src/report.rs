//! Plain-text rendering of command results.

use chrono::Local;
use gloss_core::catalog::{GlossaryHeader, PlannedCall};
use gloss_core::cleanup::{Deletion, DeletionOutcome};
use gloss_core::export::GlossaryExport;
use gloss_core::publish::PublishReport;
use gloss_core::{GlossarySet, ImportSummary, RunMode};

const RULE_WIDTH: usize = 80;

fn rule() -> String {
    "=".repeat(RULE_WIDTH)
}

fn heading(title: &str) {
    println!("\n{}", rule());
    println!("{title}");
    println!("{}", rule());
}

pub fn print_import(summary: &ImportSummary, base_url: &str) {
    print_validation(summary);

    match summary.mode {
        RunMode::ValidateOnly => println!("\nValidation completed successfully"),
        RunMode::DryRun => {
            heading("DRY-RUN MODE: REST API calls that would be executed");
            print_planned_calls(&summary.planned_calls, base_url);
            println!("\nDry-run completed successfully");
        }
        RunMode::Execute => {
            heading("IMPORT TO ATLAS");
            if let Some(report) = &summary.report {
                print_publish_report(report);
            }
            println!("\nGlossary import completed successfully!");
        }
    }

    let started = summary.started_at.with_timezone(&Local);
    let elapsed = summary.finished_at - summary.started_at;
    println!("Started {}", started.format("%Y-%m-%d %H:%M:%S"));
    println!("Finished in {}.{:03}s", elapsed.num_seconds(), elapsed.num_milliseconds() % 1000);
}

fn print_validation(summary: &ImportSummary) {
    let set = &summary.set;
    heading("VALIDATION REPORT");

    println!("\nGLOSSARIES ({}):", set.glossaries.len());
    for name in set.glossaries.keys() {
        println!("  {name}");
    }

    println!("\nCATEGORIES ({}):", set.categories.len());
    for (key, category) in &set.categories {
        match &category.parent_category_name {
            Some(parent) => println!("  {key} (parent: {parent})"),
            None => println!("  {key}"),
        }
        if let Some(description) = &category.short_description {
            println!("    - {description}");
        }
    }

    print_terms(set);

    println!("\nSUMMARY:");
    println!("  Glossaries:    {}", summary.counts.glossaries);
    println!("  Categories:    {}", summary.counts.categories);
    println!("  Terms:         {}", summary.counts.terms);
    println!("  Relationships: {}", summary.counts.relationships);
    if summary.skipped_rows > 0 {
        println!("  Skipped rows:  {}", summary.skipped_rows);
    }

    if !summary.warnings.is_empty() {
        println!("\nWARNINGS ({}):", summary.warnings.len());
        for warning in &summary.warnings {
            println!("  - {warning}");
        }
    }
}

fn print_terms(set: &GlossarySet) {
    println!("\nTERMS ({}):", set.terms.len());
    for (key, term) in &set.terms {
        println!("  {key}");

        let details = [
            ("Abbreviation", term.abbreviation.clone()),
            ("Description", term.short_description.clone()),
            ("Details", term.long_description.clone()),
            ("Steward", term.steward.clone()),
            ("Status", Some(term.status.clone())),
            ("Examples", joined(&term.examples)),
            ("Categories", joined(&term.category_names)),
            ("GUID", term.guid.clone()),
        ];
        for (label, value) in details {
            if let Some(value) = value {
                println!("    {label}: {value}");
            }
        }

        if !term.relations.is_empty() {
            println!("    Relationships:");
            for (kind, targets) in term.relations.iter() {
                for target in targets {
                    println!("      {}: {}", kind.display_name(), target);
                }
            }
        }
    }
}

fn joined(items: &[String]) -> Option<String> {
    (!items.is_empty()).then(|| items.join(", "))
}

fn print_planned_calls(calls: &[PlannedCall], base_url: &str) {
    for call in calls {
        println!("\n{} {}{}", call.method, base_url.trim_end_matches('/'), call.path);
        if !call.payload.is_null() {
            let body = serde_json::to_string_pretty(&call.payload).unwrap_or_default();
            println!("{body}");
        }
    }
    println!("\n{} calls", calls.len());
}

fn print_publish_report(report: &PublishReport) {
    let passes = [
        ("Glossaries", report.glossaries),
        ("Categories", report.categories),
        ("Terms", report.terms),
    ];
    for (label, stats) in passes {
        println!(
            "  {label}: {} created, {} already existed, {} skipped",
            stats.created, stats.resolved, stats.skipped
        );
    }
    println!(
        "  Relationships: {} edges on {} terms, {} terms skipped",
        report.relationships.edges,
        report.relationships.updated_terms,
        report.relationships.skipped_terms
    );

    if !report.warnings.is_empty() {
        println!("\nWARNINGS ({}):", report.warnings.len());
        for warning in &report.warnings {
            println!("  - {warning}");
        }
    }
}

pub fn print_exports(exports: &[GlossaryExport]) {
    if exports.is_empty() {
        println!("No glossaries found in Atlas");
        return;
    }

    heading(&format!("GLOSSARIES ({})", exports.len()));
    for glossary in exports {
        println!("\nGUID: {}", glossary.guid.as_deref().unwrap_or("N/A"));
        println!("Name: {}", glossary.name);
        if let Some(description) = &glossary.short_description {
            println!("Description: {description}");
        }
        if !glossary.categories.is_empty() {
            println!("  Categories ({}):", glossary.categories.len());
            for category in &glossary.categories {
                println!("    - {}", category.name);
            }
        }
        if !glossary.terms.is_empty() {
            println!("  Terms ({}):", glossary.terms.len());
            for term in &glossary.terms {
                println!("    - {}", term.name);
            }
        }
    }
    println!("\n{}", rule());
}

pub fn print_cleanup_targets(targets: &[GlossaryHeader]) {
    let noun = if targets.len() == 1 { "glossary" } else { "glossaries" };
    println!("\nFound {} {} to delete:\n", targets.len(), noun);
    for glossary in targets {
        println!(
            "  {} (GUID: {})",
            glossary.name,
            glossary.guid.as_deref().unwrap_or("Unknown")
        );
    }
}

pub fn print_deletions(deletions: &[Deletion]) {
    println!();
    for deletion in deletions {
        let name = &deletion.glossary.name;
        match &deletion.outcome {
            DeletionOutcome::Deleted => println!("Deleted '{name}'"),
            DeletionOutcome::NotFound => println!("'{name}' not found (already deleted?)"),
            DeletionOutcome::Failed(message) => println!("Failed to delete '{name}': {message}"),
            DeletionOutcome::MissingGuid => println!("Cannot delete '{name}': no GUID found"),
        }
    }
}
