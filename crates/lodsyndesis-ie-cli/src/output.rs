//! Console output: human-readable by default, JSON with `--json`.
//!
//! Headings and status lines go to stderr so stdout carries only results.

use std::sync::atomic::{AtomicBool, Ordering};

use serde_json::{json, Value};

use lodsyndesis_ie::render_entities;

use crate::commands::Outcome;

static JSON: AtomicBool = AtomicBool::new(false);

/// Select the output format for the rest of the process.
pub fn set_json(enabled: bool) {
    JSON.store(enabled, Ordering::Relaxed);
}

pub fn is_json() -> bool {
    JSON.load(Ordering::Relaxed)
}

pub fn print_json(value: &Value) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{s}"),
        Err(e) => eprintln!("  Error: could not encode JSON: {e}"),
    }
}

/// JSON form of an outcome: entity records as an array, anything else as
/// `{service, lines}`.
pub fn to_json(outcome: &Outcome) -> Value {
    match outcome {
        Outcome::Entities { entities } => json!(entities),
        Outcome::Text { service, body, .. } => json!({
            "service": service,
            "lines": body.lines().collect::<Vec<_>>(),
        }),
    }
}

/// Print an outcome in the selected format.
pub fn emit(outcome: &Outcome) {
    if is_json() {
        print_json(&to_json(outcome));
        return;
    }

    match outcome {
        Outcome::Entities { entities } => {
            if entities.is_empty() {
                eprintln!("  No entities recognized.");
                return;
            }
            print!("{}", render_entities(entities));
        }
        Outcome::Text { heading, body, .. } => {
            eprintln!();
            eprintln!("{heading}");
            eprintln!();
            print!("{body}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lodsyndesis_ie::{EntityRecord, Service};

    #[test]
    fn test_text_to_json_lines() {
        let outcome = Outcome::Text {
            service: Service::TextEntitiesDatasetDiscovery,
            heading: String::new(),
            body: "Datasets,Triples\nDBpedia,12\n".to_string(),
        };
        let v = to_json(&outcome);
        assert_eq!(v["service"], "textEntitiesDatasetDiscovery");
        assert_eq!(v["lines"], json!(["Datasets,Triples", "DBpedia,12"]));
    }

    #[test]
    fn test_entities_to_json_array() {
        let outcome = Outcome::Entities {
            entities: vec![EntityRecord {
                name: "Crete".to_string(),
                dbpedia_uri: "http://dbpedia.org/resource/Crete".to_string(),
                lodsyndesis_uri: "http://lod/Crete".to_string(),
                equivalent_uris: None,
                provenance: None,
            }],
        };
        let v = to_json(&outcome);
        assert_eq!(v[0]["name"], "Crete");
        assert!(v[0].get("provenance").is_none());
    }
}
