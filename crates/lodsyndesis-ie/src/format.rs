//! Response parsing and console formatting.
//!
//! Service bodies are treated as lines of whitespace-separated tokens.
//! N-Triples/N-Quads statement terminators (standalone `.`) are dropped,
//! and the tokens are re-joined for display.

use crate::types::{EntityRecord, LodError, LodResult};

/// Statement terminator in N-Triples and N-Quads.
const STATEMENT_END: &str = ".";

/// Split a response body into per-line token lists.
pub fn tokenize_lines(body: &str) -> Vec<Vec<String>> {
    body.lines()
        .map(|line| {
            line.split_whitespace()
                .filter(|tok| *tok != STATEMENT_END)
                .map(str::to_string)
                .collect::<Vec<_>>()
        })
        .filter(|tokens| !tokens.is_empty())
        .collect()
}

/// Join each line's tokens with single spaces, one line per output line.
pub fn join_space(lines: &[Vec<String>]) -> String {
    let mut out = String::new();
    for tokens in lines {
        out.push_str(&tokens.join(" "));
        out.push('\n');
    }
    out
}

/// Join entity-table tokens so that URI columns end up tab-separated.
///
/// A token that starts with `http` is followed by a tab, and the separator
/// in front of an `http` token is a tab as well. Everything else is joined
/// with a space, which keeps multi-word entity names in one column.
pub fn join_entities(lines: &[Vec<String>]) -> String {
    let mut out = String::new();
    for tokens in lines {
        for (i, tok) in tokens.iter().enumerate() {
            out.push_str(tok);
            match tokens.get(i + 1) {
                None => out.push('\n'),
                Some(next) if is_uri(tok) || is_uri(next) => out.push('\t'),
                Some(_) => out.push(' '),
            }
        }
    }
    out
}

fn is_uri(token: &str) -> bool {
    token.starts_with("http")
}

/// True when a body line is the start of an HTML error page.
pub fn is_error_page(first_line: &str) -> bool {
    first_line
        .trim_start()
        .get(..9)
        .is_some_and(|head| head.eq_ignore_ascii_case("<!DOCTYPE"))
}

/// Parse the tab-separated `getEntities` table (header line first).
pub fn parse_entities(table: &str) -> LodResult<Vec<EntityRecord>> {
    let mut lines = table.lines();
    let header = match lines.next() {
        Some(h) => h,
        None => return Ok(Vec::new()),
    };
    let fourth_is_equivalent = header.contains("Equivalent");

    let mut records = Vec::new();
    for (idx, row) in lines.enumerate() {
        if row.trim().is_empty() {
            continue;
        }
        let cols: Vec<&str> = row.split('\t').map(str::trim).collect();
        if cols.len() < 3 {
            return Err(LodError::MalformedEntities {
                row: idx + 1,
                columns: cols.len(),
            });
        }

        let mut record = EntityRecord {
            name: cols[0].to_string(),
            dbpedia_uri: cols[1].to_string(),
            lodsyndesis_uri: cols[2].to_string(),
            equivalent_uris: None,
            provenance: None,
        };
        if let Some(fourth) = cols.get(3) {
            if fourth_is_equivalent {
                record.equivalent_uris = Some(fourth.to_string());
            } else {
                record.provenance = Some(fourth.to_string());
            }
        }
        if let Some(fifth) = cols.get(4) {
            record.provenance = Some(fifth.to_string());
        }
        records.push(record);
    }
    Ok(records)
}

/// Render entity records in the human-readable console layout.
pub fn render_entities(records: &[EntityRecord]) -> String {
    let mut out = String::from("\nThe entities of the given text and their data\n\n");
    for r in records {
        let name = &r.name;
        out.push_str(&format!("Recognized Entity: {name}\n"));
        out.push_str(&format!("DBpedia URI of {name}: {}\n", r.dbpedia_uri));
        out.push_str(&format!("LODsyndesis URI of {name}: {}\n", r.lodsyndesis_uri));
        if let Some(eq) = &r.equivalent_uris {
            out.push_str(&format!("Equivalent URIs of {name}: {eq}\n"));
        }
        if let Some(prov) = &r.provenance {
            out.push_str(&format!("Provenance of {name}: {prov}\n"));
        }
        out.push('\n');
    }
    out
}
