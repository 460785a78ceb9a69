//! LODsyndesisIE — client library for entity recognition, RDFa export, related
//! facts, and dataset discovery over free text.

pub mod client;
pub mod format;
pub mod query;
pub mod types;

pub use client::{ClientConfig, LodSyndesisClient, DEFAULT_TIMEOUT_MS};
pub use format::{join_entities, join_space, parse_entities, render_entities, tokenize_lines};
pub use query::{AnnotateQuery, DatasetDiscoveryQuery, EntitiesQuery, DEFAULT_BASE_URL};
pub use types::*;
