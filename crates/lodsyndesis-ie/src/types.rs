//! Core data types for LODsyndesisIE requests and responses.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Combination of entity-recognition tools the service runs over the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ErTools {
    #[default]
    #[serde(rename = "WAT")]
    Wat,
    #[serde(rename = "StanfordCoreNLP")]
    StanfordCoreNlp,
    #[serde(rename = "DBpediaSpotlight")]
    DbpediaSpotlight,
    #[serde(rename = "WAT_and_StanfordCoreNLP")]
    WatAndStanfordCoreNlp,
    #[serde(rename = "WAT_and_DBpediaSpotlight")]
    WatAndDbpediaSpotlight,
    #[serde(rename = "StanfordCoreNLP_and_DBpediaSpotlight")]
    StanfordCoreNlpAndDbpediaSpotlight,
    #[serde(rename = "All")]
    All,
}

impl ErTools {
    /// Every supported combination, in the order the service documents them.
    pub const ALL: [ErTools; 7] = [
        ErTools::Wat,
        ErTools::StanfordCoreNlp,
        ErTools::DbpediaSpotlight,
        ErTools::WatAndStanfordCoreNlp,
        ErTools::WatAndDbpediaSpotlight,
        ErTools::StanfordCoreNlpAndDbpediaSpotlight,
        ErTools::All,
    ];

    /// Value sent as the `ERtools` query parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErTools::Wat => "WAT",
            ErTools::StanfordCoreNlp => "StanfordCoreNLP",
            ErTools::DbpediaSpotlight => "DBpediaSpotlight",
            ErTools::WatAndStanfordCoreNlp => "WAT_and_StanfordCoreNLP",
            ErTools::WatAndDbpediaSpotlight => "WAT_and_DBpediaSpotlight",
            ErTools::StanfordCoreNlpAndDbpediaSpotlight => "StanfordCoreNLP_and_DBpediaSpotlight",
            ErTools::All => "All",
        }
    }
}

impl fmt::Display for ErTools {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ErTools {
    type Err = LodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        ErTools::ALL
            .iter()
            .copied()
            .find(|t| t.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| LodError::UnknownErTools(wanted.to_string()))
    }
}

/// How dataset subsets are ranked by `textEntitiesDatasetDiscovery`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MeasurementType {
    /// Subsets whose union holds the most triples for the entities.
    #[default]
    Coverage,
    /// Subsets sharing the most common triples for the entities.
    Commonalities,
}

impl MeasurementType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MeasurementType::Coverage => "coverage",
            MeasurementType::Commonalities => "commonalities",
        }
    }
}

impl fmt::Display for MeasurementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MeasurementType {
    type Err = LodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "coverage" => Ok(MeasurementType::Coverage),
            "commonalities" => Ok(MeasurementType::Commonalities),
            other => Err(LodError::UnknownMeasurement(other.to_string())),
        }
    }
}

/// A remote LODsyndesisIE endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Service {
    GetEntities,
    #[serde(rename = "exportAsRDFa")]
    ExportAsRdfa,
    GetTriplesOfEntities,
    FindRelatedFacts,
    TextEntitiesDatasetDiscovery,
}

impl Service {
    /// Path segment appended to the base URL.
    pub fn path(&self) -> &'static str {
        match self {
            Service::GetEntities => "getEntities",
            Service::ExportAsRdfa => "exportAsRDFa",
            Service::GetTriplesOfEntities => "getTriplesOfEntities",
            Service::FindRelatedFacts => "findRelatedFacts",
            Service::TextEntitiesDatasetDiscovery => "textEntitiesDatasetDiscovery",
        }
    }

    /// Media type sent as both `Accept` and `Content-Type`.
    pub fn media_type(&self) -> &'static str {
        match self {
            Service::GetEntities => "text/tsv",
            Service::ExportAsRdfa => "text/html",
            Service::GetTriplesOfEntities => "application/n-quads",
            Service::FindRelatedFacts => "application/n-triples",
            Service::TextEntitiesDatasetDiscovery => "text/csv",
        }
    }

    /// Whether an HTML body is a legitimate answer from this service.
    pub fn returns_html(&self) -> bool {
        matches!(self, Service::ExportAsRdfa)
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// One recognized entity from the `getEntities` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityRecord {
    pub name: String,
    pub dbpedia_uri: String,
    pub lodsyndesis_uri: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub equivalent_uris: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provenance: Option<String>,
}

/// Errors that can occur while talking to LODsyndesisIE.
#[derive(thiserror::Error, Debug)]
pub enum LodError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("{service} returned status {status}")]
    Status { service: Service, status: u16 },

    #[error("{service} returned an error page: {line}")]
    ErrorPage { service: Service, line: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Unknown ERtools combination: {0}")]
    UnknownErTools(String),

    #[error("Unknown measurement type: {0} (expected coverage or commonalities)")]
    UnknownMeasurement(String),

    #[error("Malformed entity row {row}: expected at least 3 tab-separated columns, got {columns}")]
    MalformedEntities { row: usize, columns: usize },
}

/// Convenience result type.
pub type LodResult<T> = Result<T, LodError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_er_tools_round_trip_names() {
        for tools in ErTools::ALL {
            let parsed: ErTools = tools.as_str().parse().unwrap();
            assert_eq!(parsed, tools);
        }
    }

    #[test]
    fn test_er_tools_case_insensitive() {
        assert_eq!("wat_and_dbpediaspotlight".parse::<ErTools>().unwrap(), ErTools::WatAndDbpediaSpotlight);
        assert_eq!(" all ".parse::<ErTools>().unwrap(), ErTools::All);
    }

    #[test]
    fn test_er_tools_unknown() {
        let err = "Spacy".parse::<ErTools>().unwrap_err();
        assert!(matches!(err, LodError::UnknownErTools(ref s) if s == "Spacy"));
    }

    #[test]
    fn test_er_tools_serde_uses_wire_name() {
        let json = serde_json::to_string(&ErTools::StanfordCoreNlpAndDbpediaSpotlight).unwrap();
        assert_eq!(json, "\"StanfordCoreNLP_and_DBpediaSpotlight\"");
    }

    #[test]
    fn test_measurement_parse() {
        assert_eq!("Coverage".parse::<MeasurementType>().unwrap(), MeasurementType::Coverage);
        assert_eq!(
            "commonalities".parse::<MeasurementType>().unwrap(),
            MeasurementType::Commonalities
        );
        assert!("overlap".parse::<MeasurementType>().is_err());
    }

    #[test]
    fn test_service_media_types() {
        assert_eq!(Service::GetEntities.media_type(), "text/tsv");
        assert_eq!(Service::ExportAsRdfa.media_type(), "text/html");
        assert_eq!(Service::GetTriplesOfEntities.media_type(), "application/n-quads");
        assert_eq!(Service::FindRelatedFacts.media_type(), "application/n-triples");
        assert_eq!(Service::TextEntitiesDatasetDiscovery.media_type(), "text/csv");
        assert!(Service::ExportAsRdfa.returns_html());
        assert!(!Service::FindRelatedFacts.returns_html());
    }

    #[test]
    fn test_error_display() {
        let err = LodError::Status {
            service: Service::FindRelatedFacts,
            status: 503,
        };
        assert_eq!(err.to_string(), "findRelatedFacts returned status 503");
    }
}
