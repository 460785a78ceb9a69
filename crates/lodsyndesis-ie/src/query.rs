//! Request construction for the LODsyndesisIE endpoints.

use url::Url;

use crate::types::{ErTools, LodError, LodResult, MeasurementType, Service};

/// Public LODsyndesisIE REST endpoint.
pub const DEFAULT_BASE_URL: &str = "https://demos.isl.ics.forth.gr/LODsyndesisIE/rest-api";

/// Largest dataset subset the discovery service ranks (pairs, triads, ...).
pub const MAX_SUBSET_SIZE: u32 = 5;

/// Parameters for `getEntities`.
#[derive(Debug, Clone)]
pub struct EntitiesQuery {
    pub text: String,
    pub er_tools: ErTools,
    pub equivalent_uris: bool,
    pub provenance: bool,
}

impl EntitiesQuery {
    pub fn new(text: impl Into<String>, er_tools: ErTools) -> Self {
        Self {
            text: text.into(),
            er_tools,
            equivalent_uris: false,
            provenance: false,
        }
    }

    pub fn with_equivalent_uris(mut self, yes: bool) -> Self {
        self.equivalent_uris = yes;
        self
    }

    pub fn with_provenance(mut self, yes: bool) -> Self {
        self.provenance = yes;
        self
    }
}

/// Parameters shared by `exportAsRDFa`, `getTriplesOfEntities` and
/// `findRelatedFacts`.
#[derive(Debug, Clone)]
pub struct AnnotateQuery {
    pub text: String,
    pub er_tools: ErTools,
}

impl AnnotateQuery {
    pub fn new(text: impl Into<String>, er_tools: ErTools) -> Self {
        Self {
            text: text.into(),
            er_tools,
        }
    }
}

/// Parameters for `textEntitiesDatasetDiscovery`.
#[derive(Debug, Clone)]
pub struct DatasetDiscoveryQuery {
    pub text: String,
    pub er_tools: ErTools,
    /// 1..=5; 2 ranks pairs of datasets, 3 triads, and so on.
    pub subset_size: u32,
    pub top_k: u32,
    pub measurement: MeasurementType,
}

impl DatasetDiscoveryQuery {
    pub fn new(text: impl Into<String>, er_tools: ErTools) -> Self {
        Self {
            text: text.into(),
            er_tools,
            subset_size: 1,
            top_k: 10,
            measurement: MeasurementType::Coverage,
        }
    }

    pub fn with_subset_size(mut self, subset_size: u32) -> Self {
        self.subset_size = subset_size;
        self
    }

    pub fn with_top_k(mut self, top_k: u32) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn with_measurement(mut self, measurement: MeasurementType) -> Self {
        self.measurement = measurement;
        self
    }
}

/// Parse and normalize a base URL so that service paths can be appended.
pub fn parse_base_url(base: &str) -> LodResult<Url> {
    let trimmed = base.trim().trim_end_matches('/');
    let url = Url::parse(trimmed)?;
    if url.cannot_be_a_base() {
        return Err(LodError::InvalidInput(format!(
            "base URL cannot carry a path: {base}"
        )));
    }
    Ok(url)
}

fn service_url(base: &Url, service: Service) -> Url {
    let mut url = base.clone();
    // parse_base_url rejects cannot-be-a-base URLs, so segments are always available.
    if let Ok(mut segments) = url.path_segments_mut() {
        segments.pop_if_empty().push(service.path());
    }
    url
}

fn check_text(text: &str) -> LodResult<()> {
    if text.trim().is_empty() {
        return Err(LodError::InvalidInput("text must not be empty".to_string()));
    }
    Ok(())
}

fn bool_param(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}

/// Build the `getEntities` URL.
pub fn entities_url(base: &Url, q: &EntitiesQuery) -> LodResult<Url> {
    check_text(&q.text)?;
    let mut url = service_url(base, Service::GetEntities);
    url.query_pairs_mut()
        .append_pair("text", &q.text)
        .append_pair("ERtools", q.er_tools.as_str())
        .append_pair("equivalentURIs", bool_param(q.equivalent_uris))
        .append_pair("provenance", bool_param(q.provenance));
    Ok(url)
}

/// Build the URL for one of the text + ERtools services.
pub fn annotate_url(base: &Url, service: Service, q: &AnnotateQuery) -> LodResult<Url> {
    if !matches!(
        service,
        Service::ExportAsRdfa | Service::GetTriplesOfEntities | Service::FindRelatedFacts
    ) {
        return Err(LodError::InvalidInput(format!(
            "{service} does not take a plain text + ERtools query"
        )));
    }
    check_text(&q.text)?;
    let mut url = service_url(base, service);
    url.query_pairs_mut()
        .append_pair("text", &q.text)
        .append_pair("ERtools", q.er_tools.as_str());
    Ok(url)
}

/// Build the `textEntitiesDatasetDiscovery` URL.
pub fn dataset_discovery_url(base: &Url, q: &DatasetDiscoveryQuery) -> LodResult<Url> {
    check_text(&q.text)?;
    if !(1..=MAX_SUBSET_SIZE).contains(&q.subset_size) {
        return Err(LodError::InvalidInput(format!(
            "subsetSize must be between 1 and {MAX_SUBSET_SIZE}, got {}",
            q.subset_size
        )));
    }
    if q.top_k == 0 {
        return Err(LodError::InvalidInput("topK must be greater than 0".to_string()));
    }
    let mut url = service_url(base, Service::TextEntitiesDatasetDiscovery);
    url.query_pairs_mut()
        .append_pair("text", &q.text)
        .append_pair("ERtools", q.er_tools.as_str())
        .append_pair("subsetSize", &q.subset_size.to_string())
        .append_pair("topK", &q.top_k.to_string())
        .append_pair("measurementType", q.measurement.as_str());
    Ok(url)
}
