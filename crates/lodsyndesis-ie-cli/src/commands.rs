//! Service calls shared by the subcommands, the demo and the REPL.

use anyhow::Result;

use lodsyndesis_ie::{
    AnnotateQuery, DatasetDiscoveryQuery, EntitiesQuery, EntityRecord, LodSyndesisClient,
    MeasurementType, Service,
};

/// One call to a LODsyndesisIE service.
#[derive(Debug, Clone)]
pub enum Request {
    /// `getEntities`; `raw` keeps the tab-separated table instead of records.
    Entities { query: EntitiesQuery, raw: bool },
    /// `exportAsRDFa`, `getTriplesOfEntities` or `findRelatedFacts`.
    Annotate { service: Service, query: AnnotateQuery },
    Datasets { query: DatasetDiscoveryQuery },
}

/// What a service returned, ready for display.
#[derive(Debug, Clone)]
pub enum Outcome {
    Entities { entities: Vec<EntityRecord> },
    Text {
        service: Service,
        heading: String,
        body: String,
    },
}

/// Run one request against the service.
pub async fn execute(client: &LodSyndesisClient, request: &Request) -> Result<Outcome> {
    match request {
        Request::Entities { query, raw: false } => {
            let entities = client.entities(query).await?;
            Ok(Outcome::Entities { entities })
        }
        Request::Entities { query, raw: true } => {
            let body = client.get_entities_of_text(query).await?;
            Ok(Outcome::Text {
                service: Service::GetEntities,
                heading: "The entities of the given text and their data".to_string(),
                body,
            })
        }
        Request::Annotate { service, query } => {
            let body = match service {
                Service::ExportAsRdfa => client.export_as_rdfa(query).await?,
                Service::GetTriplesOfEntities => client.get_triples_of_entities(query).await?,
                Service::FindRelatedFacts => client.find_related_facts(query).await?,
                other => anyhow::bail!("{other} is not an annotation service"),
            };
            Ok(Outcome::Text {
                service: *service,
                heading: annotate_heading(*service).to_string(),
                body,
            })
        }
        Request::Datasets { query } => {
            let body = client.text_entities_dataset_discovery(query).await?;
            Ok(Outcome::Text {
                service: Service::TextEntitiesDatasetDiscovery,
                heading: datasets_heading(query.subset_size, query.top_k, query.measurement),
                body,
            })
        }
    }
}

fn annotate_heading(service: Service) -> &'static str {
    match service {
        Service::ExportAsRdfa => "The annotated text in HTML+RDFa format",
        Service::GetTriplesOfEntities => "The triples of the recognized entities",
        _ => "The related facts of the given text",
    }
}

/// Heading such as "The top-10 triads of datasets containing the most triples ...".
pub fn datasets_heading(subset_size: u32, top_k: u32, measurement: MeasurementType) -> String {
    let subsets = match subset_size {
        1 => "datasets".to_string(),
        2 => "pairs of datasets".to_string(),
        3 => "triads of datasets".to_string(),
        4 => "quads of datasets".to_string(),
        n => format!("{n}-subsets of datasets"),
    };
    let what = match measurement {
        MeasurementType::Coverage => "the most triples",
        MeasurementType::Commonalities => "the most common triples",
    };
    format!("The top-{top_k} {subsets} containing {what} for the recognized entities")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_datasets_heading() {
        assert_eq!(
            datasets_heading(3, 10, MeasurementType::Coverage),
            "The top-10 triads of datasets containing the most triples for the recognized entities"
        );
        assert_eq!(
            datasets_heading(1, 5, MeasurementType::Commonalities),
            "The top-5 datasets containing the most common triples for the recognized entities"
        );
        assert!(datasets_heading(5, 1, MeasurementType::Coverage).contains("5-subsets"));
    }

    #[test]
    fn test_annotate_headings() {
        assert_eq!(
            annotate_heading(Service::ExportAsRdfa),
            "The annotated text in HTML+RDFa format"
        );
        assert_eq!(
            annotate_heading(Service::FindRelatedFacts),
            "The related facts of the given text"
        );
    }
}
