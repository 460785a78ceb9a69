//! `lodsyndesis-ie demo` — a guided tour of every service.

use anyhow::Result;

use lodsyndesis_ie::{
    AnnotateQuery, DatasetDiscoveryQuery, EntitiesQuery, ErTools, LodSyndesisClient,
    MeasurementType, Service,
};

use crate::commands::{execute, Request};
use crate::output;

/// Biographical paragraph used for entities, RDFa and related facts.
pub const KAZANTZAKIS: &str = "Nikos Kazantzakis was born in Heraklion, Crete. Widely considered a giant of modern Greek \
literature, he was nominated for the Nobel Prize in Literature in nine different years. \
Kazantzakis' novels included Zorba the Greek (published 1946 as Life and Times of Alexis Zorbas), \
Christ Recrucified (1948), Captain Michalis (1950, translated Freedom and Death), and The Last \
Temptation of Christ (1955). His fame spread in the English-speaking world due to cinematic \
adaptations of Zorba the Greek (1964) and The Last Temptation of Christ (1988). He translated also \
a number of notable works into Modern Greek, such as the Divine Comedy, Thus Spoke Zarathustra and \
the Iliad.  Late in 1957, even though suffering from leukemia, he set out on one last trip to China \
and Japan. Falling ill on his return flight, he was transferred to Freiburg, Germany, where he died.";

/// Short sentence used for entity triples and dataset discovery.
pub const HERAKLION: &str = "Heraklion is located in Crete";

/// The demo requests, in the order they are run.
pub fn requests() -> Vec<Request> {
    vec![
        Request::Entities {
            query: EntitiesQuery::new(KAZANTZAKIS, ErTools::Wat)
                .with_equivalent_uris(true)
                .with_provenance(true),
            raw: false,
        },
        Request::Annotate {
            service: Service::ExportAsRdfa,
            query: AnnotateQuery::new(KAZANTZAKIS, ErTools::WatAndDbpediaSpotlight),
        },
        Request::Annotate {
            service: Service::FindRelatedFacts,
            query: AnnotateQuery::new(KAZANTZAKIS, ErTools::All),
        },
        Request::Annotate {
            service: Service::GetTriplesOfEntities,
            query: AnnotateQuery::new(HERAKLION, ErTools::WatAndDbpediaSpotlight),
        },
        Request::Datasets {
            query: DatasetDiscoveryQuery::new(HERAKLION, ErTools::WatAndDbpediaSpotlight)
                .with_subset_size(3)
                .with_top_k(10)
                .with_measurement(MeasurementType::Coverage),
        },
    ]
}

/// Run the demo. A failing step is reported and the tour moves on.
pub async fn run(client: &LodSyndesisClient) -> Result<()> {
    let mut failures = 0usize;

    for request in requests() {
        match execute(client, &request).await {
            Ok(outcome) => output::emit(&outcome),
            Err(e) => {
                failures += 1;
                tracing::error!("demo step failed: {e:#}");
                eprintln!("  Error: {e:#}");
            }
        }
    }

    if failures > 0 {
        anyhow::bail!("{failures} demo step(s) failed");
    }
    Ok(())
}
