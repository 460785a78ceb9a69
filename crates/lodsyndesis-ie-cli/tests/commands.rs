//! Command dispatch tests against a mocked LODsyndesisIE service.

use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use lodsyndesis_ie::{
    AnnotateQuery, ClientConfig, EntitiesQuery, ErTools, LodSyndesisClient, Service,
};
use lodsyndesis_ie_cli::{demo, execute, output, Outcome, Request};

fn client_for(server: &MockServer) -> LodSyndesisClient {
    LodSyndesisClient::with_config(ClientConfig {
        base_url: server.uri(),
        timeout_ms: 5_000,
    })
    .unwrap()
}

#[tokio::test]
async fn test_entities_request_yields_records() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/getEntities"))
        .and(query_param("provenance", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            "Entity\tDBpedia URI\tLODsyndesis URI\tProvenance\n\
             Crete\thttp://dbpedia.org/resource/Crete\thttp://lod/Crete\tDBpedia\n",
        ))
        .mount(&server)
        .await;

    let request = Request::Entities {
        query: EntitiesQuery::new("Crete", ErTools::Wat).with_provenance(true),
        raw: false,
    };
    let outcome = execute(&client_for(&server), &request).await.unwrap();
    match outcome {
        Outcome::Entities { entities } => {
            assert_eq!(entities.len(), 1);
            assert_eq!(entities[0].provenance.as_deref(), Some("DBpedia"));
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
}

#[tokio::test]
async fn test_annotate_request_carries_heading() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/getTriplesOfEntities"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<http://a> <http://b> \"c\" <http://g> .\n"))
        .mount(&server)
        .await;

    let request = Request::Annotate {
        service: Service::GetTriplesOfEntities,
        query: AnnotateQuery::new("Crete", ErTools::Wat),
    };
    let outcome = execute(&client_for(&server), &request).await.unwrap();
    let json = output::to_json(&outcome);
    assert_eq!(json["service"], "getTriplesOfEntities");
    assert_eq!(json["lines"][0], "<http://a> <http://b> \"c\" <http://g>");
    match outcome {
        Outcome::Text { heading, .. } => {
            assert_eq!(heading, "The triples of the recognized entities");
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
}

#[tokio::test]
async fn test_annotate_rejects_non_annotation_service() {
    let server = MockServer::start().await;
    let request = Request::Annotate {
        service: Service::GetEntities,
        query: AnnotateQuery::new("Crete", ErTools::Wat),
    };
    assert!(execute(&client_for(&server), &request).await.is_err());
}

#[tokio::test]
async fn test_demo_reports_failed_steps() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .expect(5)
        .mount(&server)
        .await;

    let err = demo::run(&client_for(&server)).await.unwrap_err();
    assert_eq!(err.to_string(), "5 demo step(s) failed");
}
