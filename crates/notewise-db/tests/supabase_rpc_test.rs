//! Integration tests for the Supabase RPC retrieval contract.

use notewise_db::{Embedding, Error, RetrievalBackend, RetrievalParams, SupabaseConfig, SupabaseRpc};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const RPC_PATH: &str = "/rest/v1/rpc/ai_search_notes";

fn rpc_for(server: &MockServer) -> SupabaseRpc {
    SupabaseRpc::new(SupabaseConfig::new(server.uri(), "service-key")).unwrap()
}

fn tag_only_params() -> RetrievalParams {
    RetrievalParams {
        query_embedding: None,
        user_id: "user-1".to_string(),
        match_count: 20,
        tag_filter: Some("work".to_string()),
    }
}

#[tokio::test]
async fn test_rpc_sends_named_arguments_and_auth() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(RPC_PATH))
        .and(header("apikey", "service-key"))
        .and(header("Authorization", "Bearer service-key"))
        .and(body_json(json!({
            "query_embedding": [0.5, 0.25],
            "p_user_id": "user-1",
            "match_count": 5,
            "tag_filter": null
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": "n1"}])))
        .expect(1)
        .mount(&server)
        .await;

    let params = RetrievalParams {
        query_embedding: Some(Embedding::new(vec![0.5, 0.25])),
        user_id: "user-1".to_string(),
        match_count: 5,
        tag_filter: None,
    };
    let items = rpc_for(&server).search_notes(&params).await.unwrap();
    assert_eq!(items, vec![json!({"id": "n1"})]);
}

#[tokio::test]
async fn test_rpc_returns_records_in_order_untouched() {
    let server = MockServer::start().await;
    let rows = json!([
        {"id": "b", "similarity": 0.9, "extra": {"nested": true}},
        {"id": "a", "similarity": 0.1}
    ]);

    Mock::given(method("POST"))
        .and(path(RPC_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(rows.clone()))
        .mount(&server)
        .await;

    let items = rpc_for(&server).search_notes(&tag_only_params()).await.unwrap();
    assert_eq!(json!(items), rows);
}

#[tokio::test]
async fn test_rpc_non_array_body_is_empty() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(RPC_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("null"))
        .mount(&server)
        .await;

    let items = rpc_for(&server).search_notes(&tag_only_params()).await.unwrap();
    assert!(items.is_empty());
}

#[tokio::test]
async fn test_rpc_error_carries_payload() {
    let server = MockServer::start().await;
    let payload = json!({
        "code": "22P02",
        "details": null,
        "hint": null,
        "message": "invalid input syntax for type uuid: \"user-1\""
    });

    Mock::given(method("POST"))
        .and(path(RPC_PATH))
        .respond_with(ResponseTemplate::new(400).set_body_json(payload.clone()))
        .mount(&server)
        .await;

    let err = rpc_for(&server).search_notes(&tag_only_params()).await.unwrap_err();
    match err {
        Error::Retrieval { message, details } => {
            assert_eq!(message, "invalid input syntax for type uuid: \"user-1\"");
            assert_eq!(details, payload);
        }
        other => panic!("expected retrieval error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_rpc_error_with_plain_text_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(RPC_PATH))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
        .mount(&server)
        .await;

    let err = rpc_for(&server).search_notes(&tag_only_params()).await.unwrap_err();
    match err {
        Error::Retrieval { message, details } => {
            assert_eq!(message, "RPC ai_search_notes failed: 502");
            assert_eq!(details, json!("Bad Gateway"));
        }
        other => panic!("expected retrieval error, got {:?}", other),
    }
}
