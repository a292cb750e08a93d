#![cfg(feature = "openai")]

use async_openai::config::OpenAIConfig;
use async_openai::Client;
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use cidchain_core::Embedding;
use cidchain_embeddings::OpenAiEmbedding;

fn client_for(server: &MockServer) -> Client<OpenAIConfig> {
    let config = OpenAIConfig::new()
        .with_api_key("test-key")
        .with_api_base(format!("{}/v1", server.uri()));
    Client::with_config(config)
}

#[tokio::test]
async fn openai_embedding_maps_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/embeddings"))
        .and(header("authorization", "Bearer test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                {"embedding": [0.1, 0.2, 0.3], "index": 0, "object": "embedding"}
            ],
            "model": "text-embedding-ada-002",
            "object": "list",
            "usage": {"prompt_tokens": 1, "total_tokens": 1}
        })))
        .mount(&server)
        .await;

    let embedder = OpenAiEmbedding::with_client(client_for(&server), "text-embedding-ada-002", 3);

    let out = embedder.embed("hello").await.unwrap();
    assert_eq!(out, vec![0.1, 0.2, 0.3]);
}

#[tokio::test]
async fn openai_embedding_rejects_wrong_dimension() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/embeddings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                {"embedding": [0.1, 0.2], "index": 0, "object": "embedding"}
            ],
            "model": "text-embedding-ada-002",
            "object": "list",
            "usage": {"prompt_tokens": 1, "total_tokens": 1}
        })))
        .mount(&server)
        .await;

    let embedder = OpenAiEmbedding::with_client(client_for(&server), "text-embedding-ada-002", 3);

    let err = embedder.embed("hello").await.unwrap_err();
    assert!(err.to_string().contains("expected embedding dimension 3"));
}
