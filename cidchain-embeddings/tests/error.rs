use cidchain_core::EmbeddingError;
use cidchain_embeddings::EmbeddingProviderError;

#[test]
fn provider_errors_map_to_core_variants() {
    let err: EmbeddingError = EmbeddingProviderError::Request("boom".to_string()).into();
    assert!(matches!(err, EmbeddingError::Provider(message) if message == "boom"));

    let err: EmbeddingError = EmbeddingProviderError::InvalidResponse("bad".to_string()).into();
    assert!(matches!(err, EmbeddingError::InvalidResponse(_)));

    let err: EmbeddingError = EmbeddingProviderError::Config("OPENAI_API_KEY".to_string()).into();
    assert!(err.to_string().contains("OPENAI_API_KEY"));
}
