use async_openai::config::OpenAIConfig;
use async_openai::types::CreateEmbeddingRequestArgs;
use async_openai::Client;
use async_trait::async_trait;
use cidchain_core::{Embedding, EmbeddingError};

use crate::EmbeddingProviderError;

pub const DEFAULT_MODEL: &str = "text-embedding-ada-002";
pub const DEFAULT_DIMENSION: usize = 1536;

#[derive(Clone)]
pub struct OpenAiEmbedding {
    client: Client<OpenAIConfig>,
    model: String,
    dimension: usize,
}

impl OpenAiEmbedding {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>, dimension: usize) -> Self {
        let config = OpenAIConfig::default().with_api_key(api_key);
        Self::with_client(Client::with_config(config), model, dimension)
    }

    pub fn with_client(
        client: Client<OpenAIConfig>,
        model: impl Into<String>,
        dimension: usize,
    ) -> Self {
        Self {
            client,
            model: model.into(),
            dimension,
        }
    }

    /// Builds the default ada-002 embedder from `OPENAI_API_KEY`.
    pub fn from_env() -> Result<Self, EmbeddingProviderError> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| EmbeddingProviderError::Config("OPENAI_API_KEY is not set".to_string()))?;
        Ok(Self::new(api_key, DEFAULT_MODEL, DEFAULT_DIMENSION))
    }

    fn check_dimension(&self, embedding: &[f32]) -> Result<(), EmbeddingProviderError> {
        if embedding.len() != self.dimension {
            return Err(EmbeddingProviderError::InvalidResponse(format!(
                "expected embedding dimension {}, got {}",
                self.dimension,
                embedding.len()
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl Embedding for OpenAiEmbedding {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let mut batch = self.embed_batch(&[text.to_string()]).await?;
        batch.pop().ok_or_else(|| {
            EmbeddingProviderError::InvalidResponse("missing embedding".to_string()).into()
        })
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let request = CreateEmbeddingRequestArgs::default()
            .model(&self.model)
            .input(texts.to_vec())
            .build()
            .map_err(|err| EmbeddingError::Other(Box::new(err)))?;

        let response = self
            .client
            .embeddings()
            .create(request)
            .await
            .map_err(|err| EmbeddingProviderError::Request(err.to_string()))?;

        if response.data.len() != texts.len() {
            return Err(EmbeddingProviderError::InvalidResponse(format!(
                "expected {} embeddings, got {}",
                texts.len(),
                response.data.len()
            ))
            .into());
        }

        let mut data = response.data;
        data.sort_by_key(|item| item.index);
        let mut out = Vec::with_capacity(data.len());
        for item in data {
            self.check_dimension(&item.embedding)?;
            out.push(item.embedding);
        }
        Ok(out)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}
