//! Client for the text-embedding service backing the semantic classifier term.
//!
//! The service is optional. Callers treat every error here as "no semantic
//! signal" and fall back to keyword scoring alone.

use anyhow::{anyhow, Context, Result};
use backoff::{future::retry, ExponentialBackoff};
use parking_lot::RwLock;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument, warn};

use crate::domain::{HouseType, Style};
use crate::extraction::{KeywordTable, SemanticScorer};

/// Upper bound on time spent retrying one embedding request.
const RETRY_BUDGET: Duration = Duration::from_secs(5);

/// Client for the embedding service.
#[derive(Clone)]
pub struct EmbeddingClient {
    client: Client,
    base_url: String,
    token: String,
    phrase_cache: Arc<RwLock<HashMap<String, Vec<f32>>>>,
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    texts: &'a [String],
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    embeddings: Vec<Vec<f32>>,
}

/// Error response from the embedding service.
#[derive(Debug, Deserialize)]
struct ServiceErrorResponse {
    message: String,
}

impl EmbeddingClient {
    pub fn new(base_url: &str, token: &str, timeout_seconds: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()
            .context("Failed to create HTTP client")?;

        tracing::info!(base_url = base_url, "Embedding client initialized");

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
            phrase_cache: Arc::new(RwLock::new(HashMap::new())),
        })
    }

    /// Embeds `texts`, retrying transient failures with exponential backoff.
    #[instrument(skip_all, fields(count = texts.len()))]
    pub async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let policy = ExponentialBackoff {
            max_elapsed_time: Some(RETRY_BUDGET),
            ..ExponentialBackoff::default()
        };

        let embeddings = retry(policy, || async move { self.request(texts).await }).await?;

        if embeddings.len() != texts.len() {
            return Err(anyhow!(
                "embedding service returned {} vectors for {} texts",
                embeddings.len(),
                texts.len()
            ));
        }
        Ok(embeddings)
    }

    async fn request(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, backoff::Error<anyhow::Error>> {
        let url = format!("{}/v1/embeddings", self.base_url);
        debug!(url = %url, "Embedding service request");

        let response = self
            .client
            .post(&url)
            .header("X-Internal-Token", &self.token)
            .json(&EmbeddingRequest { texts })
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "Embedding service request failed");
                backoff::Error::transient(anyhow!("embedding service unavailable: {e}"))
            })?;

        let status = response.status();
        if status.is_success() {
            return response
                .json::<EmbeddingResponse>()
                .await
                .map(|body| body.embeddings)
                .map_err(|e| backoff::Error::permanent(anyhow!("invalid embedding response: {e}")));
        }

        let message = response
            .json::<ServiceErrorResponse>()
            .await
            .map(|body| body.message)
            .unwrap_or_else(|_| format!("embedding service error: {status}"));

        let err = anyhow!(message);
        if status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS {
            Err(backoff::Error::transient(err))
        } else {
            Err(backoff::Error::permanent(err))
        }
    }

    /// Embeds `text` together with any `phrases` not seen before.
    ///
    /// Phrase vectors are cached for the life of the client, so after warm-up
    /// each call sends only the input text.
    pub async fn similarity_for(
        &self,
        text: &str,
        phrases: &[String],
    ) -> Result<EmbeddingSimilarity> {
        let missing: Vec<String> = {
            let cache = self.phrase_cache.read();
            phrases
                .iter()
                .filter(|p| !cache.contains_key(*p))
                .cloned()
                .collect::<BTreeSet<_>>()
                .into_iter()
                .collect()
        };

        let mut batch = Vec::with_capacity(missing.len() + 1);
        batch.push(text.to_string());
        batch.extend(missing.iter().cloned());

        let mut vectors = self.embed(&batch).await?.into_iter();
        let input = vectors
            .next()
            .ok_or_else(|| anyhow!("embedding service returned no vectors"))?;

        let mut cache = self.phrase_cache.write();
        for (phrase, vector) in missing.into_iter().zip(vectors) {
            cache.insert(phrase, vector);
        }
        let phrases = phrases
            .iter()
            .filter_map(|p| cache.get(p).map(|v| (p.clone(), v.clone())))
            .collect();

        Ok(EmbeddingSimilarity { input, phrases })
    }

    /// Check embedding service health.
    pub async fn health_check(&self) -> Result<()> {
        let url = format!("{}/health", self.base_url);

        self.client
            .get(&url)
            .timeout(Duration::from_secs(5))
            .send()
            .await
            .context("Embedding service health check failed")?
            .error_for_status()
            .context("Embedding service unhealthy")?;

        Ok(())
    }
}

/// Every keyword phrase either classifier may ask about.
pub fn classifier_phrases(table: &KeywordTable) -> Vec<String> {
    let styles = Style::ALL
        .iter()
        .flat_map(|s| table.style(*s).signals.keywords.iter());
    let house_types = HouseType::ALL
        .iter()
        .flat_map(|h| table.house_type(*h).signals.keywords.iter());
    styles
        .chain(house_types)
        .cloned()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Precomputed vectors for one input, used as the classifiers' semantic term.
#[derive(Debug, Clone, Default)]
pub struct EmbeddingSimilarity {
    input: Vec<f32>,
    phrases: HashMap<String, Vec<f32>>,
}

impl EmbeddingSimilarity {
    pub fn new(input: Vec<f32>, phrases: HashMap<String, Vec<f32>>) -> Self {
        Self { input, phrases }
    }
}

impl SemanticScorer for EmbeddingSimilarity {
    /// Sum of positive cosine similarities; unknown phrases contribute nothing.
    fn similarity(&self, phrases: &[String]) -> f64 {
        phrases
            .iter()
            .filter_map(|p| self.phrases.get(p))
            .map(|v| cosine(&self.input, v).max(0.0))
            .sum()
    }
}

fn cosine(a: &[f32], b: &[f32]) -> f64 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let (mut dot, mut na, mut nb) = (0.0f64, 0.0f64, 0.0f64);
    for (x, y) in a.iter().zip(b) {
        let (x, y) = (f64::from(*x), f64::from(*y));
        dot += x * y;
        na += x * x;
        nb += y * y;
    }
    if na == 0.0 || nb == 0.0 {
        return 0.0;
    }
    dot / (na.sqrt() * nb.sqrt())
}
