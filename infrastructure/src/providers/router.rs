//! Fallback router
//!
//! Implements the [`GenerationGateway`] port over the fixed provider set:
//! providers are tried strictly in priority order (with optional
//! preferred-provider promotion), each attempt guarded by the response
//! cache and a wall-clock timeout. A retriable failure moves on to the
//! next provider; anything else aborts the chain. Callers never see the
//! per-provider causes, only a generic unavailable error — the causes go
//! to the log.
//!
//! The cache and the "last provider" marker are shared across concurrent
//! chains without cross-request ordering guarantees: cache writes are
//! idempotent per key and the marker is diagnostic only.

use super::ProviderAdapter;
use crate::cache::{CacheKey, ResponseCache};
use async_trait::async_trait;
use roundtable_application::{
    GatewayError, GenerationGateway, ProviderError, TextGeneration, TextOptions,
};
use roundtable_domain::{GenerationRequest, GenerationResult, ProviderId, estimate_tokens};
use std::sync::{Arc, RwLock};
use std::time::Duration;
use tracing::{debug, warn};

/// Wall-clock budget per provider attempt. Losing the race abandons the
/// in-flight call; it is not aborted at the transport level.
pub const GENERATION_TIMEOUT: Duration = Duration::from_secs(15);

/// Priority-ordered failover router over the closed provider set
pub struct FallbackRouter {
    adapters: Vec<Arc<dyn ProviderAdapter>>,
    cache: ResponseCache,
    last_provider: RwLock<Option<ProviderId>>,
}

impl FallbackRouter {
    /// Router over the given adapters, tried in the order supplied.
    pub fn new(adapters: Vec<Arc<dyn ProviderAdapter>>) -> Self {
        Self {
            adapters,
            cache: ResponseCache::new(),
            last_provider: RwLock::new(None),
        }
    }

    /// Router over all five default adapters in global priority order.
    pub fn with_defaults(http: reqwest::Client) -> Self {
        Self::new(super::default_adapters(http))
    }

    /// Swap in a custom cache (tests, tuning).
    pub fn with_cache(mut self, cache: ResponseCache) -> Self {
        self.cache = cache;
        self
    }

    /// The chain for one request: preferred provider promoted to the
    /// front, duplicates removed, remaining order preserved.
    fn chain(&self, preferred: Option<ProviderId>) -> Vec<ProviderId> {
        let mut chain: Vec<ProviderId> = self.adapters.iter().map(|a| a.id()).collect();
        if let Some(preferred) = preferred {
            chain.retain(|id| *id != preferred);
            chain.insert(0, preferred);
        }
        chain
    }

    fn adapter(&self, id: ProviderId) -> Option<&Arc<dyn ProviderAdapter>> {
        self.adapters.iter().find(|a| a.id() == id)
    }

    fn mark_last(&self, provider: ProviderId) {
        if let Ok(mut last) = self.last_provider.write() {
            *last = Some(provider);
        }
    }

    /// Run one provider attempt for either generation path, returning the
    /// response content. Applies the timeout race and the empty-content
    /// rejection common to both paths.
    async fn attempt<F>(&self, call: F) -> Result<String, ProviderError>
    where
        F: Future<Output = Result<String, ProviderError>>,
    {
        let content = match tokio::time::timeout(GENERATION_TIMEOUT, call).await {
            Ok(result) => result?,
            Err(_) => return Err(ProviderError::Timeout),
        };

        if content.trim().is_empty() {
            return Err(ProviderError::EmptyResponse);
        }

        Ok(content)
    }
}

#[async_trait]
impl GenerationGateway for FallbackRouter {
    async fn generate_with_fallback(
        &self,
        request: GenerationRequest,
        preferred: Option<ProviderId>,
    ) -> Result<GenerationResult, GatewayError> {
        for provider in self.chain(preferred) {
            let Some(adapter) = self.adapter(provider) else {
                continue;
            };

            let key = CacheKey::new(provider, &request.prompt);
            if let Some(content) = self.cache.get(&key) {
                debug!("Cache hit for provider {}", provider);
                self.mark_last(provider);
                return Ok(GenerationResult {
                    agent_id: request.agent.id.clone(),
                    tokens_used: estimate_tokens(&content),
                    content,
                    provider,
                });
            }

            let outcome = self
                .attempt(async { adapter.generate(&request).await.map(|r| r.content) })
                .await;

            match outcome {
                Ok(content) => {
                    self.cache.insert(key, content.clone());
                    self.mark_last(provider);
                    return Ok(GenerationResult {
                        agent_id: request.agent.id.clone(),
                        tokens_used: estimate_tokens(&content),
                        content,
                        provider,
                    });
                }
                Err(e) => {
                    warn!("Provider {} failed: {}", provider, e);
                    if let ProviderError::MissingCredential(var) = e {
                        return Err(GatewayError::Configuration(format!(
                            "{var} not configured"
                        )));
                    }
                    if !e.is_retriable() {
                        warn!(
                            "Non-retriable failure from {}; aborting fallback chain",
                            provider
                        );
                        break;
                    }
                }
            }
        }

        Err(GatewayError::Unavailable)
    }

    async fn generate_text_with_fallback(
        &self,
        prompt: &str,
        options: TextOptions,
    ) -> Result<TextGeneration, GatewayError> {
        for provider in self.chain(options.preferred_provider) {
            let Some(adapter) = self.adapter(provider) else {
                continue;
            };

            let key = CacheKey::new(provider, prompt);
            if let Some(text) = self.cache.get(&key) {
                debug!("Cache hit for provider {}", provider);
                self.mark_last(provider);
                return Ok(TextGeneration { text, provider });
            }

            let outcome = self
                .attempt(adapter.generate_text(prompt, &options))
                .await;

            match outcome {
                Ok(text) => {
                    self.cache.insert(key, text.clone());
                    self.mark_last(provider);
                    return Ok(TextGeneration { text, provider });
                }
                Err(e) => {
                    warn!("Provider {} failed: {}", provider, e);
                    if let ProviderError::MissingCredential(var) = e {
                        return Err(GatewayError::Configuration(format!(
                            "{var} not configured"
                        )));
                    }
                    if !e.is_retriable() {
                        warn!(
                            "Non-retriable failure from {}; aborting fallback chain",
                            provider
                        );
                        break;
                    }
                }
            }
        }

        Err(GatewayError::Unavailable)
    }

    fn last_provider(&self) -> Option<ProviderId> {
        self.last_provider.read().ok().and_then(|last| *last)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roundtable_domain::AgentProfile;
    use std::sync::atomic::{AtomicUsize, Ordering};

    // -- Mock ProviderAdapter --------------------------------------------------

    type Script = Box<dyn Fn() -> Result<String, ProviderError> + Send + Sync>;

    struct MockAdapter {
        id: ProviderId,
        script: Script,
        calls: AtomicUsize,
    }

    impl MockAdapter {
        fn succeeding(id: ProviderId, content: &str) -> Arc<Self> {
            let content = content.to_string();
            Arc::new(Self {
                id,
                script: Box::new(move || Ok(content.clone())),
                calls: AtomicUsize::new(0),
            })
        }

        fn failing(id: ProviderId, make_error: fn() -> ProviderError) -> Arc<Self> {
            Arc::new(Self {
                id,
                script: Box::new(move || Err(make_error())),
                calls: AtomicUsize::new(0),
            })
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ProviderAdapter for MockAdapter {
        fn id(&self) -> ProviderId {
            self.id
        }

        async fn generate(
            &self,
            request: &GenerationRequest,
        ) -> Result<GenerationResult, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let content = (self.script)()?;
            Ok(GenerationResult {
                agent_id: request.agent.id.clone(),
                tokens_used: estimate_tokens(&content),
                content,
                provider: self.id,
            })
        }

        async fn generate_text(
            &self,
            _prompt: &str,
            _options: &TextOptions,
        ) -> Result<String, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            (self.script)()
        }
    }

    // -- Helpers ---------------------------------------------------------------

    fn request(prompt: &str) -> GenerationRequest {
        GenerationRequest::new(
            prompt,
            AgentProfile {
                id: "mentor".into(),
                name: "The Mentor".into(),
                system_prompt: "Be kind.".into(),
                temperature: 0.6,
            },
        )
    }

    fn rate_limited() -> ProviderError {
        ProviderError::Backend {
            status: Some(429),
            message: "429 - rate limit reached".into(),
        }
    }

    fn auth_rejected() -> ProviderError {
        ProviderError::Backend {
            status: Some(401),
            message: "invalid api key".into(),
        }
    }

    // -- Tests -----------------------------------------------------------------

    #[tokio::test]
    async fn first_provider_serves_when_healthy() {
        let groq = MockAdapter::succeeding(ProviderId::Groq, "from groq");
        let google = MockAdapter::succeeding(ProviderId::Google, "from google");
        let router = FallbackRouter::new(vec![groq.clone(), google.clone()]);

        let result = router
            .generate_with_fallback(request("hello"), None)
            .await
            .unwrap();

        assert_eq!(result.provider, ProviderId::Groq);
        assert_eq!(result.content, "from groq");
        assert_eq!(result.agent_id, "mentor");
        assert_eq!(google.call_count(), 0);
        assert_eq!(router.last_provider(), Some(ProviderId::Groq));
    }

    #[tokio::test]
    async fn preferred_provider_is_promoted_to_front() {
        let groq = MockAdapter::succeeding(ProviderId::Groq, "from groq");
        let aimlapi = MockAdapter::succeeding(ProviderId::Aimlapi, "from aimlapi");
        let router = FallbackRouter::new(vec![groq.clone(), aimlapi.clone()]);

        let result = router
            .generate_with_fallback(request("hello"), Some(ProviderId::Aimlapi))
            .await
            .unwrap();

        assert_eq!(result.provider, ProviderId::Aimlapi);
        assert_eq!(groq.call_count(), 0);
    }

    #[tokio::test]
    async fn rate_limited_provider_falls_through_to_next() {
        let groq = MockAdapter::failing(ProviderId::Groq, rate_limited);
        let google = MockAdapter::succeeding(ProviderId::Google, "from google");
        let router = FallbackRouter::new(vec![groq.clone(), google.clone()]);

        let result = router
            .generate_with_fallback(request("hello"), None)
            .await
            .unwrap();

        assert_eq!(result.provider, ProviderId::Google);
        assert_eq!(groq.call_count(), 1);
        assert_eq!(google.call_count(), 1);
    }

    #[tokio::test]
    async fn timeout_and_network_failures_fall_through() {
        let groq = MockAdapter::failing(ProviderId::Groq, || ProviderError::Timeout);
        let google = MockAdapter::failing(ProviderId::Google, || {
            ProviderError::Network("connection refused".into())
        });
        let openrouter = MockAdapter::succeeding(ProviderId::OpenRouter, "third time lucky");
        let router = FallbackRouter::new(vec![groq, google, openrouter]);

        let result = router
            .generate_with_fallback(request("hello"), None)
            .await
            .unwrap();

        assert_eq!(result.provider, ProviderId::OpenRouter);
    }

    #[tokio::test]
    async fn non_retriable_failure_aborts_the_chain() {
        let groq = MockAdapter::failing(ProviderId::Groq, auth_rejected);
        let google = MockAdapter::succeeding(ProviderId::Google, "never reached");
        let router = FallbackRouter::new(vec![groq.clone(), google.clone()]);

        let result = router.generate_with_fallback(request("hello"), None).await;

        assert!(matches!(result, Err(GatewayError::Unavailable)));
        // Provider 2 is never invoked after a non-retriable failure.
        assert_eq!(google.call_count(), 0);
    }

    #[tokio::test]
    async fn missing_credential_surfaces_as_configuration_error() {
        let groq = MockAdapter::failing(ProviderId::Groq, || {
            ProviderError::MissingCredential("GROQ_API_KEY")
        });
        let google = MockAdapter::succeeding(ProviderId::Google, "never reached");
        let router = FallbackRouter::new(vec![groq, google.clone()]);

        let result = router.generate_with_fallback(request("hello"), None).await;

        assert!(matches!(
            result,
            Err(GatewayError::Configuration(message)) if message == "GROQ_API_KEY not configured"
        ));
        assert_eq!(google.call_count(), 0);
    }

    #[tokio::test]
    async fn empty_response_counts_as_failure_and_falls_through() {
        let groq = MockAdapter::succeeding(ProviderId::Groq, "   \n  ");
        let google = MockAdapter::succeeding(ProviderId::Google, "real content");
        let router = FallbackRouter::new(vec![groq.clone(), google]);

        let result = router
            .generate_with_fallback(request("hello"), None)
            .await
            .unwrap();

        assert_eq!(result.provider, ProviderId::Google);
        assert_eq!(groq.call_count(), 1);
    }

    #[tokio::test]
    async fn exhaustion_masks_internal_causes() {
        let groq = MockAdapter::failing(ProviderId::Groq, rate_limited);
        let google = MockAdapter::failing(ProviderId::Google, || ProviderError::Timeout);
        let router = FallbackRouter::new(vec![groq, google]);

        let result = router.generate_with_fallback(request("hello"), None).await;

        let error = result.unwrap_err();
        assert!(matches!(error, GatewayError::Unavailable));
        assert_eq!(error.to_string(), "AI services temporarily unavailable");
    }

    #[tokio::test]
    async fn cache_hit_skips_the_adapter_and_reports_the_provider() {
        let groq = MockAdapter::succeeding(ProviderId::Groq, "cached answer");
        let router = FallbackRouter::new(vec![groq.clone()]);

        let first = router
            .generate_with_fallback(request("same prompt"), None)
            .await
            .unwrap();
        let second = router
            .generate_with_fallback(request("same prompt"), None)
            .await
            .unwrap();

        assert_eq!(first.content, second.content);
        assert_eq!(second.provider, ProviderId::Groq);
        // The adapter ran exactly once; the second round was served from cache.
        assert_eq!(groq.call_count(), 1);
    }

    #[tokio::test]
    async fn expired_cache_entry_invokes_the_adapter_again() {
        let groq = MockAdapter::succeeding(ProviderId::Groq, "answer");
        let router = FallbackRouter::new(vec![groq.clone()])
            .with_cache(ResponseCache::with_limits(10, Duration::ZERO));

        router
            .generate_with_fallback(request("same prompt"), None)
            .await
            .unwrap();
        router
            .generate_with_fallback(request("same prompt"), None)
            .await
            .unwrap();

        assert_eq!(groq.call_count(), 2);
    }

    #[tokio::test]
    async fn text_path_mirrors_the_fallback_algorithm() {
        let groq = MockAdapter::failing(ProviderId::Groq, rate_limited);
        let google = MockAdapter::succeeding(ProviderId::Google, "a short summary");
        let router = FallbackRouter::new(vec![groq, google.clone()]);

        let generated = router
            .generate_text_with_fallback("summarize this", TextOptions::default())
            .await
            .unwrap();

        assert_eq!(generated.text, "a short summary");
        assert_eq!(generated.provider, ProviderId::Google);

        // Second identical call is a cache hit.
        router
            .generate_text_with_fallback("summarize this", TextOptions::default())
            .await
            .unwrap();
        assert_eq!(google.call_count(), 1);
    }

    #[tokio::test]
    async fn text_path_honors_preferred_provider_option() {
        let groq = MockAdapter::succeeding(ProviderId::Groq, "from groq");
        let google = MockAdapter::succeeding(ProviderId::Google, "from google");
        let router = FallbackRouter::new(vec![groq.clone(), google]);

        let options = TextOptions::default().with_preferred_provider(ProviderId::Google);
        let generated = router
            .generate_text_with_fallback("prompt", options)
            .await
            .unwrap();

        assert_eq!(generated.provider, ProviderId::Google);
        assert_eq!(groq.call_count(), 0);
    }
}
