//! Dashboard workflows over the generation service
//!
//! `Dashboard` ties the service client, the state container and the query
//! cache together: it generates websites with a synthetic progress
//! indicator, serves cached listings and detail reads, and mirrors updates
//! and deletions into local state.

use crate::cache::{Invalidate, QueryCache, QueryKey};
use crate::error::{RequestError, Result, SiteError};
use crate::state::{AppState, GenerationProgress};
use crate::templates::fallback_artifact;
use async_trait::async_trait;
use rand::Rng;
use sitegen_types::{
    Artifact, DeleteAck, GenerateRequest, ListQuery, PreviewPayload, SystemHealth,
    VisibilityFilter, WebsitePage, WebsiteUpdate,
};
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// Prompts shorter than this (after trimming) are rejected locally
pub const MIN_PROMPT_CHARS: usize = 10;

/// Interval between synthetic progress increments
pub const PROGRESS_TICK: Duration = Duration::from_millis(500);

/// Synthetic progress never passes this percentage
pub const PROGRESS_CEILING: f64 = 90.0;

/// Largest synthetic increment per tick
pub const PROGRESS_MAX_STEP: f64 = 10.0;

/// Delay before navigating to a freshly generated website
pub const REDIRECT_DELAY: Duration = Duration::from_secs(1);

/// The generation service
#[async_trait]
pub trait WebsiteApi: Send + Sync {
    async fn generate_website(
        &self,
        request: &GenerateRequest,
    ) -> std::result::Result<Artifact, RequestError>;

    async fn list_websites(
        &self,
        query: &ListQuery,
    ) -> std::result::Result<WebsitePage, RequestError>;

    async fn list_public_websites(
        &self,
        page: u32,
        limit: u32,
    ) -> std::result::Result<WebsitePage, RequestError>;

    async fn get_website(&self, id: &str) -> std::result::Result<Artifact, RequestError>;

    async fn get_preview(&self, id: &str) -> std::result::Result<PreviewPayload, RequestError>;

    async fn system_health(&self) -> std::result::Result<SystemHealth, RequestError>;

    async fn update_website(
        &self,
        id: &str,
        update: &WebsiteUpdate,
    ) -> std::result::Result<Artifact, RequestError>;

    async fn delete_website(&self, id: &str) -> std::result::Result<DeleteAck, RequestError>;
}

/// Where to go after a generation, and when
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    pub path: String,
    pub after: Duration,
}

impl Redirect {
    pub fn to_preview(id: &str) -> Self {
        Self {
            path: format!("/preview/{}", id),
            after: REDIRECT_DELAY,
        }
    }
}

#[derive(Debug, Clone)]
pub struct GenerationOutcome {
    pub artifact: Artifact,
    pub redirect: Redirect,
    /// The website was synthesized locally after an incomplete generation
    pub fallback: bool,
}

/// Reject prompts that are too short to generate from. The prompt is
/// measured as submitted, surrounding whitespace included.
pub fn validate_prompt(prompt: &str) -> Result<()> {
    if prompt.chars().count() < MIN_PROMPT_CHARS {
        return Err(SiteError::Validation(format!(
            "Prompt must be at least {} characters",
            MIN_PROMPT_CHARS
        )));
    }
    Ok(())
}

/// Next synthetic progress value
pub fn next_progress(current: f64, step: f64) -> f64 {
    (current + step.clamp(0.0, PROGRESS_MAX_STEP)).min(PROGRESS_CEILING)
}

pub struct Dashboard<A: WebsiteApi> {
    api: A,
    state: AppState,
    cache: QueryCache,
    progress: watch::Sender<GenerationProgress>,
}

impl<A: WebsiteApi> Dashboard<A> {
    pub fn new(api: A, state: AppState) -> Self {
        let (progress, _) = watch::channel(state.generation);
        Self {
            api,
            state,
            cache: QueryCache::new(),
            progress,
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut AppState {
        &mut self.state
    }

    pub fn into_state(self) -> AppState {
        self.state
    }

    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    /// Receive generation progress updates
    pub fn subscribe_progress(&self) -> watch::Receiver<GenerationProgress> {
        self.progress.subscribe()
    }

    /// Submit a prompt.
    ///
    /// Short prompts fail before any request is made. While the request is
    /// outstanding, progress climbs by a random step every tick but stays at
    /// or below the ceiling; it snaps to 100 when the response arrives and
    /// resets once the workflow finishes, whatever the outcome.
    pub async fn generate(&mut self, request: GenerateRequest) -> Result<GenerationOutcome> {
        validate_prompt(&request.prompt)?;

        info!("Generating website ({} chars of prompt)", request.prompt.len());

        let api = &self.api;
        let state = &mut self.state;
        let tx = &self.progress;
        let publish = |state: &mut AppState, snapshot: GenerationProgress| {
            state.generation = snapshot;
            tx.send_replace(snapshot);
        };

        publish(state, GenerationProgress::started());

        let mut ticker = tokio::time::interval(PROGRESS_TICK);
        ticker.tick().await;

        let request_fut = api.generate_website(&request);
        tokio::pin!(request_fut);

        let mut progress = 0.0;
        let result = loop {
            tokio::select! {
                result = &mut request_fut => break result,
                _ = ticker.tick() => {
                    let step = rand::thread_rng().gen_range(0.0..PROGRESS_MAX_STEP);
                    progress = next_progress(progress, step);
                    publish(state, GenerationProgress { is_generating: true, progress });
                }
            }
        };

        let (artifact, fallback) = match result {
            Ok(artifact) => (artifact, false),
            Err(RequestError::BadRequest { ref message, .. }) if message.contains("incomplete") => {
                warn!("Generation incomplete, creating a fallback website");
                (fallback_artifact(&request), true)
            }
            Err(e) => {
                publish(state, GenerationProgress::idle());
                warn!("Generation failed: {}", e);
                return Err(e.into());
            }
        };

        publish(
            state,
            GenerationProgress {
                is_generating: true,
                progress: 100.0,
            },
        );

        state.recent.add(artifact.clone());
        self.cache.invalidate(Invalidate::Lists);
        self.cache.invalidate(Invalidate::Health);
        self.cache
            .insert(QueryKey::Website(artifact.id.clone()), &artifact);

        publish(&mut self.state, GenerationProgress::idle());

        info!("Generated website {}", artifact.id);
        Ok(GenerationOutcome {
            redirect: Redirect::to_preview(&artifact.id),
            artifact,
            fallback,
        })
    }

    /// One page of websites, honouring the saved filter and search.
    ///
    /// Public-only listings use the public endpoint, which ignores search.
    /// Private-only listings are filtered on this side.
    pub async fn list(&mut self, page: u32, limit: u32) -> Result<WebsitePage> {
        let filter = self.state.preferences.filter;
        let search = self.state.search().map(str::to_string);

        let key = match filter {
            VisibilityFilter::PublicOnly => QueryKey::PublicWebsites { page, limit },
            _ => QueryKey::Websites {
                page,
                limit,
                search: search.clone(),
                filter,
            },
        };

        let listing = match self.cache.get::<WebsitePage>(&key) {
            Some(cached) => {
                debug!("Serving {:?} from cache", key);
                cached
            }
            None => {
                let mut listing = match filter {
                    VisibilityFilter::PublicOnly => {
                        self.api.list_public_websites(page, limit).await?
                    }
                    _ => {
                        self.api
                            .list_websites(&ListQuery {
                                page,
                                limit,
                                search,
                            })
                            .await?
                    }
                };
                if filter == VisibilityFilter::PrivateOnly {
                    listing.websites.retain(|w| filter.admits(w));
                }
                self.cache.insert(key, &listing);
                listing
            }
        };

        self.state.set_pagination(listing.page, listing.total_pages);
        Ok(listing)
    }

    /// A single website
    pub async fn website(&self, id: &str) -> Result<Artifact> {
        let key = QueryKey::Website(id.to_string());
        if let Some(cached) = self.cache.get::<Artifact>(&key) {
            debug!("Serving website {} from cache", id);
            return Ok(cached);
        }

        let website = self.api.get_website(id).await?;
        self.cache.insert(key, &website);
        Ok(website)
    }

    /// The server-trimmed preview payload of a website
    pub async fn preview(&self, id: &str) -> Result<PreviewPayload> {
        let key = QueryKey::Preview(id.to_string());
        if let Some(cached) = self.cache.get::<PreviewPayload>(&key) {
            return Ok(cached);
        }

        let preview = self.api.get_preview(id).await?;
        self.cache.insert(key, &preview);
        Ok(preview)
    }

    /// A website as it should be displayed: the record with its preview
    /// payload applied. A failing preview read leaves the record as is.
    pub async fn preview_view(&self, id: &str) -> Result<Artifact> {
        let (website, preview) = futures::future::join(self.website(id), self.preview(id)).await;
        let website = website?;
        match preview {
            Ok(preview) => Ok(website.with_preview(&preview)),
            Err(e) => {
                warn!("Preview payload for {} unavailable: {}", id, e);
                Ok(website)
            }
        }
    }

    /// Service health, also kept in the state container
    pub async fn health(&mut self) -> Result<SystemHealth> {
        let health = match self.cache.get::<SystemHealth>(&QueryKey::Health) {
            Some(cached) => cached,
            None => {
                let health = self.api.system_health().await?;
                self.cache.insert(QueryKey::Health, &health);
                health
            }
        };

        self.state.system_health = Some(health.clone());
        Ok(health)
    }

    pub async fn update(&mut self, id: &str, update: &WebsiteUpdate) -> Result<Artifact> {
        if update.is_empty() {
            return Err(SiteError::Validation("Nothing to update".to_string()));
        }

        let updated = self.api.update_website(id, update).await?;
        self.state.recent.update(id, update);
        self.cache.invalidate(Invalidate::Website(id.to_string()));
        self.cache.invalidate(Invalidate::Lists);

        info!("Updated website {}", id);
        Ok(updated)
    }

    pub async fn delete(&mut self, id: &str) -> Result<DeleteAck> {
        let ack = self.api.delete_website(id).await?;
        self.state.recent.remove(id);
        self.cache.invalidate(Invalidate::Website(id.to_string()));
        self.cache.invalidate(Invalidate::Lists);
        self.cache.invalidate(Invalidate::Health);

        info!("Deleted website {}", id);
        Ok(ack)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::{classify, Classification};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    fn website(id: &str, is_public: bool) -> Artifact {
        Artifact {
            id: id.to_string(),
            title: format!("Site {}", id),
            description: String::new(),
            prompt: "A landing page for a bakery".to_string(),
            html_content: "<h1>Bakery</h1>".to_string(),
            css_content: String::new(),
            is_public,
            created_at: chrono::Utc::now(),
            metadata: None,
        }
    }

    fn page(websites: Vec<Artifact>) -> WebsitePage {
        WebsitePage {
            total: websites.len() as u64,
            websites,
            page: 1,
            limit: 12,
            total_pages: 3,
        }
    }

    struct MockApi {
        delay: Duration,
        generate: Mutex<Option<std::result::Result<Artifact, RequestError>>>,
        generate_calls: AtomicUsize,
        list_calls: AtomicUsize,
        public_calls: AtomicUsize,
        last_query: Mutex<Option<ListQuery>>,
        listing: Vec<Artifact>,
        preview: std::result::Result<PreviewPayload, RequestError>,
    }

    impl MockApi {
        fn new() -> Self {
            Self {
                delay: Duration::from_secs(3),
                generate: Mutex::new(None),
                generate_calls: AtomicUsize::new(0),
                list_calls: AtomicUsize::new(0),
                public_calls: AtomicUsize::new(0),
                last_query: Mutex::new(None),
                listing: vec![website("pub", true), website("priv", false)],
                preview: Ok(PreviewPayload::default()),
            }
        }

        fn generating(self, result: std::result::Result<Artifact, RequestError>) -> Self {
            *self.generate.lock().unwrap() = Some(result);
            self
        }
    }

    #[async_trait]
    impl WebsiteApi for MockApi {
        async fn generate_website(
            &self,
            request: &GenerateRequest,
        ) -> std::result::Result<Artifact, RequestError> {
            self.generate_calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(self.delay).await;
            match self.generate.lock().unwrap().clone() {
                Some(result) => result,
                None => {
                    let mut created = website("generated", request.is_public.unwrap_or(false));
                    created.prompt = request.prompt.clone();
                    Ok(created)
                }
            }
        }

        async fn list_websites(
            &self,
            query: &ListQuery,
        ) -> std::result::Result<WebsitePage, RequestError> {
            self.list_calls.fetch_add(1, Ordering::SeqCst);
            *self.last_query.lock().unwrap() = Some(query.clone());
            Ok(page(self.listing.clone()))
        }

        async fn list_public_websites(
            &self,
            _page: u32,
            _limit: u32,
        ) -> std::result::Result<WebsitePage, RequestError> {
            self.public_calls.fetch_add(1, Ordering::SeqCst);
            Ok(page(self.listing.iter().filter(|w| w.is_public).cloned().collect()))
        }

        async fn get_website(&self, id: &str) -> std::result::Result<Artifact, RequestError> {
            self.listing
                .iter()
                .find(|w| w.id == id)
                .cloned()
                .ok_or_else(|| RequestError::from_status(404, Some("Website not found".into()), vec![]))
        }

        async fn get_preview(&self, _id: &str) -> std::result::Result<PreviewPayload, RequestError> {
            self.preview.clone()
        }

        async fn system_health(&self) -> std::result::Result<SystemHealth, RequestError> {
            Ok(SystemHealth {
                status: "healthy".to_string(),
                ..Default::default()
            })
        }

        async fn update_website(
            &self,
            id: &str,
            update: &WebsiteUpdate,
        ) -> std::result::Result<Artifact, RequestError> {
            let mut updated = self.get_website(id).await?;
            updated.apply_update(update);
            Ok(updated)
        }

        async fn delete_website(&self, _id: &str) -> std::result::Result<DeleteAck, RequestError> {
            Ok(DeleteAck {
                success: true,
                message: "Website deleted".to_string(),
            })
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_generation_puts_result_at_head() {
        let mut dashboard = Dashboard::new(MockApi::new(), AppState::default());
        dashboard.state_mut().recent.add(website("older", true));
        dashboard
            .cache()
            .insert(QueryKey::Health, &SystemHealth::default());

        let request = GenerateRequest::new("A landing page for a bakery").public(false);
        let outcome = dashboard.generate(request).await.unwrap();

        assert!(!outcome.fallback);
        assert_eq!(outcome.redirect.path, "/preview/generated");
        assert_eq!(outcome.redirect.after, Duration::from_secs(1));

        let head = dashboard.state().recent.head().unwrap();
        assert_eq!(head.id, "generated");
        assert!(!head.is_public);
        assert_eq!(head.prompt, "A landing page for a bakery");

        assert_eq!(dashboard.state().generation, GenerationProgress::idle());
        assert!(!dashboard.cache().contains(&QueryKey::Health));
    }

    #[tokio::test(start_paused = true)]
    async fn test_short_prompt_never_reaches_the_service() {
        let mut dashboard = Dashboard::new(MockApi::new(), AppState::default());

        let result = dashboard.generate(GenerateRequest::new("too short")).await;
        assert!(matches!(result, Err(SiteError::Validation(_))));
        assert_eq!(dashboard.api().generate_calls.load(Ordering::SeqCst), 0);
        assert!(dashboard.state().recent.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_progress_is_clamped_then_reset() {
        let mut dashboard = Dashboard::new(MockApi::new(), AppState::default());
        let mut rx = dashboard.subscribe_progress();

        let observer = tokio::spawn(async move {
            let mut seen = Vec::new();
            while rx.changed().await.is_ok() {
                let snapshot = *rx.borrow_and_update();
                seen.push(snapshot);
                if !snapshot.is_generating && seen.len() > 1 {
                    break;
                }
            }
            seen
        });

        dashboard
            .generate(GenerateRequest::new("A landing page for a bakery"))
            .await
            .unwrap();
        let seen = observer.await.unwrap();

        assert!(seen.len() >= 4, "saw {:?}", seen);
        for snapshot in &seen[..seen.len() - 1] {
            assert!(snapshot.is_generating);
            assert!(snapshot.progress <= PROGRESS_CEILING || snapshot.progress == 100.0);
        }
        assert_eq!(seen.last(), Some(&GenerationProgress::idle()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_resets_progress() {
        let api = MockApi::new().generating(Err(RequestError::RateLimited));
        let mut dashboard = Dashboard::new(api, AppState::default());

        let err = tokio_test::assert_err!(
            dashboard
                .generate(GenerateRequest::new("A landing page for a bakery"))
                .await
        );

        assert_eq!(
            err.user_message(),
            "Too many requests. Please wait a moment and try again."
        );
        assert_eq!(dashboard.state().generation, GenerationProgress::idle());
        assert!(dashboard.state().recent.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_incomplete_generation_falls_back_locally() {
        let api = MockApi::new().generating(Err(RequestError::BadRequest {
            message: "AI response was incomplete".to_string(),
            suggestions: vec![],
        }));
        let mut dashboard = Dashboard::new(api, AppState::default());

        let outcome = dashboard
            .generate(GenerateRequest::new("An online fashion boutique"))
            .await
            .unwrap();

        assert!(outcome.fallback);
        assert!(outcome.artifact.id.starts_with("fallback-"));
        assert_eq!(classify(&outcome.artifact), Classification::Legacy);
        assert_eq!(dashboard.state().recent.head().unwrap().id, outcome.artifact.id);
    }

    #[test]
    fn test_prompt_length_counts_raw_input() {
        assert!(validate_prompt("too short").is_err());
        assert!(validate_prompt("  too short  ").is_ok());
        assert!(validate_prompt("a bakery!!").is_ok());
        assert!(matches!(
            validate_prompt(""),
            Err(SiteError::Validation(_))
        ));
    }

    #[test]
    fn test_next_progress() {
        assert_eq!(next_progress(0.0, 5.0), 5.0);
        assert_eq!(next_progress(85.0, 9.0), PROGRESS_CEILING);
        assert_eq!(next_progress(90.0, 3.0), PROGRESS_CEILING);
        assert_eq!(next_progress(10.0, 50.0), 20.0);
    }

    #[tokio::test]
    async fn test_listing_honours_filter_and_search() {
        let mut dashboard = Dashboard::new(MockApi::new(), AppState::default());
        dashboard.state_mut().set_search_query("bakery");

        dashboard.list(1, 12).await.unwrap();
        dashboard.list(1, 12).await.unwrap();
        assert_eq!(dashboard.api().list_calls.load(Ordering::SeqCst), 1);
        assert_eq!(
            dashboard.api().last_query.lock().unwrap().clone().unwrap().search,
            Some("bakery".to_string())
        );
        assert_eq!(dashboard.state().total_pages, 3);

        dashboard.state_mut().set_filter(VisibilityFilter::PublicOnly);
        let public = dashboard.list(1, 12).await.unwrap();
        assert_eq!(dashboard.api().public_calls.load(Ordering::SeqCst), 1);
        assert!(public.websites.iter().all(|w| w.is_public));

        dashboard.state_mut().set_filter(VisibilityFilter::PrivateOnly);
        let private = dashboard.list(1, 12).await.unwrap();
        assert_eq!(private.websites.len(), 1);
        assert_eq!(private.websites[0].id, "priv");
    }

    #[tokio::test]
    async fn test_preview_view_overrides_for_display_only() {
        let mut api = MockApi::new();
        api.preview = Ok(PreviewPayload {
            html: "<p>trimmed</p>".to_string(),
            css: String::new(),
        });
        let dashboard = Dashboard::new(api, AppState::default());

        let display = dashboard.preview_view("pub").await.unwrap();
        assert_eq!(display.html_content, "<p>trimmed</p>");

        let cached = dashboard.website("pub").await.unwrap();
        assert_eq!(cached.html_content, "<h1>Bakery</h1>");
    }

    #[tokio::test]
    async fn test_preview_failure_is_tolerated() {
        let mut api = MockApi::new();
        api.preview = Err(RequestError::Network("connection reset".into()));
        let dashboard = Dashboard::new(api, AppState::default());

        let display = dashboard.preview_view("pub").await.unwrap();
        assert_eq!(display.html_content, "<h1>Bakery</h1>");
        assert!(dashboard.preview_view("missing").await.is_err());
    }

    #[tokio::test]
    async fn test_update_and_delete_mirror_local_state() {
        let mut dashboard = Dashboard::new(MockApi::new(), AppState::default());
        dashboard.state_mut().recent.add(website("pub", true));
        dashboard.website("pub").await.unwrap();

        let update = WebsiteUpdate {
            title: Some("Renamed".to_string()),
            ..Default::default()
        };
        let updated = dashboard.update("pub", &update).await.unwrap();
        assert_eq!(updated.title, "Renamed");
        assert_eq!(dashboard.state().recent.get("pub").unwrap().title, "Renamed");
        assert!(!dashboard.cache().contains(&QueryKey::Website("pub".into())));

        assert!(matches!(
            dashboard.update("pub", &WebsiteUpdate::default()).await,
            Err(SiteError::Validation(_))
        ));

        let ack = dashboard.delete("pub").await.unwrap();
        assert!(ack.success);
        assert!(dashboard.state().recent.is_empty());
    }

    #[tokio::test]
    async fn test_health_is_kept_in_state() {
        let mut dashboard = Dashboard::new(MockApi::new(), AppState::default());
        let health = dashboard.health().await.unwrap();
        assert!(health.is_healthy());
        assert_eq!(dashboard.state().system_health, Some(health));
    }
}
