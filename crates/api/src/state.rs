use std::sync::Arc;

use waypoint_db::{RoadmapStore, UserKeyStore};
use waypoint_llm::RoadmapGenerator;

use crate::config::ServerConfig;
use crate::feed::FeedCache;
use crate::middleware::rate_limit::RateLimiter;
use crate::social::SocialService;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Roadmap documents.
    pub roadmaps: Arc<dyn RoadmapStore>,
    /// Per-user API key overrides.
    pub keys: Arc<dyn UserKeyStore>,
    /// Generative-model pipeline.
    pub generator: Arc<RoadmapGenerator>,
    /// Time-cached public feed.
    pub feed: Arc<FeedCache>,
    /// Likes, bookmarks, publishing, deletion, cloning and views.
    pub social: Arc<SocialService>,
    /// Per-client request budget for `/api`.
    pub rate_limiter: Arc<RateLimiter>,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
}

impl AppState {
    /// Wire the services together over the given stores.
    pub fn new(
        config: ServerConfig,
        roadmaps: Arc<dyn RoadmapStore>,
        keys: Arc<dyn UserKeyStore>,
        generator: Arc<RoadmapGenerator>,
    ) -> Self {
        let feed = Arc::new(FeedCache::new(
            Arc::clone(&roadmaps),
            std::time::Duration::from_secs(config.feed_cache_ttl_secs),
            config.feed_limit,
        ));
        let social = Arc::new(SocialService::new(Arc::clone(&roadmaps), Arc::clone(&feed)));
        let rate_limiter = Arc::new(RateLimiter::new(
            config.rate_limit_max,
            std::time::Duration::from_secs(config.rate_limit_window_secs),
        ));

        Self {
            roadmaps,
            keys,
            generator,
            feed,
            social,
            rate_limiter,
            config: Arc::new(config),
        }
    }
}
