use std::sync::Arc;
use std::time::Instant;

use neomovies_core::error::CoreError;
use neomovies_db::{DbHandle, Repositories};
use neomovies_events::{Dispatcher, Mailer, ReactionMirror};
use neomovies_providers::cub::CubClient;
use neomovies_providers::google::GoogleOAuthClient;
use neomovies_providers::images::ImageFetcher;
use neomovies_providers::kinopoisk::KpClient;
use neomovies_providers::players::alloha::AllohaClient;
use neomovies_providers::players::hdvb::HdvbClient;
use neomovies_providers::players::iframevideo::IframeVideoClient;
use neomovies_providers::players::lumex::LumexPlayer;
use neomovies_providers::players::rgshows::RgShowsClient;
use neomovies_providers::players::vibix::VibixClient;
use neomovies_providers::redapi::RedApiClient;
use neomovies_providers::tmdb::TmdbClient;
use neomovies_providers::{ProviderError, ProviderResult};

use crate::config::ServerConfig;
use crate::error::{AppError, AppResult};

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: every client sits behind an `Arc`. A client whose
/// credential is not configured is `None`; the accessors turn that into
/// the matching misconfiguration error.
#[derive(Clone)]
pub struct AppState {
    /// Immutable server configuration.
    pub config: Arc<ServerConfig>,
    /// Lazily connected repositories.
    pub db: DbHandle,
    /// Primary catalog.
    pub tmdb: Option<Arc<TmdbClient>>,
    /// Secondary (Russian-language) catalog.
    pub kinopoisk: Option<Arc<KpClient>>,
    /// Torrent indexer.
    pub redapi: Arc<RedApiClient>,
    pub alloha: Option<Arc<AllohaClient>>,
    pub lumex: Option<Arc<LumexPlayer>>,
    pub vibix: Option<Arc<VibixClient>>,
    pub hdvb: Option<Arc<HdvbClient>>,
    pub rgshows: Arc<RgShowsClient>,
    pub iframevideo: Arc<IframeVideoClient>,
    /// Upstream fetcher behind the image proxy.
    pub images: Arc<ImageFetcher>,
    /// Public reaction counters.
    pub cub: Arc<CubClient>,
    pub reaction_mirror: ReactionMirror,
    pub google: Option<Arc<GoogleOAuthClient>>,
    pub mailer: Option<Arc<Mailer>>,
    /// Background worker pool for fire-and-forget side effects.
    pub dispatcher: Dispatcher,
    /// Process start, for `uptime` in the health check.
    pub started_at: Instant,
}

impl AppState {
    /// Construct every client from `config`.
    ///
    /// Fails only when an HTTP client cannot be built. A mailer that cannot
    /// be built is logged and left out; registration then skips the email.
    pub fn build(config: ServerConfig, db: DbHandle, dispatcher: Dispatcher) -> ProviderResult<Self> {
        let up = &config.upstreams;

        let tmdb = up
            .tmdb_access_token
            .clone()
            .map(|token| TmdbClient::new(up.tmdb_base_url.clone(), token).map(Arc::new))
            .transpose()?;
        let kinopoisk = up
            .kpapi_key
            .clone()
            .map(|key| KpClient::new(up.kpapi_base_url.clone(), key).map(Arc::new))
            .transpose()?;
        let alloha = up
            .alloha_token
            .clone()
            .map(|token| AllohaClient::new(up.alloha_base_url.clone(), token).map(Arc::new))
            .transpose()?;
        let vibix = up
            .vibix_token
            .clone()
            .map(|token| VibixClient::new(up.vibix_host.clone(), token).map(Arc::new))
            .transpose()?;
        let hdvb = up
            .hdvb_token
            .clone()
            .map(|token| HdvbClient::new(up.hdvb_base_url.clone(), token).map(Arc::new))
            .transpose()?;
        let lumex = up
            .lumex_url
            .clone()
            .map(|url| Arc::new(LumexPlayer::new(url)));

        let redapi = Arc::new(RedApiClient::new(
            up.redapi_base_url.clone(),
            up.redapi_key.clone(),
        )?);
        let rgshows = Arc::new(RgShowsClient::new(up.rgshows_base_url.clone())?);
        let iframevideo = Arc::new(IframeVideoClient::new(
            up.iframevideo_api_host.clone(),
            up.iframevideo_cdn_host.clone(),
        )?);
        let images = Arc::new(ImageFetcher::new()?);
        let cub = Arc::new(CubClient::new(up.cub_base_url.clone())?);
        let reaction_mirror = ReactionMirror::new(Arc::clone(&cub), dispatcher.clone());

        let google = config
            .google
            .clone()
            .map(|g| GoogleOAuthClient::new(g).map(Arc::new))
            .transpose()?;

        let mailer = config.email.clone().and_then(|email| match Mailer::new(email) {
            Ok(mailer) => Some(Arc::new(mailer)),
            Err(e) => {
                tracing::error!(error = %e, "Failed to build SMTP transport, emails disabled");
                None
            }
        });

        Ok(Self {
            config: Arc::new(config),
            db,
            tmdb,
            kinopoisk,
            redapi,
            alloha,
            lumex,
            vibix,
            hdvb,
            rgshows,
            iframevideo,
            images,
            cub,
            reaction_mirror,
            google,
            mailer,
            dispatcher,
            started_at: Instant::now(),
        })
    }

    /// Repositories, connecting on first use.
    pub async fn repos(&self) -> AppResult<Repositories> {
        Ok(self.db.repos().await?)
    }

    /// The primary catalog, required by catalog-only endpoints.
    pub fn tmdb(&self) -> AppResult<&TmdbClient> {
        self.tmdb
            .as_deref()
            .ok_or(AppError::Provider(ProviderError::NotConfigured("TMDB_ACCESS_TOKEN")))
    }

    pub fn alloha(&self) -> AppResult<&AllohaClient> {
        self.alloha
            .as_deref()
            .ok_or(AppError::Provider(ProviderError::NotConfigured("ALLOHA_TOKEN")))
    }

    pub fn lumex(&self) -> AppResult<&LumexPlayer> {
        self.lumex
            .as_deref()
            .ok_or(AppError::Provider(ProviderError::NotConfigured("LUMEX_URL")))
    }

    pub fn vibix(&self) -> AppResult<&VibixClient> {
        self.vibix
            .as_deref()
            .ok_or(AppError::Provider(ProviderError::NotConfigured("VIBIX_TOKEN")))
    }

    pub fn hdvb(&self) -> AppResult<&HdvbClient> {
        self.hdvb
            .as_deref()
            .ok_or(AppError::Provider(ProviderError::NotConfigured("HDVB_TOKEN")))
    }

    pub fn google(&self) -> AppResult<&GoogleOAuthClient> {
        self.google
            .as_deref()
            .ok_or(AppError::Core(CoreError::Misconfigured("GOOGLE_CLIENT_ID")))
    }
}
