use std::path::PathBuf;

use neomovies_core::images::PLACEHOLDER_FILES;
use neomovies_events::EmailConfig;
use neomovies_providers::cub::CubClient;
use neomovies_providers::google::GoogleOAuthConfig;
use neomovies_providers::kinopoisk::KpClient;
use neomovies_providers::players::alloha::AllohaClient;
use neomovies_providers::players::hdvb::HdvbClient;
use neomovies_providers::players::iframevideo::IframeVideoClient;
use neomovies_providers::players::rgshows::RgShowsClient;
use neomovies_providers::players::vibix::VibixClient;
use neomovies_providers::redapi::RedApiClient;
use neomovies_providers::tmdb::TmdbClient;

use crate::auth::jwt::JwtConfig;

/// Default TMDB image CDN.
pub const DEFAULT_TMDB_IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p";

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development. A provider
/// whose credential is absent is treated as not configured.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// How long shutdown waits for background jobs, in seconds (default: `10`).
    pub shutdown_timeout_secs: u64,
    /// Public base URL of this API (default: `http://localhost:3000`).
    pub base_url: String,
    /// `development` or `production`.
    pub node_env: String,
    /// Front-end origin used for OAuth redirects.
    pub frontend_url: Option<String>,
    /// First non-empty of `MONGO_URI`, `MONGODB_URI`, `DATABASE_URL`, `MONGO_URL`.
    pub mongo_uri: Option<String>,
    pub mongo_db_name: String,
    /// Upstream endpoints and credentials.
    pub upstreams: UpstreamConfig,
    /// Set only when both client id and secret are present.
    pub google: Option<GoogleOAuthConfig>,
    /// Set only when the Gmail credentials are present.
    pub email: Option<EmailConfig>,
    /// Placeholder image files, probed in order.
    pub placeholder_files: Vec<PathBuf>,
    /// JWT token configuration (secret, expiry durations).
    pub jwt: JwtConfig,
}

/// Endpoints and credentials of every upstream provider.
#[derive(Debug, Clone)]
pub struct UpstreamConfig {
    pub tmdb_access_token: Option<String>,
    pub tmdb_base_url: String,
    pub tmdb_image_base_url: String,
    pub kpapi_key: Option<String>,
    pub kpapi_base_url: String,
    pub redapi_base_url: String,
    pub redapi_key: Option<String>,
    pub alloha_token: Option<String>,
    pub alloha_base_url: String,
    pub lumex_url: Option<String>,
    pub vibix_host: String,
    pub vibix_token: Option<String>,
    pub hdvb_token: Option<String>,
    pub hdvb_base_url: String,
    pub rgshows_base_url: String,
    pub iframevideo_api_host: String,
    pub iframevideo_cdn_host: String,
    pub cub_base_url: String,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            tmdb_access_token: None,
            tmdb_base_url: TmdbClient::DEFAULT_BASE_URL.to_string(),
            tmdb_image_base_url: DEFAULT_TMDB_IMAGE_BASE_URL.to_string(),
            kpapi_key: None,
            kpapi_base_url: KpClient::DEFAULT_BASE_URL.to_string(),
            redapi_base_url: RedApiClient::DEFAULT_BASE_URL.to_string(),
            redapi_key: None,
            alloha_token: None,
            alloha_base_url: AllohaClient::DEFAULT_BASE_URL.to_string(),
            lumex_url: None,
            vibix_host: VibixClient::DEFAULT_HOST.to_string(),
            vibix_token: None,
            hdvb_token: None,
            hdvb_base_url: HdvbClient::DEFAULT_BASE_URL.to_string(),
            rgshows_base_url: RgShowsClient::DEFAULT_BASE_URL.to_string(),
            iframevideo_api_host: IframeVideoClient::DEFAULT_API_HOST.to_string(),
            iframevideo_cdn_host: IframeVideoClient::DEFAULT_CDN_HOST.to_string(),
            cub_base_url: CubClient::DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            request_timeout_secs: 30,
            shutdown_timeout_secs: 10,
            base_url: "http://localhost:3000".to_string(),
            node_env: "development".to_string(),
            frontend_url: None,
            mongo_uri: None,
            mongo_db_name: "database".to_string(),
            upstreams: UpstreamConfig::default(),
            google: None,
            email: None,
            placeholder_files: PLACEHOLDER_FILES.iter().map(PathBuf::from).collect(),
            jwt: JwtConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                 | Default                                   |
    /// |-------------------------|-------------------------------------------|
    /// | `HOST`                  | `0.0.0.0`                                 |
    /// | `PORT`                  | `3000`                                    |
    /// | `REQUEST_TIMEOUT_SECS`  | `30`                                      |
    /// | `SHUTDOWN_TIMEOUT_SECS` | `10`                                      |
    /// | `BASE_URL`              | `http://localhost:3000`                   |
    /// | `NODE_ENV`              | `development`                             |
    /// | `FRONTEND_URL`          | --                                        |
    /// | `MONGO_URI` & aliases   | --                                        |
    /// | `MONGO_DB_NAME`         | `database`                                |
    /// | `TMDB_ACCESS_TOKEN`     | --                                        |
    /// | `TMDB_BASE_URL`         | `https://api.themoviedb.org/3`            |
    /// | `TMDB_IMAGE_BASE_URL`   | `https://image.tmdb.org/t/p`              |
    /// | `KPAPI_KEY`             | --                                        |
    /// | `KPAPI_BASE_URL`        | `https://kinopoiskapiunofficial.tech/api` |
    /// | `REDAPI_BASE_URL`       | `http://redapi.cfhttp.top`                |
    /// | `REDAPI_KEY`            | --                                        |
    /// | `ALLOHA_TOKEN`          | --                                        |
    /// | `LUMEX_URL`             | --                                        |
    /// | `VIBIX_HOST`            | `https://vibix.org`                       |
    /// | `VIBIX_TOKEN`           | --                                        |
    /// | `HDVB_TOKEN`            | --                                        |
    /// | `CUB_BASE_URL`          | `https://cub.rip/api`                     |
    /// | `GOOGLE_CLIENT_ID`      | --                                        |
    /// | `GOOGLE_CLIENT_SECRET`  | --                                        |
    /// | `GOOGLE_REDIRECT_URL`   | `{BASE_URL}/api/v1/auth/google/callback`  |
    ///
    /// Mail settings come from [`EmailConfig::from_env`], JWT settings from
    /// [`JwtConfig::from_env`].
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let upstream_defaults = UpstreamConfig::default();

        let host = env_or("HOST", &defaults.host);

        let port: u16 = env_or("PORT", "3000")
            .parse()
            .expect("PORT must be a valid u16");

        let request_timeout_secs: u64 = env_or("REQUEST_TIMEOUT_SECS", "30")
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let shutdown_timeout_secs: u64 = env_or("SHUTDOWN_TIMEOUT_SECS", "10")
            .parse()
            .expect("SHUTDOWN_TIMEOUT_SECS must be a valid u64");

        let base_url = env_or("BASE_URL", &defaults.base_url)
            .trim_end_matches('/')
            .to_string();

        let mongo_uri = ["MONGO_URI", "MONGODB_URI", "DATABASE_URL", "MONGO_URL"]
            .into_iter()
            .find_map(env_opt);

        let upstreams = UpstreamConfig {
            tmdb_access_token: env_opt("TMDB_ACCESS_TOKEN"),
            tmdb_base_url: env_or("TMDB_BASE_URL", &upstream_defaults.tmdb_base_url),
            tmdb_image_base_url: env_or(
                "TMDB_IMAGE_BASE_URL",
                &upstream_defaults.tmdb_image_base_url,
            ),
            kpapi_key: env_opt("KPAPI_KEY"),
            kpapi_base_url: env_or("KPAPI_BASE_URL", &upstream_defaults.kpapi_base_url),
            redapi_base_url: env_or("REDAPI_BASE_URL", &upstream_defaults.redapi_base_url),
            redapi_key: env_opt("REDAPI_KEY"),
            alloha_token: env_opt("ALLOHA_TOKEN"),
            alloha_base_url: env_or("ALLOHA_BASE_URL", &upstream_defaults.alloha_base_url),
            lumex_url: env_opt("LUMEX_URL"),
            vibix_host: env_or("VIBIX_HOST", &upstream_defaults.vibix_host),
            vibix_token: env_opt("VIBIX_TOKEN"),
            hdvb_token: env_opt("HDVB_TOKEN"),
            hdvb_base_url: env_or("HDVB_BASE_URL", &upstream_defaults.hdvb_base_url),
            rgshows_base_url: env_or("RGSHOWS_BASE_URL", &upstream_defaults.rgshows_base_url),
            iframevideo_api_host: env_or(
                "IFRAMEVIDEO_API_HOST",
                &upstream_defaults.iframevideo_api_host,
            ),
            iframevideo_cdn_host: env_or(
                "IFRAMEVIDEO_CDN_HOST",
                &upstream_defaults.iframevideo_cdn_host,
            ),
            cub_base_url: env_or("CUB_BASE_URL", &upstream_defaults.cub_base_url),
        };

        let google = match (env_opt("GOOGLE_CLIENT_ID"), env_opt("GOOGLE_CLIENT_SECRET")) {
            (Some(client_id), Some(client_secret)) => Some(GoogleOAuthConfig {
                client_id,
                client_secret,
                redirect_url: env_opt("GOOGLE_REDIRECT_URL")
                    .unwrap_or_else(|| format!("{base_url}/api/v1/auth/google/callback")),
            }),
            _ => None,
        };

        Self {
            host,
            port,
            request_timeout_secs,
            shutdown_timeout_secs,
            base_url,
            node_env: env_or("NODE_ENV", &defaults.node_env),
            frontend_url: env_opt("FRONTEND_URL").map(|u| u.trim_end_matches('/').to_string()),
            mongo_uri,
            mongo_db_name: env_or("MONGO_DB_NAME", &defaults.mongo_db_name),
            upstreams,
            google,
            email: EmailConfig::from_env(),
            placeholder_files: defaults.placeholder_files,
            jwt: JwtConfig::from_env(),
        }
    }

    pub fn is_production(&self) -> bool {
        self.node_env.eq_ignore_ascii_case("production")
    }
}

fn env_or(key: &str, default: &str) -> String {
    env_opt(key).unwrap_or_else(|| default.to_string())
}

/// A variable that is set and not blank.
fn env_opt(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
