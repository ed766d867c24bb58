//! Image-proxy URL helpers.
//!
//! Outbound: mappers rewrite every poster/backdrop into a local
//! `/api/v1/images/{size}/{path}` URL via [`build_image_proxy_url`].
//!
//! Inbound: the proxy route turns `{size}` and `{path}` back into an
//! upstream URL via [`resolve_upstream_url`], repairing malformed schemes
//! along the way.

/// Prefix of every proxied image URL.
pub const IMAGE_PROXY_PREFIX: &str = "/api/v1/images/";

/// Default size for posters.
pub const POSTER_SIZE: &str = "w500";

/// Default size for backdrops.
pub const BACKDROP_SIZE: &str = "w1280";

/// Literal path that short-circuits to the placeholder.
pub const PLACEHOLDER_PATH: &str = "placeholder.jpg";

/// Poster host for the legacy Kinopoisk size family.
pub const KP_POSTER_BASE: &str = "https://kinopoiskapiunofficial.tech/images/posters";

/// Referer sent to Kinopoisk/Yandex image hosts.
pub const KINOPOISK_REFERER: &str = "https://www.kinopoisk.ru/";

/// Cache policy for successfully proxied images.
pub const CACHE_CONTROL_IMAGE: &str = "public, max-age=31536000";

/// Cache policy for placeholders.
pub const CACHE_CONTROL_PLACEHOLDER: &str = "public, max-age=3600";

/// Disk locations probed for a placeholder image, in order.
pub const PLACEHOLDER_FILES: [&str; 3] = [
    "./assets/placeholder.jpg",
    "./public/images/placeholder.jpg",
    "./static/placeholder.jpg",
];

/// Inline placeholder served when no placeholder file exists.
pub const SVG_PLACEHOLDER: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="300" height="450" viewBox="0 0 300 450"><rect width="100%" height="100%" fill="#f0f0f0"/><text x="50%" y="50%" dominant-baseline="middle" text-anchor="middle" fill="#666" font-size="16" font-family="Arial, sans-serif">Изображение не найдено</text></svg>"##;

// ---------------------------------------------------------------------------
// Sizes
// ---------------------------------------------------------------------------

const TMDB_SIZES: [&str; 8] = [
    "w92", "w154", "w185", "w342", "w500", "w780", "w1280", "original",
];

const KP_SIZES: [&str; 3] = ["kp", "kp_small", "kp_big"];

/// A requested image size, already coerced to a supported value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSize {
    /// Catalog size (`w92` … `original`); path is a catalog path or a URL.
    Catalog(&'static str),
    /// Kinopoisk poster family; path is a native film id.
    Kinopoisk(&'static str),
}

impl ImageSize {
    /// Parse a size segment. Unknown sizes become `original`.
    pub fn parse(raw: &str) -> Self {
        if let Some(size) = TMDB_SIZES.iter().find(|s| **s == raw) {
            return ImageSize::Catalog(size);
        }
        if let Some(size) = KP_SIZES.iter().find(|s| **s == raw) {
            return ImageSize::Kinopoisk(size);
        }
        ImageSize::Catalog("original")
    }
}

// ---------------------------------------------------------------------------
// Outbound
// ---------------------------------------------------------------------------

/// Rewrite an upstream image reference into a local proxy URL.
///
/// Absolute URLs are percent-encoded into a single path segment; relative
/// catalog paths lose their leading `/`. Blank input yields `""`.
pub fn build_image_proxy_url(path_or_url: &str, size: &str) -> String {
    let trimmed = path_or_url.trim();
    if trimmed.is_empty() {
        return String::new();
    }
    let size = if size.is_empty() { POSTER_SIZE } else { size };

    if is_absolute(trimmed) {
        return format!(
            "{IMAGE_PROXY_PREFIX}{size}/{}",
            urlencoding::encode(trimmed)
        );
    }
    format!(
        "{IMAGE_PROXY_PREFIX}{size}/{}",
        trimmed.strip_prefix('/').unwrap_or(trimmed)
    )
}

/// Local poster URL for a Kinopoisk film id.
pub fn kp_poster_proxy_url(kp_id: i64) -> String {
    if kp_id <= 0 {
        return String::new();
    }
    format!("{IMAGE_PROXY_PREFIX}kp_big/{kp_id}")
}

// ---------------------------------------------------------------------------
// Inbound
// ---------------------------------------------------------------------------

/// Repair malformed schemes in an already decoded path.
///
/// `//host/x` → `https://host/x`; `https:/host` → `https://host`;
/// `http:/host` → `http://host`. Percent sequences are left alone: the
/// router has decoded the path once and a literal `%25` must survive.
pub fn normalize_image_path(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("//") {
        return format!("https://{rest}");
    }
    for scheme in ["https:", "http:"] {
        if let Some(rest) = path.strip_prefix(scheme) {
            if !rest.starts_with("//") {
                return format!("{scheme}//{}", rest.trim_start_matches('/'));
            }
        }
    }
    path.to_string()
}

/// Resolve the upstream URL for a proxy request.
pub fn resolve_upstream_url(size: ImageSize, raw_path: &str, catalog_base: &str) -> String {
    match size {
        ImageSize::Kinopoisk(kind) => {
            let id = raw_path.trim_start_matches('/');
            format!("{KP_POSTER_BASE}/{kind}/{id}.jpg")
        }
        ImageSize::Catalog(size) => {
            let path = normalize_image_path(raw_path);
            if is_absolute(&path) {
                path
            } else {
                format!(
                    "{}/{size}/{}",
                    catalog_base.trim_end_matches('/'),
                    path.trim_start_matches('/')
                )
            }
        }
    }
}

/// Referer for the first fetch attempt.
///
/// Kinopoisk and Yandex hosts get the Kinopoisk site; anything else gets
/// its own origin.
pub fn referer_for(url: &str) -> Option<String> {
    let (scheme, rest) = url.split_once("://")?;
    let host = rest
        .split(['/', '?', '#'])
        .next()
        .filter(|h| !h.is_empty())?;

    let lower = host.to_ascii_lowercase();
    if lower.contains("kinopoisk") || lower.contains("yandex") {
        return Some(KINOPOISK_REFERER.to_string());
    }
    Some(format!("{scheme}://{host}/"))
}

/// Whether a proxied URL satisfies the local-only invariant.
pub fn is_local_image_url(url: &str) -> bool {
    url.is_empty() || url.starts_with(IMAGE_PROXY_PREFIX)
}

fn is_absolute(s: &str) -> bool {
    s.starts_with("http://") || s.starts_with("https://")
}
