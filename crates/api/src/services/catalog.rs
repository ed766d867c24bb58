//! Catalog routing and the Kinopoisk → TMDB enrichment step.
//!
//! Every function takes the already chosen [`Source`]. A source whose
//! client is not configured fails with 502 `"<service> not configured"`;
//! there is no silent fallback to the other catalog.

use futures::{stream, StreamExt};
use neomovies_core::error::CoreError;
use neomovies_core::mapping::{kinopoisk as kp_map, tmdb as tmdb_map};
use neomovies_core::model::{UnifiedContent, UnifiedExternalIds, UnifiedPage, UnifiedSearchItem};
use neomovies_core::source::{select_source, ContentId, Source, SourceRequest};
use neomovies_core::types::MediaType;
use neomovies_providers::kinopoisk::KpClient;
use neomovies_providers::tmdb::{Related, TmdbClient};

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Concurrent enrichment lookups per search page.
const ENRICH_CONCURRENCY: usize = 4;

// ---------------------------------------------------------------------------
// Routing
// ---------------------------------------------------------------------------

/// Pick the catalog for a request. Kinopoisk is only chosen implicitly
/// when its key is configured.
pub fn route(
    state: &AppState,
    id: Option<ContentId>,
    explicit: Option<&str>,
    language: &str,
) -> Result<Source, CoreError> {
    select_source(SourceRequest {
        id,
        explicit,
        language,
        kp_enabled: state.kinopoisk.is_some(),
    })
}

pub fn tmdb(state: &AppState) -> AppResult<&TmdbClient> {
    state
        .tmdb
        .as_deref()
        .ok_or_else(|| not_configured(Source::Tmdb))
}

pub fn kinopoisk(state: &AppState) -> AppResult<&KpClient> {
    state
        .kinopoisk
        .as_deref()
        .ok_or_else(|| not_configured(Source::Kp))
}

fn not_configured(source: Source) -> AppError {
    AppError::Upstream(format!("{} not configured", source.service_name()))
}

// ---------------------------------------------------------------------------
// Details
// ---------------------------------------------------------------------------

pub async fn get_movie(
    state: &AppState,
    id: i64,
    source: Source,
    language: &str,
) -> AppResult<UnifiedContent> {
    match source {
        Source::Kp => {
            let film = kinopoisk(state)?.get_film(id).await?;
            let mut content = kp_map::map_film(&film);
            enrich_content(state, &mut content, language).await;
            Ok(content)
        }
        Source::Tmdb => {
            let client = tmdb(state)?;
            let movie = client.get_movie(id, language).await?;
            let external = client
                .external_ids(MediaType::Movie, id)
                .await
                .inspect_err(|e| tracing::debug!(id, error = %e, "TMDB external ids unavailable"))
                .ok();
            Ok(tmdb_map::map_movie(&movie, external.as_ref()))
        }
    }
}

/// Series details.
///
/// A legacy bare id routed to Kinopoisk is upgraded to the TMDB record
/// when enrichment finds one; the returned source then reads `tmdb`.
/// Prefixed ids always stay on the catalog they name.
pub async fn get_tv(
    state: &AppState,
    id: ContentId,
    source: Source,
    language: &str,
) -> AppResult<(UnifiedContent, Source)> {
    match source {
        Source::Kp => {
            let film = kinopoisk(state)?.get_film(id.number()).await?;
            let mut content = kp_map::map_film(&film);
            enrich_content(state, &mut content, language).await;

            if let (ContentId::Bare(_), Some(tmdb_id)) = (id, content.external_ids.tmdb) {
                match tmdb_tv(state, tmdb_id, language).await {
                    Ok(mut upgraded) => {
                        upgraded.external_ids.kp = content.external_ids.kp;
                        return Ok((upgraded, Source::Tmdb));
                    }
                    Err(e) => {
                        tracing::debug!(tmdb_id, error = %e, "TMDB series upgrade failed");
                    }
                }
            }
            Ok((content, Source::Kp))
        }
        Source::Tmdb => Ok((tmdb_tv(state, id.number(), language).await?, Source::Tmdb)),
    }
}

async fn tmdb_tv(state: &AppState, id: i64, language: &str) -> AppResult<UnifiedContent> {
    let client = tmdb(state)?;
    let tv = client.get_tv(id, language).await?;
    let external = client
        .external_ids(MediaType::Tv, id)
        .await
        .inspect_err(|e| tracing::debug!(id, error = %e, "TMDB external ids unavailable"))
        .ok();
    Ok(tmdb_map::map_tv(&tv, external.as_ref()))
}

/// Fill `externalIds.tmdb` from the IMDb id. Failures leave the record as
/// it was.
pub async fn enrich_content(state: &AppState, content: &mut UnifiedContent, language: &str) {
    if content.external_ids.tmdb.is_some() {
        return;
    }
    let imdb = if content.external_ids.imdb.is_empty() {
        content.imdb_id.clone()
    } else {
        content.external_ids.imdb.clone()
    };
    if let Some(tmdb_id) = resolve_tmdb_id(state, &imdb, content.media_type, language).await {
        content.external_ids.tmdb = Some(tmdb_id);
    }
}

async fn resolve_tmdb_id(
    state: &AppState,
    imdb: &str,
    media_type: MediaType,
    language: &str,
) -> Option<i64> {
    let client = state.tmdb.as_deref()?;
    if imdb.trim().is_empty() {
        return None;
    }
    match client.find_tmdb_id(imdb, media_type, language).await {
        Ok(found) => found,
        Err(e) => {
            tracing::debug!(imdb, error = %e, "TMDB cross-walk failed");
            None
        }
    }
}

// ---------------------------------------------------------------------------
// Search
// ---------------------------------------------------------------------------

pub async fn search(
    state: &AppState,
    query: &str,
    page: u32,
    source: Source,
    language: &str,
) -> AppResult<UnifiedPage> {
    match source {
        Source::Kp => {
            let found = kinopoisk(state)?.search_films(query, page).await?;
            let mut mapped = kp_map::map_film_page(&found, i64::from(page));
            mapped.items = stream::iter(mapped.items)
                .map(|item| enrich_item(state, item, language))
                .buffered(ENRICH_CONCURRENCY)
                .collect()
                .await;
            Ok(mapped)
        }
        Source::Tmdb => {
            let found = tmdb(state)?.search_multi(query, page, language).await?;
            Ok(tmdb_map::map_multi_page(&found))
        }
    }
}

/// Kinopoisk search rows rarely carry an IMDb id; fetch the film for it
/// first, then cross-walk to TMDB.
async fn enrich_item(
    state: &AppState,
    mut item: UnifiedSearchItem,
    language: &str,
) -> UnifiedSearchItem {
    if item.external_ids.tmdb.is_some() || state.tmdb.is_none() {
        return item;
    }

    if item.external_ids.imdb.is_empty() {
        let (Some(kp_id), Some(client)) = (item.external_ids.kp, state.kinopoisk.as_deref()) else {
            return item;
        };
        match client.get_film(kp_id).await {
            Ok(film) => item.external_ids.imdb = film.imdb_id,
            Err(e) => {
                tracing::debug!(kp_id, error = %e, "Kinopoisk film lookup failed");
                return item;
            }
        }
    }

    let imdb = item.external_ids.imdb.clone();
    item.external_ids.tmdb = resolve_tmdb_id(state, &imdb, item.media_type, language).await;
    item
}

// ---------------------------------------------------------------------------
// Per-title lists and ids
// ---------------------------------------------------------------------------

/// Recommendations or similar titles.
///
/// `kp_` ids use the Kinopoisk similars list (a single page); everything
/// else goes to TMDB.
pub async fn related(
    state: &AppState,
    id: ContentId,
    media_type: MediaType,
    related: Related,
    page: u32,
    language: &str,
) -> AppResult<(UnifiedPage, Source)> {
    match id {
        ContentId::Prefixed(Source::Kp, kp_id) => {
            let found = kinopoisk(state)?.similars(kp_id).await?;
            Ok((kp_map::map_film_page(&found, 1), Source::Kp))
        }
        _ => {
            let found = tmdb(state)?
                .related(media_type, id.number(), related, page, language)
                .await?;
            Ok((tmdb_map::map_page(&found, media_type), Source::Tmdb))
        }
    }
}

pub async fn external_ids(
    state: &AppState,
    id: ContentId,
    media_type: MediaType,
    language: &str,
) -> AppResult<(UnifiedExternalIds, Source)> {
    match id {
        ContentId::Prefixed(Source::Kp, kp_id) => {
            let film = kinopoisk(state)?.get_film(kp_id).await?;
            let tmdb_id = resolve_tmdb_id(state, &film.imdb_id, media_type, language).await;
            Ok((
                UnifiedExternalIds {
                    kp: Some(film.kinopoisk_id),
                    tmdb: tmdb_id,
                    imdb: film.imdb_id,
                },
                Source::Kp,
            ))
        }
        _ => {
            let tmdb_id = id.number();
            let ids = tmdb(state)?.external_ids(media_type, tmdb_id).await?;
            Ok((
                UnifiedExternalIds {
                    kp: None,
                    tmdb: Some(tmdb_id),
                    imdb: ids.imdb_id,
                },
                Source::Tmdb,
            ))
        }
    }
}
