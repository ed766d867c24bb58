//! Indexer searches on top of the pure pipeline in
//! `neomovies_core::torrent`.

use neomovies_core::mapping::year_of;
use neomovies_core::torrent::season::matches_season;
use neomovies_core::torrent::{
    available_seasons, filter_by_content_type, merge_season_fallback, needs_season_fallback,
    ContentType, IndexerQuery, TorrentKind, TorrentResult,
};

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Titles and year used to key an indexer query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TitleMeta {
    pub title: String,
    pub original_title: String,
    pub year: String,
}

impl TitleMeta {
    fn is_empty(&self) -> bool {
        self.title.trim().is_empty() && self.original_title.trim().is_empty()
    }
}

/// Base query for a title search of the given kind.
pub fn title_query(meta: &TitleMeta, kind: TorrentKind) -> IndexerQuery {
    IndexerQuery::new()
        .param("title", meta.title.as_str())
        .param("title_original", meta.original_title.as_str())
        .param("year", meta.year.as_str())
        .kind(kind)
}

/// Resolve titles for an IMDb id: Alloha first, then the TMDB `find`
/// endpoint in Russian.
pub async fn resolve_imdb_meta(
    state: &AppState,
    imdb_id: &str,
    kind: TorrentKind,
) -> AppResult<TitleMeta> {
    if let Some(alloha) = state.alloha.as_deref() {
        match alloha.lookup_meta(imdb_id).await {
            Ok(meta) => {
                let meta = TitleMeta {
                    title: meta.title,
                    original_title: meta.original_title,
                    year: meta.year,
                };
                if !meta.is_empty() {
                    return Ok(meta);
                }
            }
            Err(e) => tracing::debug!(imdb_id, error = %e, "Alloha title lookup failed"),
        }
    }

    let not_found = || AppError::NotFound(format!("No results found for IMDB ID: {imdb_id}"));
    let Some(tmdb) = state.tmdb.as_deref() else {
        return Err(not_found());
    };

    let found = tmdb.find_by_imdb(imdb_id, "ru-RU").await?;
    let meta = match kind {
        TorrentKind::Movie => found.movie_results.first().map(|row| TitleMeta {
            title: row.title.clone(),
            original_title: row.original_title.clone(),
            year: year_text(&row.release_date),
        }),
        TorrentKind::Series | TorrentKind::Anime => found.tv_results.first().map(|row| TitleMeta {
            title: row.name.clone(),
            original_title: row.original_name.clone(),
            year: year_text(&row.first_air_date),
        }),
    };
    meta.filter(|m| !m.is_empty()).ok_or_else(not_found)
}

fn year_text(date: &str) -> String {
    match year_of(date) {
        0 => String::new(),
        year => year.to_string(),
    }
}

/// Run a query; for a season-scoped series query with few rows, repeat it
/// without the season and keep the rows that match the season.
pub async fn search_with_season_fallback(
    state: &AppState,
    query: IndexerQuery,
    season: Option<i32>,
) -> AppResult<Vec<TorrentResult>> {
    let initial = state.redapi.search(&query).await?;
    let Some(season) = season.filter(|_| needs_season_fallback(season, initial.len())) else {
        return Ok(initial);
    };

    tracing::debug!(season, found = initial.len(), "Season search sparse, retrying unscoped");
    match state.redapi.search(&query.without_season()).await {
        Ok(fallback) => {
            let fallback = fallback
                .into_iter()
                .filter(|row| matches_season(row, season))
                .collect();
            Ok(merge_season_fallback(initial, fallback))
        }
        Err(e) => {
            tracing::warn!(error = %e, "Season fallback query failed");
            Ok(initial)
        }
    }
}

/// Title search restricted to one kind of release.
pub async fn search_titles(
    state: &AppState,
    meta: &TitleMeta,
    kind: TorrentKind,
    season: Option<i32>,
) -> AppResult<Vec<TorrentResult>> {
    let rows = match kind {
        TorrentKind::Series => {
            let query = title_query(meta, kind).season(season);
            search_with_season_fallback(state, query, season).await?
        }
        TorrentKind::Movie | TorrentKind::Anime => {
            state.redapi.search(&title_query(meta, kind)).await?
        }
    };
    Ok(filter_by_content_type(rows, content_type_of(kind)))
}

/// Seasons present across every series release of a title.
pub async fn seasons(state: &AppState, meta: &TitleMeta) -> AppResult<Vec<i32>> {
    let rows = state
        .redapi
        .search(&title_query(meta, TorrentKind::Series))
        .await?;
    Ok(available_seasons(&rows))
}

pub fn content_type_of(kind: TorrentKind) -> ContentType {
    match kind {
        TorrentKind::Movie => ContentType::Movie,
        TorrentKind::Series => ContentType::Serial,
        TorrentKind::Anime => ContentType::Anime,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_query_skips_blank_fields() {
        let meta = TitleMeta {
            title: "Матрица".into(),
            original_title: String::new(),
            year: "1999".into(),
        };
        let query = title_query(&meta, TorrentKind::Movie);
        assert_eq!(query.get("title"), Some("Матрица"));
        assert_eq!(query.get("title_original"), None);
        assert_eq!(query.get("year"), Some("1999"));
        assert_eq!(query.get("is_serial"), Some("1"));
    }

    #[test]
    fn year_text_handles_missing_dates() {
        assert_eq!(year_text("2008-01-20"), "2008");
        assert_eq!(year_text(""), "");
    }

    #[test]
    fn kinds_map_to_content_filters() {
        assert_eq!(content_type_of(TorrentKind::Series), ContentType::Serial);
        assert_eq!(content_type_of(TorrentKind::Anime), ContentType::Anime);
    }
}
