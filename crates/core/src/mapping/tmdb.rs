use crate::images::{build_image_proxy_url, BACKDROP_SIZE, POSTER_SIZE};
use crate::model::{
    UnifiedContent, UnifiedEpisode, UnifiedExternalIds, UnifiedGenre, UnifiedPage,
    UnifiedSearchItem, UnifiedSeason,
};
use crate::source::Source;
use crate::tmdb::{
    TmdbExternalIds, TmdbGenre, TmdbListItem, TmdbMovie, TmdbPage, TmdbProductionCountry,
    TmdbSeasonDetails, TmdbSeasonSummary, TmdbTvShow,
};
use crate::types::MediaType;

use super::{first_non_blank, genre_from_name};

/// Map `GET /movie/{id}` (plus its external ids) to unified content.
pub fn map_movie(movie: &TmdbMovie, external: Option<&TmdbExternalIds>) -> UnifiedContent {
    let imdb = imdb_of(external, &movie.imdb_id);

    UnifiedContent {
        id: movie.id.to_string(),
        source_id: Source::Tmdb.source_id(movie.id),
        title: movie.title.clone(),
        original_title: movie.original_title.clone(),
        description: movie.overview.clone(),
        release_date: movie.release_date.clone(),
        end_date: None,
        media_type: MediaType::Movie,
        genres: map_genres(&movie.genres),
        rating: movie.vote_average,
        poster_url: build_image_proxy_url(&movie.poster_path, POSTER_SIZE),
        backdrop_url: build_image_proxy_url(&movie.backdrop_path, BACKDROP_SIZE),
        director: String::new(),
        cast: Vec::new(),
        duration: movie.runtime,
        country: first_country(&movie.production_countries),
        language: movie.original_language.clone(),
        budget: Some(movie.budget).filter(|b| *b > 0),
        revenue: Some(movie.revenue).filter(|r| *r > 0),
        imdb_id: imdb.clone(),
        external_ids: UnifiedExternalIds {
            kp: None,
            tmdb: Some(movie.id),
            imdb,
        },
        seasons: Vec::new(),
    }
}

/// Map `GET /tv/{id}` (plus its external ids) to unified content.
pub fn map_tv(tv: &TmdbTvShow, external: Option<&TmdbExternalIds>) -> UnifiedContent {
    let imdb = imdb_of(external, "");
    let end_date = Some(tv.last_air_date.trim())
        .filter(|d| !d.is_empty())
        .map(str::to_string);

    UnifiedContent {
        id: tv.id.to_string(),
        source_id: Source::Tmdb.source_id(tv.id),
        title: tv.name.clone(),
        original_title: tv.original_name.clone(),
        description: tv.overview.clone(),
        release_date: tv.first_air_date.clone(),
        end_date,
        media_type: MediaType::Tv,
        genres: map_genres(&tv.genres),
        rating: tv.vote_average,
        poster_url: build_image_proxy_url(&tv.poster_path, POSTER_SIZE),
        backdrop_url: build_image_proxy_url(&tv.backdrop_path, BACKDROP_SIZE),
        director: String::new(),
        cast: Vec::new(),
        duration: tv.episode_run_time.first().copied().unwrap_or(0),
        country: first_country(&tv.production_countries),
        language: tv.original_language.clone(),
        budget: None,
        revenue: None,
        imdb_id: imdb.clone(),
        external_ids: UnifiedExternalIds {
            kp: None,
            tmdb: Some(tv.id),
            imdb,
        },
        seasons: tv.seasons.iter().map(map_season_summary).collect(),
    }
}

pub fn map_season_summary(season: &TmdbSeasonSummary) -> UnifiedSeason {
    UnifiedSeason {
        id: season.id.to_string(),
        source_id: Source::Tmdb.source_id(season.id),
        name: season.name.clone(),
        season_number: season.season_number,
        episode_count: season.episode_count,
        release_date: season.air_date.clone(),
        poster_url: build_image_proxy_url(&season.poster_path, POSTER_SIZE),
        episodes: Vec::new(),
    }
}

/// Map a season with its episodes (`GET /tv/{id}/season/{n}`).
pub fn map_season_details(season: &TmdbSeasonDetails) -> UnifiedSeason {
    let episodes: Vec<UnifiedEpisode> = season
        .episodes
        .iter()
        .map(|e| UnifiedEpisode {
            id: e.id.to_string(),
            source_id: Source::Tmdb.source_id(e.id),
            name: e.name.clone(),
            episode_number: e.episode_number,
            season_number: e.season_number,
            air_date: e.air_date.clone(),
            duration: e.runtime,
            description: e.overview.clone(),
            still_url: build_image_proxy_url(&e.still_path, POSTER_SIZE),
        })
        .collect();

    UnifiedSeason {
        id: season.id.to_string(),
        source_id: Source::Tmdb.source_id(season.id),
        name: season.name.clone(),
        season_number: season.season_number,
        episode_count: episodes.len() as i32,
        release_date: season
            .episodes
            .first()
            .map(|e| e.air_date.clone())
            .unwrap_or_default(),
        poster_url: String::new(),
        episodes,
    }
}

/// Map one list row. `fallback` is used when the row has no `media_type`.
///
/// Returns `None` for rows that are neither a movie nor a series.
pub fn map_list_item(item: &TmdbListItem, fallback: MediaType) -> Option<UnifiedSearchItem> {
    let media_type = match item.media_type.as_str() {
        "" => fallback,
        "movie" => MediaType::Movie,
        "tv" => MediaType::Tv,
        _ => return None,
    };

    let (title, release_date) = match media_type {
        MediaType::Movie => (
            first_non_blank(&[item.title.as_str(), item.name.as_str()]),
            &item.release_date,
        ),
        MediaType::Tv => (
            first_non_blank(&[item.name.as_str(), item.title.as_str()]),
            &item.first_air_date,
        ),
    };

    Some(UnifiedSearchItem {
        id: item.id.to_string(),
        source_id: Source::Tmdb.source_id(item.id),
        title: title.to_string(),
        media_type,
        original_type: item.media_type.clone(),
        release_date: release_date.clone(),
        poster_url: build_image_proxy_url(&item.poster_path, POSTER_SIZE),
        rating: item.vote_average,
        description: item.overview.clone(),
        external_ids: UnifiedExternalIds {
            kp: None,
            tmdb: Some(item.id),
            imdb: String::new(),
        },
    })
}

/// Map a single-type list page (search, popular, discover, ...).
pub fn map_page(page: &TmdbPage, media_type: MediaType) -> UnifiedPage {
    UnifiedPage {
        items: page
            .results
            .iter()
            .filter_map(|item| map_list_item(item, media_type))
            .collect(),
        page: page.page,
        total_pages: page.total_pages,
        total_results: page.total_results,
    }
}

/// Map a multi-search page, keeping only movies and series.
///
/// The caller is expected to have already filtered people and untitled
/// rows; `total_results` reflects the filtered count.
pub fn map_multi_page(page: &TmdbPage) -> UnifiedPage {
    let items: Vec<UnifiedSearchItem> = page
        .results
        .iter()
        .filter(|item| matches!(item.media_type.as_str(), "movie" | "tv"))
        .filter_map(|item| map_list_item(item, MediaType::Movie))
        .collect();

    UnifiedPage {
        total_results: page.total_results,
        page: page.page,
        total_pages: page.total_pages,
        items,
    }
}

fn map_genres(genres: &[TmdbGenre]) -> Vec<UnifiedGenre> {
    genres
        .iter()
        .map(|g| genre_from_name(&g.name, g.id))
        .collect()
}

fn first_country(countries: &[TmdbProductionCountry]) -> String {
    countries
        .first()
        .map(|c| first_non_blank(&[c.name.as_str(), c.iso_3166_1.as_str()]).to_string())
        .unwrap_or_default()
}

fn imdb_of(external: Option<&TmdbExternalIds>, fallback: &str) -> String {
    external
        .map(|e| e.imdb_id.as_str())
        .filter(|id| !id.is_empty())
        .unwrap_or(fallback)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::images::is_local_image_url;

    fn shawshank() -> TmdbMovie {
        serde_json::from_str(
            r#"{
                "id": 278,
                "title": "Побег из Шоушенка",
                "original_title": "The Shawshank Redemption",
                "overview": "Two imprisoned men bond...",
                "poster_path": "/q6y0Go1tsGEsmtFryDOJo3dEmqu.jpg",
                "backdrop_path": null,
                "release_date": "1994-09-23",
                "genres": [{"id": 18, "name": "Drama"}, {"id": 80, "name": "Crime Story"}],
                "vote_average": 8.7,
                "original_language": "en",
                "runtime": 142,
                "budget": 25000000,
                "revenue": 0,
                "production_countries": [{"iso_3166_1": "US", "name": ""}]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn movie_maps_with_tmdb_identity() {
        let external = TmdbExternalIds {
            id: 278,
            imdb_id: "tt0111161".into(),
            ..Default::default()
        };
        let unified = map_movie(&shawshank(), Some(&external));

        assert_eq!(unified.source_id, "tmdb_278");
        assert_eq!(unified.id, "278");
        assert_eq!(unified.media_type, MediaType::Movie);
        assert_eq!(unified.external_ids.tmdb, Some(278));
        assert_eq!(unified.external_ids.kp, None);
        assert_eq!(unified.imdb_id, "tt0111161");
        assert_eq!(unified.genres[1].id, "crime-story");
        assert_eq!(unified.budget, Some(25_000_000));
        assert_eq!(unified.revenue, None);
        assert_eq!(unified.country, "US");
        assert_eq!(unified.duration, 142);
        assert!(unified.seasons.is_empty());
    }

    #[test]
    fn movie_images_are_local() {
        let unified = map_movie(&shawshank(), None);
        assert_eq!(
            unified.poster_url,
            "/api/v1/images/w500/q6y0Go1tsGEsmtFryDOJo3dEmqu.jpg"
        );
        assert_eq!(unified.backdrop_url, "");
        assert!(is_local_image_url(&unified.poster_url));
    }

    #[test]
    fn tv_uses_first_runtime_and_optional_end_date() {
        let tv: TmdbTvShow = serde_json::from_str(
            r#"{
                "id": 1399, "name": "Игра престолов", "original_name": "Game of Thrones",
                "first_air_date": "2011-04-17", "last_air_date": "",
                "episode_run_time": [60, 55],
                "seasons": [{"id": 3624, "name": "Season 1", "season_number": 1,
                             "episode_count": 10, "air_date": "2011-04-17", "poster_path": "/s1.jpg"}]
            }"#,
        )
        .unwrap();
        let unified = map_tv(&tv, None);

        assert_eq!(unified.media_type, MediaType::Tv);
        assert_eq!(unified.duration, 60);
        assert_eq!(unified.end_date, None);
        assert_eq!(unified.seasons.len(), 1);
        assert_eq!(unified.seasons[0].source_id, "tmdb_3624");
        assert_eq!(unified.seasons[0].poster_url, "/api/v1/images/w500/s1.jpg");
    }

    #[test]
    fn tv_end_date_set_when_present() {
        let tv = TmdbTvShow {
            id: 1,
            last_air_date: "2019-05-19".into(),
            ..Default::default()
        };
        assert_eq!(map_tv(&tv, None).end_date.as_deref(), Some("2019-05-19"));
    }

    #[test]
    fn multi_page_drops_people() {
        let page: TmdbPage = serde_json::from_str(
            r#"{"page": 1, "total_pages": 1, "total_results": 2, "results": [
                {"id": 603, "media_type": "movie", "title": "The Matrix", "release_date": "1999-03-31"},
                {"id": 2, "media_type": "tv", "name": "Matrix", "first_air_date": "1993-03-01"},
                {"id": 6384, "media_type": "person", "name": "Keanu Reeves"}
            ]}"#,
        )
        .unwrap();
        let mapped = map_multi_page(&page);

        assert_eq!(mapped.items.len(), 2);
        assert_eq!(mapped.items[0].title, "The Matrix");
        assert_eq!(mapped.items[1].media_type, MediaType::Tv);
        assert_eq!(mapped.items[1].release_date, "1993-03-01");
        assert_eq!(mapped.items[1].original_type, "tv");
    }

    #[test]
    fn list_rows_without_media_type_use_fallback() {
        let item = TmdbListItem {
            id: 7,
            name: "Show".into(),
            first_air_date: "2020-01-01".into(),
            ..Default::default()
        };
        let mapped = map_list_item(&item, MediaType::Tv).unwrap();
        assert_eq!(mapped.title, "Show");
        assert_eq!(mapped.source_id, "tmdb_7");
        assert_eq!(mapped.original_type, "");
    }
}
