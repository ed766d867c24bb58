use crate::images::{build_image_proxy_url, kp_poster_proxy_url, BACKDROP_SIZE};
use crate::kinopoisk::{media_type_of, KpFilm, KpFilmPage, KpFilmShort, KpGenre};
use crate::model::{UnifiedContent, UnifiedExternalIds, UnifiedGenre, UnifiedPage, UnifiedSearchItem};
use crate::source::Source;
use crate::types::MediaType;

use super::{first_non_blank, genre_from_name, year_text_to_date, year_to_date};

/// Map a full Kinopoisk film to unified content.
///
/// Posters point at the `kp_big` proxy size keyed by the native id; the
/// TMDB id is left empty for the enricher.
pub fn map_film(film: &KpFilm) -> UnifiedContent {
    let media_type = media_type_of(&film.film_type, film.serial);
    let kp_id = film.kinopoisk_id;

    let (release_date, end_date) = match media_type {
        MediaType::Tv => {
            let start = if film.start_year > 0 {
                film.start_year
            } else {
                film.year
            };
            let end = Some(year_to_date(i64::from(film.end_year))).filter(|d| !d.is_empty());
            (year_to_date(i64::from(start)), end)
        }
        MediaType::Movie => (year_to_date(i64::from(film.year)), None),
    };

    let has_poster = !film.poster_url_preview.is_empty() || !film.poster_url.is_empty();

    UnifiedContent {
        id: kp_id.to_string(),
        source_id: Source::Kp.source_id(kp_id),
        title: first_non_blank(&[
            film.name_ru.as_str(),
            film.name_en.as_str(),
            film.name_original.as_str(),
        ])
        .to_string(),
        original_title: first_non_blank(&[film.name_original.as_str(), film.name_en.as_str()])
            .to_string(),
        description: first_non_blank(&[
            film.description.as_str(),
            film.short_description.as_str(),
        ])
        .to_string(),
        release_date,
        end_date,
        media_type,
        genres: map_genres(&film.genres),
        rating: film.rating_kinopoisk,
        poster_url: if has_poster {
            kp_poster_proxy_url(kp_id)
        } else {
            String::new()
        },
        backdrop_url: build_image_proxy_url(&film.cover_url, BACKDROP_SIZE),
        director: String::new(),
        cast: Vec::new(),
        duration: film.film_length,
        country: film
            .countries
            .first()
            .map(|c| c.country.clone())
            .unwrap_or_default(),
        language: detect_language(film).to_string(),
        budget: None,
        revenue: None,
        imdb_id: film.imdb_id.clone(),
        external_ids: UnifiedExternalIds {
            kp: Some(kp_id),
            tmdb: None,
            imdb: film.imdb_id.clone(),
        },
        seasons: Vec::new(),
    }
}

/// Map a search/collection row to a unified list item.
pub fn map_film_short(film: &KpFilmShort) -> UnifiedSearchItem {
    let kp_id = film.native_id();
    let has_poster = !film.poster_url_preview.is_empty() || !film.poster_url.is_empty();

    UnifiedSearchItem {
        id: kp_id.to_string(),
        source_id: Source::Kp.source_id(kp_id),
        title: first_non_blank(&[
            film.name_ru.as_str(),
            film.name_en.as_str(),
            film.name_original.as_str(),
        ])
        .to_string(),
        media_type: media_type_of(&film.film_type, None),
        original_type: film.film_type.clone(),
        release_date: year_text_to_date(&film.year),
        poster_url: if has_poster {
            kp_poster_proxy_url(kp_id)
        } else {
            String::new()
        },
        rating: short_rating(film),
        description: film.description.clone(),
        external_ids: UnifiedExternalIds {
            kp: Some(kp_id),
            tmdb: None,
            imdb: film.imdb_id.clone(),
        },
    }
}

/// Map a list page, whichever schema generation it came from.
pub fn map_film_page(page: &KpFilmPage, requested_page: i64) -> UnifiedPage {
    UnifiedPage {
        items: page.films.iter().map(map_film_short).collect(),
        page: requested_page,
        total_pages: page.total_pages,
        total_results: page.total,
    }
}

/// `ratingKinopoisk`, or the legacy string `rating` when that is zero.
fn short_rating(film: &KpFilmShort) -> f64 {
    if film.rating_kinopoisk != 0.0 {
        return film.rating_kinopoisk;
    }
    film.rating
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|r| r.is_finite())
        .unwrap_or(0.0)
}

/// `ru` if a Russian title exists, else `en` if an English one does.
fn detect_language(film: &KpFilm) -> &'static str {
    if !film.name_ru.is_empty() {
        "ru"
    } else if !film.name_en.is_empty() {
        "en"
    } else {
        "ru"
    }
}

fn map_genres(genres: &[KpGenre]) -> Vec<UnifiedGenre> {
    genres
        .iter()
        .filter(|g| !g.genre.trim().is_empty())
        .map(|g| genre_from_name(&g.genre, 0))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kinopoisk::parse_film_page;

    fn shawshank() -> KpFilm {
        serde_json::from_str(
            r#"{
                "kinopoiskId": 326,
                "imdbId": "tt0111161",
                "nameRu": "Побег из Шоушенка",
                "nameEn": null,
                "nameOriginal": "The Shawshank Redemption",
                "posterUrl": "https://kinopoiskapiunofficial.tech/images/posters/kp/326.jpg",
                "posterUrlPreview": "https://kinopoiskapiunofficial.tech/images/posters/kp_small/326.jpg",
                "coverUrl": "https://avatars.mds.yandex.net/get-ott/cover.jpg",
                "ratingKinopoisk": 9.1,
                "year": 1994,
                "filmLength": 142,
                "description": "",
                "shortDescription": "Бухгалтер Энди Дюфрейн...",
                "type": "FILM",
                "countries": [{"country": "США"}],
                "genres": [{"genre": "драма"}, {"genre": ""}],
                "serial": false
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn film_maps_with_kp_identity() {
        let unified = map_film(&shawshank());

        assert_eq!(unified.source_id, "kp_326");
        assert_eq!(unified.media_type, MediaType::Movie);
        assert_eq!(unified.external_ids.kp, Some(326));
        assert_eq!(unified.external_ids.tmdb, None);
        assert_eq!(unified.external_ids.imdb, "tt0111161");
        assert_eq!(unified.title, "Побег из Шоушенка");
        assert_eq!(unified.original_title, "The Shawshank Redemption");
        assert_eq!(unified.description, "Бухгалтер Энди Дюфрейн...");
        assert_eq!(unified.release_date, "1994-01-01");
        assert_eq!(unified.language, "ru");
        assert_eq!(unified.country, "США");
        assert_eq!(unified.genres.len(), 1);
        assert!(unified.seasons.is_empty());
    }

    #[test]
    fn film_images_go_through_proxy() {
        let unified = map_film(&shawshank());
        assert_eq!(unified.poster_url, "/api/v1/images/kp_big/326");
        assert!(unified.backdrop_url.starts_with("/api/v1/images/w1280/https%3A"));
    }

    #[test]
    fn series_uses_start_and_end_years() {
        let film: KpFilm = serde_json::from_str(
            r#"{"kinopoiskId": 77044, "nameEn": "Friends", "type": "TV_SERIES",
                "startYear": 1994, "endYear": 2004}"#,
        )
        .unwrap();
        let unified = map_film(&film);

        assert_eq!(unified.media_type, MediaType::Tv);
        assert_eq!(unified.release_date, "1994-01-01");
        assert_eq!(unified.end_date.as_deref(), Some("2004-01-01"));
        assert_eq!(unified.language, "en");
        assert_eq!(unified.poster_url, "");
    }

    #[test]
    fn short_row_prefers_new_id_and_rating() {
        let row = KpFilmShort {
            kinopoisk_id: 0,
            film_id: 301,
            rating: "8.5".into(),
            rating_kinopoisk: 0.0,
            year: "1999".into(),
            name_en: "The Matrix".into(),
            film_type: "FILM".into(),
            ..Default::default()
        };
        let item = map_film_short(&row);

        assert_eq!(item.id, "301");
        assert_eq!(item.source_id, "kp_301");
        assert_eq!(item.rating, 8.5);
        assert_eq!(item.title, "The Matrix");
        assert_eq!(item.release_date, "1999-01-01");
        assert_eq!(item.original_type, "FILM");
    }

    #[test]
    fn short_row_unparseable_rating_is_zero() {
        let row = KpFilmShort {
            kinopoisk_id: 5,
            rating: "99%".into(),
            ..Default::default()
        };
        assert_eq!(map_film_short(&row).rating, 0.0);
    }

    #[test]
    fn page_maps_series_rows() {
        let page = parse_film_page(
            r#"{"films": [{"filmId": 464963, "nameRu": "Игра престолов", "type": "TV_SERIES", "year": "2011"}],
                 "pagesCount": 1}"#
                .as_bytes(),
        )
        .unwrap();
        let mapped = map_film_page(&page, 1);

        assert_eq!(mapped.items[0].media_type, MediaType::Tv);
        assert_eq!(mapped.total_pages, 1);
        assert_eq!(mapped.page, 1);
    }
}
