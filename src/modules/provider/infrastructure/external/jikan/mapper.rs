use super::dto::{JikanAnimeData, JikanDateRange, JikanImages, JikanMangaData};
use crate::modules::provider::domain::MediaMetadata;

pub struct JikanMapper;

impl JikanMapper {
    pub fn anime_to_metadata(data: JikanAnimeData) -> MediaMetadata {
        MediaMetadata {
            title: non_empty(Some(data.title)),
            image_url: Self::best_image(data.images.as_ref()),
            total_progress: positive(data.episodes),
            synopsis: non_empty(data.synopsis),
            genres: data.genres.into_iter().map(|g| g.name).collect(),
            year: data.year.or_else(|| Self::start_year(data.aired.as_ref())),
            rank: positive(data.rank),
            popularity: positive(data.popularity),
            source_medium: non_empty(data.source),
        }
    }

    pub fn manga_to_metadata(data: JikanMangaData) -> MediaMetadata {
        MediaMetadata {
            title: non_empty(Some(data.title)),
            image_url: Self::best_image(data.images.as_ref()),
            total_progress: positive(data.chapters),
            synopsis: non_empty(data.synopsis),
            genres: data.genres.into_iter().map(|g| g.name).collect(),
            year: Self::start_year(data.published.as_ref()),
            rank: positive(data.rank),
            popularity: positive(data.popularity),
            source_medium: non_empty(data.manga_type),
        }
    }

    /// Prefer the large JPG, then the regular one, then WebP
    fn best_image(images: Option<&JikanImages>) -> Option<String> {
        let images = images?;
        let jpg = images.jpg.as_ref();
        let webp = images.webp.as_ref();

        jpg.and_then(|set| set.large_image_url.clone())
            .or_else(|| jpg.and_then(|set| set.image_url.clone()))
            .or_else(|| webp.and_then(|set| set.large_image_url.clone()))
            .or_else(|| webp.and_then(|set| set.image_url.clone()))
            .and_then(|url| non_empty(Some(url)))
    }

    fn start_year(range: Option<&JikanDateRange>) -> Option<i32> {
        range?.prop.as_ref()?.from.as_ref()?.year
    }
}

// Jikan reports unknown counts as null or 0
fn positive(value: Option<i32>) -> Option<u32> {
    value.filter(|v| *v > 0).and_then(|v| u32::try_from(v).ok())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
