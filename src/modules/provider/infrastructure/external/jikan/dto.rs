use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JikanAnimeResponse {
    pub data: JikanAnimeData,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JikanMangaResponse {
    pub data: JikanMangaData,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JikanAnimeData {
    pub mal_id: i32,
    pub title: String,
    pub title_english: Option<String>,
    #[serde(default)]
    pub images: Option<JikanImages>,
    pub episodes: Option<i32>,
    pub source: Option<String>,
    pub synopsis: Option<String>,
    pub year: Option<i32>,
    pub aired: Option<JikanDateRange>,
    pub rank: Option<i32>,
    pub popularity: Option<i32>,
    #[serde(default)]
    pub genres: Vec<JikanEntity>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JikanMangaData {
    pub mal_id: i32,
    pub title: String,
    pub title_english: Option<String>,
    #[serde(default)]
    pub images: Option<JikanImages>,
    #[serde(rename = "type")]
    pub manga_type: Option<String>,
    pub chapters: Option<i32>,
    pub volumes: Option<i32>,
    pub synopsis: Option<String>,
    pub published: Option<JikanDateRange>,
    pub rank: Option<i32>,
    pub popularity: Option<i32>,
    #[serde(default)]
    pub genres: Vec<JikanEntity>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JikanImages {
    pub jpg: Option<JikanImageSet>,
    pub webp: Option<JikanImageSet>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JikanImageSet {
    pub image_url: Option<String>,
    pub small_image_url: Option<String>,
    pub large_image_url: Option<String>,
}

/// `aired` for anime, `published` for manga
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JikanDateRange {
    pub from: Option<String>,
    pub to: Option<String>,
    pub prop: Option<JikanDateRangeProp>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JikanDateRangeProp {
    pub from: Option<JikanDateProp>,
    pub to: Option<JikanDateProp>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JikanDateProp {
    pub day: Option<i32>,
    pub month: Option<i32>,
    pub year: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JikanEntity {
    pub mal_id: i32,
    #[serde(rename = "type")]
    pub entity_type: Option<String>,
    pub name: String,
    pub url: Option<String>,
}
