//! Wire types for the catalog search and artist releases endpoints.
//!
//! Only the fields the digest needs are declared; everything else in the
//! payload is ignored.

use serde::Deserialize;
use std::collections::HashMap;

/// `GET search?type=artist` response.
#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    pub artists: ArtistPage,
}

#[derive(Debug, Default, Deserialize)]
pub struct ArtistPage {
    #[serde(default)]
    pub items: Vec<ArtistDto>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ArtistDto {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// `GET artists/{id}/albums` response.
#[derive(Debug, Deserialize)]
pub struct AlbumsResponse {
    #[serde(default)]
    pub items: Vec<AlbumDto>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AlbumDto {
    pub name: String,
    #[serde(default)]
    pub album_type: Option<String>,
    pub release_date: String,
    #[serde(default)]
    pub external_urls: HashMap<String, String>,
    #[serde(default)]
    pub href: Option<String>,
    #[serde(default)]
    pub images: Vec<ImageDto>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ImageDto {
    pub url: String,
    pub height: Option<u32>,
    pub width: Option<u32>,
}

impl AlbumDto {
    /// Public web page for the release, preferring the catalog's own player link.
    pub fn canonical_url(&self) -> Option<&str> {
        self.external_urls
            .get("spotify")
            .map(String::as_str)
            .or(self.href.as_deref())
    }
}
