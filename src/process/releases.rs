use crate::api_client::dto::{AlbumDto, ImageDto};
use crate::api_client::{AuthToken, Catalog, CatalogError};
use crate::foundation::utils::parse_release_date;
use crate::process::{
    ArtistResolution, CatalogFailure, CatalogStage, Image, ReleaseItem, ReleaseMap, ReleaseType,
};
use chrono::NaiveDate;
use tracing::{debug, warn};

/// Edge length, in pixels, of the thumbnail shown next to each release.
const THUMBNAIL_SIZE: u32 = 64;

/// Picks the first square 64px image; there is no fallback to other sizes.
pub fn select_thumbnail(images: &[ImageDto]) -> Option<Image> {
    images
        .iter()
        .find(|image| is_thumbnail_size(image))
        .map(|image| Image {
            url: image.url.clone(),
            width: THUMBNAIL_SIZE,
            height: THUMBNAIL_SIZE,
        })
}

fn is_thumbnail_size(image: &ImageDto) -> bool {
    image.height == Some(THUMBNAIL_SIZE) && image.width == Some(THUMBNAIL_SIZE)
}

/// Keeps releases dated on or after `cutoff` and converts them to [`ReleaseItem`]s.
///
/// Releases whose date cannot be parsed, or that have no URL, are dropped.
pub fn filter_music_for_last_seven_days(
    albums: Vec<AlbumDto>,
    cutoff: NaiveDate,
) -> Vec<ReleaseItem> {
    albums
        .into_iter()
        .filter_map(|album| {
            let Some(release_date) = parse_release_date(&album.release_date) else {
                warn!(
                    release = %album.name,
                    release_date = %album.release_date,
                    "skipping release with unreadable date"
                );
                return None;
            };
            if release_date < cutoff {
                return None;
            }

            let Some(url) = album.canonical_url().map(str::to_string) else {
                warn!(release = %album.name, "skipping release without a URL");
                return None;
            };

            Some(ReleaseItem {
                release_type: ReleaseType::from_catalog(album.album_type.as_deref()),
                thumbnail: select_thumbnail(&album.images),
                name: album.name,
                release_date,
                url,
            })
        })
        .collect()
}

/// Fetches one artist's releases and keeps the ones dated on or after `cutoff`.
pub async fn fetch_new_releases(
    catalog: &dyn Catalog,
    artist_id: &str,
    token: &AuthToken,
    cutoff: NaiveDate,
) -> Result<Vec<ReleaseItem>, CatalogError> {
    let albums = catalog.artist_releases(artist_id, token).await?;
    Ok(filter_music_for_last_seven_days(albums, cutoff))
}

/// Fetches new releases for every resolved artist, one request per catalog id.
///
/// Unresolved artists get no entry. A failed fetch is pushed onto `failures`
/// and leaves the affected artists without an entry.
pub async fn fetch_release_map(
    catalog: &dyn Catalog,
    resolution: &ArtistResolution,
    token: &AuthToken,
    cutoff: NaiveDate,
    failures: &mut Vec<CatalogFailure>,
) -> ReleaseMap {
    let mut release_map = ReleaseMap::new();

    for (artist_id, names) in resolution.resolved() {
        match fetch_new_releases(catalog, artist_id, token, cutoff).await {
            Ok(releases) => {
                debug!(artist_id, count = releases.len(), "fetched new releases");
                for name in names {
                    release_map.insert(name.clone(), releases.clone());
                }
            }
            Err(e) => {
                warn!(artist_id, error = %e, "release fetch failed");
                failures.extend(names.iter().map(|name| CatalogFailure {
                    artist: name.clone(),
                    stage: CatalogStage::Releases,
                    message: e.to_string(),
                }));
            }
        }
    }

    release_map
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api_client::MockCatalog;
    use crate::foundation::utils::lookback_cutoff;
    use chrono::Days;
    use serde_json::json;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
    }

    fn days_ago(days: u64) -> String {
        (today() - Days::new(days)).format("%Y-%m-%d").to_string()
    }

    fn album(name: &str, release_date: &str) -> AlbumDto {
        serde_json::from_value(json!({
            "album_type": "album",
            "name": name,
            "release_date": release_date,
            "external_urls": {"spotify": "https://open.spotify.com/album/43977e0YlJeMXG77uCCSMX"},
            "images": [
                {"height": 640, "width": 640, "url": "https://i.scdn.co/image/ac0d7bbd3cc8cb2bbc6c2b1b1b1e1c6e1e1e1e1e"},
                {"height": 300, "width": 300, "url": "https://i.scdn.co/image/2d6c2bd6aeea2dbb32e2e1b7bd3b6c6e3f3f3f3f"},
                {"height": 64, "width": 64, "url": "https://i.scdn.co/image/779dd6d6a0e124e03a5143d2be729ee4bab3f15f"}
            ]
        }))
        .unwrap()
    }

    fn image(height: u32, width: u32, url: &str) -> ImageDto {
        ImageDto {
            url: url.to_string(),
            height: Some(height),
            width: Some(width),
        }
    }

    #[test]
    fn test_music_for_last_seven_days() {
        let fresh = days_ago(0);
        let albums = vec![
            album("Shut Up Lets Dance (Vol. II)", &fresh),
            album("Old Stuff", "2018-01-01"),
        ];

        let new_music = filter_music_for_last_seven_days(albums, lookback_cutoff(today(), 7));

        assert_eq!(new_music.len(), 1);
        assert_eq!(new_music[0].name, "Shut Up Lets Dance (Vol. II)");
        assert_eq!(new_music[0].release_type, ReleaseType::Album);
        assert_eq!(new_music[0].release_date, today());
        assert_eq!(
            new_music[0].url,
            "https://open.spotify.com/album/43977e0YlJeMXG77uCCSMX"
        );
        let thumbnail = new_music[0].thumbnail.as_ref().unwrap();
        assert_eq!(
            thumbnail.url,
            "https://i.scdn.co/image/779dd6d6a0e124e03a5143d2be729ee4bab3f15f"
        );
        assert_eq!(thumbnail.height, 64);
        assert_eq!(thumbnail.width, 64);
    }

    #[test]
    fn test_seven_day_window_boundaries() {
        let albums = vec![
            album("today", &days_ago(0)),
            album("seven days ago", &days_ago(7)),
            album("eight days ago", &days_ago(8)),
        ];

        let names: Vec<String> =
            filter_music_for_last_seven_days(albums, lookback_cutoff(today(), 7))
                .into_iter()
                .map(|item| item.name)
                .collect();

        assert_eq!(names, vec!["today", "seven days ago"]);
    }

    #[test]
    fn test_unreadable_dates_are_skipped() {
        let albums = vec![album("mystery", "soon"), album("fresh", &days_ago(1))];

        let new_music = filter_music_for_last_seven_days(albums, lookback_cutoff(today(), 7));

        assert_eq!(new_music.len(), 1);
        assert_eq!(new_music[0].name, "fresh");
    }

    #[test]
    fn test_year_precision_dates_are_old() {
        let albums = vec![album("ancient", "2019")];

        assert!(filter_music_for_last_seven_days(albums, lookback_cutoff(today(), 7)).is_empty());
    }

    #[test]
    fn test_single_type_is_kept() {
        let mut single = album("One Track", &days_ago(2));
        single.album_type = Some("single".to_string());

        let new_music =
            filter_music_for_last_seven_days(vec![single], lookback_cutoff(today(), 7));

        assert_eq!(new_music[0].release_type, ReleaseType::Single);
    }

    #[test]
    fn test_select_thumbnail_prefers_64() {
        let images = vec![
            image(360, 360, "https://img/360"),
            image(64, 64, "https://img/64"),
        ];

        let thumbnail = select_thumbnail(&images).unwrap();

        assert_eq!(thumbnail.url, "https://img/64");
        assert_eq!((thumbnail.width, thumbnail.height), (64, 64));
    }

    #[test]
    fn test_select_thumbnail_no_fallback() {
        let images = vec![
            image(360, 360, "https://img/360"),
            image(64, 32, "https://img/64x32"),
        ];

        assert!(select_thumbnail(&images).is_none());
        assert!(select_thumbnail(&[]).is_none());
    }

    #[tokio::test]
    async fn test_fetch_new_releases() {
        let fresh = days_ago(0);
        let mut catalog = MockCatalog::new();
        catalog
            .expect_artist_releases()
            .withf(|artist_id, _| artist_id == "123")
            .times(1)
            .returning(move |_, _| Ok(vec![album("Shut Up Lets Dance (Vol. II)", &fresh)]));

        let new_music = fetch_new_releases(
            &catalog,
            "123",
            &AuthToken::new("access"),
            lookback_cutoff(today(), 7),
        )
        .await
        .unwrap();

        assert_eq!(new_music.len(), 1);
        assert_eq!(new_music[0].name, "Shut Up Lets Dance (Vol. II)");
    }

    #[tokio::test]
    async fn test_fetch_release_map() {
        let fresh = days_ago(1);
        let mut resolution = ArtistResolution::default();
        resolution.insert_resolved("123".to_string(), "shaggy".to_string());
        resolution.insert_unresolved("Nobody Famous".to_string());

        let mut catalog = MockCatalog::new();
        catalog
            .expect_artist_releases()
            .times(1)
            .returning(move |_, _| Ok(vec![album("Hot Shot", &fresh)]));

        let mut failures = Vec::new();
        let release_map = fetch_release_map(
            &catalog,
            &resolution,
            &AuthToken::new("access"),
            lookback_cutoff(today(), 7),
            &mut failures,
        )
        .await;

        assert!(release_map.contains_key("shaggy"));
        assert_eq!(release_map["shaggy"].len(), 1);
        assert!(!release_map.contains_key("Nobody Famous"));
        assert!(failures.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_release_map_shared_id_fetched_once() {
        let fresh = days_ago(1);
        let mut resolution = ArtistResolution::default();
        resolution.insert_resolved("nsync".to_string(), "NSYNC".to_string());
        resolution.insert_resolved("nsync".to_string(), "NSYNC*".to_string());

        let mut catalog = MockCatalog::new();
        catalog
            .expect_artist_releases()
            .times(1)
            .returning(move |_, _| Ok(vec![album("Pop", &fresh)]));

        let mut failures = Vec::new();
        let release_map = fetch_release_map(
            &catalog,
            &resolution,
            &AuthToken::new("access"),
            lookback_cutoff(today(), 7),
            &mut failures,
        )
        .await;

        assert_eq!(release_map["NSYNC"], release_map["NSYNC*"]);
    }

    #[tokio::test]
    async fn test_fetch_release_map_isolates_failures() {
        let fresh = days_ago(1);
        let mut resolution = ArtistResolution::default();
        resolution.insert_resolved("bad".to_string(), "Broken".to_string());
        resolution.insert_resolved("good".to_string(), "Hanson".to_string());

        let mut catalog = MockCatalog::new();
        catalog
            .expect_artist_releases()
            .withf(|artist_id, _| artist_id == "bad")
            .returning(|_, _| {
                Err(CatalogError::Status {
                    code: 502,
                    body: "bad gateway".to_string(),
                })
            });
        catalog
            .expect_artist_releases()
            .withf(|artist_id, _| artist_id == "good")
            .returning(move |_, _| Ok(vec![album("MMMBop", &fresh)]));

        let mut failures = Vec::new();
        let release_map = fetch_release_map(
            &catalog,
            &resolution,
            &AuthToken::new("access"),
            lookback_cutoff(today(), 7),
            &mut failures,
        )
        .await;

        assert!(release_map.contains_key("Hanson"));
        assert!(!release_map.contains_key("Broken"));
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].artist, "Broken");
        assert_eq!(failures[0].stage, CatalogStage::Releases);
    }
}
