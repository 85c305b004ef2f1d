use crate::api_client::{AuthToken, Catalog};
use crate::foundation::database::UserRecord;
use crate::process::{CatalogFailure, CatalogStage};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, warn};

/// Collects the distinct artists followed by any user, so each one is looked
/// up in the catalog once.
pub fn get_artists(records: &[UserRecord]) -> BTreeSet<String> {
    records
        .iter()
        .flat_map(|record| record.artists.iter().cloned())
        .collect()
}

/// Artist names keyed by the catalog id they resolved to.
///
/// Every name lands on exactly one side: under an id, or in `unresolved`.
/// Two spellings that resolve to the same id share an entry so its releases
/// are fetched once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArtistResolution {
    resolved: BTreeMap<String, Vec<String>>,
    unresolved: BTreeSet<String>,
}

impl ArtistResolution {
    pub fn insert_resolved(&mut self, artist_id: String, artist: String) {
        self.unresolved.remove(&artist);
        let names = self.resolved.entry(artist_id).or_default();
        if !names.contains(&artist) {
            names.push(artist);
        }
    }

    pub fn insert_unresolved(&mut self, artist: String) {
        self.unresolved.insert(artist);
    }

    /// Artist names that resolved to `artist_id`.
    pub fn names_for(&self, artist_id: &str) -> &[String] {
        self.resolved.get(artist_id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_unresolved(&self, artist: &str) -> bool {
        self.unresolved.contains(artist)
    }

    /// Resolved ids with the names that map to them, in id order.
    pub fn resolved(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.resolved
            .iter()
            .map(|(id, names)| (id.as_str(), names.as_slice()))
    }

    pub fn unresolved(&self) -> impl Iterator<Item = &str> {
        self.unresolved.iter().map(String::as_str)
    }
}

/// Looks up the catalog id of every artist, one search per name.
///
/// The first search hit wins. An empty result leaves the artist unresolved.
/// A failed search is pushed onto `failures` and the artist is treated as
/// unresolved, so one bad response does not stop the run.
pub async fn resolve_artist_ids(
    catalog: &dyn Catalog,
    artists: &BTreeSet<String>,
    token: &AuthToken,
    failures: &mut Vec<CatalogFailure>,
) -> ArtistResolution {
    let mut resolution = ArtistResolution::default();

    for artist in artists {
        match catalog.search_artist(artist, token).await {
            Ok(Some(artist_id)) => {
                debug!(artist = %artist, artist_id = %artist_id, "resolved artist");
                resolution.insert_resolved(artist_id, artist.clone());
            }
            Ok(None) => {
                debug!(artist = %artist, "no catalog match");
                resolution.insert_unresolved(artist.clone());
            }
            Err(e) => {
                warn!(artist = %artist, error = %e, "artist search failed");
                failures.push(CatalogFailure {
                    artist: artist.clone(),
                    stage: CatalogStage::Search,
                    message: e.to_string(),
                });
                resolution.insert_unresolved(artist.clone());
            }
        }
    }

    resolution
}
