use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseType {
    Album,
    Single,
    Compilation,
}

impl ReleaseType {
    /// Maps the catalog's `album_type`; anything unrecognised is treated as an album.
    pub fn from_catalog(album_type: Option<&str>) -> Self {
        match album_type.map(str::to_ascii_lowercase).as_deref() {
            Some("single") => ReleaseType::Single,
            Some("compilation") => ReleaseType::Compilation,
            _ => ReleaseType::Album,
        }
    }
}

impl fmt::Display for ReleaseType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            ReleaseType::Album => "album",
            ReleaseType::Single => "single",
            ReleaseType::Compilation => "compilation",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    pub url: String,
    pub width: u32,
    pub height: u32,
}

/// A release that passed the lookback filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseItem {
    pub name: String,
    pub release_type: ReleaseType,
    pub release_date: NaiveDate,
    pub url: String,
    pub thumbnail: Option<Image>,
}

/// New releases per artist name. Artists that were not resolved, or whose
/// lookup failed, have no entry.
pub type ReleaseMap = BTreeMap<String, Vec<ReleaseItem>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogStage {
    Search,
    Releases,
}

/// A catalog call that failed for one artist without stopping the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogFailure {
    pub artist: String,
    pub stage: CatalogStage,
    pub message: String,
}
