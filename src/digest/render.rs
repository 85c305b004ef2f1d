//! Turns the release map into the body of one user's digest.
//!
//! Artists are listed in the order the user saved them. An artist with
//! nothing to show gets a "No new music found" line in both formats. In HTML
//! that includes an artist whose releases all lack a 64x64 thumbnail.

use crate::configuration::DigestFormat;
use crate::foundation::utils::escape_html;
use crate::process::{ReleaseItem, ReleaseMap};
use std::collections::HashSet;
use std::fmt::Write;

const HTML_HEAD: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>New music this week</title>
</head>
<body>
<h1>New music from the artists you follow</h1>
"#;

const HTML_TAIL: &str = "</body>\n</html>\n";

/// Builds the digest body for a user following `artists`.
///
/// A name saved more than once is listed once.
pub fn build_email_body(
    artists: &[String],
    release_map: &ReleaseMap,
    format: DigestFormat,
) -> String {
    let mut body = String::new();
    let mut listed = HashSet::new();

    for artist in artists {
        if !listed.insert(artist.as_str()) {
            continue;
        }

        let releases = release_map.get(artist).map(Vec::as_slice).unwrap_or_default();
        let written = match format {
            DigestFormat::Html => push_html_releases(&mut body, releases),
            DigestFormat::Text => push_text_releases(&mut body, artist, releases),
        };
        if !written {
            push_no_new_music(&mut body, artist, format);
        }
    }

    body
}

/// Complete message body: the HTML variant is wrapped in a document shell.
pub fn render_digest(
    artists: &[String],
    release_map: &ReleaseMap,
    format: DigestFormat,
) -> String {
    let body = build_email_body(artists, release_map, format);
    match format {
        DigestFormat::Html => wrap_html_document(&body),
        DigestFormat::Text => body,
    }
}

pub fn wrap_html_document(body: &str) -> String {
    format!("{HTML_HEAD}{body}{HTML_TAIL}")
}

fn push_no_new_music(body: &mut String, artist: &str, format: DigestFormat) {
    match format {
        DigestFormat::Html => {
            let _ = writeln!(body, "<p>No new music found for {} today</p>", escape_html(artist));
        }
        DigestFormat::Text => {
            let _ = writeln!(body, "No new music found for {} today", artist);
        }
    }
}

// Releases without a 64x64 thumbnail are left out of the HTML digest.
// Returns whether any line was written.
fn push_html_releases(body: &mut String, releases: &[ReleaseItem]) -> bool {
    let mut written = false;
    for release in releases {
        let Some(thumbnail) = &release.thumbnail else {
            continue;
        };
        let _ = writeln!(
            body,
            r#"<p><img src="{}" width="{}" height="{}" /> {} released on {}--{}</p>"#,
            escape_html(&thumbnail.url),
            thumbnail.width,
            thumbnail.height,
            escape_html(&release.name),
            release.release_date.format("%Y-%m-%d"),
            escape_html(&release.url),
        );
        written = true;
    }
    written
}

fn push_text_releases(body: &mut String, artist: &str, releases: &[ReleaseItem]) -> bool {
    if releases.is_empty() {
        return false;
    }
    let _ = writeln!(body, "{}", artist);
    for release in releases {
        let _ = writeln!(
            body,
            "\t{} {} released on {}. {}",
            release.release_type,
            release.name,
            release.release_date.format("%Y-%m-%d"),
            release.url
        );
    }
    true
}
