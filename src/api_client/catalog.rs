//! HTTP client for the music catalog: token issuance, artist search and
//! artist releases.

use crate::api_client::dto::{AlbumDto, AlbumsResponse, SearchResponse};
use crate::api_client::{basic_credential, AuthToken, CatalogError};
use crate::configuration::CatalogSettings;
use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

/// The catalog operations the digest pipeline depends on.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Catalog: Send + Sync {
    /// Exchanges the service credentials for a bearer token.
    async fn authorize(&self) -> Result<AuthToken, CatalogError>;

    /// Returns the catalog id of the best (first) match for `artist`, if any.
    async fn search_artist(
        &self,
        artist: &str,
        token: &AuthToken,
    ) -> Result<Option<String>, CatalogError>;

    /// Returns the raw release list of the artist, unfiltered.
    async fn artist_releases(
        &self,
        artist_id: &str,
        token: &AuthToken,
    ) -> Result<Vec<AlbumDto>, CatalogError>;
}

pub struct CatalogClient {
    http_client: Client,
    settings: CatalogSettings,
}

impl CatalogClient {
    pub fn new(settings: CatalogSettings) -> Result<Self, CatalogError> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;

        Ok(Self {
            http_client,
            settings,
        })
    }

    fn releases_url(&self, artist_id: &str) -> String {
        self.settings.releases_url.replace("{}", artist_id)
    }

    fn token_request(&self) -> RequestBuilder {
        let credential = basic_credential(&self.settings.client_id, &self.settings.client_secret);

        self.http_client
            .post(&self.settings.token_url)
            .header(AUTHORIZATION, format!("Basic {credential}"))
            .form(&[("grant_type", "client_credentials")])
    }

    fn search_request(&self, artist: &str, token: &AuthToken) -> RequestBuilder {
        self.http_client
            .get(&self.settings.search_url)
            .header(AUTHORIZATION, token.bearer_header())
            .query(&[("q", artist), ("type", "artist"), ("limit", "1")])
    }

    fn releases_request(&self, artist_id: &str, token: &AuthToken) -> RequestBuilder {
        self.http_client
            .get(self.releases_url(artist_id))
            .header(AUTHORIZATION, token.bearer_header())
            .query(&[("include_groups", self.settings.include_groups.as_str())])
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<T, CatalogError> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(CatalogError::Status {
                code: status.as_u16(),
                body,
            });
        }

        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl Catalog for CatalogClient {
    async fn authorize(&self) -> Result<AuthToken, CatalogError> {
        let response = self
            .token_request()
            .send()
            .await
            .map_err(|e| CatalogError::Auth(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| CatalogError::Auth(e.to_string()))?;

        if !status.is_success() {
            return Err(CatalogError::Auth(format!(
                "token endpoint returned HTTP {}: {}",
                status.as_u16(),
                body
            )));
        }

        let token: AuthToken = serde_json::from_str(&body)
            .map_err(|e| CatalogError::Auth(format!("unexpected token response: {e}")))?;
        debug!(expires_in = token.expires_in, "obtained catalog token");
        Ok(token)
    }

    async fn search_artist(
        &self,
        artist: &str,
        token: &AuthToken,
    ) -> Result<Option<String>, CatalogError> {
        let response: SearchResponse = self.get_json(self.search_request(artist, token)).await?;
        Ok(response.artists.items.into_iter().next().map(|a| a.id))
    }

    async fn artist_releases(
        &self,
        artist_id: &str,
        token: &AuthToken,
    ) -> Result<Vec<AlbumDto>, CatalogError> {
        let response: AlbumsResponse = self
            .get_json(self.releases_request(artist_id, token))
            .await?;
        Ok(response.items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::CONTENT_TYPE;
    use reqwest::Method;

    fn client() -> CatalogClient {
        CatalogClient::new(CatalogSettings::new("id", "secret", "http://localhost:9")).unwrap()
    }

    #[test]
    fn test_releases_url_embeds_artist_id() {
        assert_eq!(
            client().releases_url("0TnOYISbd1XYRBk9myaseg"),
            "http://localhost:9/v1/artists/0TnOYISbd1XYRBk9myaseg/albums"
        );
    }

    #[test]
    fn test_token_request() {
        let request = client().token_request().build().unwrap();

        assert_eq!(request.method(), Method::POST);
        assert_eq!(request.url().as_str(), "http://localhost:9/api/token");
        assert_eq!(request.headers()[AUTHORIZATION], "Basic aWQ6c2VjcmV0");
        assert_eq!(
            request.headers()[CONTENT_TYPE],
            "application/x-www-form-urlencoded"
        );
        assert_eq!(
            request.body().and_then(|body| body.as_bytes()),
            Some("grant_type=client_credentials".as_bytes())
        );
    }

    #[test]
    fn test_search_request() {
        let request = client()
            .search_request("Boyz II Men", &AuthToken::new("access"))
            .build()
            .unwrap();

        assert_eq!(
            request.url().as_str(),
            "http://localhost:9/v1/search?q=Boyz+II+Men&type=artist&limit=1"
        );
        assert_eq!(request.headers()[AUTHORIZATION], "Bearer access");
    }

    #[test]
    fn test_releases_request() {
        let request = client()
            .releases_request("123", &AuthToken::new("access"))
            .build()
            .unwrap();

        assert_eq!(
            request.url().as_str(),
            "http://localhost:9/v1/artists/123/albums?include_groups=single%2Calbum"
        );
        assert_eq!(request.headers()[AUTHORIZATION], "Bearer access");
    }

    #[tokio::test]
    async fn test_authorize_unreachable_endpoint_is_auth_failure() {
        let result = client().authorize().await;

        assert!(matches!(result, Err(CatalogError::Auth(_))));
    }
}
