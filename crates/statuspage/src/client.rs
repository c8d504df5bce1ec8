use std::time::Duration;

use eyre::{Result, WrapErr, eyre};
use reqwest::{
    Client as HttpClient, StatusCode,
    header::{ETAG, IF_NONE_MATCH},
};
use serde::de::DeserializeOwned;
use url::Url;

use crate::types::{ComponentsPage, IncidentsPage};

/// User agent advertised on every status page request.
pub const USER_AGENT: &str = concat!("statuscope/", env!("CARGO_PKG_VERSION"));

/// Outcome of a single conditional fetch.
///
/// Failures are values, not raised errors: the poll loop treats them as
/// "no data this cycle" and keeps running.
#[derive(Debug)]
pub enum FetchOutcome<T> {
    /// The server answered 304; the caller's validator and cached copy are
    /// still current.
    Unchanged,
    /// Fresh payload from a 200 response.
    Changed {
        /// Decoded response body.
        payload: T,
        /// Validator from the `ETag` response header, verbatim. Servers may
        /// omit it; the payload must be processed either way.
        etag: Option<String>,
    },
    /// Transport failure, undecodable body, or a status outside {200, 304}.
    Failed(eyre::Report),
}

/// Client for a Statuspage-style API with conditional-request support.
///
/// One reusable connection pool serves both resources. Revalidation via
/// `If-None-Match` means an unchanged resource costs a round trip and no
/// body transfer. Validator bookkeeping is the caller's: this client never
/// stores an `ETag` between calls.
#[derive(Debug, Clone)]
pub struct Client {
    http: HttpClient,
    incidents_url: Url,
    components_url: Url,
}

impl Client {
    /// Create a new status page client. `timeout` bounds every request.
    pub fn new(incidents_url: Url, components_url: Url, timeout: Duration) -> Result<Self> {
        let http = HttpClient::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .wrap_err("building http client")?;
        Ok(Self { http, incidents_url, components_url })
    }

    /// Fetch the incidents resource, revalidating against `etag` if present.
    pub async fn fetch_incidents(&self, etag: Option<&str>) -> FetchOutcome<IncidentsPage> {
        self.fetch_json(&self.incidents_url, etag).await
    }

    /// Fetch the components resource, revalidating against `etag` if present.
    pub async fn fetch_components(&self, etag: Option<&str>) -> FetchOutcome<ComponentsPage> {
        self.fetch_json(&self.components_url, etag).await
    }

    async fn fetch_json<T: DeserializeOwned>(
        &self,
        url: &Url,
        etag: Option<&str>,
    ) -> FetchOutcome<T> {
        match self.try_fetch(url, etag).await {
            Ok(outcome) => outcome,
            Err(err) => FetchOutcome::Failed(err),
        }
    }

    async fn try_fetch<T: DeserializeOwned>(
        &self,
        url: &Url,
        etag: Option<&str>,
    ) -> Result<FetchOutcome<T>> {
        let mut request = self.http.get(url.clone());
        if let Some(etag) = etag {
            request = request.header(IF_NONE_MATCH, etag);
        }

        let response = request.send().await.wrap_err_with(|| format!("request to {url} failed"))?;

        match response.status() {
            StatusCode::NOT_MODIFIED => Ok(FetchOutcome::Unchanged),
            StatusCode::OK => {
                let etag = response
                    .headers()
                    .get(ETAG)
                    .and_then(|value| value.to_str().ok())
                    .map(str::to_owned);
                let payload = response
                    .json::<T>()
                    .await
                    .wrap_err_with(|| format!("decoding response from {url}"))?;
                Ok(FetchOutcome::Changed { payload, etag })
            }
            status => Err(eyre!("unexpected status {status} from {url}")),
        }
    }
}
