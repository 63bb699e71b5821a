use crate::error::Result;
use crate::query::QueryString;
use crate::visits::{VisitQueryParameters, VISITS_ENDPOINT};
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://api.fexa.io";

#[derive(Clone, Debug)]
pub struct VisitsConfig {
    pub base_url: Url,
    pub visits_endpoint: String,
}

impl VisitsConfig {
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            visits_endpoint: VISITS_ENDPOINT.to_string(),
        }
    }

    /// Reads `FEXA_BASE_URL`, falling back to the public API host.
    pub fn from_env() -> Result<Self> {
        let base_url =
            std::env::var("FEXA_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let base_url = Url::parse(base_url.trim())?;
        log::debug!("Using base URL: {}", base_url);
        Ok(Self::new(base_url))
    }

    /// Absolute URL of the visits endpoint for `params`. The endpoint is
    /// resolved under the base URL's path, so `https://host/tenant` yields
    /// `https://host/tenant/api/ev1/visits`.
    pub fn visits_url(&self, params: &VisitQueryParameters) -> Result<Url> {
        let qs: QueryString = params.to_query_string()?;
        let mut base = self.base_url.clone();
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let mut url = base.join(self.visits_endpoint.trim_start_matches('/'))?;
        url.set_query(Some(&qs.to_string()));
        log::debug!("Visits URL: {}", url);
        Ok(url)
    }
}
