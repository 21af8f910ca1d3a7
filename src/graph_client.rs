use anyhow::{Context, Result, anyhow};
use serde::de::DeserializeOwned;
use url::Url;

use crate::args::Arguments;
use crate::error::GraphError;
use crate::retrievers::token_retriever::TokenRetriever;

/// Microsoft Graph API client authenticating each request with a fresh token.
pub struct GraphClient<'a> {
    http_client: reqwest::Client,
    base_url: Url,
    token_retriever: &'a dyn TokenRetriever,
}

impl<'a> GraphClient<'a> {
    pub fn new(args: &Arguments, token_retriever: &'a dyn TokenRetriever) -> Result<Self> {
        let base_url = Url::parse(&args.graph_url).with_context(|| {
            format!(
                "`--graph-url` is not a correct absolute URL. Provided value: {}",
                args.graph_url
            )
        })?;

        if base_url.cannot_be_a_base() {
            return Err(anyhow!(
                "`--graph-url` can't be used as a base URL. Provided value: {}",
                args.graph_url
            ));
        }

        let http_client = reqwest::Client::builder()
            .build()
            .context("Failed to create an HTTP client for the Graph API")?;

        Ok(GraphClient {
            http_client,
            base_url,
            token_retriever,
        })
    }

    /// Appends `segments` to the base url, percent-encoding each one.
    pub fn resource_url(&self, segments: &[&str], query: Option<&str>) -> Result<Url> {
        let mut url = self.base_url.clone();

        url.path_segments_mut()
            .map_err(|_| anyhow!("Base URL {} can't take path segments", self.base_url))?
            .pop_if_empty()
            .extend(segments);
        url.set_query(query);

        Ok(url)
    }

    /// Authenticated `GET` of a resource relative to the Graph base url.
    pub async fn get<T: DeserializeOwned>(&self, segments: &[&str], query: Option<&str>) -> Result<T> {
        let url = self.resource_url(segments, query)?;

        let token_info = self
            .token_retriever
            .retrieve()
            .await
            .context("Failed to acquire a token for the Graph API")?;

        log::debug!("GET {}", url);

        let response = self
            .http_client
            .get(url.clone())
            .bearer_auth(&token_info.access_token)
            .send()
            .await
            .with_context(|| format!("Couldn't reach out to {}", url))?;

        let status = response.status();
        if !status.is_success() {
            return Err(GraphError::Status {
                status: status.as_u16(),
                path: url.path().to_owned(),
            }
            .into());
        }

        response
            .json::<T>()
            .await
            .with_context(|| format!("Couldn't process json given by {}", url))
    }
}
