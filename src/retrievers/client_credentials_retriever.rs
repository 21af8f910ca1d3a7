use crate::{oauth_client::OAuthClient, token_info::TokenInfo};
use anyhow::Result;
use async_trait::async_trait;

use super::token_retriever::TokenRetriever;

/// Exchanges the client credentials on every call; tokens are never reused.
pub struct ClientCredentialsRetriever<'a> {
    oauth_client: &'a OAuthClient<'a>,
}

impl<'a> ClientCredentialsRetriever<'a> {
    pub fn new<'b>(oauth_client: &'b OAuthClient<'b>) -> ClientCredentialsRetriever<'b> {
        ClientCredentialsRetriever { oauth_client }
    }
}

#[async_trait(?Send)]
impl TokenRetriever for ClientCredentialsRetriever<'_> {
    async fn retrieve(&self) -> Result<TokenInfo> {
        match self.oauth_client.exchange_client_credentials().await {
            Ok(token_response) => Ok(TokenInfo::from_token_response(token_response)),
            Err(e) => {
                log::warn!("Unable to authenticate with the identity provider: {:?}", e);
                Err(e)
            }
        }
    }
}
