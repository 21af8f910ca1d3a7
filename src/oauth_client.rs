use crate::args::Arguments;
use crate::error::GraphError;
use anyhow::{Context, Result};
use oauth2::basic::{BasicClient, BasicTokenResponse};
use oauth2::{AuthType, ClientId, ClientSecret, EndpointNotSet, EndpointSet, Scope, TokenUrl};

type TokenClient =
    BasicClient<EndpointNotSet, EndpointNotSet, EndpointNotSet, EndpointNotSet, EndpointSet>;

pub struct OAuthClient<'a> {
    args: &'a Arguments,
    inner: TokenClient,
    http_client: reqwest::Client,
}

fn non_empty<'s>(value: &'s str, name: &'static str) -> Result<&'s str, GraphError> {
    if value.trim().is_empty() {
        Err(GraphError::InvalidCredentials(name))
    } else {
        Ok(value)
    }
}

/// `<authority host>/<tenant id>`
pub fn authority_url(args: &Arguments) -> String {
    format!(
        "{}/{}",
        args.authority_host.trim_end_matches('/'),
        args.tenant_id
    )
}

/// The `.default` scope asks for every application permission granted on `resource`.
pub fn default_scope(resource: &str) -> String {
    format!("{}/.default", resource.trim_end_matches('/'))
}

impl<'a> OAuthClient<'a> {
    fn get_client(args: &Arguments) -> Result<TokenClient> {
        non_empty(&args.tenant_id, "tenant-id")?;
        let app_id = non_empty(&args.app_id, "app-id")?;
        let client_secret = non_empty(
            args.client_secret.as_deref().unwrap_or_default(),
            "client-secret",
        )?;

        let token_url = format!("{}/oauth2/v2.0/token", authority_url(args));

        Ok(BasicClient::new(ClientId::new(app_id.to_owned()))
            .set_client_secret(ClientSecret::new(client_secret.to_owned()))
            .set_auth_type(AuthType::RequestBody)
            .set_token_uri(TokenUrl::new(token_url.to_owned()).with_context(|| {
                format!(
                    "`--authority-host` doesn't form a correct absolute URL. Resulting token url: {}",
                    token_url
                )
            })?))
    }

    pub fn new(args: &Arguments) -> Result<OAuthClient<'_>> {
        log::debug!("Creating OAuthClient for authority {}...", authority_url(args));

        let client = Self::get_client(args).context("Failed to create a OAuthClient")?;

        // Token endpoints must not be followed through redirects.
        let http_client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .context("Failed to create an HTTP client for the token endpoint")?;

        log::debug!("OAuthClient created");

        Ok(OAuthClient {
            args,
            inner: client,
            http_client,
        })
    }

    pub async fn exchange_client_credentials(&self) -> Result<BasicTokenResponse> {
        log::debug!("Exchanging client credentials for a token...");

        let token = self
            .inner
            .exchange_client_credentials()
            .add_scope(Scope::new(default_scope(&self.args.resource)))
            .request_async(&self.http_client)
            .await
            .context("Failed to exchange client credentials for a token")?;

        log::debug!("Exchange done");
        Ok(token)
    }
}
