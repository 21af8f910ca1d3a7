#![deny(warnings)]

use crate::args::Arguments;
use crate::graph_client::GraphClient;
use crate::oauth_client::OAuthClient;
use crate::registered_teams::TeamGroups;
use crate::retrievers::client_credentials_retriever::ClientCredentialsRetriever;
use anyhow::Result;

pub mod args;
pub mod config_file;
pub mod error;
pub mod graph_client;
pub mod oauth_client;
pub mod output_format;
pub mod registered_teams;
pub mod retrievers;
pub mod token_info;

/// Authenticates with the client credentials from `args` and resolves the
/// registered teams to their group ids. `Ok(None)` when the team list
/// couldn't be fetched.
pub async fn get_team_groups(args: &Arguments) -> Result<Option<TeamGroups>> {
    let oauth_client = OAuthClient::new(args)?;
    let token_retriever = ClientCredentialsRetriever::new(&oauth_client);
    let graph_client = GraphClient::new(args, &token_retriever)?;

    registered_teams::get_registered_teams(&graph_client, &args.site_group_id, &args.list_name)
        .await
}
