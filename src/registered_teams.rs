use std::collections::HashMap;

use anyhow::{Context, Result};
use futures::future::try_join_all;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::GraphError;
use crate::graph_client::GraphClient;

/// List field holding the directory group id of a team.
pub const GROUP_ID_FIELD: &str = "GroupID";

/// Team short-name to directory group id.
pub type TeamGroups = HashMap<String, String>;

#[derive(Deserialize, Debug)]
pub struct ListItems {
    pub value: Vec<ListItem>,
}

#[derive(Deserialize, Debug, Default)]
pub struct ListItem {
    #[serde(default)]
    pub fields: Map<String, Value>,
}

#[derive(Deserialize, Debug)]
struct Group {
    mail: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GroupRecord {
    pub id: String,
    pub team: String,
}

/// Lower-cased local part of `mail`, `None` when there is no `@`.
pub fn team_from_mail(mail: &str) -> Option<String> {
    let mail = mail.to_lowercase();

    mail.find('@').map(|at| mail[..at].to_owned())
}

/// Group ids of the items carrying one, in list order.
pub fn group_ids(items: &[ListItem]) -> Vec<&str> {
    items
        .iter()
        .filter_map(|item| match item.fields.get(GROUP_ID_FIELD) {
            Some(Value::String(group_id)) => Some(group_id.as_str()),
            Some(other) => {
                log::debug!("Skipping item with non-string {}: {}", GROUP_ID_FIELD, other);
                None
            }
            None => None,
        })
        .collect()
}

pub async fn group_id_with_mail(graph_client: &GraphClient<'_>, group_id: &str) -> Result<GroupRecord> {
    let group: Group = graph_client
        .get(&["groups", group_id], None)
        .await
        .with_context(|| format!("Failed to look up group {}", group_id))?;

    let mail = group.mail.ok_or_else(|| GraphError::MissingMail {
        group_id: group_id.to_owned(),
    })?;

    let team = team_from_mail(&mail).ok_or_else(|| GraphError::MalformedMail {
        group_id: group_id.to_owned(),
        mail: mail.to_owned(),
    })?;

    Ok(GroupRecord {
        id: group_id.to_owned(),
        team,
    })
}

/// Resolves every team registered in the SharePoint list to its group id.
///
/// `Ok(None)` means the list itself couldn't be fetched. A single failing
/// group lookup fails the whole call, no partial mapping is returned.
pub async fn get_registered_teams(
    graph_client: &GraphClient<'_>,
    site_group_id: &str,
    list_name: &str,
) -> Result<Option<TeamGroups>> {
    let list_items = graph_client
        .get::<ListItems>(
            &["groups", site_group_id, "sites", "root", "lists", list_name, "items"],
            Some("expand=fields"),
        )
        .await;

    let list_items = match list_items {
        Ok(list_items) => list_items,
        Err(e) => {
            log::warn!(
                "Failed to get registered teams from Microsoft Graph API, error was: {:?}",
                e
            );
            return Ok(None);
        }
    };

    let group_ids = group_ids(&list_items.value);
    log::debug!(
        "{} of {} list items carry a {}",
        group_ids.len(),
        list_items.value.len(),
        GROUP_ID_FIELD
    );

    let records = try_join_all(
        group_ids
            .into_iter()
            .map(|group_id| group_id_with_mail(graph_client, group_id)),
    )
    .await?;

    let mut groups = TeamGroups::new();
    for record in records {
        groups.insert(record.team, record.id);
    }

    log::debug!("Groups found: {:?}", groups);
    Ok(Some(groups))
}
