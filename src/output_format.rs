use std::collections::BTreeMap;

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::registered_teams::TeamGroups;

#[derive(Serialize, Deserialize, ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    /// JSON object mapping team name to group id
    #[default]
    Json,
    /// One `team<TAB>group id` pair per line
    Lines,
}

impl OutputFormat {
    /// Renders the mapping sorted by team name, so repeated runs diff cleanly.
    pub fn render(&self, groups: &TeamGroups) -> Result<String> {
        let sorted: BTreeMap<&String, &String> = groups.iter().collect();

        match self {
            OutputFormat::Json => {
                serde_json::to_string_pretty(&sorted).context("Failed to serialize team groups")
            }
            OutputFormat::Lines => Ok(sorted
                .into_iter()
                .map(|(team, id)| format!("{}\t{}", team, id))
                .collect::<Vec<_>>()
                .join("\n")),
        }
    }
}
