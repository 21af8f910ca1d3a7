use std::env;
use std::io::{self, IsTerminal};

use anyhow::{Context, Result};
use clap::Parser;
use dotenv::dotenv;

use crate::config_file::ConfigFile;
use crate::output_format::OutputFormat;

pub const DEFAULT_AUTHORITY_HOST: &str = "https://login.windows.net";
pub const DEFAULT_RESOURCE: &str = "https://graph.microsoft.com";
pub const DEFAULT_GRAPH_URL: &str = "https://graph.microsoft.com/v1.0";
pub const DEFAULT_SITE_GROUP_ID: &str = "9f0d0ea1-0226-4aa9-9bf9-b6e75816fabf";
pub const DEFAULT_LIST_NAME: &str = "nytt team";

#[derive(Parser, Debug, Clone)]
#[command(author, version, about)]
pub struct Arguments {
    /// Directory (tenant) identifier the application is registered in
    #[arg(long, env = "TEAMGROUPS_TENANT_ID")]
    pub tenant_id: String,

    /// Application (client) identifier <https://www.rfc-editor.org/rfc/rfc6749#section-2.2>
    #[arg(long, env = "TEAMGROUPS_APP_ID")]
    pub app_id: String,

    /// Application client secret. Prefer `--client-secret-stdin`, so it doesn't end up in a shell history. <https://www.rfc-editor.org/rfc/rfc6749#section-2.3.1>
    #[arg(
        long,
        env = "TEAMGROUPS_CLIENT_SECRET",
        hide_env_values = true,
        required_unless_present = "client_secret_stdin"
    )]
    pub client_secret: Option<String>,

    /// Read the client secret from stdin
    #[arg(long)]
    pub client_secret_stdin: bool,

    /// Identity provider host; the tenant id is appended to form the authority
    #[arg(long, default_value = DEFAULT_AUTHORITY_HOST, env = "TEAMGROUPS_AUTHORITY_HOST")]
    pub authority_host: String,

    /// Resource the token is requested for
    #[arg(long, default_value = DEFAULT_RESOURCE, env = "TEAMGROUPS_RESOURCE")]
    pub resource: String,

    /// Base url of the Graph API, including the version segment
    #[arg(long, default_value = DEFAULT_GRAPH_URL, env = "TEAMGROUPS_GRAPH_URL")]
    pub graph_url: String,

    /// Group owning the SharePoint site that holds the team list
    #[arg(long, default_value = DEFAULT_SITE_GROUP_ID, env = "TEAMGROUPS_SITE_GROUP_ID")]
    pub site_group_id: String,

    /// SharePoint list with one item per registered team
    #[arg(long, default_value = DEFAULT_LIST_NAME, env = "TEAMGROUPS_LIST_NAME")]
    pub list_name: String,

    /// Output format of the resolved mapping
    #[arg(long, value_enum, default_value_t = OutputFormat::Json, env = "TEAMGROUPS_OUTPUT")]
    pub output: OutputFormat,

    /// Profile from `~/.teamgroups/config.toml` used as defaults
    #[arg(long, env = "TEAMGROUPS_PROFILE")]
    pub profile: Option<String>,

    /// Enables debug logging, same as `RUST_LOG=debug`
    #[arg(short, long)]
    pub debug: bool,
}

impl Default for Arguments {
    fn default() -> Self {
        Arguments {
            tenant_id: String::new(),
            app_id: String::new(),
            client_secret: None,
            client_secret_stdin: false,
            authority_host: DEFAULT_AUTHORITY_HOST.to_owned(),
            resource: DEFAULT_RESOURCE.to_owned(),
            graph_url: DEFAULT_GRAPH_URL.to_owned(),
            site_group_id: DEFAULT_SITE_GROUP_ID.to_owned(),
            list_name: DEFAULT_LIST_NAME.to_owned(),
            output: OutputFormat::default(),
            profile: None,
            debug: false,
        }
    }
}

/// `--profile` has to be known before clap runs, since the profile feeds
/// the environment clap reads its defaults from.
fn profile_from_args() -> Option<String> {
    let mut args = env::args().skip(1);

    while let Some(arg) = args.next() {
        if arg == "--profile" {
            return args.next();
        }

        if let Some(profile) = arg.strip_prefix("--profile=") {
            return Some(profile.to_owned());
        }
    }

    env::var("TEAMGROUPS_PROFILE").ok()
}

fn read_client_secret_from_stdin() -> Result<String> {
    let secret = if io::stdin().is_terminal() {
        rpassword::prompt_password("Client secret: ")
            .context("Failed to read the client secret from the terminal")?
    } else {
        let mut line = String::new();
        io::stdin()
            .read_line(&mut line)
            .context("Failed to read the client secret from stdin")?;
        line
    };

    Ok(secret.trim_end_matches(['\r', '\n']).to_owned())
}

/// Loads `.env` into the process environment without overriding variables
/// that are already set. Runs before the logger exists, so `RUST_LOG` may
/// come from `.env` too.
pub fn load_dotenv() {
    dotenv().ok();
}

pub struct Args;

impl Args {
    /// Must run before any other thread is started, as profiles are applied
    /// through the process environment. Expects `.env` to be loaded already,
    /// see [`load_dotenv`].
    pub fn parse() -> Result<Arguments> {
        if let Some(profile) = profile_from_args() {
            ConfigFile::new()?.apply_profile(&profile)?;
        }

        let mut arguments = Arguments::parse();

        if arguments.client_secret_stdin {
            arguments.client_secret = Some(read_client_secret_from_stdin()?);
        }

        Ok(arguments)
    }
}

#[cfg(test)]
mod tests {
    use serial_test::serial;

    use super::*;

    #[test]
    #[serial]
    fn it_parses_required_arguments_with_defaults() {
        let args = Arguments::try_parse_from([
            "teamgroups",
            "--tenant-id",
            "tenant",
            "--app-id",
            "app",
            "--client-secret",
            "secret",
        ])
        .unwrap();

        assert_eq!(args.tenant_id, "tenant");
        assert_eq!(args.client_secret.as_deref(), Some("secret"));
        assert_eq!(args.authority_host, DEFAULT_AUTHORITY_HOST);
        assert_eq!(args.list_name, DEFAULT_LIST_NAME);
        assert_eq!(args.output, OutputFormat::Json);
    }

    #[test]
    #[serial]
    fn it_accepts_secret_from_stdin_flag_instead_of_value() {
        let args = Arguments::try_parse_from([
            "teamgroups",
            "--tenant-id",
            "tenant",
            "--app-id",
            "app",
            "--client-secret-stdin",
            "--output",
            "lines",
        ])
        .unwrap();

        assert!(args.client_secret_stdin);
        assert_eq!(args.client_secret, None);
        assert_eq!(args.output, OutputFormat::Lines);
    }
}
