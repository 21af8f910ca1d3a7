use anyhow::{Context, Result, anyhow};
use std::{collections::HashMap, env, fs, io::ErrorKind, path::PathBuf};

use serde::{Deserialize, Serialize};
use serde_variant::to_variant_name;

use crate::output_format::OutputFormat;

#[derive(Deserialize, Serialize, Clone, Debug, Default)]
pub struct Profile {
    /// Directory (tenant) identifier
    pub tenant_id: Option<String>,

    /// Application (client) identifier
    pub app_id: Option<String>,

    /// Application client secret
    pub client_secret: Option<String>,

    /// Identity provider host
    pub authority_host: Option<String>,

    /// Resource the token is requested for
    pub resource: Option<String>,

    /// Base url of the Graph API
    pub graph_url: Option<String>,

    /// Group owning the SharePoint site
    pub site_group_id: Option<String>,

    /// SharePoint list with the registered teams
    pub list_name: Option<String>,

    /// Output format
    pub output: Option<OutputFormat>,
}

#[derive(Deserialize, Serialize, Clone, Debug, Default)]
pub struct Config {
    #[serde(default)]
    pub profile: HashMap<String, Profile>,
}

pub struct ConfigFile {
    file_path: PathBuf,
}

/// Explicit environment (and `.env`) beats the profile.
fn set_default_var(key: &str, value: &str) {
    if env::var_os(key).is_some() {
        log::debug!("{} is already set, ignoring the profile value", key);
        return;
    }

    // SAFETY: profiles are applied while parsing arguments, before the
    // runtime or any other thread is started.
    unsafe { env::set_var(key, value) };
}

impl ConfigFile {
    pub fn new() -> Result<ConfigFile> {
        let mut file_path = home::home_dir().context("Couldn't access $HOME_DIR")?;
        file_path.push(".teamgroups/config.toml");

        Ok(ConfigFile { file_path })
    }

    pub fn from(file_path: PathBuf) -> ConfigFile {
        ConfigFile { file_path }
    }

    fn read(&self) -> Config {
        log::debug!("Reading the config file");
        let text = match fs::read_to_string(&self.file_path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::debug!(
                    "Config file {} doesn't exist",
                    &self.file_path.to_string_lossy()
                );
                String::new()
            }
            Err(e) => {
                log::warn!(
                    "Cannot read config file {}. Error: {:?}",
                    &self.file_path.to_string_lossy(),
                    anyhow!(e)
                );
                String::new()
            }
        };

        toml::from_str::<Config>(&text).unwrap_or_else(|e| {
            log::warn!(
                "Cannot parse config file {}. Error: {:?}",
                &self.file_path.to_string_lossy(),
                anyhow!(e)
            );

            Config::default()
        })
    }

    pub fn apply_profile(&self, profile: &str) -> Result<()> {
        let config = self.read();

        let profile = config
            .profile
            .get(profile)
            .with_context(|| format!("The given profile `{}` doesn't exist", profile))?;

        let values = [
            ("TEAMGROUPS_TENANT_ID", &profile.tenant_id),
            ("TEAMGROUPS_APP_ID", &profile.app_id),
            ("TEAMGROUPS_CLIENT_SECRET", &profile.client_secret),
            ("TEAMGROUPS_AUTHORITY_HOST", &profile.authority_host),
            ("TEAMGROUPS_RESOURCE", &profile.resource),
            ("TEAMGROUPS_GRAPH_URL", &profile.graph_url),
            ("TEAMGROUPS_SITE_GROUP_ID", &profile.site_group_id),
            ("TEAMGROUPS_LIST_NAME", &profile.list_name),
        ];

        for (key, value) in values {
            if let Some(value) = value {
                set_default_var(key, value);
            }
        }

        if let Some(output) = &profile.output {
            let output = to_variant_name(output).context("Invalid `output` in the profile")?;
            set_default_var("TEAMGROUPS_OUTPUT", output);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serial_test::serial;
    use tempfile::TempDir;

    use super::*;

    const KEYS: [&str; 4] = [
        "TEAMGROUPS_TENANT_ID",
        "TEAMGROUPS_APP_ID",
        "TEAMGROUPS_LIST_NAME",
        "TEAMGROUPS_OUTPUT",
    ];

    fn clear_vars() {
        for key in KEYS {
            unsafe { env::remove_var(key) };
        }
    }

    fn write_config(content: &str) -> Result<(TempDir, ConfigFile)> {
        let tmp_dir = tempfile::tempdir()?;
        let mut path = tmp_dir.path().to_owned();
        path.push("config.toml");
        fs::write(&path, content)?;
        Ok((tmp_dir, ConfigFile::from(path)))
    }

    const CONFIG: &str = r#"
[profile.prod]
tenant_id = "prod-tenant"
app_id = "prod-app"
list_name = "teams"
output = "lines"

[profile.empty]
"#;

    #[test]
    #[serial]
    fn it_applies_profile_values_to_environment() {
        clear_vars();
        let (_tmp_dir, config_file) = write_config(CONFIG).unwrap();

        config_file.apply_profile("prod").unwrap();

        assert_eq!(env::var("TEAMGROUPS_TENANT_ID").unwrap(), "prod-tenant");
        assert_eq!(env::var("TEAMGROUPS_APP_ID").unwrap(), "prod-app");
        assert_eq!(env::var("TEAMGROUPS_LIST_NAME").unwrap(), "teams");
        assert_eq!(env::var("TEAMGROUPS_OUTPUT").unwrap(), "lines");
        clear_vars();
    }

    #[test]
    #[serial]
    fn it_keeps_explicit_environment_over_profile() {
        clear_vars();
        unsafe { env::set_var("TEAMGROUPS_TENANT_ID", "explicit-tenant") };
        let (_tmp_dir, config_file) = write_config(CONFIG).unwrap();

        config_file.apply_profile("prod").unwrap();

        assert_eq!(env::var("TEAMGROUPS_TENANT_ID").unwrap(), "explicit-tenant");
        assert_eq!(env::var("TEAMGROUPS_APP_ID").unwrap(), "prod-app");
        clear_vars();
    }

    #[test]
    #[serial]
    fn it_applies_empty_profile_without_touching_environment() {
        clear_vars();
        let (_tmp_dir, config_file) = write_config(CONFIG).unwrap();

        config_file.apply_profile("empty").unwrap();

        for key in KEYS {
            assert!(env::var_os(key).is_none());
        }
    }

    #[test]
    fn it_fails_on_unknown_profile() {
        let (_tmp_dir, config_file) = write_config(CONFIG).unwrap();

        let err = config_file.apply_profile("staging").unwrap_err();

        assert!(err.to_string().contains("staging"));
    }

    #[test]
    fn it_treats_invalid_file_as_empty_config() {
        let (_tmp_dir, config_file) = write_config("this is [not toml").unwrap();

        assert!(config_file.read().profile.is_empty());
        assert!(config_file.apply_profile("prod").is_err());
    }

    #[test]
    fn it_treats_missing_file_as_empty_config() {
        let tmp_dir = tempfile::tempdir().unwrap();
        let config_file = ConfigFile::from(tmp_dir.path().join("missing.toml"));

        assert!(config_file.read().profile.is_empty());
    }
}
