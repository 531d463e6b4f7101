//! Profile command implementation.

use crate::cli::{ProfileAction, ProfileArgs};
use crate::config::{Config, Profile};
use crate::error::Result;
use crate::output::Formatter;
use std::path::Path;

/// Execute the profile command, saving the config after any change.
pub fn execute_profile(
    args: ProfileArgs,
    config: &mut Config,
    config_path: &Path,
    formatter: &Formatter,
) -> Result<()> {
    let changed = match args.action {
        ProfileAction::List => {
            list_profiles(config, formatter);
            None
        }
        ProfileAction::Show => {
            show_active_profile(config, formatter)?;
            None
        }
        ProfileAction::Switch { name } => {
            config.switch_profile(name.clone())?;
            Some(format!("Switched to profile '{}'", name))
        }
        ProfileAction::Set {
            name,
            endpoint,
            model,
            max_retries,
            timeout_secs,
        } => {
            let profile = Profile {
                endpoint,
                model,
                max_retries,
                timeout_secs,
            };
            Some(set_profile(config, name, profile))
        }
        ProfileAction::Delete { name } => {
            config.remove_profile(&name)?;
            Some(format!("Deleted profile '{}'", name))
        }
    };

    if let Some(message) = changed {
        config.save(config_path)?;
        println!("{}", formatter.success(&message));
    }
    Ok(())
}

/// List all profiles.
fn list_profiles(config: &Config, formatter: &Formatter) {
    if config.profiles.is_empty() {
        println!("{}", formatter.info("No profiles configured"));
        return;
    }

    println!("Available profiles:");
    for (name, profile) in &config.profiles {
        if name == &config.active_profile {
            println!("* {}", formatter.success(name));
        } else {
            println!("  {}", name);
        }
        print_profile(profile, "    ");
    }
}

/// Show the active profile.
fn show_active_profile(config: &Config, formatter: &Formatter) -> Result<()> {
    let profile = config.get_active_profile()?;

    println!("Active profile: {}", formatter.success(&config.active_profile));
    print_profile(profile, "  ");
    Ok(())
}

fn print_profile(profile: &Profile, indent: &str) {
    println!("{}Endpoint: {}", indent, profile.endpoint);
    println!("{}Model: {}", indent, profile.model);
    println!("{}Retries: {}", indent, profile.max_retries);
    println!("{}Timeout: {}s", indent, profile.timeout_secs);
}

/// Create or update a profile, returning the message to report.
fn set_profile(config: &mut Config, name: String, profile: Profile) -> String {
    let action = if config.profiles.contains_key(&name) {
        "Updated"
    } else {
        "Created"
    };
    let message = format!("{} profile '{}'", action, name);
    config.set_profile(name, profile);
    message
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputFormat;
    use tempfile::TempDir;

    fn set_action(name: &str, model: &str) -> ProfileArgs {
        ProfileArgs {
            action: ProfileAction::Set {
                name: name.to_string(),
                endpoint: "http://gpu-box:11434".to_string(),
                model: model.to_string(),
                max_retries: 1,
                timeout_secs: 30,
            },
        }
    }

    #[test]
    fn test_set_and_switch_profile_persists() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        let mut config = Config::default();
        let formatter = Formatter::new(OutputFormat::Table, false);

        execute_profile(set_action("gpu", "mistral"), &mut config, &path, &formatter).unwrap();
        execute_profile(
            ProfileArgs {
                action: ProfileAction::Switch {
                    name: "gpu".to_string(),
                },
            },
            &mut config,
            &path,
            &formatter,
        )
        .unwrap();

        let saved = Config::load(&path).unwrap();
        assert_eq!(saved.active_profile, "gpu");
        assert_eq!(saved.get_active_profile().unwrap().model, "mistral");
    }

    #[test]
    fn test_set_reports_update() {
        let mut config = Config::default();
        let profile = config.profiles["default"].clone();
        assert_eq!(
            set_profile(&mut config, "default".to_string(), profile),
            "Updated profile 'default'"
        );
    }

    #[test]
    fn test_delete_active_profile() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        let mut config = Config::default();
        let formatter = Formatter::new(OutputFormat::Table, false);

        let result = execute_profile(
            ProfileArgs {
                action: ProfileAction::Delete {
                    name: "default".to_string(),
                },
            },
            &mut config,
            &path,
            &formatter,
        );
        assert!(result.is_err());
        assert!(!path.exists());
    }
}
