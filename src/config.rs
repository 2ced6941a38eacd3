//! Purpose: Load the default-manager TOML config into an identifier plus settings.
//! Exports: `DefaultManagerConfig`, `load_default_manager_config`, `DEFAULT_CONFIG_ENV_VAR`.
//! Role: Lets hosts pick a manager and its settings without code changes.
//! Invariants: Settings hold only bool/int/float/string values; anything else is rejected.
//! Invariants: `${config_dir}` in string settings expands to the file's canonical directory.
use crate::core::error::{Error, ErrorKind, Result};
use crate::core::value::{InfoDictionary, Value};
use serde::Deserialize;
use std::path::Path;

pub const DEFAULT_CONFIG_ENV_VAR: &str = "ASSETIO_DEFAULT_CONFIG";

const CONFIG_DIR_VAR: &str = "${config_dir}";

#[derive(Clone, Debug, PartialEq)]
pub struct DefaultManagerConfig {
    pub identifier: String,
    pub settings: InfoDictionary,
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    manager: ManagerSection,
}

#[derive(Debug, Default, Deserialize)]
struct ManagerSection {
    #[serde(default)]
    identifier: String,
    #[serde(default)]
    settings: toml::Table,
}

pub fn load_default_manager_config(path: &Path) -> Result<DefaultManagerConfig> {
    let shown = path.display();
    if !path.exists() {
        return Err(Error::input_validation(format!(
            "Could not load default manager config from '{shown}', file does not exist."
        )));
    }
    if path.is_dir() {
        return Err(Error::input_validation(format!(
            "Could not load default manager config from '{shown}', must be a TOML file not a directory."
        )));
    }

    let text = std::fs::read_to_string(path).map_err(|err| {
        Error::new(ErrorKind::Io)
            .with_message("failed to read config file")
            .with_path(path)
            .with_source(err)
    })?;
    let parsed: ConfigFile = toml::from_str(&text)
        .map_err(|err| Error::configuration(format!("Error parsing config file. {err}")))?;

    let config_dir = path
        .canonicalize()
        .ok()
        .and_then(|canonical| canonical.parent().map(|dir| dir.display().to_string()))
        .unwrap_or_default();

    let mut settings = InfoDictionary::new();
    for (key, value) in parsed.manager.settings {
        let converted = match value {
            toml::Value::Integer(value) => Value::Int(value),
            toml::Value::Float(value) => Value::Float(value),
            toml::Value::Boolean(value) => Value::Bool(value),
            toml::Value::String(value) => Value::Str(value.replace(CONFIG_DIR_VAR, &config_dir)),
            _ => {
                return Err(Error::configuration(format!(
                    "Unsupported value type for '{key}'."
                )));
            }
        };
        settings.insert(key, converted);
    }

    Ok(DefaultManagerConfig {
        identifier: parsed.manager.identifier,
        settings,
    })
}

#[cfg(test)]
mod tests {
    use super::load_default_manager_config;
    use crate::core::error::ErrorKind;
    use crate::core::value::Value;
    use std::fs;

    #[test]
    fn parses_identifier_and_typed_settings() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("assetio.toml");
        fs::write(
            &path,
            r#"
[manager]
identifier = "org.example.manager"

[manager.settings]
count = 3
ratio = 0.5
enabled = true
library = "${config_dir}/library.json"
"#,
        )
        .expect("write config");

        let config = load_default_manager_config(&path).expect("load");
        let canonical_dir = dir.path().canonicalize().expect("canonical");
        assert_eq!(config.identifier, "org.example.manager");
        assert_eq!(config.settings.get("count"), Some(&Value::Int(3)));
        assert_eq!(config.settings.get("ratio"), Some(&Value::Float(0.5)));
        assert_eq!(config.settings.get("enabled"), Some(&Value::Bool(true)));
        assert_eq!(
            config.settings.get("library"),
            Some(&Value::Str(format!("{}/library.json", canonical_dir.display())))
        );
    }

    #[test]
    fn missing_file_and_directory_are_input_errors() {
        let dir = tempfile::tempdir().expect("tempdir");
        let missing = dir.path().join("absent.toml");
        let err = load_default_manager_config(&missing).expect_err("missing");
        assert_eq!(err.kind(), ErrorKind::InputValidation);
        assert!(err.to_string().contains("file does not exist."));

        let err = load_default_manager_config(dir.path()).expect_err("directory");
        assert_eq!(err.kind(), ErrorKind::InputValidation);
        assert!(err.to_string().contains("must be a TOML file not a directory."));
    }

    #[test]
    fn unsupported_values_and_bad_syntax_are_configuration_errors() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("array.toml");
        fs::write(&path, "[manager]\nidentifier = \"x\"\n[manager.settings]\nlist = [1, 2]\n")
            .expect("write config");
        let err = load_default_manager_config(&path).expect_err("array setting");
        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert_eq!(err.message(), Some("Unsupported value type for 'list'."));

        let path = dir.path().join("broken.toml");
        fs::write(&path, "[manager\n").expect("write config");
        let err = load_default_manager_config(&path).expect_err("syntax");
        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert!(err.message().unwrap_or_default().starts_with("Error parsing config file. "));
    }
}
