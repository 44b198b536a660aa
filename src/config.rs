// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Configuration layout.
//!
//! Specify the layout of the tool configuration file to simplify the process
//! of serialization and deserialization. File I/O is left to the caller to
//! figure out.
//!
//! # General Layout
//!
//! ```toml
//! [settings]
//! profiles_dir = "$HOME/workspaces/profiles"
//! backup = true
//! detection = "substring"
//! ```
//!
//! Every field is optional. A missing configuration file is the same as an
//! empty one.

use crate::profile::matcher::Detection;

use serde::{Deserialize, Serialize};
use std::{
    fmt::{Display, Error as FmtError, Formatter, Result as FmtResult},
    path::{Path, PathBuf},
    str::FromStr,
};

/// Tool configuration layout.
#[derive(Default, Debug, PartialEq, Eq, Clone, Deserialize, Serialize)]
pub struct ToolConfig {
    /// General settings.
    #[serde(default)]
    pub settings: ToolSettings,
}

impl FromStr for ToolConfig {
    type Err = ConfigError;

    fn from_str(data: &str) -> Result<Self, Self::Err> {
        let mut config: ToolConfig = toml::de::from_str(data).map_err(ConfigError::Deserialize)?;

        // INVARIANT: Perform shell expansion on profiles directory field.
        if let Some(profiles_dir) = config.settings.profiles_dir.take() {
            config.settings.profiles_dir = Some(ProfilesDir::new(
                shellexpand::full(profiles_dir.to_string().as_str())
                    .map_err(ConfigError::ShellExpansion)?
                    .into_owned(),
            ));
        }

        Ok(config)
    }
}

impl Display for ToolConfig {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> FmtResult {
        fmt.write_str(
            toml::ser::to_string_pretty(self)
                .map_err(ConfigError::Serialize)?
                .as_str(),
        )
    }
}

/// General tool settings.
#[derive(Debug, PartialEq, Eq, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ToolSettings {
    /// Directory holding all profiles.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profiles_dir: Option<ProfilesDir>,

    /// Back up profiles before updating them.
    pub backup: bool,

    /// Strategy to detect existing configuration with.
    pub detection: Detection,
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            profiles_dir: None,
            backup: true,
            detection: Detection::default(),
        }
    }
}

/// Path to directory holding all profiles.
#[derive(Default, Debug, PartialEq, Eq, Clone, Deserialize, Serialize)]
pub struct ProfilesDir(PathBuf);

impl ProfilesDir {
    /// Construct new profiles directory.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }

    /// Treat profiles directory as [`Path`] slice.
    pub fn as_path(&self) -> &Path {
        self.0.as_path()
    }
}

impl Display for ProfilesDir {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> FmtResult {
        fmt.write_str(self.as_path().to_string_lossy().as_ref())
    }
}

/// Configuration error types.
#[derive(Clone, Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to deserialize configuration.
    #[error(transparent)]
    Deserialize(#[from] toml::de::Error),

    /// Failed to serialize configuration.
    #[error(transparent)]
    Serialize(#[from] toml::ser::Error),

    /// Failed to perform shell expansion on configuration.
    #[error(transparent)]
    ShellExpansion(#[from] shellexpand::LookupError<std::env::VarError>),
}

impl From<ConfigError> for FmtError {
    fn from(_: ConfigError) -> Self {
        FmtError
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;
    use pretty_assertions::assert_eq;
    use sealed_test::prelude::*;

    #[sealed_test(env = [("BLAH", "/home/blah/blah")])]
    fn deserialize_tool_config() -> anyhow::Result<()> {
        let result: ToolConfig = r#"
            [settings]
            profiles_dir = "$BLAH/profiles"
            backup = false
            detection = "line"
        "#
        .parse()?;

        let expect = ToolConfig {
            settings: ToolSettings {
                profiles_dir: Some(ProfilesDir::new("/home/blah/blah/profiles")),
                backup: false,
                detection: Detection::Line,
            },
        };

        assert_eq!(result, expect);

        Ok(())
    }

    #[test]
    fn deserialize_empty_tool_config() -> anyhow::Result<()> {
        let result: ToolConfig = "".parse()?;
        assert_eq!(result, ToolConfig::default());
        assert!(result.settings.backup);

        Ok(())
    }

    #[test]
    fn deserialize_unknown_detection_fails() {
        let result = "[settings]\ndetection = \"regex\"\n".parse::<ToolConfig>();
        assert!(matches!(result, Err(ConfigError::Deserialize(_))));
    }

    #[test]
    fn serialize_tool_config() {
        let result = ToolConfig {
            settings: ToolSettings {
                profiles_dir: Some(ProfilesDir::new("/home/blah/profiles")),
                backup: true,
                detection: Detection::Substring,
            },
        }
        .to_string();

        let expect = indoc! {r#"
            [settings]
            profiles_dir = "/home/blah/profiles"
            backup = true
            detection = "substring"
        "#};

        assert_eq!(result, expect);
    }
}
