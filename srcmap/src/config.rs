// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::path::Path;

use anyhow::{Context, Result};
use rcode::DecodeOptions;
use serde::{Deserialize, Serialize};

/// Settings read from a JSON file. Every key is optional.
///
/// ```json
/// {
///     "decode": {
///         "module_level_tags": [8, 29],
///         "inline_tag": 8,
///         "extended_filenames": false
///     }
/// }
/// ```
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default)]
pub struct Config {
    pub decode: DecodeOptions,
}

impl Config {
    pub fn new(data: &[u8]) -> Result<Self> {
        let config: Config = serde_json::from_slice(data)?;
        Ok(config)
    }

    pub async fn load(config_path: impl AsRef<Path>) -> Result<Self> {
        let config_path = config_path.as_ref();
        let data = tokio::fs::read(config_path)
            .await
            .with_context(|| format!("unable to read config: {}", config_path.display()))?;

        Self::new(&data)
            .with_context(|| format!("invalid config: {}", config_path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_object_uses_defaults() -> Result<()> {
        assert_eq!(Config::new(b"{}")?, Config::default());
        Ok(())
    }

    #[test]
    fn partial_decode_options() -> Result<()> {
        let config = Config::new(br#"{ "decode": { "module_level_tags": [8, 29, 30] } }"#)?;

        assert_eq!(config.decode.module_level_tags, vec![8, 29, 30]);
        assert_eq!(config.decode.inline_tag, 8);
        assert!(!config.decode.extended_filenames);
        Ok(())
    }

    #[test]
    fn rejects_bad_json() {
        assert!(Config::new(b"{ decode: ").is_err());
    }

    #[tokio::test]
    async fn load_from_file() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("srcmap.json");
        std::fs::write(&path, br#"{ "decode": { "extended_filenames": true } }"#)?;

        let config = Config::load(&path).await?;
        assert!(config.decode.extended_filenames);
        Ok(())
    }

    #[tokio::test]
    async fn load_missing_file() {
        assert!(Config::load("/nonexistent/srcmap.json").await.is_err());
    }
}
