// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::fs::read_to_string;
use std::path::Path;

use serde::Deserialize;

use crate::error::Fallible;

const CONFIG_FILE: &str = "quizdrill.toml";

#[derive(Clone, PartialEq, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// The quiz list endpoint.
    pub endpoint: String,
    /// Default countdown length per question, in seconds.
    pub timer_seconds: u32,
    /// How long a cached fetch body stays servable, in days.
    pub cache_max_age_days: i64,
    /// Database filename, relative to the data directory.
    pub database: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: "https://example.com/mcq/content".to_string(),
            timer_seconds: 30,
            cache_max_age_days: 10,
            database: "quizdrill.db".to_string(),
        }
    }
}

impl Config {
    /// Load `quizdrill.toml` from the data directory. A missing file yields
    /// the defaults; a malformed one is an error.
    pub fn load(directory: &Path) -> Fallible<Self> {
        let path = directory.join(CONFIG_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = read_to_string(path)?;
        let config = toml::from_str(&content)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use std::fs::write;

    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.timer_seconds, 30);
        assert_eq!(config.cache_max_age_days, 10);
    }

    #[test]
    fn test_partial_file_keeps_defaults_for_the_rest() {
        let dir = TempDir::new().unwrap();
        let content = "endpoint = \"http://localhost:9000/mcq/content\"\ntimer_seconds = 15\n";
        write(dir.path().join(CONFIG_FILE), content).unwrap();
        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config.endpoint, "http://localhost:9000/mcq/content");
        assert_eq!(config.timer_seconds, 15);
        assert_eq!(config.database, "quizdrill.db");
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        write(dir.path().join(CONFIG_FILE), "timer_seconds = \"lots\"").unwrap();
        assert!(Config::load(dir.path()).is_err());
    }
}
