//! Configuration file structures for the Jenga bot.
//!
//! The configuration is a YAML file with two sections: the Matrix account and room
//! hosting the game, and the game rules. Any value can be overridden with an
//! environment variable prefixed with `JENGA_`, using `__` between section and key.
//!
//! ```yaml
//! matrix:
//!   user_id: "@jenga:matrix.org"
//!   password: "secret-password"
//!   room_id: "!games:matrix.org"
//!   history_limit: 500
//!
//! # optional, every key has a default
//! game:
//!   levels: 18
//!   pull_base_risk: 0.02
//!   pull_risk_per_missing_block: 0.015
//!   place_risk: 0.01
//! ```
//!
//! ```bash
//! export JENGA_MATRIX__PASSWORD="secret-from-env"
//! ```

use figment::{
    Figment,
    providers::{Env, Format, Yaml},
};
use serde::Deserialize;

/// Root configuration structure.
#[derive(Debug, Deserialize)]
pub struct Config {
    /// Matrix account and room configuration
    pub matrix: Matrix,
    /// Game rules
    #[serde(default)]
    pub game: GameRules,
}

/// Matrix account configuration.
#[derive(Debug, Deserialize)]
pub struct Matrix {
    /// Fully qualified Matrix user ID of the bot, e.g. `@jenga:matrix.org`
    pub user_id: String,

    /// Matrix account password.
    ///
    /// Only used for the first login, the session is restored from disk afterwards.
    pub password: String,

    /// Room the game is played in, e.g. `!games:matrix.org`
    pub room_id: String,

    /// Number of room messages kept in memory
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
}

/// Rules of the Jenga game.
///
/// Risks are probabilities between 0 and 1; values outside are clamped when
/// rolled.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GameRules {
    /// Number of complete levels of a fresh tower
    pub levels: usize,
    /// Chance that pulling a block collapses an intact tower
    pub pull_base_risk: f64,
    /// Extra pull collapse chance for each block missing below the top level
    pub pull_risk_per_missing_block: f64,
    /// Chance that placing a block on top collapses the tower
    pub place_risk: f64,
}

impl Default for GameRules {
    fn default() -> Self {
        GameRules {
            levels: 18,
            pull_base_risk: 0.02,
            pull_risk_per_missing_block: 0.015,
            place_risk: 0.01,
        }
    }
}

/// Highest tower accepted in `game.levels`.
const MAX_LEVELS: usize = 100;

fn default_history_limit() -> usize {
    500
}

impl Config {
    /// Loads the configuration from a YAML file, then applies `JENGA_` environment
    /// overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, a required key is missing, a
    /// value has the wrong type or `game.levels` is not between 1 and 100.
    pub fn load(path: &str) -> Result<Self, figment::Error> {
        let config: Config = Figment::new()
            .merge(Yaml::file(path))
            .merge(Env::prefixed("JENGA_").split("__"))
            .extract()?;

        if !(1..=MAX_LEVELS).contains(&config.game.levels) {
            return Err(figment::Error::from(format!(
                "game.levels must be between 1 and {MAX_LEVELS}, got {}",
                config.game.levels
            )));
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use serial_test::serial;
    use tempfile::NamedTempFile;

    use super::*;

    fn write_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    #[serial]
    fn test_load_full_config() {
        let file = write_config(
            "matrix:\n  user_id: \"@jenga:example.com\"\n  password: secret\n  room_id: \"!room:example.com\"\n  history_limit: 20\n\
             game:\n  levels: 12\n  pull_base_risk: 0.1\n  pull_risk_per_missing_block: 0.2\n  place_risk: 0.3\n",
        );

        let config = Config::load(file.path().to_str().unwrap()).unwrap();

        assert_eq!(config.matrix.user_id, "@jenga:example.com");
        assert_eq!(config.matrix.password, "secret");
        assert_eq!(config.matrix.room_id, "!room:example.com");
        assert_eq!(config.matrix.history_limit, 20);
        assert_eq!(
            config.game,
            GameRules {
                levels: 12,
                pull_base_risk: 0.1,
                pull_risk_per_missing_block: 0.2,
                place_risk: 0.3,
            }
        );
    }

    #[test]
    #[serial]
    fn test_load_defaults() {
        let file = write_config(
            "matrix:\n  user_id: \"@jenga:example.com\"\n  password: secret\n  room_id: \"!room:example.com\"\n",
        );

        let config = Config::load(file.path().to_str().unwrap()).unwrap();

        assert_eq!(config.matrix.history_limit, 500);
        assert_eq!(config.game, GameRules::default());
    }

    #[test]
    #[serial]
    fn test_load_partial_game_section() {
        let file = write_config(
            "matrix:\n  user_id: \"@jenga:example.com\"\n  password: secret\n  room_id: \"!room:example.com\"\ngame:\n  levels: 6\n",
        );

        let config = Config::load(file.path().to_str().unwrap()).unwrap();

        assert_eq!(config.game.levels, 6);
        assert_eq!(config.game.place_risk, GameRules::default().place_risk);
    }

    #[test]
    #[serial]
    fn test_load_missing_required_key() {
        let file = write_config("matrix:\n  user_id: \"@jenga:example.com\"\n");
        assert!(Config::load(file.path().to_str().unwrap()).is_err());
    }

    #[test]
    #[serial]
    fn test_load_rejects_oversized_tower() {
        let file = write_config(
            "matrix:\n  user_id: \"@jenga:example.com\"\n  password: secret\n  room_id: \"!room:example.com\"\ngame:\n  levels: 10000000000\n",
        );

        let error = Config::load(file.path().to_str().unwrap()).unwrap_err();
        assert!(error.to_string().contains("game.levels"));
    }

    #[test]
    #[serial]
    fn test_load_rejects_empty_tower() {
        let file = write_config(
            "matrix:\n  user_id: \"@jenga:example.com\"\n  password: secret\n  room_id: \"!room:example.com\"\ngame:\n  levels: 0\n",
        );

        assert!(Config::load(file.path().to_str().unwrap()).is_err());
    }

    #[test]
    #[serial]
    fn test_load_accepts_highest_tower() {
        let file = write_config(
            "matrix:\n  user_id: \"@jenga:example.com\"\n  password: secret\n  room_id: \"!room:example.com\"\ngame:\n  levels: 100\n",
        );

        let config = Config::load(file.path().to_str().unwrap()).unwrap();
        assert_eq!(config.game.levels, 100);
    }

    #[test]
    #[serial]
    fn test_env_overrides_file() {
        let file = write_config(
            "matrix:\n  user_id: \"@jenga:example.com\"\n  password: from-file\n  room_id: \"!room:example.com\"\n",
        );

        // SAFETY: tests touching the environment are serialized
        unsafe { std::env::set_var("JENGA_MATRIX__PASSWORD", "from-env") };
        let config = Config::load(file.path().to_str().unwrap());
        unsafe { std::env::remove_var("JENGA_MATRIX__PASSWORD") };

        assert_eq!(config.unwrap().matrix.password, "from-env");
    }
}
