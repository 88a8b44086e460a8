//! Optional `blockgen.toml` configuration.

use std::path::Path;

use blocks::board::{BoardProfile, builtin_boards};
use generator::GenerateOptions;
use serde::Deserialize;

/// Looked up in the working directory when `--config` is not given.
pub const CONFIG_FILE_NAME: &str = "blockgen.toml";

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Board used when neither the command line nor the program names one.
    #[serde(default = "default_board")]
    pub default_board: String,

    /// Spaces per indentation level in generated sketches.
    #[serde(default = "default_indent")]
    pub indent: usize,

    /// Extra boards. An entry with a built-in board's name replaces it.
    #[serde(default)]
    pub boards: Vec<BoardProfile>,
}

fn default_board() -> String {
    "uno".to_string()
}

fn default_indent() -> usize {
    2
}

impl Default for Config {
    fn default() -> Self {
        Config {
            default_board: default_board(),
            indent: default_indent(),
            boards: Vec::new(),
        }
    }
}

impl Config {
    /// Load `explicit` if given (it must exist), otherwise `blockgen.toml`
    /// in the working directory if present, otherwise defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Config, String> {
        let path = match explicit {
            Some(path) => path,
            None => {
                let local = Path::new(CONFIG_FILE_NAME);
                if !local.is_file() {
                    return Ok(Config::default());
                }
                local
            }
        };
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("cannot read config '{}': {}", path.display(), e))?;
        Config::from_toml(&content).map_err(|e| format!("{}: {}", path.display(), e))
    }

    pub fn from_toml(content: &str) -> Result<Config, String> {
        let config: Config =
            toml::from_str(content).map_err(|e| format!("invalid configuration: {}", e.message()))?;
        if config.indent > 16 {
            return Err(format!("indent must be at most 16, got {}", config.indent));
        }
        Ok(config)
    }

    /// Configured boards first, then built-ins not shadowed by them.
    pub fn all_boards(&self) -> Vec<BoardProfile> {
        let mut boards = self.boards.clone();
        for builtin in builtin_boards() {
            if !boards.iter().any(|b| b.name.eq_ignore_ascii_case(&builtin.name)) {
                boards.push(builtin);
            }
        }
        boards
    }

    pub fn find_board(&self, name: &str) -> Option<BoardProfile> {
        self.all_boards()
            .into_iter()
            .find(|b| b.name.eq_ignore_ascii_case(name))
    }

    pub fn options(&self) -> GenerateOptions {
        GenerateOptions {
            indent: self.indent,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blocks::board::PinRole;

    #[test]
    fn empty_file_is_default() {
        assert_eq!(Config::from_toml("").unwrap(), Config::default());
    }

    #[test]
    fn custom_board_shadows_builtin() {
        let config = Config::from_toml(
            r#"
default_board = "uno"
indent = 4

[[boards]]
name = "UNO"
digital_pins = ["2"]
pwm_pins = ["2"]
"#,
        )
        .unwrap();
        let uno = config.find_board("uno").unwrap();
        assert!(uno.supports(PinRole::Servo, "2"));
        assert!(!uno.supports(PinRole::Servo, "9"));
        assert_eq!(config.all_boards().len(), 4);
        assert_eq!(config.options().indent, 4);
    }

    #[test]
    fn unknown_key_is_rejected() {
        assert!(Config::from_toml("colour = true").is_err());
    }

    #[test]
    fn oversized_indent_is_rejected() {
        assert!(Config::from_toml("indent = 40").is_err());
    }

    #[test]
    fn explicit_path_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(Config::load(Some(&missing)).is_err());

        let present = dir.path().join("blockgen.toml");
        std::fs::write(&present, "default_board = \"mega\"\n").unwrap();
        assert_eq!(Config::load(Some(&present)).unwrap().default_board, "mega");
    }
}
