use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// What the TUI remembers between runs.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct LocalState {
    #[serde(default)]
    pub email: Option<String>,
    /// Last session token; only a hint, it must pass the guard again on load.
    #[serde(default)]
    pub token: Option<String>,
}

impl LocalState {
    pub fn load(path: &str) -> Result<Self> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Self::default());
            }
            Err(err) => return Err(err.into()),
        };
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save(&self, path: &str) -> Result<()> {
        let parent = Path::new(path).parent();
        if let Some(parent) = parent {
            fs::create_dir_all(parent)?;
        }
        let payload = serde_json::to_string_pretty(self)?;
        fs::write(path, payload)?;
        Ok(())
    }

    pub fn remember_login(&mut self, email: &str, token: &str) {
        self.email = Some(email.trim().to_string());
        self.token = Some(token.to_string());
    }

    pub fn forget_token(&mut self) {
        self.token = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> String {
        let dir = std::env::temp_dir().join(format!("tally_tui_{}_{name}", std::process::id()));
        dir.join("state.json").to_string_lossy().into_owned()
    }

    #[test]
    fn missing_file_loads_default() {
        let state = LocalState::load(&temp_path("missing")).unwrap();
        assert_eq!(state, LocalState::default());
    }

    #[test]
    fn save_then_load_keeps_login() {
        let path = temp_path("roundtrip");
        let mut state = LocalState::default();
        state.remember_login(" me@example.com ", "abc.def.ghi");
        state.save(&path).unwrap();

        let loaded = LocalState::load(&path).unwrap();
        assert_eq!(loaded.email.as_deref(), Some("me@example.com"));
        assert_eq!(loaded.token.as_deref(), Some("abc.def.ghi"));

        let mut loaded = loaded;
        loaded.forget_token();
        loaded.save(&path).unwrap();
        let reloaded = LocalState::load(&path).unwrap();
        assert!(reloaded.token.is_none());
        assert_eq!(reloaded.email.as_deref(), Some("me@example.com"));

        let _ = fs::remove_dir_all(Path::new(&path).parent().unwrap());
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let path = temp_path("corrupt");
        fs::create_dir_all(Path::new(&path).parent().unwrap()).unwrap();
        fs::write(&path, "{not json").unwrap();
        assert!(LocalState::load(&path).is_err());
        let _ = fs::remove_dir_all(Path::new(&path).parent().unwrap());
    }
}
