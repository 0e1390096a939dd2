// Recall config path for Linux: $XDG_CONFIG_HOME/recall or ~/.config/recall

use std::env;
use std::path::PathBuf;

/// Uses `$XDG_CONFIG_HOME/recall` if set, otherwise `~/.config/recall`.
pub fn get_config_dir() -> PathBuf {
    match env::var("XDG_CONFIG_HOME") {
        Ok(xdg) if !xdg.is_empty() => PathBuf::from(xdg).join("recall"),
        _ => {
            let home = env::var("HOME").unwrap_or_else(|_| String::from("/tmp"));
            PathBuf::from(home).join(".config").join("recall")
        }
    }
}
