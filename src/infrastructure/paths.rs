//! Data directory resolution.
//!
//! The data directory holds the key/value store (`store.json`) and the log
//! file. It is resolved from the environment in this order:
//!
//! 1. `GIFSEEK_DATA_DIR`
//! 2. `$XDG_DATA_HOME/gifseek`
//! 3. `$HOME/.local/share/gifseek`
//! 4. `./.gifseek`

use std::path::PathBuf;

/// File name of the key/value store inside the data directory.
pub const STORE_FILE_NAME: &str = "store.json";

/// Returns the data directory for gifseek storage and logs.
#[must_use]
pub fn get_data_dir() -> PathBuf {
    resolve_data_dir(|name| std::env::var(name).ok())
}

fn resolve_data_dir(var: impl Fn(&str) -> Option<String>) -> PathBuf {
    let non_empty = |name: &str| var(name).filter(|v| !v.trim().is_empty());

    if let Some(dir) = non_empty("GIFSEEK_DATA_DIR") {
        return PathBuf::from(dir);
    }
    if let Some(xdg) = non_empty("XDG_DATA_HOME") {
        return PathBuf::from(xdg).join("gifseek");
    }
    if let Some(home) = non_empty("HOME") {
        return PathBuf::from(home).join(".local").join("share").join("gifseek");
    }
    PathBuf::from(".gifseek")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn resolve(vars: &[(&str, &str)]) -> PathBuf {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        resolve_data_dir(|name| vars.get(name).cloned())
    }

    #[test]
    fn explicit_dir_wins() {
        let dir = resolve(&[("GIFSEEK_DATA_DIR", "/srv/gifseek"), ("HOME", "/home/u")]);
        assert_eq!(dir, PathBuf::from("/srv/gifseek"));
    }

    #[test]
    fn xdg_before_home() {
        let dir = resolve(&[("XDG_DATA_HOME", "/x"), ("HOME", "/home/u")]);
        assert_eq!(dir, PathBuf::from("/x/gifseek"));
    }

    #[test]
    fn home_fallback() {
        let dir = resolve(&[("HOME", "/home/u"), ("XDG_DATA_HOME", " ")]);
        assert_eq!(dir, PathBuf::from("/home/u/.local/share/gifseek"));
    }

    #[test]
    fn working_directory_last() {
        assert_eq!(resolve(&[]), PathBuf::from(".gifseek"));
    }
}
