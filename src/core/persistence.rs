//! Persistence of user preferences (the last selected provider) in ~/.config/texchat/.

use std::fs;
use std::io;

use crate::core::paths;

const LAST_PROVIDER_FILE: &str = "last_provider";

/// Load the last used provider from disk, if the file exists.
pub fn load_last_provider() -> Option<String> {
    let path = paths::config_dir()?.join(LAST_PROVIDER_FILE);
    fs::read_to_string(path)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Save the last used provider. `None` (backend default) removes the file.
pub fn save_last_provider(provider: Option<&str>) -> io::Result<()> {
    let dir = paths::config_dir()
        .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "No config directory"))?;
    let path = dir.join(LAST_PROVIDER_FILE);
    match provider {
        Some(p) => {
            fs::create_dir_all(&dir)?;
            fs::write(path, p)
        }
        None => match fs::remove_file(path) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
            _ => Ok(()),
        },
    }
}
