//! Default on-disk locations
//!
//! Paths are resolved from the platform data directory so the database lands in the
//! same place no matter which working directory the binary is started from:
//! - Linux: `$XDG_DATA_HOME/gradebook/` or `~/.local/share/gradebook/`
//! - macOS: `~/Library/Application Support/gradebook/`
//! - Windows: `{FOLDERID_RoamingAppData}\gradebook\`

use std::path::PathBuf;
use tracing::{debug, warn};

/// Get the data directory for Gradebook.
///
/// Only resolves the path; see [`ensure_data_dir`] to create it.
pub fn get_data_dir() -> PathBuf {
    dirs::data_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join(".local").join("share")))
        .unwrap_or_else(|| {
            warn!("Could not determine data directory, using /tmp");
            PathBuf::from("/tmp")
        })
        .join("gradebook")
}

/// Create the data directory if it doesn't exist and return it.
pub fn ensure_data_dir() -> std::io::Result<PathBuf> {
    let dir = get_data_dir();
    std::fs::create_dir_all(&dir)?;

    debug!("Data directory: {:?}", dir);
    Ok(dir)
}

/// Get the database path for Gradebook.
///
/// Returns: `{data dir}/gradebook/gradebook.db`
pub fn get_database_path() -> PathBuf {
    get_data_dir().join("gradebook.db")
}

/// Default sqlx connection URL pointing at [`get_database_path`].
pub fn default_database_url() -> String {
    format!("sqlite://{}", get_database_path().to_string_lossy())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_path_is_not_relative() {
        let path = get_database_path();
        assert!(path.is_absolute(), "Database path must be absolute path");
        assert!(
            path.to_string_lossy().ends_with("gradebook.db"),
            "Database path must end with gradebook.db"
        );
    }

    #[test]
    fn test_default_url_uses_sqlite_scheme() {
        let url = default_database_url();
        assert!(url.starts_with("sqlite://"));
        assert!(url.ends_with("gradebook.db"));
    }

    // The only test that creates the data directory; it points the lookup at a
    // private location first.
    #[cfg(target_os = "linux")]
    #[test]
    fn test_default_url_does_not_create_data_dir() {
        let temp = tempfile::TempDir::new().expect("temp dir");
        let xdg = temp.path().join("xdg");
        std::env::set_var("XDG_DATA_HOME", &xdg);

        let url = default_database_url();
        let config = crate::utils::config::Config::default();
        assert!(url.starts_with(&format!("sqlite://{}", xdg.display())));
        assert_eq!(config.database.url, url);
        assert!(
            !xdg.join("gradebook").exists(),
            "Resolving the default url must not touch the filesystem"
        );

        let dir = ensure_data_dir().expect("create data dir");
        assert_eq!(dir, xdg.join("gradebook"));
        assert!(std::fs::metadata(&dir).is_ok());
    }
}
