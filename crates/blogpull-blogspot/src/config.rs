//! Pipeline configuration: one explicit object threaded through the
//! phases (no package-level mutable state).

use std::path::PathBuf;

use blogpull_core::HttpSettings;

use crate::filters::DEFAULT_MIN_WIDTH;

#[derive(Debug, Clone)]
pub struct Config {
    /// Blog root URL; also the accept-prefix for post links.
    pub base_url: String,
    /// Output directory for this blog; `blog.json` lives here.
    /// Must exist before the pipeline runs (caller creates it).
    pub namespace_dir: PathBuf,
    /// Minimum embedded-size hint for kept assets.
    pub min_width: u32,
    /// Parallel workers for the download phase; the discovery phases are
    /// strictly sequential (single checkpoint writer).
    pub workers: usize,
    pub http: HttpSettings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            namespace_dir: PathBuf::from("public"),
            min_width: DEFAULT_MIN_WIDTH,
            workers: 4,
            http: HttpSettings::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = Config::default();
        assert_eq!(config.min_width, 640);
        assert!(config.workers >= 1);
        assert_eq!(config.namespace_dir, PathBuf::from("public"));
    }
}
