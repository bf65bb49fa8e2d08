//! Documentation loading - resolves section identifiers to HTML.

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::fs;
use tracing::{debug, error};

use crate::catalog::{SectionCatalog, ALL_SECTIONS};
use crate::config::Config;
use crate::error::{Error, Result};

/// Source of documentation HTML keyed by section.
#[async_trait]
pub trait ContentLoader: Send + Sync {
    /// Load the HTML for `section`, or the aggregate corpus for `None`/`"all"`.
    async fn load(&self, section: Option<&str>) -> Result<String>;
}

/// Loads `<docs_dir>/<section>.html` files from disk.
pub struct FsContentLoader {
    docs_dir: PathBuf,
    aggregate_path: PathBuf,
    catalog: Arc<SectionCatalog>,
}

impl FsContentLoader {
    pub fn new(config: &Config, catalog: Arc<SectionCatalog>) -> Self {
        Self {
            docs_dir: config.docs_dir.clone(),
            aggregate_path: config.aggregate_path(),
            catalog,
        }
    }

    /// File backing `section`, if the section exists.
    pub fn path_for(&self, section: Option<&str>) -> Result<PathBuf> {
        match section {
            None | Some(ALL_SECTIONS) => Ok(self.aggregate_path.clone()),
            Some(id) if self.catalog.contains(id) => {
                Ok(self.docs_dir.join(format!("{}.html", id)))
            }
            Some(id) => Err(Error::SectionNotFound(id.to_string())),
        }
    }
}

#[async_trait]
impl ContentLoader for FsContentLoader {
    async fn load(&self, section: Option<&str>) -> Result<String> {
        let path = self.path_for(section)?;
        debug!("Loading documentation from {:?}", path);

        match fs::read_to_string(&path).await {
            Ok(content) => Ok(content),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(Error::SectionNotFound(
                section.unwrap_or(ALL_SECTIONS).to_string(),
            )),
            Err(e) => {
                error!("Failed to read documentation {:?}: {}", path, e);
                Err(Error::Io(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_loader() -> (FsContentLoader, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(
            temp_dir.path().join("activerecord.html"),
            "<h1>ActiveRecord</h1>",
        )
        .unwrap();
        std::fs::write(
            temp_dir.path().join("rails_api.html"),
            "<h1>Everything</h1>",
        )
        .unwrap();

        let config = Config {
            docs_dir: temp_dir.path().to_path_buf(),
            ..Config::default()
        };
        let loader = FsContentLoader::new(&config, Arc::new(SectionCatalog::rails()));
        (loader, temp_dir)
    }

    #[tokio::test]
    async fn test_load_section() {
        let (loader, _temp) = create_test_loader();
        let html = loader.load(Some("activerecord")).await.unwrap();
        assert_eq!(html, "<h1>ActiveRecord</h1>");
    }

    #[tokio::test]
    async fn test_load_aggregate() {
        let (loader, _temp) = create_test_loader();
        assert_eq!(loader.load(None).await.unwrap(), "<h1>Everything</h1>");
        assert_eq!(loader.load(Some("all")).await.unwrap(), "<h1>Everything</h1>");
    }

    #[tokio::test]
    async fn test_unknown_section_not_found() {
        let (loader, _temp) = create_test_loader();
        let err = loader.load(Some("activewidget")).await.unwrap_err();
        assert!(matches!(err, Error::SectionNotFound(ref s) if s == "activewidget"));
    }

    #[tokio::test]
    async fn test_missing_file_not_found() {
        let (loader, _temp) = create_test_loader();
        let err = loader.load(Some("actionview")).await.unwrap_err();
        assert!(matches!(err, Error::SectionNotFound(ref s) if s == "actionview"));
    }

    #[tokio::test]
    async fn test_missing_aggregate_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let config = Config {
            docs_dir: temp_dir.path().to_path_buf(),
            ..Config::default()
        };
        let loader = FsContentLoader::new(&config, Arc::new(SectionCatalog::rails()));

        let err = loader.load(None).await.unwrap_err();
        assert!(matches!(err, Error::SectionNotFound(ref s) if s == "all"));
    }

    #[tokio::test]
    async fn test_unreadable_file_is_io_error() {
        let (loader, temp) = create_test_loader();
        // A directory where a file is expected fails with something other than NotFound.
        std::fs::create_dir(temp.path().join("actionmailer.html")).unwrap();

        let err = loader.load(Some("actionmailer")).await.unwrap_err();
        assert!(matches!(err, Error::Io(_)));
        assert!(!err.is_invalid_params());
    }

    #[tokio::test]
    async fn test_custom_aggregate_file() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("everything.html"), "<h1>All</h1>").unwrap();
        let config = Config {
            docs_dir: temp_dir.path().to_path_buf(),
            aggregate_file: "everything.html".to_string(),
            ..Config::default()
        };
        let loader = FsContentLoader::new(&config, Arc::new(SectionCatalog::rails()));

        assert_eq!(loader.path_for(None).unwrap(), config.aggregate_path());
        assert_eq!(loader.load(None).await.unwrap(), "<h1>All</h1>");
    }

    #[test]
    fn test_path_for_rejects_traversal() {
        let (loader, _temp) = create_test_loader();
        assert!(matches!(
            loader.path_for(Some("../secrets")),
            Err(Error::SectionNotFound(_))
        ));
    }
}
