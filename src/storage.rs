//! On-disk store for listing images.
//!
//! Each destination owns one directory under the media root; stored files
//! are exposed back as absolute URLs under `/media`.

use std::io;
use std::path::{Path, PathBuf};

use url::Url;
use uuid::Uuid;

/// Route prefix the media root is served under.
pub const MEDIA_ROUTE: &str = "/media";

/// Per-image upload ceiling.
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

/// Store for uploaded listing images.
#[derive(Clone)]
pub struct MediaStore {
    root: PathBuf,
    base_url: Url,
}

impl MediaStore {
    /// Create a new [`MediaStore`] rooted at `root`, exposing files under
    /// the instance public URL.
    pub fn new(
        root: impl Into<PathBuf>,
        public_url: &str,
    ) -> Result<Self, url::ParseError> {
        Ok(Self {
            root: root.into(),
            base_url: Url::parse(public_url)?,
        })
    }

    /// Directory served under [`MEDIA_ROUTE`].
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map an image content type to the stored file extension.
    /// Anything outside jpeg/jpg/png/webp is refused.
    pub fn extension_for(content_type: &str) -> Option<&'static str> {
        match content_type {
            "image/jpeg" | "image/jpg" => Some("jpg"),
            "image/png" => Some("png"),
            "image/webp" => Some("webp"),
            _ => None,
        }
    }

    /// Persist one image under the destination directory and return its
    /// absolute URL.
    pub async fn save(
        &self,
        destination_id: Uuid,
        extension: &str,
        bytes: &[u8],
    ) -> io::Result<String> {
        let dir = self.root.join(destination_id.to_string());
        tokio::fs::create_dir_all(&dir).await?;

        let file_name = format!("{}.{extension}", Uuid::new_v4());
        tokio::fs::write(dir.join(&file_name), bytes).await?;

        self.url_for(destination_id, &file_name)
            .map_err(|err| io::Error::other(err.to_string()))
    }

    /// Remove every stored image of a destination.
    pub async fn remove_all(&self, destination_id: Uuid) -> io::Result<()> {
        let dir = self.root.join(destination_id.to_string());

        match tokio::fs::remove_dir_all(&dir).await {
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            other => other,
        }
    }

    fn url_for(
        &self,
        destination_id: Uuid,
        file_name: &str,
    ) -> Result<String, url::ParseError> {
        self.base_url
            .join(&format!(
                "{}/{destination_id}/{file_name}",
                MEDIA_ROUTE.trim_start_matches('/')
            ))
            .map(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(root: impl Into<PathBuf>) -> MediaStore {
        MediaStore::new(root, "http://localhost:8080/").unwrap()
    }

    #[test]
    fn test_extension_allow_list() {
        assert_eq!(MediaStore::extension_for("image/jpeg"), Some("jpg"));
        assert_eq!(MediaStore::extension_for("image/jpg"), Some("jpg"));
        assert_eq!(MediaStore::extension_for("image/png"), Some("png"));
        assert_eq!(MediaStore::extension_for("image/webp"), Some("webp"));
        assert_eq!(MediaStore::extension_for("image/gif"), None);
        assert_eq!(MediaStore::extension_for("application/pdf"), None);
    }

    #[test]
    fn test_urls_are_absolute() {
        let id = Uuid::new_v4();
        let url = store("media").url_for(id, "photo.jpg").unwrap();

        assert_eq!(url, format!("http://localhost:8080/media/{id}/photo.jpg"));
    }

    #[tokio::test]
    async fn test_save_then_remove_all() {
        let root =
            std::env::temp_dir().join(format!("capabnb-{}", Uuid::new_v4()));
        let store = store(&root);
        let id = Uuid::new_v4();

        let url = store.save(id, "jpg", b"not really a jpeg").await.unwrap();
        assert!(url.contains(&id.to_string()));
        assert!(root.join(id.to_string()).is_dir());

        store.remove_all(id).await.unwrap();
        assert!(!root.join(id.to_string()).exists());

        // Removing an unknown destination is not an error.
        store.remove_all(Uuid::new_v4()).await.unwrap();

        tokio::fs::remove_dir_all(&root).await.ok();
    }
}
