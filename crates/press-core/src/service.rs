//! Post service - the operations behind both the HTML and the JSON surface.

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{Post, Principal, UploadedFile};
use crate::error::{DomainError, RepoError};
use crate::ports::{FileStorage, PostRepository};
use crate::validation::{self, PostForm};

/// Directory on the storage disk that receives post images.
pub const IMAGE_DIRECTORY: &str = "images";

const ENTITY: &str = "Post";

/// CRUD over posts, with image uploads forwarded to the storage disk.
#[derive(Clone)]
pub struct PostService {
    posts: Arc<dyn PostRepository>,
    storage: Arc<dyn FileStorage>,
}

impl PostService {
    pub fn new(posts: Arc<dyn PostRepository>, storage: Arc<dyn FileStorage>) -> Self {
        Self { posts, storage }
    }

    pub async fn list(&self) -> Result<Vec<Post>, DomainError> {
        Ok(self.posts.find_all().await?)
    }

    pub async fn show(&self, id: Uuid) -> Result<Post, DomainError> {
        self.posts
            .find_by_id(id)
            .await?
            .ok_or(DomainError::NotFound {
                entity_type: ENTITY,
                id,
            })
    }

    pub async fn create(&self, form: PostForm) -> Result<Post, DomainError> {
        let input = validation::validate_store(form)?;

        let image = self.store_image(input.image.as_ref()).await?;
        let post = self
            .posts
            .insert(Post::new(input.title, input.description, image))
            .await?;

        tracing::info!(post_id = %post.id, image = ?post.image, "Post created");
        Ok(post)
    }

    pub async fn update(&self, id: Uuid, form: PostForm) -> Result<Post, DomainError> {
        // Resolve the record before validating, so unknown ids never touch storage.
        self.show(id).await?;
        let input = validation::validate_update(form)?;

        let image = self.store_image(input.image.as_ref()).await?;
        let post = self
            .posts
            .update(id, input.into_changes(image))
            .await
            .map_err(|e| not_found_or(e, id))?;

        tracing::info!(post_id = %post.id, "Post updated");
        Ok(post)
    }

    /// Hard-delete a post. Requires an authenticated principal.
    pub async fn delete(&self, principal: Option<&Principal>, id: Uuid) -> Result<(), DomainError> {
        let Some(principal) = principal else {
            tracing::debug!(post_id = %id, "Rejected anonymous delete");
            return Err(DomainError::Unauthorized);
        };

        self.posts.delete(id).await.map_err(|e| not_found_or(e, id))?;

        tracing::info!(post_id = %id, user_id = %principal.user_id, "Post deleted");
        Ok(())
    }

    pub async fn count(&self) -> Result<u64, DomainError> {
        Ok(self.posts.count().await?)
    }

    async fn store_image(&self, file: Option<&UploadedFile>) -> Result<Option<String>, DomainError> {
        match file {
            Some(file) => Ok(Some(self.storage.put(IMAGE_DIRECTORY, file).await?)),
            None => Ok(None),
        }
    }
}

fn not_found_or(err: RepoError, id: Uuid) -> DomainError {
    match err {
        RepoError::NotFound => DomainError::NotFound {
            entity_type: ENTITY,
            id,
        },
        other => other.into(),
    }
}
