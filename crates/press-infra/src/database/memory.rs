//! In-memory repositories - used when no database is configured and in tests.
//!
//! Data is lost on process restart.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use press_core::domain::{Post, PostChanges, User};
use press_core::error::RepoError;
use press_core::ports::{BaseRepository, PostRepository, UserRepository};

/// Posts kept in insertion order.
#[derive(Default)]
pub struct InMemoryPostRepository {
    rows: RwLock<Vec<Post>>,
}

impl InMemoryPostRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BaseRepository<Post, Uuid> for InMemoryPostRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        let rows = self.rows.read().await;
        Ok(rows.iter().find(|p| p.id == id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<Post>, RepoError> {
        Ok(self.rows.read().await.clone())
    }

    async fn insert(&self, post: Post) -> Result<Post, RepoError> {
        let mut rows = self.rows.write().await;
        if rows.iter().any(|p| p.id == post.id) {
            return Err(RepoError::Constraint(format!("post {} already exists", post.id)));
        }
        rows.push(post.clone());
        Ok(post)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut rows = self.rows.write().await;
        let index = rows
            .iter()
            .position(|p| p.id == id)
            .ok_or(RepoError::NotFound)?;
        rows.remove(index);
        Ok(())
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn update(&self, id: Uuid, changes: PostChanges) -> Result<Post, RepoError> {
        let mut rows = self.rows.write().await;
        let post = rows
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(RepoError::NotFound)?;
        post.apply(changes);
        Ok(post.clone())
    }

    async fn count(&self) -> Result<u64, RepoError> {
        Ok(self.rows.read().await.len() as u64)
    }
}

/// Users keyed by id, with a unique email constraint.
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<Uuid, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BaseRepository<User, Uuid> for InMemoryUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<User>, RepoError> {
        Ok(self.users.read().await.values().cloned().collect())
    }

    async fn insert(&self, user: User) -> Result<User, RepoError> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.email == user.email) {
            return Err(RepoError::Constraint("Entity already exists".to_string()));
        }
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        self.users
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or(RepoError::NotFound)
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        let email = User::normalize_email(email);
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(title: &str) -> Post {
        Post::new(title.to_string(), "description".to_string(), None)
    }

    #[tokio::test]
    async fn test_list_keeps_insertion_order() {
        let repo = InMemoryPostRepository::new();
        let mut ids = Vec::new();
        for i in 0..10 {
            ids.push(repo.insert(post(&format!("post {i}"))).await.unwrap().id);
        }

        let all = repo.find_all().await.unwrap();

        assert_eq!(all.iter().map(|p| p.id).collect::<Vec<_>>(), ids);
        assert_eq!(repo.count().await.unwrap(), 10);
    }

    #[tokio::test]
    async fn test_update_is_partial() {
        let repo = InMemoryPostRepository::new();
        let mut original = post("before");
        original.image = Some("images/old.png".to_string());
        let original = repo.insert(original).await.unwrap();

        let updated = repo
            .update(
                original.id,
                PostChanges {
                    description: Some("after".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.title, "before");
        assert_eq!(updated.description, "after");
        assert_eq!(updated.image.as_deref(), Some("images/old.png"));
        assert_eq!(repo.find_by_id(original.id).await.unwrap(), Some(updated));
    }

    #[tokio::test]
    async fn test_missing_rows() {
        let repo = InMemoryPostRepository::new();
        let id = Uuid::new_v4();

        assert!(repo.find_by_id(id).await.unwrap().is_none());
        assert!(matches!(repo.delete(id).await, Err(RepoError::NotFound)));
        assert!(matches!(
            repo.update(id, PostChanges::default()).await,
            Err(RepoError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_delete_removes_exactly_one() {
        let repo = InMemoryPostRepository::new();
        let keep = repo.insert(post("keep")).await.unwrap();
        let gone = repo.insert(post("gone")).await.unwrap();

        repo.delete(gone.id).await.unwrap();

        assert_eq!(repo.find_all().await.unwrap(), vec![keep]);
    }

    #[tokio::test]
    async fn test_user_email_is_unique() {
        let repo = InMemoryUserRepository::new();
        let user = repo
            .insert(User::new("a@example.com", "hash".to_string()))
            .await
            .unwrap();

        let duplicate = repo
            .insert(User::new("A@Example.com", "other".to_string()))
            .await;

        assert!(matches!(duplicate, Err(RepoError::Constraint(_))));
        assert_eq!(
            repo.find_by_email(" a@EXAMPLE.com").await.unwrap().map(|u| u.id),
            Some(user.id)
        );
    }
}
