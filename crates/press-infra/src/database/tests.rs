use chrono::Utc;
use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
use uuid::Uuid;

use press_core::domain::{Post, PostChanges};
use press_core::error::RepoError;
use press_core::ports::{BaseRepository, PostRepository};

use crate::database::entity::post;
use crate::database::postgres_repo::PostgresPostRepository;

fn row(id: Uuid, title: &str, image: Option<&str>) -> post::Model {
    let now = Utc::now();
    post::Model {
        id,
        title: title.to_owned(),
        description: "Description".to_owned(),
        image: image.map(str::to_owned),
        created_at: now.into(),
        updated_at: now.into(),
    }
}

#[tokio::test]
async fn test_find_post_by_id() {
    let post_id = Uuid::new_v4();
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![row(post_id, "Test Post", Some("images/a.jpg"))]])
        .into_connection();
    let repo = PostgresPostRepository::new(db);

    let post: Post = repo.find_by_id(post_id).await.unwrap().unwrap();

    assert_eq!(post.id, post_id);
    assert_eq!(post.title, "Test Post");
    assert_eq!(post.image.as_deref(), Some("images/a.jpg"));
}

#[tokio::test]
async fn test_find_all_posts() {
    let ids = [Uuid::new_v4(), Uuid::new_v4()];
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![row(ids[0], "First", None), row(ids[1], "Second", None)]])
        .into_connection();
    let repo = PostgresPostRepository::new(db);

    let posts: Vec<Post> = repo.find_all().await.unwrap();

    assert_eq!(posts.iter().map(|p| p.id).collect::<Vec<_>>(), ids);
}

#[tokio::test]
async fn test_insert_post_returns_stored_row() {
    let post = Post::new("New".to_string(), "Description".to_string(), None);
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![row(post.id, "New", None)]])
        .into_connection();
    let repo = PostgresPostRepository::new(db);

    let stored = repo.insert(post.clone()).await.unwrap();

    assert_eq!(stored.id, post.id);
    assert_eq!(stored.title, "New");
}

#[tokio::test]
async fn test_update_post_returns_merged_row() {
    let post_id = Uuid::new_v4();
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![row(post_id, "Edited", Some("images/new.jpg"))]])
        .into_connection();
    let repo = PostgresPostRepository::new(db);

    let post = repo
        .update(
            post_id,
            PostChanges {
                title: Some("Edited".to_string()),
                image: Some("images/new.jpg".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(post.id, post_id);
    assert_eq!(post.title, "Edited");
    assert_eq!(post.description, "Description");
}

#[tokio::test]
async fn test_delete_missing_post() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results([MockExecResult {
            last_insert_id: 0,
            rows_affected: 0,
        }])
        .into_connection();
    let repo = PostgresPostRepository::new(db);

    let result = BaseRepository::<Post, Uuid>::delete(&repo, Uuid::new_v4()).await;

    assert!(matches!(result, Err(RepoError::NotFound)));
}

#[tokio::test]
async fn test_delete_existing_post() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results([MockExecResult {
            last_insert_id: 0,
            rows_affected: 1,
        }])
        .into_connection();
    let repo = PostgresPostRepository::new(db);

    assert!(BaseRepository::<Post, Uuid>::delete(&repo, Uuid::new_v4()).await.is_ok());
}
