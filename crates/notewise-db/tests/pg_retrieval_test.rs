//! Integration tests for `ai_search_notes` over PostgreSQL.
//!
//! **IMPORTANT**: These tests need a PostgreSQL server with the pgvector
//! extension available. Set `DATABASE_URL` and run with `--ignored`.

use notewise_db::{Database, Embedding, Error, RetrievalBackend, RetrievalParams};
use uuid::Uuid;

async fn setup_test_db() -> Database {
    let _ = dotenvy::dotenv();
    let database_url = std::env::var("DATABASE_URL")
        .unwrap_or_else(|_| "postgres://localhost/notewise_test".to_string());
    let db = Database::connect(&database_url)
        .await
        .expect("Failed to connect to test database");
    db.migrate().await.expect("Failed to run migrations");
    db
}

fn axis_vector(axis: usize) -> Vec<f32> {
    let mut v = vec![0.0f32; 768];
    v[axis] = 1.0;
    v
}

async fn insert_note(db: &Database, user_id: Uuid, title: &str, tags: &[&str], embedding: Vec<f32>) {
    sqlx::query(
        "INSERT INTO notes (user_id, title, tags, embedding) VALUES ($1, $2, $3, $4::vector)",
    )
    .bind(user_id)
    .bind(title)
    .bind(tags.iter().map(|t| t.to_string()).collect::<Vec<_>>())
    .bind(pgvector::Vector::from(embedding))
    .execute(db.pool())
    .await
    .expect("Failed to insert note");
}

#[tokio::test]
#[ignore] // Requires database connection with pgvector
async fn test_vector_search_orders_by_similarity() {
    let db = setup_test_db().await;
    let user_id = Uuid::now_v7();
    insert_note(&db, user_id, "far", &["misc"], axis_vector(1)).await;
    insert_note(&db, user_id, "near", &["misc"], axis_vector(0)).await;

    let items = db
        .retrieval
        .search_notes(&RetrievalParams {
            query_embedding: Some(Embedding::new(axis_vector(0))),
            user_id: user_id.to_string(),
            match_count: 10,
            tag_filter: None,
        })
        .await
        .unwrap();

    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["title"], "near");
}

#[tokio::test]
#[ignore] // Requires database connection with pgvector
async fn test_tag_only_search_is_case_insensitive() {
    let db = setup_test_db().await;
    let user_id = Uuid::now_v7();
    insert_note(&db, user_id, "tagged", &["Work"], axis_vector(2)).await;
    insert_note(&db, user_id, "other", &["home"], axis_vector(3)).await;

    let items = db
        .retrieval
        .search_notes(&RetrievalParams {
            query_embedding: None,
            user_id: user_id.to_string(),
            match_count: 20,
            tag_filter: Some("work".to_string()),
        })
        .await
        .unwrap();

    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["title"], "tagged");
}

#[tokio::test]
#[ignore] // Requires database connection
async fn test_invalid_user_id_is_retrieval_error() {
    let db = setup_test_db().await;

    let err = db
        .retrieval
        .search_notes(&RetrievalParams {
            query_embedding: None,
            user_id: "not-a-uuid".to_string(),
            match_count: 20,
            tag_filter: Some("work".to_string()),
        })
        .await
        .unwrap_err();

    match err {
        Error::Retrieval { details, .. } => assert_eq!(details["code"], "22P02"),
        other => panic!("expected retrieval error, got {:?}", other),
    }
}
