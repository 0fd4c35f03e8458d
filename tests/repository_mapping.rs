use sqlx::PgPool;
use std::sync::Arc;

use shorten::domain::entities::{InsertOutcome, NewMapping};
use shorten::domain::repositories::MappingRepository;
use shorten::infrastructure::persistence::PgMappingRepository;

async fn insert_row(pool: &PgPool, code: &str, url: &str) {
    sqlx::query("INSERT INTO urls (code, url, author) VALUES ($1, $2, $3)")
        .bind(code)
        .bind(url)
        .bind("192.0.2.1")
        .execute(pool)
        .await
        .unwrap();
}

#[sqlx::test]
async fn test_insert_creates_mapping(pool: PgPool) {
    let repo = PgMappingRepository::new(Arc::new(pool));

    let outcome = repo
        .insert(NewMapping::now("AbcDef", "https://example.com", "192.0.2.1"))
        .await
        .unwrap();

    assert_eq!(outcome, InsertOutcome::Created("AbcDef".to_string()));

    let mapping = repo.find_by_code("AbcDef").await.unwrap().unwrap();
    assert_eq!(mapping.url, "https://example.com");
    assert_eq!(mapping.author, "192.0.2.1");
    assert_eq!(mapping.hits, 0);
}

#[sqlx::test]
async fn test_insert_existing_url_returns_stored_code(pool: PgPool) {
    insert_row(&pool, "AbcDef", "https://example.com").await;
    let repo = PgMappingRepository::new(Arc::new(pool));

    let outcome = repo
        .insert(NewMapping::now("XyzXyz", "https://example.com", "192.0.2.9"))
        .await
        .unwrap();

    assert_eq!(outcome, InsertOutcome::Existing("AbcDef".to_string()));
    assert!(!repo.exists("XyzXyz").await.unwrap());
}

#[sqlx::test]
async fn test_insert_taken_code(pool: PgPool) {
    insert_row(&pool, "AbcDef", "https://example.com/one").await;
    let repo = PgMappingRepository::new(Arc::new(pool));

    let outcome = repo
        .insert(NewMapping::now("AbcDef", "https://example.com/two", "192.0.2.1"))
        .await
        .unwrap();

    assert_eq!(outcome, InsertOutcome::CodeTaken);
    assert_eq!(repo.find_by_url("https://example.com/two").await.unwrap(), None);
}

#[sqlx::test]
async fn test_find_by_url_is_exact(pool: PgPool) {
    insert_row(&pool, "AbcDef", "https://example.com/Path").await;
    let repo = PgMappingRepository::new(Arc::new(pool));

    assert_eq!(
        repo.find_by_url("https://example.com/Path").await.unwrap(),
        Some("AbcDef".to_string())
    );
    assert_eq!(repo.find_by_url("https://example.com/path").await.unwrap(), None);
}

#[sqlx::test]
async fn test_exists(pool: PgPool) {
    insert_row(&pool, "AbcDef", "https://example.com").await;
    let repo = PgMappingRepository::new(Arc::new(pool));

    assert!(repo.exists("AbcDef").await.unwrap());
    assert!(!repo.exists("Nopexy").await.unwrap());
}

#[sqlx::test]
async fn test_increment_hits_unknown_code(pool: PgPool) {
    let repo = PgMappingRepository::new(Arc::new(pool));

    assert!(!repo.increment_hits("Nopexy").await.unwrap());
}

#[sqlx::test]
async fn test_concurrent_increments_are_atomic(pool: PgPool) {
    insert_row(&pool, "AbcDef", "https://example.com").await;
    let repo = Arc::new(PgMappingRepository::new(Arc::new(pool)));

    let tasks: Vec<_> = (0..25)
        .map(|_| {
            let repo = repo.clone();
            tokio::spawn(async move { repo.increment_hits("AbcDef").await })
        })
        .collect();

    for task in tasks {
        assert!(task.await.unwrap().unwrap());
    }

    let mapping = repo.find_by_code("AbcDef").await.unwrap().unwrap();
    assert_eq!(mapping.hits, 25);
}

#[sqlx::test]
async fn test_ping(pool: PgPool) {
    let repo = PgMappingRepository::new(Arc::new(pool));

    assert!(repo.ping().await.is_ok());
}

#[sqlx::test]
async fn test_concurrent_inserts_of_same_url_agree(pool: PgPool) {
    let repo = Arc::new(PgMappingRepository::new(Arc::new(pool)));

    let tasks: Vec<_> = ["AaaAaa", "BbbBbb", "CccCcc", "DddDdd"]
        .into_iter()
        .map(|code| {
            let repo = repo.clone();
            tokio::spawn(async move {
                repo.insert(NewMapping::now(code, "https://example.com/race", "192.0.2.1"))
                    .await
            })
        })
        .collect();

    let mut created = Vec::new();
    let mut existing = Vec::new();
    for task in tasks {
        match task.await.unwrap().unwrap() {
            InsertOutcome::Created(code) => created.push(code),
            InsertOutcome::Existing(code) => existing.push(code),
            InsertOutcome::CodeTaken => panic!("distinct codes cannot collide"),
        }
    }

    assert_eq!(created.len(), 1);
    assert_eq!(existing.len(), 3);
    assert!(existing.iter().all(|code| *code == created[0]));
}
