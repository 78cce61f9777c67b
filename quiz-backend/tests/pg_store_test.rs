//! Runs the store contract against Postgres. Skipped unless `DATABASE_URL`
//! is set; every test works on fresh wallets and quiz ids so runs can share
//! a database.

mod common;

use std::env;
use std::sync::Arc;

use quiz_backend::database::{pool, PgQuizStore, QuizStore};
use quiz_backend::models::quiz::Quiz;
use quiz_backend::models::user_quiz::ScoreUpdate;
use uuid::Uuid;

async fn pg_store() -> Option<PgQuizStore> {
    dotenvy::dotenv().ok();
    let Ok(url) = env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL not set, skipping Postgres store test");
        return None;
    };
    let pool = pool::create_pool(&url).await.expect("pool");
    pool::run_migrations(&pool).await.expect("migrations");
    Some(PgQuizStore::new(pool))
}

fn wallet() -> String {
    format!("0x{}", Uuid::new_v4().simple())
}

async fn stored_quiz(store: &PgQuizStore) -> Quiz {
    let quiz = Quiz::new("pg.pdf".into(), common::questions(3));
    store.insert_quiz(&quiz).await.expect("insert quiz");
    quiz
}

#[tokio::test]
async fn quiz_round_trips_through_jsonb() {
    let Some(store) = pg_store().await else { return };
    let quiz = stored_quiz(&store).await;

    let loaded = store.get_quiz(quiz.id).await.unwrap().expect("quiz stored");
    assert_eq!(loaded.questions, quiz.questions);
    assert_eq!(loaded.filename, "pg.pdf");
    assert_eq!(loaded.num_questions, 3);

    assert!(store.quiz_exists(quiz.id).await.unwrap());
    assert!(!store.quiz_exists(Uuid::new_v4()).await.unwrap());
    assert!(store.get_quiz(Uuid::new_v4()).await.unwrap().is_none());
    assert!(store.insert_quiz(&quiz).await.is_err());

    let (listed, total) = store.list_quizzes(100, 0).await.unwrap();
    assert!(total >= 1);
    assert!(listed
        .windows(2)
        .all(|pair| pair[0].created_at >= pair[1].created_at));
}

#[tokio::test]
async fn increments_count_from_one_and_are_not_clamped() {
    let Some(store) = pg_store().await else { return };
    let quiz = stored_quiz(&store).await;
    let w = wallet();

    let first = store.increment_attempts(&w, quiz.id).await.unwrap();
    assert_eq!(first.attempts, 1);
    assert_eq!(first.remaining(), 2);
    assert!(!first.exceeded());

    for _ in 0..2 {
        store.increment_attempts(&w, quiz.id).await.unwrap();
    }
    let fourth = store.increment_attempts(&w, quiz.id).await.unwrap();
    assert_eq!(fourth.attempts, 4);
    assert_eq!(fourth.remaining(), 0);
    assert!(fourth.exceeded());

    let existing = store.create_attempt_if_absent(&w, quiz.id).await.unwrap();
    assert_eq!(existing.attempts, 4);

    let fresh = store.create_attempt_if_absent(&wallet(), quiz.id).await.unwrap();
    assert_eq!((fresh.attempts, fresh.best_score), (0, 0));
    assert!(fresh.allowed);
}

#[tokio::test]
async fn best_score_keeps_the_maximum() {
    let Some(store) = pg_store().await else { return };
    let quiz = stored_quiz(&store).await;
    let w = wallet();

    assert_eq!(
        store.record_score(&w, quiz.id, 50).await.unwrap(),
        ScoreUpdate { best_score: 50, updated: true }
    );
    assert_eq!(
        store.record_score(&w, quiz.id, 30).await.unwrap(),
        ScoreUpdate { best_score: 50, updated: false }
    );
    assert_eq!(
        store.record_score(&w, quiz.id, 50).await.unwrap(),
        ScoreUpdate { best_score: 50, updated: false }
    );
    assert_eq!(
        store.record_score(&w, quiz.id, 51).await.unwrap(),
        ScoreUpdate { best_score: 51, updated: true }
    );

    let record = store.find_attempt(&w, quiz.id).await.unwrap().unwrap();
    assert_eq!((record.attempts, record.best_score), (1, 51));

    let latest = store.find_attempt_for_quiz(quiz.id).await.unwrap().unwrap();
    assert_eq!(latest.wallet_address, w);
}

#[tokio::test]
async fn concurrent_increments_are_not_lost() {
    let Some(store) = pg_store().await else { return };
    let quiz = stored_quiz(&store).await;
    let store = Arc::new(store);
    let w = wallet();

    let mut handles = Vec::new();
    for _ in 0..20 {
        let store = store.clone();
        let w = w.clone();
        handles.push(tokio::spawn(async move {
            store.increment_attempts(&w, quiz.id).await.unwrap();
        }));
    }
    for h in handles {
        h.await.unwrap();
    }

    let record = store.find_attempt(&w, quiz.id).await.unwrap().unwrap();
    assert_eq!(record.attempts, 20);
}

#[tokio::test]
async fn leaderboard_collapses_wallets_across_quizzes() {
    let Some(store) = pg_store().await else { return };
    let (a, b) = (stored_quiz(&store).await, stored_quiz(&store).await);
    let (alice, bob, carol) = (wallet(), wallet(), wallet());

    store.record_score(&alice, a.id, 5).await.unwrap();
    store.record_score(&alice, b.id, 9).await.unwrap();
    store.record_score(&bob, a.id, 7).await.unwrap();
    store.record_score(&carol, a.id, 0).await.unwrap();

    let (page, total) = store.leaderboard(Some(a.id), 10, 0).await.unwrap();
    assert_eq!(total, 2);
    assert_eq!(page[0].wallet_address, bob);
    assert_eq!((page[1].wallet_address.as_str(), page[1].score), (alice.as_str(), 5));

    let (everyone, _) = store.leaderboard(None, i64::MAX, 0).await.unwrap();
    let alice_rows: Vec<_> = everyone.iter().filter(|e| e.wallet_address == alice).collect();
    assert_eq!(alice_rows.len(), 1);
    assert_eq!(alice_rows[0].score, 9);
    assert!(everyone.iter().all(|e| e.wallet_address != carol));

    let orphan = Uuid::new_v4();
    store.record_score(&wallet(), orphan, 999_999).await.unwrap();
    let (page, total) = store.leaderboard(Some(orphan), 10, 0).await.unwrap();
    assert!(page.is_empty());
    assert_eq!(total, 0);
}
