use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::store::QuizStore;
use crate::error::Result;
use crate::models::quiz::{Quiz, QuizSummary};
use crate::models::user_quiz::{ScoreEntry, ScoreUpdate, UserQuiz};

#[derive(Clone)]
pub struct PgQuizStore {
    pool: PgPool,
}

impl PgQuizStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl QuizStore for PgQuizStore {
    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn insert_quiz(&self, quiz: &Quiz) -> Result<()> {
        let questions = serde_json::to_value(&quiz.questions)?;
        sqlx::query(
            r#"
            INSERT INTO quizzes (id, filename, questions, num_questions, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(quiz.id)
        .bind(&quiz.filename)
        .bind(questions)
        .bind(quiz.num_questions)
        .bind(quiz.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get_quiz(&self, id: Uuid) -> Result<Option<Quiz>> {
        let quiz = sqlx::query_as::<_, Quiz>(
            r#"SELECT id, filename, questions, num_questions, created_at FROM quizzes WHERE id = $1"#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(quiz)
    }

    async fn quiz_exists(&self, id: Uuid) -> Result<bool> {
        let exists: bool = sqlx::query_scalar(r#"SELECT EXISTS(SELECT 1 FROM quizzes WHERE id = $1)"#)
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    async fn list_quizzes(&self, limit: i64, offset: i64) -> Result<(Vec<QuizSummary>, i64)> {
        let quizzes = sqlx::query_as::<_, QuizSummary>(
            r#"
            SELECT id AS quiz_id, filename, num_questions, created_at
            FROM quizzes
            ORDER BY created_at DESC, id ASC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar(r#"SELECT COUNT(*) FROM quizzes"#)
            .fetch_one(&self.pool)
            .await?;

        Ok((quizzes, total))
    }

    async fn find_attempt(&self, wallet_address: &str, quiz_id: Uuid) -> Result<Option<UserQuiz>> {
        let record = sqlx::query_as::<_, UserQuiz>(
            r#"SELECT * FROM user_quizzes WHERE wallet_address = $1 AND quiz_id = $2"#,
        )
        .bind(wallet_address)
        .bind(quiz_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(record)
    }

    async fn find_attempt_for_quiz(&self, quiz_id: Uuid) -> Result<Option<UserQuiz>> {
        let record = sqlx::query_as::<_, UserQuiz>(
            r#"SELECT * FROM user_quizzes WHERE quiz_id = $1 ORDER BY updated_at DESC LIMIT 1"#,
        )
        .bind(quiz_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(record)
    }

    async fn create_attempt_if_absent(&self, wallet_address: &str, quiz_id: Uuid) -> Result<UserQuiz> {
        // The no-op update makes RETURNING yield the existing row on conflict.
        let record = sqlx::query_as::<_, UserQuiz>(
            r#"
            INSERT INTO user_quizzes (wallet_address, quiz_id, attempts, best_score, allowed)
            VALUES ($1, $2, 0, 0, TRUE)
            ON CONFLICT (wallet_address, quiz_id)
            DO UPDATE SET updated_at = user_quizzes.updated_at
            RETURNING *
            "#,
        )
        .bind(wallet_address)
        .bind(quiz_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(record)
    }

    async fn increment_attempts(&self, wallet_address: &str, quiz_id: Uuid) -> Result<UserQuiz> {
        let record = sqlx::query_as::<_, UserQuiz>(
            r#"
            INSERT INTO user_quizzes (wallet_address, quiz_id, attempts, best_score, allowed)
            VALUES ($1, $2, 1, 0, TRUE)
            ON CONFLICT (wallet_address, quiz_id)
            DO UPDATE SET attempts = user_quizzes.attempts + 1, updated_at = NOW()
            RETURNING *
            "#,
        )
        .bind(wallet_address)
        .bind(quiz_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(record)
    }

    async fn record_score(&self, wallet_address: &str, quiz_id: Uuid, score: i32) -> Result<ScoreUpdate> {
        let (best_score, previous): (i32, Option<i32>) = sqlx::query_as(
            r#"
            WITH prev AS (
                SELECT best_score FROM user_quizzes WHERE wallet_address = $1 AND quiz_id = $2
            )
            INSERT INTO user_quizzes (wallet_address, quiz_id, attempts, best_score, allowed)
            VALUES ($1, $2, 1, $3, TRUE)
            ON CONFLICT (wallet_address, quiz_id)
            DO UPDATE SET
                best_score = GREATEST(user_quizzes.best_score, EXCLUDED.best_score),
                updated_at = CASE
                    WHEN EXCLUDED.best_score > user_quizzes.best_score THEN NOW()
                    ELSE user_quizzes.updated_at
                END
            RETURNING best_score, (SELECT best_score FROM prev)
            "#,
        )
        .bind(wallet_address)
        .bind(quiz_id)
        .bind(score)
        .fetch_one(&self.pool)
        .await?;

        Ok(ScoreUpdate {
            best_score,
            updated: previous.map_or(true, |p| best_score > p),
        })
    }

    async fn leaderboard(
        &self,
        quiz_id: Option<Uuid>,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<ScoreEntry>, i64)> {
        let entries = sqlx::query_as::<_, ScoreEntry>(
            r#"
            SELECT uq.wallet_address, MAX(uq.best_score) AS score
            FROM user_quizzes uq
            JOIN quizzes q ON q.id = uq.quiz_id
            WHERE uq.best_score > 0 AND ($1::uuid IS NULL OR uq.quiz_id = $1)
            GROUP BY uq.wallet_address
            ORDER BY score DESC, uq.wallet_address ASC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(quiz_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(DISTINCT uq.wallet_address)
            FROM user_quizzes uq
            JOIN quizzes q ON q.id = uq.quiz_id
            WHERE uq.best_score > 0 AND ($1::uuid IS NULL OR uq.quiz_id = $1)
            "#,
        )
        .bind(quiz_id)
        .fetch_one(&self.pool)
        .await?;

        Ok((entries, total))
    }
}
