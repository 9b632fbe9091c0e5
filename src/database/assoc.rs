//! Keyed (user, route) association tables. Likes, ticks, grade proposals and
//! projects all share the same shape: one row per (user, route) guarded by a
//! uniqueness constraint. The shared existence/delete plumbing lives here;
//! inserts go through per-table `ON CONFLICT (user_id, route_id)` statements
//! so insert-or-update is a single write path.

use sqlx::postgres::Postgres;

/// Handle for one association table. Table names are compile-time constants,
/// never user input.
#[derive(Debug, Clone, Copy)]
pub struct KeyedAssoc {
    table: &'static str,
}

pub const LIKES: KeyedAssoc = KeyedAssoc { table: "likes" };
pub const TICKS: KeyedAssoc = KeyedAssoc { table: "ticks" };
pub const PROJECTS: KeyedAssoc = KeyedAssoc { table: "projects" };

impl KeyedAssoc {
    pub async fn exists<'e, E>(&self, executor: E, user_id: i64, route_id: i64) -> Result<bool, sqlx::Error>
    where
        E: sqlx::Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            "SELECT EXISTS (SELECT 1 FROM {} WHERE user_id = $1 AND route_id = $2)",
            self.table
        );
        sqlx::query_scalar::<_, bool>(&sql)
            .bind(user_id)
            .bind(route_id)
            .fetch_one(executor)
            .await
    }

    /// Delete the row for (user, route); returns whether a row existed.
    pub async fn delete<'e, E>(&self, executor: E, user_id: i64, route_id: i64) -> Result<bool, sqlx::Error>
    where
        E: sqlx::Executor<'e, Database = Postgres>,
    {
        let sql = format!("DELETE FROM {} WHERE user_id = $1 AND route_id = $2", self.table);
        let result = sqlx::query(&sql)
            .bind(user_id)
            .bind(route_id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
