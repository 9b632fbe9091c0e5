use sqlx::PgPool;

use crate::auth;
use crate::database::models::user::User;
use crate::error::ApiError;

/// Nickname rules shared by registration, the nickname endpoint and the CLI:
/// 3-20 characters, letters/digits/underscore only. Returns the trimmed value.
pub fn validate_nickname(raw: &str) -> Result<String, ApiError> {
    let nickname = raw.trim();
    let len = nickname.chars().count();
    if !(3..=20).contains(&len) {
        return Err(ApiError::validation_error("Nickname must be 3-20 characters"));
    }
    if !nickname.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(ApiError::validation_error(
            "Nickname can contain only letters, numbers, and underscores",
        ));
    }
    Ok(nickname.to_string())
}

pub async fn register(
    pool: &PgPool,
    username: &str,
    nickname: &str,
    email: &str,
    password: &str,
) -> Result<User, ApiError> {
    if username.trim().is_empty() || email.trim().is_empty() || password.is_empty() {
        return Err(ApiError::validation_error(
            "username, nickname, email and password are required",
        ));
    }
    let nickname = validate_nickname(nickname)?;

    let (username_taken, email_taken, nickname_taken) = sqlx::query_as::<_, (bool, bool, bool)>(
        "SELECT \
             EXISTS (SELECT 1 FROM users WHERE lower(username) = lower($1)), \
             EXISTS (SELECT 1 FROM users WHERE lower(email) = lower($2)), \
             EXISTS (SELECT 1 FROM users WHERE lower(nickname) = lower($3))",
    )
    .bind(username)
    .bind(email)
    .bind(&nickname)
    .fetch_one(pool)
    .await?;

    if username_taken {
        return Err(ApiError::validation_error(format!(
            "Username '{}' is already taken",
            username
        )));
    }
    if email_taken {
        return Err(ApiError::validation_error(format!(
            "Email '{}' is already registered",
            email
        )));
    }
    if nickname_taken {
        return Err(ApiError::validation_error(format!(
            "Nickname '{}' is already taken",
            nickname
        )));
    }

    let password_hash = auth::hash_password(password)?;

    // The lower() unique indexes backstop concurrent registrations; a losing
    // insert surfaces as Conflict via the sqlx error mapping.
    let user = sqlx::query_as::<_, User>(
        "INSERT INTO users (username, nickname, email, password_hash) \
         VALUES ($1, $2, $3, $4) RETURNING *",
    )
    .bind(username.trim())
    .bind(&nickname)
    .bind(email.trim())
    .bind(&password_hash)
    .fetch_one(pool)
    .await?;

    Ok(user)
}

pub async fn login(pool: &PgPool, username: &str, password: &str) -> Result<User, ApiError> {
    // Uniqueness is case-insensitive, so lookup is too
    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE lower(username) = lower($1)")
        .bind(username)
        .fetch_optional(pool)
        .await?;

    let user = match user {
        Some(user) => user,
        None => return Err(ApiError::unauthorized("Invalid username or password")),
    };

    if !auth::verify_password(password, &user.password_hash) {
        return Err(ApiError::unauthorized("Invalid username or password"));
    }
    if !user.is_active {
        return Err(ApiError::unauthorized("Account is deactivated"));
    }

    Ok(user)
}

pub async fn get(pool: &PgPool, user_id: i64) -> Result<User, ApiError> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("User {} not found", user_id)))
}

pub async fn get_by_username(pool: &PgPool, username: &str) -> Result<User, ApiError> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE lower(username) = lower($1)")
        .bind(username)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("User '{}' not found", username)))
}

pub async fn set_nickname(pool: &PgPool, user_id: i64, nickname: &str) -> Result<User, ApiError> {
    let nickname = validate_nickname(nickname)?;

    let taken = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS (SELECT 1 FROM users WHERE lower(nickname) = lower($1) AND id <> $2)",
    )
    .bind(&nickname)
    .bind(user_id)
    .fetch_one(pool)
    .await?;

    if taken {
        return Err(ApiError::validation_error(format!(
            "Nickname '{}' is already taken",
            nickname
        )));
    }

    sqlx::query_as::<_, User>("UPDATE users SET nickname = $1 WHERE id = $2 RETURNING *")
        .bind(&nickname)
        .bind(user_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("User {} not found", user_id)))
}

pub async fn set_password(pool: &PgPool, user_id: i64, password: &str) -> Result<(), ApiError> {
    let password_hash = auth::hash_password(password)?;
    let result = sqlx::query("UPDATE users SET password_hash = $1 WHERE id = $2")
        .bind(&password_hash)
        .bind(user_id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(ApiError::not_found(format!("User {} not found", user_id)));
    }
    Ok(())
}

pub async fn set_active(pool: &PgPool, user_id: i64, active: bool) -> Result<(), ApiError> {
    let result = sqlx::query("UPDATE users SET is_active = $1 WHERE id = $2")
        .bind(active)
        .bind(user_id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(ApiError::not_found(format!("User {} not found", user_id)));
    }
    Ok(())
}

pub async fn list(pool: &PgPool) -> Result<Vec<User>, ApiError> {
    let users = sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY created_at DESC")
        .fetch_all(pool)
        .await?;
    Ok(users)
}

/// Delete a user. Unless `force` is set, refuses when the user still owns
/// likes/comments/proposals/warnings/ticks/projects.
pub async fn delete(pool: &PgPool, user_id: i64, force: bool) -> Result<(), ApiError> {
    if !force {
        let related = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM likes WHERE user_id = $1) \
                 OR EXISTS (SELECT 1 FROM comments WHERE user_id = $1) \
                 OR EXISTS (SELECT 1 FROM grade_proposals WHERE user_id = $1) \
                 OR EXISTS (SELECT 1 FROM warnings WHERE user_id = $1) \
                 OR EXISTS (SELECT 1 FROM ticks WHERE user_id = $1) \
                 OR EXISTS (SELECT 1 FROM projects WHERE user_id = $1)",
        )
        .bind(user_id)
        .fetch_one(pool)
        .await?;

        if related {
            return Err(ApiError::conflict(
                "User has related records; delete them first or force",
            ));
        }
    }

    let mut tx = pool.begin().await?;
    for table in [
        "likes",
        "comments",
        "grade_proposals",
        "warnings",
        "ticks",
        "projects",
    ] {
        sqlx::query(&format!("DELETE FROM {} WHERE user_id = $1", table))
            .bind(user_id)
            .execute(&mut *tx)
            .await?;
    }
    let result = sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

    if result.rows_affected() == 0 {
        tx.rollback().await?;
        return Err(ApiError::not_found(format!("User {} not found", user_id)));
    }

    tx.commit().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nickname_length_bounds() {
        assert!(validate_nickname("ab").is_err());
        assert!(validate_nickname("abc").is_ok());
        assert!(validate_nickname(&"a".repeat(20)).is_ok());
        assert!(validate_nickname(&"a".repeat(21)).is_err());
    }

    #[test]
    fn test_nickname_charset() {
        assert!(validate_nickname("Crimp_Lord99").is_ok());
        assert!(validate_nickname("bad name").is_err());
        assert!(validate_nickname("bad-name").is_err());
        assert!(validate_nickname("émile").is_err());
    }

    #[test]
    fn test_nickname_is_trimmed() {
        assert_eq!(validate_nickname("  alice  ").unwrap(), "alice");
    }
}
