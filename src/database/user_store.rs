//! Account storage with two interchangeable back ends.
//!
//! Postgres is used when a database is configured and reachable; otherwise the
//! process keeps accounts in memory for its own lifetime. Handlers only ever
//! see [`UserStore`], so both modes share one set of semantics.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use sqlx::{types::Json, FromRow, PgPool};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::user::{User, UserStats};

const DUPLICATE_EMAIL: &str = "An account with this email already exists";

#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password_hash: String,
}

#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub name: Option<String>,
}

fn user_not_found() -> Error {
    Error::NotFound("User not found".to_string())
}

#[derive(Clone)]
pub enum UserStore {
    Memory(InMemoryUserStore),
    Postgres(PgUserStore),
}

impl UserStore {
    pub fn in_memory() -> Self {
        UserStore::Memory(InMemoryUserStore::default())
    }

    pub fn postgres(pool: PgPool) -> Self {
        UserStore::Postgres(PgUserStore::new(pool))
    }

    pub fn mode(&self) -> &'static str {
        match self {
            UserStore::Memory(_) => "memory",
            UserStore::Postgres(_) => "postgres",
        }
    }

    pub async fn create(&self, new_user: NewUser) -> Result<User> {
        let user = User {
            id: Uuid::new_v4(),
            name: format!("{} {}", new_user.first_name, new_user.last_name),
            email: new_user.email,
            first_name: new_user.first_name,
            last_name: new_user.last_name,
            password_hash: new_user.password_hash,
            created_at: Utc::now(),
            last_login: Utc::now(),
            stats: UserStats::default(),
        };
        match self {
            UserStore::Memory(store) => store.insert(user).await,
            UserStore::Postgres(store) => store.insert(user).await,
        }
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        match self {
            UserStore::Memory(store) => Ok(store.find_by_email(email).await),
            UserStore::Postgres(store) => store.find_by_email(email).await,
        }
    }

    pub async fn get(&self, id: Uuid) -> Result<User> {
        match self {
            UserStore::Memory(store) => store.get(id).await,
            UserStore::Postgres(store) => store.get(id).await,
        }
    }

    pub async fn record_login(&self, id: Uuid) -> Result<User> {
        let now = Utc::now();
        match self {
            UserStore::Memory(store) => store.modify(id, |user| user.last_login = now).await,
            UserStore::Postgres(store) => store.record_login(id, now).await,
        }
    }

    /// Applies `apply` to the stored stats atomically and returns the result.
    pub async fn update_stats<F>(&self, id: Uuid, apply: F) -> Result<UserStats>
    where
        F: FnOnce(&mut UserStats) + Send,
    {
        match self {
            UserStore::Memory(store) => store
                .modify(id, |user| apply(&mut user.stats))
                .await
                .map(|user| user.stats),
            UserStore::Postgres(store) => store.update_stats(id, apply).await,
        }
    }

    pub async fn update_profile(&self, id: Uuid, update: ProfileUpdate) -> Result<User> {
        match self {
            UserStore::Memory(store) => {
                store
                    .modify(id, |user| apply_profile_update(user, update))
                    .await
            }
            UserStore::Postgres(store) => store.update_profile(id, update).await,
        }
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        match self {
            UserStore::Memory(store) => store.delete(id).await,
            UserStore::Postgres(store) => store.delete(id).await,
        }
    }
}

fn apply_profile_update(user: &mut User, update: ProfileUpdate) {
    if let Some(first_name) = update.first_name {
        user.first_name = first_name.trim().to_string();
    }
    if let Some(last_name) = update.last_name {
        user.last_name = last_name.trim().to_string();
    }
    if let Some(name) = update.name {
        user.name = name.trim().to_string();
    }
}

#[derive(Default)]
struct MemoryInner {
    users: HashMap<Uuid, User>,
    by_email: HashMap<String, Uuid>,
}

#[derive(Clone, Default)]
pub struct InMemoryUserStore {
    inner: Arc<RwLock<MemoryInner>>,
}

impl InMemoryUserStore {
    async fn insert(&self, user: User) -> Result<User> {
        let mut inner = self.inner.write().await;
        if inner.by_email.contains_key(&user.email) {
            return Err(Error::Conflict(DUPLICATE_EMAIL.to_string()));
        }
        inner.by_email.insert(user.email.clone(), user.id);
        inner.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Option<User> {
        let inner = self.inner.read().await;
        inner
            .by_email
            .get(email)
            .and_then(|id| inner.users.get(id))
            .cloned()
    }

    async fn get(&self, id: Uuid) -> Result<User> {
        self.inner
            .read()
            .await
            .users
            .get(&id)
            .cloned()
            .ok_or_else(user_not_found)
    }

    async fn modify<F>(&self, id: Uuid, apply: F) -> Result<User>
    where
        F: FnOnce(&mut User),
    {
        let mut inner = self.inner.write().await;
        let user = inner.users.get_mut(&id).ok_or_else(user_not_found)?;
        apply(user);
        Ok(user.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let mut inner = self.inner.write().await;
        let user = inner.users.remove(&id).ok_or_else(user_not_found)?;
        inner.by_email.remove(&user.email);
        Ok(())
    }
}

#[derive(Debug, FromRow)]
struct UserRow {
    id: Uuid,
    email: String,
    first_name: String,
    last_name: String,
    name: String,
    password_hash: String,
    created_at: DateTime<Utc>,
    last_login: DateTime<Utc>,
    stats: Json<UserStats>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            email: row.email,
            first_name: row.first_name,
            last_name: row.last_name,
            name: row.name,
            password_hash: row.password_hash,
            created_at: row.created_at,
            last_login: row.last_login,
            stats: row.stats.0,
        }
    }
}

const USER_COLUMNS: &str =
    "id, email, first_name, last_name, name, password_hash, created_at, last_login, stats";

#[derive(Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn insert(&self, user: User) -> Result<User> {
        let sql = format!(
            r#"
            INSERT INTO users (id, email, first_name, last_name, name, password_hash, created_at, last_login, stats)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {}
            "#,
            USER_COLUMNS
        );
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(user.id)
            .bind(&user.email)
            .bind(&user.first_name)
            .bind(&user.last_name)
            .bind(&user.name)
            .bind(&user.password_hash)
            .bind(user.created_at)
            .bind(user.last_login)
            .bind(Json(user.stats.clone()))
            .fetch_one(&self.pool)
            .await
            .map_err(|err| match err {
                sqlx::Error::Database(db) if db.is_unique_violation() => {
                    Error::Conflict(DUPLICATE_EMAIL.to_string())
                }
                other => Error::from(other),
            })?;
        Ok(row.into())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let sql = format!("SELECT {} FROM users WHERE email = $1", USER_COLUMNS);
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(User::from))
    }

    async fn get(&self, id: Uuid) -> Result<User> {
        let sql = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(user_not_found)?;
        Ok(row.into())
    }

    async fn record_login(&self, id: Uuid, at: DateTime<Utc>) -> Result<User> {
        let sql = format!(
            "UPDATE users SET last_login = $2 WHERE id = $1 RETURNING {}",
            USER_COLUMNS
        );
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(id)
            .bind(at)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(user_not_found)?;
        Ok(row.into())
    }

    async fn update_stats<F>(&self, id: Uuid, apply: F) -> Result<UserStats>
    where
        F: FnOnce(&mut UserStats) + Send,
    {
        let mut tx = self.pool.begin().await?;
        let (Json(mut stats),): (Json<UserStats>,) =
            sqlx::query_as("SELECT stats FROM users WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?
                .ok_or_else(user_not_found)?;

        apply(&mut stats);

        sqlx::query("UPDATE users SET stats = $2 WHERE id = $1")
            .bind(id)
            .bind(Json(stats.clone()))
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(stats)
    }

    async fn update_profile(&self, id: Uuid, update: ProfileUpdate) -> Result<User> {
        let sql = format!(
            r#"
            UPDATE users SET
                first_name = COALESCE($2, first_name),
                last_name = COALESCE($3, last_name),
                name = COALESCE($4, name)
            WHERE id = $1
            RETURNING {}
            "#,
            USER_COLUMNS
        );
        let trimmed = |v: Option<String>| v.map(|s| s.trim().to_string());
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(id)
            .bind(trimmed(update.first_name))
            .bind(trimmed(update.last_name))
            .bind(trimmed(update.name))
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(user_not_found)?;
        Ok(row.into())
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(user_not_found());
        }
        Ok(())
    }
}
