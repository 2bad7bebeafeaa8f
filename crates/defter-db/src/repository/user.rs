//! # User Repository
//!
//! Users and companies. Password hashing happens in the API layer; this
//! repository only ever sees the finished argon2 hash string.
//!
//! Company creation and owner assignment run in one transaction so a
//! user can never end up pointing at a half-created company.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use defter_core::{Company, User, UserRole};

/// Fields for registering a new user.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    /// Pre-computed argon2 hash, never a plaintext password.
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub role: UserRole,
}

/// Fields for creating a company.
#[derive(Debug, Clone)]
pub struct NewCompany {
    pub name: String,
    pub tax_number: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        UserRepository { pool }
    }

    // =========================================================================
    // Users
    // =========================================================================

    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    /// Case-insensitive email lookup (emails are stored lowercased).
    pub async fn find_by_email(&self, email: &str) -> DbResult<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = ?1")
            .bind(email.to_lowercase())
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    /// Registers a new user. The email unique constraint surfaces as
    /// `DbError::UniqueViolation` for duplicates.
    pub async fn create(&self, new_user: NewUser) -> DbResult<User> {
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4().to_string(),
            email: new_user.email.to_lowercase(),
            password_hash: new_user.password_hash,
            first_name: new_user.first_name,
            last_name: new_user.last_name,
            role: new_user.role,
            company_id: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        };

        debug!(id = %user.id, email = %user.email, "Registering user");

        sqlx::query(
            "INSERT INTO users (id, email, password_hash, first_name, last_name, role, \
                company_id, is_active, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, NULL, 1, ?7, ?8)",
        )
        .bind(&user.id)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(user.role)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(user)
    }

    /// Updates the user's display name.
    pub async fn update_profile(
        &self,
        id: &str,
        first_name: &str,
        last_name: &str,
    ) -> DbResult<User> {
        let user = self
            .get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("User", id))?;

        let now = Utc::now();
        sqlx::query(
            "UPDATE users SET first_name = ?1, last_name = ?2, updated_at = ?3 WHERE id = ?4",
        )
        .bind(first_name)
        .bind(last_name)
        .bind(now)
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(User {
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            updated_at: now,
            ..user
        })
    }

    /// Replaces the stored password hash. The caller verifies the current
    /// password and hashes the new one.
    pub async fn update_password(&self, id: &str, password_hash: &str) -> DbResult<()> {
        let result = sqlx::query(
            "UPDATE users SET password_hash = ?1, updated_at = ?2 WHERE id = ?3",
        )
        .bind(password_hash)
        .bind(Utc::now())
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("User", id));
        }

        Ok(())
    }

    // =========================================================================
    // Companies
    // =========================================================================

    pub async fn get_company(&self, id: &str) -> DbResult<Option<Company>> {
        let company = sqlx::query_as::<_, Company>("SELECT * FROM companies WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(company)
    }

    /// Creates a company and attaches the user to it, in one transaction.
    pub async fn create_company(&self, user_id: &str, new_company: NewCompany) -> DbResult<Company> {
        let user = self
            .get_by_id(user_id)
            .await?
            .ok_or_else(|| DbError::not_found("User", user_id))?;

        let now = Utc::now();
        let company = Company {
            id: Uuid::new_v4().to_string(),
            name: new_company.name,
            tax_number: new_company.tax_number,
            address: new_company.address,
            phone: new_company.phone,
            email: new_company.email,
            created_at: now,
            updated_at: now,
        };

        debug!(id = %company.id, user_id = %user.id, "Creating company");

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "INSERT INTO companies (id, name, tax_number, address, phone, email, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        )
        .bind(&company.id)
        .bind(&company.name)
        .bind(&company.tax_number)
        .bind(&company.address)
        .bind(&company.phone)
        .bind(&company.email)
        .bind(company.created_at)
        .bind(company.updated_at)
        .execute(&mut *tx)
        .await?;

        sqlx::query("UPDATE users SET company_id = ?1, updated_at = ?2 WHERE id = ?3")
            .bind(&company.id)
            .bind(now)
            .bind(&user.id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(company)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    fn new_user(email: &str) -> NewUser {
        NewUser {
            email: email.to_string(),
            password_hash: "$argon2id$stub".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Yılmaz".to_string(),
            role: UserRole::Admin,
        }
    }

    #[tokio::test]
    async fn register_lowercases_email_and_rejects_duplicates() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.users();

        let user = repo.create(new_user("Ada@Example.COM")).await.unwrap();
        assert_eq!(user.email, "ada@example.com");

        let found = repo.find_by_email("ADA@example.com").await.unwrap();
        assert!(found.is_some());

        let err = repo.create(new_user("ada@example.com")).await.unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }

    #[tokio::test]
    async fn profile_and_password_updates_persist() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.users();

        let user = repo.create(new_user("ada@example.com")).await.unwrap();

        let updated = repo
            .update_profile(&user.id, "Grace", "Hopper")
            .await
            .unwrap();
        assert_eq!(updated.first_name, "Grace");

        repo.update_password(&user.id, "$argon2id$new").await.unwrap();
        let reloaded = repo.get_by_id(&user.id).await.unwrap().unwrap();
        assert_eq!(reloaded.password_hash, "$argon2id$new");
        assert_eq!(reloaded.last_name, "Hopper");

        let err = repo.update_password("missing", "$x").await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn create_company_attaches_user() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.users();

        let user = repo.create(new_user("owner@example.com")).await.unwrap();
        assert!(user.company_id.is_none());

        let company = repo
            .create_company(
                &user.id,
                NewCompany {
                    name: "Defter Yazılım".to_string(),
                    tax_number: None,
                    address: None,
                    phone: None,
                    email: None,
                },
            )
            .await
            .unwrap();

        let reloaded = repo.get_by_id(&user.id).await.unwrap().unwrap();
        assert_eq!(reloaded.company_id.as_deref(), Some(company.id.as_str()));
    }

    #[tokio::test]
    async fn create_company_for_unknown_user_fails() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let err = db
            .users()
            .create_company(
                "missing",
                NewCompany {
                    name: "X".to_string(),
                    tax_number: None,
                    address: None,
                    phone: None,
                    email: None,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }
}
