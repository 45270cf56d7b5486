//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{
    DisplayName, EmailAddress, PasswordHash, StoredUser, User, UserId,
};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::{DisplayNameUpdate, NewUserRow, UserRow};
use super::pool::DbPool;
use super::schema::users;

/// Diesel-backed credential store.
///
/// Email uniqueness is enforced by the `users_email_key` constraint.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn row_to_stored(row: UserRow) -> Result<StoredUser, UserPersistenceError> {
    let UserRow {
        id,
        display_name,
        email,
        password_hash,
        created_at,
        updated_at,
    } = row;
    let display_name = DisplayName::new(display_name)
        .map_err(|err| UserPersistenceError::query(format!("stored display name: {err}")))?;
    let email = EmailAddress::new(email)
        .map_err(|err| UserPersistenceError::query(format!("stored email: {err}")))?;
    let user = User::new(UserId::from_uuid(id), display_name, email, created_at)
        .with_updated_at(updated_at);
    Ok(StoredUser::new(user, PasswordHash::new(password_hash)))
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn insert(&self, user: &StoredUser) -> Result<(), UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let public = user.user();
        let row = NewUserRow {
            id: *public.id().as_uuid(),
            display_name: public.display_name().as_ref(),
            email: public.email().as_ref(),
            password_hash: user.password_hash().as_str(),
            created_at: public.created_at(),
            updated_at: public.updated_at(),
        };

        diesel::insert_into(users::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<StoredUser>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<UserRow> = users::table
            .filter(users::email.eq(email.as_ref()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_stored).transpose()
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<UserRow> = users::table
            .find(*id.as_uuid())
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(|row| row_to_stored(row).map(StoredUser::into_user))
            .transpose()
    }

    async fn update_display_name(
        &self,
        id: &UserId,
        display_name: &DisplayName,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let changes = DisplayNameUpdate {
            display_name: display_name.as_ref(),
            updated_at,
        };
        let row: Option<UserRow> = diesel::update(users::table.find(*id.as_uuid()))
            .set(&changes)
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(|row| row_to_stored(row).map(StoredUser::into_user))
            .transpose()
    }

    async fn delete(&self, id: &UserId) -> Result<bool, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(users::table.find(*id.as_uuid()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }
}
