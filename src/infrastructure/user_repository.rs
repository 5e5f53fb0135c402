use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, SqlErr,
};

use crate::domain::{
    error::{DomainError, RepositoryError},
    models::{
        image::ImageKind,
        user::{Gender, NewUser, Region, User, UserDetail, UserId},
    },
    repositories::user_repository::UserRepository,
};
use entity::{audio_training_files, users};

#[derive(Clone)]
pub struct SeaOrmUserRepository {
    db: DatabaseConnection,
}

impl SeaOrmUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn database_error(e: DbErr) -> RepositoryError {
    RepositoryError::DatabaseError(e.to_string())
}

fn corrupt_row(e: DomainError) -> RepositoryError {
    RepositoryError::DatabaseError(e.to_string())
}

fn to_domain(model: users::Model) -> Result<User, RepositoryError> {
    let gender: Gender = model.gender.parse().map_err(corrupt_row)?;
    let region: Region = model.region.parse().map_err(corrupt_row)?;

    Ok(User {
        id: model.id,
        phone: model.phone,
        name: model.name,
        is_admin: model.is_admin,
        age: model.age,
        gender,
        region,
        user_image_origin: model.user_image_origin,
        user_image_record: model.user_image_record,
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    })
}

#[async_trait]
impl UserRepository for SeaOrmUserRepository {
    async fn find_by_phone(&self, phone: &str) -> Result<Option<User>, RepositoryError> {
        users::Entity::find()
            .filter(users::Column::Phone.eq(phone))
            .one(&self.db)
            .await
            .map_err(database_error)?
            .map(to_domain)
            .transpose()
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        users::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(database_error)?
            .map(to_domain)
            .transpose()
    }

    async fn find_detail_by_id(&self, id: UserId) -> Result<Option<UserDetail>, RepositoryError> {
        let Some(user) = self.find_by_id(id).await? else {
            return Ok(None);
        };

        let audio_training_file_count = audio_training_files::Entity::find()
            .filter(audio_training_files::Column::UserId.eq(id))
            .count(&self.db)
            .await
            .map_err(database_error)?;

        Ok(Some(UserDetail {
            user,
            audio_training_file_count,
        }))
    }

    async fn insert(&self, new_user: NewUser) -> Result<User, RepositoryError> {
        let now = Utc::now().fixed_offset();
        let user_model = users::ActiveModel {
            phone: Set(new_user.phone),
            password: Set(new_user.password_hash.into_inner()),
            name: Set(new_user.name),
            is_admin: Set(false),
            age: Set(new_user.age),
            gender: Set(new_user.gender.code().to_string()),
            region: Set(new_user.region.code().to_string()),
            user_image_origin: Set(None),
            user_image_record: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let model = user_model.insert(&self.db).await.map_err(|e| {
            // unique index on users.phone; a concurrent batch may have won the race
            match e.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(_)) => RepositoryError::Conflict,
                _ => database_error(e),
            }
        })?;

        to_domain(model)
    }

    async fn set_image_path(
        &self,
        id: UserId,
        kind: ImageKind,
        path: &str,
    ) -> Result<User, RepositoryError> {
        let model = users::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(database_error)?
            .ok_or(RepositoryError::NotFound)?;

        let mut user_model: users::ActiveModel = model.into();
        match kind {
            ImageKind::Origin => user_model.user_image_origin = Set(Some(path.to_string())),
            ImageKind::Record => user_model.user_image_record = Set(Some(path.to_string())),
        }
        user_model.updated_at = Set(Utc::now().fixed_offset());

        let model = user_model.update(&self.db).await.map_err(database_error)?;
        to_domain(model)
    }
}
