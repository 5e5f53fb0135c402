//! In-memory collaborators shared by the unit and router tests

use std::{
    collections::{HashMap, HashSet},
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::{
    error::{DomainError, RepositoryError},
    models::{
        candidate::RegistrationCandidate,
        credential::HashedPassword,
        image::ImageKind,
        user::{DEFAULT_GENDER, DEFAULT_REGION, NewUser, User, UserDetail, UserId},
    },
    repositories::user_repository::UserRepository,
    services::password_service::PasswordHasher,
};

pub fn candidate(phone: &str, password: &str) -> RegistrationCandidate {
    RegistrationCandidate {
        phone: Some(phone.to_string()),
        password: Some(password.to_string()),
        ..Default::default()
    }
}

#[derive(Default)]
struct Store {
    users: Vec<(User, String)>,
    audio_files: HashMap<UserId, u64>,
    conflict_phones: HashSet<String>,
    failing_phones: HashSet<String>,
}

#[derive(Clone, Default)]
pub struct InMemoryUserRepository {
    store: Arc<Mutex<Store>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a committed user directly and return its id
    pub fn seed(&self, phone: &str) -> UserId {
        let mut store = self.store.lock().unwrap();
        let id = store.users.len() as UserId + 1;
        let now = Utc::now();
        store.users.push((
            User {
                id,
                phone: phone.to_string(),
                name: None,
                is_admin: false,
                age: None,
                gender: DEFAULT_GENDER,
                region: DEFAULT_REGION,
                user_image_origin: None,
                user_image_record: None,
                created_at: now,
                updated_at: now,
            },
            "seeded".to_string(),
        ));
        id
    }

    pub fn set_audio_file_count(&self, id: UserId, count: u64) {
        self.store.lock().unwrap().audio_files.insert(id, count);
    }

    /// Make inserts for `phone` fail as if another request won the unique index
    pub fn conflict_on_insert(&self, phone: &str) {
        self.store
            .lock()
            .unwrap()
            .conflict_phones
            .insert(phone.to_string());
    }

    /// Make inserts for `phone` fail with a database error
    pub fn fail_on_insert(&self, phone: &str) {
        self.store
            .lock()
            .unwrap()
            .failing_phones
            .insert(phone.to_string());
    }

    pub fn len(&self) -> usize {
        self.store.lock().unwrap().users.len()
    }

    pub fn password_of(&self, phone: &str) -> Option<String> {
        self.store
            .lock()
            .unwrap()
            .users
            .iter()
            .find(|(user, _)| user.phone == phone)
            .map(|(_, password)| password.clone())
    }

    pub fn user(&self, id: UserId) -> Option<User> {
        self.store
            .lock()
            .unwrap()
            .users
            .iter()
            .find(|(user, _)| user.id == id)
            .map(|(user, _)| user.clone())
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_phone(&self, phone: &str) -> Result<Option<User>, RepositoryError> {
        Ok(self
            .store
            .lock()
            .unwrap()
            .users
            .iter()
            .find(|(user, _)| user.phone == phone)
            .map(|(user, _)| user.clone()))
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        Ok(self.user(id))
    }

    async fn find_detail_by_id(&self, id: UserId) -> Result<Option<UserDetail>, RepositoryError> {
        let count = self
            .store
            .lock()
            .unwrap()
            .audio_files
            .get(&id)
            .copied()
            .unwrap_or(0);
        Ok(self.user(id).map(|user| UserDetail {
            user,
            audio_training_file_count: count,
        }))
    }

    async fn insert(&self, new_user: NewUser) -> Result<User, RepositoryError> {
        let mut store = self.store.lock().unwrap();
        if store.conflict_phones.contains(&new_user.phone)
            || store.users.iter().any(|(user, _)| user.phone == new_user.phone)
        {
            return Err(RepositoryError::Conflict);
        }
        if store.failing_phones.contains(&new_user.phone) {
            return Err(RepositoryError::DatabaseError("connection reset".to_string()));
        }

        let now = Utc::now();
        let user = User {
            id: store.users.len() as UserId + 1,
            phone: new_user.phone,
            name: new_user.name,
            is_admin: false,
            age: new_user.age,
            gender: new_user.gender,
            region: new_user.region,
            user_image_origin: None,
            user_image_record: None,
            created_at: now,
            updated_at: now,
        };
        store
            .users
            .push((user.clone(), new_user.password_hash.into_inner()));
        Ok(user)
    }

    async fn set_image_path(
        &self,
        id: UserId,
        kind: ImageKind,
        path: &str,
    ) -> Result<User, RepositoryError> {
        let mut store = self.store.lock().unwrap();
        let (user, _) = store
            .users
            .iter_mut()
            .find(|(user, _)| user.id == id)
            .ok_or(RepositoryError::NotFound)?;
        match kind {
            ImageKind::Origin => user.user_image_origin = Some(path.to_string()),
            ImageKind::Record => user.user_image_record = Some(path.to_string()),
        }
        user.updated_at = Utc::now();
        Ok(user.clone())
    }
}

/// Prefixes instead of hashing, so tests can see what was stored
#[derive(Clone, Default)]
pub struct MockPasswordHasher {
    failing_password: Option<String>,
}

impl MockPasswordHasher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_on(password: &str) -> Self {
        Self {
            failing_password: Some(password.to_string()),
        }
    }
}

impl PasswordHasher for MockPasswordHasher {
    fn hash(&self, plain_password: &str) -> Result<HashedPassword, DomainError> {
        if self.failing_password.as_deref() == Some(plain_password) {
            return Err(DomainError::PasswordHashing("mock failure".to_string()));
        }
        Ok(HashedPassword::new(format!("hashed:{}", plain_password)))
    }
}
