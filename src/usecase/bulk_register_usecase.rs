use tracing::{debug, error, info};

use crate::domain::{
    error::{DomainError, RepositoryError},
    models::{
        candidate::{CandidateRejection, RegistrationCandidate},
        user::User,
    },
    repositories::user_repository::UserRepository,
    services::{password_service::PasswordHasher, phone_validator::PhoneValidator},
};

/// Largest batch accepted in one request
pub const MAX_BATCH_SIZE: usize = 100;

#[derive(Debug)]
pub struct RegisteredUser {
    pub index: usize,
    pub user: User,
}

#[derive(Debug)]
pub struct RejectedCandidate {
    pub index: usize,
    pub phone: String,
    pub reason: CandidateRejection,
}

/// How a processed batch went as a whole
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchOutcome {
    AllSucceeded,
    AllFailed,
    PartialSuccess,
}

/// Per-item outcome of one bulk registration.
/// Both lists are in input order and every input index is in exactly one of them.
#[derive(Debug)]
pub struct BatchResult {
    total: usize,
    pub successes: Vec<RegisteredUser>,
    pub failures: Vec<RejectedCandidate>,
}

impl BatchResult {
    fn with_capacity(total: usize) -> Self {
        Self {
            total,
            successes: Vec::with_capacity(total),
            failures: Vec::new(),
        }
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn success_count(&self) -> usize {
        self.successes.len()
    }

    pub fn failed_count(&self) -> usize {
        self.failures.len()
    }

    pub fn outcome(&self) -> BatchOutcome {
        if self.failures.is_empty() {
            BatchOutcome::AllSucceeded
        } else if self.successes.is_empty() {
            BatchOutcome::AllFailed
        } else {
            BatchOutcome::PartialSuccess
        }
    }
}

pub struct BulkRegisterUsecase<R: UserRepository, P: PasswordHasher, V: PhoneValidator> {
    user_repository: R,
    password_hasher: P,
    phone_validator: V,
}

impl<R: UserRepository, P: PasswordHasher, V: PhoneValidator> BulkRegisterUsecase<R, P, V> {
    pub fn new(user_repository: R, password_hasher: P, phone_validator: V) -> Self {
        Self {
            user_repository,
            password_hasher,
            phone_validator,
        }
    }

    /// Register every candidate that passes validation.
    ///
    /// Only an empty or oversized batch fails the call; anything wrong with a
    /// single candidate lands in `BatchResult::failures` and the remaining
    /// candidates are still processed, one at a time, in input order.
    pub async fn register(
        &self,
        candidates: Vec<RegistrationCandidate>,
    ) -> Result<BatchResult, DomainError>
    where
        R: Send + Sync,
        P: Send + Sync,
        V: Send + Sync,
    {
        if candidates.is_empty() {
            return Err(DomainError::BatchShape("user list must not be empty".to_string()));
        }
        if candidates.len() > MAX_BATCH_SIZE {
            return Err(DomainError::BatchShape(format!(
                "cannot register more than {} users at once",
                MAX_BATCH_SIZE
            )));
        }

        info!(total = candidates.len(), "Processing bulk registration");
        let mut result = BatchResult::with_capacity(candidates.len());

        for (index, candidate) in candidates.into_iter().enumerate() {
            match self.register_one(index, &candidate).await {
                Ok(user) => result.successes.push(RegisteredUser { index, user }),
                Err(reason) => {
                    debug!(index, reason = %reason, "Candidate rejected");
                    result.failures.push(RejectedCandidate {
                        index,
                        phone: candidate.display_phone(),
                        reason,
                    });
                }
            }
        }

        info!(
            total = result.total(),
            succeeded = result.success_count(),
            failed = result.failed_count(),
            "Bulk registration finished"
        );
        Ok(result)
    }

    async fn register_one(
        &self,
        index: usize,
        candidate: &RegistrationCandidate,
    ) -> Result<User, CandidateRejection>
    where
        R: Send + Sync,
        P: Send + Sync,
        V: Send + Sync,
    {
        let validated = candidate.validate(&self.phone_validator)?;

        match self.user_repository.find_by_phone(&validated.phone).await {
            Ok(Some(_)) => return Err(CandidateRejection::PhoneTaken),
            Ok(None) => {}
            Err(e) => {
                error!(index, error = %e, "Phone lookup failed");
                return Err(CandidateRejection::SystemError);
            }
        }

        let password_hash = self.password_hasher.hash(&validated.password).map_err(|e| {
            error!(index, error = %e, "Password hashing failed");
            CandidateRejection::SystemError
        })?;

        self.user_repository
            .insert(validated.into_new_user(password_hash))
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict => CandidateRejection::PhoneTaken,
                e => {
                    error!(index, error = %e, "Creating user failed");
                    CandidateRejection::SystemError
                }
            })
    }
}
