//! Boundary to the identity collaborator.
//!
//! The engine only ever needs a user id to key progress records; sign-in,
//! sign-up, and profile handling live entirely outside this workspace.

use lessons_core::model::UserId;

pub trait IdentityProvider: Send + Sync {
    /// The currently authenticated user, if any.
    fn current_user_id(&self) -> Option<UserId>;
}

/// Fixed identity for tests and single-user embeddings.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticIdentity {
    user_id: Option<UserId>,
}

impl StaticIdentity {
    #[must_use]
    pub fn signed_in(user_id: UserId) -> Self {
        Self {
            user_id: Some(user_id),
        }
    }

    #[must_use]
    pub fn signed_out() -> Self {
        Self { user_id: None }
    }
}

impl IdentityProvider for StaticIdentity {
    fn current_user_id(&self) -> Option<UserId> {
        self.user_id
    }
}
