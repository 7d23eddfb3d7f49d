use instawrite_core::UserId;

/// Authenticated identity for a request.
///
/// Inserted by the auth middleware and present for every `/blog` route.
/// Never persisted.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct AuthenticatedIdentity {
    user_id: UserId,
}

impl AuthenticatedIdentity {
    pub fn new(user_id: UserId) -> Self {
        Self { user_id }
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }
}
