//! The logged-in administrator as kept in the session.

use jfa_backend::BearerToken;
use jfa_core::models::SessionUser;

/// The logged-in admin, assembled from the session keys.
#[derive(Debug, Clone)]
pub struct CurrentAdmin {
    pub user: SessionUser,
    pub token: BearerToken,
}

impl CurrentAdmin {
    /// Name shown in the sidebar.
    #[must_use]
    pub fn display_name(&self) -> String {
        let name = self.user.full_name();
        if name.is_empty() {
            self.user.email.clone()
        } else {
            name
        }
    }
}

/// Session keys. Same layout as the storefront, in a separate cookie.
pub mod keys {
    pub const USER: &str = "user";
    pub const TOKEN: &str = "token";
    pub const ROLE: &str = "role";
}
