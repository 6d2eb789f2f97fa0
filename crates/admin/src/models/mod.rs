//! Admin session models.

mod session;

pub use session::{CurrentAdmin, keys};
