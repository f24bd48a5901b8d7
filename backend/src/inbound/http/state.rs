//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{AccountAuth, AccountDirectory, ProfessionalDirectory};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub auth: Arc<dyn AccountAuth>,
    pub accounts: Arc<dyn AccountDirectory>,
    pub professionals: Arc<dyn ProfessionalDirectory>,
}

impl HttpState {
    /// Construct state from the driving ports.
    ///
    /// # Examples
    /// ```ignore
    /// let state = HttpState::new(auth, accounts, professionals);
    /// ```
    pub fn new(
        auth: Arc<dyn AccountAuth>,
        accounts: Arc<dyn AccountDirectory>,
        professionals: Arc<dyn ProfessionalDirectory>,
    ) -> Self {
        Self {
            auth,
            accounts,
            professionals,
        }
    }
}
