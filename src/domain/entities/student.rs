//! Student entity, as far as circulation needs it.

use serde::Serialize;

/// A borrower. Only the fields the notice job needs: identity, a display
/// name, and an optional contact address. Students without an email simply
/// receive no overdue notices.
#[derive(Debug, Clone, Serialize)]
pub struct Student {
    pub id: i64,
    pub full_name: String,
    pub email: Option<String>,
}

impl Student {
    pub fn has_contact_address(&self) -> bool {
        self.email.as_deref().is_some_and(|e| !e.is_empty())
    }
}
