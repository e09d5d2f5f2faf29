//! Owner
//!
//! The authenticated principal behind a request. Identity is supplied by
//! the authentication collaborator; this crate never checks credentials.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Owner {
    pub id: u32,
    pub username: String,
}

impl Owner {
    pub fn new(id: u32, username: impl Into<String>) -> Self {
        Self {
            id,
            username: username.into(),
        }
    }
}
