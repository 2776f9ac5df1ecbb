// server/src/services/sessions.rs

//! In-process bearer-token sessions. Tokens are opaque strings handed out
//! at sign-in and resolved on each authenticated request.

use std::collections::HashMap;

use parking_lot::RwLock;
use uuid::Uuid;

#[derive(Default)]
pub struct SessionStore {
  tokens: RwLock<HashMap<String, Uuid>>,
}

impl SessionStore {
  pub fn new() -> Self {
    Self::default()
  }

  /// Issues a fresh token for the user and records it.
  pub fn issue(&self, user_id: Uuid) -> String {
    let token = format!("spm_{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple());
    self.tokens.write().insert(token.clone(), user_id);
    token
  }

  pub fn resolve(&self, token: &str) -> Option<Uuid> {
    self.tokens.read().get(token).copied()
  }

  pub fn revoke(&self, token: &str) {
    self.tokens.write().remove(token);
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn issue_resolve_revoke() {
    let store = SessionStore::new();
    let user_id = Uuid::new_v4();

    let token = store.issue(user_id);
    assert_eq!(store.resolve(&token), Some(user_id));

    store.revoke(&token);
    assert_eq!(store.resolve(&token), None);
  }

  #[test]
  fn unknown_token_does_not_resolve() {
    let store = SessionStore::new();
    assert_eq!(store.resolve("spm_bogus"), None);
  }
}
