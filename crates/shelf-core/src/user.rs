//! Users and their password credential.
//!
//! The plaintext password never lives inside a [`User`]: the only way to
//! build a [`PasswordHash`] is to hash a plaintext with argon2, or to load a
//! PHC string that parses as one.

use std::fmt;

use argon2::{Argon2, PasswordHasher, PasswordVerifier, password_hash::SaltString};
use rand_core::OsRng;
use serde::{Deserialize, Serialize};

use crate::{Error, Result, id::UserId};

// ─── PasswordHash ────────────────────────────────────────────────────────────

/// A salted one-way hash of a password, kept as an argon2 PHC string
/// (`$argon2id$v=19$…`).
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PasswordHash(String);

impl PasswordHash {
  /// Hash `plaintext` with a fresh random salt.
  pub fn generate(hasher: &Argon2<'_>, plaintext: &str) -> Result<Self> {
    let salt = SaltString::generate(&mut OsRng);
    let phc = hasher
      .hash_password(plaintext.as_bytes(), &salt)
      .map_err(|e| Error::Credential(format!("argon2 error: {e}")))?
      .to_string();
    Ok(Self(phc))
  }

  /// Wrap a PHC string loaded from storage. Fails if it does not parse.
  pub fn from_phc(phc: impl Into<String>) -> Result<Self> {
    let phc = phc.into();
    argon2::PasswordHash::new(&phc)
      .map_err(|e| Error::Credential(format!("malformed password hash: {e}")))?;
    Ok(Self(phc))
  }

  pub fn as_phc(&self) -> &str { &self.0 }

  /// Check `candidate` against this hash. Parameters are read back from the
  /// PHC string, so hashes produced with any argon2 settings verify here.
  pub fn verify(&self, candidate: &str) -> bool {
    let Ok(parsed) = argon2::PasswordHash::new(&self.0) else {
      return false;
    };
    Argon2::default()
      .verify_password(candidate.as_bytes(), &parsed)
      .is_ok()
  }
}

impl fmt::Debug for PasswordHash {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str("PasswordHash(..)")
  }
}

impl TryFrom<String> for PasswordHash {
  type Error = Error;

  fn try_from(phc: String) -> Result<Self> { Self::from_phc(phc) }
}

impl From<PasswordHash> for String {
  fn from(hash: PasswordHash) -> Self { hash.0 }
}

// ─── User ────────────────────────────────────────────────────────────────────

/// A registered user. Email is unique in intent only; nothing enforces it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
  pub id:        UserId,
  pub name:      String,
  pub email:     String,
  password_hash: PasswordHash,
}

impl User {
  pub fn new(
    id: UserId,
    name: impl Into<String>,
    email: impl Into<String>,
    password_hash: PasswordHash,
  ) -> Self {
    Self { id, name: name.into(), email: email.into(), password_hash }
  }

  pub fn password_hash(&self) -> &PasswordHash { &self.password_hash }

  /// The same user, hash included, under another id.
  pub(crate) fn with_new_id(self, id: UserId) -> Self { Self { id, ..self } }

  pub fn validate_password(&self, candidate: &str) -> bool {
    self.password_hash.verify(candidate)
  }
}
