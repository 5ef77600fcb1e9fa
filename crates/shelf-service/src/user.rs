//! User lookup. Plaintext passwords enter here and leave as argon2 hashes.

use std::sync::Arc;

use argon2::Argon2;
use shelf_core::{
  Error, Result,
  id::UserId,
  store::{EntityKind, EntityStore, Page},
  user::{PasswordHash, User},
};

/// Fields a caller supplies for a user, including the plaintext password.
#[derive(Clone)]
pub struct UserInput {
  pub name:     String,
  pub email:    String,
  pub password: String,
}

impl std::fmt::Debug for UserInput {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("UserInput")
      .field("name", &self.name)
      .field("email", &self.email)
      .finish_non_exhaustive()
  }
}

pub struct UserService<S> {
  store:  Arc<S>,
  hasher: Argon2<'static>,
}

impl<S> Clone for UserService<S> {
  fn clone(&self) -> Self {
    Self { store: Arc::clone(&self.store), hasher: self.hasher.clone() }
  }
}

impl<S: EntityStore<User>> UserService<S> {
  /// A service hashing with argon2's default (argon2id) parameters.
  pub fn new(store: Arc<S>) -> Self { Self::with_hasher(store, Argon2::default()) }

  pub fn with_hasher(store: Arc<S>, hasher: Argon2<'static>) -> Self {
    Self { store, hasher }
  }

  pub async fn find_all(&self, page: Page) -> Result<Vec<User>> {
    self.store.find_all(page).await
  }

  pub async fn find_by_id(&self, id: &UserId) -> Result<User> {
    self
      .store
      .find_by_id(id)
      .await?
      .ok_or_else(|| Error::not_found(EntityKind::User, id))
  }

  pub async fn create(&self, input: UserInput) -> Result<User> {
    let user = self.build(UserId::generate(), input)?;
    let user = self.store.create(user).await?;
    tracing::info!(user_id = %user.id, "created user");
    Ok(user)
  }

  pub async fn update(&self, id: &UserId, input: UserInput) -> Result<User> {
    let user = self.build(id.clone(), input)?;
    let user = self.store.update(id, user).await?;
    tracing::debug!(user_id = %id, "updated user");
    Ok(user)
  }

  pub async fn delete(&self, id: &UserId) -> Result<()> {
    self.store.delete(id).await?;
    tracing::info!(user_id = %id, "deleted user");
    Ok(())
  }

  /// Whether `candidate` matches the stored password of user `id`.
  pub async fn validate_password(&self, id: &UserId, candidate: &str) -> Result<bool> {
    let user = self.find_by_id(id).await?;
    Ok(user.validate_password(candidate))
  }

  fn build(&self, id: UserId, input: UserInput) -> Result<User> {
    let hash = PasswordHash::generate(&self.hasher, &input.password)?;
    Ok(User::new(id, input.name, input.email, hash))
  }
}
