//! The activity recording workflow.

use std::sync::Arc;

use shelf_core::{
  Result,
  activity::{Action, UserActivity},
  catalog::Category,
  id::{ProductId, UserId},
  store::{ActivityStore, EntityStore, Page, ProductStore},
  user::User,
};

use crate::{catalog::ProductService, user::UserService};

/// Records and reads user activity.
///
/// Recording checks that both the user and the product exist before the
/// activity is written. Reads do no checking, so the history of a user who
/// has since been deleted stays visible.
pub struct ActivityService<S, A = S> {
  users:      UserService<S>,
  products:   ProductService<S>,
  activities: Arc<A>,
}

impl<S, A> Clone for ActivityService<S, A> {
  fn clone(&self) -> Self {
    Self {
      users:      self.users.clone(),
      products:   self.products.clone(),
      activities: Arc::clone(&self.activities),
    }
  }
}

impl<S, A> ActivityService<S, A>
where
  S: EntityStore<User> + EntityStore<Category> + ProductStore,
  A: ActivityStore,
{
  pub fn new(users: UserService<S>, products: ProductService<S>, activities: Arc<A>) -> Self {
    Self { users, products, activities }
  }

  /// Parse `action`, resolve both references, then persist.
  ///
  /// An unknown action is `InvalidInput`; a missing user or product is
  /// `ReferenceNotFound`. In either case nothing is written.
  #[tracing::instrument(skip(self))]
  pub async fn save_activity(
    &self,
    user_id: UserId,
    product_id: ProductId,
    action: &str,
  ) -> Result<UserActivity> {
    let action: Action = action.parse()?;

    let user = self
      .users
      .find_by_id(&user_id)
      .await
      .map_err(|e| e.into_reference())?;
    let product = self
      .products
      .find_by_id(&product_id)
      .await
      .map_err(|e| e.into_reference())?;

    let saved = self
      .activities
      .save_activity(UserActivity::new(user.id, product.id, action))
      .await?;
    tracing::info!(action = %saved.action, "recorded activity");
    Ok(saved)
  }

  pub async fn get_activity_by_user_id(
    &self,
    user_id: &UserId,
    page: Page,
  ) -> Result<Vec<UserActivity>> {
    self.activities.find_by_user(user_id, page).await
  }

  pub async fn get_all_activities(&self, page: Page) -> Result<Vec<UserActivity>> {
    self.activities.find_all_activities(page).await
  }
}
