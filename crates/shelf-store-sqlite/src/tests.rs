//! Integration tests for `SqliteStore` against an in-memory database.

use std::str::FromStr;

use argon2::{Algorithm, Argon2, Params, Version};
use rust_decimal::Decimal;
use shelf_core::{
  Error,
  activity::{Action, UserActivity},
  catalog::{Category, Price, Product},
  id::{CategoryId, ProductId, UserId},
  store::{ActivityStore, EntityStore, Page, ProductStore},
  user::{PasswordHash, User},
};

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn user(id: &str) -> User {
  let hasher = Argon2::new(
    Algorithm::Argon2id,
    Version::V0x13,
    Params::new(8, 1, 1, None).unwrap(),
  );
  User::new(
    UserId::new(id),
    "Ada Lovelace",
    "ada@example.com",
    PasswordHash::generate(&hasher, "difference-engine").unwrap(),
  )
}

fn category(id: &str) -> Category {
  Category {
    id:          CategoryId::new(id),
    name:        "Kitchen".into(),
    description: "Pots, pans and kettles".into(),
  }
}

fn product(id: &str, category_id: Option<&str>) -> Product {
  Product {
    id:          ProductId::new(id),
    name:        "Kettle".into(),
    price:       Price::new(Decimal::from_str("24.90").unwrap()).unwrap(),
    category_id: category_id.map(CategoryId::new),
  }
}

// ─── Users ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_then_find_user() {
  let s = store().await;
  let created = EntityStore::<User>::create(&s, user("u1")).await.unwrap();
  assert_eq!(created.id, UserId::new("u1"));

  let fetched = EntityStore::<User>::find_by_id(&s, &created.id)
    .await
    .unwrap()
    .unwrap();
  assert_eq!(fetched, created);
  assert!(fetched.validate_password("difference-engine"));
}

#[tokio::test]
async fn find_missing_user_returns_none() {
  let s = store().await;
  let result = EntityStore::<User>::find_by_id(&s, &UserId::new("ghost"))
    .await
    .unwrap();
  assert!(result.is_none());
}

#[tokio::test]
async fn duplicate_user_id_is_a_conflict() {
  let s = store().await;
  EntityStore::<User>::create(&s, user("u1")).await.unwrap();
  let err = EntityStore::<User>::create(&s, user("u1")).await.unwrap_err();
  assert!(matches!(err, Error::Conflict(_)));
}

#[tokio::test]
async fn update_replaces_user_fields() {
  let s = store().await;
  EntityStore::<User>::create(&s, user("u1")).await.unwrap();

  let mut changed = user("ignored");
  changed.name = "Augusta Ada King".into();
  let updated = EntityStore::<User>::update(&s, &UserId::new("u1"), changed)
    .await
    .unwrap();
  assert_eq!(updated.id, UserId::new("u1"));

  let fetched = EntityStore::<User>::find_by_id(&s, &UserId::new("u1"))
    .await
    .unwrap()
    .unwrap();
  assert_eq!(fetched.name, "Augusta Ada King");
}

#[tokio::test]
async fn update_and_delete_missing_user_are_not_found() {
  let s = store().await;
  let id = UserId::new("ghost");

  let err = EntityStore::<User>::update(&s, &id, user("ghost"))
    .await
    .unwrap_err();
  assert!(err.is_not_found());

  let err = EntityStore::<User>::delete(&s, &id).await.unwrap_err();
  assert!(err.is_not_found());
}

#[tokio::test]
async fn list_users_respects_the_page() {
  let s = store().await;
  for id in ["u1", "u2", "u3"] {
    EntityStore::<User>::create(&s, user(id)).await.unwrap();
  }

  let all = EntityStore::<User>::find_all(&s, Page::all()).await.unwrap();
  assert_eq!(all.len(), 3);

  let window = EntityStore::<User>::find_all(&s, Page::new(Some(1), 1))
    .await
    .unwrap();
  assert_eq!(window.len(), 1);
  assert_eq!(window[0].id, UserId::new("u2"));
}

// ─── Categories & products ───────────────────────────────────────────────────

#[tokio::test]
async fn create_then_find_category_and_product() {
  let s = store().await;
  let c = EntityStore::<Category>::create(&s, category("c1")).await.unwrap();
  let fetched = EntityStore::<Category>::find_by_id(&s, &c.id)
    .await
    .unwrap()
    .unwrap();
  assert_eq!(fetched, c);

  let p = EntityStore::<Product>::create(&s, product("p1", Some("c1")))
    .await
    .unwrap();
  let fetched = EntityStore::<Product>::find_by_id(&s, &p.id)
    .await
    .unwrap()
    .unwrap();
  assert_eq!(fetched, p);
}

#[tokio::test]
async fn product_without_category_is_allowed() {
  let s = store().await;
  let p = EntityStore::<Product>::create(&s, product("p1", None))
    .await
    .unwrap();
  let fetched = EntityStore::<Product>::find_by_id(&s, &p.id)
    .await
    .unwrap()
    .unwrap();
  assert!(fetched.category_id.is_none());
}

#[tokio::test]
async fn product_with_unknown_category_violates_the_foreign_key() {
  let s = store().await;
  let err = EntityStore::<Product>::create(&s, product("p1", Some("nope")))
    .await
    .unwrap_err();
  assert!(matches!(err, Error::Conflict(_)));
}

#[tokio::test]
async fn referenced_category_cannot_be_deleted() {
  let s = store().await;
  EntityStore::<Category>::create(&s, category("c1")).await.unwrap();
  EntityStore::<Product>::create(&s, product("p1", Some("c1")))
    .await
    .unwrap();

  let err = EntityStore::<Category>::delete(&s, &CategoryId::new("c1"))
    .await
    .unwrap_err();
  assert!(matches!(err, Error::Conflict(_)));

  EntityStore::<Product>::delete(&s, &ProductId::new("p1"))
    .await
    .unwrap();
  EntityStore::<Category>::delete(&s, &CategoryId::new("c1"))
    .await
    .unwrap();
}

#[tokio::test]
async fn find_products_by_category() {
  let s = store().await;
  EntityStore::<Category>::create(&s, category("c1")).await.unwrap();
  EntityStore::<Category>::create(&s, category("c2")).await.unwrap();
  EntityStore::<Product>::create(&s, product("p1", Some("c1"))).await.unwrap();
  EntityStore::<Product>::create(&s, product("p2", Some("c2"))).await.unwrap();
  EntityStore::<Product>::create(&s, product("p3", Some("c1"))).await.unwrap();

  let in_c1 = s
    .find_by_category(&CategoryId::new("c1"), Page::all())
    .await
    .unwrap();
  let ids: Vec<_> = in_c1.iter().map(|p| p.id.as_str()).collect();
  assert_eq!(ids, ["p1", "p3"]);
}

// ─── Activity ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn activities_are_appended_and_filtered_by_user() {
  let s = store().await;
  let view = UserActivity::new(UserId::new("u1"), ProductId::new("p1"), Action::View);
  let buy = UserActivity::new(UserId::new("u1"), ProductId::new("p1"), Action::Purchase);
  let other = UserActivity::new(UserId::new("u2"), ProductId::new("p1"), Action::Share);

  assert_eq!(s.save_activity(view.clone()).await.unwrap(), view);
  s.save_activity(buy.clone()).await.unwrap();
  s.save_activity(other.clone()).await.unwrap();

  let mine = s.find_by_user(&UserId::new("u1"), Page::all()).await.unwrap();
  assert_eq!(mine, vec![view, buy]);

  let all = s.find_all_activities(Page::all()).await.unwrap();
  assert_eq!(all.len(), 3);
}

#[tokio::test]
async fn activity_history_survives_user_deletion() {
  let s = store().await;
  EntityStore::<User>::create(&s, user("u1")).await.unwrap();
  s.save_activity(UserActivity::new(
    UserId::new("u1"),
    ProductId::new("p1"),
    Action::Wishlist,
  ))
  .await
  .unwrap();

  EntityStore::<User>::delete(&s, &UserId::new("u1")).await.unwrap();

  let history = s.find_by_user(&UserId::new("u1"), Page::all()).await.unwrap();
  assert_eq!(history.len(), 1);
  assert_eq!(history[0].action, Action::Wishlist);
}
