//! Integration tests for `SqliteStore` against an in-memory database.

use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};

use veil_core::{
  clock::FixedClock,
  data::{Metadata, PersonalData},
  disposal::DisposedPersonalDataRemover,
  store::PersonalInformationStore,
  token::SequentialTokenGenerator,
  value::PiiValue,
};

use crate::{Error, SqliteStore};

fn epoch() -> DateTime<Utc> {
  Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
}

async fn store() -> (SqliteStore, Arc<FixedClock>) {
  let clock = Arc::new(FixedClock::new(epoch()));
  let store = SqliteStore::open_in_memory(clock.clone())
    .await
    .expect("in-memory store")
    .with_token_generator(Arc::new(SequentialTokenGenerator::default()));
  (store, clock)
}

fn email(personal_token: &str) -> PersonalData {
  PersonalData::new(
    personal_token,
    "emailAddress",
    "test@email.com",
    "signup form",
  )
  .unwrap()
}

// ─── Put and finds ───────────────────────────────────────────────────────────

#[tokio::test]
async fn put_and_find_round_trip() {
  let (s, _) = store().await;

  let mut metadata = Metadata::new();
  metadata.insert("agreement".into(), "user consent v2021-01-01".into());

  let data = email("u1")
    .reasons(["Marketing", "CRM"])
    .processing_requirements(["USER_CONSENT"])
    .metadata(metadata.clone());
  let token = s.put(data).await.unwrap();

  let record =
    s.find_one_by_reference_token(&token).await.unwrap().unwrap();
  assert_eq!(record.reference_token, token);
  assert_eq!(record.personal_token, "u1");
  assert_eq!(record.key_name, "emailAddress");
  assert_eq!(record.value.as_text(), Some("test@email.com"));
  assert_eq!(record.source, "signup form");
  assert_eq!(record.reasons, ["Marketing", "CRM"]);
  assert_eq!(record.processing_requirements, ["USER_CONSENT"]);
  assert_eq!(record.metadata, metadata);
  assert_eq!(record.recorded_at, epoch());
  assert_eq!(record.disposed_at, None);
}

#[tokio::test]
async fn structured_values_round_trip() {
  let (s, _) = store().await;

  let value = PiiValue::try_from(serde_json::json!({
    "street": "221B Baker Street",
    "city": "London",
    "floors": 2,
  }))
  .unwrap();
  let data =
    PersonalData::new("u1", "postalAddress", value.clone(), "checkout")
      .unwrap();
  let token = s.put(data).await.unwrap();

  let record =
    s.find_one_by_reference_token(&token).await.unwrap().unwrap();
  assert_eq!(record.value, value);
}

#[tokio::test]
async fn put_duplicate_supplied_token_errors() {
  let (s, _) = store().await;

  s.put(email("u1").reference_token("pii:dup")).await.unwrap();
  let err = s
    .put(email("u2").reference_token("pii:dup"))
    .await
    .unwrap_err();
  assert!(matches!(err, Error::DuplicateReferenceToken(t) if t == "pii:dup"));
}

#[tokio::test]
async fn find_one_by_key_name_returns_first_recorded() {
  let (s, _) = store().await;

  let first = s.put(email("u1")).await.unwrap();
  let second = s.put(email("u1")).await.unwrap();
  assert_ne!(first, second);

  let found =
    s.find_one_by_key_name("u1", "emailAddress").await.unwrap().unwrap();
  assert_eq!(found.reference_token, first);

  assert!(
    s.find_one_by_key_name("u1", "phoneNumber")
      .await
      .unwrap()
      .is_none()
  );
}

#[tokio::test]
async fn find_by_personal_token_preserves_insertion_order() {
  let (s, _) = store().await;

  let first = s.put(email("u1")).await.unwrap();
  let second = s
    .put(PersonalData::new("u1", "phoneNumber", "+15550100", "crm").unwrap())
    .await
    .unwrap();
  s.put(email("u2")).await.unwrap();

  let records = s.find_by_personal_token("u1").await.unwrap();
  let tokens: Vec<_> =
    records.iter().map(|r| r.reference_token.as_str()).collect();
  assert_eq!(tokens, [first.as_str(), second.as_str()]);

  assert!(s.find_by_personal_token("nobody").await.unwrap().is_empty());
}

// ─── Replace ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn replace_substitutes_payload_and_restamps() {
  let (s, clock) = store().await;
  let token = s.put(email("u1")).await.unwrap();

  clock.advance(Duration::hours(1));
  let replacement =
    PersonalData::new("u1", "emailAddress", "new@email.com", "profile edit")
      .unwrap();
  s.replace(&token, replacement).await.unwrap();

  let record =
    s.find_one_by_reference_token(&token).await.unwrap().unwrap();
  assert_eq!(record.value.as_text(), Some("new@email.com"));
  assert_eq!(record.recorded_at, epoch() + Duration::hours(1));
  assert_eq!(s.find_by_personal_token("u1").await.unwrap().len(), 1);
}

#[tokio::test]
async fn replace_unknown_token_errors() {
  let (s, _) = store().await;
  let err = s.replace("pii:missing", email("u1")).await.unwrap_err();
  assert!(matches!(err, Error::NotFound(t) if t == "pii:missing"));
}

#[tokio::test]
async fn replace_ignores_payload_reference_token() {
  let (s, _) = store().await;
  let token = s.put(email("u1")).await.unwrap();

  s.replace(&token, email("u1").reference_token("pii:other"))
    .await
    .unwrap();

  assert!(
    s.find_one_by_reference_token(&token).await.unwrap().is_some()
  );
  assert!(
    s.find_one_by_reference_token("pii:other")
      .await
      .unwrap()
      .is_none()
  );
}

// ─── Removal ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn remove_deletes_and_is_idempotent() {
  let (s, _) = store().await;
  let token = s.put(email("u1")).await.unwrap();

  s.remove(&token).await.unwrap();
  assert!(
    s.find_one_by_reference_token(&token).await.unwrap().is_none()
  );

  s.remove(&token).await.unwrap();
}

#[tokio::test]
async fn remove_by_key_name_deletes_every_match() {
  let (s, _) = store().await;
  s.put(email("u1")).await.unwrap();
  s.put(email("u1")).await.unwrap();
  let phone = s
    .put(PersonalData::new("u1", "phoneNumber", "+15550100", "crm").unwrap())
    .await
    .unwrap();

  s.remove_by_key_name("u1", "emailAddress").await.unwrap();

  let remaining = s.find_by_personal_token("u1").await.unwrap();
  assert_eq!(remaining.len(), 1);
  assert_eq!(remaining[0].reference_token, phone);

  s.remove_by_key_name("nobody", "emailAddress").await.unwrap();
}

#[tokio::test]
async fn erase_deletes_every_record_for_the_subject() {
  let (s, _) = store().await;
  let a = s.put(email("u1")).await.unwrap();
  let other = s.put(email("u2")).await.unwrap();

  s.erase("u1").await.unwrap();

  assert!(s.find_by_personal_token("u1").await.unwrap().is_empty());
  assert!(s.find_one_by_reference_token(&a).await.unwrap().is_none());
  assert!(
    s.find_one_by_reference_token(&other).await.unwrap().is_some()
  );

  s.erase("u1").await.unwrap();
}

// ─── Disposal ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn disposal_sweep_removes_only_elapsed_records() {
  let (s, clock) = store().await;

  let expiring = s
    .put(email("u1").disposed_at(epoch() + Duration::minutes(10)))
    .await
    .unwrap();
  let later = s
    .put(email("u2").disposed_at(epoch() + Duration::hours(2)))
    .await
    .unwrap();
  let permanent = s.put(email("u3")).await.unwrap();

  let remover = DisposedPersonalDataRemover::new(s.clone(), clock.clone());

  assert_eq!(remover.run().await.unwrap(), 0);

  clock.advance(Duration::minutes(30));
  assert_eq!(remover.run().await.unwrap(), 1);

  assert!(
    s.find_one_by_reference_token(&expiring)
      .await
      .unwrap()
      .is_none()
  );
  assert!(
    s.find_one_by_reference_token(&later).await.unwrap().is_some()
  );
  assert!(
    s.find_one_by_reference_token(&permanent)
      .await
      .unwrap()
      .is_some()
  );
}

#[tokio::test]
async fn disposal_deadline_is_inclusive() {
  let (s, clock) = store().await;
  s.put(email("u1").disposed_at(epoch() + Duration::minutes(10)))
    .await
    .unwrap();

  let remover = DisposedPersonalDataRemover::new(s.clone(), clock.clone());

  clock.set(epoch() + Duration::minutes(10));
  assert_eq!(remover.run().await.unwrap(), 1);
  assert!(s.find_by_personal_token("u1").await.unwrap().is_empty());
}

#[tokio::test]
async fn reservation_cleared_by_replace_survives_the_sweep() {
  let (s, clock) = store().await;

  let token = s
    .put(email("u1").disposed_at(epoch() + Duration::minutes(5)))
    .await
    .unwrap();
  let abandoned = s
    .put(email("u2").disposed_at(epoch() + Duration::minutes(5)))
    .await
    .unwrap();

  s.replace(&token, email("u1")).await.unwrap();

  clock.advance(Duration::hours(1));
  let remover = DisposedPersonalDataRemover::new(s.clone(), clock.clone());
  assert_eq!(remover.run().await.unwrap(), 1);

  assert!(
    s.find_one_by_reference_token(&token).await.unwrap().is_some()
  );
  assert!(
    s.find_one_by_reference_token(&abandoned)
      .await
      .unwrap()
      .is_none()
  );
}
