//! [`SqliteStore`] — the SQLite implementation of
//! [`PersonalInformationStore`].

use std::{path::Path, sync::Arc};

use chrono::{DateTime, Utc};
use rusqlite::OptionalExtension as _;
use tracing::{debug, info};

use veil_core::{
  clock::Clock,
  data::{PersonalData, RecordedPersonalData},
  store::PersonalInformationStore,
  token::{ReferenceTokenGenerator, UuidTokenGenerator},
};

use crate::{
  Error, Result,
  encode::{
    RawRecord, encode_dt, encode_metadata, encode_string_list, encode_value,
  },
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A personal information store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted. Each trait
/// method issues one statement (or one `conn.call` batch), so concurrent
/// callers observe every operation as a whole or not at all.
#[derive(Clone)]
pub struct SqliteStore {
  conn:   tokio_rusqlite::Connection,
  clock:  Arc<dyn Clock>,
  tokens: Arc<dyn ReferenceTokenGenerator>,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(
    path: impl AsRef<Path>,
    clock: Arc<dyn Clock>,
  ) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    Self::from_connection(conn, clock).await
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory(clock: Arc<dyn Clock>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    Self::from_connection(conn, clock).await
  }

  /// Swap the reference token generator, e.g. for a deterministic one in
  /// tests.
  #[must_use]
  pub fn with_token_generator(
    mut self,
    tokens: Arc<dyn ReferenceTokenGenerator>,
  ) -> Self {
    self.tokens = tokens;
    self
  }

  async fn from_connection(
    conn: tokio_rusqlite::Connection,
    clock: Arc<dyn Clock>,
  ) -> Result<Self> {
    let store =
      Self { conn, clock, tokens: Arc::new(UuidTokenGenerator) };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── PersonalInformationStore impl ───────────────────────────────────────────

impl PersonalInformationStore for SqliteStore {
  type Error = Error;

  async fn put(&self, data: PersonalData) -> Result<String> {
    let reference_token = match &data.reference_token {
      Some(token) => token.clone(),
      None => self.tokens.generate(),
    };

    let token_param      = reference_token.clone();
    let personal_token   = data.personal_token;
    let key_name         = data.key_name;
    let value_json       = encode_value(&data.value)?;
    let source           = data.source;
    let reasons          = encode_string_list(&data.reasons)?;
    let requirements     = encode_string_list(&data.processing_requirements)?;
    let disposed_at      = data.disposed_at.map(encode_dt);
    let metadata         = encode_metadata(&data.metadata)?;
    let recorded_at      = encode_dt(self.clock.now());

    let inserted = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "INSERT OR IGNORE INTO personal_data (
             reference_token, personal_token, key_name, value_json, source,
             reasons, processing_requirements, disposed_at, metadata,
             recorded_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
          rusqlite::params![
            token_param,
            personal_token,
            key_name,
            value_json,
            source,
            reasons,
            requirements,
            disposed_at,
            metadata,
            recorded_at,
          ],
        )?)
      })
      .await?;

    if inserted == 0 {
      return Err(Error::DuplicateReferenceToken(reference_token));
    }

    debug!(%reference_token, "recorded personal data");
    Ok(reference_token)
  }

  async fn replace(
    &self,
    reference_token: &str,
    data: PersonalData,
  ) -> Result<()> {
    let token_param    = reference_token.to_owned();
    let personal_token = data.personal_token;
    let key_name       = data.key_name;
    let value_json     = encode_value(&data.value)?;
    let source         = data.source;
    let reasons        = encode_string_list(&data.reasons)?;
    let requirements   = encode_string_list(&data.processing_requirements)?;
    let disposed_at    = data.disposed_at.map(encode_dt);
    let metadata       = encode_metadata(&data.metadata)?;
    let recorded_at    = encode_dt(self.clock.now());

    let updated = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE personal_data SET
             personal_token          = ?2,
             key_name                = ?3,
             value_json              = ?4,
             source                  = ?5,
             reasons                 = ?6,
             processing_requirements = ?7,
             disposed_at             = ?8,
             metadata                = ?9,
             recorded_at             = ?10
           WHERE reference_token = ?1",
          rusqlite::params![
            token_param,
            personal_token,
            key_name,
            value_json,
            source,
            reasons,
            requirements,
            disposed_at,
            metadata,
            recorded_at,
          ],
        )?)
      })
      .await?;

    if updated == 0 {
      return Err(Error::NotFound(reference_token.to_owned()));
    }
    Ok(())
  }

  async fn find_one_by_key_name(
    &self,
    personal_token: &str,
    key_name: &str,
  ) -> Result<Option<RecordedPersonalData>> {
    let personal_token = personal_token.to_owned();
    let key_name = key_name.to_owned();

    let raw: Option<RawRecord> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT
                 reference_token, personal_token, key_name, value_json,
                 source, reasons, processing_requirements, disposed_at,
                 metadata, recorded_at
               FROM personal_data
               WHERE personal_token = ?1 AND key_name = ?2
               ORDER BY rowid
               LIMIT 1",
              rusqlite::params![personal_token, key_name],
              RawRecord::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawRecord::into_recorded).transpose()
  }

  async fn find_one_by_reference_token(
    &self,
    reference_token: &str,
  ) -> Result<Option<RecordedPersonalData>> {
    let reference_token = reference_token.to_owned();

    let raw: Option<RawRecord> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT
                 reference_token, personal_token, key_name, value_json,
                 source, reasons, processing_requirements, disposed_at,
                 metadata, recorded_at
               FROM personal_data
               WHERE reference_token = ?1",
              rusqlite::params![reference_token],
              RawRecord::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawRecord::into_recorded).transpose()
  }

  async fn find_by_personal_token(
    &self,
    personal_token: &str,
  ) -> Result<Vec<RecordedPersonalData>> {
    let personal_token = personal_token.to_owned();

    let raws: Vec<RawRecord> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT
             reference_token, personal_token, key_name, value_json,
             source, reasons, processing_requirements, disposed_at,
             metadata, recorded_at
           FROM personal_data
           WHERE personal_token = ?1
           ORDER BY rowid",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![personal_token], RawRecord::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawRecord::into_recorded).collect()
  }

  async fn remove_by_key_name(
    &self,
    personal_token: &str,
    key_name: &str,
  ) -> Result<()> {
    let personal_token = personal_token.to_owned();
    let key_name = key_name.to_owned();

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "DELETE FROM personal_data
           WHERE personal_token = ?1 AND key_name = ?2",
          rusqlite::params![personal_token, key_name],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn remove(&self, reference_token: &str) -> Result<()> {
    let reference_token = reference_token.to_owned();

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "DELETE FROM personal_data WHERE reference_token = ?1",
          rusqlite::params![reference_token],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn erase(&self, personal_token: &str) -> Result<()> {
    let token_param = personal_token.to_owned();

    let removed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM personal_data WHERE personal_token = ?1",
          rusqlite::params![token_param],
        )?)
      })
      .await?;

    if removed > 0 {
      info!(personal_token, removed, "erased personal data");
    }
    Ok(())
  }

  async fn find_disposable(
    &self,
    as_of: DateTime<Utc>,
  ) -> Result<Vec<RecordedPersonalData>> {
    let as_of_str = encode_dt(as_of);

    let raws: Vec<RawRecord> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT
             reference_token, personal_token, key_name, value_json,
             source, reasons, processing_requirements, disposed_at,
             metadata, recorded_at
           FROM personal_data
           WHERE disposed_at IS NOT NULL AND disposed_at <= ?1
           ORDER BY rowid",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![as_of_str], RawRecord::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawRecord::into_recorded).collect()
  }
}
