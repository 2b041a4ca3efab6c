//! SQLite event store.
//!
//! Persists detections, validations and feature snapshots using Diesel.
//! Rows relate through the natural key (symbol, detect_time); there are no
//! surrogate foreign keys between the three tables.

use diesel::prelude::*;
use diesel::SqliteConnection;
use tracing::{debug, warn};

use super::database::connection::{create_pool_with_timeout, run_migrations, DbPool};
use super::database::model::{
    format_instant, DetectionRow, FeatureRow, NewDetectionRow, NewFeatureRow, NewValidationRow,
    ValidationRow,
};
use super::database::schema::{events, labeling_features, peak_dip_events};
use super::settings::StoreConfig;
use crate::domain::{
    Detection, EventSource, FeatureSnapshot, JoinedEvent, LabeledSample, TimeRange, Validation,
};
use crate::error::{Error, Result};
use crate::port::outbound::store::{EventStore, EventWriter};

#[derive(QueryableByName)]
struct LastInsertRowId {
    #[diesel(sql_type = diesel::sql_types::Integer)]
    #[diesel(column_name = "id")]
    id: i32,
}

fn last_insert_rowid(conn: &mut SqliteConnection) -> Result<i32> {
    let row = diesel::sql_query("SELECT last_insert_rowid() AS id")
        .get_result::<LastInsertRowId>(conn)?;
    Ok(row.id)
}

/// SQLite-backed event store.
///
/// Implements the [`EventStore`] trait. Every write goes through
/// [`EventStore::atomically`], so a multi-table write either commits as a
/// whole or leaves no trace.
pub struct SqliteEventStore {
    /// Database connection pool.
    pool: DbPool,
    reject_duplicates: bool,
}

impl SqliteEventStore {
    /// Create a store over an existing pool. Migrations are not run.
    #[must_use]
    pub fn new(pool: DbPool, config: &StoreConfig) -> Self {
        Self {
            pool,
            reject_duplicates: config.reject_duplicate_detections,
        }
    }

    /// Open the database at `database_url`, applying pending migrations.
    ///
    /// # Errors
    /// Returns an error if the pool cannot be created or a migration fails.
    pub fn open(database_url: &str, config: &StoreConfig) -> Result<Self> {
        let pool = create_pool_with_timeout(database_url, config.busy_timeout_ms)?;
        run_migrations(&pool)?;
        Ok(Self::new(pool, config))
    }

    /// Whether duplicate detections are rejected.
    #[must_use]
    pub const fn rejects_duplicates(&self) -> bool {
        self.reject_duplicates
    }

    fn connection(
        &self,
    ) -> Result<diesel::r2d2::PooledConnection<diesel::r2d2::ConnectionManager<SqliteConnection>>>
    {
        self.pool
            .get()
            .map_err(|e| Error::Connection(e.to_string()))
    }
}

/// Writer bound to one open transaction.
pub struct SqliteEventWriter<'a> {
    conn: &'a mut SqliteConnection,
    reject_duplicates: bool,
}

impl EventWriter for SqliteEventWriter<'_> {
    fn record_detection(&mut self, detection: &Detection) -> Result<i32> {
        detection.validate()?;
        let row = NewDetectionRow::from(detection);

        if self.reject_duplicates {
            let existing: i64 = peak_dip_events::table
                .filter(peak_dip_events::symbol.eq(&row.symbol))
                .filter(peak_dip_events::detect_time.eq(&row.detect_time))
                .filter(peak_dip_events::source.eq(&row.source))
                .count()
                .get_result(&mut *self.conn)?;
            if existing > 0 {
                warn!(
                    symbol = %row.symbol,
                    detect_time = %row.detect_time,
                    source = %row.source,
                    "Rejected duplicate detection"
                );
                return Err(Error::Conflict {
                    symbol: row.symbol,
                    detect_time: row.detect_time,
                    source_kind: row.source,
                });
            }
        }

        diesel::insert_into(peak_dip_events::table)
            .values(&row)
            .execute(&mut *self.conn)?;
        let id = last_insert_rowid(self.conn)?;
        debug!(id, symbol = %row.symbol, kind = %row.kind, "Recorded detection");
        Ok(id)
    }

    fn upsert_validation(&mut self, validation: &Validation) -> Result<()> {
        validation.validate()?;
        let row = NewValidationRow::from(validation);
        diesel::replace_into(events::table)
            .values(&row)
            .execute(&mut *self.conn)?;
        debug!(symbol = %row.symbol, detect_time = %row.detect_time, "Upserted validation");
        Ok(())
    }

    fn append_feature_snapshot(&mut self, snapshot: &FeatureSnapshot) -> Result<i32> {
        snapshot.validate()?;
        let row = NewFeatureRow::from(snapshot);
        diesel::insert_into(labeling_features::table)
            .values(&row)
            .execute(&mut *self.conn)?;
        let id = last_insert_rowid(self.conn)?;
        debug!(
            id,
            symbol = %row.symbol,
            present = snapshot.features.present_count(),
            "Appended feature snapshot"
        );
        Ok(id)
    }
}

impl EventStore for SqliteEventStore {
    fn atomically<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut dyn EventWriter) -> Result<T>,
    {
        let mut pooled = self.connection()?;
        let conn: &mut SqliteConnection = &mut pooled;
        let reject_duplicates = self.reject_duplicates;
        conn.transaction::<T, Error, _>(|conn| {
            let mut writer = SqliteEventWriter {
                conn,
                reject_duplicates,
            };
            f(&mut writer)
        })
    }

    fn query_joined(&self, symbol: &str, range: TimeRange) -> Result<Vec<JoinedEvent>> {
        let mut conn = self.connection()?;

        let mut query = peak_dip_events::table
            .left_join(
                events::table.on(events::symbol
                    .eq(peak_dip_events::symbol)
                    .and(events::detect_time.eq(peak_dip_events::detect_time))),
            )
            .filter(peak_dip_events::symbol.eq(symbol.to_string()))
            .into_boxed();
        if let Some(start) = range.start {
            query = query.filter(peak_dip_events::detect_time.ge(format_instant(start)));
        }
        if let Some(end) = range.end {
            query = query.filter(peak_dip_events::detect_time.lt(format_instant(end)));
        }

        let rows = query
            .order((peak_dip_events::detect_time.desc(), peak_dip_events::id.desc()))
            .load::<(DetectionRow, Option<ValidationRow>)>(&mut conn)?;

        rows.into_iter()
            .map(|(detection, validation)| {
                Ok(JoinedEvent {
                    id: detection.id,
                    detection: detection.into_domain()?,
                    validation: validation.map(ValidationRow::into_domain).transpose()?,
                })
            })
            .collect()
    }

    fn feature_snapshots(&self, symbol: &str, range: TimeRange) -> Result<Vec<FeatureSnapshot>> {
        let mut conn = self.connection()?;

        let mut query = labeling_features::table
            .filter(labeling_features::symbol.eq(symbol.to_string()))
            .into_boxed();
        if let Some(start) = range.start {
            query = query.filter(labeling_features::timestamp.ge(format_instant(start)));
        }
        if let Some(end) = range.end {
            query = query.filter(labeling_features::timestamp.lt(format_instant(end)));
        }

        query
            .order((labeling_features::timestamp.asc(), labeling_features::id.asc()))
            .load::<FeatureRow>(&mut conn)?
            .into_iter()
            .map(FeatureRow::into_domain)
            .collect()
    }

    fn labeled_dataset(&self, source: EventSource) -> Result<Vec<LabeledSample>> {
        let mut conn = self.connection()?;

        let rows = peak_dip_events::table
            .inner_join(
                events::table.on(events::symbol
                    .eq(peak_dip_events::symbol)
                    .and(events::detect_time.eq(peak_dip_events::detect_time))),
            )
            .inner_join(
                labeling_features::table.on(labeling_features::symbol
                    .eq(peak_dip_events::symbol)
                    .and(labeling_features::timestamp.eq(peak_dip_events::detect_time))),
            )
            .filter(peak_dip_events::source.eq(source.as_str()))
            .order((
                peak_dip_events::detect_time.asc(),
                peak_dip_events::id.asc(),
                labeling_features::id.asc(),
            ))
            .load::<(DetectionRow, ValidationRow, FeatureRow)>(&mut conn)?;

        rows.into_iter()
            .map(|(detection, validation, features)| {
                Ok(LabeledSample {
                    detection: detection.into_domain()?,
                    validation: validation.into_domain()?,
                    features: features.features(),
                })
            })
            .collect()
    }

    fn symbols(&self) -> Result<Vec<String>> {
        let mut conn = self.connection()?;
        let symbols = peak_dip_events::table
            .select(peak_dip_events::symbol)
            .distinct()
            .order(peak_dip_events::symbol.asc())
            .load::<String>(&mut conn)?;
        Ok(symbols)
    }
}
