//! # Till Manager
//!
//! Cash-session lifecycle: open with a counted float, close with a
//! counted drawer, report the variance.
//!
//! ## The one-open-till-per-user invariant
//! Enforced twice, deliberately:
//! 1. check-then-insert runs inside a single transaction here;
//! 2. the storage layer's partial unique index rejects whatever a
//!    concurrent opener manages to slip past the check.
//! A unique violation on insert is therefore reported as the same
//! conflict as a failed check, not as a storage error.

use chrono::Utc;
use tracing::info;

use crate::error::{ServiceError, ServiceResult};
use tienda_core::validation::validate_amount_cents;
use tienda_core::{CoreError, Money, Till, TillCloseReport, TillState};
use tienda_db::repository::till::TillRepository;
use tienda_db::{new_id, Database, DbError};

/// Opens and closes till sessions for users.
#[derive(Debug, Clone)]
pub struct TillManager {
    db: Database,
}

impl TillManager {
    pub fn new(db: Database) -> Self {
        TillManager { db }
    }

    /// Opens a till for the user with the given opening float.
    ///
    /// Fails with a validation error on a negative amount and with a
    /// conflict when the user already has an open till.
    pub async fn open(&self, opening: Money, user_id: &str) -> ServiceResult<Till> {
        validate_amount_cents("opening_amount", opening.cents())?;

        let mut tx = self.db.begin().await?;

        if TillRepository::find_open_for_user_tx(&mut tx, user_id)
            .await?
            .is_some()
        {
            return Err(CoreError::TillAlreadyOpen {
                user_id: user_id.to_string(),
            }
            .into());
        }

        let till = Till {
            id: new_id(),
            user_id: user_id.to_string(),
            opened_at: Utc::now(),
            closed_at: None,
            opening_cents: opening.cents(),
            closing_cents: None,
            state: TillState::Open,
        };

        match TillRepository::insert(&mut tx, &till).await {
            Ok(()) => {}
            // Lost the race to a concurrent open: same conflict as above.
            Err(DbError::UniqueViolation { .. }) => {
                return Err(CoreError::TillAlreadyOpen {
                    user_id: user_id.to_string(),
                }
                .into());
            }
            Err(e) => return Err(e.into()),
        }

        tx.commit().await.map_err(DbError::from)?;

        info!(till_id = %till.id, user_id = %user_id, opening = %opening, "till opened");

        Ok(till)
    }

    /// Closes the user's open till and reports the variance between the
    /// counted drawer and the opening float. Negative variance is a
    /// finding for the back office, not a reason to refuse the close.
    pub async fn close(&self, closing: Money, user_id: &str) -> ServiceResult<TillCloseReport> {
        validate_amount_cents("closing_amount", closing.cents())?;

        let till = self
            .db
            .tills()
            .find_open_for_user(user_id)
            .await?
            .ok_or_else(|| {
                ServiceError::from(CoreError::OpenTillNotFound {
                    user_id: user_id.to_string(),
                })
            })?;

        // The state = 'open' guard in the update makes close-once atomic;
        // losing a race to another close surfaces as NotFound.
        self.db.tills().close(&till.id, Utc::now(), closing.cents()).await?;

        let report = TillCloseReport {
            till_id: till.id.clone(),
            opening_cents: till.opening_cents,
            closing_cents: closing.cents(),
            variance_cents: closing.cents() - till.opening_cents,
        };

        info!(
            till_id = %till.id,
            user_id = %user_id,
            variance = %report.variance(),
            "till closed"
        );

        Ok(report)
    }

    /// The user's currently open till, if any. Absence is not an error.
    pub async fn current(&self, user_id: &str) -> ServiceResult<Option<Till>> {
        Ok(self.db.tills().find_open_for_user(user_id).await?)
    }

    /// Full session history, most recent first, for audits.
    pub async fn list_all(&self) -> ServiceResult<Vec<Till>> {
        Ok(self.db.tills().list_all().await?)
    }
}
