//! The in-memory expense store and its persistence to the remote sheet.

use crate::api::{sheet_store, Mode, SheetStore};
use crate::model::{Expense, Expenses};
use crate::{Config, Result};
use anyhow::{bail, Context};
use rust_decimal::Decimal;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{error, trace, warn};

/// The smallest amount a submission may record.
const MINIMUM_AMOUNT: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// The session's copy of the expense data and the only way it is read from or written to the
/// sheet. Owned by one command invocation; the sheet is the durable copy.
///
/// Reads are cached for a short TTL to reduce remote calls; a successful write invalidates the
/// cache. There is no coordination between concurrent sessions: saving writes the entire data
/// set over whatever the sheet held, so a record appended by another session between this
/// session's load and save is lost.
pub struct ExpenseStore {
    sheet: Box<dyn SheetStore>,
    cache_ttl: Duration,
    cached: Option<CachedLoad>,
}

struct CachedLoad {
    at: Instant,
    expenses: Expenses,
}

impl ExpenseStore {
    /// Creates a store backed by the sheet named in `config`, per `mode`.
    pub async fn new(config: &Config, mode: Mode) -> Result<Self> {
        let sheet = sheet_store(config, mode).await?;
        Ok(Self::with_sheet(sheet, config.cache_ttl()))
    }

    pub(crate) fn with_sheet(sheet: Box<dyn SheetStore>, cache_ttl: Duration) -> Self {
        Self {
            sheet,
            cache_ttl,
            cached: None,
        }
    }

    /// Loads the expense data, serving from the cache when it is fresh enough.
    ///
    /// A remote or parse failure is surfaced to the user as an error message and an empty data
    /// set is returned; it ends the current operation's access to the data but is not fatal to
    /// the process.
    pub async fn load(&mut self) -> Expenses {
        match self.try_load().await {
            Ok(expenses) => expenses,
            Err(e) => {
                error!("Failed to load expense data from the sheet: {e:#}");
                Expenses::default()
            }
        }
    }

    async fn try_load(&mut self) -> Result<Expenses> {
        if let Some(cached) = &self.cached {
            if cached.at.elapsed() < self.cache_ttl {
                trace!("serving expense data from cache");
                return Ok(cached.expenses.clone());
            }
        }
        let rows = self.sheet.read_all().await?;
        let expenses = Expenses::parse(rows)?;
        if expenses.dropped() > 0 {
            warn!(
                "Skipped {} sheet row(s) with a missing or invalid field",
                expenses.dropped()
            );
        }
        self.cached = Some(CachedLoad {
            at: Instant::now(),
            expenses: expenses.clone(),
        });
        Ok(expenses)
    }

    /// Appends `expense` to the end of the data set and saves the entire data set back to the
    /// sheet, replacing all prior content.
    ///
    /// The amount must be at least 0.01; a rejected expense leaves the store and the sheet
    /// unchanged.
    /// If the save fails, the in-memory copy still contains the appended expense while the sheet
    /// does not; the inconsistency lasts until the cache expires and the sheet is re-read.
    pub async fn append(&mut self, expense: Expense) -> Result<()> {
        if expense.amount().value() < MINIMUM_AMOUNT {
            bail!("The amount must be at least 0.01");
        }

        let mut expenses = self.load().await;
        expenses.push(expense);
        self.cached = Some(CachedLoad {
            at: Instant::now(),
            expenses: expenses.clone(),
        });
        self.flush(&expenses).await?;

        // A successful save invalidates the cache so the next load reflects the sheet.
        self.cached = None;
        Ok(())
    }

    /// Clears the sheet, then writes the header row and every expense.
    async fn flush(&mut self, expenses: &Expenses) -> Result<()> {
        self.sheet
            .clear()
            .await
            .context("Failed to clear the sheet before saving")?;
        self.sheet
            .write_all(&expenses.to_rows())
            .await
            .context("Failed to save the expense data to the sheet")?;
        Ok(())
    }
}
