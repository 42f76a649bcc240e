//! Cash ledger repository.
//!
//! Records denomination-based cash transactions, derives the theoretical
//! register balance at read time, and runs the balancing/adjustment flow.
//! Totals are never stored: every read recomputes them from the lines so the
//! stored rows cannot drift.

use std::collections::HashMap;

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use tsena_core::cash::{
    self, AdjustmentKind, BalancingOutcome, CashAccountState, CashError, CashOperation,
    DenominationLine, TransactionDirection, TransactionStatus,
};
use tsena_shared::AppError;
use tsena_shared::types::{CashAccountId, CashTransactionId, DenominationId, UserId};

use crate::entities::{
    cash_accounts, cash_adjustment_lines, cash_adjustments, cash_transaction_lines,
    cash_transactions, denominations,
    sea_orm_active_enums::SettlementStatus,
};
use crate::retry::{self, TransientError, with_retry};

/// Error types for cash ledger operations.
#[derive(Debug, thiserror::Error)]
pub enum CashLedgerError {
    /// A cash rule was violated; nothing was written.
    #[error(transparent)]
    Rule(#[from] CashError),

    /// Denomination not found.
    #[error("Denomination not found: {0}")]
    DenominationNotFound(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl TransientError for CashLedgerError {
    fn is_transient(&self) -> bool {
        matches!(self, Self::Database(err) if retry::is_transient_db_err(err))
    }
}

impl From<CashLedgerError> for AppError {
    fn from(err: CashLedgerError) -> Self {
        match err {
            CashLedgerError::Rule(rule) => match rule {
                CashError::InvalidOperationDirection { .. }
                | CashError::EmptyDetailLines
                | CashError::NonPositiveQuantity => Self::Validation(rule.to_string()),
                CashError::AccountNotFound(_) | CashError::TransactionNotFound(_) => {
                    Self::NotFound(rule.to_string())
                }
                CashError::AccountNotOpen { .. }
                | CashError::AlreadyCanceled(_)
                | CashError::NonCancelableOperation
                | CashError::InvalidStatusTransition { .. }
                | CashError::InvalidAccountState { .. } => Self::StaleState(rule.to_string()),
            },
            CashLedgerError::DenominationNotFound(_) => Self::NotFound(err.to_string()),
            CashLedgerError::Database(db) if retry::is_transient_db_err(&db) => {
                Self::Transient(db.to_string())
            }
            CashLedgerError::Database(db) => Self::Database(db.to_string()),
        }
    }
}

/// One denomination line of a new transaction or adjustment.
#[derive(Debug, Clone, Copy)]
pub struct LineInput {
    /// The denomination being counted.
    pub denomination_id: DenominationId,
    /// Number of pieces; must be strictly positive.
    pub quantity: i32,
}

/// Input for recording a cash transaction.
#[derive(Debug, Clone)]
pub struct CreateCashTransactionInput {
    /// The register the money moves through.
    pub account_id: CashAccountId,
    /// Transaction direction.
    pub direction: TransactionDirection,
    /// Business purpose; must match the direction.
    pub operation: CashOperation,
    /// Denomination breakdown; must not be empty.
    pub lines: Vec<LineInput>,
    /// Optional external payment reference.
    pub payment_ref: Option<String>,
    /// User recording the transaction.
    pub created_by: UserId,
}

/// A transaction with its denomination lines.
#[derive(Debug, Clone)]
pub struct TransactionWithLines {
    /// Transaction header.
    pub transaction: cash_transactions::Model,
    /// Denomination lines.
    pub lines: Vec<cash_transaction_lines::Model>,
}

/// Per-day transaction counts for a register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransactionCounts {
    /// COMPLETED transactions moving money in.
    pub inflows: u64,
    /// COMPLETED transactions moving money out.
    pub outflows: u64,
    /// CANCELED transactions.
    pub canceled: u64,
}

/// Result of a cash adjustment.
#[derive(Debug, Clone)]
pub struct PerformedAdjustment {
    /// The adjustment record.
    pub adjustment: cash_adjustments::Model,
    /// The counted cash amount.
    pub counted: Decimal,
    /// The balancing outcome; `None` for OPENING adjustments.
    pub outcome: Option<BalancingOutcome>,
}

/// Cash ledger repository.
#[derive(Debug, Clone)]
pub struct CashRepository {
    db: DatabaseConnection,
    retry_attempts: u32,
}

impl CashRepository {
    /// Creates a new cash repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            retry_attempts: retry::DEFAULT_ATTEMPTS,
        }
    }

    /// Overrides the number of attempts for conflicting transactions.
    #[must_use]
    pub const fn with_retry_attempts(mut self, attempts: u32) -> Self {
        self.retry_attempts = attempts;
        self
    }

    /// Records a cash transaction with its denomination lines.
    ///
    /// The header and the lines commit atomically; the initial status is
    /// PENDING. The account must be OPEN.
    ///
    /// # Errors
    ///
    /// Returns `InvalidOperationDirection`, `EmptyDetailLines`,
    /// `NonPositiveQuantity`, `AccountNotFound`, `AccountNotOpen`,
    /// `DenominationNotFound`, or a database error. A failed call leaves the
    /// account's transaction count and theoretical balance unchanged.
    pub async fn create_transaction(
        &self,
        input: CreateCashTransactionInput,
    ) -> Result<TransactionWithLines, CashLedgerError> {
        with_retry(self.retry_attempts, || {
            let input = input.clone();
            async move {
                let txn = self.db.begin().await?;
                let account_id = input.account_id.into_inner();

                let account = cash_accounts::Entity::find_by_id(account_id)
                    .lock_exclusive()
                    .one(&txn)
                    .await?
                    .ok_or(CashError::AccountNotFound(account_id))?;

                let state: CashAccountState = account.state.into();
                if !state.accepts_transactions() {
                    return Err(CashError::AccountNotOpen {
                        account: account_id,
                        state,
                    }
                    .into());
                }

                // Resolve face values first so validation sees real lines.
                let resolved = resolve_lines(&txn, &input.lines).await?;
                cash::validate_transaction(input.direction, input.operation, &resolved)?;

                let now = Utc::now();
                let transaction = cash_transactions::ActiveModel {
                    id: Set(Uuid::new_v4()),
                    register_id: Set(account_id),
                    direction: Set(input.direction.into()),
                    operation: Set(input.operation.into()),
                    status: Set(SettlementStatus::Pending),
                    date_of: Set(now.date_naive()),
                    payment_ref: Set(input.payment_ref.clone()),
                    created_by: Set(input.created_by.into_inner()),
                    created_at: Set(now.into()),
                    updated_reason: Set(None),
                    updated_at: Set(None),
                    updated_by: Set(None),
                }
                .insert(&txn)
                .await?;

                let mut lines = Vec::with_capacity(input.lines.len());
                for line in &input.lines {
                    let inserted = cash_transaction_lines::ActiveModel {
                        id: Set(Uuid::new_v4()),
                        transaction_id: Set(transaction.id),
                        denomination_id: Set(line.denomination_id.into_inner()),
                        quantity: Set(line.quantity),
                    }
                    .insert(&txn)
                    .await?;
                    lines.push(inserted);
                }

                txn.commit().await?;
                Ok(TransactionWithLines { transaction, lines })
            }
        })
        .await
    }

    /// Moves a transaction through its settlement lifecycle.
    ///
    /// Forward progression only; terminal states (COMPLETED included) are
    /// only left through the explicit cancel action.
    ///
    /// # Errors
    ///
    /// Returns `TransactionNotFound`, `InvalidStatusTransition`, or a
    /// database error.
    pub async fn update_status(
        &self,
        transaction_id: CashTransactionId,
        new_status: TransactionStatus,
        updated_by: UserId,
        reason: Option<String>,
    ) -> Result<cash_transactions::Model, CashLedgerError> {
        let id = transaction_id.into_inner();
        let txn = self.db.begin().await?;

        let transaction = cash_transactions::Entity::find_by_id(id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or(CashError::TransactionNotFound(id))?;

        cash::check_status_transition(transaction.status.into(), new_status)?;

        let mut active: cash_transactions::ActiveModel = transaction.into();
        active.status = Set(new_status.into());
        active.updated_at = Set(Some(Utc::now().into()));
        active.updated_by = Set(Some(updated_by.into_inner()));
        active.updated_reason = Set(reason);
        let updated = active.update(&txn).await?;

        txn.commit().await?;
        Ok(updated)
    }

    /// Cancels a transaction, retaining it for audit.
    ///
    /// Sale payments can never be canceled directly; they are corrected with
    /// an offsetting CORRECTION transaction.
    ///
    /// # Errors
    ///
    /// Returns `TransactionNotFound`, `AlreadyCanceled`,
    /// `NonCancelableOperation`, or a database error.
    pub async fn cancel_transaction(
        &self,
        transaction_id: CashTransactionId,
        canceled_by: UserId,
        reason: Option<String>,
    ) -> Result<cash_transactions::Model, CashLedgerError> {
        let id = transaction_id.into_inner();
        let txn = self.db.begin().await?;

        let transaction = cash_transactions::Entity::find_by_id(id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or(CashError::TransactionNotFound(id))?;

        cash::check_cancelable(id, transaction.status.into(), transaction.operation.into())?;

        let mut active: cash_transactions::ActiveModel = transaction.into();
        active.status = Set(SettlementStatus::Canceled);
        active.updated_at = Set(Some(Utc::now().into()));
        active.updated_by = Set(Some(canceled_by.into_inner()));
        active.updated_reason = Set(reason);
        let canceled = active.update(&txn).await?;

        txn.commit().await?;
        Ok(canceled)
    }

    /// Theoretical register balance for a business date.
    ///
    /// Signed sum over the day's COMPLETED transactions; the baseline a
    /// physical count is compared against during balancing.
    ///
    /// # Errors
    ///
    /// Returns a database error.
    pub async fn calculate_theoretical_amount(
        &self,
        account_id: CashAccountId,
        date: NaiveDate,
    ) -> Result<Decimal, CashLedgerError> {
        theoretical_amount_on(&self.db, account_id.into_inner(), date).await
    }

    /// Per-day transaction counts for a register. Read-only.
    ///
    /// # Errors
    ///
    /// Returns a database error.
    pub async fn count_transactions(
        &self,
        account_id: CashAccountId,
        date: NaiveDate,
    ) -> Result<TransactionCounts, CashLedgerError> {
        let account_id = account_id.into_inner();
        let base = cash_transactions::Entity::find()
            .filter(cash_transactions::Column::RegisterId.eq(account_id))
            .filter(cash_transactions::Column::DateOf.eq(date));

        let inflows = base
            .clone()
            .filter(cash_transactions::Column::Status.eq(SettlementStatus::Completed))
            .filter(
                cash_transactions::Column::Direction
                    .eq(crate::entities::sea_orm_active_enums::TransactionDirection::In),
            )
            .count(&self.db)
            .await?;
        let outflows = base
            .clone()
            .filter(cash_transactions::Column::Status.eq(SettlementStatus::Completed))
            .filter(
                cash_transactions::Column::Direction
                    .eq(crate::entities::sea_orm_active_enums::TransactionDirection::Out),
            )
            .count(&self.db)
            .await?;
        let canceled = base
            .filter(cash_transactions::Column::Status.eq(SettlementStatus::Canceled))
            .count(&self.db)
            .await?;

        Ok(TransactionCounts {
            inflows,
            outflows,
            canceled,
        })
    }

    /// Records a cash adjustment and applies its effect on the account.
    ///
    /// - OPENING sets the opening float (`amount_init`) from the counted
    ///   total; the account must be OPEN.
    /// - BALANCING compares the counted total against the day's theoretical
    ///   balance and moves the account to BALANCED or NOT_BALANCED.
    /// - FORCING_BALANCE always moves the account to BALANCED_FORCED; the
    ///   discrepancy is logged for audit.
    ///
    /// The adjustment rows, the state change, and the recorded count commit
    /// in one transaction.
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound`, `InvalidAccountState`, `EmptyDetailLines`,
    /// `NonPositiveQuantity`, `DenominationNotFound`, or a database error.
    pub async fn perform_adjustment(
        &self,
        account_id: CashAccountId,
        kind: AdjustmentKind,
        lines: Vec<LineInput>,
        performed_by: UserId,
    ) -> Result<PerformedAdjustment, CashLedgerError> {
        with_retry(self.retry_attempts, || {
            let lines = lines.clone();
            async move {
                let txn = self.db.begin().await?;
                let account_id = account_id.into_inner();

                let account = cash_accounts::Entity::find_by_id(account_id)
                    .lock_exclusive()
                    .one(&txn)
                    .await?
                    .ok_or(CashError::AccountNotFound(account_id))?;
                let state: CashAccountState = account.state.into();

                if lines.is_empty() {
                    return Err(CashError::EmptyDetailLines.into());
                }
                if lines.iter().any(|line| line.quantity <= 0) {
                    return Err(CashError::NonPositiveQuantity.into());
                }
                let resolved = resolve_lines(&txn, &lines).await?;
                let counted = cash::unsigned_total(&resolved);

                let now = Utc::now();
                let today = now.date_naive();

                let outcome = match kind {
                    AdjustmentKind::Opening => {
                        if state != CashAccountState::Open {
                            return Err(CashError::InvalidAccountState {
                                account: account_id,
                                from: state,
                                to: CashAccountState::Open,
                            }
                            .into());
                        }
                        let mut active: cash_accounts::ActiveModel = account.into();
                        active.amount_init = Set(counted);
                        active.update(&txn).await?;
                        None
                    }
                    AdjustmentKind::Balancing | AdjustmentKind::ForcingBalance => {
                        let forced = kind == AdjustmentKind::ForcingBalance;
                        if !state.can_balance() {
                            return Err(CashError::InvalidAccountState {
                                account: account_id,
                                from: state,
                                to: CashAccountState::Balanced,
                            }
                            .into());
                        }

                        let theoretical = theoretical_amount_on(&txn, account_id, today).await?;
                        let outcome = cash::balancing_outcome(counted, theoretical, forced);
                        if let BalancingOutcome::BalancedForced { discrepancy } = outcome {
                            tracing::warn!(
                                account = %account_id,
                                %counted,
                                %theoretical,
                                %discrepancy,
                                "balance forced with discrepancy"
                            );
                        }

                        let mut active: cash_accounts::ActiveModel = account.into();
                        active.state = Set(outcome.account_state().into());
                        active.balancing_amount = Set(counted);
                        active.update(&txn).await?;
                        Some(outcome)
                    }
                };

                let adjustment = cash_adjustments::ActiveModel {
                    id: Set(Uuid::new_v4()),
                    register_id: Set(account_id),
                    kind: Set(kind.into()),
                    performed_by: Set(performed_by.into_inner()),
                    date_of: Set(today),
                    created_at: Set(now.into()),
                }
                .insert(&txn)
                .await?;

                for line in &lines {
                    cash_adjustment_lines::ActiveModel {
                        id: Set(Uuid::new_v4()),
                        adjustment_id: Set(adjustment.id),
                        denomination_id: Set(line.denomination_id.into_inner()),
                        quantity: Set(line.quantity),
                    }
                    .insert(&txn)
                    .await?;
                }

                txn.commit().await?;
                Ok(PerformedAdjustment {
                    adjustment,
                    counted,
                    outcome,
                })
            }
        })
        .await
    }

    /// Closes a reconciled account, blocking further transactions.
    ///
    /// Only BALANCED and BALANCED_FORCED accounts can close; a NOT_BALANCED
    /// register must first re-balance or be force-balanced.
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound`, `InvalidAccountState`, or a database error.
    pub async fn close_account(
        &self,
        account_id: CashAccountId,
    ) -> Result<cash_accounts::Model, CashLedgerError> {
        let id = account_id.into_inner();
        let txn = self.db.begin().await?;

        let account = cash_accounts::Entity::find_by_id(id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or(CashError::AccountNotFound(id))?;

        let state: CashAccountState = account.state.into();
        if !state.can_close() {
            return Err(CashError::InvalidAccountState {
                account: id,
                from: state,
                to: CashAccountState::Closed,
            }
            .into());
        }

        let mut active: cash_accounts::ActiveModel = account.into();
        active.state = Set(CashAccountState::Closed.into());
        let closed = active.update(&txn).await?;

        txn.commit().await?;
        Ok(closed)
    }
}

/// Resolves denomination ids to face values.
async fn resolve_lines<C: ConnectionTrait>(
    conn: &C,
    lines: &[LineInput],
) -> Result<Vec<DenominationLine>, CashLedgerError> {
    let ids: Vec<Uuid> = lines
        .iter()
        .map(|line| line.denomination_id.into_inner())
        .collect();

    let rows = denominations::Entity::find()
        .filter(denominations::Column::Id.is_in(ids))
        .all(conn)
        .await?;
    let values: HashMap<Uuid, Decimal> = rows.into_iter().map(|d| (d.id, d.value)).collect();

    lines
        .iter()
        .map(|line| {
            let id = line.denomination_id.into_inner();
            values
                .get(&id)
                .map(|value| DenominationLine {
                    denomination_id: line.denomination_id,
                    value: *value,
                    quantity: line.quantity,
                })
                .ok_or(CashLedgerError::DenominationNotFound(id))
        })
        .collect()
}

/// Theoretical balance on an existing connection, so the balancing flow can
/// read it inside its own transaction.
async fn theoretical_amount_on<C: ConnectionTrait>(
    conn: &C,
    account_id: Uuid,
    date: NaiveDate,
) -> Result<Decimal, CashLedgerError> {
    let transactions = cash_transactions::Entity::find()
        .filter(cash_transactions::Column::RegisterId.eq(account_id))
        .filter(cash_transactions::Column::DateOf.eq(date))
        .all(conn)
        .await?;

    if transactions.is_empty() {
        return Ok(Decimal::ZERO);
    }

    let ids: Vec<Uuid> = transactions.iter().map(|t| t.id).collect();
    let lines = cash_transaction_lines::Entity::find()
        .filter(cash_transaction_lines::Column::TransactionId.is_in(ids))
        .find_also_related(denominations::Entity)
        .all(conn)
        .await?;

    let mut by_transaction: HashMap<Uuid, Vec<DenominationLine>> = HashMap::new();
    for (line, denomination) in lines {
        let denomination = denomination.ok_or_else(|| {
            DbErr::RecordNotFound(format!("denomination {} for line {}", line.denomination_id, line.id))
        })?;
        by_transaction
            .entry(line.transaction_id)
            .or_default()
            .push(DenominationLine {
                denomination_id: DenominationId::from_uuid(line.denomination_id),
                value: denomination.value,
                quantity: line.quantity,
            });
    }

    let empty: Vec<DenominationLine> = Vec::new();
    Ok(cash::theoretical_amount(transactions.iter().map(|t| {
        let lines = by_transaction.get(&t.id).unwrap_or(&empty);
        (t.status.into(), cash::signed_total(t.direction.into(), lines))
    })))
}
