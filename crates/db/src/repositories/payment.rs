//! Payment repository: logs payments against billable instances.
//!
//! Each instance kind lives in its own table. `store_for` is the single place
//! that maps an `InstanceRef` variant to the table that backs it.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait, sea_query::Expr,
};
use tadika_core::payments::{
    InstanceBalance, InstanceKind, InstanceRef, PaymentError, PaymentMethod, PaymentService,
    PaymentStatus,
};
use tadika_shared::OverpaymentPolicy;
use tracing::info;
use uuid::Uuid;

use crate::entities::{
    book_instances, misc_fees, monthly_fee_instances, payments, sea_orm_active_enums,
};

/// Error types for payment operations.
#[derive(Debug, thiserror::Error)]
pub enum PaymentRepoError {
    /// The referenced instance does not exist.
    #[error("Billing instance not found: {0}")]
    InstanceNotFound(InstanceRef),

    /// Payment rule violation.
    #[error(transparent)]
    Rule(#[from] PaymentError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for logging a payment.
#[derive(Debug, Clone)]
pub struct LogPaymentInput {
    /// Instance being paid.
    pub instance: InstanceRef,
    /// Amount offered.
    pub amount: Decimal,
    /// Payment method.
    pub method: PaymentMethod,
    /// Free-text note (receipt number, payer, ...).
    pub note: Option<String>,
    /// When the money was received; defaults to now.
    pub paid_at: Option<DateTime<Utc>>,
}

/// Result of a logged payment.
#[derive(Debug, Clone)]
pub struct PaymentReceipt {
    /// Stored payment.
    pub payment: payments::Model,
    /// Enrollment the instance belongs to.
    pub enrollment_id: Uuid,
    /// Instance balance after the payment.
    pub balance: InstanceBalance,
    /// Instance status after the payment.
    pub status: PaymentStatus,
}

/// A billable instance locked for update.
struct LockedInstance {
    enrollment_id: Uuid,
    amount_due: Decimal,
}

/// Access to one table of billable instances.
#[async_trait]
trait InstanceStore: Send + Sync {
    /// Payment column that references this table.
    fn payment_column(&self) -> payments::Column;

    /// Loads the instance, locking the row where the backend supports it.
    async fn lock(
        &self,
        txn: &DatabaseTransaction,
        id: Uuid,
    ) -> Result<Option<LockedInstance>, DbErr>;

    /// Persists a recomputed status.
    async fn set_status(
        &self,
        txn: &DatabaseTransaction,
        id: Uuid,
        status: sea_orm_active_enums::PaymentStatus,
    ) -> Result<(), DbErr>;
}

struct MonthlyFeeStore;
struct MiscFeeStore;
struct BookStore;

#[async_trait]
impl InstanceStore for MonthlyFeeStore {
    fn payment_column(&self) -> payments::Column {
        payments::Column::MonthlyFeeInstanceId
    }

    async fn lock(
        &self,
        txn: &DatabaseTransaction,
        id: Uuid,
    ) -> Result<Option<LockedInstance>, DbErr> {
        Ok(monthly_fee_instances::Entity::find_by_id(id)
            .lock_exclusive()
            .one(txn)
            .await?
            .map(|row| LockedInstance {
                enrollment_id: row.enrollment_id,
                amount_due: row.amount_due,
            }))
    }

    async fn set_status(
        &self,
        txn: &DatabaseTransaction,
        id: Uuid,
        status: sea_orm_active_enums::PaymentStatus,
    ) -> Result<(), DbErr> {
        monthly_fee_instances::Entity::update_many()
            .col_expr(monthly_fee_instances::Column::Status, Expr::value(status))
            .filter(monthly_fee_instances::Column::Id.eq(id))
            .exec(txn)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl InstanceStore for MiscFeeStore {
    fn payment_column(&self) -> payments::Column {
        payments::Column::MiscFeeId
    }

    async fn lock(
        &self,
        txn: &DatabaseTransaction,
        id: Uuid,
    ) -> Result<Option<LockedInstance>, DbErr> {
        Ok(misc_fees::Entity::find_by_id(id)
            .lock_exclusive()
            .one(txn)
            .await?
            .map(|row| LockedInstance {
                enrollment_id: row.enrollment_id,
                amount_due: row.amount_due,
            }))
    }

    async fn set_status(
        &self,
        txn: &DatabaseTransaction,
        id: Uuid,
        status: sea_orm_active_enums::PaymentStatus,
    ) -> Result<(), DbErr> {
        misc_fees::Entity::update_many()
            .col_expr(misc_fees::Column::Status, Expr::value(status))
            .filter(misc_fees::Column::Id.eq(id))
            .exec(txn)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl InstanceStore for BookStore {
    fn payment_column(&self) -> payments::Column {
        payments::Column::BookInstanceId
    }

    async fn lock(
        &self,
        txn: &DatabaseTransaction,
        id: Uuid,
    ) -> Result<Option<LockedInstance>, DbErr> {
        Ok(book_instances::Entity::find_by_id(id)
            .lock_exclusive()
            .one(txn)
            .await?
            .map(|row| LockedInstance {
                enrollment_id: row.enrollment_id,
                amount_due: row.amount_due,
            }))
    }

    async fn set_status(
        &self,
        txn: &DatabaseTransaction,
        id: Uuid,
        status: sea_orm_active_enums::PaymentStatus,
    ) -> Result<(), DbErr> {
        book_instances::Entity::update_many()
            .col_expr(book_instances::Column::Status, Expr::value(status))
            .filter(book_instances::Column::Id.eq(id))
            .exec(txn)
            .await?;
        Ok(())
    }
}

fn store_for(kind: InstanceKind) -> &'static dyn InstanceStore {
    match kind {
        InstanceKind::Monthly => &MonthlyFeeStore,
        InstanceKind::OneTime => &MiscFeeStore,
        InstanceKind::Book => &BookStore,
    }
}

/// Repository for the payment ledger.
#[derive(Debug, Clone)]
pub struct PaymentRepository {
    db: DatabaseConnection,
}

impl PaymentRepository {
    /// Creates a new payment repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Logs a payment and recomputes the instance status.
    ///
    /// The insert and the status update commit together.
    ///
    /// # Errors
    ///
    /// Returns `PaymentRepoError::InstanceNotFound` for an unknown instance
    /// and the `PaymentError` rules for amounts the instance cannot take.
    pub async fn log_payment(
        &self,
        input: LogPaymentInput,
        policy: OverpaymentPolicy,
    ) -> Result<PaymentReceipt, PaymentRepoError> {
        let store = store_for(input.instance.kind());
        let instance_id = input.instance.id();

        let txn = self.db.begin().await?;

        let instance = store
            .lock(&txn, instance_id)
            .await?
            .ok_or(PaymentRepoError::InstanceNotFound(input.instance))?;

        let already_paid = paid_total(&txn, store.payment_column(), instance_id).await?;
        let before = InstanceBalance::new(instance.amount_due, already_paid);
        let recorded = PaymentService::accept(&before, input.amount, policy)?;

        let mut payment = payments::ActiveModel {
            id: Set(Uuid::now_v7()),
            monthly_fee_instance_id: Set(None),
            misc_fee_id: Set(None),
            book_instance_id: Set(None),
            amount_paid: Set(recorded),
            method: Set(input.method.into()),
            note: Set(input.note),
            paid_at: Set(input.paid_at.unwrap_or_else(Utc::now).into()),
        };
        match input.instance {
            InstanceRef::Monthly(id) => payment.monthly_fee_instance_id = Set(Some(id.into_inner())),
            InstanceRef::OneTime(id) => payment.misc_fee_id = Set(Some(id.into_inner())),
            InstanceRef::Book(id) => payment.book_instance_id = Set(Some(id.into_inner())),
        }
        let payment = payment.insert(&txn).await?;

        let balance = InstanceBalance::new(instance.amount_due, already_paid + recorded);
        let status = balance.status();
        store.set_status(&txn, instance_id, status.into()).await?;

        txn.commit().await?;

        info!(
            payment_id = %payment.id,
            instance = %input.instance,
            amount = %recorded,
            status = ?status,
            "Payment logged"
        );

        Ok(PaymentReceipt {
            payment,
            enrollment_id: instance.enrollment_id,
            balance,
            status,
        })
    }

    /// Lists the payments of one instance, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_for_instance(
        &self,
        instance: InstanceRef,
    ) -> Result<Vec<payments::Model>, DbErr> {
        payments::Entity::find()
            .filter(store_for(instance.kind()).payment_column().eq(instance.id()))
            .order_by_asc(payments::Column::PaidAt)
            .all(&self.db)
            .await
    }
}

async fn paid_total(
    txn: &DatabaseTransaction,
    column: payments::Column,
    instance_id: Uuid,
) -> Result<Decimal, DbErr> {
    Ok(payments::Entity::find()
        .filter(column.eq(instance_id))
        .all(txn)
        .await?
        .iter()
        .map(|p| p.amount_paid)
        .sum())
}
