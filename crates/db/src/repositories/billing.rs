//! Billing repository: instance generation, book charges, statements and
//! the payment dashboard.

use std::collections::HashMap;

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, Set, SqlErr, TransactionTrait,
};
use serde::Serialize;
use tadika_core::billing::{BillingError, BillingPlan, BillingService, ExistingInstances};
use tadika_core::dashboard::{BalanceSummary, DashboardService, EnrollmentBalance, PaymentDashboard};
use tadika_core::fees::FeePreviewEngine;
use tadika_core::payments::{InstanceBalance, InstanceRef, PaymentStatus};
use tadika_shared::types::{
    AcademicYearId, BookInstanceId, EnrollmentId, FeeItemId, MiscFeeId, MonthlyFeeInstanceId,
    is_storable_amount,
};
use tracing::{debug, info};
use uuid::Uuid;

use super::enrollment::{list_with_students, load_enrollment_fees};
use crate::entities::{book_instances, enrollments, misc_fees, monthly_fee_instances, payments};

/// Error types for billing operations.
#[derive(Debug, thiserror::Error)]
pub enum BillingRepoError {
    /// Enrollment not found.
    #[error("Enrollment not found: {0}")]
    EnrollmentNotFound(Uuid),

    /// Another request generated the same rows first.
    #[error("Bills for this enrollment were generated concurrently, please retry")]
    ConcurrentGeneration,

    /// Book charges cannot be negative.
    #[error("Book amount cannot be negative")]
    NegativeAmount,

    /// Book amount has more than two decimal places or is too large.
    #[error("Book amount {0} must have at most 2 decimal places and not exceed 9999999999.99")]
    UnstorableAmount(Decimal),

    /// Billing rule violation.
    #[error(transparent)]
    Rule(#[from] BillingError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Rows created by one generation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GenerationSummary {
    /// Enrollment billed.
    pub enrollment_id: Uuid,
    /// One-time fees inserted.
    pub misc_fees_created: usize,
    /// Monthly instances inserted.
    pub monthly_fees_created: usize,
}

/// One billable instance on a statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatementLine {
    /// Instance reference, usable for logging payments.
    pub instance: InstanceRef,
    /// Fee name or book title.
    pub name: String,
    /// Month number for monthly fees.
    pub month: Option<u32>,
    /// Amount billed.
    pub amount_due: Decimal,
    /// Sum of payments.
    pub amount_paid: Decimal,
    /// Remaining amount.
    pub outstanding: Decimal,
    /// Payment status.
    pub status: PaymentStatus,
}

/// Every generated instance of an enrollment with its balance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BillingStatement {
    /// Enrollment billed.
    pub enrollment_id: Uuid,
    /// One-time fees.
    pub one_time_fees: Vec<StatementLine>,
    /// Monthly fees ordered by fee and month.
    pub monthly_fees: Vec<StatementLine>,
    /// Book charges.
    pub books: Vec<StatementLine>,
    /// Enrollment totals and overall status.
    pub summary: BalanceSummary,
}

/// Repository for generated bills.
#[derive(Debug, Clone)]
pub struct BillingRepository {
    db: DatabaseConnection,
}

impl BillingRepository {
    /// Creates a new billing repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Generates the missing billing instances of an enrollment.
    ///
    /// Existing rows are left untouched, so a second run creates nothing.
    ///
    /// # Errors
    ///
    /// Returns `BillingError::FeePackageRequired` when no package is bound,
    /// and `BillingRepoError::ConcurrentGeneration` when a parallel run won
    /// the race on the unique indexes.
    pub async fn generate(
        &self,
        enrollment_id: Uuid,
        academic_months: u32,
    ) -> Result<GenerationSummary, BillingRepoError> {
        let txn = self.db.begin().await?;

        let enrollment = enrollments::Entity::find_by_id(enrollment_id)
            .one(&txn)
            .await?
            .ok_or(BillingRepoError::EnrollmentNotFound(enrollment_id))?;

        let fees = load_enrollment_fees(&txn, &enrollment).await?;
        let outcome = FeePreviewEngine::preview(&fees);

        let existing = load_existing(&txn, enrollment_id).await?;
        let plan = BillingService::plan(&outcome, &existing, academic_months)?;

        let summary = GenerationSummary {
            enrollment_id,
            misc_fees_created: plan.misc_fees.len(),
            monthly_fees_created: plan.monthly_fees.len(),
        };

        if plan.is_empty() {
            debug!(enrollment_id = %enrollment_id, "Bills already generated");
            return Ok(summary);
        }

        if let Err(err) = insert_plan(&txn, enrollment_id, &plan).await {
            txn.rollback().await?;
            return Err(err);
        }

        txn.commit().await.map_err(insert_error)?;

        info!(
            enrollment_id = %enrollment_id,
            misc_fees = summary.misc_fees_created,
            monthly_fees = summary.monthly_fees_created,
            "Bills generated"
        );
        Ok(summary)
    }

    /// Adds a book charge to an enrollment.
    ///
    /// # Errors
    ///
    /// Returns `BillingRepoError::NegativeAmount` for a negative amount,
    /// `BillingRepoError::UnstorableAmount` for a sub-sen or oversized amount
    /// and `BillingRepoError::EnrollmentNotFound` for an unknown enrollment.
    pub async fn add_book(
        &self,
        enrollment_id: Uuid,
        title: String,
        amount: Decimal,
    ) -> Result<book_instances::Model, BillingRepoError> {
        if amount < Decimal::ZERO {
            return Err(BillingRepoError::NegativeAmount);
        }
        if !is_storable_amount(amount) {
            return Err(BillingRepoError::UnstorableAmount(amount));
        }

        enrollments::Entity::find_by_id(enrollment_id)
            .one(&self.db)
            .await?
            .ok_or(BillingRepoError::EnrollmentNotFound(enrollment_id))?;

        let book = book_instances::ActiveModel {
            id: Set(Uuid::now_v7()),
            enrollment_id: Set(enrollment_id),
            title: Set(title),
            amount_due: Set(amount),
            status: Set(PaymentStatus::initial(amount).into()),
            created_at: Set(Utc::now().into()),
        }
        .insert(&self.db)
        .await?;

        info!(enrollment_id = %enrollment_id, book_instance_id = %book.id, "Book charge added");
        Ok(book)
    }

    /// Builds the billing statement of an enrollment.
    ///
    /// # Errors
    ///
    /// Returns `BillingRepoError::EnrollmentNotFound` for an unknown enrollment.
    pub async fn statement(&self, enrollment_id: Uuid) -> Result<BillingStatement, BillingRepoError> {
        enrollments::Entity::find_by_id(enrollment_id)
            .one(&self.db)
            .await?
            .ok_or(BillingRepoError::EnrollmentNotFound(enrollment_id))?;

        let bills = load_bills(&self.db, vec![enrollment_id]).await?;

        let one_time_fees: Vec<StatementLine> = bills
            .misc
            .iter()
            .map(|fee| {
                line(
                    InstanceRef::OneTime(MiscFeeId::from_uuid(fee.id)),
                    fee.name.clone(),
                    None,
                    fee.amount_due,
                    bills.paid(fee.id),
                    fee.status.into(),
                )
            })
            .collect();

        let monthly_fees: Vec<StatementLine> = bills
            .monthly
            .iter()
            .map(|fee| {
                line(
                    InstanceRef::Monthly(MonthlyFeeInstanceId::from_uuid(fee.id)),
                    fee.name.clone(),
                    u32::try_from(fee.month).ok(),
                    fee.amount_due,
                    bills.paid(fee.id),
                    fee.status.into(),
                )
            })
            .collect();

        let books: Vec<StatementLine> = bills
            .books
            .iter()
            .map(|book| {
                line(
                    InstanceRef::Book(BookInstanceId::from_uuid(book.id)),
                    book.title.clone(),
                    None,
                    book.amount_due,
                    bills.paid(book.id),
                    book.status.into(),
                )
            })
            .collect();

        let balances: Vec<InstanceBalance> = one_time_fees
            .iter()
            .chain(&monthly_fees)
            .chain(&books)
            .map(|l| InstanceBalance::new(l.amount_due, l.amount_paid))
            .collect();

        Ok(BillingStatement {
            enrollment_id,
            one_time_fees,
            monthly_fees,
            books,
            summary: DashboardService::summarize(&balances),
        })
    }

    /// Builds the payment dashboard of an academic year.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn dashboard(&self, academic_year_id: Uuid) -> Result<PaymentDashboard, DbErr> {
        let enrolled = list_with_students(&self.db, academic_year_id).await?;
        let ids: Vec<Uuid> = enrolled.iter().map(|e| e.enrollment.id).collect();
        let bills = load_bills(&self.db, ids).await?;

        let mut balances: HashMap<Uuid, Vec<InstanceBalance>> = HashMap::new();
        for fee in &bills.misc {
            balances
                .entry(fee.enrollment_id)
                .or_default()
                .push(InstanceBalance::new(fee.amount_due, bills.paid(fee.id)));
        }
        for fee in &bills.monthly {
            balances
                .entry(fee.enrollment_id)
                .or_default()
                .push(InstanceBalance::new(fee.amount_due, bills.paid(fee.id)));
        }
        for book in &bills.books {
            balances
                .entry(book.enrollment_id)
                .or_default()
                .push(InstanceBalance::new(book.amount_due, bills.paid(book.id)));
        }

        let rows = enrolled
            .into_iter()
            .map(|row| {
                let instances = balances.remove(&row.enrollment.id).unwrap_or_default();
                EnrollmentBalance {
                    enrollment_id: EnrollmentId::from_uuid(row.enrollment.id),
                    student_name: row.student_name,
                    level: row.enrollment.level,
                    summary: DashboardService::summarize(&instances),
                }
            })
            .collect();

        debug!(academic_year_id = %academic_year_id, "Payment dashboard computed");
        Ok(DashboardService::build(
            AcademicYearId::from_uuid(academic_year_id),
            rows,
        ))
    }
}

/// Inserts every row of a plan; the caller owns the transaction.
async fn insert_plan<C: ConnectionTrait>(
    conn: &C,
    enrollment_id: Uuid,
    plan: &BillingPlan,
) -> Result<(), BillingRepoError> {
    let now: chrono::DateTime<chrono::FixedOffset> = Utc::now().into();

    if !plan.misc_fees.is_empty() {
        let rows = plan.misc_fees.iter().map(|fee| misc_fees::ActiveModel {
            id: Set(Uuid::now_v7()),
            enrollment_id: Set(enrollment_id),
            fee_item_id: Set(Some(fee.fee_item_id.into_inner())),
            name: Set(fee.name.clone()),
            amount_due: Set(fee.amount_due),
            status: Set(fee.status.into()),
            created_at: Set(now),
        });
        misc_fees::Entity::insert_many(rows)
            .exec_without_returning(conn)
            .await
            .map_err(insert_error)?;
    }

    if !plan.monthly_fees.is_empty() {
        let rows = plan
            .monthly_fees
            .iter()
            .map(|fee| monthly_fee_instances::ActiveModel {
                id: Set(Uuid::now_v7()),
                enrollment_id: Set(enrollment_id),
                fee_item_id: Set(fee.fee_item_id.into_inner()),
                name: Set(fee.name.clone()),
                month: Set(i32::try_from(fee.month).unwrap_or(i32::MAX)),
                amount_due: Set(fee.amount_due),
                status: Set(fee.status.into()),
                created_at: Set(now),
            });
        monthly_fee_instances::Entity::insert_many(rows)
            .exec_without_returning(conn)
            .await
            .map_err(insert_error)?;
    }

    Ok(())
}

/// Generated rows of a set of enrollments with their payment totals.
struct Bills {
    misc: Vec<misc_fees::Model>,
    monthly: Vec<monthly_fee_instances::Model>,
    books: Vec<book_instances::Model>,
    paid: HashMap<Uuid, Decimal>,
}

impl Bills {
    fn paid(&self, instance_id: Uuid) -> Decimal {
        self.paid.get(&instance_id).copied().unwrap_or(Decimal::ZERO)
    }
}

async fn load_bills<C: ConnectionTrait>(conn: &C, enrollment_ids: Vec<Uuid>) -> Result<Bills, DbErr> {
    if enrollment_ids.is_empty() {
        return Ok(Bills {
            misc: Vec::new(),
            monthly: Vec::new(),
            books: Vec::new(),
            paid: HashMap::new(),
        });
    }

    let misc = misc_fees::Entity::find()
        .filter(misc_fees::Column::EnrollmentId.is_in(enrollment_ids.clone()))
        .order_by_asc(misc_fees::Column::CreatedAt)
        .order_by_asc(misc_fees::Column::Name)
        .all(conn)
        .await?;
    let monthly = monthly_fee_instances::Entity::find()
        .filter(monthly_fee_instances::Column::EnrollmentId.is_in(enrollment_ids.clone()))
        .order_by_asc(monthly_fee_instances::Column::Name)
        .order_by_asc(monthly_fee_instances::Column::Month)
        .all(conn)
        .await?;
    let books = book_instances::Entity::find()
        .filter(book_instances::Column::EnrollmentId.is_in(enrollment_ids))
        .order_by_asc(book_instances::Column::CreatedAt)
        .all(conn)
        .await?;

    let mut paid = HashMap::new();
    sum_payments(
        conn,
        payments::Column::MiscFeeId,
        misc.iter().map(|m| m.id).collect(),
        &mut paid,
    )
    .await?;
    sum_payments(
        conn,
        payments::Column::MonthlyFeeInstanceId,
        monthly.iter().map(|m| m.id).collect(),
        &mut paid,
    )
    .await?;
    sum_payments(
        conn,
        payments::Column::BookInstanceId,
        books.iter().map(|b| b.id).collect(),
        &mut paid,
    )
    .await?;

    Ok(Bills {
        misc,
        monthly,
        books,
        paid,
    })
}

/// Adds the payments recorded against `ids` into `totals`, keyed by instance.
async fn sum_payments<C: ConnectionTrait>(
    conn: &C,
    column: payments::Column,
    ids: Vec<Uuid>,
    totals: &mut HashMap<Uuid, Decimal>,
) -> Result<(), DbErr> {
    if ids.is_empty() {
        return Ok(());
    }

    let rows = payments::Entity::find()
        .filter(column.is_in(ids))
        .all(conn)
        .await?;

    for payment in rows {
        let instance_id = match column {
            payments::Column::MiscFeeId => payment.misc_fee_id,
            payments::Column::MonthlyFeeInstanceId => payment.monthly_fee_instance_id,
            _ => payment.book_instance_id,
        };
        if let Some(id) = instance_id {
            *totals.entry(id).or_insert(Decimal::ZERO) += payment.amount_paid;
        }
    }
    Ok(())
}

async fn load_existing<C: ConnectionTrait>(
    conn: &C,
    enrollment_id: Uuid,
) -> Result<ExistingInstances, DbErr> {
    let misc_fee_names = misc_fees::Entity::find()
        .filter(misc_fees::Column::EnrollmentId.eq(enrollment_id))
        .all(conn)
        .await?
        .into_iter()
        .map(|fee| fee.name)
        .collect();

    let monthly = monthly_fee_instances::Entity::find()
        .filter(monthly_fee_instances::Column::EnrollmentId.eq(enrollment_id))
        .all(conn)
        .await?
        .into_iter()
        .filter_map(|fee| {
            u32::try_from(fee.month)
                .ok()
                .map(|month| (FeeItemId::from_uuid(fee.fee_item_id), month))
        })
        .collect();

    Ok(ExistingInstances {
        misc_fee_names,
        monthly,
    })
}

fn line(
    instance: InstanceRef,
    name: String,
    month: Option<u32>,
    amount_due: Decimal,
    amount_paid: Decimal,
    status: PaymentStatus,
) -> StatementLine {
    StatementLine {
        instance,
        name,
        month,
        amount_due,
        amount_paid,
        outstanding: InstanceBalance::new(amount_due, amount_paid).outstanding(),
        status,
    }
}

fn insert_error(err: DbErr) -> BillingRepoError {
    if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
        BillingRepoError::ConcurrentGeneration
    } else {
        BillingRepoError::Database(err)
    }
}
