//! Enrollment repository: enrollments, package/class binding and fee overrides.

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    IntoActiveModel, PaginatorTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use tadika_core::fees::{EnrollmentFees, FeeAdjustment, FeePreviewEngine, PreviewOutcome};
use tadika_shared::types::{EnrollmentId, FeeItemId, is_storable_amount};
use tracing::info;
use uuid::Uuid;

use super::catalog::load_package;
use crate::entities::{
    academic_years, enrollment_fee_adjustments, enrollments, fee_items, fee_packages,
    school_classes, students,
};

/// Error types for enrollment operations.
#[derive(Debug, thiserror::Error)]
pub enum EnrollmentError {
    /// Enrollment not found.
    #[error("Enrollment not found: {0}")]
    NotFound(Uuid),

    /// Student not found.
    #[error("Student not found: {0}")]
    StudentNotFound(Uuid),

    /// Academic year not found.
    #[error("Academic year not found: {0}")]
    AcademicYearNotFound(Uuid),

    /// Class not found.
    #[error("Class not found: {0}")]
    ClassNotFound(Uuid),

    /// Fee package not found.
    #[error("Fee package not found: {0}")]
    FeePackageNotFound(Uuid),

    /// Fee item not found.
    #[error("Fee item not found: {0}")]
    FeeItemNotFound(Uuid),

    /// Adjustment not found.
    #[error("No adjustment for fee item {0} on this enrollment")]
    AdjustmentNotFound(Uuid),

    /// The student is already enrolled in the year.
    #[error("Student is already enrolled in this academic year")]
    AlreadyEnrolled,

    /// Inactive packages cannot be bound.
    #[error("Fee package {0} is inactive")]
    PackageInactive(Uuid),

    /// Package belongs to another academic year.
    #[error("Fee package belongs to a different academic year")]
    PackageYearMismatch,

    /// Class belongs to another academic year.
    #[error("Class belongs to a different academic year")]
    ClassYearMismatch,

    /// Class has no free seats.
    #[error("Class '{0}' is full")]
    ClassFull(String),

    /// Adjustment amount has more than two decimal places or is too large.
    #[error("Adjustment amount {0} must have at most 2 decimal places and not exceed 9999999999.99")]
    UnstorableAmount(Decimal),

    /// Override quantity must be at least 1.
    #[error("Quantity must be at least 1")]
    InvalidQuantity,

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating an enrollment.
#[derive(Debug, Clone)]
pub struct CreateEnrollmentInput {
    /// Student being enrolled.
    pub student_id: Uuid,
    /// Academic year.
    pub academic_year_id: Uuid,
    /// Level (e.g., "K1").
    pub level: String,
    /// Program type (e.g., "full_day").
    pub program_type: String,
    /// First enrollment at the school.
    pub is_new_student: bool,
    /// Optional class.
    pub class_id: Option<Uuid>,
    /// Optional fee package.
    pub fee_package_id: Option<Uuid>,
}

/// Input for creating or replacing a fee override.
#[derive(Debug, Clone)]
pub struct UpsertAdjustmentInput {
    /// Signed delta; negative is a discount.
    pub amount: Decimal,
    /// Replacement quantity.
    pub quantity: Option<u32>,
    /// Reason shown on the preview.
    pub reason: Option<String>,
}

/// Enrollment with its student's name.
#[derive(Debug, Clone)]
pub struct EnrollmentWithStudent {
    /// Enrollment row.
    pub enrollment: enrollments::Model,
    /// Student display name.
    pub student_name: String,
}

/// Repository for enrollments.
#[derive(Debug, Clone)]
pub struct EnrollmentRepository {
    db: DatabaseConnection,
}

impl EnrollmentRepository {
    /// Creates a new enrollment repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Enrolls a student in an academic year.
    ///
    /// # Errors
    ///
    /// Returns `EnrollmentError::AlreadyEnrolled` for a second enrollment in
    /// the same year, and the package or class errors of the bind operations.
    pub async fn create(
        &self,
        input: CreateEnrollmentInput,
    ) -> Result<enrollments::Model, EnrollmentError> {
        let txn = self.db.begin().await?;

        students::Entity::find_by_id(input.student_id)
            .one(&txn)
            .await?
            .ok_or(EnrollmentError::StudentNotFound(input.student_id))?;
        academic_years::Entity::find_by_id(input.academic_year_id)
            .one(&txn)
            .await?
            .ok_or(EnrollmentError::AcademicYearNotFound(input.academic_year_id))?;

        let enrolled = enrollments::Entity::find()
            .filter(enrollments::Column::StudentId.eq(input.student_id))
            .filter(enrollments::Column::AcademicYearId.eq(input.academic_year_id))
            .count(&txn)
            .await?;
        if enrolled > 0 {
            return Err(EnrollmentError::AlreadyEnrolled);
        }

        if let Some(package_id) = input.fee_package_id {
            check_package(&txn, package_id, input.academic_year_id).await?;
        }
        if let Some(class_id) = input.class_id {
            check_class(&txn, class_id, input.academic_year_id, None).await?;
        }

        let now = Utc::now().into();
        let enrollment = enrollments::ActiveModel {
            id: Set(Uuid::now_v7()),
            student_id: Set(input.student_id),
            academic_year_id: Set(input.academic_year_id),
            class_id: Set(input.class_id),
            fee_package_id: Set(input.fee_package_id),
            level: Set(input.level),
            program_type: Set(input.program_type),
            is_new_student: Set(input.is_new_student),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;

        info!(
            enrollment_id = %enrollment.id,
            student_id = %enrollment.student_id,
            academic_year_id = %enrollment.academic_year_id,
            "Student enrolled"
        );
        Ok(enrollment)
    }

    /// Finds an enrollment by ID.
    ///
    /// # Errors
    ///
    /// Returns `EnrollmentError::NotFound` if it does not exist.
    pub async fn get(&self, id: Uuid) -> Result<EnrollmentWithStudent, EnrollmentError> {
        let (enrollment, student) = enrollments::Entity::find_by_id(id)
            .find_also_related(students::Entity)
            .one(&self.db)
            .await?
            .ok_or(EnrollmentError::NotFound(id))?;

        Ok(EnrollmentWithStudent {
            enrollment,
            student_name: student.map(|s| s.full_name).unwrap_or_default(),
        })
    }

    /// Lists the enrollments of an academic year by student name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_by_year(
        &self,
        academic_year_id: Uuid,
    ) -> Result<Vec<EnrollmentWithStudent>, DbErr> {
        list_with_students(&self.db, academic_year_id).await
    }

    /// Binds or replaces the fee package of an enrollment.
    ///
    /// Instances already generated keep their amounts.
    ///
    /// # Errors
    ///
    /// Returns `EnrollmentError::PackageInactive` or
    /// `EnrollmentError::PackageYearMismatch` when the package cannot be used.
    pub async fn assign_fee_package(
        &self,
        id: Uuid,
        fee_package_id: Uuid,
    ) -> Result<enrollments::Model, EnrollmentError> {
        let txn = self.db.begin().await?;

        let enrollment = find_enrollment(&txn, id).await?;
        check_package(&txn, fee_package_id, enrollment.academic_year_id).await?;

        let mut active = enrollment.into_active_model();
        active.fee_package_id = Set(Some(fee_package_id));
        active.updated_at = Set(Utc::now().into());
        let enrollment = active.update(&txn).await?;

        txn.commit().await?;

        info!(enrollment_id = %id, fee_package_id = %fee_package_id, "Fee package bound");
        Ok(enrollment)
    }

    /// Places an enrollment in a class.
    ///
    /// # Errors
    ///
    /// Returns `EnrollmentError::ClassYearMismatch` or
    /// `EnrollmentError::ClassFull` when the class cannot take the student.
    pub async fn assign_class(
        &self,
        id: Uuid,
        class_id: Uuid,
    ) -> Result<enrollments::Model, EnrollmentError> {
        let txn = self.db.begin().await?;

        let enrollment = find_enrollment(&txn, id).await?;
        check_class(&txn, class_id, enrollment.academic_year_id, Some(id)).await?;

        let mut active = enrollment.into_active_model();
        active.class_id = Set(Some(class_id));
        active.updated_at = Set(Utc::now().into());
        let enrollment = active.update(&txn).await?;

        txn.commit().await?;

        info!(enrollment_id = %id, class_id = %class_id, "Class assigned");
        Ok(enrollment)
    }

    /// Creates or replaces the override of one fee item.
    ///
    /// # Errors
    ///
    /// Returns `EnrollmentError::InvalidQuantity` for a zero quantity,
    /// `EnrollmentError::UnstorableAmount` for an amount a money column cannot
    /// hold, and not-found errors for unknown enrollments or fee items.
    pub async fn upsert_adjustment(
        &self,
        id: Uuid,
        fee_item_id: Uuid,
        input: UpsertAdjustmentInput,
    ) -> Result<enrollment_fee_adjustments::Model, EnrollmentError> {
        if input.quantity == Some(0) {
            return Err(EnrollmentError::InvalidQuantity);
        }
        if !is_storable_amount(input.amount) {
            return Err(EnrollmentError::UnstorableAmount(input.amount));
        }

        let txn = self.db.begin().await?;

        find_enrollment(&txn, id).await?;
        fee_items::Entity::find_by_id(fee_item_id)
            .one(&txn)
            .await?
            .ok_or(EnrollmentError::FeeItemNotFound(fee_item_id))?;

        let quantity = input.quantity.map(|q| i32::try_from(q).unwrap_or(i32::MAX));
        let now = Utc::now().into();

        let existing = enrollment_fee_adjustments::Entity::find()
            .filter(enrollment_fee_adjustments::Column::EnrollmentId.eq(id))
            .filter(enrollment_fee_adjustments::Column::FeeItemId.eq(fee_item_id))
            .one(&txn)
            .await?;

        let adjustment = match existing {
            Some(existing) => {
                let mut active = existing.into_active_model();
                active.amount = Set(input.amount);
                active.quantity = Set(quantity);
                active.reason = Set(input.reason);
                active.updated_at = Set(now);
                active.update(&txn).await?
            }
            None => {
                enrollment_fee_adjustments::ActiveModel {
                    id: Set(Uuid::now_v7()),
                    enrollment_id: Set(id),
                    fee_item_id: Set(fee_item_id),
                    amount: Set(input.amount),
                    quantity: Set(quantity),
                    reason: Set(input.reason),
                    created_at: Set(now),
                    updated_at: Set(now),
                }
                .insert(&txn)
                .await?
            }
        };

        txn.commit().await?;

        info!(
            enrollment_id = %id,
            fee_item_id = %fee_item_id,
            amount = %adjustment.amount,
            "Fee adjustment saved"
        );
        Ok(adjustment)
    }

    /// Removes the override of one fee item.
    ///
    /// # Errors
    ///
    /// Returns `EnrollmentError::AdjustmentNotFound` if there is none.
    pub async fn remove_adjustment(&self, id: Uuid, fee_item_id: Uuid) -> Result<(), EnrollmentError> {
        let result = enrollment_fee_adjustments::Entity::delete_many()
            .filter(enrollment_fee_adjustments::Column::EnrollmentId.eq(id))
            .filter(enrollment_fee_adjustments::Column::FeeItemId.eq(fee_item_id))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(EnrollmentError::AdjustmentNotFound(fee_item_id));
        }

        info!(enrollment_id = %id, fee_item_id = %fee_item_id, "Fee adjustment removed");
        Ok(())
    }

    /// Computes the fee preview of an enrollment.
    ///
    /// # Errors
    ///
    /// Returns `EnrollmentError::NotFound` for an unknown enrollment.
    pub async fn preview(&self, id: Uuid) -> Result<PreviewOutcome, EnrollmentError> {
        let enrollment = find_enrollment(&self.db, id).await?;
        let fees = load_enrollment_fees(&self.db, &enrollment).await?;
        Ok(FeePreviewEngine::preview(&fees))
    }
}

pub(crate) async fn find_enrollment<C: ConnectionTrait>(
    conn: &C,
    id: Uuid,
) -> Result<enrollments::Model, EnrollmentError> {
    enrollments::Entity::find_by_id(id)
        .one(conn)
        .await?
        .ok_or(EnrollmentError::NotFound(id))
}

/// Gathers what the preview engine needs for one enrollment.
pub(crate) async fn load_enrollment_fees<C: ConnectionTrait>(
    conn: &C,
    enrollment: &enrollments::Model,
) -> Result<EnrollmentFees, DbErr> {
    let package = match enrollment.fee_package_id {
        Some(package_id) => load_package(conn, package_id).await?,
        None => None,
    };

    let adjustments = enrollment_fee_adjustments::Entity::find()
        .filter(enrollment_fee_adjustments::Column::EnrollmentId.eq(enrollment.id))
        .all(conn)
        .await?
        .into_iter()
        .map(|a| FeeAdjustment {
            fee_item_id: FeeItemId::from_uuid(a.fee_item_id),
            amount: a.amount,
            quantity: a.quantity.and_then(|q| u32::try_from(q).ok()),
            reason: a.reason,
        })
        .collect();

    Ok(EnrollmentFees {
        enrollment_id: EnrollmentId::from_uuid(enrollment.id),
        is_new_student: enrollment.is_new_student,
        package,
        adjustments,
    })
}

pub(crate) async fn list_with_students<C: ConnectionTrait>(
    conn: &C,
    academic_year_id: Uuid,
) -> Result<Vec<EnrollmentWithStudent>, DbErr> {
    let rows = enrollments::Entity::find()
        .filter(enrollments::Column::AcademicYearId.eq(academic_year_id))
        .find_also_related(students::Entity)
        .order_by_asc(students::Column::FullName)
        .all(conn)
        .await?;

    Ok(rows
        .into_iter()
        .map(|(enrollment, student)| EnrollmentWithStudent {
            enrollment,
            student_name: student.map(|s| s.full_name).unwrap_or_default(),
        })
        .collect())
}

async fn check_package<C: ConnectionTrait>(
    conn: &C,
    package_id: Uuid,
    academic_year_id: Uuid,
) -> Result<(), EnrollmentError> {
    let package = fee_packages::Entity::find_by_id(package_id)
        .one(conn)
        .await?
        .ok_or(EnrollmentError::FeePackageNotFound(package_id))?;

    if !package.is_active {
        return Err(EnrollmentError::PackageInactive(package_id));
    }
    if package.academic_year_id != academic_year_id {
        return Err(EnrollmentError::PackageYearMismatch);
    }
    Ok(())
}

async fn check_class<C: ConnectionTrait>(
    conn: &C,
    class_id: Uuid,
    academic_year_id: Uuid,
    moving: Option<Uuid>,
) -> Result<(), EnrollmentError> {
    let class = school_classes::Entity::find_by_id(class_id)
        .one(conn)
        .await?
        .ok_or(EnrollmentError::ClassNotFound(class_id))?;

    if class.academic_year_id != academic_year_id {
        return Err(EnrollmentError::ClassYearMismatch);
    }

    let mut seated = enrollments::Entity::find().filter(enrollments::Column::ClassId.eq(class_id));
    if let Some(id) = moving {
        seated = seated.filter(enrollments::Column::Id.ne(id));
    }
    let seated = seated.count(conn).await?;

    if seated >= u64::try_from(class.capacity).unwrap_or_default() {
        return Err(EnrollmentError::ClassFull(class.name));
    }
    Ok(())
}
