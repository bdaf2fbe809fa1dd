//! Fee catalog repository: fee items and fee packages.

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    IntoActiveModel, PaginatorTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use tadika_core::catalog::{
    BillingPeriod, CatalogError, CatalogService, ChargeType, CollectionRule, FeeItem, FeePackage,
    FeePackageItem, NewPackageLine,
};
use tadika_shared::types::{AcademicYearId, FeeItemId, FeePackageId};
use tracing::info;
use uuid::Uuid;

use crate::entities::{
    academic_years, enrollment_fee_adjustments, fee_items, fee_package_items, fee_packages,
    monthly_fee_instances,
};

/// Error types for fee catalog operations.
#[derive(Debug, thiserror::Error)]
pub enum CatalogRepoError {
    /// Fee item not found.
    #[error("Fee item not found: {0}")]
    FeeItemNotFound(Uuid),

    /// Fee package not found.
    #[error("Fee package not found: {0}")]
    FeePackageNotFound(Uuid),

    /// Academic year not found.
    #[error("Academic year not found: {0}")]
    AcademicYearNotFound(Uuid),

    /// Fee item code already used.
    #[error("Fee item code '{0}' already exists")]
    DuplicateCode(String),

    /// A package already covers this level, program, period and year.
    #[error("A fee package for {level} / {program_type} already exists for this period and year")]
    DuplicatePackage {
        /// Level.
        level: String,
        /// Program type.
        program_type: String,
    },

    /// The fee item is still referenced and can only be deactivated.
    #[error("Fee item {0} is in use; deactivate it instead")]
    FeeItemInUse(Uuid),

    /// Catalog rule violation.
    #[error(transparent)]
    Rule(#[from] CatalogError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating a fee item.
#[derive(Debug, Clone)]
pub struct CreateFeeItemInput {
    /// Display name.
    pub name: String,
    /// Unique short code.
    pub code: String,
    /// Default price.
    pub default_amount: Decimal,
    /// One-time or monthly.
    pub charge_type: ChargeType,
    /// Waived for returning students.
    pub is_waivable_for_returning_students: bool,
}

/// Input for updating a fee item. `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateFeeItemInput {
    /// New name.
    pub name: Option<String>,
    /// New default price.
    pub default_amount: Option<Decimal>,
    /// New waiver flag.
    pub is_waivable_for_returning_students: Option<bool>,
    /// Activate or deactivate.
    pub is_active: Option<bool>,
}

/// Input for creating a fee package.
#[derive(Debug, Clone)]
pub struct CreateFeePackageInput {
    /// Package name.
    pub name: String,
    /// Level.
    pub level: String,
    /// Program type.
    pub program_type: String,
    /// Billing period.
    pub billing_period: BillingPeriod,
    /// Academic year.
    pub academic_year_id: Uuid,
    /// Months of monthly fees collected upfront.
    pub upfront_months: Option<u32>,
    /// Items in display order.
    pub lines: Vec<NewPackageLine>,
}

/// Repository for the fee catalog.
#[derive(Debug, Clone)]
pub struct CatalogRepository {
    db: DatabaseConnection,
}

impl CatalogRepository {
    /// Creates a new catalog repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a fee item.
    ///
    /// # Errors
    ///
    /// Returns a rule violation for invalid fields and
    /// `CatalogRepoError::DuplicateCode` if the code is taken.
    pub async fn create_fee_item(
        &self,
        input: CreateFeeItemInput,
    ) -> Result<FeeItem, CatalogRepoError> {
        CatalogService::validate_fee_item(&input.name, &input.code, input.default_amount)?;

        let txn = self.db.begin().await?;

        let taken = fee_items::Entity::find()
            .filter(fee_items::Column::Code.eq(&input.code))
            .count(&txn)
            .await?;
        if taken > 0 {
            return Err(CatalogRepoError::DuplicateCode(input.code));
        }

        let now = Utc::now().into();
        let item = fee_items::ActiveModel {
            id: Set(Uuid::now_v7()),
            name: Set(input.name),
            code: Set(input.code),
            default_amount: Set(input.default_amount),
            charge_type: Set(input.charge_type.into()),
            is_waivable_for_returning_students: Set(input.is_waivable_for_returning_students),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;

        info!(fee_item_id = %item.id, code = %item.code, "Fee item created");
        Ok(to_fee_item(item))
    }

    /// Updates a fee item.
    ///
    /// # Errors
    ///
    /// Returns `CatalogRepoError::FeeItemNotFound` or a rule violation.
    pub async fn update_fee_item(
        &self,
        id: Uuid,
        input: UpdateFeeItemInput,
    ) -> Result<FeeItem, CatalogRepoError> {
        let existing = fee_items::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(CatalogRepoError::FeeItemNotFound(id))?;

        let name = input.name.unwrap_or_else(|| existing.name.clone());
        let amount = input.default_amount.unwrap_or(existing.default_amount);
        CatalogService::validate_fee_item(&name, &existing.code, amount)?;

        let mut active = existing.into_active_model();
        active.name = Set(name);
        active.default_amount = Set(amount);
        if let Some(waivable) = input.is_waivable_for_returning_students {
            active.is_waivable_for_returning_students = Set(waivable);
        }
        if let Some(is_active) = input.is_active {
            active.is_active = Set(is_active);
        }
        active.updated_at = Set(Utc::now().into());

        let item = active.update(&self.db).await?;
        info!(fee_item_id = %item.id, "Fee item updated");
        Ok(to_fee_item(item))
    }

    /// Lists fee items by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_fee_items(&self, active_only: bool) -> Result<Vec<FeeItem>, DbErr> {
        let mut query = fee_items::Entity::find().order_by_asc(fee_items::Column::Name);
        if active_only {
            query = query.filter(fee_items::Column::IsActive.eq(true));
        }

        Ok(query.all(&self.db).await?.into_iter().map(to_fee_item).collect())
    }

    /// Deletes a fee item that nothing references.
    ///
    /// # Errors
    ///
    /// Returns `CatalogRepoError::FeeItemInUse` while any package, adjustment
    /// or generated monthly fee points at the item.
    pub async fn delete_fee_item(&self, id: Uuid) -> Result<(), CatalogRepoError> {
        let txn = self.db.begin().await?;

        fee_items::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or(CatalogRepoError::FeeItemNotFound(id))?;

        let in_packages = fee_package_items::Entity::find()
            .filter(fee_package_items::Column::FeeItemId.eq(id))
            .count(&txn)
            .await?;
        let in_adjustments = enrollment_fee_adjustments::Entity::find()
            .filter(enrollment_fee_adjustments::Column::FeeItemId.eq(id))
            .count(&txn)
            .await?;
        let in_bills = monthly_fee_instances::Entity::find()
            .filter(monthly_fee_instances::Column::FeeItemId.eq(id))
            .count(&txn)
            .await?;
        if in_packages + in_adjustments + in_bills > 0 {
            return Err(CatalogRepoError::FeeItemInUse(id));
        }

        fee_items::Entity::delete_by_id(id).exec(&txn).await?;
        txn.commit().await?;

        info!(fee_item_id = %id, "Fee item deleted");
        Ok(())
    }

    /// Creates a fee package with its items.
    ///
    /// # Errors
    ///
    /// Returns a rule violation for invalid lines, unknown or inactive fee
    /// items, and `CatalogRepoError::DuplicatePackage` when the offering exists.
    pub async fn create_package(
        &self,
        input: CreateFeePackageInput,
        academic_months: u32,
    ) -> Result<FeePackage, CatalogRepoError> {
        CatalogService::validate_package(
            &input.name,
            &input.lines,
            input.upfront_months,
            academic_months,
        )?;

        let txn = self.db.begin().await?;

        academic_years::Entity::find_by_id(input.academic_year_id)
            .one(&txn)
            .await?
            .ok_or(CatalogRepoError::AcademicYearNotFound(input.academic_year_id))?;

        for line in &input.lines {
            let item_id = line.fee_item_id.into_inner();
            let item = fee_items::Entity::find_by_id(item_id)
                .one(&txn)
                .await?
                .ok_or(CatalogRepoError::FeeItemNotFound(item_id))?;
            if !item.is_active {
                return Err(CatalogError::InactiveFeeItem(line.fee_item_id).into());
            }
        }

        let billing_period: crate::entities::sea_orm_active_enums::BillingPeriod =
            input.billing_period.into();
        let taken = fee_packages::Entity::find()
            .filter(fee_packages::Column::Level.eq(&input.level))
            .filter(fee_packages::Column::ProgramType.eq(&input.program_type))
            .filter(fee_packages::Column::BillingPeriod.eq(billing_period))
            .filter(fee_packages::Column::AcademicYearId.eq(input.academic_year_id))
            .count(&txn)
            .await?;
        if taken > 0 {
            return Err(CatalogRepoError::DuplicatePackage {
                level: input.level,
                program_type: input.program_type,
            });
        }

        let package_id = Uuid::now_v7();
        fee_packages::ActiveModel {
            id: Set(package_id),
            name: Set(input.name),
            level: Set(input.level),
            program_type: Set(input.program_type),
            billing_period: Set(billing_period),
            academic_year_id: Set(input.academic_year_id),
            is_active: Set(true),
            upfront_months: Set(input
                .upfront_months
                .map(|m| i32::try_from(m).unwrap_or(i32::MAX))),
            created_at: Set(Utc::now().into()),
        }
        .insert(&txn)
        .await?;

        for (position, line) in input.lines.iter().enumerate() {
            fee_package_items::ActiveModel {
                id: Set(Uuid::now_v7()),
                fee_package_id: Set(package_id),
                fee_item_id: Set(line.fee_item_id.into_inner()),
                position: Set(i32::try_from(position).unwrap_or(i32::MAX)),
                quantity: Set(i32::try_from(line.quantity).unwrap_or(i32::MAX)),
                unit_amount: Set(line.unit_amount),
            }
            .insert(&txn)
            .await?;
        }

        let package = load_package(&txn, package_id)
            .await?
            .ok_or(CatalogRepoError::FeePackageNotFound(package_id))?;

        txn.commit().await?;

        info!(
            fee_package_id = %package_id,
            items = package.items.len(),
            "Fee package created"
        );
        Ok(package)
    }

    /// Finds a package with its items.
    ///
    /// # Errors
    ///
    /// Returns `CatalogRepoError::FeePackageNotFound` if it does not exist.
    pub async fn get_package(&self, id: Uuid) -> Result<FeePackage, CatalogRepoError> {
        load_package(&self.db, id)
            .await?
            .ok_or(CatalogRepoError::FeePackageNotFound(id))
    }

    /// Lists the packages of an academic year with their items.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_packages(&self, academic_year_id: Uuid) -> Result<Vec<FeePackage>, DbErr> {
        let packages = fee_packages::Entity::find()
            .filter(fee_packages::Column::AcademicYearId.eq(academic_year_id))
            .order_by_asc(fee_packages::Column::Level)
            .order_by_asc(fee_packages::Column::ProgramType)
            .all(&self.db)
            .await?;

        let mut result = Vec::with_capacity(packages.len());
        for package in packages {
            let items = load_package_items(&self.db, package.id).await?;
            result.push(to_fee_package(package, items));
        }
        Ok(result)
    }

    /// Activates or deactivates a package.
    ///
    /// # Errors
    ///
    /// Returns `CatalogRepoError::FeePackageNotFound` if it does not exist.
    pub async fn set_package_active(
        &self,
        id: Uuid,
        is_active: bool,
    ) -> Result<FeePackage, CatalogRepoError> {
        let package = fee_packages::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(CatalogRepoError::FeePackageNotFound(id))?;

        let mut active = package.into_active_model();
        active.is_active = Set(is_active);
        active.update(&self.db).await?;

        info!(fee_package_id = %id, is_active, "Fee package activation changed");
        self.get_package(id).await
    }
}

/// Loads a package and its items in display order.
pub(crate) async fn load_package<C: ConnectionTrait>(
    conn: &C,
    id: Uuid,
) -> Result<Option<FeePackage>, DbErr> {
    let Some(package) = fee_packages::Entity::find_by_id(id).one(conn).await? else {
        return Ok(None);
    };

    let items = load_package_items(conn, id).await?;
    Ok(Some(to_fee_package(package, items)))
}

async fn load_package_items<C: ConnectionTrait>(
    conn: &C,
    package_id: Uuid,
) -> Result<Vec<FeePackageItem>, DbErr> {
    let rows = fee_package_items::Entity::find()
        .filter(fee_package_items::Column::FeePackageId.eq(package_id))
        .order_by_asc(fee_package_items::Column::Position)
        .find_also_related(fee_items::Entity)
        .all(conn)
        .await?;

    Ok(rows
        .into_iter()
        .filter_map(|(line, item)| {
            item.map(|item| FeePackageItem {
                fee_item: to_fee_item(item),
                quantity: u32::try_from(line.quantity).unwrap_or_default(),
                unit_amount: line.unit_amount,
            })
        })
        .collect())
}

fn to_fee_item(model: fee_items::Model) -> FeeItem {
    FeeItem {
        id: FeeItemId::from_uuid(model.id),
        name: model.name,
        code: model.code,
        default_amount: model.default_amount,
        charge_type: model.charge_type.into(),
        is_waivable_for_returning_students: model.is_waivable_for_returning_students,
        is_active: model.is_active,
    }
}

fn to_fee_package(model: fee_packages::Model, items: Vec<FeePackageItem>) -> FeePackage {
    FeePackage {
        id: FeePackageId::from_uuid(model.id),
        name: model.name,
        level: model.level,
        program_type: model.program_type,
        billing_period: model.billing_period.into(),
        academic_year_id: AcademicYearId::from_uuid(model.academic_year_id),
        is_active: model.is_active,
        items,
        collection_rule: model
            .upfront_months
            .and_then(|m| u32::try_from(m).ok())
            .map(|upfront_months| CollectionRule { upfront_months }),
    }
}
