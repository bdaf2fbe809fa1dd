//! Fee catalog validation rules.

use std::collections::HashSet;

use rust_decimal::Decimal;
use tadika_shared::types::is_storable_amount;

use super::error::CatalogError;
use super::types::NewPackageLine;

/// Catalog service for business rules.
pub struct CatalogService;

impl CatalogService {
    /// Validate a fee item definition.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::MissingName` / `MissingCode` for blank fields and
    /// `CatalogError::NegativeAmount` for a negative default amount and
    /// `CatalogError::UnstorableAmount` for sub-sen or oversized amounts.
    pub fn validate_fee_item(name: &str, code: &str, amount: Decimal) -> Result<(), CatalogError> {
        if name.trim().is_empty() {
            return Err(CatalogError::MissingName);
        }

        if code.trim().is_empty() {
            return Err(CatalogError::MissingCode);
        }

        check_amount(amount)
    }

    /// Validate the lines and collection rule of a new package.
    ///
    /// # Errors
    ///
    /// Returns the first rule violated: empty package, zero quantity,
    /// negative unit override, duplicate fee item, or upfront months outside
    /// `1..=academic_months`.
    pub fn validate_package(
        name: &str,
        lines: &[NewPackageLine],
        upfront_months: Option<u32>,
        academic_months: u32,
    ) -> Result<(), CatalogError> {
        if name.trim().is_empty() {
            return Err(CatalogError::MissingName);
        }

        if lines.is_empty() {
            return Err(CatalogError::EmptyPackage);
        }

        let mut seen = HashSet::with_capacity(lines.len());
        for line in lines {
            if line.quantity == 0 {
                return Err(CatalogError::ZeroQuantity(line.fee_item_id));
            }
            if let Some(amount) = line.unit_amount {
                check_amount(amount)?;
            }
            if !seen.insert(line.fee_item_id) {
                return Err(CatalogError::DuplicateItem(line.fee_item_id));
            }
        }

        if let Some(months) = upfront_months {
            if months == 0 || months > academic_months {
                return Err(CatalogError::InvalidUpfrontMonths {
                    got: months,
                    max: academic_months,
                });
            }
        }

        Ok(())
    }
}

fn check_amount(amount: Decimal) -> Result<(), CatalogError> {
    if amount < Decimal::ZERO {
        return Err(CatalogError::NegativeAmount(amount));
    }
    if !is_storable_amount(amount) {
        return Err(CatalogError::UnstorableAmount(amount));
    }
    Ok(())
}
