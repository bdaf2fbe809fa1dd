//! Request extractors.

use axum::{
    Json,
    extract::{FromRequest, Request},
};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use tadika_shared::AppError;
use tadika_shared::types::is_storable_amount;
use validator::{Validate, ValidationError};

use crate::error::ApiError;

/// JSON body that has passed its `validator` rules.
///
/// Malformed JSON and rule violations both surface as `VALIDATION_ERROR`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::Validation(rejection.body_text()))?;

        value
            .validate()
            .map_err(|errors| AppError::Validation(errors.to_string()))?;

        Ok(Self(value))
    }
}

/// `validator` rule: amount fits a money column (two decimal places, at most
/// 9,999,999,999.99 either way).
pub fn storable_amount(value: &Decimal) -> Result<(), ValidationError> {
    if !is_storable_amount(*value) {
        return Err(ValidationError::new("storable").with_message(
            "amount must have at most 2 decimal places and not exceed 9999999999.99".into(),
        ));
    }
    Ok(())
}

/// `validator` rule: amount is zero or more and storable.
pub fn non_negative_amount(value: &Decimal) -> Result<(), ValidationError> {
    if *value < Decimal::ZERO {
        return Err(ValidationError::new("non_negative")
            .with_message("amount cannot be negative".into()));
    }
    storable_amount(value)
}

/// `validator` rule: amount is greater than zero and storable.
pub fn positive_amount(value: &Decimal) -> Result<(), ValidationError> {
    if *value <= Decimal::ZERO {
        return Err(ValidationError::new("positive")
            .with_message("amount must be greater than zero".into()));
    }
    storable_amount(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_non_negative_amount() {
        assert!(non_negative_amount(&dec!(0)).is_ok());
        assert!(non_negative_amount(&dec!(12.50)).is_ok());
        assert!(non_negative_amount(&dec!(-0.01)).is_err());
        assert!(non_negative_amount(&dec!(12.505)).is_err());
    }

    #[test]
    fn test_positive_amount() {
        assert!(positive_amount(&dec!(0.01)).is_ok());
        assert!(positive_amount(&dec!(0)).is_err());
        assert!(positive_amount(&dec!(-5)).is_err());
        assert!(positive_amount(&dec!(299.999)).is_err());
        assert!(positive_amount(&dec!(10000000000)).is_err());
    }

    #[test]
    fn test_storable_amount_allows_discounts() {
        assert!(storable_amount(&dec!(-50.00)).is_ok());
        assert!(storable_amount(&dec!(300.000)).is_ok());
        assert!(storable_amount(&dec!(-0.001)).is_err());
    }
}
