//! Conversion of domain and repository errors into HTTP responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::DbErr;
use serde_json::json;
use tadika_core::catalog::CatalogError;
use tadika_db::repositories::{
    BillingRepoError, CatalogRepoError, EnrollmentError, PaymentRepoError, SchoolError,
};
use tadika_shared::AppError;
use tracing::error;

/// Result type for handlers.
pub type ApiResult<T> = Result<T, ApiError>;

/// An application error on its way out of a handler.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl ApiError {
    /// Returns the wrapped application error.
    #[must_use]
    pub const fn inner(&self) -> &AppError {
        &self.0
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if matches!(self.0, AppError::Database(_) | AppError::Internal(_)) {
            error!(error = %self.0, "Request failed");
        }

        let status =
            StatusCode::from_u16(self.0.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body = json!({
            "error": self.0.error_code(),
            "message": self.0.public_message(),
        });

        (status, Json(body)).into_response()
    }
}

impl From<DbErr> for ApiError {
    fn from(err: DbErr) -> Self {
        Self(AppError::Database(err.to_string()))
    }
}

impl From<SchoolError> for ApiError {
    fn from(err: SchoolError) -> Self {
        let message = err.to_string();
        Self(match err {
            SchoolError::AcademicYearNotFound(_)
            | SchoolError::StudentNotFound(_)
            | SchoolError::ClassNotFound(_) => AppError::NotFound(message),
            SchoolError::DuplicateAcademicYear(_) | SchoolError::DuplicateClass(_) => {
                AppError::Conflict(message)
            }
            SchoolError::InvalidDateRange => AppError::Validation(message),
            SchoolError::Database(_) => AppError::Database(message),
        })
    }
}

impl From<CatalogRepoError> for ApiError {
    fn from(err: CatalogRepoError) -> Self {
        let message = err.to_string();
        Self(match err {
            CatalogRepoError::FeeItemNotFound(_)
            | CatalogRepoError::FeePackageNotFound(_)
            | CatalogRepoError::AcademicYearNotFound(_) => AppError::NotFound(message),
            CatalogRepoError::DuplicateCode(_)
            | CatalogRepoError::DuplicatePackage { .. }
            | CatalogRepoError::FeeItemInUse(_) => AppError::Conflict(message),
            CatalogRepoError::Rule(CatalogError::InactiveFeeItem(_)) => {
                AppError::BusinessRule(message)
            }
            CatalogRepoError::Rule(_) => AppError::Validation(message),
            CatalogRepoError::Database(_) => AppError::Database(message),
        })
    }
}

impl From<EnrollmentError> for ApiError {
    fn from(err: EnrollmentError) -> Self {
        let message = err.to_string();
        Self(match err {
            EnrollmentError::NotFound(_)
            | EnrollmentError::StudentNotFound(_)
            | EnrollmentError::AcademicYearNotFound(_)
            | EnrollmentError::ClassNotFound(_)
            | EnrollmentError::FeePackageNotFound(_)
            | EnrollmentError::FeeItemNotFound(_)
            | EnrollmentError::AdjustmentNotFound(_) => AppError::NotFound(message),
            EnrollmentError::AlreadyEnrolled => AppError::Conflict(message),
            EnrollmentError::PackageInactive(_)
            | EnrollmentError::PackageYearMismatch
            | EnrollmentError::ClassYearMismatch
            | EnrollmentError::ClassFull(_) => AppError::BusinessRule(message),
            EnrollmentError::InvalidQuantity | EnrollmentError::UnstorableAmount(_) => {
                AppError::Validation(message)
            }
            EnrollmentError::Database(_) => AppError::Database(message),
        })
    }
}

impl From<BillingRepoError> for ApiError {
    fn from(err: BillingRepoError) -> Self {
        let message = err.to_string();
        Self(match err {
            BillingRepoError::EnrollmentNotFound(_) => AppError::NotFound(message),
            BillingRepoError::ConcurrentGeneration => AppError::Conflict(message),
            BillingRepoError::NegativeAmount
            | BillingRepoError::UnstorableAmount(_)
            | BillingRepoError::Rule(_) => AppError::Validation(message),
            BillingRepoError::Database(_) => AppError::Database(message),
        })
    }
}

impl From<PaymentRepoError> for ApiError {
    fn from(err: PaymentRepoError) -> Self {
        let message = err.to_string();
        Self(match err {
            PaymentRepoError::InstanceNotFound(_) => AppError::NotFound(message),
            PaymentRepoError::Rule(_) => AppError::Validation(message),
            PaymentRepoError::Database(_) => AppError::Database(message),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use rstest::rstest;
    use rust_decimal_macros::dec;
    use tadika_core::payments::PaymentError;
    use uuid::Uuid;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_database_error_hides_details() {
        let response =
            ApiError::from(DbErr::Custom("relation \"payments\" does not exist".into()))
                .into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body["error"], "DATABASE_ERROR");
        assert_eq!(body["message"], "An error occurred");
    }

    #[tokio::test]
    async fn test_rule_message_is_verbatim() {
        let err = PaymentRepoError::Rule(PaymentError::ExceedsOutstanding {
            amount: dec!(500),
            outstanding: dec!(300),
        });
        let response = ApiError::from(err).into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"], "VALIDATION_ERROR");
        assert_eq!(
            body["message"],
            "Payment of 500 exceeds the outstanding amount of 300"
        );
    }

    #[rstest]
    #[case::not_found(ApiError::from(EnrollmentError::NotFound(Uuid::nil())), StatusCode::NOT_FOUND)]
    #[case::already_enrolled(ApiError::from(EnrollmentError::AlreadyEnrolled), StatusCode::CONFLICT)]
    #[case::class_full(
        ApiError::from(EnrollmentError::ClassFull("Melati".into())),
        StatusCode::UNPROCESSABLE_ENTITY
    )]
    #[case::concurrent_generation(
        ApiError::from(BillingRepoError::ConcurrentGeneration),
        StatusCode::CONFLICT
    )]
    #[case::fee_item_in_use(
        ApiError::from(CatalogRepoError::FeeItemInUse(Uuid::nil())),
        StatusCode::CONFLICT
    )]
    #[case::date_range(ApiError::from(SchoolError::InvalidDateRange), StatusCode::BAD_REQUEST)]
    fn test_status_mapping(#[case] err: ApiError, #[case] expected: StatusCode) {
        assert_eq!(err.into_response().status(), expected);
    }
}
