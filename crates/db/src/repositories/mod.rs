//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.

pub mod billing;
pub mod catalog;
pub mod enrollment;
pub mod payment;
pub mod school;

pub use billing::{
    BillingRepoError, BillingRepository, BillingStatement, GenerationSummary, StatementLine,
};
pub use catalog::{
    CatalogRepoError, CatalogRepository, CreateFeeItemInput, CreateFeePackageInput,
    UpdateFeeItemInput,
};
pub use enrollment::{
    CreateEnrollmentInput, EnrollmentError, EnrollmentRepository, EnrollmentWithStudent,
    UpsertAdjustmentInput,
};
pub use payment::{LogPaymentInput, PaymentReceipt, PaymentRepoError, PaymentRepository};
pub use school::{
    CreateAcademicYearInput, CreateClassInput, CreateStudentInput, SchoolError, SchoolRepository,
};
