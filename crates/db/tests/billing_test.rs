//! Integration tests for bill generation and statements.

mod common;

use rust_decimal_macros::dec;
use sea_orm::ConnectionTrait;
use tadika_core::billing::BillingError;
use tadika_core::payments::PaymentStatus;
use tadika_db::repositories::{BillingRepoError, BillingRepository};

use common::{ACADEMIC_MONTHS, fixture};

#[tokio::test]
async fn test_generation_is_idempotent() {
    let fx = fixture().await;
    let enrollment_id = fx.enroll("Aisyah", true, true).await;
    let repo = BillingRepository::new(fx.db.clone());

    let first = repo
        .generate(enrollment_id, ACADEMIC_MONTHS)
        .await
        .expect("First generation");
    assert_eq!(first.misc_fees_created, 1);
    assert_eq!(first.monthly_fees_created, 12);

    let second = repo
        .generate(enrollment_id, ACADEMIC_MONTHS)
        .await
        .expect("Second generation");
    assert_eq!(second.misc_fees_created, 0);
    assert_eq!(second.monthly_fees_created, 0);

    let statement = repo.statement(enrollment_id).await.expect("Statement");
    assert_eq!(statement.one_time_fees.len(), 1);
    assert_eq!(statement.monthly_fees.len(), 12);
    assert_eq!(
        statement
            .monthly_fees
            .iter()
            .map(|l| l.month)
            .collect::<Vec<_>>(),
        (1..=12).map(Some).collect::<Vec<_>>()
    );
}

/// Stands in for a parallel run: month 1 of tuition appears as soon as this
/// run has written its one-time fee, after the existing rows were read.
const RACING_WRITER: &str = "
CREATE TRIGGER racing_writer AFTER INSERT ON misc_fees
BEGIN
    INSERT INTO monthly_fee_instances
        (id, enrollment_id, fee_item_id, name, month, amount_due, status, created_at)
    SELECT randomblob(16), NEW.enrollment_id, id, name, 1, default_amount, 'unpaid', NEW.created_at
    FROM fee_items WHERE code = 'TUI';
END";

#[tokio::test]
async fn test_clashing_generation_rolls_back_every_row() {
    let fx = fixture().await;
    let enrollment_id = fx.enroll("Aisyah", true, true).await;
    let repo = BillingRepository::new(fx.db.clone());

    fx.db
        .execute_unprepared(RACING_WRITER)
        .await
        .expect("Create trigger");

    let result = repo.generate(enrollment_id, ACADEMIC_MONTHS).await;
    assert!(matches!(result, Err(BillingRepoError::ConcurrentGeneration)));

    fx.db
        .execute_unprepared("DROP TRIGGER racing_writer")
        .await
        .expect("Drop trigger");

    let statement = repo.statement(enrollment_id).await.expect("Statement");
    assert!(statement.one_time_fees.is_empty());
    assert!(statement.monthly_fees.is_empty());
    assert_eq!(statement.summary.instance_count, 0);

    let retry = repo
        .generate(enrollment_id, ACADEMIC_MONTHS)
        .await
        .expect("Retry");
    assert_eq!(retry.misc_fees_created, 1);
    assert_eq!(retry.monthly_fees_created, 12);
}

#[tokio::test]
async fn test_generation_requires_package() {
    let fx = fixture().await;
    let enrollment_id = fx.enroll("Aisyah", true, false).await;

    let result = BillingRepository::new(fx.db.clone())
        .generate(enrollment_id, ACADEMIC_MONTHS)
        .await;

    assert!(matches!(
        result,
        Err(BillingRepoError::Rule(BillingError::FeePackageRequired))
    ));

    let statement = BillingRepository::new(fx.db.clone())
        .statement(enrollment_id)
        .await
        .expect("Statement");
    assert_eq!(statement.summary.instance_count, 0);
    assert_eq!(statement.summary.status, PaymentStatus::Unpaid);
}

#[tokio::test]
async fn test_generation_for_unknown_enrollment() {
    let fx = fixture().await;

    let result = BillingRepository::new(fx.db.clone())
        .generate(uuid::Uuid::new_v4(), ACADEMIC_MONTHS)
        .await;

    assert!(matches!(result, Err(BillingRepoError::EnrollmentNotFound(_))));
}

#[tokio::test]
async fn test_waived_fee_generated_as_paid() {
    let fx = fixture().await;
    let enrollment_id = fx.enroll("Bryan", false, true).await;
    let repo = BillingRepository::new(fx.db.clone());

    repo.generate(enrollment_id, ACADEMIC_MONTHS)
        .await
        .expect("Generation");

    let statement = repo.statement(enrollment_id).await.expect("Statement");
    let registration = &statement.one_time_fees[0];

    assert_eq!(registration.name, "Registration");
    assert_eq!(registration.amount_due, dec!(0));
    assert_eq!(registration.status, PaymentStatus::Paid);
    assert_eq!(statement.summary.total_due, dec!(3600));
    assert_eq!(statement.summary.status, PaymentStatus::Unpaid);
}

#[tokio::test]
async fn test_generated_amounts_are_not_resynced() {
    let fx = fixture().await;
    let enrollment_id = fx.enroll("Chen", true, true).await;
    let repo = BillingRepository::new(fx.db.clone());

    repo.generate(enrollment_id, ACADEMIC_MONTHS)
        .await
        .expect("Generation");

    tadika_db::CatalogRepository::new(fx.db.clone())
        .update_fee_item(
            fx.tuition.id.into_inner(),
            tadika_db::repositories::UpdateFeeItemInput {
                default_amount: Some(dec!(350)),
                ..Default::default()
            },
        )
        .await
        .expect("Price change");

    repo.generate(enrollment_id, ACADEMIC_MONTHS)
        .await
        .expect("Regeneration");

    let statement = repo.statement(enrollment_id).await.expect("Statement");
    assert!(
        statement
            .monthly_fees
            .iter()
            .all(|l| l.amount_due == dec!(300))
    );
}

#[tokio::test]
async fn test_book_charge() {
    let fx = fixture().await;
    let enrollment_id = fx.enroll("Dina", true, false).await;
    let repo = BillingRepository::new(fx.db.clone());

    assert!(matches!(
        repo.add_book(enrollment_id, "Reader 1".to_string(), dec!(-5))
            .await,
        Err(BillingRepoError::NegativeAmount)
    ));
    assert!(matches!(
        repo.add_book(enrollment_id, "Reader 1".to_string(), dec!(12.345))
            .await,
        Err(BillingRepoError::UnstorableAmount(_))
    ));

    repo.add_book(enrollment_id, "Reader 1".to_string(), dec!(45))
        .await
        .expect("Book charge");

    let statement = repo.statement(enrollment_id).await.expect("Statement");
    assert_eq!(statement.books.len(), 1);
    assert_eq!(statement.books[0].outstanding, dec!(45));
    assert_eq!(statement.summary.total_due, dec!(45));
}
