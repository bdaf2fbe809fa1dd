//! Integration tests for the payment ledger.

mod common;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tadika_core::payments::{InstanceKind, InstanceRef, PaymentError, PaymentMethod, PaymentStatus};
use tadika_db::repositories::{
    BillingRepository, LogPaymentInput, PaymentRepoError, PaymentRepository, StatementLine,
};
use tadika_shared::OverpaymentPolicy;

use common::{ACADEMIC_MONTHS, Fixture, fixture};

/// Generates bills for a new student and returns the first monthly line.
async fn first_month(fx: &Fixture) -> StatementLine {
    let enrollment_id = fx.enroll("Aisyah", true, true).await;
    let billing = BillingRepository::new(fx.db.clone());
    billing
        .generate(enrollment_id, ACADEMIC_MONTHS)
        .await
        .expect("Generation");

    billing
        .statement(enrollment_id)
        .await
        .expect("Statement")
        .monthly_fees
        .remove(0)
}

fn cash(instance: InstanceRef, amount: Decimal) -> LogPaymentInput {
    LogPaymentInput {
        instance,
        amount,
        method: PaymentMethod::Cash,
        note: None,
        paid_at: None,
    }
}

#[tokio::test]
async fn test_partial_then_full_then_rejected() {
    let fx = fixture().await;
    let month = first_month(&fx).await;
    let repo = PaymentRepository::new(fx.db.clone());

    let receipt = repo
        .log_payment(cash(month.instance, dec!(150)), OverpaymentPolicy::Reject)
        .await
        .expect("First payment");
    assert_eq!(receipt.status, PaymentStatus::Partial);
    assert_eq!(receipt.balance.outstanding(), dec!(150));

    let receipt = repo
        .log_payment(cash(month.instance, dec!(150)), OverpaymentPolicy::Reject)
        .await
        .expect("Second payment");
    assert_eq!(receipt.status, PaymentStatus::Paid);

    let result = repo
        .log_payment(cash(month.instance, dec!(1)), OverpaymentPolicy::Allow)
        .await;
    assert!(matches!(
        result,
        Err(PaymentRepoError::Rule(PaymentError::NothingOutstanding))
    ));

    let payments = repo
        .list_for_instance(month.instance)
        .await
        .expect("Payments");
    assert_eq!(payments.len(), 2);
    assert!(payments.iter().all(|p| p.monthly_fee_instance_id == Some(month.instance.id())));
    assert!(payments.iter().all(|p| p.misc_fee_id.is_none() && p.book_instance_id.is_none()));
}

#[tokio::test]
async fn test_sub_sen_payment_is_refused_before_insert() {
    let fx = fixture().await;
    let month = first_month(&fx).await;
    let repo = PaymentRepository::new(fx.db.clone());

    let result = repo
        .log_payment(cash(month.instance, dec!(299.999)), OverpaymentPolicy::Reject)
        .await;
    assert!(matches!(
        result,
        Err(PaymentRepoError::Rule(PaymentError::UnstorableAmount(_)))
    ));

    let payments = repo
        .list_for_instance(month.instance)
        .await
        .expect("Payments");
    assert!(payments.is_empty());
}

#[tokio::test]
async fn test_status_persisted_on_instance() {
    let fx = fixture().await;
    let month = first_month(&fx).await;

    let receipt = PaymentRepository::new(fx.db.clone())
        .log_payment(cash(month.instance, dec!(100)), OverpaymentPolicy::Reject)
        .await
        .expect("Payment");

    let statement = BillingRepository::new(fx.db.clone())
        .statement(receipt.enrollment_id)
        .await
        .expect("Statement");
    let line = &statement.monthly_fees[0];

    assert_eq!(line.instance, month.instance);
    assert_eq!(line.status, PaymentStatus::Partial);
    assert_eq!(line.amount_paid, dec!(100));
    assert_eq!(line.outstanding, dec!(200));
    assert_eq!(statement.summary.status, PaymentStatus::Partial);
}

#[tokio::test]
async fn test_overpayment_policies() {
    let fx = fixture().await;
    let month = first_month(&fx).await;
    let repo = PaymentRepository::new(fx.db.clone());

    let rejected = repo
        .log_payment(cash(month.instance, dec!(500)), OverpaymentPolicy::Reject)
        .await;
    assert!(matches!(
        rejected,
        Err(PaymentRepoError::Rule(PaymentError::ExceedsOutstanding { .. }))
    ));

    let clamped = repo
        .log_payment(cash(month.instance, dec!(500)), OverpaymentPolicy::Clamp)
        .await
        .expect("Clamped payment");
    assert_eq!(clamped.payment.amount_paid, dec!(300));
    assert_eq!(clamped.status, PaymentStatus::Paid);
}

#[tokio::test]
async fn test_non_positive_amount_rejected() {
    let fx = fixture().await;
    let month = first_month(&fx).await;

    let result = PaymentRepository::new(fx.db.clone())
        .log_payment(cash(month.instance, dec!(0)), OverpaymentPolicy::Allow)
        .await;

    assert!(matches!(
        result,
        Err(PaymentRepoError::Rule(PaymentError::NonPositiveAmount))
    ));
}

#[tokio::test]
async fn test_unknown_instance() {
    let fx = fixture().await;
    let missing = InstanceRef::new(InstanceKind::OneTime, uuid::Uuid::new_v4());

    let result = PaymentRepository::new(fx.db.clone())
        .log_payment(cash(missing, dec!(10)), OverpaymentPolicy::Reject)
        .await;

    assert!(matches!(result, Err(PaymentRepoError::InstanceNotFound(r)) if r == missing));
}

#[tokio::test]
async fn test_id_of_wrong_kind_not_found() {
    let fx = fixture().await;
    let month = first_month(&fx).await;
    let as_book = InstanceRef::new(InstanceKind::Book, month.instance.id());

    let result = PaymentRepository::new(fx.db.clone())
        .log_payment(cash(as_book, dec!(10)), OverpaymentPolicy::Reject)
        .await;

    assert!(matches!(result, Err(PaymentRepoError::InstanceNotFound(_))));
}

#[tokio::test]
async fn test_book_and_one_time_payments() {
    let fx = fixture().await;
    let enrollment_id = fx.enroll("Bryan", true, true).await;
    let billing = BillingRepository::new(fx.db.clone());
    let payments = PaymentRepository::new(fx.db.clone());

    billing
        .generate(enrollment_id, ACADEMIC_MONTHS)
        .await
        .expect("Generation");
    billing
        .add_book(enrollment_id, "Phonics Pack".to_string(), dec!(60))
        .await
        .expect("Book");

    let statement = billing.statement(enrollment_id).await.expect("Statement");

    let receipt = payments
        .log_payment(
            LogPaymentInput {
                instance: statement.books[0].instance,
                amount: dec!(60),
                method: PaymentMethod::BankTransfer,
                note: Some("Ref 8812".to_string()),
                paid_at: None,
            },
            OverpaymentPolicy::Reject,
        )
        .await
        .expect("Book payment");
    assert_eq!(receipt.status, PaymentStatus::Paid);
    assert_eq!(receipt.payment.note.as_deref(), Some("Ref 8812"));

    let receipt = payments
        .log_payment(
            cash(statement.one_time_fees[0].instance, dec!(200)),
            OverpaymentPolicy::Reject,
        )
        .await
        .expect("Registration payment");
    assert_eq!(receipt.status, PaymentStatus::Paid);

    let statement = billing.statement(enrollment_id).await.expect("Statement");
    assert_eq!(statement.summary.total_paid, dec!(260));
    assert_eq!(statement.summary.status, PaymentStatus::Partial);
}
