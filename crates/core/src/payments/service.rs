//! Payment acceptance rules.

use rust_decimal::Decimal;
use tadika_shared::OverpaymentPolicy;
use tadika_shared::types::is_storable_amount;

use super::error::PaymentError;
use super::types::InstanceBalance;

/// Payment service for business logic.
pub struct PaymentService;

impl PaymentService {
    /// Decide how much of an offered payment is recorded.
    ///
    /// Returns the amount to record. Settled instances always refuse further
    /// payments; amounts above the outstanding balance follow `policy`.
    ///
    /// # Errors
    ///
    /// Returns `PaymentError::NonPositiveAmount` for amounts <= 0,
    /// `PaymentError::UnstorableAmount` for sub-sen or oversized amounts,
    /// `PaymentError::NothingOutstanding` when the balance is settled, and
    /// `PaymentError::ExceedsOutstanding` under `OverpaymentPolicy::Reject`.
    pub fn accept(
        balance: &InstanceBalance,
        amount: Decimal,
        policy: OverpaymentPolicy,
    ) -> Result<Decimal, PaymentError> {
        if amount <= Decimal::ZERO {
            return Err(PaymentError::NonPositiveAmount);
        }

        if !is_storable_amount(amount) {
            return Err(PaymentError::UnstorableAmount(amount));
        }

        let outstanding = balance.outstanding();
        if outstanding.is_zero() {
            return Err(PaymentError::NothingOutstanding);
        }

        if amount <= outstanding {
            return Ok(amount);
        }

        match policy {
            OverpaymentPolicy::Reject => Err(PaymentError::ExceedsOutstanding {
                amount,
                outstanding,
            }),
            OverpaymentPolicy::Clamp => Ok(outstanding),
            OverpaymentPolicy::Allow => Ok(amount),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payments::types::PaymentStatus;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[test]
    fn test_partial_then_paid_then_rejected() {
        let mut balance = InstanceBalance::new(dec!(300), dec!(0));
        assert_eq!(balance.status(), PaymentStatus::Unpaid);

        let first = PaymentService::accept(&balance, dec!(150), OverpaymentPolicy::Reject).unwrap();
        balance.amount_paid += first;
        assert_eq!(balance.status(), PaymentStatus::Partial);

        let second =
            PaymentService::accept(&balance, dec!(150), OverpaymentPolicy::Reject).unwrap();
        balance.amount_paid += second;
        assert_eq!(balance.status(), PaymentStatus::Paid);

        assert_eq!(
            PaymentService::accept(&balance, dec!(1), OverpaymentPolicy::Reject),
            Err(PaymentError::NothingOutstanding)
        );
    }

    #[rstest]
    #[case(dec!(0))]
    #[case(dec!(-10))]
    fn test_non_positive_amount_rejected(#[case] amount: Decimal) {
        let balance = InstanceBalance::new(dec!(300), dec!(0));
        assert_eq!(
            PaymentService::accept(&balance, amount, OverpaymentPolicy::Allow),
            Err(PaymentError::NonPositiveAmount)
        );
    }

    #[rstest]
    #[case::sub_sen(dec!(299.999))]
    #[case::oversized(dec!(10000000000))]
    fn test_unstorable_amount_rejected(#[case] amount: Decimal) {
        let balance = InstanceBalance::new(dec!(300), dec!(0));
        assert_eq!(
            PaymentService::accept(&balance, amount, OverpaymentPolicy::Allow),
            Err(PaymentError::UnstorableAmount(amount))
        );
    }

    #[rstest]
    #[case(OverpaymentPolicy::Reject, Err(PaymentError::ExceedsOutstanding { amount: dec!(250), outstanding: dec!(200) }))]
    #[case(OverpaymentPolicy::Clamp, Ok(dec!(200)))]
    #[case(OverpaymentPolicy::Allow, Ok(dec!(250)))]
    fn test_overpayment_policy(
        #[case] policy: OverpaymentPolicy,
        #[case] expected: Result<Decimal, PaymentError>,
    ) {
        let balance = InstanceBalance::new(dec!(300), dec!(100));
        assert_eq!(PaymentService::accept(&balance, dec!(250), policy), expected);
    }

    #[test]
    fn test_exact_outstanding_accepted() {
        let balance = InstanceBalance::new(dec!(300), dec!(100));
        assert_eq!(
            PaymentService::accept(&balance, dec!(200), OverpaymentPolicy::Reject),
            Ok(dec!(200))
        );
    }

    #[test]
    fn test_zero_due_instance_refuses_payment() {
        let balance = InstanceBalance::new(dec!(0), dec!(0));
        assert_eq!(balance.status(), PaymentStatus::Paid);
        assert_eq!(
            PaymentService::accept(&balance, dec!(10), OverpaymentPolicy::Allow),
            Err(PaymentError::NothingOutstanding)
        );
    }
}
