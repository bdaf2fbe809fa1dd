//! Payment ledger data types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tadika_shared::types::{BookInstanceId, MiscFeeId, MonthlyFeeInstanceId};
use uuid::Uuid;

/// Payment status of a billable instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    /// Nothing paid.
    Unpaid,
    /// Some but not all of the amount paid.
    Partial,
    /// Fully paid.
    Paid,
}

impl PaymentStatus {
    /// Status as a pure function of the amount due and the sum paid.
    ///
    /// `Paid` iff paid >= due, `Unpaid` iff nothing was paid, else `Partial`.
    /// A zero-due instance is `Paid`.
    #[must_use]
    pub fn from_amounts(amount_due: Decimal, amount_paid: Decimal) -> Self {
        if amount_paid >= amount_due {
            Self::Paid
        } else if amount_paid <= Decimal::ZERO {
            Self::Unpaid
        } else {
            Self::Partial
        }
    }

    /// Status of a freshly generated instance.
    #[must_use]
    pub fn initial(amount_due: Decimal) -> Self {
        Self::from_amounts(amount_due, Decimal::ZERO)
    }
}

/// The kinds of billable instance a payment can settle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InstanceKind {
    /// A generated monthly fee.
    Monthly,
    /// A generated one-time (misc) fee.
    OneTime,
    /// A book charge.
    Book,
}

/// Reference to exactly one billable instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum InstanceRef {
    /// Monthly fee instance.
    Monthly(MonthlyFeeInstanceId),
    /// One-time fee instance.
    OneTime(MiscFeeId),
    /// Book instance.
    Book(BookInstanceId),
}

impl InstanceRef {
    /// Builds a reference from its kind and raw ID.
    #[must_use]
    pub const fn new(kind: InstanceKind, id: Uuid) -> Self {
        match kind {
            InstanceKind::Monthly => Self::Monthly(MonthlyFeeInstanceId::from_uuid(id)),
            InstanceKind::OneTime => Self::OneTime(MiscFeeId::from_uuid(id)),
            InstanceKind::Book => Self::Book(BookInstanceId::from_uuid(id)),
        }
    }

    /// The kind of instance referenced.
    #[must_use]
    pub const fn kind(&self) -> InstanceKind {
        match self {
            Self::Monthly(_) => InstanceKind::Monthly,
            Self::OneTime(_) => InstanceKind::OneTime,
            Self::Book(_) => InstanceKind::Book,
        }
    }

    /// The raw ID of the instance.
    #[must_use]
    pub const fn id(&self) -> Uuid {
        match self {
            Self::Monthly(id) => id.into_inner(),
            Self::OneTime(id) => id.into_inner(),
            Self::Book(id) => id.into_inner(),
        }
    }
}

impl std::fmt::Display for InstanceRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Monthly(id) => write!(f, "monthly:{id}"),
            Self::OneTime(id) => write!(f, "one_time:{id}"),
            Self::Book(id) => write!(f, "book:{id}"),
        }
    }
}

/// How a payment was made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Cash at the office.
    Cash,
    /// Bank transfer.
    BankTransfer,
    /// Debit or credit card.
    Card,
    /// Cheque.
    Cheque,
    /// E-wallet.
    EWallet,
    /// Anything else.
    Other,
}

/// Amount due and amount paid on one instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstanceBalance {
    /// Amount billed.
    pub amount_due: Decimal,
    /// Sum of payments recorded.
    pub amount_paid: Decimal,
}

impl InstanceBalance {
    /// Creates a balance.
    #[must_use]
    pub const fn new(amount_due: Decimal, amount_paid: Decimal) -> Self {
        Self {
            amount_due,
            amount_paid,
        }
    }

    /// Remaining amount, never negative.
    #[must_use]
    pub fn outstanding(&self) -> Decimal {
        (self.amount_due - self.amount_paid).max(Decimal::ZERO)
    }

    /// Derived payment status.
    #[must_use]
    pub fn status(&self) -> PaymentStatus {
        PaymentStatus::from_amounts(self.amount_due, self.amount_paid)
    }
}
