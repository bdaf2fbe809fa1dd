//! `SeaORM` active enums, stored as short strings.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use tadika_core::catalog::{BillingPeriod as CoreBillingPeriod, ChargeType as CoreChargeType};
use tadika_core::payments::{PaymentMethod as CorePaymentMethod, PaymentStatus as CorePaymentStatus};

/// Charge type of a fee item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum ChargeType {
    #[sea_orm(string_value = "one_time")]
    OneTime,
    #[sea_orm(string_value = "monthly")]
    Monthly,
}

/// Billing period of a fee package.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum BillingPeriod {
    #[sea_orm(string_value = "monthly")]
    Monthly,
    #[sea_orm(string_value = "termly")]
    Termly,
    #[sea_orm(string_value = "yearly")]
    Yearly,
}

/// Payment status of a billable instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum PaymentStatus {
    #[sea_orm(string_value = "unpaid")]
    Unpaid,
    #[sea_orm(string_value = "partial")]
    Partial,
    #[sea_orm(string_value = "paid")]
    Paid,
}

/// Payment method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum PaymentMethod {
    #[sea_orm(string_value = "cash")]
    Cash,
    #[sea_orm(string_value = "bank_transfer")]
    BankTransfer,
    #[sea_orm(string_value = "card")]
    Card,
    #[sea_orm(string_value = "cheque")]
    Cheque,
    #[sea_orm(string_value = "e_wallet")]
    EWallet,
    #[sea_orm(string_value = "other")]
    Other,
}

impl From<ChargeType> for CoreChargeType {
    fn from(value: ChargeType) -> Self {
        match value {
            ChargeType::OneTime => Self::OneTime,
            ChargeType::Monthly => Self::Monthly,
        }
    }
}

impl From<CoreChargeType> for ChargeType {
    fn from(value: CoreChargeType) -> Self {
        match value {
            CoreChargeType::OneTime => Self::OneTime,
            CoreChargeType::Monthly => Self::Monthly,
        }
    }
}

impl From<BillingPeriod> for CoreBillingPeriod {
    fn from(value: BillingPeriod) -> Self {
        match value {
            BillingPeriod::Monthly => Self::Monthly,
            BillingPeriod::Termly => Self::Termly,
            BillingPeriod::Yearly => Self::Yearly,
        }
    }
}

impl From<CoreBillingPeriod> for BillingPeriod {
    fn from(value: CoreBillingPeriod) -> Self {
        match value {
            CoreBillingPeriod::Monthly => Self::Monthly,
            CoreBillingPeriod::Termly => Self::Termly,
            CoreBillingPeriod::Yearly => Self::Yearly,
        }
    }
}

impl From<PaymentStatus> for CorePaymentStatus {
    fn from(value: PaymentStatus) -> Self {
        match value {
            PaymentStatus::Unpaid => Self::Unpaid,
            PaymentStatus::Partial => Self::Partial,
            PaymentStatus::Paid => Self::Paid,
        }
    }
}

impl From<CorePaymentStatus> for PaymentStatus {
    fn from(value: CorePaymentStatus) -> Self {
        match value {
            CorePaymentStatus::Unpaid => Self::Unpaid,
            CorePaymentStatus::Partial => Self::Partial,
            CorePaymentStatus::Paid => Self::Paid,
        }
    }
}

impl From<PaymentMethod> for CorePaymentMethod {
    fn from(value: PaymentMethod) -> Self {
        match value {
            PaymentMethod::Cash => Self::Cash,
            PaymentMethod::BankTransfer => Self::BankTransfer,
            PaymentMethod::Card => Self::Card,
            PaymentMethod::Cheque => Self::Cheque,
            PaymentMethod::EWallet => Self::EWallet,
            PaymentMethod::Other => Self::Other,
        }
    }
}

impl From<CorePaymentMethod> for PaymentMethod {
    fn from(value: CorePaymentMethod) -> Self {
        match value {
            CorePaymentMethod::Cash => Self::Cash,
            CorePaymentMethod::BankTransfer => Self::BankTransfer,
            CorePaymentMethod::Card => Self::Card,
            CorePaymentMethod::Cheque => Self::Cheque,
            CorePaymentMethod::EWallet => Self::EWallet,
            CorePaymentMethod::Other => Self::Other,
        }
    }
}
