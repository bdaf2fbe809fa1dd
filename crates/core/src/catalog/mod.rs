//! Fee catalog: fee items, packages and collection rules.

pub mod error;
pub mod service;
pub mod types;

pub use error::CatalogError;
pub use service::CatalogService;
pub use types::{
    BillingPeriod, ChargeType, CollectionRule, FeeItem, FeePackage, FeePackageItem,
    NewPackageLine,
};
