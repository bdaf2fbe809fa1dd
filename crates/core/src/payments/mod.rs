//! Payment ledger rules: instance status, instance references, acceptance.

pub mod error;
pub mod service;
pub mod types;


pub use error::PaymentError;
pub use service::PaymentService;
pub use types::{InstanceBalance, InstanceKind, InstanceRef, PaymentMethod, PaymentStatus};
