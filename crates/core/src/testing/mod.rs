//! Helpers for checking a container against the [`ContainerProtocol`] contract
//!
//! [`ContainerProtocol`]: crate::ContainerProtocol

pub mod conformance;

pub use conformance::{check_registration, check_unregistered, ContractViolation};
