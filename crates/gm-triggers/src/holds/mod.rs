//! Per-hold rule sets.
//!
//! Each module exposes `module()` and a standalone `triggers(location, state)`.
//! [`standard`] lists them in dispatch order.

pub mod college;
pub mod dustmans_cairn;
pub mod riften;
pub mod saarthal;
pub mod solitude;
pub mod whiterun;
pub mod windhelm;

use crate::dispatch::HoldModule;

/// Every hold module in registration order.
pub fn standard() -> Vec<HoldModule> {
    vec![
        whiterun::module(),
        dustmans_cairn::module(),
        college::module(),
        saarthal::module(),
        solitude::module(),
        windhelm::module(),
        riften::module(),
    ]
}
