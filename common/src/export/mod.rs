//! Export cores shared across front ends.

pub mod pdf_core;

#[cfg(feature = "excel")]
pub mod excel_core;
