//! Domain layer - Pure computational logic
//!
//! This module contains the table model and naming rules without I/O dependencies.

pub mod naming;
pub mod table;
pub mod table_format;
