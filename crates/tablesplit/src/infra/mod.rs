//! Infrastructure layer - I/O and external dependencies
//!
//! This module handles file operations and table file formats.

pub mod folder;
pub mod table_io;
