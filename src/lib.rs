//! Library catalog application: authors and books modules plus shared
//! request validation.

pub mod modules;
pub mod utils;
