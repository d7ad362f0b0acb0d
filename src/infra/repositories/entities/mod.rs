//! SeaORM entity definitions
//!
//! These are database-specific entities separate from domain models.

pub mod membership;
pub mod task;
pub mod user;
pub mod workspace;
