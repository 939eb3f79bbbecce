//! Route handlers
//!
//! - recipes: add / view / list / edit / delete
//! - health: liveness endpoint

pub mod health;
pub mod recipes;
