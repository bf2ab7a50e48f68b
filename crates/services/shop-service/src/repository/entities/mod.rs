//! SeaORM entities for the relational store.

pub mod product;
pub mod user;
