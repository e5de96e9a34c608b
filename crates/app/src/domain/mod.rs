//! Stockroom Domain Concerns

pub mod products;
