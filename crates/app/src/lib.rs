//! Products domain and persistence for the Stockroom service.

pub mod config;
pub mod context;
pub mod database;
pub mod domain;
pub mod ids;

#[cfg(test)]
mod test;
