//! Shared fixtures for service-level tests.

mod db;

pub(crate) use context::TestContext;
