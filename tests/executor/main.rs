//! Executor Layer Tests
//!
//! End-to-end tests through the public docdesk API, backed by the
//! in-memory server:
//! - Scenarios: create, edit, find, delete, drop
//! - Pagination and filter coercion
//! - Error envelopes and connection release
//! - Concurrent use of one executor

mod common;

mod concurrency;
mod error_handling;
mod filtering;
mod mutations;
mod pagination;
mod scenarios;
