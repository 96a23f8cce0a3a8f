#![deny(clippy::all)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]

//! End-to-end test catalogue and harness for Terraform registry lookup tools.

pub mod adapters;
pub mod app;
pub mod common;
pub mod domain;
pub mod infra;
pub mod usecases;

pub use app::Application;
