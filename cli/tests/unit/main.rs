//! Unit tests for the tfcomply CLI
//!
//! These tests use mocked dependencies and run fast without external I/O.

mod architecture;
mod terraform_driver;
