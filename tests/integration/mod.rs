//! Integration test suite for Stagehand
//!
//! End-to-end tests over a temporary site root: the JSON theme registry,
//! published assets, the rendering pipeline and the `stagehand` binary.
//!
//! # Running Integration Tests
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! # Test Organization
//!
//! - **lifecycle**: discovery, install, activation, uninstall, publishing
//! - **rendering**: candidate order, layout composition, fallbacks
//! - **menus**: menu injection and visibility in rendered pages
//! - **cli**: the `stagehand` command line

#[path = "../common/mod.rs"]
mod common;

mod cli;
mod lifecycle;
mod menus;
mod rendering;
