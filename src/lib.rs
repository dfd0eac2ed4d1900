//! Library crate for svcpkg-manager.
//!
//! This crate exposes the building blocks of the TUI:
//! - Service package records and drafts (`model`)
//! - REST client for the services collection (`api`)
//! - Application state, sync lifecycle and event loop (`app`)
//! - In-memory search helpers (`search`)
//! - UI rendering and widgets (`ui`)
//!
//! It is used by the `svcpkg-manager` binary and by tests.
#![doc = include_str!("../README.md")]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod api;
pub mod app;
pub mod model;
pub mod search;
pub mod ui;
