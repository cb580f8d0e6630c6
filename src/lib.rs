//! # Academy Search
//!
//! Natural-language search over a course curriculum, plus the terminal
//! command layer that fronts it.
//!
//! The resolution pipeline itself lives in the I/O-free
//! `academy-search-core` crate. This crate adds everything that touches the
//! outside world: configuration files, corpus loading, the command
//! dispatcher, terminal rendering, and the `academy` CLI.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   ┌─────────────┐   ┌──────────────────────────┐
//! │ academy.toml │──▶│   Loader    │──▶│ QueryResolver (core)     │
//! │ curriculum   │   │ corpus+vocab│   │ normalize → rules → fuzzy│
//! └──────────────┘   └─────────────┘   └────────────┬─────────────┘
//!                                                   │
//!                          ┌────────────────────────┤
//!                          ▼                        ▼
//!                   ┌─────────────┐          ┌─────────────┐
//!                   │ Dispatcher  │          │  CLI (ask,  │
//!                   │ ls/mount/cat│          │ suggest...) │
//!                   └─────────────┘          └─────────────┘
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing and vocabulary overrides |
//! | [`corpus`] | Curriculum loading and resolver construction |
//! | [`dispatch`] | Literal terminal commands and session state |
//! | [`format`] | Terminal rendering of results |
//! | [`shell`] | Interactive read-eval-print loop |
//! | [`stats`] | Corpus and index overview |

pub mod config;
pub mod corpus;
pub mod dispatch;
pub mod format;
pub mod shell;
pub mod stats;
