//! # Core Application Logic
//!
//! This module contains promptpad's business logic.
//! It knows nothing about any specific UI technology.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • State (app data)     │
//!                    │  • Action (events)      │
//!                    │  • update() (reducer)   │
//!                    │                         │
//!                    │  No UI. Effects out.    │
//!                    └───────────┬─────────────┘
//!                                │
//!                    ┌───────────┴───────────┐
//!                    ▼                       ▼
//!             ┌────────────┐          ┌────────────┐
//!             │    TUI     │          │ inference  │
//!             │  Adapter   │          │ (provider) │
//!             │ (ratatui)  │          │            │
//!             └────────────┘          └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`state`]: The `App` struct and the request cycle
//! - [`action`]: The `Action` enum, `Effect` enum and `update()`
//! - [`conversation`]: Append-only message log
//! - [`params`]: Model enumeration and generation parameters
//! - [`templates`]: Built-in prompt templates
//! - [`preferences`]: Durable theme storage
//! - [`export`]: JSON export and clipboard copy
//! - [`config`]: Layered configuration

pub mod action;
pub mod config;
pub mod conversation;
pub mod export;
pub mod params;
pub mod preferences;
pub mod state;
pub mod templates;
