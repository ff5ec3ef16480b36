//! Bang command recognition and dispatch.
//!
//! This module turns chat activity into game responses.
//!
//! # Architecture
//!
//! ```text
//! rendered message ──► MessageScanner ──► BangCommand ──┐
//!                                                       ▼
//! /jenga <subaction> ──► resolve_subaction ───► ResponseDispatcher
//!                                                       │
//!                                     GameHandler ◄─────┤
//!                                                       ▼
//!                                     Host::execute_command (system message)
//! ```
//!
//! # Commands
//!
//! | Token | Sub-action | Description |
//! |-------|------------|-------------|
//! | `!startjenga` | `start` | Start a game |
//! | `!pullblock` | `pull` | Pull a block |
//! | `!placeblock` | `place` | Place a block |
//! | `!resetjenga` | `reset` | Reset game |
//!
//! # Module Organization
//!
//! - [`command`] - the [`BangCommand`] vocabulary and its [`CommandTable`]
//! - [`scanner`] - prefix matching of rendered messages
//! - [`dispatcher`] - game call, personalization and posting
//! - [`registration`] - the `/jenga` host command

mod command;
mod dispatcher;
mod registration;
mod scanner;

pub use crate::commands::command::{BangCommand, CommandTable};
pub use crate::commands::dispatcher::ResponseDispatcher;
pub use crate::commands::registration::{COMMAND_NAME, jenga_command};
pub use crate::commands::scanner::MessageScanner;
