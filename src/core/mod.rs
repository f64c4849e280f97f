//! # Core Application Logic
//!
//! The state machine and everything it drives. It knows nothing about
//! terminals: the TUI adapter feeds it `Action`s and draws `App`.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │                         │
//!                    │  • App / AppState       │
//!                    │  • Action → update()    │
//!                    │    → Effect             │
//!                    └──────┬───────────▲──────┘
//!                Effect::Spawn│          │ result Action
//!                           ▼           │
//!                    ┌──────────────────┴──────┐
//!                    │        Executor         │
//!                    │ config · scanner ·      │
//!                    │ loader · render         │
//!                    └─────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`state`]: `App`, `AppState` and the in-flight ticket table
//! - [`action`]: `Action`, `Command`, `Effect` and the `update()` reducer
//! - [`executor`]: runs commands as tokio tasks
//! - [`config`], [`scanner`], [`loader`], [`render`]: the side-effecting leaves
//! - [`error`]: the error taxonomy

pub mod action;
pub mod config;
pub mod error;
pub mod executor;
pub mod loader;
pub mod render;
pub mod scanner;
pub mod state;
