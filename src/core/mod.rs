//! # Core Console Logic
//!
//! Everything here is independent of any terminal library.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • ScrollBuffer         │
//!                    │  • ShutdownFlag         │
//!                    │  • lifecycle reducer    │
//!                    │  • input/display loops  │
//!                    └───────────┬─────────────┘
//!                                │ LineSource / LineSink
//!                                ▼
//!                         ┌────────────┐
//!                         │    TUI     │
//!                         │  Adapter   │
//!                         │ (crossterm)│
//!                         └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`state`]: `ScrollBuffer` and `ShutdownFlag`
//! - [`action`]: the `Phase` state machine and its `update()` reducer
//! - [`relay`]: the producer/consumer loops and the seams they run against
//! - [`config`]: layered settings

pub mod action;
pub mod config;
pub mod relay;
pub mod state;
