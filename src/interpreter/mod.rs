//! Intcode execution engine
//!
//! This module provides the machine itself and the tooling built on it:
//! - [`decoder`]: Opcodes, parameter modes, instruction decoding and disassembly
//! - [`engine`]: The [`Computer`](engine::Computer) fetch-decode-execute loop
//! - [`errors`]: Error types for the machine and its hosts
//! - [`history`]: Per-cycle recording with step backward/forward
//!
//! # Execution Model
//!
//! The machine executes one instruction per cycle until it halts or an input
//! instruction finds the input queue empty. In the latter case the program
//! counter is rolled back onto the input instruction and the machine reports
//! `WaitingForInput`, handing control back to the host. The host pushes more
//! input and calls `resume()`; the input instruction then runs again as if it
//! had never blocked.

pub mod decoder;
pub mod engine;
pub mod errors;
pub mod history;
