//! # Introduction
//!
//! An Intcode virtual machine: a linear memory of signed 64-bit integers,
//! executed one instruction at a time, with blocking input and buffered
//! output. A terminal step debugger built with
//! [ratatui](https://docs.rs/ratatui) records every cycle and lets you move
//! forward and backward through the execution.
//!
//! ## Architecture
//!
//! ```text
//! Program text → Program → Computer (Memory + Decoder + Engine) → output
//!                                 ↓
//!                       History (Snapshots) → TUI
//! ```
//!
//! 1. [`program`]: parses comma-separated program text into an immutable
//!    [`program::Program`].
//! 2. [`memory`]: the dense-plus-extended word store.
//! 3. [`interpreter`]: decoder, the [`interpreter::engine::Computer`]
//!    itself, and the recording [`interpreter::history::History`].
//! 4. [`snapshot`]: bounded snapshot storage used by the history.
//! 5. [`pipeline`]: runs several machines chained output-to-input.
//! 6. [`ui`]: ratatui-based debugger; not part of the stable library API.
//!
//! ## Instruction set
//!
//! `ADD`(1) `MUL`(2) `IN`(3) `OUT`(4) `JNZ`(5) `JZ`(6) `LT`(7) `EQ`(8)
//! `ARB`(9) `HLT`(99), with position, immediate and relative parameter modes.
//!
//! ```
//! use intcode::interpreter::engine::{Computer, RunState};
//!
//! let mut computer = Computer::new(vec![3, 0, 4, 0, 99]);
//! computer.push_input(42);
//! assert_eq!(computer.run().unwrap(), RunState::Halted);
//! assert_eq!(computer.drain_output(), vec![42]);
//! ```

pub mod interpreter;
pub mod logger;
pub mod memory;
pub mod pipeline;
pub mod program;
pub mod snapshot;
pub mod ui;
