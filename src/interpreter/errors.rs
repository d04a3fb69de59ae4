//! Error types for the Intcode machine
//!
//! This module defines [`VmError`], which represents every fatal condition the
//! machine can hit while executing, plus the errors of the two hosts layered
//! on top of it: [`HistoryError`] for the recording debugger and
//! [`PipelineError`] for chained machines.
//!
//! Running out of input is *not* an error. It is the
//! [`RunState::WaitingForInput`] transition, recoverable by pushing input and
//! calling [`Computer::resume`](super::engine::Computer::resume).
//!
//! All [`VmError`]s are fatal: the current `run()`/`cycle()` call aborts and the
//! machine must be reset before it can be trusted again.

use super::engine::RunState;
use crate::memory::{Address, Word};
use thiserror::Error;

/// Fatal errors raised while decoding or executing an instruction
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VmError {
    /// The low two digits of an instruction word name no registered instruction
    #[error("invalid opcode {opcode} at address {address}")]
    InvalidOpcode { opcode: Word, address: Address },

    /// A parameter mode digit is not 0 (position), 1 (immediate) or 2 (relative)
    #[error("invalid mode {mode} for parameter {parameter} of instruction at address {address}")]
    InvalidParameterMode {
        mode: Word,
        parameter: usize,
        address: Address,
    },

    /// Operation not permitted in the machine's current run state
    #[error("cannot {operation} while {state}")]
    InvalidState {
        state: RunState,
        operation: &'static str,
    },

    /// A resolved operand address or jump target is negative
    #[error("negative address {value}")]
    NegativeAddress { value: Word },

    /// Result does not fit a signed 64-bit word
    #[error("integer overflow in {operation} at address {address}")]
    ArithmeticOverflow {
        operation: &'static str,
        address: Address,
    },
}

/// Errors from stepping through a recorded execution history
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HistoryError {
    #[error("already at the first recorded step")]
    AtStart,

    #[error("already at the last recorded step")]
    AtEnd,

    #[error("snapshot memory limit exceeded: {current} bytes used, limit is {limit}")]
    SnapshotLimitExceeded { current: usize, limit: usize },

    /// Input can only be supplied at the end of history while the machine waits for it
    #[error("machine is not waiting for input")]
    NotAwaitingInput,

    #[error(transparent)]
    Vm(#[from] VmError),
}

/// Errors from driving a chain of machines
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PipelineError {
    #[error("pipeline has no stages")]
    EmptyPipeline,

    #[error("expected {expected} phase settings, got {got}")]
    PhaseCountMismatch { expected: usize, got: usize },

    #[error("stage {stage} produced no output")]
    NoOutput { stage: usize },

    #[error("stage {stage} failed: {source}")]
    Vm {
        stage: usize,
        #[source]
        source: VmError,
    },
}
