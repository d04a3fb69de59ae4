//! Chained machines
//!
//! A [`Pipeline`] runs N independent [`Computer`]s built from the same program,
//! feeding each stage's output into the next stage's input. Nothing runs
//! concurrently: the pipeline is an ordinary host loop that drains one
//! machine, pushes into the next, and resumes it.
//!
//! ```text
//!  signal ─▶ [0] ─▶ [1] ─▶ ... ─▶ [N-1] ─▶ result
//!             ▲                     │
//!             └──── feedback mode ──┘
//! ```

use crate::interpreter::engine::{Computer, RunState};
use crate::interpreter::errors::PipelineError;
use crate::memory::Word;
use crate::program::Program;
use tracing::debug;

pub struct Pipeline {
    stages: Vec<Computer>,
}

impl Pipeline {
    /// Build `stages` machines, each primed with its own copy of `program`
    pub fn new(program: impl Into<Program>, stages: usize) -> Result<Self, PipelineError> {
        if stages == 0 {
            return Err(PipelineError::EmptyPipeline);
        }
        let program = program.into();
        Ok(Pipeline {
            stages: (0..stages).map(|_| Computer::new(program.clone())).collect(),
        })
    }

    /// Load a new program into every stage
    pub fn load(&mut self, program: impl Into<Program>) {
        let program = program.into();
        for stage in &mut self.stages {
            stage.load(program.clone());
        }
    }

    /// Reset every stage to its freshly loaded state
    pub fn reset(&mut self) {
        for stage in &mut self.stages {
            stage.reset();
        }
    }

    /// Queue one phase setting as the first input of each stage
    pub fn set_phases(&mut self, phases: &[Word]) -> Result<(), PipelineError> {
        if phases.len() != self.stages.len() {
            return Err(PipelineError::PhaseCountMismatch {
                expected: self.stages.len(),
                got: phases.len(),
            });
        }
        for (stage, &phase) in self.stages.iter_mut().zip(phases) {
            stage.push_input(phase);
        }
        Ok(())
    }

    /// Pass `signal` through every stage once, in order
    ///
    /// Each stage runs until it halts or blocks; its last output becomes the
    /// next stage's input. Returns the last stage's final output.
    pub fn run_series(&mut self, signal: Word) -> Result<Word, PipelineError> {
        let mut signal = signal;
        for (index, stage) in self.stages.iter_mut().enumerate() {
            signal = Self::advance(index, stage, signal)?
                .ok_or(PipelineError::NoOutput { stage: index })?;
        }
        Ok(signal)
    }

    /// Loop `signal` through the stages, last feeding first, until the last halts
    ///
    /// Returns the last value the final stage produced. If a stage halts
    /// without producing output the loop ends early with the previous result.
    pub fn run_feedback(&mut self, signal: Word) -> Result<Word, PipelineError> {
        let mut signal = signal;
        let mut result = signal;
        let last = self.stages.len() - 1;

        for round in 1.. {
            for (index, stage) in self.stages.iter_mut().enumerate() {
                signal = match Self::advance(index, stage, signal)? {
                    Some(value) => value,
                    None => {
                        debug!(round, stage = index, "feedback ended without output");
                        return Ok(result);
                    }
                };
            }
            result = signal;

            if self.stages[last].is_halted() {
                debug!(round, result, "feedback loop halted");
                break;
            }
        }
        Ok(result)
    }

    /// Deliver `signal` to one stage and run it until it stops
    fn advance(
        index: usize,
        stage: &mut Computer,
        signal: Word,
    ) -> Result<Option<Word>, PipelineError> {
        stage.push_input(signal);
        let state = stage
            .resume()
            .map_err(|source| PipelineError::Vm { stage: index, source })?;
        let output = stage.drain_output();
        debug!(stage = index, %state, produced = output.len(), "stage stopped");
        Ok(output.last().copied())
    }

    pub fn stages(&self) -> &[Computer] {
        &self.stages
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Whether every stage has halted
    pub fn is_halted(&self) -> bool {
        self.stages.iter().all(|s| s.state() == RunState::Halted)
    }
}
