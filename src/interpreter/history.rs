//! Recorded execution with time travel
//!
//! [`History`] drives a live [`Computer`] one cycle at a time and keeps a
//! [`Snapshot`] after every cycle that changed something. The host can then
//! move backward and forward through the recording without re-executing.
//!
//! Recording stops when the machine halts, faults, or suspends on input. In
//! the last case the host may [`History::supply_input`], which resumes the
//! live machine and extends the recording.

use super::decoder::decode;
use super::engine::{Computer, RunState};
use super::errors::HistoryError;
use crate::memory::Word;
use crate::snapshot::{OutputLog, Snapshot, SnapshotManager};
use tracing::{debug, warn};

pub struct History {
    /// The live machine, always at the state of the last snapshot
    computer: Computer,

    snapshots: SnapshotManager,

    /// Index of the snapshot being viewed
    position: usize,

    /// Complete output transcript of the live machine
    output: OutputLog,

    cycles: u64,

    /// Error that ended recording, if any
    fault: Option<HistoryError>,
}

impl History {
    /// Start a recording of `computer` bounded to `snapshot_limit` bytes
    ///
    /// Only the initial state is captured; call [`History::record`] to execute.
    pub fn new(computer: Computer, snapshot_limit: usize) -> Result<Self, HistoryError> {
        let output = OutputLog::new();
        let mut snapshots = SnapshotManager::new(snapshot_limit);
        snapshots.push(Snapshot::capture(&computer, &output, None, 0))?;

        Ok(History {
            computer,
            snapshots,
            position: 0,
            output,
            cycles: 0,
            fault: None,
        })
    }

    /// Execute and record until the machine halts, faults or needs input
    pub fn record(&mut self) -> Result<RunState, HistoryError> {
        if let Some(fault) = &self.fault {
            return Err(fault.clone());
        }

        while self.can_advance() {
            self.record_cycle()?;
        }

        debug!(
            snapshots = self.snapshots.len(),
            bytes = self.snapshots.memory_usage(),
            state = %self.computer.state(),
            "recording stopped"
        );
        Ok(self.computer.state())
    }

    fn can_advance(&self) -> bool {
        match self.computer.state() {
            RunState::Running => true,
            RunState::WaitingForInput => self.computer.input_len() > 0,
            RunState::Halted => false,
        }
    }

    fn record_cycle(&mut self) -> Result<(), HistoryError> {
        let pc = self.computer.pc();
        let instruction = decode(self.computer.memory().read(pc), pc).ok();

        let state = match self.computer.step() {
            Ok(state) => state,
            Err(e) => return Err(self.fail(e.into())),
        };

        // A blocked input instruction leaves no trace worth recording
        if state == RunState::WaitingForInput {
            return Ok(());
        }

        self.cycles += 1;
        for value in self.computer.drain_output() {
            self.output.record(value, self.cycles);
        }

        let snapshot = Snapshot::capture(&self.computer, &self.output, instruction, self.cycles);
        if let Err(e) = self.snapshots.push(snapshot) {
            return Err(self.fail(e));
        }
        Ok(())
    }

    fn fail(&mut self, error: HistoryError) -> HistoryError {
        warn!(cycle = self.cycles, %error, "recording aborted");
        self.fault = Some(error.clone());
        error
    }

    /// Feed one input value to a machine suspended at the end of history
    ///
    /// Recording continues and the view jumps to the new end.
    pub fn supply_input(&mut self, value: Word) -> Result<RunState, HistoryError> {
        if !self.awaiting_input() {
            return Err(HistoryError::NotAwaitingInput);
        }

        self.computer.push_input(value);
        let recorded = self.record();
        self.jump_to_end();
        recorded
    }

    /// Whether the view is at the end and the live machine is blocked on input
    pub fn awaiting_input(&self) -> bool {
        self.is_at_end()
            && self.fault.is_none()
            && self.computer.is_waiting_for_input()
            && self.computer.input_len() == 0
    }

    /// Step forward in history
    pub fn step_forward(&mut self) -> Result<(), HistoryError> {
        if self.position + 1 >= self.snapshots.len() {
            return Err(HistoryError::AtEnd);
        }
        self.position += 1;
        Ok(())
    }

    /// Step backward in history
    pub fn step_backward(&mut self) -> Result<(), HistoryError> {
        if self.position == 0 {
            return Err(HistoryError::AtStart);
        }
        self.position -= 1;
        Ok(())
    }

    pub fn rewind_to_start(&mut self) {
        self.position = 0;
    }

    pub fn jump_to_end(&mut self) {
        self.position = self.snapshots.len().saturating_sub(1);
    }

    /// The snapshot being viewed
    pub fn current(&self) -> &Snapshot {
        // `new` pushes the initial snapshot and position never passes the end
        &self.snapshots.as_slice()[self.position]
    }

    /// The snapshot just before the one being viewed
    pub fn previous(&self) -> Option<&Snapshot> {
        self.position
            .checked_sub(1)
            .and_then(|i| self.snapshots.get(i))
    }

    pub fn is_at_end(&self) -> bool {
        self.position + 1 >= self.snapshots.len()
    }

    pub fn history_position(&self) -> usize {
        self.position
    }

    pub fn total_snapshots(&self) -> usize {
        self.snapshots.len()
    }

    /// Error that stopped recording, if any
    pub fn fault(&self) -> Option<&HistoryError> {
        self.fault.as_ref()
    }

    /// The live machine
    pub fn computer(&self) -> &Computer {
        &self.computer
    }

    pub fn snapshot_memory_usage(&self) -> usize {
        self.snapshots.memory_usage()
    }

    pub fn snapshot_memory_limit(&self) -> usize {
        self.snapshots.memory_limit()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::errors::VmError;

    const LIMIT: usize = 16 * 1024 * 1024;

    fn recorded(program: Vec<Word>, input: &[Word]) -> History {
        let mut computer = Computer::new(program);
        computer.extend_input(input.iter().copied());
        let mut history = History::new(computer, LIMIT).unwrap();
        history.record().unwrap();
        history.jump_to_end();
        history
    }

    #[test]
    fn test_records_every_cycle() {
        let history = recorded(vec![1, 0, 0, 0, 99], &[]);
        // initial + add + halt
        assert_eq!(history.total_snapshots(), 3);
        assert_eq!(history.computer().state(), RunState::Halted);
    }

    #[test]
    fn test_step_backward_and_forward() {
        let mut history = recorded(vec![1, 0, 0, 0, 99], &[]);
        history.rewind_to_start();
        assert_eq!(history.current().memory.read(0), 1);
        assert_eq!(history.step_backward(), Err(HistoryError::AtStart));

        history.step_forward().unwrap();
        assert_eq!(history.current().memory.read(0), 2);
        assert_eq!(history.current().pc, 4);
        assert_eq!(
            history.current().instruction.map(|i| i.opcode),
            Some(crate::interpreter::decoder::Opcode::Add)
        );
        assert_eq!(history.previous().map(|s| s.pc), Some(0));

        history.step_forward().unwrap();
        assert_eq!(history.current().state, RunState::Halted);
        assert_eq!(history.step_forward(), Err(HistoryError::AtEnd));
    }

    #[test]
    fn test_output_transcript() {
        let history = recorded(vec![104, 7, 104, 8, 99], &[]);
        assert_eq!(history.current().output.values(), vec![7, 8]);
        assert_eq!(history.current().output.lines[0].cycle, 1);
    }

    #[test]
    fn test_supply_input_extends_history() {
        let mut history = recorded(vec![3, 0, 4, 0, 99], &[]);
        assert_eq!(history.total_snapshots(), 1);
        assert!(history.awaiting_input());

        let state = history.supply_input(42).unwrap();
        assert_eq!(state, RunState::Halted);
        assert!(history.is_at_end());
        assert_eq!(history.current().output.values(), vec![42]);
        assert_eq!(history.supply_input(1), Err(HistoryError::NotAwaitingInput));
    }

    #[test]
    fn test_supply_input_requires_end_of_history() {
        let mut history = recorded(vec![3, 0, 3, 1, 99], &[5]);
        assert!(history.awaiting_input());
        history.rewind_to_start();
        assert!(!history.awaiting_input());
        assert_eq!(history.supply_input(1), Err(HistoryError::NotAwaitingInput));
    }

    #[test]
    fn test_fault_stops_recording() {
        let computer = Computer::new(vec![1, 0, 0, 0, 42]);
        let mut history = History::new(computer, LIMIT).unwrap();
        let err = history.record().unwrap_err();
        assert_eq!(
            err,
            HistoryError::Vm(VmError::InvalidOpcode {
                opcode: 42,
                address: 4
            })
        );
        assert_eq!(history.fault(), Some(&err));
        assert_eq!(history.total_snapshots(), 2);
        assert_eq!(history.record(), Err(err));
    }

    #[test]
    fn test_snapshot_limit() {
        let computer = Computer::new(vec![1105, 1, 0]);
        let initial = Snapshot::capture(&computer, &OutputLog::new(), None, 0);
        let mut history = History::new(computer, initial.estimated_size() * 10).unwrap();
        assert!(matches!(
            history.record(),
            Err(HistoryError::SnapshotLimitExceeded { .. })
        ));
        assert_eq!(history.total_snapshots(), 10);
    }
}
