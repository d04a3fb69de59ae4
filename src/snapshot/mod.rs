// Snapshot management for reverse execution

use crate::interpreter::decoder::Instruction;
use crate::interpreter::engine::{Computer, RunState};
use crate::interpreter::errors::HistoryError;
use crate::memory::{Address, Memory, Word};

/// Everything the machine has output so far, tagged with the producing cycle
///
/// The machine's own output queue is drained by the host; this log keeps the
/// full transcript so earlier snapshots can show what had been printed.
#[derive(Debug, Clone, Default)]
pub struct OutputLog {
    pub lines: Vec<OutputLine>,
}

impl OutputLog {
    pub fn new() -> Self {
        OutputLog { lines: Vec::new() }
    }

    pub fn record(&mut self, value: Word, cycle: u64) {
        self.lines.push(OutputLine { value, cycle });
    }

    /// Output values in the order they were produced
    pub fn values(&self) -> Vec<Word> {
        self.lines.iter().map(|line| line.value).collect()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// One output value with the cycle that produced it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputLine {
    pub value: Word,
    pub cycle: u64,
}

/// Snapshot of machine state after a cycle
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub memory: Memory,
    pub pc: Address,
    pub relative_base: Word,
    pub state: RunState,
    pub pending_input: Vec<Word>,
    pub output: OutputLog,
    /// Instruction executed to reach this state (`None` for the initial snapshot)
    pub instruction: Option<Instruction>,
    /// Cycles executed since reset
    pub cycle: u64,
}

impl Snapshot {
    /// Capture the observable state of `computer`
    pub fn capture(
        computer: &Computer,
        output: &OutputLog,
        instruction: Option<Instruction>,
        cycle: u64,
    ) -> Self {
        Snapshot {
            memory: computer.memory().clone(),
            pc: computer.pc(),
            relative_base: computer.relative_base(),
            state: computer.state(),
            pending_input: computer.pending_input().collect(),
            output: output.clone(),
            instruction,
            cycle,
        }
    }

    /// Estimate the memory usage of this snapshot in bytes
    pub fn estimated_size(&self) -> usize {
        let word = std::mem::size_of::<Word>();
        self.memory.estimated_size()
            + self.pending_input.len() * word
            + self.output.len() * std::mem::size_of::<OutputLine>()
            + std::mem::size_of::<Self>()
    }
}

/// Manages execution history for reverse execution
#[derive(Debug)]
pub struct SnapshotManager {
    snapshots: Vec<Snapshot>,
    max_memory: usize,
    current_memory: usize,
}

impl SnapshotManager {
    pub fn new(max_memory: usize) -> Self {
        SnapshotManager {
            snapshots: Vec::new(),
            max_memory,
            current_memory: 0,
        }
    }

    /// Add a snapshot to history
    pub fn push(&mut self, snapshot: Snapshot) -> Result<(), HistoryError> {
        let snapshot_size = snapshot.estimated_size();

        if self.current_memory + snapshot_size > self.max_memory {
            return Err(HistoryError::SnapshotLimitExceeded {
                current: self.current_memory + snapshot_size,
                limit: self.max_memory,
            });
        }

        self.current_memory += snapshot_size;
        self.snapshots.push(snapshot);
        Ok(())
    }

    /// Get a snapshot by index
    pub fn get(&self, index: usize) -> Option<&Snapshot> {
        self.snapshots.get(index)
    }

    pub fn as_slice(&self) -> &[Snapshot] {
        &self.snapshots
    }

    /// Get the number of snapshots
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Get current memory usage
    pub fn memory_usage(&self) -> usize {
        self.current_memory
    }

    pub fn memory_limit(&self) -> usize {
        self.max_memory
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot_of(program: Vec<Word>) -> Snapshot {
        let computer = Computer::new(program);
        Snapshot::capture(&computer, &OutputLog::new(), None, 0)
    }

    #[test]
    fn test_capture() {
        let mut computer = Computer::new(vec![3, 0, 99]);
        computer.push_input(5);
        let snapshot = Snapshot::capture(&computer, &OutputLog::new(), None, 0);
        assert_eq!(snapshot.pc, 0);
        assert_eq!(snapshot.state, RunState::Running);
        assert_eq!(snapshot.pending_input, vec![5]);
        assert_eq!(snapshot.memory.dense(), &[3, 0, 99]);
    }

    #[test]
    fn test_manager_tracks_memory() {
        let mut manager = SnapshotManager::new(1024 * 1024);
        let snapshot = snapshot_of(vec![99]);
        let size = snapshot.estimated_size();
        manager.push(snapshot.clone()).unwrap();
        manager.push(snapshot).unwrap();
        assert_eq!(manager.len(), 2);
        assert_eq!(manager.memory_usage(), size * 2);
    }

    #[test]
    fn test_manager_limit() {
        let snapshot = snapshot_of(vec![1, 0, 0, 0, 99]);
        let mut manager = SnapshotManager::new(snapshot.estimated_size());
        manager.push(snapshot.clone()).unwrap();
        assert!(matches!(
            manager.push(snapshot),
            Err(HistoryError::SnapshotLimitExceeded { .. })
        ));
        assert_eq!(manager.len(), 1);
    }

    #[test]
    fn test_output_log() {
        let mut log = OutputLog::new();
        log.record(7, 3);
        log.record(-1, 9);
        assert_eq!(log.values(), vec![7, -1]);
        assert_eq!(log.lines[1].cycle, 9);
    }
}
