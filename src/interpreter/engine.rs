// Execution engine for the Intcode machine

use super::decoder::{decode, Instruction, Opcode, ParameterMode, MAX_PARAMETERS};
use super::errors::VmError;
use crate::memory::{to_address, Address, Memory, Word};
use crate::program::Program;
use std::collections::VecDeque;
use std::fmt;
use tracing::{debug, trace};

/// Execution state of a [`Computer`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RunState {
    #[default]
    Running,
    /// Suspended on an input instruction with an empty input queue
    WaitingForInput,
    /// Terminal; only `reset()`/`load()` leave this state
    Halted,
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunState::Running => write!(f, "running"),
            RunState::WaitingForInput => write!(f, "waiting for input"),
            RunState::Halted => write!(f, "halted"),
        }
    }
}

/// Per-cycle scratch pad plus the persistent relative base
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Registers {
    /// Resolved operand addresses of the current instruction
    pub operands: [Address; MAX_PARAMETERS],
    /// Offset added to relative-mode parameters; changed only by `ARB`
    pub relative_base: Word,
}

/// An Intcode virtual machine
///
/// Each instance owns its memory, program counter, relative base and I/O
/// queues exclusively. Hosts that need several machines build several
/// instances and move values between them.
#[derive(Debug, Clone)]
pub struct Computer {
    /// Immutable template re-copied into memory on every reset
    program: Program,

    memory: Memory,

    /// Address of the next instruction word
    pc: Address,

    registers: Registers,

    input: VecDeque<Word>,
    output: Vec<Word>,

    state: RunState,
}

impl Computer {
    /// Create a machine primed with `program`, ready to run
    pub fn new(program: impl Into<Program>) -> Self {
        let program = program.into();
        Computer {
            memory: Memory::new(&program),
            program,
            pc: 0,
            registers: Registers::default(),
            input: VecDeque::new(),
            output: Vec::new(),
            state: RunState::Running,
        }
    }

    /// Replace the stored program and reset
    pub fn load(&mut self, program: impl Into<Program>) {
        self.program = program.into();
        self.reset();
    }

    /// Restore the machine to its freshly loaded state
    ///
    /// Memory is re-seeded from the stored program (extended memory is
    /// dropped), the PC and relative base return to 0, both queues are
    /// emptied and the state goes back to `Running`.
    pub fn reset(&mut self) {
        self.memory.reseed(&self.program);
        self.pc = 0;
        self.registers = Registers::default();
        self.input.clear();
        self.output.clear();
        self.state = RunState::Running;
        debug!(words = self.program.len(), "reset");
    }

    /// Append a value to the input queue
    ///
    /// Valid in any state; it never resumes execution by itself.
    pub fn push_input(&mut self, value: Word) {
        self.input.push_back(value);
    }

    /// Append several values to the input queue, in order
    pub fn extend_input(&mut self, values: impl IntoIterator<Item = Word>) {
        self.input.extend(values);
    }

    /// Take every buffered output value, oldest first
    pub fn drain_output(&mut self) -> Vec<Word> {
        std::mem::take(&mut self.output)
    }

    /// Cycle until the machine halts or blocks on input
    ///
    /// Stopping on `WaitingForInput` is not an error; the returned state tells
    /// the host which one happened. Calling `run()` on a machine that is not
    /// `Running` returns its state without executing anything.
    pub fn run(&mut self) -> Result<RunState, VmError> {
        while self.state == RunState::Running {
            self.cycle()?;
        }
        debug!(pc = self.pc, state = %self.state, "stopped");
        Ok(self.state)
    }

    /// Continue a machine suspended on input
    ///
    /// Resuming a halted machine is a caller bug and fails with
    /// [`VmError::InvalidState`].
    pub fn resume(&mut self) -> Result<RunState, VmError> {
        match self.state {
            RunState::Halted => Err(VmError::InvalidState {
                state: self.state,
                operation: "resume",
            }),
            RunState::WaitingForInput => {
                debug!(pc = self.pc, pending = self.input.len(), "resuming");
                self.state = RunState::Running;
                self.run()
            }
            RunState::Running => self.run(),
        }
    }

    /// Execute at most one instruction, waking a machine suspended on input
    ///
    /// This is `resume()` for single-stepping hosts. With the input queue
    /// still empty the machine simply suspends again.
    pub fn step(&mut self) -> Result<RunState, VmError> {
        if self.state == RunState::WaitingForInput {
            self.state = RunState::Running;
        }
        self.cycle()
    }

    /// Execute exactly one instruction
    pub fn cycle(&mut self) -> Result<RunState, VmError> {
        if self.state != RunState::Running {
            return Err(VmError::InvalidState {
                state: self.state,
                operation: "cycle",
            });
        }

        let instruction = self.pull_instruction()?;
        self.load_registers(&instruction)?;

        trace!(
            pc = instruction.address,
            op = %instruction.opcode,
            modes = ?instruction.parameter_modes(),
            registers = ?&self.registers.operands[..instruction.opcode.parameter_count()],
            relative_base = self.registers.relative_base,
            "cycle"
        );

        self.execute(&instruction)?;
        Ok(self.state)
    }

    /// Fetch and decode the word at the PC, advancing past it
    fn pull_instruction(&mut self) -> Result<Instruction, VmError> {
        let address = self.pc;
        let instruction = decode(self.pc_pull(), address)?;
        Ok(instruction)
    }

    /// Read the word at the PC and advance by one
    fn pc_pull(&mut self) -> Word {
        let word = self.memory.read(self.pc);
        self.pc += 1;
        word
    }

    /// Resolve each parameter word into an operand address
    fn load_registers(&mut self, instruction: &Instruction) -> Result<(), VmError> {
        for (i, &mode) in instruction.parameter_modes().iter().enumerate() {
            self.registers.operands[i] =
                self.resolve_operand(mode, instruction.is_write_target(i), instruction.address)?;
        }
        Ok(())
    }

    /// Turn the next parameter word into the address its operand lives at
    ///
    /// A write target never dereferences twice: in position or immediate mode
    /// the parameter word itself is the destination.
    fn resolve_operand(
        &mut self,
        mode: ParameterMode,
        write_target: bool,
        instruction_address: Address,
    ) -> Result<Address, VmError> {
        let slot = self.pc;
        let word = self.pc_pull();
        match (mode, write_target) {
            (ParameterMode::Immediate, false) => Ok(slot),
            (ParameterMode::Position, _) | (ParameterMode::Immediate, true) => to_address(word),
            (ParameterMode::Relative, _) => {
                let target = word.checked_add(self.registers.relative_base).ok_or(
                    VmError::ArithmeticOverflow {
                        operation: "relative address",
                        address: instruction_address,
                    },
                )?;
                to_address(target)
            }
        }
    }

    /// Value of operand `i` of the current instruction
    fn operand(&self, i: usize) -> Word {
        self.memory.read(self.registers.operands[i])
    }

    fn store(&mut self, i: usize, value: Word) {
        self.memory.write(self.registers.operands[i], value);
    }

    fn execute(&mut self, instruction: &Instruction) -> Result<(), VmError> {
        let overflow = |operation: &'static str| VmError::ArithmeticOverflow {
            operation,
            address: instruction.address,
        };

        match instruction.opcode {
            Opcode::Add => {
                let sum = self
                    .operand(0)
                    .checked_add(self.operand(1))
                    .ok_or_else(|| overflow("add"))?;
                self.store(2, sum);
            }
            Opcode::Multiply => {
                let product = self
                    .operand(0)
                    .checked_mul(self.operand(1))
                    .ok_or_else(|| overflow("multiply"))?;
                self.store(2, product);
            }
            Opcode::Input => match self.input.pop_front() {
                Some(value) => self.store(0, value),
                None => {
                    // Point back at the instruction word so resume() retries it
                    self.pc -= 2;
                    self.state = RunState::WaitingForInput;
                    debug!(pc = self.pc, "waiting for input");
                }
            },
            Opcode::Output => {
                let value = self.operand(0);
                self.output.push(value);
            }
            Opcode::JumpIfTrue => {
                if self.operand(0) != 0 {
                    self.pc = to_address(self.operand(1))?;
                }
            }
            Opcode::JumpIfFalse => {
                if self.operand(0) == 0 {
                    self.pc = to_address(self.operand(1))?;
                }
            }
            Opcode::LessThan => {
                let result = Word::from(self.operand(0) < self.operand(1));
                self.store(2, result);
            }
            Opcode::Equals => {
                let result = Word::from(self.operand(0) == self.operand(1));
                self.store(2, result);
            }
            Opcode::AdjustRelativeBase => {
                self.registers.relative_base = self
                    .registers
                    .relative_base
                    .checked_add(self.operand(0))
                    .ok_or_else(|| overflow("relative base adjustment"))?;
            }
            Opcode::Halt => {
                self.state = RunState::Halted;
                debug!(pc = instruction.address, "halted");
            }
        }
        Ok(())
    }

    // Introspection

    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    /// The stored program template
    pub fn program(&self) -> &Program {
        &self.program
    }

    pub fn pc(&self) -> Address {
        self.pc
    }

    pub fn relative_base(&self) -> Word {
        self.registers.relative_base
    }

    pub fn registers(&self) -> &Registers {
        &self.registers
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn is_halted(&self) -> bool {
        self.state == RunState::Halted
    }

    pub fn is_waiting_for_input(&self) -> bool {
        self.state == RunState::WaitingForInput
    }

    /// Number of output values not yet drained
    pub fn output_len(&self) -> usize {
        self.output.len()
    }

    /// Input values not yet consumed, front first
    pub fn pending_input(&self) -> impl Iterator<Item = Word> + '_ {
        self.input.iter().copied()
    }

    pub fn input_len(&self) -> usize {
        self.input.len()
    }
}
