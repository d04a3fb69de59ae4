//! Instruction decoding
//!
//! An instruction word packs an opcode and up to three parameter modes in
//! decimal:
//!
//! ```text
//!   ABCDE
//!     DE  opcode (word mod 100)
//!    C    mode of parameter 1
//!   B     mode of parameter 2
//!  A      mode of parameter 3
//! ```
//!
//! Missing digits are mode 0. Decoding only inspects the instruction word;
//! the parameter words that follow it are consumed later, one at a time, when
//! the engine resolves operand addresses.

use super::errors::VmError;
use crate::memory::{Address, Memory, Word};
use std::fmt;

/// Largest parameter count of any instruction
pub const MAX_PARAMETERS: usize = 3;

/// The closed Intcode instruction set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Opcode {
    /// `c ← a + b`
    Add = 1,
    /// `c ← a * b`
    Multiply = 2,
    /// `a ← next input`, or suspend if the input queue is empty
    Input = 3,
    /// `output ← a`
    Output = 4,
    /// `if a != 0 { pc ← b }`
    JumpIfTrue = 5,
    /// `if a == 0 { pc ← b }`
    JumpIfFalse = 6,
    /// `c ← (a < b) as word`
    LessThan = 7,
    /// `c ← (a == b) as word`
    Equals = 8,
    /// `relative_base ← relative_base + a`
    AdjustRelativeBase = 9,
    /// Stop the machine
    Halt = 99,
}

impl Opcode {
    /// Every registered instruction, in opcode order
    pub const ALL: [Opcode; 10] = [
        Opcode::Add,
        Opcode::Multiply,
        Opcode::Input,
        Opcode::Output,
        Opcode::JumpIfTrue,
        Opcode::JumpIfFalse,
        Opcode::LessThan,
        Opcode::Equals,
        Opcode::AdjustRelativeBase,
        Opcode::Halt,
    ];

    /// Look up an opcode by its integer value
    pub fn from_code(code: Word) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.code() == code)
    }

    pub fn code(self) -> Word {
        self as Word
    }

    /// Number of parameter words following the instruction word
    pub fn parameter_count(self) -> usize {
        match self {
            Opcode::Add | Opcode::Multiply | Opcode::LessThan | Opcode::Equals => 3,
            Opcode::JumpIfTrue | Opcode::JumpIfFalse => 2,
            Opcode::Input | Opcode::Output | Opcode::AdjustRelativeBase => 1,
            Opcode::Halt => 0,
        }
    }

    /// Whether the last parameter is an address to store a result at
    pub fn writes_to_memory(self) -> bool {
        matches!(
            self,
            Opcode::Add | Opcode::Multiply | Opcode::Input | Opcode::LessThan | Opcode::Equals
        )
    }

    pub fn mnemonic(self) -> &'static str {
        match self {
            Opcode::Add => "ADD",
            Opcode::Multiply => "MUL",
            Opcode::Input => "IN",
            Opcode::Output => "OUT",
            Opcode::JumpIfTrue => "JNZ",
            Opcode::JumpIfFalse => "JZ",
            Opcode::LessThan => "LT",
            Opcode::Equals => "EQ",
            Opcode::AdjustRelativeBase => "ARB",
            Opcode::Halt => "HLT",
        }
    }

    /// Human-readable name
    pub fn description(self) -> &'static str {
        match self {
            Opcode::Add => "Add",
            Opcode::Multiply => "Multiply",
            Opcode::Input => "Input",
            Opcode::Output => "Output",
            Opcode::JumpIfTrue => "Jump if true",
            Opcode::JumpIfFalse => "Jump if false",
            Opcode::LessThan => "Less than",
            Opcode::Equals => "Equals",
            Opcode::AdjustRelativeBase => "Adjust relative base",
            Opcode::Halt => "Halt",
        }
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}

/// How a parameter word is turned into an operand address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ParameterMode {
    /// The word is the address of the operand
    #[default]
    Position = 0,
    /// The word is the operand itself (read-only operands)
    Immediate = 1,
    /// The word is an offset from the relative base
    Relative = 2,
}

impl ParameterMode {
    pub fn from_digit(digit: Word) -> Option<Self> {
        match digit {
            0 => Some(ParameterMode::Position),
            1 => Some(ParameterMode::Immediate),
            2 => Some(ParameterMode::Relative),
            _ => None,
        }
    }

    /// Render a raw parameter word in this mode
    pub fn format_operand(self, word: Word) -> String {
        match self {
            ParameterMode::Position => format!("[{}]", word),
            ParameterMode::Immediate => format!("#{}", word),
            ParameterMode::Relative => format!("rb[{:+}]", word),
        }
    }
}

/// A decoded instruction word
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Instruction {
    pub opcode: Opcode,
    /// Modes of parameters 1..=3; unused slots are `Position`
    pub modes: [ParameterMode; MAX_PARAMETERS],
    /// Address the instruction word was fetched from
    pub address: Address,
}

impl Instruction {
    /// Parameter modes actually used by this instruction
    pub fn parameter_modes(&self) -> &[ParameterMode] {
        &self.modes[..self.opcode.parameter_count()]
    }

    /// Whether parameter `index` (0-based) is the write target
    pub fn is_write_target(&self, index: usize) -> bool {
        self.opcode.writes_to_memory() && index + 1 == self.opcode.parameter_count()
    }

    /// Total words occupied, instruction word included
    pub fn word_count(&self) -> usize {
        1 + self.opcode.parameter_count()
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.opcode)?;
        for (i, mode) in self.parameter_modes().iter().enumerate() {
            let sep = if i == 0 { " " } else { ", " };
            let tag = match mode {
                ParameterMode::Position => "pos",
                ParameterMode::Immediate => "imm",
                ParameterMode::Relative => "rel",
            };
            write!(f, "{}{}", sep, tag)?;
        }
        Ok(())
    }
}

/// Decode the instruction word `word` fetched from `address`
///
/// Only the mode digits of parameters the opcode actually takes are
/// validated; higher digits are ignored.
pub fn decode(word: Word, address: Address) -> Result<Instruction, VmError> {
    let opcode = Opcode::from_code(word % 100).ok_or(VmError::InvalidOpcode {
        opcode: word % 100,
        address,
    })?;

    let mut modes = [ParameterMode::Position; MAX_PARAMETERS];
    let mut digits = word / 100;
    for (parameter, slot) in modes.iter_mut().enumerate().take(opcode.parameter_count()) {
        let mode = digits % 10;
        *slot = ParameterMode::from_digit(mode).ok_or(VmError::InvalidParameterMode {
            mode,
            parameter: parameter + 1,
            address,
        })?;
        digits /= 10;
    }

    Ok(Instruction {
        opcode,
        modes,
        address,
    })
}

/// One line of a disassembly listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Disassembly {
    pub address: Address,
    pub text: String,
    /// Words covered by this line
    pub len: usize,
}

/// Render the instruction stored at `address` without executing it
///
/// Words that do not decode are shown as `DATA` and cover a single word.
pub fn disassemble(memory: &Memory, address: Address) -> Disassembly {
    let word = memory.read(address);
    match decode(word, address) {
        Ok(instruction) => {
            let operands: Vec<String> = instruction
                .parameter_modes()
                .iter()
                .enumerate()
                .map(|(i, mode)| mode.format_operand(memory.read(address + 1 + i as Address)))
                .collect();
            let text = if operands.is_empty() {
                instruction.opcode.mnemonic().to_string()
            } else {
                format!("{:<4}{}", instruction.opcode.mnemonic(), operands.join(", "))
            };
            Disassembly {
                address,
                text,
                len: instruction.word_count(),
            }
        }
        Err(_) => Disassembly {
            address,
            text: format!("DATA {}", word),
            len: 1,
        },
    }
}

/// Linear-sweep disassembly of the words in `range`
pub fn disassemble_range(memory: &Memory, start: Address, end: Address) -> Vec<Disassembly> {
    let mut lines = Vec::new();
    let mut address = start;
    while address < end {
        let line = disassemble(memory, address);
        address += line.len as Address;
        lines.push(line);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_position_defaults() {
        let instruction = decode(2, 0).unwrap();
        assert_eq!(instruction.opcode, Opcode::Multiply);
        assert_eq!(instruction.modes, [ParameterMode::Position; 3]);
    }

    #[test]
    fn test_decode_mixed_modes() {
        let instruction = decode(1002, 4).unwrap();
        assert_eq!(instruction.opcode, Opcode::Multiply);
        assert_eq!(
            instruction.modes,
            [
                ParameterMode::Position,
                ParameterMode::Immediate,
                ParameterMode::Position
            ]
        );
        assert_eq!(instruction.address, 4);

        let instruction = decode(21101, 0).unwrap();
        assert_eq!(
            instruction.modes,
            [
                ParameterMode::Immediate,
                ParameterMode::Immediate,
                ParameterMode::Relative
            ]
        );
    }

    #[test]
    fn test_decode_invalid_opcode() {
        assert_eq!(
            decode(42, 7),
            Err(VmError::InvalidOpcode {
                opcode: 42,
                address: 7
            })
        );
        assert!(matches!(
            decode(-1, 0),
            Err(VmError::InvalidOpcode { opcode: -1, .. })
        ));
    }

    #[test]
    fn test_decode_invalid_mode() {
        assert_eq!(
            decode(301, 2),
            Err(VmError::InvalidParameterMode {
                mode: 3,
                parameter: 1,
                address: 2
            })
        );
    }

    #[test]
    fn test_unused_mode_digits_ignored() {
        // Output takes one parameter; the 9 sits in parameter 2's slot
        let instruction = decode(9104, 0).unwrap();
        assert_eq!(instruction.opcode, Opcode::Output);
        assert_eq!(instruction.parameter_modes(), &[ParameterMode::Immediate]);
    }

    #[test]
    fn test_write_target() {
        let add = decode(1, 0).unwrap();
        assert!(add.is_write_target(2));
        assert!(!add.is_write_target(1));
        let jump = decode(5, 0).unwrap();
        assert!(!jump.is_write_target(1));
    }

    #[test]
    fn test_opcode_table() {
        for op in Opcode::ALL {
            assert_eq!(Opcode::from_code(op.code()), Some(op));
        }
        assert_eq!(Opcode::from_code(0), None);
    }

    #[test]
    fn test_disassemble() {
        let memory = Memory::new(&[1101, 100, -1, 4, 0, 99]);
        let line = disassemble(&memory, 0);
        assert_eq!(line.text, "ADD #100, #-1, [4]");
        assert_eq!(line.len, 4);

        let listing = disassemble_range(&memory, 0, 6);
        assert_eq!(listing.len(), 3);
        assert_eq!(listing[1].text, "DATA 0");
        assert_eq!(listing[2].text, "HLT");
    }

    #[test]
    fn test_disassemble_relative() {
        let memory = Memory::new(&[204, -1]);
        assert_eq!(disassemble(&memory, 0).text, "OUT rb[-1]");
    }
}
