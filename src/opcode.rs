//! # opcodes
//!
//! Numbering is fixed by the image format: 0..=26 is the nga core, 27..=29
//! were added by ngb, and 90/91 only exist for the interactive terminal.

use crate::memory::Cell;
use std::fmt;

/// which opcodes the decoder will accept
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstructionSet {
    /// NOP..CJUMP
    Base,
    /// Base plus PUTC and GETC for the raw-mode terminal
    Interactive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Opcode {
    Nop = 0,
    Lit = 1,
    Dup = 2,
    Drop = 3,
    Swap = 4,
    Push = 5,
    Pop = 6,
    Jump = 7,
    Call = 8,
    CCall = 9,
    Return = 10,
    Eq = 11,
    Neq = 12,
    Lt = 13,
    Gt = 14,
    Fetch = 15,
    Store = 16,
    Add = 17,
    Sub = 18,
    Mul = 19,
    DivMod = 20,
    And = 21,
    Or = 22,
    Xor = 23,
    Shift = 24,
    ZRet = 25,
    End = 26,
    In = 27,
    Out = 28,
    CJump = 29,
    PutC = 90,
    GetC = 91,
}

/// base opcodes, indexed by their value
const BASE: [Opcode; 30] = [
    Opcode::Nop,
    Opcode::Lit,
    Opcode::Dup,
    Opcode::Drop,
    Opcode::Swap,
    Opcode::Push,
    Opcode::Pop,
    Opcode::Jump,
    Opcode::Call,
    Opcode::CCall,
    Opcode::Return,
    Opcode::Eq,
    Opcode::Neq,
    Opcode::Lt,
    Opcode::Gt,
    Opcode::Fetch,
    Opcode::Store,
    Opcode::Add,
    Opcode::Sub,
    Opcode::Mul,
    Opcode::DivMod,
    Opcode::And,
    Opcode::Or,
    Opcode::Xor,
    Opcode::Shift,
    Opcode::ZRet,
    Opcode::End,
    Opcode::In,
    Opcode::Out,
    Opcode::CJump,
];

impl Opcode {
    /// number of distinct opcodes, base and extension
    pub const COUNT: usize = BASE.len() + 2;

    /// every opcode, in counter order
    pub fn all() -> impl Iterator<Item = Opcode> {
        BASE.into_iter().chain([Opcode::PutC, Opcode::GetC])
    }

    /// turn a cell into an opcode, if it is one the set knows about
    pub fn decode(value: Cell, set: InstructionSet) -> Option<Opcode> {
        match (value, set) {
            (90, InstructionSet::Interactive) => Some(Opcode::PutC),
            (91, InstructionSet::Interactive) => Some(Opcode::GetC),
            _ => usize::try_from(value).ok().and_then(|v| BASE.get(v).copied()),
        }
    }

    /// dense index, for per-opcode counters
    pub fn index(self) -> usize {
        match self {
            Opcode::PutC => BASE.len(),
            Opcode::GetC => BASE.len() + 1,
            op => op as usize,
        }
    }

    pub fn is_extension(self) -> bool {
        matches!(self, Opcode::PutC | Opcode::GetC)
    }

    pub fn name(self) -> &'static str {
        match self {
            Opcode::Nop => "NOP",
            Opcode::Lit => "LIT",
            Opcode::Dup => "DUP",
            Opcode::Drop => "DROP",
            Opcode::Swap => "SWAP",
            Opcode::Push => "PUSH",
            Opcode::Pop => "POP",
            Opcode::Jump => "JUMP",
            Opcode::Call => "CALL",
            Opcode::CCall => "CCALL",
            Opcode::Return => "RETURN",
            Opcode::Eq => "EQ",
            Opcode::Neq => "NEQ",
            Opcode::Lt => "LT",
            Opcode::Gt => "GT",
            Opcode::Fetch => "FETCH",
            Opcode::Store => "STORE",
            Opcode::Add => "ADD",
            Opcode::Sub => "SUB",
            Opcode::Mul => "MUL",
            Opcode::DivMod => "DIVMOD",
            Opcode::And => "AND",
            Opcode::Or => "OR",
            Opcode::Xor => "XOR",
            Opcode::Shift => "SHIFT",
            Opcode::ZRet => "ZRET",
            Opcode::End => "END",
            Opcode::In => "IN",
            Opcode::Out => "OUT",
            Opcode::CJump => "CJUMP",
            Opcode::PutC => "PUTC",
            Opcode::GetC => "GETC",
        }
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}
