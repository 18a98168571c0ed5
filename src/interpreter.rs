//! # interpreter
//!
//! Registers and stacks, as laid out by nga:
//!  - `ip`  instruction pointer, an index into memory
//!  - `sp`  data stack pointer; TOS is `data[sp]`, NOS is `data[sp - 1]`
//!  - `rp`  return stack pointer; TORS is `address[rp]`
//!
//! Both stack pointers start at 0 and slot 0 is never pushed to: the first
//! push lands in slot 1, so an empty stack has `sp == 0`. Slot 0 is still a
//! real cell, and binary operators on a one-deep stack write their result
//! into it.
//!
//! The loop always advances `ip` by one after a handler runs. Handlers that
//! transfer control therefore set `ip` to target - 1. Images depend on this.
use std::io;
use std::path::Path;

use crate::error::{StackKind, VmError};
use crate::input::Input;
use crate::memory::{Cell, MemoryMap, NgbMemoryMap, IMAGE_SIZE};
use crate::opcode::{InstructionSet, Opcode};
use crate::output::Output;
use crate::stats::Statistics;

/// data stack depth
pub const STACK_DEPTH: usize = 32;

/// return stack depth
pub const ADDRESSES: usize = 128;

/// any `ip` at or past this stops the loop
const HALT: Cell = IMAGE_SIZE as Cell;

/// where the machine is after a step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Running,
    Halted,
}

pub struct NgbInterpreter<'a> {
    memory: NgbMemoryMap,
    input: &'a mut dyn Input,
    output: &'a mut dyn Output,
    set: InstructionSet,
    data: [Cell; STACK_DEPTH],
    address: [Cell; ADDRESSES],
    sp: Cell,
    rp: Cell,
    ip: Cell,
    // address of the instruction being executed, for fault reports
    current: Cell,
    stats: Statistics,
}

impl<'a> NgbInterpreter<'a> {
    pub fn new(
        input: &'a mut dyn Input,
        output: &'a mut dyn Output,
        set: InstructionSet,
    ) -> NgbInterpreter<'a> {
        NgbInterpreter {
            memory: NgbMemoryMap::new(),
            input,
            output,
            set,
            data: [0; STACK_DEPTH],
            address: [0; ADDRESSES],
            sp: 0,
            rp: 0,
            ip: 0,
            current: 0,
            stats: Statistics::new(),
        }
    }

    /// load an image from a reader
    pub fn load_program(&mut self, reader: &mut impl io::Read) -> Result<usize, io::Error> {
        self.memory.load_program(reader)
    }

    /// load an image file
    pub fn load_image(&mut self, path: &Path) -> Result<usize, VmError> {
        self.memory.load_image(path)
    }

    /// load cells that are already decoded
    pub fn load_cells(&mut self, cells: &[Cell]) -> usize {
        self.memory.write(cells, 0)
    }

    /// run until halted, or until something faults
    pub fn run(&mut self) -> Result<(), VmError> {
        let result = self.run_to_halt();
        self.output.flush()?;
        if result.is_ok() {
            log::debug!(
                "halted after {} instructions, sp {} rp {}",
                self.stats.total(),
                self.sp,
                self.rp
            );
        }
        result
    }

    fn run_to_halt(&mut self) -> Result<(), VmError> {
        while self.step()? == State::Running {}
        Ok(())
    }

    /// fetch, decode and execute one instruction
    pub fn step(&mut self) -> Result<State, VmError> {
        if self.ip >= HALT {
            return Ok(State::Halted);
        }
        self.current = self.ip;
        let value = self.memory.get_cell(self.ip).ok_or(VmError::OutOfBounds {
            addr: self.ip,
            target: self.ip,
        })?;
        let op = Opcode::decode(value, self.set).ok_or(VmError::InvalidOpcode {
            addr: self.ip,
            opcode: value,
        })?;
        log::trace!("{:>6}: {:<6} sp {} rp {}", self.ip, op, self.sp, self.rp);

        self.stats.record(op);
        self.execute(op)?;
        self.ip = self.ip.wrapping_add(1);
        self.stats.check_max(self.sp, self.rp);

        Ok(if self.ip < HALT {
            State::Running
        } else {
            State::Halted
        })
    }

    fn execute(&mut self, op: Opcode) -> Result<(), VmError> {
        match op {
            Opcode::Nop => Ok(()),
            Opcode::Lit => self.inst_lit(),
            Opcode::Dup => self.inst_dup(),
            Opcode::Drop => self.drop_tos(),
            Opcode::Swap => self.inst_swap(),
            Opcode::Push => self.inst_push(),
            Opcode::Pop => self.inst_pop(),
            Opcode::Jump => self.inst_jump(),
            Opcode::Call => self.inst_call(),
            Opcode::CCall => self.inst_ccall(),
            Opcode::Return => self.inst_return(),
            Opcode::Eq => self.compare(|a, b| a == b),
            Opcode::Neq => self.compare(|a, b| a != b),
            Opcode::Lt => self.compare(|a, b| a < b),
            Opcode::Gt => self.compare(|a, b| a > b),
            Opcode::Fetch => self.inst_fetch(),
            Opcode::Store => self.inst_store(),
            Opcode::Add => self.reduce(Cell::wrapping_add),
            Opcode::Sub => self.reduce(Cell::wrapping_sub),
            Opcode::Mul => self.reduce(Cell::wrapping_mul),
            Opcode::DivMod => self.inst_divmod(),
            Opcode::And => self.reduce(|a, b| a & b),
            Opcode::Or => self.reduce(|a, b| a | b),
            Opcode::Xor => self.reduce(|a, b| a ^ b),
            Opcode::Shift => self.reduce(shift),
            Opcode::ZRet => self.inst_zret(),
            Opcode::End => {
                self.ip = HALT;
                Ok(())
            }
            Opcode::In | Opcode::GetC => self.inst_in(),
            Opcode::Out => self.inst_out(),
            Opcode::CJump => {
                log::error!("CJUMP not yet implemented (at {})", self.current);
                self.ip = HALT;
                Ok(())
            }
            Opcode::PutC => {
                let c = self.tos()?;
                self.output.put_char((c & 0xff) as u8)?;
                Ok(())
            }
        }
    }

    // instructions =========================================================

    fn inst_lit(&mut self) -> Result<(), VmError> {
        self.ip = self.ip.wrapping_add(1);
        let v = self.read_memory(self.ip)?;
        self.push(v)
    }

    fn inst_dup(&mut self) -> Result<(), VmError> {
        let v = self.tos()?;
        self.push(v)
    }

    fn inst_swap(&mut self) -> Result<(), VmError> {
        let a = self.tos()?;
        let b = self.nos()?;
        self.set_tos(b)?;
        self.set_nos(a)
    }

    fn inst_push(&mut self) -> Result<(), VmError> {
        let v = self.tos()?;
        self.push_address(v)?;
        self.drop_tos()
    }

    fn inst_pop(&mut self) -> Result<(), VmError> {
        let v = self.tors()?;
        self.push(v)?;
        self.rp -= 1;
        Ok(())
    }

    fn inst_jump(&mut self) -> Result<(), VmError> {
        self.ip = self.tos()?.wrapping_sub(1);
        self.drop_tos()
    }

    fn inst_call(&mut self) -> Result<(), VmError> {
        self.push_address(self.ip)?;
        self.ip = self.tos()?.wrapping_sub(1);
        self.drop_tos()
    }

    // the return slot is taken even when the call doesn't happen
    fn inst_ccall(&mut self) -> Result<(), VmError> {
        self.push_address(self.ip)?;
        let target = self.pop()?;
        let flag = self.pop()?;
        if flag != 0 {
            self.ip = target.wrapping_sub(1);
        }
        Ok(())
    }

    fn inst_return(&mut self) -> Result<(), VmError> {
        self.ip = self.tors()?;
        self.rp -= 1;
        Ok(())
    }

    fn inst_fetch(&mut self) -> Result<(), VmError> {
        let v = self.read_memory(self.tos()?)?;
        self.set_tos(v)
    }

    fn inst_store(&mut self) -> Result<(), VmError> {
        let target = self.tos()?;
        let v = self.nos()?;
        self.memory
            .set_cell(target, v)
            .ok_or(VmError::OutOfBounds {
                addr: self.current,
                target,
            })?;
        self.drop_tos()?;
        self.drop_tos()
    }

    fn inst_divmod(&mut self) -> Result<(), VmError> {
        let a = self.tos()?;
        let b = self.nos()?;
        if a == 0 {
            return Err(VmError::DivisionByZero { addr: self.current });
        }
        self.set_tos(b.wrapping_div(a))?;
        self.set_nos(b.wrapping_rem(a))
    }

    fn inst_zret(&mut self) -> Result<(), VmError> {
        if self.tos()? == 0 {
            self.drop_tos()?;
            self.ip = self.tors()?;
            self.rp -= 1;
        }
        Ok(())
    }

    fn inst_in(&mut self) -> Result<(), VmError> {
        // anything the program printed as a prompt has to be visible first
        self.output.flush()?;
        let c = self.input.get_char()?;
        self.push(c)
    }

    // only DROP ends the program when the stack runs out; OUT carries on
    fn inst_out(&mut self) -> Result<(), VmError> {
        let c = self.tos()?;
        self.output.put_char((c & 0xff) as u8)?;
        self.sp -= 1;
        Ok(())
    }

    /// NOS := NOS op TOS, then drop
    fn reduce(&mut self, op: impl FnOnce(Cell, Cell) -> Cell) -> Result<(), VmError> {
        let r = op(self.nos()?, self.tos()?);
        self.set_nos(r)?;
        self.drop_tos()
    }

    /// NOS := -1 if NOS rel TOS else 0, then drop
    fn compare(&mut self, rel: impl FnOnce(Cell, Cell) -> bool) -> Result<(), VmError> {
        self.reduce(|a, b| if rel(a, b) { -1 } else { 0 })
    }

    // stacks ===============================================================

    /// index of the cell `depth` below the top of a stack
    fn slot(&self, stack: StackKind, depth: Cell) -> Result<usize, VmError> {
        let (ptr, len) = match stack {
            StackKind::Data => (self.sp, STACK_DEPTH),
            StackKind::Return => (self.rp, ADDRESSES),
        };
        let addr = self.current;
        match usize::try_from(ptr - depth) {
            Err(_) => Err(VmError::StackUnderflow { stack, addr }),
            Ok(i) if i >= len => Err(VmError::StackOverflow { stack, addr }),
            Ok(i) => Ok(i),
        }
    }

    fn tos(&self) -> Result<Cell, VmError> {
        Ok(self.data[self.slot(StackKind::Data, 0)?])
    }

    fn nos(&self) -> Result<Cell, VmError> {
        Ok(self.data[self.slot(StackKind::Data, 1)?])
    }

    fn set_tos(&mut self, v: Cell) -> Result<(), VmError> {
        let i = self.slot(StackKind::Data, 0)?;
        self.data[i] = v;
        Ok(())
    }

    fn set_nos(&mut self, v: Cell) -> Result<(), VmError> {
        let i = self.slot(StackKind::Data, 1)?;
        self.data[i] = v;
        Ok(())
    }

    fn push(&mut self, v: Cell) -> Result<(), VmError> {
        self.sp += 1;
        self.set_tos(v)
    }

    /// DROP: clear the top slot and lower sp. Going below the floor is how
    /// a program ends itself, so it halts rather than faults.
    fn drop_tos(&mut self) -> Result<(), VmError> {
        if self.sp >= 0 {
            let i = self.slot(StackKind::Data, 0)?;
            self.data[i] = 0;
            self.sp -= 1;
        }
        if self.sp < 0 {
            self.ip = HALT;
        }
        Ok(())
    }

    fn pop(&mut self) -> Result<Cell, VmError> {
        let v = self.tos()?;
        self.drop_tos()?;
        Ok(v)
    }

    fn tors(&self) -> Result<Cell, VmError> {
        Ok(self.address[self.slot(StackKind::Return, 0)?])
    }

    fn push_address(&mut self, v: Cell) -> Result<(), VmError> {
        self.rp += 1;
        let i = self.slot(StackKind::Return, 0)?;
        self.address[i] = v;
        Ok(())
    }

    fn read_memory(&self, target: Cell) -> Result<Cell, VmError> {
        self.memory.get_cell(target).ok_or(VmError::OutOfBounds {
            addr: self.current,
            target,
        })
    }

    // inspection ===========================================================

    /// the live data stack, bottom first
    pub fn stack(&self) -> &[Cell] {
        match usize::try_from(self.sp) {
            Ok(sp) if sp > 0 => &self.data[1..=sp.min(STACK_DEPTH - 1)],
            _ => &[],
        }
    }

    /// at most the top `n` entries of the data stack as (index, value)
    pub fn stack_tail(&self, n: usize) -> Vec<(usize, Cell)> {
        let stack = self.stack();
        let skip = stack.len().saturating_sub(n);
        stack
            .iter()
            .enumerate()
            .skip(skip)
            .map(|(i, v)| (i + 1, *v))
            .collect()
    }

    pub fn memory(&self) -> &NgbMemoryMap {
        &self.memory
    }

    pub fn stats(&self) -> &Statistics {
        &self.stats
    }

    pub fn ip(&self) -> Cell {
        self.ip
    }

    pub fn sp(&self) -> Cell {
        self.sp
    }

    pub fn rp(&self) -> Cell {
        self.rp
    }
}

/// negative count shifts left by its magnitude, otherwise arithmetic right
fn shift(n: Cell, count: Cell) -> Cell {
    if count < 0 {
        n.checked_shl(count.unsigned_abs()).unwrap_or(0)
    } else {
        n.checked_shr(count as u32)
            .unwrap_or(if n < 0 { -1 } else { 0 })
    }
}
