use std::fmt;

use crate::memory::Cell;
use crate::opcode::Opcode;

/// Runtime statistics: how often each opcode ran and how deep the stacks
/// got. Purely diagnostic; nothing in the interpreter reads it back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statistics {
    counts: [u64; Opcode::COUNT],
    pub max_sp: Cell,
    pub max_rp: Cell,
}

impl Statistics {
    pub fn new() -> Self {
        Statistics {
            counts: [0; Opcode::COUNT],
            max_sp: 0,
            max_rp: 0,
        }
    }

    pub fn record(&mut self, op: Opcode) {
        self.counts[op.index()] += 1;
    }

    /// keep the high-water marks current
    pub fn check_max(&mut self, sp: Cell, rp: Cell) {
        self.max_sp = self.max_sp.max(sp);
        self.max_rp = self.max_rp.max(rp);
    }

    pub fn count(&self, op: Opcode) -> u64 {
        self.counts[op.index()]
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }
}

impl Default for Statistics {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Statistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Runtime Statistics")?;
        for op in Opcode::all() {
            // the extension opcodes only show up when something used them
            if op.is_extension() && self.count(op) == 0 {
                continue;
            }
            writeln!(f, "{:<9}{}", format!("{}:", op), self.count(op))?;
        }
        writeln!(f, "{:<9}{}", "Max sp:", self.max_sp)?;
        writeln!(f, "{:<9}{}", "Max rp:", self.max_rp)?;
        writeln!(f, "Total opcodes processed: {}", self.total())
    }
}
