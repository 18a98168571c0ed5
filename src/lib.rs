//! ## Design
//!
//! * a small stack machine in the nga family: 32-bit cells, a flat memory
//!   image, a 32-deep data stack and a 128-deep return stack
//! * images are raw cells in native byte order, loaded at address 0; no
//!   header, no relocation
//! * the machine state is one value (`NgbInterpreter`) rather than globals,
//!   so tests can run as many as they like
//! * character I/O goes through traits so the same loop serves a batch run
//!   on stdin/stdout, a raw-mode terminal, or byte buffers in tests
//!
//! Model
//!
//! ngb / ngita (binaries)
//!  |-- logging, command line
//!  |-- input (stdin or raw terminal), output (stdout)
//!  |-- interpreter(input, output, instruction set)
//!  |    |-- memory map, loaded from the image
//!  |    |-- data + return stacks, ip/sp/rp
//!  |    `-- statistics
//!  `-- run to halt
//!       |-- fetch cell at ip, decode (fault if not an opcode)
//!       |-- execute handler (may move ip to target - 1)
//!       |-- ip += 1
//!       `-- stop once ip >= IMAGE_SIZE
pub mod error;
pub mod input;
pub mod interpreter;
pub mod logging;
pub mod memory;
pub mod opcode;
pub mod output;
pub mod stats;

pub use error::{StackKind, VmError};
pub use interpreter::{NgbInterpreter, State};
pub use memory::{Cell, IMAGE_SIZE};
pub use opcode::{InstructionSet, Opcode};
pub use stats::Statistics;
