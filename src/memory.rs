use std::fs::File;
use std::io;
use std::path::Path;

use crate::error::VmError;

// NB. get_cell/set_cell take Cell addresses, as the VM computes them, and
//     reject anything outside memory; the bulk write and slice methods take
//     usize addresses and lengths to stop endless casting

/// the VM's native word; code and data are both made of these
pub type Cell = i32;

/// bytes per cell in an image file
pub const CELL_BYTES: usize = std::mem::size_of::<Cell>();

/// how much memory we have, in cells
pub const IMAGE_SIZE: usize = 262_144;

/// Represents the flat cell memory. Images are position-fixed, so there is
/// no relocation: cell N of the file is address N.
pub trait MemoryMap {
    /// write an unknown length of raw image bytes into memory at a
    /// particular address; returns the number of cells that landed
    fn write_any(&mut self, reader: &mut impl io::Read, addr: usize) -> Result<usize, io::Error> {
        let mut buf = Vec::new();
        reader.read_to_end(&mut buf)?;
        // a trailing partial cell is not part of the image
        let cells: Vec<Cell> = buf
            .chunks_exact(CELL_BYTES)
            .map(|b| Cell::from_ne_bytes([b[0], b[1], b[2], b[3]]))
            .collect();
        Ok(self.write(&cells, addr))
    }

    /// write a run of cells; anything that would fall past the end of
    /// memory is discarded
    fn write(&mut self, data: &[Cell], addr: usize) -> usize {
        let cells = self.get_rw_slice(addr, data.len());
        let len = cells.len();
        cells.copy_from_slice(&data[..len]);
        if len < data.len() {
            log::warn!(
                "image too large: {} cells past the end of memory discarded",
                data.len() - len
            );
        }
        len
    }

    /// read one cell, `None` when the address is outside memory
    fn get_cell(&self, addr: Cell) -> Option<Cell> {
        let a = usize::try_from(addr).ok()?;
        self.get_ro_slice(a, 1).first().copied()
    }

    /// write one cell, `None` when the address is outside memory
    fn set_cell(&mut self, addr: Cell, value: Cell) -> Option<()> {
        let a = usize::try_from(addr).ok()?;
        let cell = self.get_rw_slice(a, 1).first_mut()?;
        *cell = value;
        Some(())
    }

    /// get a r/w slice of the underlying memory, clamped to its end
    fn get_rw_slice(&mut self, addr: usize, len: usize) -> &mut [Cell];

    /// get a r/o slice of the underlying memory, clamped to its end
    fn get_ro_slice(&self, addr: usize, len: usize) -> &[Cell];
}

/// The ngb memory image: IMAGE_SIZE cells, zeroed (i.e. all NOP) at start.
pub struct NgbMemoryMap {
    cells: Box<[Cell]>,
}

impl MemoryMap for NgbMemoryMap {
    fn get_rw_slice(&mut self, addr: usize, len: usize) -> &mut [Cell] {
        let (a, b) = self.clamp(addr, len);
        &mut self.cells[a..b]
    }
    fn get_ro_slice(&self, addr: usize, len: usize) -> &[Cell] {
        let (a, b) = self.clamp(addr, len);
        &self.cells[a..b]
    }
}

impl NgbMemoryMap {
    pub fn new() -> Self {
        NgbMemoryMap {
            // too big to build on the stack first
            cells: vec![0; IMAGE_SIZE].into_boxed_slice(),
        }
    }

    /// load an image from any reader at address 0
    pub fn load_program(&mut self, reader: &mut impl io::Read) -> Result<usize, io::Error> {
        self.write_any(reader, 0)
    }

    /// load an image file at address 0, returning the number of cells read
    pub fn load_image(&mut self, path: &Path) -> Result<usize, VmError> {
        let load_err = |source: io::Error| VmError::Load {
            path: path.to_path_buf(),
            source,
        };
        let mut f = File::open(path).map_err(load_err)?;
        let count = self.load_program(&mut f).map_err(load_err)?;
        log::debug!("loaded {} cells from {}", count, path.display());
        Ok(count)
    }

    fn clamp(&self, addr: usize, len: usize) -> (usize, usize) {
        let a = addr.min(self.cells.len());
        let b = addr.saturating_add(len).min(self.cells.len());
        (a, b)
    }
}

impl Default for NgbMemoryMap {
    fn default() -> Self {
        Self::new()
    }
}
