//! Write-once geometry buffers addressed by handles
//!
//! Every load appends a new buffer to the arena. Handles are arena indices,
//! so two loads never return the same id, whatever the buffer kind.

use super::error::{RasterError, RasterResult};
use super::math::Vec3;

/// Handle to a loaded position buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PosBufId(usize);

/// Handle to a loaded index buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IndBufId(usize);

/// Handle to a loaded color buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColBufId(usize);

#[derive(Debug)]
enum Buffer {
    Positions(Vec<Vec3>),
    Indices(Vec<[usize; 3]>),
    Colors(Vec<Vec3>),
}

/// Arena of immutable vertex, index and color buffers
#[derive(Debug, Default)]
pub struct GeometryStore {
    buffers: Vec<Buffer>,
}

impl GeometryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, buffer: Buffer) -> usize {
        self.buffers.push(buffer);
        self.buffers.len() - 1
    }

    pub fn load_positions(&mut self, positions: Vec<Vec3>) -> PosBufId {
        PosBufId(self.push(Buffer::Positions(positions)))
    }

    pub fn load_indices(&mut self, indices: Vec<[usize; 3]>) -> IndBufId {
        IndBufId(self.push(Buffer::Indices(indices)))
    }

    /// Colors are 0.0-255.0 per channel, one per position
    pub fn load_colors(&mut self, colors: Vec<Vec3>) -> ColBufId {
        ColBufId(self.push(Buffer::Colors(colors)))
    }

    pub fn positions(&self, id: PosBufId) -> RasterResult<&[Vec3]> {
        match self.buffers.get(id.0) {
            Some(Buffer::Positions(p)) => Ok(p),
            _ => Err(RasterError::InvalidHandle { kind: "position", id: id.0 }),
        }
    }

    pub fn indices(&self, id: IndBufId) -> RasterResult<&[[usize; 3]]> {
        match self.buffers.get(id.0) {
            Some(Buffer::Indices(i)) => Ok(i),
            _ => Err(RasterError::InvalidHandle { kind: "index", id: id.0 }),
        }
    }

    pub fn colors(&self, id: ColBufId) -> RasterResult<&[Vec3]> {
        match self.buffers.get(id.0) {
            Some(Buffer::Colors(c)) => Ok(c),
            _ => Err(RasterError::InvalidHandle { kind: "color", id: id.0 }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handles_are_unique_across_kinds() {
        let mut store = GeometryStore::new();
        let p = store.load_positions(vec![Vec3::ZERO]);
        let i = store.load_indices(vec![[0, 0, 0]]);
        let c = store.load_colors(vec![Vec3::ZERO]);
        let p2 = store.load_positions(vec![Vec3::ZERO]);
        let ids = [p.0, i.0, c.0, p2.0];
        for a in 0..ids.len() {
            for b in (a + 1)..ids.len() {
                assert_ne!(ids[a], ids[b]);
            }
        }
        assert_eq!(store.buffers.len(), 4);
    }

    #[test]
    fn test_lookup_returns_loaded_data() {
        let mut store = GeometryStore::new();
        let p = store.load_positions(vec![Vec3::new(1.0, 2.0, 3.0)]);
        let i = store.load_indices(vec![[0, 1, 2]]);
        assert_eq!(store.positions(p).unwrap(), &[Vec3::new(1.0, 2.0, 3.0)]);
        assert_eq!(store.indices(i).unwrap(), &[[0, 1, 2]]);
    }

    #[test]
    fn test_wrong_kind_is_invalid_handle() {
        let mut store = GeometryStore::new();
        let p = store.load_positions(vec![]);
        // Same arena slot, but it does not hold colors
        let as_color = ColBufId(p.0);
        assert_eq!(
            store.colors(as_color),
            Err(RasterError::InvalidHandle { kind: "color", id: p.0 })
        );
        assert!(store.indices(IndBufId(99)).is_err());
    }
}
