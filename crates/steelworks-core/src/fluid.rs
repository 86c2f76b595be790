use crate::id::FluidKind;
use serde::{Deserialize, Serialize};

/// A quantity of a single fluid. Immutable value; operations return new amounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FluidAmount {
    pub kind: FluidKind,
    pub volume: u32,
}

impl FluidAmount {
    pub fn new(kind: FluidKind, volume: u32) -> Self {
        Self { kind, volume }
    }

    pub fn is_empty(&self) -> bool {
        self.volume == 0
    }

    /// Same fluid with a different volume.
    pub fn with_volume(&self, volume: u32) -> Self {
        Self {
            kind: self.kind,
            volume,
        }
    }

    /// This amount with `volume` removed, saturating at zero.
    pub fn drained(&self, volume: u32) -> Self {
        self.with_volume(self.volume.saturating_sub(volume))
    }
}

/// A tank holding several fluid kinds up to a shared capacity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FluidTank {
    pub fluids: Vec<FluidAmount>,
    pub capacity: u32,
}

impl FluidTank {
    pub fn new(capacity: u32) -> Self {
        Self {
            fluids: Vec::new(),
            capacity,
        }
    }

    /// Fill with fluid. Returns the volume that didn't fit.
    #[must_use = "overflow volume indicates fluid that did not fit"]
    pub fn fill(&mut self, fluid: FluidAmount) -> u32 {
        let space = self.space();
        let to_add = fluid.volume.min(space);
        let overflow = fluid.volume - to_add;

        if to_add > 0 {
            if let Some(existing) = self.fluids.iter_mut().find(|f| f.kind == fluid.kind) {
                existing.volume += to_add;
            } else {
                self.fluids.push(fluid.with_volume(to_add));
            }
        }

        overflow
    }

    /// Drain up to `volume` of a fluid kind. Returns the volume actually drained.
    #[must_use = "returns the volume actually drained, which may be less than requested"]
    pub fn drain(&mut self, kind: FluidKind, volume: u32) -> u32 {
        if let Some(existing) = self.fluids.iter_mut().find(|f| f.kind == kind) {
            let to_drain = volume.min(existing.volume);
            existing.volume -= to_drain;
            if existing.volume == 0 {
                self.fluids.retain(|f| f.volume > 0);
            }
            to_drain
        } else {
            0
        }
    }

    /// Volume of a specific fluid kind.
    pub fn volume_of(&self, kind: FluidKind) -> u32 {
        self.fluids
            .iter()
            .find(|f| f.kind == kind)
            .map(|f| f.volume)
            .unwrap_or(0)
    }

    /// Total volume across all fluid kinds.
    pub fn total(&self) -> u32 {
        self.fluids.iter().map(|f| f.volume).sum()
    }

    /// Remaining free capacity.
    pub fn space(&self) -> u32 {
        self.capacity.saturating_sub(self.total())
    }
}
