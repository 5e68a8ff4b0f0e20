//! Shared constants for quarry-mesh-cpu.

// Colors
pub(crate) const OPAQUE_ALPHA: u8 = 255;
pub(crate) const WHITE: [u8; 4] = [255, 255, 255, OPAQUE_ALPHA];

/// Vertices addressable by 16-bit indices.
pub const MAX_BATCH_VERTICES: usize = u16::MAX as usize + 1;

// Liquid surface height above the bottom of the node, in node units
pub(crate) const WATER_LEVEL_CLASSIC: f32 = 1.0;
pub(crate) const WATER_LEVEL_NEW_STYLE: f32 = 0.85;

/// Flowing liquids store their level in the low bits of `param2`.
pub(crate) const LIQUID_LEVEL_MASK: u8 = 0x07;
pub(crate) const LIQUID_LEVEL_STEPS: f32 = 8.0;
