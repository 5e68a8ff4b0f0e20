use quarry_content::{CONTENT_AIR, CONTENT_IGNORE, ContentClassifier, ContentId};
use quarry_geom::V3i;

/// Brightest light a non-sun source can produce.
pub const LIGHT_MAX: u8 = 14;
/// Unobstructed sunlight.
pub const LIGHT_SUN: u8 = 15;

const LIGHT_DECODE_TABLE: [u8; LIGHT_MAX as usize + 1] =
    [8, 11, 14, 18, 22, 29, 37, 47, 60, 76, 97, 123, 157, 200, 255];

/// One step of attenuation. Sunlight drops below [`LIGHT_MAX`] on its first step.
#[inline]
pub fn diminish_light(light: u8) -> u8 {
    match light {
        0 => 0,
        l if l >= LIGHT_MAX => LIGHT_MAX - 1,
        l => l - 1,
    }
}

/// Inverse of [`diminish_light`], capped at [`LIGHT_MAX`].
#[inline]
pub fn undiminish_light(light: u8) -> u8 {
    match light {
        0 => 0,
        l if l >= LIGHT_MAX => LIGHT_MAX,
        l => l + 1,
    }
}

/// Maps a light level to an 8-bit vertex color intensity.
#[inline]
pub fn decode_light(light: u8) -> u8 {
    LIGHT_DECODE_TABLE[light.min(LIGHT_MAX) as usize]
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum LightBank {
    Day,
    Night,
}

/// Two 4-bit light channels packed in one byte.
///
/// Bits 0..4 hold the day channel, bits 4..8 the night channel. This byte is
/// written to disk as-is.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct LightParam(pub u8);

impl LightParam {
    #[inline]
    pub fn new(day: u8, night: u8) -> Self {
        Self((day & 0x0f) | ((night & 0x0f) << 4))
    }

    #[inline]
    pub fn day(self) -> u8 {
        self.0 & 0x0f
    }

    #[inline]
    pub fn night(self) -> u8 {
        self.0 >> 4
    }

    #[inline]
    pub fn get(self, bank: LightBank) -> u8 {
        match bank {
            LightBank::Day => self.day(),
            LightBank::Night => self.night(),
        }
    }

    #[inline]
    pub fn set(&mut self, bank: LightBank, light: u8) {
        let light = light & 0x0f;
        self.0 = match bank {
            LightBank::Day => (self.0 & 0xf0) | light,
            LightBank::Night => (self.0 & 0x0f) | (light << 4),
        };
    }
}

/// One voxel.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Node {
    pub content: ContentId,
    pub param: LightParam,
    /// Per-content extra byte: liquid level, billboard direction, ...
    pub param2: u8,
}

impl Default for Node {
    fn default() -> Self {
        Node::AIR
    }
}

impl Node {
    pub const AIR: Node = Node::new(CONTENT_AIR);
    pub const IGNORE: Node = Node::new(CONTENT_IGNORE);

    #[inline]
    pub const fn new(content: ContentId) -> Self {
        Self {
            content,
            param: LightParam(0),
            param2: 0,
        }
    }

    #[inline]
    pub const fn with_params(content: ContentId, param: u8, param2: u8) -> Self {
        Self {
            content,
            param: LightParam(param),
            param2,
        }
    }

    #[inline]
    pub fn is_ignore(&self) -> bool {
        self.content == CONTENT_IGNORE
    }

    /// Effective light: stored channel if the content holds light, raised to its own emission.
    pub fn light(&self, bank: LightBank, classifier: &dyn ContentClassifier) -> u8 {
        let f = classifier.features(self.content);
        let stored = if f.light_propagates {
            self.param.get(bank)
        } else {
            0
        };
        stored.max(f.light_source)
    }

    /// Stores `light` in `bank`. No effect on content that does not hold light.
    pub fn set_light(&mut self, bank: LightBank, light: u8, classifier: &dyn ContentClassifier) {
        if classifier.light_propagates(self.content) {
            self.param.set(bank, light);
        }
    }

    /// Day/night mix for `daynight_ratio` in `0..=1000` (1000 = full day).
    pub fn light_blend(&self, daynight_ratio: u32, classifier: &dyn ContentClassifier) -> u8 {
        let ratio = daynight_ratio.min(1000);
        let day = self.light(LightBank::Day, classifier);
        let night = self.light(LightBank::Night, classifier);
        let mixed = (ratio * day as u32 + (1000 - ratio) * night as u32) / 1000;
        let max = if day == LIGHT_SUN { LIGHT_SUN } else { LIGHT_MAX };
        (mixed as u8).min(max)
    }

    /// Direction stored in `param2` by oriented content such as torches.
    #[inline]
    pub fn dir(&self) -> V3i {
        unpack_dir(self.param2)
    }
}

/// Decodes a direction byte: bit0 +X, bit1 -X, bit2 +Y, bit3 -Y, bit4 +Z, bit5 -Z.
pub fn unpack_dir(b: u8) -> V3i {
    let mut d = V3i::ZERO;
    if b & 0x01 != 0 {
        d.x += 1;
    }
    if b & 0x02 != 0 {
        d.x -= 1;
    }
    if b & 0x04 != 0 {
        d.y += 1;
    }
    if b & 0x08 != 0 {
        d.y -= 1;
    }
    if b & 0x10 != 0 {
        d.z += 1;
    }
    if b & 0x20 != 0 {
        d.z -= 1;
    }
    d
}

pub fn pack_dir(d: V3i) -> u8 {
    let mut b = 0;
    if d.x > 0 {
        b |= 0x01;
    }
    if d.x < 0 {
        b |= 0x02;
    }
    if d.y > 0 {
        b |= 0x04;
    }
    if d.y < 0 {
        b |= 0x08;
    }
    if d.z > 0 {
        b |= 0x10;
    }
    if d.z < 0 {
        b |= 0x20;
    }
    b
}
