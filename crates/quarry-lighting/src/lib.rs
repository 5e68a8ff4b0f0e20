//! Sunlight propagation down through chunk columns.
#![forbid(unsafe_code)]

use hashbrown::HashSet;
use quarry_chunk::{
    CHUNK_SIZE, Chunk, ChunkMap, GridError, LIGHT_SUN, LightBank, NodeContainer, diminish_light,
};
use quarry_content::{CONTENT_AIR, ContentClassifier};
use quarry_geom::V3i;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct SunlightOptions {
    /// Overwrite stored day light even when the new value is darker.
    pub remove_light: bool,
    /// Turn sunlit soil with air above into its grown form.
    pub grow_grass: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SunlightReport {
    /// False if the top layer of the chunk below disagrees with the light
    /// leaving this chunk; the caller should relight that chunk next.
    pub chunk_below_valid: bool,
    /// Some light-holding node ended dark underneath an obstruction.
    pub black_air_left: bool,
}

/// Drops sunlight down every column of `chunk`.
///
/// The light entering a column is taken from the node above the chunk when
/// `parent` has it, otherwise full sun is assumed unless the chunk is
/// underground or its top node is a liquid. World positions of nodes bright
/// enough to spread light sideways are added to `light_sources`.
pub fn propagate_sunlight(
    chunk: &mut Chunk,
    parent: &dyn NodeContainer,
    classifier: &dyn ContentClassifier,
    options: SunlightOptions,
    light_sources: &mut HashSet<V3i>,
) -> Result<SunlightReport, GridError> {
    if chunk.is_dummy() {
        return Err(GridError::NotAllocated(chunk.origin()));
    }
    let origin = chunk.origin();
    let mut report = SunlightReport {
        chunk_below_valid: true,
        black_air_left: false,
    };

    for x in 0..CHUNK_SIZE {
        for z in 0..CHUNK_SIZE {
            let top_sunlit = match chunk.node(V3i::new(x, CHUNK_SIZE, z), parent) {
                Ok(above) => above.light(LightBank::Day, classifier) == LIGHT_SUN,
                Err(_) => {
                    let top = chunk.node_local(V3i::new(x, CHUNK_SIZE - 1, z))?;
                    !chunk.is_underground && !classifier.is_liquid(top.content)
                }
            };

            let mut light = if top_sunlit { LIGHT_SUN } else { 0 };
            let mut stopped_to_solid = false;

            for y in (0..CHUNK_SIZE).rev() {
                let p = V3i::new(x, y, z);
                let before = chunk.node_local(p)?;
                let mut n = before;
                let f = classifier.features(n.content);

                if light == 0 {
                    // stays dark
                } else if light == LIGHT_SUN && f.sunlight_propagates {
                    // sunlight continues undiminished
                } else if !f.light_propagates {
                    if options.grow_grass && light == LIGHT_SUN {
                        if let Some(grown) = f.grows_into {
                            let upper_is_air = chunk
                                .node(p + V3i::UP, parent)
                                .is_ok_and(|up| up.content == CONTENT_AIR);
                            if upper_is_air {
                                n.content = grown;
                            }
                        }
                    }
                    stopped_to_solid = true;
                    light = 0;
                } else {
                    light = diminish_light(light);
                }

                if light > n.light(LightBank::Day, classifier) || options.remove_light {
                    n.set_light(LightBank::Day, light, classifier);
                }
                if n != before {
                    chunk.set_node_local(p, n)?;
                }

                if diminish_light(light) != 0 {
                    light_sources.insert(origin + p);
                }
                if light == 0 && stopped_to_solid {
                    report.black_air_left = true;
                }
            }

            if report.chunk_below_valid {
                let sun_goes_down = light == LIGHT_SUN;
                // Opaque nodes below never hold light, so they cannot disagree.
                if let Ok(below) = chunk.node(V3i::new(x, -1, z), parent) {
                    if classifier.light_propagates(below.content) {
                        let below_sunlit = below.light(LightBank::Day, classifier) == LIGHT_SUN;
                        if below_sunlit != sun_goes_down {
                            report.chunk_below_valid = false;
                        }
                    }
                }
            }
        }
    }

    chunk.lighting_expired = false;
    Ok(report)
}

/// Relights the chunk at `top` and keeps going down while the chunk below is
/// reported stale. Returns how many chunks were relit.
pub fn propagate_sunlight_downward(
    map: &mut ChunkMap,
    top: V3i,
    classifier: &dyn ContentClassifier,
    options: SunlightOptions,
    light_sources: &mut HashSet<V3i>,
) -> Result<usize, GridError> {
    if !map.contains(top) {
        return Err(GridError::InvalidPosition(top * CHUNK_SIZE));
    }
    let mut pos = top;
    let mut lit = 0;
    while let Some(report) = map.with_chunk_mut(pos, |chunk, parent| {
        propagate_sunlight(chunk, &*parent, classifier, options, light_sources)
    }) {
        let report = report?;
        lit += 1;
        log::debug!(
            "sunlight at chunk {:?}: below_valid={} black_air_left={}",
            pos,
            report.chunk_below_valid,
            report.black_air_left
        );
        if report.chunk_below_valid {
            break;
        }
        pos = pos + V3i::DOWN;
    }
    Ok(lit)
}

#[cfg(test)]
mod tests;
