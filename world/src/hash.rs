//! Seedless mixing function backing the incremental state hash.

use tsp_grid_core::Element;

const GOLDEN_GAMMA: u64 = 0x9e37_79b9_7f4a_7c15;
const MIX_MULTIPLIER_1: u64 = 0xbf58_476d_1ce4_e5b9;
const MIX_MULTIPLIER_2: u64 = 0x94d0_49bb_1331_11eb;

/// Maps a (grid size, element kind, cell) triple to a pseudorandom value.
///
/// The triple is folded into a single seed and passed through the SplitMix64
/// finalizer, so the result depends only on its inputs and is identical on
/// every platform.
#[must_use]
pub fn mix(grid_size: usize, element: Element, cell: usize) -> u64 {
    let seed = (grid_size as u64)
        .wrapping_mul(element.ordinal() as u64)
        .wrapping_add(cell as u64);
    let mut z = seed.wrapping_add(GOLDEN_GAMMA);
    z = (z ^ (z >> 30)).wrapping_mul(MIX_MULTIPLIER_1);
    z = (z ^ (z >> 27)).wrapping_mul(MIX_MULTIPLIER_2);
    z ^ (z >> 31)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn mix_is_deterministic() {
        assert_eq!(
            mix(144, Element::CityUnvisited, 17),
            mix(144, Element::CityUnvisited, 17)
        );
    }

    #[test]
    fn mix_separates_kinds_and_cells() {
        let grid_size = 36;
        let mut seen = HashSet::new();
        for element in Element::ALL {
            for cell in 0..grid_size {
                assert!(
                    seen.insert(mix(grid_size, element, cell)),
                    "collision for {element:?} at cell {cell}"
                );
            }
        }
    }

    #[test]
    fn mix_matches_reference_value() {
        // SplitMix64 applied to a zero seed.
        assert_eq!(mix(4, Element::Empty, 0), 0xe220_a839_7b1d_cdaf);
    }
}
