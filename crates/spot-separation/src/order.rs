//! Print order and opacity assignment.

use crate::channel::Channel;

/// Opacity lost per palette position, in percent.
pub const OPACITY_STEP: u32 = 5;
/// Lowest opacity a channel may print at after ordering.
pub const OPACITY_FLOOR: u8 = 30;

/// Opacity before the floor is applied: `max(0, 100 - 5 * index)`.
pub fn initial_opacity(palette_index: usize) -> u8 {
    let drop = (palette_index as u64).saturating_mul(OPACITY_STEP as u64);
    100u64.saturating_sub(drop) as u8
}

/// Assigns opacity and knockout, then sorts channels into print order.
#[derive(Debug, Clone, Copy, Default)]
pub struct SeparationOrderer;

impl SeparationOrderer {
    /// Most opaque first; equal opacity keeps ascending palette index. Every
    /// returned channel knocks out and prints at no less than
    /// [`OPACITY_FLOOR`].
    pub fn order(&self, mut channels: Vec<Channel>) -> Vec<Channel> {
        for channel in &mut channels {
            channel.opacity = initial_opacity(channel.palette_index);
        }

        channels.sort_by(|a, b| {
            b.opacity
                .cmp(&a.opacity)
                .then(a.palette_index.cmp(&b.palette_index))
        });

        for channel in &mut channels {
            channel.opacity = channel.opacity.max(OPACITY_FLOOR);
            channel.knockout = true;
        }
        channels
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::{CoverageMask, FULL_INK_DENSITY};
    use crate::color::Srgb;

    fn channel(index: usize) -> Channel {
        Channel {
            name: format!("Spot Color {}", index + 1),
            palette_index: index,
            color: Srgb::BLACK,
            mask: CoverageMask::new(1, 1, vec![255]).unwrap(),
            ink_density: FULL_INK_DENSITY,
            opacity: 0,
            knockout: false,
        }
    }

    #[test]
    fn test_initial_opacity() {
        assert_eq!(initial_opacity(0), 100);
        assert_eq!(initial_opacity(1), 95);
        assert_eq!(initial_opacity(11), 45);
        assert_eq!(initial_opacity(20), 0);
        assert_eq!(initial_opacity(25), 0);
        assert_eq!(initial_opacity(usize::MAX), 0);
    }

    #[test]
    fn test_sorted_descending_with_knockout() {
        let input = vec![channel(3), channel(0), channel(5), channel(1)];
        let ordered = SeparationOrderer.order(input);

        let indices: Vec<usize> = ordered.iter().map(|c| c.palette_index).collect();
        assert_eq!(indices, vec![0, 1, 3, 5]);
        let opacities: Vec<u8> = ordered.iter().map(|c| c.opacity).collect();
        assert_eq!(opacities, vec![100, 95, 85, 75]);
        assert!(ordered.iter().all(|c| c.knockout));
    }

    #[test]
    fn test_floor_applied_after_sort() {
        let input: Vec<Channel> = (0..24).rev().map(channel).collect();
        let ordered = SeparationOrderer.order(input);

        assert!(ordered.windows(2).all(|w| w[0].opacity >= w[1].opacity));
        assert!(ordered.iter().all(|c| c.opacity >= OPACITY_FLOOR));
        // Floored channels keep index order among themselves
        let floored: Vec<usize> = ordered
            .iter()
            .filter(|c| c.opacity == OPACITY_FLOOR)
            .map(|c| c.palette_index)
            .collect();
        assert_eq!(floored, (14..24).collect::<Vec<_>>());
    }

    #[test]
    fn test_empty_input() {
        assert!(SeparationOrderer.order(Vec::new()).is_empty());
    }
}
