//! Error diffusion kernel definitions.

/// An error diffusion kernel.
///
/// Each entry is `(dx, dy, weight)`; a neighbour receives
/// `error * weight / divisor`. `max_dy` sizes the error buffer
/// (`max_dy + 1` rows).
#[derive(Debug, Clone, Copy)]
pub struct Kernel {
    /// `dx` is flipped on reverse (serpentine) rows; `dy` is always forward.
    pub entries: &'static [(i32, i32, u8)],
    pub divisor: u8,
    pub max_dy: usize,
}

/// Floyd-Steinberg kernel, 100% propagation.
///
/// ```text
///        X   7
///    3   5   1
/// ```
pub const FLOYD_STEINBERG: Kernel = Kernel {
    entries: &[
        (1, 0, 7),  // right
        (-1, 1, 3), // bottom-left
        (0, 1, 5),  // bottom
        (1, 1, 1),  // bottom-right
    ],
    divisor: 16,
    max_dy: 1,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_floyd_steinberg_weights_sum_to_divisor() {
        let total: u32 = FLOYD_STEINBERG.entries.iter().map(|&(_, _, w)| w as u32).sum();
        assert_eq!(total, FLOYD_STEINBERG.divisor as u32);
    }

    #[test]
    fn test_max_dy_matches_entries() {
        let max = FLOYD_STEINBERG
            .entries
            .iter()
            .map(|&(_, dy, _)| dy as usize)
            .max()
            .unwrap();
        assert_eq!(max, FLOYD_STEINBERG.max_dy);
    }
}
