//! Color assignment for importance series

/// Fixed categorical palette, indexed by series color index
const PALETTE: &[[u8; 3]] = &[
    [100, 150, 250], // Blue
    [250, 150, 100], // Orange
    [150, 250, 100], // Green
    [250, 100, 150], // Pink
    [150, 100, 250], // Purple
    [250, 250, 100], // Yellow
    [100, 250, 250], // Cyan
    [250, 100, 100], // Red
];

/// RGB color for a series; stable for a given color index
pub fn series_color(color_index: usize) -> [u8; 3] {
    PALETTE[color_index % PALETTE.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_wraps_around() {
        assert_eq!(series_color(0), series_color(PALETTE.len()));
        assert_ne!(series_color(0), series_color(1));
    }
}
