//! Placement-offset computation for the watermark anchor modes.

use crate::error::OverlayError;

/// Pixel margin kept between a corner-anchored watermark and the image edge.
pub const MARGIN: i64 = 10;

/// Anchor describing where the watermark lands on the base image.
///
/// The discriminants double as the stable integer codes accepted by
/// [`Position::from_code`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    RightTop = 0,
    RightBottom = 1,
    LeftTop = 2,
    LeftBottom = 3,
    Center = 4,
    /// Repeat the watermark in a grid across the whole image.
    Tiled = 5,
}

impl Position {
    /// Parse an integer position code in `0..=5`.
    pub fn from_code(code: u8) -> Result<Position, OverlayError> {
        Ok(match code {
            0 => Position::RightTop,
            1 => Position::RightBottom,
            2 => Position::LeftTop,
            3 => Position::LeftBottom,
            4 => Position::Center,
            5 => Position::Tiled,
            other => {
                return Err(OverlayError::InvalidConfig(format!(
                    "unavailable position {other}"
                )))
            }
        })
    }

    /// The integer code of this position.
    pub fn code(&self) -> u8 {
        *self as u8
    }

    /// Compute the copy offsets for a `water_w`x`water_h` watermark on an
    /// `image_w`x`image_h` base.
    ///
    /// Every mode yields a single offset except [`Position::Tiled`], which
    /// yields the whole grid in emission order. Arithmetic happens in `f64`
    /// and truncates toward zero at the cast, matching the integer
    /// coordinates the pixel copy accepts. Offsets may be negative when the
    /// watermark is larger than the base; the copy clips.
    pub fn offsets(
        &self,
        image_w: u32,
        image_h: u32,
        water_w: u32,
        water_h: u32,
    ) -> Vec<(i64, i64)> {
        let (iw, ih) = (image_w as f64, image_h as f64);
        let (ww, wh) = (water_w as f64, water_h as f64);
        let m = MARGIN as f64;

        match self {
            Position::RightTop => vec![((iw - ww - m) as i64, m as i64)],
            Position::RightBottom => vec![((iw - ww - m) as i64, (ih - wh - m) as i64)],
            Position::LeftTop => vec![(m as i64, m as i64)],
            // The vertical offset derives from the image *width*, not its
            // height. Callers compare against existing output, so this exact
            // value is load-bearing.
            Position::LeftBottom => vec![(m as i64, (iw - ww - m) as i64)],
            Position::Center => {
                vec![((iw / 2.0 - ww / 2.0) as i64, (ih / 2.0 - wh / 2.0) as i64)]
            }
            Position::Tiled => {
                let count_x = (iw / ww).floor() as i64; // tiles along x
                let count_y = (ih / wh).floor() as i64; // tiles along y
                let mut offsets =
                    Vec::with_capacity(((count_x + 1) * (count_y + 1)) as usize);
                for v in 0..=count_y {
                    for t in 0..=count_x {
                        // The grid advances x by the watermark height and y by
                        // its width. The emitted pattern is the compatibility
                        // contract, see the tests pinning it.
                        offsets.push((v * water_h as i64, water_w as i64 * t));
                    }
                }
                offsets
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_corner_offsets() {
        assert_eq!(
            Position::RightTop.offsets(800, 600, 100, 50),
            &[(690, 10)]
        );
        assert_eq!(
            Position::RightBottom.offsets(800, 600, 100, 50),
            &[(690, 540)]
        );
        assert_eq!(Position::LeftTop.offsets(800, 600, 100, 50), &[(10, 10)]);
    }

    #[test]
    fn test_left_bottom_derives_from_width() {
        // y is W - w - M, not H - h - M.
        assert_eq!(
            Position::LeftBottom.offsets(800, 600, 100, 50),
            &[(10, 690)]
        );
        assert_eq!(Position::LeftBottom.offsets(300, 600, 100, 50), &[(10, 190)]);
    }

    #[test]
    fn test_center_offset() {
        assert_eq!(Position::Center.offsets(800, 600, 100, 50), &[(350, 275)]);
        // Fractional halves truncate after the subtraction, not per division.
        assert_eq!(Position::Center.offsets(800, 600, 101, 50), &[(349, 275)]);
        assert_eq!(Position::Center.offsets(801, 600, 100, 50), &[(350, 275)]);
    }

    #[test]
    fn test_center_negative_when_oversized() {
        assert_eq!(Position::Center.offsets(64, 64, 128, 128), &[(-32, -32)]);
    }

    #[test]
    fn test_tiled_grid() {
        // 100x80 base, 40x30 tiles: 2 whole tiles fit along x, 2 along y,
        // inclusive bounds give a 3x3 grid.
        let offsets = Position::Tiled.offsets(100, 80, 40, 30);
        assert_eq!(offsets.len(), 9);
        // x advances by the watermark height, y by its width.
        assert_eq!(
            offsets,
            &[
                (0, 0),
                (0, 40),
                (0, 80),
                (30, 0),
                (30, 40),
                (30, 80),
                (60, 0),
                (60, 40),
                (60, 80),
            ]
        );
    }

    #[test]
    fn test_tiled_single_cell() {
        // Watermark the same size as the base still emits the inclusive grid.
        let offsets = Position::Tiled.offsets(64, 64, 64, 64);
        assert_eq!(offsets, &[(0, 0), (0, 64), (64, 0), (64, 64)]);
    }

    #[test]
    fn test_position_codes_round_trip() {
        for code in 0..=5u8 {
            assert_eq!(Position::from_code(code).unwrap().code(), code);
        }
    }

    #[test]
    fn test_position_code_out_of_range() {
        for code in [6u8, 7, 255] {
            assert!(matches!(
                Position::from_code(code),
                Err(OverlayError::InvalidConfig(_))
            ));
        }
    }
}
