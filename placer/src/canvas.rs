use image::{Rgb, RgbImage, imageops};

use crate::geom::Placement;
use crate::picker::Candidate;

pub const BACKGROUND: Rgb<u8> = Rgb([0, 0, 0]);

/// Per-sample output buffer. Only [`Canvas::commit`] writes pixels into it.
#[derive(Clone, Debug)]
pub struct Canvas {
    pixels: RgbImage,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            pixels: RgbImage::from_pixel(width, height, BACKGROUND),
        }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// Copy the candidate's pixels verbatim at the placement's top-left corner.
    pub fn commit(&mut self, candidate: &Candidate, placement: &Placement) {
        debug_assert_eq!(candidate.width(), placement.width());
        debug_assert_eq!(candidate.height(), placement.height());
        debug_assert!(placement.fits_within(self.width(), self.height()));

        imageops::replace(
            &mut self.pixels,
            &candidate.pixels,
            i64::from(placement.x_min),
            i64::from(placement.y_min),
        );
    }

    pub fn as_image(&self) -> &RgbImage {
        &self.pixels
    }

    pub fn into_image(self) -> RgbImage {
        self.pixels
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_black() {
        let canvas = Canvas::new(5, 3);
        assert_eq!((canvas.width(), canvas.height()), (5, 3));
        assert!(canvas.as_image().pixels().all(|p| *p == BACKGROUND));
    }

    #[test]
    fn commit_copies_block_only() {
        let mut canvas = Canvas::new(6, 6);
        let mut tile = RgbImage::from_pixel(2, 3, Rgb([10, 20, 30]));
        tile.put_pixel(1, 2, Rgb([0, 0, 0]));
        let candidate = Candidate::new("A", tile);

        canvas.commit(&candidate, &Placement::new(3, 1, 2, 3));

        let img = canvas.into_image();
        for (x, y, px) in img.enumerate_pixels() {
            let inside = (3..5).contains(&x) && (1..4).contains(&y);
            let expected = if (x, y) == (4, 3) || !inside {
                BACKGROUND
            } else {
                Rgb([10, 20, 30])
            };
            assert_eq!(*px, expected, "pixel ({x}, {y})");
        }
    }
}
