// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Box blur used by masking mode.
//!
//! Each pixel in the region becomes the unweighted average of the in-bounds
//! pixels in a `(2k+1)²` window around it. This is a visual low-pass filter,
//! not an irreversible redaction.

use crate::models::annotation::BoundingBox;
use crate::util::geometry::clip_to_image;
use image::{Rgb, RgbImage};

/// Default kernel half-width.
pub const DEFAULT_KERNEL: u32 = 5;

/// Blur `region` of `image` in place. The region is clipped to the image;
/// averages are always taken over the pre-blur pixels. Returns the clipped
/// region that was modified, if any.
pub fn box_blur(image: &mut RgbImage, region: &BoundingBox, kernel: u32) -> Option<BoundingBox> {
    let (width, height) = image.dimensions();
    let clipped = clip_to_image(region, width, height)?;
    let source = image.clone();
    let k = kernel as i64;

    let x_start = clipped.x as u32;
    let y_start = clipped.y as u32;
    for y in y_start..y_start + clipped.height {
        for x in x_start..x_start + clipped.width {
            let mut sum = [0u64; 3];
            let mut count = 0u64;
            for ny in (i64::from(y) - k).max(0)..=(i64::from(y) + k).min(i64::from(height) - 1) {
                for nx in (i64::from(x) - k).max(0)..=(i64::from(x) + k).min(i64::from(width) - 1) {
                    let Rgb(px) = source.get_pixel(nx as u32, ny as u32);
                    for (acc, channel) in sum.iter_mut().zip(px) {
                        *acc += u64::from(*channel);
                    }
                    count += 1;
                }
            }
            image.put_pixel(
                x,
                y,
                Rgb([
                    (sum[0] / count) as u8,
                    (sum[1] / count) as u8,
                    (sum[2] / count) as u8,
                ]),
            );
        }
    }

    log::debug!(
        "Blurred region ({}, {}) {}x{} with kernel {}",
        clipped.x,
        clipped.y,
        clipped.width,
        clipped.height,
        kernel
    );
    Some(clipped)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient(width: u32, height: u32) -> RgbImage {
        RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x * 7 % 256) as u8, (y * 13 % 256) as u8, ((x * y) % 256) as u8])
        })
    }

    fn window_average(img: &RgbImage, x: u32, y: u32, k: u32) -> Rgb<u8> {
        let mut sum = [0u64; 3];
        let mut count = 0;
        for ny in y - k..=y + k {
            for nx in x - k..=x + k {
                let p = img.get_pixel(nx, ny);
                for c in 0..3 {
                    sum[c] += p[c] as u64;
                }
                count += 1;
            }
        }
        Rgb([(sum[0] / count) as u8, (sum[1] / count) as u8, (sum[2] / count) as u8])
    }

    #[test]
    fn test_interior_pixels_average_pre_blur_window() {
        let original = gradient(40, 30);
        let mut img = original.clone();
        let k = 3;
        box_blur(&mut img, &BoundingBox::new(5, 5, 25, 18), k);

        for y in 5..23 {
            for x in 5..30 {
                if x >= k && y >= k && x + k < 40 && y + k < 30 {
                    assert_eq!(*img.get_pixel(x, y), window_average(&original, x, y, k), "pixel ({x}, {y})");
                }
            }
        }
    }

    #[test]
    fn test_pixels_outside_region_untouched() {
        let original = gradient(20, 20);
        let mut img = original.clone();
        box_blur(&mut img, &BoundingBox::new(5, 5, 5, 5), 2);
        assert_eq!(img.get_pixel(4, 4), original.get_pixel(4, 4));
        assert_eq!(img.get_pixel(10, 10), original.get_pixel(10, 10));
    }

    #[test]
    fn test_edge_pixels_average_fewer_samples() {
        let mut img = RgbImage::from_pixel(3, 1, Rgb([0, 0, 0]));
        img.put_pixel(0, 0, Rgb([90, 90, 90]));
        box_blur(&mut img, &BoundingBox::new(0, 0, 1, 1), 1);
        // Window at (0,0) covers only (0,0) and (1,0)
        assert_eq!(*img.get_pixel(0, 0), Rgb([45, 45, 45]));
    }

    #[test]
    fn test_out_of_bounds_region_is_clipped() {
        let mut img = RgbImage::from_pixel(10, 10, Rgb([10, 20, 30]));
        let clipped = box_blur(&mut img, &BoundingBox::new(-5, 8, 50, 50), 5).unwrap();
        assert_eq!(clipped, BoundingBox::new(0, 8, 10, 2));
        assert!(box_blur(&mut img, &BoundingBox::new(20, 20, 5, 5), 5).is_none());
    }

    #[test]
    fn test_uniform_image_unchanged() {
        let mut img = RgbImage::from_pixel(12, 12, Rgb([10, 20, 30]));
        box_blur(&mut img, &BoundingBox::new(0, 0, 12, 12), DEFAULT_KERNEL);
        assert!(img.pixels().all(|p| *p == Rgb([10, 20, 30])));
    }
}
