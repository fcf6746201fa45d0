//! Frame capture for the remote path.
//!
//! Crops the camera frame to the detected hand's bounding box with padding,
//! resizes to the model's input size, and encodes a base64 JPEG data URL.
//! Without landmarks the whole frame is used.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::DynamicImage;
use thiserror::Error;

use crate::hand::landmark::HandPose;

/// Model input edge length in pixels.
pub const TARGET_SIZE: u32 = 224;

/// Padding around the hand bounding box, as a fraction of its size.
pub const PAD_FRACTION: f32 = 0.2;

const JPEG_QUALITY: u8 = 80;

#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("jpeg encoding failed: {0}")]
    Encode(#[from] image::ImageError),
}

/// Encode a frame for the remote classifier.
///
/// With a pose, crops to the hand bounding box plus 20% padding (clamped to
/// the frame); otherwise takes the full frame. Returns a
/// `data:image/jpeg;base64,` URL of the 224×224 JPEG.
pub fn encode_hand_crop(
    frame: &DynamicImage,
    pose: Option<&HandPose>,
) -> Result<String, CaptureError> {
    let region = match pose.and_then(HandPose::bounding_box) {
        Some(bbox) => {
            let (x, y, w, h) = padded_pixel_box(bbox, frame.width(), frame.height());
            frame.crop_imm(x, y, w, h)
        }
        None => frame.clone(),
    };

    let resized = region.resize_exact(TARGET_SIZE, TARGET_SIZE, FilterType::Triangle);

    let mut jpeg = Vec::new();
    let mut encoder = JpegEncoder::new_with_quality(&mut jpeg, JPEG_QUALITY);
    encoder.encode_image(&resized.to_rgb8())?;

    Ok(format!("data:image/jpeg;base64,{}", BASE64.encode(&jpeg)))
}

/// Convert a normalized bounding box to padded, clamped pixel coordinates.
fn padded_pixel_box(
    (min_x, min_y, max_x, max_y): (f32, f32, f32, f32),
    frame_w: u32,
    frame_h: u32,
) -> (u32, u32, u32, u32) {
    let (fw, fh) = (frame_w as f32, frame_h as f32);
    let pad_x = (max_x - min_x) * PAD_FRACTION;
    let pad_y = (max_y - min_y) * PAD_FRACTION;

    let x0 = ((min_x - pad_x) * fw).clamp(0.0, fw - 1.0);
    let y0 = ((min_y - pad_y) * fh).clamp(0.0, fh - 1.0);
    let x1 = ((max_x + pad_x) * fw).clamp(0.0, fw);
    let y1 = ((max_y + pad_y) * fh).clamp(0.0, fh);

    let w = ((x1 - x0).max(1.0)) as u32;
    let h = ((y1 - y0).max(1.0)) as u32;
    (x0 as u32, y0 as u32, w, h)
}

// ── Tests ──────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hand::landmark::{Landmark, LANDMARK_COUNT};
    use image::RgbImage;

    fn test_frame() -> DynamicImage {
        let img = RgbImage::from_fn(64, 48, |x, y| image::Rgb([x as u8, y as u8, 0]));
        DynamicImage::ImageRgb8(img)
    }

    fn centered_pose() -> HandPose {
        let mut points = vec![Landmark::new(0.5, 0.5, 0.0); LANDMARK_COUNT];
        points[0] = Landmark::new(0.3, 0.4, 0.0);
        points[20] = Landmark::new(0.7, 0.6, 0.0);
        HandPose::new(points)
    }

    fn decode(data_url: &str) -> DynamicImage {
        let b64 = data_url
            .strip_prefix("data:image/jpeg;base64,")
            .expect("data URL prefix");
        let bytes = BASE64.decode(b64).expect("valid base64");
        image::load_from_memory(&bytes).expect("decodable jpeg")
    }

    #[test]
    fn test_hand_crop_produces_target_size_jpeg() {
        let encoded = encode_hand_crop(&test_frame(), Some(&centered_pose())).unwrap();
        let decoded = decode(&encoded);
        assert_eq!(decoded.width(), TARGET_SIZE);
        assert_eq!(decoded.height(), TARGET_SIZE);
    }

    #[test]
    fn test_full_frame_without_pose() {
        let encoded = encode_hand_crop(&test_frame(), None).unwrap();
        let decoded = decode(&encoded);
        assert_eq!(decoded.width(), TARGET_SIZE);
        assert_eq!(decoded.height(), TARGET_SIZE);
    }

    #[test]
    fn test_padding_is_clamped_at_frame_edges() {
        // A bounding box touching the frame edge must clamp, not underflow.
        let mut points = vec![Landmark::new(0.02, 0.02, 0.0); LANDMARK_COUNT];
        points[20] = Landmark::new(0.99, 0.99, 0.0);
        let pose = HandPose::new(points);

        let encoded = encode_hand_crop(&test_frame(), Some(&pose)).unwrap();
        let decoded = decode(&encoded);
        assert_eq!(decoded.width(), TARGET_SIZE);
    }

    #[test]
    fn test_padded_box_math() {
        // Box 0.25-0.75 of a 100px frame, 20% padding of the 0.5 span.
        let (x, y, w, h) = padded_pixel_box((0.25, 0.25, 0.75, 0.75), 100, 100);
        assert_eq!((x, y), (15, 15));
        assert_eq!((w, h), (70, 70));
    }
}
