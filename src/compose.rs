//! Collage compositing: draws the sampled thumbnails onto the poster.
//!
//! Stage 3 of the per-group pipeline. Builds the fixed 1000×1500 portrait
//! poster from a sampled set of thumbnails:
//!
//! 1. Pick a grid shape from the sample count ([`crate::layout`]).
//! 2. Size cells by integer division; edge remainders stay background.
//! 3. Fill cells row-major. Each source is decoded, stretched to exactly
//!    the cell size (no aspect preservation; poster thumbnails are all
//!    close to 2:3 already, stretching beats cropping machinery), and
//!    drawn opaquely at its cell origin.
//! 4. Encode the canvas as JPEG bytes.
//!
//! A source that fails to decode leaves its cell blank and is reported as
//! a [`RunEvent::CellSkipped`]; only encoding the finished canvas can fail
//! the group. Cancellation is checked before every decode; loads and the
//! encode are the expensive steps, and one decoded source plus the canvas
//! is the whole memory footprint.

use crate::layout::grid_shape;
use crate::run::{RunContext, RunEvent};
use crate::select::Candidate;
use image::imageops::FilterType;
use image::{ImageEncoder, ImageReader, RgbImage};
use image::codecs::jpeg::JpegEncoder;
use thiserror::Error;

/// Poster canvas width, conventional 2:3 cover-art dimensions.
pub const CANVAS_WIDTH: u32 = 1000;
/// Poster canvas height.
pub const CANVAS_HEIGHT: u32 = 1500;

/// JPEG quality for the encoded poster.
const JPEG_QUALITY: u8 = 90;

#[derive(Error, Debug)]
pub enum ComposeError {
    /// Cancellation observed mid-composite; the partial canvas is discarded.
    #[error("compositing cancelled")]
    Cancelled,
    #[error("JPEG encode failed: {0}")]
    Encode(#[from] image::ImageError),
}

/// A finished, encoded collage.
#[derive(Debug, Clone)]
pub struct Composite {
    /// JPEG-encoded poster, ready for publication.
    pub jpeg: Vec<u8>,
    /// Cells that received an image. Anything below the sample size means
    /// sources were skipped as unreadable.
    pub filled_cells: usize,
}

/// Composite the sampled thumbnails into an encoded poster.
///
/// `samples` must be non-empty; empty samples skip the group before this
/// stage. Per-image decode failures are reported through `ctx` and leave
/// the cell blank; they never fail the collage.
pub fn compose(
    group_name: &str,
    samples: &[Candidate],
    ctx: &RunContext,
) -> Result<Composite, ComposeError> {
    debug_assert!(!samples.is_empty(), "compose requires a non-empty sample");

    let shape = grid_shape(samples.len());
    let (cell_w, cell_h) = shape.cell_size(CANVAS_WIDTH, CANVAS_HEIGHT);

    let mut canvas = RgbImage::new(CANVAS_WIDTH, CANVAS_HEIGHT);
    let mut filled_cells = 0;

    for (i, sample) in samples.iter().enumerate() {
        if ctx.is_cancelled() {
            return Err(ComposeError::Cancelled);
        }

        let tile = match load_tile(sample) {
            Ok(img) => img,
            Err(cause) => {
                ctx.emit(RunEvent::CellSkipped {
                    group: group_name.to_string(),
                    item: sample.name.clone(),
                    cause,
                });
                continue;
            }
        };

        let resized = image::imageops::resize(&tile, cell_w, cell_h, FilterType::Lanczos3);
        let (row, col) = shape.cell(i);
        image::imageops::replace(
            &mut canvas,
            &resized,
            (col * cell_w) as i64,
            (row * cell_h) as i64,
        );
        filled_cells += 1;
    }

    let mut jpeg = Vec::new();
    JpegEncoder::new_with_quality(&mut jpeg, JPEG_QUALITY).write_image(
        canvas.as_raw(),
        CANVAS_WIDTH,
        CANVAS_HEIGHT,
        image::ExtendedColorType::Rgb8,
    )?;

    Ok(Composite { jpeg, filled_cells })
}

/// Decode one source thumbnail, reducing all failure modes to a message.
fn load_tile(sample: &Candidate) -> Result<RgbImage, String> {
    let reader = ImageReader::open(&sample.path)
        .map_err(|e| format!("open {}: {e}", sample.path.display()))?;
    let img = reader
        .decode()
        .map_err(|e| format!("decode {}: {e}", sample.path.display()))?;
    Ok(img.to_rgb8())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::run::CancelToken;
    use crate::test_helpers::{candidate, decode_jpeg, drain_events, event_context, write_thumb};
    use tempfile::TempDir;

    fn sample_of(tmp: &TempDir, count: usize) -> Vec<Candidate> {
        (0..count)
            .map(|i| {
                let path = tmp.path().join(format!("s{i}.jpg"));
                write_thumb(&path, 40, 60);
                candidate(&format!("i{i}"), &format!("Sample {i}"), &path)
            })
            .collect()
    }

    #[test]
    fn composite_has_poster_dimensions() {
        let tmp = TempDir::new().unwrap();
        let samples = sample_of(&tmp, 4);
        let ctx = RunContext::new();

        let composite = compose("Test", &samples, &ctx).unwrap();
        assert_eq!(composite.filled_cells, 4);

        let decoded = decode_jpeg(&composite.jpeg);
        assert_eq!(decoded.width(), CANVAS_WIDTH);
        assert_eq!(decoded.height(), CANVAS_HEIGHT);
    }

    #[test]
    fn single_image_fills_whole_canvas() {
        let tmp = TempDir::new().unwrap();
        let samples = sample_of(&tmp, 1);
        let ctx = RunContext::new();

        let composite = compose("Test", &samples, &ctx).unwrap();
        assert_eq!(composite.filled_cells, 1);
    }

    #[test]
    fn corrupt_source_leaves_cell_blank() {
        let tmp = TempDir::new().unwrap();
        let mut samples = sample_of(&tmp, 4);

        let corrupt = tmp.path().join("corrupt.jpg");
        std::fs::write(&corrupt, b"not a jpeg at all").unwrap();
        samples[2] = candidate("bad", "Corrupt Item", &corrupt);

        let (ctx, rx) = event_context();
        let composite = compose("Action Movies", &samples, &ctx).unwrap();
        drop(ctx);

        assert_eq!(composite.filled_cells, 3);

        let events = drain_events(rx);
        assert_eq!(events.len(), 1);
        assert!(matches!(
            &events[0],
            RunEvent::CellSkipped { group, item, .. }
                if group == "Action Movies" && item == "Corrupt Item"
        ));
    }

    #[test]
    fn all_sources_corrupt_still_encodes() {
        let tmp = TempDir::new().unwrap();
        let corrupt = tmp.path().join("corrupt.jpg");
        std::fs::write(&corrupt, b"garbage").unwrap();
        let samples = vec![
            candidate("a", "A", &corrupt),
            candidate("b", "B", &corrupt),
        ];
        let ctx = RunContext::new();

        // A fully blank poster is still a valid composite; the caller
        // decides whether to publish it.
        let composite = compose("Test", &samples, &ctx).unwrap();
        assert_eq!(composite.filled_cells, 0);
        assert!(!composite.jpeg.is_empty());
    }

    #[test]
    fn cancellation_abandons_composite() {
        let tmp = TempDir::new().unwrap();
        let samples = sample_of(&tmp, 4);
        let ctx = RunContext::new();
        let token: CancelToken = ctx.cancel_token();
        token.cancel();

        let result = compose("Test", &samples, &ctx);
        assert!(matches!(result, Err(ComposeError::Cancelled)));
    }

    #[test]
    fn seven_samples_leave_trailing_cells_blank() {
        // 3×3 on 1000×1500 → 333×500 cells; cells 7 and 8 on the bottom
        // row receive no image and must stay background.
        let tmp = TempDir::new().unwrap();
        let samples = sample_of(&tmp, 7);
        let ctx = RunContext::new();

        let composite = compose("Test", &samples, &ctx).unwrap();
        assert_eq!(composite.filled_cells, 7);

        let decoded = decode_jpeg(&composite.jpeg);
        // Centers of cells (2,1) and (2,2).
        for (x, y) in [(499, 1250), (832, 1250)] {
            let px = decoded.get_pixel(x, y);
            assert!(
                px.0.iter().all(|&c| c < 24),
                "blank cell pixel at ({x},{y}) should be background, got {px:?}"
            );
        }
        // Cell (2,0) was filled by the seventh sample.
        let filled = decoded.get_pixel(166, 1250);
        assert!(filled.0.iter().any(|&c| c > 48));
    }
}
