use ndarray::ArrayViewD;
use pose::{BodyPart, KeyPoint, Person, Point};

/// Maps model-input-space coordinates into the destination view.
#[derive(Debug, Clone, Copy)]
pub struct ViewTransform {
    pub input_width: u32,
    pub input_height: u32,
    pub view_width: f32,
    pub view_height: f32,
}

/// Decode raw heatmap/offset tensors into one `Person`.
///
/// Expects heatmaps of shape `[1, H, W, 17]` and offsets `[1, H, W, 34]`
/// (first 17 channels y-offsets, next 17 x-offsets). Stateless: each frame
/// is decoded independently, with no smoothing or tracking.
pub fn decode_pose(
    heatmaps: &ArrayViewD<f32>,
    offsets: &ArrayViewD<f32>,
    transform: &ViewTransform,
) -> anyhow::Result<Person> {
    let (grid_height, grid_width) = validate_shapes(heatmaps, offsets)?;

    let parts = BodyPart::COUNT;
    let mut key_points = [KeyPoint::new(BodyPart::Nose); BodyPart::COUNT];
    let mut confidence_sum = 0.0f32;

    for (k, part) in BodyPart::ALL.iter().enumerate() {
        // Row-major argmax; strict comparison keeps the first maximal cell,
        // so ties resolve to the lowest row, then the lowest column.
        let mut best_row = 0usize;
        let mut best_col = 0usize;
        let mut best_val = f32::NEG_INFINITY;
        for row in 0..grid_height {
            for col in 0..grid_width {
                let v = heatmaps[[0, row, col, k]];
                if v > best_val {
                    best_val = v;
                    best_row = row;
                    best_col = col;
                }
            }
        }

        let confidence = sigmoid(best_val);
        confidence_sum += confidence;

        // Coarse grid position refined by the offset field. Offsets are
        // passed through as-is: no clamping, NaN included.
        let y_model = best_row as f32 / (grid_height - 1) as f32 * transform.input_height as f32
            + offsets[[0, best_row, best_col, k]];
        let x_model = best_col as f32 / (grid_width - 1) as f32 * transform.input_width as f32
            + offsets[[0, best_row, best_col, k + parts]];

        let coordinate = Point::new(
            x_model * transform.view_width / transform.input_width as f32,
            y_model * transform.view_height / transform.input_height as f32,
        );

        key_points[k] = KeyPoint {
            body_part: *part,
            coordinate,
            score: confidence,
        };
    }

    Ok(Person::new(key_points, confidence_sum / parts as f32))
}

/// Check tensor ranks and dimensions before any indexing happens, so a
/// malformed model output becomes a per-frame error instead of a panic.
fn validate_shapes(
    heatmaps: &ArrayViewD<f32>,
    offsets: &ArrayViewD<f32>,
) -> anyhow::Result<(usize, usize)> {
    anyhow::ensure!(
        heatmaps.ndim() == 4 && offsets.ndim() == 4,
        "expected 4-dim tensors, got heatmaps {}-dim / offsets {}-dim",
        heatmaps.ndim(),
        offsets.ndim()
    );

    let hs = heatmaps.shape();
    let os = offsets.shape();

    anyhow::ensure!(
        hs[0] == 1 && os[0] == 1,
        "expected batch size 1, got {} / {}",
        hs[0],
        os[0]
    );
    anyhow::ensure!(
        hs[1] > 0 && hs[2] > 0,
        "zero-size heatmap grid: {}x{}",
        hs[1],
        hs[2]
    );
    anyhow::ensure!(
        hs[3] == BodyPart::COUNT,
        "expected {} heatmap channels, got {}",
        BodyPart::COUNT,
        hs[3]
    );
    anyhow::ensure!(
        os[1] == hs[1] && os[2] == hs[2],
        "offset grid {}x{} does not match heatmap grid {}x{}",
        os[1],
        os[2],
        hs[1],
        hs[2]
    );
    anyhow::ensure!(
        os[3] == 2 * BodyPart::COUNT,
        "expected {} offset channels, got {}",
        2 * BodyPart::COUNT,
        os[3]
    );

    Ok((hs[1], hs[2]))
}

/// Sigmoid activation function
#[inline]
fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array, ArrayD, IxDyn};

    const GRID: usize = 9;
    const PARTS: usize = BodyPart::COUNT;

    fn identity_transform() -> ViewTransform {
        ViewTransform {
            input_width: 257,
            input_height: 257,
            view_width: 257.0,
            view_height: 257.0,
        }
    }

    fn zero_heatmaps() -> ArrayD<f32> {
        Array::zeros(IxDyn(&[1, GRID, GRID, PARTS]))
    }

    fn zero_offsets() -> ArrayD<f32> {
        Array::zeros(IxDyn(&[1, GRID, GRID, 2 * PARTS]))
    }

    /// Heatmaps with one hot cell per channel.
    fn hot_cell_heatmaps(row: usize, col: usize, value: f32) -> ArrayD<f32> {
        let mut heatmaps = zero_heatmaps();
        for k in 0..PARTS {
            heatmaps[[0, row, col, k]] = value;
        }
        heatmaps
    }

    #[test]
    fn produces_all_parts_in_canonical_order() {
        let heatmaps = hot_cell_heatmaps(2, 3, 5.0);
        let offsets = zero_offsets();
        let person =
            decode_pose(&heatmaps.view(), &offsets.view(), &identity_transform()).unwrap();

        assert_eq!(person.key_points.len(), PARTS);
        for (i, kp) in person.key_points.iter().enumerate() {
            assert_eq!(kp.body_part.index(), i, "parts must stay in canonical order");
        }
    }

    #[test]
    fn hot_center_cell_lands_at_view_center() {
        // Hot cell at (4,4) on a 9x9 grid, zero offsets, 257x257 input and
        // view: every keypoint should land at 4/8 * 257 = 128.5.
        let heatmaps = hot_cell_heatmaps(4, 4, 10.0);
        let offsets = zero_offsets();
        let person =
            decode_pose(&heatmaps.view(), &offsets.view(), &identity_transform()).unwrap();

        for kp in &person.key_points {
            assert!((kp.coordinate.x - 128.5).abs() < 1e-3, "x = {}", kp.coordinate.x);
            assert!((kp.coordinate.y - 128.5).abs() < 1e-3, "y = {}", kp.coordinate.y);
        }
    }

    #[test]
    fn all_zero_heatmap_scores_half() {
        let heatmaps = zero_heatmaps();
        let offsets = zero_offsets();
        let person =
            decode_pose(&heatmaps.view(), &offsets.view(), &identity_transform()).unwrap();

        for kp in &person.key_points {
            assert!((kp.score - 0.5).abs() < 1e-6);
        }
        assert!((person.score - 0.5).abs() < 1e-6);
    }

    #[test]
    fn tie_break_picks_first_in_row_major_order() {
        // Two equally-hot cells; the lower row-major index must win.
        let mut heatmaps = zero_heatmaps();
        for k in 0..PARTS {
            heatmaps[[0, 3, 7, k]] = 2.0;
            heatmaps[[0, 5, 1, k]] = 2.0;
        }
        let offsets = zero_offsets();
        let person =
            decode_pose(&heatmaps.view(), &offsets.view(), &identity_transform()).unwrap();

        let expected_x = 7.0 / 8.0 * 257.0;
        let expected_y = 3.0 / 8.0 * 257.0;
        for kp in &person.key_points {
            assert!((kp.coordinate.x - expected_x).abs() < 1e-3);
            assert!((kp.coordinate.y - expected_y).abs() < 1e-3);
        }
    }

    #[test]
    fn rerun_is_bit_identical() {
        let mut heatmaps = zero_heatmaps();
        // Same value everywhere: maximal tie pressure.
        heatmaps.fill(1.25);
        let mut offsets = zero_offsets();
        offsets.fill(0.375);

        let a = decode_pose(&heatmaps.view(), &offsets.view(), &identity_transform()).unwrap();
        let b = decode_pose(&heatmaps.view(), &offsets.view(), &identity_transform()).unwrap();

        assert_eq!(a.score.to_bits(), b.score.to_bits());
        for (ka, kb) in a.key_points.iter().zip(b.key_points.iter()) {
            assert_eq!(ka.coordinate.x.to_bits(), kb.coordinate.x.to_bits());
            assert_eq!(ka.coordinate.y.to_bits(), kb.coordinate.y.to_bits());
            assert_eq!(ka.score.to_bits(), kb.score.to_bits());
        }
    }

    #[test]
    fn confidences_stay_in_open_unit_interval() {
        let mut heatmaps = zero_heatmaps();
        for k in 0..PARTS {
            // Stay below f32 sigmoid saturation so the bound is strict.
            heatmaps[[0, k % GRID, (k * 3) % GRID, k]] = (k as f32 - 8.0) * 1.5;
        }
        let offsets = zero_offsets();
        let person =
            decode_pose(&heatmaps.view(), &offsets.view(), &identity_transform()).unwrap();

        for kp in &person.key_points {
            assert!(kp.score > 0.0 && kp.score < 1.0, "score = {}", kp.score);
        }
        assert!(person.score > 0.0 && person.score < 1.0);
    }

    #[test]
    fn view_scaling_is_linear() {
        let heatmaps = hot_cell_heatmaps(6, 2, 3.0);
        let mut offsets = zero_offsets();
        offsets.fill(1.5);

        let base = identity_transform();
        let scaled = ViewTransform {
            view_width: base.view_width * 3.0,
            view_height: base.view_height * 3.0,
            ..base
        };

        let a = decode_pose(&heatmaps.view(), &offsets.view(), &base).unwrap();
        let b = decode_pose(&heatmaps.view(), &offsets.view(), &scaled).unwrap();

        for (ka, kb) in a.key_points.iter().zip(b.key_points.iter()) {
            assert!((kb.coordinate.x - ka.coordinate.x * 3.0).abs() < 1e-3);
            assert!((kb.coordinate.y - ka.coordinate.y * 3.0).abs() < 1e-3);
        }
    }

    #[test]
    fn offset_refines_coarse_position() {
        let heatmaps = hot_cell_heatmaps(4, 4, 10.0);
        let mut offsets = zero_offsets();
        for k in 0..PARTS {
            offsets[[0, 4, 4, k]] = -10.0; // y offset
            offsets[[0, 4, 4, k + PARTS]] = 20.0; // x offset
        }
        let person =
            decode_pose(&heatmaps.view(), &offsets.view(), &identity_transform()).unwrap();

        for kp in &person.key_points {
            assert!((kp.coordinate.x - 148.5).abs() < 1e-3);
            assert!((kp.coordinate.y - 118.5).abs() < 1e-3);
        }
    }

    #[test]
    fn nan_offsets_pass_through() {
        let heatmaps = hot_cell_heatmaps(1, 1, 4.0);
        let mut offsets = zero_offsets();
        offsets.fill(f32::NAN);

        let person =
            decode_pose(&heatmaps.view(), &offsets.view(), &identity_transform()).unwrap();
        assert!(person.key_points[0].coordinate.x.is_nan());
        // Confidence comes from the heatmap alone, untouched by offsets.
        assert!(person.key_points[0].score > 0.9);
    }

    #[test]
    fn degenerate_shapes_fail_cleanly() {
        let offsets = zero_offsets();
        let transform = identity_transform();

        let zero_height: ArrayD<f32> = Array::zeros(IxDyn(&[1, 0, GRID, PARTS]));
        assert!(decode_pose(&zero_height.view(), &offsets.view(), &transform).is_err());

        let zero_width: ArrayD<f32> = Array::zeros(IxDyn(&[1, GRID, 0, PARTS]));
        assert!(decode_pose(&zero_width.view(), &offsets.view(), &transform).is_err());

        let wrong_parts: ArrayD<f32> = Array::zeros(IxDyn(&[1, GRID, GRID, 16]));
        assert!(decode_pose(&wrong_parts.view(), &offsets.view(), &transform).is_err());

        let heatmaps = zero_heatmaps();
        let wrong_offsets: ArrayD<f32> = Array::zeros(IxDyn(&[1, GRID, GRID, PARTS]));
        assert!(decode_pose(&heatmaps.view(), &wrong_offsets.view(), &transform).is_err());

        let mismatched_grid: ArrayD<f32> = Array::zeros(IxDyn(&[1, 5, 5, 2 * PARTS]));
        assert!(decode_pose(&heatmaps.view(), &mismatched_grid.view(), &transform).is_err());

        let three_dim: ArrayD<f32> = Array::zeros(IxDyn(&[GRID, GRID, PARTS]));
        assert!(decode_pose(&three_dim.view(), &offsets.view(), &transform).is_err());
    }

    #[test]
    fn sigmoid_basics() {
        assert!((sigmoid(0.0) - 0.5).abs() < 1e-6);
        assert!(sigmoid(10.0) > 0.99);
        assert!(sigmoid(-10.0) < 0.01);
    }
}
