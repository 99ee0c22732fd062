//! Contour line (isoline) extraction using the marching squares algorithm.
//!
//! Contours are traced in grid index space and then mapped onto the
//! grid's (theta, r) axes, so the drawing backend can project them the
//! same way it projects any other data-space path.

use viz_common::PolarGrid;

/// A point in grid index space (`x` = column, `y` = row)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    fn distance(&self, other: &Point) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

/// A line segment between two points
#[derive(Debug, Clone)]
pub struct Segment {
    pub start: Point,
    pub end: Point,
}

/// A complete contour line (polyline) in index space
#[derive(Debug, Clone)]
pub struct Contour {
    pub level: f64,
    pub points: Vec<Point>,
    pub closed: bool,
}

/// A contour line mapped onto polar data coordinates
#[derive(Debug, Clone)]
pub struct PolarContour {
    pub level: f64,
    /// (theta, r) pairs
    pub points: Vec<(f64, f64)>,
    pub closed: bool,
}

/// Tick steps tried, per decade, when choosing automatic levels.
const NICE_STEPS: [f64; 5] = [1.0, 2.0, 2.5, 5.0, 10.0];

/// Choose about `count` evenly spaced, round-numbered levels strictly inside
/// `(min_value, max_value)`.
///
/// The step is the smallest of 1, 2, 2.5, 5 or 10 times a power of ten
/// that covers the range in at most `count + 1` intervals.
pub fn nice_levels(min_value: f64, max_value: f64, count: usize) -> Vec<f64> {
    if count == 0 || !min_value.is_finite() || !max_value.is_finite() || max_value <= min_value {
        return vec![];
    }

    let bins = (count + 1) as f64;
    let raw_step = (max_value - min_value) / bins;
    let scale = 10f64.powf(raw_step.log10().floor());

    for multiplier in NICE_STEPS {
        let step = multiplier * scale;
        if step < raw_step * (1.0 - 1e-9) {
            continue;
        }
        let low = (min_value / step).floor();
        let high = (max_value / step).ceil();
        if high - low > bins {
            continue;
        }
        let levels: Vec<f64> = (low as i64..=high as i64)
            .map(|k| k as f64 * step)
            .filter(|&level| level > min_value && level < max_value)
            .collect();
        if !levels.is_empty() {
            return levels;
        }
    }

    // Range too narrow for any round level: fall back to the midpoint
    vec![(min_value + max_value) / 2.0]
}

/// Marching squares algorithm to generate contour lines
///
/// # Arguments
/// * `data` - Grid data in row-major order
/// * `width` - Grid width
/// * `height` - Grid height
/// * `level` - Contour level to extract
///
/// # Returns
/// Vector of line segments representing the contour
pub fn march_squares(data: &[f64], width: usize, height: usize, level: f64) -> Vec<Segment> {
    if width < 2 || height < 2 || data.len() != width * height {
        return vec![];
    }

    let mut segments = Vec::new();

    for y in 0..(height - 1) {
        for x in 0..(width - 1) {
            let tl = data[y * width + x];
            let tr = data[y * width + x + 1];
            let bl = data[(y + 1) * width + x];
            let br = data[(y + 1) * width + x + 1];

            if tl.is_nan() || tr.is_nan() || bl.is_nan() || br.is_nan() {
                continue;
            }

            // Calculate cell index (0-15) based on which corners are above the threshold
            let mut cell_index = 0;
            if tl >= level { cell_index |= 1; }
            if tr >= level { cell_index |= 2; }
            if br >= level { cell_index |= 4; }
            if bl >= level { cell_index |= 8; }

            segments.extend(get_cell_segments(
                cell_index,
                x as f64, y as f64,
                tl, tr, br, bl,
                level,
            ));
        }
    }

    segments
}

/// Get line segments for a marching squares cell
///
/// Uses linear interpolation to find where the contour crosses cell edges
fn get_cell_segments(
    cell_index: u8,
    x: f64,
    y: f64,
    tl: f64,
    tr: f64,
    br: f64,
    bl: f64,
    level: f64,
) -> Vec<Segment> {
    let top = interpolate_edge(x, y, x + 1.0, y, tl, tr, level);
    let right = interpolate_edge(x + 1.0, y, x + 1.0, y + 1.0, tr, br, level);
    let bottom = interpolate_edge(x, y + 1.0, x + 1.0, y + 1.0, bl, br, level);
    let left = interpolate_edge(x, y, x, y + 1.0, tl, bl, level);

    match cell_index {
        0 | 15 => vec![],
        1 | 14 => vec![Segment { start: left, end: top }],
        2 | 13 => vec![Segment { start: top, end: right }],
        3 | 12 => vec![Segment { start: left, end: right }],
        4 | 11 => vec![Segment { start: right, end: bottom }],
        5 => vec![ // Saddle case - two separate segments
            Segment { start: left, end: top },
            Segment { start: right, end: bottom },
        ],
        6 | 9 => vec![Segment { start: top, end: bottom }],
        7 | 8 => vec![Segment { start: left, end: bottom }],
        10 => vec![ // Saddle case - two separate segments
            Segment { start: top, end: right },
            Segment { start: left, end: bottom },
        ],
        _ => vec![],
    }
}

/// Linearly interpolate between two edge points based on data values
fn interpolate_edge(
    x1: f64,
    y1: f64,
    x2: f64,
    y2: f64,
    val1: f64,
    val2: f64,
    level: f64,
) -> Point {
    if (val2 - val1).abs() < 1e-12 {
        return Point::new((x1 + x2) / 2.0, (y1 + y2) / 2.0);
    }

    let t = ((level - val1) / (val2 - val1)).clamp(0.0, 1.0);

    Point::new(x1 + t * (x2 - x1), y1 + t * (y2 - y1))
}

/// Connect line segments into continuous polylines
///
/// Takes a collection of unordered segments and chains those whose
/// endpoints coincide. Chains grow from both ends.
pub fn connect_segments(segments: Vec<Segment>) -> Vec<Contour> {
    if segments.is_empty() {
        return vec![];
    }

    let mut contours = Vec::new();
    let mut used = vec![false; segments.len()];
    let epsilon = 1e-9;

    for start_idx in 0..segments.len() {
        if used[start_idx] {
            continue;
        }

        let mut points = vec![segments[start_idx].start, segments[start_idx].end];
        used[start_idx] = true;

        // Extend forward from the tail, then backward from the head
        for forward in [true, false] {
            let mut changed = true;
            while changed {
                changed = false;
                let current = if forward { points[points.len() - 1] } else { points[0] };

                for (i, seg) in segments.iter().enumerate() {
                    if used[i] {
                        continue;
                    }

                    let next = if seg.start.distance(&current) < epsilon {
                        Some(seg.end)
                    } else if seg.end.distance(&current) < epsilon {
                        Some(seg.start)
                    } else {
                        None
                    };

                    if let Some(next) = next {
                        if forward {
                            points.push(next);
                        } else {
                            points.insert(0, next);
                        }
                        used[i] = true;
                        changed = true;
                        break;
                    }
                }
            }
        }

        let closed = points.len() > 2 && points[0].distance(&points[points.len() - 1]) < epsilon;

        contours.push(Contour {
            level: 0.0, // Level will be set by caller
            points,
            closed,
        });
    }

    contours
}

/// Generate all contours for multiple levels
pub fn generate_all_contours(
    data: &[f64],
    width: usize,
    height: usize,
    levels: &[f64],
) -> Vec<Contour> {
    let mut all_contours = Vec::new();

    for &level in levels {
        let mut contours = connect_segments(march_squares(data, width, height, level));
        if contours.is_empty() {
            contours = extremum_points(data, width, level);
        }
        for contour in &mut contours {
            contour.level = level;
        }
        all_contours.extend(contours);
    }

    all_contours
}

/// Single-point contours at the nodes where a non-constant field touches
/// `level` as its minimum or maximum. Marching squares never crosses such a
/// level since no cell has corners on both sides of it.
fn extremum_points(data: &[f64], width: usize, level: f64) -> Vec<Contour> {
    if width == 0 {
        return Vec::new();
    }
    let finite = data.iter().copied().filter(|v| v.is_finite());
    let (min, max) = finite.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if min >= max || (level != min && level != max) {
        return Vec::new();
    }

    data.iter()
        .enumerate()
        .filter(|&(_, &v)| v == level)
        .map(|(i, _)| Contour {
            level,
            points: vec![Point::new((i % width) as f64, (i / width) as f64)],
            closed: false,
        })
        .collect()
}

/// Trace iso-lines of a polar grid and map them onto (theta, r).
pub fn polar_contours(grid: &PolarGrid, levels: &[f64]) -> Vec<PolarContour> {
    let width = grid.radii.len();
    let height = grid.thetas.len();

    let contours = generate_all_contours(&grid.values, width, height, levels);

    tracing::debug!(
        grid_width = width,
        grid_height = height,
        num_levels = levels.len(),
        num_contours = contours.len(),
        "Traced polar contours"
    );

    contours
        .into_iter()
        .map(|contour| PolarContour {
            level: contour.level,
            points: contour
                .points
                .iter()
                .map(|p| (axis_value(&grid.thetas, p.y), axis_value(&grid.radii, p.x)))
                .collect(),
            closed: contour.closed,
        })
        .collect()
}

/// Value of a monotone axis at a fractional index.
fn axis_value(axis: &[f64], index: f64) -> f64 {
    if axis.is_empty() {
        return f64::NAN;
    }
    let last = axis.len() - 1;
    let index = index.clamp(0.0, last as f64);
    let lower = index.floor() as usize;
    if lower >= last {
        return axis[last];
    }
    let t = index - lower as f64;
    axis[lower] + t * (axis[lower + 1] - axis[lower])
}
