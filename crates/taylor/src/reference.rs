//! Centered RMS difference contours.
//!
//! For a sample at (r, theta) the centered RMS difference to the
//! reference point follows from the law of cosines:
//! `sqrt(refstd^2 + r^2 - 2 refstd r cos(theta))`.

use std::f64::consts::FRAC_PI_2;

use renderer::contour::nice_levels;
use serde::{Deserialize, Serialize};
use viz_common::{ArtistId, LineStyle, PolarGrid, Surface, VizError, VizResult};

use crate::diagram::{linspace, TaylorDiagram, ARC_SAMPLES};

/// Centered RMS difference of a sample at `(r, theta)` to a reference of
/// standard deviation `refstd` (which sits at theta = 0).
pub fn rms(refstd: f64, r: f64, theta: f64) -> f64 {
    // Clamp rounding noise at the reference point itself
    (refstd * refstd + r * r - 2.0 * refstd * r * theta.cos())
        .max(0.0)
        .sqrt()
}

/// RMS difference sampled on `ARC_SAMPLES` radii across `std_range` and
/// `ARC_SAMPLES` angles across the quarter disc.
///
/// When `refstd` lies inside `std_range` it is added to the radii, so the
/// grid holds the field's zero at the reference point.
pub fn rms_grid(refstd: f64, std_range: (f64, f64)) -> PolarGrid {
    let mut radii = linspace(std_range.0, std_range.1, ARC_SAMPLES);
    if refstd > std_range.0 && refstd < std_range.1 {
        let at = radii.partition_point(|&r| r < refstd);
        if radii[at] != refstd {
            radii.insert(at, refstd);
        }
    }

    PolarGrid::from_fn(linspace(0.0, FRAC_PI_2, ARC_SAMPLES), radii, |theta, r| {
        rms(refstd, r, theta)
    })
}

/// Which iso-lines to draw: a count resolved to round values across the
/// grid's range, or explicit values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ContourLevels {
    Count(usize),
    Values(Vec<f64>),
}

impl Default for ContourLevels {
    fn default() -> Self {
        ContourLevels::Count(5)
    }
}

impl ContourLevels {
    /// Concrete levels for a field spanning `(min, max)`.
    pub fn resolve(&self, value_range: (f64, f64)) -> VizResult<Vec<f64>> {
        match self {
            ContourLevels::Count(count) => Ok(nice_levels(value_range.0, value_range.1, *count)),
            ContourLevels::Values(values) => {
                if let Some(&v) = values.iter().find(|v| !v.is_finite()) {
                    return Err(VizError::invalid(
                        "levels",
                        format!("contour level {} is not finite", v),
                    ));
                }
                if values.windows(2).any(|pair| pair[0] >= pair[1]) {
                    return Err(VizError::invalid(
                        "levels",
                        "contour levels must be strictly increasing",
                    ));
                }
                Ok(values.clone())
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ContourOptions {
    pub levels: ContourLevels,
    pub style: LineStyle,
}

/// Handle to a drawn set of RMS contours.
#[derive(Debug, Clone, PartialEq)]
pub struct ContourSet {
    /// `None` when no level fell inside the field
    pub artist: Option<ArtistId>,
    pub levels: Vec<f64>,
    /// (min, max) of the sampled RMS field
    pub value_range: (f64, f64),
}

impl<S: Surface> TaylorDiagram<S> {
    /// Draw centered RMS difference iso-lines around the reference point.
    pub fn add_contours(&mut self, options: &ContourOptions) -> VizResult<ContourSet> {
        let grid = rms_grid(self.config.refstd, self.config.std_range);
        let value_range = grid.value_range().ok_or_else(|| {
            VizError::Render("RMS grid has no finite values".to_string())
        })?;
        let levels = options.levels.resolve(value_range)?;

        if levels.is_empty() {
            tracing::warn!(
                min = value_range.0,
                max = value_range.1,
                "No contour levels to draw"
            );
            return Ok(ContourSet {
                artist: None,
                levels,
                value_range,
            });
        }

        let artist = self
            .surface
            .contour(self.frame, &grid, &levels, &options.style)?;

        tracing::debug!(
            levels = ?levels,
            min = value_range.0,
            max = value_range.1,
            "Added RMS contours"
        );

        Ok(ContourSet {
            artist: Some(artist),
            levels,
            value_range,
        })
    }
}
