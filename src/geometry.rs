//! Plane geometry used to translate Figma gradient handles into CSS.
//!
//! Figma stores gradients as handle positions normalized to the 0–1 box of
//! the painted node. CSS wants an angle plus stop percentages measured along
//! the gradient line that touches the box corners. Everything here works in
//! screen coordinates (y grows downwards).

use thiserror::Error;

use crate::types::{Paint, Vector};

/// Side of the synthetic box the gradient is projected onto.
const GRADIENT_BOX: f64 = 100.0;
/// Length used when a finite segment has to stand in for an infinite line.
const LINE_LENGTH: f64 = 1000.0;
/// Gradient handles scale this much from the ellipse radii (Figma handle convention).
const ELLIPSE_HANDLE_SCALE: f64 = 1.5;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum GeometryError {
    #[error("lines are parallel or coincident; no single intersection")]
    Parallel,
    #[error("gradient needs 3 handles, found {found}")]
    NotEnoughHandles { found: usize },
}

/// Point where line `p1`–`p2` crosses line `p3`–`p4`.
pub fn intersect(p1: Vector, p2: Vector, p3: Vector, p4: Vector) -> Result<Vector, GeometryError> {
    let denominator = (p1.x - p2.x) * (p3.y - p4.y) - (p1.y - p2.y) * (p3.x - p4.x);
    if denominator == 0.0 {
        return Err(GeometryError::Parallel);
    }
    let a = p1.x * p2.y - p1.y * p2.x;
    let b = p3.x * p4.y - p3.y * p4.x;
    Ok(Vector {
        x: (a * (p3.x - p4.x) - (p1.x - p2.x) * b) / denominator,
        y: (a * (p3.y - p4.y) - (p1.y - p2.y) * b) / denominator,
    })
}

/// Rotates `point` around `pivot` by `angle` degrees.
pub fn rotate(pivot: Vector, point: Vector, angle: f64) -> Vector {
    let (sin, cos) = angle.to_radians().sin_cos();
    let dx = point.x - pivot.x;
    let dy = point.y - pivot.y;
    Vector {
        x: cos * dx - sin * dy + pivot.x,
        y: sin * dx + cos * dy + pivot.y,
    }
}

/// Point on the handle ellipse around `pivot` at `angle` degrees.
///
/// The radii are scaled by 1.5 and the angle offset by 180° to line up with
/// where Figma draws its gradient handles.
pub fn rotate_ellipse(pivot: Vector, x_radius: f64, y_radius: f64, angle: f64) -> Vector {
    let (sin, cos) = (180.0 + angle).to_radians().sin_cos();
    Vector {
        x: pivot.x + ELLIPSE_HANDLE_SCALE * x_radius * cos,
        y: pivot.y + ELLIPSE_HANDLE_SCALE * y_radius * sin,
    }
}

/// CSS angle (degrees, `[0, 360)`, two decimals) of a 3-handle gradient.
///
/// Handles are `[pivot, direction, angle guide]`. The guide may sit on
/// either side of the pivot→direction axis, so it is first normalized into
/// the axis frame and pivot/guide are swapped when it lies on the far side.
pub fn gradient_angle(handles: &[Vector]) -> Result<f64, GeometryError> {
    if handles.len() < 3 {
        return Err(GeometryError::NotEnoughHandles {
            found: handles.len(),
        });
    }
    let (pivot, direction, guide) = (handles[0], handles[1], handles[2]);

    let reference = slope_angle(pivot, direction);
    let normalized_guide = rotate(pivot, guide, -reference);

    let (from, to) = if normalized_guide.y > pivot.y {
        (pivot, guide)
    } else {
        (guide, pivot)
    };

    Ok(round2(slope_angle(from, to)))
}

/// `[angle, stop_1 %, …, stop_n %]` for a CSS `linear-gradient()`.
pub fn linear_gradient_params(paint: &Paint) -> Result<Vec<f64>, GeometryError> {
    let handles = &paint.gradient_handle_positions;
    let angle = gradient_angle(handles)?;

    let start = scale(handles[0]);
    let end = scale(handles[1]);
    let center = Vector {
        x: GRADIENT_BOX / 2.0,
        y: GRADIENT_BOX / 2.0,
    };

    let (sin, cos) = angle.to_radians().sin_cos();
    let direction = Vector { x: sin, y: -cos };
    let line_start = Vector {
        x: center.x - direction.x * LINE_LENGTH,
        y: center.y - direction.y * LINE_LENGTH,
    };
    let line_end = Vector {
        x: center.x + direction.x * LINE_LENGTH,
        y: center.y + direction.y * LINE_LENGTH,
    };

    let project = |p: Vector| (p.x - center.x) * direction.x + (p.y - center.y) * direction.y;
    let corners = [
        Vector { x: 0.0, y: 0.0 },
        Vector {
            x: GRADIENT_BOX,
            y: 0.0,
        },
        Vector {
            x: GRADIENT_BOX,
            y: GRADIENT_BOX,
        },
        Vector {
            x: 0.0,
            y: GRADIENT_BOX,
        },
    ];
    let mut first_corner = corners[0];
    let mut last_corner = corners[0];
    for corner in corners.iter().copied().skip(1) {
        if project(corner) < project(first_corner) {
            first_corner = corner;
        }
        if project(corner) > project(last_corner) {
            last_corner = corner;
        }
    }

    // The CSS gradient line starts and ends where the lines perpendicular to
    // it through the extreme corners cross it.
    let css_start = intersect(line_start, line_end, first_corner, perpendicular(first_corner, angle))?;
    let css_end = intersect(line_start, line_end, last_corner, perpendicular(last_corner, angle))?;
    let total = distance(css_start, css_end);

    let mut params = Vec::with_capacity(paint.gradient_stops.len() + 1);
    params.push(angle);
    for stop in &paint.gradient_stops {
        let on_handles = Vector {
            x: start.x + (end.x - start.x) * stop.position,
            y: start.y + (end.y - start.y) * stop.position,
        };
        let projected = intersect(line_start, line_end, on_handles, perpendicular(on_handles, angle))?;
        let offset = (projected.x - css_start.x) * direction.x + (projected.y - css_start.y) * direction.y;
        params.push(round2(offset / total * 100.0));
    }
    Ok(params)
}

/// `[x radius %, y radius %, x center %, y center %]` for a CSS `radial-gradient()`.
pub fn radial_gradient_params(paint: &Paint) -> Result<[f64; 4], GeometryError> {
    let handles = &paint.gradient_handle_positions;
    if handles.len() < 3 {
        return Err(GeometryError::NotEnoughHandles {
            found: handles.len(),
        });
    }
    let center = handles[0];
    Ok([
        round2(distance(center, handles[1]) * 100.0),
        round2(distance(center, handles[2]) * 100.0),
        round2(center.x * 100.0),
        round2(center.y * 100.0),
    ])
}

/// Angle of the segment `from`→`to` in degrees, `[0, 360)`.
fn slope_angle(from: Vector, to: Vector) -> f64 {
    let dx = to.x - from.x;
    let dy = to.y - from.y;
    if dx == 0.0 {
        return if dy > 0.0 {
            90.0
        } else if dy < 0.0 {
            270.0
        } else {
            0.0
        };
    }
    let base = (dy / dx).atan().to_degrees();
    if dx > 0.0 {
        if dy >= 0.0 {
            base
        } else {
            base + 360.0
        }
    } else {
        base + 180.0
    }
}

fn perpendicular(through: Vector, angle: f64) -> Vector {
    rotate(
        through,
        Vector {
            x: through.x + LINE_LENGTH,
            y: through.y,
        },
        angle,
    )
}

fn scale(v: Vector) -> Vector {
    Vector {
        x: v.x * GRADIENT_BOX,
        y: v.y * GRADIENT_BOX,
    }
}

fn distance(a: Vector, b: Vector) -> f64 {
    ((b.x - a.x).powi(2) + (b.y - a.y).powi(2)).sqrt()
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
