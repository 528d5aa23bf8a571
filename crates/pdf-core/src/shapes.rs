//! Vector shapes

use crate::document::Color;

/// Control point distance for approximating a quarter circle with one cubic Bézier
const KAPPA: f64 = 0.552_284_749_8;

/// Generate operators for a filled circle
///
/// PDF has no circle operator, so the outline is four Bézier segments
/// starting at the rightmost point and running counter-clockwise.
///
/// # Arguments
/// * `cx`, `cy` - Center in points (PDF coordinates)
/// * `radius` - Radius in points
/// * `color` - Fill color
pub fn generate_circle_operators(cx: f64, cy: f64, radius: f64, color: Color) -> Vec<u8> {
    let k = radius * KAPPA;
    let (left, right) = (cx - radius, cx + radius);
    let (bottom, top) = (cy - radius, cy + radius);

    let mut ops = String::new();
    ops.push_str("q\n");
    ops.push_str(&format!("{} {} {} rg\n", color.r, color.g, color.b));
    ops.push_str(&format!("{right} {cy} m\n"));
    ops.push_str(&format!("{right} {} {} {top} {cx} {top} c\n", cy + k, cx + k));
    ops.push_str(&format!("{} {top} {left} {} {left} {cy} c\n", cx - k, cy + k));
    ops.push_str(&format!("{left} {} {} {bottom} {cx} {bottom} c\n", cy - k, cx - k));
    ops.push_str(&format!("{} {bottom} {right} {} {right} {cy} c\n", cx + k, cy - k));
    ops.push_str("f\n");
    ops.push_str("Q\n");

    ops.into_bytes()
}
