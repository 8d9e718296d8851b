//! Shape helpers for the charts plotters has no series for: pie wedges,
//! sunburst rings and squarified treemaps.

use std::f64::consts::TAU;

/// Point at `radius` and `turn` (fraction of a full circle, clockwise from 12 o'clock), y up
pub fn polar_point(radius: f64, turn: f64) -> (f64, f64) {
    let angle = turn * TAU;
    (radius * angle.sin(), radius * angle.cos())
}

/// Outline of an annular sector between two turns.
/// With `inner == 0` the sector closes on the centre.
pub fn wedge(start: f64, end: f64, inner: f64, outer: f64) -> Vec<(f64, f64)> {
    let steps = (((end - start) * 120.0).ceil() as usize).max(2);
    let turn_at = |i: usize| start + (end - start) * i as f64 / steps as f64;

    let mut points: Vec<(f64, f64)> = (0..=steps).map(|i| polar_point(outer, turn_at(i))).collect();
    if inner > 0.0 {
        points.extend((0..=steps).rev().map(|i| polar_point(inner, turn_at(i))));
    } else {
        points.push((0.0, 0.0));
    }
    points
}

/// Closed circle outline, used for polar guide rings
pub fn ring(radius: f64) -> Vec<(f64, f64)> {
    (0..=120).map(|i| polar_point(radius, i as f64 / 120.0)).collect()
}

// =============================================================================
// Hierarchies
// =============================================================================

/// One node of a path hierarchy; `value` is the sum over its subtree
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub label: String,
    pub value: f64,
    pub children: Vec<Node>,
}

/// Group rows by path prefix, summing values. Order follows first appearance.
pub fn build_hierarchy(paths: &[Vec<String>], values: &[f64]) -> Vec<Node> {
    let mut roots: Vec<Node> = Vec::new();
    for (path, &value) in paths.iter().zip(values) {
        let mut level = &mut roots;
        for label in path {
            let pos = match level.iter().position(|n| &n.label == label) {
                Some(pos) => pos,
                None => {
                    level.push(Node {
                        label: label.clone(),
                        value: 0.0,
                        children: Vec::new(),
                    });
                    level.len() - 1
                }
            };
            level[pos].value += value;
            level = &mut level[pos].children;
        }
    }
    roots
}

pub fn depth(nodes: &[Node]) -> usize {
    nodes
        .iter()
        .map(|n| 1 + depth(&n.children))
        .max()
        .unwrap_or(0)
}

// =============================================================================
// Squarified treemap
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    pub fn inset(&self, left: f64, top: f64, right: f64, bottom: f64) -> Rect {
        Rect {
            x: self.x + left,
            y: self.y + top,
            w: (self.w - left - right).max(0.0),
            h: (self.h - top - bottom).max(0.0),
        }
    }

    pub fn center(&self) -> (f64, f64) {
        (self.x + self.w / 2.0, self.y + self.h / 2.0)
    }
}

/// Lay out `values` as rectangles tiling `bounds` with areas proportional to
/// the values, keeping aspect ratios close to 1 (Bruls, Huizing, van Wijk).
/// The result is indexed like the input; zero values get empty rectangles.
pub fn squarify(values: &[f64], bounds: Rect) -> Vec<Rect> {
    let empty = Rect { x: bounds.x, y: bounds.y, w: 0.0, h: 0.0 };
    let mut out = vec![empty; values.len()];

    let total: f64 = values.iter().filter(|v| **v > 0.0).sum();
    if total <= 0.0 || bounds.w <= 0.0 || bounds.h <= 0.0 {
        return out;
    }

    let scale = bounds.w * bounds.h / total;
    let mut order: Vec<usize> = (0..values.len()).filter(|&i| values[i] > 0.0).collect();
    order.sort_by(|&a, &b| values[b].partial_cmp(&values[a]).unwrap_or(std::cmp::Ordering::Equal));

    let mut free = bounds;
    let mut row: Vec<(usize, f64)> = Vec::new();

    for idx in order {
        let area = values[idx] * scale;
        let side = free.w.min(free.h);
        if row.is_empty() {
            row.push((idx, area));
            continue;
        }
        let current = worst_ratio(&row, side);
        row.push((idx, area));
        if worst_ratio(&row, side) > current {
            row.pop();
            free = lay_row(&row, free, &mut out);
            row.clear();
            row.push((idx, area));
        }
    }
    if !row.is_empty() {
        lay_row(&row, free, &mut out);
    }
    out
}

fn worst_ratio(row: &[(usize, f64)], side: f64) -> f64 {
    let sum: f64 = row.iter().map(|(_, a)| a).sum();
    let side_sq = side * side;
    row.iter()
        .map(|(_, a)| f64::max(side_sq * a / (sum * sum), (sum * sum) / (side_sq * a)))
        .fold(0.0, f64::max)
}

/// Place a finished row along the shorter side of `free`, returning what is left
fn lay_row(row: &[(usize, f64)], free: Rect, out: &mut [Rect]) -> Rect {
    let sum: f64 = row.iter().map(|(_, a)| a).sum();
    if free.w >= free.h {
        // Column on the left
        let width = if free.h > 0.0 { sum / free.h } else { 0.0 };
        let mut y = free.y;
        for &(idx, area) in row {
            let h = if width > 0.0 { area / width } else { 0.0 };
            out[idx] = Rect { x: free.x, y, w: width, h };
            y += h;
        }
        Rect { x: free.x + width, y: free.y, w: (free.w - width).max(0.0), h: free.h }
    } else {
        // Row along the top
        let height = if free.w > 0.0 { sum / free.w } else { 0.0 };
        let mut x = free.x;
        for &(idx, area) in row {
            let w = if height > 0.0 { area / height } else { 0.0 };
            out[idx] = Rect { x, y: free.y, w, h: height };
            x += w;
        }
        Rect { x: free.x, y: free.y + height, w: free.w, h: (free.h - height).max(0.0) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_polar_point_orientation() {
        let (x, y) = polar_point(1.0, 0.0);
        assert!(x.abs() < EPS && (y - 1.0).abs() < EPS);
        // A quarter turn clockwise lands on the right
        let (x, y) = polar_point(1.0, 0.25);
        assert!((x - 1.0).abs() < EPS && y.abs() < EPS);
    }

    #[test]
    fn test_wedge_closes_on_centre() {
        let pts = wedge(0.0, 0.5, 0.0, 1.0);
        assert_eq!(*pts.last().unwrap(), (0.0, 0.0));
        let annulus = wedge(0.0, 0.5, 0.5, 1.0);
        assert!(!annulus.contains(&(0.0, 0.0)));
    }

    #[test]
    fn test_build_hierarchy_sums_prefixes() {
        let paths = vec![
            vec!["Rock".to_string(), "A".to_string()],
            vec!["Pop".to_string(), "B".to_string()],
            vec!["Rock".to_string(), "C".to_string()],
        ];
        let roots = build_hierarchy(&paths, &[1.0, 2.0, 3.0]);
        assert_eq!(roots.len(), 2);
        assert_eq!(roots[0].label, "Rock");
        assert_eq!(roots[0].value, 4.0);
        assert_eq!(roots[0].children.len(), 2);
        assert_eq!(depth(&roots), 2);
    }

    #[test]
    fn test_squarify_areas_proportional() {
        let bounds = Rect { x: 0.0, y: 0.0, w: 1.0, h: 1.0 };
        let values = [6.0, 6.0, 4.0, 3.0, 2.0, 2.0, 1.0];
        let rects = squarify(&values, bounds);
        let total: f64 = values.iter().sum();
        for (rect, value) in rects.iter().zip(values.iter()) {
            assert!((rect.w * rect.h - value / total).abs() < 1e-9);
            assert!(rect.x >= -EPS && rect.x + rect.w <= 1.0 + 1e-9);
            assert!(rect.y >= -EPS && rect.y + rect.h <= 1.0 + 1e-9);
        }
    }

    #[test]
    fn test_squarify_zero_value() {
        let bounds = Rect { x: 0.0, y: 0.0, w: 2.0, h: 1.0 };
        let rects = squarify(&[1.0, 0.0], bounds);
        assert!((rects[0].w * rects[0].h - 2.0).abs() < 1e-9);
        assert_eq!(rects[1].w * rects[1].h, 0.0);
    }

    #[test]
    fn test_rect_inset() {
        let r = Rect { x: 0.0, y: 0.0, w: 1.0, h: 1.0 }.inset(0.1, 0.2, 0.1, 0.0);
        assert!((r.w - 0.8).abs() < EPS && (r.h - 0.8).abs() < EPS);
        let (cx, cy) = r.center();
        assert!((cx - 0.5).abs() < EPS && (cy - 0.6).abs() < EPS);
    }
}
