//! Polygon fill helpers.
//!
//! egui only fills convex paths correctly, so state outlines are cut into
//! triangles by ear clipping before being turned into a mesh.

use eframe::egui::Pos2;

/// Twice the signed area of the triangle (a, b, c).
fn cross(a: Pos2, b: Pos2, c: Pos2) -> f32 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

/// Twice the signed area of a ring (shoelace).
pub fn signed_area2(points: &[Pos2]) -> f32 {
    let n = points.len();
    (0..n)
        .map(|i| {
            let a = points[i];
            let b = points[(i + 1) % n];
            a.x * b.y - b.x * a.y
        })
        .sum()
}

fn in_triangle(p: Pos2, a: Pos2, b: Pos2, c: Pos2) -> bool {
    cross(a, b, p) >= 0.0 && cross(b, c, p) >= 0.0 && cross(c, a, p) >= 0.0
}

/// Drops sub-pixel steps and the closing duplicate from a projected ring.
pub fn simplify_ring(points: &[Pos2], min_step: f32) -> Vec<Pos2> {
    let min_step_sq = min_step * min_step;
    let mut out: Vec<Pos2> = Vec::with_capacity(points.len());

    for &p in points {
        match out.last() {
            Some(last) if last.distance_sq(p) < min_step_sq => {}
            _ => out.push(p),
        }
    }

    while out.len() > 1 && out[0].distance_sq(out[out.len() - 1]) < min_step_sq {
        out.pop();
    }

    out
}

/// Triangulates a polygon with holes by ear clipping.
///
/// Works for either winding. If a ring is degenerate (self-intersecting), the
/// remainder is fanned. Indices refer to the exterior followed by each hole in order, the same
/// layout a mesh gets when its vertices are pushed ring by ring. Each hole is
/// bridged into the outer ring before ear clipping, so no triangle covers a
/// hole.
pub fn triangulate_polygon(exterior: &[Pos2], holes: &[Vec<Pos2>]) -> Vec<[u32; 3]> {
    let n = exterior.len();
    if n < 3 {
        return Vec::new();
    }

    let mut points: Vec<Pos2> = exterior.to_vec();
    let mut ring: Vec<usize> = (0..n).collect();
    if signed_area2(exterior) < 0.0 {
        ring.reverse();
    }

    // Holes wind opposite to the exterior.
    let mut hole_rings: Vec<Vec<usize>> = Vec::with_capacity(holes.len());
    for hole in holes {
        let offset = points.len();
        points.extend_from_slice(hole);
        if hole.len() < 3 {
            continue;
        }
        let mut indices: Vec<usize> = (offset..offset + hole.len()).collect();
        if signed_area2(hole) > 0.0 {
            indices.reverse();
        }
        hole_rings.push(indices);
    }

    // Rightmost holes first, so later bridges can't cut through them.
    hole_rings.sort_by(|a, b| max_x(&points, b).total_cmp(&max_x(&points, a)));
    for idx in 0..hole_rings.len() {
        let (merged, rest) = hole_rings.split_at(idx + 1);
        match bridge_hole(&points, &ring, &merged[idx], rest) {
            Some(bridged) => ring = bridged,
            None => log::debug!("No visible bridge for hole of {} vertices", merged[idx].len()),
        }
    }

    ear_clip(&points, ring)
}

fn max_x(points: &[Pos2], ring: &[usize]) -> f32 {
    ring.iter().map(|&i| points[i].x).fold(f32::MIN, f32::max)
}

/// Splices `hole` into `ring` through a segment from the hole's rightmost
/// vertex to the nearest ring vertex it can see.
///
/// The bridge is walked in both directions, so both of its endpoints appear
/// twice in the result.
fn bridge_hole(
    points: &[Pos2],
    ring: &[usize],
    hole: &[usize],
    pending: &[Vec<usize>],
) -> Option<Vec<usize>> {
    let (hole_start, &m) = hole
        .iter()
        .enumerate()
        .max_by(|&(_, &a), &(_, &b)| points[a].x.total_cmp(&points[b].x))?;
    let from = points[m];

    let mut candidates: Vec<usize> = (0..ring.len()).collect();
    candidates.sort_by(|&a, &b| {
        from.distance_sq(points[ring[a]])
            .total_cmp(&from.distance_sq(points[ring[b]]))
    });

    let obstacles = std::iter::once(ring)
        .chain(std::iter::once(hole))
        .chain(pending.iter().map(Vec::as_slice));
    let obstacles: Vec<&[usize]> = obstacles.collect();

    let pos = candidates.into_iter().find(|&pos| {
        let to = points[ring[pos]];
        obstacles
            .iter()
            .all(|obstacle| !segment_crosses_ring(points, obstacle, from, to))
    })?;

    let mut bridged = Vec::with_capacity(ring.len() + hole.len() + 2);
    bridged.extend_from_slice(&ring[..=pos]);
    bridged.extend(hole[hole_start..].iter().chain(&hole[..=hole_start]));
    bridged.extend_from_slice(&ring[pos..]);
    Some(bridged)
}

/// Whether segment (a, b) properly crosses any edge of `ring`.
///
/// Edges that share an endpoint position with the segment are ignored.
fn segment_crosses_ring(points: &[Pos2], ring: &[usize], a: Pos2, b: Pos2) -> bool {
    let n = ring.len();
    (0..n).any(|i| {
        let p = points[ring[i]];
        let q = points[ring[(i + 1) % n]];
        if p == a || p == b || q == a || q == b {
            return false;
        }
        cross(a, b, p) * cross(a, b, q) < 0.0 && cross(p, q, a) * cross(p, q, b) < 0.0
    })
}

/// Clips ears off a positively wound index ring.
fn ear_clip(points: &[Pos2], mut ring: Vec<usize>) -> Vec<[u32; 3]> {
    let mut triangles = Vec::with_capacity(ring.len().saturating_sub(2));
    // Clipping an ear only changes its neighbours, so the search resumes there.
    let mut start = 0;

    while ring.len() > 3 {
        let m = ring.len();
        let ear = (0..m)
            .map(|k| (start + k) % m)
            .find(|&i| is_ear(points, &ring, i));

        match ear {
            Some(i) => {
                let prev = ring[(i + m - 1) % m];
                let next = ring[(i + 1) % m];
                triangles.push([prev as u32, ring[i] as u32, next as u32]);
                ring.remove(i);
                start = if i == 0 { m - 2 } else { i - 1 };
            }
            None => {
                log::debug!("No ear found in {} remaining vertices, fanning", m);
                for i in 1..m - 1 {
                    triangles.push([ring[0] as u32, ring[i] as u32, ring[i + 1] as u32]);
                }
                return triangles;
            }
        }
    }

    triangles.push([ring[0] as u32, ring[1] as u32, ring[2] as u32]);
    triangles
}

fn is_ear(points: &[Pos2], ring: &[usize], i: usize) -> bool {
    let m = ring.len();
    let (ia, ib, ic) = (ring[(i + m - 1) % m], ring[i], ring[(i + 1) % m]);
    let (a, b, c) = (points[ia], points[ib], points[ic]);
    if cross(a, b, c) <= 0.0 {
        return false;
    }
    !ring.iter().any(|&j| {
        let p = points[j];
        j != ia && j != ib && j != ic && p != a && p != b && p != c && in_triangle(p, a, b, c)
    })
}

/// Ray-casting point-in-ring test.
pub fn ring_contains(ring: &[Pos2], p: Pos2) -> bool {
    let n = ring.len();
    if n < 3 {
        return false;
    }

    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let (a, b) = (ring[i], ring[j]);
        if (a.y > p.y) != (b.y > p.y) && p.x < (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x {
            inside = !inside;
        }
        j = i;
    }
    inside
}
