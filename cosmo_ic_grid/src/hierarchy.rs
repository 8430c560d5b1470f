//! A nested grid hierarchy: one rectangular, ghost-padded field per
//! refinement level, plus the restriction/injection operators that move
//! data between adjacent levels.

use crate::error::GridError;
use crate::point::PointIndex;
use crate::storage::{Storage, VecStorage};

/// Ghost zone width needed by the widest stencil this crate supports
/// (the 6th-order finite difference).
pub const MAX_GHOST: usize = 3;

/// One refinement level: an axis-aligned rectangular domain (in this
/// level's own `2^level` coarse-cell index space) with a ghost-padded
/// scalar field and a refinement mask. `resolution` is the full index
/// space a level at this depth could in principle cover; `origin`/
/// `extent` are the sub-box actually allocated, so a deeply nested
/// level that only refines a small region never has to pay for a full
/// `resolution^3` array.
#[derive(Debug, Clone)]
pub struct GridLevel {
    level: usize,
    resolution: usize,
    origin: [i64; 3],
    extent: [usize; 3],
    field: VecStorage<f64>,
    refined: VecStorage<u8>,
}

impl GridLevel {
    fn new(level: usize, ghost: usize) -> Self {
        let resolution = 1usize << level;
        GridLevel::new_region(level, ghost, [0, 0, 0], [resolution; 3])
    }

    /// A level whose domain is a sub-box `[origin, origin + extent)` of
    /// the full `2^level` index space, in this level's own coarse-cell
    /// units — the shape `examples/original_source/region_generator.hh`'s
    /// `get_AABB(left, right, level)` describes for a nested level.
    fn new_region(level: usize, ghost: usize, origin: [i64; 3], extent: [usize; 3]) -> Self {
        let resolution = 1usize << level;
        GridLevel {
            level,
            resolution,
            origin,
            extent,
            field: VecStorage::new(extent[0], extent[1], extent[2], ghost),
            refined: VecStorage::new(extent[0], extent[1], extent[2], ghost),
        }
    }

    pub fn level(&self) -> usize {
        self.level
    }

    pub fn resolution(&self) -> usize {
        self.resolution
    }

    /// This level's domain origin, in its own coarse-cell index space.
    pub fn origin(&self) -> [i64; 3] {
        self.origin
    }

    /// This level's domain extent (per-axis cell count), in its own
    /// coarse-cell units. Equal to `[resolution; 3]` for a full-box
    /// level; smaller for a nested sub-box level.
    pub fn extent(&self) -> [usize; 3] {
        self.extent
    }

    pub fn ghost(&self) -> usize {
        self.field.ghost()
    }

    #[inline]
    fn local(&self, i: i64, j: i64, k: i64) -> PointIndex {
        PointIndex::new(i - self.origin[0], j - self.origin[1], k - self.origin[2])
    }

    #[inline]
    pub fn get(&self, i: i64, j: i64, k: i64) -> f64 {
        self.field.get(self.local(i, j, k))
    }

    #[inline]
    pub fn set(&mut self, i: i64, j: i64, k: i64, value: f64) {
        let p = self.local(i, j, k);
        self.field.set(p, value);
    }

    /// Cell center position in `[0, 1)^3`, periodic-wrapped onto the
    /// level's full index space (not just its own sub-box) for
    /// ghost-zone indices.
    pub fn cell_pos(&self, i: i64, j: i64, k: i64) -> [f64; 3] {
        let r = self.resolution as f64;
        let wrap = |v: i64| -> f64 {
            let v = v.rem_euclid(self.resolution as i64);
            (v as f64 + 0.5) / r
        };
        [wrap(i), wrap(j), wrap(k)]
    }

    pub fn is_refined(&self, i: i64, j: i64, k: i64) -> bool {
        self.refined.get(self.local(i, j, k)) != 0
    }

    pub fn set_refined(&mut self, i: i64, j: i64, k: i64, refined: bool) {
        let p = self.local(i, j, k);
        self.refined.set(p, if refined { 1 } else { 0 });
    }

    /// Marks every coarse cell inside `[lo, hi)` (in this level's own
    /// index space) as refined, the common case of a single contiguous
    /// box covered by the next-finer level.
    pub fn mark_refined_box(&mut self, lo: [i64; 3], hi: [i64; 3]) {
        for i in lo[0]..hi[0] {
            for j in lo[1]..hi[1] {
                for k in lo[2]..hi[2] {
                    self.set_refined(i, j, k, true);
                }
            }
        }
    }

    pub fn count_leaf_cells(&self) -> usize {
        let mut count = 0;
        for di in 0..self.extent[0] as i64 {
            for dj in 0..self.extent[1] as i64 {
                for dk in 0..self.extent[2] as i64 {
                    let (i, j, k) = (
                        self.origin[0] + di,
                        self.origin[1] + dj,
                        self.origin[2] + dk,
                    );
                    if !self.is_refined(i, j, k) {
                        count += 1;
                    }
                }
            }
        }
        count
    }

    /// Periodic ghost fill: wraps this level's own field around its
    /// domain boundary. Used at the coarsest level, which has no parent
    /// to interpolate from and always owns the full domain (`origin ==
    /// [0, 0, 0]`, `extent == [resolution; 3]`).
    pub fn fill_ghosts_periodic(&mut self) {
        let r = self.resolution as i64;
        let g = self.ghost() as i64;
        for i in -g..r + g {
            for j in -g..r + g {
                for k in -g..r + g {
                    if (0..r).contains(&i) && (0..r).contains(&j) && (0..r).contains(&k) {
                        continue;
                    }
                    let v = self.get(i.rem_euclid(r), j.rem_euclid(r), k.rem_euclid(r));
                    self.set(i, j, k, v);
                }
            }
        }
    }
}

/// An ordered stack of refinement levels from `levelmin` to `levelmax`.
#[derive(Debug, Clone)]
pub struct GridHierarchy {
    levels: Vec<GridLevel>,
}

impl GridHierarchy {
    pub fn new(levelmin: usize, levelmax: usize) -> Result<Self, GridError> {
        if levelmax < levelmin {
            return Err(GridError::ShapeMismatch(format!(
                "levelmax {levelmax} must be >= levelmin {levelmin}"
            )));
        }
        let levels = (levelmin..=levelmax)
            .map(|l| GridLevel::new(l, MAX_GHOST))
            .collect();
        Ok(GridHierarchy { levels })
    }

    /// Builds a hierarchy where `levelmin` covers the whole domain and
    /// each finer level only allocates the sub-box given by
    /// `domains[level - levelmin - 1]` (origin, extent, in that level's
    /// own coarse-cell units) instead of a full `2^level`-cube — this is
    /// what keeps a deep refinement region from costing a full-resolution
    /// array at every level.
    pub fn with_domains(
        levelmin: usize,
        levelmax: usize,
        domains: &[([i64; 3], [usize; 3])],
    ) -> Result<Self, GridError> {
        if levelmax < levelmin {
            return Err(GridError::ShapeMismatch(format!(
                "levelmax {levelmax} must be >= levelmin {levelmin}"
            )));
        }
        let nrefined = levelmax - levelmin;
        if domains.len() != nrefined {
            return Err(GridError::ShapeMismatch(format!(
                "expected {nrefined} sub-box domains for levels {}..={levelmax}, got {}",
                levelmin + 1,
                domains.len()
            )));
        }
        let mut levels = Vec::with_capacity(nrefined + 1);
        levels.push(GridLevel::new(levelmin, MAX_GHOST));
        for (idx, &(origin, extent)) in domains.iter().enumerate() {
            levels.push(GridLevel::new_region(
                levelmin + 1 + idx,
                MAX_GHOST,
                origin,
                extent,
            ));
        }
        Ok(GridHierarchy { levels })
    }

    pub fn levelmin(&self) -> usize {
        self.levels[0].level()
    }

    pub fn levelmax(&self) -> usize {
        self.levels.last().unwrap().level()
    }

    pub fn is_unigrid(&self) -> bool {
        self.levels.len() == 1
    }

    pub fn level(&self, level: usize) -> &GridLevel {
        &self.levels[level - self.levelmin()]
    }

    pub fn level_mut(&mut self, level: usize) -> &mut GridLevel {
        &mut self.levels[level - self.levelmin()]
    }

    pub fn size(&self, level: usize) -> usize {
        self.level(level).resolution()
    }

    /// This level's actual stored domain (origin, extent), in its own
    /// coarse-cell units — equal to `([0,0,0], [size(level); 3])` for a
    /// full-box level, smaller for a nested sub-box level built via
    /// [`GridHierarchy::with_domains`].
    pub fn domain(&self, level: usize) -> ([i64; 3], [usize; 3]) {
        let l = self.level(level);
        (l.origin(), l.extent())
    }

    pub fn refined(&self, level: usize, i: i64, j: i64, k: i64) -> bool {
        self.level(level).is_refined(i, j, k)
    }

    pub fn cell_pos(&self, level: usize, i: i64, j: i64, k: i64) -> [f64; 3] {
        self.level(level).cell_pos(i, j, k)
    }

    pub fn count_leaf_cells(&self, level_lo: usize, level_hi: usize) -> usize {
        (level_lo..=level_hi)
            .map(|l| self.level(l).count_leaf_cells())
            .sum()
    }

    /// Restricts the fine level's field onto its parent via `mg_straight`
    /// (straight block-average) injection, overwriting every coarse cell
    /// under the fine level's footprint.
    pub fn mg_straight_restrict(&mut self, level_fine: usize) {
        let level_coarse = level_fine - 1;
        let rc = self.size(level_coarse) as i64;
        let mut coarse_values = vec![0.0; (rc * rc * rc) as usize];
        {
            let fine = self.level(level_fine);
            for ic in 0..rc {
                for jc in 0..rc {
                    for kc in 0..rc {
                        let mut sum = 0.0;
                        for di in 0..2 {
                            for dj in 0..2 {
                                for dk in 0..2 {
                                    sum += fine.get(2 * ic + di, 2 * jc + dj, 2 * kc + dk);
                                }
                            }
                        }
                        coarse_values[((ic * rc + jc) * rc + kc) as usize] = sum / 8.0;
                    }
                }
            }
        }
        let coarse = self.level_mut(level_coarse);
        for ic in 0..rc {
            for jc in 0..rc {
                for kc in 0..rc {
                    coarse.set(
                        ic,
                        jc,
                        kc,
                        coarse_values[((ic * rc + jc) * rc + kc) as usize],
                    );
                }
            }
        }
    }

    /// Fills the fine level's ghost zone at the refinement boundary by
    /// trilinear interpolation of the coarse parent.
    pub fn trilinear_inject_ghosts(&mut self, level_fine: usize) {
        let level_coarse = level_fine - 1;
        let rf = self.size(level_fine) as i64;
        let g = self.level(level_fine).ghost() as i64;

        let coarse = self.level(level_coarse).clone();
        let fine = self.level_mut(level_fine);

        for i in -g..rf + g {
            for j in -g..rf + g {
                for k in -g..rf + g {
                    let inside = (0..rf).contains(&i) && (0..rf).contains(&j) && (0..rf).contains(&k);
                    if inside {
                        continue;
                    }
                    // Map the fine ghost cell onto fractional coarse
                    // coordinates (coarse spacing is twice the fine one).
                    let xc = i as f64 / 2.0;
                    let yc = j as f64 / 2.0;
                    let zc = k as f64 / 2.0;
                    let value = trilinear_sample(&coarse, xc, yc, zc);
                    fine.set(i, j, k, value);
                }
            }
        }
    }
}

fn trilinear_sample(level: &GridLevel, x: f64, y: f64, z: f64) -> f64 {
    let x0 = x.floor() as i64;
    let y0 = y.floor() as i64;
    let z0 = z.floor() as i64;
    let (tx, ty, tz) = (x - x0 as f64, y - y0 as f64, z - z0 as f64);

    let mut acc = 0.0;
    for di in 0..2i64 {
        for dj in 0..2i64 {
            for dk in 0..2i64 {
                let wx = if di == 0 { 1.0 - tx } else { tx };
                let wy = if dj == 0 { 1.0 - ty } else { ty };
                let wz = if dk == 0 { 1.0 - tz } else { tz };
                acc += wx * wy * wz * level.get(x0 + di, y0 + dj, z0 + dk);
            }
        }
    }
    acc
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mg_straight_restrict_matches_block_average() {
        let mut hierarchy = GridHierarchy::new(2, 3).unwrap();
        for i in 0..8i64 {
            for j in 0..8i64 {
                for k in 0..8i64 {
                    hierarchy.level_mut(3).set(i, j, k, (i + 2 * j + 3 * k) as f64);
                }
            }
        }
        hierarchy.mg_straight_restrict(3);
        for ic in 0..4i64 {
            for jc in 0..4i64 {
                for kc in 0..4i64 {
                    let mut sum = 0.0;
                    for di in 0..2 {
                        for dj in 0..2 {
                            for dk in 0..2 {
                                sum += hierarchy
                                    .level(3)
                                    .get(2 * ic + di, 2 * jc + dj, 2 * kc + dk);
                            }
                        }
                    }
                    assert!((hierarchy.level(2).get(ic, jc, kc) - sum / 8.0).abs() < 1e-12);
                }
            }
        }
    }

    #[test]
    fn leaf_cells_exclude_refined_region() {
        let mut hierarchy = GridHierarchy::new(2, 3).unwrap();
        hierarchy.level_mut(2).mark_refined_box([0, 0, 0], [2, 2, 2]);
        let leaves = hierarchy.count_leaf_cells(2, 2);
        assert_eq!(leaves, 4 * 4 * 4 - 2 * 2 * 2);
    }

    #[test]
    fn sub_box_domain_allocates_only_its_own_extent() {
        // levelmax=10 would be a full 1024^3 array if every level had to
        // cover the whole box; a 64^3 sub-box is what a deep, narrow
        // refinement region actually needs.
        let hierarchy = GridHierarchy::with_domains(2, 10, &[
            ([0, 0, 0], [8; 3]),
            ([0, 0, 0], [16; 3]),
            ([0, 0, 0], [32; 3]),
            ([0, 0, 0], [64; 3]),
            ([0, 0, 0], [64; 3]),
            ([0, 0, 0], [64; 3]),
            ([0, 0, 0], [64; 3]),
            ([0, 0, 0], [64; 3]),
        ])
        .unwrap();
        let (origin, extent) = hierarchy.domain(10);
        assert_eq!(origin, [0, 0, 0]);
        assert_eq!(extent, [64, 64, 64]);
        assert_eq!(hierarchy.size(10), 1024);
    }

    #[test]
    fn with_domains_rejects_wrong_domain_count() {
        let err = GridHierarchy::with_domains(2, 4, &[([0, 0, 0], [8; 3])]).unwrap_err();
        assert!(matches!(err, GridError::ShapeMismatch(_)));
    }

    #[test]
    fn periodic_ghosts_wrap_around() {
        let mut hierarchy = GridHierarchy::new(2, 2).unwrap();
        hierarchy.level_mut(2).set(0, 0, 0, 9.0);
        hierarchy.level_mut(2).fill_ghosts_periodic();
        assert_eq!(hierarchy.level(2).get(-1, 0, 0), hierarchy.level(2).get(3, 0, 0));
        assert_eq!(hierarchy.level(2).get(4, 0, 0), 9.0);
    }
}
