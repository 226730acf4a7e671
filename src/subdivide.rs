//! Ordered-interval subdivision.
//!
//! `k` ordering surfaces split space into `k + 1` contiguous slabs or shells:
//! below the first, between each consecutive pair, above the last. This is
//! the one primitive behind radial pins, axial stacks, grid sleeves and fuel
//! ring subdivision.

use crate::error::{GeometryError, Result};
use crate::geometry::Geometry;
use crate::region::Region;
use crate::surface::{OrderingFamily, SurfaceId};

/// Split space by `surfaces`, which must share one ordering family and be
/// strictly ascending by offset or radius.
///
/// With no surfaces the result is a single region covering all of space.
pub fn subdivide(geometry: &Geometry, surfaces: &[SurfaceId]) -> Result<Vec<Region>> {
    check_ordering(geometry, surfaces)?;

    let (first, last) = match (surfaces.first(), surfaces.last()) {
        (Some(first), Some(last)) => (*first, *last),
        _ => return Ok(vec![Region::everywhere()]),
    };

    let mut regions = Vec::with_capacity(surfaces.len() + 1);
    regions.push(first.negative());
    for pair in surfaces.windows(2) {
        regions.push(pair[0].positive() & pair[1].negative());
    }
    regions.push(last.positive());
    Ok(regions)
}

/// Validate that `surfaces` can be subdivided.
pub fn check_ordering(geometry: &Geometry, surfaces: &[SurfaceId]) -> Result<()> {
    let mut family: Option<(SurfaceId, OrderingFamily)> = None;
    let mut previous: Option<f64> = None;

    for (position, &id) in surfaces.iter().enumerate() {
        let (this_family, key) = geometry
            .surface(id)
            .kind
            .ordering_key()
            .ok_or(GeometryError::NotOrderable(id))?;
        if key.is_nan() {
            return Err(GeometryError::NotOrderable(id));
        }

        match family {
            None => family = Some((id, this_family)),
            Some((first, ref f)) if !f.matches(&this_family) => {
                return Err(GeometryError::MixedOrderingFamilies { first, other: id });
            }
            Some(_) => {}
        }

        if let Some(prev) = previous {
            if key <= prev {
                return Err(GeometryError::NotAscending { position, previous: prev, next: key });
            }
        }
        previous = Some(key);
    }
    Ok(())
}

/// Fill-count contract shared by every composer built on `subdivide`.
pub(crate) fn check_fill_count(name: &str, surfaces: usize, fills: usize) -> Result<()> {
    if fills != surfaces + 1 {
        return Err(GeometryError::FillCountMismatch {
            name: name.to_string(),
            surfaces,
            expected: surfaces + 1,
            got: fills,
        });
    }
    Ok(())
}
