//! Axial stack composer.

use log::debug;

use crate::error::Result;
use crate::geometry::{Cell, Fill, Geometry, Universe, UniverseId};
use crate::subdivide::{check_fill_count, subdivide};
use crate::surface::SurfaceId;

/// Stack `fills` between the ascending ordering `surfaces`, bottom first.
pub fn make_stack(
    geometry: &mut Geometry,
    name: &str,
    surfaces: &[SurfaceId],
    fills: &[Fill],
) -> Result<UniverseId> {
    check_fill_count(name, surfaces.len(), fills.len())?;
    let regions = subdivide(geometry, surfaces)?;

    let cells = regions
        .into_iter()
        .zip(fills)
        .enumerate()
        .map(|(i, (region, fill))| Cell::new(format!("{name} ({i})"), region, *fill))
        .collect();

    debug!("stack `{}`: {} segments", name, surfaces.len() + 1);
    Ok(geometry.add_universe(Universe::with_cells(name, cells)))
}

/// Stack with one inner column running the full height.
///
/// Each segment is clipped to `+boundary`; a final cell `-boundary` holds
/// `inner_fill`. Used to pass a finely subdivided fuel column through a
/// coarse stack of gap, clad and moderator segments.
pub fn make_pin_stack(
    geometry: &mut Geometry,
    name: &str,
    surfaces: &[SurfaceId],
    fills: &[Fill],
    boundary: SurfaceId,
    inner_fill: Fill,
) -> Result<UniverseId> {
    check_fill_count(name, surfaces.len(), fills.len())?;
    let regions = subdivide(geometry, surfaces)?;

    let mut universe = Universe::new(name);
    for (i, (region, fill)) in regions.into_iter().zip(fills).enumerate() {
        universe.add_cell(Cell::new(format!("{name} (o{i})"), region & boundary.positive(), *fill));
    }
    universe.add_cell(Cell::new(format!("{name} (i)"), boundary.negative(), inner_fill));

    debug!("pin stack `{}`: {} outer segments", name, surfaces.len() + 1);
    Ok(geometry.add_universe(universe))
}
