//! Radial pin composer.
//!
//! A pin is a universe of concentric shells: `k` ascending cylinders and
//! `k + 1` fills, innermost first.

use log::debug;

use crate::error::Result;
use crate::geometry::{Cell, Fill, Geometry, Universe, UniverseId};
use crate::region::Region;
use crate::subdivide::{check_fill_count, subdivide};
use crate::surface::SurfaceId;

/// Spacer grid wrapped around the outermost shell of a pin.
#[derive(Clone, Debug, PartialEq)]
pub struct GridSpacer {
    /// Inside of the grid strap; the outermost shell is clipped to it.
    pub region: Region,
    /// Strap material filling everything outside `region`.
    pub fill: Fill,
}

/// Build a pin universe.
///
/// Cells are named `"<name> (0)"`, `"<name> (1)"`, ... `"<name> (last)"`,
/// and `"<name> (grid)"` for the spacer cell when `grid` is given.
pub fn make_pin(
    geometry: &mut Geometry,
    name: &str,
    surfaces: &[SurfaceId],
    fills: &[Fill],
    grid: Option<&GridSpacer>,
) -> Result<UniverseId> {
    check_fill_count(name, surfaces.len(), fills.len())?;
    let regions = subdivide(geometry, surfaces)?;

    let last = regions.len() - 1;
    let mut universe = Universe::new(name);
    for (i, (region, fill)) in regions.into_iter().zip(fills).enumerate() {
        let region = match grid {
            Some(spacer) if i == last => region & spacer.region.clone(),
            _ => region,
        };
        universe.add_cell(Cell::new(format!("{name} ({})", shell_label(i, last)), region, *fill));
    }

    if let Some(spacer) = grid {
        universe.add_cell(Cell::new(format!("{name} (grid)"), !&spacer.region, spacer.fill));
    }

    debug!("pin `{}`: {} cells", name, universe.cells.len());
    Ok(geometry.add_universe(universe))
}

fn shell_label(i: usize, last: usize) -> String {
    if i == last && last > 0 {
        "last".to_string()
    } else {
        i.to_string()
    }
}
