//! Dimension table of the reference SMR core, in centimetres.
//!
//! Loosely based on NuScale's design certification documents (ML17013A274,
//! ML17007A001) with BEAVRS values where those are silent.

pub const INCHES: f64 = 2.54;

// Fuel rod
pub const PELLET_OR: f64 = 0.3195 * INCHES / 2.0;
pub const CLAD_IR: f64 = 0.326 * INCHES / 2.0;
pub const CLAD_OR: f64 = 0.374 * INCHES / 2.0;
pub const ACTIVE_FUEL_LENGTH: f64 = 78.74 * INCHES;
pub const PLENUM_LENGTH: f64 = 5.311 * INCHES;
pub const FUEL_ROD_LENGTH: f64 = 85.00 * INCHES;
pub const LOWER_END_CAP_LENGTH: f64 = 0.575 * INCHES;
/// Estimate; the vendor value is not public.
pub const PLENUM_SPRING_OR: f64 = 0.06459;

// Guide tubes, control rods, burnable absorbers
pub const GUIDE_TUBE_IR: f64 = 0.450 * INCHES / 2.0;
pub const GUIDE_TUBE_OR: f64 = 0.482 * INCHES / 2.0;
pub const GUIDE_TUBE_DASHPOT_IR: f64 = 0.397 * INCHES / 2.0;
pub const GUIDE_TUBE_DASHPOT_OR: f64 = GUIDE_TUBE_OR;
pub const CONTROL_POISON_OR: f64 = 0.333 * INCHES / 2.0;
pub const CONTROL_ROD_IR: f64 = 0.344 * INCHES / 2.0;
pub const CONTROL_ROD_OR: f64 = 0.381 * INCHES / 2.0;
pub const BURNABLE_ABSORBER_RADII: [f64; 8] =
    [0.21400, 0.23051, 0.24130, 0.42672, 0.43688, 0.48387, 0.56134, 0.60198];

// Spacer grids
pub const ROD_GRID_SIDE: f64 = 1.24416;
pub const SPACER_HEIGHT: f64 = 1.750 * INCHES;

// Assembly
pub const PIN_PITCH: f64 = 0.496 * INCHES;
pub const LATTICE_PITCH: f64 = 8.466 * INCHES;
pub const GRID_STRAP_SIDE: f64 = 21.47270;
pub const PINS_PER_SIDE: usize = 17;

// Core radial
pub const CORE_BARREL_IR: f64 = 74.0 * INCHES / 2.0;
pub const CORE_BARREL_OR: f64 = 78.0 * INCHES / 2.0;
pub const RPV_IR: f64 = 96.5 * INCHES / 2.0;
pub const RPV_OR: f64 = 105.0 * INCHES / 2.0;
pub const CORE_SIZE: usize = 9;

// Axial
pub const LOWEST_EXTENT: f64 = 0.0;
pub const BOTTOM_SUPPORT_PLATE: f64 = LOWEST_EXTENT + 20.0;
pub const TOP_SUPPORT_PLATE: f64 = BOTTOM_SUPPORT_PLATE + 5.0;
pub const BOTTOM_LOWER_NOZZLE: f64 = TOP_SUPPORT_PLATE;
pub const BOTTOM_FUEL_ROD: f64 = BOTTOM_LOWER_NOZZLE + 4.0 * INCHES;
pub const BOTTOM_FUEL_STACK: f64 = BOTTOM_FUEL_ROD + LOWER_END_CAP_LENGTH;
pub const BOTTOM_BURNABLE_ABSORBER: f64 = BOTTOM_FUEL_STACK + 2.0 * INCHES;
pub const TOP_ACTIVE_CORE: f64 = BOTTOM_FUEL_STACK + ACTIVE_FUEL_LENGTH;
pub const TOP_PLENUM: f64 = TOP_ACTIVE_CORE + PLENUM_LENGTH;
pub const TOP_FUEL_ROD: f64 = BOTTOM_FUEL_ROD + FUEL_ROD_LENGTH;
pub const BOTTOM_UPPER_NOZZLE: f64 = TOP_FUEL_ROD + (423.049 - 419.704);
pub const TOP_UPPER_NOZZLE: f64 = BOTTOM_UPPER_NOZZLE + (431.876 - 423.049);
pub const HIGHEST_EXTENT: f64 = TOP_UPPER_NOZZLE + 20.0;

// Spacer grids sit 6 cm above the bottom and 2 cm below the top of the rods.
pub const FIRST_GRID_BOTTOM: f64 = BOTTOM_FUEL_ROD + 6.0;
pub const LAST_GRID_TOP: f64 = TOP_FUEL_ROD - 2.0;
pub const LAST_GRID_BOTTOM: f64 = LAST_GRID_TOP - SPACER_HEIGHT;
pub const GRID_COUNT: usize = 5;

// Control rod banks (BEAVRS step heights)
pub const DASHPOT_TOP: f64 = 46.079;
pub const BANK_BOTTOM_WITHDRAWN: f64 = 405.713;
pub const BANK_TOP_WITHDRAWN: f64 = 786.348;
/// Deepest allowed insertion, which puts the rod tips on the dashpot.
pub const MAX_ROD_INSERTION: f64 = BANK_BOTTOM_WITHDRAWN - DASHPOT_TOP;
/// Safety banks are parked fully withdrawn.
pub const SAFETY_BANK_BOTTOM: f64 = 269.122;
pub const SAFETY_BANK_TOP: f64 = SAFETY_BANK_BOTTOM + 1.58173 * 228.0;

/// `(bottom, top)` of each of the five spacer grids, bottom grid first.
pub fn grid_planes() -> [(f64, f64); GRID_COUNT] {
    let step = (LAST_GRID_BOTTOM - FIRST_GRID_BOTTOM) / (GRID_COUNT - 1) as f64;
    std::array::from_fn(|i| {
        let bottom = FIRST_GRID_BOTTOM + step * i as f64;
        (bottom, bottom + SPACER_HEIGHT)
    })
}

/// `n + 1` evenly spaced values from `start` to `end` inclusive.
pub fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    if n == 0 {
        return vec![start];
    }
    let step = (end - start) / n as f64;
    (0..=n).map(|i| if i == n { end } else { start + step * i as f64 }).collect()
}
