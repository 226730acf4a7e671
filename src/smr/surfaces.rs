//! Every named surface of the SMR core, registered once per build.

use serde::{Deserialize, Serialize};

use crate::error::{GeometryError, Result};
use crate::geometry::Geometry;
use crate::math::Vector2;
use crate::region::Region;
use crate::surface::{BoundaryCondition, Surface, SurfaceId};

use super::dimensions::*;

/// Control rod banks. `A`-`D` are the regulating banks positioned by the
/// search; the `S*` shutdown banks stay withdrawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RodBank {
    A,
    B,
    C,
    D,
    SA,
    SB,
    SC,
    SD,
    SE,
}

impl RodBank {
    pub const ALL: [RodBank; 9] = [
        RodBank::A,
        RodBank::B,
        RodBank::C,
        RodBank::D,
        RodBank::SA,
        RodBank::SB,
        RodBank::SC,
        RodBank::SD,
        RodBank::SE,
    ];

    pub const REGULATING: [RodBank; 4] = [RodBank::A, RodBank::B, RodBank::C, RodBank::D];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn label(self) -> &'static str {
        match self {
            RodBank::A => "A",
            RodBank::B => "B",
            RodBank::C => "C",
            RodBank::D => "D",
            RodBank::SA => "SA",
            RodBank::SB => "SB",
            RodBank::SC => "SC",
            RodBank::SD => "SD",
            RodBank::SE => "SE",
        }
    }
}

/// Insertion depths of banks A, B, C and D in cm below fully withdrawn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RodInsertion(pub [f64; 4]);

impl RodInsertion {
    pub const WITHDRAWN: RodInsertion = RodInsertion([0.0; 4]);

    pub fn from_slice(values: &[f64]) -> Result<Self> {
        let depths: [f64; 4] = values.try_into().map_err(|_| {
            GeometryError::InvalidParameters(format!(
                "expected 4 bank insertions, got {}",
                values.len()
            ))
        })?;
        Ok(Self(depths))
    }

    /// `(bottom, top)` of the absorber section of `bank`.
    ///
    /// The rod tip may come down to the dashpot but not onto it: a depth at
    /// the limit is pulled back by `MIN_DASHPOT_GAP` so the bank planes stay
    /// strictly above the dashpot plane.
    pub fn bank_planes(&self, bank: RodBank) -> Result<(f64, f64)> {
        let depth = match bank {
            RodBank::A => self.0[0],
            RodBank::B => self.0[1],
            RodBank::C => self.0[2],
            RodBank::D => self.0[3],
            _ => return Ok((SAFETY_BANK_BOTTOM, SAFETY_BANK_TOP)),
        };
        if !(0.0..=MAX_ROD_INSERTION).contains(&depth) {
            return Err(GeometryError::InvalidParameters(format!(
                "bank {} insertion {} outside [0, {}]",
                bank.label(),
                depth,
                MAX_ROD_INSERTION
            )));
        }
        let depth = depth.min(MAX_ROD_INSERTION - MIN_DASHPOT_GAP);
        Ok((BANK_BOTTOM_WITHDRAWN - depth, BANK_TOP_WITHDRAWN - depth))
    }
}

pub const MIN_DASHPOT_GAP: f64 = 1.0e-3;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridPlanes {
    pub bottom: SurfaceId,
    pub top: SurfaceId,
}

#[derive(Clone, Debug)]
pub struct CoreSurfaces {
    // Pin radii
    pub pellet_or: SurfaceId,
    pub plenum_spring_or: SurfaceId,
    pub clad_ir: SurfaceId,
    pub clad_or: SurfaceId,
    pub gt_ir: SurfaceId,
    pub gt_or: SurfaceId,
    pub gt_dashpot_ir: SurfaceId,
    pub gt_dashpot_or: SurfaceId,
    pub control_poison_or: SurfaceId,
    pub cr_ir: SurfaceId,
    pub cr_or: SurfaceId,
    pub ba: [SurfaceId; 8],
    pub it_ir: SurfaceId,
    pub it_or: SurfaceId,

    /// Inside of the spacer grid strap around one pin.
    pub rod_grid_box: Region,
    /// Inside of the grid sleeve around one assembly.
    pub lattice_box_outer: Region,

    // Axial planes
    pub bot_support_plate: SurfaceId,
    pub top_support_plate: SurfaceId,
    pub bottom_fuel_rod: SurfaceId,
    pub top_lower_nozzle: SurfaceId,
    pub bot_active_core: SurfaceId,
    pub top_lower_thimble: SurfaceId,
    pub ba_bottom: SurfaceId,
    pub grids: [GridPlanes; GRID_COUNT],
    pub dashpot_top: SurfaceId,
    pub top_active_core: SurfaceId,
    pub top_plenum: SurfaceId,
    pub top_fuel_rod: SurfaceId,
    pub bot_upper_nozzle: SurfaceId,
    pub top_upper_nozzle: SurfaceId,
    /// `(bottom, top)` per bank, indexed by `RodBank::index`.
    pub banks: [(SurfaceId, SurfaceId); 9],

    // Vessel
    pub core_barrel_ir: SurfaceId,
    pub core_barrel_or: SurfaceId,
    pub rpv_ir: SurfaceId,
    pub rpv_or: SurfaceId,
    pub lower_bound: SurfaceId,
    pub upper_bound: SurfaceId,
}

fn cylinder(geometry: &mut Geometry, r: f64, name: &str) -> SurfaceId {
    geometry.add_surface(Surface::z_cylinder(0.0, 0.0, r).named(name))
}

fn plane(geometry: &mut Geometry, z: f64, name: &str) -> SurfaceId {
    geometry.add_surface(Surface::z_plane(z).named(name))
}

impl CoreSurfaces {
    pub fn new(geometry: &mut Geometry, insertion: &RodInsertion) -> Result<Self> {
        let ba: [SurfaceId; 8] = std::array::from_fn(|i| {
            cylinder(geometry, BURNABLE_ABSORBER_RADII[i], &format!("BA IR {}", i + 1))
        });
        // Independent copies so instrument tubes can be retagged on their own.
        let it_ir = geometry.clone_surface_with_boundary(ba[4], BoundaryCondition::Transmission);
        let it_or = geometry.clone_surface_with_boundary(ba[5], BoundaryCondition::Transmission);

        let rod_grid_box = geometry.rectangular_prism(
            ROD_GRID_SIDE,
            ROD_GRID_SIDE,
            Vector2::zeros(),
            BoundaryCondition::Transmission,
        );
        let lattice_box_outer = geometry.rectangular_prism(
            GRID_STRAP_SIDE,
            GRID_STRAP_SIDE,
            Vector2::zeros(),
            BoundaryCondition::Transmission,
        );

        let bottom_fuel_rod = plane(geometry, BOTTOM_FUEL_ROD, "bottom FR");
        let top_lower_nozzle =
            geometry.clone_surface_with_boundary(bottom_fuel_rod, BoundaryCondition::Transmission);
        let bot_active_core = plane(geometry, BOTTOM_FUEL_STACK, "bot active core");
        let top_lower_thimble =
            geometry.clone_surface_with_boundary(bot_active_core, BoundaryCondition::Transmission);

        let grids = grid_planes();
        let grids = std::array::from_fn(|i| GridPlanes {
            bottom: plane(geometry, grids[i].0, &format!("bottom grid {}", i + 1)),
            top: plane(geometry, grids[i].1, &format!("top of grid {}", i + 1)),
        });

        let mut banks = [(SurfaceId(0), SurfaceId(0)); 9];
        for bank in RodBank::ALL {
            let (bottom, top) = insertion.bank_planes(bank)?;
            banks[bank.index()] = (
                plane(geometry, bottom, &format!("CR bank {} bottom", bank.label())),
                plane(geometry, top, &format!("CR bank {} top", bank.label())),
            );
        }

        Ok(Self {
            pellet_or: cylinder(geometry, PELLET_OR, "Pellet OR"),
            plenum_spring_or: cylinder(geometry, PLENUM_SPRING_OR, "FR Plenum Spring OR"),
            clad_ir: cylinder(geometry, CLAD_IR, "Clad IR"),
            clad_or: cylinder(geometry, CLAD_OR, "Clad OR"),
            gt_ir: cylinder(geometry, GUIDE_TUBE_IR, "GT IR (above dashpot)"),
            gt_or: cylinder(geometry, GUIDE_TUBE_OR, "GT OR (above dashpot)"),
            gt_dashpot_ir: cylinder(geometry, GUIDE_TUBE_DASHPOT_IR, "GT IR (at dashpot)"),
            gt_dashpot_or: cylinder(geometry, GUIDE_TUBE_DASHPOT_OR, "GT OR (at dashpot)"),
            control_poison_or: cylinder(geometry, CONTROL_POISON_OR, "Control Poison OR"),
            cr_ir: cylinder(geometry, CONTROL_ROD_IR, "CR Clad IR"),
            cr_or: cylinder(geometry, CONTROL_ROD_OR, "CR Clad OR"),
            ba,
            it_ir,
            it_or,
            rod_grid_box,
            lattice_box_outer,
            bot_support_plate: plane(geometry, BOTTOM_SUPPORT_PLATE, "bot support plate"),
            top_support_plate: plane(geometry, TOP_SUPPORT_PLATE, "top support plate"),
            bottom_fuel_rod,
            top_lower_nozzle,
            bot_active_core,
            top_lower_thimble,
            ba_bottom: plane(geometry, BOTTOM_BURNABLE_ABSORBER, "bottom of BA"),
            grids,
            dashpot_top: plane(geometry, DASHPOT_TOP, "top dashpot"),
            top_active_core: plane(geometry, TOP_ACTIVE_CORE, "top active core"),
            top_plenum: plane(geometry, TOP_PLENUM, "top pin plenum"),
            top_fuel_rod: plane(geometry, TOP_FUEL_ROD, "top FR"),
            bot_upper_nozzle: plane(geometry, BOTTOM_UPPER_NOZZLE, "bottom upper nozzle"),
            top_upper_nozzle: plane(geometry, TOP_UPPER_NOZZLE, "top upper nozzle"),
            banks,
            core_barrel_ir: cylinder(geometry, CORE_BARREL_IR, "core barrel IR"),
            core_barrel_or: cylinder(geometry, CORE_BARREL_OR, "core barrel OR"),
            rpv_ir: cylinder(geometry, RPV_IR, "RPV IR"),
            rpv_or: geometry.add_surface(
                Surface::z_cylinder(0.0, 0.0, RPV_OR)
                    .named("RPV OR")
                    .with_boundary(BoundaryCondition::Vacuum),
            ),
            lower_bound: geometry.add_surface(
                Surface::z_plane(LOWEST_EXTENT)
                    .named("lower problem boundary")
                    .with_boundary(BoundaryCondition::Vacuum),
            ),
            upper_bound: geometry.add_surface(
                Surface::z_plane(HIGHEST_EXTENT)
                    .named("upper problem boundary")
                    .with_boundary(BoundaryCondition::Vacuum),
            ),
        })
    }

    /// Planes of the full-height guide tube, instrument tube and control
    /// rod stacks (20 planes, 21 segments).
    pub fn stack_planes(&self) -> Vec<SurfaceId> {
        let g = &self.grids;
        vec![
            self.bot_support_plate,
            self.top_support_plate,
            self.top_lower_nozzle,
            self.top_lower_thimble,
            g[0].bottom,
            g[0].top,
            self.dashpot_top,
            g[1].bottom,
            g[1].top,
            g[2].bottom,
            g[2].top,
            g[3].bottom,
            g[3].top,
            self.top_active_core,
            g[4].bottom,
            g[4].top,
            self.top_plenum,
            self.top_fuel_rod,
            self.bot_upper_nozzle,
            self.top_upper_nozzle,
        ]
    }

    /// `stack_planes` with the bottom of the absorber column inserted inside
    /// the first grid.
    pub fn absorber_stack_planes(&self) -> Vec<SurfaceId> {
        let mut planes = self.stack_planes();
        planes.insert(5, self.ba_bottom);
        planes
    }

    /// Planes crossing the active fuel column below the top grid.
    pub fn within_fuel_planes(&self) -> Vec<SurfaceId> {
        let g = &self.grids;
        vec![
            g[0].bottom,
            g[0].top,
            self.dashpot_top,
            g[1].bottom,
            g[1].top,
            g[2].bottom,
            g[2].top,
            g[3].bottom,
            g[3].top,
        ]
    }

    pub fn fuel_stack_planes(&self) -> Vec<SurfaceId> {
        vec![
            self.bot_support_plate,
            self.top_support_plate,
            self.top_lower_nozzle,
            self.top_lower_thimble,
            self.top_active_core,
            self.grids[4].bottom,
            self.grids[4].top,
            self.top_plenum,
            self.top_fuel_rod,
            self.bot_upper_nozzle,
            self.top_upper_nozzle,
        ]
    }

    /// Planes splitting a control rod guide tube into water, dashpot, empty
    /// tube, absorber and rod plenum.
    pub fn rod_planes(&self, bank: RodBank) -> Vec<SurfaceId> {
        let (bottom, top) = self.banks[bank.index()];
        vec![self.bottom_fuel_rod, self.dashpot_top, bottom, top]
    }

    /// Grid bottom/top planes in ascending order.
    pub fn grid_sleeve_planes(&self) -> Vec<SurfaceId> {
        self.grids.iter().flat_map(|g| [g.bottom, g.top]).collect()
    }
}
