//! Pin and axial stack universes of the SMR core.
//!
//! Radial pins come in three flavours: bare, wrapped in an Inconel bottom
//! grid, and wrapped in a Zircaloy intermediate grid. Each full-height pin
//! position is an axial stack of those flavours between the core planes.

use log::debug;

use crate::config::CoreConfig;
use crate::error::{GeometryError, Result};
use crate::geometry::{Cell, Fill, Geometry, Universe, UniverseId};
use crate::pin::{make_pin, GridSpacer};
use crate::region::Region;
use crate::stack::{make_pin_stack, make_stack};
use crate::subdivide::subdivide;
use crate::surface::{Surface, SurfaceId};

use super::dimensions::{linspace, BOTTOM_FUEL_STACK, PELLET_OR, TOP_ACTIVE_CORE};
use super::materials::{Enrichment, MaterialSet};
use super::surfaces::{CoreSurfaces, RodBank};

/// One radial pin built bare and inside each spacer grid type.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridVariants {
    pub bare: UniverseId,
    pub bottom_grid: UniverseId,
    pub intermediate_grid: UniverseId,
}

#[derive(Clone, Debug)]
pub struct PinUniverses {
    pub water: UniverseId,
    /// Empty guide tube, full height.
    pub guide_tube: UniverseId,
    /// Empty guide tube in the centre position of an uninstrumented assembly.
    pub guide_tube_instr: UniverseId,
    pub instrument_tube: UniverseId,
    pub burnable_absorber: UniverseId,
    /// Guide tube holding a rod of each bank, indexed by `RodBank::index`.
    pub control_rods: [UniverseId; 9],
    /// Fuel rod, indexed by `Enrichment::index`.
    pub fuel: [UniverseId; 3],
}

struct Spacers {
    bottom: GridSpacer,
    intermediate: GridSpacer,
}

fn grid_variants(
    geometry: &mut Geometry,
    spacers: &Spacers,
    name: &str,
    surfaces: &[SurfaceId],
    fills: &[Fill],
) -> Result<GridVariants> {
    Ok(GridVariants {
        bare: make_pin(geometry, name, surfaces, fills, None)?,
        bottom_grid: make_pin(
            geometry,
            &format!("{name} grid (bottom)"),
            surfaces,
            fills,
            Some(&spacers.bottom),
        )?,
        intermediate_grid: make_pin(
            geometry,
            &format!("{name} grid (intermediate)"),
            surfaces,
            fills,
            Some(&spacers.intermediate),
        )?,
    })
}

impl PinUniverses {
    pub fn build(
        geometry: &mut Geometry,
        surfs: &CoreSurfaces,
        mats: &MaterialSet,
        config: &CoreConfig,
    ) -> Result<Self> {
        let m = |id| Fill::Material(id);
        let u = |id| Fill::Universe(id);
        let h2o = m(mats.water);
        let zr = m(mats.zircaloy);
        let air = m(mats.air);

        let spacers = Spacers {
            bottom: GridSpacer { region: surfs.rod_grid_box.clone(), fill: m(mats.inconel) },
            intermediate: GridSpacer { region: surfs.rod_grid_box.clone(), fill: zr },
        };

        let water = geometry.add_universe(Universe::with_cells(
            "Empty water pin cell universe",
            vec![Cell::new("water pin", Region::everywhere(), mats.water)],
        ));
        let w = u(water);

        // Guide tubes
        let gt = grid_variants(geometry, &spacers, "GT empty", &[surfs.gt_ir, surfs.gt_or], &[h2o, zr, h2o])?;
        let gtd = grid_variants(
            geometry,
            &spacers,
            "GT empty at dashpot",
            &[surfs.gt_dashpot_ir, surfs.gt_dashpot_or],
            &[h2o, zr, h2o],
        )?;

        let stack_planes = surfs.stack_planes();
        let guide_tube = make_stack(
            geometry,
            "GT empty",
            &stack_planes,
            &guide_tube_column(w, gtd, gt),
        )?;
        let guide_tube_instr = make_stack(
            geometry,
            "GT empty instr",
            &stack_planes,
            &guide_tube_column(w, gt, gt),
        )?;

        // Instrument tube
        let it_surfaces = [surfs.it_ir, surfs.it_or, surfs.gt_ir, surfs.gt_or];
        let it = grid_variants(geometry, &spacers, "IT", &it_surfaces, &[air, zr, h2o, zr, h2o])?;
        let it_dashpot = u(make_pin(geometry, "IT dashpot", &[surfs.it_ir, surfs.it_or], &[air, zr, h2o], None)?);
        let (itb, itg, iti) = (u(it.bare), u(it.bottom_grid), u(it.intermediate_grid));
        let instrument_tube = make_stack(
            geometry,
            "GT instr",
            &stack_planes,
            &[
                it_dashpot, it_dashpot, it_dashpot, itb, itb, itg, itb, itb, iti, itb, iti, itb, iti, itb,
                itb, iti, itb, itb, itb, it_dashpot, w,
            ],
        )?;

        let control_rods = control_rod_stacks(geometry, surfs, mats, &spacers, w, gt, gtd)?;
        let burnable_absorber = burnable_absorber_stack(geometry, surfs, mats, &spacers, w, gtd)?;
        let fuel = fuel_stacks(geometry, surfs, mats, &spacers, config, w)?;

        debug!("pin universes built; {} universes in geometry", geometry.universe_count());
        Ok(Self {
            water,
            guide_tube,
            guide_tube_instr,
            instrument_tube,
            burnable_absorber,
            control_rods,
            fuel,
        })
    }

    pub fn control_rod(&self, bank: RodBank) -> UniverseId {
        self.control_rods[bank.index()]
    }

    pub fn fuel(&self, enrichment: Enrichment) -> UniverseId {
        self.fuel[enrichment.index()]
    }
}

/// Fills of an empty guide tube column over `CoreSurfaces::stack_planes`.
/// `lower` covers the thimble up to the dashpot, `upper` the rest.
fn guide_tube_column(water: Fill, lower: GridVariants, upper: GridVariants) -> Vec<Fill> {
    let (lb, lg) = (Fill::Universe(lower.bare), Fill::Universe(lower.bottom_grid));
    let (ub, ui) = (Fill::Universe(upper.bare), Fill::Universe(upper.intermediate_grid));
    vec![
        water, water, water, lb, lb, lg, lb, ub, ui, ub, ui, ub, ui, ub, ub, ui, ub, ub, ub, water, water,
    ]
}

fn control_rod_stacks(
    geometry: &mut Geometry,
    surfs: &CoreSurfaces,
    mats: &MaterialSet,
    spacers: &Spacers,
    water: Fill,
    gt: GridVariants,
    gtd: GridVariants,
) -> Result<[UniverseId; 9]> {
    let m = |id| Fill::Material(id);
    let (h2o, zr, air, ss, aic) = (m(mats.water), m(mats.zircaloy), m(mats.air), m(mats.ss304), m(mats.ag_in_cd));

    let rod_in_tube = [surfs.control_poison_or, surfs.cr_ir, surfs.cr_or, surfs.gt_ir, surfs.gt_or];
    let rod_bare = [surfs.control_poison_or, surfs.cr_ir, surfs.cr_or];

    let cr = grid_variants(geometry, spacers, "CR", &rod_in_tube, &[aic, air, ss, h2o, zr, h2o])?;
    let blank = grid_variants(geometry, spacers, "CR blank", &rod_in_tube, &[ss, air, ss, h2o, zr, h2o])?;
    let cr_bare = make_pin(geometry, "CR bare", &rod_bare, &[aic, air, ss, h2o], None)?;
    let blank_bare = make_pin(geometry, "CR blank bare", &rod_bare, &[ss, air, ss, h2o], None)?;

    let stack_planes = surfs.stack_planes();
    let mut stacks = [UniverseId(0); 9];
    for bank in RodBank::ALL {
        let name = format!("GT CR bank {}", bank.label());
        let rod_planes = surfs.rod_planes(bank);
        let segment = |geometry: &mut Geometry, suffix: &str, dashpot, tube, rod, plenum| {
            make_stack(
                geometry,
                &format!("{name} dummy{suffix}"),
                &rod_planes,
                &[water, Fill::Universe(dashpot), Fill::Universe(tube), Fill::Universe(rod), Fill::Universe(plenum)],
            )
            .map(Fill::Universe)
        };
        let d = segment(geometry, "", gtd.bare, gt.bare, cr.bare, blank.bare)?;
        let g = segment(geometry, " grid (bottom)", gtd.bottom_grid, gt.bottom_grid, cr.bottom_grid, blank.bottom_grid)?;
        let i = segment(
            geometry,
            " grid (intermediate)",
            gtd.intermediate_grid,
            gt.intermediate_grid,
            cr.intermediate_grid,
            blank.intermediate_grid,
        )?;
        let b = segment(geometry, " bare", gtd.bare, gt.bare, cr_bare, blank_bare)?;

        stacks[bank.index()] = make_stack(
            geometry,
            &name,
            &stack_planes,
            &[water, b, b, d, d, g, d, d, i, d, i, d, i, d, d, i, d, d, d, b, b],
        )?;
    }
    Ok(stacks)
}

fn burnable_absorber_stack(
    geometry: &mut Geometry,
    surfs: &CoreSurfaces,
    mats: &MaterialSet,
    spacers: &Spacers,
    water: Fill,
    gtd: GridVariants,
) -> Result<UniverseId> {
    let m = |id| Fill::Material(id);
    let u = Fill::Universe;
    let (h2o, zr, air, ss, bsg) = (m(mats.water), m(mats.zircaloy), m(mats.air), m(mats.ss304), m(mats.borosilicate));
    let fills = [air, ss, air, bsg, air, ss, h2o, zr, h2o];

    let ba = grid_variants(geometry, spacers, "BA", &surfs.ba, &fills)?;
    let mut dashpot_surfaces = surfs.ba[..6].to_vec();
    dashpot_surfaces.extend([surfs.gt_dashpot_ir, surfs.gt_dashpot_or]);
    let ba_dashpot = grid_variants(geometry, spacers, "BA dashpot", &dashpot_surfaces, &fills)?;
    let blank = u(make_pin(
        geometry,
        "BA blank SS",
        &surfs.ba[5..],
        &[ss, h2o, zr, h2o],
        None,
    )?);
    let blank_bare = u(make_pin(geometry, "BA blank SS bare", &surfs.ba[5..6], &[ss, h2o], None)?);

    let (bb, bi) = (u(ba.bare), u(ba.intermediate_grid));
    let (gb, gg) = (u(gtd.bare), u(gtd.bottom_grid));
    make_stack(
        geometry,
        "BA stack",
        &surfs.absorber_stack_planes(),
        &[
            water,
            water,
            water,
            gb,
            gb,
            gg,
            u(ba_dashpot.bottom_grid),
            u(ba_dashpot.bare),
            bb,
            bi,
            bb,
            bi,
            bb,
            bi,
            bb,
            blank,
            blank,
            blank,
            blank,
            blank,
            blank_bare,
            water,
        ],
    )
}

/// Fuel pellet column, optionally split into equal-area rings and equal
/// axial segments.
fn fuel_fill(
    geometry: &mut Geometry,
    label: &str,
    fuel: Fill,
    rings: &[SurfaceId],
    axial: &[SurfaceId],
) -> Result<Fill> {
    if rings.is_empty() && axial.is_empty() {
        return Ok(fuel);
    }
    let ring_regions = subdivide(geometry, rings)?;
    let axial_regions = subdivide(geometry, axial)?;

    let mut universe = Universe::new(format!("{label} fuel"));
    for (a, axial_region) in axial_regions.iter().enumerate() {
        for (r, ring_region) in ring_regions.iter().enumerate() {
            universe.add_cell(Cell::new(
                format!("{label} fuel ({a}, {r})"),
                axial_region.clone() & ring_region.clone(),
                fuel,
            ));
        }
    }
    Ok(Fill::Universe(geometry.add_universe(universe)))
}

fn fuel_stacks(
    geometry: &mut Geometry,
    surfs: &CoreSurfaces,
    mats: &MaterialSet,
    spacers: &Spacers,
    config: &CoreConfig,
    water: Fill,
) -> Result<[UniverseId; 3]> {
    if config.rings == 0 || config.axial == 0 {
        return Err(GeometryError::InvalidParameters(format!(
            "fuel needs at least one ring and one axial segment, got {} and {}",
            config.rings, config.axial
        )));
    }
    let m = |id| Fill::Material(id);
    let u = Fill::Universe;
    let (h2o, zr, ss, m5, he) = (m(mats.water), m(mats.zircaloy), m(mats.ss304), m(mats.m5), m(mats.he));

    // Equal-area rings: r_i^2 = i * R^2 / n.
    let n = config.rings;
    let rings: Vec<SurfaceId> = (1..n)
        .map(|i| {
            let r = (i as f64 * PELLET_OR * PELLET_OR / n as f64).sqrt();
            geometry.add_surface(Surface::z_cylinder(0.0, 0.0, r).named(format!("fuel ring {i}")))
        })
        .collect();
    let splits = linspace(BOTTOM_FUEL_STACK, TOP_ACTIVE_CORE, config.axial);
    let axial: Vec<SurfaceId> = splits[1..splits.len() - 1]
        .iter()
        .map(|&z| geometry.add_surface(Surface::z_plane(z)))
        .collect();

    let ss_pin = u(make_pin(geometry, "SS pin", &[surfs.clad_or], &[ss, h2o], None)?);
    let end_plug = u(make_pin(geometry, "end plug", &[surfs.clad_or], &[m5, h2o], None)?);
    let plenum_surfaces = [surfs.plenum_spring_or, surfs.clad_ir, surfs.clad_or];
    let plenum = u(make_pin(geometry, "pin plenum", &plenum_surfaces, &[m(mats.ss302), he, m5, h2o], None)?);
    let plenum_grid = u(make_pin(
        geometry,
        "pin plenum grid (intermediate)",
        &plenum_surfaces,
        &[m(mats.inconel), he, zr, h2o],
        Some(&spacers.intermediate),
    )?);
    let outside = grid_variants(geometry, spacers, "Outside pin", &[surfs.clad_ir, surfs.clad_or], &[he, m5, h2o])?;
    let (ob, og, oi) = (u(outside.bare), u(outside.bottom_grid), u(outside.intermediate_grid));

    let within_fuel = surfs.within_fuel_planes();
    let fuel_stack_planes = surfs.fuel_stack_planes();
    let mut stacks = [UniverseId(0); 3];
    for enrichment in Enrichment::ALL {
        let label = enrichment.label();
        let pellet = fuel_fill(geometry, label, m(mats.fuel(enrichment)), &rings, &axial)?;
        let pin_stack = make_pin_stack(
            geometry,
            &format!("Fuel pin ({label}) stack"),
            &within_fuel,
            &[ob, og, ob, ob, oi, ob, oi, ob, oi, ob],
            surfs.pellet_or,
            pellet,
        )?;
        stacks[enrichment.index()] = make_stack(
            geometry,
            &format!("Fuel ({label}) stack"),
            &fuel_stack_planes,
            &[
                water,
                ss_pin,
                ss_pin,
                end_plug,
                u(pin_stack),
                plenum,
                plenum_grid,
                plenum,
                end_plug,
                water,
                ss_pin,
                water,
            ],
        )?;
    }
    Ok(stacks)
}
