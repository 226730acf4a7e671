use reactor_csg::config::{CoreConfig, ModelConfig};
use reactor_csg::evaluate::ModelBuilder;
use reactor_csg::math::Point3;
use reactor_csg::search::ParameterVector;
use reactor_csg::smr::dimensions::{LATTICE_PITCH, MAX_ROD_INSERTION, PIN_PITCH};
use reactor_csg::smr::{core_geometry, RodInsertion, SmrModelBuilder};
use reactor_csg::{BoundaryCondition, Fill, Geometry, UniverseId};

const COARSE: CoreConfig = CoreConfig { rings: 1, axial: 1, depleted: false };

fn coarse_core(insertion: [f64; 4]) -> (Geometry, UniverseId) {
    let mut geom = Geometry::new();
    let root = core_geometry(&mut geom, &COARSE, &RodInsertion(insertion)).unwrap();
    (geom, root)
}

fn material_name(geom: &Geometry, root: UniverseId, x: f64, y: f64, z: f64) -> Option<String> {
    let trace = geom.locate(root, Point3::new(x, y, z))?;
    trace.material().map(|m| geom.material(m).name.clone())
}

#[test]
fn radial_layers_of_the_vessel() {
    let (geom, root) = coarse_core([0.0; 4]);
    let at = |r: f64| material_name(&geom, root, r, 0.0, 150.0);
    assert_eq!(at(96.0).as_deref(), Some("SS304"));
    assert_eq!(at(110.0).as_deref(), Some("Borated Water"));
    assert_eq!(at(130.0).as_deref(), Some("Carbon Steel"));
    assert_eq!(at(140.0), None);
    assert_eq!(material_name(&geom, root, 0.0, 110.0, -1.0), None);
}

#[test]
fn fuel_enrichment_follows_loading_map() {
    let (geom, root) = coarse_core([0.0; 4]);
    // Top-left fuel pin of the centre assembly, then of its western
    // neighbour (control rod assembly) and of the 3.1% one north of that.
    let corner = (-8.0 * PIN_PITCH, 8.0 * PIN_PITCH);
    let fuel = |dx: f64, dy: f64| material_name(&geom, root, corner.0 + dx, corner.1 + dy, 150.0);
    assert_eq!(fuel(0.0, 0.0).as_deref(), Some("1.6% Enr. UO2 Fuel"));
    assert_eq!(fuel(-LATTICE_PITCH, 0.0).as_deref(), Some("2.4% Enr. UO2 Fuel"));
    assert_eq!(fuel(-LATTICE_PITCH, LATTICE_PITCH).as_deref(), Some("3.1% Enr. UO2 Fuel"));
}

#[test]
fn control_rods_follow_insertion() {
    // Guide tube at printed (2, 5) of the bank A assembly west of centre.
    let x = -LATTICE_PITCH - 3.0 * PIN_PITCH;
    let y = 6.0 * PIN_PITCH;

    let (geom, root) = coarse_core([0.0; 4]);
    assert_eq!(material_name(&geom, root, x, y, 120.0).as_deref(), Some("Borated Water"));

    let (geom, root) = coarse_core([MAX_ROD_INSERTION, 0.0, 0.0, 0.0]);
    assert_eq!(material_name(&geom, root, x, y, 120.0).as_deref(), Some("Ag-In-Cd"));
}

#[test]
fn reflector_block_has_holes() {
    let (geom, root) = coarse_core([0.0; 4]);
    let s = LATTICE_PITCH / 276.0;
    let centre = -4.0 * LATTICE_PITCH;
    assert_eq!(material_name(&geom, root, centre, 0.0, 150.0).as_deref(), Some("SS304"));
    assert_eq!(material_name(&geom, root, centre + 80.0 * s, 0.0, 150.0).as_deref(), Some("Borated Water"));
}

#[test]
fn builder_maps_parameters_to_a_model() {
    let builder = SmrModelBuilder::new(ModelConfig { core: COARSE, ..ModelConfig::default() });
    let built = builder.build(&ParameterVector(vec![0.0, 100.0, 200.0, 300.0])).unwrap();
    assert_eq!(built.constrained_count, 0);
    assert!(built.document.source.only_fissionable);
    assert!(built.document.universe(built.document.root).is_some());
    // Core lattice plus the seven assembly types of the loading map.
    assert_eq!(built.document.lattices.len(), 8);

    let vacuum = built
        .document
        .surfaces
        .iter()
        .filter(|(_, s)| s.boundary == BoundaryCondition::Vacuum)
        .count();
    // Vessel outer wall plus the two axial planes.
    assert_eq!(vacuum, 3);

    let other = builder.build(&ParameterVector(vec![0.0, 0.0, 0.0, 0.0])).unwrap();
    assert_ne!(built.document.surfaces, other.document.surfaces);

    assert!(builder.build(&ParameterVector(vec![0.0; 3])).is_err());
    assert!(builder.build(&ParameterVector(vec![0.0, 0.0, 0.0, MAX_ROD_INSERTION + 1.0])).is_err());
}

#[test]
fn core_lattice_cell_is_the_clipped_envelope() {
    let builder = SmrModelBuilder::new(ModelConfig { core: COARSE, ..ModelConfig::default() });
    let doc = builder.build(&ParameterVector(vec![0.0; 4])).unwrap().document;
    let root = doc.universe(doc.root).unwrap();
    let main = &root.cells[0];
    assert_eq!(main.name, "Main core");
    assert!(matches!(main.fill, Fill::Lattice(_)));

    // Four envelope planes, the barrel and the two axial bounds.
    let surfaces = main.region.surfaces();
    assert_eq!(surfaces.len(), 7);
    assert!(surfaces.iter().all(|&s| doc.surface(s).is_some()));
}
