use approx::assert_relative_eq;
use reactor_csg::material::{Material, MaterialId};
use reactor_csg::math::Point3;
use reactor_csg::surface::Axis;
use reactor_csg::{rotate_universe, Cell, Fill, Geometry, GeometryError, Region, RigidTransform, Surface, Universe, UniverseId};

/// Material `east` for x >= 1, `west` elsewhere.
fn lopsided(geom: &mut Geometry) -> (UniverseId, MaterialId, MaterialId) {
    let east = geom.add_material(Material::new("east", 1.0));
    let west = geom.add_material(Material::new("west", 1.0));
    let x1 = geom.add_surface(Surface::x_plane(1.0));
    let u = geom.add_universe(Universe::with_cells(
        "lopsided",
        vec![Cell::new("east", x1.positive(), east), Cell::new("west", x1.negative(), west)],
    ));
    (u, east, west)
}

fn material_at(geom: &Geometry, root: UniverseId, x: f64, y: f64) -> Option<MaterialId> {
    geom.locate(root, Point3::new(x, y, 0.0)).and_then(|t| t.material())
}

#[test]
fn rotated_copy_reuses_source_cells() {
    let mut geom = Geometry::new();
    let (source, _, _) = lopsided(&mut geom);
    let cells_before = geom.universe(source).cells.clone();
    let rotated = rotate_universe(&mut geom, source, RigidTransform::rotation_z(1), "rotated");

    let wrapper = geom.universe(rotated);
    assert_eq!(wrapper.cells.len(), 1);
    assert_eq!(wrapper.cells[0].fill, Fill::Universe(source));
    assert!(wrapper.cells[0].region.is_everywhere());
    assert_eq!(geom.universe(source).cells, cells_before);
}

#[test]
fn quarter_turn_moves_content() {
    let mut geom = Geometry::new();
    let (source, east, west) = lopsided(&mut geom);
    let rotated = rotate_universe(&mut geom, source, RigidTransform::rotation_z(1), "north");

    // Counter-clockwise: what was east now lies north.
    assert_eq!(material_at(&geom, rotated, 0.0, 2.0), Some(east));
    assert_eq!(material_at(&geom, rotated, 2.0, 0.0), Some(west));
    assert_eq!(material_at(&geom, source, 2.0, 0.0), Some(east));
}

#[test]
fn four_quarter_turns_are_identity() {
    let quarter = RigidTransform::rotation_z(1);
    let full = quarter.then(&quarter).then(&quarter).then(&quarter);
    assert!(full.is_identity());

    let mut geom = Geometry::new();
    let (source, _, _) = lopsided(&mut geom);
    let mut current = source;
    for i in 0..4 {
        current = rotate_universe(&mut geom, current, quarter, &format!("turn {i}"));
    }
    for (x, y) in [(2.0, 0.0), (0.0, 2.0), (-2.0, 0.5), (1.5, -3.0)] {
        assert_eq!(material_at(&geom, current, x, y), material_at(&geom, source, x, y), "({x}, {y})");
    }
}

#[test]
fn euler_angles_compose_z_then_y_then_x() {
    let t = RigidTransform::from_euler_degrees([0.0, 0.0, 90.0]).unwrap();
    let p = t.apply(&Point3::new(1.0, 0.0, 0.0));
    assert_relative_eq!(p, Point3::new(0.0, 1.0, 0.0), epsilon = 1e-12);

    let t = RigidTransform::from_euler_degrees([180.0, 0.0, 0.0]).unwrap();
    let p = t.apply(&Point3::new(1.0, 1.0, 1.0));
    assert_relative_eq!(p, Point3::new(1.0, -1.0, -1.0), epsilon = 1e-12);

    let t = RigidTransform::from_euler_degrees([0.0, 180.0, -90.0]).unwrap();
    let expected = RigidTransform::rotation_z(-1).then(&RigidTransform::quarter_turns(Axis::Y, 2));
    assert_eq!(t, expected);
}

#[test]
fn transforms_are_exact_and_invertible() {
    for turns in -4..=4 {
        let t = RigidTransform::quarter_turns(Axis::X, turns).then(&RigidTransform::rotation_z(turns + 1));
        assert!(t.matrix().iter().all(|v| [-1.0, 0.0, 1.0].contains(v)));
        assert!(t.then(&t.inverse()).is_identity());
        let p = Point3::new(0.3, -1.7, 2.9);
        assert_eq!(t.to_local(&t.apply(&p)), p);
    }
    assert!(RigidTransform::flip(Axis::Y).then(&RigidTransform::flip(Axis::Y)).is_identity());
}

#[test]
fn oblique_angles_are_rejected() {
    let err = RigidTransform::from_euler_degrees([0.0, 45.0, 0.0]).unwrap_err();
    assert_eq!(err, GeometryError::NonRightAngle(45.0));
    assert!(RigidTransform::from_euler_degrees([f64::NAN, 0.0, 0.0]).is_err());
}

#[test]
fn rotated_copy_inside_a_region() {
    let mut geom = Geometry::new();
    let (source, east, _) = lopsided(&mut geom);
    let box_region: Region = geom.rectangular_prism(10.0, 10.0, Default::default(), Default::default());
    let root = geom.add_universe(Universe::with_cells(
        "root",
        vec![Cell::new("block", box_region, source).with_transform(RigidTransform::rotation_z(2))],
    ));
    assert_eq!(material_at(&geom, root, -2.0, 0.0), Some(east));
    assert_eq!(material_at(&geom, root, 6.0, 0.0), None);
}
