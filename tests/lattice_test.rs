use reactor_csg::material::Material;
use reactor_csg::math::{Point3, Vector2};
use reactor_csg::{
    BoundaryCondition, Cell, Fill, Geometry, GeometryError, LatticeIndex, LatticeTiler, Region, Universe, UniverseId,
};

fn solid(geom: &mut Geometry, name: &str) -> UniverseId {
    let m = geom.add_material(Material::new(name, 1.0));
    geom.add_universe(Universe::with_cells(name, vec![Cell::new(name, Region::everywhere(), m)]))
}

fn leaf(geom: &Geometry, root: UniverseId, x: f64, y: f64) -> Option<UniverseId> {
    geom.locate(root, Point3::new(x, y, 0.0)).and_then(|t| t.leaf_universe())
}

#[test]
fn element_centres_round_trip() {
    for (n, pitch) in [(17usize, 1.26), (9, 21.50364)] {
        let mut geom = Geometry::new();
        let u = solid(&mut geom, "u");
        let half = n as f64 * pitch / 2.0;
        let tiled = LatticeTiler::uniform("l", Vector2::new(pitch, pitch), Vector2::new(-half, -half), [n, n], u)
            .build(&mut geom)
            .unwrap();
        let lattice = geom.lattice(tiled.lattice);
        for ix in 0..n {
            for iy in 0..n {
                let index = LatticeIndex::new(ix, iy);
                let c = lattice.center(index);
                assert_eq!(lattice.element_at(c.x, c.y), Some(index));
            }
        }
        assert_eq!(lattice.element_at(half + 0.1, 0.0), None);
        assert_eq!(lattice.element_at(0.0, -half - 0.1), None);
    }
}

#[test]
fn override_wins_only_at_its_index() {
    for (n, target) in [(3usize, LatticeIndex::new(2, 1)), (17, LatticeIndex::new(2, 3))] {
        let mut geom = Geometry::new();
        let u0 = solid(&mut geom, "u0");
        let u1 = solid(&mut geom, "u1");
        let mut tiler = LatticeTiler::uniform("l", Vector2::new(1.0, 1.0), Vector2::zeros(), [n, n], u0);
        tiler.override_at(target, u1).unwrap();
        let tiled = tiler.build(&mut geom).unwrap();
        let lattice = geom.lattice(tiled.lattice);
        for ix in 0..n {
            for iy in 0..n {
                let index = LatticeIndex::new(ix, iy);
                let expected = if index == target { u1 } else { u0 };
                assert_eq!(lattice.get(index), Some(expected), "{index:?}");
            }
        }
    }
}

#[test]
fn later_override_wins() {
    let mut geom = Geometry::new();
    let [a, b, c] = [solid(&mut geom, "a"), solid(&mut geom, "b"), solid(&mut geom, "c")];
    let mut tiler = LatticeTiler::uniform("l", Vector2::new(1.0, 1.0), Vector2::zeros(), [2, 2], a);
    tiler
        .override_all([(LatticeIndex::new(1, 1), b), (LatticeIndex::new(1, 1), c)])
        .unwrap();
    let tiled = tiler.build(&mut geom).unwrap();
    assert_eq!(geom.lattice(tiled.lattice).get(LatticeIndex::new(1, 1)), Some(c));
}

#[test]
fn centre_override_resolves_by_point() {
    let mut geom = Geometry::new();
    let a = solid(&mut geom, "A");
    let b = solid(&mut geom, "B");
    let mut tiler = LatticeTiler::uniform("3x3", Vector2::new(1.0, 1.0), Vector2::new(-1.5, -1.5), [3, 3], a);
    tiler.override_at(LatticeIndex::new(1, 1), b).unwrap();
    let tiled = tiler.build(&mut geom).unwrap();
    let root = geom.add_universe(Universe::with_cells("root", vec![tiled.bounding_cell]));

    assert_eq!(leaf(&geom, root, 0.0, 0.0), Some(b));
    assert_eq!(leaf(&geom, root, -1.4, -1.4), Some(a));
    assert_eq!(leaf(&geom, root, 1.4, 1.4), Some(a));
    assert_eq!(leaf(&geom, root, 2.0, 0.0), None);
}

#[test]
fn out_of_bounds_override_is_fatal() {
    let mut geom = Geometry::new();
    let u = solid(&mut geom, "u");
    let mut tiler = LatticeTiler::uniform("l", Vector2::new(1.0, 1.0), Vector2::zeros(), [3, 3], u);
    let err = tiler.override_at(LatticeIndex::new(3, 0), u).unwrap_err();
    assert!(matches!(err, GeometryError::LatticeIndexOutOfBounds { ix: 3, iy: 0, nx: 3, ny: 3, .. }), "{err}");
    assert!(tiler.override_row_col(3, 0, u).is_err());
    assert!(tiler.override_row_col(0, 3, u).is_err());
}

#[test]
fn printed_rows_put_row_zero_on_top() {
    let mut geom = Geometry::new();
    let [a, b, c, d] = [solid(&mut geom, "a"), solid(&mut geom, "b"), solid(&mut geom, "c"), solid(&mut geom, "d")];
    let tiled = LatticeTiler::from_rows("l", Vector2::new(1.0, 1.0), Vector2::new(-1.0, -1.0), &[vec![a, b], vec![c, d]])
        .unwrap()
        .build(&mut geom)
        .unwrap();
    let root = geom.add_universe(Universe::with_cells("root", vec![tiled.bounding_cell]));

    assert_eq!(leaf(&geom, root, -0.5, 0.5), Some(a));
    assert_eq!(leaf(&geom, root, 0.5, 0.5), Some(b));
    assert_eq!(leaf(&geom, root, -0.5, -0.5), Some(c));
    assert_eq!(leaf(&geom, root, 0.5, -0.5), Some(d));

    let ragged = LatticeTiler::from_rows("r", Vector2::new(1.0, 1.0), Vector2::zeros(), &[vec![a, b], vec![c]]);
    assert!(matches!(ragged, Err(GeometryError::InvalidLattice { .. })));
}

#[test]
fn row_col_override_matches_printed_layout() {
    let mut geom = Geometry::new();
    let a = solid(&mut geom, "a");
    let b = solid(&mut geom, "b");
    let mut tiler = LatticeTiler::uniform("l", Vector2::new(1.0, 1.0), Vector2::zeros(), [4, 4], a);
    tiler.override_row_col(0, 3, b).unwrap();
    let tiled = tiler.build(&mut geom).unwrap();
    assert_eq!(geom.lattice(tiled.lattice).get(LatticeIndex::new(3, 3)), Some(b));
}

#[test]
fn outer_universe_fills_outside_elements() {
    let mut geom = Geometry::new();
    let inner = solid(&mut geom, "inner");
    let outer = solid(&mut geom, "outer");
    let tiled = LatticeTiler::uniform("l", Vector2::new(1.0, 1.0), Vector2::new(-1.0, -1.0), [2, 2], inner)
        .with_outer(outer)
        .build(&mut geom)
        .unwrap();
    let root = geom.add_universe(Universe::with_cells(
        "root",
        vec![Cell::new("all", Region::everywhere(), tiled.lattice)],
    ));
    assert_eq!(leaf(&geom, root, 0.5, 0.5), Some(inner));
    assert_eq!(leaf(&geom, root, 5.0, 0.5), Some(outer));
}

#[test]
fn envelope_carries_boundary_condition() {
    let mut geom = Geometry::new();
    let u = solid(&mut geom, "u");
    let tiled = LatticeTiler::uniform("l", Vector2::new(1.0, 1.0), Vector2::zeros(), [2, 2], u)
        .with_boundary(BoundaryCondition::Vacuum)
        .build(&mut geom)
        .unwrap();
    let surfaces = tiled.bounding_cell.region.surfaces();
    assert_eq!(surfaces.len(), 4);
    assert!(surfaces.iter().all(|&s| geom.surface(s).boundary == BoundaryCondition::Vacuum));
    assert_eq!(tiled.bounding_cell.fill, Fill::Lattice(tiled.lattice));
}

#[test]
fn degenerate_lattices_are_rejected() {
    let mut geom = Geometry::new();
    let u = solid(&mut geom, "u");
    let empty = LatticeTiler::uniform("l", Vector2::new(1.0, 1.0), Vector2::zeros(), [0, 3], u);
    assert!(matches!(empty.build(&mut geom), Err(GeometryError::InvalidLattice { .. })));
    let flat = LatticeTiler::uniform("l", Vector2::new(0.0, 1.0), Vector2::zeros(), [3, 3], u);
    assert!(matches!(flat.build(&mut geom), Err(GeometryError::InvalidLattice { .. })));
}
