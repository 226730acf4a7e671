use proptest::prelude::*;
use reactor_csg::math::Point3;
use reactor_csg::{Geometry, Region, Side, Surface};

fn setup() -> (Geometry, Region, Region) {
    let mut geom = Geometry::new();
    let cyl = geom.add_surface(Surface::z_cylinder(0.0, 0.0, 1.0));
    let z0 = geom.add_surface(Surface::z_plane(0.0));
    let z1 = geom.add_surface(Surface::z_plane(2.0));
    let can = cyl.negative() & z0.positive() & z1.negative();
    let lid = Region::half_space(z1, Side::Positive);
    (geom, can, lid)
}

#[test]
fn complement_is_exact() {
    let (geom, can, _) = setup();
    let outside = !&can;
    for p in [
        Point3::new(0.0, 0.0, 1.0),
        Point3::new(0.0, 0.0, 3.0),
        Point3::new(2.0, 0.0, 1.0),
        Point3::new(0.0, 1.0, 0.0),
        Point3::new(0.5, 0.5, 2.0),
    ] {
        assert_ne!(can.contains(&geom, &p), outside.contains(&geom, &p), "{p:?}");
    }
    assert_eq!(!outside, can);
}

#[test]
fn union_and_intersection_flatten() {
    let (geom, can, lid) = setup();
    let either = can.clone() | lid.clone() | Region::nowhere();
    match &either {
        Region::Union(ops) => assert_eq!(ops.len(), 2),
        other => panic!("expected a union, got {other:?}"),
    }
    assert!(either.contains(&geom, &Point3::new(5.0, 5.0, 5.0)));
    assert!(!either.contains(&geom, &Point3::new(5.0, 5.0, 1.0)));

    let both = can & lid;
    for z in [1.0, 2.0, 3.0] {
        assert!(!both.contains(&geom, &Point3::new(0.0, 0.0, z)));
    }
}

#[test]
fn everywhere_and_nowhere() {
    let (geom, can, _) = setup();
    let p = Point3::new(0.0, 0.0, 1.0);
    assert!(Region::everywhere().contains(&geom, &p));
    assert!(!Region::nowhere().contains(&geom, &p));
    assert_eq!(Region::everywhere() & can.clone(), can);
}

#[test]
fn surfaces_are_collected_once() {
    let (_, can, lid) = setup();
    let shared = can.clone() & !&can & lid;
    assert_eq!(shared.surfaces().len(), 3);
}

/// Three half-spaces of different kinds: inside a cylinder, right of an
/// x-plane, below an oblique plane.
fn operands(r: f64, x0: f64, d: f64) -> (Geometry, [Region; 3]) {
    let mut geom = Geometry::new();
    let cyl = geom.add_surface(Surface::z_cylinder(0.5, -0.5, r));
    let wall = geom.add_surface(Surface::x_plane(x0));
    let slope = geom.add_surface(Surface::plane(1.0, 2.0, -1.0, d));
    (geom, [cyl.negative(), wall.positive(), slope.negative()])
}

fn point() -> impl Strategy<Value = Point3> {
    (-4.0f64..4.0, -4.0f64..4.0, -4.0f64..4.0).prop_map(|(x, y, z)| Point3::new(x, y, z))
}

proptest! {
    #[test]
    fn intersection_and_union_commute(
        r in 0.5f64..3.0, x0 in -2.0f64..2.0, d in -3.0f64..3.0, p in point(),
    ) {
        let (geom, [a, b, _]) = operands(r, x0, d);
        let has = |region: Region| region.contains(&geom, &p);
        prop_assert_eq!(has(a.clone() & b.clone()), has(b.clone() & a.clone()));
        prop_assert_eq!(has(a.clone() | b.clone()), has(b | a));
    }

    #[test]
    fn intersection_and_union_associate(
        r in 0.5f64..3.0, x0 in -2.0f64..2.0, d in -3.0f64..3.0, p in point(),
    ) {
        let (geom, [a, b, c]) = operands(r, x0, d);
        let has = |region: Region| region.contains(&geom, &p);
        prop_assert_eq!(
            has((a.clone() & b.clone()) & c.clone()),
            has(a.clone() & (b.clone() & c.clone()))
        );
        prop_assert_eq!(has((a.clone() | b.clone()) | c.clone()), has(a | (b | c)));
    }

    #[test]
    fn complement_follows_de_morgan(
        r in 0.5f64..3.0, x0 in -2.0f64..2.0, d in -3.0f64..3.0, p in point(),
    ) {
        let (geom, [a, b, c]) = operands(r, x0, d);
        let has = |region: Region| region.contains(&geom, &p);
        prop_assert_eq!(has(!(a.clone() & b.clone())), has(!&a | !&b));
        prop_assert_eq!(has(!(a.clone() | b.clone())), has(!&a & !&b));

        let nested = (a.clone() | b.clone()) & c.clone();
        prop_assert_eq!(has(!&nested), !has(nested.clone()));
        prop_assert_eq!(!!nested.clone(), nested);
    }
}
