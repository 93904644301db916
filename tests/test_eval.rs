// Copyright (c) 2019 Georg Brandl.  Licensed under the Apache License,
// Version 2.0 <LICENSE-APACHE or http://www.apache.org/licenses/LICENSE-2.0>
// or the MIT license <LICENSE-MIT or http://opensource.org/licenses/MIT>, at
// your option. This file may not be copied, modified, or distributed except
// according to those terms.

use std::f64::consts::PI;
use approx::assert_abs_diff_eq;
use itertools::Itertools;
use strum::IntoEnumIterator;

use ngc_backplot::ast::Plane;
use ngc_backplot::eval::*;
use ngc_backplot::parse::parse;
use ngc_backplot::{backplot, backplot_with, ErrType};

fn run(src: &str) -> Interpreter {
    let mut interp = Interpreter::new(Config::default());
    interp.eval(&parse(src));
    interp
}

fn assert_point(p: &Point3, x: f64, y: f64, z: f64) {
    assert_abs_diff_eq!(p.coords, Point3::new(x, y, z).coords, epsilon = 1e-9);
}

fn paths(geometry: &Geometry) -> Vec<(PrimitiveKind, Vec<Point3>)> {
    geometry.paths().map(|(p, path)| (p.kind, path.to_vec())).collect()
}

#[test]
fn test_linear_moves() {
    let plot = backplot("G1 X10 Y0");
    assert_eq!(paths(&plot.geometry), [
        (PrimitiveKind::Line, vec![Point3::origin(), Point3::new(10., 0., 0.)]),
    ]);

    // absolute mode: repeating the move is a zero-length segment
    let plot = backplot("G1 X10 Y0\nG1 X10 Y0");
    assert_eq!(plot.geometry.path(&plot.geometry.primitives()[1]),
               [Point3::new(10., 0., 0.), Point3::new(10., 0., 0.)]);

    // relative mode: it moves on
    let plot = backplot("G91\nG1 X10 Y0\nG1 X10 Y0");
    assert_eq!(plot.geometry.path(&plot.geometry.primitives()[1]),
               [Point3::new(10., 0., 0.), Point3::new(20., 0., 0.)]);

    // rapid moves are drawn as well, and unset axes keep their value
    let plot = backplot("G0 Z5\nG0 X1");
    assert_eq!(plot.geometry.vertices().last(), Some(&Point3::new(1., 0., 5.)));
    assert!(plot.diagnostics.is_empty());
}

#[test]
fn test_units() {
    let interp = run("G20\nG1 X1");
    assert_abs_diff_eq!(interp.state().position.x, 25.4);

    // positions are not rescaled when switching back
    let interp = run("G20 G91\nG1 X1\nG21\nG1 X1");
    assert_abs_diff_eq!(interp.state().position.x, 26.4, epsilon = 1e-12);
    assert_eq!(interp.state().scale, 1.0);

    let interp = run("G20\nG1 X1\nG21\nG1 X1");
    assert_abs_diff_eq!(interp.state().position.x, 1.0);

    // feed and extrusion are never scaled
    let interp = run("G20\nG1 X1 F100 E2");
    assert_eq!(interp.state().feed, 100.);
    assert_eq!(interp.state().extrusion, 2.);
}

#[test]
fn test_feed_and_extrusion() {
    let interp = run("G1 X1 E0.5 F200\nG91\nG1 X1 E0.5 F-50\nG2 X1 Y0 R1 F10");
    assert_abs_diff_eq!(interp.state().extrusion, 1.0);
    assert_abs_diff_eq!(interp.state().feed, 160.);
}

#[test]
fn test_modal_state() {
    let interp = run("G18\nG91\nG90.1\nT7");
    let state = interp.state();
    assert_eq!(state.arc_plane, Plane::XZ);
    assert!(state.relative);
    assert!(!state.arc_mode_inc);
    assert_eq!(state.tool, Some(7));

    let default = MachineState::default();
    assert_eq!(default.scale, 1.0);
    assert_eq!(default.arc_plane, Plane::XY);
    assert!(!default.relative);
    assert!(default.arc_mode_inc);
}

#[test]
fn test_full_circle() {
    let plot = backplot("G2 I5 J0");
    assert!(plot.diagnostics.is_empty());
    let paths = paths(&plot.geometry);
    let (kind, path) = &paths[0];
    assert_eq!(*kind, PrimitiveKind::Curve);
    assert_eq!(path.len(), 101);

    // starts and ends at the programmed start
    assert_point(&path[0], 0., 0., 0.);
    assert_eq!(path[100], Point3::origin());

    // clockwise from the west side of the circle goes north first
    assert!(path[1].y > 0.);

    let center = Point3::new(5., 0., 0.);
    for p in path {
        assert_abs_diff_eq!(nalgebra::distance(p, &center), 5., epsilon = 0.05);
        assert_eq!(p.z, 0.);
    }
    for (a, b) in path.iter().tuple_windows() {
        assert!(nalgebra::distance(a, b) > 1e-6);
    }
    assert_abs_diff_eq!(plot.geometry.length(), 2. * PI * 5., epsilon = 0.1);
}

#[test]
fn test_radius_format() {
    let spec = ArcSpec {
        plane: Plane::XY,
        start: Point3::origin(),
        end: Point3::new(10., 0., 0.),
        center: HelixCenter::Radius(5.),
        clockwise: true,
        turns: 1,
    };
    let arc = resolve_arc(&spec, true, &Config::default()).unwrap();
    assert_abs_diff_eq!(nalgebra::distance(&arc.center, &spec.start),
                        nalgebra::distance(&arc.center, &spec.end), epsilon = 1e-6);
    assert!(arc.sweep <= PI + 1e-9);

    let plot = backplot("G2 X10 Y0 R5");
    let path = plot.geometry.path(&plot.geometry.primitives()[0]);
    assert_point(&path[0], 0., 0., 0.);
    assert_point(&path[50], 5., 5., 0.);
    assert_point(&path[100], 10., 0., 0.);
}

#[test]
fn test_radius_sign() {
    let arc = |clockwise, radius| {
        let spec = ArcSpec {
            plane: Plane::XY,
            start: Point3::origin(),
            end: Point3::new(10., 0., 0.),
            center: HelixCenter::Radius(radius),
            clockwise,
            turns: 1,
        };
        resolve_arc(&spec, true, &Config::default()).unwrap()
    };

    // positive radius: less than half a circle, in both directions
    let cw = arc(true, 6.);
    assert!(cw.sweep < PI);
    assert!(cw.center.y < 0.);
    let ccw = arc(false, 6.);
    assert!(ccw.sweep < PI);
    assert!(ccw.center.y > 0.);

    // negative radius: the reflex arc
    let cw = arc(true, -6.);
    assert!(cw.sweep > PI);
    assert!(cw.center.y > 0.);
    assert_abs_diff_eq!(cw.radius, 6., epsilon = 1e-9);

    // the minor and major arcs complete each other
    assert_abs_diff_eq!(arc(true, 6.).sweep + arc(true, -6.).sweep, 2. * PI, epsilon = 1e-9);
}

#[test]
fn test_invalid_arc_advances_position() {
    let interp = run("G2 X10 Y0 I3 J0");
    assert_eq!(interp.state().position, Point3::new(10., 0., 0.));
    assert_eq!(interp.diagnostics().len(), 1);
    assert!(matches!(interp.diagnostics()[0].errtype,
                     ErrType::RadiusMismatch { .. }));

    let plot = backplot("G1 X1\nG2 X10 Y0 I3 J0\nG1 X11");
    let kinds: Vec<_> = plot.geometry.primitives().iter().map(|p| (p.lineno, p.kind)).collect();
    assert_eq!(kinds, [(1, PrimitiveKind::Line), (3, PrimitiveKind::Line)]);
    // the next move starts at the nominal arc end
    assert_eq!(plot.geometry.vertices()[2], Point3::new(10., 0., 0.));
    assert_eq!(plot.diagnostics[0].lineno, 2);
}

#[test]
fn test_radius_tolerance() {
    // a small mismatch is accepted
    let plot = backplot("G2 X10.2 Y0 I5 J0");
    assert!(plot.diagnostics.is_empty());
    assert_eq!(plot.geometry.len(), 1);

    // unless the tolerance is tightened
    let strict = ArcTolerance { absolute: 0.0, minimum: 0.005, relative: 0.001 };
    let plot = backplot_with("G2 X10.2 Y0 I5 J0", &Config::default().with_tolerance(strict));
    assert!(plot.geometry.is_empty());

    // helical moves skip the check
    let plot = backplot("G2 X10 Y0 Z-1 I3 J0");
    assert!(plot.diagnostics.is_empty());
}

#[test]
fn test_degenerate_arcs() {
    let interp = run("G1 X5 Y5\nG2 X5 Y5 R3");
    assert_eq!(interp.diagnostics()[0].errtype, ErrType::DegenerateArc);
    assert_eq!(interp.state().position, Point3::new(5., 5., 0.));

    let interp = run("G2 X10 Y0 R2");
    assert!(matches!(interp.diagnostics()[0].errtype, ErrType::RadiusTooSmall { .. }));

    let interp = run("G2 X10 Y0 I0 J0");
    assert_eq!(interp.diagnostics()[0].errtype, ErrType::ZeroRadius);
}

#[test]
fn test_absolute_arc_center() {
    let absolute = backplot("G1 X10 Y0\nG90.1\nG3 X0 Y10 I0 J0");
    let incremental = backplot("G1 X10 Y0\nG3 X0 Y10 I-10 J0");
    assert!(absolute.diagnostics.is_empty());

    let path = absolute.geometry.path(&absolute.geometry.primitives()[1]);
    let half = 10. * (PI / 4.).cos();
    assert_point(&path[0], 10., 0., 0.);
    assert_point(&path[50], half, half, 0.);
    assert_point(&path[100], 0., 10., 0.);

    let other = incremental.geometry.path(&incremental.geometry.primitives()[1]);
    for (a, b) in path.iter().zip(other) {
        assert_point(a, b.x, b.y, b.z);
    }
}

#[test]
fn test_planes() {
    // XZ winds the other way around
    let plot = backplot("G18\nG2 X10 I5 K0");
    let path = plot.geometry.path(&plot.geometry.primitives()[0]);
    assert_point(&path[0], 0., 0., 0.);
    assert_point(&path[50], 5., 0., -5.);
    assert_point(&path[100], 10., 0., 0.);

    let plot = backplot("G19\nG3 Y10 J5 K0");
    let path = plot.geometry.path(&plot.geometry.primitives()[0]);
    assert_point(&path[50], 0., 5., -5.);

    // the offsets select the plane over the modal one
    let plot = backplot("G17\nG2 X10 I5 K0");
    let path = plot.geometry.path(&plot.geometry.primitives()[0]);
    assert_point(&path[50], 5., 0., -5.);
}

#[test]
fn test_radius_format_planes() {
    let near = |p: &Point3, q: &Point3| assert_abs_diff_eq!(p.coords, q.coords, epsilon = 1e-6);

    // (plane, end, clockwise, radius, side of the chord the center is on)
    let cases = [
        (Plane::XZ, Point3::new(10., 0., 0.), true, 6., 1.),
        (Plane::XZ, Point3::new(10., 0., 0.), true, -6., -1.),
        (Plane::XZ, Point3::new(10., 0., 0.), false, 6., -1.),
        (Plane::XZ, Point3::new(10., 0., 0.), false, -6., 1.),
        (Plane::YZ, Point3::new(0., 10., 0.), true, 6., -1.),
        (Plane::YZ, Point3::new(0., 10., 0.), true, -6., 1.),
        (Plane::YZ, Point3::new(0., 10., 0.), false, 6., 1.),
        (Plane::YZ, Point3::new(0., 10., 0.), false, -6., -1.),
    ];
    for &(plane, end, clockwise, radius, side) in &cases {
        let spec = ArcSpec {
            plane,
            start: Point3::origin(),
            end,
            center: HelixCenter::Radius(radius),
            clockwise,
            turns: 1,
        };
        let arc = resolve_arc(&spec, true, &Config::default()).unwrap();
        assert_abs_diff_eq!(arc.center.z, side * 11f64.sqrt(), epsilon = 1e-9);
        assert_abs_diff_eq!(arc.radius, 6., epsilon = 1e-9);
        if radius > 0. {
            assert!(arc.sweep < PI);
        } else {
            assert!(arc.sweep > PI);
        }

        // the path runs from start to target, bulging away from the center
        // for the minor arc and towards it for the major one
        near(&arc.points[0], &spec.start);
        near(&arc.points[100], &end);
        let mid = arc.points[50];
        assert_abs_diff_eq!(nalgebra::distance(&mid, &arc.center), 6., epsilon = 1e-6);
        assert_eq!(mid.z.signum() == side, radius < 0.);
        assert_abs_diff_eq!(mid.x + mid.y, 5., epsilon = 1e-6);
    }

    // X and Z words select XZ over the modal plane
    let plot = backplot("G17\nG2 X10 Z0 R6");
    let path = plot.geometry.path(&plot.geometry.primitives()[0]);
    near(&path[50], &Point3::new(5., 0., 11f64.sqrt() - 6.));
    assert!(path.iter().all(|p| p.y == 0.));

    // X and Y words select XY
    let plot = backplot("G18\nG2 X10 Y5 R6");
    assert!(plot.diagnostics.is_empty());
    let path = plot.geometry.path(&plot.geometry.primitives()[0]);
    assert!(path.iter().all(|p| p.z == 0.));
    near(&path[0], &Point3::origin());
    near(&path[100], &Point3::new(10., 5., 0.));
    // clockwise with a positive radius passes left of the chord
    assert!(10. * path[50].y - 5. * path[50].x > 0.);
}

#[test]
fn test_plane_projection() {
    let p = Point3::new(1., 2., 3.);
    let xz = PlaneProjection::for_plane(Plane::XZ).unwrap();
    assert_eq!(xz.project(&p), Point3::new(1., 3., 2.));
    let yz = PlaneProjection::for_plane(Plane::YZ).unwrap();
    assert_eq!(yz.project(&p), Point3::new(2., 3., 1.));
    let drawable: Vec<_> = Plane::iter().filter_map(PlaneProjection::for_plane).collect();
    assert_eq!(drawable.len(), 3);
    for proj in &drawable {
        assert_eq!(proj.unproject(&proj.project(&p)), p);
        // the three axes are all distinct
        let mut axes: Vec<_> = Axis::iter().collect();
        axes.retain(|a| ![proj.abscissa, proj.ordinate, proj.helix].contains(a));
        assert!(axes.is_empty());
    }
    assert!(xz.mirrored);
    assert!(PlaneProjection::for_plane(Plane::UV).is_none());
}

#[test]
fn test_unsupported_plane() {
    let interp = run("G17.1\nG2 X1 I1");
    assert_eq!(interp.diagnostics()[0].errtype, ErrType::UnsupportedPlane(Plane::UV));
    assert_eq!(interp.state().position, Point3::new(1., 0., 0.));
}

#[test]
fn test_helix() {
    let plot = backplot("G2 Z-3 I5 J0 P3");
    assert!(plot.diagnostics.is_empty());
    let path = plot.geometry.path(&plot.geometry.primitives()[0]);
    assert_eq!(path.len(), 101);
    assert_point(&path[0], 0., 0., 0.);
    assert_eq!(path[100], Point3::new(0., 0., -3.));
    for (a, b) in path.iter().tuple_windows() {
        assert!(b.z <= a.z + 1e-9);
    }
    let turn = 2. * PI * 5.;
    let length = plot.geometry.length();
    assert!(length > 2.9 * turn && length < 3.1 * turn);
}

#[test]
fn test_raw_samples() {
    let config = Config::default().with_smoothing(false);
    let plot = backplot_with("G2 I5 J0", &config);
    assert_eq!(plot.geometry.vertices().len(), 31);

    let config = config.with_points_per_turn(12);
    let plot = backplot_with("G2 I5 J0 P2", &config);
    assert_eq!(plot.geometry.vertices().len(), 25);
}

#[test]
fn test_unsupported_commands() {
    let plot = backplot("G1 X1\nG5 X3\nM3\nG1 X2");
    let errors: Vec<_> = plot.diagnostics.iter().map(|d| (d.lineno, d.errtype.clone())).collect();
    assert_eq!(errors, [
        (2, ErrType::Unsupported("G5".into())),
        (3, ErrType::Unsupported("M3".into())),
    ]);
    assert_eq!(plot.geometry.len(), 2);
    assert_eq!(plot.geometry.path(&plot.geometry.primitives()[1]),
               [Point3::new(1., 0., 0.), Point3::new(2., 0., 0.)]);
}

#[test]
fn test_empty_program() {
    let plot = backplot("; nothing to see\n\n");
    assert!(plot.geometry.is_empty());
    assert!(plot.geometry.bounds().is_none());
    assert_eq!(plot.geometry.length(), 0.);
    assert!(plot.diagnostics.is_empty());
    assert!(plot.tools.is_empty());
}

#[test]
fn test_bounds_and_lines() {
    let plot = backplot("G0 X-1 Y2 Z3\n\n; comment\nG1 X4 Y-5 Z0");
    assert_eq!(plot.geometry.bounds(),
               Some((Point3::new(-1., -5., 0.), Point3::new(4., 2., 3.))));
    let linenos: Vec<_> = plot.geometry.primitives().iter().map(|p| p.lineno).collect();
    assert_eq!(linenos, [1, 4]);
}

#[test]
fn test_idempotent() {
    let src = "G21 G90\nT1 M6\nG0 X0 Y0 Z5\nG1 Z-1 F100\nG2 X10 Y0 R5\nG3 X0 Y0 I-5 J0\n\
               G91 G1 X5\nX5\nG18 G2 X10 I5 K0\n";
    let first = backplot(src);
    assert_eq!(first, backplot(src));

    // and independent invocations can run in parallel
    let handles: Vec<_> = (0..4).map(|_| {
        let src = src.to_string();
        std::thread::spawn(move || backplot(&src))
    }).collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap(), first);
    }
}
