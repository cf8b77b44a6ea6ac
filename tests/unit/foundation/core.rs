use super::*;

#[test]
fn from_logical_floors_and_never_collapses_to_zero() {
    let g = OutputGeometry::from_logical(390.0, 844.0, 3.0);
    assert_eq!((g.width, g.height), (1170, 2532));

    let g = OutputGeometry::from_logical(100.7, 0.2, 1.5);
    assert_eq!((g.width, g.height), (151, 1));
}

#[test]
fn bogus_density_falls_back_to_one() {
    assert_eq!(OutputGeometry::new(10, 10, f64::NAN).pixel_density, 1.0);
    assert_eq!(OutputGeometry::new(10, 10, 0.0).pixel_density, 1.0);
    assert_eq!(OutputGeometry::new(10, 10, 2.0).pixel_density, 2.0);
}

#[test]
fn insets_shrink_the_area() {
    let r = Insets {
        top: 10.0,
        bottom: 20.0,
        left: 0.0,
        right: 5.0,
    }
    .apply(Rect::new(0.0, 0.0, 100.0, 100.0));
    assert_eq!(r, Rect::new(0.0, 10.0, 95.0, 80.0));
}

#[test]
fn parse_hex_accepts_rgb_and_rgba() {
    assert_eq!(Rgba8Premul::parse_hex("#00ff00").unwrap(), Rgba8Premul::GREEN);
    assert_eq!(
        Rgba8Premul::parse_hex("ff000080").unwrap(),
        Rgba8Premul {
            r: 128,
            g: 0,
            b: 0,
            a: 128
        }
    );
    assert!(Rgba8Premul::parse_hex("#0f0").is_err());
    assert!(Rgba8Premul::parse_hex("#zzzzzz").is_err());
}

#[test]
fn transparent_is_all_zero() {
    assert_eq!(Rgba8Premul::TRANSPARENT.to_array(), [0, 0, 0, 0]);
}

#[test]
fn straight_array_undoes_premultiplication() {
    let half_red = Rgba8Premul::from_straight_rgba(255, 0, 0, 128);
    assert_eq!(half_red.to_array(), [128, 0, 0, 128]);
    assert_eq!(half_red.to_straight_array(), [255, 0, 0, 128]);
    assert_eq!(Rgba8Premul::TRANSPARENT.to_straight_array(), [0, 0, 0, 0]);
    assert_eq!(Rgba8Premul::GREEN.to_straight_array(), [0, 255, 0, 255]);
}
