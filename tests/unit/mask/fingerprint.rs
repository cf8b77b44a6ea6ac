use super::*;

fn geom() -> OutputGeometry {
    OutputGeometry::new(500, 400, 1.0)
}

#[test]
fn identical_inputs_hash_identically() {
    let p = CalibrationParameters::default();
    assert_eq!(fingerprint_mask(&p, geom()), fingerprint_mask(&p, geom()));
}

#[test]
fn every_field_participates() {
    let p = CalibrationParameters::default();
    let base = fingerprint_mask(&p, geom());

    let variants = [
        fingerprint_mask(&p, OutputGeometry::new(501, 400, 1.0)),
        fingerprint_mask(&p, OutputGeometry::new(500, 401, 1.0)),
        fingerprint_mask(&p, OutputGeometry::new(500, 400, 2.0)),
        fingerprint_mask(&CalibrationParameters { lpi: 260.001, ..p }, geom()),
        fingerprint_mask(
            &CalibrationParameters {
                offset_phase: 0.1,
                ..p
            },
            geom(),
        ),
        fingerprint_mask(
            &CalibrationParameters {
                stripe_thickness: 0.4,
                ..p
            },
            geom(),
        ),
        fingerprint_mask(
            &CalibrationParameters {
                orientation: Orientation::Horizontal,
                ..p
            },
            geom(),
        ),
        fingerprint_mask(
            &CalibrationParameters {
                color_mode: ColorMode::RgbSubpixel,
                ..p
            },
            geom(),
        ),
        fingerprint_mask(
            &CalibrationParameters {
                base_ppi: 460.0,
                ..p
            },
            geom(),
        ),
    ];
    for v in variants {
        assert_ne!(v, base);
    }
}
