use super::*;
use crate::stereo::source::{StillImage, VideoFrameSlot};

// 4 output pixels per lens at density 1.
fn params(color_mode: ColorMode, thickness: f64) -> CalibrationParameters {
    CalibrationParameters {
        lpi: 125.0,
        base_ppi: 500.0,
        stripe_thickness: thickness,
        color_mode,
        ..CalibrationParameters::default()
    }
}

fn setup() -> (Compositor, RasterSurface, OutputGeometry) {
    let geometry = OutputGeometry::new(12, 4, 1.0);
    let c = Compositor::new(12, 4, CompositorOpts::default()).unwrap();
    let out = RasterSurface::new(12, 4).unwrap();
    (c, out, geometry)
}

fn sbs(w: u32, h: u32, left: [u8; 4], right: [u8; 4]) -> StillImage {
    let mut data = Vec::new();
    for _ in 0..h {
        for x in 0..w {
            data.extend_from_slice(if x < w / 2 { &left } else { &right });
        }
    }
    StillImage::from_premul_rgba8(w, h, data).unwrap()
}

fn row(out: &RasterSurface, y: u32) -> Vec<[u8; 4]> {
    (0..out.width()).map(|x| out.pixel(x, y).unwrap()).collect()
}

const W: [u8; 4] = [255, 255, 255, 255];
const K: [u8; 4] = [0, 0, 0, 255];
const G: [u8; 4] = [0, 255, 0, 255];
const R: [u8; 4] = [255, 0, 0, 255];
const B: [u8; 4] = [0, 0, 255, 255];

#[test]
fn mono_calibration_draws_white_stripes_on_black() {
    let (mut c, mut out, g) = setup();
    let res = c
        .compose_calibration(&params(ColorMode::Mono, 0.5), g, &mut out)
        .unwrap();
    assert_eq!(res.mask, MaskOutcome::Regenerated);
    assert_eq!(res.placement, None);
    for y in 0..4 {
        assert_eq!(row(&out, y), vec![W, W, K, K, W, W, K, K, W, W, K, K]);
    }
}

#[test]
fn tinted_calibration_uses_configured_tint() {
    let (mut c, mut out, g) = setup();
    c.compose_calibration(&params(ColorMode::Tinted, 0.5), g, &mut out)
        .unwrap();
    assert_eq!(row(&out, 0), vec![G, G, K, K, G, G, K, K, G, G, K, K]);

    c.set_opts(CompositorOpts {
        tint_rgba: Rgba8Premul::opaque(255, 0, 255),
        ..CompositorOpts::default()
    });
    c.compose_calibration(&params(ColorMode::Tinted, 0.5), g, &mut out)
        .unwrap();
    assert_eq!(out.pixel(0, 0), Some([255, 0, 255, 255]));
    assert_eq!(out.pixel(2, 0), Some(K));
}

#[test]
fn subpixel_calibration_draws_baked_colors() {
    let (mut c, mut out, g) = setup();
    c.compose_calibration(&params(ColorMode::RgbSubpixel, 0.75), g, &mut out)
        .unwrap();
    assert_eq!(row(&out, 2), vec![R, G, B, K, R, G, B, K, R, G, B, K]);
}

#[test]
fn repeated_calibration_reuses_the_mask() {
    let (mut c, mut out, g) = setup();
    let p = params(ColorMode::Mono, 0.5);
    c.compose_calibration(&p, g, &mut out).unwrap();
    let first = out.data().to_vec();
    let res = c.compose_calibration(&p, g, &mut out).unwrap();
    assert_eq!(res.mask, MaskOutcome::Reused);
    assert_eq!(out.data(), &first[..]);
    assert_eq!(c.mask_stats().regenerations, 1);
}

#[test]
fn invalid_pitch_without_prior_mask_renders_background_only() {
    let (mut c, mut out, g) = setup();
    let mut p = params(ColorMode::Mono, 0.5);
    p.lpi = 0.0;
    let res = c.compose_calibration(&p, g, &mut out).unwrap();
    assert_eq!(res.mask, MaskOutcome::Skipped);
    assert!(out.data().chunks_exact(4).all(|px| px == K));
}

#[test]
fn invalid_pitch_keeps_previous_mask() {
    let (mut c, mut out, g) = setup();
    let mut p = params(ColorMode::Mono, 0.5);
    c.compose_calibration(&p, g, &mut out).unwrap();
    p.lpi = -3.0;
    c.compose_calibration(&p, g, &mut out).unwrap();
    assert_eq!(row(&out, 0), vec![W, W, K, K, W, W, K, K, W, W, K, K]);
}

#[test]
fn stereo_shows_left_view_under_stripes_and_right_view_elsewhere() {
    let (mut c, mut out, g) = setup();
    let media = sbs(24, 4, R, B);
    let res = c
        .compose_stereo(
            &params(ColorMode::Mono, 0.5),
            g,
            &media,
            g.bounds(),
            AspectRatio::Auto,
            &mut out,
        )
        .unwrap();
    assert_eq!(res.placement.map(|p| p.rect), Some(g.bounds()));
    for y in 0..4 {
        assert_eq!(row(&out, y), vec![R, R, B, B, R, R, B, B, R, R, B, B]);
    }
}

#[test]
fn stereo_with_subpixel_mask_is_a_plain_stencil() {
    let (mut c, mut out, g) = setup();
    let media = sbs(24, 4, W, B);
    c.compose_stereo(
        &params(ColorMode::RgbSubpixel, 0.75),
        g,
        &media,
        g.bounds(),
        AspectRatio::Auto,
        &mut out,
    )
    .unwrap();
    assert_eq!(row(&out, 0), vec![W, W, W, B, W, W, W, B, W, W, W, B]);
}

#[test]
fn stereo_letterbox_bars_are_background() {
    let (mut c, mut out, g) = setup();
    // 2x4 halves (aspect 0.5) in a 12x4 area: 2 px wide, centered at x = 5..7.
    let media = sbs(4, 4, R, B);
    let res = c
        .compose_stereo(
            &params(ColorMode::Mono, 0.5),
            g,
            &media,
            g.bounds(),
            AspectRatio::Auto,
            &mut out,
        )
        .unwrap();
    assert_eq!(
        res.placement.map(|p| p.rect),
        Some(Rect::new(5.0, 0.0, 7.0, 4.0))
    );
    // Stripe at x = 4..6 lets the left view through at x = 5; x = 6 shows the right view.
    assert_eq!(
        row(&out, 0),
        vec![K, K, K, K, K, R, B, K, K, K, K, K]
    );
}

#[test]
fn stereo_errors_leave_output_untouched() {
    let (mut c, mut out, g) = setup();
    out.fill(Rgba8Premul::WHITE);
    let err = c
        .compose_stereo(
            &params(ColorMode::Mono, 0.5),
            g,
            &VideoFrameSlot::new(),
            g.bounds(),
            AspectRatio::Auto,
            &mut out,
        )
        .unwrap_err();
    assert!(matches!(err, LenticularError::SourceNotReady(_)));

    let err = c
        .compose_stereo(
            &params(ColorMode::Mono, 0.5),
            g,
            &sbs(24, 4, R, B),
            Rect::new(0.0, 0.0, 0.0, 4.0),
            AspectRatio::Auto,
            &mut out,
        )
        .unwrap_err();
    assert!(matches!(err, LenticularError::DegenerateGeometry(_)));
    assert!(out.data().chunks_exact(4).all(|px| px == W));
}

#[test]
fn mismatched_output_is_a_draw_error() {
    let (mut c, _, g) = setup();
    let mut small = RasterSurface::new(6, 4).unwrap();
    let err = c
        .compose_calibration(&params(ColorMode::Mono, 0.5), g, &mut small)
        .unwrap_err();
    assert!(matches!(err, LenticularError::Draw(_)));
}

#[test]
fn resize_forces_regeneration() {
    let (mut c, mut out, g) = setup();
    let p = params(ColorMode::Mono, 0.5);
    c.compose_calibration(&p, g, &mut out).unwrap();
    c.resize(8, 4).unwrap();
    out.resize(8, 4).unwrap();
    let res = c
        .compose_calibration(&p, OutputGeometry::new(8, 4, 1.0), &mut out)
        .unwrap();
    assert_eq!(res.mask, MaskOutcome::Regenerated);
    assert_eq!(row(&out, 0), vec![W, W, K, K, W, W, K, K]);
}
