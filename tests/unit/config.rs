use super::*;

#[test]
fn defaults_are_green_white_black() {
    let o = FrameLoopOpts::default();
    assert_eq!(o.compositor.tint_rgba, Rgba8Premul::GREEN);
    assert_eq!(o.compositor.mono_rgba, Rgba8Premul::WHITE);
    assert_eq!(o.compositor.background_rgba, Rgba8Premul::BLACK);
    assert_eq!(o.aspect_ratio, AspectRatio::Auto);
    assert_eq!(o.reserved, Insets::ZERO);
}

#[test]
fn lookup_overrides_tint_and_aspect() {
    let o = FrameLoopOpts::from_lookup(|k| match k {
        "LENTICULAR_TINT" => Some("#ff00ff".to_string()),
        "LENTICULAR_ASPECT" => Some("4:3".to_string()),
        _ => None,
    });
    assert_eq!(o.compositor.tint_rgba, Rgba8Premul::opaque(255, 0, 255));
    assert_eq!(o.aspect_ratio, AspectRatio::Classic4x3);
}

#[test]
fn invalid_overrides_are_ignored() {
    let o = FrameLoopOpts::from_lookup(|k| match k {
        "LENTICULAR_TINT" => Some("green".to_string()),
        "LENTICULAR_ASPECT" => Some("3:2".to_string()),
        _ => None,
    });
    assert_eq!(o, FrameLoopOpts::default());
}
