use super::*;

#[test]
fn over_src_alpha_0_is_noop() {
    let dst = [10, 20, 30, 40];
    assert_eq!(over(dst, [255, 255, 255, 0]), dst);
}

#[test]
fn over_src_opaque_replaces_dst() {
    let dst = [0, 0, 0, 255];
    let src = [255, 0, 0, 255];
    assert_eq!(over(dst, src), src);
}

#[test]
fn over_half_white_on_black_is_mid_gray() {
    assert_eq!(over([0, 0, 0, 255], [128, 128, 128, 128]), [128, 128, 128, 255]);
}

#[test]
fn source_in_takes_color_from_src_and_alpha_from_dst() {
    let mask = [255, 255, 255, 128];
    let tint = [0, 255, 0, 255];
    assert_eq!(source_in(mask, tint), [0, 128, 0, 128]);
    assert_eq!(source_in([0, 0, 0, 0], tint), [0, 0, 0, 0]);
}

#[test]
fn destination_in_stencils_dst_by_src_alpha() {
    let view = [200, 100, 50, 255];
    assert_eq!(destination_in(view, [255, 0, 0, 255]), view);
    assert_eq!(destination_in(view, [0, 0, 0, 0]), [0, 0, 0, 0]);
}

#[test]
fn buffer_composite_rejects_mismatched_lengths() {
    let mut dst = vec![0u8; 8];
    assert!(composite_in_place(CompositeMode::SourceOver, &mut dst, &[0u8; 4]).is_err());
    assert!(composite_in_place(CompositeMode::SourceOver, &mut dst[..6], &[0u8; 6]).is_err());
}

#[test]
fn buffer_destination_in_keeps_only_stenciled_pixels() {
    let mut dst = [9u8, 9, 9, 255, 7, 7, 7, 255].to_vec();
    let stencil = [0u8, 0, 0, 255, 0, 0, 0, 0];
    composite_in_place(CompositeMode::DestinationIn, &mut dst, &stencil).unwrap();
    assert_eq!(dst, vec![9, 9, 9, 255, 0, 0, 0, 0]);
}

#[test]
fn buffer_source_in_clears_where_layer_is_transparent() {
    let mut dst = [255u8, 255, 255, 255, 255, 255, 255, 128].to_vec();
    let layer = [0u8, 255, 0, 255, 0, 0, 0, 0];
    composite_in_place(CompositeMode::SourceIn, &mut dst, &layer).unwrap();
    assert_eq!(dst, vec![0, 255, 0, 255, 0, 0, 0, 0]);
}
