use super::*;

#[test]
fn mul_div255_endpoints() {
    assert_eq!(mul_div255_u8(255, 255), 255);
    assert_eq!(mul_div255_u8(0, 255), 0);
    assert_eq!(mul_div255_u8(255, 0), 0);
    assert_eq!(mul_div255_u8(128, 255), 128);
}

#[test]
fn premultiply_then_unpremultiply_keeps_opaque_and_zeroes_transparent() {
    let mut px = vec![200u8, 100, 50, 255, 10, 20, 30, 0];
    premultiply_rgba8_in_place(&mut px);
    assert_eq!(&px[..4], &[200, 100, 50, 255]);
    assert_eq!(&px[4..], &[0, 0, 0, 0]);

    let mut half = vec![255u8, 0, 0, 128];
    premultiply_rgba8_in_place(&mut half);
    assert_eq!(half, vec![128, 0, 0, 128]);
    unpremultiply_rgba8_in_place(&mut half);
    assert_eq!(half, vec![255, 0, 0, 128]);
}
