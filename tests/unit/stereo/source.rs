use super::*;

fn encode_png(w: u32, h: u32, px: [u8; 4]) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(w, h, image::Rgba(px));
    let mut out = std::io::Cursor::new(Vec::new());
    img.write_to(&mut out, image::ImageFormat::Png).unwrap();
    out.into_inner()
}

#[test]
fn still_image_decodes_and_premultiplies() {
    let img = StillImage::decode(&encode_png(4, 2, [255, 0, 0, 128])).unwrap();
    assert_eq!((img.source_width(), img.source_height()), (4, 2));
    assert!(img.ready_for_draw());
    let f = img.frame().unwrap();
    assert_eq!(&f.data[..4], &[128, 0, 0, 128]);
}

#[test]
fn still_image_rejects_garbage_and_bad_lengths() {
    assert!(StillImage::decode(b"not an image").is_err());
    assert!(StillImage::from_premul_rgba8(2, 2, vec![0; 15]).is_err());
}

#[test]
fn empty_still_image_is_not_ready() {
    let img = StillImage::from_premul_rgba8(0, 0, Vec::new()).unwrap();
    assert!(!img.ready_for_draw());
    assert!(img.frame().is_none());
}

#[test]
fn video_slot_is_ready_only_with_a_frame() {
    let mut slot = VideoFrameSlot::new();
    assert!(!slot.ready_for_draw());
    assert_eq!(slot.source_width(), 0);
    assert!(slot.frame().is_none());

    slot.push_rgba8(2, 1, vec![255, 255, 255, 255, 0, 0, 0, 0]).unwrap();
    assert!(slot.ready_for_draw());
    assert_eq!((slot.source_width(), slot.source_height()), (2, 1));
    assert_eq!(slot.frames_received(), 1);

    slot.clear();
    assert!(!slot.ready_for_draw());
    assert_eq!(slot.frames_received(), 1);
}

#[test]
fn video_slot_rejects_mismatched_frames() {
    let mut slot = VideoFrameSlot::new();
    assert!(slot.push_premul_rgba8(2, 2, vec![0; 8]).is_err());
    assert!(slot.push_rgba8(1, 1, vec![0; 3]).is_err());
    assert!(!slot.ready_for_draw());

    slot.push_premul_rgba8(0, 5, Vec::new()).unwrap();
    assert!(!slot.ready_for_draw());
}
