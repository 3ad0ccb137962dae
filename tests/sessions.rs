//! End-to-end encode -> decode through the public session API.

use std::io::Cursor;

use panelpix::bmp::parse_bmp;
use panelpix::format::FormatClass;
use panelpix::{
    ColorKind, DecodeParams, DecodeSession, EncodeParams, EncodeSession, FrameSeek, ImageError,
    PixelBuffer, PixelFormat,
};

/// Bottom-up 24-bit BMP from top-down RGB rows
fn make_bmp(w: usize, h: usize, rgb: &[u8]) -> Vec<u8> {
    let stride = (w * 3 + 3) & !3;
    let mut out = Vec::new();
    out.extend_from_slice(b"BM");
    out.extend_from_slice(&((54 + stride * h) as u32).to_le_bytes());
    out.extend_from_slice(&0u32.to_le_bytes());
    out.extend_from_slice(&54u32.to_le_bytes());
    out.extend_from_slice(&40u32.to_le_bytes());
    out.extend_from_slice(&(w as i32).to_le_bytes());
    out.extend_from_slice(&(h as i32).to_le_bytes());
    out.extend_from_slice(&1u16.to_le_bytes());
    out.extend_from_slice(&24u16.to_le_bytes());
    out.extend_from_slice(&[0u8; 24]);
    for y in (0..h).rev() {
        let start = out.len();
        for px in rgb[y * w * 3..(y + 1) * w * 3].chunks_exact(3) {
            out.extend_from_slice(&[px[2], px[1], px[0]]);
        }
        out.resize(start + stride, 0);
    }
    out
}

fn solid(w: usize, h: usize, value: u8) -> Vec<u8> {
    vec![value; w * h * 3]
}

fn encode(image: PixelBuffer, params: EncodeParams) -> (Vec<u8>, DecodeParams) {
    let mut session = EncodeSession::from_raster(image).unwrap();
    session.configure(params).unwrap();
    let packed = session.encode().unwrap();
    let meta = session.decode_params().unwrap();
    session.close();
    (packed, meta)
}

fn decode_first(packed: Vec<u8>, params: DecodeParams) -> PixelBuffer {
    let mut session = DecodeSession::from_reader(Cursor::new(packed)).unwrap();
    session.configure(params).unwrap();
    session.decode_frame().unwrap().clone()
}

#[test]
fn test_two_by_two_checkerboard_row_lsb() {
    let rgb = [255, 255, 255, 0, 0, 0, 0, 0, 0, 255, 255, 255];
    let image = parse_bmp(&make_bmp(2, 2, &rgb)).unwrap();
    let (packed, meta) = encode(image, EncodeParams::default());

    // row 0: pixel 0 on -> bit 0; row 1: pixel 1 on -> bit 1
    assert_eq!(packed, vec![0x01, 0x02]);

    let decoded = decode_first(packed, meta);
    assert_eq!(decoded.as_bytes(), &rgb);
}

#[test]
fn test_monochrome_solid_round_trips_15x9() {
    let (w, h) = (15, 9);
    for format in PixelFormat::ALL.into_iter().filter(|f| f.class() == FormatClass::Monochrome) {
        for value in [0u8, 255] {
            let image = parse_bmp(&make_bmp(w, h, &solid(w, h, value))).unwrap();
            let (packed, meta) = encode(image, EncodeParams { format, ..Default::default() });
            assert_eq!(packed.len(), format.frame_size(w, h, 0, 0).unwrap(), "{}", format);

            let decoded = decode_first(packed, meta);
            assert_eq!(decoded.as_bytes(), &solid(w, h, value)[..], "{} value {}", format, value);
        }
    }
}

#[test]
fn test_transparency_key_round_trip() {
    let rgb = [0x20, 0x40, 0x60, 0xC8, 0x64, 0x32];
    for format in [PixelFormat::Argb1555, PixelFormat::Bgra5551] {
        let image = PixelBuffer::from_raw(2, 1, ColorKind::Truecolor24, rgb.to_vec()).unwrap();
        let (packed, meta) = encode(
            image,
            EncodeParams { format, transparent_key: 0x204060, ..Default::default() },
        );
        assert_eq!(&packed[..2], &[0, 0]);

        let decoded = decode_first(packed, meta);
        assert_eq!(&decoded.as_bytes()[..3], &[255, 255, 255]);
        for (got, want) in decoded.as_bytes()[3..].iter().zip(&rgb[3..]) {
            assert!(want - got < 8, "{}: {} vs {}", format, got, want);
        }
    }
}

#[test]
fn test_big_endian_sidecar_round_trip() {
    let rgb: Vec<u8> = (0..4 * 3 * 3).map(|i| (i * 7) as u8).collect();
    let image = PixelBuffer::from_raw(4, 3, ColorKind::Truecolor24, rgb.clone()).unwrap();
    let (packed, meta) = encode(
        image,
        EncodeParams { format: PixelFormat::Rgb565, big_endian: true, ..Default::default() },
    );

    let json = meta.to_json().unwrap();
    let meta = DecodeParams::from_json(&json).unwrap();
    assert!(meta.big_endian);

    let decoded = decode_first(packed, meta);
    for (i, (&got, &want)) in decoded.as_bytes().iter().zip(&rgb).enumerate() {
        let mask = if i % 3 == 1 { 0xFC } else { 0xF8 };
        assert_eq!(got, want & mask, "byte {}", i);
    }
}

#[test]
fn test_web_palette_preview_matches_decode() {
    let rgb: Vec<u8> = (0..5 * 5 * 3).map(|i| (i * 11) as u8).collect();
    let image = PixelBuffer::from_raw(5, 5, ColorKind::Truecolor24, rgb).unwrap();
    let mut session = EncodeSession::from_raster(image).unwrap();
    session
        .configure(EncodeParams { format: PixelFormat::Web, dither: true, ..Default::default() })
        .unwrap();
    let preview = session.preview().unwrap();
    let packed = session.encode().unwrap();
    let decoded = decode_first(packed, session.decode_params().unwrap());
    assert_eq!(preview, decoded);
}

#[test]
fn test_multi_frame_navigation() {
    // Three 8x2 RL frames with 2 bytes of head padding each, after a 5-byte file header
    let mut file = vec![0xEE; 5];
    let frames: [[u8; 2]; 3] = [[0x01, 0x00], [0x00, 0x80], [0xFF, 0xFF]];
    for frame in &frames {
        file.extend_from_slice(&[0xAB, 0xCD]);
        file.extend_from_slice(frame);
    }
    file.push(0x99); // trailing partial frame

    let mut session = DecodeSession::from_reader(Cursor::new(file)).unwrap();
    session
        .configure(DecodeParams {
            format: PixelFormat::BitmapRl,
            width: 8,
            height: 2,
            offset: 5,
            head: 2,
            ..Default::default()
        })
        .unwrap();
    assert_eq!(session.frame_count().unwrap(), 3);
    assert_eq!(session.frame_size().unwrap(), 4);

    let white_pixels = |s: &mut DecodeSession<Cursor<Vec<u8>>>| {
        s.decode_frame().unwrap().as_bytes().chunks_exact(3).filter(|p| p[0] == 255).count()
    };

    assert!(matches!(session.seek(FrameSeek::Prev), Err(ImageError::AtFileHead)));
    assert_eq!(white_pixels(&mut session), 1);

    session.seek(FrameSeek::Tail).unwrap();
    assert_eq!(white_pixels(&mut session), 16);
    let err = session.seek(FrameSeek::Next).unwrap_err();
    assert!(err.is_sequence_boundary());

    session.seek(FrameSeek::Prev).unwrap();
    assert_eq!(session.tell().unwrap(), 1);
    let frame = session.decode_frame().unwrap();
    // row 1, x = 7 is the only lit pixel
    assert_eq!(frame.rgb(7, 1), [255, 255, 255]);
    assert_eq!(frame.rgb(0, 0), [0, 0, 0]);

    assert!(matches!(
        session.seek(FrameSeek::Goto(3)),
        Err(ImageError::SeekOutOfRange { requested: 3, count: 3 })
    ));
    assert!(matches!(
        session.seek(FrameSeek::Goto(-1)),
        Err(ImageError::SeekOutOfRange { requested: -1, count: 3 })
    ));
    assert_eq!(session.tell().unwrap(), 1);

    session.seek(FrameSeek::Head).unwrap();
    assert_eq!(white_pixels(&mut session), 1);
}

#[test]
fn test_edge_detect_outlines_square() {
    // White 4x4 square in the middle of a black 8x8 image
    let (w, h) = (8, 8);
    let mut rgb = solid(w, h, 0);
    for y in 2..6 {
        for x in 2..6 {
            rgb[(y * w + x) * 3..(y * w + x) * 3 + 3].fill(255);
        }
    }
    let image = PixelBuffer::from_raw(w, h, ColorKind::Truecolor24, rgb).unwrap();
    let mut session = EncodeSession::from_raster(image).unwrap();
    session
        .configure(EncodeParams { edge_detect: true, ..Default::default() })
        .unwrap();
    let preview = session.preview().unwrap();
    // Far corner and square centre are flat; the square's border is an edge
    assert_eq!(preview.rgb(0, 0), [0, 0, 0]);
    assert_eq!(preview.rgb(3, 3), [0, 0, 0]);
    assert_eq!(preview.rgb(2, 2), [255, 255, 255]);
    assert_eq!(preview.rgb(1, 3), [255, 255, 255]);
}
