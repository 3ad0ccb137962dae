//! Decode session: packed frames in a file (or any seekable reader) back to RGB888.

use std::fs::File;
use std::io::{ErrorKind, Read, Seek, SeekFrom};
use std::path::Path;

use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::error::{try_alloc_zeroed, ImageError, Result};
use crate::format::{codec, CodecOptions, PixelFormat};
use crate::frames::{FrameIndex, FrameSeek};
use crate::pixel::{ColorKind, PixelBuffer};

/// Parameters describing the packed frames of a file.
///
/// Also the schema of the JSON sidecar written next to encoded output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecodeParams {
    pub format: PixelFormat,
    pub width: usize,
    pub height: usize,
    pub big_endian: bool,
    /// Bytes to skip at the start of the file
    pub offset: u64,
    /// Padding bytes before each frame's pixels
    pub head: usize,
    /// Padding bytes after each frame's pixels
    pub tail: usize,
}

impl Default for DecodeParams {
    fn default() -> Self {
        Self {
            format: PixelFormat::BitmapRl,
            width: 0,
            height: 0,
            big_endian: false,
            offset: 0,
            head: 0,
            tail: 0,
        }
    }
}

impl DecodeParams {
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(ImageError::InvalidParameter(format!(
                "decode size {}x{} must be non-zero",
                self.width, self.height
            )));
        }
        self.frame_size()?;
        Ok(())
    }

    /// Bytes per frame including head and tail padding
    pub fn frame_size(&self) -> Result<usize> {
        self.format.frame_size(self.width, self.height, self.head, self.tail)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| ImageError::InvalidParameter(format!("invalid decode metadata: {}", e)))
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ImageError::InvalidParameter(format!("cannot serialize decode metadata: {}", e)))
    }
}

/// State that exists only once the session is configured
#[derive(Debug)]
struct Configured {
    params: DecodeParams,
    index: FrameIndex,
    raw: Vec<u8>,
    frame: PixelBuffer,
}

/// Owns a seekable reader over packed frames and the buffers to decode them.
#[derive(Debug)]
pub struct DecodeSession<R> {
    reader: R,
    file_len: u64,
    state: Option<Configured>,
}

impl DecodeSession<File> {
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|source| ImageError::OpenFile {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_reader(file)
    }
}

impl<R: Read + Seek> DecodeSession<R> {
    pub fn from_reader(mut reader: R) -> Result<Self> {
        let file_len = reader.seek(SeekFrom::End(0))?;
        if file_len == 0 {
            return Err(ImageError::FormatMalformed("input file is empty".to_string()));
        }
        reader.seek(SeekFrom::Start(0))?;
        Ok(Self { reader, file_len, state: None })
    }

    /// Total length of the underlying file
    pub fn file_len(&self) -> u64 {
        self.file_len
    }

    /// Set geometry and format, sizing the frame buffers and rewinding to frame 0.
    ///
    /// On failure the session is left unconfigured.
    pub fn configure(&mut self, params: DecodeParams) -> Result<()> {
        self.state = None;
        params.validate()?;

        let frame_size = params.frame_size()?;
        let index = FrameIndex::new(self.file_len, params.offset, frame_size)?;
        let raw = try_alloc_zeroed(frame_size)?;
        let frame = PixelBuffer::new(params.width, params.height, ColorKind::Truecolor24)?;
        self.reader.seek(SeekFrom::Start(index.position()))?;

        debug!(
            "decode configured: {} {}x{}, {} bytes/frame, {} frames",
            params.format,
            params.width,
            params.height,
            frame_size,
            index.count()
        );
        self.state = Some(Configured { params, index, raw, frame });
        Ok(())
    }

    fn configured(&self) -> Result<&Configured> {
        self.state.as_ref().ok_or(ImageError::MissingArgument("decode parameters"))
    }

    pub fn params(&self) -> Result<&DecodeParams> {
        Ok(&self.configured()?.params)
    }

    /// Bytes per frame including padding
    pub fn frame_size(&self) -> Result<usize> {
        Ok(self.configured()?.index.frame_size())
    }

    pub fn frame_count(&self) -> Result<usize> {
        Ok(self.configured()?.index.count())
    }

    /// Current 0-based frame index
    pub fn tell(&self) -> Result<usize> {
        Ok(self.configured()?.index.index())
    }

    /// Move to another frame and position the reader on it.
    pub fn seek(&mut self, seek: FrameSeek) -> Result<usize> {
        let state = self.state.as_mut().ok_or(ImageError::MissingArgument("decode parameters"))?;
        let index = state.index.seek(seek)?;
        let pos = state.index.position();
        trace!("seek {:?} -> frame {} at byte {}", seek, index, pos);
        self.reader.seek(SeekFrom::Start(pos))?;
        Ok(index)
    }

    /// Decode the current frame. The returned raster is reused by the next call.
    pub fn decode_frame(&mut self) -> Result<&PixelBuffer> {
        let state = self.state.as_mut().ok_or(ImageError::MissingArgument("decode parameters"))?;
        self.reader.seek(SeekFrom::Start(state.index.position()))?;

        if let Err(e) = self.reader.read_exact(&mut state.raw) {
            if e.kind() != ErrorKind::UnexpectedEof {
                return Err(e.into());
            }
            let expected = state.raw.len();
            let remaining = self.file_len.saturating_sub(state.index.position());
            let actual = remaining.min(expected as u64) as usize;
            return Err(ImageError::ShortRead { expected, actual });
        }

        let params = state.params;
        let payload = params.format.payload_size(params.width, params.height)?;
        let opts = CodecOptions {
            big_endian: params.big_endian,
            transparent_key: 0,
        };
        codec::decode(
            params.format,
            &mut state.raw[params.head..params.head + payload],
            &opts,
            &mut state.frame,
        )?;
        Ok(&state.frame)
    }

    /// Decode the current frame as RGB888 into `dst`, returning the number of bytes written.
    pub fn decode_frame_into(&mut self, dst: &mut [u8]) -> Result<usize> {
        let params = *self.params()?;
        let needed = params.width * params.height * 3;
        if dst.len() < needed {
            return Err(ImageError::BufferTooSmall { needed, actual: dst.len() });
        }
        dst[..needed].fill(0);
        let frame = self.decode_frame()?;
        dst[..needed].copy_from_slice(frame.as_bytes());
        Ok(needed)
    }

    /// Release the buffers and hand back the reader.
    pub fn close(self) -> R {
        self.reader
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn params(format: PixelFormat, width: usize, height: usize) -> DecodeParams {
        DecodeParams { format, width, height, ..Default::default() }
    }

    #[test]
    fn test_empty_input_is_malformed() {
        let err = DecodeSession::from_reader(Cursor::new(Vec::<u8>::new())).unwrap_err();
        assert!(matches!(err, ImageError::FormatMalformed(_)));
    }

    #[test]
    fn test_validate() {
        assert!(params(PixelFormat::Web, 0, 4).validate().is_err());
        assert!(params(PixelFormat::Web, 4, 0).validate().is_err());
        assert!(params(PixelFormat::Web, 4, 4).validate().is_ok());
    }

    #[test]
    fn test_oversized_geometry_fails_configure() {
        let mut session = DecodeSession::from_reader(Cursor::new(vec![0u8; 16])).unwrap();
        let err = session.configure(params(PixelFormat::Rgb565, 1 << 33, 1 << 31)).unwrap_err();
        assert!(matches!(err, ImageError::InvalidParameter(_)));
        let err = session
            .configure(DecodeParams { head: usize::MAX, ..params(PixelFormat::Web, 2, 2) })
            .unwrap_err();
        assert!(matches!(err, ImageError::InvalidParameter(_)));
        assert!(session.params().is_err());
    }

    #[test]
    fn test_prev_at_head_keeps_reader_position() {
        let data = vec![0u8; 2 + 4 * 3];
        let mut session = DecodeSession::from_reader(Cursor::new(data)).unwrap();
        session.configure(DecodeParams { offset: 2, ..params(PixelFormat::Web, 2, 2) }).unwrap();
        assert_eq!(session.reader.stream_position().unwrap(), 2);

        assert!(matches!(session.seek(FrameSeek::Prev), Err(ImageError::AtFileHead)));
        assert_eq!(session.reader.stream_position().unwrap(), 2);
        assert_eq!(session.tell().unwrap(), 0);

        session.seek(FrameSeek::Tail).unwrap();
        assert_eq!(session.reader.stream_position().unwrap(), 10);
        assert!(matches!(session.seek(FrameSeek::Next), Err(ImageError::AtFileTail)));
        assert_eq!(session.reader.stream_position().unwrap(), 10);
    }

    #[test]
    fn test_frame_count_with_offset_and_padding() {
        // web 2x2 = 4 bytes + head 1 + tail 1 = 6 per frame
        let data = vec![0u8; 3 + 6 * 4 + 2];
        let mut session = DecodeSession::from_reader(Cursor::new(data)).unwrap();
        session
            .configure(DecodeParams { offset: 3, head: 1, tail: 1, ..params(PixelFormat::Web, 2, 2) })
            .unwrap();
        assert_eq!(session.frame_size().unwrap(), 6);
        assert_eq!(session.frame_count().unwrap(), 4);
    }

    #[test]
    fn test_decode_strips_padding() {
        // two RL frames of 8x1 with a 2-byte head: [h, h, bits]
        let data = vec![0xAA, 0xAA, 0b0000_0001, 0x55, 0x55, 0b1000_0000];
        let mut session = DecodeSession::from_reader(Cursor::new(data)).unwrap();
        session
            .configure(DecodeParams { head: 2, ..params(PixelFormat::BitmapRl, 8, 1) })
            .unwrap();
        assert_eq!(session.frame_count().unwrap(), 2);

        let frame = session.decode_frame().unwrap();
        assert_eq!(&frame.as_bytes()[..6], &[255, 255, 255, 0, 0, 0]);

        session.seek(FrameSeek::Next).unwrap();
        let frame = session.decode_frame().unwrap();
        assert_eq!(&frame.as_bytes()[21..], &[255, 255, 255]);
        assert!(matches!(session.seek(FrameSeek::Next), Err(ImageError::AtFileTail)));
    }

    #[test]
    fn test_repeated_decode_returns_same_frame() {
        let data = vec![10u8, 20, 30, 40];
        let mut session = DecodeSession::from_reader(Cursor::new(data)).unwrap();
        session.configure(params(PixelFormat::Web, 1, 1)).unwrap();
        let first = session.decode_frame().unwrap().clone();
        let second = session.decode_frame().unwrap().clone();
        assert_eq!(first, second);
        assert_eq!(session.tell().unwrap(), 0);
    }

    #[test]
    fn test_big_endian_payload_only() {
        // head byte, then 0xF800 big-endian (red)
        let data = vec![0x01, 0xF8, 0x00];
        let mut session = DecodeSession::from_reader(Cursor::new(data)).unwrap();
        session
            .configure(DecodeParams { head: 1, big_endian: true, ..params(PixelFormat::Rgb565, 1, 1) })
            .unwrap();
        assert_eq!(session.decode_frame().unwrap().as_bytes(), &[0xF8, 0, 0]);
    }

    #[test]
    fn test_short_read() {
        // 3 bytes available after the offset, frame needs 4
        let data = vec![0u8; 5];
        let mut session = DecodeSession::from_reader(Cursor::new(data)).unwrap();
        session
            .configure(DecodeParams { offset: 1, ..params(PixelFormat::Rgb565, 2, 1) })
            .unwrap();
        assert_eq!(session.frame_count().unwrap(), 1);

        let data = vec![0u8; 3];
        let mut session = DecodeSession::from_reader(Cursor::new(data)).unwrap();
        session.configure(params(PixelFormat::Rgb565, 2, 1)).unwrap();
        assert_eq!(session.frame_count().unwrap(), 0);
        assert!(matches!(
            session.decode_frame(),
            Err(ImageError::ShortRead { expected: 4, actual: 3 })
        ));
    }

    #[test]
    fn test_offset_past_end() {
        let mut session = DecodeSession::from_reader(Cursor::new(vec![0u8; 4])).unwrap();
        session
            .configure(DecodeParams { offset: 100, ..params(PixelFormat::Web, 1, 1) })
            .unwrap();
        assert_eq!(session.frame_count().unwrap(), 0);
        assert!(matches!(session.seek(FrameSeek::Tail), Err(ImageError::SeekOutOfRange { .. })));
    }

    #[test]
    fn test_decode_frame_into() {
        let mut session = DecodeSession::from_reader(Cursor::new(vec![215u8, 0])).unwrap();
        session.configure(params(PixelFormat::Web, 2, 1)).unwrap();
        let mut small = [0u8; 5];
        assert!(matches!(
            session.decode_frame_into(&mut small),
            Err(ImageError::BufferTooSmall { needed: 6, actual: 5 })
        ));
        let mut out = [0u8; 6];
        assert_eq!(session.decode_frame_into(&mut out).unwrap(), 6);
        assert_eq!(out, [255, 255, 255, 0, 0, 0]);
    }

    #[test]
    fn test_unconfigured() {
        let mut session = DecodeSession::from_reader(Cursor::new(vec![1u8])).unwrap();
        assert!(matches!(session.frame_count(), Err(ImageError::MissingArgument(_))));
        assert!(matches!(session.decode_frame(), Err(ImageError::MissingArgument(_))));
    }

    #[test]
    fn test_metadata_json() {
        let p = DecodeParams { big_endian: true, ..params(PixelFormat::Bgr565, 320, 240) };
        let json = p.to_json().unwrap();
        assert!(json.contains("\"BGR565\""));
        assert_eq!(DecodeParams::from_json(&json).unwrap(), p);

        let partial = DecodeParams::from_json(r#"{"format": 10, "width": 4, "height": 2}"#).unwrap();
        assert_eq!(partial.format, PixelFormat::Rgb565);
        assert_eq!(partial.head, 0);
        assert!(DecodeParams::from_json(r#"{"format": "nope"}"#).is_err());
    }
}
