//! Seekable byte sources for the tokenizer.

use crate::error::Result;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::sync::Arc;

/// Random-access byte input.
///
/// `read_byte` returns `Ok(None)` at end of input. Positions are
/// absolute byte offsets; seeking past the end is allowed and the next
/// read reports end of input.
pub trait ByteSource {
    fn read_byte(&mut self) -> Result<Option<u8>>;

    fn pos(&self) -> usize;

    fn set_pos(&mut self, pos: usize) -> Result<()>;
}

enum SliceData<'a> {
    Borrowed(&'a [u8]),
    Shared(Arc<[u8]>),
}

impl SliceData<'_> {
    fn as_slice(&self) -> &[u8] {
        match self {
            SliceData::Borrowed(data) => data,
            SliceData::Shared(data) => data.as_ref(),
        }
    }
}

/// In-memory byte source over borrowed or shared bytes.
pub struct SliceSource<'a> {
    data: SliceData<'a>,
    pos: usize,
}

impl<'a> SliceSource<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data: SliceData::Borrowed(data),
            pos: 0,
        }
    }

    /// Remaining unread data.
    pub fn remaining(&self) -> &[u8] {
        let data = self.data.as_slice();
        &data[self.pos.min(data.len())..]
    }

    pub fn len(&self) -> usize {
        self.data.as_slice().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SliceSource<'static> {
    /// Create a source backed by shared storage.
    pub fn shared(data: Arc<[u8]>) -> Self {
        Self {
            data: SliceData::Shared(data),
            pos: 0,
        }
    }

    /// Create a source from a raw byte slice (copies into shared storage).
    pub fn from_bytes(data: &[u8]) -> Self {
        Self::shared(Arc::from(data))
    }
}

impl ByteSource for SliceSource<'_> {
    #[inline]
    fn read_byte(&mut self) -> Result<Option<u8>> {
        let b = self.data.as_slice().get(self.pos).copied();
        if b.is_some() {
            self.pos += 1;
        }
        Ok(b)
    }

    fn pos(&self) -> usize {
        self.pos
    }

    fn set_pos(&mut self, pos: usize) -> Result<()> {
        self.pos = pos;
        Ok(())
    }
}

/// Byte source over any seekable reader, buffered.
pub struct ReaderSource<R: Read + Seek> {
    inner: BufReader<R>,
    pos: usize,
}

impl<R: Read + Seek> ReaderSource<R> {
    pub fn new(reader: R) -> Result<Self> {
        let mut inner = BufReader::new(reader);
        let pos = inner.stream_position()? as usize;
        Ok(Self { inner, pos })
    }

    pub fn into_inner(self) -> R {
        self.inner.into_inner()
    }
}

impl<R: Read + Seek> ByteSource for ReaderSource<R> {
    fn read_byte(&mut self) -> Result<Option<u8>> {
        let mut byte = [0u8; 1];
        loop {
            match self.inner.read(&mut byte) {
                Ok(0) => return Ok(None),
                Ok(_) => {
                    self.pos += 1;
                    return Ok(Some(byte[0]));
                }
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
    }

    fn pos(&self) -> usize {
        self.pos
    }

    fn set_pos(&mut self, pos: usize) -> Result<()> {
        // BufReader keeps its buffer when the relative seek stays inside it.
        let delta = pos as i64 - self.pos as i64;
        self.inner.seek_relative(delta)?;
        self.pos = pos;
        Ok(())
    }
}
