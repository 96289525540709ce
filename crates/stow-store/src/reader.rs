//! Random-access readers over stored content.

use std::io::{self, Read, Seek, SeekFrom};
use std::sync::Arc;

use bytes::Bytes;

/// Upper bound on the buffer [`read_all`] allocates up front.
const MAX_PREALLOC: usize = 1 << 20;

/// Random-access view of one piece of content.
///
/// Reads at arbitrary offsets take `&self`, so a reader carries no cursor and
/// may be shared between threads.
pub trait ReaderAt: Send + Sync {
    /// Read into `buf` starting at `offset`.
    ///
    /// Returns the number of bytes read. Short reads only happen at the end
    /// of the content; at or past the end the result is `Ok(0)`.
    fn read_at(&self, buf: &mut [u8], offset: u64) -> io::Result<usize>;

    /// Total content length in bytes.
    fn size(&self) -> u64;
}

impl<R: ReaderAt + ?Sized> ReaderAt for &R {
    fn read_at(&self, buf: &mut [u8], offset: u64) -> io::Result<usize> {
        (**self).read_at(buf, offset)
    }

    fn size(&self) -> u64 {
        (**self).size()
    }
}

impl<R: ReaderAt + ?Sized> ReaderAt for Box<R> {
    fn read_at(&self, buf: &mut [u8], offset: u64) -> io::Result<usize> {
        (**self).read_at(buf, offset)
    }

    fn size(&self) -> u64 {
        (**self).size()
    }
}

impl<R: ReaderAt + ?Sized> ReaderAt for Arc<R> {
    fn read_at(&self, buf: &mut [u8], offset: u64) -> io::Result<usize> {
        (**self).read_at(buf, offset)
    }

    fn size(&self) -> u64 {
        (**self).size()
    }
}

/// Reader over an owned, reference-counted byte buffer.
#[derive(Clone, Debug)]
pub struct BytesReader {
    data: Bytes,
}

impl BytesReader {
    pub fn new(data: impl Into<Bytes>) -> Self {
        Self { data: data.into() }
    }

    /// The underlying bytes (cheap clone).
    pub fn bytes(&self) -> Bytes {
        self.data.clone()
    }
}

impl ReaderAt for BytesReader {
    fn read_at(&self, buf: &mut [u8], offset: u64) -> io::Result<usize> {
        let start = match usize::try_from(offset) {
            Ok(start) if start < self.data.len() => start,
            _ => return Ok(0),
        };
        let n = buf.len().min(self.data.len() - start);
        buf[..n].copy_from_slice(&self.data[start..start + n]);
        Ok(n)
    }

    fn size(&self) -> u64 {
        self.data.len() as u64
    }
}

/// Sequential [`Read`] + [`Seek`] adapter over a [`ReaderAt`].
///
/// Each cursor keeps its own position, so several cursors can walk the same
/// reader independently.
#[derive(Debug)]
pub struct ReaderAtCursor<R> {
    inner: R,
    position: u64,
}

impl<R: ReaderAt> ReaderAtCursor<R> {
    pub fn new(inner: R) -> Self {
        Self { inner, position: 0 }
    }

    pub fn position(&self) -> u64 {
        self.position
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: ReaderAt> Read for ReaderAtCursor<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read_at(buf, self.position)?;
        self.position += n as u64;
        Ok(n)
    }
}

impl<R: ReaderAt> Seek for ReaderAtCursor<R> {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        let target = match pos {
            SeekFrom::Start(offset) => Some(offset),
            SeekFrom::End(delta) => self.inner.size().checked_add_signed(delta),
            SeekFrom::Current(delta) => self.position.checked_add_signed(delta),
        };
        match target {
            Some(position) => {
                self.position = position;
                Ok(position)
            }
            None => Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "seek to a negative or overflowing position",
            )),
        }
    }
}

/// Read a reader's entire content.
///
/// Fails with [`io::ErrorKind::UnexpectedEof`] if the reader yields fewer
/// bytes than its declared size.
pub fn read_all(reader: &dyn ReaderAt) -> io::Result<Vec<u8>> {
    let size = reader.size();
    let capacity = usize::try_from(size).unwrap_or(usize::MAX).min(MAX_PREALLOC);
    let mut out = Vec::with_capacity(capacity);
    ReaderAtCursor::new(reader).read_to_end(&mut out)?;
    if (out.len() as u64) < size {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            format!("read {} of {size} bytes", out.len()),
        ));
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_at_arbitrary_offsets() {
        let reader = BytesReader::new(&b"Hello World!"[..]);
        let mut buf = [0u8; 5];
        assert_eq!(reader.read_at(&mut buf, 6).unwrap(), 5);
        assert_eq!(&buf, b"World");
        assert_eq!(reader.read_at(&mut buf, 0).unwrap(), 5);
        assert_eq!(&buf, b"Hello");
    }

    #[test]
    fn short_read_at_end_and_zero_past_end() {
        let reader = BytesReader::new(&b"abc"[..]);
        let mut buf = [0u8; 8];
        assert_eq!(reader.read_at(&mut buf, 1).unwrap(), 2);
        assert_eq!(&buf[..2], b"bc");
        assert_eq!(reader.read_at(&mut buf, 3).unwrap(), 0);
        assert_eq!(reader.read_at(&mut buf, u64::MAX).unwrap(), 0);
    }

    #[test]
    fn cursor_reads_sequentially() {
        let reader = BytesReader::new(&b"So long and thanks"[..]);
        let mut cursor = ReaderAtCursor::new(&reader);
        let mut first = [0u8; 7];
        cursor.read_exact(&mut first).unwrap();
        assert_eq!(&first, b"So long");
        let mut rest = String::new();
        cursor.read_to_string(&mut rest).unwrap();
        assert_eq!(rest, " and thanks");
        assert_eq!(cursor.position(), 18);
    }

    #[test]
    fn cursor_seeks() {
        let reader = BytesReader::new(&b"0123456789"[..]);
        let mut cursor = ReaderAtCursor::new(reader);
        assert_eq!(cursor.seek(SeekFrom::End(-3)).unwrap(), 7);
        let mut buf = String::new();
        cursor.read_to_string(&mut buf).unwrap();
        assert_eq!(buf, "789");

        assert_eq!(cursor.seek(SeekFrom::Start(2)).unwrap(), 2);
        assert_eq!(cursor.seek(SeekFrom::Current(3)).unwrap(), 5);
        let mut one = [0u8; 1];
        cursor.read_exact(&mut one).unwrap();
        assert_eq!(&one, b"5");

        assert!(cursor.seek(SeekFrom::Current(-100)).is_err());
        assert_eq!(cursor.position(), 6);
    }

    #[test]
    fn independent_cursors_share_a_reader() {
        let reader = Arc::new(BytesReader::new(&b"abcdef"[..]));
        let mut a = ReaderAtCursor::new(Arc::clone(&reader));
        let mut b = ReaderAtCursor::new(Arc::clone(&reader));
        let mut buf = [0u8; 3];
        a.read_exact(&mut buf).unwrap();
        assert_eq!(&buf, b"abc");
        b.read_exact(&mut buf).unwrap();
        assert_eq!(&buf, b"abc");
    }

    #[test]
    fn read_all_returns_everything() {
        let data = vec![7u8; 100_000];
        let reader = BytesReader::new(data.clone());
        assert_eq!(read_all(&reader).unwrap(), data);
    }

    struct Truncated;

    impl ReaderAt for Truncated {
        fn read_at(&self, buf: &mut [u8], offset: u64) -> io::Result<usize> {
            if offset >= 2 || buf.is_empty() {
                return Ok(0);
            }
            buf[0] = b'x';
            Ok(1)
        }

        fn size(&self) -> u64 {
            10
        }
    }

    #[test]
    fn read_all_detects_truncation() {
        let err = read_all(&Truncated).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }
}
