use std::io::{self, Read, Write};

#[derive(thiserror::Error, Debug)]
pub enum Error {
    // std
    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// soft cap; larger payloads are accepted with a warning
pub const MSG_SIZE_MAX: i32 = 16_384;

/// one length-prefixed record of a demo file. immutable once read.
#[derive(Debug, Clone)]
pub struct Frame {
    pub seq: i32,
    pub data: Vec<u8>,
}

// NOTE: you should provide a reader that implements buffering (eg BufReader)
// because it'll be much more efficient.
#[derive(Debug)]
pub struct FrameReader<R: Read> {
    rdr: R,
}

impl<R: Read> FrameReader<R> {
    pub fn new(rdr: R) -> Self {
        Self { rdr }
    }

    /// reads the next `[i32 le seq][i32 le size][size bytes]` record. returns
    /// [`None`] once the terminator record (`size < 1`) or a clean end of the
    /// stream is reached; a truncated payload is an error.
    pub fn read_frame(&mut self) -> Result<Option<Frame>> {
        let seq = match self.read_i32() {
            Ok(seq) => seq,
            Err(err) if err.kind() == io::ErrorKind::UnexpectedEof => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        let size = match self.read_i32() {
            Ok(size) => size,
            Err(err) if err.kind() == io::ErrorKind::UnexpectedEof => return Ok(None),
            Err(err) => return Err(err.into()),
        };

        if size < 1 {
            // reached end of demo
            return Ok(None);
        }
        if size > MSG_SIZE_MAX {
            log::warn!("message size ({size}) exceeds max size ({MSG_SIZE_MAX})");
        }

        let mut data = vec![0u8; size as usize];
        self.rdr.read_exact(&mut data)?;
        Ok(Some(Frame { seq, data }))
    }

    fn read_i32(&mut self) -> io::Result<i32> {
        let mut buf = [0u8; 4];
        self.rdr.read_exact(&mut buf)?;
        Ok(i32::from_le_bytes(buf))
    }
}

/// emits one record in the same layout [`FrameReader`] consumes.
pub fn write_frame<W: Write + ?Sized>(out: &mut W, seq: i32, payload: &[u8]) -> Result<()> {
    out.write_all(&seq.to_le_bytes())?;
    out.write_all(&(payload.len() as i32).to_le_bytes())?;
    out.write_all(payload)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_roundtrip() -> Result<()> {
        let mut file = Vec::new();
        write_frame(&mut file, 7, &[1, 2, 3])?;
        write_frame(&mut file, -1, &[0xff; 5])?;
        // terminator
        file.extend((-1i32).to_le_bytes());
        file.extend((-1i32).to_le_bytes());

        let mut frames = FrameReader::new(file.as_slice());

        let frame = frames.read_frame()?.unwrap();
        assert_eq!(frame.seq, 7);
        assert_eq!(frame.data, vec![1, 2, 3]);

        let frame = frames.read_frame()?.unwrap();
        assert_eq!(frame.seq, -1);
        assert_eq!(frame.data.len(), 5);

        assert!(frames.read_frame()?.is_none());
        Ok(())
    }

    #[test]
    fn test_clean_eof_ends_the_demo() -> Result<()> {
        let data: &[u8] = &[];
        let mut frames = FrameReader::new(data);
        assert!(frames.read_frame()?.is_none());
        Ok(())
    }

    #[test]
    fn test_truncated_payload_is_an_error() {
        let mut file = Vec::new();
        file.extend(1i32.to_le_bytes());
        file.extend(100i32.to_le_bytes());
        file.extend([0u8; 10]);

        let mut frames = FrameReader::new(file.as_slice());
        assert!(frames.read_frame().is_err());
    }
}
