use std::fs::File;
use std::io::{self, BufRead, BufReader, ErrorKind};
use std::path::Path;

use crate::error::Error;

/// Default upper bound for one raw read.
pub const DEFAULT_SEGMENT_SIZE: usize = 4096;

/// Smallest accepted segment size; smaller requests are clamped up.
pub const MIN_SEGMENT_SIZE: usize = 16;

/// One raw read of at most `segment_size` bytes, terminator excluded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub bytes: Vec<u8>,
    /// The line did not end inside this segment.
    pub is_prefix: bool,
}

/// Splits a reader into bounded segments.
#[derive(Debug)]
pub struct SegmentReader<R> {
    reader: R,
    segment_size: usize,
}

impl<R: BufRead> SegmentReader<R> {
    pub fn new(reader: R, segment_size: usize) -> Self {
        Self {
            reader,
            segment_size: segment_size.max(MIN_SEGMENT_SIZE),
        }
    }

    pub fn segment_size(&self) -> usize {
        self.segment_size
    }

    /// Read the next segment, or `None` at end of input.
    pub fn read_segment(&mut self) -> io::Result<Option<Segment>> {
        let mut bytes = Vec::new();
        loop {
            let available = match self.reader.fill_buf() {
                Ok(available) => available,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(err),
            };

            if available.is_empty() {
                if bytes.is_empty() {
                    return Ok(None);
                }
                return Ok(Some(Segment {
                    bytes,
                    is_prefix: false,
                }));
            }

            let room = self.segment_size - bytes.len();
            let window = &available[..available.len().min(room)];
            if let Some(newline) = window.iter().position(|byte| *byte == b'\n') {
                bytes.extend_from_slice(&window[..newline]);
                self.reader.consume(newline + 1);
                return Ok(Some(Segment {
                    bytes,
                    is_prefix: false,
                }));
            }

            let taken = window.len();
            bytes.extend_from_slice(window);
            self.reader.consume(taken);
            if bytes.len() == self.segment_size {
                return Ok(Some(Segment {
                    bytes,
                    is_prefix: true,
                }));
            }
        }
    }
}

impl<R: BufRead> Iterator for SegmentReader<R> {
    type Item = io::Result<Segment>;

    fn next(&mut self) -> Option<Self::Item> {
        self.read_segment().transpose()
    }
}

/// Yields complete logical lines, reassembling lines split across segments.
///
/// Stops after the first read error; a line that was being assembled when
/// the error hit is dropped.
#[derive(Debug)]
pub struct LineSource<R> {
    segments: SegmentReader<R>,
    failed: bool,
}

impl LineSource<BufReader<File>> {
    /// Open `path` for line reading.
    pub fn open(path: impl AsRef<Path>, segment_size: usize) -> Result<Self, Error> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|err| Error::file_access(path, err))?;
        Ok(Self::new(BufReader::new(file), segment_size))
    }
}

impl<R: BufRead> LineSource<R> {
    pub fn new(reader: R, segment_size: usize) -> Self {
        Self {
            segments: SegmentReader::new(reader, segment_size),
            failed: false,
        }
    }

    fn next_line(&mut self) -> io::Result<Option<String>> {
        let Some(first) = self.segments.read_segment()? else {
            return Ok(None);
        };

        let mut line = first.bytes;
        let mut is_prefix = first.is_prefix;
        while is_prefix {
            match self.segments.read_segment()? {
                Some(segment) => {
                    line.extend_from_slice(&segment.bytes);
                    is_prefix = segment.is_prefix;
                }
                None => break,
            }
        }

        if line.last() == Some(&b'\r') {
            line.pop();
        }

        String::from_utf8(line)
            .map(Some)
            .map_err(|err| io::Error::new(ErrorKind::InvalidData, err))
    }
}

impl<R: BufRead> Iterator for LineSource<R> {
    type Item = io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        match self.next_line() {
            Ok(line) => line.map(Ok),
            Err(err) => {
                self.failed = true;
                Some(Err(err))
            }
        }
    }
}
