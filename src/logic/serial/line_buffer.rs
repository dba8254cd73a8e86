//! Line assembly over a byte stream with a read timeout

use std::io::{self, Read, Write};

use super::SerialLink;

const READ_CHUNK: usize = 256;

/// Bytes the driver has queued but not yet handed to `read`
pub trait InputQueue {
    fn waiting(&self) -> io::Result<usize>;
}

/// Wraps a port and keeps bytes read past the last returned line
pub struct LineBuffer<P> {
    port: P,
    pending: Vec<u8>,
}

impl<P> LineBuffer<P> {
    pub fn new(port: P) -> Self {
        Self {
            port,
            pending: Vec::new(),
        }
    }

    pub fn get_ref(&self) -> &P {
        &self.port
    }

    fn take_line(&mut self) -> Option<Vec<u8>> {
        let pos = self.pending.iter().position(|b| *b == b'\n')?;
        let mut line: Vec<u8> = self.pending.drain(..=pos).collect();
        line.pop();
        if line.last() == Some(&b'\r') {
            line.pop();
        }
        Some(line)
    }
}

impl<P: Read + Write + InputQueue> SerialLink for LineBuffer<P> {
    fn bytes_available(&mut self) -> io::Result<usize> {
        if !self.pending.is_empty() {
            return Ok(self.pending.len());
        }
        self.port.waiting()
    }

    fn read_line(&mut self) -> io::Result<Vec<u8>> {
        let mut chunk = [0u8; READ_CHUNK];
        loop {
            if let Some(line) = self.take_line() {
                return Ok(line);
            }

            match self.port.read(&mut chunk) {
                Ok(0) => return Ok(std::mem::take(&mut self.pending)),
                Ok(n) => self.pending.extend_from_slice(&chunk[..n]),
                Err(e) if e.kind() == io::ErrorKind::TimedOut => {
                    return Ok(std::mem::take(&mut self.pending));
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
    }

    fn write_all(&mut self, data: &[u8]) -> io::Result<()> {
        self.port.write_all(data)?;
        self.port.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    enum Event {
        Bytes(&'static [u8]),
        Timeout,
        Interrupted,
        Fail,
    }

    /// Port that replays a fixed sequence of read results, then times out
    struct ScriptedPort {
        script: VecDeque<Event>,
        written: Vec<u8>,
    }

    impl ScriptedPort {
        fn new(script: Vec<Event>) -> Self {
            Self {
                script: script.into(),
                written: Vec::new(),
            }
        }
    }

    impl Read for ScriptedPort {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            match self.script.pop_front() {
                Some(Event::Bytes(bytes)) => {
                    buf[..bytes.len()].copy_from_slice(bytes);
                    Ok(bytes.len())
                }
                Some(Event::Interrupted) => Err(io::ErrorKind::Interrupted.into()),
                Some(Event::Fail) => Err(io::Error::new(io::ErrorKind::BrokenPipe, "unplugged")),
                Some(Event::Timeout) | None => Err(io::ErrorKind::TimedOut.into()),
            }
        }
    }

    impl Write for ScriptedPort {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.written.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl InputQueue for ScriptedPort {
        fn waiting(&self) -> io::Result<usize> {
            Ok(self
                .script
                .iter()
                .map(|e| match e {
                    Event::Bytes(b) => b.len(),
                    _ => 0,
                })
                .sum())
        }
    }

    #[test]
    fn test_two_lines_in_one_chunk() {
        let mut link = LineBuffer::new(ScriptedPort::new(vec![Event::Bytes(b"DATA,1,0.5\nDATA,2,0.7\n")]));

        assert_eq!(link.read_line().unwrap(), b"DATA,1,0.5");
        assert_eq!(link.read_line().unwrap(), b"DATA,2,0.7");
    }

    #[test]
    fn test_line_split_across_chunks() {
        let mut link = LineBuffer::new(ScriptedPort::new(vec![
            Event::Bytes(b"DATA,1"),
            Event::Interrupted,
            Event::Bytes(b",0.8"),
            Event::Bytes(b"73\nDA"),
        ]));

        assert_eq!(link.read_line().unwrap(), b"DATA,1,0.873");
        // Remainder of the last chunk stays buffered
        assert_eq!(link.bytes_available().unwrap(), 2);
    }

    #[test]
    fn test_crlf_endings_stripped() {
        let mut link = LineBuffer::new(ScriptedPort::new(vec![Event::Bytes(b"DATA,0.5\r\nDATA,0.6\r\n")]));

        assert_eq!(link.read_line().unwrap(), b"DATA,0.5");
        assert_eq!(link.read_line().unwrap(), b"DATA,0.6");
    }

    #[test]
    fn test_partial_line_returned_on_timeout() {
        let mut link = LineBuffer::new(ScriptedPort::new(vec![
            Event::Bytes(b"DATA,1,"),
            Event::Bytes(b"0.9"),
            Event::Timeout,
            Event::Bytes(b"DATA,2\n"),
        ]));

        assert_eq!(link.read_line().unwrap(), b"DATA,1,0.9");
        assert_eq!(link.read_line().unwrap(), b"DATA,2");
        // Nothing left: the next read times out empty
        assert!(link.read_line().unwrap().is_empty());
    }

    #[test]
    fn test_bytes_available_counts_buffered_line() {
        let mut link = LineBuffer::new(ScriptedPort::new(vec![Event::Bytes(b"DATA,1\nDATA,2\n")]));
        assert_eq!(link.bytes_available().unwrap(), 14);

        link.read_line().unwrap();
        // The port queue is drained but the second line is still pending
        assert_eq!(link.get_ref().waiting().unwrap(), 0);
        assert_eq!(link.bytes_available().unwrap(), 7);

        link.read_line().unwrap();
        assert_eq!(link.bytes_available().unwrap(), 0);
    }

    #[test]
    fn test_read_error_propagates() {
        let mut link = LineBuffer::new(ScriptedPort::new(vec![Event::Bytes(b"DATA"), Event::Fail]));
        let err = link.read_line().unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
    }

    #[test]
    fn test_write_reaches_port() {
        let mut link = LineBuffer::new(ScriptedPort::new(Vec::new()));
        link.write_all(b"100.00\n").unwrap();
        assert_eq!(link.get_ref().written, b"100.00\n");
    }
}
