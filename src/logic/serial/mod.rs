//! Serial Module - Line-oriented link to the sensor board
//!
//! `SerialLink` is the seam the inference loop talks through; `SerialDevice`
//! backs it with a real port, tests back it with in-memory buffers.

pub mod device;
pub mod frame;
pub mod line_buffer;

use std::io;

pub use device::SerialDevice;
pub use frame::{decode_line, parse_frame, FrameError, SensorFrame};
pub use line_buffer::{InputQueue, LineBuffer};

/// Transport used by the inference loop
pub trait SerialLink {
    /// Bytes that can be read right now without waiting
    fn bytes_available(&mut self) -> io::Result<usize>;

    /// Read up to and excluding the next `\n` (a trailing `\r` is dropped
    /// too). Returns whatever arrived before the read timeout if no
    /// terminator shows up.
    fn read_line(&mut self) -> io::Result<Vec<u8>>;

    fn write_all(&mut self, data: &[u8]) -> io::Result<()>;
}
