//! Hardware serial port backed by the `serialport` crate

use std::io;

use serialport::{ClearBuffer, SerialPort};

use crate::logic::config::SerialConfig;

use super::line_buffer::{InputQueue, LineBuffer};
use super::SerialLink;

impl InputQueue for Box<dyn SerialPort> {
    fn waiting(&self) -> io::Result<usize> {
        let waiting = self.bytes_to_read().map_err(io::Error::from)?;
        Ok(waiting as usize)
    }
}

/// An open serial port with line buffering
pub struct SerialDevice {
    link: LineBuffer<Box<dyn SerialPort>>,
    name: String,
}

impl SerialDevice {
    /// Open the port with the configured baud rate and read timeout and
    /// discard anything already buffered.
    pub fn open(config: &SerialConfig) -> Result<Self, serialport::Error> {
        let port = serialport::new(&config.port, config.baud_rate)
            .timeout(config.timeout)
            .open()?;
        port.clear(ClearBuffer::Input)?;

        log::info!(
            "Serial connection established on {} @ {} baud",
            config.port,
            config.baud_rate
        );

        Ok(Self {
            link: LineBuffer::new(port),
            name: config.port.clone(),
        })
    }

    /// Release the port
    pub fn close(self) {
        log::info!("Serial port {} closed", self.name);
    }
}

impl SerialLink for SerialDevice {
    fn bytes_available(&mut self) -> io::Result<usize> {
        self.link.bytes_available()
    }

    fn read_line(&mut self) -> io::Result<Vec<u8>> {
        self.link.read_line()
    }

    fn write_all(&mut self, data: &[u8]) -> io::Result<()> {
        self.link.write_all(data)
    }
}
