/// Serial link to the still controller board
///
/// The controller only talks to the board through `StillLink`, so the GUI
/// owns one `SerialLink` created at startup and tests script a fake one.
/// Any I/O failure other than a timeout drops the port handle; the periodic
/// connection check then reopens it.

use anyhow::{anyhow, Context, Result};
use serialport::{ClearBuffer, DataBits, FlowControl, Parity, SerialPort, StopBits};
use std::io::{ErrorKind, Read, Write};
use std::time::Duration;

/// Byte-level access to the board
pub trait StillLink {
    fn is_open(&self) -> bool;
    /// Open the link, replacing any existing handle
    fn open(&mut self) -> Result<()>;
    fn close(&mut self);
    /// Everything received so far, without blocking
    fn read_available(&mut self) -> Result<Vec<u8>>;
    /// Write `line` as-is and flush
    fn write_line(&mut self, line: &str) -> Result<()>;
    /// Human readable endpoint, for status messages
    fn describe(&self) -> String;
}

/// Close if open, then open again
pub fn reconnect(link: &mut dyn StillLink) -> Result<()> {
    if link.is_open() {
        link.close();
    }
    link.open()
}

#[derive(Debug, Clone)]
pub struct SerialSettings {
    pub port_path: String,
    pub baud_rate: u32,
    pub timeout: Duration,
}

impl SerialSettings {
    pub fn new(port_path: impl Into<String>, baud_rate: u32) -> Self {
        Self {
            port_path: port_path.into(),
            baud_rate,
            timeout: Duration::from_millis(100),
        }
    }
}

/// 8N1 serial port without flow control
pub struct SerialLink {
    settings: SerialSettings,
    port: Option<Box<dyn SerialPort>>,
}

impl std::fmt::Debug for SerialLink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerialLink")
            .field("settings", &self.settings)
            .field("open", &self.port.is_some())
            .finish()
    }
}

impl SerialLink {
    /// Does not open the port; call `open` or `reconnect`
    pub fn new(settings: SerialSettings) -> Self {
        Self { settings, port: None }
    }

    pub fn settings(&self) -> &SerialSettings {
        &self.settings
    }

    fn drop_port(&mut self, why: &dyn std::fmt::Display) {
        log::warn!(target: "still_link", "{}: {}, closing port", self.settings.port_path, why);
        self.port = None;
    }
}

impl StillLink for SerialLink {
    fn is_open(&self) -> bool {
        self.port.is_some()
    }

    fn open(&mut self) -> Result<()> {
        self.port = None;
        let port = serialport::new(self.settings.port_path.as_str(), self.settings.baud_rate)
            .data_bits(DataBits::Eight)
            .parity(Parity::None)
            .stop_bits(StopBits::One)
            .flow_control(FlowControl::None)
            .timeout(self.settings.timeout)
            .open()
            .with_context(|| {
                format!("Failed to open {} at {} baud", self.settings.port_path, self.settings.baud_rate)
            })?;
        log::info!(target: "still_link", "opened {} @{}", self.settings.port_path, self.settings.baud_rate);
        self.port = Some(port);
        Ok(())
    }

    fn close(&mut self) {
        if self.port.take().is_some() {
            log::info!(target: "still_link", "closed {}", self.settings.port_path);
        }
    }

    fn read_available(&mut self) -> Result<Vec<u8>> {
        let port = self.port.as_mut().ok_or_else(|| anyhow!("Port not connected"))?;
        let waiting = match port.bytes_to_read() {
            Ok(n) => n as usize,
            Err(e) => {
                self.drop_port(&e);
                return Err(anyhow!("Read error: {}", e));
            }
        };
        let mut buffer = vec![0u8; waiting];
        let mut filled = 0;
        while filled < waiting {
            match port.read(&mut buffer[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::TimedOut => break,
                Err(e) => {
                    self.drop_port(&e);
                    return Err(anyhow!("Read error: {}", e));
                }
            }
        }
        buffer.truncate(filled);
        if filled > 0 {
            log::debug!(target: "still_link", "RECV: {:?}", String::from_utf8_lossy(&buffer));
        }
        Ok(buffer)
    }

    fn write_line(&mut self, line: &str) -> Result<()> {
        let port = self.port.as_mut().ok_or_else(|| anyhow!("Port not connected"))?;
        log::debug!(target: "still_link", "SEND: {:?}", line);
        // Stale output from before a request is never useful
        let _ = port.clear(ClearBuffer::Output);
        let result = port.write_all(line.as_bytes()).and_then(|_| port.flush());
        if let Err(e) = result {
            self.drop_port(&e);
            return Err(anyhow!("Write error: {}", e));
        }
        Ok(())
    }

    fn describe(&self) -> String {
        format!("{} @{}", self.settings.port_path, self.settings.baud_rate)
    }
}

/// In-memory link for tests
#[cfg(test)]
pub mod testing {
    use super::*;
    use std::collections::VecDeque;

    #[derive(Debug, Default)]
    pub struct ScriptedLink {
        pub open: bool,
        /// Chunks handed out by successive `read_available` calls
        pub inbound: VecDeque<Vec<u8>>,
        pub written: Vec<String>,
        pub opens: usize,
        pub fail_open: bool,
        pub fail_io: bool,
    }

    impl ScriptedLink {
        pub fn connected() -> Self {
            Self { open: true, ..Self::default() }
        }

        pub fn queue(&mut self, text: &str) {
            self.inbound.push_back(text.as_bytes().to_vec());
        }
    }

    impl StillLink for ScriptedLink {
        fn is_open(&self) -> bool {
            self.open
        }

        fn open(&mut self) -> Result<()> {
            self.opens += 1;
            if self.fail_open {
                self.open = false;
                return Err(anyhow!("no such device"));
            }
            self.open = true;
            Ok(())
        }

        fn close(&mut self) {
            self.open = false;
        }

        fn read_available(&mut self) -> Result<Vec<u8>> {
            if !self.open {
                return Err(anyhow!("Port not connected"));
            }
            if self.fail_io {
                self.open = false;
                return Err(anyhow!("Read error: broken pipe"));
            }
            Ok(self.inbound.pop_front().unwrap_or_default())
        }

        fn write_line(&mut self, line: &str) -> Result<()> {
            if !self.open {
                return Err(anyhow!("Port not connected"));
            }
            self.written.push(line.to_string());
            Ok(())
        }

        fn describe(&self) -> String {
            "scripted".to_string()
        }
    }
}
