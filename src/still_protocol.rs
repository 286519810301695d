/// Still firmware text protocol
///
/// Requests are `Get <Field>\n`. Responses are one line each, a tag and a
/// value separated by whitespace:
///
/// ```text
/// Temp: 78.5
/// High 190
/// Low 178
/// Burner On
/// Pump Off
/// ```

use anyhow::{anyhow, bail, Result};
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

/// Data fields the firmware answers for, in polling order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Temp,
    High,
    Low,
    Burner,
    Pump,
}

impl Field {
    pub const ALL: [Field; 5] = [Field::Temp, Field::High, Field::Low, Field::Burner, Field::Pump];

    pub fn name(&self) -> &'static str {
        match self {
            Field::Temp => "Temp",
            Field::High => "High",
            Field::Low => "Low",
            Field::Burner => "Burner",
            Field::Pump => "Pump",
        }
    }

    /// Request line for this field, newline included
    pub fn request(&self) -> String {
        format!("Get {}\n", self.name())
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Burner/pump state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Switch {
    On,
    Off,
}

impl FromStr for Switch {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "On" => Ok(Switch::On),
            "Off" => Ok(Switch::Off),
            other => Err(anyhow!("unknown switch state '{}'", other)),
        }
    }
}

impl fmt::Display for Switch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Switch::On => f.write_str("On"),
            Switch::Off => f.write_str("Off"),
        }
    }
}

/// One parsed response line
#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    /// Temperature as sent, kept as text for display
    Temp(String),
    High(i32),
    Low(i32),
    Burner(Switch),
    Pump(Switch),
}

impl Response {
    pub fn field(&self) -> Field {
        match self {
            Response::Temp(_) => Field::Temp,
            Response::High(_) => Field::High,
            Response::Low(_) => Field::Low,
            Response::Burner(_) => Field::Burner,
            Response::Pump(_) => Field::Pump,
        }
    }
}

/// Parse one response line. Blank lines give `Ok(None)`.
pub fn parse_line(line: &str) -> Result<Option<Response>> {
    let mut tokens = line.split_whitespace();
    let Some(tag) = tokens.next() else {
        return Ok(None);
    };
    let value = tokens
        .next()
        .ok_or_else(|| anyhow!("'{}' response has no value", tag))?;

    let response = match tag {
        "Temp:" => {
            value
                .parse::<f64>()
                .map_err(|e| anyhow!("bad temperature '{}': {}", value, e))?;
            Response::Temp(value.to_string())
        }
        "High" => Response::High(
            value.parse().map_err(|e| anyhow!("bad high bound '{}': {}", value, e))?,
        ),
        "Low" => Response::Low(
            value.parse().map_err(|e| anyhow!("bad low bound '{}': {}", value, e))?,
        ),
        "Burner" => Response::Burner(value.parse()?),
        "Pump" => Response::Pump(value.parse()?),
        other => bail!("unknown response tag '{}'", other),
    };
    Ok(Some(response))
}

/// Splits inbound bytes into complete lines, holding back a trailing partial
/// line until its newline arrives. Lines are decoded only once complete, so a
/// UTF-8 sequence split across reads survives.
#[derive(Debug, Default)]
pub struct LineBuffer {
    pending: Vec<u8>,
}

/// Longest partial line kept before it is discarded
const MAX_PENDING: usize = 1024;

impl LineBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `bytes` and return every line completed by them, trimmed.
    pub fn push(&mut self, bytes: &[u8]) -> Vec<String> {
        self.pending.extend_from_slice(bytes);
        let mut lines = Vec::new();
        while let Some(idx) = self.pending.iter().position(|&b| b == b'\n') {
            let raw: Vec<u8> = self.pending.drain(..=idx).collect();
            let line = String::from_utf8_lossy(&raw);
            let line = line.trim();
            if !line.is_empty() {
                lines.push(line.to_string());
            }
        }
        if self.pending.len() > MAX_PENDING {
            log::warn!(target: "still_protocol", "dropping {} bytes without newline", self.pending.len());
            self.pending.clear();
        }
        lines
    }

    /// Partial line held back so far, decoded lossily
    pub fn pending(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.pending)
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_lines() {
        assert_eq!(Field::Temp.request(), "Get Temp\n");
        assert_eq!(Field::Pump.request(), "Get Pump\n");
        let names: Vec<&str> = Field::ALL.iter().map(|f| f.name()).collect();
        assert_eq!(names, ["Temp", "High", "Low", "Burner", "Pump"]);
    }

    #[test]
    fn test_parse_each_tag() {
        assert_eq!(parse_line("Temp: 78.5").unwrap(), Some(Response::Temp("78.5".into())));
        assert_eq!(parse_line("High 190").unwrap(), Some(Response::High(190)));
        assert_eq!(parse_line("Low 178\r").unwrap(), Some(Response::Low(178)));
        assert_eq!(parse_line("Burner On").unwrap(), Some(Response::Burner(Switch::On)));
        assert_eq!(parse_line("Pump Off").unwrap(), Some(Response::Pump(Switch::Off)));
    }

    #[test]
    fn test_parse_blank_line() {
        assert_eq!(parse_line("   ").unwrap(), None);
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse_line("Temp:").is_err());
        assert!(parse_line("Temp: hot").is_err());
        assert!(parse_line("High abc").is_err());
        assert!(parse_line("Burner Maybe").is_err());
        assert!(parse_line("Valve Open").is_err());
        // the temperature tag carries its colon
        assert!(parse_line("Temp 80").is_err());
    }

    #[test]
    fn test_line_buffer_keeps_partial_line() {
        let mut buf = LineBuffer::new();
        assert!(buf.push(b"High 19").is_empty());
        assert_eq!(buf.pending(), "High 19");
        assert_eq!(buf.push(b"0\nLow 178\r\nPu"), vec!["High 190", "Low 178"]);
        assert_eq!(buf.pending(), "Pu");
        assert_eq!(buf.push(b"mp On\n\n"), vec!["Pump On"]);
        assert_eq!(buf.pending(), "");
    }

    #[test]
    fn test_line_buffer_joins_split_utf8() {
        let mut buf = LineBuffer::new();
        let text = "Temp: 78.5\u{00B0}\n".as_bytes();
        let split = text.len() - 2;
        assert!(buf.push(&text[..split]).is_empty());
        assert_eq!(buf.push(&text[split..]), vec!["Temp: 78.5\u{00B0}"]);
        assert_eq!(buf.pending(), "");
    }

    #[test]
    fn test_line_buffer_drops_runaway_input() {
        let mut buf = LineBuffer::new();
        buf.push(&[b'x'; MAX_PENDING + 1]);
        assert_eq!(buf.pending(), "");
    }
}
