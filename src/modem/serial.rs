//! Serial transport for NM3-class acoustic modems
//!
//! Commands are `$`-prefixed ASCII frames written to the serial line; the
//! modem answers with `#`-prefixed CR/LF-terminated frames. Remote exchanges
//! additionally wait out the acoustic round trip before the timed response
//! frame arrives.

use crate::modem::{
    CaptureMode, ModemError, ModemResult, ModemStatus, ModemTransport, SoundingCapture,
};
use serialport::SerialPort;
use std::io::{Read, Write};
use std::time::{Duration, Instant};

/// Per-read timeout on the serial line
const READ_TIMEOUT: Duration = Duration::from_millis(100);
/// Response window for commands answered by the local modem alone
const LOCAL_RESPONSE_WINDOW: Duration = Duration::from_millis(500);
/// Response window for commands that cross the acoustic channel
const REMOTE_RESPONSE_WINDOW: Duration = Duration::from_millis(4500);

/// Arrival timestamps are reported by the firmware in 31.25 us counter ticks
const TOA_TICK_SECONDS: f64 = 31.25e-6;
/// Battery ADC scale: volts = counts * 15 / 65536
const BATTERY_ADC_SCALE: f64 = 15.0 / 65536.0;

/// Serial-line implementation of [`ModemTransport`]
pub struct Nm3SerialModem {
    port: Box<dyn SerialPort>,
}

impl Nm3SerialModem {
    /// Open the serial line (8 data bits, no parity, one stop bit)
    pub fn open(port_name: &str, baud_rate: u32) -> ModemResult<Self> {
        let port = serialport::new(port_name, baud_rate)
            .timeout(READ_TIMEOUT)
            .data_bits(serialport::DataBits::Eight)
            .stop_bits(serialport::StopBits::One)
            .parity(serialport::Parity::None)
            .open()
            .map_err(|e| ModemError::Io {
                message: format!("failed to open {}: {}", port_name, e),
            })?;
        Ok(Self { port })
    }

    fn send_command(&mut self, command: &[u8]) -> ModemResult<()> {
        self.port.write_all(command).map_err(|e| ModemError::Io {
            message: format!("write failed: {}", e),
        })?;
        self.port.flush().map_err(|e| ModemError::Io {
            message: format!("flush failed: {}", e),
        })
    }

    /// Read one CR/LF-terminated frame, accumulating across per-read timeouts
    /// until `deadline`
    fn read_frame(&mut self, deadline: Instant, window: Duration) -> ModemResult<String> {
        let mut frame = Vec::new();
        let mut byte = [0u8; 1];
        loop {
            if Instant::now() >= deadline {
                return Err(ModemError::Timeout {
                    waited_ms: window.as_millis() as u64,
                });
            }
            match self.port.read(&mut byte) {
                Ok(0) => continue,
                Ok(_) => match byte[0] {
                    b'\n' => break,
                    b'\r' => {}
                    other => frame.push(other),
                },
                Err(e) if e.kind() == std::io::ErrorKind::TimedOut => continue,
                Err(e) => {
                    return Err(ModemError::Io {
                        message: format!("read failed: {}", e),
                    })
                }
            }
        }
        String::from_utf8(frame).map_err(|_| ModemError::InvalidResponse {
            details: "non-ASCII bytes in response frame".to_string(),
        })
    }

    /// Read exactly `buf.len()` payload bytes before `deadline`
    fn read_payload(&mut self, buf: &mut [u8], deadline: Instant) -> ModemResult<()> {
        let mut filled = 0;
        while filled < buf.len() {
            if Instant::now() >= deadline {
                return Err(ModemError::LengthMismatch {
                    declared: buf.len(),
                    received: filled,
                });
            }
            match self.port.read(&mut buf[filled..]) {
                Ok(0) => continue,
                Ok(n) => filled += n,
                Err(e) if e.kind() == std::io::ErrorKind::TimedOut => continue,
                Err(e) => {
                    return Err(ModemError::Io {
                        message: format!("read failed: {}", e),
                    })
                }
            }
        }
        Ok(())
    }

    /// Consume the local command echo, then return the next response frame
    fn read_response(&mut self, deadline: Instant, window: Duration) -> ModemResult<String> {
        loop {
            let frame = self.read_frame(deadline, window)?;
            if frame.is_empty() || frame.starts_with('$') {
                continue;
            }
            return Ok(frame);
        }
    }

    /// Wait for a remote's timed arrival frame, mapping a window expiry to
    /// the no-response sentinel for that address
    fn read_arrival(&mut self, address: u8, deadline: Instant) -> ModemResult<f64> {
        let frame = self
            .read_response(deadline, REMOTE_RESPONSE_WINDOW)
            .map_err(|e| remap_window_expiry(e, address))?;
        let (resp_address, ticks) = parse_arrival_frame(&frame)?;
        check_responder(address, resp_address)?;
        Ok(ticks as f64 * TOA_TICK_SECONDS)
    }
}

impl ModemTransport for Nm3SerialModem {
    fn query_status(&mut self) -> ModemResult<ModemStatus> {
        self.send_command(b"$?")?;
        let deadline = Instant::now() + LOCAL_RESPONSE_WINDOW;
        let frame = self.read_response(deadline, LOCAL_RESPONSE_WINDOW)?;
        parse_status_frame(&frame)
    }

    fn set_address(&mut self, new_address: u8) -> ModemResult<u8> {
        self.send_command(format!("$A{:03}", new_address).as_bytes())?;
        let deadline = Instant::now() + LOCAL_RESPONSE_WINDOW;
        let frame = self.read_response(deadline, LOCAL_RESPONSE_WINDOW)?;
        let rest = expect_prefix(&frame, "#A")?;
        let (address, _) = parse_digits(rest, 3)?;
        Ok(address as u8)
    }

    fn query_sounding(&mut self, address: u8, mode: CaptureMode) -> ModemResult<SoundingCapture> {
        self.send_command(format!("$C{:03}{}", address, mode.command_code()).as_bytes())?;
        let deadline = Instant::now() + REMOTE_RESPONSE_WINDOW;
        let frame = self
            .read_response(deadline, REMOTE_RESPONSE_WINDOW)
            .map_err(|e| remap_window_expiry(e, address))?;
        let (resp_address, ticks, declared_count) = parse_sounding_header(&frame)?;
        check_responder(address, resp_address)?;
        let mut raw = vec![0u8; declared_count];
        self.read_payload(&mut raw, deadline)?;
        SoundingCapture::from_raw(ticks as f64 * TOA_TICK_SECONDS, declared_count, mode, raw)
    }

    fn send_unicast_with_ack(&mut self, address: u8, payload: &[u8]) -> ModemResult<f64> {
        let mut command = format!("$M{:03}{:02}", address, payload.len()).into_bytes();
        command.extend_from_slice(payload);
        self.send_command(&command)?;
        self.read_arrival(address, Instant::now() + REMOTE_RESPONSE_WINDOW)
    }

    fn send_ping(&mut self, address: u8) -> ModemResult<f64> {
        self.send_command(format!("$P{:03}", address).as_bytes())?;
        self.read_arrival(address, Instant::now() + REMOTE_RESPONSE_WINDOW)
    }
}

/// A window expiry on a remote exchange means the addressed modem never answered
fn remap_window_expiry(error: ModemError, address: u8) -> ModemError {
    match error {
        ModemError::Timeout { .. } => ModemError::NoResponse { address },
        other => other,
    }
}

fn check_responder(requested: u8, answered: u8) -> ModemResult<()> {
    if requested != answered {
        return Err(ModemError::InvalidResponse {
            details: format!(
                "response from modem id={:03}, expected id={:03}",
                answered, requested
            ),
        });
    }
    Ok(())
}

fn expect_prefix<'a>(frame: &'a str, prefix: &str) -> ModemResult<&'a str> {
    frame
        .strip_prefix(prefix)
        .ok_or_else(|| ModemError::InvalidResponse {
            details: format!("expected frame starting with {:?}, got {:?}", prefix, frame),
        })
}

/// Parse a fixed-width decimal field, returning the value and the remainder
fn parse_digits(s: &str, width: usize) -> ModemResult<(u32, &str)> {
    if s.len() < width || !s.is_char_boundary(width) {
        return Err(ModemError::InvalidResponse {
            details: format!("truncated numeric field in {:?}", s),
        });
    }
    let (field, rest) = s.split_at(width);
    let value = field
        .parse::<u32>()
        .map_err(|_| ModemError::InvalidResponse {
            details: format!("non-numeric field {:?}", field),
        })?;
    Ok((value, rest))
}

/// Status frame: `#A<addr:3>V<adc:5>R<version>B<build-date>`
fn parse_status_frame(frame: &str) -> ModemResult<ModemStatus> {
    let rest = expect_prefix(frame, "#A")?;
    let (address, rest) = parse_digits(rest, 3)?;
    let rest = expect_prefix(rest, "V")?;
    let (adc, rest) = parse_digits(rest, 5)?;
    let rest = expect_prefix(rest, "R")?;
    let (version, build_date) = match rest.split_once('B') {
        Some((version, build)) => (version.to_string(), build.to_string()),
        None => (rest.to_string(), String::new()),
    };
    Ok(ModemStatus {
        address: address as u8,
        battery_volts: adc as f64 * BATTERY_ADC_SCALE,
        firmware_version: version,
        build_date,
    })
}

/// Arrival frame: `#R<addr:3>T<ticks:5>`
fn parse_arrival_frame(frame: &str) -> ModemResult<(u8, u32)> {
    let rest = expect_prefix(frame, "#R")?;
    let (address, rest) = parse_digits(rest, 3)?;
    let rest = expect_prefix(rest, "T")?;
    let (ticks, _) = parse_digits(rest, 5)?;
    Ok((address as u8, ticks))
}

/// Sounding header: `#C<addr:3>T<ticks:5>L<count:4>`, followed by `count` raw bytes
fn parse_sounding_header(frame: &str) -> ModemResult<(u8, u32, usize)> {
    let rest = expect_prefix(frame, "#C")?;
    let (address, rest) = parse_digits(rest, 3)?;
    let rest = expect_prefix(rest, "T")?;
    let (ticks, rest) = parse_digits(rest, 5)?;
    let rest = expect_prefix(rest, "L")?;
    let (count, _) = parse_digits(rest, 4)?;
    Ok((address as u8, ticks, count as usize))
}
