//! Mock modem transport for testing and development

use crate::modem::{
    CaptureMode, ModemError, ModemResult, ModemStatus, ModemTransport, SoundingCapture,
};
use std::collections::{HashMap, VecDeque};

/// Scripted outcome for one sounding exchange
#[derive(Debug, Clone)]
enum ScriptedSounding {
    Capture(SoundingCapture),
    NoResponse,
}

/// Mock transport with per-address scripted outcomes
///
/// Each queued outcome is consumed by one sounding exchange; an address with
/// an empty queue behaves like a silent remote.
pub struct MockModem {
    address: u8,
    soundings: HashMap<u8, VecDeque<ScriptedSounding>>,
    ping_times: HashMap<u8, f64>,
    requests: Vec<(u8, CaptureMode)>,
    sent_payloads: Vec<(u8, Vec<u8>)>,
}

impl MockModem {
    /// Create a mock modem with the given local address
    pub fn new(address: u8) -> Self {
        Self {
            address,
            soundings: HashMap::new(),
            ping_times: HashMap::new(),
            requests: Vec::new(),
            sent_payloads: Vec::new(),
        }
    }

    /// Queue a successful capture for an address
    pub fn queue_capture(&mut self, address: u8, capture: SoundingCapture) {
        self.soundings
            .entry(address)
            .or_default()
            .push_back(ScriptedSounding::Capture(capture));
    }

    /// Queue a no-response outcome for an address
    pub fn queue_no_response(&mut self, address: u8) {
        self.soundings
            .entry(address)
            .or_default()
            .push_back(ScriptedSounding::NoResponse);
    }

    /// Script a ping/ack time of arrival for an address
    pub fn set_ping_time(&mut self, address: u8, time_of_arrival_s: f64) {
        self.ping_times.insert(address, time_of_arrival_s);
    }

    /// Every sounding request issued so far, in order
    pub fn sounding_requests(&self) -> &[(u8, CaptureMode)] {
        &self.requests
    }

    /// Every unicast payload sent so far, in order
    pub fn sent_payloads(&self) -> &[(u8, Vec<u8>)] {
        &self.sent_payloads
    }
}

impl ModemTransport for MockModem {
    fn query_status(&mut self) -> ModemResult<ModemStatus> {
        Ok(ModemStatus {
            address: self.address,
            battery_volts: 6.4,
            firmware_version: "mock".to_string(),
            build_date: "mock".to_string(),
        })
    }

    fn set_address(&mut self, new_address: u8) -> ModemResult<u8> {
        self.address = new_address;
        Ok(new_address)
    }

    fn query_sounding(&mut self, address: u8, mode: CaptureMode) -> ModemResult<SoundingCapture> {
        self.requests.push((address, mode));
        match self
            .soundings
            .get_mut(&address)
            .and_then(|queue| queue.pop_front())
        {
            Some(ScriptedSounding::Capture(capture)) => Ok(capture),
            Some(ScriptedSounding::NoResponse) | None => {
                Err(ModemError::NoResponse { address })
            }
        }
    }

    fn send_unicast_with_ack(&mut self, address: u8, payload: &[u8]) -> ModemResult<f64> {
        self.sent_payloads.push((address, payload.to_vec()));
        self.ping_times
            .get(&address)
            .copied()
            .ok_or(ModemError::NoResponse { address })
    }

    fn send_ping(&mut self, address: u8) -> ModemResult<f64> {
        self.ping_times
            .get(&address)
            .copied()
            .ok_or(ModemError::NoResponse { address })
    }
}
