//! Test utilities for option parsing.
//!
//! Provides a builder for constructing options regions byte by byte.

/// Builder for an options region.
#[derive(Debug, Clone, Default)]
pub struct OptionsBuilder {
    bytes: Vec<u8>,
}

impl OptionsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a code + length + payload option. The length byte is
    /// computed from the payload.
    pub fn option(mut self, code: u8, payload: &[u8]) -> Self {
        self.bytes.push(code);
        self.bytes.push((payload.len() + 2) as u8);
        self.bytes.extend_from_slice(payload);
        self
    }

    /// Append an option with an explicit (possibly wrong) length byte.
    pub fn option_with_len(mut self, code: u8, len: u8, payload: &[u8]) -> Self {
        self.bytes.push(code);
        self.bytes.push(len);
        self.bytes.extend_from_slice(payload);
        self
    }

    pub fn nop(mut self) -> Self {
        self.bytes.push(1);
        self
    }

    pub fn eol(mut self) -> Self {
        self.bytes.push(0);
        self
    }

    pub fn raw(mut self, bytes: &[u8]) -> Self {
        self.bytes.extend_from_slice(bytes);
        self
    }

    /// Pad with EOL bytes up to the next multiple of 4.
    pub fn pad_to_word(mut self) -> Self {
        while self.bytes.len() % 4 != 0 {
            self.bytes.push(0);
        }
        self
    }

    pub fn build(self) -> Vec<u8> {
        self.bytes
    }
}

/// Builder for a route option payload: pointer followed by address slots.
#[derive(Debug, Clone)]
pub struct RouteBuilder {
    pointer: u8,
    addresses: Vec<[u8; 4]>,
}

impl Default for RouteBuilder {
    fn default() -> Self {
        Self {
            pointer: 4,
            addresses: Vec::new(),
        }
    }
}

impl RouteBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pointer(mut self, pointer: u8) -> Self {
        self.pointer = pointer;
        self
    }

    pub fn address(mut self, address: [u8; 4]) -> Self {
        self.addresses.push(address);
        self
    }

    /// The option payload (everything after the length byte).
    pub fn payload(&self) -> Vec<u8> {
        let mut payload = Vec::with_capacity(1 + 4 * self.addresses.len());
        payload.push(self.pointer);
        for address in &self.addresses {
            payload.extend_from_slice(address);
        }
        payload
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_builder() {
        let bytes = OptionsBuilder::new()
            .option(2, &[0x05, 0xb4])
            .nop()
            .eol()
            .pad_to_word()
            .build();

        assert_eq!(bytes, vec![0x02, 0x04, 0x05, 0xb4, 0x01, 0x00, 0x00, 0x00]);
    }

    #[test]
    fn test_route_builder() {
        let payload = RouteBuilder::new()
            .pointer(8)
            .address([10, 0, 0, 1])
            .address([10, 0, 0, 2])
            .payload();

        assert_eq!(payload, vec![8, 10, 0, 0, 1, 10, 0, 0, 2]);
    }
}
