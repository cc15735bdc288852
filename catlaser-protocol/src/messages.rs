//! Message types for the config-update protocol
//!
//! Message types are divided into two categories:
//! - Host → Device: liveness, status query, config push
//! - Device → Host: replies

use crate::frame::{Frame, FrameError};

// Message type IDs: Host → Device
pub const MSG_PING: u8 = 0x02;
pub const MSG_GET_STATUS: u8 = 0x04;
pub const MSG_SET_CONFIG: u8 = 0x05;

// Message type IDs: Device → Host
pub const MSG_PONG: u8 = 0x24;
pub const MSG_STATUS: u8 = 0x25;
pub const MSG_ACK: u8 = 0x26;
pub const MSG_NACK: u8 = 0x27;

/// STATUS payload length
pub const STATUS_PAYLOAD_LEN: usize = 7;

/// Commands sent by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HostCommand<'a> {
    /// Liveness check
    Ping,
    /// Request a STATUS reply
    GetStatus,
    /// Replace the configuration with an encoded snapshot
    SetConfig(&'a [u8]),
}

impl<'a> HostCommand<'a> {
    /// Parse a command from a frame
    pub fn from_frame(frame: &'a Frame) -> Result<Self, FrameError> {
        match frame.msg_type {
            MSG_PING => Ok(HostCommand::Ping),
            MSG_GET_STATUS => Ok(HostCommand::GetStatus),
            MSG_SET_CONFIG => {
                if frame.payload.is_empty() {
                    return Err(FrameError::InvalidFrame);
                }
                Ok(HostCommand::SetConfig(&frame.payload))
            }
            _ => Err(FrameError::InvalidFrame),
        }
    }

    /// Encode this command into a frame
    pub fn to_frame(&self) -> Result<Frame, FrameError> {
        match self {
            HostCommand::Ping => Ok(Frame::empty(MSG_PING)),
            HostCommand::GetStatus => Ok(Frame::empty(MSG_GET_STATUS)),
            HostCommand::SetConfig(snapshot) => Frame::new(MSG_SET_CONFIG, snapshot),
        }
    }
}

/// Reasons a command is refused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum NackCode {
    /// Frame type is not a known command
    UnknownCommand,
    /// Snapshot header, checksum or body could not be decoded
    BadSnapshot,
    /// Snapshot decoded but the config is rejected
    InvalidConfig,
}

impl NackCode {
    pub const fn to_byte(self) -> u8 {
        match self {
            NackCode::UnknownCommand => 0x01,
            NackCode::BadSnapshot => 0x02,
            NackCode::InvalidConfig => 0x03,
        }
    }

    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0x01 => Some(NackCode::UnknownCommand),
            0x02 => Some(NackCode::BadSnapshot),
            0x03 => Some(NackCode::InvalidConfig),
            _ => None,
        }
    }
}

/// Controller status as carried on the wire
///
/// Session and decision are raw codes; their meaning belongs to the
/// controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StatusReport {
    /// Session state code
    pub session: u8,
    /// Last decision code
    pub decision: u8,
    /// Last commanded pan (degrees)
    pub pan: i16,
    /// Last commanded tilt (degrees)
    pub tilt: i16,
    /// Laser output state
    pub laser_on: bool,
}

impl StatusReport {
    /// Payload: [session][decision][pan LE][tilt LE][laser]
    pub fn to_bytes(&self) -> [u8; STATUS_PAYLOAD_LEN] {
        let pan = self.pan.to_le_bytes();
        let tilt = self.tilt.to_le_bytes();
        [
            self.session,
            self.decision,
            pan[0],
            pan[1],
            tilt[0],
            tilt[1],
            self.laser_on as u8,
        ]
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, FrameError> {
        if bytes.len() != STATUS_PAYLOAD_LEN {
            return Err(FrameError::InvalidFrame);
        }
        Ok(Self {
            session: bytes[0],
            decision: bytes[1],
            pan: i16::from_le_bytes([bytes[2], bytes[3]]),
            tilt: i16::from_le_bytes([bytes[4], bytes[5]]),
            laser_on: bytes[6] != 0,
        })
    }
}

/// Replies from the device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DeviceMessage {
    /// Heartbeat response
    Pong,
    /// Current status
    Status(StatusReport),
    /// Command accepted
    Ack,
    /// Command refused
    Nack(NackCode),
}

impl DeviceMessage {
    /// Encode this message into a frame
    pub fn to_frame(&self) -> Result<Frame, FrameError> {
        match self {
            DeviceMessage::Pong => Ok(Frame::empty(MSG_PONG)),
            DeviceMessage::Status(report) => Frame::new(MSG_STATUS, &report.to_bytes()),
            DeviceMessage::Ack => Ok(Frame::empty(MSG_ACK)),
            DeviceMessage::Nack(code) => Frame::new(MSG_NACK, &[code.to_byte()]),
        }
    }

    /// Parse a reply (host side)
    pub fn from_frame(frame: &Frame) -> Result<Self, FrameError> {
        match frame.msg_type {
            MSG_PONG => Ok(DeviceMessage::Pong),
            MSG_STATUS => Ok(DeviceMessage::Status(StatusReport::from_bytes(
                &frame.payload,
            )?)),
            MSG_ACK => Ok(DeviceMessage::Ack),
            MSG_NACK => {
                let code = frame
                    .payload
                    .first()
                    .and_then(|b| NackCode::from_byte(*b))
                    .ok_or(FrameError::InvalidFrame)?;
                Ok(DeviceMessage::Nack(code))
            }
            _ => Err(FrameError::InvalidFrame),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_command_ping() {
        let frame = Frame::empty(MSG_PING);
        assert_eq!(HostCommand::from_frame(&frame).unwrap(), HostCommand::Ping);
    }

    #[test]
    fn test_set_config_borrows_payload() {
        let frame = Frame::new(MSG_SET_CONFIG, b"CLCF\x01").unwrap();
        match HostCommand::from_frame(&frame).unwrap() {
            HostCommand::SetConfig(bytes) => assert_eq!(bytes, b"CLCF\x01"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_set_config_requires_payload() {
        let frame = Frame::empty(MSG_SET_CONFIG);
        assert_eq!(
            HostCommand::from_frame(&frame),
            Err(FrameError::InvalidFrame)
        );
    }

    #[test]
    fn test_unknown_type_rejected() {
        let frame = Frame::empty(0x7F);
        assert_eq!(
            HostCommand::from_frame(&frame),
            Err(FrameError::InvalidFrame)
        );
    }

    #[test]
    fn test_status_layout() {
        let report = StatusReport {
            session: 1,
            decision: 0,
            pan: -2,
            tilt: 300,
            laser_on: true,
        };
        let frame = DeviceMessage::Status(report).to_frame().unwrap();
        assert_eq!(frame.msg_type, MSG_STATUS);
        assert_eq!(&frame.payload[..], &[1, 0, 0xFE, 0xFF, 0x2C, 0x01, 1]);
        assert_eq!(
            DeviceMessage::from_frame(&frame).unwrap(),
            DeviceMessage::Status(report)
        );
    }

    #[test]
    fn test_nack_code() {
        let frame = DeviceMessage::Nack(NackCode::InvalidConfig)
            .to_frame()
            .unwrap();
        assert_eq!(&frame.payload[..], &[0x03]);

        let bad = Frame::new(MSG_NACK, &[0x99]).unwrap();
        assert_eq!(DeviceMessage::from_frame(&bad), Err(FrameError::InvalidFrame));
    }
}
