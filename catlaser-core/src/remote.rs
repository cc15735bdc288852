//! Host command handling
//!
//! Applies [`HostCommand`]s from the config-update protocol to a
//! [`Controller`] and builds the reply. A pushed snapshot is decoded,
//! validated and staged; it takes effect on the next tick.

use catlaser_protocol::messages::MSG_SET_CONFIG;
use catlaser_protocol::{DeviceMessage, Frame, HostCommand, NackCode, StatusReport};
use rand::RngCore;

use crate::config::snapshot::{self, SnapshotError};
use crate::controller::{Controller, ControllerStatus};

impl From<&ControllerStatus> for StatusReport {
    fn from(status: &ControllerStatus) -> Self {
        StatusReport {
            session: status.session.to_byte(),
            // 0xFF before the first tick
            decision: status.decision.map_or(0xFF, |kind| kind.to_byte()),
            pan: status.target.pan,
            tilt: status.target.tilt,
            laser_on: status.laser_on,
        }
    }
}

/// Apply one command and return the reply
pub fn handle_command<R: RngCore>(
    controller: &mut Controller<R>,
    command: &HostCommand<'_>,
) -> DeviceMessage {
    match command {
        HostCommand::Ping => DeviceMessage::Pong,
        HostCommand::GetStatus => DeviceMessage::Status(StatusReport::from(&controller.status())),
        HostCommand::SetConfig(bytes) => match snapshot::decode(bytes) {
            Ok(config) => match controller.submit_config(config) {
                Ok(()) => DeviceMessage::Ack,
                Err(_) => DeviceMessage::Nack(NackCode::InvalidConfig),
            },
            Err(e) => {
                #[cfg(feature = "defmt")]
                defmt::warn!("Rejected config snapshot: {}", e);
                DeviceMessage::Nack(nack_for(e))
            }
        },
    }
}

/// Parse a frame and apply it
///
/// Frames that do not parse as a command are answered with a NACK.
pub fn handle_frame<R: RngCore>(controller: &mut Controller<R>, frame: &Frame) -> DeviceMessage {
    match HostCommand::from_frame(frame) {
        Ok(command) => handle_command(controller, &command),
        Err(_) if frame.msg_type == MSG_SET_CONFIG => DeviceMessage::Nack(NackCode::BadSnapshot),
        Err(_) => DeviceMessage::Nack(NackCode::UnknownCommand),
    }
}

fn nack_for(error: SnapshotError) -> NackCode {
    match error {
        SnapshotError::Invalid(_) => NackCode::InvalidConfig,
        _ => NackCode::BadSnapshot,
    }
}
