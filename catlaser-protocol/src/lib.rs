//! Config-update protocol
//!
//! This crate defines the serial protocol between a host (phone bridge,
//! desktop tool) and the laser controller. The host can check liveness,
//! read the controller status, and push a new configuration snapshot.
//!
//! # Protocol Overview
//!
//! All messages use a simple binary frame format:
//! ```text
//! ┌───────┬────────┬──────┬─────────────┬──────────┐
//! │ START │ LENGTH │ TYPE │ PAYLOAD     │ CHECKSUM │
//! │ 1B    │ 1B     │ 1B   │ 0–250B      │ 1B       │
//! └───────┴────────┴──────┴─────────────┴──────────┘
//! ```
//!
//! The protocol carries configuration bytes opaquely. Decoding and
//! validating a snapshot is the controller's job.

#![no_std]
#![deny(unsafe_code)]

pub mod frame;
pub mod messages;

pub use frame::{Frame, FrameError, FrameParser, FRAME_START, MAX_FRAME_SIZE, MAX_PAYLOAD_SIZE};
pub use messages::{DeviceMessage, HostCommand, NackCode, StatusReport};
