//! Event handling module.
//!
//! This module contains the network event handler that performs the service
//! calls requested by a screen and feeds the outcomes back into it.

pub mod network;
