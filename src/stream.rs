//! Named, directional streams of a digital audio interface.

use core::fmt;

use delegate::delegate;

use crate::pcm::{CapabilityDescriptor, FormatSet, RateSet};

/// Which way samples flow relative to the host.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum StreamDirection {
    /// Host reads samples from the component.
    Capture,
    /// Host writes samples to the component.
    Playback,
}

impl fmt::Display for StreamDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Capture => f.write_str("capture"),
            Self::Playback => f.write_str("playback"),
        }
    }
}

/// One stream of a DAI.
///
/// The stream name doubles as the terminal the routing graph wires widgets
/// into, so it must be unique within a component.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct StreamDescriptor {
    dai: String,
    name: String,
    direction: StreamDirection,
    capability: CapabilityDescriptor,
}

impl StreamDescriptor {
    pub fn new(
        dai: impl Into<String>,
        name: impl Into<String>,
        direction: StreamDirection,
        capability: CapabilityDescriptor,
    ) -> Self {
        Self {
            dai: dai.into(),
            name: name.into(),
            direction,
            capability,
        }
    }

    /// Shorthand for a capture stream.
    pub fn capture(
        dai: impl Into<String>,
        name: impl Into<String>,
        capability: CapabilityDescriptor,
    ) -> Self {
        Self::new(dai, name, StreamDirection::Capture, capability)
    }

    /// Name of the DAI this stream belongs to.
    pub fn dai(&self) -> &str {
        &self.dai
    }

    /// Stream name, used for route wiring and host-side negotiation.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn direction(&self) -> StreamDirection {
        self.direction
    }

    pub fn capability(&self) -> &CapabilityDescriptor {
        &self.capability
    }

    delegate! {
        to self.capability {
            pub fn rates(&self) -> &RateSet;
            pub fn formats(&self) -> &FormatSet;
            pub fn channels_min(&self) -> u32;
            pub fn channels_max(&self) -> u32;
        }
    }
}

impl fmt::Display for StreamDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{} ({}, {}-{}ch, {}, {})",
            self.dai,
            self.name,
            self.direction,
            self.channels_min(),
            self.channels_max(),
            self.rates(),
            self.formats()
        )
    }
}
