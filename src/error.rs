//! Error types.
//!
//! Every failure here is raised while constructing descriptors or while
//! registering them with the host. Nothing is retried internally: the error
//! goes straight back to whoever delivered the bus event.

/// Why a [`CapabilityDescriptor`](crate::CapabilityDescriptor) was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CapabilityError {
    /// No sample rate was advertised.
    #[error("rate set is empty")]
    EmptyRates,

    /// No sample format was advertised.
    #[error("format set is empty")]
    EmptyFormats,

    /// A stream must carry at least one channel.
    #[error("channels_min must be at least 1")]
    ZeroChannels,

    /// `channels_min` is larger than `channels_max`.
    #[error("channel range is inverted ({min} > {max})")]
    InvertedChannels {
        /// Declared minimum.
        min: u32,
        /// Declared maximum.
        max: u32,
    },

    /// A raw mask carried bits that name no known rate or format.
    #[error("mask {mask:#x} contains unknown bits {unknown:#x}")]
    UnknownMaskBits {
        /// The mask as received.
        mask: u64,
        /// The bits that could not be mapped.
        unknown: u64,
    },
}

/// Errors raised by descriptor construction and registration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A capability descriptor violated its invariants.
    #[error("invalid capability: {0}")]
    InvalidCapability(#[from] CapabilityError),

    /// A route names a widget or stream terminal the component never declared.
    #[error("route {route} references undeclared endpoint '{endpoint}'")]
    InvalidRoute {
        /// The offending route, rendered as `sink <- source`.
        route: String,
        /// The name that did not resolve.
        endpoint: String,
    },

    /// Two widgets, streams or terminals share a name.
    #[error("endpoint '{name}' declared more than once")]
    DuplicateEndpoint {
        /// The repeated name.
        name: String,
    },

    /// The host framework refused the component.
    #[error("registration failed for device {device}: {reason}")]
    RegistrationFailure {
        /// Device whose registration was refused.
        device: String,
        /// Host-supplied explanation.
        reason: String,
    },
}

impl Error {
    /// Creates a registration failure for the given device.
    pub fn registration_failure(device: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::RegistrationFailure {
            device: device.into(),
            reason: reason.into(),
        }
    }
}

/// Crate-wide result alias.
pub type Result<T, E = Error> = core::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capability_error_converts() {
        let err: Error = CapabilityError::EmptyRates.into();
        assert_eq!(err, Error::InvalidCapability(CapabilityError::EmptyRates));
        assert_eq!(err.to_string(), "invalid capability: rate set is empty");
    }

    #[test]
    fn inverted_channels_display() {
        let err = CapabilityError::InvertedChannels { min: 4, max: 2 };
        assert_eq!(err.to_string(), "channel range is inverted (4 > 2)");
    }

    #[test]
    fn registration_failure_display() {
        let err = Error::registration_failure("spdif-in.0", "no free component slots");
        assert_eq!(
            err.to_string(),
            "registration failed for device spdif-in.0: no free component slots"
        );
    }
}
