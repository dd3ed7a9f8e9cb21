//! # phoneodeo-dir
//!
//! Descriptor model and bind/registration protocol for a stub S/PDIF
//! receiver. The component moves no samples; it advertises a fixed capture
//! capability and a tiny routing fragment so the host audio framework can
//! power, route and read from the controller behind it.
//!
//! The pieces, leaves first:
//!
//! - [`CapabilityDescriptor`] - rates, formats and channel range of a stream
//! - [`StreamDescriptor`] - one named, directional DAI stream
//! - [`RoutingGraph`] - widgets and routes, validated against the streams
//! - [`ComponentDescriptor`] - the unit registered with the host
//! - [`BindingController`] - binds matching [`PlatformDevice`]s and scopes
//!   each registration to the device's lifetime
//!
//! ```
//! use std::sync::Arc;
//! use phoneodeo_dir::{BindingController, ComponentRegistry, PhoneodeoDir, PlatformDevice, SampleFormat};
//!
//! let host = Arc::new(ComponentRegistry::new());
//! let mut controller = BindingController::new(PhoneodeoDir, host.clone());
//!
//! let dev = PlatformDevice::new("spdif-in.0").with_compatible(PhoneodeoDir::COMPATIBLE);
//! controller.device_added(&dev)?;
//!
//! let component = host.lookup(dev.id()).expect("registered");
//! let capture = component.stream("Capture").expect("capture stream");
//! assert!(capture.capability().accepts(48000, SampleFormat::S24_LE, 2));
//! # Ok::<(), phoneodeo_dir::Error>(())
//! ```

mod binding;
mod component;
mod device;
mod driver;
mod error;
mod host;
pub mod pcm;
mod routing;
mod stream;

pub use binding::{BindState, BindingController};
pub use component::{BiasPolicy, ComponentBuilder, ComponentDescriptor};
pub use device::{DeviceId, PlatformDevice};
pub use driver::{PhoneodeoDir, PlatformDriver};
pub use error::{CapabilityError, Error, Result};
pub use host::{ComponentHost, ComponentRegistry, Registration};
pub use pcm::{
    CapabilityDescriptor, FormatSet, RateSet, SampleEndianness, SampleFormat, SampleRate,
};
pub use routing::{Route, RoutingGraph, Widget, WidgetKind};
pub use stream::{StreamDescriptor, StreamDirection};
