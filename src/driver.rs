//! Platform drivers and the phoneodeo receiver itself.
//!
//! A [`PlatformDriver`] says which devices it wants and how to describe them.
//! It does not register anything; [`BindingController`](crate::BindingController)
//! owns that step so the release is tied to the device's lifetime.

use crate::component::ComponentDescriptor;
use crate::device::PlatformDevice;
use crate::error::Result;
use crate::pcm::{CapabilityDescriptor, FormatSet, RateSet, SampleEndianness, SampleFormat, SampleRate};
use crate::routing::{Route, Widget};
use crate::stream::StreamDescriptor;

/// A driver the platform bus can bind devices to.
pub trait PlatformDriver {
    /// Driver name as shown by the bus.
    fn name(&self) -> &str;

    /// Devicetree compatible strings this driver accepts.
    fn of_match_table(&self) -> &[&str];

    /// Whether `device` should be handed to [`probe`](Self::probe).
    fn matches(&self, device: &PlatformDevice) -> bool {
        self.of_match_table().iter().any(|c| device.is_compatible(c))
    }

    /// Builds the component to register for a matched device.
    fn probe(&self, device: &PlatformDevice) -> Result<ComponentDescriptor>;
}

/// Stub S/PDIF receiver: one capture stream, no hardware behind it.
///
/// Controllers that can run in receiver mode without a codec bind against
/// this to get a DAI and a graph input to route from.
#[derive(Clone, Copy, Debug, Default)]
pub struct PhoneodeoDir;

impl PhoneodeoDir {
    pub const COMPATIBLE: &'static str = "linux,phoneodeo-dir";
    pub const OF_MATCH: &'static [&'static str] = &[Self::COMPATIBLE];
    pub const DRIVER_NAME: &'static str = "phoneodeo-dir";
    pub const DAI_NAME: &'static str = "phoneodeo";
    pub const STREAM_NAME: &'static str = "Capture";
    pub const INPUT_WIDGET: &'static str = "phoneodeo";

    pub const RATES: &'static [SampleRate] = &[SampleRate::R48000];
    pub const FORMATS: &'static [SampleFormat] = &[
        SampleFormat::S16_LE,
        SampleFormat::S24_LE,
        SampleFormat::S32_LE,
        SampleFormat::IEC958_SUBFRAME_LE,
    ];
    pub const CHANNELS_MIN: u32 = 1;
    pub const CHANNELS_MAX: u32 = 2;

    pub fn new() -> Self {
        Self
    }

    /// The capture capability every bound device advertises.
    pub fn capability() -> Result<CapabilityDescriptor> {
        let caps = CapabilityDescriptor::new(
            Self::RATES.iter().copied().collect::<RateSet>(),
            Self::FORMATS.iter().copied().collect::<FormatSet>(),
            Self::CHANNELS_MIN,
            Self::CHANNELS_MAX,
        )?;
        Ok(caps)
    }

    /// The full component, named after the device it describes.
    pub fn component(device: &PlatformDevice) -> Result<ComponentDescriptor> {
        let capture = StreamDescriptor::capture(Self::DAI_NAME, Self::STREAM_NAME, Self::capability()?);

        ComponentDescriptor::builder(device.id().as_str())
            .stream(capture)
            .widget(Widget::input(Self::INPUT_WIDGET))
            .route(Route::always(Self::STREAM_NAME, Self::INPUT_WIDGET))
            .idle_bias_on(true)
            .use_pmdown_time(true)
            .endianness(SampleEndianness::Little)
            .build()
    }
}

impl PlatformDriver for PhoneodeoDir {
    fn name(&self) -> &str {
        Self::DRIVER_NAME
    }

    fn of_match_table(&self) -> &[&str] {
        Self::OF_MATCH
    }

    fn probe(&self, device: &PlatformDevice) -> Result<ComponentDescriptor> {
        Self::component(device)
    }
}
