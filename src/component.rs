//! Component descriptor - the unit handed to the host framework.
//!
//! A component bundles its DAI streams, the routing fragment that wires them
//! into the host graph, and a couple of power-policy hints. Once built it is
//! read-only.
//!
//! # Example
//!
//! ```
//! use phoneodeo_dir::{
//!     CapabilityDescriptor, ComponentDescriptor, FormatSet, RateSet, Route, SampleFormat,
//!     SampleRate, StreamDescriptor, Widget,
//! };
//!
//! let caps = CapabilityDescriptor::new(
//!     RateSet::empty().with(SampleRate::R48000),
//!     FormatSet::empty().with(SampleFormat::S16_LE),
//!     1,
//!     2,
//! )
//! .unwrap();
//!
//! let component = ComponentDescriptor::builder("spdif-rx")
//!     .stream(StreamDescriptor::capture("spdif", "Capture", caps))
//!     .widget(Widget::input("spdif-in"))
//!     .route(Route::always("Capture", "spdif-in"))
//!     .idle_bias_on(true)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(component.routing().feeds("Capture"), vec!["spdif-in"]);
//! ```

use crate::error::Result;
use crate::pcm::SampleEndianness;
use crate::routing::{Route, RoutingGraph, Widget};
use crate::stream::StreamDescriptor;

/// Power policy hints read by the host's bias sequencing.
///
/// Nothing in this crate acts on them.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct BiasPolicy {
    /// Component may stay biased while idle.
    pub idle_bias_on: bool,
    /// Host should wait out its power-down delay before dropping bias.
    pub use_pmdown_time: bool,
}

/// An immutable capability announcement for one device.
#[derive(Clone, Debug)]
pub struct ComponentDescriptor {
    name: String,
    streams: Vec<StreamDescriptor>,
    routing: RoutingGraph,
    bias_policy: BiasPolicy,
    endianness: SampleEndianness,
}

impl ComponentDescriptor {
    pub fn builder(name: impl Into<String>) -> ComponentBuilder {
        ComponentBuilder {
            name: name.into(),
            streams: Vec::new(),
            widgets: Vec::new(),
            routes: Vec::new(),
            bias_policy: BiasPolicy::default(),
            endianness: SampleEndianness::default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Streams in declaration order.
    pub fn streams(&self) -> &[StreamDescriptor] {
        &self.streams
    }

    pub fn stream(&self, name: &str) -> Option<&StreamDescriptor> {
        self.streams.iter().find(|s| s.name() == name)
    }

    /// Names of the DAIs the streams belong to, without repeats.
    pub fn dai_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for s in &self.streams {
            if !names.contains(&s.dai()) {
                names.push(s.dai());
            }
        }
        names
    }

    pub fn routing(&self) -> &RoutingGraph {
        &self.routing
    }

    pub fn widgets(&self) -> &[Widget] {
        self.routing.widgets()
    }

    pub fn routes(&self) -> &[Route] {
        self.routing.routes()
    }

    pub fn bias_policy(&self) -> BiasPolicy {
        self.bias_policy
    }

    /// Byte order the advertised PCM formats are expressed in.
    pub fn endianness(&self) -> SampleEndianness {
        self.endianness
    }
}

/// Builder for [`ComponentDescriptor`].
#[derive(Clone, Debug)]
pub struct ComponentBuilder {
    name: String,
    streams: Vec<StreamDescriptor>,
    widgets: Vec<Widget>,
    routes: Vec<Route>,
    bias_policy: BiasPolicy,
    endianness: SampleEndianness,
}

impl ComponentBuilder {
    pub fn stream(mut self, stream: StreamDescriptor) -> Self {
        self.streams.push(stream);
        self
    }

    pub fn widget(mut self, widget: Widget) -> Self {
        self.widgets.push(widget);
        self
    }

    pub fn widgets(mut self, widgets: impl IntoIterator<Item = Widget>) -> Self {
        self.widgets.extend(widgets);
        self
    }

    pub fn route(mut self, route: Route) -> Self {
        self.routes.push(route);
        self
    }

    pub fn routes(mut self, routes: impl IntoIterator<Item = Route>) -> Self {
        self.routes.extend(routes);
        self
    }

    pub fn idle_bias_on(mut self, on: bool) -> Self {
        self.bias_policy.idle_bias_on = on;
        self
    }

    pub fn use_pmdown_time(mut self, on: bool) -> Self {
        self.bias_policy.use_pmdown_time = on;
        self
    }

    pub fn endianness(mut self, endianness: SampleEndianness) -> Self {
        self.endianness = endianness;
        self
    }

    /// Validates the streams and routing fragment.
    ///
    /// Stream names are the fragment's terminals, so a repeated stream name
    /// fails the same way a repeated widget name does.
    pub fn build(self) -> Result<ComponentDescriptor> {
        let routing = RoutingGraph::new(
            self.widgets,
            self.routes,
            self.streams.iter().map(StreamDescriptor::name),
        )?;

        Ok(ComponentDescriptor {
            name: self.name,
            streams: self.streams,
            routing,
            bias_policy: self.bias_policy,
            endianness: self.endianness,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::pcm::{CapabilityDescriptor, FormatSet, RateSet, SampleFormat, SampleRate};
    use crate::stream::StreamDirection;

    fn caps() -> CapabilityDescriptor {
        CapabilityDescriptor::new(
            RateSet::empty().with(SampleRate::R48000),
            FormatSet::empty().with(SampleFormat::S16_LE),
            1,
            2,
        )
        .unwrap()
    }

    #[test]
    fn defaults_are_off() {
        let c = ComponentDescriptor::builder("empty").build().unwrap();
        assert_eq!(c.bias_policy(), BiasPolicy::default());
        assert_eq!(c.endianness(), SampleEndianness::Little);
        assert!(c.streams().is_empty());
        assert!(c.widgets().is_empty());
    }

    #[test]
    fn keeps_stream_order() {
        let c = ComponentDescriptor::builder("duplex")
            .stream(StreamDescriptor::new("aif", "Playback", StreamDirection::Playback, caps()))
            .stream(StreamDescriptor::capture("aif", "Capture", caps()))
            .build()
            .unwrap();

        let names: Vec<_> = c.streams().iter().map(StreamDescriptor::name).collect();
        assert_eq!(names, vec!["Playback", "Capture"]);
        assert_eq!(c.dai_names(), vec!["aif"]);
        assert!(c.stream("Capture").is_some());
        assert!(c.stream("Monitor").is_none());
    }

    #[test]
    fn duplicate_stream_names_fail() {
        let err = ComponentDescriptor::builder("dup")
            .stream(StreamDescriptor::capture("a", "Capture", caps()))
            .stream(StreamDescriptor::capture("b", "Capture", caps()))
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            Error::DuplicateEndpoint {
                name: "Capture".into()
            }
        );
    }

    #[test]
    fn route_to_undeclared_stream_fails() {
        let err = ComponentDescriptor::builder("dangling")
            .stream(StreamDescriptor::capture("a", "Capture", caps()))
            .widget(Widget::input("in"))
            .route(Route::always("Capture 2", "in"))
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::InvalidRoute { endpoint, .. } if endpoint == "Capture 2"));
    }

    #[test]
    fn policy_flags_are_recorded() {
        let c = ComponentDescriptor::builder("biased")
            .idle_bias_on(true)
            .use_pmdown_time(true)
            .endianness(SampleEndianness::Big)
            .build()
            .unwrap();
        assert!(c.bias_policy().idle_bias_on);
        assert!(c.bias_policy().use_pmdown_time);
        assert_eq!(c.endianness(), SampleEndianness::Big);
    }
}
