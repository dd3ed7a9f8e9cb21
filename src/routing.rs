//! Routing graph fragment - widgets, routes and the stream terminals they
//! attach to.
//!
//! The topology is static, so every reference is resolved when the fragment
//! is built. A route that points at nothing is a construction error, never a
//! runtime one.

use core::fmt;

use hashbrown::HashMap;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::{Dfs, Reversed};

use crate::error::{Error, Result};

/// What a widget represents in the host's power graph.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum WidgetKind {
    /// External input pin; the start of a capture path.
    Input,
    /// External output pin; the end of a playback path.
    Output,
    Mixer,
    Mux,
    /// Programmable gain amplifier.
    Pga,
    /// Power supply that other widgets depend on.
    Supply,
}

/// A named point in the routing graph.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct Widget {
    name: String,
    kind: WidgetKind,
}

impl Widget {
    pub fn new(name: impl Into<String>, kind: WidgetKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    pub fn input(name: impl Into<String>) -> Self {
        Self::new(name, WidgetKind::Input)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> WidgetKind {
        self.kind
    }
}

/// An edge `sink <- source`, optionally gated by a named control.
///
/// Without a control the edge is live whenever the component is powered.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct Route {
    sink: String,
    control: Option<String>,
    source: String,
}

impl Route {
    pub fn new(sink: impl Into<String>, control: Option<String>, source: impl Into<String>) -> Self {
        Self {
            sink: sink.into(),
            control,
            source: source.into(),
        }
    }

    /// An ungated route.
    pub fn always(sink: impl Into<String>, source: impl Into<String>) -> Self {
        Self::new(sink, None, source)
    }

    pub fn sink(&self) -> &str {
        &self.sink
    }

    pub fn control(&self) -> Option<&str> {
        self.control.as_deref()
    }

    pub fn source(&self) -> &str {
        &self.source
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.control {
            Some(control) => write!(f, "\"{}\" <-[{}]- \"{}\"", self.sink, control, self.source),
            None => write!(f, "\"{}\" <- \"{}\"", self.sink, self.source),
        }
    }
}

// Node weight: `None` marks a stream terminal.
#[derive(Clone, Debug)]
struct Endpoint {
    name: String,
    widget: Option<WidgetKind>,
}

type InnerGraph = DiGraph<Endpoint, usize>;

/// A validated set of widgets and routes for one component.
///
/// Edges run from source to sink, the direction samples flow.
#[derive(Clone, Debug)]
pub struct RoutingGraph {
    widgets: Vec<Widget>,
    routes: Vec<Route>,
    graph: InnerGraph,
    indices: HashMap<String, NodeIndex>,
}

impl RoutingGraph {
    /// Builds the fragment against the stream terminals of its component.
    ///
    /// Names must be unique across widgets and terminals, and each route end
    /// must name one of them.
    pub fn new<'a>(
        widgets: Vec<Widget>,
        routes: Vec<Route>,
        terminals: impl IntoIterator<Item = &'a str>,
    ) -> Result<Self> {
        let mut graph = InnerGraph::with_capacity(widgets.len() + 2, routes.len());
        let mut indices: HashMap<String, NodeIndex> = HashMap::new();

        let mut add = |name: &str, widget: Option<WidgetKind>| {
            if indices.contains_key(name) {
                return Err(Error::DuplicateEndpoint {
                    name: name.to_owned(),
                });
            }
            let idx = graph.add_node(Endpoint {
                name: name.to_owned(),
                widget,
            });
            indices.insert(name.to_owned(), idx);
            Ok(())
        };
        for terminal in terminals {
            add(terminal, None)?;
        }
        for w in &widgets {
            add(w.name(), Some(w.kind()))?;
        }

        for (i, route) in routes.iter().enumerate() {
            let resolve = |endpoint: &str| {
                indices.get(endpoint).copied().ok_or_else(|| Error::InvalidRoute {
                    route: route.to_string(),
                    endpoint: endpoint.to_owned(),
                })
            };
            let sink = resolve(route.sink())?;
            let source = resolve(route.source())?;
            graph.add_edge(source, sink, i);
        }

        Ok(Self {
            widgets,
            routes,
            graph,
            indices,
        })
    }

    pub fn widgets(&self) -> &[Widget] {
        &self.widgets
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn widget(&self, name: &str) -> Option<&Widget> {
        self.widgets.iter().find(|w| w.name() == name)
    }

    /// Stream terminals the fragment was built against.
    pub fn terminals(&self) -> impl Iterator<Item = &str> + '_ {
        self.graph
            .raw_nodes()
            .iter()
            .map(|n| &n.weight)
            .filter(|e| e.widget.is_none())
            .map(|e| e.name.as_str())
    }

    /// Endpoints with a route straight into `sink`, in declaration order.
    pub fn sources_of(&self, sink: &str) -> Vec<&str> {
        self.routes
            .iter()
            .filter(|r| r.sink() == sink)
            .map(Route::source)
            .collect()
    }

    /// Every widget with a path into `endpoint`, sorted by name.
    pub fn feeds(&self, endpoint: &str) -> Vec<&str> {
        let start = match self.indices.get(endpoint) {
            Some(idx) => *idx,
            None => return Vec::new(),
        };

        let reversed = Reversed(&self.graph);
        let mut dfs = Dfs::new(reversed, start);
        let mut found = Vec::new();
        while let Some(idx) = dfs.next(reversed) {
            let node = &self.graph[idx];
            if idx != start && node.widget.is_some() {
                found.push(node.name.as_str());
            }
        }
        found.sort_unstable();
        found
    }

    /// Whether an ungated route `sink <- source` exists.
    pub fn is_always_connected(&self, sink: &str, source: &str) -> bool {
        self.routes
            .iter()
            .any(|r| r.sink() == sink && r.source() == source && r.control().is_none())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_single_input_fragment() {
        let g = RoutingGraph::new(
            vec![Widget::input("spdif-in")],
            vec![Route::always("Capture", "spdif-in")],
            ["Capture"],
        )
        .unwrap();

        assert_eq!(g.widgets().len(), 1);
        assert_eq!(g.routes().len(), 1);
        assert_eq!(g.terminals().collect::<Vec<_>>(), vec!["Capture"]);
        assert_eq!(g.sources_of("Capture"), vec!["spdif-in"]);
        assert!(g.is_always_connected("Capture", "spdif-in"));
    }

    #[test]
    fn dangling_source_is_rejected() {
        let err = RoutingGraph::new(
            vec![Widget::input("spdif-in")],
            vec![Route::always("Capture", "line-in")],
            ["Capture"],
        )
        .unwrap_err();

        assert_eq!(
            err,
            Error::InvalidRoute {
                route: "\"Capture\" <- \"line-in\"".into(),
                endpoint: "line-in".into(),
            }
        );
    }

    #[test]
    fn dangling_sink_is_rejected() {
        let err = RoutingGraph::new(
            vec![Widget::input("spdif-in")],
            vec![Route::always("Playback", "spdif-in")],
            ["Capture"],
        )
        .unwrap_err();

        assert!(matches!(err, Error::InvalidRoute { endpoint, .. } if endpoint == "Playback"));
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let err = RoutingGraph::new(vec![Widget::input("Capture")], vec![], ["Capture"]).unwrap_err();
        assert_eq!(
            err,
            Error::DuplicateEndpoint {
                name: "Capture".into()
            }
        );
    }

    #[test]
    fn feeds_follows_multi_hop_paths() {
        let g = RoutingGraph::new(
            vec![
                Widget::input("opt-in"),
                Widget::input("coax-in"),
                Widget::new("Input Mux", WidgetKind::Mux),
                Widget::new("Boost", WidgetKind::Pga),
            ],
            vec![
                Route::new("Input Mux", Some("Optical".into()), "opt-in"),
                Route::new("Input Mux", Some("Coaxial".into()), "coax-in"),
                Route::always("Boost", "Input Mux"),
                Route::always("Capture", "Boost"),
            ],
            ["Capture"],
        )
        .unwrap();

        assert_eq!(g.feeds("Capture"), vec!["Boost", "Input Mux", "coax-in", "opt-in"]);
        assert_eq!(g.sources_of("Input Mux"), vec!["opt-in", "coax-in"]);
        assert!(!g.is_always_connected("Input Mux", "opt-in"));
        assert!(g.feeds("unknown").is_empty());
    }

    #[test]
    fn gated_route_display() {
        let route = Route::new("Input Mux", Some("Optical".into()), "opt-in");
        assert_eq!(route.to_string(), "\"Input Mux\" <-[Optical]- \"opt-in\"");
        assert_eq!(route.control(), Some("Optical"));
    }
}
