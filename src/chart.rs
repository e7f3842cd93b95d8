//! Edge lists and the chart configuration derived from them.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

/// Radius every node starts from before degree is added.
pub const BASE_NODE_RADIUS: f64 = 20.0;
/// Fill used for every node.
pub const NODE_FILL: &str = "#90ee90";
/// Heading shown above the canvas.
pub const CHART_TITLE: &str = "Dynamic Network Graph";
/// Canvas height in pixels.
pub const CHART_HEIGHT: f64 = 400.0;

/// A directed relationship as served by the graph endpoint.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Edge {
	/// Source node id.
	pub from: String,
	/// Target node id.
	pub to: String,
	/// Optional weight; drawn as the link width.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub strength: Option<f64>,
}

impl Edge {
	/// Edge without an explicit strength.
	pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
		Self {
			from: from.into(),
			to: to.into(),
			strength: None,
		}
	}

	/// Same edge with `strength` attached.
	pub fn with_strength(mut self, strength: f64) -> Self {
		self.strength = Some(strength);
		self
	}

	/// Link width: the strength, or 1 when it is missing, zero or NaN.
	pub fn width(&self) -> f64 {
		match self.strength {
			Some(s) if s != 0.0 && !s.is_nan() => s,
			_ => 1.0,
		}
	}
}

/// A node ready to be drawn.
#[derive(Clone, Debug, PartialEq)]
pub struct ChartNode {
	/// Identifier, also used as the label.
	pub id: String,
	/// Circle radius: base plus one per incident edge.
	pub radius: f64,
	/// CSS fill colour.
	pub fill_color: String,
}

/// A link ready to be drawn.
#[derive(Clone, Debug, PartialEq)]
pub struct ChartLink {
	/// Source node id.
	pub from: String,
	/// Target node id.
	pub to: String,
	/// Stroke width in plot units.
	pub width: f64,
}

/// Everything the canvas needs to draw one graph.
#[derive(Clone, Debug, PartialEq)]
pub struct ChartOptions {
	/// Heading above the canvas.
	pub title: String,
	/// Canvas height in pixels.
	pub height: f64,
	/// Nodes in first-seen order.
	pub nodes: Vec<ChartNode>,
	/// One link per edge, in edge order.
	pub links: Vec<ChartLink>,
}

impl Default for ChartOptions {
	fn default() -> Self {
		Self {
			title: CHART_TITLE.to_string(),
			height: CHART_HEIGHT,
			nodes: Vec::new(),
			links: Vec::new(),
		}
	}
}

/// Build the chart configuration for an edge list.
///
/// Nodes come out in first-seen order. Each endpoint occurrence adds one to
/// the node's radius, so a self-loop counts twice.
pub fn build_chart_options(edges: &[Edge]) -> ChartOptions {
	let ids = collect_node_ids(edges);
	let degrees = count_degrees(edges);

	let nodes = ids
		.into_iter()
		.map(|id| {
			let degree = degrees.get(id).copied().unwrap_or(0);
			ChartNode {
				id: id.to_string(),
				radius: BASE_NODE_RADIUS + degree as f64,
				fill_color: NODE_FILL.to_string(),
			}
		})
		.collect();

	let links = edges
		.iter()
		.map(|edge| ChartLink {
			from: edge.from.clone(),
			to: edge.to.clone(),
			width: edge.width(),
		})
		.collect();

	ChartOptions {
		nodes,
		links,
		..ChartOptions::default()
	}
}

fn collect_node_ids(edges: &[Edge]) -> Vec<&str> {
	let mut seen = HashSet::new();
	let mut ids = Vec::new();
	for id in edges.iter().flat_map(|e| [e.from.as_str(), e.to.as_str()]) {
		if seen.insert(id) {
			ids.push(id);
		}
	}
	ids
}

fn count_degrees(edges: &[Edge]) -> HashMap<&str, usize> {
	edges
		.iter()
		.flat_map(|e| [e.from.as_str(), e.to.as_str()])
		.fold(HashMap::new(), |mut acc, id| {
			*acc.entry(id).or_insert(0) += 1;
			acc
		})
}

#[cfg(test)]
mod tests {
	use super::*;

	fn sample() -> Vec<Edge> {
		vec![
			Edge::new("a", "b").with_strength(3.0),
			Edge::new("b", "c"),
			Edge::new("c", "a"),
			Edge::new("d", "a"),
		]
	}

	fn radius_of(options: &ChartOptions, id: &str) -> f64 {
		options.nodes.iter().find(|n| n.id == id).unwrap().radius
	}

	#[test]
	fn nodes_are_exactly_the_endpoints() {
		let options = build_chart_options(&sample());
		let ids: HashSet<_> = options.nodes.iter().map(|n| n.id.as_str()).collect();
		assert_eq!(ids, HashSet::from(["a", "b", "c", "d"]));
		assert_eq!(options.nodes.len(), 4);
	}

	#[test]
	fn nodes_keep_first_seen_order() {
		let options = build_chart_options(&sample());
		let ids: Vec<_> = options.nodes.iter().map(|n| n.id.as_str()).collect();
		assert_eq!(ids, ["a", "b", "c", "d"]);
	}

	#[test]
	fn radius_is_base_plus_degree() {
		let options = build_chart_options(&sample());
		assert_eq!(radius_of(&options, "a"), 23.0);
		assert_eq!(radius_of(&options, "b"), 22.0);
		assert_eq!(radius_of(&options, "c"), 22.0);
		assert_eq!(radius_of(&options, "d"), 21.0);
	}

	#[test]
	fn self_loop_counts_both_ends() {
		let options = build_chart_options(&[Edge::new("x", "x")]);
		assert_eq!(options.nodes.len(), 1);
		assert_eq!(options.nodes[0].radius, 22.0);
	}

	#[test]
	fn missing_strength_means_width_one() {
		let options = build_chart_options(&sample());
		assert_eq!(options.links[0].width, 3.0);
		assert_eq!(options.links[1].width, 1.0);
		assert_eq!(Edge::new("p", "q").with_strength(0.0).width(), 1.0);
	}

	#[test]
	fn empty_edge_list_gives_empty_chart() {
		let options = build_chart_options(&[]);
		assert!(options.nodes.is_empty());
		assert!(options.links.is_empty());
		assert_eq!(options.title, CHART_TITLE);
	}

	#[test]
	fn rebuilding_is_deterministic() {
		assert_eq!(build_chart_options(&sample()), build_chart_options(&sample()));
	}

	#[test]
	fn edges_decode_with_and_without_strength() {
		let edges: Vec<Edge> = serde_json::from_str(
			r#"[{"from":"a","to":"b"},{"from":"b","to":"c","strength":2.5}]"#,
		)
		.unwrap();
		assert_eq!(edges[0], Edge::new("a", "b"));
		assert_eq!(edges[1].width(), 2.5);
	}
}
