use std::collections::{HashMap, HashSet};
use std::f64::consts::PI;

use force_graph::{DefaultNodeIdx, EdgeData, ForceGraph, NodeData, SimulationParameters};

use crate::chart::ChartOptions;

/// Ring radius the nodes start on before the simulation spreads them.
const SEED_RING: f64 = 150.0;

#[derive(Clone, Debug, Default)]
pub struct NodeInfo {
	pub id: String,
	pub radius: f64,
	pub color: String,
}

#[derive(Clone, Debug)]
pub struct LinkInfo {
	pub source: DefaultNodeIdx,
	pub target: DefaultNodeIdx,
	pub width: f64,
}

#[derive(Clone, Debug, Default)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

#[derive(Clone, Debug, Default)]
pub struct DragState {
	pub node_idx: Option<DefaultNodeIdx>,
	pub start_x: f64,
	pub start_y: f64,
	pub node_start_x: f32,
	pub node_start_y: f32,
}

#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
}

pub struct ChartState {
	pub graph: ForceGraph<NodeInfo, ()>,
	pub links: Vec<LinkInfo>,
	pub transform: ViewTransform,
	pub drag: DragState,
	pub pan: PanState,
	pub hovered: Option<DefaultNodeIdx>,
	pub neighbors: HashSet<DefaultNodeIdx>,
	pub width: f64,
	pub height: f64,
}

impl ChartState {
	pub fn new(options: &ChartOptions, width: f64, height: f64) -> Self {
		let mut graph = ForceGraph::new(SimulationParameters {
			force_charge: 1200.0,
			force_spring: 0.05,
			force_max: 150.0,
			node_speed: 3000.0,
			damping_factor: 0.9,
		});
		let mut id_to_idx = HashMap::new();

		let count = options.nodes.len().max(1) as f64;
		for (i, node) in options.nodes.iter().enumerate() {
			let angle = (i as f64) * 2.0 * PI / count;
			let idx = graph.add_node(NodeData {
				x: (SEED_RING * angle.cos()) as f32,
				y: (SEED_RING * angle.sin()) as f32,
				mass: 10.0,
				is_anchor: false,
				user_data: NodeInfo {
					id: node.id.clone(),
					radius: node.radius,
					color: node.fill_color.clone(),
				},
			});
			id_to_idx.insert(node.id.as_str(), idx);
		}

		let mut links = Vec::with_capacity(options.links.len());
		for link in &options.links {
			if let (Some(&source), Some(&target)) =
				(id_to_idx.get(link.from.as_str()), id_to_idx.get(link.to.as_str()))
			{
				// Self-loops stay in `links` for drawing but add no spring.
				if source != target {
					graph.add_edge(source, target, EdgeData::default());
				}
				links.push(LinkInfo {
					source,
					target,
					width: link.width,
				});
			}
		}

		Self {
			graph,
			links,
			transform: ViewTransform {
				x: width / 2.0,
				y: height / 2.0,
				k: 1.0,
			},
			drag: DragState::default(),
			pan: PanState::default(),
			hovered: None,
			neighbors: HashSet::new(),
			width,
			height,
		}
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<DefaultNodeIdx> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		let mut found = None;
		self.graph.visit_nodes(|node| {
			let (dx, dy) = (node.x() as f64 - gx, node.y() as f64 - gy);
			if (dx * dx + dy * dy).sqrt() < node.data.user_data.radius {
				found = Some(node.index());
			}
		});
		found
	}

	pub fn positions(&self) -> HashMap<DefaultNodeIdx, (f64, f64)> {
		let mut positions = HashMap::new();
		self.graph.visit_nodes(|node| {
			positions.insert(node.index(), (node.x() as f64, node.y() as f64));
		});
		positions
	}

	pub fn set_hover(&mut self, node: Option<DefaultNodeIdx>) {
		if self.hovered == node {
			return;
		}
		self.hovered = node;
		self.neighbors.clear();
		if let Some(idx) = node {
			for link in &self.links {
				if link.source == idx {
					self.neighbors.insert(link.target);
				} else if link.target == idx {
					self.neighbors.insert(link.source);
				}
			}
		}
	}

	pub fn is_highlighted(&self, idx: DefaultNodeIdx) -> bool {
		self.hovered == Some(idx) || self.neighbors.contains(&idx)
	}

	pub fn start_drag(&mut self, idx: DefaultNodeIdx, x: f64, y: f64) {
		self.drag.node_idx = Some(idx);
		self.drag.start_x = x;
		self.drag.start_y = y;
		let drag = &mut self.drag;
		self.graph.visit_nodes(|node| {
			if node.index() == idx {
				drag.node_start_x = node.x();
				drag.node_start_y = node.y();
			}
		});
	}

	pub fn drag_to(&mut self, x: f64, y: f64) {
		let Some(idx) = self.drag.node_idx else {
			return;
		};
		let (dx, dy) = (
			(x - self.drag.start_x) / self.transform.k,
			(y - self.drag.start_y) / self.transform.k,
		);
		let (nx, ny) = (
			self.drag.node_start_x + dx as f32,
			self.drag.node_start_y + dy as f32,
		);
		// Dragged nodes stay pinned where they are dropped.
		self.graph.visit_nodes_mut(|node| {
			if node.index() == idx {
				node.data.x = nx;
				node.data.y = ny;
				node.data.is_anchor = true;
			}
		});
	}

	pub fn start_pan(&mut self, x: f64, y: f64) {
		self.pan = PanState {
			active: true,
			start_x: x,
			start_y: y,
			transform_start_x: self.transform.x,
			transform_start_y: self.transform.y,
		};
	}

	pub fn pan_to(&mut self, x: f64, y: f64) {
		if self.pan.active {
			self.transform.x = self.pan.transform_start_x + (x - self.pan.start_x);
			self.transform.y = self.pan.transform_start_y + (y - self.pan.start_y);
		}
	}

	pub fn release(&mut self) {
		self.drag.node_idx = None;
		self.pan.active = false;
	}

	pub fn zoom_at(&mut self, x: f64, y: f64, zoom_in: bool) {
		let factor = if zoom_in { 1.1 } else { 0.9 };
		let new_k = (self.transform.k * factor).clamp(0.1, 10.0);
		let ratio = new_k / self.transform.k;
		self.transform.x = x - (x - self.transform.x) * ratio;
		self.transform.y = y - (y - self.transform.y) * ratio;
		self.transform.k = new_k;
	}

	pub fn tick(&mut self, dt: f32) {
		self.graph.update(dt);
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::chart::{Edge, build_chart_options};

	fn state() -> ChartState {
		let options = build_chart_options(&[
			Edge::new("a", "b"),
			Edge::new("b", "c"),
			Edge::new("c", "c"),
		]);
		ChartState::new(&options, 800.0, 400.0)
	}

	#[test]
	fn one_link_per_edge_including_self_loops() {
		let s = state();
		assert_eq!(s.links.len(), 3);
		assert_eq!(s.positions().len(), 3);
	}

	#[test]
	fn hover_highlights_neighbours() {
		let mut s = state();
		let b = s.links[0].target;
		s.set_hover(Some(b));
		assert!(s.is_highlighted(s.links[0].source));
		assert!(s.is_highlighted(s.links[1].target));
		s.set_hover(None);
		assert!(!s.is_highlighted(b));
	}

	#[test]
	fn node_under_cursor_uses_its_radius() {
		let s = state();
		let a = s.links[0].source;
		let (x, y) = s.positions()[&a];
		// Screen position of the node centre, nudged inside its 21px radius.
		let (sx, sy) = (x + s.transform.x + 15.0, y + s.transform.y);
		assert_eq!(s.node_at_position(sx, sy), Some(a));
	}

	#[test]
	fn zoom_keeps_cursor_fixed() {
		let mut s = state();
		let before = s.screen_to_graph(120.0, 80.0);
		s.zoom_at(120.0, 80.0, true);
		let after = s.screen_to_graph(120.0, 80.0);
		assert!((before.0 - after.0).abs() < 1e-9);
		assert!((before.1 - after.1).abs() < 1e-9);
	}

	#[test]
	fn dragging_moves_and_pins_node() {
		let mut s = state();
		let a = s.links[0].source;
		let (x0, y0) = s.positions()[&a];
		s.start_drag(a, 10.0, 10.0);
		s.drag_to(30.0, 50.0);
		let (x1, y1) = s.positions()[&a];
		assert!((x1 - x0 - 20.0).abs() < 1e-3);
		assert!((y1 - y0 - 40.0).abs() < 1e-3);
		s.release();
		assert!(s.drag.node_idx.is_none());
	}
}
