//! Link paths with arrowheads for directed edges.

/// Distance from the target centre at which the arrowhead sits.
pub const POINT_RADIUS: f64 = 25.0;
/// Length of each arrowhead wing along the link.
pub const ARROW_LENGTH: f64 = 5.0;
/// Half-width of the arrowhead across the link.
pub const ARROW_WIDTH: f64 = 5.0;

/// A position in plot space.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
	/// Horizontal coordinate.
	pub x: f64,
	/// Vertical coordinate, growing downwards.
	pub y: f64,
}

impl Point {
	/// Shorthand constructor.
	pub const fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}
}

/// One drawing step of a link path.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PathCommand {
	/// Lift the pen and move to a point.
	MoveTo(Point),
	/// Draw a straight line to a point.
	LineTo(Point),
}

impl PathCommand {
	/// The point this command ends on.
	pub fn point(&self) -> Point {
		match *self {
			PathCommand::MoveTo(p) | PathCommand::LineTo(p) => p,
		}
	}
}

/// Path from `source` to `target` with an open arrowhead drawn near the
/// target's boundary.
///
/// When the points share an x coordinate the angle comes out as zero (or NaN
/// when they coincide) and a bare two-point line is returned instead.
pub fn link_path(source: Point, target: Point) -> Vec<PathCommand> {
	let angle = ((source.x - target.x) / (source.y - target.y)).atan();

	if angle == 0.0 || angle.is_nan() {
		return vec![PathCommand::MoveTo(source), PathCommand::LineTo(target)];
	}

	let (sin, cos) = angle.sin_cos();
	// Above the target the boundary point is pulled back up towards the source.
	let sign = if source.y < target.y { -1.0 } else { 1.0 };

	let boundary = Point::new(
		target.x + sign * POINT_RADIUS * sin,
		target.y + sign * POINT_RADIUS * cos,
	);
	let back = Point::new(
		boundary.x + sign * ARROW_LENGTH * sin,
		boundary.y + sign * ARROW_LENGTH * cos,
	);
	let wing_a = Point::new(back.x - ARROW_WIDTH * cos, back.y + ARROW_WIDTH * sin);
	let wing_b = Point::new(back.x + ARROW_WIDTH * cos, back.y - ARROW_WIDTH * sin);

	vec![
		PathCommand::MoveTo(source),
		PathCommand::LineTo(boundary),
		PathCommand::LineTo(wing_a),
		PathCommand::LineTo(boundary),
		PathCommand::LineTo(wing_b),
	]
}
