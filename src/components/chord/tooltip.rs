//! Pair text and the static callout layout drawn over focus steps.

use std::collections::HashSet;

use log::debug;

use super::layout::polar;
use super::scene::{HEIGHT, Scene, WIDTH, outer_radius};
use crate::data::DataContext;

/// Ribbons at or above this rendered opacity get a callout.
pub const OPAQUE_THRESHOLD: f64 = 0.9;
pub const MIN_GAP: f64 = 26.0;
/// Callouts start this far outside the outer radius.
pub const BASE_OFFSET: f64 = 90.0;
pub const TOP_MARGIN: f64 = 60.0;
pub const BOTTOM_MARGIN: f64 = 70.0;
pub const SIDE_SHIFT: f64 = 250.0;
pub const BOTTOM_LIFT: f64 = 50.0;
pub const CONNECTOR_BEND: f64 = 35.0;
pub const BOX_PADDING: f64 = 14.0;
pub const BOX_HEIGHT: f64 = 56.0;
pub const BOX_TOP: f64 = -24.0;
/// Widest callout box the drawing surface leaves room for.
pub const MAX_BOX_WIDTH: f64 = 280.0;
const SURFACE_PAD: f64 = 12.0;

/// Size of the drawing surface around the logical scene. Callouts sit
/// outside the chord radius and lower ones are pushed further sideways, so
/// the surface is wider than the scene itself. The scene origin is its centre.
pub fn surface_size() -> (f64, f64) {
	let outer = outer_radius();
	let half_w = outer + BASE_OFFSET + SIDE_SHIFT + MAX_BOX_WIDTH + SURFACE_PAD;
	let half_h = (outer + BOTTOM_MARGIN + BOX_TOP + BOX_HEIGHT).max(outer + TOP_MARGIN - BOX_TOP) + SURFACE_PAD;
	(2.0 * half_w.max(WIDTH / 2.0), 2.0 * half_h.max(HEIGHT / 2.0))
}

/// Text shared by the hover title and the static callout of a pair.
///
/// "% of A is B" reads the column matrix at `[B][A]` and "% of B is A" at
/// `[A][B]`.
#[derive(Clone, Debug, PartialEq)]
pub struct PairText {
	pub title: String,
	pub a_is_b: String,
	pub b_is_a: String,
	pub intersection: String,
}

impl PairText {
	pub fn new(labels: &[String], ctx: &DataContext, i: usize, j: usize) -> Self {
		let a = labels.get(i).map_or("", String::as_str);
		let b = labels.get(j).map_or("", String::as_str);
		Self {
			title: format!("{a} × {b}"),
			a_is_b: format!("{:.2}% of {a} is {b}", ctx.pct_col(j, i)),
			b_is_a: format!("{:.2}% of {b} is {a}", ctx.pct_col(i, j)),
			intersection: format!("Intersection: {:.2}% of total", ctx.pct_global(i, j)),
		}
	}

	pub fn hover_title(&self) -> String {
		format!(
			"{}\n{}\n{}\n{}",
			self.title, self.a_is_b, self.b_is_a, self.intersection
		)
	}
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Font {
	pub size: f64,
	pub bold: bool,
}

impl Font {
	pub fn css(&self) -> String {
		if self.bold {
			format!("600 {}px sans-serif", self.size)
		} else {
			format!("{}px sans-serif", self.size)
		}
	}
}

pub const TITLE_FONT: Font = Font {
	size: 12.0,
	bold: true,
};
pub const LINE_FONT: Font = Font {
	size: 11.0,
	bold: false,
};

/// Width of rendered text, supplied by the drawing backend.
pub trait TextMeasure {
	fn text_width(&self, text: &str, font: Font) -> f64;
}

/// Glyph-count estimate for when no backend is around to measure.
#[derive(Clone, Copy, Debug, Default)]
pub struct ApproxMeasure;

impl TextMeasure for ApproxMeasure {
	fn text_width(&self, text: &str, font: Font) -> f64 {
		let em = if font.bold { 0.62 } else { 0.56 };
		text.chars().count() as f64 * font.size * em
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
	Left,
	Right,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CalloutPoint {
	pub source: usize,
	pub target: usize,
	/// Midpoint angle of the ribbon's source end.
	pub angle: f64,
	pub x: f64,
	pub y: f64,
	pub side: Side,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TextLine {
	pub text: String,
	pub x: f64,
	pub y: f64,
	pub font: Font,
}

/// Quadratic connector from the arc edge to the callout box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Connector {
	pub start: (f64, f64),
	pub control: (f64, f64),
	pub end: (f64, f64),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Callout {
	pub point: CalloutPoint,
	pub color: String,
	pub connector: Connector,
	pub box_width: f64,
	pub lines: Vec<TextLine>,
}

/// Unordered pairs of ribbons whose opacity at `now` reaches the threshold,
/// first occurrence first.
pub fn opaque_pairs(scene: &Scene, now: f64) -> Vec<(usize, usize, f64)> {
	let mut seen = HashSet::new();
	scene
		.ribbons
		.iter()
		.filter(|r| r.opacity.value_at(now) >= OPAQUE_THRESHOLD)
		.filter(|r| seen.insert(r.chord.unordered_key()))
		.map(|r| (r.chord.source.index, r.chord.target.index, r.chord.source.mid_angle()))
		.collect()
}

/// Sort by `y` and push points apart to `MIN_GAP`, keeping them inside
/// `[top, bottom]` whenever they fit.
///
/// When they don't fit, the gap wins over the top edge: the backward pass
/// leaves the first points above `top`.
fn resolve_vertical(points: &mut [CalloutPoint], top: f64, bottom: f64) {
	points.sort_by(|a, b| a.y.total_cmp(&b.y));
	for p in points.iter_mut() {
		p.y = p.y.clamp(top, bottom);
	}
	for k in 1..points.len() {
		if points[k].y < points[k - 1].y + MIN_GAP {
			points[k].y = points[k - 1].y + MIN_GAP;
		}
	}
	if let Some(last) = points.last_mut() {
		last.y = last.y.min(bottom);
	}
	for k in (0..points.len().saturating_sub(1)).rev() {
		if points[k].y > points[k + 1].y - MIN_GAP {
			points[k].y = points[k + 1].y - MIN_GAP;
		}
	}
	if points.first().is_some_and(|p| p.y < top) {
		debug!(
			"{} callouts overflow the band, first sits {:.1}px above it",
			points.len(),
			top - points[0].y
		);
	}
}

/// Place one callout per pair. Deterministic for a given input order.
pub fn layout_callouts(pairs: &[(usize, usize, f64)]) -> Vec<CalloutPoint> {
	let outer = outer_radius();
	let (top, bottom) = (-outer - TOP_MARGIN, outer + BOTTOM_MARGIN);
	let base = outer + BASE_OFFSET;

	let mut points: Vec<CalloutPoint> = pairs
		.iter()
		.map(|&(source, target, angle)| {
			let (x, y) = polar(angle, base);
			CalloutPoint {
				source,
				target,
				angle,
				x,
				y,
				side: if x > 0.0 { Side::Right } else { Side::Left },
			}
		})
		.collect();

	resolve_vertical(&mut points, top, bottom);
	for p in &mut points {
		if p.y > 0.0 {
			p.y -= BOTTOM_LIFT;
			p.x += match p.side {
				Side::Right => SIDE_SHIFT,
				Side::Left => -SIDE_SHIFT,
			};
		}
	}
	// The lift can pull lower points back into upper ones.
	resolve_vertical(&mut points, top, bottom);
	points
}

/// Lay out and dress callouts for every opaque pair in `scene`.
pub fn build_callouts(scene: &Scene, ctx: &DataContext, measure: &dyn TextMeasure, now: f64) -> Vec<Callout> {
	let outer = outer_radius();
	layout_callouts(&opaque_pairs(scene, now))
		.into_iter()
		.map(|point| {
			let text = PairText::new(&scene.labels, ctx, point.source, point.target);
			let start = polar(point.angle, outer);
			let control = ((start.0 + point.x) / 2.0, (start.1 + point.y) / 2.0 - CONNECTOR_BEND);
			let lines = vec![
				TextLine {
					text: text.title,
					x: 6.0,
					y: -10.0,
					font: TITLE_FONT,
				},
				TextLine {
					text: text.a_is_b,
					x: 6.0,
					y: 6.0,
					font: LINE_FONT,
				},
				TextLine {
					text: text.b_is_a,
					x: 6.0,
					y: 22.0,
					font: LINE_FONT,
				},
			];
			let widest = lines
				.iter()
				.map(|l| measure.text_width(&l.text, l.font))
				.fold(0.0, f64::max);
			Callout {
				color: scene.colors.color(point.source).to_string(),
				connector: Connector {
					start,
					control,
					end: (point.x, point.y),
				},
				box_width: widest + BOX_PADDING,
				lines,
				point,
			}
		})
		.collect()
}

#[cfg(test)]
pub(crate) mod tests {
	use std::f64::consts::{PI, TAU};

	use super::super::step::{Step, apply_step};
	use super::*;

	pub(crate) fn sample_callout() -> Callout {
		let point = CalloutPoint {
			source: 0,
			target: 1,
			angle: 0.0,
			x: 0.0,
			y: -435.0,
			side: Side::Left,
		};
		Callout {
			point,
			color: "#999".into(),
			connector: Connector {
				start: (0.0, -345.0),
				control: (0.0, -425.0),
				end: (0.0, -435.0),
			},
			box_width: 100.0,
			lines: Vec::new(),
		}
	}

	fn assert_gaps(points: &[CalloutPoint]) {
		for w in points.windows(2) {
			assert!(w[1].y - w[0].y >= MIN_GAP - 1e-9, "{} then {}", w[0].y, w[1].y);
		}
	}

	#[test]
	fn pair_text_uses_transposed_column_lookup() {
		let labels: Vec<String> = vec!["A".into(), "B".into()];
		let ctx = DataContext {
			pct_col: Some(vec![vec![0.0, 80.0], vec![20.0, 0.0]]),
			pct_global: Some(vec![vec![0.0, 40.0], vec![10.0, 0.0]]),
		};
		let text = PairText::new(&labels, &ctx, 0, 1);
		assert_eq!(text.title, "A × B");
		assert_eq!(text.a_is_b, "20.00% of A is B");
		assert_eq!(text.b_is_a, "80.00% of B is A");
		assert_eq!(text.intersection, "Intersection: 40.00% of total");

		let reversed = PairText::new(&labels, &ctx, 1, 0);
		assert_eq!(reversed.a_is_b, "80.00% of B is A");
	}

	#[test]
	fn pair_text_defaults_to_zero_without_data() {
		let labels: Vec<String> = vec!["A".into(), "B".into()];
		let text = PairText::new(&labels, &DataContext::default(), 0, 1);
		assert_eq!(text.a_is_b, "0.00% of A is B");
		assert_eq!(text.intersection, "Intersection: 0.00% of total");
	}

	#[test]
	fn crowded_points_keep_min_gap() {
		let pairs: Vec<_> = (0..7).map(|k| (k, k + 1, PI * 0.98 + k as f64 * 0.001)).collect();
		let points = layout_callouts(&pairs);
		assert_eq!(points.len(), 7);
		assert_gaps(&points);
	}

	#[test]
	fn gap_holds_across_the_centre_line() {
		// Points just above and below the centre collide once the lower one is lifted.
		let pairs = vec![(0, 1, PI / 2.0 - 0.05), (2, 3, PI / 2.0 + 0.1), (4, 5, 3.0 * PI / 2.0)];
		let points = layout_callouts(&pairs);
		assert_gaps(&points);
	}

	#[test]
	fn points_stay_in_bounds_and_shift_outward() {
		let pairs: Vec<_> = (0..12).map(|k| (k, k, k as f64 * TAU / 12.0)).collect();
		let points = layout_callouts(&pairs);
		let outer = outer_radius();
		assert_gaps(&points);
		for p in &points {
			assert!(p.y >= -outer - TOP_MARGIN - 1e-9);
			assert!(p.y <= outer + BOTTOM_MARGIN);
		}
		let bottom = points.iter().find(|p| (p.angle - PI).abs() < 1e-9).unwrap();
		assert!(bottom.x.abs() >= SIDE_SHIFT - 1e-9);
	}

	#[test]
	fn overflowing_band_keeps_gap_over_top_edge() {
		let outer = outer_radius();
		let (top, bottom) = (-outer - TOP_MARGIN, outer + BOTTOM_MARGIN);
		let count = ((bottom - top) / MIN_GAP) as usize + 4;
		let mut points: Vec<_> = (0..count)
			.map(|k| CalloutPoint {
				source: k,
				target: k,
				angle: 0.0,
				x: 0.0,
				y: 0.0,
				side: Side::Right,
			})
			.collect();
		resolve_vertical(&mut points, top, bottom);
		assert_gaps(&points);
		assert_eq!(points[count - 1].y, bottom);
		assert!(points[0].y < top);
	}

	#[test]
	fn focus_callouts_fit_the_drawing_surface() {
		let labels: Vec<String> = [
			"sexist",
			"political",
			"communal",
			"casteist",
			"racist",
			"queerphobic",
			"ablelist",
		]
		.into_iter()
		.map(String::from)
		.collect();
		let matrix: Vec<Vec<f64>> = (0..7)
			.map(|i| (0..7).map(|j| if i == j { 0.0 } else { (1 + (i + j) % 4) as f64 }).collect())
			.collect();
		let ctx = DataContext {
			pct_col: Some(vec![vec![100.0; 7]; 7]),
			pct_global: Some(vec![vec![3.0; 7]; 7]),
		};
		let (w, h) = surface_size();
		assert!(w >= WIDTH && h >= HEIGHT);

		for step in Step::ALL.into_iter().filter(|s| s.has_static_tooltips()) {
			let mut scene = Scene::build(1, &labels, &matrix, &ctx);
			apply_step(&mut scene, step, false, 0.0);
			let callouts = build_callouts(&scene, &ctx, &ApproxMeasure, 0.0);
			assert!(!callouts.is_empty(), "{step}");
			for c in &callouts {
				let (x0, x1) = (c.point.x, c.point.x + c.box_width);
				let (y0, y1) = (c.point.y + BOX_TOP, c.point.y + BOX_TOP + BOX_HEIGHT);
				assert!(c.box_width <= MAX_BOX_WIDTH, "{step}: {}", c.lines[0].text);
				assert!(
					x0 >= -w / 2.0 && x1 <= w / 2.0 && y0 >= -h / 2.0 && y1 <= h / 2.0,
					"{step}: {} at x=[{x0:.0},{x1:.0}] y=[{y0:.0},{y1:.0}]",
					c.lines[0].text
				);
			}
		}
	}

	#[test]
	fn layout_is_deterministic() {
		let pairs: Vec<_> = (0..5).map(|k| (k, 4 - k, 0.3 + k as f64)).collect();
		assert_eq!(layout_callouts(&pairs), layout_callouts(&pairs));
	}

	#[test]
	fn callouts_cover_opaque_pairs_once() {
		let labels: Vec<String> = ["sexist", "political", "communal", "racist"]
			.into_iter()
			.map(String::from)
			.collect();
		let matrix = vec![
			vec![0.0, 5.0, 3.0, 2.0],
			vec![5.0, 0.0, 1.0, 1.0],
			vec![3.0, 1.0, 0.0, 1.0],
			vec![2.0, 1.0, 1.0, 0.0],
		];
		let mut scene = Scene::build(1, &labels, &matrix, &DataContext::default());
		apply_step(&mut scene, Step::Sexist, false, 0.0);

		let pairs = opaque_pairs(&scene, 0.0);
		let keys: Vec<_> = pairs.iter().map(|&(i, j, _)| (i.min(j), i.max(j))).collect();
		assert_eq!(keys, vec![(0, 1), (0, 2)]);

		let callouts = build_callouts(&scene, &DataContext::default(), &ApproxMeasure, 0.0);
		assert_eq!(callouts.len(), 2);
		for c in &callouts {
			assert_eq!(c.lines.len(), 3);
			assert_eq!(c.color, scene.colors.color(c.point.source));
			let widest = c
				.lines
				.iter()
				.map(|l| ApproxMeasure.text_width(&l.text, l.font))
				.fold(0.0, f64::max);
			assert_eq!(c.box_width, widest + BOX_PADDING);
			assert_eq!(c.connector.end, (c.point.x, c.point.y));
		}
	}
}
