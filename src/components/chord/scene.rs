//! Retained scene graph for one chord diagram.
//!
//! The scene owns typed nodes for arcs, ribbons, gradients, the centre
//! caption and the static tooltip layer. Styling mutates node attributes;
//! geometry is only touched by [`Scene::build`] and
//! [`Scene::rebuild_geometry`]. Drawing backends read the scene and never
//! write to it.

use std::collections::HashMap;
use std::f64::consts::{PI, TAU};

use super::gradient::{LinearGradient, build_gradients, chord_gradient_id};
use super::layout::{Chord, chord_layout};
use super::palette::{ColorScale, LABEL_DARK};
use super::step::{InteractionPolicy, Step};
use super::tooltip::{Callout, PairText};
use crate::data::DataContext;

pub const WIDTH: f64 = 850.0;
pub const HEIGHT: f64 = 850.0;
pub const OUTER_PADDING: f64 = 80.0;
pub const ARC_THICK: f64 = 30.0;
pub const PAD_ANGLE: f64 = 0.05;
pub const TRANSITION_MS: f64 = 800.0;
/// Gap between the arc's outer edge and its label.
pub const LABEL_OFFSET: f64 = 8.0;

pub const CAPTION_TITLE: &str = "Shhor focuses on 8 types of hate";
pub const CAPTION_SUBTITLE: &str = "See methodology for definitions";

pub fn outer_radius() -> f64 {
	WIDTH.min(HEIGHT) / 2.0 - OUTER_PADDING
}

pub fn inner_radius() -> f64 {
	outer_radius() - ARC_THICK
}

fn ease_cubic_in_out(t: f64) -> f64 {
	let t = t * 2.0;
	if t <= 1.0 {
		t * t * t / 2.0
	} else {
		let t = t - 2.0;
		(t * t * t + 2.0) / 2.0
	}
}

/// A scalar attribute that may be animating toward a target.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tween {
	from: f64,
	to: f64,
	start: f64,
	duration: f64,
}

impl Tween {
	pub fn fixed(value: f64) -> Self {
		Self {
			from: value,
			to: value,
			start: 0.0,
			duration: 0.0,
		}
	}

	pub fn value_at(&self, now: f64) -> f64 {
		if self.duration <= 0.0 || now >= self.start + self.duration {
			self.to
		} else if now <= self.start {
			self.from
		} else {
			let t = ease_cubic_in_out((now - self.start) / self.duration);
			self.from + (self.to - self.from) * t
		}
	}

	pub fn target(&self) -> f64 {
		self.to
	}

	/// Retarget from wherever the value is at `now`. A zero duration jumps.
	pub fn animate_to(&mut self, to: f64, now: f64, duration: f64) {
		if duration > 0.0 {
			*self = Self {
				from: self.value_at(now),
				to,
				start: now,
				duration,
			};
		} else {
			*self = Self::fixed(to);
		}
	}
}

/// What a ribbon is filled with.
#[derive(Clone, Debug, PartialEq)]
pub enum Paint {
	Color(String),
	Gradient(String),
}

#[derive(Clone, Debug, PartialEq)]
pub struct ArcNode {
	pub index: usize,
	pub start_angle: f64,
	pub end_angle: f64,
	pub label: String,
	pub fill: String,
	pub opacity: Tween,
	pub label_fill: String,
}

impl ArcNode {
	pub fn mid_angle(&self) -> f64 {
		(self.start_angle + self.end_angle) / 2.0
	}

	/// Labels past the halfway point are turned over and end-aligned.
	pub fn label_flipped(&self) -> bool {
		self.mid_angle() > PI
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct RibbonNode {
	pub chord: Chord,
	pub gradient_id: String,
	pub fill: Paint,
	pub opacity: Tween,
	pub interactive: bool,
	pub title: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CenterCaption {
	pub title: &'static str,
	pub subtitle: &'static str,
	pub displayed: bool,
	pub opacity: Tween,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct TooltipLayer {
	pub visible: bool,
	pub callouts: Vec<Callout>,
}

impl TooltipLayer {
	pub fn clear(&mut self) {
		self.callouts.clear();
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
	pub generation: u64,
	pub labels: Vec<String>,
	pub colors: ColorScale,
	pub caption: CenterCaption,
	pub gradients: Vec<LinearGradient>,
	pub arcs: Vec<ArcNode>,
	pub ribbons: Vec<RibbonNode>,
	pub tooltips: TooltipLayer,
	pub policy: InteractionPolicy,
	pub hovered_arc: Option<usize>,
	pub step: Option<Step>,
}

impl Scene {
	/// Build a fresh scene. No step styling is applied yet.
	pub fn build(generation: u64, labels: &[String], matrix: &[Vec<f64>], ctx: &DataContext) -> Self {
		let mut scene = Self {
			generation,
			labels: labels.to_vec(),
			colors: ColorScale::new(labels),
			caption: CenterCaption {
				title: CAPTION_TITLE,
				subtitle: CAPTION_SUBTITLE,
				displayed: true,
				opacity: Tween::fixed(0.0),
			},
			gradients: Vec::new(),
			arcs: Vec::new(),
			ribbons: Vec::new(),
			tooltips: TooltipLayer {
				visible: true,
				callouts: Vec::new(),
			},
			policy: InteractionPolicy::None,
			hovered_arc: None,
			step: None,
		};
		scene.rebuild_geometry(labels, matrix, ctx);
		scene
	}

	/// Recompute arcs, ribbons and gradients for `matrix`, keeping the
	/// current styling of nodes that survive.
	pub fn rebuild_geometry(&mut self, labels: &[String], matrix: &[Vec<f64>], ctx: &DataContext) {
		self.labels = labels.to_vec();
		self.colors = ColorScale::new(labels);
		let layout = chord_layout(matrix, PAD_ANGLE);

		let previous_arcs = std::mem::take(&mut self.arcs);
		self.arcs = layout
			.groups
			.iter()
			.map(|g| {
				let fill = self.colors.color(g.index).to_string();
				let (fill, opacity, label_fill) = match previous_arcs.get(g.index) {
					Some(prev) => (prev.fill.clone(), prev.opacity, prev.label_fill.clone()),
					None => (fill, Tween::fixed(1.0), LABEL_DARK.to_string()),
				};
				ArcNode {
					index: g.index,
					start_angle: g.start_angle,
					end_angle: g.end_angle,
					label: labels.get(g.index).cloned().unwrap_or_default(),
					fill,
					opacity,
					label_fill,
				}
			})
			.collect();

		let mut previous_ribbons: HashMap<(usize, usize), RibbonNode> = std::mem::take(&mut self.ribbons)
			.into_iter()
			.map(|r| ((r.chord.source.index, r.chord.target.index), r))
			.collect();
		self.ribbons = layout
			.chords
			.iter()
			.map(|chord| {
				let gradient_id = chord_gradient_id(labels, chord);
				let title = PairText::new(labels, ctx, chord.source.index, chord.target.index).hover_title();
				match previous_ribbons.remove(&(chord.source.index, chord.target.index)) {
					Some(prev) => RibbonNode {
						chord: *chord,
						fill: match prev.fill {
							Paint::Gradient(_) => Paint::Gradient(gradient_id.clone()),
							color => color,
						},
						gradient_id,
						opacity: prev.opacity,
						interactive: prev.interactive,
						title,
					},
					None => RibbonNode {
						chord: *chord,
						fill: Paint::Gradient(gradient_id.clone()),
						gradient_id,
						opacity: Tween::fixed(0.8),
						interactive: true,
						title,
					},
				}
			})
			.collect();

		// Ids stay stable across rebuilds but their endpoints do not.
		self.gradients = build_gradients(&layout.chords, labels, &self.colors, inner_radius());
	}

	pub fn gradient(&self, id: &str) -> Option<&LinearGradient> {
		self.gradients.iter().find(|g| g.id == id)
	}

	/// Arc under a point in scene coordinates (origin at the centre).
	pub fn arc_at(&self, x: f64, y: f64) -> Option<usize> {
		let r = x.hypot(y);
		if r < inner_radius() || r > outer_radius() {
			return None;
		}
		let angle = x.atan2(-y).rem_euclid(TAU);
		self.arcs
			.iter()
			.find(|a| a.start_angle <= angle && angle < a.end_angle)
			.map(|a| a.index)
	}

	/// Apply the hover effect of the active interaction policy. Hover writes
	/// bypass transitions.
	pub fn hover_arc(&mut self, arc: Option<usize>) {
		if self.policy != InteractionPolicy::DimUnrelated || self.hovered_arc == arc {
			return;
		}
		self.hovered_arc = arc;
		for ribbon in &mut self.ribbons {
			let opacity = match arc {
				Some(index) if ribbon.chord.touches(index) => 1.0,
				Some(_) => 0.08,
				None => 0.9,
			};
			ribbon.opacity = Tween::fixed(opacity);
		}
	}

	pub fn ribbon_title(&self, ribbon: usize) -> Option<&str> {
		self.ribbons.get(ribbon).map(|r| r.title.as_str())
	}
}
