//! Narrative steps and the styling each one applies to a [`Scene`].

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use super::layout::Chord;
use super::palette::{GRAYSCALE_RIBBON, LABEL_DARK, LABEL_MUTED, MUTED_ARC};
use super::scene::{Paint, Scene, TRANSITION_MS};

/// Narrative stage of the diagram, in story order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Step {
	Grayscale,
	Intro,
	Explainer,
	Sexist,
	Political,
	Full,
	End,
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("unknown step `{0}`")]
pub struct UnknownStep(pub String);

impl Step {
	pub const ALL: [Step; 7] = [
		Step::Grayscale,
		Step::Intro,
		Step::Explainer,
		Step::Sexist,
		Step::Political,
		Step::Full,
		Step::End,
	];

	pub fn name(self) -> &'static str {
		match self {
			Step::Grayscale => "grayscale",
			Step::Intro => "intro",
			Step::Explainer => "explainer",
			Step::Sexist => "sexist",
			Step::Political => "political",
			Step::Full => "full",
			Step::End => "end",
		}
	}

	/// Highlight rule for the focus steps.
	pub fn focus_template(self) -> Option<FocusTemplate> {
		match self {
			Step::Sexist => Some(
				FocusTemplate::new(&["sexist"])
					.high(&["political", "communal", "casteist", "queerphobic"])
					.low(&["racist", "ablelist"])
					.unlisted(Tier::Faint),
			),
			Step::Political => Some(FocusTemplate::new(&["political", "communal"]).unlisted(Tier::Low)),
			_ => None,
		}
	}

	/// Focus steps annotate the opaque ribbons once their transition ends.
	pub fn has_static_tooltips(self) -> bool {
		matches!(self, Step::Sexist | Step::Political)
	}
}

impl fmt::Display for Step {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.name())
	}
}

impl FromStr for Step {
	type Err = UnknownStep;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Step::ALL
			.into_iter()
			.find(|step| step.name() == s)
			.ok_or_else(|| UnknownStep(s.to_string()))
	}
}

/// Emphasis level of a ribbon under a focus template.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tier {
	High,
	Low,
	Faint,
	/// Does not touch any focus category.
	Off,
}

impl Tier {
	pub fn opacity(self) -> f64 {
		match self {
			Tier::High => 1.0,
			Tier::Low => 0.4,
			Tier::Faint => 0.1,
			Tier::Off => 0.02,
		}
	}
}

/// Highlight rule shared by the focus steps: one or more focus categories
/// and affinity tiers for the categories they connect to.
#[derive(Clone, Debug, PartialEq)]
pub struct FocusTemplate {
	pub focus: Vec<String>,
	pub high: Vec<String>,
	pub low: Vec<String>,
	pub unlisted: Tier,
}

impl FocusTemplate {
	pub fn new(focus: &[&str]) -> Self {
		Self {
			focus: focus.iter().map(|s| s.to_string()).collect(),
			high: Vec::new(),
			low: Vec::new(),
			unlisted: Tier::Faint,
		}
	}

	pub fn high(mut self, labels: &[&str]) -> Self {
		self.high = labels.iter().map(|s| s.to_string()).collect();
		self
	}

	pub fn low(mut self, labels: &[&str]) -> Self {
		self.low = labels.iter().map(|s| s.to_string()).collect();
		self
	}

	pub fn unlisted(mut self, tier: Tier) -> Self {
		self.unlisted = tier;
		self
	}

	/// Bind category names to indices in `labels`. Names absent from the
	/// labels never match.
	pub fn resolve(&self, labels: &[String]) -> ResolvedFocus {
		let indices = |names: &[String]| -> Vec<usize> {
			names
				.iter()
				.filter_map(|n| labels.iter().position(|l| l == n))
				.collect()
		};
		ResolvedFocus {
			focus: indices(&self.focus),
			high: indices(&self.high),
			low: indices(&self.low),
			unlisted: self.unlisted,
		}
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedFocus {
	focus: Vec<usize>,
	high: Vec<usize>,
	low: Vec<usize>,
	unlisted: Tier,
}

impl ResolvedFocus {
	pub fn is_focus(&self, index: usize) -> bool {
		self.focus.contains(&index)
	}

	pub fn touches_focus(&self, chord: &Chord) -> bool {
		self.focus.iter().any(|&f| chord.touches(f))
	}

	pub fn ribbon_tier(&self, chord: &Chord) -> Tier {
		let touched = self.focus.iter().filter(|&&f| chord.touches(f)).count();
		if touched == 0 {
			return Tier::Off;
		}
		if self.focus.len() > 1 && touched == self.focus.len() {
			return Tier::High;
		}
		let (i, j) = (chord.source.index, chord.target.index);
		let (anchor, other) = if self.is_focus(i) { (i, j) } else { (j, i) };
		if other != anchor && self.high.contains(&other) {
			Tier::High
		} else if self.low.contains(&other) {
			Tier::Low
		} else {
			self.unlisted
		}
	}
}

/// How the scene reacts to pointer hover while a step is active.
#[derive(Clone, Debug, PartialEq)]
pub enum InteractionPolicy {
	None,
	/// Hovering an arc fades every ribbon that does not touch it.
	DimUnrelated,
	Focus(FocusTemplate),
}

/// Restyle `scene` for `step`. Geometry is left alone; only fills,
/// opacities, interactivity and the interaction policy change.
pub fn apply_step(scene: &mut Scene, step: Step, animated: bool, now: f64) {
	let duration = if animated { TRANSITION_MS } else { 0.0 };

	scene.tooltips.clear();
	scene.hovered_arc = None;
	scene.step = Some(step);

	match step {
		Step::Grayscale => {
			scene.policy = InteractionPolicy::None;
			for ribbon in &mut scene.ribbons {
				ribbon.fill = Paint::Color(GRAYSCALE_RIBBON.to_string());
				ribbon.opacity.animate_to(0.3, now, duration);
				ribbon.interactive = false;
			}
			for arc in &mut scene.arcs {
				arc.fill = MUTED_ARC.to_string();
				arc.opacity.animate_to(0.4, now, duration);
				arc.label_fill = LABEL_MUTED.to_string();
			}
			scene.caption.opacity.animate_to(0.0, now, duration);
		}
		Step::Intro => {
			scene.policy = InteractionPolicy::None;
			for ribbon in &mut scene.ribbons {
				ribbon.opacity.animate_to(0.0, now, duration);
				ribbon.interactive = false;
			}
			for arc in &mut scene.arcs {
				arc.fill = scene.colors.color(arc.index).to_string();
				arc.opacity.animate_to(0.35, now, duration);
				arc.label_fill = LABEL_DARK.to_string();
			}
			scene.caption.opacity.animate_to(1.0, now, duration);
		}
		Step::Explainer | Step::Full | Step::End => {
			scene.policy = InteractionPolicy::DimUnrelated;
			for ribbon in &mut scene.ribbons {
				ribbon.fill = Paint::Gradient(ribbon.gradient_id.clone());
				ribbon.opacity.animate_to(0.9, now, duration);
				ribbon.interactive = true;
			}
			for arc in &mut scene.arcs {
				arc.fill = scene.colors.color(arc.index).to_string();
				arc.opacity.animate_to(1.0, now, duration);
				arc.label_fill = LABEL_DARK.to_string();
			}
			scene.caption.opacity.animate_to(0.0, now, duration);
		}
		Step::Sexist | Step::Political => {
			let Some(template) = step.focus_template() else {
				return;
			};
			let focus = template.resolve(&scene.labels);
			for ribbon in &mut scene.ribbons {
				ribbon.fill = Paint::Gradient(ribbon.gradient_id.clone());
				let tier = focus.ribbon_tier(&ribbon.chord);
				ribbon.opacity.animate_to(tier.opacity(), now, duration);
				ribbon.interactive = focus.touches_focus(&ribbon.chord);
			}
			for arc in &mut scene.arcs {
				if focus.is_focus(arc.index) {
					arc.fill = scene.colors.color(arc.index).to_string();
					arc.opacity.animate_to(1.0, now, duration);
					arc.label_fill = LABEL_DARK.to_string();
				} else {
					arc.fill = MUTED_ARC.to_string();
					arc.opacity.animate_to(0.5, now, duration);
					arc.label_fill = LABEL_MUTED.to_string();
				}
			}
			scene.caption.opacity.animate_to(0.0, now, duration);
			scene.policy = InteractionPolicy::Focus(template);
		}
	}
}
