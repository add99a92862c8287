use log::{debug, info};

use super::scene::{Scene, TRANSITION_MS};
use super::step::{Step, apply_step};
use super::tooltip::{TextMeasure, build_callouts};
use crate::data::DataContext;

/// Deferred static-tooltip draw, valid only for the scene and step that
/// scheduled it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PendingTooltips {
	pub generation: u64,
	pub step: Step,
	pub due_at: f64,
}

/// Everything one diagram container owns: at most one scene, the data
/// context it was built with, and the pending tooltip task.
#[derive(Debug, Default)]
pub struct ChordState {
	scene: Option<Scene>,
	context: DataContext,
	pending: Option<PendingTooltips>,
	generation: u64,
}

impl ChordState {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn scene(&self) -> Option<&Scene> {
		self.scene.as_ref()
	}

	pub fn pending(&self) -> Option<PendingTooltips> {
		self.pending
	}

	/// Replace whatever scene exists with a new one styled for `step`
	/// without animation.
	pub fn render_chord(
		&mut self,
		labels: &[String],
		matrix: &[Vec<f64>],
		step: Step,
		context: &DataContext,
		now: f64,
	) {
		self.generation += 1;
		info!(
			"Rendering chord scene #{} ({} categories) at step {step}",
			self.generation,
			labels.len()
		);
		self.context = context.clone();
		let mut scene = Scene::build(self.generation, labels, matrix, context);
		apply_step(&mut scene, step, false, now);
		self.scene = Some(scene);
		self.schedule_tooltips(step, now);
	}

	/// Move the existing scene to `step` with animation, rebuilding geometry
	/// in place. Falls back to [`Self::render_chord`] when nothing is rendered.
	pub fn update_chord(
		&mut self,
		labels: &[String],
		matrix: &[Vec<f64>],
		step: Step,
		context: &DataContext,
		now: f64,
	) {
		if self.scene.is_none() {
			self.render_chord(labels, matrix, step, context, now);
			return;
		}
		let Some(scene) = self.scene.as_mut() else {
			return;
		};
		info!("Updating chord scene #{} to step {step}", scene.generation);

		scene.caption.displayed = step != Step::Grayscale;
		if step == Step::Full {
			scene.hovered_arc = None;
			scene.tooltips.visible = false;
		}
		self.context = context.clone();
		scene.rebuild_geometry(labels, matrix, context);
		apply_step(scene, step, true, now);
		self.schedule_tooltips(step, now);
	}

	fn schedule_tooltips(&mut self, step: Step, now: f64) {
		if let Some(old) = self.pending.take() {
			debug!("Cancelled pending {} tooltips", old.step);
		}
		let Some(scene) = &self.scene else {
			return;
		};
		if step.has_static_tooltips() {
			self.pending = Some(PendingTooltips {
				generation: scene.generation,
				step,
				due_at: now + TRANSITION_MS,
			});
		}
	}

	/// Run the pending tooltip draw once it is due. Returns whether callouts
	/// were drawn.
	pub fn tick(&mut self, now: f64, measure: &dyn TextMeasure) -> bool {
		match self.pending {
			Some(p) if now >= p.due_at => {}
			_ => return false,
		}
		let Some(pending) = self.pending.take() else {
			return false;
		};
		let Some(scene) = self.scene.as_mut() else {
			return false;
		};
		if scene.generation != pending.generation || scene.step != Some(pending.step) {
			debug!("Dropped stale {} tooltips", pending.step);
			return false;
		}
		let callouts = build_callouts(scene, &self.context, measure, now);
		debug!("Drew {} static tooltips for {}", callouts.len(), pending.step);
		scene.tooltips.callouts = callouts;
		scene.tooltips.visible = true;
		true
	}

	pub fn hover_arc(&mut self, arc: Option<usize>) {
		if let Some(scene) = self.scene.as_mut() {
			scene.hover_arc(arc);
		}
	}

	/// Drop the scene and anything scheduled against it.
	pub fn clear(&mut self) {
		self.scene = None;
		self.pending = None;
	}
}
