//! Directional ribbon gradients.

use super::layout::{Chord, polar};
use super::palette::ColorScale;

/// Linear gradient in scene coordinates, from the source end toward the
/// target end of one ribbon.
#[derive(Clone, Debug, PartialEq)]
pub struct LinearGradient {
	pub id: String,
	pub x1: f64,
	pub y1: f64,
	pub x2: f64,
	pub y2: f64,
	pub from: String,
	pub to: String,
}

/// Replace every non-alphanumeric character with `_`.
pub fn sanitize(s: &str) -> String {
	s.chars()
		.map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
		.collect()
}

pub fn gradient_id(source: &str, target: &str) -> String {
	format!("grad-{}-{}", sanitize(source), sanitize(target))
}

fn label(labels: &[String], index: usize) -> &str {
	labels.get(index).map_or("", String::as_str)
}

/// Gradient id for a chord under `labels`.
pub fn chord_gradient_id(labels: &[String], chord: &Chord) -> String {
	gradient_id(label(labels, chord.source.index), label(labels, chord.target.index))
}

/// One gradient per chord, anchored at each end's midpoint on `inner_radius`.
pub fn build_gradients(
	chords: &[Chord],
	labels: &[String],
	colors: &ColorScale,
	inner_radius: f64,
) -> Vec<LinearGradient> {
	chords
		.iter()
		.map(|chord| {
			let (x1, y1) = polar(chord.source.mid_angle(), inner_radius);
			let (x2, y2) = polar(chord.target.mid_angle(), inner_radius);
			LinearGradient {
				id: chord_gradient_id(labels, chord),
				x1,
				y1,
				x2,
				y2,
				from: colors.color(chord.source.index).to_string(),
				to: colors.color(chord.target.index).to_string(),
			}
		})
		.collect()
}

#[cfg(test)]
mod tests {
	use std::collections::HashSet;

	use super::super::layout::chord_layout;
	use super::*;

	fn categories() -> Vec<String> {
		[
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
		.collect()
	}

	#[test]
	fn sanitize_replaces_non_alphanumerics() {
		assert_eq!(sanitize("queer phobic/2"), "queer_phobic_2");
		assert_eq!(gradient_id("a b", "c"), "grad-a_b-c");
	}

	#[test]
	fn ids_are_unique_for_the_category_set() {
		let labels = categories();
		let mut seen = HashSet::new();
		for a in &labels {
			for b in &labels {
				assert!(seen.insert(gradient_id(a, b)));
			}
		}
		assert_eq!(seen.len(), 49);
	}

	#[test]
	fn endpoints_follow_chord_midpoints() {
		let labels: Vec<String> = vec!["sexist".into(), "racist".into()];
		let layout = chord_layout(&[vec![0.0, 4.0], vec![1.0, 0.0]], 0.05);
		let colors = ColorScale::new(&labels);
		let grads = build_gradients(&layout.chords, &labels, &colors, 315.0);
		assert_eq!(grads.len(), layout.chords.len());

		let chord = &layout.chords[0];
		let g = &grads[0];
		assert_eq!(g.id, "grad-sexist-racist");
		let (x1, y1) = polar(chord.source.mid_angle(), 315.0);
		assert_eq!((g.x1, g.y1), (x1, y1));
		assert!(((g.x2 * g.x2 + g.y2 * g.y2).sqrt() - 315.0).abs() < 1e-9);
		assert_eq!(g.from, "#b07beaff");
		assert_eq!(g.to, "#f05574ff");
	}
}
