//! Directed chord layout: arc spans per category and ribbon endpoints per
//! nonzero directed pair.

use std::f64::consts::{FRAC_PI_2, TAU};

/// Angular extent of one category on the circle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Group {
	pub index: usize,
	pub start_angle: f64,
	pub end_angle: f64,
	pub value: f64,
}

impl Group {
	pub fn mid_angle(&self) -> f64 {
		(self.start_angle + self.end_angle) / 2.0
	}
}

/// One end of a ribbon, a slice of its category's arc.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChordEnd {
	pub index: usize,
	pub start_angle: f64,
	pub end_angle: f64,
	pub value: f64,
}

impl ChordEnd {
	pub fn mid_angle(&self) -> f64 {
		(self.start_angle + self.end_angle) / 2.0
	}
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Chord {
	pub source: ChordEnd,
	pub target: ChordEnd,
}

impl Chord {
	pub fn touches(&self, index: usize) -> bool {
		self.source.index == index || self.target.index == index
	}

	/// Key shared by `(i, j)` and `(j, i)`.
	pub fn unordered_key(&self) -> (usize, usize) {
		let (i, j) = (self.source.index, self.target.index);
		(i.min(j), i.max(j))
	}
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChordLayout {
	pub groups: Vec<Group>,
	pub chords: Vec<Chord>,
}

struct Subgroup {
	other: usize,
	inbound: bool,
	value: f64,
}

/// Point at `radius` along `angle`, where angle 0 is up and angles grow
/// clockwise.
pub fn polar(angle: f64, radius: f64) -> (f64, f64) {
	let a = angle - FRAC_PI_2;
	(a.cos() * radius, a.sin() * radius)
}

/// Lay out `matrix` around the full circle with `pad_angle` between groups.
///
/// A group's span is proportional to its outbound plus inbound magnitude.
/// Within a group, slots are ordered by descending magnitude, ties keeping
/// inbound slots (highest source index first) ahead of outbound ones.
pub fn chord_layout(matrix: &[Vec<f64>], pad_angle: f64) -> ChordLayout {
	let n = matrix.len();
	if n == 0 {
		return ChordLayout::default();
	}
	let at = |i: usize, j: usize| -> f64 {
		matrix
			.get(i)
			.and_then(|row| row.get(j))
			.copied()
			.filter(|v| v.is_finite() && *v > 0.0)
			.unwrap_or(0.0)
	};

	let sums: Vec<f64> = (0..n)
		.map(|i| (0..n).map(|j| at(i, j) + at(j, i)).sum())
		.collect();
	let total: f64 = sums.iter().sum();
	let k = if total > 0.0 {
		(TAU - pad_angle * n as f64).max(0.0) / total
	} else {
		0.0
	};
	let dx = if k > 0.0 { pad_angle } else { TAU / n as f64 };

	let mut sources: Vec<Option<ChordEnd>> = vec![None; n * n];
	let mut targets: Vec<Option<ChordEnd>> = vec![None; n * n];
	let mut groups = Vec::with_capacity(n);
	let mut x = 0.0;

	for i in 0..n {
		let x0 = x;
		let mut subgroups: Vec<Subgroup> = (0..n)
			.rev()
			.filter(|&j| at(j, i) > 0.0)
			.map(|j| Subgroup {
				other: j,
				inbound: true,
				value: at(j, i),
			})
			.chain((0..n).filter(|&j| at(i, j) > 0.0).map(|j| Subgroup {
				other: j,
				inbound: false,
				value: at(i, j),
			}))
			.collect();
		subgroups.sort_by(|a, b| b.value.total_cmp(&a.value));

		for sub in subgroups {
			let end = ChordEnd {
				index: i,
				start_angle: x,
				end_angle: x + sub.value * k,
				value: sub.value,
			};
			x = end.end_angle;
			if sub.inbound {
				targets[sub.other * n + i] = Some(end);
			} else {
				sources[i * n + sub.other] = Some(end);
			}
		}
		groups.push(Group {
			index: i,
			start_angle: x0,
			end_angle: x,
			value: sums[i],
		});
		x += dx;
	}

	let chords = sources
		.into_iter()
		.zip(targets)
		.filter_map(|(source, target)| Some(Chord {
			source: source?,
			target: target?,
		}))
		.collect();

	ChordLayout { groups, chords }
}

#[cfg(test)]
mod tests {
	use super::*;

	const PAD: f64 = 0.05;

	fn approx(a: f64, b: f64) -> bool {
		(a - b).abs() < 1e-9
	}

	fn sample() -> Vec<Vec<f64>> {
		vec![
			vec![2.0, 5.0, 0.0],
			vec![1.0, 0.0, 3.0],
			vec![0.0, 0.0, 0.0],
		]
	}

	#[test]
	fn one_group_per_label_and_one_chord_per_directed_pair() {
		let layout = chord_layout(&sample(), PAD);
		assert_eq!(layout.groups.len(), 3);
		// (0,0) (0,1) (1,0) (1,2)
		assert_eq!(layout.chords.len(), 4);
		let pairs: Vec<_> = layout
			.chords
			.iter()
			.map(|c| (c.source.index, c.target.index))
			.collect();
		assert_eq!(pairs, vec![(0, 0), (0, 1), (1, 0), (1, 2)]);
	}

	#[test]
	fn groups_partition_the_circle_minus_padding() {
		let layout = chord_layout(&sample(), PAD);
		let spans: f64 = layout.groups.iter().map(|g| g.end_angle - g.start_angle).sum();
		assert!(approx(spans + 3.0 * PAD, TAU));
		for pair in layout.groups.windows(2) {
			assert!(approx(pair[1].start_angle - pair[0].end_angle, PAD));
		}
	}

	#[test]
	fn span_is_proportional_to_inbound_plus_outbound() {
		let layout = chord_layout(&sample(), PAD);
		// totals: g0 = 7 + 3 = 10, g1 = 4 + 5 = 9, g2 = 0 + 3 = 3
		let k = (TAU - 3.0 * PAD) / 22.0;
		let span = |g: &Group| g.end_angle - g.start_angle;
		assert!(approx(span(&layout.groups[0]), 10.0 * k));
		assert!(approx(span(&layout.groups[1]), 9.0 * k));
		assert!(approx(span(&layout.groups[2]), 3.0 * k));
	}

	#[test]
	fn subgroups_sorted_descending() {
		let layout = chord_layout(&sample(), PAD);
		let first = layout.groups[0].start_angle;
		let biggest = layout
			.chords
			.iter()
			.find(|c| c.source.index == 0 && c.target.index == 1)
			.unwrap();
		assert!(approx(biggest.source.start_angle, first));
	}

	#[test]
	fn all_zero_matrix_has_no_chords_and_no_nan() {
		let layout = chord_layout(&[vec![0.0, 0.0], vec![0.0, 0.0]], PAD);
		assert!(layout.chords.is_empty());
		assert!(layout.groups.iter().all(|g| g.start_angle.is_finite() && g.end_angle.is_finite()));
		assert!(approx(layout.groups[1].start_angle, TAU / 2.0));
	}

	#[test]
	fn polar_zero_points_up() {
		let (x, y) = polar(0.0, 10.0);
		assert!(approx(x, 0.0));
		assert!(approx(y, -10.0));
		let (x, y) = polar(FRAC_PI_2, 10.0);
		assert!(approx(x, 10.0));
		assert!(approx(y, 0.0));
	}
}
