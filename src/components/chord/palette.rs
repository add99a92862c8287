//! Category colours.

/// Used for any label missing from the palette.
pub const FALLBACK_COLOR: &str = "#999";
pub const MUTED_ARC: &str = "#ccc";
pub const GRAYSCALE_RIBBON: &str = "#f2e463ff";
pub const LABEL_DARK: &str = "#222";
pub const LABEL_MUTED: &str = "#999";

const CATEGORY_COLORS: &[(&str, &str)] = &[
	("sexist", "#b07beaff"),
	("political", "#f1e128ff"),
	("communal", "#b8e27d"),
	("casteist", "#4ae2cdff"),
	("racist", "#f05574ff"),
	("queerphobic", "#feb744ff"),
	("ablelist", "#7c7acaff"),
];

/// Ordinal mapping from label order to colour.
#[derive(Clone, Debug, PartialEq)]
pub struct ColorScale {
	colors: Vec<String>,
}

impl ColorScale {
	pub fn new(labels: &[String]) -> Self {
		let colors = labels
			.iter()
			.map(|label| {
				CATEGORY_COLORS
					.iter()
					.find(|(name, _)| *name == label.as_str())
					.map_or(FALLBACK_COLOR, |&(_, c)| c)
					.to_string()
			})
			.collect();
		Self { colors }
	}

	/// Colour of the category at `index`.
	pub fn color(&self, index: usize) -> &str {
		self.colors.get(index).map_or(FALLBACK_COLOR, String::as_str)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn known_and_unknown_labels() {
		let scale = ColorScale::new(&["racist".into(), "other".into()]);
		assert_eq!(scale.color(0), "#f05574ff");
		assert_eq!(scale.color(1), FALLBACK_COLOR);
		assert_eq!(scale.color(9), FALLBACK_COLOR);
	}
}
