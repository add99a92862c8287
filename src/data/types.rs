use serde::Deserialize;

use super::FetchError;

/// Square table indexed by category order. `m[i][j]` reads from `i` toward `j`.
pub type Matrix = Vec<Vec<f64>>;

/// Counts resource: `{columns: [string], data: [[number]]}`.
#[derive(Clone, Debug, Deserialize)]
pub(crate) struct CountsResource {
	pub columns: Vec<String>,
	pub data: Matrix,
}

/// Percentage resource: `{data: [[number]]}`.
#[derive(Clone, Debug, Deserialize)]
pub(crate) struct PercentResource {
	pub data: Matrix,
}

/// Everything the diagram needs, loaded once per session.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChordData {
	pub labels: Vec<String>,
	pub matrix: Matrix,
	pub pct_col_matrix: Matrix,
	pub pct_global_matrix: Matrix,
}

impl ChordData {
	/// Percentages packaged for tooltip formatting.
	pub fn context(&self) -> DataContext {
		DataContext {
			pct_col: Some(self.pct_col_matrix.clone()),
			pct_global: Some(self.pct_global_matrix.clone()),
		}
	}

	/// Reject counts or percentage tables that do not match the label order.
	pub(crate) fn validate(&self) -> Result<(), FetchError> {
		let n = self.labels.len();
		for (what, m) in [
			("counts", &self.matrix),
			("column percentages", &self.pct_col_matrix),
			("global percentages", &self.pct_global_matrix),
		] {
			let cols = m.iter().map(Vec::len).find(|&len| len != n).unwrap_or(n);
			if m.len() != n || cols != n {
				return Err(FetchError::Shape {
					what: what.to_string(),
					rows: m.len(),
					cols,
					expected: n,
				});
			}
		}
		Ok(())
	}
}

/// Read-only percentage lookups shared by hover titles and static callouts.
///
/// Absent matrices and out-of-range cells read as zero so text can be
/// produced before data arrives.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DataContext {
	pub pct_col: Option<Matrix>,
	pub pct_global: Option<Matrix>,
}

impl DataContext {
	pub fn pct_col(&self, row: usize, col: usize) -> f64 {
		cell(self.pct_col.as_ref(), row, col)
	}

	pub fn pct_global(&self, row: usize, col: usize) -> f64 {
		cell(self.pct_global.as_ref(), row, col)
	}
}

fn cell(m: Option<&Matrix>, row: usize, col: usize) -> f64 {
	m.and_then(|m| m.get(row))
		.and_then(|r| r.get(col))
		.copied()
		.filter(|v| v.is_finite())
		.unwrap_or(0.0)
}
