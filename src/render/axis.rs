use std::collections::HashMap;
use std::ops::Range;

use crate::data::Cell;

use super::padded_range;

/// Positions for x values: numeric as-is, or categories placed at
/// 0, 1, 2, ... in order of first appearance.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum XAxis {
    Numeric(Vec<f64>),
    Categorical { positions: Vec<f64>, names: Vec<String> },
}

impl XAxis {
    /// Numeric when no cell holds text; missing cells become NaN.
    pub(crate) fn from_cells(cells: &[Cell]) -> Self {
        if !cells.iter().any(|c| matches!(c, Cell::Text(_))) {
            return XAxis::Numeric(cells.iter().map(|c| c.as_f64().unwrap_or(f64::NAN)).collect());
        }

        let mut index: HashMap<String, usize> = HashMap::new();
        let mut names = Vec::new();
        let positions = cells
            .iter()
            .map(|cell| {
                if *cell == Cell::Missing {
                    return f64::NAN;
                }
                let label = cell.label();
                let next = names.len();
                let idx = *index.entry(label.clone()).or_insert_with(|| {
                    names.push(label);
                    next
                });
                idx as f64
            })
            .collect();

        XAxis::Categorical { positions, names }
    }

    pub(crate) fn positions(&self) -> &[f64] {
        match self {
            XAxis::Numeric(values) => values,
            XAxis::Categorical { positions, .. } => positions,
        }
    }

    pub(crate) fn categories(&self) -> Option<&[String]> {
        match self {
            XAxis::Numeric(_) => None,
            XAxis::Categorical { names, .. } => Some(names),
        }
    }

    /// Axis range covering `used` positions, with half a slot of room
    /// around categories. `halfwidth` widens numeric ranges for bars.
    pub(crate) fn range(&self, used: impl IntoIterator<Item = f64>, halfwidth: f64) -> Range<f64> {
        match self {
            XAxis::Categorical { names, .. } if !names.is_empty() => {
                -0.5..(names.len() as f64 - 0.5)
            }
            _ => {
                let values: Vec<f64> = used.into_iter().filter(|v| v.is_finite()).collect();
                let lo = values.iter().cloned().fold(f64::INFINITY, f64::min) - halfwidth;
                let hi = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max) + halfwidth;
                padded_range([lo, hi])
            }
        }
    }
}
