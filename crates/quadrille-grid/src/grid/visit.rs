//! Row-major traversal and the filter semantics shared by every operation.

use super::Quadrille;
use crate::value::{Cell, CellValue};

/// One visited cell: coordinates plus a borrow of the slot.
#[derive(Clone, Copy)]
pub struct CellVisit<'a> {
    pub row: i64,
    pub col: i64,
    pub value: &'a Cell,
}

/// Cell selection for [`Quadrille::visit`] and the mutating operations.
///
/// - `All` visits every cell
/// - `Empty` / `Filled` select by the emptiness predicate
/// - `Value` selects cells equal to a single value
/// - `AnyOf` selects cells whose value is contained in a collection
/// - `Where` evaluates a predicate over `{row, col, value}`
pub enum Filter<'a> {
    All,
    Empty,
    Filled,
    Value(&'a CellValue),
    AnyOf(&'a [CellValue]),
    Where(&'a dyn Fn(&CellVisit<'_>) -> bool),
}

impl Filter<'_> {
    pub fn matches(&self, cell: &CellVisit<'_>) -> bool {
        match self {
            Filter::All => true,
            Filter::Empty => cell.value.is_none(),
            Filter::Filled => cell.value.is_some(),
            Filter::Value(needle) => cell.value.as_ref() == Some(*needle),
            Filter::AnyOf(values) => match cell.value {
                Some(v) => values.contains(v),
                None => false,
            },
            Filter::Where(predicate) => predicate(cell),
        }
    }
}

impl Quadrille {
    /// Visits matching cells in row-major order (row 0..height, within each
    /// row col 0..width). Never short-circuits.
    pub fn visit<F>(&self, filter: &Filter<'_>, mut callback: F)
    where
        F: FnMut(CellVisit<'_>),
    {
        for (row, cells) in self.memory().iter().enumerate() {
            for (col, value) in cells.iter().enumerate() {
                let cell = CellVisit {
                    row: row as i64,
                    col: col as i64,
                    value,
                };
                if filter.matches(&cell) {
                    callback(cell);
                }
            }
        }
    }

    /// Coordinates of matching cells, for operations that mutate while
    /// traversing.
    pub(crate) fn coords(&self, filter: &Filter<'_>) -> Vec<(i64, i64)> {
        let mut out = Vec::new();
        self.visit(filter, |cell| out.push((cell.row, cell.col)));
        out
    }
}
