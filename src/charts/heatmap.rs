//! Year x state matrix behind the heatmap view.

use crate::data::FatalityTable;

/// Dense matrix of the aggregated table: one column per state, one row per year.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeatmapGrid {
    /// Sorted state codes.
    pub states: Vec<String>,
    /// Ascending years, top row first.
    pub years: Vec<i32>,
    cells: Vec<Option<i64>>,
    max: i64,
}

impl HeatmapGrid {
    pub fn from_table(table: &FatalityTable) -> Self {
        let states: Vec<String> = table.states().into_iter().map(str::to_string).collect();
        let mut years = table.years();
        years.reverse();

        let mut cells = vec![None; states.len() * years.len()];
        for row in table.rows() {
            let col = states.iter().position(|s| *s == row.state_code);
            let r = years.iter().position(|y| *y == row.year);
            if let (Some(col), Some(r)) = (col, r) {
                cells[r * states.len() + col] = Some(row.fatalities);
            }
        }

        Self {
            states,
            years,
            cells,
            max: table.max_fatalities(),
        }
    }

    pub fn cols(&self) -> usize {
        self.states.len()
    }

    pub fn rows(&self) -> usize {
        self.years.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn value(&self, col: usize, row: usize) -> Option<i64> {
        if col >= self.cols() || row >= self.rows() {
            return None;
        }
        self.cells[row * self.cols() + col]
    }

    pub fn max(&self) -> i64 {
        self.max
    }

    /// Populated cells as (col, row, fatalities).
    pub fn filled(&self) -> impl Iterator<Item = (usize, usize, i64)> + '_ {
        let cols = self.cols();
        self.cells
            .iter()
            .enumerate()
            .filter_map(move |(i, v)| v.map(|v| (i % cols, i / cols, v)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Aggregator, DataProcessor, Incident};

    fn table() -> FatalityTable {
        let incidents: Vec<Incident> = [
            ("Reno, NV", 2017, 8),
            ("Austin, Texas", 2015, 3),
            ("Waco, TX", 2017, 1),
        ]
        .into_iter()
        .map(|(location, year, fatalities)| Incident {
            location: location.into(),
            year,
            fatalities,
        })
        .collect();
        let (records, _) = DataProcessor::derive(&incidents);
        Aggregator::aggregate(&DataProcessor::to_frame(&records).unwrap()).unwrap()
    }

    #[test]
    fn grid_axes_and_cells() {
        let grid = HeatmapGrid::from_table(&table());
        assert_eq!(grid.states, vec!["NV", "TX"]);
        assert_eq!(grid.years, vec![2015, 2017]);
        assert_eq!(grid.value(0, 0), None);
        assert_eq!(grid.value(1, 0), Some(3));
        assert_eq!(grid.value(0, 1), Some(8));
        assert_eq!(grid.value(1, 1), Some(1));
        assert_eq!(grid.value(5, 5), None);
        assert_eq!(grid.max(), 8);
    }

    #[test]
    fn filled_cells_cover_every_row() {
        let t = table();
        let grid = HeatmapGrid::from_table(&t);
        assert_eq!(grid.filled().count(), t.len());
        let total: i64 = grid.filled().map(|(_, _, v)| v).sum();
        assert_eq!(total, 12);
    }

    #[test]
    fn empty_table_gives_empty_grid() {
        let grid = HeatmapGrid::from_table(&FatalityTable::default());
        assert!(grid.is_empty());
        assert_eq!(grid.filled().count(), 0);
    }
}
