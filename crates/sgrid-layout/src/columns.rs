#![forbid(unsafe_code)]

//! Shortest-column placement.
//!
//! Lists and grids share one model: a list is a grid with a single column.
//! Items are appended in order, each into the column whose accumulated
//! height is currently smallest (lowest index wins ties).

/// Number of columns that fit `container_width` for items of `item_width`.
///
/// `floor((container + gutter) / (item + gutter))`, never less than one.
#[must_use]
pub fn column_count(container_width: f64, item_width: f64, gutter: f64) -> usize {
    let stride = item_width + gutter;
    if !(stride > 0.0) || !container_width.is_finite() {
        return 1;
    }
    let fit = ((container_width + gutter) / stride).floor();
    if fit >= 1.0 { fit as usize } else { 1 }
}

/// Accumulates column heights while items are placed.
#[derive(Debug, Clone)]
pub struct ColumnPlacer {
    heights: Vec<f64>,
    stride: f64,
    gutter: f64,
}

impl ColumnPlacer {
    /// Create a placer with `columns` columns of width `item_width`.
    #[must_use]
    pub fn new(columns: usize, item_width: f64, gutter: f64) -> Self {
        Self {
            heights: vec![0.0; columns.max(1)],
            stride: item_width + gutter,
            gutter,
        }
    }

    #[must_use]
    pub fn columns(&self) -> usize {
        self.heights.len()
    }

    /// Index of the currently shortest column.
    #[must_use]
    pub fn shortest(&self) -> usize {
        let mut best = 0;
        for (i, &h) in self.heights.iter().enumerate().skip(1) {
            if h < self.heights[best] {
                best = i;
            }
        }
        best
    }

    /// Coordinates the next item would receive, without placing it.
    #[must_use]
    pub fn peek(&self) -> (f64, f64) {
        let col = self.shortest();
        (col as f64 * self.stride, self.heights[col])
    }

    /// Place an item of `height` and return its `(left, top)`.
    pub fn place(&mut self, height: f64) -> (f64, f64) {
        let col = self.shortest();
        let left = col as f64 * self.stride;
        let top = self.heights[col];
        self.heights[col] += height + self.gutter;
        (left, top)
    }

    /// Accumulated height of every column, trailing gutter included.
    #[must_use]
    pub fn heights(&self) -> &[f64] {
        &self.heights
    }

    /// Height of the tallest column without its trailing gutter.
    #[must_use]
    pub fn content_height(&self) -> f64 {
        let tallest = self.heights.iter().copied().fold(0.0, f64::max);
        if tallest > 0.0 {
            (tallest - self.gutter).max(0.0)
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_count_floors_and_clamps() {
        assert_eq!(column_count(1000.0, 300.0, 0.0), 3);
        assert_eq!(column_count(920.0, 300.0, 10.0), 3);
        assert_eq!(column_count(919.0, 300.0, 10.0), 2);
        assert_eq!(column_count(100.0, 300.0, 0.0), 1);
        assert_eq!(column_count(0.0, 0.0, 0.0), 1);
        assert_eq!(column_count(f64::INFINITY, 10.0, 0.0), 1);
    }

    #[test]
    fn single_column_stacks_with_gutter() {
        let mut p = ColumnPlacer::new(1, 300.0, 5.0);
        assert_eq!(p.place(10.0), (0.0, 0.0));
        assert_eq!(p.place(20.0), (0.0, 15.0));
        assert_eq!(p.place(10.0), (0.0, 40.0));
        assert_eq!(p.content_height(), 50.0);
    }

    #[test]
    fn ties_go_to_lowest_column() {
        let mut p = ColumnPlacer::new(3, 100.0, 0.0);
        assert_eq!(p.place(50.0), (0.0, 0.0));
        assert_eq!(p.place(50.0), (100.0, 0.0));
        assert_eq!(p.place(50.0), (200.0, 0.0));
        assert_eq!(p.place(50.0), (0.0, 50.0));
    }

    #[test]
    fn shortest_column_receives_next_item() {
        let mut p = ColumnPlacer::new(2, 100.0, 10.0);
        p.place(200.0);
        p.place(30.0);
        // Column 1 is at 40, column 0 at 210.
        assert_eq!(p.peek(), (110.0, 40.0));
        assert_eq!(p.place(30.0), (110.0, 40.0));
        assert_eq!(p.place(30.0), (110.0, 80.0));
        assert_eq!(p.heights(), &[210.0, 120.0]);
        assert_eq!(p.content_height(), 200.0);
    }

    #[test]
    fn empty_placer_has_zero_content() {
        let p = ColumnPlacer::new(0, 10.0, 4.0);
        assert_eq!(p.columns(), 1);
        assert_eq!(p.content_height(), 0.0);
    }
}
