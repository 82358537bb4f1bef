//! Dense result matrices indexed by strategy grids

use std::fmt;

use crate::utils::argmax;

/// A dense row-major matrix of `f64`
///
/// Rows follow the first grid (usually the defender's), columns the second.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl Matrix {
    /// Creates a `rows x cols` matrix filled with zeros
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Matrix {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    /// Builds a matrix from equally long rows
    ///
    /// # Panics
    ///
    /// Panics if the rows differ in length.
    pub fn from_rows(rows: &[Vec<f64>]) -> Self {
        let cols = rows.first().map_or(0, |r| r.len());
        let mut matrix = Matrix::zeros(rows.len(), cols);
        for (i, row) in rows.iter().enumerate() {
            matrix.set_row(i, row);
        }
        matrix
    }

    /// Number of rows
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Returns the entry at `(row, col)`
    ///
    /// # Panics
    ///
    /// Panics if the index is out of bounds.
    pub fn get(&self, row: usize, col: usize) -> f64 {
        assert!(row < self.rows && col < self.cols, "index out of bounds");
        self.data[row * self.cols + col]
    }

    pub(crate) fn set(&mut self, row: usize, col: usize, value: f64) {
        assert!(row < self.rows && col < self.cols, "index out of bounds");
        self.data[row * self.cols + col] = value;
    }

    pub(crate) fn set_row(&mut self, row: usize, values: &[f64]) {
        assert_eq!(values.len(), self.cols, "row length mismatch");
        self.data[row * self.cols..(row + 1) * self.cols].copy_from_slice(values);
    }

    /// Returns one row as a slice
    pub fn row(&self, row: usize) -> &[f64] {
        &self.data[row * self.cols..(row + 1) * self.cols]
    }

    /// Iterates over one column
    pub fn column(&self, col: usize) -> impl Iterator<Item = f64> + '_ {
        assert!(col < self.cols, "index out of bounds");
        self.data.iter().skip(col).step_by(self.cols).copied()
    }

    /// Sum of every row
    pub fn row_sums(&self) -> Vec<f64> {
        (0..self.rows).map(|i| self.row(i).iter().sum()).collect()
    }

    /// Index of the first maximum of every column
    ///
    /// Used to find, for each column, which row attains the best value.
    pub fn column_argmax(&self) -> Vec<usize> {
        (0..self.cols)
            .map(|j| argmax(self.column(j)).unwrap_or(0))
            .collect()
    }
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for i in 0..self.rows {
            let cells: Vec<String> = self.row(i).iter().map(|v| format!("{:.6}", v)).collect();
            writeln!(f, "{}", cells.join(" "))?;
        }
        Ok(())
    }
}
