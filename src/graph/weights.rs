use std::collections::BTreeMap;

use ndarray::{Array2, ArrayView1, Axis};

/// Node weights stored as a dense (rows × series) matrix with named columns.
#[derive(Clone, Debug, Default)]
pub struct WeightMatrix {
    series: BTreeMap<String, usize>, // series name -> column index
    values: Array2<f64>,             // (rows, series)
}

impl WeightMatrix {
    /// Build a matrix of `rows` rows from named columns.
    /// Panics if any column has the wrong length or a name repeats.
    pub fn new(rows: usize, columns: Vec<(String, Vec<f64>)>) -> Self {
        let mut series = BTreeMap::new();
        let mut values = Array2::zeros((rows, columns.len()));
        for (col, (name, data)) in columns.into_iter().enumerate() {
            assert!(data.len() == rows, "series '{name}' has {} rows, expected {rows}", data.len());
            assert!(series.insert(name.clone(), col).is_none(), "series '{name}' given twice");
            values.column_mut(col).iter_mut().zip(data).for_each(|(v, d)| *v = d);
        }

        Self { series, values }
    }

    /// Create a zeroed matrix with the same series and a different row count.
    pub fn copy_of_size(&self, rows: usize) -> Self {
        Self {
            series: self.series.clone(),
            values: Array2::zeros((rows, self.series.len())),
        }
    }

    /// Number of rows.
    #[inline] pub fn rows(&self) -> usize { self.values.nrows() }

    /// Check whether a series is present.
    #[inline] pub fn contains(&self, series: &str) -> bool { self.series.contains_key(series) }

    /// Names of all series, in sorted order.
    pub fn series_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.series.keys().map(String::as_str)
    }

    /// Value of `series` at `row`, or None if the series is unknown.
    #[inline]
    pub fn get(&self, series: &str, row: usize) -> Option<f64> {
        self.series.get(series).map(|&col| self.values[[row, col]])
    }

    /// The full column for `series`.
    pub fn column(&self, series: &str) -> Option<ArrayView1<'_, f64>> {
        self.series.get(series).map(|&col| self.values.column(col))
    }

    /// Column sum for `series`.
    pub fn total(&self, series: &str) -> Option<f64> {
        self.column(series).map(|c| c.sum())
    }

    /// Set every value to zero.
    pub fn clear_all_rows(&mut self) { self.values.fill(0.0) }

    /// Add row `src_row` of `src` into row `row`.
    pub fn add_row_from(&mut self, row: usize, src: &WeightMatrix, src_row: usize) {
        debug_assert!(self.series == src.series, "series layout mismatch");
        let mut dst = self.values.row_mut(row);
        dst += &src.values.row(src_row);
    }

    /// Subtract row `src_row` of `src` from row `row`.
    pub fn subtract_row_from(&mut self, row: usize, src: &WeightMatrix, src_row: usize) {
        debug_assert!(self.series == src.series, "series layout mismatch");
        let mut dst = self.values.row_mut(row);
        dst -= &src.values.row(src_row);
    }

    /// Add the sum of rows `src_rows` of `src` into row `row`.
    pub fn add_rows_from(&mut self, row: usize, src: &WeightMatrix, src_rows: &[usize]) {
        let sum = src.values.select(Axis(0), src_rows).sum_axis(Axis(0));
        let mut dst = self.values.row_mut(row);
        dst += &sum;
    }

    /// Subtract the sum of rows `src_rows` of `src` from row `row`.
    pub fn subtract_rows_from(&mut self, row: usize, src: &WeightMatrix, src_rows: &[usize]) {
        let sum = src.values.select(Axis(0), src_rows).sum_axis(Axis(0));
        let mut dst = self.values.row_mut(row);
        dst -= &sum;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_weights() -> WeightMatrix {
        WeightMatrix::new(3, vec![
            ("POP".to_string(), vec![10.0, 20.0, 30.0]),
            ("VAP".to_string(), vec![8.0, 15.0, 21.0]),
        ])
    }

    #[test]
    fn lookup_by_name() {
        let w = make_weights();
        assert_eq!(w.rows(), 3);
        assert!(w.contains("POP"));
        assert!(!w.contains("BVAP"));
        assert_eq!(w.get("VAP", 1), Some(15.0));
        assert_eq!(w.get("BVAP", 1), None);
        assert_eq!(w.total("POP"), Some(60.0));
        assert_eq!(w.series_names().collect::<Vec<_>>(), vec!["POP", "VAP"]);
    }

    #[test]
    fn row_arithmetic() {
        let w = make_weights();
        let mut parts = w.copy_of_size(2);
        assert_eq!(parts.get("POP", 0), Some(0.0));

        parts.add_rows_from(0, &w, &[0, 2]);
        parts.add_row_from(1, &w, 1);
        assert_eq!(parts.get("POP", 0), Some(40.0));
        assert_eq!(parts.get("VAP", 1), Some(15.0));

        parts.subtract_row_from(0, &w, 2);
        parts.add_row_from(1, &w, 2);
        assert_eq!(parts.get("POP", 0), Some(10.0));
        assert_eq!(parts.get("POP", 1), Some(50.0));

        parts.subtract_rows_from(1, &w, &[1, 2]);
        assert_eq!(parts.get("VAP", 1), Some(0.0));

        parts.clear_all_rows();
        assert_eq!(parts.total("POP"), Some(0.0));
    }

    #[test]
    #[should_panic(expected = "series 'POP' has 2 rows, expected 3")]
    fn new_panics_on_length_mismatch() {
        WeightMatrix::new(3, vec![("POP".to_string(), vec![1.0, 2.0])]);
    }
}
