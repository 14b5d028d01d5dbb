use rand::Rng;
use std::ops::{AddAssign, Index, IndexMut};

/// Dense row-major matrix. Rows are origin units, columns destination units.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix{
    pub rows: usize,
    pub cols: usize,
    pub data: Vec<Vec<f64>>
}

impl Matrix{
    pub fn zeros(rows: usize, cols: usize) -> Matrix {
        Matrix{
            rows,
            cols,
            data: vec![vec![0.0; cols]; rows]
        }
    }

    /// Uniform initialization on [-0.5, 0.5).
    pub fn random<R: Rng + ?Sized>(rows: usize, cols: usize, rng: &mut R) -> Matrix {
        let mut res = Matrix::zeros(rows, cols);

        for i in 0..rows {
            for j in 0..cols {
                res.data[i][j] = rng.gen::<f64>() - 0.5;
            }
        }

        res
    }

    pub fn from_data(data: Vec<Vec<f64>>) -> Matrix {
        let cols = data.first().map_or(0, |row| row.len());
        if data.iter().any(|row| row.len() != cols) {
            panic!("Matrix rows must all have the same length")
        }
        Matrix {
            rows: data.len(),
            cols,
            data
        }
    }

    /// Resets every entry to zero without reallocating.
    pub fn clear(&mut self) {
        for row in &mut self.data {
            row.iter_mut().for_each(|x| *x = 0.0);
        }
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }
}

impl AddAssign<&Matrix> for Matrix {
    fn add_assign(&mut self, rhs: &Matrix) {
        if self.rows != rhs.rows || self.cols != rhs.cols {
            panic!("Matrices are of incorrect sizes")
        }

        for (row, rhs_row) in self.data.iter_mut().zip(rhs.data.iter()) {
            for (x, y) in row.iter_mut().zip(rhs_row.iter()) {
                *x += y;
            }
        }
    }
}

impl Index<(usize, usize)> for Matrix {
    type Output = f64;

    fn index(&self, (row, col): (usize, usize)) -> &f64 {
        &self.data[row][col]
    }
}

impl IndexMut<(usize, usize)> for Matrix {
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut f64 {
        &mut self.data[row][col]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn random_values_stay_in_half_unit_range() {
        let mut rng = StdRng::seed_from_u64(7);
        let m = Matrix::random(5, 4, &mut rng);
        assert_eq!(m.shape(), (5, 4));
        assert!(m.data.iter().flatten().all(|&x| (-0.5..0.5).contains(&x)));
    }

    #[test]
    fn same_seed_gives_same_matrix() {
        let a = Matrix::random(3, 3, &mut StdRng::seed_from_u64(42));
        let b = Matrix::random(3, 3, &mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }

    #[test]
    fn add_assign_is_elementwise() {
        let mut a = Matrix::from_data(vec![vec![1.0, 2.0], vec![3.0, 4.0]]);
        let b = Matrix::from_data(vec![vec![0.5, -2.0], vec![1.0, 0.0]]);
        a += &b;
        assert_eq!(a.data, vec![vec![1.5, 0.0], vec![4.0, 4.0]]);
    }

    #[test]
    #[should_panic(expected = "incorrect sizes")]
    fn add_assign_rejects_mismatched_shapes() {
        let mut a = Matrix::zeros(2, 2);
        a += &Matrix::zeros(3, 2);
    }

    #[test]
    fn clear_keeps_shape() {
        let mut a = Matrix::from_data(vec![vec![1.0, 2.0, 3.0]]);
        a.clear();
        assert_eq!(a, Matrix::zeros(1, 3));
    }

    #[test]
    fn index_reads_row_then_column() {
        let mut a = Matrix::zeros(2, 3);
        a[(1, 2)] = 9.0;
        assert_eq!(a.data[1][2], 9.0);
        assert_eq!(a[(1, 2)], 9.0);
    }
}
