//! Dense Matrix
//!
//! 行主序的方阵，只提供中心性计算需要的运算

use super::CentralityError;

/// 主元绝对值低于该值时视为奇异
const SINGULAR_EPSILON: f64 = 1e-12;

#[derive(Debug, Clone, PartialEq)]
pub struct DenseMatrix {
    size: usize,
    data: Vec<f64>,
}

impl DenseMatrix {
    pub fn zeros(size: usize) -> Self {
        Self {
            size,
            data: vec![0.0; size * size],
        }
    }

    pub fn identity(size: usize) -> Self {
        let mut matrix = Self::zeros(size);
        for i in 0..size {
            matrix.set(i, i, 1.0);
        }
        matrix
    }

    pub fn from_rows(rows: &[Vec<f64>]) -> Self {
        let size = rows.len();
        let mut matrix = Self::zeros(size);
        for (i, row) in rows.iter().enumerate() {
            for (j, value) in row.iter().take(size).enumerate() {
                matrix.set(i, j, *value);
            }
        }
        matrix
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row * self.size + col]
    }

    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        self.data[row * self.size + col] = value;
    }

    pub fn column_sums(&self) -> Vec<f64> {
        let mut sums = vec![0.0; self.size];
        for i in 0..self.size {
            for (j, sum) in sums.iter_mut().enumerate() {
                *sum += self.get(i, j);
            }
        }
        sums
    }

    /// 每列除以列和，全零列保持不变
    pub fn normalized_by_columns(&self) -> Self {
        let sums = self.column_sums();
        let mut normalized = self.clone();
        for i in 0..self.size {
            for (j, sum) in sums.iter().enumerate() {
                if *sum != 0.0 {
                    normalized.set(i, j, self.get(i, j) / sum);
                }
            }
        }
        normalized
    }

    pub fn transpose(&self) -> Self {
        let mut transposed = Self::zeros(self.size);
        for i in 0..self.size {
            for j in 0..self.size {
                transposed.set(j, i, self.get(i, j));
            }
        }
        transposed
    }

    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            size: self.size,
            data: self.data.iter().map(|v| v * factor).collect(),
        }
    }

    pub fn subtract(&self, other: &Self) -> Self {
        Self {
            size: self.size,
            data: self
                .data
                .iter()
                .zip(&other.data)
                .map(|(a, b)| a - b)
                .collect(),
        }
    }

    pub fn mul_vec(&self, vector: &[f64]) -> Vec<f64> {
        (0..self.size)
            .map(|i| {
                (0..self.size)
                    .map(|j| self.get(i, j) * vector[j])
                    .sum::<f64>()
            })
            .collect()
    }

    /// 直接求解 `self · x = rhs`（列主元高斯消元）
    pub fn solve(&self, rhs: &[f64]) -> Result<Vec<f64>, CentralityError> {
        let n = self.size;
        let mut a = self.clone();
        let mut b = rhs.to_vec();

        for col in 0..n {
            let pivot_row = (col..n)
                .max_by(|&x, &y| a.get(x, col).abs().total_cmp(&a.get(y, col).abs()))
                .unwrap_or(col);
            let pivot = a.get(pivot_row, col);
            if pivot.abs() < SINGULAR_EPSILON {
                return Err(CentralityError::SingularSystem { pivot });
            }

            if pivot_row != col {
                for j in 0..n {
                    let tmp = a.get(col, j);
                    a.set(col, j, a.get(pivot_row, j));
                    a.set(pivot_row, j, tmp);
                }
                b.swap(col, pivot_row);
            }

            for row in col + 1..n {
                let factor = a.get(row, col) / pivot;
                if factor == 0.0 {
                    continue;
                }
                for j in col..n {
                    a.set(row, j, a.get(row, j) - factor * a.get(col, j));
                }
                b[row] -= factor * b[col];
            }
        }

        // 回代
        let mut x = vec![0.0; n];
        for row in (0..n).rev() {
            let tail: f64 = (row + 1..n).map(|j| a.get(row, j) * x[j]).sum();
            x[row] = (b[row] - tail) / a.get(row, row);
        }

        Ok(x)
    }

    /// 全源最短路径（Floyd-Warshall）
    ///
    /// 非对角线上的零元素视为无边，不可达距离为 ∞，对角线为 0
    pub fn shortest_paths(&self) -> Self {
        let n = self.size;
        let mut dist = Self::zeros(n);
        for i in 0..n {
            for j in 0..n {
                let weight = self.get(i, j);
                let value = if i == j {
                    0.0
                } else if weight == 0.0 {
                    f64::INFINITY
                } else {
                    weight
                };
                dist.set(i, j, value);
            }
        }

        for k in 0..n {
            for i in 0..n {
                let via = dist.get(i, k);
                if via.is_infinite() {
                    continue;
                }
                for j in 0..n {
                    let candidate = via + dist.get(k, j);
                    if candidate < dist.get(i, j) {
                        dist.set(i, j, candidate);
                    }
                }
            }
        }

        dist
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalized_by_columns_skips_zero_columns() {
        let m = DenseMatrix::from_rows(&[
            vec![0.0, 1.0, 0.0],
            vec![1.0, 0.0, 0.0],
            vec![1.0, 1.0, 0.0],
        ]);
        let n = m.normalized_by_columns();
        assert_eq!(n.column_sums(), vec![1.0, 1.0, 0.0]);
        assert_eq!(n.get(1, 0), 0.5);
    }

    #[test]
    fn test_solve() {
        let m = DenseMatrix::from_rows(&[vec![0.0, 2.0], vec![1.0, 1.0]]);
        let x = m.solve(&[4.0, 3.0]).unwrap();
        assert!((x[0] - 1.0).abs() < 1e-12);
        assert!((x[1] - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_solve_singular() {
        let m = DenseMatrix::from_rows(&[vec![1.0, -1.0], vec![-1.0, 1.0]]);
        assert!(matches!(
            m.solve(&[1.0, 1.0]),
            Err(CentralityError::SingularSystem { .. })
        ));
    }

    #[test]
    fn test_shortest_paths() {
        // 0 -> 1 -> 2，2 不可回到 0
        let m = DenseMatrix::from_rows(&[
            vec![0.0, 1.0, 0.0],
            vec![0.0, 0.0, 1.0],
            vec![0.0, 0.0, 0.0],
        ]);
        let d = m.shortest_paths();
        assert_eq!(d.get(0, 2), 2.0);
        assert_eq!(d.get(1, 1), 0.0);
        assert!(d.get(2, 0).is_infinite());
    }

    #[test]
    fn test_transpose_and_mul_vec() {
        let m = DenseMatrix::from_rows(&[vec![1.0, 2.0], vec![3.0, 4.0]]);
        assert_eq!(m.transpose().get(0, 1), 3.0);
        assert_eq!(m.mul_vec(&[1.0, 1.0]), vec![3.0, 7.0]);
        let diff = DenseMatrix::identity(2).subtract(&m.scaled(0.5));
        assert_eq!(diff.get(0, 0), 0.5);
        assert_eq!(diff.get(1, 0), -1.5);
    }
}
