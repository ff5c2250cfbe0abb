//! Value types shared by the marshalling and session layers.
//!
//! The local side of the bridge works with plain `f64` scalars, `Vec<f64>`
//! vectors and the dense 2-D [`Matrix`] defined here. The engine side is
//! represented by [`EngineArray`], a dimension-tagged flat buffer in the
//! engine's column-major order. Conversion between the two lives in
//! `matlink-marshal`; this crate only defines the shapes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Element type of the local numeric types.
pub type Scalar = f64;

/// Vectors carry no row/column ambiguity and stay plain `Vec`s.
pub type Vector = Vec<Scalar>;

/// Storage order of a [`Matrix`] buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Layout {
    RowMajor,
    ColumnMajor,
}

/// Dense 2-D matrix with an explicit storage-order tag.
///
/// The tag records the order of `data`; callers pick whichever order their
/// producer emits naturally and the marshaller normalizes to the engine's
/// column-major convention during encode.
#[derive(Debug, Clone)]
pub struct Matrix {
    pub data: Vec<Scalar>,
    pub rows: usize,
    pub cols: usize,
    pub layout: Layout,
}

impl Matrix {
    pub fn new(data: Vec<Scalar>, rows: usize, cols: usize, layout: Layout) -> Result<Self, String> {
        if rows * cols != data.len() {
            return Err(format!(
                "Matrix data length {} doesn't match dimensions {}x{}",
                data.len(),
                rows,
                cols
            ));
        }
        Ok(Matrix { data, rows, cols, layout })
    }

    /// Build from row slices, stored row-major.
    pub fn from_rows(rows: &[Vec<Scalar>]) -> Result<Self, String> {
        let r = rows.len();
        let c = rows.first().map(|row| row.len()).unwrap_or(0);
        let mut data = Vec::with_capacity(r * c);
        for row in rows {
            if row.len() != c {
                return Err(format!(
                    "Matrix rows have inconsistent lengths ({} vs {})",
                    row.len(),
                    c
                ));
            }
            data.extend_from_slice(row);
        }
        Matrix::new(data, r, c, Layout::RowMajor)
    }

    pub fn zeros(rows: usize, cols: usize) -> Self {
        Matrix { data: vec![0.0; rows * cols], rows, cols, layout: Layout::ColumnMajor }
    }

    /// The canonical 0x0 matrix that shape-mismatched decodes degrade to.
    pub fn empty() -> Self {
        Matrix { data: Vec::new(), rows: 0, cols: 0, layout: Layout::ColumnMajor }
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0 || self.cols == 0
    }

    fn linear_index(&self, row: usize, col: usize) -> usize {
        match self.layout {
            Layout::RowMajor => row * self.cols + col,
            Layout::ColumnMajor => row + col * self.rows,
        }
    }

    pub fn get(&self, row: usize, col: usize) -> Result<Scalar, String> {
        if row >= self.rows || col >= self.cols {
            return Err(format!(
                "Index ({}, {}) out of bounds for {}x{} matrix",
                row, col, self.rows, self.cols
            ));
        }
        Ok(self.data[self.linear_index(row, col)])
    }

    pub fn set(&mut self, row: usize, col: usize, value: Scalar) -> Result<(), String> {
        if row >= self.rows || col >= self.cols {
            return Err(format!(
                "Index ({}, {}) out of bounds for {}x{} matrix",
                row, col, self.rows, self.cols
            ));
        }
        let idx = self.linear_index(row, col);
        self.data[idx] = value;
        Ok(())
    }
}

/// Equality is logical: same shape, same elements. The storage-order tag is
/// a representation detail and does not participate.
impl PartialEq for Matrix {
    fn eq(&self, other: &Self) -> bool {
        if self.rows != other.rows || self.cols != other.cols {
            return false;
        }
        if self.layout == other.layout {
            return self.data == other.data;
        }
        (0..self.rows).all(|r| {
            (0..self.cols)
                .all(|c| self.data[self.linear_index(r, c)] == other.data[other.linear_index(r, c)])
        })
    }
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for r in 0..self.rows {
            for c in 0..self.cols {
                if c > 0 {
                    write!(f, " ")?;
                }
                write!(f, "{}", self.data[self.linear_index(r, c)])?;
            }
            if r + 1 < self.rows {
                write!(f, "; ")?;
            }
        }
        write!(f, "]")
    }
}

/// Element class of an [`EngineArray`].
///
/// Only `Double` is produced locally; the tag exists because the engine's
/// arrays are dynamically typed and a decode has to be able to reject a
/// non-numeric value it was handed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassTag {
    Double,
    Logical,
    Char,
}

/// The engine-side runtime value: a dimension list of arbitrary rank, an
/// element class tag and a flat buffer in the engine's column-major order.
///
/// Produced by engine round trips (or by the marshaller's encoders) and
/// consumed immediately; nothing in this workspace retains one.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineArray {
    pub dims: Vec<usize>,
    pub class: ClassTag,
    pub data: Vec<Scalar>,
}

impl EngineArray {
    pub fn new(dims: Vec<usize>, data: Vec<Scalar>) -> Result<Self, String> {
        let expected: usize = dims.iter().product();
        if data.len() != expected {
            return Err(format!(
                "EngineArray data length {} doesn't match dims {:?} ({} elements)",
                data.len(),
                dims,
                expected
            ));
        }
        Ok(EngineArray { dims, class: ClassTag::Double, data })
    }

    /// The default/empty array the engine returns for a missing value.
    pub fn empty() -> Self {
        EngineArray { dims: vec![0, 0], class: ClassTag::Double, data: Vec::new() }
    }

    pub fn num_elements(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn rank(&self) -> usize {
        self.dims.len()
    }

    pub fn dim(&self, axis: usize) -> usize {
        self.dims.get(axis).copied().unwrap_or(0)
    }
}

impl Default for EngineArray {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Display for EngineArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} {:?}", self.class, self.dims)
    }
}
