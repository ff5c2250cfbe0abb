//! Marshalling between local numeric values and [`EngineArray`]s.
//!
//! Encoding is total: every scalar, vector or matrix has exactly one engine
//! representation. Decoding is partial because the engine's arrays are
//! dynamically shaped; the strict [`FromEngine::from_engine`] surfaces a
//! mismatch as a [`MarshalError`], while [`FromEngine::from_engine_lossy`]
//! degrades to the target's canonical empty/sentinel value for callers that
//! want the engine's permissive behavior.
//!
//! Everything here is stateless and safe to call from any thread.

use matlink_arrays::{ClassTag, EngineArray, Layout, Matrix, Scalar, Vector};
use thiserror::Error;

pub mod layout;

/// Failure to interpret an [`EngineArray`] as the requested local type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MarshalError {
    #[error("expected {expected}, got array with dims {dims:?}")]
    ShapeMismatch { expected: &'static str, dims: Vec<usize> },
    #[error("expected a double array, got {class:?}")]
    ClassMismatch { class: ClassTag },
}

/// Conversion into the engine's array representation. Always succeeds.
pub trait ToEngine {
    fn to_engine(&self) -> EngineArray;
}

/// Conversion out of the engine's array representation.
pub trait FromEngine: Sized {
    /// Strict decode; shape or class mismatches are reported to the caller.
    fn from_engine(array: &EngineArray) -> Result<Self, MarshalError>;

    /// Permissive decode; mismatches degrade to the canonical empty or
    /// sentinel value for the target type and never fail.
    fn from_engine_lossy(array: &EngineArray) -> Self;
}

fn require_double(array: &EngineArray) -> Result<(), MarshalError> {
    if array.class != ClassTag::Double {
        return Err(MarshalError::ClassMismatch { class: array.class });
    }
    Ok(())
}

impl ToEngine for Scalar {
    fn to_engine(&self) -> EngineArray {
        EngineArray { dims: vec![1], class: ClassTag::Double, data: vec![*self] }
    }
}

impl FromEngine for Scalar {
    fn from_engine(array: &EngineArray) -> Result<Self, MarshalError> {
        require_double(array)?;
        if array.rank() > 2 || array.dim(0) != 1 || array.data.is_empty() {
            return Err(MarshalError::ShapeMismatch {
                expected: "a scalar",
                dims: array.dims.clone(),
            });
        }
        Ok(array.data[0])
    }

    fn from_engine_lossy(array: &EngineArray) -> Self {
        Self::from_engine(array).unwrap_or(f64::NAN)
    }
}

impl ToEngine for Vector {
    fn to_engine(&self) -> EngineArray {
        // Vectors are column vectors on the engine side; no transposition.
        EngineArray { dims: vec![self.len(), 1], class: ClassTag::Double, data: self.clone() }
    }
}

impl FromEngine for Vector {
    fn from_engine(array: &EngineArray) -> Result<Self, MarshalError> {
        require_double(array)?;
        let (rows, cols) = (array.dim(0), array.dim(1));
        if array.rank() != 2 || rows.min(cols) != 1 || rows == 0 || cols == 0 {
            return Err(MarshalError::ShapeMismatch {
                expected: "a vector",
                dims: array.dims.clone(),
            });
        }
        Ok(array.data.clone())
    }

    fn from_engine_lossy(array: &EngineArray) -> Self {
        Self::from_engine(array).unwrap_or_default()
    }
}

impl ToEngine for Matrix {
    fn to_engine(&self) -> EngineArray {
        let data = match self.layout {
            Layout::ColumnMajor => self.data.clone(),
            Layout::RowMajor => layout::row_major_to_column_major(&self.data, self.rows, self.cols),
        };
        EngineArray { dims: vec![self.rows, self.cols], class: ClassTag::Double, data }
    }
}

impl FromEngine for Matrix {
    fn from_engine(array: &EngineArray) -> Result<Self, MarshalError> {
        require_double(array)?;
        let (rows, cols) = (array.dim(0), array.dim(1));
        if array.rank() != 2 || rows == 0 || cols == 0 {
            return Err(MarshalError::ShapeMismatch {
                expected: "a matrix",
                dims: array.dims.clone(),
            });
        }
        Ok(Matrix {
            data: array.data.clone(),
            rows,
            cols,
            layout: Layout::ColumnMajor,
        })
    }

    fn from_engine_lossy(array: &EngineArray) -> Self {
        Self::from_engine(array).unwrap_or_else(|_| Matrix::empty())
    }
}

/// Encode a homogeneous batch element-wise, preserving order.
pub fn encode_all<T: ToEngine>(values: &[T]) -> Vec<EngineArray> {
    values.iter().map(ToEngine::to_engine).collect()
}

/// Strictly decode a homogeneous batch element-wise; the first mismatch wins.
pub fn decode_all<T: FromEngine>(arrays: &[EngineArray]) -> Result<Vec<T>, MarshalError> {
    arrays.iter().map(T::from_engine).collect()
}

/// Permissively decode a homogeneous batch element-wise.
pub fn decode_all_lossy<T: FromEngine>(arrays: &[EngineArray]) -> Vec<T> {
    arrays.iter().map(T::from_engine_lossy).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_matrix(rows: usize, cols: usize, layout: Layout) -> Matrix {
        let mut m = Matrix::zeros(rows, cols);
        m.layout = layout;
        for r in 0..rows {
            for c in 0..cols {
                m.set(r, c, (r * cols + c + 1) as f64).unwrap();
            }
        }
        m
    }

    #[test]
    fn test_scalar_round_trip() {
        for s in [0.0, -1.5, 42.0, f64::MAX] {
            let a = s.to_engine();
            assert_eq!(a.dims, vec![1]);
            assert_eq!(f64::from_engine(&a).unwrap(), s);
        }
    }

    #[test]
    fn test_vector_round_trip_no_transpose() {
        let v: Vector = vec![1.0, 2.0, 3.0, 4.0];
        let a = v.to_engine();
        assert_eq!(a.dims, vec![4, 1]);
        assert_eq!(a.data, v);
        assert_eq!(Vector::from_engine(&a).unwrap(), v);
    }

    #[test]
    fn test_matrix_round_trip_both_layouts() {
        for layout in [Layout::RowMajor, Layout::ColumnMajor] {
            for (rows, cols) in [(1, 1), (2, 3), (3, 2), (4, 4)] {
                let m = sample_matrix(rows, cols, layout);
                let a = m.to_engine();
                assert_eq!(a.dims, vec![rows, cols]);
                let back = Matrix::from_engine(&a).unwrap();
                assert_eq!(back, m, "{rows}x{cols} {layout:?}");
            }
        }
    }

    #[test]
    fn test_matrix_encode_is_column_major() {
        // [1 2 3; 4 5 6]
        let m = sample_matrix(2, 3, Layout::RowMajor);
        let a = m.to_engine();
        assert_eq!(a.data, vec![1.0, 4.0, 2.0, 5.0, 3.0, 6.0]);
    }

    #[test]
    fn test_scalar_decode_shape_rules() {
        // First dim != 1 is the sentinel case.
        let col = EngineArray::new(vec![3, 1], vec![1.0, 2.0, 3.0]).unwrap();
        assert!(f64::from_engine(&col).is_err());
        assert!(f64::from_engine_lossy(&col).is_nan());

        // A 1xN array decodes to its first element.
        let row = EngineArray::new(vec![1, 3], vec![1.0, 2.0, 3.0]).unwrap();
        assert_eq!(f64::from_engine(&row).unwrap(), 1.0);

        // Rank 3 never decodes to a scalar.
        let cube = EngineArray::new(vec![1, 1, 2], vec![1.0, 2.0]).unwrap();
        assert!(f64::from_engine(&cube).is_err());

        // Empty buffer with a leading 1 dim is still a mismatch.
        let hollow = EngineArray::new(vec![1, 0], vec![]).unwrap();
        assert!(f64::from_engine_lossy(&hollow).is_nan());
    }

    #[test]
    fn test_vector_decode_shape_rules() {
        let wide = EngineArray::new(vec![2, 3], vec![0.0; 6]).unwrap();
        assert!(Vector::from_engine(&wide).is_err());
        assert!(Vector::from_engine_lossy(&wide).is_empty());

        let row = EngineArray::new(vec![1, 3], vec![1.0, 2.0, 3.0]).unwrap();
        assert_eq!(Vector::from_engine(&row).unwrap(), vec![1.0, 2.0, 3.0]);

        let zero = EngineArray::new(vec![0, 1], vec![]).unwrap();
        assert!(Vector::from_engine_lossy(&zero).is_empty());

        let rank1 = EngineArray::new(vec![3], vec![1.0, 2.0, 3.0]).unwrap();
        assert!(Vector::from_engine(&rank1).is_err());
    }

    #[test]
    fn test_matrix_decode_shape_rules() {
        let empty = EngineArray::empty();
        assert!(Matrix::from_engine(&empty).is_err());
        assert!(Matrix::from_engine_lossy(&empty).is_empty());

        let rank3 = EngineArray::new(vec![2, 2, 2], vec![0.0; 8]).unwrap();
        let degraded = Matrix::from_engine_lossy(&rank3);
        assert_eq!((degraded.rows, degraded.cols), (0, 0));
    }

    #[test]
    fn test_class_mismatch_is_reported() {
        let mut a = EngineArray::new(vec![1], vec![1.0]).unwrap();
        a.class = ClassTag::Logical;
        assert_eq!(
            f64::from_engine(&a),
            Err(MarshalError::ClassMismatch { class: ClassTag::Logical })
        );
        assert!(f64::from_engine_lossy(&a).is_nan());
    }

    #[test]
    fn test_batch_round_trip_preserves_order() {
        let batch: Vec<Matrix> = (1..=3)
            .map(|k| {
                Matrix::new(vec![k as f64, 0.0, 0.0, k as f64], 2, 2, Layout::RowMajor).unwrap()
            })
            .collect();
        let encoded = encode_all(&batch);
        assert_eq!(encoded.len(), 3);
        let decoded: Vec<Matrix> = decode_all(&encoded).unwrap();
        assert_eq!(decoded, batch);
    }

    #[test]
    fn test_empty_batch() {
        let encoded = encode_all::<Matrix>(&[]);
        assert!(encoded.is_empty());
        assert!(decode_all::<Matrix>(&encoded).unwrap().is_empty());
    }

    #[test]
    fn test_batch_strict_decode_first_error_wins() {
        let ok = 5.0f64.to_engine();
        let bad = EngineArray::new(vec![3, 1], vec![1.0, 2.0, 3.0]).unwrap();
        let err = decode_all::<f64>(&[ok.clone(), bad.clone()]).unwrap_err();
        assert!(matches!(err, MarshalError::ShapeMismatch { .. }));

        let lossy = decode_all_lossy::<f64>(&[ok, bad]);
        assert_eq!(lossy[0], 5.0);
        assert!(lossy[1].is_nan());
    }
}
