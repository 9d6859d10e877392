use std::fmt;

/// Which input table an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Left => "left",
            Side::Right => "right",
        }
    }
}

#[derive(Debug)]
pub enum SchemaError {
    /// A required column is absent from the input schema.
    /// Null-valued cells per row are legal; a missing column is not.
    MissingColumn { column: String },
    /// A content-length cell holds something outside the integer domain.
    IntegerCoercion { column: String, value: String },
    /// Concatenated results carry a different column layout.
    ColumnMismatch { expected: Vec<String>, found: Vec<String> },
    /// A table handed to the engine violates the canonical invariants,
    /// i.e. it did not come out of the normalizer.
    NotCanonical { side: Side, detail: String },
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingColumn { column } => write!(f, "missing column '{column}'"),
            Self::IntegerCoercion { column, value } => {
                write!(f, "column '{column}': cannot coerce '{value}' to a 64-bit integer")
            }
            Self::ColumnMismatch { expected, found } => {
                write!(f, "column layout mismatch: expected {expected:?}, found {found:?}")
            }
            Self::NotCanonical { side, detail } => {
                write!(f, "{} table is not canonical: {detail}", side.as_str())
            }
        }
    }
}

impl std::error::Error for SchemaError {}
