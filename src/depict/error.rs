use std::fmt;

use petgraph::graph::NodeIndex;

/// Errors that stop a depiction. Everything recoverable (unparseable labels,
/// ambiguous brackets, unknown bond styles) degrades with a log message
/// instead.
#[derive(Debug)]
pub enum DepictError {
    /// An atom that must be drawn has no 2D coordinate.
    MissingCoordinates { atom: NodeIndex },
    /// A rendering parameter is out of range.
    InvalidParameter { name: &'static str, value: f64 },
    /// Rendering parameters could not be read.
    Config(serde_json::Error),
}

impl fmt::Display for DepictError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingCoordinates { atom } => {
                write!(f, "atom {} has no 2D coordinates", atom.index())
            }
            Self::InvalidParameter { name, value } => {
                write!(f, "invalid rendering parameter {name} = {value}")
            }
            Self::Config(e) => write!(f, "invalid rendering parameters: {e}"),
        }
    }
}

impl std::error::Error for DepictError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for DepictError {
    fn from(e: serde_json::Error) -> Self {
        Self::Config(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_atom() {
        let e = DepictError::MissingCoordinates {
            atom: NodeIndex::new(3),
        };
        assert_eq!(e.to_string(), "atom 3 has no 2D coordinates");
    }

    #[test]
    fn config_error_has_source() {
        let json_err = serde_json::from_str::<u8>("x").unwrap_err();
        let e: DepictError = json_err.into();
        assert!(std::error::Error::source(&e).is_some());
    }
}
