//! Code generation module

mod code_generator;
mod collection_generator;
mod data_generator;
pub mod naming;
pub mod php;
mod printer;
mod storage_generator;

pub use code_generator::*;
pub use naming::KeyStyle;
pub use printer::Printer;

use std::fmt;
use std::str::FromStr;

/// Kind of class generated per table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    Collection,
    Data,
    /// Low-level relational storage
    Storage,
}

impl ArtifactKind {
    /// All kinds, in default generation order
    pub const ALL: [ArtifactKind; 3] = [
        ArtifactKind::Collection,
        ArtifactKind::Data,
        ArtifactKind::Storage,
    ];

    /// Name used in configuration and on the command line
    pub fn as_str(&self) -> &'static str {
        match self {
            ArtifactKind::Collection => "collection",
            ArtifactKind::Data => "data",
            ArtifactKind::Storage => "llstorage",
        }
    }

    /// Namespace segment under the table namespace
    pub fn namespace_segment(&self) -> &'static str {
        match self {
            ArtifactKind::Collection => "Collection",
            ArtifactKind::Data => "Data",
            ArtifactKind::Storage => "Storage",
        }
    }

    /// Suffix appended to the table class name
    pub fn class_suffix(&self) -> &'static str {
        match self {
            ArtifactKind::Collection => "Collection",
            ArtifactKind::Data => "Data",
            ArtifactKind::Storage => "DatabaseLowLevelStorage",
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ArtifactKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "collection" => Ok(ArtifactKind::Collection),
            "data" => Ok(ArtifactKind::Data),
            "llstorage" => Ok(ArtifactKind::Storage),
            other => Err(format!("Generator {} is not allowed", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_artifact_kind_names() {
        for kind in ArtifactKind::ALL {
            assert_eq!(kind.as_str().parse::<ArtifactKind>().unwrap(), kind);
        }
        assert_eq!("Data".parse::<ArtifactKind>().unwrap(), ArtifactKind::Data);
        assert!("facade".parse::<ArtifactKind>().is_err());
        assert!("storage".parse::<ArtifactKind>().is_err());
    }
}
