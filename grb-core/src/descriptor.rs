//! Operation descriptors
//!
//! A descriptor modifies how an operation treats its output, mask and
//! inputs. The default descriptor is what the engine uses for a null
//! descriptor handle.

use crate::format::constants::descriptor as codes;

/// How the mask is interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MaskMode {
    /// Entries whose value is nonzero
    #[default]
    Value,
    /// Entries that are present, regardless of value
    Structure,
    /// Complement of the value mask
    Complement,
    /// Complement of the structural mask
    StructureComplement,
}

impl MaskMode {
    pub const fn is_structural(self) -> bool {
        matches!(self, MaskMode::Structure | MaskMode::StructureComplement)
    }

    pub const fn is_complemented(self) -> bool {
        matches!(self, MaskMode::Complement | MaskMode::StructureComplement)
    }

    /// Native `GrB_MASK` field value
    pub const fn code(self) -> i32 {
        match self {
            MaskMode::Value => codes::DEFAULT,
            MaskMode::Structure => codes::STRUCTURE,
            MaskMode::Complement => codes::COMP,
            MaskMode::StructureComplement => codes::STRUCTURE + codes::COMP,
        }
    }
}

/// Descriptor settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Descriptor {
    /// Clear the output before writing results through the mask
    pub replace: bool,
    pub mask: MaskMode,
    pub transpose_first: bool,
    pub transpose_second: bool,
}

impl Descriptor {
    pub const fn new() -> Self {
        Self {
            replace: false,
            mask: MaskMode::Value,
            transpose_first: false,
            transpose_second: false,
        }
    }

    pub const fn with_replace(mut self) -> Self {
        self.replace = true;
        self
    }

    pub const fn with_mask(mut self, mask: MaskMode) -> Self {
        self.mask = mask;
        self
    }

    pub const fn with_transpose_first(mut self) -> Self {
        self.transpose_first = true;
        self
    }

    pub const fn with_transpose_second(mut self) -> Self {
        self.transpose_second = true;
        self
    }

    pub const fn is_default(&self) -> bool {
        !self.replace
            && matches!(self.mask, MaskMode::Value)
            && !self.transpose_first
            && !self.transpose_second
    }

    /// `(field, value)` pairs to set on a native descriptor
    pub const fn fields(&self) -> [(i32, i32); 4] {
        [
            (codes::OUTP, if self.replace { codes::REPLACE } else { codes::DEFAULT }),
            (codes::MASK, self.mask.code()),
            (codes::INP0, if self.transpose_first { codes::TRAN } else { codes::DEFAULT }),
            (codes::INP1, if self.transpose_second { codes::TRAN } else { codes::DEFAULT }),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_descriptor() {
        let desc = Descriptor::default();
        assert!(desc.is_default());
        assert_eq!(desc, Descriptor::new());
        assert_eq!(desc.fields(), [(0, 0), (1, 0), (2, 0), (3, 0)]);
    }

    #[test]
    fn test_builder_fields() {
        let desc = Descriptor::new()
            .with_replace()
            .with_mask(MaskMode::StructureComplement)
            .with_transpose_first();
        assert!(!desc.is_default());
        assert_eq!(desc.fields(), [(0, 1), (1, 6), (2, 3), (3, 0)]);
        assert!(desc.mask.is_structural());
        assert!(desc.mask.is_complemented());
    }
}
