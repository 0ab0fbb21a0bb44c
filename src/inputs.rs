//! Input collections consumed by the publisher.
//!
//! The pipeline host owns the actual storage of files and graphs; the
//! publisher only needs to enumerate entries, ask for their virtual
//! identifiers, and read their metadata. These traits are that seam.

use crate::error::InputError;
use crate::resource::Resource;

#[derive(Clone, Debug, PartialEq, Eq)]
/// One entry of an input collection, identified by its symbolic name.
pub struct InputEntry {
    pub symbolic_name: String,
}

impl InputEntry {
    pub fn new(symbolic_name: impl Into<String>) -> Self {
        Self {
            symbolic_name: symbolic_name.into(),
        }
    }
}

/// Metadata lookup shared by file and graph collections.
pub trait ResourceMetadata {
    /// Metadata stored for `symbolic_name`. Entries without stored metadata
    /// yield an empty [`Resource`].
    fn resource(&self, symbolic_name: &str) -> Result<Resource, InputError>;
}

/// Collection of file outputs.
pub trait FilesInput: ResourceMetadata {
    /// Entries in enumeration order.
    fn files(&self) -> Result<Vec<InputEntry>, InputError>;

    /// Externally assigned virtual path, if any.
    fn virtual_path(&self, symbolic_name: &str) -> Result<Option<String>, InputError>;
}

/// Collection of RDF graph outputs.
pub trait RdfInput: ResourceMetadata {
    /// Entries in enumeration order.
    fn graphs(&self) -> Result<Vec<InputEntry>, InputError>;

    /// Externally assigned virtual graph IRI, if any.
    fn virtual_graph(&self, symbolic_name: &str) -> Result<Option<String>, InputError>;
}
