/// Open Packaging Conventions (OPC) support.
///
/// Only what variant generation needs: every ZIP member is read into memory
/// and carried through unchanged, `[Content_Types].xml` and the package
/// relationships are parsed to locate the main document part, and the
/// members are written back out in their original order.
pub mod constants;
pub mod error;
pub mod phys_pkg;
pub mod pkgreader;

// Re-export commonly used types
pub use phys_pkg::{PackageEntry, PhysPkgReader, PhysPkgWriter};
pub use pkgreader::{ContentTypeMap, SerializedRelationship};
