pub mod parent;
pub mod snap;
pub mod snap_namespace;
pub mod utime;

use crate::denc::envelope::Versioned;
use crate::dump::{DumpError, Formatter};

//------------------------------------------

/// A top level record the class stores, as seen by tooling.
pub trait Record: Versioned + std::fmt::Debug {
    fn dump(&self, f: &mut dyn Formatter) -> Result<(), DumpError>;
    fn generate_test_instances() -> Vec<Self>;
}

impl Record for parent::ParentReference {
    fn dump(&self, f: &mut dyn Formatter) -> Result<(), DumpError> {
        parent::ParentReference::dump(self, f);
        Ok(())
    }

    fn generate_test_instances() -> Vec<Self> {
        parent::ParentReference::generate_test_instances()
    }
}

impl Record for snap::SnapshotRecord {
    fn dump(&self, f: &mut dyn Formatter) -> Result<(), DumpError> {
        snap::SnapshotRecord::dump(self, f)
    }

    fn generate_test_instances() -> Vec<Self> {
        snap::SnapshotRecord::generate_test_instances()
    }
}

//------------------------------------------
