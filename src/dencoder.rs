use anyhow::{anyhow, Context, Result};
use std::io::Write;
use std::marker::PhantomData;
use tracing::debug;

use crate::denc::envelope;
use crate::denc::features::Features;
use crate::dump::{Tree, TreeFormatter};
use crate::rbd::parent::ParentReference;
use crate::rbd::snap::SnapshotRecord;
use crate::rbd::Record;

//------------------------------------------

/// Type erased access to a record type, for tools that pick the type
/// by name at runtime.
pub trait DencoderType {
    fn name(&self) -> &'static str;
    fn count_tests(&self) -> usize;
    fn encode_test(&self, index: usize, features: Features, out: &mut dyn Write) -> Result<()>;

    /// Decodes and dumps a buffer. `reader_version` caps the struct
    /// version the decoder will admit to knowing.
    fn decode_dump(&self, data: &[u8], reader_version: Option<u8>) -> Result<Tree>;
}

struct DencoderImpl<T> {
    phantom: PhantomData<T>,
}

impl<T: Record> DencoderImpl<T> {
    fn new() -> Self {
        DencoderImpl {
            phantom: PhantomData,
        }
    }
}

impl<T: Record> DencoderType for DencoderImpl<T> {
    fn name(&self) -> &'static str {
        T::TYPE_NAME
    }

    fn count_tests(&self) -> usize {
        T::generate_test_instances().len()
    }

    fn encode_test(&self, index: usize, features: Features, mut out: &mut dyn Write) -> Result<()> {
        let instances = T::generate_test_instances();
        let v = instances.get(index).ok_or_else(|| {
            anyhow!(
                "{} has {} test instances, no instance {}",
                T::TYPE_NAME,
                instances.len(),
                index
            )
        })?;

        debug!(type_name = T::TYPE_NAME, index, %features, "encoding test instance");
        envelope::encode(v, &mut out, features)?;
        Ok(())
    }

    fn decode_dump(&self, data: &[u8], reader_version: Option<u8>) -> Result<Tree> {
        let (rest, v) = match reader_version {
            Some(rv) => envelope::decode_as::<T>(data, rv)?,
            None => envelope::decode::<T>(data)?,
        };

        if !rest.is_empty() {
            debug!(
                type_name = T::TYPE_NAME,
                trailing = rest.len(),
                "ignoring data after the record"
            );
        }

        let mut f = TreeFormatter::new(T::TYPE_NAME);
        v.dump(&mut f)?;
        Ok(f.finish())
    }
}

//------------------------------------------

pub fn registered_types() -> Vec<Box<dyn DencoderType>> {
    vec![
        Box::new(DencoderImpl::<ParentReference>::new()),
        Box::new(DencoderImpl::<SnapshotRecord>::new()),
    ]
}

pub fn find_type(name: &str) -> Result<Box<dyn DencoderType>> {
    registered_types()
        .into_iter()
        .find(|t| t.name() == name)
        .with_context(|| format!("unknown type '{}'", name))
}

//------------------------------------------


//------------------------------------------
