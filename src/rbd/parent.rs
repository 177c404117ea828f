use std::io::{self, Write};

use crate::denc::envelope::{self, Versioned};
use crate::denc::error::*;
use crate::denc::features::Features;
use crate::denc::unpack::*;
use crate::dump::Formatter;


//------------------------------------------

/// Snapshot id meaning "no snapshot", (u64)-2.
pub const NO_SNAP: u64 = u64::MAX - 1;

/// Location of a parent image snapshot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParentImageSpec {
    pub pool_id: i64,
    pub pool_namespace: String,
    pub image_id: String,
    pub snap_id: u64,
}

impl ParentImageSpec {
    pub fn new(pool_id: i64, pool_namespace: &str, image_id: &str, snap_id: u64) -> Self {
        ParentImageSpec {
            pool_id,
            pool_namespace: pool_namespace.to_string(),
            image_id: image_id.to_string(),
            snap_id,
        }
    }
}

/// The image a clone was created from, if any.
#[derive(Clone, Debug)]
pub struct ParentReference {
    pub pool_id: i64,
    pub pool_namespace: String,
    pub image_id: String,
    pub snap_id: u64,
    pub head_overlap: Option<u64>,
}

impl Default for ParentReference {
    fn default() -> Self {
        ParentReference {
            pool_id: -1,
            pool_namespace: String::new(),
            image_id: String::new(),
            snap_id: NO_SNAP,
            head_overlap: None,
        }
    }
}

// head_overlap doesn't take part in equality.
impl PartialEq for ParentReference {
    fn eq(&self, rhs: &Self) -> bool {
        self.pool_id == rhs.pool_id
            && self.pool_namespace == rhs.pool_namespace
            && self.image_id == rhs.image_id
            && self.snap_id == rhs.snap_id
    }
}

impl Eq for ParentReference {}

impl ParentReference {
    pub fn new(spec: ParentImageSpec, head_overlap: Option<u64>) -> Self {
        ParentReference {
            pool_id: spec.pool_id,
            pool_namespace: spec.pool_namespace,
            image_id: spec.image_id,
            snap_id: spec.snap_id,
            head_overlap,
        }
    }

    pub fn exists(&self) -> bool {
        self.pool_id >= 0 && !self.image_id.is_empty() && self.snap_id != NO_SNAP
    }

    pub fn encode<W: Write>(&self, w: &mut W, features: Features) -> io::Result<()> {
        envelope::encode(self, w, features)
    }

    pub fn decode(data: &[u8]) -> Result<Self, DecodeError> {
        envelope::decode(data).map(|(_, v)| v)
    }

    pub fn dump(&self, f: &mut dyn Formatter) {
        f.dump_int("pool_id", self.pool_id);
        f.dump_string("pool_namespace", &self.pool_namespace);
        f.dump_string("image_id", &self.image_id);
        f.dump_unsigned("snap_id", self.snap_id);
        if let Some(overlap) = self.head_overlap {
            f.dump_unsigned("head_overlap", overlap);
        }
    }

    pub fn generate_test_instances() -> Vec<ParentReference> {
        vec![
            ParentReference::default(),
            ParentReference::new(ParentImageSpec::new(1, "", "image id", 234), None),
            ParentReference::new(ParentImageSpec::new(1, "", "image id", 234), Some(123)),
            ParentReference::new(ParentImageSpec::new(1, "ns", "image id", 234), Some(123)),
        ]
    }
}

//------------------------------------------

// Version 1 has no namespace and can't say "overlap unknown".  Nautilus
// and later OSDs all understand version 2, so it's only written for them.
impl Versioned for ParentReference {
    const TYPE_NAME: &'static str = "cls_rbd_parent";
    const MAX_VERSION: u8 = 2;

    fn encoding_version(&self, features: Features) -> (u8, u8) {
        if features.contains(Features::SERVER_NAUTILUS) {
            (2, 2)
        } else {
            (1, 1)
        }
    }

    fn encode_body<W: Write>(&self, w: &mut W, version: u8, _features: Features) -> io::Result<()> {
        self.pool_id.pack(w)?;
        if version >= 2 {
            self.pool_namespace.pack(w)?;
        }
        self.image_id.pack(w)?;
        self.snap_id.pack(w)?;
        if version == 1 {
            self.head_overlap.unwrap_or(0).pack(w)
        } else {
            self.head_overlap.pack(w)
        }
    }

    fn decode_body(i: &[u8], struct_version: u8) -> DecodeResult<'_, Self> {
        let mut p = ParentReference::default();

        let (i, pool_id) = field(i, "pool_id")?;
        p.pool_id = pool_id;

        let i = if struct_version >= 2 {
            let (i, ns) = field(i, "pool_namespace")?;
            p.pool_namespace = ns;
            i
        } else {
            i
        };

        let (i, image_id) = field(i, "image_id")?;
        p.image_id = image_id;

        let (i, snap_id) = field(i, "snap_id")?;
        p.snap_id = snap_id;

        let (i, head_overlap) = if struct_version == 1 {
            let (i, overlap) = field::<u64>(i, "head_overlap")?;
            (i, Some(overlap))
        } else {
            field::<Option<u64>>(i, "head_overlap")?
        };
        p.head_overlap = head_overlap;

        Ok((i, p))
    }
}

//------------------------------------------
