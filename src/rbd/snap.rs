use byteorder::WriteBytesExt;
use nom::{number::complete::*, IResult};
use std::collections::BTreeMap;
use std::fmt;
use std::io::{self, Write};
use tracing::error;

use crate::denc::envelope::{self, Versioned};
use crate::denc::error::*;
use crate::denc::features::Features;
use crate::denc::unpack::*;
use crate::dump::{DumpError, Formatter};
use crate::rbd::parent::*;
use crate::rbd::snap_namespace::*;
use crate::rbd::utime::UTime;


//------------------------------------------

/// Raw protection state of a snapshot. Decoding never validates it, so
/// anything outside the three known values only surfaces when dumped.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ProtectionStatus(pub u8);

impl ProtectionStatus {
    pub const UNPROTECTED: ProtectionStatus = ProtectionStatus(0);
    pub const UNPROTECTING: ProtectionStatus = ProtectionStatus(1);
    pub const PROTECTED: ProtectionStatus = ProtectionStatus(2);

    pub fn name(&self) -> Option<&'static str> {
        match *self {
            ProtectionStatus::UNPROTECTED => Some("unprotected"),
            ProtectionStatus::UNPROTECTING => Some("unprotecting"),
            ProtectionStatus::PROTECTED => Some("protected"),
            _ => None,
        }
    }
}

impl fmt::Display for ProtectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{}", name),
            None => write!(f, "invalid ({})", self.0),
        }
    }
}

impl Unpack for ProtectionStatus {
    fn unpack(i: &[u8]) -> IResult<&[u8], ProtectionStatus> {
        let (i, v) = le_u8(i)?;
        Ok((i, ProtectionStatus(v)))
    }
}

impl Pack for ProtectionStatus {
    fn pack<W: WriteBytesExt>(&self, w: &mut W) -> io::Result<()> {
        w.write_u8(self.0)
    }
}

//------------------------------------------

/// Metadata kept for each snapshot of an image.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SnapshotRecord {
    pub id: u64,
    pub name: String,
    pub image_size: u64,

    // The image's parent when the snapshot was taken.
    pub parent: ParentReference,
    pub protection_status: ProtectionStatus,
    pub flags: u64,
    pub timestamp: UTime,
    pub snapshot_namespace: SnapshotNamespace,
    pub child_count: u32,
    pub parent_overlap: Option<u64>,
}

impl Default for SnapshotRecord {
    fn default() -> Self {
        SnapshotRecord {
            id: NO_SNAP,
            name: String::new(),
            image_size: 0,
            parent: ParentReference::default(),
            protection_status: ProtectionStatus::UNPROTECTED,
            flags: 0,
            timestamp: UTime::default(),
            snapshot_namespace: SnapshotNamespace::User,
            child_count: 0,
            parent_overlap: None,
        }
    }
}

// Version each field was introduced in.
const V_PARENT: u8 = 2;
const V_PROTECTION_STATUS: u8 = 3;
const V_FLAGS: u8 = 4;
const V_SNAPSHOT_NAMESPACE: u8 = 5;
const V_TIMESTAMP: u8 = 6;
const V_CHILD_COUNT: u8 = 7;
const V_PARENT_OVERLAP: u8 = 8;

impl SnapshotRecord {
    pub fn has_parent(&self) -> bool {
        self.parent.exists()
    }

    /// Whether the parent should move into the image's parent record
    /// in the extended format.
    pub fn migrate_parent_format(&self, features: Features) -> bool {
        features.contains(Features::SERVER_NAUTILUS) && self.has_parent()
    }

    pub fn encode<W: Write>(&self, w: &mut W, features: Features) -> io::Result<()> {
        envelope::encode(self, w, features)
    }

    pub fn decode(data: &[u8]) -> Result<Self, DecodeError> {
        envelope::decode(data).map(|(_, v)| v)
    }

    /// Decodes the way a reader that only knows up to `reader_version` would.
    pub fn decode_as(data: &[u8], reader_version: u8) -> Result<Self, DecodeError> {
        envelope::decode_as(data, reader_version).map(|(_, v)| v)
    }

    pub fn dump(&self, f: &mut dyn Formatter) -> Result<(), DumpError> {
        f.dump_unsigned("id", self.id);
        f.dump_string("name", &self.name);
        f.dump_unsigned("image_size", self.image_size);
        if self.has_parent() {
            f.open_object_section("parent");
            self.parent.dump(f);
            f.close_section();
        }

        match self.protection_status.name() {
            Some(name) => f.dump_string("protection_status", name),
            None => {
                error!(
                    snap_id = self.id,
                    value = self.protection_status.0,
                    "snapshot has an impossible protection status"
                );
                return Err(DumpError::InvalidEnumValue {
                    field: "protection_status",
                    value: self.protection_status.0 as u64,
                });
            }
        }

        f.dump_unsigned("child_count", self.child_count as u64);
        if let Some(overlap) = self.parent_overlap {
            f.dump_unsigned("parent_overlap", overlap);
        }
        Ok(())
    }

    pub fn generate_test_instances() -> Vec<SnapshotRecord> {
        let mut instances = vec![SnapshotRecord::default()];

        instances.push(SnapshotRecord {
            id: 1,
            name: "snap".to_string(),
            image_size: 123456,
            flags: 31,
            child_count: 543,
            ..Default::default()
        });

        instances.push(SnapshotRecord {
            id: 2,
            name: "snap2".to_string(),
            image_size: 12345678,
            parent: ParentReference::new(ParentImageSpec::new(1, "", "parent", 456), Some(12345)),
            protection_status: ProtectionStatus::PROTECTED,
            flags: 14,
            timestamp: UTime::default(),
            ..Default::default()
        });

        instances.push(SnapshotRecord {
            id: 3,
            name: "group snap".to_string(),
            image_size: 1 << 30,
            parent: ParentReference::new(
                ParentImageSpec::new(2, "", "parent2", 7),
                Some(1 << 20),
            ),
            protection_status: ProtectionStatus::UNPROTECTING,
            flags: 1,
            timestamp: UTime::new(1_600_000_000, 123_456_789),
            snapshot_namespace: SnapshotNamespace::Group {
                group_pool: 4,
                group_id: "group id".to_string(),
                group_snapshot_id: "group snap id".to_string(),
            },
            child_count: 2,
            parent_overlap: Some(1 << 19),
        });

        instances.push(SnapshotRecord {
            id: 4,
            name: "5fd4a6c2-trashed".to_string(),
            image_size: 4096,
            timestamp: UTime::new(1_700_000_000, 0),
            snapshot_namespace: SnapshotNamespace::Trash {
                original_name: "snap4".to_string(),
                original_snapshot_namespace_type: SNAPSHOT_NAMESPACE_TYPE_USER,
            },
            ..Default::default()
        });

        let mut snap_seqs = BTreeMap::new();
        snap_seqs.insert(10, 4);
        instances.push(SnapshotRecord {
            id: 5,
            name: ".mirror.primary.uuid.5".to_string(),
            image_size: 8192,
            snapshot_namespace: SnapshotNamespace::Mirror(MirrorSnapshot {
                state: MirrorSnapshotState::PRIMARY,
                complete: true,
                mirror_peer_uuids: ["peer uuid".to_string()].into_iter().collect(),
                primary_mirror_uuid: String::new(),
                primary_snap_id: NO_SNAP,
                last_copied_object_number: 0,
                snap_seqs,
            }),
            child_count: 1,
            parent_overlap: Some(0),
            ..Default::default()
        });

        instances
    }
}

//------------------------------------------

impl Versioned for SnapshotRecord {
    const TYPE_NAME: &'static str = "cls_rbd_snap";
    const MAX_VERSION: u8 = 8;

    fn encoding_version(&self, _features: Features) -> (u8, u8) {
        (8, 1)
    }

    fn encode_body<W: Write>(&self, w: &mut W, _version: u8, features: Features) -> io::Result<()> {
        self.id.pack(w)?;
        self.name.pack(w)?;
        self.image_size.pack(w)?;

        // unused, kept so the layout doesn't shift
        0u64.pack(w)?;

        envelope::encode(&self.parent, w, features)?;
        self.protection_status.pack(w)?;
        self.flags.pack(w)?;
        envelope::encode(&self.snapshot_namespace, w, features)?;
        self.timestamp.pack(w)?;
        self.child_count.pack(w)?;
        self.parent_overlap.pack(w)
    }

    fn decode_body(i: &[u8], struct_version: u8) -> DecodeResult<'_, Self> {
        let mut s = SnapshotRecord::default();

        let (i, id) = field(i, "id")?;
        s.id = id;
        let (i, name) = field(i, "name")?;
        s.name = name;
        let (i, image_size) = field(i, "image_size")?;
        s.image_size = image_size;
        let (mut i, _unused) = field::<u64>(i, "reserved")?;

        if struct_version >= V_PARENT {
            let (rest, parent) = envelope::decode::<ParentReference>(i)?;
            s.parent = parent;
            i = rest;
        }

        if struct_version >= V_PROTECTION_STATUS {
            let (rest, status) = field(i, "protection_status")?;
            s.protection_status = status;
            i = rest;
        }

        if struct_version >= V_FLAGS {
            let (rest, flags) = field(i, "flags")?;
            s.flags = flags;
            i = rest;
        }

        if struct_version >= V_SNAPSHOT_NAMESPACE {
            let (rest, ns) = envelope::decode::<SnapshotNamespace>(i)?;
            s.snapshot_namespace = ns;
            i = rest;
        }

        if struct_version >= V_TIMESTAMP {
            let (rest, timestamp) = field(i, "timestamp")?;
            s.timestamp = timestamp;
            i = rest;
        }

        if struct_version >= V_CHILD_COUNT {
            let (rest, child_count) = field(i, "child_count")?;
            s.child_count = child_count;
            i = rest;
        }

        if struct_version >= V_PARENT_OVERLAP {
            let (rest, overlap) = field(i, "parent_overlap")?;
            s.parent_overlap = overlap;
            i = rest;
        }

        Ok((i, s))
    }
}

//------------------------------------------
