use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::io::{self, Write};

use crate::denc::envelope::Versioned;
use crate::denc::error::*;
use crate::denc::features::Features;
use crate::denc::unpack::*;

//------------------------------------------

pub const SNAPSHOT_NAMESPACE_TYPE_USER: u32 = 0;
pub const SNAPSHOT_NAMESPACE_TYPE_GROUP: u32 = 1;
pub const SNAPSHOT_NAMESPACE_TYPE_TRASH: u32 = 2;
pub const SNAPSHOT_NAMESPACE_TYPE_MIRROR: u32 = 3;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MirrorSnapshotState(pub u8);

impl MirrorSnapshotState {
    pub const PRIMARY: MirrorSnapshotState = MirrorSnapshotState(0);
    pub const PRIMARY_DEMOTED: MirrorSnapshotState = MirrorSnapshotState(1);
    pub const NON_PRIMARY: MirrorSnapshotState = MirrorSnapshotState(2);
    pub const NON_PRIMARY_DEMOTED: MirrorSnapshotState = MirrorSnapshotState(3);
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MirrorSnapshot {
    pub state: MirrorSnapshotState,
    pub complete: bool,
    pub mirror_peer_uuids: BTreeSet<String>,
    pub primary_mirror_uuid: String,
    pub primary_snap_id: u64,
    pub last_copied_object_number: u64,
    pub snap_seqs: BTreeMap<u64, u64>,
}

/// Who created a snapshot, and on whose behalf it is kept.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum SnapshotNamespace {
    #[default]
    User,
    Group {
        group_pool: i64,
        group_id: String,
        group_snapshot_id: String,
    },
    Trash {
        original_name: String,
        original_snapshot_namespace_type: u32,
    },
    Mirror(MirrorSnapshot),

    // Written by a newer encoder; the body is skipped.
    Unknown(u32),
}

impl SnapshotNamespace {
    pub fn namespace_type(&self) -> u32 {
        use SnapshotNamespace::*;
        match self {
            User => SNAPSHOT_NAMESPACE_TYPE_USER,
            Group { .. } => SNAPSHOT_NAMESPACE_TYPE_GROUP,
            Trash { .. } => SNAPSHOT_NAMESPACE_TYPE_TRASH,
            Mirror(_) => SNAPSHOT_NAMESPACE_TYPE_MIRROR,
            Unknown(t) => *t,
        }
    }
}

impl fmt::Display for SnapshotNamespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use SnapshotNamespace::*;
        match self {
            User => write!(f, "user"),
            Group { .. } => write!(f, "group"),
            Trash { .. } => write!(f, "trash"),
            Mirror(_) => write!(f, "mirror"),
            Unknown(t) => write!(f, "unknown ({})", t),
        }
    }
}

//------------------------------------------

fn pack_mirror<W: Write>(m: &MirrorSnapshot, w: &mut W) -> io::Result<()> {
    m.state.0.pack(w)?;
    m.complete.pack(w)?;
    m.mirror_peer_uuids.pack(w)?;
    m.primary_mirror_uuid.pack(w)?;
    m.primary_snap_id.pack(w)?;
    m.last_copied_object_number.pack(w)?;
    m.snap_seqs.pack(w)
}

fn unpack_mirror(i: &[u8]) -> DecodeResult<'_, MirrorSnapshot> {
    let (i, state) = field::<u8>(i, "mirror state")?;
    let (i, complete) = field(i, "mirror complete")?;
    let (i, mirror_peer_uuids) = field(i, "mirror_peer_uuids")?;
    let (i, primary_mirror_uuid) = field(i, "primary_mirror_uuid")?;
    let (i, primary_snap_id) = field(i, "primary_snap_id")?;
    let (i, last_copied_object_number) = field(i, "last_copied_object_number")?;
    let (i, snap_seqs) = field(i, "snap_seqs")?;

    Ok((
        i,
        MirrorSnapshot {
            state: MirrorSnapshotState(state),
            complete,
            mirror_peer_uuids,
            primary_mirror_uuid,
            primary_snap_id,
            last_copied_object_number,
            snap_seqs,
        },
    ))
}

impl Versioned for SnapshotNamespace {
    const TYPE_NAME: &'static str = "snapshot_namespace";
    const MAX_VERSION: u8 = 1;

    fn encoding_version(&self, _features: Features) -> (u8, u8) {
        (1, 1)
    }

    fn encode_body<W: Write>(&self, w: &mut W, _version: u8, _features: Features) -> io::Result<()> {
        use SnapshotNamespace::*;

        self.namespace_type().pack(w)?;
        match self {
            User | Unknown(_) => Ok(()),
            Group {
                group_pool,
                group_id,
                group_snapshot_id,
            } => {
                group_pool.pack(w)?;
                group_id.pack(w)?;
                group_snapshot_id.pack(w)
            }
            Trash {
                original_name,
                original_snapshot_namespace_type,
            } => {
                original_name.pack(w)?;
                original_snapshot_namespace_type.pack(w)
            }
            Mirror(m) => pack_mirror(m, w),
        }
    }

    fn decode_body(i: &[u8], _struct_version: u8) -> DecodeResult<'_, Self> {
        let (i, t) = field::<u32>(i, "snapshot namespace type")?;
        match t {
            SNAPSHOT_NAMESPACE_TYPE_USER => Ok((i, SnapshotNamespace::User)),
            SNAPSHOT_NAMESPACE_TYPE_GROUP => {
                let (i, group_pool) = field(i, "group_pool")?;
                let (i, group_id) = field(i, "group_id")?;
                let (i, group_snapshot_id) = field(i, "group_snapshot_id")?;
                Ok((
                    i,
                    SnapshotNamespace::Group {
                        group_pool,
                        group_id,
                        group_snapshot_id,
                    },
                ))
            }
            SNAPSHOT_NAMESPACE_TYPE_TRASH => {
                let (i, original_name) = field(i, "original_name")?;
                let (i, original_snapshot_namespace_type) =
                    field(i, "original_snapshot_namespace_type")?;
                Ok((
                    i,
                    SnapshotNamespace::Trash {
                        original_name,
                        original_snapshot_namespace_type,
                    },
                ))
            }
            SNAPSHOT_NAMESPACE_TYPE_MIRROR => {
                let (i, m) = unpack_mirror(i)?;
                Ok((i, SnapshotNamespace::Mirror(m)))
            }
            t => Ok((i, SnapshotNamespace::Unknown(t))),
        }
    }
}

//------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::denc::envelope::{decode, encode};

    fn round_trip(ns: &SnapshotNamespace) -> SnapshotNamespace {
        let mut buf = Vec::new();
        encode(ns, &mut buf, Features::NONE).unwrap();
        let (rest, decoded) = decode::<SnapshotNamespace>(&buf).unwrap();
        assert!(rest.is_empty());
        decoded
    }

    #[test]
    fn user_is_just_a_tag() {
        let mut buf = Vec::new();
        encode(&SnapshotNamespace::User, &mut buf, Features::NONE).unwrap();
        assert_eq!(buf, vec![1, 1, 4, 0, 0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn variants_round_trip() {
        let mut seqs = BTreeMap::new();
        seqs.insert(1, 10);
        seqs.insert(2, 20);

        let cases = vec![
            SnapshotNamespace::User,
            SnapshotNamespace::Group {
                group_pool: 3,
                group_id: "group".to_string(),
                group_snapshot_id: "gsnap".to_string(),
            },
            SnapshotNamespace::Trash {
                original_name: "snap".to_string(),
                original_snapshot_namespace_type: SNAPSHOT_NAMESPACE_TYPE_USER,
            },
            SnapshotNamespace::Mirror(MirrorSnapshot {
                state: MirrorSnapshotState::NON_PRIMARY,
                complete: true,
                mirror_peer_uuids: ["peer1".to_string(), "peer2".to_string()]
                    .into_iter()
                    .collect(),
                primary_mirror_uuid: "uuid".to_string(),
                primary_snap_id: 123,
                last_copied_object_number: 5,
                snap_seqs: seqs,
            }),
        ];

        for ns in &cases {
            assert_eq!(&round_trip(ns), ns);
        }
    }

    #[test]
    fn unknown_type_skips_body() {
        let buf = [1, 1, 7, 0, 0, 0, 9, 0, 0, 0, 0xa, 0xb, 0xc];
        let (rest, ns) = decode::<SnapshotNamespace>(&buf).unwrap();
        assert!(rest.is_empty());
        assert_eq!(ns, SnapshotNamespace::Unknown(9));
        assert_eq!(ns.namespace_type(), 9);
    }

    #[test]
    fn truncated_group() {
        let mut buf = Vec::new();
        let ns = SnapshotNamespace::Group {
            group_pool: 3,
            group_id: "group".to_string(),
            group_snapshot_id: "gsnap".to_string(),
        };
        encode(&ns, &mut buf, Features::NONE).unwrap();

        // shrink the declared body length, leaving the bytes in place
        buf[2] -= 4;
        assert_eq!(
            decode::<SnapshotNamespace>(&buf),
            Err(DecodeError::TruncatedInput {
                what: "group_snapshot_id"
            })
        );
    }
}

//------------------------------------------
