use rbdcls::denc::error::DecodeError;
use rbdcls::denc::features::Features;
use rbdcls::rbd::parent::ParentReference;
use rbdcls::rbd::snap::SnapshotRecord;
use rbdcls::rbd::utime::UTime;

//------------------------------------------

const FEATURE_SETS: [Features; 3] = [Features::NONE, Features::SERVER_NAUTILUS, Features::ALL];

fn encode_snap(s: &SnapshotRecord, features: Features) -> Vec<u8> {
    let mut buf = Vec::new();
    s.encode(&mut buf, features).unwrap();
    buf
}

// What a reader knowing only `v` should see of `s`.
fn as_seen_by(s: &SnapshotRecord, v: u8) -> SnapshotRecord {
    let d = SnapshotRecord::default();
    SnapshotRecord {
        id: s.id,
        name: s.name.clone(),
        image_size: s.image_size,
        parent: if v >= 2 { s.parent.clone() } else { d.parent },
        protection_status: if v >= 3 {
            s.protection_status
        } else {
            d.protection_status
        },
        flags: if v >= 4 { s.flags } else { d.flags },
        snapshot_namespace: if v >= 5 {
            s.snapshot_namespace.clone()
        } else {
            d.snapshot_namespace
        },
        timestamp: if v >= 6 { s.timestamp } else { UTime::default() },
        child_count: if v >= 7 { s.child_count } else { 0 },
        parent_overlap: if v >= 8 { s.parent_overlap } else { None },
    }
}

#[test]
fn every_instance_every_reader() {
    for features in FEATURE_SETS {
        for s in SnapshotRecord::generate_test_instances() {
            let buf = encode_snap(&s, features);
            for v in 1..=8 {
                let d = SnapshotRecord::decode_as(&buf, v).unwrap();
                assert_eq!(d, as_seen_by(&s, v), "reader version {}", v);
            }
        }
    }
}

#[test]
fn every_parent_instance_round_trips() {
    for features in FEATURE_SETS {
        for p in ParentReference::generate_test_instances() {
            let mut buf = Vec::new();
            p.encode(&mut buf, features).unwrap();
            let d = ParentReference::decode(&buf).unwrap();
            assert_eq!(d.exists(), p.exists());
            assert_eq!(d.image_id, p.image_id);
        }
    }
}

#[test]
fn encoding_is_deterministic() {
    for features in FEATURE_SETS {
        let a: Vec<Vec<u8>> = SnapshotRecord::generate_test_instances()
            .iter()
            .map(|s| encode_snap(s, features))
            .collect();
        let b: Vec<Vec<u8>> = SnapshotRecord::generate_test_instances()
            .iter()
            .map(|s| encode_snap(s, features))
            .collect();
        assert_eq!(a, b);
    }
}

#[test]
fn records_decode_in_sequence() {
    let instances = SnapshotRecord::generate_test_instances();
    let mut buf = Vec::new();
    for s in &instances {
        s.encode(&mut buf, Features::ALL).unwrap();
    }

    let mut input = &buf[..];
    for s in &instances {
        let (rest, d) = rbdcls::denc::envelope::decode::<SnapshotRecord>(input).unwrap();
        assert_eq!(&d, s);
        input = rest;
    }
    assert!(input.is_empty());
}

#[test]
fn empty_input() {
    assert!(matches!(
        SnapshotRecord::decode(&[]),
        Err(DecodeError::TruncatedInput { .. })
    ));
    assert!(matches!(
        ParentReference::decode(&[]),
        Err(DecodeError::TruncatedInput { .. })
    ));
}

//------------------------------------------
