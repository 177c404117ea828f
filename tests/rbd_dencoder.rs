use anyhow::Result;

use rbdcls::denc::features::Features;
use rbdcls::rbd::snap::{ProtectionStatus, SnapshotRecord};

mod common;

use common::*;

//------------------------------------------

#[test]
fn accepts_v() -> Result<()> {
    let stdout = run_ok(["-V"])?;
    assert_eq!(stdout, format!("rbd_dencoder {}", env!("CARGO_PKG_VERSION")));
    Ok(())
}

#[test]
fn no_command_is_a_usage_error() -> Result<()> {
    let (code, _) = run_fail(Vec::<&str>::new())?;
    assert_eq!(code, exitcode::USAGE);
    Ok(())
}

#[test]
fn lists_types() -> Result<()> {
    let stdout = run_ok(["list_types"])?;
    assert_eq!(stdout, "cls_rbd_parent\ncls_rbd_snap");
    Ok(())
}

#[test]
fn counts_tests() -> Result<()> {
    assert_eq!(run_ok(["count_tests", "cls_rbd_parent"])?, "4");
    assert_eq!(run_ok(["count_tests", "cls_rbd_snap"])?, "6");
    Ok(())
}

#[test]
fn unknown_type() -> Result<()> {
    let (code, stderr) = run_fail(["count_tests", "cls_rbd_group"])?;
    assert_eq!(code, exitcode::USAGE);
    assert!(stderr.contains("unknown type 'cls_rbd_group'"));
    Ok(())
}

//------------------------------------------

#[test]
fn namespace_needs_nautilus() -> Result<()> {
    let mut td = TestDir::new()?;
    let old = td.mk_path("old.bin");
    let new = td.mk_path("new.bin");

    run_ok([
        os("encode"),
        os("cls_rbd_parent"),
        os("3"),
        os("-o"),
        os(&old),
        os("--features"),
        os("none"),
    ])?;
    run_ok([
        os("encode"),
        os("cls_rbd_parent"),
        os("3"),
        os("-o"),
        os(&new),
        os("--features"),
        os("nautilus"),
    ])?;
    assert_ne!(std::fs::read(&old)?, std::fs::read(&new)?);

    let stdout = run_ok([os("decode"), os("cls_rbd_parent"), os(&old)])?;
    assert!(stdout.contains("pool_namespace=\"\""));
    assert!(stdout.contains("head_overlap=\"123\""));

    let stdout = run_ok([os("decode"), os("cls_rbd_parent"), os(&new)])?;
    assert!(stdout.contains("pool_namespace=\"ns\""));
    Ok(())
}

#[test]
fn decode_snap_as_xml() -> Result<()> {
    let mut td = TestDir::new()?;
    let path = td.mk_path("snap.bin");
    run_ok([os("encode"), os("cls_rbd_snap"), os("3"), os("-o"), os(&path)])?;

    let stdout = run_ok([os("decode"), os("cls_rbd_snap"), os(&path)])?;
    assert!(stdout.starts_with("<cls_rbd_snap id=\"3\" name=\"group snap\""));
    assert!(stdout.contains("protection_status=\"unprotecting\""));
    assert!(stdout.contains("parent_overlap=\"524288\""));
    assert!(stdout.contains("<parent pool_id=\"2\""));
    Ok(())
}

#[test]
fn decode_snap_as_text() -> Result<()> {
    let mut td = TestDir::new()?;
    let path = td.mk_path("snap.bin");
    run_ok([os("encode"), os("cls_rbd_snap"), os("1"), os("-o"), os(&path)])?;

    let stdout = run_ok([
        os("decode"),
        os("cls_rbd_snap"),
        os(&path),
        os("--format"),
        os("text"),
    ])?;
    assert_eq!(
        stdout,
        "cls_rbd_snap:\n  id: 1\n  name: \"snap\"\n  image_size: 123456\n  \
         protection_status: \"unprotected\"\n  child_count: 543"
    );
    Ok(())
}

#[test]
fn old_reader_drops_new_fields() -> Result<()> {
    let mut td = TestDir::new()?;
    let path = td.mk_path("snap.bin");
    run_ok([os("encode"), os("cls_rbd_snap"), os("3"), os("-o"), os(&path)])?;

    let stdout = run_ok([
        os("decode"),
        os("cls_rbd_snap"),
        os(&path),
        os("--reader-version"),
        os("5"),
    ])?;
    assert!(stdout.contains("child_count=\"0\""));
    assert!(!stdout.contains("parent_overlap"));
    Ok(())
}

//------------------------------------------

#[test]
fn missing_input_is_an_io_error() -> Result<()> {
    let mut td = TestDir::new()?;
    let path = td.mk_path("missing.bin");
    let (code, stderr) = run_fail([os("decode"), os("cls_rbd_snap"), os(&path)])?;
    assert_eq!(code, exitcode::IOERR);
    assert!(stderr.contains("couldn't read input file"));
    Ok(())
}

#[test]
fn truncated_file_is_a_data_error() -> Result<()> {
    let mut td = TestDir::new()?;
    let path = td.mk_path("snap.bin");
    run_ok([os("encode"), os("cls_rbd_snap"), os("2"), os("-o"), os(&path)])?;

    let data = std::fs::read(&path)?;
    std::fs::write(&path, &data[..data.len() / 2])?;

    let (code, stderr) = run_fail([os("decode"), os("cls_rbd_snap"), os(&path)])?;
    assert_eq!(code, exitcode::DATAERR);
    assert!(stderr.contains("input truncated"));
    Ok(())
}

#[test]
fn too_new_is_a_data_error() -> Result<()> {
    let mut td = TestDir::new()?;
    let path = td.mk_path("snap.bin");
    std::fs::write(&path, [255u8, 255, 0, 0, 0, 0])?;

    let (code, stderr) = run_fail([os("decode"), os("cls_rbd_snap"), os(&path)])?;
    assert_eq!(code, exitcode::DATAERR);
    assert!(stderr.contains("too new"));
    Ok(())
}

#[test]
fn bad_protection_status_is_fatal() -> Result<()> {
    let mut td = TestDir::new()?;
    let path = td.mk_path("snap.bin");

    let s = SnapshotRecord {
        protection_status: ProtectionStatus(3),
        ..Default::default()
    };
    let mut buf = Vec::new();
    s.encode(&mut buf, Features::ALL)?;
    std::fs::write(&path, &buf)?;

    let (code, stderr) = run_fail([os("decode"), os("cls_rbd_snap"), os(&path)])?;
    assert_eq!(code, exitcode::SOFTWARE);
    assert!(stderr.contains("protection_status"));
    Ok(())
}

#[test]
fn quiet_suppresses_errors() -> Result<()> {
    let mut td = TestDir::new()?;
    let path = td.mk_path("missing.bin");
    let (_, stderr) = run_fail([os("decode"), os("cls_rbd_snap"), os(&path), os("-q")])?;
    assert!(stderr.is_empty());
    Ok(())
}

//------------------------------------------
