use std::fs;
use std::io::{Cursor, Read};

use anyhow::Result;
use dropstash::{package, DropStore, FileUpload, Ttl};
use tempfile::tempdir;
use zip::ZipArchive;

fn entry_string(zip: &mut ZipArchive<Cursor<Vec<u8>>>, name: &str) -> Result<String> {
    let mut out = String::new();
    zip.by_name(name)?.read_to_string(&mut out)?;
    Ok(out)
}

#[test]
fn packages_text_and_file_as_two_entries() -> Result<()> {
    let root = tempdir()?;
    let mut store = DropStore::open(root.path())?;

    let code = store.submit(
        Some("hello"),
        &[FileUpload::new("a.txt", &b"x"[..])],
        Ttl::from_hours(1)?,
    )?;
    let bundle = store.lookup(code.as_str()).unwrap();

    let mut zip = ZipArchive::new(Cursor::new(package(&bundle)?))?;
    assert_eq!(zip.len(), 2);
    assert_eq!(entry_string(&mut zip, "text.txt")?, "hello");
    assert_eq!(entry_string(&mut zip, "a.txt")?, "x");
    Ok(())
}

#[test]
fn files_only_bundle_has_no_text_entry() -> Result<()> {
    let root = tempdir()?;
    let mut store = DropStore::open(root.path())?;

    let code = store.submit(
        None,
        &[FileUpload::new("data.bin", vec![1u8, 2, 3])],
        Ttl::from_hours(1)?,
    )?;
    let bundle = store.lookup(code.as_str()).unwrap();

    let mut zip = ZipArchive::new(Cursor::new(package(&bundle)?))?;
    assert_eq!(zip.len(), 1);
    assert!(zip.by_name("text.txt").is_err());
    Ok(())
}

#[test]
fn malformed_text_record_is_omitted_not_fatal() -> Result<()> {
    let root = tempdir()?;
    let mut store = DropStore::open(root.path())?;

    let code = store.submit(
        Some("was fine"),
        &[FileUpload::new("keep.txt", &b"kept"[..])],
        Ttl::from_hours(1)?,
    )?;
    let bundle = store.lookup(code.as_str()).unwrap();
    fs::write(bundle.path.join("text.json"), "{broken")?;

    let mut zip = ZipArchive::new(Cursor::new(package(&bundle)?))?;
    assert_eq!(zip.len(), 1);
    assert_eq!(entry_string(&mut zip, "keep.txt")?, "kept");
    Ok(())
}

#[test]
fn archive_preserves_non_ascii_text() -> Result<()> {
    let root = tempdir()?;
    let mut store = DropStore::open(root.path())?;

    let text = "取件内容 ünïcode";
    let code = store.submit(Some(text), &[], Ttl::from_hours(1)?)?;
    let bundle = store.lookup(code.as_str()).unwrap();

    let mut zip = ZipArchive::new(Cursor::new(package(&bundle)?))?;
    assert_eq!(entry_string(&mut zip, "text.txt")?, text);
    Ok(())
}
