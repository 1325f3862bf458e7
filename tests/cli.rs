use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::io::Write;
use std::process::Command;
use tempfile::tempdir;

#[test]
fn test_cli_pack_list_unpack_cycle() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Setup: Create a temporary directory and some test files
    let source_dir = tempdir()?;
    let file1_path = source_dir.path().join("file1.txt");
    let file2_path = source_dir.path().join("file2.log");
    let nested_dir = source_dir.path().join("nested");
    fs::create_dir(&nested_dir)?;
    let nested_file_path = nested_dir.join("nested_file.txt");

    let mut file1 = fs::File::create(&file1_path)?;
    writeln!(file1, "Hello, this is the first file.")?;

    let mut file2 = fs::File::create(&file2_path)?;
    writeln!(file2, "Some log data here.")?;

    let mut nested_file = fs::File::create(&nested_file_path)?;
    nested_file.write_all(&[0, 1, 2, 3, 4, 5])?;

    let archive_dir = tempdir()?;
    let archive_path = archive_dir.path().join("snapshot.zip");

    // 2. Pack only the text files
    let mut cmd = Command::cargo_bin("dirsnap")?;
    cmd.arg("pack")
        .arg("--output")
        .arg(&archive_path)
        .arg("--glob")
        .arg("*.txt")
        .arg(source_dir.path());
    cmd.assert().success().stdout(predicate::str::contains("Packed"));

    assert!(archive_path.exists());

    // 3. List contents of the archive
    let mut cmd = Command::cargo_bin("dirsnap")?;
    cmd.arg("list").arg(&archive_path);
    cmd.assert()
        .success()
        .stdout(
            predicate::str::contains("file1.txt")
                .and(predicate::str::contains("nested/nested_file.txt"))
                .and(predicate::str::contains("file2.log").not()),
        );

    // 4. Extract archive to a new directory
    let extract_dir = tempdir()?;
    let mut cmd = Command::cargo_bin("dirsnap")?;
    cmd.arg("unpack").arg(&archive_path).arg("-o").arg(extract_dir.path());
    cmd.assert().success();

    // 5. Verify extracted files
    assert_eq!(fs::read(extract_dir.path().join("file1.txt"))?, fs::read(&file1_path)?);
    assert_eq!(
        fs::read(extract_dir.path().join("nested/nested_file.txt"))?,
        fs::read(&nested_file_path)?
    );
    assert!(!extract_dir.path().join("file2.log").exists());

    Ok(())
}

#[test]
fn test_cli_list_json() -> Result<(), Box<dyn std::error::Error>> {
    let source_dir = tempdir()?;
    fs::write(source_dir.path().join("only.txt"), b"json me")?;
    let archive_dir = tempdir()?;
    let archive_path = archive_dir.path().join("json.zip");
    dirsnap::archive_dir(source_dir.path(), &archive_path, "*")?;

    let output = Command::cargo_bin("dirsnap")?.arg("list").arg("--json").arg(&archive_path).output()?;
    assert!(output.status.success());
    let line = String::from_utf8(output.stdout)?;
    let entry: serde_json::Value = serde_json::from_str(line.trim())?;
    assert_eq!(entry["path"], "only.txt");
    assert_eq!(entry["kind"], "file");
    assert_eq!(entry["size"], 7);
    Ok(())
}

#[test]
fn test_cli_pack_nothing_matched_still_succeeds() -> Result<(), Box<dyn std::error::Error>> {
    let source_dir = tempdir()?;
    fs::write(source_dir.path().join("a.log"), b"log")?;
    let archive_dir = tempdir()?;
    let archive_path = archive_dir.path().join("empty.zip");

    let mut cmd = Command::cargo_bin("dirsnap")?;
    cmd.arg("pack").arg(source_dir.path()).arg("-o").arg(&archive_path).env("DIRSNAP_GLOB", "*.txt");
    cmd.assert().success().stdout(predicate::str::contains("has no entries"));
    Ok(())
}

#[test]
fn test_cli_unpack_rejects_traversal() -> Result<(), Box<dyn std::error::Error>> {
    let work = tempdir()?;
    let archive_path = work.path().join("evil.zip");
    {
        let mut zip = zip::ZipWriter::new(fs::File::create(&archive_path)?);
        zip.start_file("../escaped.txt", zip::write::FileOptions::default())?;
        zip.write_all(b"nope")?;
        zip.finish()?;
    }

    let mut cmd = Command::cargo_bin("dirsnap")?;
    cmd.arg("unpack").arg(&archive_path).arg("-o").arg(work.path().join("out"));
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("resolves outside"));
    assert!(!work.path().join("escaped.txt").exists());
    Ok(())
}
