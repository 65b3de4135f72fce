use std::path::{Path, PathBuf};
use std::process::Command;

const SAM: &str = "@HD\tVN:1.6\tSO:coordinate
@SQ\tSN:chr1\tLN:1000
@SQ\tSN:chr2\tLN:500
r1\t0\tchr1\t102\t60\t5M\t*\t0\t0\tACGTA\t*
r2\t16\tchr1\t103\t60\t2M3I3M\t*\t0\t0\tACGGGTAC\t*
r3\t0\tchr1\t104\t60\t4M\t*\t0\t0\tTTTT\t*
r4\t0\tchr2\t10\t60\t4M\t*\t0\t0\tTTTT\t*
";

fn bamraster() -> Command {
    Command::new(env!("CARGO_BIN_EXE_bamraster"))
}

fn write_sam(dir: &Path) -> PathBuf {
    let path = dir.join("reads.sam");
    std::fs::write(&path, SAM).unwrap();
    path
}

#[test]
fn renders_png_file() {
    let dir = tempfile::tempdir().unwrap();
    let sam = write_sam(dir.path());
    let out = dir.path().join("pileup.png");

    let status = bamraster()
        .current_dir(dir.path())
        .args(["-q", "-r", "chr1:100-110", "-w", "1100", "-o"])
        .arg(&out)
        .arg(&sam)
        .status()
        .unwrap();
    assert!(status.success());

    let image = image::open(&out).unwrap().to_rgb8();
    assert_eq!(image.width(), 1100);
    // label, ruler, reference, consensus, depth and three rows of 100 px
    let expected = (100 + 4) + (60 + 4) + (100 + 4) * 2 + (100 + 4) + 3 * (100 + 4) + 4;
    assert_eq!(image.height(), expected);
}

#[test]
fn writes_png_to_stdout() {
    let dir = tempfile::tempdir().unwrap();
    let sam = write_sam(dir.path());

    let output = bamraster()
        .current_dir(dir.path())
        .args(["-q", "-r", "chr1:100-110", "--depth", "0", "--limit", "1"])
        .arg(&sam)
        .output()
        .unwrap();
    assert!(output.status.success());

    let image = image::load_from_memory(&output.stdout).unwrap();
    assert_eq!(image.width(), 1000);
}

#[test]
fn reads_sam_from_stdin_and_writes_jpeg() {
    use std::io::Write;
    use std::process::Stdio;

    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("pileup.jpg");
    let mut child = bamraster()
        .current_dir(dir.path())
        .args(["-q", "-r", "chr1:105+5", "-o"])
        .arg(&out)
        .stdin(Stdio::piped())
        .spawn()
        .unwrap();
    child.stdin.take().unwrap().write_all(SAM.as_bytes()).unwrap();
    assert!(child.wait().unwrap().success());

    let bytes = std::fs::read(&out).unwrap();
    assert_eq!(&bytes[..2], &[0xFF, 0xD8]);
}

fn to_bam(sam_text: &str) -> Vec<u8> {
    use noodles::sam::alignment::io::Write as _;

    let mut reader = noodles::sam::io::Reader::new(sam_text.as_bytes());
    let header = reader.read_header().unwrap();
    let mut writer = noodles::bam::io::Writer::new(Vec::new());
    writer.write_header(&header).unwrap();
    for result in reader.records() {
        writer.write_alignment_record(&header, &result.unwrap()).unwrap();
    }
    writer.into_inner().finish().unwrap()
}

#[test]
fn reads_bam_from_stdin() {
    use std::io::Write;
    use std::process::Stdio;

    let dir = tempfile::tempdir().unwrap();
    let mut child = bamraster()
        .current_dir(dir.path())
        .args(["-q", "-r", "chr1:100-110", "-w", "1100"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .unwrap();
    child.stdin.take().unwrap().write_all(&to_bam(SAM)).unwrap();
    let output = child.wait_with_output().unwrap();
    assert!(output.status.success());

    // same three rows as the SAM rendering
    let image = image::load_from_memory(&output.stdout).unwrap();
    assert_eq!(image.width(), 1100);
    let expected = (100 + 4) + (60 + 4) + (100 + 4) * 2 + (100 + 4) + 3 * (100 + 4) + 4;
    assert_eq!(image.height(), expected);
}

#[test]
fn unknown_contig_fails() {
    let dir = tempfile::tempdir().unwrap();
    let sam = write_sam(dir.path());

    let output = bamraster()
        .current_dir(dir.path())
        .args(["-q", "-r", "chrZ:1-10"])
        .arg(&sam)
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Invalid region"));
}

#[test]
fn missing_input_fails() {
    let dir = tempfile::tempdir().unwrap();
    let output = bamraster()
        .current_dir(dir.path())
        .args(["-q", "-r", "chr1:1-10", "absent.bam"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("File not found"));
}

#[test]
fn print_config_is_loadable() {
    let dir = tempfile::tempdir().unwrap();
    let output = bamraster().current_dir(dir.path()).arg("--print-config").output().unwrap();
    assert!(output.status.success());
    let text = String::from_utf8(output.stdout).unwrap();
    assert!(text.contains("[render]"));

    // the printed template is picked up from the working directory
    std::fs::write(
        dir.path().join("bamraster.toml"),
        text.replace("width = 1000", "width = 300"),
    )
    .unwrap();
    let sam = write_sam(dir.path());
    let output = bamraster()
        .current_dir(dir.path())
        .args(["-q", "-r", "chr1:100-110"])
        .arg(&sam)
        .output()
        .unwrap();
    assert!(output.status.success());
    let image = image::load_from_memory(&output.stdout).unwrap();
    assert_eq!(image.width(), 300);
}
