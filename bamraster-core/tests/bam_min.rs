#![cfg(feature = "io-sam")]

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use bamraster_core::io::AlignmentReader;
use bamraster_core::{AlignmentRecord, Region};
use noodles::bam::{self, bai};
use noodles::core::Position;
use noodles::csi::binning_index::{index::reference_sequence::bin::Chunk, Indexer};
use noodles::sam::{self, alignment::io::Write as _, alignment::Record as _};

const SAM: &str = "@HD\tVN:1.6\tSO:coordinate
@SQ\tSN:chr1\tLN:100000
@SQ\tSN:chr2\tLN:5000
near\t0\tchr1\t101\t60\t5M\t*\t0\t0\tACGTA\t*
spans\t0\tchr1\t39996\t60\t10M\t*\t0\t0\tACGTACGTAC\t*
inside\t16\tchr1\t40001\t60\t5M\t*\t0\t0\tACGTA\t*
far\t0\tchr1\t90001\t60\t5M\t*\t0\t0\tACGTA\t*
other\t0\tchr2\t40\t60\t5M\t*\t0\t0\tACGTA\t*
";

fn write_bam(path: &Path) {
    let mut reader = sam::io::Reader::new(SAM.as_bytes());
    let header = reader.read_header().expect("sam header");

    let mut writer = bam::io::Writer::new(File::create(path).expect("create bam"));
    writer.write_header(&header).expect("bam header");
    for result in reader.records() {
        let record = result.expect("sam record");
        writer.write_alignment_record(&header, &record).expect("bam record");
    }
    writer.try_finish().expect("finish bam");
}

fn alignment_context(record: &bam::Record) -> io::Result<Option<(usize, Position, Position, bool)>> {
    Ok(
        match (
            record.reference_sequence_id().transpose()?,
            record.alignment_start().transpose()?,
            record.alignment_end().transpose()?,
        ) {
            (Some(id), Some(first), Some(last)) => Some((id, first, last, !record.flags().is_unmapped())),
            _ => None,
        },
    )
}

fn write_index(bam_path: &Path, index_path: &Path) -> io::Result<()> {
    let mut reader = bam::io::reader::Builder.build_from_path(bam_path)?;
    let header = reader.read_header()?;

    let mut indexer = Indexer::default();
    let mut record = bam::Record::default();
    let mut start = reader.get_ref().virtual_position();

    while reader.read_record(&mut record)? != 0 {
        let end = reader.get_ref().virtual_position();
        indexer.add_record(alignment_context(&record)?, Chunk::new(start, end))?;
        start = end;
    }

    let index: bai::Index = indexer.build(header.reference_sequences().len());
    bai::write(index_path, &index)
}

fn names(reader: &mut AlignmentReader, region: &str) -> Vec<String> {
    let region = Region::parse(region, Some(reader.dictionary())).expect("region");
    reader
        .fetch(&region)
        .expect("fetch")
        .collect::<Result<Vec<AlignmentRecord>, _>>()
        .expect("records")
        .into_iter()
        .map(|r| r.name)
        .collect()
}

fn bam_in(dir: &Path) -> PathBuf {
    let path = dir.join("reads.bam");
    write_bam(&path);
    path
}

#[test]
fn unindexed_bam_streams_every_record() {
    let dir = tempfile::tempdir().expect("tmp dir");
    let path = bam_in(dir.path());

    let mut reader = AlignmentReader::open(&path).expect("open bam");
    assert!(!reader.is_indexed());
    assert_eq!(reader.dictionary().length_of("chr1"), Some(100000));
    assert_eq!(
        names(&mut reader, "chr1:40000-40010"),
        vec!["near", "spans", "inside", "far", "other"]
    );
}

#[test]
fn indexed_bam_returns_overlapping_records() {
    let dir = tempfile::tempdir().expect("tmp dir");
    let path = bam_in(dir.path());
    write_index(&path, &dir.path().join("reads.bam.bai")).expect("index bam");

    let mut reader = AlignmentReader::open(&path).expect("open bam");
    assert!(reader.is_indexed());
    assert_eq!(names(&mut reader, "chr1:40000-40010"), vec!["spans", "inside"]);
    assert_eq!(names(&mut reader, "chr2:1-100"), vec!["other"]);
}

#[test]
fn index_without_bam_suffix_is_found() {
    let dir = tempfile::tempdir().expect("tmp dir");
    let path = bam_in(dir.path());
    write_index(&path, &dir.path().join("reads.bai")).expect("index bam");

    let mut reader = AlignmentReader::open(&path).expect("open bam");
    assert!(reader.is_indexed());
    assert_eq!(names(&mut reader, "chr1:90000-90002"), vec!["far"]);
}
