#![cfg(feature = "io-sam")]

use bamraster_core::io::AlignmentReader;
use bamraster_core::{ReadFilter, RecordFilter, Region};
use std::io::Write;
use tempfile::Builder;

#[test]
fn parse_minimal_sam_record() {
    // Minimal SAM with header and one aligned record
    let mut f = Builder::new().suffix(".sam").tempfile().expect("tmp sam");
    writeln!(f, "@HD\tVN:1.6\tSO:coordinate").unwrap();
    writeln!(f, "@SQ\tSN:ref\tLN:1000").unwrap();
    // QNAME FLAG RNAME POS MAPQ CIGAR RNEXT PNEXT TLEN SEQ QUAL
    writeln!(f, "r1\t0\tref\t101\t60\t10M\t*\t0\t0\tACGTACGTAC\t*").unwrap();
    f.as_file().sync_all().unwrap();

    let mut reader = AlignmentReader::open(f.path()).expect("open sam");
    assert_eq!(reader.dictionary().length_of("ref"), Some(1000));

    let region = Region::parse("ref:100-120", Some(reader.dictionary())).expect("region");
    let records: Vec<_> = reader
        .fetch(&region)
        .expect("fetch")
        .collect::<Result<_, _>>()
        .expect("records");
    assert_eq!(records.len(), 1);

    let r = &records[0];
    assert_eq!(r.contig, "ref");
    assert_eq!(r.alignment_start, 101);
    assert_eq!(r.alignment_end(), 110);
    assert_eq!(r.mapping_quality, 60);
    assert!(ReadFilter::default().accept(r));
}

#[test]
fn whole_contig_region_from_header() {
    let mut f = Builder::new().suffix(".sam").tempfile().expect("tmp sam");
    writeln!(f, "@HD\tVN:1.6").unwrap();
    writeln!(f, "@SQ\tSN:chrM\tLN:16569").unwrap();
    f.as_file().sync_all().unwrap();

    let reader = AlignmentReader::open(f.path()).expect("open sam");
    let region = Region::parse("chrM", Some(reader.dictionary())).expect("region");
    assert_eq!((region.start, region.end), (1, 16569));
    assert!(Region::parse("chr1:1-10", Some(reader.dictionary())).is_err());
}
