//! SAM/BAM reader producing [`AlignmentRecord`]s
//!
//! SAM or BAM comes from a path or stdin; stdin is sniffed for the BGZF magic.
//! When a `.bai` index sits next to a BAM file, [`AlignmentReader::fetch`] runs
//! an indexed query; otherwise the whole input is streamed and the caller stops
//! early on position-sorted input.

use std::ffi::OsString;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use thiserror::Error;

use noodles::{bam, bgzf};
use noodles::sam::{self, alignment::Record, header::Header};

use super::AlignmentFormat;
use crate::cigar::{Cigar, CigarOp, CigarSpan};
use crate::region::{Region, SequenceDictionary};
use crate::types::{AlignmentRecord, Flags};

#[derive(Debug, Error)]
pub enum SamError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Cannot open alignments '{path}': {source}")]
    Open { path: PathBuf, source: io::Error },
    #[error("Reference sequence id {0} is not in the header")]
    MissingReference(usize),
    #[error("Invalid query region '{0}'")]
    InvalidQuery(String),
}

pub type RecordIter<'a> = Box<dyn Iterator<Item = Result<AlignmentRecord, SamError>> + 'a>;

/// gzip/BGZF member magic
const BGZF_MAGIC: [u8; 2] = [0x1f, 0x8b];

enum Source {
    Sam(sam::io::Reader<Box<dyn BufRead>>),
    Bam(bam::io::Reader<bgzf::Reader<File>>),
    BamStream(bam::io::Reader<bgzf::Reader<Box<dyn BufRead>>>),
    IndexedBam(bam::io::IndexedReader<bgzf::Reader<File>>),
}

/// An opened alignment file with its header already read.
pub struct AlignmentReader {
    header: Header,
    dictionary: SequenceDictionary,
    source: Source,
}

impl AlignmentReader {
    /// Open a SAM or BAM file, picking the format from the extension.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, SamError> {
        let path = path.as_ref();
        match AlignmentFormat::from_path(path) {
            AlignmentFormat::Bam => Self::open_bam(path),
            AlignmentFormat::Sam => Self::open_sam(path),
        }
    }

    pub fn open_sam<P: AsRef<Path>>(path: P) -> Result<Self, SamError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| SamError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        info!("Reading SAM from {}", path.display());
        Self::from_sam_reader(Box::new(BufReader::new(file)))
    }

    /// Read SAM or BAM from standard input.
    pub fn from_stdin() -> Result<Self, SamError> {
        warn!("No alignment file given, reading alignments from stdin");
        Self::from_reader(Box::new(BufReader::new(io::stdin())))
    }

    /// Read SAM or BAM from a stream, detecting BAM by its BGZF magic.
    pub fn from_reader(mut inner: Box<dyn BufRead>) -> Result<Self, SamError> {
        if inner.fill_buf()?.starts_with(&BGZF_MAGIC) {
            debug!("Stream starts with BGZF magic, reading BAM");
            let mut reader = bam::io::Reader::new(inner);
            let header = reader.read_header()?;
            return Ok(Self::with_source(header, Source::BamStream(reader)));
        }
        Self::from_sam_reader(inner)
    }

    fn from_sam_reader(inner: Box<dyn BufRead>) -> Result<Self, SamError> {
        let mut reader = sam::io::Reader::new(inner);
        let header = reader.read_header()?;
        Ok(Self::with_source(header, Source::Sam(reader)))
    }

    pub fn open_bam<P: AsRef<Path>>(path: P) -> Result<Self, SamError> {
        let path = path.as_ref();

        if let Some(index_path) = find_bai(path) {
            info!("Reading BAM from {} with index {}", path.display(), index_path.display());
            let index = bam::bai::read(&index_path).map_err(|source| SamError::Open {
                path: index_path.clone(),
                source,
            })?;
            let mut reader = bam::io::indexed_reader::Builder::default()
                .set_index(index)
                .build_from_path(path)
                .map_err(|source| SamError::Open {
                    path: path.to_path_buf(),
                    source,
                })?;
            let header = reader.read_header()?;
            return Ok(Self::with_source(header, Source::IndexedBam(reader)));
        }

        info!("Reading BAM from {} without index", path.display());
        let mut reader = bam::io::reader::Builder::default()
            .build_from_path(path)
            .map_err(|source| SamError::Open {
                path: path.to_path_buf(),
                source,
            })?;
        let header = reader.read_header()?;
        Ok(Self::with_source(header, Source::Bam(reader)))
    }

    fn with_source(header: Header, source: Source) -> Self {
        let dictionary = header
            .reference_sequences()
            .iter()
            .map(|(name, rs)| (name.to_string(), rs.length().get() as u64))
            .collect();
        Self {
            header,
            dictionary,
            source,
        }
    }

    /// Contig names and lengths from the header, in header order.
    pub fn dictionary(&self) -> &SequenceDictionary {
        &self.dictionary
    }

    pub fn is_indexed(&self) -> bool {
        matches!(self.source, Source::IndexedBam(_))
    }

    /// Records overlapping `region`, in file order. Unindexed inputs yield
    /// every record and rely on the consumer to stop past the region.
    pub fn fetch(&mut self, region: &Region) -> Result<RecordIter<'_>, SamError> {
        let header = &self.header;
        match &mut self.source {
            Source::Sam(reader) => Ok(Box::new(
                reader
                    .records()
                    .map(move |result| convert_result(result, header)),
            )),
            Source::Bam(reader) => Ok(Box::new(
                reader
                    .records()
                    .map(move |result| convert_result(result, header)),
            )),
            Source::BamStream(reader) => Ok(Box::new(
                reader
                    .records()
                    .map(move |result| convert_result(result, header)),
            )),
            Source::IndexedBam(reader) => {
                let query_region: noodles::core::Region = region
                    .to_string()
                    .parse()
                    .map_err(|_| SamError::InvalidQuery(region.to_string()))?;
                debug!("Indexed query over {}", region);
                let query = reader.query(header, &query_region)?;
                Ok(Box::new(
                    query
                        .map(move |result| convert_result(result, header)),
                ))
            }
        }
    }
}

/// `<file>.bam.bai` first, then `<file>.bai`.
fn find_bai(path: &Path) -> Option<PathBuf> {
    let mut appended = OsString::from(path);
    appended.push(".bai");
    [PathBuf::from(appended), path.with_extension("bai")]
        .into_iter()
        .find(|candidate| candidate.is_file())
}

fn convert_result<R: Record>(result: io::Result<R>, header: &Header) -> Result<AlignmentRecord, SamError> {
    let record = result?;
    to_alignment_record(&record, header)
}

/// Convert any noodles alignment record into an [`AlignmentRecord`].
pub fn to_alignment_record(record: &dyn Record, header: &Header) -> Result<AlignmentRecord, SamError> {
    let name = record
        .name()
        .map(|n| String::from_utf8_lossy(n.as_bytes()).into_owned())
        .unwrap_or_else(|| "*".to_string());

    let flags = Flags(u16::from(record.flags()?));

    let contig = match record.reference_sequence_id(header).transpose()? {
        Some(id) => header
            .reference_sequences()
            .get_index(id)
            .map(|(name, _)| name.to_string())
            .ok_or(SamError::MissingReference(id))?,
        None => "*".to_string(),
    };

    let alignment_start = record
        .alignment_start()
        .transpose()?
        .map(|pos| pos.get() as i64)
        .unwrap_or(0);

    // 255 marks an unavailable mapping quality in SAM
    let mapping_quality = record
        .mapping_quality()
        .transpose()?
        .map(|q| q.get())
        .unwrap_or(255);

    let cigar = convert_cigar(record)?;
    let sequence: Vec<u8> = record.sequence().iter().collect();

    Ok(AlignmentRecord {
        name,
        contig,
        alignment_start,
        cigar,
        sequence,
        flags,
        mapping_quality,
    })
}

fn convert_cigar(record: &dyn Record) -> Result<Cigar, SamError> {
    use noodles::sam::alignment::record::cigar::op::Kind;

    let mut spans = Vec::new();
    for result in record.cigar().iter() {
        let op = result?;
        let kind = match op.kind() {
            Kind::Match => CigarOp::Match,
            Kind::Insertion => CigarOp::Insertion,
            Kind::Deletion => CigarOp::Deletion,
            Kind::Skip => CigarOp::Skip,
            Kind::SoftClip => CigarOp::SoftClip,
            Kind::HardClip => CigarOp::HardClip,
            Kind::Pad => CigarOp::Pad,
            Kind::SequenceMatch => CigarOp::SequenceMatch,
            Kind::SequenceMismatch => CigarOp::SequenceMismatch,
        };
        spans.push(CigarSpan::new(kind, op.len() as u32));
    }
    Ok(Cigar::new(spans))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::Builder;

    fn write_sam(lines: &[&str]) -> tempfile::NamedTempFile {
        let mut f = Builder::new().suffix(".sam").tempfile().unwrap();
        for line in lines {
            writeln!(f, "{}", line).unwrap();
        }
        f.as_file().sync_all().unwrap();
        f
    }

    #[test]
    fn test_dictionary_from_header() {
        let f = write_sam(&["@HD\tVN:1.6\tSO:coordinate", "@SQ\tSN:chr1\tLN:5000", "@SQ\tSN:chr2\tLN:300"]);
        let reader = AlignmentReader::open(f.path()).unwrap();
        let dict = reader.dictionary();
        assert_eq!(dict.len(), 2);
        assert_eq!(dict.length_of("chr1"), Some(5000));
        assert_eq!(dict.length_of("chr2"), Some(300));
        assert!(!reader.is_indexed());
    }

    #[test]
    fn test_fetch_converts_fields() {
        let f = write_sam(&[
            "@HD\tVN:1.6\tSO:coordinate",
            "@SQ\tSN:chr1\tLN:5000",
            "r1\t16\tchr1\t101\t37\t2S6M1I1M\t*\t0\t0\tAACGTACGTA\t*",
            "r2\t1024\tchr1\t105\t0\t5M\t*\t0\t0\t*\t*",
        ]);
        let mut reader = AlignmentReader::open(f.path()).unwrap();
        let region = Region::new("chr1", 100, 120).unwrap();
        let records: Vec<AlignmentRecord> = reader
            .fetch(&region)
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();

        assert_eq!(records.len(), 2);
        let r1 = &records[0];
        assert_eq!(r1.name, "r1");
        assert_eq!(r1.contig, "chr1");
        assert_eq!(r1.alignment_start, 101);
        assert_eq!(r1.mapping_quality, 37);
        assert!(r1.flags.is_reverse());
        assert_eq!(r1.cigar.to_string(), "2S6M1I1M");
        assert_eq!(r1.sequence, b"AACGTACGTA".to_vec());
        assert_eq!(r1.alignment_end(), 107);
        assert_eq!(r1.unclipped_start(), 99);

        let r2 = &records[1];
        assert!(r2.flags.is_duplicate());
        assert_eq!(r2.mapping_quality, 0);
        assert!(r2.sequence.is_empty());
    }

    fn to_bam(sam_text: &str) -> Vec<u8> {
        use noodles::sam::alignment::io::Write as _;

        let mut reader = sam::io::Reader::new(sam_text.as_bytes());
        let header = reader.read_header().unwrap();
        let mut writer = bam::io::Writer::new(Vec::new());
        writer.write_header(&header).unwrap();
        for result in reader.records() {
            writer.write_alignment_record(&header, &result.unwrap()).unwrap();
        }
        writer.into_inner().finish().unwrap()
    }

    const STREAM_SAM: &str = "@HD\tVN:1.6\tSO:coordinate
@SQ\tSN:chr1\tLN:5000
r1\t0\tchr1\t101\t60\t4M\t*\t0\t0\tACGT\t*
r2\t16\tchr1\t103\t20\t2M1D2M\t*\t0\t0\tTTGG\t*
";

    #[test]
    fn test_stream_detects_bam() {
        let bytes = to_bam(STREAM_SAM);
        assert_eq!(&bytes[..2], &BGZF_MAGIC);

        let mut reader = AlignmentReader::from_reader(Box::new(io::Cursor::new(bytes))).unwrap();
        assert!(matches!(reader.source, Source::BamStream(_)));
        assert_eq!(reader.dictionary().length_of("chr1"), Some(5000));

        let region = Region::new("chr1", 100, 120).unwrap();
        let records: Vec<AlignmentRecord> = reader.fetch(&region).unwrap().collect::<Result<_, _>>().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].name, "r2");
        assert_eq!(records[1].cigar.to_string(), "2M1D2M");
        assert_eq!(records[1].mapping_quality, 20);
        assert!(records[1].flags.is_reverse());
    }

    #[test]
    fn test_stream_reads_sam_text() {
        let cursor = io::Cursor::new(STREAM_SAM.as_bytes().to_vec());
        let mut reader = AlignmentReader::from_reader(Box::new(cursor)).unwrap();
        assert!(matches!(reader.source, Source::Sam(_)));
        let region = Region::new("chr1", 100, 120).unwrap();
        assert_eq!(reader.fetch(&region).unwrap().count(), 2);
    }

    #[test]
    fn test_find_bai_layouts() {
        let dir = tempfile::tempdir().unwrap();
        let bam_path = dir.path().join("reads.bam");
        assert_eq!(find_bai(&bam_path), None);

        let short = dir.path().join("reads.bai");
        std::fs::write(&short, b"").unwrap();
        assert_eq!(find_bai(&bam_path), Some(short));

        let long = dir.path().join("reads.bam.bai");
        std::fs::write(&long, b"").unwrap();
        assert_eq!(find_bai(&bam_path), Some(long));
    }

    #[test]
    fn test_open_missing_file() {
        let err = AlignmentReader::open("/nonexistent/reads.sam").err().unwrap();
        assert!(matches!(err, SamError::Open { .. }));
    }
}
