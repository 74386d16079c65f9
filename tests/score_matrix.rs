use motifscore::affinity::{
    load_sequences, region_filter::reduce_to_mapped_regions, score_sequences,
    writers::MatrixWriter, AggregationType, BackgroundModel, MotifLibrary, ScanContext,
    ScoreMatrix, ScoringMode,
};
use rand::Rng;
use std::{
    fmt::Write as _,
    fs,
    path::{Path, PathBuf},
};
use tempfile::TempDir;

const ACGT_MOTIF: &str = "\
Log-odds matrix for Motif 0 acgt
#      1    2    3    4
#A   1.0  0.0  0.0  0.0
#C   0.0  1.0  0.0  0.0
#G   0.0  0.0  1.0  0.0
#T   0.0  0.0  0.0  1.0
Source: synthetic
";

struct LibraryFiles {
    motifs: PathBuf,
    ids: PathBuf,
    calibration: PathBuf,
}

fn write_library(dir: &Path, motifs: &str, ids: &str, calibration: &str) -> LibraryFiles {
    let files = LibraryFiles {
        motifs: dir.join("motifs.txt"),
        ids: dir.join("ids.txt"),
        calibration: dir.join("calibration.tsv"),
    };
    fs::write(&files.motifs, motifs).unwrap();
    fs::write(&files.ids, ids).unwrap();
    fs::write(&files.calibration, calibration).unwrap();
    files
}

fn load_library(files: &LibraryFiles) -> motifscore::utils::Result<MotifLibrary> {
    MotifLibrary::load(&files.motifs, &files.ids, &files.calibration)
}

fn write_matrix(matrix: &ScoreMatrix, path: &Path) {
    let mut writer = MatrixWriter::new(path).unwrap();
    writer.write(matrix).unwrap();
    writer.finish().unwrap();
}

#[test]
fn single_perfect_match_scores_near_one() {
    let dir = TempDir::new().unwrap();
    let files = write_library(dir.path(), ACGT_MOTIF, "M1\n", "M1\t0.5\t0.5\t0.6\n");
    let sequences_path = dir.path().join("regions.fa");
    fs::write(&sequences_path, ">chr1:100-104\nACGT\n>chr1:200-204\nTTTT\n").unwrap();

    let context = ScanContext::new(
        load_library(&files).unwrap(),
        BackgroundModel::uniform(),
        AggregationType::Logistic6,
        ScoringMode::Affinity,
    );
    let sequences = load_sequences(&sequences_path).unwrap();
    let matrix = score_sequences(&context, &sequences, 2).unwrap();

    let affinity = matrix.get(0, 0).unwrap();
    assert!((affinity - 0.9995).abs() < 1e-3, "affinity {}", affinity);
    assert_eq!(matrix.get(0, 1), Some(0.0));

    let output = dir.path().join("affinity.txt");
    write_matrix(&matrix, &output);
    assert_eq!(fs::read_to_string(&output).unwrap(), "0.999 0.000\n");
}

#[test]
fn pool_size_does_not_change_output() {
    let dir = TempDir::new().unwrap();
    let mut rng = rand::rng();

    let mut motifs = String::new();
    let mut ids = String::new();
    let mut calibration = String::from("id\tthreshold\tsum\tfp\n");
    for index in 0..30 {
        let width = rng.random_range(5..12);
        writeln!(motifs, "Log-odds matrix for Motif {} m{}", index, index).unwrap();
        for letter in ["A", "C", "G", "T"] {
            let row: Vec<String> = (0..width)
                .map(|_| format!("{:.3}", rng.random_range(-4.0..2.0)))
                .collect();
            writeln!(motifs, "#{} {}", letter, row.join(" ")).unwrap();
        }
        writeln!(ids, "MOT{:04}", index).unwrap();
        writeln!(
            calibration,
            "MOT{:04}\t{:.2}\t{:.3}\t{:.3}",
            index,
            rng.random_range(0.6..0.95),
            rng.random_range(0.0..0.5),
            rng.random_range(0.5..1.0)
        )
        .unwrap();
    }
    let files = write_library(dir.path(), &motifs, &ids, &calibration);

    let mut fasta = String::new();
    for index in 0..40 {
        let len = rng.random_range(1..300);
        let residues: String = (0..len)
            .map(|_| ['A', 'C', 'G', 'T', 'a', 'c', 'N'][rng.random_range(0..7)])
            .collect();
        writeln!(fasta, ">chr2:{}-{}\n{}", index * 1000, index * 1000 + len, residues).unwrap();
    }
    let sequences_path = dir.path().join("regions.fa");
    fs::write(&sequences_path, fasta).unwrap();
    let sequences = load_sequences(&sequences_path).unwrap();

    let context = ScanContext::new(
        load_library(&files).unwrap(),
        BackgroundModel::select("hg19"),
        AggregationType::default(),
        ScoringMode::Affinity,
    );

    let serial_path = dir.path().join("serial.txt");
    let parallel_path = dir.path().join("parallel.txt");
    write_matrix(&score_sequences(&context, &sequences, 1).unwrap(), &serial_path);
    write_matrix(&score_sequences(&context, &sequences, 8).unwrap(), &parallel_path);

    let serial = fs::read(&serial_path).unwrap();
    assert_eq!(serial, fs::read(&parallel_path).unwrap());

    let text = String::from_utf8(serial).unwrap();
    assert_eq!(text.lines().count(), 30);
    for line in text.lines() {
        assert_eq!(line.split(' ').count(), 40);
    }
}

#[test]
fn mismatched_identifier_list_fails_before_scanning() {
    let dir = TempDir::new().unwrap();
    let files = write_library(
        dir.path(),
        ACGT_MOTIF,
        "M1\nM2\n",
        "M1\t0.5\t0.5\t0.6\nM2\t0.5\t0.5\t0.6\n",
    );
    let err = load_library(&files).unwrap_err();
    assert_eq!(
        err,
        "Motif count mismatch: 1 motifs in library but 2 identifiers"
    );
}

#[test]
fn missing_calibration_fails_before_scanning() {
    let dir = TempDir::new().unwrap();
    let files = write_library(dir.path(), ACGT_MOTIF, "M1\n", "M9\t0.5\t0.5\t0.6\n");
    let err = load_library(&files).unwrap_err();
    assert_eq!(err, "No calibration found for motif identifier 'M1'");
}

#[test]
fn filtered_regions_define_matrix_columns() {
    let dir = TempDir::new().unwrap();
    let files = write_library(dir.path(), ACGT_MOTIF, "M1\n", "M1\t0.5\t0.5\t0.6\n");
    let sequences_path = dir.path().join("regions.fa");
    fs::write(
        &sequences_path,
        ">mm9_chr1_1000_2000_+\nACGTAC\n\
         >chr1_random:1000-2000\nACGT\n\
         >chr3:10-20 unmapped\nACGT\n\
         >chr5:40-60;peak\nttacgt\n\
         >malformed\nACGT\n",
    )
    .unwrap();
    let gene_file = dir.path().join("closest_genes.xls");
    fs::write(
        &gene_file,
        "chrom\tchromStart\tchromEnd\tname\n\
         chr1\t1000\t2000\tGeneA\n\
         chr1_random\t1000\t2000\tGeneR\n\
         chr5\t45\t55\tGeneB\n",
    )
    .unwrap();

    let sequences = load_sequences(&sequences_path).unwrap();
    let retained = reduce_to_mapped_regions(sequences, &gene_file, None).unwrap();
    let keys: Vec<&str> = retained.iter().map(|s| s.key.as_str()).collect();
    assert_eq!(keys, vec!["mm9_chr1_1000_2000_+", "chr5:40-60;peak"]);

    let derived = load_sequences(&dir.path().join("closest_genes.fsa")).unwrap();
    assert_eq!(derived, retained);

    let context = ScanContext::new(
        load_library(&files).unwrap(),
        BackgroundModel::uniform(),
        AggregationType::Logistic6,
        ScoringMode::Affinity,
    );
    let matrix = score_sequences(&context, &retained, 1).unwrap();
    assert_eq!(matrix.n_cols(), 2);
    assert!(matrix.get(0, 0).unwrap() > 0.99);
    assert!(matrix.get(0, 1).unwrap() > 0.99);
}

#[test]
fn scan_failure_only_zeroes_its_cell() {
    let dir = TempDir::new().unwrap();
    let files = write_library(dir.path(), ACGT_MOTIF, "M1\n", "M1\t0.5\t0.5\t0.6\n");
    let sequences_path = dir.path().join("regions.fa");
    fs::write(&sequences_path, ">s1\nACGT\n>s2\nAC*GT\n>s3\nNNACGTNN\n").unwrap();

    let context = ScanContext::new(
        load_library(&files).unwrap(),
        BackgroundModel::uniform(),
        AggregationType::Logistic6,
        ScoringMode::Affinity,
    );
    let sequences = load_sequences(&sequences_path).unwrap();
    let matrix = score_sequences(&context, &sequences, 3).unwrap();
    assert!(matrix.get(0, 0).unwrap() > 0.99);
    assert_eq!(matrix.get(0, 1), Some(0.0));
    assert!(matrix.get(0, 2).unwrap() > 0.99);
}

#[test]
fn best_scan_reports_raw_window_scores() {
    let dir = TempDir::new().unwrap();
    let files = write_library(dir.path(), ACGT_MOTIF, "M1\n", "M1\t0.5\t0.5\t0.6\n");
    let sequences_path = dir.path().join("regions.fa");
    fs::write(&sequences_path, ">s1\nTTACGTTT\n>s2\nACG\n>s3\nACCT\n").unwrap();

    let context = ScanContext::new(
        load_library(&files).unwrap(),
        BackgroundModel::select("mm9"),
        AggregationType::Logistic6,
        ScoringMode::BestScan,
    );
    let sequences = load_sequences(&sequences_path).unwrap();
    let matrix = score_sequences(&context, &sequences, 2).unwrap();

    let output = dir.path().join("best.txt");
    write_matrix(&matrix, &output);
    assert_eq!(fs::read_to_string(&output).unwrap(), "4.000 0.000 3.000\n");
}
