//! Loading of the motif library, its identifier list and per-motif calibration.
//!
//! The three inputs are positionally aligned: motif `i` in the library file is
//! named by line `i` of the identifier list, and every identifier has exactly
//! one calibration entry. [`MotifLibrary::new`] enforces this before any
//! scanning takes place.

use crate::affinity::motif::Motif;
use crate::utils::{open_input_reader, with_path_context, Result};
use serde::Deserialize;
use std::{
    collections::{HashMap, HashSet},
    io::{BufRead, Read},
    path::Path,
};

const MOTIF_HEADER: &str = "Log-odds matrix for Motif";
const SOURCE_PREFIX: &str = "Source:";

/// Per-motif scan threshold and sigmoid reference statistics.
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct Calibration {
    /// Fraction of the motif score range a window must reach to count as a match.
    pub threshold: f64,
    pub sum: f64,
    pub fp: f64,
}

impl Calibration {
    pub fn new(threshold: f64, sum: f64, fp: f64) -> Result<Self> {
        if !(0.0..=1.0).contains(&threshold) {
            return Err(format!(
                "Threshold fraction must be between 0.0 and 1.0, got: {}",
                threshold
            ));
        }
        if !sum.is_finite() || !fp.is_finite() {
            return Err(format!(
                "Calibration statistics must be finite, got SUM={} FP={}",
                sum, fp
            ));
        }
        Ok(Self { threshold, sum, fp })
    }

    pub fn is_degenerate(&self) -> bool {
        self.fp == self.sum
    }
}

/// Motifs in library order, each paired with its identifier and calibration.
#[derive(Debug)]
pub struct MotifLibrary {
    motifs: Vec<Motif>,
    ids: Vec<String>,
    calibrations: Vec<Calibration>,
}

impl MotifLibrary {
    pub fn new(
        motifs: Vec<Motif>,
        ids: Vec<String>,
        calibration_map: HashMap<String, Calibration>,
    ) -> Result<Self> {
        if motifs.is_empty() {
            return Err("Motif library contains no motifs".to_string());
        }
        if motifs.len() != ids.len() {
            return Err(format!(
                "Motif count mismatch: {} motifs in library but {} identifiers",
                motifs.len(),
                ids.len()
            ));
        }

        let calibrations = ids
            .iter()
            .map(|id| {
                calibration_map
                    .get(id)
                    .copied()
                    .ok_or_else(|| format!("No calibration found for motif identifier '{}'", id))
            })
            .collect::<Result<Vec<_>>>()?;

        let distinct_ids: HashSet<&String> = ids.iter().collect();
        if distinct_ids.len() != calibration_map.len() {
            return Err(format!(
                "Calibration count mismatch: {} calibration entries for {} distinct identifiers",
                calibration_map.len(),
                distinct_ids.len()
            ));
        }

        Ok(Self {
            motifs,
            ids,
            calibrations,
        })
    }

    pub fn load(motifs_path: &Path, ids_path: &Path, calibration_path: &Path) -> Result<Self> {
        let motifs = load_motifs(motifs_path)?;
        let ids = load_ids(ids_path)?;
        let calibrations = load_calibration(calibration_path)?;
        Self::new(motifs, ids, calibrations)
    }

    /// Never zero: construction rejects an empty library.
    pub fn n_motifs(&self) -> usize {
        self.motifs.len()
    }

    /// Iterates `(motif, id, calibration)` in library order.
    pub fn iter(&self) -> impl Iterator<Item = (&Motif, &str, &Calibration)> {
        self.motifs
            .iter()
            .zip(&self.ids)
            .zip(&self.calibrations)
            .map(|((motif, id), calibration)| (motif, id.as_str(), calibration))
    }
}

pub fn load_motifs(path: &Path) -> Result<Vec<Motif>> {
    let reader = open_input_reader(path)?;
    with_path_context(parse_motifs(reader), path)
}

pub fn load_ids(path: &Path) -> Result<Vec<String>> {
    let reader = open_input_reader(path)?;
    with_path_context(parse_ids(reader), path)
}

pub fn load_calibration(path: &Path) -> Result<HashMap<String, Calibration>> {
    let reader = open_input_reader(path)?;
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let calibrations = if is_json {
        parse_calibration_json(reader)
    } else {
        parse_calibration_table(reader)
    };
    with_path_context(calibrations, path)
}

#[derive(Default)]
struct MotifBlock {
    name: String,
    source: Option<String>,
    rows: [Option<Vec<f64>>; 4],
    line_number: usize,
}

impl MotifBlock {
    fn into_motif(self) -> Result<Motif> {
        let MotifBlock {
            name,
            source,
            rows,
            line_number,
        } = self;
        let error_prefix = format!("Motif '{}' at line {}", name, line_number);

        let mut columns: Vec<Vec<f64>> = Vec::with_capacity(4);
        for (letter, row) in ["A", "C", "G", "T"].iter().zip(rows) {
            let row = row.ok_or_else(|| format!("{}: missing #{} row", error_prefix, letter))?;
            columns.push(row);
        }

        let width = columns[0].len();
        if columns.iter().any(|c| c.len() != width) {
            return Err(format!("{}: rows have different lengths", error_prefix));
        }

        let weights = (0..width)
            .map(|pos| [columns[0][pos], columns[1][pos], columns[2][pos], columns[3][pos]])
            .collect();
        let motif = Motif::new(name, weights).map_err(|e| format!("{}: {}", error_prefix, e))?;
        Ok(match source {
            Some(source) => motif.with_source(source),
            None => motif,
        })
    }
}

fn letter_row_index(tag: &str) -> Option<usize> {
    match tag {
        "#A" => Some(0),
        "#C" => Some(1),
        "#G" => Some(2),
        "#T" => Some(3),
        _ => None,
    }
}

pub fn parse_motifs<R: BufRead>(reader: R) -> Result<Vec<Motif>> {
    let mut motifs = Vec::new();
    let mut block: Option<MotifBlock> = None;

    for (line_number, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| format!("Error reading line {}: {}", line_number + 1, e))?;
        let line = line.trim();

        if let Some(rest) = line.strip_prefix(MOTIF_HEADER) {
            if let Some(done) = block.take() {
                motifs.push(done.into_motif()?);
            }
            block = Some(MotifBlock {
                name: rest.trim().to_string(),
                line_number: line_number + 1,
                ..Default::default()
            });
            continue;
        }

        let Some(current) = block.as_mut() else {
            continue;
        };

        if let Some(source) = line.strip_prefix(SOURCE_PREFIX) {
            current.source = Some(source.trim().to_string());
            continue;
        }

        let mut fields = line.split_whitespace();
        let Some(row_index) = fields.next().and_then(letter_row_index) else {
            continue;
        };
        let values = fields
            .map(|v| {
                v.parse::<f64>()
                    .map_err(|_| format!("Invalid weight '{}' at line {}", v, line_number + 1))
            })
            .collect::<Result<Vec<_>>>()?;
        if current.rows[row_index].replace(values).is_some() {
            return Err(format!(
                "Duplicate matrix row at line {} for motif '{}'",
                line_number + 1,
                current.name
            ));
        }
    }

    if let Some(done) = block.take() {
        motifs.push(done.into_motif()?);
    }

    Ok(motifs)
}

pub fn parse_ids<R: BufRead>(reader: R) -> Result<Vec<String>> {
    let mut ids = Vec::new();
    for (line_number, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| format!("Error reading line {}: {}", line_number + 1, e))?;
        ids.push(line.trim_end_matches(['\r', '\n']).to_string());
    }
    while ids.last().is_some_and(|id| id.trim().is_empty()) {
        ids.pop();
    }
    Ok(ids)
}

pub fn parse_calibration_json<R: Read>(reader: R) -> Result<HashMap<String, Calibration>> {
    let raw: HashMap<String, (f64, f64, f64)> =
        serde_json::from_reader(reader).map_err(|e| format!("Invalid calibration JSON: {}", e))?;
    raw.into_iter()
        .map(|(id, (threshold, sum, fp))| {
            Calibration::new(threshold, sum, fp)
                .map(|c| (id.clone(), c))
                .map_err(|e| format!("Motif '{}': {}", id, e))
        })
        .collect()
}

#[derive(Debug, Deserialize)]
struct CalibrationRecord {
    id: String,
    threshold: f64,
    sum: f64,
    fp: f64,
}

pub fn parse_calibration_table<R: Read>(reader: R) -> Result<HashMap<String, Calibration>> {
    let mut table = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .comment(Some(b'#'))
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut calibrations = HashMap::new();
    for (row_number, row) in table.records().enumerate() {
        let row = row.map_err(|e| format!("Error reading calibration row {}: {}", row_number + 1, e))?;
        if row_number == 0 && row.get(0).is_some_and(|f| f.eq_ignore_ascii_case("id")) {
            continue;
        }
        let record: CalibrationRecord = row
            .deserialize(None)
            .map_err(|e| format!("Invalid calibration row {}: {}", row_number + 1, e))?;
        let calibration = Calibration::new(record.threshold, record.sum, record.fp)
            .map_err(|e| format!("Motif '{}': {}", record.id, e))?;
        if calibrations.insert(record.id.clone(), calibration).is_some() {
            return Err(format!("Duplicate calibration for motif '{}'", record.id));
        }
    }
    Ok(calibrations)
}
