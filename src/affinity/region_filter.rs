//! Reduction of the sequence set to regions that map to a gene.
//!
//! A region is kept when the `chrom:midpoint` of its sequence key matches the
//! midpoint of a record in the gene-proximity table.

use crate::affinity::{sequence::Sequence, writers::FastaWriter};
use crate::utils::{
    derived_fasta_path, open_input_reader, parse_region_key, with_path_context, GenomicRegion,
    RegionKey, Result,
};
use serde::Deserialize;
use std::{collections::HashSet, io::Read, path::Path};

#[derive(Debug, Deserialize)]
struct ProximityRecord {
    chrom: String,
    #[serde(rename = "chromStart")]
    chrom_start: i64,
    #[serde(rename = "chromEnd")]
    chrom_end: i64,
}

/// `chrom:midpoint` keys of all regions in a proximity table.
#[derive(Debug, Default)]
pub struct GeneProximityMap {
    midpoints: HashSet<String>,
    n_records: usize,
}

impl GeneProximityMap {
    pub fn load(path: &Path) -> Result<Self> {
        let reader = open_input_reader(path)?;
        with_path_context(Self::from_reader(reader), path)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut table = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .flexible(true)
            .from_reader(reader);

        let mut map = Self::default();
        for (row_number, record) in table.deserialize::<ProximityRecord>().enumerate() {
            let row_error =
                |e: String| format!("Invalid proximity record at row {}: {}", row_number + 1, e);
            let record = record.map_err(|e| row_error(e.to_string()))?;
            let region = GenomicRegion::new(record.chrom, record.chrom_start, record.chrom_end);
            map.midpoints.insert(region.midpoint_key().map_err(row_error)?);
            map.n_records += 1;
        }
        Ok(map)
    }

    pub fn contains(&self, midpoint_key: &str) -> bool {
        self.midpoints.contains(midpoint_key)
    }

    /// Number of table records, counting records that share a midpoint.
    pub fn n_records(&self) -> usize {
        self.n_records
    }

    /// Whether a sequence key maps to a proximity record.
    pub fn retains(&self, sequence_key: &str) -> bool {
        let midpoint_key = parse_region_key(sequence_key).and_then(|key| match key {
            RegionKey::Random => Ok(None),
            RegionKey::Region(region) => region.midpoint_key().map(Some),
        });
        match midpoint_key {
            Ok(Some(midpoint_key)) => self.contains(&midpoint_key),
            Ok(None) => false,
            Err(e) => {
                log::warn!("Cannot find sequence data for {}: {}", sequence_key, e);
                false
            }
        }
    }
}

pub fn filter_sequences(sequences: Vec<Sequence>, map: &GeneProximityMap) -> Vec<Sequence> {
    sequences
        .into_iter()
        .filter(|sequence| map.retains(&sequence.key))
        .collect()
}

/// Filters `sequences` by the proximity table at `gene_file` and writes the
/// retained records to `output` (by default next to the table, see
/// [`derived_fasta_path`]).
pub fn reduce_to_mapped_regions(
    sequences: Vec<Sequence>,
    gene_file: &Path,
    output: Option<&Path>,
) -> Result<Vec<Sequence>> {
    let map = GeneProximityMap::load(gene_file)?;
    let n_events = sequences.len();
    let retained = filter_sequences(sequences, &map);
    log::info!(
        "Found {} events from FASTA file that map to {} event-gene matches out of {} events",
        retained.len(),
        map.n_records(),
        n_events
    );

    let output_path = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| derived_fasta_path(gene_file));
    let mut writer = FastaWriter::new(&output_path)?;
    writer.write_all(&retained)?;
    writer.finish()?;
    log::info!("Wrote reduced sequences to {}", output_path.display());

    Ok(retained)
}
