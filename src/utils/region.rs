use crate::utils::Result;

/// A genomic interval as written in region keys and proximity tables.
#[derive(Debug, PartialEq, Clone)]
pub struct GenomicRegion {
    pub contig: String,
    pub start: i64,
    pub end: i64,
}

impl GenomicRegion {
    pub fn new(contig: impl Into<String>, start: i64, end: i64) -> Self {
        Self {
            contig: contig.into(),
            start,
            end,
        }
    }

    /// Parses a `chrom:start-end` encoding.
    pub fn from_string(encoding: &str) -> Result<Self> {
        let error_msg = || format!("Invalid region encoding: {}", encoding);
        let (contig, range) = encoding.split_once(':').ok_or_else(error_msg)?;
        let (start, end) = range.split_once('-').ok_or_else(error_msg)?;
        if contig.is_empty() {
            return Err(error_msg());
        }

        let start: i64 = start.trim().parse().map_err(|_| error_msg())?;
        let end: i64 = end.trim().parse().map_err(|_| error_msg())?;

        Ok(Self::new(contig, start, end))
    }

    /// Parses a `genome_chrom_start_end[_strand...]` encoding.
    pub fn from_underscore_key(encoding: &str) -> Result<Self> {
        const MIN_FIELD_COUNT: usize = 4;
        let fields: Vec<&str> = encoding.split('_').collect();
        if fields.len() < MIN_FIELD_COUNT {
            return Err(format!(
                "Expected at least {} '_'-separated fields (genome_chrom_start_end), found {}: {}",
                MIN_FIELD_COUNT,
                fields.len(),
                encoding
            ));
        }

        let error_msg = || format!("Invalid region encoding: {}", encoding);
        let start: i64 = fields[2].parse().map_err(|_| error_msg())?;
        let end: i64 = fields[3].parse().map_err(|_| error_msg())?;

        Ok(Self::new(fields[1], start, end))
    }

    /// Integer midpoint, rounding toward negative infinity.
    pub fn midpoint(&self) -> Result<i64> {
        self.end
            .checked_sub(self.start)
            .and_then(|span| self.start.checked_add(span.div_euclid(2)))
            .ok_or_else(|| {
                format!(
                    "Region {}:{}-{} is too wide to take a midpoint",
                    self.contig, self.start, self.end
                )
            })
    }

    /// The `chrom:midpoint` key used to match regions against proximity records.
    pub fn midpoint_key(&self) -> Result<String> {
        Ok(format!("{}:{}", self.contig, self.midpoint()?))
    }
}

/// Outcome of decoding a sequence key into a region.
#[derive(Debug, PartialEq)]
pub enum RegionKey {
    /// Keys on `random` contigs are never retained.
    Random,
    Region(GenomicRegion),
}

/// The leading token of a sequence key: text before the first `;`, or before
/// the first space when the key has no `;`.
fn key_token(key: &str) -> &str {
    let token = match key.split_once(';') {
        Some((head, _)) => head,
        None => key.split(' ').next().unwrap_or(key),
    };
    token.trim()
}

/// Decodes a sequence key. Regions whose midpoint cannot be represented are errors.
pub fn parse_region_key(key: &str) -> Result<RegionKey> {
    let token = key_token(key);
    if token.contains("random") {
        return Ok(RegionKey::Random);
    }
    let region = if token.contains(':') {
        GenomicRegion::from_string(token)?
    } else {
        GenomicRegion::from_underscore_key(token)?
    };
    region.midpoint()?;
    Ok(RegionKey::Region(region))
}
