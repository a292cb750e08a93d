use std::collections::BTreeSet;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use cidchain_core::StoreError;
use thiserror::Error;

const FOURCC: [u8; 4] = *b"IxF2";
const METRIC_L2: u8 = 0;

#[derive(Debug, Error)]
pub enum FlatIndexError {
    #[error("index io failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("not a flat index file (magic {0:?})")]
    BadMagic([u8; 4]),
    #[error("unsupported metric tag {0}")]
    UnsupportedMetric(u8),
    #[error("index header declares {ntotal} vectors of dimension {dimension}, too large")]
    TooLarge { ntotal: u64, dimension: u32 },
    #[error("index truncated: expected {expected} bytes of vectors, got {got}")]
    Truncated { expected: usize, got: usize },
}

impl From<FlatIndexError> for StoreError {
    fn from(value: FlatIndexError) -> Self {
        StoreError::Internal(Box::new(value))
    }
}

/// Exhaustive index over fixed-dimension vectors, searched by squared L2 distance.
///
/// Rows are numbered by insertion order; removing rows shifts later rows down.
#[derive(Clone, Debug, PartialEq)]
pub struct FlatIndex {
    dimension: usize,
    ntotal: usize,
    data: Vec<f32>,
}

impl FlatIndex {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            ntotal: 0,
            data: Vec::new(),
        }
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn ntotal(&self) -> usize {
        self.ntotal
    }

    pub fn is_empty(&self) -> bool {
        self.ntotal == 0
    }

    pub fn add(&mut self, vectors: &[Vec<f32>]) -> Result<(), StoreError> {
        if let Some(bad) = vectors.iter().find(|v| v.len() != self.dimension) {
            return Err(StoreError::DimensionMismatch {
                expected: self.dimension,
                got: bad.len(),
            });
        }
        for vector in vectors {
            self.data.extend_from_slice(vector);
        }
        self.ntotal += vectors.len();
        Ok(())
    }

    pub fn reconstruct(&self, row: usize) -> Option<&[f32]> {
        if row >= self.ntotal {
            return None;
        }
        let start = row * self.dimension;
        Some(&self.data[start..start + self.dimension])
    }

    /// Returns up to `k` `(row, distance)` pairs, nearest first.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<(usize, f32)>, StoreError> {
        if query.len() != self.dimension {
            return Err(StoreError::DimensionMismatch {
                expected: self.dimension,
                got: query.len(),
            });
        }

        let mut scored: Vec<(usize, f32)> = (0..self.ntotal)
            .filter_map(|row| self.reconstruct(row).map(|v| (row, squared_l2(query, v))))
            .collect();
        scored.sort_by(|a, b| a.1.total_cmp(&b.1));
        scored.truncate(k);
        Ok(scored)
    }

    /// Drops the given rows and compacts the rest. Returns how many rows were removed.
    pub fn remove_rows(&mut self, rows: &BTreeSet<usize>) -> usize {
        let before = self.ntotal;
        let mut kept = Vec::with_capacity(self.data.len());
        for row in (0..self.ntotal).filter(|row| !rows.contains(row)) {
            if let Some(vector) = self.reconstruct(row) {
                kept.extend_from_slice(vector);
            }
        }
        self.ntotal = before - rows.iter().filter(|row| **row < before).count();
        self.data = kept;
        before - self.ntotal
    }

    pub fn write_to<W: Write>(&self, mut writer: W) -> Result<(), FlatIndexError> {
        let dimension = u32::try_from(self.dimension).map_err(|_| FlatIndexError::TooLarge {
            ntotal: self.ntotal as u64,
            dimension: u32::MAX,
        })?;
        writer.write_all(&FOURCC)?;
        writer.write_all(&dimension.to_le_bytes())?;
        writer.write_all(&(self.ntotal as u64).to_le_bytes())?;
        writer.write_all(&[METRIC_L2])?;
        for value in &self.data {
            writer.write_all(&value.to_le_bytes())?;
        }
        writer.flush()?;
        Ok(())
    }

    pub fn read_from<R: Read>(mut reader: R) -> Result<Self, FlatIndexError> {
        let mut magic = [0u8; 4];
        reader.read_exact(&mut magic)?;
        if magic != FOURCC {
            return Err(FlatIndexError::BadMagic(magic));
        }

        let mut word = [0u8; 4];
        reader.read_exact(&mut word)?;
        let dimension = u32::from_le_bytes(word);
        let mut long = [0u8; 8];
        reader.read_exact(&mut long)?;
        let ntotal = u64::from_le_bytes(long);
        let mut metric = [0u8; 1];
        reader.read_exact(&mut metric)?;
        if metric[0] != METRIC_L2 {
            return Err(FlatIndexError::UnsupportedMetric(metric[0]));
        }

        let too_large = FlatIndexError::TooLarge { ntotal, dimension };
        let expected = ntotal
            .checked_mul(u64::from(dimension))
            .and_then(|values| values.checked_mul(4))
            .and_then(|bytes| usize::try_from(bytes).ok())
            .ok_or(too_large)?;

        let mut raw = Vec::new();
        reader.take(expected as u64).read_to_end(&mut raw)?;
        if raw.len() != expected {
            return Err(FlatIndexError::Truncated {
                expected,
                got: raw.len(),
            });
        }

        let data = raw
            .chunks_exact(4)
            .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
            .collect();
        Ok(Self {
            dimension: dimension as usize,
            ntotal: ntotal as usize,
            data,
        })
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, FlatIndexError> {
        let mut out = Vec::with_capacity(17 + self.data.len() * 4);
        self.write_to(&mut out)?;
        Ok(out)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, FlatIndexError> {
        Self::read_from(bytes)
    }

    pub fn write_to_path(&self, path: &Path) -> Result<(), FlatIndexError> {
        self.write_to(BufWriter::new(File::create(path)?))
    }

    pub fn read_from_path(path: &Path) -> Result<Self, FlatIndexError> {
        Self::read_from(BufReader::new(File::open(path)?))
    }
}

fn squared_l2(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b)
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum()
}
