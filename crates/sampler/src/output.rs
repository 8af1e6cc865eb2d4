//! Delimited text output of sample matrices.
use crate::errors::Result;
use ndarray::{ArrayBase, Data, Ix2};
use std::io::Write;
use std::path::Path;
use std::str::FromStr;

/// Field separator of the written samples
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Delimiter {
    /// Comma separated values
    #[default]
    Comma,
    /// Single space separated values
    Space,
}

impl Delimiter {
    fn as_byte(&self) -> u8 {
        match self {
            Delimiter::Comma => b',',
            Delimiter::Space => b' ',
        }
    }
}

impl FromStr for Delimiter {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "comma" | "," => Ok(Delimiter::Comma),
            "space" | " " => Ok(Delimiter::Space),
            _ => Err(format!("unknown delimiter '{s}', expected comma or space")),
        }
    }
}

/// Writes `samples` to `writer`, one row per line, without header
pub fn write_delimited_to<W: Write>(
    writer: W,
    samples: &ArrayBase<impl Data<Elem = f64>, Ix2>,
    delimiter: Delimiter,
) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .delimiter(delimiter.as_byte())
        .from_writer(writer);
    for row in samples.rows() {
        wtr.write_record(row.iter().map(|v| v.to_string()))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Writes `samples` to the file at `path`, one row per line, without header
pub fn write_delimited<P: AsRef<Path>>(
    path: P,
    samples: &ArrayBase<impl Data<Elem = f64>, Ix2>,
    delimiter: Delimiter,
) -> Result<()> {
    let file = std::fs::File::create(path)?;
    write_delimited_to(std::io::BufWriter::new(file), samples, delimiter)
}
