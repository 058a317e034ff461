//! Loading the comma-separated input sources and writing the JSON result.
//!
//! Both sources start with a header line, which is skipped. Blank lines are
//! ignored, fields are trimmed and trailing extra fields are ignored.

use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use log::info;

use crate::error::OptimizerError;
use crate::result::OptimizationResult;
use crate::types::{Competitor, PopulationPoint};

/// Read population rows of `area_id,population,lat,long` from a file
pub fn load_population(path: &Path) -> Result<Vec<PopulationPoint>, OptimizerError> {
    let file = File::open(path).map_err(|e| OptimizerError::io(path, e))?;
    let points = read_population(BufReader::new(file), &path.display().to_string())?;
    info!("Loaded {} population areas from {}", points.len(), path.display());
    Ok(points)
}

/// Read competitor rows of `ignored,lat,long` from a file
pub fn load_competitors(path: &Path) -> Result<Vec<Competitor>, OptimizerError> {
    let file = File::open(path).map_err(|e| OptimizerError::io(path, e))?;
    let competitors = read_competitors(BufReader::new(file), &path.display().to_string())?;
    info!("Loaded {} competitors from {}", competitors.len(), path.display());
    Ok(competitors)
}

/// Load both sources concurrently; both must succeed before either is
/// returned.
pub fn load_inputs(
    population_path: &Path,
    competitor_path: &Path,
) -> Result<(Vec<PopulationPoint>, Vec<Competitor>), OptimizerError> {
    let (populations, competitors) = rayon::join(
        || load_population(population_path),
        || load_competitors(competitor_path),
    );
    Ok((populations?, competitors?))
}

/// Parse population rows from any buffered reader. `source` names the input
/// in error messages.
pub fn read_population<R: BufRead>(
    reader: R,
    source: &str,
) -> Result<Vec<PopulationPoint>, OptimizerError> {
    let mut points = Vec::new();
    for_each_row(reader, source, |line_no, fields| {
        let [id, population, lat, long] = take_fields::<4>(fields, source, line_no)?;
        let population = population.parse::<u64>().map_err(|_| {
            OptimizerError::invalid_data(format!(
                "{source} line {line_no}: invalid population: {population}"
            ))
        })?;
        points.push(PopulationPoint::new(
            id,
            population,
            parse_coordinate(lat, "latitude", source, line_no)?,
            parse_coordinate(long, "longitude", source, line_no)?,
        ));
        Ok(())
    })?;
    Ok(points)
}

/// Parse competitor rows from any buffered reader
pub fn read_competitors<R: BufRead>(
    reader: R,
    source: &str,
) -> Result<Vec<Competitor>, OptimizerError> {
    let mut competitors = Vec::new();
    for_each_row(reader, source, |line_no, fields| {
        let [_, lat, long] = take_fields::<3>(fields, source, line_no)?;
        competitors.push(Competitor::new(
            parse_coordinate(lat, "latitude", source, line_no)?,
            parse_coordinate(long, "longitude", source, line_no)?,
        ));
        Ok(())
    })?;
    Ok(competitors)
}

/// Write the result as pretty-printed JSON, creating the parent directory
/// when needed
pub fn write_result(path: &Path, result: &OptimizationResult) -> Result<(), OptimizerError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| OptimizerError::io(parent, e))?;
    }

    let file = File::create(path).map_err(|e| OptimizerError::io(path, e))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, result)?;
    writer
        .write_all(b"\n")
        .and_then(|_| writer.flush())
        .map_err(|e| OptimizerError::io(path, e))?;

    info!("Results saved to {}", path.display());
    Ok(())
}

fn for_each_row<R, F>(reader: R, source: &str, mut on_row: F) -> Result<(), OptimizerError>
where
    R: BufRead,
    F: FnMut(usize, Vec<&str>) -> Result<(), OptimizerError>,
{
    for (idx, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| OptimizerError::io(source, e))?;
        // Header
        if idx == 0 {
            continue;
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        on_row(idx + 1, line.split(',').map(str::trim).collect())?;
    }
    Ok(())
}

fn take_fields<'a, const N: usize>(
    fields: Vec<&'a str>,
    source: &str,
    line_no: usize,
) -> Result<[&'a str; N], OptimizerError> {
    if fields.len() < N {
        return Err(OptimizerError::invalid_data(format!(
            "{source} line {line_no}: expected {N} fields but got {}",
            fields.len()
        )));
    }

    let mut out = [""; N];
    out.copy_from_slice(&fields[..N]);
    Ok(out)
}

fn parse_coordinate(
    raw: &str,
    name: &str,
    source: &str,
    line_no: usize,
) -> Result<f64, OptimizerError> {
    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(OptimizerError::invalid_data(format!(
            "{source} line {line_no}: invalid {name}: {raw}"
        ))),
    }
}
