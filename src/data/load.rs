use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::data::color::Palette;
use crate::data::dataset::{CategoryDecl, Dataset, Keyframe};
use crate::foundation::core::CategoryId;
use crate::foundation::error::{RaceError, RaceResult};

/// JSON boundary shape of a dataset file.
#[derive(Debug, serde::Deserialize)]
#[serde(untagged)]
enum DatasetDef {
    Keyframes {
        #[serde(default)]
        categories: Vec<CategoryDecl>,
        keyframes: Vec<Keyframe>,
    },
    Rows {
        #[serde(default)]
        categories: Vec<CategoryDecl>,
        rows: Vec<RowDef>,
    },
}

/// One `(time, name, value)` row of a long-format table.
#[derive(Debug, serde::Deserialize)]
struct RowDef {
    time: f64,
    name: CategoryId,
    value: f64,
}

impl Dataset {
    /// Parse a dataset from a JSON reader.
    ///
    /// Accepts either `{"categories": [...], "keyframes": [...]}` or the long-table form
    /// `{"rows": [{"time", "name", "value"}]}`. Rows are grouped by time; a repeated
    /// `(time, name)` pair is rejected.
    pub fn from_reader<R: std::io::Read>(r: R, palette: &Palette) -> RaceResult<Self> {
        let def: DatasetDef = serde_json::from_reader(r)
            .map_err(|e| RaceError::invalid_dataset(format!("parse dataset JSON: {e}")))?;
        match def {
            DatasetDef::Keyframes {
                categories,
                keyframes,
            } => Self::new(categories, keyframes, palette),
            DatasetDef::Rows { categories, rows } => {
                let (decls, keyframes) = group_rows(categories, rows)?;
                Self::new(decls, keyframes, palette)
            }
        }
    }

    /// Parse a dataset from a JSON file on disk.
    #[tracing::instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn from_path(path: impl AsRef<Path>, palette: &Palette) -> RaceResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            RaceError::invalid_dataset(format!("open dataset JSON '{}': {e}", path.display()))
        })?;
        let ds = Self::from_reader(BufReader::new(f), palette)?;
        tracing::debug!(
            keyframes = ds.keyframes().len(),
            categories = ds.categories().len(),
            "dataset loaded"
        );
        Ok(ds)
    }
}

fn group_rows(
    mut decls: Vec<CategoryDecl>,
    rows: Vec<RowDef>,
) -> RaceResult<(Vec<CategoryDecl>, Vec<Keyframe>)> {
    // Keyed by the timestamp's bit pattern; `total_cmp` order is restored below.
    let mut by_time: BTreeMap<u64, Keyframe> = BTreeMap::new();
    for row in rows {
        if !row.time.is_finite() {
            return Err(RaceError::invalid_dataset(format!(
                "row for '{}' has a non-finite time",
                row.name
            )));
        }
        if !decls.iter().any(|d| d.id == row.name) {
            decls.push(CategoryDecl::new(row.name.clone()));
        }
        // -0.0 and 0.0 must share a keyframe.
        let time = if row.time == 0.0 { 0.0 } else { row.time };
        let kf = by_time
            .entry(time.to_bits())
            .or_insert_with(|| Keyframe {
                time,
                values: BTreeMap::new(),
            });
        if kf.values.insert(row.name.clone(), row.value).is_some() {
            return Err(RaceError::invalid_dataset(format!(
                "duplicate row for '{}' at time {}",
                row.name, row.time
            )));
        }
    }

    let mut keyframes: Vec<Keyframe> = by_time.into_values().collect();
    keyframes.sort_by(|a, b| a.time.total_cmp(&b.time));
    Ok((decls, keyframes))
}

#[cfg(test)]
#[path = "../../tests/unit/data/load.rs"]
mod tests;
