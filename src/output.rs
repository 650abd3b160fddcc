use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use anyhow::Context;
use serde::Serialize;

pub const POSTS_TABLE: &str = "facebook_posts";
pub const COMMENTS_TABLE: &str = "facebook_comments";

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Format {
    Csv,
    Json,
}

impl Format {
    pub fn extension(&self) -> &'static str {
        match self {
            Format::Csv => "csv",
            Format::Json => "json",
        }
    }
}

/// Writes a header line taken from the field names, then one line per row.
pub fn write_csv<W: Write, R: Serialize>(w: W, rows: &[R]) -> anyhow::Result<()> {
    let mut writer = csv::Writer::from_writer(w);
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_json<W: Write, R: Serialize>(w: W, rows: &[R]) -> anyhow::Result<()> {
    serde_json::to_writer_pretty(w, rows)?;
    Ok(())
}

/// Saves `rows` as `<dir>/<name>.<ext>`, creating `dir` when missing.
pub fn save_table<R: Serialize>(
    dir: &Path,
    name: &str,
    format: Format,
    rows: &[R],
) -> anyhow::Result<PathBuf> {
    fs::create_dir_all(dir).context(format!("could not create directory {:?}", dir))?;

    let path = dir.join(format!("{}.{}", name, format.extension()));
    let file = File::create(&path).context(format!("could not create {:?}", path))?;
    let writer = BufWriter::new(file);

    match format {
        Format::Csv => write_csv(writer, rows).context(format!("could not write {:?}", path))?,
        Format::Json => write_json(writer, rows).context(format!("could not write {:?}", path))?,
    }

    debug!("saved {} rows to {:?}", rows.len(), path);
    Ok(path)
}
