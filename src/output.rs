//! CSV / JSON writers for scraped records.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::info;

use crate::error::ScraperError;
use crate::restaurant::RestaurantRecord;

pub const CSV_HEADER: [&str; 7] = [
    "title",
    "address",
    "social_links",
    "phone",
    "image",
    "link",
    "is_retail",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Every field, one row per restaurant.
    Csv,
    /// `{"restaurants": [title, ...]}`
    TitlesJson,
}

impl OutputFormat {
    pub fn default_path(self) -> &'static str {
        match self {
            OutputFormat::Csv => "restaurant_info.csv",
            OutputFormat::TitlesJson => "restaurant_titles.json",
        }
    }
}

#[derive(Serialize)]
struct TitleList<'a> {
    restaurants: Vec<&'a str>,
}

pub fn write_csv<W: Write>(records: &[RestaurantRecord], writer: W) -> Result<(), ScraperError> {
    let mut csv_writer = csv::WriterBuilder::new().from_writer(writer);
    csv_writer.write_record(CSV_HEADER)?;

    for record in records {
        let social_links = serde_json::to_string(&record.social_links)?;
        csv_writer.write_record([
            record.title.as_str(),
            record.address.as_str(),
            social_links.as_str(),
            record.phone.as_str(),
            record.image_url.as_deref().unwrap_or_default(),
            record.detail_link.as_deref().unwrap_or_default(),
            if record.is_retail { "true" } else { "false" },
        ])?;
    }

    csv_writer.flush()?;
    Ok(())
}

pub fn write_titles_json<W: Write>(records: &[RestaurantRecord], writer: W) -> Result<(), ScraperError> {
    let list = TitleList {
        restaurants: records.iter().map(|r| r.title.as_str()).collect(),
    };
    serde_json::to_writer_pretty(writer, &list)?;
    Ok(())
}

/// Writes `records` to `path`, returning its absolute form.
pub fn write_to_path(
    records: &[RestaurantRecord],
    format: OutputFormat,
    path: impl AsRef<Path>,
) -> Result<PathBuf, ScraperError> {
    let path = path.as_ref();
    let mut out = BufWriter::new(File::create(path)?);

    match format {
        OutputFormat::Csv => write_csv(records, &mut out)?,
        OutputFormat::TitlesJson => write_titles_json(records, &mut out)?,
    }
    out.flush()?;

    let absolute = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
    info!("Wrote {} records to {}", records.len(), absolute.display());
    Ok(absolute)
}
