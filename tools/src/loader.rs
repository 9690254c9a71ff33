//! CSV loading — turns the dataset directory into validated records.

use adpulse_core::{config::MetricsConfig, dataset::Dataset, schema::RawTable};
use anyhow::{Context, Result};
use std::path::Path;

pub fn read_table(path: &Path, name: &str) -> Result<RawTable> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("Cannot open {}", path.display()))?;

    let headers = reader
        .headers()
        .with_context(|| format!("Cannot read header of {}", path.display()))?
        .iter()
        .map(String::from)
        .collect();

    let rows = reader
        .records()
        .map(|record| record.map(|r| r.iter().map(String::from).collect()))
        .collect::<Result<Vec<Vec<String>>, csv::Error>>()
        .with_context(|| format!("Malformed CSV in {}", path.display()))?;

    Ok(RawTable::new(name, headers, rows))
}

/// Load the business file and every configured channel file. A missing
/// channel file is skipped; no marketing file at all is an error.
pub fn load_dataset(data_dir: &str, config: &MetricsConfig) -> Result<Dataset> {
    let dir = Path::new(data_dir);
    let business = read_table(&dir.join(&config.business_file), "business")?;

    let mut marketing = Vec::new();
    for (channel, file_name) in &config.marketing_files {
        let path = dir.join(file_name);
        if !path.exists() {
            log::warn!("Marketing data file not found: {}", path.display());
            continue;
        }
        marketing.push((channel.clone(), read_table(&path, channel)?));
    }
    if marketing.is_empty() {
        anyhow::bail!("No marketing data files found in {data_dir}");
    }

    let dataset = Dataset::from_tables(&business, &marketing, &config.column_mappings)?;
    log::info!(
        "Loaded {} business rows and {} marketing rows from {data_dir}",
        dataset.business.len(),
        dataset.marketing.len()
    );
    Ok(dataset)
}
