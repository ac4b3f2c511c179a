//! Loads and saves a `Workbook` as a directory holding one CSV file per
//! table, plus a `workbook.ron` manifest with the table metadata that CSV
//! cannot carry (sheet, anchor, title and highlighted rows).

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use encoding_rs::Encoding;
use encoding_rs_io::DecodeReaderBytesBuilder;
use log::{debug, info, warn};
use serde_derive::{Deserialize, Serialize};

use crate::anchor::Anchor;
use crate::cell::{Cell, Row};
use crate::table::workbook::{Table, Workbook};

pub const MANIFEST_FILE: &str = "workbook.ron";
/// Sheet assigned to tables that have no manifest entry.
pub const DEFAULT_SHEET: &str = "Sheet1";

#[derive(Debug, Default, Deserialize, Serialize)]
struct Manifest {
    tables: BTreeMap<String, TableMeta>,
}

#[derive(Debug, Deserialize, Serialize)]
struct TableMeta {
    sheet: String,
    anchor: Anchor,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    highlighted: Vec<usize>,
}

pub fn load_dir(dir: &Path, encoding: Option<&'static Encoding>) -> Result<Workbook> {
    if !dir.is_dir() {
        bail!("workbook directory {:?} does not exist", dir);
    }
    let mut manifest = read_manifest(dir)?;

    let dir_str = dir
        .to_str()
        .ok_or_else(|| anyhow!("workbook path {:?} is not valid UTF-8", dir))?;
    let pattern = format!("{}/*.csv", glob::Pattern::escape(dir_str));

    let mut workbook = Workbook::new();
    for entry in glob::glob(&pattern)? {
        let path = entry?;
        let name = match path.file_stem().and_then(|s| s.to_str()) {
            Some(name) => name.to_string(),
            None => {
                warn!("Skipping {:?}: file name is not valid UTF-8.", path);
                continue;
            }
        };

        let file = File::open(&path).with_context(|| format!("opening {:?} for reading", path))?;
        let (headers, rows) =
            read_csv(file, encoding).with_context(|| format!("reading {:?}", path))?;

        let (mut table, highlighted) = match manifest.tables.remove(&name) {
            Some(meta) => {
                let mut table = Table::new(name, meta.sheet, meta.anchor, headers);
                table.title = meta.title;
                (table, meta.highlighted)
            }
            None => (
                Table::new(name, DEFAULT_SHEET.to_string(), Anchor::default(), headers),
                Vec::new(),
            ),
        };
        for row in rows {
            table.push_row(row);
        }
        for index in highlighted {
            if !table.highlight(index) {
                warn!(
                    "Manifest highlights row {} of table {} which has only {} rows.",
                    index,
                    table.name,
                    table.row_count()
                );
            }
        }

        debug!("Loaded table {} with {} rows.", table.name, table.row_count());
        workbook.insert_table(table)?;
    }

    for name in manifest.tables.keys() {
        warn!("Manifest lists table {} but there is no {}.csv.", name, name);
    }

    info!(
        "Loaded {} tables from {:?}.",
        workbook.tables().len(),
        dir
    );
    Ok(workbook)
}

pub fn save_dir(workbook: &Workbook, dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).with_context(|| format!("creating directory {:?}", dir))?;

    let mut manifest = Manifest::default();
    for table in workbook.tables() {
        let path = table_path(dir, &table.name);
        let file =
            File::create(&path).with_context(|| format!("opening {:?} for writing", path))?;
        write_csv(table, file).with_context(|| format!("writing {:?}", path))?;
        manifest.tables.insert(
            table.name.clone(),
            TableMeta {
                sheet: table.sheet.clone(),
                anchor: table.anchor.clone(),
                title: table.title.clone(),
                highlighted: table.highlighted(),
            },
        );
    }

    for name in workbook.deleted() {
        let path = table_path(dir, name);
        if path.exists() {
            fs::remove_file(&path).with_context(|| format!("removing {:?}", path))?;
            debug!("Removed deleted table file {:?}.", path);
        }
    }

    let content = ron::ser::to_string_pretty(&manifest, ron::ser::PrettyConfig::default())?;
    let manifest_path = dir.join(MANIFEST_FILE);
    fs::write(&manifest_path, content)
        .with_context(|| format!("writing {:?}", manifest_path))?;

    info!(
        "Saved {} tables to {:?}.",
        workbook.tables().len(),
        dir
    );
    Ok(())
}

fn table_path(dir: &Path, name: &str) -> PathBuf {
    dir.join(format!("{}.csv", name))
}

fn read_manifest(dir: &Path) -> Result<Manifest> {
    let path = dir.join(MANIFEST_FILE);
    if !path.exists() {
        return Ok(Manifest::default());
    }
    let file = File::open(&path).with_context(|| format!("opening {:?} for reading", path))?;
    let manifest: Manifest =
        ron::de::from_reader(file).with_context(|| format!("parsing {:?}", path))?;
    Ok(manifest)
}

/// Reads a CSV table with a header record. Fields are trimmed and rows may
/// be narrower or wider than the header.
pub fn read_csv<R: Read>(
    reader: R,
    encoding: Option<&'static Encoding>,
) -> Result<(Vec<String>, Vec<Row>)> {
    let decoded = DecodeReaderBytesBuilder::new()
        .encoding(encoding)
        .build(reader);
    let mut csv_rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(decoded);

    let headers: Vec<String> = csv_rdr.headers()?.iter().map(String::from).collect();
    let rows = csv_rdr
        .records()
        .map(|record| record.map(|r| r.iter().map(Cell::from_field).collect::<Row>()))
        .collect::<Result<Vec<Row>, csv::Error>>()?;

    Ok((headers, rows))
}

pub fn write_csv<W: Write>(table: &Table, writer: W) -> Result<()> {
    let mut csv_wtr = csv::WriterBuilder::new()
        .flexible(true)
        .from_writer(writer);
    csv_wtr.write_record(&table.headers)?;
    for row in table.rows() {
        csv_wtr.write_record(row.iter().map(ToString::to_string))?;
    }
    csv_wtr.flush()?;
    Ok(())
}
