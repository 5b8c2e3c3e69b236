use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use connector_align::{FrequencyTable, NoMatch, Report};

pub fn write_frequency_csv(path: &Path, table: &FrequencyTable) -> Result<(), String> {
    table
        .write_csv(open_output(path)?)
        .map_err(|err| format!("frequency table '{}': {err}", path.display()))
}

pub fn write_top_values(path: &Path, table: &FrequencyTable, top_n: usize) -> Result<(), String> {
    let mut out = open_output(path)?;
    table
        .write_top_values(top_n, &mut out)
        .map_err(|err| format!("top values '{}': {err}", path.display()))?;
    finish(path, out)
}

pub fn write_no_match_log(path: &Path, no_matches: &[NoMatch]) -> Result<(), String> {
    let mut out = open_output(path)?;
    for event in no_matches {
        writeln!(out, "No match: Line {} ({})", event.line, event.connector)
            .map_err(|err| format!("no-match log '{}': {err}", path.display()))?;
    }
    finish(path, out)
}

pub fn write_json_report(path: &Path, report: &Report) -> Result<(), String> {
    let mut out = open_output(path)?;
    serde_json::to_writer_pretty(&mut out, report)
        .map_err(|err| format!("JSON report '{}': {err}", path.display()))?;
    out.write_all(b"\n")
        .map_err(|err| format!("JSON report '{}': {err}", path.display()))?;
    finish(path, out)
}

fn open_output(path: &Path) -> Result<BufWriter<File>, String> {
    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir)
            .map_err(|err| format!("cannot create output directory '{}': {err}", dir.display()))?;
    }
    let file = File::create(path)
        .map_err(|err| format!("cannot create '{}': {err}", path.display()))?;
    Ok(BufWriter::new(file))
}

fn finish(path: &Path, mut out: BufWriter<File>) -> Result<(), String> {
    out.flush()
        .map_err(|err| format!("cannot flush '{}': {err}", path.display()))
}
