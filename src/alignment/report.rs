use std::io::Write;

use serde::Serialize;

use crate::alignment::ledger::MatchLedger;
use crate::error::AlignmentError;

pub const REPORT_SCHEMA_VERSION: u32 = 1;
pub const DEFAULT_TOP_N: usize = 10;

/// Label for the empty ("no equivalent") row in text output.
const NO_EQUIVALENT_LABEL: &str = "(none)";

#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub schema_version: u32,
    pub meta: Meta,
    pub connectors: Vec<ConnectorTop>,
    pub dropped_candidates: Vec<String>,
    pub counts: MatchLedger,
}

#[derive(Debug, Clone, Serialize)]
pub struct Meta {
    pub generated_at: String,
    pub strategy: String,
    pub source_path: String,
    pub target_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_path: Option<String>,
    pub frame: usize,
    pub start: isize,
    pub max_window: usize,
    pub top_n: usize,
    pub line_count: usize,
    pub no_match_count: usize,
    pub skipped_occurrences: usize,
}

/// Highest counts of one source connector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConnectorTop {
    pub connector: String,
    pub total: u64,
    pub top: Vec<EquivalentCount>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EquivalentCount {
    pub equivalent: String,
    pub count: u64,
}

/// Dense view of a ledger: one row per equivalent, one column per source connector.
///
/// Rows and columns are sorted; the empty equivalent is kept as the first
/// row. Pairs never observed read as 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyTable {
    rows: Vec<String>,
    columns: Vec<String>,
    // cells[row][column]
    cells: Vec<Vec<u64>>,
}

impl FrequencyTable {
    pub fn from_ledger(ledger: &MatchLedger) -> Self {
        let rows: Vec<String> = ledger.row_keys().into_iter().map(str::to_string).collect();
        let columns: Vec<String> = ledger.connectors().map(str::to_string).collect();
        let cells = rows
            .iter()
            .map(|row| {
                columns
                    .iter()
                    .map(|column| ledger.count(column, row))
                    .collect()
            })
            .collect();
        Self {
            rows,
            columns,
            cells,
        }
    }

    pub fn rows(&self) -> &[String] {
        &self.rows
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn cell(&self, row: &str, column: &str) -> u64 {
        let Some(r) = self.rows.iter().position(|x| x == row) else {
            return 0;
        };
        let Some(c) = self.columns.iter().position(|x| x == column) else {
            return 0;
        };
        self.cells[r][c]
    }

    /// Header is an empty cell followed by the connector names.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), AlignmentError> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        csv_writer
            .write_record(std::iter::once("").chain(self.columns.iter().map(String::as_str)))
            .map_err(|e| AlignmentError::csv("writing frequency table header", e))?;
        for (row, counts) in self.rows.iter().zip(&self.cells) {
            let mut record = Vec::with_capacity(counts.len() + 1);
            record.push(row.clone());
            record.extend(counts.iter().map(u64::to_string));
            csv_writer
                .write_record(&record)
                .map_err(|e| AlignmentError::csv("writing frequency table row", e))?;
        }
        csv_writer
            .flush()
            .map_err(|e| AlignmentError::csv("flushing frequency table", e.into()))
    }

    /// Up to `n` equivalents per connector, by descending count.
    ///
    /// Ties keep row order. Equivalents never seen with a connector are left out.
    pub fn top_values(&self, n: usize) -> Result<Vec<ConnectorTop>, AlignmentError> {
        if n == 0 {
            return Err(AlignmentError::invalid_config("top_n must be >= 1"));
        }
        Ok(self
            .columns
            .iter()
            .enumerate()
            .map(|(c, connector)| {
                let mut column: Vec<(&String, u64)> = self
                    .rows
                    .iter()
                    .zip(&self.cells)
                    .map(|(row, counts)| (row, counts[c]))
                    .filter(|&(_, count)| count > 0)
                    .collect();
                let total = column.iter().map(|&(_, count)| count).sum();
                column.sort_by(|a, b| b.1.cmp(&a.1));
                ConnectorTop {
                    connector: connector.clone(),
                    total,
                    top: column
                        .into_iter()
                        .take(n)
                        .map(|(equivalent, count)| EquivalentCount {
                            equivalent: equivalent.clone(),
                            count,
                        })
                        .collect(),
                }
            })
            .collect())
    }

    /// Plain-text top-`n` listing, one block per connector.
    pub fn write_top_values<W: Write>(&self, n: usize, mut writer: W) -> Result<(), AlignmentError> {
        let tops = self.top_values(n)?;
        let mut out = String::new();
        out.push_str(&format!("Top {n} of every connector:\n\n"));
        for top in &tops {
            let width = top
                .top
                .iter()
                .map(|e| display_equivalent(&e.equivalent).chars().count())
                .max()
                .unwrap_or(0);
            out.push_str(&format!("{} ({} total)\n", top.connector, top.total));
            for entry in &top.top {
                out.push_str(&format!(
                    "  {:<width$}  {}\n",
                    display_equivalent(&entry.equivalent),
                    entry.count
                ));
            }
            out.push('\n');
        }
        writer
            .write_all(out.as_bytes())
            .map_err(|e| AlignmentError::write("writing top values report", e))
    }
}

fn display_equivalent(equivalent: &str) -> &str {
    if equivalent.is_empty() {
        NO_EQUIVALENT_LABEL
    } else {
        equivalent
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_ledger() -> MatchLedger {
        let mut ledger = MatchLedger::new();
        for _ in 0..3 {
            ledger.note_match("aber", "but");
        }
        ledger.note_match("aber", "however");
        ledger.note_match("aber", "yet");
        ledger.note_match("aber", "");
        ledger.note_match("doch", "yet");
        ledger.note_match("doch", "yet");
        ledger
    }

    #[test]
    fn table_fills_missing_cells_with_zero() {
        let table = FrequencyTable::from_ledger(&sample_ledger());
        assert_eq!(table.rows(), ["", "but", "however", "yet"]);
        assert_eq!(table.columns(), ["aber", "doch"]);
        assert_eq!(table.cell("but", "aber"), 3);
        assert_eq!(table.cell("but", "doch"), 0);
        assert_eq!(table.cell("yet", "doch"), 2);
        assert_eq!(table.cell("missing", "aber"), 0);
    }

    #[test]
    fn csv_has_empty_corner_cell_and_zero_fill() {
        let table = FrequencyTable::from_ledger(&sample_ledger());
        let mut buf = Vec::new();
        table.write_csv(&mut buf).expect("write to memory");
        let text = String::from_utf8(buf).expect("utf-8 csv");
        assert_eq!(
            text,
            ",aber,doch\n,1,0\nbut,3,0\nhowever,1,0\nyet,1,2\n"
        );
    }

    #[test]
    fn top_values_sort_descending_and_keep_row_order_on_ties() {
        let table = FrequencyTable::from_ledger(&sample_ledger());
        let tops = table.top_values(3).expect("n > 0");
        let aber = &tops[0];
        assert_eq!(aber.connector, "aber");
        assert_eq!(aber.total, 6);
        let order: Vec<&str> = aber.top.iter().map(|e| e.equivalent.as_str()).collect();
        assert_eq!(order, ["but", "", "however"]);

        let doch = &tops[1];
        assert_eq!(doch.top.len(), 1);
        assert_eq!(doch.top[0].equivalent, "yet");
    }

    #[test]
    fn top_values_rejects_zero() {
        let table = FrequencyTable::from_ledger(&sample_ledger());
        assert!(matches!(
            table.top_values(0),
            Err(AlignmentError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn text_report_lists_every_connector() {
        let table = FrequencyTable::from_ledger(&sample_ledger());
        let mut buf = Vec::new();
        table.write_top_values(2, &mut buf).expect("write to memory");
        let text = String::from_utf8(buf).expect("utf-8 text");
        assert!(text.starts_with("Top 2 of every connector:\n\n"));
        assert!(text.contains("aber (6 total)\n  but     3\n  (none)  1\n"));
        assert!(text.contains("doch (2 total)\n  yet  2\n"));
    }

    struct ClosedSink;

    impl Write for ClosedSink {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn text_report_write_failure_is_a_write_error() {
        let table = FrequencyTable::from_ledger(&sample_ledger());
        let err = table.write_top_values(2, ClosedSink).unwrap_err();
        assert!(matches!(err, AlignmentError::Write { .. }));
        assert!(err.to_string().contains("writing top values report"));
    }

    #[test]
    fn empty_ledger_gives_empty_table() {
        let table = FrequencyTable::from_ledger(&MatchLedger::new());
        assert!(table.rows().is_empty());
        assert!(table.top_values(10).expect("n > 0").is_empty());
    }
}
