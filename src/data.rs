use crate::error::{DashboardError, Result};
use std::io;
use std::path::{Path, PathBuf};

/// Immutable table loaded from a delimited file: a header row plus string cells.
///
/// Cells stay as text; numeric columns are parsed on demand so that the same
/// table can feed both categorical and continuous channels.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    origin: PathBuf,
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

/// How a declared column must parse
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Text,
    Numeric,
}

/// One column a panel expects its dataset to carry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnDef {
    pub name: &'static str,
    pub kind: ColumnKind,
}

impl ColumnDef {
    pub const fn text(name: &'static str) -> Self {
        Self { name, kind: ColumnKind::Text }
    }

    pub const fn numeric(name: &'static str) -> Self {
        Self { name, kind: ColumnKind::Numeric }
    }
}

impl Dataset {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self {
            origin: PathBuf::from("<memory>"),
            headers,
            rows,
        }
    }

    /// Build a dataset from string literals (handy for fixtures)
    pub fn from_literals(headers: &[&str], rows: &[&[&str]]) -> Self {
        Self::new(
            headers.iter().map(|h| h.to_string()).collect(),
            rows.iter()
                .map(|r| r.iter().map(|c| c.to_string()).collect())
                .collect(),
        )
    }

    pub fn origin(&self) -> &Path {
        &self.origin
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// A new dataset with the same headers and origin but different rows
    pub fn with_rows(&self, rows: Vec<Vec<String>>) -> Self {
        Self {
            origin: self.origin.clone(),
            headers: self.headers.clone(),
            rows,
        }
    }

    /// Position of a column by exact name
    pub fn column_index(&self, name: &str) -> Result<usize> {
        self.headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| DashboardError::ColumnNotFound {
                column: name.to_string(),
                available: self.headers.clone(),
            })
    }

    pub fn text_column(&self, name: &str) -> Result<Vec<String>> {
        self.cells(name)?
            .map(|cell| cell.map(|(_, text)| text.to_string()))
            .collect()
    }

    pub fn numeric_column(&self, name: &str) -> Result<Vec<f64>> {
        self.cells(name)?
            .map(|cell| cell.and_then(|(row_idx, text)| self.parse_number(text, name, row_idx)))
            .collect()
    }

    /// Whether every cell of a column parses as a number
    pub fn is_numeric(&self, name: &str) -> Result<bool> {
        for cell in self.cells(name)? {
            let (_, text) = cell?;
            if text.trim().parse::<f64>().is_err() {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Check that every declared column exists and numeric columns parse
    pub fn validate(&self, columns: &[ColumnDef]) -> Result<()> {
        for column in columns {
            for cell in self.cells(column.name)? {
                let (row_idx, text) = cell?;
                if column.kind == ColumnKind::Numeric {
                    self.parse_number(text, column.name, row_idx)?;
                }
            }
        }
        Ok(())
    }

    /// Cells of one column with their row index; a short row is a `DataSource` error
    fn cells<'a>(
        &'a self,
        name: &'a str,
    ) -> Result<impl Iterator<Item = Result<(usize, &'a str)>> + 'a> {
        let idx = self.column_index(name)?;
        Ok(self.rows.iter().enumerate().map(move |(row_idx, row)| {
            row.get(idx).map(|cell| (row_idx, cell.as_str())).ok_or_else(|| {
                DashboardError::data_source(
                    &self.origin,
                    format!(
                        "row {} has {} cells, column '{}' is missing",
                        row_idx + 1,
                        row.len(),
                        name
                    ),
                )
            })
        }))
    }

    pub(crate) fn parse_number(&self, cell: &str, column: &str, row_idx: usize) -> Result<f64> {
        let value = cell.trim().parse::<f64>().map_err(|_| {
            DashboardError::data_source(
                &self.origin,
                format!(
                    "row {}, column '{}': cannot parse '{}' as a number",
                    row_idx + 1,
                    column,
                    cell
                ),
            )
        })?;
        if !value.is_finite() {
            return Err(DashboardError::data_source(
                &self.origin,
                format!(
                    "row {}, column '{}': '{}' is not finite",
                    row_idx + 1,
                    column,
                    cell
                ),
            ));
        }
        Ok(value)
    }
}

/// Read a comma-delimited file with a header row.
///
/// Every failure (missing file, bad UTF-8, ragged rows, absent header) maps to
/// `DashboardError::DataSource`. Nothing is retried and no row is skipped.
pub fn load_table(path: impl AsRef<Path>) -> Result<Dataset> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(DashboardError::data_source(path, "file does not exist"));
    }

    let file = std::fs::File::open(path)
        .map_err(|e| DashboardError::data_source(path, format!("cannot open file: {}", e)))?;

    let mut dataset = read_table(file, path)?;
    dataset.origin = path.to_path_buf();
    Ok(dataset)
}

/// Parse delimited text from any reader; `origin` only labels errors
pub fn read_table<R: io::Read>(reader: R, origin: &Path) -> Result<Dataset> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| DashboardError::data_source(origin, format!("invalid header row: {}", e)))?
        .iter()
        .map(|h| h.to_string())
        .collect();

    if headers.is_empty() || headers.iter().all(|h| h.is_empty()) {
        return Err(DashboardError::data_source(origin, "missing header row"));
    }

    let mut rows = Vec::new();
    for (row_idx, record) in reader.records().enumerate() {
        let record = record.map_err(|e| {
            DashboardError::data_source(origin, format!("malformed row {}: {}", row_idx + 1, e))
        })?;
        rows.push(record.iter().map(|cell| cell.to_string()).collect());
    }

    Ok(Dataset {
        origin: origin.to_path_buf(),
        headers,
        rows,
    })
}
