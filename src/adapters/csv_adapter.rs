//! CSV file ledger adapter.
//!
//! The backing file is a header plus one row per transaction. Saves write a
//! temp file in the same directory and rename it over the target.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use csv::StringRecord;
use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::domain::error::LedgerError;
use crate::domain::settings::LegacySchemaPolicy;
use crate::domain::transaction::{Kind, Transaction, parse_amount};
use crate::ports::ledger_port::LedgerPort;

pub const HEADER: [&str; 5] = ["date", "type", "category", "value", "id"];

/// Column positions resolved from a file's header row.
struct Columns {
    date: usize,
    kind: usize,
    category: usize,
    value: usize,
    id: Option<usize>,
}

enum HeaderCheck {
    Current(Columns),
    Legacy,
}

fn find_column(headers: &StringRecord, names: &[&str]) -> Option<usize> {
    headers
        .iter()
        .position(|h| names.iter().any(|n| h.trim().eq_ignore_ascii_case(n)))
}

fn check_header(headers: &StringRecord, file: &Path) -> Result<HeaderCheck, LedgerError> {
    let Some(kind) = find_column(headers, &["type", "tipo"]) else {
        return Ok(HeaderCheck::Legacy);
    };
    let required = |names: &[&str], label: &str| {
        find_column(headers, names).ok_or_else(|| LedgerError::Schema {
            file: file.display().to_string(),
            reason: format!("missing {} column", label),
        })
    };
    Ok(HeaderCheck::Current(Columns {
        date: required(&["date", "data"], "date")?,
        kind,
        category: required(&["category", "categoria"], "category")?,
        value: required(&["value", "valor"], "value")?,
        id: find_column(headers, &["id"]),
    }))
}

pub struct CsvLedgerAdapter {
    path: PathBuf,
    legacy_schema: LegacySchemaPolicy,
}

impl CsvLedgerAdapter {
    pub fn new(path: PathBuf, legacy_schema: LegacySchemaPolicy) -> Self {
        Self {
            path,
            legacy_schema,
        }
    }

    /// `<file>.bak` for generation 0, `<file>.bak.<n>` after that.
    pub fn backup_path(&self, generation: u32) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".bak");
        if generation > 0 {
            name.push(format!(".{}", generation));
        }
        PathBuf::from(name)
    }

    /// First backup name not already taken, so earlier backups are kept.
    fn free_backup_path(&self) -> PathBuf {
        (0..=u32::MAX)
            .map(|generation| self.backup_path(generation))
            .find(|candidate| !candidate.exists())
            .unwrap_or_else(|| self.backup_path(u32::MAX))
    }

    fn initialize(&self) -> Result<(), LedgerError> {
        self.save(&[])?;
        debug!(path = %self.path.display(), "initialized empty ledger");
        Ok(())
    }

    fn handle_legacy(&self) -> Result<(), LedgerError> {
        match self.legacy_schema {
            LegacySchemaPolicy::Refuse => {
                return Err(LedgerError::Schema {
                    file: self.path.display().to_string(),
                    reason: "missing type column (set [ledger] legacy_schema to backup or discard to reinitialize)".into(),
                });
            }
            LegacySchemaPolicy::Backup => {
                let backup = self.free_backup_path();
                fs::rename(&self.path, &backup)?;
                warn!(
                    path = %self.path.display(),
                    backup = %backup.display(),
                    "ledger file has no type column; moved it aside and started a new ledger"
                );
            }
            LegacySchemaPolicy::Discard => {
                warn!(
                    path = %self.path.display(),
                    "ledger file has no type column; discarding its contents"
                );
            }
        }
        self.initialize()
    }

    fn parse_record(
        record: &StringRecord,
        columns: &Columns,
        line: usize,
    ) -> Result<(Option<u64>, Transaction), LedgerError> {
        let cell = |index: usize| record.get(index).unwrap_or("");
        let kind: Kind = cell(columns.kind).parse().map_err(|e| LedgerError::Storage {
            reason: format!("line {}: {}", line, e),
        })?;
        let amount = parse_amount(cell(columns.value)).map_err(|e| LedgerError::Storage {
            reason: format!("line {}: {}", line, e),
        })?;
        let id = match columns.id.map(cell).map(str::trim) {
            Some(raw) if !raw.is_empty() => Some(raw.parse::<u64>().map_err(|_| {
                LedgerError::Storage {
                    reason: format!("line {}: invalid id '{}'", line, raw),
                }
            })?),
            _ => None,
        };
        Ok((
            id,
            Transaction {
                id: 0,
                date: cell(columns.date).trim().to_string(),
                kind,
                category: cell(columns.category).trim().to_string(),
                amount,
            },
        ))
    }

    fn read_rows(&self, content: &str) -> Result<Option<Vec<Transaction>>, LedgerError> {
        let mut rdr = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(content.as_bytes());

        let headers = rdr.headers()?.clone();
        let columns = match check_header(&headers, &self.path)? {
            HeaderCheck::Current(columns) => columns,
            HeaderCheck::Legacy => return Ok(None),
        };

        let mut parsed = Vec::new();
        for (i, result) in rdr.records().enumerate() {
            let record = result?;
            // Header is line 1.
            parsed.push(Self::parse_record(&record, &columns, i + 2)?);
        }

        // Rows without a stored id get fresh ones after the highest stored id.
        let mut next = parsed.iter().filter_map(|(id, _)| *id).max().unwrap_or(0) + 1;
        let rows = parsed
            .into_iter()
            .map(|(id, mut t)| {
                t.id = id.unwrap_or_else(|| {
                    let assigned = next;
                    next += 1;
                    assigned
                });
                t
            })
            .collect();
        Ok(Some(rows))
    }
}

impl LedgerPort for CsvLedgerAdapter {
    fn load(&self) -> Result<Vec<Transaction>, LedgerError> {
        if !self.path.exists() {
            self.initialize()?;
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&self.path).map_err(|e| LedgerError::Storage {
            reason: format!("failed to read {}: {}", self.path.display(), e),
        })?;
        if content.trim().is_empty() {
            self.initialize()?;
            return Ok(Vec::new());
        }

        match self.read_rows(&content)? {
            Some(rows) => {
                debug!(path = %self.path.display(), rows = rows.len(), "loaded ledger");
                Ok(rows)
            }
            None => {
                self.handle_legacy()?;
                Ok(Vec::new())
            }
        }
    }

    fn save(&self, rows: &[Transaction]) -> Result<(), LedgerError> {
        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir)?;

        let mut tmp = NamedTempFile::new_in(&dir)?;
        {
            let mut wtr = csv::Writer::from_writer(tmp.as_file_mut());
            wtr.write_record(HEADER)?;
            for t in rows {
                let amount = t.amount.to_string();
                let id = t.id.to_string();
                wtr.write_record([
                    t.date.as_str(),
                    t.kind.label(),
                    t.category.as_str(),
                    amount.as_str(),
                    id.as_str(),
                ])?;
            }
            wtr.flush()?;
        }
        tmp.as_file_mut().flush()?;
        tmp.persist(&self.path).map_err(|e| LedgerError::Storage {
            reason: format!("failed to replace {}: {}", self.path.display(), e.error),
        })?;

        debug!(path = %self.path.display(), rows = rows.len(), "saved ledger");
        Ok(())
    }
}
