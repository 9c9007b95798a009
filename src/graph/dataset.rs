// Measure dependency dataset parser
//
// The dataset is a tab-separated export with a header row and a fixed
// column order:
//
// ```text
// Measure\tExpression\tInputs\tConsumers\t(reserved)\tColumns
// ```
//
// The three list columns are semicolon-delimited; an empty string means
// no entries. The column order and delimiter are a de facto contract
// with existing exporters and must not change.

#![allow(dead_code)] // API methods reserved for future use

use miette::{IntoDiagnostic, Result, WrapErr};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

/// Column layout of the dependency export.
const MEASURE_COL: usize = 0;
const EXPRESSION_COL: usize = 1;
const INPUTS_COL: usize = 2;
const CONSUMERS_COL: usize = 3;
const COLUMNS_COL: usize = 5;
const MIN_COLUMNS: usize = 6;

/// Dataset parse errors
///
/// A malformed row poisons the whole dataset: dependency integrity
/// cannot be partially trusted, so parsing is all-or-nothing.
#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("malformed dependency row at line {line}: expected at least {MIN_COLUMNS} columns, found {found}")]
    MalformedRow { line: usize, found: usize },
    #[error("dependency dataset is empty (no header row)")]
    Empty,
}

/// One measure's merged dependency record.
///
/// `inputs` are upstream measures this measure's formula consumes;
/// `consumers` are downstream measures whose formulas consume this one;
/// `columns` are the leaf data-model fields it touches.
#[derive(Debug, Clone, Default)]
pub struct MeasureRecord {
    pub name: String,
    pub expression: String,
    pub inputs: Vec<String>,
    pub consumers: Vec<String>,
    pub columns: Vec<String>,
}

impl MeasureRecord {
    /// A root measure depends only on raw columns.
    pub fn is_root(&self) -> bool {
        self.inputs.is_empty()
    }

    /// A final measure is consumed by no other measure in any row.
    pub fn is_final(&self) -> bool {
        self.consumers.is_empty()
    }
}

/// The parsed dependency dataset: one merged record per measure name.
///
/// Real exports can repeat a measure name across rows. Duplicate rows are
/// union-merged at load time (inputs, consumers and columns accumulate,
/// order-preserving, deduplicated) so downstream logic never has to
/// special-case duplicates. A name is therefore only "final" if *every*
/// row for it had an empty consumer list.
#[derive(Debug, Clone, Default)]
pub struct DependencyDataset {
    /// Measure names in first-seen order
    order: Vec<String>,
    /// Merged records indexed by measure name
    records: HashMap<String, MeasureRecord>,
}

impl DependencyDataset {
    /// Parse a dependency dataset from a TSV file
    pub fn parse(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .into_diagnostic()
            .wrap_err_with(|| format!("failed to read dependency dataset: {}", path.display()))?;
        Self::parse_content(&content)
    }

    /// Parse dependency dataset content
    pub fn parse_content(content: &str) -> Result<Self> {
        let mut dataset = DependencyDataset::default();
        let mut lines = content.lines().enumerate();

        // Header row carries no data
        if lines.next().is_none() {
            return Err(DatasetError::Empty).into_diagnostic();
        }

        for (idx, line) in lines {
            if line.is_empty() {
                continue;
            }

            let fields: Vec<&str> = line.split('\t').collect();
            if fields.len() < MIN_COLUMNS {
                return Err(DatasetError::MalformedRow {
                    line: idx + 1,
                    found: fields.len(),
                })
                .into_diagnostic();
            }

            dataset.merge_row(
                fields[MEASURE_COL],
                fields[EXPRESSION_COL],
                fields[INPUTS_COL],
                fields[CONSUMERS_COL],
                fields[COLUMNS_COL],
            );
        }

        debug!("Parsed {} measure records", dataset.len());
        Ok(dataset)
    }

    /// Merge one raw row into the record for its measure name
    fn merge_row(&mut self, name: &str, expression: &str, inputs: &str, consumers: &str, columns: &str) {
        if !self.records.contains_key(name) {
            self.order.push(name.to_string());
        }
        let record = self
            .records
            .entry(name.to_string())
            .or_insert_with(|| MeasureRecord {
                name: name.to_string(),
                ..Default::default()
            });

        // Expression text is diagnostic only; first non-empty wins
        if record.expression.is_empty() && !expression.is_empty() {
            record.expression = expression.to_string();
        }

        extend_unique(&mut record.inputs, inputs);
        extend_unique(&mut record.consumers, consumers);
        extend_unique(&mut record.columns, columns);
    }

    /// Get the merged record for a measure name
    pub fn get(&self, name: &str) -> Option<&MeasureRecord> {
        self.records.get(name)
    }

    /// Iterate records in first-seen order
    pub fn records(&self) -> impl Iterator<Item = &MeasureRecord> {
        self.order.iter().filter_map(|name| self.records.get(name))
    }

    /// The record map, for callers that index by name
    pub fn record_map(&self) -> &HashMap<String, MeasureRecord> {
        &self.records
    }

    /// All distinct measure names appearing in the measure column, sorted
    pub fn all_measures(&self) -> Vec<String> {
        let mut names: Vec<String> = self.order.clone();
        names.sort();
        names
    }

    /// Measures with no consumers in any row, sorted
    pub fn final_measures(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .records()
            .filter(|r| r.is_final())
            .map(|r| r.name.clone())
            .collect();
        names.sort();
        names
    }

    /// Expression texts per measure, with literal escape sequences expanded
    ///
    /// Exporters flatten multi-line expressions into `\n`/`\t`/`\r` escape
    /// sequences so they fit in one TSV cell; undo that for display.
    pub fn expressions(&self) -> Vec<(String, String)> {
        self.records()
            .filter(|r| !r.name.trim().is_empty() && !r.expression.is_empty())
            .map(|r| {
                let text = r
                    .expression
                    .replace("\\n", "\n")
                    .replace("\\t", "\t")
                    .replace("\\r", "\r");
                (r.name.clone(), text)
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Split a semicolon-delimited list cell and append entries not already present
fn extend_unique(target: &mut Vec<String>, cell: &str) {
    for entry in cell.split(';') {
        let entry = entry.trim();
        if !entry.is_empty() && !target.iter().any(|e| e == entry) {
            target.push(entry.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "Measure\tExpression\tInputs\tConsumers\tReserved\tColumns\n";

    #[test]
    fn test_parse_basic_rows() {
        let content = format!(
            "{HEADER}\
             Total Sales\tSUM(Sales[Amount])\t\t\t\tSales[Amount]\n\
             Margin\t[Total Sales] - [Cost]\tTotal Sales; Cost\t\t\t\n"
        );
        let dataset = DependencyDataset::parse_content(&content).unwrap();

        assert_eq!(dataset.len(), 2);
        let margin = dataset.get("Margin").unwrap();
        assert_eq!(margin.inputs, vec!["Total Sales", "Cost"]);
        assert!(margin.is_final());
        assert!(dataset.get("Total Sales").unwrap().is_root());
    }

    #[test]
    fn test_malformed_row_is_fatal() {
        let content = format!("{HEADER}OnlyName\tExpr\n");
        let result = DependencyDataset::parse_content(&content);
        assert!(result.is_err());
    }

    #[test]
    fn test_duplicate_rows_union_merge() {
        let content = format!(
            "{HEADER}\
             M\texpr\tA\t\t\tT[C1]\n\
             M\t\tB; A\tX\t\tT[C2]\n"
        );
        let dataset = DependencyDataset::parse_content(&content).unwrap();

        assert_eq!(dataset.len(), 1);
        let m = dataset.get("M").unwrap();
        assert_eq!(m.inputs, vec!["A", "B"]);
        assert_eq!(m.consumers, vec!["X"]);
        assert_eq!(m.columns, vec!["T[C1]", "T[C2]"]);
        assert_eq!(m.expression, "expr");
        // Any row with consumers disqualifies the name from "final"
        assert!(dataset.final_measures().is_empty());
    }

    #[test]
    fn test_final_measures_excludes_parents() {
        let content = format!(
            "{HEADER}\
             A\t\t\tB\t\tT[C]\n\
             B\t\tA\t\t\t\n"
        );
        let dataset = DependencyDataset::parse_content(&content).unwrap();
        assert_eq!(dataset.final_measures(), vec!["B"]);
        assert_eq!(dataset.all_measures(), vec!["A", "B"]);
    }

    #[test]
    fn test_expressions_unescaped() {
        let content = format!("{HEADER}M\tline1\\nline2\\tend\t\t\t\t\n");
        let dataset = DependencyDataset::parse_content(&content).unwrap();
        let exprs = dataset.expressions();
        assert_eq!(exprs.len(), 1);
        assert_eq!(exprs[0].1, "line1\nline2\tend");
    }
}
