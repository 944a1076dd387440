//! Delimited table parsing
//!
//! Reads tab-separated text with a header row into [`Record`]s. The dialect
//! matches what spreadsheet TSV exports produce: `\n`, `\r\n` or `\r` line
//! endings, optional `"`-quoted fields (which may hold tabs and newlines, `""`
//! escapes a quote), blank rows skipped, cells never trimmed. A quote left open
//! at the end of the text is an error.

use std::sync::Arc;

use crate::domain::error::{DomainError, DomainResult};

/// Default field delimiter.
pub const TAB: char = '\t';

/// A parsed table: header columns plus data records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    columns: Arc<Vec<String>>,
    records: Vec<Record>,
}

/// One data row, addressed by column name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// 1-based line in the source where this row starts
    pub line: usize,
    columns: Arc<Vec<String>>,
    cells: Vec<String>,
}

impl Table {
    /// Parse tab-separated text.
    pub fn parse(text: &str) -> DomainResult<Self> {
        Self::parse_with(text, TAB)
    }

    /// Parse text using `delimiter` between fields.
    pub fn parse_with(text: &str, delimiter: char) -> DomainResult<Self> {
        let mut rows = split_rows(text, delimiter)?.into_iter();

        let columns = match rows.next() {
            Some((_, header)) => Arc::new(header),
            None => Arc::new(Vec::new()),
        };

        let records = rows
            .map(|(line, cells)| Record {
                line,
                columns: Arc::clone(&columns),
                cells,
            })
            .collect();

        Ok(Self { columns, records })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl Record {
    /// Cell value for `column`.
    ///
    /// A column absent from the header is an error. A row shorter than the
    /// header reads its missing cells as empty strings.
    pub fn get(&self, column: &str) -> DomainResult<&str> {
        let idx = self
            .columns
            .iter()
            .position(|c| c == column)
            .ok_or_else(|| DomainError::MissingColumn {
                line: self.line,
                column: column.to_string(),
            })?;
        Ok(self.cells.get(idx).map(String::as_str).unwrap_or(""))
    }
}

/// Split text into rows of cells, tagging each row with its starting line.
fn split_rows(text: &str, delimiter: char) -> DomainResult<Vec<(usize, Vec<String>)>> {
    let mut rows = Vec::new();
    let mut row: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut line = 1;
    let mut row_line = 1;
    let mut in_quotes = false;
    let mut quote_line = 0;
    // true once the current field started with a quote that has been closed
    let mut after_quote = false;

    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    field.push('"');
                }
                '"' => {
                    in_quotes = false;
                    after_quote = true;
                }
                '\n' => {
                    line += 1;
                    field.push(c);
                }
                _ => field.push(c),
            }
            continue;
        }

        match c {
            '"' if field.is_empty() && !after_quote => {
                in_quotes = true;
                quote_line = line;
            }
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' | '\r' => {
                row.push(std::mem::take(&mut field));
                push_row(&mut rows, row_line, std::mem::take(&mut row));
                after_quote = false;
                line += 1;
                row_line = line;
            }
            c if c == delimiter => {
                row.push(std::mem::take(&mut field));
                after_quote = false;
            }
            _ => field.push(c),
        }
    }

    if in_quotes {
        return Err(DomainError::UnterminatedQuote { line: quote_line });
    }
    if !field.is_empty() || !row.is_empty() || after_quote {
        row.push(field);
        push_row(&mut rows, row_line, row);
    }

    Ok(rows)
}

fn push_row(rows: &mut Vec<(usize, Vec<String>)>, line: usize, row: Vec<String>) {
    // blank lines produce a single empty cell
    if row.len() == 1 && row[0].is_empty() {
        return;
    }
    rows.push((line, row));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_header_and_rows_when_parsing_then_maps_cells_by_column() {
        let table = Table::parse("Node\tTier\nA\t0\nB\t1\n").unwrap();

        assert_eq!(table.columns(), &["Node".to_string(), "Tier".to_string()]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.records()[1].get("Node").unwrap(), "B");
        assert_eq!(table.records()[1].get("Tier").unwrap(), "1");
        assert_eq!(table.records()[1].line, 3);
    }

    #[test]
    fn given_crlf_line_endings_when_parsing_then_strips_carriage_returns() {
        let table = Table::parse("Node\tTier\r\nA\t0\r\n").unwrap();

        assert_eq!(table.records()[0].get("Tier").unwrap(), "0");
    }

    #[test]
    fn given_lone_carriage_returns_when_parsing_then_ends_records() {
        let table = Table::parse("Node\tTier\rA\t0\rB\t1\r").unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(table.records()[0].get("Tier").unwrap(), "0");
        assert_eq!(table.records()[1].get("Node").unwrap(), "B");
        assert_eq!(table.records()[1].line, 3);
    }

    #[test]
    fn given_carriage_return_inside_quotes_when_parsing_then_keeps_it() {
        let table = Table::parse("Note\n\"a\rb\"\n").unwrap();

        assert_eq!(table.records()[0].get("Note").unwrap(), "a\rb");
    }

    #[test]
    fn given_blank_lines_when_parsing_then_skips_them_and_keeps_line_numbers() {
        let table = Table::parse("Node\n\nA\n\n\nB").unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(table.records()[0].line, 3);
        assert_eq!(table.records()[1].line, 6);
    }

    #[test]
    fn given_quoted_field_with_tab_and_newline_when_parsing_then_keeps_it_whole() {
        let text = "Name\tNote\nA\t\"x\ty\nz \"\"q\"\"\"\nB\tplain\n";
        let table = Table::parse(text).unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(table.records()[0].get("Note").unwrap(), "x\ty\nz \"q\"");
        assert_eq!(table.records()[1].line, 4);
    }

    #[test]
    fn given_unterminated_quote_when_parsing_then_reports_line() {
        let err = Table::parse("Name\n\"open\n").unwrap_err();

        assert_eq!(err, DomainError::UnterminatedQuote { line: 2 });
    }

    #[test]
    fn given_short_row_when_reading_missing_cell_then_returns_empty() {
        let table = Table::parse("A\tB\tC\n1\t2\n").unwrap();

        assert_eq!(table.records()[0].get("C").unwrap(), "");
    }

    #[test]
    fn given_unknown_column_when_reading_then_returns_missing_column() {
        let table = Table::parse("A\n1\n").unwrap();

        let err = table.records()[0].get("Tier").unwrap_err();
        assert_eq!(
            err,
            DomainError::MissingColumn {
                line: 2,
                column: "Tier".to_string()
            }
        );
    }

    #[test]
    fn given_cells_with_spaces_when_parsing_then_does_not_trim() {
        let table = Table::parse("A\tB\n  x \t y\n").unwrap();

        assert_eq!(table.records()[0].get("A").unwrap(), "  x ");
        assert_eq!(table.records()[0].get("B").unwrap(), " y");
    }

    #[test]
    fn given_custom_delimiter_when_parsing_then_splits_on_it() {
        let table = Table::parse_with("A,B\n1,2\n", ',').unwrap();

        assert_eq!(table.records()[0].get("B").unwrap(), "2");
    }

    #[test]
    fn given_empty_text_when_parsing_then_table_is_empty() {
        let table = Table::parse("").unwrap();

        assert!(table.is_empty());
        assert!(table.columns().is_empty());
    }
}
