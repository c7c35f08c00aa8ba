//! Parser for delimited text tables (CSV, TSV) used as replacement sources.

use crate::common::{Error, Result};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Configuration for parsing delimited text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TabularConfig {
    /// Field delimiter character
    pub delimiter: u8,
    /// Quote character for quoted fields
    pub quote: u8,
}

impl Default for TabularConfig {
    fn default() -> Self {
        Self {
            delimiter: b',', // CSV default
            quote: b'"',     // Standard CSV quoting
        }
    }
}

impl TabularConfig {
    /// Create a new default (CSV) configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Comma-separated values
    pub fn csv() -> Self {
        Self::default()
    }

    /// Tab-separated values
    pub fn tsv() -> Self {
        Self::default().with_delimiter(b'\t')
    }

    /// Set the field delimiter
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Set the quote character
    pub fn with_quote(mut self, quote: u8) -> Self {
        self.quote = quote;
        self
    }
}

/// A parsed table: a header row and the data rows below it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    /// Header cells, trimmed
    pub header: Vec<String>,
    /// Data rows; a row may be shorter than the header
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// Index of the first column whose header equals `name`.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.header.iter().position(|h| h == name)
    }

    /// Cells of column `index`, top to bottom; missing cells read as `""`.
    pub fn column(&self, index: usize) -> impl Iterator<Item = &str> {
        self.rows
            .iter()
            .map(move |row| row.get(index).map(String::as_str).unwrap_or(""))
    }
}

/// Row-at-a-time parser over delimited text in memory.
///
/// Handles quoted fields with doubled-quote escapes and embedded newlines,
/// CRLF line endings and a leading UTF-8 byte order mark.
pub struct TabularParser<'a> {
    data: &'a [u8],
    config: TabularConfig,
    pos: usize,
    /// 1-based line of the next unread byte
    line: usize,
}

impl<'a> TabularParser<'a> {
    /// Create a new parser over `data`
    pub fn new(data: &'a [u8], config: TabularConfig) -> Self {
        let pos = if data.starts_with(UTF8_BOM) { UTF8_BOM.len() } else { 0 };
        Self {
            data,
            config,
            pos,
            line: 1,
        }
    }

    /// Line number where the next row starts.
    #[inline]
    pub fn line(&self) -> usize {
        self.line
    }

    /// Parse the next row from the input
    pub fn parse_row(&mut self) -> Result<Option<Vec<String>>> {
        if self.pos >= self.data.len() {
            return Ok(None);
        }

        let mut fields = Vec::new();
        let mut current_field = Vec::new();
        let mut field_start = true;
        let mut in_quotes = false;
        let mut quote_line = self.line;

        while self.pos < self.data.len() {
            let byte = self.data[self.pos];
            self.pos += 1;

            match byte {
                b'\n' => {
                    if in_quotes {
                        // Newline inside quotes is part of the field
                        current_field.push(byte);
                        self.line += 1;
                    } else {
                        self.finish_field(&mut current_field, &mut fields)?;
                        self.line += 1;
                        return Ok(Some(fields));
                    }
                },
                b'\r' => {
                    // CRLF: skip CR, let LF end the line
                    if in_quotes {
                        current_field.push(byte);
                    }
                },
                quote if quote == self.config.quote => {
                    if in_quotes {
                        if self.data.get(self.pos) == Some(&self.config.quote) {
                            // Escaped quote (doubled quote)
                            current_field.push(quote);
                            self.pos += 1;
                        } else {
                            in_quotes = false;
                        }
                    } else if field_start {
                        in_quotes = true;
                        quote_line = self.line;
                        field_start = false;
                    } else {
                        // Quote in the middle of an unquoted field is literal
                        current_field.push(byte);
                    }
                },
                delim if delim == self.config.delimiter && !in_quotes => {
                    self.finish_field(&mut current_field, &mut fields)?;
                    field_start = true;
                },
                _ => {
                    current_field.push(byte);
                    field_start = false;
                },
            }
        }

        if in_quotes {
            return Err(Error::TabularParse {
                line: quote_line,
                message: "unterminated quoted field".to_string(),
            });
        }

        self.finish_field(&mut current_field, &mut fields)?;
        Ok(Some(fields))
    }

    /// Finish parsing a field and add it to the fields vector
    fn finish_field(&self, current_field: &mut Vec<u8>, fields: &mut Vec<String>) -> Result<()> {
        let field = String::from_utf8(std::mem::take(current_field)).map_err(|_| Error::TabularParse {
            line: self.line,
            message: "invalid UTF-8".to_string(),
        })?;
        fields.push(field);
        Ok(())
    }
}

/// A row produced by an empty line.
#[inline]
fn is_blank(row: &[String]) -> bool {
    row.len() == 1 && row[0].is_empty()
}

/// Parse a whole table. The first non-blank row is the header.
///
/// Blank lines are skipped. A data row with more fields than the header is
/// an error; shorter rows are allowed.
pub fn parse_table(data: &[u8], config: &TabularConfig) -> Result<Table> {
    let mut parser = TabularParser::new(data, *config);

    let header = loop {
        match parser.parse_row()? {
            Some(row) if is_blank(&row) => continue,
            Some(row) => break row,
            None => {
                return Err(Error::TabularParse {
                    line: parser.line(),
                    message: "missing header row".to_string(),
                });
            },
        }
    };
    let header: Vec<String> = header.into_iter().map(|h| h.trim().to_string()).collect();

    let mut rows = Vec::new();
    loop {
        let line = parser.line();
        let Some(row) = parser.parse_row()? else {
            break;
        };
        if is_blank(&row) {
            continue;
        }
        if row.len() > header.len() {
            return Err(Error::TabularParse {
                line,
                message: format!("expected at most {} fields, found {}", header.len(), row.len()),
            });
        }
        rows.push(row);
    }

    Ok(Table { header, rows })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_csv_parsing() {
        let csv = "name,age,city\nJohn,25,New York\nJane,30,London";
        let mut parser = TabularParser::new(csv.as_bytes(), TabularConfig::default());

        assert_eq!(parser.parse_row().unwrap().unwrap(), ["name", "age", "city"]);
        assert_eq!(parser.parse_row().unwrap().unwrap(), ["John", "25", "New York"]);
        assert_eq!(parser.parse_row().unwrap().unwrap(), ["Jane", "30", "London"]);
        assert!(parser.parse_row().unwrap().is_none());
    }

    #[test]
    fn test_quoted_fields() {
        let csv = "\"Hello, World\",\"Value with \"\"quotes\"\"\",\"two\nlines\",5\"6";
        let mut parser = TabularParser::new(csv.as_bytes(), TabularConfig::default());

        let row = parser.parse_row().unwrap().unwrap();
        assert_eq!(row, ["Hello, World", "Value with \"quotes\"", "two\nlines", "5\"6"]);
        assert_eq!(parser.line(), 2);
    }

    #[test]
    fn test_tsv_parsing() {
        let tsv = "name\tage\r\nJohn, Jr.\t25\r\n";
        let table = parse_table(tsv.as_bytes(), &TabularConfig::tsv()).unwrap();
        assert_eq!(table.header, ["name", "age"]);
        assert_eq!(table.rows, [vec!["John, Jr.".to_string(), "25".to_string()]]);
    }

    #[test]
    fn test_table_header_and_columns() {
        let csv = "\u{FEFF} LHS ,RHS,LHS\n1,2,9\n\n3\n";
        let table = parse_table(csv.as_bytes(), &TabularConfig::csv()).unwrap();
        assert_eq!(table.header, ["LHS", "RHS", "LHS"]);
        assert_eq!(table.column_index("LHS"), Some(0));
        assert_eq!(table.column_index("Missing"), None);
        assert_eq!(table.column(1).collect::<Vec<_>>(), ["2", ""]);
    }

    #[test]
    fn test_unterminated_quote() {
        let csv = "LHS\n1\n\"2\n3\n";
        let err = parse_table(csv.as_bytes(), &TabularConfig::csv()).unwrap_err();
        assert!(matches!(err, Error::TabularParse { line: 3, .. }));
    }

    #[test]
    fn test_row_wider_than_header() {
        let csv = "LHS,RHS\n1,2\n3,4,5\n";
        let err = parse_table(csv.as_bytes(), &TabularConfig::csv()).unwrap_err();
        assert!(matches!(err, Error::TabularParse { line: 3, .. }));
    }

    #[test]
    fn test_missing_header() {
        let err = parse_table(b"\n\n", &TabularConfig::csv()).unwrap_err();
        assert!(matches!(err, Error::TabularParse { .. }));
        assert!(parse_table(b"", &TabularConfig::csv()).is_err());
    }

    #[test]
    fn test_invalid_utf8() {
        let err = parse_table(b"LHS\n\xff\xfe\n", &TabularConfig::csv()).unwrap_err();
        assert!(matches!(err, Error::TabularParse { line: 2, .. }));
    }
}
