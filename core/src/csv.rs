//! CSV text parsing.
//!
//! Splits a text blob into records of string fields. Double quotes delimit
//! protected regions: delimiters and line breaks inside them are literal,
//! and a doubled quote (`""`) inside a region is a literal quote. The quote
//! characters themselves are removed.
//!
//! Line breaks are `\n`, `\r\n` and `\r`. A final line break terminates the
//! last record without starting a new one.

/// Parsing options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CsvOptions {
    /// Field separator.
    pub delimiter: char,
    /// Drop records that are empty (a single empty, unquoted field).
    pub skip_empty_lines: bool,
    /// Strip whitespace around fields. Whitespace inside quotes is kept.
    pub trim_fields: bool,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            delimiter: ',',
            skip_empty_lines: true,
            trim_fields: true,
        }
    }
}

impl CsvOptions {
    #[must_use]
    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }
}

/// Parses `input` into records.
///
/// # Examples
///
/// ```
/// use table_model_core::{parse_csv, CsvOptions};
///
/// let text = "id,name\n1, \"Smith, \"\"J\"\"\" \n\n2,plain\n";
/// let records = parse_csv(text, &CsvOptions::default());
/// assert_eq!(
///     records,
///     vec![
///         vec!["id", "name"],
///         vec!["1", "Smith, \"J\""],
///         vec!["2", "plain"],
///     ]
/// );
/// ```
pub fn parse_csv(input: &str, options: &CsvOptions) -> Vec<Vec<String>> {
    let mut parser = Parser::new(*options);
    let mut chars = input.chars().peekable();
    let mut in_quotes = false;

    while let Some(c) = chars.next() {
        if in_quotes {
            if c == '"' {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    parser.field.push_quoted('"');
                } else {
                    in_quotes = false;
                }
            } else {
                parser.field.push_quoted(c);
            }
            continue;
        }

        match c {
            '"' => {
                in_quotes = true;
                parser.field.open_quote();
            }
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                parser.end_record();
            }
            '\n' => parser.end_record(),
            c if c == options.delimiter => parser.end_field(),
            c => parser.field.push_plain(c),
        }
    }

    if parser.has_pending() {
        parser.end_record();
    }
    parser.records
}

struct Parser {
    options: CsvOptions,
    records: Vec<Vec<String>>,
    record: Vec<String>,
    field: Field,
}

impl Parser {
    fn new(options: CsvOptions) -> Self {
        Self {
            options,
            records: Vec::new(),
            record: Vec::new(),
            field: Field::default(),
        }
    }

    fn has_pending(&self) -> bool {
        !self.record.is_empty() || !self.field.text.is_empty() || self.field.quoted_from.is_some()
    }

    fn end_field(&mut self) {
        let field = std::mem::take(&mut self.field);
        self.record.push(field.finish(self.options.trim_fields));
    }

    fn end_record(&mut self) {
        let blank = self.record.is_empty() && self.field.quoted_from.is_none();
        self.end_field();
        let record = std::mem::take(&mut self.record);
        if self.options.skip_empty_lines && blank && record[0].is_empty() {
            return;
        }
        self.records.push(record);
    }
}

/// Field under construction.
///
/// `quoted_from..quoted_to` is the byte span that came from quoted regions;
/// trimming never reaches into it.
#[derive(Default)]
struct Field {
    text: String,
    quoted_from: Option<usize>,
    quoted_to: usize,
}

impl Field {
    fn open_quote(&mut self) {
        if self.quoted_from.is_none() {
            self.quoted_from = Some(self.text.len());
        }
        self.quoted_to = self.text.len();
    }

    fn push_quoted(&mut self, c: char) {
        self.text.push(c);
        self.quoted_to = self.text.len();
    }

    fn push_plain(&mut self, c: char) {
        self.text.push(c);
    }

    fn finish(self, trim: bool) -> String {
        if !trim {
            return self.text;
        }
        let Some(quoted_from) = self.quoted_from else {
            return self.text.trim().to_string();
        };
        let head = &self.text[..quoted_from];
        let start = head.len() - head.trim_start().len();
        let tail = &self.text[self.quoted_to..];
        let end = self.quoted_to + tail.trim_end().len();
        self.text[start..end].to_string()
    }
}
