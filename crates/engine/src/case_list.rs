// Case-list field parser
// Grammar: '[' (quoted (',' quoted)* ','?)? ']' with single or double quotes.
// Anything else (bare tokens, numbers, nested lists, trailing text) is malformed.

use std::fmt;

/// Why a case-list field could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseListError {
    /// Byte offset into the trimmed field
    pub offset: usize,
    pub expected: &'static str,
    /// What was found instead (`None` = end of input)
    pub found: Option<char>,
}

impl fmt::Display for CaseListError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.found {
            Some(c) => write!(f, "at offset {}: expected {}, found {:?}", self.offset, self.expected, c),
            None => write!(f, "at offset {}: expected {}, found end of input", self.offset, self.expected),
        }
    }
}

impl std::error::Error for CaseListError {}

/// Outcome of decoding one case-list field, keeping "blank" and "malformed"
/// apart even though both mean "no cases" downstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaseListField {
    Blank,
    Parsed(Vec<String>),
    Malformed(CaseListError),
}

impl CaseListField {
    /// Case ids, with malformed fields read as empty.
    pub fn into_ids(self) -> Vec<String> {
        match self {
            CaseListField::Parsed(ids) => ids,
            CaseListField::Blank | CaseListField::Malformed(_) => Vec::new(),
        }
    }
}

/// Classify a raw field value.
pub fn classify_case_list(raw: Option<&str>) -> CaseListField {
    match raw.map(str::trim) {
        None | Some("") => CaseListField::Blank,
        Some(s) => match Cursor::new(s).list() {
            Ok(ids) => CaseListField::Parsed(ids),
            Err(e) => CaseListField::Malformed(e),
        },
    }
}

/// Strict decode: blank input is an empty list, malformed input is an error.
pub fn decode_case_list(raw: Option<&str>) -> Result<Vec<String>, CaseListError> {
    match classify_case_list(raw) {
        CaseListField::Blank => Ok(Vec::new()),
        CaseListField::Parsed(ids) => Ok(ids),
        CaseListField::Malformed(e) => Err(e),
    }
}

/// Lenient decode: never fails, malformed input yields an empty list.
pub fn parse_case_list(raw: Option<&str>) -> Vec<String> {
    classify_case_list(raw).into_ids()
}

struct Cursor<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_ws(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.bump();
        }
    }

    fn error(&self, expected: &'static str) -> CaseListError {
        CaseListError { offset: self.pos, expected, found: self.peek() }
    }

    fn expect(&mut self, want: char, expected: &'static str) -> Result<(), CaseListError> {
        if self.peek() == Some(want) {
            self.bump();
            Ok(())
        } else {
            Err(self.error(expected))
        }
    }

    fn list(&mut self) -> Result<Vec<String>, CaseListError> {
        let mut items = Vec::new();
        self.skip_ws();
        self.expect('[', "'['")?;
        self.skip_ws();

        if self.peek() != Some(']') {
            loop {
                items.push(self.quoted()?);
                self.skip_ws();
                match self.peek() {
                    Some(',') => {
                        self.bump();
                        self.skip_ws();
                        // trailing comma before the closing bracket
                        if self.peek() == Some(']') {
                            break;
                        }
                    }
                    Some(']') => break,
                    _ => return Err(self.error("',' or ']'")),
                }
            }
        }

        self.expect(']', "']'")?;
        self.skip_ws();
        if self.peek().is_some() {
            return Err(self.error("end of input"));
        }
        Ok(items)
    }

    fn quoted(&mut self) -> Result<String, CaseListError> {
        let quote = match self.peek() {
            Some(q @ ('\'' | '"')) => q,
            _ => return Err(self.error("quoted string")),
        };
        self.bump();

        let mut out = String::new();
        loop {
            match self.bump() {
                None => return Err(self.error("closing quote")),
                Some(c) if c == quote => return Ok(out),
                Some('\\') => match self.bump() {
                    None => return Err(self.error("escape character")),
                    Some('n') => out.push('\n'),
                    Some('t') => out.push('\t'),
                    Some('r') => out.push('\r'),
                    Some(c @ ('\\' | '\'' | '"')) => out.push(c),
                    Some(other) => {
                        // unknown escapes are kept verbatim
                        out.push('\\');
                        out.push(other);
                    }
                },
                Some(c) => out.push(c),
            }
        }
    }
}
