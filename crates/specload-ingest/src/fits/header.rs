//! FITS header blocks and cards.

use std::collections::BTreeMap;
use std::fmt;
use std::io::Read;
use std::path::Path;

use crate::error::{IngestError, Result};

/// Size of a FITS logical record.
pub const BLOCK_SIZE: usize = 2880;

/// Size of one header card.
pub const CARD_SIZE: usize = 80;

/// Value field of a header card.
#[derive(Debug, Clone, PartialEq)]
pub enum HeaderValue {
    Text(String),
    Logical(bool),
    Integer(i64),
    Real(f64),
}

impl HeaderValue {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            HeaderValue::Integer(value) => Some(*value),
            HeaderValue::Real(value)
                if value.fract() == 0.0 && (i64::MIN as f64..i64::MAX as f64).contains(value) =>
            {
                Some(*value as i64)
            }
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            HeaderValue::Text(value) => Some(value),
            _ => None,
        }
    }
}

impl fmt::Display for HeaderValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeaderValue::Text(value) => f.write_str(value),
            HeaderValue::Logical(true) => f.write_str("T"),
            HeaderValue::Logical(false) => f.write_str("F"),
            HeaderValue::Integer(value) => write!(f, "{value}"),
            HeaderValue::Real(value) => write!(f, "{value}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Card {
    pub keyword: String,
    pub value: Option<HeaderValue>,
}

/// Ordered cards of one HDU header, without the `END` card.
#[derive(Debug, Clone, Default)]
pub struct Header {
    cards: Vec<Card>,
}

/// Keywords that never carry dataset metadata.
const COMMENTARY: [&str; 3] = ["COMMENT", "HISTORY", ""];

impl Header {
    pub fn from_cards(cards: Vec<Card>) -> Self {
        Self { cards }
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn first_keyword(&self) -> Option<&str> {
        self.cards.first().map(|c| c.keyword.as_str())
    }

    /// First value recorded for `keyword`.
    pub fn get(&self, keyword: &str) -> Option<&HeaderValue> {
        self.cards
            .iter()
            .find(|c| c.keyword == keyword)
            .and_then(|c| c.value.as_ref())
    }

    pub fn contains(&self, keyword: &str) -> bool {
        self.get(keyword).is_some()
    }

    pub fn int(&self, keyword: &str) -> Option<i64> {
        self.get(keyword).and_then(HeaderValue::as_int)
    }

    /// Text value with surrounding blanks removed; blank strings count as absent.
    pub fn text(&self, keyword: &str) -> Option<&str> {
        self.get(keyword)
            .and_then(HeaderValue::as_text)
            .map(str::trim)
            .filter(|value| !value.is_empty())
    }

    /// Lengths of `NAXIS1..NAXISn`, in header order.
    pub fn axis_lengths(&self) -> Option<Vec<usize>> {
        let naxis = usize::try_from(self.int("NAXIS")?).ok()?;
        (1..=naxis)
            .map(|n| {
                self.int(&format!("NAXIS{n}"))
                    .and_then(|len| usize::try_from(len).ok())
            })
            .collect()
    }

    /// Keyword/value pairs for display, first occurrence wins.
    pub fn meta(&self) -> BTreeMap<String, String> {
        let mut meta = BTreeMap::new();
        for card in &self.cards {
            if COMMENTARY.contains(&card.keyword.as_str()) {
                continue;
            }
            if let Some(value) = &card.value {
                meta.entry(card.keyword.clone())
                    .or_insert_with(|| value.to_string());
            }
        }
        meta
    }
}

/// Parse one 80-byte card.
pub fn parse_card(raw: &[u8]) -> Card {
    let text = String::from_utf8_lossy(raw);
    let keyword = text.get(..8).unwrap_or(&text).trim_end().to_string();
    let value = if text.get(8..10) == Some("= ") {
        parse_value(text.get(10..).unwrap_or(""))
    } else {
        None
    };
    Card { keyword, value }
}

fn parse_value(field: &str) -> Option<HeaderValue> {
    let field = field.trim_start();
    if let Some(rest) = field.strip_prefix('\'') {
        let mut out = String::new();
        let mut chars = rest.chars().peekable();
        while let Some(ch) = chars.next() {
            if ch != '\'' {
                out.push(ch);
            } else if chars.peek() == Some(&'\'') {
                out.push('\'');
                chars.next();
            } else {
                break;
            }
        }
        return Some(HeaderValue::Text(out.trim_end().to_string()));
    }

    let raw = field.split('/').next().unwrap_or("").trim();
    if raw.is_empty() {
        return None;
    }
    let value = match raw {
        "T" => HeaderValue::Logical(true),
        "F" => HeaderValue::Logical(false),
        _ => {
            if let Ok(value) = raw.parse::<i64>() {
                HeaderValue::Integer(value)
            } else if let Ok(value) = raw.replace(['D', 'd'], "E").parse::<f64>() {
                HeaderValue::Real(value)
            } else {
                HeaderValue::Text(raw.to_string())
            }
        }
    };
    Some(value)
}

/// Fill `buf` from `reader`, returning how many bytes were read before EOF.
fn read_block<R: Read>(reader: &mut R, buf: &mut [u8]) -> std::io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        let n = reader.read(&mut buf[filled..])?;
        if n == 0 {
            break;
        }
        filled += n;
    }
    Ok(filled)
}

/// Read header blocks up to and including the one holding `END`.
///
/// Returns `None` at a clean end of file and the number of bytes consumed
/// otherwise.
pub fn read_header<R: Read>(reader: &mut R, path: &Path) -> Result<Option<(Header, u64)>> {
    let mut cards = Vec::new();
    let mut consumed = 0u64;
    let mut block = [0u8; BLOCK_SIZE];
    loop {
        let filled = read_block(reader, &mut block).map_err(|e| IngestError::io(path, e))?;
        if filled == 0 && consumed == 0 {
            return Ok(None);
        }
        if filled < BLOCK_SIZE {
            return Err(IngestError::fits(
                path,
                format!("header truncated after {} bytes", consumed + filled as u64),
            ));
        }
        consumed += BLOCK_SIZE as u64;
        for raw in block.chunks(CARD_SIZE) {
            let card = parse_card(raw);
            if card.keyword == "END" {
                tracing::trace!(cards = cards.len(), "header complete");
                return Ok(Some((Header::from_cards(cards), consumed)));
            }
            cards.push(card);
        }
    }
}
