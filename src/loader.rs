//! Reading a division from standings text or CSV.
//!
//! Standings text: the team count, then per team its name, wins, losses, remaining and one
//! games-left entry per team, all whitespace-separated:
//!
//! ```text
//! 4
//! Atlanta       83 71  8  0 1 6 1
//! Philadelphia  80 79  3  1 0 0 2
//! New_York      78 78  6  6 0 0 0
//! Montreal      77 82  3  1 2 0 0
//! ```
//!
//! CSV: header `team,wins,losses,remaining,<one column per team>`, one row per team.

use crate::models::{Division, DivisionError, TeamRecord};
use std::io::Read;
use std::path::Path;

/// Input format for [`load_division_as`].
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Format {
    /// `.csv` files are CSV, everything else standings text.
    #[default]
    Auto,
    Standings,
    Csv,
}

struct Tokens<'a> {
    inner: Box<dyn Iterator<Item = (usize, &'a str)> + 'a>,
    line: usize,
}

impl<'a> Tokens<'a> {
    fn new(input: &'a str) -> Self {
        let inner = input
            .lines()
            .enumerate()
            .flat_map(|(i, line)| line.split_whitespace().map(move |tok| (i + 1, tok)));
        Self {
            inner: Box::new(inner),
            line: 1,
        }
    }

    fn next_str(&mut self, what: &str) -> Result<&'a str, DivisionError> {
        match self.inner.next() {
            Some((line, tok)) => {
                self.line = line;
                Ok(tok)
            }
            None => Err(DivisionError::Parse {
                line: self.line,
                message: format!("unexpected end of input, expected {}", what),
            }),
        }
    }

    fn next_number<T: std::str::FromStr>(&mut self, what: &str) -> Result<T, DivisionError> {
        let tok = self.next_str(what)?;
        tok.parse().map_err(|_| DivisionError::Parse {
            line: self.line,
            message: format!("expected {} (non-negative integer), found '{}'", what, tok),
        })
    }
}

/// Parse standings text.
pub fn parse_division(input: &str) -> Result<Division, DivisionError> {
    let mut tokens = Tokens::new(input);
    let count: usize = tokens.next_number("team count")?;
    let mut records = Vec::with_capacity(count.min(1024));
    for _ in 0..count {
        let name = tokens.next_str("team name")?.to_string();
        let wins = tokens.next_number("wins")?;
        let losses = tokens.next_number("losses")?;
        let remaining = tokens.next_number("remaining")?;
        let against = (0..count)
            .map(|_| tokens.next_number("games left"))
            .collect::<Result<Vec<u32>, _>>()?;
        records.push(TeamRecord::new(name, wins, losses, remaining, against));
    }
    if let Ok(extra) = tokens.next_str("") {
        return Err(DivisionError::Parse {
            line: tokens.line,
            message: format!("unexpected trailing input '{}'", extra),
        });
    }
    Division::new(records)
}

/// Read a division from CSV.
pub fn read_division_csv<R: Read>(reader: R) -> Result<Division, DivisionError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut records = Vec::new();
    for (i, row) in rdr.records().enumerate() {
        // header is line 1
        let line = i + 2;
        let row = row.map_err(|e| DivisionError::Parse {
            line,
            message: e.to_string(),
        })?;
        let field = |idx: usize, what: &str| -> Result<u32, DivisionError> {
            let raw = row.get(idx).unwrap_or("");
            raw.parse().map_err(|_| DivisionError::Parse {
                line,
                message: format!("expected {} (non-negative integer), found '{}'", what, raw),
            })
        };
        let name = row.get(0).unwrap_or("").to_string();
        let wins = field(1, "wins")?;
        let losses = field(2, "losses")?;
        let remaining = field(3, "remaining")?;
        let against = (4..row.len())
            .map(|idx| field(idx, "games left"))
            .collect::<Result<Vec<u32>, _>>()?;
        records.push(TeamRecord::new(name, wins, losses, remaining, against));
    }
    Division::new(records)
}

/// Load a division from a file, choosing the format by extension.
pub fn load_division(path: impl AsRef<Path>) -> Result<Division, DivisionError> {
    load_division_as(path, Format::Auto)
}

pub fn load_division_as(path: impl AsRef<Path>, format: Format) -> Result<Division, DivisionError> {
    let path = path.as_ref();
    let format = match format {
        Format::Auto => {
            let is_csv = path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
            if is_csv {
                Format::Csv
            } else {
                Format::Standings
            }
        }
        f => f,
    };
    let io_err = |e: std::io::Error| DivisionError::Io(format!("{}: {}", path.display(), e));
    let division = match format {
        Format::Csv => read_division_csv(std::fs::File::open(path).map_err(io_err)?)?,
        _ => parse_division(&std::fs::read_to_string(path).map_err(io_err)?)?,
    };
    log::info!(
        "Loaded {} teams from {}",
        division.team_count(),
        path.display()
    );
    for issue in division.schedule_issues() {
        log::warn!("{}: {}", path.display(), issue);
    }
    Ok(division)
}
