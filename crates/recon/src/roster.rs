//! login:password roster parsing and the per-run login pool.

use std::borrow::Cow;
use std::collections::HashMap;

use encoding_rs::{Encoding, IBM866, UTF_16LE, UTF_8, WINDOWS_1251, WINDOWS_1252};

use crate::error::ReconError;
use crate::model::CredentialEntry;

/// Field delimiters in priority order. The first one present in a line wins.
pub const DELIMITERS: [char; 6] = [':', ';', ',', '|', ' ', '\t'];

/// Candidate encodings in the order they are tried. windows-1252 stands in for
/// Latin-1 (it is a superset and never fails to decode).
pub fn candidate_encodings() -> [&'static Encoding; 5] {
    [UTF_8, WINDOWS_1251, WINDOWS_1252, UTF_16LE, IBM866]
}

/// Login → password mapping that remembers first-insertion order.
///
/// Re-inserting an existing login replaces its password but keeps its
/// original position, so "last line wins" never reorders the roster.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    entries: Vec<CredentialEntry>,
    index: HashMap<String, usize>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, login: &str, password: &str) {
        match self.index.get(login) {
            Some(&i) => self.entries[i].password = password.to_string(),
            None => {
                self.index.insert(login.to_string(), self.entries.len());
                self.entries.push(CredentialEntry {
                    login: login.to_string(),
                    password: password.to_string(),
                });
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, login: &str) -> Option<&str> {
        self.index.get(login).map(|&i| self.entries[i].password.as_str())
    }

    pub fn position(&self, login: &str) -> Option<usize> {
        self.index.get(login).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CredentialEntry> {
        self.entries.iter()
    }
}

/// Roster plus the encoding it was decoded with.
#[derive(Debug, Clone)]
pub struct ParsedRoster {
    pub roster: Roster,
    pub encoding: &'static str,
}

/// Decode `bytes` with each candidate encoding until one yields entries.
pub fn parse_roster(bytes: &[u8]) -> Result<ParsedRoster, ReconError> {
    for encoding in candidate_encodings() {
        let Some(text) = decode_strict(bytes, encoding) else {
            log::debug!("roster is not valid {}", encoding.name());
            continue;
        };
        let roster = parse_text(&text);
        if !roster.is_empty() {
            return Ok(ParsedRoster {
                roster,
                encoding: encoding.name(),
            });
        }
        log::debug!("roster decoded as {} but has no entries", encoding.name());
    }
    Err(ReconError::RosterEmpty)
}

/// Decode without replacement characters; `None` on any malformed sequence.
fn decode_strict<'a>(bytes: &'a [u8], encoding: &'static Encoding) -> Option<Cow<'a, str>> {
    let body = match Encoding::for_bom(bytes) {
        Some((bom_encoding, bom_len)) if bom_encoding == encoding => &bytes[bom_len..],
        _ => bytes,
    };
    encoding.decode_without_bom_handling_and_without_replacement(body)
}

/// Parse already-decoded roster text.
pub fn parse_text(text: &str) -> Roster {
    let mut roster = Roster::new();
    for line in text.split(|c| c == '\n' || c == '\r') {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if let Some((login, password)) = split_line(line) {
            roster.insert(login, password);
        }
    }
    roster
}

/// Split once at the first occurrence of the highest-priority delimiter
/// present. A line with an empty half is dropped; no other delimiter is tried.
pub fn split_line(line: &str) -> Option<(&str, &str)> {
    let delimiter = DELIMITERS.iter().copied().find(|d| line.contains(*d))?;
    let (login, password) = line.split_once(delimiter)?;
    let (login, password) = (login.trim(), password.trim());
    if login.is_empty() || password.is_empty() {
        return None;
    }
    Some((login, password))
}

// ---------------------------------------------------------------------------
// Pool
// ---------------------------------------------------------------------------

/// The logins still available in one run. Consumed entries are flagged, not
/// removed, so iteration keeps roster order minus removals.
#[derive(Debug)]
pub struct LoginPool<'a> {
    roster: &'a Roster,
    taken: Vec<bool>,
    remaining: usize,
}

impl<'a> LoginPool<'a> {
    pub fn new(roster: &'a Roster) -> Self {
        Self {
            roster,
            taken: vec![false; roster.len()],
            remaining: roster.len(),
        }
    }

    pub fn len(&self) -> usize {
        self.remaining
    }

    pub fn is_empty(&self) -> bool {
        self.remaining == 0
    }

    pub fn entry(&self, index: usize) -> &'a CredentialEntry {
        &self.roster.entries[index]
    }

    /// Exact, case-sensitive lookup among available logins.
    pub fn lookup(&self, login: &str) -> Option<usize> {
        self.roster.position(login).filter(|&i| !self.taken[i])
    }

    pub fn available(&self) -> impl Iterator<Item = (usize, &'a CredentialEntry)> + '_ {
        let roster = self.roster;
        roster
            .entries
            .iter()
            .enumerate()
            .filter(move |(i, _)| !self.taken[*i])
    }

    pub fn take(&mut self, index: usize) {
        if !self.taken[index] {
            self.taken[index] = true;
            self.remaining -= 1;
        }
    }
}
