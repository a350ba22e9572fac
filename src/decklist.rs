//! Plain-text deck list import and export.
//!
//! One entry per line, in the form
//!
//! ```text
//! 4 Lightning Bolt (A25) 141
//! ```
//!
//! i.e. `<count> <name> (<SET>) <collector number>`. Export groups identical
//! printings into one line; import resolves every line through a
//! [`CardLookup`] and expands it back into individual copies.

use std::collections::HashMap;
use std::fmt;

use futures::stream::{self, StreamExt};
use tracing::{debug, info, warn};

use crate::config;
use crate::lookup::CardLookup;
use crate::models::Deck;

// ---------------------------------------------------------------------------
// DeckListEntry
// ---------------------------------------------------------------------------

/// One parsed deck list line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeckListEntry {
    pub count: u32,
    pub name: String,
    /// Set code exactly as written on the line.
    pub set_code: String,
    pub collector_number: String,
}

impl DeckListEntry {
    /// The set code in the lower-case form used for lookups.
    pub fn lookup_set_code(&self) -> String {
        self.set_code.to_lowercase()
    }

    /// Names containing parentheses can be confused with the `(SET)` token.
    pub fn has_ambiguous_name(&self) -> bool {
        self.name.contains('(') || self.name.contains(')')
    }
}

impl fmt::Display for DeckListEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} ({}) {}",
            self.count,
            self.name,
            self.set_code.to_uppercase(),
            self.collector_number
        )
    }
}

// ---------------------------------------------------------------------------
// Export
// ---------------------------------------------------------------------------

/// Encode a deck as deck list text.
///
/// Cards sharing (name, set, collector number) collapse into one line, in
/// the order each printing first appears. Lines are joined by `\n` with no
/// trailing newline; an empty deck yields an empty string.
pub fn export_deck(deck: &Deck) -> String {
    let mut entries: Vec<DeckListEntry> = Vec::new();
    let mut index: HashMap<(&str, String, &str), usize> = HashMap::new();

    for card in deck {
        let key = (
            card.name.as_str(),
            card.set_code(),
            card.collector_number.as_str(),
        );
        match index.get(&key).copied() {
            Some(i) => entries[i].count += 1,
            None => {
                index.insert(key, entries.len());
                entries.push(DeckListEntry {
                    count: 1,
                    name: card.name.clone(),
                    set_code: card.set_code(),
                    collector_number: card.collector_number.clone(),
                });
            }
        }
    }

    entries
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

// ---------------------------------------------------------------------------
// Line parsing
// ---------------------------------------------------------------------------

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Parse one deck list line, or `None` if it is not of the form
/// `<count> <name> (<SET>) <number>`.
///
/// Surrounding whitespace is ignored. The count and collector number must
/// be ASCII digits and the set code word characters only. The `(SET)` token
/// is the last parenthesised group on the line, so a name may itself contain
/// parentheses (see [`DeckListEntry::has_ambiguous_name`]).
pub fn parse_line(line: &str) -> Option<DeckListEntry> {
    let line = line.trim();

    let digits_end = line
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(line.len());
    if digits_end == 0 {
        return None;
    }
    let count: u32 = line[..digits_end].parse().ok()?;
    let rest = &line[digits_end..];

    // The set token cannot contain '(' so it must start at the last one.
    let open = rest.rfind('(')?;
    let (middle, suffix) = rest.split_at(open);
    let middle = middle.strip_suffix(' ')?;

    let (set_code, after) = suffix[1..].split_once(')')?;
    if set_code.is_empty() || !set_code.chars().all(is_word_char) {
        return None;
    }

    let collector_number = after.trim_start();
    if collector_number.len() == after.len()
        || collector_number.is_empty()
        || !collector_number.chars().all(|c| c.is_ascii_digit())
    {
        return None;
    }

    // Count and name are separated by at least one whitespace character.
    if !middle.starts_with(char::is_whitespace) {
        return None;
    }
    let name = middle.trim_start();
    if name.is_empty() {
        return None;
    }

    Some(DeckListEntry {
        count,
        name: name.to_string(),
        set_code: set_code.to_string(),
        collector_number: collector_number.to_string(),
    })
}

// ---------------------------------------------------------------------------
// Import
// ---------------------------------------------------------------------------

/// A per-line import problem. The line contributes nothing to the deck.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportDiagnostic {
    /// The line does not match the deck list format.
    InvalidLine { line_number: usize, line: String },
    /// The line parsed but its printing could not be resolved.
    LookupFailed {
        line_number: usize,
        name: String,
        set_code: String,
        collector_number: String,
        reason: String,
    },
    /// The line asks for more copies than
    /// [`config::MAX_COPIES_PER_LINE`]; nothing is looked up.
    CountTooLarge {
        line_number: usize,
        line: String,
        count: u32,
    },
}

impl ImportDiagnostic {
    /// 1-based line number in the imported text.
    pub fn line_number(&self) -> usize {
        match self {
            ImportDiagnostic::InvalidLine { line_number, .. }
            | ImportDiagnostic::LookupFailed { line_number, .. }
            | ImportDiagnostic::CountTooLarge { line_number, .. } => *line_number,
        }
    }
}

impl fmt::Display for ImportDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImportDiagnostic::InvalidLine { line_number, line } => {
                write!(f, "line {}: invalid line: {}", line_number, line)
            }
            ImportDiagnostic::LookupFailed {
                line_number,
                name,
                set_code,
                collector_number,
                reason,
            } => write!(
                f,
                "line {}: failed to load/find card: {} ({}) {} ({})",
                line_number, name, set_code, collector_number, reason
            ),
            ImportDiagnostic::CountTooLarge {
                line_number,
                line,
                count,
            } => write!(
                f,
                "line {}: count {} exceeds the limit of {} copies: {}",
                line_number,
                count,
                config::MAX_COPIES_PER_LINE,
                line
            ),
        }
    }
}

/// Something worth flagging on a line that was still imported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportWarning {
    /// The card name contains parentheses, so the split between name and
    /// set code may not be what the author intended.
    AmbiguousName { line_number: usize, name: String },
}

impl fmt::Display for ImportWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImportWarning::AmbiguousName { line_number, name } => write!(
                f,
                "line {}: card name {:?} contains parentheses; check the set code",
                line_number, name
            ),
        }
    }
}

/// Outcome of [`import_deck`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportReport {
    /// Every resolved line's copies, in line order.
    pub deck: Deck,
    pub diagnostics: Vec<ImportDiagnostic>,
    pub warnings: Vec<ImportWarning>,
}

impl ImportReport {
    /// True when every line resolved.
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn invalid_lines(&self) -> impl Iterator<Item = &ImportDiagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| matches!(d, ImportDiagnostic::InvalidLine { .. }))
    }

    pub fn lookup_failures(&self) -> impl Iterator<Item = &ImportDiagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| matches!(d, ImportDiagnostic::LookupFailed { .. }))
    }
}

/// Decode deck list text into a deck, resolving each line through `lookup`.
///
/// Blank lines are skipped. Lines are resolved strictly one after another in
/// text order, so the resulting deck and diagnostics are deterministic for a
/// deterministic lookup. A bad line never aborts the import: it is recorded
/// in [`ImportReport::diagnostics`] and contributes no cards.
pub async fn import_deck<L>(text: &str, lookup: &L) -> ImportReport
where
    L: CardLookup + ?Sized,
{
    let lines: Vec<(usize, &str)> = text
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty())
        .collect();

    let report = stream::iter(lines)
        .fold(ImportReport::default(), |report, (line_number, line)| {
            resolve_line(lookup, report, line_number, line)
        })
        .await;

    info!(
        cards = report.deck.len(),
        problems = report.diagnostics.len(),
        "deck list imported"
    );
    report
}

async fn resolve_line<L>(
    lookup: &L,
    mut report: ImportReport,
    line_number: usize,
    line: &str,
) -> ImportReport
where
    L: CardLookup + ?Sized,
{
    let Some(entry) = parse_line(line) else {
        warn!(line_number, line, "invalid deck list line");
        report.diagnostics.push(ImportDiagnostic::InvalidLine {
            line_number,
            line: line.to_string(),
        });
        return report;
    };

    if entry.count > config::MAX_COPIES_PER_LINE {
        warn!(line_number, count = entry.count, "deck list count over limit");
        report.diagnostics.push(ImportDiagnostic::CountTooLarge {
            line_number,
            line: line.to_string(),
            count: entry.count,
        });
        return report;
    }

    if entry.has_ambiguous_name() {
        warn!(line_number, name = %entry.name, "card name contains parentheses");
        report.warnings.push(ImportWarning::AmbiguousName {
            line_number,
            name: entry.name.clone(),
        });
    }

    let set_code = entry.lookup_set_code();
    debug!(line_number, set = %set_code, number = %entry.collector_number, "looking up card");

    match lookup
        .card_by_set_number(&set_code, &entry.collector_number)
        .await
    {
        Ok(card) => report.deck.push_copies(&card, entry.count),
        Err(e) => {
            warn!(line_number, error = %e, "card lookup failed");
            report.diagnostics.push(ImportDiagnostic::LookupFailed {
                line_number,
                name: entry.name,
                set_code: entry.set_code,
                collector_number: entry.collector_number,
                reason: e.to_string(),
            });
        }
    }
    report
}
