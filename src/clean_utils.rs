// Copyright (C) 2017 Kisio Digital and/or its affiliates.
//
// This program is free software: you can redistribute it and/or modify it
// under the terms of the GNU Affero General Public License as published by the
// Free Software Foundation, version 3.

// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more
// details.

// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>

//! Text cleanup helpers for route, trip and stop labels.

use lazy_static::lazy_static;
use regex::Regex;

/// Marker between the origin and the destination of a headsign
pub const FROM_TO: &str = "<>";

/// Builds a case insensitive pattern matching any of `words` as whole words.
///
/// Use with [`clean_words_replacement`] to keep the surrounding separators.
pub fn clean_words(words: &[&str]) -> Regex {
    let alternatives = words
        .iter()
        .map(|w| regex::escape(w))
        .collect::<Vec<_>>()
        .join("|");
    let pattern = format!(r"(?i)(^|\W)({})(\W|$)", alternatives);
    Regex::new(&pattern).unwrap_or_else(|e| panic!("invalid words {:?}: {}", words, e))
}

/// Replacement keeping the separators captured by [`clean_words`]
pub fn clean_words_replacement(replacement: &str) -> String {
    format!("${{1}}{}${{3}}", replacement)
}

lazy_static! {
    /// "saint" as a whole word
    pub static ref SAINT: Regex = clean_words(&["saint"]);
    /// Abbreviation of [`SAINT`]
    pub static ref SAINT_REPLACEMENT: String = clean_words_replacement("St");
    static ref SPACES: Regex = Regex::new(r"\s+").unwrap();
    static ref SPACE_BEFORE_CLOSING: Regex = Regex::new(r"\s+([\)\],.])").unwrap();
    static ref SPACE_AFTER_OPENING: Regex = Regex::new(r"([\(\[])\s+").unwrap();
    static ref KEEP_TO_FR: Regex = Regex::new(r"(?i)(^|\W)vers\s+(.+)$").unwrap();
    static ref FROM_TO_SPACES: Regex = Regex::new(r"\s*<>\s*").unwrap();
    static ref FROM_TO_REPEATED: Regex = Regex::new(r"(<>)+").unwrap();
    static ref BOUNDS_START: Regex = Regex::new(r"^[\s\-<>/,;:]+").unwrap();
    static ref BOUNDS_END: Regex = Regex::new(r"[\s\-<>/,;:]+$").unwrap();
    static ref FR_LOWER_WORDS: Regex =
        clean_words(&["de", "des", "du", "à", "au", "aux", "et", "sur"]);
    static ref FR_STREET_TYPES: Vec<(Regex, String)> = [
        ("autoroute", "aut."),
        ("avenue", "av."),
        ("boulevard", "boul."),
        ("chemin", "ch."),
        ("croissant", "crois."),
        ("montée", "mtée"),
        ("place", "pl."),
        ("terrasse", "terr."),
    ]
    .iter()
    .map(|&(word, abbreviation)| (clean_words(&[word]), clean_words_replacement(abbreviation)))
    .collect();
}

/// Collapse whitespace, trim, and upper case the first letter
pub fn clean_label(label: &str) -> String {
    let label = SPACES.replace_all(label, " ");
    let label = SPACE_BEFORE_CLOSING.replace_all(&label, "$1");
    let label = SPACE_AFTER_OPENING.replace_all(&label, "$1");
    upper_case_first(label.trim())
}

/// [`clean_label`] with the French articles and prepositions in lower case
pub fn clean_label_fr(label: &str) -> String {
    // matches share their separators, a second pass catches consecutive words
    let mut lowered = clean_label(label);
    for _ in 0..2 {
        lowered = FR_LOWER_WORDS
            .replace_all(&lowered, |caps: &regex::Captures<'_>| {
                format!("{}{}{}", &caps[1], caps[2].to_lowercase(), &caps[3])
            })
            .into_owned();
    }
    upper_case_first(&lowered)
}

/// Keep only the destination of a "vers <destination>" label
pub fn keep_to_fr(label: &str) -> String {
    match KEEP_TO_FR.captures(label) {
        Some(caps) => caps[2].trim().to_string(),
        None => label.to_string(),
    }
}

/// Abbreviate French (Canada) street types
pub fn clean_street_types_fr_ca(label: &str) -> String {
    FR_STREET_TYPES
        .iter()
        .fold(label.to_string(), |label, (regex, replacement)| {
            regex.replace_all(&label, replacement.as_str()).into_owned()
        })
}

/// Normalize the [`FROM_TO`] markers and trim the separators around the label
pub fn clean_bounds(label: &str) -> String {
    let label = FROM_TO_SPACES.replace_all(label, FROM_TO);
    let label = FROM_TO_REPEATED.replace_all(&label, FROM_TO);
    let label = BOUNDS_START.replace(&label, "");
    BOUNDS_END.replace(&label, "").into_owned()
}

fn upper_case_first(label: &str) -> String {
    let mut chars = label.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
