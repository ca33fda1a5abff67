//! Shared display taxonomy: Polish labels and colour tones for the
//! enumerations the backend uses, plus date formatting.

use chrono::{DateTime, Datelike, NaiveDate, Timelike};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Colour family of a badge; the view maps it onto its own palette
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Gray,
    Blue,
    Yellow,
    Orange,
    Purple,
    Indigo,
    Green,
    Red,
}

/// Legislative status of a bill
///
/// Bills imported from the Sejm API carry free-text statuses
/// ("Wpłynął do Sejmu", "Opublikowana", ...); they are kept verbatim in
/// [`BillStatus::Other`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BillStatus {
    Draft,
    Submitted,
    InCommittee,
    FirstReading,
    SecondReading,
    ThirdReading,
    Passed,
    Rejected,
    Withdrawn,
    Other(String),
}

impl BillStatus {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "draft" => Self::Draft,
            "submitted" => Self::Submitted,
            "in_committee" => Self::InCommittee,
            "first_reading" => Self::FirstReading,
            "second_reading" => Self::SecondReading,
            "third_reading" => Self::ThirdReading,
            "passed" => Self::Passed,
            "rejected" => Self::Rejected,
            "withdrawn" => Self::Withdrawn,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::Draft => "Projekt",
            Self::Submitted => "Złożony",
            Self::InCommittee => "W komisji",
            Self::FirstReading => "Pierwsze czytanie",
            Self::SecondReading => "Drugie czytanie",
            Self::ThirdReading => "Trzecie czytanie",
            Self::Passed => "Przyjęty",
            Self::Rejected => "Odrzucony",
            Self::Withdrawn => "Wycofany",
            Self::Other(raw) => raw,
        }
    }

    pub fn tone(&self) -> Tone {
        match self {
            Self::Draft | Self::Withdrawn | Self::Other(_) => Tone::Gray,
            Self::Submitted => Tone::Blue,
            Self::InCommittee => Tone::Yellow,
            Self::FirstReading => Tone::Orange,
            Self::SecondReading => Tone::Purple,
            Self::ThirdReading => Tone::Indigo,
            Self::Passed => Tone::Green,
            Self::Rejected => Tone::Red,
        }
    }

    /// Still moving through parliament (counted as active in statistics)
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            Self::Submitted
                | Self::InCommittee
                | Self::FirstReading
                | Self::SecondReading
                | Self::ThirdReading
        )
    }
}

impl fmt::Display for BillStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Who submitted the bill
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectType {
    Government,
    Citizens,
    Deputies,
    Senate,
    President,
    Unknown,
}

impl ProjectType {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "rządowy" => Self::Government,
            "obywatelski" => Self::Citizens,
            "poselski" => Self::Deputies,
            "senacki" => Self::Senate,
            "prezydencki" => Self::President,
            _ => Self::Unknown,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Government => "Projekt Rządowy",
            Self::Citizens => "Projekt Obywatelski",
            Self::Deputies => "Projekt Poselski",
            Self::Senate => "Projekt Senacki",
            Self::President => "Projekt Prezydencki",
            Self::Unknown => "Projekt Nieznany",
        }
    }

    pub fn tone(self) -> Tone {
        match self {
            Self::Government => Tone::Blue,
            Self::Citizens => Tone::Green,
            Self::Deputies => Tone::Purple,
            Self::Senate => Tone::Orange,
            Self::President => Tone::Red,
            Self::Unknown => Tone::Gray,
        }
    }
}

/// Citizen vote on a bill
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteChoice {
    Support,
    Against,
    Neutral,
}

impl VoteChoice {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Support => "support",
            Self::Against => "against",
            Self::Neutral => "neutral",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Support => "Za",
            Self::Against => "Przeciw",
            Self::Neutral => "Neutralnie",
        }
    }

    pub fn tone(self) -> Tone {
        match self {
            Self::Support => Tone::Green,
            Self::Against => Tone::Red,
            Self::Neutral => Tone::Gray,
        }
    }
}

/// Category of an opinion poll
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollType {
    Political,
    Social,
    Economic,
    Other,
    Unknown(String),
}

impl PollType {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "political" => Self::Political,
            "social" => Self::Social,
            "economic" => Self::Economic,
            "other" => Self::Other,
            unknown => Self::Unknown(unknown.to_string()),
        }
    }

    /// Value of the `poll_type` list filter
    pub fn as_str(&self) -> &str {
        match self {
            Self::Political => "political",
            Self::Social => "social",
            Self::Economic => "economic",
            Self::Other => "other",
            Self::Unknown(raw) => raw,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::Political => "Polityczny",
            Self::Social => "Społeczny",
            Self::Economic => "Ekonomiczny",
            Self::Other => "Inny",
            Self::Unknown(raw) => raw,
        }
    }

    pub fn tone(&self) -> Tone {
        match self {
            Self::Political => Tone::Blue,
            Self::Social => Tone::Green,
            Self::Economic => Tone::Yellow,
            Self::Other | Self::Unknown(_) => Tone::Gray,
        }
    }
}

/// Value of the `status` poll list filter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollStatus {
    Ongoing,
    Upcoming,
    Expired,
}

impl PollStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ongoing => "ongoing",
            Self::Upcoming => "upcoming",
            Self::Expired => "expired",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Ongoing => "Aktywne",
            Self::Upcoming => "Nadchodzące",
            Self::Expired => "Zakończone",
        }
    }
}

/// Sort orders offered by the bill list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BillOrdering {
    #[default]
    NewestVoting,
    OldestVoting,
    NewestVotingDate,
    OldestVotingDate,
    NewestAdded,
    OldestAdded,
}

impl BillOrdering {
    pub const ALL: [BillOrdering; 6] = [
        Self::NewestVoting,
        Self::OldestVoting,
        Self::NewestVotingDate,
        Self::OldestVotingDate,
        Self::NewestAdded,
        Self::OldestAdded,
    ];

    /// Value of the `ordering` query parameter
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NewestVoting => "-session_number,-voting_number",
            Self::OldestVoting => "session_number,voting_number",
            Self::NewestVotingDate => "-voting_date",
            Self::OldestVotingDate => "voting_date",
            Self::NewestAdded => "-created_at",
            Self::OldestAdded => "created_at",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::NewestVoting => "Najnowsze głosowania",
            Self::OldestVoting => "Najstarsze głosowania",
            Self::NewestVotingDate => "Najnowsza data głosowania",
            Self::OldestVotingDate => "Najstarsza data głosowania",
            Self::NewestAdded => "Najnowsze dodane",
            Self::OldestAdded => "Najstarsze dodane",
        }
    }
}

const MONTHS: [&str; 12] = [
    "sty", "lut", "mar", "kwi", "maj", "cze", "lip", "sie", "wrz", "paź", "lis", "gru",
];

fn month_abbrev(month: u32) -> &'static str {
    MONTHS
        .get(month.saturating_sub(1) as usize)
        .copied()
        .unwrap_or("")
}

/// `2024-03-12` or an RFC 3339 timestamp as `12 mar 2024`
///
/// Anything else is returned unchanged.
pub fn format_date(raw: &str) -> String {
    let date = DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.date_naive())
        .or_else(|_| NaiveDate::parse_from_str(raw, "%Y-%m-%d"));

    match date {
        Ok(date) => format!(
            "{:02} {} {}",
            date.day(),
            month_abbrev(date.month()),
            date.year()
        ),
        Err(_) => raw.to_string(),
    }
}

/// RFC 3339 timestamp as `12 mar 2024 14:05`, in the timestamp's own offset
pub fn format_datetime(raw: &str) -> String {
    match DateTime::parse_from_rfc3339(raw) {
        Ok(dt) => format!(
            "{:02} {} {} {:02}:{:02}",
            dt.day(),
            month_abbrev(dt.month()),
            dt.year(),
            dt.hour(),
            dt.minute()
        ),
        Err(_) => format_date(raw),
    }
}
