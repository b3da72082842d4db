//! Database enum types with Diesel serialization.
//!
//! Each enum implements `ToSql` and `FromSql` for automatic conversion between Rust and `PostgreSQL`.

use diesel::deserialize::{self, FromSql, FromSqlRow};
use diesel::expression::AsExpression;
use diesel::pg::{Pg, PgValue};
use diesel::serialize::{self, IsNull, Output, ToSql};
use diesel::sql_types::Text;
use std::fmt;
use std::io::Write;
use std::str::FromStr;

/// How attendance is recorded for an event.
///
/// Maps to the `events.attendance_type` CHECK constraint.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    AsExpression,
    FromSqlRow,
    serde::Serialize,
    serde::Deserialize,
)]
#[diesel(sql_type = Text)]
#[serde(rename_all = "kebab-case")]
pub enum AttendanceType {
    /// Members announce attendance ahead of time.
    #[default]
    Rsvp,
    /// Attendance is recorded at the door.
    CheckIn,
}

impl AttendanceType {
    /// Returns the database string representation of this attendance type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Rsvp => "rsvp",
            Self::CheckIn => "check-in",
        }
    }
}

impl ToSql<Text, Pg> for AttendanceType {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Pg>) -> serialize::Result {
        out.write_all(self.as_str().as_bytes())?;
        Ok(IsNull::No)
    }
}

impl FromSql<Text, Pg> for AttendanceType {
    fn from_sql(bytes: PgValue<'_>) -> deserialize::Result<Self> {
        match bytes.as_bytes() {
            b"rsvp" => Ok(Self::Rsvp),
            b"check-in" => Ok(Self::CheckIn),
            _ => Err("Unrecognized enum variant".into()),
        }
    }
}

impl FromStr for AttendanceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "rsvp" => Ok(Self::Rsvp),
            "check-in" => Ok(Self::CheckIn),
            other => Err(format!("unknown attendance type '{other}'")),
        }
    }
}

impl fmt::Display for AttendanceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A member's attendance at one event.
///
/// Maps to the `event_attendance.status` CHECK constraint.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    AsExpression,
    FromSqlRow,
    serde::Serialize,
    serde::Deserialize,
)]
#[diesel(sql_type = Text)]
#[serde(rename_all = "kebab-case")]
pub enum AttendanceStatus {
    #[default]
    Attending,
    CheckedIn,
    /// Reported for any record whose event has already started.
    Attended,
}

impl AttendanceStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Attending => "attending",
            Self::CheckedIn => "checked-in",
            Self::Attended => "attended",
        }
    }
}

impl ToSql<Text, Pg> for AttendanceStatus {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Pg>) -> serialize::Result {
        out.write_all(self.as_str().as_bytes())?;
        Ok(IsNull::No)
    }
}

impl FromSql<Text, Pg> for AttendanceStatus {
    fn from_sql(bytes: PgValue<'_>) -> deserialize::Result<Self> {
        match bytes.as_bytes() {
            b"attending" => Ok(Self::Attending),
            b"checked-in" => Ok(Self::CheckedIn),
            b"attended" => Ok(Self::Attended),
            _ => Err("Unrecognized enum variant".into()),
        }
    }
}

impl FromStr for AttendanceStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "attending" => Ok(Self::Attending),
            "checked-in" => Ok(Self::CheckedIn),
            "attended" => Ok(Self::Attended),
            other => Err(format!("unknown attendance status '{other}'")),
        }
    }
}

impl fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_stored_names() {
        assert_eq!("rsvp".parse(), Ok(AttendanceType::Rsvp));
        assert_eq!("check-in".parse(), Ok(AttendanceType::CheckIn));
        assert!("walk-in".parse::<AttendanceType>().is_err());
    }

    #[test]
    fn serde_uses_stored_names() {
        let json = serde_json::to_string(&AttendanceType::CheckIn).expect("serializes");
        assert_eq!(json, "\"check-in\"");
        assert_eq!(AttendanceType::default(), AttendanceType::Rsvp);
    }

    #[test]
    fn attendance_status_names_match_check_constraint() {
        for status in [
            AttendanceStatus::Attending,
            AttendanceStatus::CheckedIn,
            AttendanceStatus::Attended,
        ] {
            assert_eq!(status.as_str().parse(), Ok(status));
            let json = serde_json::to_string(&status).expect("serializes");
            assert_eq!(json, format!("\"{status}\""));
        }
        assert_eq!(AttendanceStatus::default(), AttendanceStatus::Attending);
        assert!("present".parse::<AttendanceStatus>().is_err());
    }
}
