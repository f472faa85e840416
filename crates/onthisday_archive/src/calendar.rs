//! Gregorian/Persian date normalization.
//!
//! Events are stored by Gregorian day and month. Callers may query with a
//! Persian (Jalali) date instead, so every incoming date goes through
//! [`normalize`] before it touches the store, and every outgoing date can be
//! rendered in both calendars with [`to_display_projection`].
//!
//! Neither function reads the system clock: the "current moment" used to
//! pick a default year is passed in by the caller.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use icu_calendar::{Date, Iso};
use icu_calendar::cal::Persian;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Year used to validate a Gregorian day/month pair when no year is given.
///
/// 2000 is a leap year, so `29/02` without a year is accepted.
pub const GREGORIAN_PROBE_YEAR: i32 = 2000;

/// The single failure of [`normalize`]. The message is safe to show to end users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Day and month are required and must be valid.")]
pub struct ValidationError;

/// Calendar a [`DateQuery`] is expressed in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CalendarSystem {
    Gregorian,
    #[default]
    Persian,
}

impl CalendarSystem {
    /// Interpret a raw `calendar` request parameter.
    ///
    /// Only `utc` and `gregorian` (trimmed, any case) select the Gregorian
    /// calendar. Anything else, including a missing or blank value, is Persian.
    pub fn from_param(raw: Option<&str>) -> Self {
        match raw.map(|s| s.trim().to_ascii_lowercase()) {
            Some(v) if v == "utc" || v == "gregorian" => CalendarSystem::Gregorian,
            _ => CalendarSystem::Persian,
        }
    }
}

/// A possibly Persian day/month/year supplied by a caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateQuery {
    pub day: i32,
    pub month: i32,
    pub year: Option<i32>,
    pub calendar: CalendarSystem,
}

impl DateQuery {
    pub fn new(day: i32, month: i32, year: Option<i32>, calendar: Option<&str>) -> Self {
        Self {
            day,
            month,
            year,
            calendar: CalendarSystem::from_param(calendar),
        }
    }
}

/// Canonical Gregorian key used for storage and lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedDate {
    pub day: u32,
    pub month: u32,
    pub year: Option<i32>,
}

/// One calendar's view of a day. `year` is absent for year-agnostic dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarDay {
    pub day: u32,
    pub month: u32,
    pub year: Option<i32>,
}

/// Dual-calendar rendering of a stored Gregorian date.
///
/// `persian` is `None` when the conversion could not be performed, which also
/// happens for a year-less Feb 29 evaluated in a non-leap current year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayProjection {
    pub gregorian: CalendarDay,
    pub persian: Option<CalendarDay>,
}

/// Turn a caller-supplied date into the Gregorian key used by the store.
///
/// A Persian query without a year is resolved against the Persian year of
/// `now`, but the returned year stays `None` so only day and month are
/// carried forward.
pub fn normalize(
    query: &DateQuery,
    now: DateTime<Utc>,
) -> Result<NormalizedDate, ValidationError> {
    if query.day < 1 || query.month < 1 {
        return Err(ValidationError);
    }

    match query.calendar {
        CalendarSystem::Persian => normalize_persian(query, now),
        CalendarSystem::Gregorian => normalize_gregorian(query),
    }
}

fn normalize_persian(
    query: &DateQuery,
    now: DateTime<Utc>,
) -> Result<NormalizedDate, ValidationError> {
    let base_year = query.year.unwrap_or_else(|| current_persian_year(now));
    let (year, month, day) =
        gregorian_from_persian(base_year, query.month, query.day).ok_or(ValidationError)?;
    Ok(NormalizedDate {
        day,
        month,
        year: query.year.map(|_| year),
    })
}

fn normalize_gregorian(query: &DateQuery) -> Result<NormalizedDate, ValidationError> {
    if query.month > 12 {
        return Err(ValidationError);
    }
    let month = u32::try_from(query.month).map_err(|_| ValidationError)?;
    let day = u32::try_from(query.day).map_err(|_| ValidationError)?;

    let validation_year = query.year.unwrap_or(GREGORIAN_PROBE_YEAR);
    let max_day = days_in_month(validation_year, month).ok_or(ValidationError)?;
    if day > max_day {
        return Err(ValidationError);
    }

    Ok(NormalizedDate {
        day,
        month,
        year: query.year,
    })
}

/// Render a stored Gregorian date in both calendars. Never fails.
pub fn to_display_projection(
    day: u32,
    month: u32,
    year: Option<i32>,
    now: DateTime<Utc>,
) -> DisplayProjection {
    let conversion_year = year.unwrap_or_else(|| now.year());
    let persian = persian_from_gregorian(conversion_year, month, day).map(
        |(p_year, p_month, p_day)| CalendarDay {
            day: p_day,
            month: p_month,
            year: year.map(|_| p_year),
        },
    );

    DisplayProjection {
        gregorian: CalendarDay { day, month, year },
        persian,
    }
}

/// Number of days in a Gregorian month, or `None` for an invalid month/year.
pub fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year.checked_add(1)?, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    u32::try_from(next.signed_duration_since(first).num_days()).ok()
}

/// Persian year containing the (UTC) date of `now`.
pub fn current_persian_year(now: DateTime<Utc>) -> i32 {
    let today = now.date_naive();
    persian_from_gregorian(today.year(), today.month(), today.day())
        .map(|(year, _, _)| year)
        // Nowruz falls on March 20/21: 621 years behind before it, 622 after.
        .unwrap_or_else(|| today.year() - 621)
}

fn gregorian_from_persian(year: i32, month: i32, day: i32) -> Option<(i32, u32, u32)> {
    let month = u8::try_from(month).ok()?;
    let day = u8::try_from(day).ok()?;
    let iso = Date::try_new_persian(year, month, day)
        .ok()?
        .to_calendar(Iso);
    Some((
        iso.year().extended_year(),
        u32::from(iso.month().ordinal),
        u32::from(iso.day_of_month().0),
    ))
}

fn persian_from_gregorian(year: i32, month: u32, day: u32) -> Option<(i32, u32, u32)> {
    let month = u8::try_from(month).ok()?;
    let day = u8::try_from(day).ok()?;
    let persian = Date::try_new_iso(year, month, day)
        .ok()?
        .to_calendar(Persian);
    Some((
        persian.year().extended_year(),
        u32::from(persian.month().ordinal),
        u32::from(persian.day_of_month().0),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(year: i32, month: u32, day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(year, month, day, 12, 0, 0).unwrap()
    }

    fn gregorian(day: i32, month: i32, year: Option<i32>) -> DateQuery {
        DateQuery::new(day, month, year, Some("gregorian"))
    }

    fn persian(day: i32, month: i32, year: Option<i32>) -> DateQuery {
        DateQuery::new(day, month, year, Some("persian"))
    }

    #[test]
    fn calendar_param_is_trimmed_and_case_insensitive() {
        for raw in ["  Gregorian ", "GREGORIAN", "gregorian", "utc", " UTC"] {
            assert_eq!(
                CalendarSystem::from_param(Some(raw)),
                CalendarSystem::Gregorian,
                "{raw:?}"
            );
        }
    }

    #[test]
    fn unknown_or_blank_calendar_defaults_to_persian() {
        assert_eq!(CalendarSystem::from_param(None), CalendarSystem::Persian);
        for raw in ["", "   ", "jalali", "persian", "gregorian-ish"] {
            assert_eq!(
                CalendarSystem::from_param(Some(raw)),
                CalendarSystem::Persian,
                "{raw:?}"
            );
        }
    }

    #[test]
    fn zero_or_negative_parts_are_rejected() {
        let now = at(2026, 10, 19);
        assert_eq!(normalize(&gregorian(0, 5, None), now), Err(ValidationError));
        assert_eq!(normalize(&gregorian(5, 0, None), now), Err(ValidationError));
        assert_eq!(normalize(&persian(-1, 1, None), now), Err(ValidationError));
    }

    #[test]
    fn validation_message_is_fixed() {
        assert_eq!(
            ValidationError.to_string(),
            "Day and month are required and must be valid."
        );
    }

    #[test]
    fn gregorian_without_year_passes_through_every_valid_day() {
        let now = at(2026, 10, 19);
        for month in 1..=12u32 {
            let max = days_in_month(GREGORIAN_PROBE_YEAR, month).unwrap();
            for day in 1..=max {
                let out = normalize(&gregorian(day as i32, month as i32, None), now).unwrap();
                assert_eq!(
                    out,
                    NormalizedDate {
                        day,
                        month,
                        year: None
                    }
                );
            }
        }
    }

    #[test]
    fn gregorian_day_beyond_month_length_fails_with_explicit_year() {
        let now = at(2026, 10, 19);
        assert!(normalize(&gregorian(29, 2, Some(2023)), now).is_err());
        assert!(normalize(&gregorian(31, 4, Some(1998)), now).is_err());
        assert!(normalize(&gregorian(32, 1, Some(1998)), now).is_err());
        assert!(normalize(&gregorian(29, 2, Some(2024)), now).is_ok());
    }

    #[test]
    fn gregorian_leap_day_without_year_is_accepted() {
        let out = normalize(&gregorian(29, 2, None), at(2026, 10, 19)).unwrap();
        assert_eq!(
            out,
            NormalizedDate {
                day: 29,
                month: 2,
                year: None
            }
        );
    }

    #[test]
    fn gregorian_month_above_twelve_fails() {
        assert!(normalize(&gregorian(1, 13, None), at(2026, 10, 19)).is_err());
    }

    #[test]
    fn persian_with_year_converts_year_too() {
        // 1 Farvardin 1403 = 20 March 2024
        let out = normalize(&persian(1, 1, Some(1403)), at(2026, 10, 19)).unwrap();
        assert_eq!(
            out,
            NormalizedDate {
                day: 20,
                month: 3,
                year: Some(2024)
            }
        );
    }

    #[test]
    fn persian_without_year_uses_current_persian_year_but_drops_it() {
        // Oct 2026 lies in 1405; 1 Farvardin 1405 = 21 March 2026
        let out = normalize(&persian(1, 1, None), at(2026, 10, 19)).unwrap();
        assert_eq!(
            out,
            NormalizedDate {
                day: 21,
                month: 3,
                year: None
            }
        );
    }

    #[test]
    fn missing_calendar_means_persian() {
        let query = DateQuery::new(31, 3, Some(1377), None);
        let out = normalize(&query, at(2026, 10, 19)).unwrap();
        assert_eq!(
            out,
            NormalizedDate {
                day: 21,
                month: 6,
                year: Some(1998)
            }
        );
    }

    #[test]
    fn invalid_persian_dates_fail() {
        let now = at(2026, 10, 19);
        assert!(normalize(&persian(32, 1, None), now).is_err());
        assert!(normalize(&persian(1, 13, None), now).is_err());
        // Esfand has 29 days in the common year 1404
        assert!(normalize(&persian(30, 12, Some(1404)), now).is_err());
        assert!(normalize(&persian(30, 12, Some(1403)), now).is_ok());
        // Mehr (month 7) has 30 days
        assert!(normalize(&persian(31, 7, None), now).is_err());
        assert!(normalize(&persian(31, 6, None), now).is_ok());
    }

    #[test]
    fn persian_round_trip_through_projection() {
        let now = at(2026, 10, 19);
        let normalized = normalize(&persian(1, 1, None), now).unwrap();
        let converted_year = current_persian_year(now);
        let gregorian_year =
            gregorian_from_persian(converted_year, 1, 1).map(|(y, _, _)| y);

        let projection =
            to_display_projection(normalized.day, normalized.month, gregorian_year, now);
        let p = projection.persian.expect("persian view");
        assert_eq!((p.day, p.month), (1, 1));
        assert_eq!(p.year, Some(1405));
    }

    #[test]
    fn projection_echoes_gregorian_and_converts_with_year() {
        let projection = to_display_projection(21, 6, Some(1998), at(2026, 10, 19));
        assert_eq!(
            projection.gregorian,
            CalendarDay {
                day: 21,
                month: 6,
                year: Some(1998)
            }
        );
        assert_eq!(
            projection.persian,
            Some(CalendarDay {
                day: 31,
                month: 3,
                year: Some(1377)
            })
        );
    }

    #[test]
    fn projection_without_year_hides_persian_year() {
        // evaluated in 2026: 20 March 2026 = 29 Esfand 1404
        let projection = to_display_projection(20, 3, None, at(2026, 10, 19));
        assert_eq!(
            projection.persian,
            Some(CalendarDay {
                day: 29,
                month: 12,
                year: None
            })
        );
    }

    #[test]
    fn projection_degrades_to_none_for_impossible_synthetic_date() {
        let projection = to_display_projection(29, 2, None, at(2026, 10, 19));
        assert_eq!(
            projection.gregorian,
            CalendarDay {
                day: 29,
                month: 2,
                year: None
            }
        );
        assert!(projection.persian.is_none());

        // same input in a leap "current" year converts fine
        let leap = to_display_projection(29, 2, None, at(2024, 6, 1));
        assert!(leap.persian.is_some());
    }

    #[test]
    fn projection_never_panics_on_garbage() {
        let projection = to_display_projection(40, 14, Some(2020), at(2026, 10, 19));
        assert!(projection.persian.is_none());
        assert_eq!(projection.gregorian.day, 40);
    }

    #[test]
    fn current_persian_year_switches_at_nowruz() {
        assert_eq!(current_persian_year(at(2026, 3, 20)), 1404);
        assert_eq!(current_persian_year(at(2026, 3, 21)), 1405);
    }

    #[test]
    fn days_in_month_handles_leap_years() {
        assert_eq!(days_in_month(2000, 2), Some(29));
        assert_eq!(days_in_month(1900, 2), Some(28));
        assert_eq!(days_in_month(2023, 12), Some(31));
        assert_eq!(days_in_month(2023, 13), None);
    }
}
