use crate::der::{read_content, Tag};
use crate::error::{wrap, X509Error, X509Result};
use nom::Err;
use std::convert::TryFrom;
use std::fmt;
use time::macros::format_description;
use time::{Date, Month, OffsetDateTime, PrimitiveDateTime, Time};

/// An ASN.1 timestamp, always expressed in UTC.
#[derive(Copy, Clone, Debug, Hash, Ord, PartialOrd, Eq, PartialEq)]
pub struct ASN1Time {
    time: OffsetDateTime,
    generalized: bool,
}

impl ASN1Time {
    #[inline]
    pub const fn new_generalized(dt: OffsetDateTime) -> Self {
        Self {
            time: dt,
            generalized: true,
        }
    }

    #[inline]
    pub const fn new_utc(dt: OffsetDateTime) -> Self {
        Self {
            time: dt,
            generalized: false,
        }
    }

    #[inline]
    pub const fn to_datetime(&self) -> OffsetDateTime {
        self.time
    }

    /// Returns the number of non-leap seconds since January 1, 1970 0:00:00 UTC (aka "UNIX timestamp").
    #[inline]
    pub fn timestamp(&self) -> i64 {
        self.time.unix_timestamp()
    }

    /// Return `true` if date is encoded as UTCTime
    #[inline]
    pub const fn is_utctime(&self) -> bool {
        !self.generalized
    }

    /// Return `true` if date is encoded as GeneralizedTime
    #[inline]
    pub const fn is_generalizedtime(&self) -> bool {
        self.generalized
    }
}

/// Parse a `Time`, either as UTCTime or as GeneralizedTime
///
/// <pre>
/// Time ::= CHOICE {
///      utcTime        UTCTime,
///      generalTime    GeneralizedTime }
/// </pre>
///
/// GeneralizedTime is only tried if the tag is not UTCTime: any other error while reading
/// the UTCTime header is reported as is.
pub(crate) fn parse_choice_of_time(i: &[u8]) -> X509Result<'_, ASN1Time> {
    let (rem, (content, generalized)) = match read_content(i, Tag::UtcTime) {
        Ok((rem, content)) => (rem, (content, false)),
        Err(Err::Error(e)) if e.is_unexpected_tag() => read_content(i, Tag::GeneralizedTime)
            .map(|(rem, content)| (rem, (content, true)))
            .map_err(wrap(X509Error::InvalidDate))?,
        Err(e) => return Err(wrap(X509Error::InvalidDate)(e)),
    };
    let time = if generalized {
        decode_time(content, 4).map(ASN1Time::new_generalized)
    } else {
        decode_time(content, 2).map(ASN1Time::new_utc)
    };
    match time {
        Some(time) => Ok((rem, time)),
        None => Err(Err::Error(X509Error::InvalidDate(None))),
    }
}

/// Decode the content of a UTCTime (`YYMMDDhhmmssZ`) or a GeneralizedTime (`YYYYMMDDhhmmssZ`)
///
/// X.509 only allows dates expressed in UTC, so the content must end with `Z`.
fn decode_time(content: &[u8], year_digits: usize) -> Option<OffsetDateTime> {
    let (year, rest) = decimal_field(content, year_digits)?;
    let (month, rest) = decimal_field(rest, 2)?;
    let (day, rest) = decimal_field(rest, 2)?;
    let (hour, rest) = decimal_field(rest, 2)?;
    let (minute, rest) = decimal_field(rest, 2)?;
    let (second, rest) = decimal_field(rest, 2)?;
    if rest != b"Z" {
        return None;
    }
    let year = if year_digits == 2 {
        // years 50..99 are 19xx, 00..49 are 20xx
        if year < 50 {
            2000 + year
        } else {
            1900 + year
        }
    } else {
        year
    };
    let month = Month::try_from(u8::try_from(month).ok()?).ok()?;
    let date = Date::from_calendar_date(i32::try_from(year).ok()?, month, day as u8).ok()?;
    let time = Time::from_hms(hour as u8, minute as u8, second as u8).ok()?;
    Some(PrimitiveDateTime::new(date, time).assume_utc())
}

fn decimal_field(i: &[u8], digits: usize) -> Option<(u32, &[u8])> {
    if i.len() < digits {
        return None;
    }
    let (field, rest) = i.split_at(digits);
    field
        .iter()
        .try_fold(0u32, |acc, &b| {
            if b.is_ascii_digit() {
                Some(acc * 10 + u32::from(b - b'0'))
            } else {
                None
            }
        })
        .map(|v| (v, rest))
}

impl fmt::Display for ASN1Time {
    /// Human-readable form, for ex `2015-04-01 12:00:00 +0000 (Wed, 01 Apr 2015)`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let format = format_description!("[year]-[month]-[day] [hour]:[minute]:[second] [offset_hour sign:mandatory][offset_minute] ([weekday repr:short], [day] [month repr:short] [year])");
        let s = self
            .time
            .format(format)
            .unwrap_or_else(|e| format!("Invalid date: {}", e));
        f.write_str(&s)
    }
}
