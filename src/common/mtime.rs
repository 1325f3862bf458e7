//! Modification-time encoding for zip entries.
//!
//! The DOS timestamp in a zip header has two-second resolution and no time
//! zone, so every file entry also carries an NTFS extra field (tag `0x000A`)
//! holding mtime/atime/ctime as 100 ns ticks since 1601-01-01 UTC. Readers
//! prefer the extra field and fall back to the DOS value read as local time.

use chrono::{DateTime, Datelike, Local, TimeZone, Timelike, Utc};
use std::time::SystemTime;

pub const NTFS_EXTRA_TAG: u16 = 0x000a;
const NTFS_TIME_ATTR_TAG: u16 = 0x0001;
const NTFS_TIME_ATTR_SIZE: u16 = 24;
/// 100 ns ticks between 1601-01-01 and 1970-01-01.
const NTFS_EPOCH_OFFSET: i64 = 116_444_736_000_000_000;
const TICKS_PER_MILLI: i64 = 10_000;

/// Timestamps of one file, in milliseconds since the unix epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryTimes {
    pub modified: i64,
    pub accessed: Option<i64>,
    pub created: Option<i64>,
}

impl EntryTimes {
    pub fn from_metadata(metadata: &std::fs::Metadata) -> std::io::Result<Self> {
        Ok(Self {
            modified: system_time_to_millis(metadata.modified()?),
            accessed: metadata.accessed().ok().map(system_time_to_millis),
            created: metadata.created().ok().map(system_time_to_millis),
        })
    }
}

pub fn system_time_to_millis(time: SystemTime) -> i64 {
    DateTime::<Utc>::from(time).timestamp_millis()
}

/// Serializes the complete NTFS extra field (header included).
pub fn ntfs_extra_field(times: &EntryTimes) -> Vec<u8> {
    let body_len = 4 + 4 + NTFS_TIME_ATTR_SIZE;
    let mut field = Vec::with_capacity(4 + body_len as usize);
    field.extend_from_slice(&NTFS_EXTRA_TAG.to_le_bytes());
    field.extend_from_slice(&body_len.to_le_bytes());
    // reserved
    field.extend_from_slice(&[0u8; 4]);
    field.extend_from_slice(&NTFS_TIME_ATTR_TAG.to_le_bytes());
    field.extend_from_slice(&NTFS_TIME_ATTR_SIZE.to_le_bytes());
    for millis in [Some(times.modified), times.accessed, times.created] {
        let ticks = millis.map(millis_to_ticks).unwrap_or(0);
        field.extend_from_slice(&ticks.to_le_bytes());
    }
    field
}

/// Finds the NTFS field in a raw extra-data block and returns its mtime.
pub fn parse_ntfs_modified(extra: &[u8]) -> Option<i64> {
    let mut data = extra;
    while data.len() >= 4 {
        let tag = u16::from_le_bytes([data[0], data[1]]);
        let size = u16::from_le_bytes([data[2], data[3]]) as usize;
        let body = data.get(4..4 + size)?;
        if tag == NTFS_EXTRA_TAG {
            return parse_ntfs_body(body);
        }
        data = &data[4 + size..];
    }
    None
}

fn parse_ntfs_body(body: &[u8]) -> Option<i64> {
    let mut attrs = body.get(4..)?;
    while attrs.len() >= 4 {
        let tag = u16::from_le_bytes([attrs[0], attrs[1]]);
        let size = u16::from_le_bytes([attrs[2], attrs[3]]) as usize;
        let value = attrs.get(4..4 + size)?;
        if tag == NTFS_TIME_ATTR_TAG && size >= 8 {
            let ticks = u64::from_le_bytes(value[..8].try_into().ok()?);
            return ticks_to_millis(ticks);
        }
        attrs = &attrs[4 + size..];
    }
    None
}

fn millis_to_ticks(millis: i64) -> u64 {
    millis
        .checked_mul(TICKS_PER_MILLI)
        .and_then(|t| t.checked_add(NTFS_EPOCH_OFFSET))
        .and_then(|t| u64::try_from(t).ok())
        .unwrap_or(0)
}

fn ticks_to_millis(ticks: u64) -> Option<i64> {
    if ticks == 0 {
        return None;
    }
    let ticks = i64::try_from(ticks).ok()?;
    Some((ticks - NTFS_EPOCH_OFFSET).div_euclid(TICKS_PER_MILLI))
}

/// Local DOS timestamp for the zip header; out-of-range times become 1980-01-01.
pub fn to_dos_time(millis: i64) -> zip::DateTime {
    let Some(local) = Local.timestamp_millis_opt(millis).single() else {
        return zip::DateTime::default();
    };
    let Ok(year) = u16::try_from(local.year()) else {
        return zip::DateTime::default();
    };
    zip::DateTime::from_date_and_time(
        year,
        local.month() as u8,
        local.day() as u8,
        local.hour() as u8,
        local.minute() as u8,
        local.second() as u8,
    )
    .unwrap_or_default()
}

pub fn from_dos_time(time: zip::DateTime) -> Option<i64> {
    Local
        .with_ymd_and_hms(
            i32::from(time.year()),
            u32::from(time.month()),
            u32::from(time.day()),
            u32::from(time.hour()),
            u32::from(time.minute()),
            u32::from(time.second()),
        )
        .earliest()
        .map(|t| t.timestamp_millis())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn times(modified: i64) -> EntryTimes {
        EntryTimes { modified, accessed: None, created: None }
    }

    #[test]
    fn ntfs_field_layout() {
        let field = ntfs_extra_field(&times(0));
        assert_eq!(field.len(), 36);
        assert_eq!(&field[..4], &[0x0a, 0x00, 32, 0]);
        let mtime = u64::from_le_bytes(field[12..20].try_into().unwrap());
        assert_eq!(mtime, NTFS_EPOCH_OFFSET as u64);
        // unknown atime/ctime are written as zero
        assert!(field[20..].iter().all(|b| *b == 0));
    }

    #[test]
    fn ntfs_millis_survive() {
        for millis in [1, 999, 1_600_000_000_123, 4_102_444_800_000] {
            let field = ntfs_extra_field(&times(millis));
            assert_eq!(parse_ntfs_modified(&field), Some(millis));
        }
    }

    #[test]
    fn ntfs_field_found_after_other_fields() {
        let mut extra = vec![0x55, 0x54, 5, 0, 1, 0, 0, 0, 0];
        extra.extend(ntfs_extra_field(&times(1_234_567)));
        assert_eq!(parse_ntfs_modified(&extra), Some(1_234_567));
    }

    #[test]
    fn truncated_extra_is_ignored() {
        let field = ntfs_extra_field(&times(42));
        assert_eq!(parse_ntfs_modified(&field[..20]), None);
        assert_eq!(parse_ntfs_modified(&[]), None);
    }

    #[test]
    fn dos_time_has_two_second_resolution() {
        let millis = 1_600_000_001_500;
        let back = from_dos_time(to_dos_time(millis)).unwrap();
        assert!((millis - back).abs() < 2_000, "{millis} vs {back}");
    }

    #[test]
    fn pre_dos_epoch_clamps() {
        let clamped = to_dos_time(0);
        assert_eq!((clamped.year(), clamped.month(), clamped.day()), (1980, 1, 1));
    }
}
