//! RFC 3339 timestamps without a date/time dependency.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// RFC 3339 UTC timestamp, second precision: "2024-01-15T10:30:00Z".
/// Stack-allocated, 20 bytes.
#[derive(Clone, Copy)]
pub struct Rfc3339 {
    buf: [u8; 20],
}

impl Rfc3339 {
    /// Timestamp for the current wall-clock time.
    #[inline]
    pub fn now() -> Self {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();
        Self::from_duration(now)
    }

    /// Timestamp for a duration since UNIX_EPOCH.
    pub fn from_duration(since_epoch: Duration) -> Self {
        let secs = since_epoch.as_secs();
        let day_secs = secs % 86_400;
        let (year, month, day) = civil_from_days((secs / 86_400) as i64);

        let mut buf = [0u8; 20];
        write_padded(&mut buf[0..4], year as u32);
        buf[4] = b'-';
        write_padded(&mut buf[5..7], month);
        buf[7] = b'-';
        write_padded(&mut buf[8..10], day);
        buf[10] = b'T';
        write_padded(&mut buf[11..13], (day_secs / 3600) as u32);
        buf[13] = b':';
        write_padded(&mut buf[14..16], ((day_secs % 3600) / 60) as u32);
        buf[16] = b':';
        write_padded(&mut buf[17..19], (day_secs % 60) as u32);
        buf[19] = b'Z';

        Self { buf }
    }

    /// Get the timestamp as a string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        // Only ASCII digits and separators are ever written.
        std::str::from_utf8(&self.buf).unwrap_or("1970-01-01T00:00:00Z")
    }
}

impl std::fmt::Display for Rfc3339 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::fmt::Debug for Rfc3339 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Rfc3339({})", self.as_str())
    }
}

/// Days since 1970-01-01 to (year, month, day), proleptic Gregorian.
fn civil_from_days(days: i64) -> (i64, u32, u32) {
    let z = days + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z.rem_euclid(146_097);
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = (doy - (153 * mp + 2) / 5 + 1) as u32;
    let month = (if mp < 10 { mp + 3 } else { mp - 9 }) as u32;
    let year = yoe + era * 400 + i64::from(month <= 2);
    (year, month, day)
}

/// Zero-padded decimal into the whole slice.
#[inline]
fn write_padded(out: &mut [u8], mut value: u32) {
    for slot in out.iter_mut().rev() {
        *slot = b'0' + (value % 10) as u8;
        value /= 10;
    }
}
