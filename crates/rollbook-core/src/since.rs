//! Relative-age strings ("3 hours ago") for display next to a timestamp.

use chrono::{DateTime, Utc};

const JUST_NOW: &str = "just now";

/// Units walked from most to least significant, with their length in seconds.
const INTERVALS: [(&str, i64); 5] = [
  ("year", 31_536_000),
  ("month", 2_592_000),
  ("day", 86_400),
  ("hour", 3_600),
  ("minute", 60),
];

/// Describe how long ago `posted` (unix seconds, as a string) was.
pub fn time_since(posted: &str) -> String { time_since_at(posted, Utc::now()) }

/// [`time_since`] measured against an explicit `now`.
///
/// Timestamps in the future are not special-cased; they fall into the
/// seconds bucket with a negative count.
pub fn time_since_at(posted: &str, now: DateTime<Utc>) -> String {
  let Ok(posted) = posted.trim().parse::<i64>() else {
    return JUST_NOW.to_owned();
  };
  let elapsed = now.timestamp().saturating_sub(posted);

  if elapsed == 0 {
    return JUST_NOW.to_owned();
  }
  if elapsed < 60 {
    return format!("{elapsed} {} ago", plural("second", elapsed));
  }

  INTERVALS
    .iter()
    .find_map(|&(unit, secs)| {
      let count = elapsed / secs;
      (count > 0).then(|| format!("{count} {} ago", plural(unit, count)))
    })
    .unwrap_or_else(|| JUST_NOW.to_owned())
}

fn plural(unit: &str, count: i64) -> String {
  if count == 1 { unit.to_owned() } else { format!("{unit}s") }
}
