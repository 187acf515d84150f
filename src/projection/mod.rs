pub mod list;
pub mod map;

use chrono::{DateTime, FixedOffset, Utc};

pub fn format_time_of_day(time: DateTime<Utc>, offset: FixedOffset) -> String {
    time.with_timezone(&offset).format("%-I:%M:%S %p").to_string()
}
