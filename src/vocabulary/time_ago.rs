use chrono::{DateTime, Utc};

const MINUTES_PER_HOUR: i64 = 60;
const MINUTES_PER_DAY: i64 = 1440;

/// 相对于 `now` 的时间描述，如 `30 minutes ago`、`1 hours ago`、`2 days ago`
///
/// 按整分钟向下取整；未来时间同样按取整计算，不做特殊处理。
pub fn format_time_ago_at(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let minutes = (now - timestamp).num_milliseconds().div_euclid(60_000);

    if minutes < MINUTES_PER_HOUR {
        format!("{minutes} minutes ago")
    } else if minutes < MINUTES_PER_DAY {
        format!("{} hours ago", minutes / MINUTES_PER_HOUR)
    } else {
        format!("{} days ago", minutes / MINUTES_PER_DAY)
    }
}

/// 相对于当前时间的时间描述
pub fn format_time_ago(timestamp: DateTime<Utc>) -> String {
    format_time_ago_at(timestamp, Utc::now())
}
