use chrono::{DateTime, Local};

pub struct TimeUtils;

impl TimeUtils {
    pub const MS_IN_S: i64 = 1000;
    pub const SECS_IN_D: i64 = 60 * 60 * 24;
    pub const STANDARD_TIME_FORMAT: &str = "%Y-%m-%d";
    pub const SHORT_TIME_FORMAT: &str = "%b %Y";
}

/// Formats a chart x coordinate (UNIX seconds) as a calendar date.
/// Coarse spans get month labels, fine ones the full date.
pub fn chart_time_label(epoch_sec: f64, visible_span_secs: f64) -> String {
    let Some(dt) = DateTime::from_timestamp(epoch_sec.round() as i64, 0) else {
        return String::new();
    };
    let format = if visible_span_secs > (TimeUtils::SECS_IN_D * 180) as f64 {
        TimeUtils::SHORT_TIME_FORMAT
    } else {
        TimeUtils::STANDARD_TIME_FORMAT
    };
    dt.format(format).to_string()
}

/// Spacing in days between date grid lines so that roughly `target_lines` fit in the span.
pub fn date_grid_step_days(visible_span_secs: f64, target_lines: f64) -> i64 {
    const STEPS: [i64; 10] = [1, 2, 7, 14, 30, 61, 91, 182, 365, 730];
    let span_days = visible_span_secs / TimeUtils::SECS_IN_D as f64;
    STEPS
        .iter()
        .copied()
        .find(|&step| span_days / step as f64 <= target_lines)
        .unwrap_or(STEPS[STEPS.len() - 1])
}

pub fn local_now_as_timestamp_ms() -> i64 {
    let now_local = Local::now();
    now_local.timestamp_millis()
}

pub fn how_many_seconds_ago(past_timestamp_ms: i64) -> i64 {
    // How many seconds ago was the event described by `past_timestamp_ms` ?
    let now_timestamp_ms = local_now_as_timestamp_ms();
    (now_timestamp_ms - past_timestamp_ms) / TimeUtils::MS_IN_S
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_switch_to_months_for_wide_spans() {
        let t = 1_704_067_200.0; // 2024-01-01
        assert_eq!(chart_time_label(t, 86_400.0 * 30.0), "2024-01-01");
        assert_eq!(chart_time_label(t, 86_400.0 * 400.0), "Jan 2024");
    }

    #[test]
    fn grid_step_widens_with_the_span() {
        let day = TimeUtils::SECS_IN_D as f64;
        assert_eq!(date_grid_step_days(day * 5.0, 8.0), 1);
        assert_eq!(date_grid_step_days(day * 60.0, 8.0), 14);
        assert_eq!(date_grid_step_days(day * 3_650.0, 8.0), 730);
        assert_eq!(date_grid_step_days(day * 100_000.0, 8.0), 730);
    }

    #[test]
    fn out_of_range_time_gives_empty_label() {
        assert_eq!(chart_time_label(f64::MAX, 1.0), "");
    }
}
