use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime};

/// The span of time a grid view shows, anchored on a date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeWindow {
    Day(NaiveDate),
    /// Anchored on any date inside the week; weeks start on Sunday.
    Week(NaiveDate),
}

impl TimeWindow {
    /// Half-open `[start, end)` range covered by the window.
    pub fn period(&self) -> (NaiveDateTime, NaiveDateTime) {
        let start = self.first_day().and_time(NaiveTime::MIN);
        (start, start + self.length())
    }

    pub fn first_day(&self) -> NaiveDate {
        match *self {
            TimeWindow::Day(date) => date,
            TimeWindow::Week(date) => {
                date - Duration::days(date.weekday().num_days_from_sunday() as i64)
            }
        }
    }

    /// Move the window by `steps` whole days or weeks.
    pub fn shift(&mut self, steps: i64) {
        let delta = self.length() * steps as i32;
        *self = match *self {
            TimeWindow::Day(date) => TimeWindow::Day(date + delta),
            TimeWindow::Week(date) => TimeWindow::Week(date + delta),
        };
    }

    pub fn reanchor(&mut self, date: NaiveDate) {
        *self = match *self {
            TimeWindow::Day(_) => TimeWindow::Day(date),
            TimeWindow::Week(_) => TimeWindow::Week(date),
        };
    }

    pub fn title(&self) -> String {
        match *self {
            TimeWindow::Day(date) => date.format("%A, %B %d, %Y").to_string(),
            TimeWindow::Week(_) => format!("Week of {}", self.first_day().format("%b %d, %Y")),
        }
    }

    fn length(&self) -> Duration {
        match self {
            TimeWindow::Day(_) => Duration::days(1),
            TimeWindow::Week(_) => Duration::weeks(1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn day_period_covers_one_day() {
        let (start, end) = TimeWindow::Day(date(2024, 2, 28)).period();
        assert_eq!(start, date(2024, 2, 28).and_hms_opt(0, 0, 0).unwrap());
        assert_eq!(end, date(2024, 2, 29).and_hms_opt(0, 0, 0).unwrap());
    }

    #[test]
    fn week_starts_on_sunday() {
        // 2024-05-15 is a Wednesday.
        let window = TimeWindow::Week(date(2024, 5, 15));
        assert_eq!(window.first_day(), date(2024, 5, 12));
        let (start, end) = window.period();
        assert_eq!(end - start, Duration::weeks(1));

        // A Sunday anchors its own week.
        assert_eq!(TimeWindow::Week(date(2024, 5, 12)).first_day(), date(2024, 5, 12));
    }

    #[test]
    fn shift_moves_by_window_length() {
        let mut day = TimeWindow::Day(date(2024, 12, 31));
        day.shift(1);
        assert_eq!(day, TimeWindow::Day(date(2025, 1, 1)));

        let mut week = TimeWindow::Week(date(2024, 5, 15));
        week.shift(-1);
        assert_eq!(week.first_day(), date(2024, 5, 5));
    }

    #[test]
    fn reanchor_keeps_granularity() {
        let mut week = TimeWindow::Week(date(2024, 5, 15));
        week.reanchor(date(2020, 1, 1));
        assert_eq!(week, TimeWindow::Week(date(2020, 1, 1)));
    }
}
