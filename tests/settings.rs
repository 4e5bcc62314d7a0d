#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use mytime::libs::error::ValidationError;
    use mytime::libs::settings::{parse_work_hours, Settings, DEFAULT_WORK_HOURS};

    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 4).unwrap()
    }

    #[test]
    fn test_default_goals() {
        let settings = Settings::default();
        assert_eq!(settings.work_hours, DEFAULT_WORK_HOURS);

        assert_eq!(settings.goal_day_in_seconds(monday()), 8 * 3600);
        // Saturday
        assert_eq!(settings.goal_day_in_seconds(NaiveDate::from_ymd_opt(2024, 3, 9).unwrap()), 0);
        assert_eq!(settings.goal_week_in_seconds(), 40 * 3600);
    }

    #[test]
    fn test_goal_per_weekday() {
        let settings = Settings::new("1,2,3,4,5,6,7", "{}");

        for offset in 0..7 {
            let date = monday() + chrono::Duration::days(offset);
            assert_eq!(settings.goal_day_in_seconds(date), (offset + 1) * 3600);
        }
        assert_eq!(settings.goal_week_in_seconds(), 28 * 3600);
    }

    #[test]
    fn test_fractional_hours() {
        let settings = Settings::new("7.5,7.5,7.5,7.5,6,0,0", "{}");
        assert_eq!(settings.goal_day_in_seconds(monday()), 27000);
        assert_eq!(settings.goal_week_in_seconds(), 36 * 3600);
    }

    #[test]
    fn test_malformed_work_hours_degrade_to_zero() {
        for value in ["", "8,8,8", "8,8,8,8,8,0,0,0", "a,b,c,d,e,f,g", "8,8,8,8,8,0,-1"] {
            let settings = Settings::new(value, "{}");
            assert_eq!(settings.goal_day_in_seconds(monday()), 0, "{value}");
            assert_eq!(settings.goal_week_in_seconds(), 0, "{value}");
        }
    }

    #[test]
    fn test_set_work_hours_drops_cached_goals() {
        let mut settings = Settings::default();
        assert_eq!(settings.goal_week_in_seconds(), 40 * 3600);

        settings.set_work_hours("4,4,4,4,4,0,0");
        assert_eq!(settings.goal_week_in_seconds(), 20 * 3600);
    }

    #[test]
    fn test_parse_work_hours() {
        assert_eq!(parse_work_hours(" 8, 8,8 ,8,8,0,0").unwrap(), [8.0, 8.0, 8.0, 8.0, 8.0, 0.0, 0.0]);
        assert_eq!(
            parse_work_hours("8,8").unwrap_err(),
            ValidationError::InvalidWorkHours("8,8".to_string())
        );
        assert!(parse_work_hours("8,8,8,8,8,0,inf").is_err());
    }
}
