#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use mytime::libs::navigation::NavigationState;
    use mytime::libs::timers::DeselectTimer;
    use std::time::Duration;
    use tokio::sync::mpsc;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 6).unwrap()
    }

    fn with_tasks(count: usize) -> NavigationState {
        let mut nav = NavigationState::new(today());
        nav.set_task_count(count);
        nav
    }

    #[test]
    fn test_cannot_move_past_today() {
        let mut nav = NavigationState::new(today());

        assert!(!nav.can_go_forward(today()));
        assert!(!nav.next_day(today()));
        assert_eq!(nav.date(), today());

        nav.prev_day();
        nav.prev_day();
        assert_eq!(nav.date(), NaiveDate::from_ymd_opt(2024, 3, 4).unwrap());
        assert!(nav.next_day(today()));
        assert!(nav.next_day(today()));
        assert!(!nav.next_day(today()));

        nav.prev_day();
        nav.goto_today(today());
        assert_eq!(nav.date(), today());
    }

    #[test]
    fn test_selection_starts_at_first_task() {
        let mut nav = with_tasks(3);
        assert_eq!(nav.selected(), None);

        nav.select_next();
        assert_eq!(nav.selected(), Some(0));

        let mut nav = with_tasks(3);
        nav.select_previous();
        assert_eq!(nav.selected(), Some(0));
    }

    #[test]
    fn test_selection_is_clamped() {
        let mut nav = with_tasks(2);

        nav.select_next();
        nav.select_next();
        nav.select_next();
        assert_eq!(nav.selected(), Some(1));

        nav.select_previous();
        nav.select_previous();
        assert_eq!(nav.selected(), Some(0));
    }

    #[test]
    fn test_no_selection_without_tasks() {
        let mut nav = with_tasks(0);

        assert!(nav.select_next().is_none());
        assert!(nav.select_previous().is_none());
        assert_eq!(nav.selected(), None);
    }

    #[test]
    fn test_shrinking_list_clamps_selection() {
        let mut nav = with_tasks(5);
        for _ in 0..5 {
            nav.select_next();
        }
        assert_eq!(nav.selected(), Some(4));

        nav.set_task_count(2);
        assert_eq!(nav.selected(), Some(1));
        nav.set_task_count(0);
        assert_eq!(nav.selected(), None);
    }

    #[test]
    fn test_date_change_clears_selection() {
        let mut nav = with_tasks(3);
        let ticket = nav.select_next().unwrap();

        nav.prev_day();
        assert_eq!(nav.selected(), None);

        // The old timer belongs to the previous day
        nav.set_task_count(3);
        nav.select_next();
        assert!(!nav.on_deselect_timeout(ticket));
        assert_eq!(nav.selected(), Some(0));
    }

    #[test]
    fn test_deselect_timeout() {
        let mut nav = with_tasks(3);
        let ticket = nav.select_next().unwrap();

        assert!(nav.on_deselect_timeout(ticket));
        assert_eq!(nav.selected(), None);
    }

    #[test]
    fn test_newer_selection_ignores_stale_timeout() {
        let mut nav = with_tasks(3);
        let stale = nav.select_next().unwrap();
        let current = nav.select_next().unwrap();

        assert!(!nav.on_deselect_timeout(stale));
        assert_eq!(nav.selected(), Some(1));
        assert!(nav.on_deselect_timeout(current));
    }

    #[test]
    fn test_timeout_during_modal_is_deferred() {
        let mut nav = with_tasks(3);
        let ticket = nav.select_next().unwrap();

        nav.open_modal();
        assert!(!nav.on_deselect_timeout(ticket));
        assert_eq!(nav.selected(), Some(0));

        let rearmed = nav.close_modal().expect("deferred deselect restarts the timer");
        assert!(!nav.on_deselect_timeout(ticket));
        assert!(nav.on_deselect_timeout(rearmed));
        assert_eq!(nav.selected(), None);
    }

    #[test]
    fn test_close_modal_without_timeout() {
        let mut nav = with_tasks(3);
        nav.select_next();

        nav.open_modal();
        assert!(nav.is_modal_open());
        assert!(nav.close_modal().is_none());
        assert!(!nav.is_modal_open());
    }

    #[tokio::test]
    async fn test_deselect_timer_fires() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut timer = DeselectTimer::new(Duration::from_millis(10));

        timer.start(tx, 1u64);
        assert!(timer.is_armed());
        assert_eq!(rx.recv().await, Some(1));
    }

    #[tokio::test]
    async fn test_restarting_deselect_timer_cancels_previous() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut timer = DeselectTimer::new(Duration::from_millis(20));

        timer.start(tx.clone(), 1u64);
        timer.start(tx.clone(), 2u64);
        drop(tx);

        assert_eq!(rx.recv().await, Some(2));
        tokio::time::sleep(Duration::from_millis(40)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_cancelled_deselect_timer_sends_nothing() {
        let (tx, mut rx) = mpsc::unbounded_channel::<u64>();
        let mut timer = DeselectTimer::new(Duration::from_millis(10));

        timer.start(tx, 1);
        timer.cancel();
        assert!(!timer.is_armed());

        // Every sender is gone once the cancelled task exits
        assert_eq!(rx.recv().await, None);
    }
}
