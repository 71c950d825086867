use super::*;

async fn settle() {
    for _ in 0..5 {
        tokio::task::yield_now().await;
    }
}

async fn advance_ticks(ticks: u32, period: Duration) {
    for _ in 0..ticks {
        time::advance(period).await;
        settle().await;
    }
}

#[tokio::test(start_paused = true)]
async fn climbs_by_step_and_stops_at_ceiling() {
    let config = ProgressConfig::default();
    let sim = ProgressSimulator::new(config);
    sim.start();
    settle().await;
    assert_eq!(sim.value(), 0);

    let mut last = 0;
    for _ in 0..9 {
        advance_ticks(1, config.period).await;
        let value = sim.value();
        assert_eq!(value, last + 10);
        last = value;
    }
    assert_eq!(sim.value(), 90);

    advance_ticks(6, config.period).await;
    assert_eq!(sim.value(), 90);
    assert!(sim.is_running());
}

#[tokio::test(start_paused = true)]
async fn first_step_lands_one_period_after_start() {
    let config = ProgressConfig::default();
    let sim = ProgressSimulator::new(config);
    sim.start();

    // No yield between start and the clock moving: the ticker has not been polled yet.
    time::advance(config.period).await;
    settle().await;
    assert_eq!(sim.value(), 10);

    time::advance(config.period).await;
    settle().await;
    assert_eq!(sim.value(), 20);
}

#[tokio::test(start_paused = true)]
async fn ceiling_that_is_not_a_step_multiple_is_respected() {
    let config = ProgressConfig {
        step: 25,
        ceiling: 60,
        ..ProgressConfig::default()
    };
    let sim = ProgressSimulator::new(config);
    sim.start();
    advance_ticks(5, config.period).await;
    assert_eq!(sim.value(), 60);
}

#[tokio::test(start_paused = true)]
async fn second_start_keeps_existing_ticker() {
    let config = ProgressConfig::default();
    let sim = ProgressSimulator::new(config);
    sim.start();
    advance_ticks(3, config.period).await;
    assert_eq!(sim.value(), 30);

    sim.start();
    settle().await;
    assert_eq!(sim.value(), 30);

    advance_ticks(1, config.period).await;
    assert_eq!(sim.value(), 40);
}

#[tokio::test(start_paused = true)]
async fn complete_supersedes_pending_ticks() {
    let config = ProgressConfig::default();
    let sim = ProgressSimulator::new(config);
    sim.start();
    advance_ticks(2, config.period).await;

    sim.complete();
    assert_eq!(sim.value(), COMPLETE);
    assert_eq!(sim.frame().phase, ProgressPhase::Completed);

    advance_ticks(4, config.period).await;
    assert_eq!(sim.value(), COMPLETE);
}

#[tokio::test(start_paused = true)]
async fn reset_returns_to_zero_and_stays_there() {
    let config = ProgressConfig::default();
    let sim = ProgressSimulator::new(config);
    sim.start();
    advance_ticks(4, config.period).await;
    assert_eq!(sim.value(), 40);

    sim.reset();
    assert_eq!(sim.value(), 0);
    assert!(!sim.frame().is_active());

    advance_ticks(4, config.period).await;
    assert_eq!(sim.value(), 0);
}

#[tokio::test(start_paused = true)]
async fn completion_is_held_before_release() {
    let config = ProgressConfig::default();
    let sim = ProgressSimulator::new(config);
    let mut frames = sim.subscribe();
    sim.start();
    advance_ticks(1, config.period).await;

    sim.complete_and_release(config.completion_hold);
    assert!(frames.has_changed().expect("sender alive"));
    assert_eq!(frames.borrow_and_update().value, COMPLETE);

    time::advance(config.completion_hold / 2).await;
    settle().await;
    assert_eq!(sim.value(), COMPLETE);

    time::advance(config.completion_hold).await;
    settle().await;
    assert_eq!(sim.value(), 0);
    assert_eq!(sim.frame().phase, ProgressPhase::Idle);
}

#[tokio::test(start_paused = true)]
async fn restart_during_hold_cancels_release() {
    let config = ProgressConfig::default();
    let sim = ProgressSimulator::new(config);
    sim.start();
    sim.complete_and_release(config.completion_hold);

    sim.start();
    assert_eq!(sim.value(), 0);
    assert!(sim.is_running());

    advance_ticks(2, config.period).await;
    assert_eq!(sim.value(), 20);
    assert!(sim.is_running());
}
