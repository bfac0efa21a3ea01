use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use ferrite_backprop::{
    play_loop, Dataset, NetworkConfig, PlayConfig, PlayOutcome, TaskType, TrainingDriver,
};

fn shared_driver() -> Arc<Mutex<TrainingDriver>> {
    let config = NetworkConfig::new(2, 3, 1, 0.1, TaskType::Classification).with_seed(21);
    Arc::new(Mutex::new(TrainingDriver::from_config(config, Dataset::xor()).unwrap()))
}

#[test]
fn max_steps_finishes_and_reports_every_step() {
    let driver = shared_driver();
    let (tx, rx) = mpsc::channel();

    let mut config = PlayConfig::new(Duration::from_millis(1));
    config.max_steps = Some(6);
    config.progress_tx = Some(tx);

    let outcome = play_loop(&driver, &config).unwrap();
    assert_eq!(outcome, PlayOutcome::Finished);
    drop(config);

    let stats: Vec<_> = rx.iter().collect();
    assert_eq!(stats.len(), 6);
    assert_eq!(stats.last().unwrap().step, 6);
    assert_eq!(driver.lock().unwrap().step_count(), 6);
}

#[test]
fn raised_stop_flag_ends_the_loop() {
    let driver = shared_driver();
    let stop = Arc::new(AtomicBool::new(false));

    let mut config = PlayConfig::new(Duration::from_millis(2));
    config.stop_flag = Some(stop.clone());

    let runner = {
        let driver = driver.clone();
        thread::spawn(move || play_loop(&driver, &config))
    };
    thread::sleep(Duration::from_millis(30));
    stop.store(true, Ordering::Relaxed);

    let outcome = runner.join().unwrap().unwrap();
    assert_eq!(outcome, PlayOutcome::Stopped);

    // No step is taken once the flag is up.
    let steps = driver.lock().unwrap().step_count();
    thread::sleep(Duration::from_millis(20));
    assert_eq!(driver.lock().unwrap().step_count(), steps);
}

#[test]
fn flag_raised_before_start_takes_no_steps() {
    let driver = shared_driver();
    let mut config = PlayConfig::new(Duration::from_millis(1));
    config.stop_flag = Some(Arc::new(AtomicBool::new(true)));

    assert_eq!(play_loop(&driver, &config).unwrap(), PlayOutcome::Stopped);
    assert_eq!(driver.lock().unwrap().step_count(), 0);
}

#[test]
fn dropped_receiver_disconnects() {
    let driver = shared_driver();
    let (tx, rx) = mpsc::channel();
    drop(rx);

    let mut config = PlayConfig::new(Duration::from_millis(1));
    config.progress_tx = Some(tx);

    assert_eq!(play_loop(&driver, &config).unwrap(), PlayOutcome::Disconnected);
    // The step that found the receiver gone still completed.
    assert_eq!(driver.lock().unwrap().step_count(), 1);
}

#[test]
fn other_callers_interleave_between_ticks() {
    let driver = shared_driver();
    let mut config = PlayConfig::new(Duration::from_millis(5));
    config.max_steps = Some(10);

    let runner = {
        let driver = driver.clone();
        thread::spawn(move || play_loop(&driver, &config))
    };
    for _ in 0..5 {
        let weights = driver.lock().unwrap().network().weights();
        assert!(weights.is_finite());
        thread::sleep(Duration::from_millis(3));
    }
    assert_eq!(runner.join().unwrap().unwrap(), PlayOutcome::Finished);
    assert_eq!(driver.lock().unwrap().step_count(), 10);
}

#[test]
fn stop_flag_interrupts_a_long_interval() {
    let driver = shared_driver();
    let stop = Arc::new(AtomicBool::new(false));

    let mut config = PlayConfig::new(Duration::from_secs(60));
    config.stop_flag = Some(stop.clone());

    let runner = {
        let driver = driver.clone();
        thread::spawn(move || play_loop(&driver, &config))
    };
    thread::sleep(Duration::from_millis(50));
    let raised = Instant::now();
    stop.store(true, Ordering::Relaxed);

    assert_eq!(runner.join().unwrap().unwrap(), PlayOutcome::Stopped);
    assert!(raised.elapsed() < Duration::from_secs(5));
    // Only the first tick ran before the long wait.
    assert_eq!(driver.lock().unwrap().step_count(), 1);
}
