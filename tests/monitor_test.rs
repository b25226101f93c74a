use prompt_vault::sync::{ConnectionMonitor, ConnectionStatus};
use std::{
    sync::{Arc, Mutex},
    time::Duration,
};
use tokio::time::sleep;

use test_utils::FakeRemote;

use ConnectionStatus::{Checking, Connected, Disconnected};

fn monitor_for(remote: &Arc<FakeRemote>) -> ConnectionMonitor {
    ConnectionMonitor::new(
        remote.clone(),
        ConnectionMonitor::DEFAULT_INTERVAL,
        ConnectionMonitor::DEFAULT_TIMEOUT,
    )
}

fn recorder() -> (
    Arc<Mutex<Vec<ConnectionStatus>>>,
    impl Fn(ConnectionStatus) + Send + Sync + 'static,
) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    (seen, move |status| sink.lock().unwrap().push(status))
}

#[tokio::test(start_paused = true)]
async fn test_new_subscriber_gets_current_status() {
    let remote = FakeRemote::new();
    let monitor = monitor_for(&remote);
    let (seen, listener) = recorder();

    let _subscription = monitor.subscribe(listener);

    assert_eq!(*seen.lock().unwrap(), vec![Checking]);
    assert_eq!(FakeRemote::count(&remote.health_checks), 0);
}

#[tokio::test(start_paused = true)]
async fn test_start_probes_immediately() {
    let remote = FakeRemote::new();
    let monitor = monitor_for(&remote);
    let (seen, listener) = recorder();
    let _subscription = monitor.subscribe(listener);

    monitor.start();
    sleep(Duration::from_millis(10)).await;

    assert_eq!(*seen.lock().unwrap(), vec![Checking, Connected]);
    assert_eq!(monitor.status(), Connected);
    assert_eq!(FakeRemote::count(&remote.health_checks), 1);

    // A late subscriber is told where things stand.
    let (late, listener) = recorder();
    let _late_subscription = monitor.subscribe(listener);
    assert_eq!(*late.lock().unwrap(), vec![Connected]);
}

#[tokio::test(start_paused = true)]
async fn test_probes_repeat_on_interval() {
    let remote = FakeRemote::new();
    let monitor = monitor_for(&remote);
    let (seen, listener) = recorder();
    let _subscription = monitor.subscribe(listener);

    monitor.start();
    sleep(Duration::from_secs(31)).await;

    assert_eq!(FakeRemote::count(&remote.health_checks), 2);
    assert_eq!(*seen.lock().unwrap(), vec![Checking, Connected, Checking, Connected]);
}

#[tokio::test(start_paused = true)]
async fn test_failure_means_disconnected() {
    let remote = FakeRemote::new();
    remote.set_failing(true);
    let monitor = monitor_for(&remote);

    monitor.start();
    sleep(Duration::from_millis(10)).await;
    assert_eq!(monitor.status(), Disconnected);

    remote.set_failing(false);
    sleep(Duration::from_secs(30)).await;
    assert_eq!(monitor.status(), Connected);
}

#[tokio::test(start_paused = true)]
async fn test_slow_health_check_times_out() {
    let remote = FakeRemote::new();
    remote.set_health_delay(Duration::from_secs(10));
    let monitor = monitor_for(&remote);

    monitor.start();
    sleep(Duration::from_secs(1)).await;
    assert_eq!(monitor.status(), Checking);

    sleep(Duration::from_secs(5)).await;
    assert_eq!(monitor.status(), Disconnected);
}

#[tokio::test(start_paused = true)]
async fn test_start_is_idempotent() {
    let remote = FakeRemote::new();
    let monitor = monitor_for(&remote);

    monitor.start();
    monitor.start();
    sleep(Duration::from_millis(10)).await;
    monitor.start();
    sleep(Duration::from_millis(10)).await;

    assert!(monitor.is_running());
    assert_eq!(FakeRemote::count(&remote.health_checks), 1);
}

#[tokio::test(start_paused = true)]
async fn test_stop_silences_listeners() {
    let remote = FakeRemote::new();
    let monitor = monitor_for(&remote);
    let (seen, listener) = recorder();
    let _subscription = monitor.subscribe(listener);

    monitor.start();
    sleep(Duration::from_millis(10)).await;
    monitor.stop();
    assert!(!monitor.is_running());

    remote.set_failing(true);
    sleep(Duration::from_secs(120)).await;
    monitor.check_now().await;

    assert_eq!(*seen.lock().unwrap(), vec![Checking, Connected]);
    assert_eq!(FakeRemote::count(&remote.health_checks), 2);
}

#[tokio::test(start_paused = true)]
async fn test_restart_after_stop() {
    let remote = FakeRemote::new();
    let monitor = monitor_for(&remote);

    monitor.start();
    sleep(Duration::from_millis(10)).await;
    monitor.stop();

    remote.set_failing(true);
    monitor.start();
    sleep(Duration::from_millis(10)).await;

    assert!(monitor.is_running());
    assert_eq!(monitor.status(), Disconnected);
}

#[tokio::test(start_paused = true)]
async fn test_unsubscribe() {
    let remote = FakeRemote::new();
    let monitor = monitor_for(&remote);
    let (seen, listener) = recorder();
    let (other, other_listener) = recorder();
    let subscription = monitor.subscribe(listener);
    let _other_subscription = monitor.subscribe(other_listener);
    assert_eq!(monitor.listener_count(), 2);

    subscription.unsubscribe();
    assert_eq!(monitor.listener_count(), 1);

    monitor.check_now().await;

    assert_eq!(*seen.lock().unwrap(), vec![Checking]);
    assert_eq!(*other.lock().unwrap(), vec![Checking, Connected]);
}

#[tokio::test]
async fn test_check_now_reports_status() {
    let remote = FakeRemote::new();
    let monitor = monitor_for(&remote);

    assert_eq!(monitor.check_now().await, Connected);

    remote.set_failing(true);
    assert_eq!(monitor.check_now().await, Disconnected);
    assert!(!monitor.is_running());
}

#[test]
fn test_status_display() {
    assert_eq!(Checking.to_string(), "checking");
    assert_eq!(Connected.to_string(), "connected");
    assert_eq!(Disconnected.to_string(), "disconnected");
}

#[tokio::test]
async fn test_check_now_after_stop_updates_status_quietly() {
    let remote = FakeRemote::new();
    let monitor = monitor_for(&remote);
    let (seen, listener) = recorder();
    let _subscription = monitor.subscribe(listener);

    monitor.stop();
    assert_eq!(monitor.check_now().await, Connected);

    assert_eq!(monitor.status(), Connected);
    assert_eq!(*seen.lock().unwrap(), vec![Checking]);
}

#[tokio::test]
async fn test_listener_stopping_monitor_silences_the_rest() {
    let remote = FakeRemote::new();
    let monitor = Arc::new(monitor_for(&remote));
    let weak = Arc::downgrade(&monitor);
    let _stopper = monitor.subscribe(move |status| {
        if status == Connected {
            if let Some(monitor) = weak.upgrade() {
                monitor.stop();
            }
        }
    });
    let (seen, listener) = recorder();
    let _subscription = monitor.subscribe(listener);

    monitor.check_now().await;

    assert_eq!(*seen.lock().unwrap(), vec![Checking]);
    assert_eq!(monitor.status(), Connected);
}
