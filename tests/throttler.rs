//! Ordering and spacing tests for the minimum-interval throttler.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::time::{sleep, Instant};

use throttle_drain::MinimumIntervalThrottler;

type Order = Arc<Mutex<Vec<&'static str>>>;

fn record(order: &Order, label: &'static str) {
    order.lock().unwrap().push(label);
}

#[tokio::test(start_paused = true)]
async fn fifo() {
    let throttler = Arc::new(MinimumIntervalThrottler::new(Duration::from_millis(1)));
    let order: Order = Arc::default();
    let gate = Arc::new(tokio::sync::Mutex::new(()));
    let held = Arc::clone(&gate).lock_owned().await;

    // This should run last.
    let job1 = tokio::spawn({
        let (throttler, order) = (Arc::clone(&throttler), Arc::clone(&order));
        async move {
            sleep(Duration::from_millis(200)).await;
            throttler.on_ready(move || async move { record(&order, "job1") }).await
        }
    });

    // This should run second.
    let job2 = tokio::spawn({
        let (throttler, order) = (Arc::clone(&throttler), Arc::clone(&order));
        async move {
            sleep(Duration::from_millis(100)).await;
            throttler.on_ready(move || async move { record(&order, "job2") }).await
        }
    });

    // This reaches on_ready first, then gets stuck on the gate.
    let job3 = tokio::spawn({
        let throttler = Arc::clone(&throttler);
        let order = Arc::clone(&order);
        let gate = Arc::clone(&gate);
        async move {
            throttler
                .on_ready(move || async move {
                    let _gate = gate.lock().await;
                    record(&order, "job3");
                })
                .await
        }
    });

    // job1 and job2 are now queued behind job3, which waits on the gate.
    sleep(Duration::from_secs(1)).await;
    assert!(order.lock().unwrap().is_empty());

    drop(held);
    job1.await.unwrap();
    job2.await.unwrap();
    job3.await.unwrap();

    assert_eq!(*order.lock().unwrap(), ["job3", "job2", "job1"]);
}

#[tokio::test(start_paused = true)]
async fn cancelled_waiter_keeps_remaining_order() {
    let throttler = Arc::new(MinimumIntervalThrottler::new(Duration::from_millis(10)));
    let order: Order = Arc::default();
    let (release_tx, release_rx) = oneshot::channel::<()>();

    let holder = tokio::spawn({
        let throttler = Arc::clone(&throttler);
        async move {
            throttler
                .on_ready(move || async move {
                    let _ = release_rx.await;
                })
                .await
        }
    });
    sleep(Duration::from_millis(1)).await;

    let b_ran = Arc::new(AtomicBool::new(false));
    let mut waiters = Vec::new();
    for label in ["a", "b", "c"] {
        let throttler = Arc::clone(&throttler);
        let order = Arc::clone(&order);
        let b_ran = Arc::clone(&b_ran);
        waiters.push(tokio::spawn(async move {
            throttler
                .on_ready(move || async move {
                    if label == "b" {
                        b_ran.store(true, Ordering::SeqCst);
                    }
                    record(&order, label);
                })
                .await
        }));
        sleep(Duration::from_millis(1)).await;
    }

    waiters[1].abort();
    sleep(Duration::from_millis(1)).await;
    release_tx.send(()).unwrap();

    holder.await.unwrap();
    let mut waiters = waiters.into_iter();
    let a = waiters.next().unwrap();
    let b = waiters.next().unwrap();
    let c = waiters.next().unwrap();
    a.await.unwrap();
    assert!(b.await.unwrap_err().is_cancelled());
    c.await.unwrap();

    assert_eq!(*order.lock().unwrap(), ["a", "c"]);
    assert!(!b_ran.load(Ordering::SeqCst));
}

#[tokio::test(start_paused = true)]
async fn concurrent_callers_never_overlap_and_stay_spaced() {
    let interval = Duration::from_millis(100);
    let throttler = Arc::new(MinimumIntervalThrottler::new(interval));
    let running = Arc::new(AtomicUsize::new(0));
    let max_running = Arc::new(AtomicUsize::new(0));
    let starts = Arc::new(Mutex::new(Vec::new()));

    let mut tasks = Vec::new();
    for _ in 0..8 {
        let (throttler, running, max_running, starts) = (
            Arc::clone(&throttler),
            Arc::clone(&running),
            Arc::clone(&max_running),
            Arc::clone(&starts),
        );
        tasks.push(tokio::spawn(async move {
            throttler
                .on_ready(move || async move {
                    starts.lock().unwrap().push(Instant::now());
                    let now_running = running.fetch_add(1, Ordering::SeqCst) + 1;
                    max_running.fetch_max(now_running, Ordering::SeqCst);
                    sleep(Duration::from_millis(30)).await;
                    running.fetch_sub(1, Ordering::SeqCst);
                })
                .await
        }));
    }
    for task in tasks {
        task.await.unwrap();
    }

    assert_eq!(max_running.load(Ordering::SeqCst), 1);
    let starts = starts.lock().unwrap();
    assert_eq!(starts.len(), 8);
    for pair in starts.windows(2) {
        assert!(pair[1] - pair[0] >= interval);
    }
}

#[tokio::test(start_paused = true)]
async fn simultaneous_arrivals_run_in_registration_order() {
    let throttler = Arc::new(MinimumIntervalThrottler::new(Duration::ZERO));
    let order = Arc::new(Mutex::new(Vec::new()));
    let (release_tx, release_rx) = oneshot::channel::<()>();

    let holder = tokio::spawn({
        let throttler = Arc::clone(&throttler);
        async move {
            throttler
                .on_ready(move || async move {
                    let _ = release_rx.await;
                })
                .await
        }
    });
    tokio::task::yield_now().await;

    let tasks: Vec<_> = (0..5)
        .map(|i| {
            let (throttler, order) = (Arc::clone(&throttler), Arc::clone(&order));
            tokio::spawn(async move {
                throttler
                    .on_ready(move || async move { order.lock().unwrap().push(i) })
                    .await
            })
        })
        .collect();
    tokio::task::yield_now().await;

    release_tx.send(()).unwrap();
    holder.await.unwrap();
    for task in tasks {
        task.await.unwrap();
    }

    assert_eq!(*order.lock().unwrap(), [0, 1, 2, 3, 4]);
}

#[tokio::test(start_paused = true)]
async fn failing_action_does_not_block_queue() {
    let throttler = Arc::new(MinimumIntervalThrottler::new(Duration::from_millis(50)));

    let failed = tokio::spawn({
        let throttler = Arc::clone(&throttler);
        async move {
            throttler
                .on_ready(|| async { Err::<u32, String>("action failed".into()) })
                .await
        }
    });
    let succeeded = tokio::spawn({
        let throttler = Arc::clone(&throttler);
        async move { throttler.on_ready(|| async { Ok::<u32, String>(42) }).await }
    });

    assert_eq!(failed.await.unwrap(), Err("action failed".to_string()));
    assert_eq!(succeeded.await.unwrap(), Ok(42));
}
