// src/collect/pace.rs

use rand::Rng;
use std::time::Duration;
use tokio::time::sleep;

use crate::config::DelayRange;

/// Sequential iterator that sleeps a random duration from `delay` after each
/// item has been handed out, before the next one (or the end) is returned.
///
/// This is a politeness delay, not a rate limiter: there is no backoff and
/// items are never fetched concurrently.
pub struct Paced<I> {
    items: I,
    delay: DelayRange,
    yielded: bool,
}

impl<I: Iterator> Paced<I> {
    pub fn new(items: impl IntoIterator<IntoIter = I>, delay: DelayRange) -> Self {
        Self {
            items: items.into_iter(),
            delay,
            yielded: false,
        }
    }

    pub async fn next(&mut self) -> Option<I::Item> {
        if self.yielded {
            sleep(sample(&self.delay)).await;
        }
        let item = self.items.next();
        self.yielded = item.is_some();
        item
    }
}

/// Uniform draw from `[min, max]`.
pub fn sample(delay: &DelayRange) -> Duration {
    if delay.min >= delay.max {
        return delay.min;
    }
    let secs = rand::thread_rng().gen_range(delay.min.as_secs_f64()..=delay.max.as_secs_f64());
    Duration::from_secs_f64(secs)
}
