// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Bookkeeping for the cooperative countdown.
///
/// At most one tick loop is current at a time. Stopping bumps the generation
/// counter; a tick task must re-check its generation under the session lock
/// before every side effect, so a stale loop can never decrement, publish,
/// or advance after it has been replaced. The abort on the old handle is
/// only a cleanup; the generation check is what guarantees the single-winner
/// race.
pub struct Countdown {
    generation: u64,
    remaining_tx: watch::Sender<u32>,
    handle: Option<JoinHandle<()>>,
}

impl Countdown {
    pub fn new() -> (Self, watch::Receiver<u32>) {
        let (remaining_tx, remaining_rx) = watch::channel(0);
        let countdown = Self {
            generation: 0,
            remaining_tx,
            handle: None,
        };
        (countdown, remaining_rx)
    }

    /// Cancel whatever loop is running. Returns the generation a replacement
    /// loop must carry.
    pub fn stop(&mut self) -> u64 {
        self.generation += 1;
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
        self.generation
    }

    pub fn is_current(&self, generation: u64) -> bool {
        self.generation == generation
    }

    pub fn publish(&self, remaining: u32) {
        self.remaining_tx.send_replace(remaining);
    }

    pub fn set_handle(&mut self, handle: JoinHandle<()>) {
        self.handle = Some(handle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_stop_invalidates_prior_generation() {
        let (mut countdown, rx) = Countdown::new();
        let first = countdown.stop();
        assert!(countdown.is_current(first));
        let second = countdown.stop();
        assert!(!countdown.is_current(first));
        assert!(countdown.is_current(second));
        countdown.publish(7);
        assert_eq!(*rx.borrow(), 7);
    }
}
