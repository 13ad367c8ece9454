use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    thread,
    time::{Duration, Instant},
};

use log::info;

use super::{clock::TimeSource, DropScene};
use crate::{render::Renderer, utils::logging::warn_if_frame_budget_exceeded};

/// Display-synced driver: tick, render, wait for the next refresh, repeat
/// until the running flag is cleared.
pub struct FrameLoop {
    running: Arc<AtomicBool>,
    frame_budget: Option<Duration>,
    frame_limit: Option<u64>,
}

impl FrameLoop {
    /// Loop paced to `refresh_hz` frames per second. A rate whose period
    /// does not fit a `Duration`, or a non-positive one, runs unpaced.
    pub fn new(refresh_hz: f32) -> Self {
        let frame_budget = if refresh_hz > 0.0 {
            Duration::try_from_secs_f32(1.0 / refresh_hz).ok()
        } else {
            None
        };
        Self {
            running: Arc::new(AtomicBool::new(true)),
            frame_budget,
            frame_limit: None,
        }
    }

    /// Loop that never sleeps between frames; pair it with a manual clock.
    pub fn unpaced() -> Self {
        Self::new(0.0)
    }

    /// Stops on its own after `frames` frames.
    pub fn with_frame_limit(mut self, frames: u64) -> Self {
        self.frame_limit = Some(frames);
        self
    }

    /// Flag that ends the loop once set to `false`, from any thread.
    pub fn stop_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.running)
    }

    pub fn stop(&self) {
        self.running.store(false, Ordering::Release);
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Runs frames until stopped; returns how many frames were drawn.
    pub fn run<C, R>(&self, scene: &mut DropScene, clock: &mut C, renderer: &mut R) -> u64
    where
        C: TimeSource + ?Sized,
        R: Renderer + ?Sized,
    {
        info!("frame loop started with renderer {}", renderer.name());
        let mut frames = 0;

        while self.is_running() {
            let started = Instant::now();

            scene.frame(clock.elapsed(), renderer);
            frames += 1;

            if self.frame_limit.is_some_and(|limit| frames >= limit) {
                break;
            }

            if let Some(budget) = self.frame_budget {
                let spent = started.elapsed();
                if !warn_if_frame_budget_exceeded(spent, budget) {
                    thread::sleep(budget - spent);
                }
            }
        }

        info!("frame loop stopped after {frames} frames");
        frames
    }
}
