use std::sync::Arc;

use log::debug;
use parking_lot::Mutex;
use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::{audio::AudioClip, collision::contact::CollisionEvent, config::IMPACT_SOUND_THRESHOLD};

/// Sound trigger shared by every body's collision listener.
pub type SharedSoundTrigger = Arc<Mutex<ImpactSoundTrigger>>;

/// Plays the hit sound for impacts faster than a threshold.
pub struct ImpactSoundTrigger {
    threshold: f32,
    clip: Box<dyn AudioClip>,
    rng: StdRng,
}

impl ImpactSoundTrigger {
    pub fn new(clip: impl AudioClip + 'static) -> Self {
        Self::with_rng(clip, StdRng::from_os_rng())
    }

    pub fn seeded(clip: impl AudioClip + 'static, seed: u64) -> Self {
        Self::with_rng(clip, StdRng::seed_from_u64(seed))
    }

    fn with_rng(clip: impl AudioClip + 'static, rng: StdRng) -> Self {
        Self {
            threshold: IMPACT_SOUND_THRESHOLD,
            clip: Box::new(clip),
            rng,
        }
    }

    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    pub fn into_shared(self) -> SharedSoundTrigger {
        Arc::new(Mutex::new(self))
    }

    /// Restarts the clip at a random volume when the impact speed strictly
    /// exceeds the threshold. Returns whether a sound was played.
    pub fn on_collide(&mut self, event: &CollisionEvent) -> bool {
        let impact = event.contact.impact_velocity_along_normal();
        if impact <= self.threshold {
            return false;
        }

        let volume: f32 = self.rng.random();
        self.clip.set_volume(volume);
        self.clip.rewind();
        self.clip.play();
        debug!("hit sound for body {} at {impact:.2} m/s, volume {volume:.2}", event.body);
        true
    }
}

/// Builds the collision listener a spawned body registers.
pub fn sound_listener(trigger: SharedSoundTrigger) -> impl FnMut(&CollisionEvent) + Send + 'static {
    move |event: &CollisionEvent| {
        trigger.lock().on_collide(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{audio::RecordingClip, collision::contact::ContactInfo, utils::allocator::EntityId};
    use glam::Vec3;

    fn impact(speed: f32) -> CollisionEvent {
        CollisionEvent {
            body: EntityId::new(1, 0),
            other: EntityId::new(0, 0),
            contact: ContactInfo::new(Vec3::ZERO, -Vec3::Y, 0.01, speed),
        }
    }

    #[test]
    fn threshold_is_exclusive() {
        let clip = RecordingClip::new();
        let mut trigger = ImpactSoundTrigger::seeded(clip.clone(), 1);

        assert!(!trigger.on_collide(&impact(1.5)));
        assert!(!trigger.on_collide(&impact(0.2)));
        assert_eq!(clip.play_count(), 0);

        assert!(trigger.on_collide(&impact(1.5001)));
        assert_eq!(clip.play_count(), 1);
    }

    #[test]
    fn every_play_restarts_from_the_beginning() {
        let clip = RecordingClip::new();
        let mut trigger = ImpactSoundTrigger::seeded(clip.clone(), 3);
        for _ in 0..4 {
            trigger.on_collide(&impact(6.0));
        }

        let plays = clip.plays();
        assert_eq!(plays.len(), 4);
        for play in plays {
            assert!(play.from_start);
            assert!((0.0..1.0).contains(&play.volume));
        }
    }

    #[test]
    fn shared_listener_drives_trigger() {
        let clip = RecordingClip::new();
        let shared = ImpactSoundTrigger::seeded(clip.clone(), 9).into_shared();
        let mut listener = sound_listener(Arc::clone(&shared));
        listener(&impact(4.0));
        listener(&impact(1.0));
        assert_eq!(clip.play_count(), 1);
        assert_eq!(shared.lock().threshold(), IMPACT_SOUND_THRESHOLD);
    }
}
