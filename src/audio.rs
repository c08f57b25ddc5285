//! Audio engine boundary.
//!
//! The core never decodes or mixes audio. It keeps the bookkeeping the
//! host mixer needs: which sounds are playing and which artboard instance
//! started them. Completion callbacks may arrive on any thread, so the
//! engine guards a completed list with a lock and drains it on the next
//! interaction from the core thread.

use std::sync::Arc;

use parking_lot::Mutex;
use slotmap::SlotMap;

/// A decoded audio asset handed back by the file-asset loader.
#[derive(Debug, Clone)]
pub struct AudioSource {
    pub name: String,
    pub bytes: Arc<[u8]>,
}

slotmap::new_key_type! {
    /// Handle of a playing sound.
    pub struct SoundKey;
}

struct PlayingSound {
    owner: u32,
    #[allow(dead_code)]
    source: Arc<AudioSource>,
}

#[derive(Default)]
struct EngineState {
    sounds: SlotMap<SoundKey, PlayingSound>,
    completed: Vec<SoundKey>,
}

impl EngineState {
    fn drain_completed(&mut self) {
        for key in self.completed.drain(..) {
            self.sounds.remove(key);
        }
    }
}

/// Shared sound bookkeeping for one or more artboard instances.
#[derive(Default)]
pub struct AudioEngine {
    state: Mutex<EngineState>,
}

impl AudioEngine {
    #[must_use]
    pub fn new() -> Arc<AudioEngine> {
        Arc::new(AudioEngine::default())
    }

    /// Registers a sound started by the artboard instance `owner`.
    pub fn play(&self, source: Arc<AudioSource>, owner: u32) -> SoundKey {
        let mut state = self.state.lock();
        state.drain_completed();
        state.sounds.insert(PlayingSound { owner, source })
    }

    /// Marks a sound finished. Safe to call from the mixer's own threads.
    pub fn sound_completed(&self, key: SoundKey) {
        self.state.lock().completed.push(key);
    }

    /// Number of sounds still playing, after draining completions.
    #[must_use]
    pub fn playing_sound_count(&self) -> usize {
        let mut state = self.state.lock();
        state.drain_completed();
        state.sounds.len()
    }

    /// Drains completions; called once per artboard advance.
    pub(crate) fn update(&self) {
        self.state.lock().drain_completed();
    }

    /// Stops every sound owned by a dropped artboard instance.
    pub(crate) fn stop_owned(&self, owner: u32) {
        let mut state = self.state.lock();
        state.drain_completed();
        state.sounds.retain(|_, sound| sound.owner != owner);
    }
}
