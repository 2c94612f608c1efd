//! A complete synthesizer session.
//!
//! [`Synth`] wires the store, an automation engine, the preset manager and
//! the animation clock together, and runs the per-frame sequence:
//!
//! 1. read animation time from the clock,
//! 2. advance automation to that time (in seconds),
//! 3. build the frame's shader uniforms from the store.

use std::rc::Rc;

use wavewarp_core::dance;
use wavewarp_core::{
    AnimationClock, Automation, Joystick, LfoEngine, ParameterCatalog, ParameterStore,
    PresetCatalog, PresetManager, SmoothedLfoEngine, UniformSet,
};

use crate::config::{AutomationKind, ConfigError, Result, SynthConfig};

/// Default joystick pad size in pixels.
const JOYSTICK_SIZE: f64 = 120.0;

/// One running synthesizer.
pub struct Synth {
    store: Rc<ParameterStore>,
    automation: Rc<dyn Automation>,
    presets: PresetManager<dyn Automation>,
    clock: AnimationClock,
    joystick: Joystick,
}

impl Synth {
    /// A session with the default configuration.
    ///
    /// Dance parameters start synced to the default levels.
    pub fn new() -> Self {
        let store = Rc::new(ParameterStore::standard());
        dance::sync(&store);
        let automation: Rc<dyn Automation> = Rc::new(LfoEngine::new(Rc::clone(&store)));
        let presets = PresetManager::new(Rc::clone(&automation), PresetCatalog::builtin());

        Self {
            store,
            automation,
            presets,
            clock: AnimationClock::new(),
            joystick: Joystick::new(JOYSTICK_SIZE, JOYSTICK_SIZE),
        }
    }

    /// Build a session from a config.
    ///
    /// Initial values are applied on top of the standard start-up values and
    /// the dance parameters are synced to the resulting levels. Extra presets
    /// are appended to the built-in catalog, and the startup preset is
    /// applied last.
    pub fn from_config(config: &SynthConfig) -> Result<Self> {
        config.validate(&ParameterCatalog::standard())?;

        let catalog = match &config.presets {
            Some(text) => {
                let extra = PresetCatalog::from_toml_str(text, &ParameterCatalog::standard())?;
                PresetCatalog::builtin().merged(&extra)?
            }
            None => PresetCatalog::builtin(),
        };
        if !catalog.has(&config.preset) {
            return Err(ConfigError::UnknownPreset(config.preset.clone()));
        }

        let store = Rc::new(
            ParameterStore::standard().with_notify_depth_limit(config.notify_depth_limit),
        );
        store.set_multiple(config.initial.iter().map(|(k, v)| (k.as_str(), *v)));
        dance::sync(&store);

        let automation: Rc<dyn Automation> = match config.automation {
            AutomationKind::Stateless => Rc::new(LfoEngine::new(Rc::clone(&store))),
            AutomationKind::Smoothed => Rc::new(SmoothedLfoEngine::with_tunables(
                Rc::clone(&store),
                config.smoothing.tunables()?,
            )),
        };

        let mut presets = PresetManager::new(Rc::clone(&automation), catalog);
        presets.apply(&config.preset);

        log::debug!(
            "Synth ready: {:?} automation, preset \"{}\"",
            config.automation,
            config.preset
        );

        Ok(Self {
            store,
            automation,
            presets,
            clock: AnimationClock::new(),
            joystick: Joystick::new(JOYSTICK_SIZE, JOYSTICK_SIZE),
        })
    }

    /// Parse a TOML config and build a session from it.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Self::from_config(&SynthConfig::from_toml_str(text)?)
    }

    // === Frame loop ===

    /// Run one frame at host time `now_ms` for a `width × height` canvas.
    pub fn frame(&self, now_ms: f64, width: f64, height: f64) -> UniformSet {
        let time_ms = self.clock.elapsed_ms(now_ms);
        self.automation.update(time_ms / 1000.0);
        UniformSet::from_store(&self.store, width, height, time_ms)
    }

    /// Pause or resume animation. Returns whether it is now paused.
    ///
    /// Resuming re-syncs the dance parameters so level changes made while
    /// frozen take effect.
    pub fn toggle_pause(&mut self, now_ms: f64) -> bool {
        let paused = self.clock.toggle(now_ms);
        if !paused {
            dance::sync(&self.store);
        }
        paused
    }

    /// Whether animation is paused.
    pub fn is_paused(&self) -> bool {
        self.clock.is_paused()
    }

    /// Animation time in seconds at host time `now_ms`.
    pub fn elapsed_seconds(&self, now_ms: f64) -> f64 {
        self.clock.elapsed_seconds(now_ms)
    }

    // === Components ===

    /// The parameter store.
    pub fn store(&self) -> &Rc<ParameterStore> {
        &self.store
    }

    /// The automation engine.
    pub fn automation(&self) -> &Rc<dyn Automation> {
        &self.automation
    }

    /// The preset manager.
    pub fn presets(&self) -> &PresetManager<dyn Automation> {
        &self.presets
    }

    /// The eye-position joystick mapping.
    pub fn joystick(&self) -> &Joystick {
        &self.joystick
    }

    /// Mutable access to the joystick, e.g. to resize it.
    pub fn joystick_mut(&mut self) -> &mut Joystick {
        &mut self.joystick
    }

    // === UI actions ===

    /// Apply a preset by name. Returns `false` if it does not exist.
    pub fn apply_preset(&mut self, name: &str) -> bool {
        self.presets.apply(name)
    }

    /// Step the speed level. Returns the new level.
    pub fn change_speed(&self, delta: i64) -> i64 {
        dance::change_speed(&self.store, delta)
    }

    /// Step the intensity level. Returns the new level.
    pub fn change_intensity(&self, delta: i64) -> i64 {
        dance::change_intensity(&self.store, delta)
    }
}

impl Default for Synth {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Synth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Synth")
            .field("preset", &self.presets.get_current())
            .field("automated", &self.automation.is_active())
            .field("clock", &self.clock)
            .finish()
    }
}
