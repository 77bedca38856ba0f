use crate::frame::ColorMultiplier;

/// What happens to a channel once it climbs past 1.0.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum WrapPolicy {
    /// Snap to exactly 0.0, discarding the overflow (visible discontinuity).
    #[default]
    Reset,
    /// Keep the overflow: value becomes `value - 1.0`.
    Remainder,
}

/// Sawtooth color animation configuration.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ColorConfig {
    /// Per-second increase of the r, g and b channels.
    pub rates: [f32; 3],
    pub wrap: WrapPolicy,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            rates: [0.05, 0.09, 0.03],
            wrap: WrapPolicy::Reset,
        }
    }
}

/// Animated color multiplier. Alpha stays at its initial value.
#[derive(Debug, Clone)]
pub struct ColorAnimator {
    config: ColorConfig,
    value: [f32; 4],
}

impl ColorAnimator {
    pub fn new(config: ColorConfig) -> Self {
        Self { config, value: [0.0; 4] }
    }

    pub fn value(&self) -> ColorMultiplier {
        ColorMultiplier { value: self.value }
    }

    /// Advances every channel by `rate × dt`, wrapping channels that exceed 1.0.
    pub fn advance(&mut self, dt: f32) -> ColorMultiplier {
        for (channel, rate) in self.value.iter_mut().zip(self.config.rates) {
            *channel += rate * dt;
            if *channel > 1.0 {
                *channel = match self.config.wrap {
                    WrapPolicy::Reset => 0.0,
                    WrapPolicy::Remainder => channel.fract(),
                };
            }
        }
        self.value()
    }
}
