use glam::Vec2;

/// Accumulates pointer movement made while the rotation modifier is held.
///
/// The last position is tracked on every move so that pressing the modifier
/// mid-motion does not produce a jump. The first move only sets the baseline.
#[derive(Debug, Clone, Default)]
pub struct MouseLook {
    last: Option<Vec2>,
    delta: Vec2,
}

impl MouseLook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_pointer(&mut self, x: f32, y: f32, modifier_held: bool) {
        let pos = Vec2::new(x, y);
        if modifier_held {
            if let Some(last) = self.last {
                self.delta += pos - last;
            }
        }
        self.last = Some(pos);
    }

    /// Delta accumulated since the last take.
    #[inline]
    pub fn pending(&self) -> Vec2 {
        self.delta
    }

    /// Returns the accumulated delta and resets it to zero.
    #[inline]
    pub fn take_delta(&mut self) -> Vec2 {
        std::mem::take(&mut self.delta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_move_sets_baseline_only() {
        let mut m = MouseLook::new();
        m.on_pointer(400.0, 300.0, true);
        assert_eq!(m.pending(), Vec2::ZERO);
    }

    #[test]
    fn accumulates_only_while_held() {
        let mut m = MouseLook::new();
        m.on_pointer(10.0, 10.0, false);
        m.on_pointer(20.0, 15.0, true);
        m.on_pointer(50.0, 15.0, false);
        m.on_pointer(55.0, 5.0, true);
        assert_eq!(m.pending(), Vec2::new(15.0, -5.0));
    }

    #[test]
    fn take_resets_to_zero() {
        let mut m = MouseLook::new();
        m.on_pointer(0.0, 0.0, true);
        m.on_pointer(3.0, 4.0, true);
        assert_eq!(m.take_delta(), Vec2::new(3.0, 4.0));
        assert_eq!(m.take_delta(), Vec2::ZERO);
    }
}
