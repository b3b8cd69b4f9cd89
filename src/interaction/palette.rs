//! Cyclic colour palette for spawn previews.
//!
//! A preview starts on the first palette entry. Deflecting the colour axis past
//! the threshold steps forward (positive) or backward (negative). Steps are
//! edge-triggered: holding the stick deflected produces one step, not one per
//! frame.

/// Fixed list of colours with wrap-around indexing
#[derive(Debug, Clone, PartialEq)]
pub struct ColorPalette {
    colors: Vec<[f32; 3]>,
}

impl ColorPalette {
    /// Build a palette. An empty list falls back to a single white entry.
    pub fn new(colors: Vec<[f32; 3]>) -> Self {
        if colors.is_empty() {
            log::warn!("empty colour palette, falling back to white");
            return Self {
                colors: vec![[1.0, 1.0, 1.0]],
            };
        }
        Self { colors }
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn color(&self, index: usize) -> [f32; 3] {
        self.colors[index % self.colors.len()]
    }

    /// Index one step forward, wrapping
    pub fn next_index(&self, index: usize) -> usize {
        (index + 1) % self.colors.len()
    }

    /// Index one step back, wrapping below zero
    pub fn previous_index(&self, index: usize) -> usize {
        let len = self.colors.len();
        (index % len + len - 1) % len
    }
}

/// Direction of a detected colour step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleStep {
    Advance,
    Retreat,
}

/// Detect a threshold crossing between two consecutive axis samples
pub fn detect_step(previous: f32, current: f32, threshold: f32) -> Option<CycleStep> {
    if current > threshold && previous <= threshold {
        Some(CycleStep::Advance)
    } else if current < -threshold && previous >= -threshold {
        Some(CycleStep::Retreat)
    } else {
        None
    }
}

/// Palette cursor owned by a spawn preview
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ColorCycler {
    pub index: usize,
}

impl ColorCycler {
    pub fn apply(&mut self, step: CycleStep, palette: &ColorPalette) {
        self.index = match step {
            CycleStep::Advance => palette.next_index(self.index),
            CycleStep::Retreat => palette.previous_index(self.index),
        };
    }

    /// Feed one frame of axis samples; returns the step taken, if any
    pub fn update(
        &mut self,
        previous: f32,
        current: f32,
        threshold: f32,
        palette: &ColorPalette,
    ) -> Option<CycleStep> {
        let step = detect_step(previous, current, threshold)?;
        self.apply(step, palette);
        Some(step)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rgb() -> ColorPalette {
        ColorPalette::new(vec![[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]])
    }

    #[test]
    fn test_six_advances_wrap_to_start() {
        let palette = rgb();
        let mut cycler = ColorCycler::default();
        for _ in 0..6 {
            cycler.apply(CycleStep::Advance, &palette);
        }
        assert_eq!(cycler.index, 0);
    }

    #[test]
    fn test_three_retreats_wrap_negative() {
        let palette = rgb();
        let mut cycler = ColorCycler::default();
        cycler.apply(CycleStep::Retreat, &palette);
        assert_eq!(cycler.index, 2);
        cycler.apply(CycleStep::Retreat, &palette);
        cycler.apply(CycleStep::Retreat, &palette);
        assert_eq!(cycler.index, 0);
    }

    #[test]
    fn test_held_deflection_steps_once() {
        let palette = rgb();
        let mut cycler = ColorCycler::default();
        let samples = [0.0, 0.9, 0.95, 1.0, 0.9];
        let steps = samples
            .windows(2)
            .filter_map(|w| cycler.update(w[0], w[1], 0.8, &palette))
            .count();
        assert_eq!(steps, 1);
        assert_eq!(cycler.index, 1);
    }

    #[test]
    fn test_release_and_redeflect_steps_again() {
        let palette = rgb();
        let mut cycler = ColorCycler::default();
        let samples = [0.0, -0.9, 0.0, -0.9];
        for w in samples.windows(2) {
            cycler.update(w[0], w[1], 0.8, &palette);
        }
        assert_eq!(cycler.index, 1);
    }

    #[test]
    fn test_swing_through_zero_is_two_crossings() {
        assert_eq!(detect_step(-0.9, 0.9, 0.8), Some(CycleStep::Advance));
        assert_eq!(detect_step(0.9, -0.9, 0.8), Some(CycleStep::Retreat));
        assert_eq!(detect_step(0.5, 0.7, 0.8), None);
    }

    #[test]
    fn test_empty_palette_falls_back() {
        let palette = ColorPalette::new(Vec::new());
        assert_eq!(palette.len(), 1);
        assert_eq!(palette.next_index(0), 0);
        assert_eq!(palette.previous_index(0), 0);
    }
}
