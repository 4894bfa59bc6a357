//! Rolling energy history for the plot panel.

use std::collections::VecDeque;

use egui_plot::PlotPoints;

/// Potential and kinetic energy over the last few seconds of frames.
pub struct EnergyTrace {
    t: VecDeque<f64>,
    potential: VecDeque<f64>,
    kinetic: VecDeque<f64>,
    capacity: usize,
}

impl EnergyTrace {
    pub fn new(seconds: f64, sample_dt: f64) -> Self {
        let capacity = (seconds / sample_dt).ceil() as usize + 1;
        Self {
            t: VecDeque::with_capacity(capacity),
            potential: VecDeque::with_capacity(capacity),
            kinetic: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, t: f64, potential: f64, kinetic: f64) {
        self.t.push_back(t);
        self.potential.push_back(potential);
        self.kinetic.push_back(kinetic);
        self.trim_to_capacity();
    }

    pub fn clear(&mut self) {
        self.t.clear();
        self.potential.clear();
        self.kinetic.clear();
    }

    pub fn latest_t(&self) -> Option<f64> {
        self.t.back().copied()
    }

    pub fn max_energy(&self) -> f64 {
        self.potential
            .iter()
            .chain(self.kinetic.iter())
            .copied()
            .fold(0.0, f64::max)
    }

    pub fn potential_line(&self) -> PlotPoints<'_> {
        Self::line(&self.potential, &self.t)
    }

    pub fn kinetic_line(&self) -> PlotPoints<'_> {
        Self::line(&self.kinetic, &self.t)
    }

    fn trim_to_capacity(&mut self) {
        let mut trim = |v: &mut VecDeque<f64>| {
            while v.len() > self.capacity {
                v.pop_front();
            }
        };
        trim(&mut self.t);
        trim(&mut self.potential);
        trim(&mut self.kinetic);
    }

    fn line<'a>(points: &'a VecDeque<f64>, t: &'a VecDeque<f64>) -> PlotPoints<'a> {
        PlotPoints::from_iter(
            t.iter()
                .copied()
                .zip(points.iter().copied())
                .map(|(x, y)| [x, y]),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn history_is_bounded_by_the_window() {
        let mut trace = EnergyTrace::new(1.0, 0.1); // 11 samples
        for i in 0..100 {
            trace.push(i as f64 * 0.1, 1.0, 2.0);
        }
        assert_eq!(trace.potential_line().points().len(), 11);
        assert_eq!(trace.latest_t(), Some(9.9));
    }

    #[test]
    fn max_energy_spans_both_series() {
        let mut trace = EnergyTrace::new(10.0, 1.0);
        trace.push(0.0, 3.0, 7.0);
        trace.push(1.0, 8.0, 1.0);
        assert_eq!(trace.max_energy(), 8.0);
    }
}
