//! Linear and band scales matching the d3 conventions the charts were
//! designed around, including d3's "nice" tick selection.

/// sqrt(50), sqrt(10), and sqrt(2): the error cutoffs d3 uses to pick
/// tick steps of 10, 5, or 2 times a power of ten.
const E10: f64 = 7.071_067_811_865_476;
const E5: f64 = 3.162_277_660_168_379_5;
const E2: f64 = 1.414_213_562_373_095_1;

/// Maps a continuous domain onto a pixel range. The range may be
/// inverted (`[height, 0]`) for y axes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain: [f64; 2],
    range: [f64; 2],
}

impl LinearScale {
    #[must_use]
    pub const fn new(domain: [f64; 2], range: [f64; 2]) -> Self {
        Self { domain, range }
    }

    /// Pixel position of a domain value. A zero-span domain maps
    /// everything to the middle of the range.
    #[must_use]
    pub fn position(&self, value: f64) -> f64 {
        let [d0, d1] = self.domain;
        let [r0, r1] = self.range;
        let span = d1 - d0;
        if !span.is_finite() || span.abs() < f64::EPSILON {
            return (r0 + r1) / 2.0;
        }
        r0 + (value - d0) / span * (r1 - r0)
    }

    /// Nice tick values covering the domain.
    #[must_use]
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        tick_values(self.domain[0], self.domain[1], count)
    }
}

/// Evenly spaced bands over a pixel range with inner and outer padding,
/// centered the way `d3.scaleBand` lays them out.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandScale {
    len: usize,
    range: [f64; 2],
    padding: f64,
}

impl BandScale {
    #[must_use]
    pub const fn new(len: usize, range: [f64; 2], padding: f64) -> Self {
        Self {
            len,
            range,
            padding,
        }
    }

    /// Distance between the starts of adjacent bands.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn step(&self) -> f64 {
        let span = self.range[1] - self.range[0];
        span / (self.len as f64 + self.padding).max(1.0)
    }

    /// Width of one band.
    #[must_use]
    pub fn bandwidth(&self) -> f64 {
        self.step() * (1.0 - self.padding)
    }

    /// Pixel position of the start of band `index`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn position(&self, index: usize) -> f64 {
        let span = self.range[1] - self.range[0];
        let step = self.step();
        let start =
            self.range[0] + (span - step * (self.len as f64 - self.padding)) / 2.0;
        start + step * index as f64
    }

    /// Pixel position of the center of band `index`.
    #[must_use]
    pub fn center(&self, index: usize) -> f64 {
        self.position(index) + self.bandwidth() / 2.0
    }
}

/// Nice round tick values covering `[start, stop]`, the d3 algorithm:
/// the step is 1, 2, 5, or 10 times a power of ten, chosen so roughly
/// `count` ticks fit.
#[must_use]
pub fn tick_values(start: f64, stop: f64, count: usize) -> Vec<f64> {
    if count == 0 || !start.is_finite() || !stop.is_finite() {
        return Vec::new();
    }
    if stop - start < f64::EPSILON {
        return vec![start];
    }

    let step = tick_increment(start, stop, count);
    if !step.is_finite() || step.abs() < f64::MIN_POSITIVE {
        return vec![start];
    }

    let mut values = Vec::new();
    if step > 0.0 {
        let first = (start / step).ceil();
        let last = (stop / step).floor();
        let mut tick = first;
        while tick <= last {
            values.push(tick * step);
            tick += 1.0;
        }
    } else {
        // Negative increments encode reciprocals of small steps, which
        // keeps sub-1.0 ticks free of floating drift.
        let inverse = -step;
        let first = (start * inverse).ceil();
        let last = (stop * inverse).floor();
        let mut tick = first;
        while tick <= last {
            values.push(tick / inverse);
            tick += 1.0;
        }
    }
    values
}

fn tick_increment(start: f64, stop: f64, count: usize) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    let step = (stop - start) / (count.max(1) as f64);
    let power = step.log10().floor();
    let error = step / 10f64.powf(power);
    let factor = if error >= E10 {
        10.0
    } else if error >= E5 {
        5.0
    } else if error >= E2 {
        2.0
    } else {
        1.0
    };
    if power >= 0.0 {
        factor * 10f64.powf(power)
    } else {
        -(10f64.powf(-power)) / factor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_scale_maps_and_inverts() {
        let scale = LinearScale::new([0.0, 100.0], [200.0, 0.0]);
        assert!((scale.position(0.0) - 200.0).abs() < 1e-9);
        assert!((scale.position(100.0)).abs() < 1e-9);
        assert!((scale.position(25.0) - 150.0).abs() < 1e-9);
    }

    #[test]
    fn zero_span_domain_maps_to_the_range_middle() {
        let scale = LinearScale::new([5.0, 5.0], [0.0, 300.0]);
        assert!((scale.position(5.0) - 150.0).abs() < 1e-9);
        assert!((scale.position(99.0) - 150.0).abs() < 1e-9);
    }

    #[test]
    fn ticks_pick_round_steps() {
        let scale = LinearScale::new([0.0, 85_596.2], [200.0, 0.0]);
        assert_eq!(
            scale.ticks(5),
            vec![0.0, 20_000.0, 40_000.0, 60_000.0, 80_000.0]
        );

        let tight = LinearScale::new([0.0, 1.0], [0.0, 100.0]);
        assert_eq!(tight.ticks(5), vec![0.0, 0.2, 0.4, 0.6, 0.8, 1.0]);
    }

    #[test]
    fn degenerate_tick_requests_return_the_start() {
        assert_eq!(tick_values(0.0, 0.0, 5), vec![0.0]);
        assert!(tick_values(0.0, 10.0, 0).is_empty());
    }

    #[test]
    fn band_scale_matches_the_d3_layout() {
        // Four bands over 320px with padding 0.3: step 320/4.3,
        // bandwidth step * 0.7, outer gap centering the run.
        let scale = BandScale::new(4, [0.0, 320.0], 0.3);
        let step = 320.0 / 4.3;
        assert!((scale.step() - step).abs() < 1e-9);
        assert!((scale.bandwidth() - step * 0.7).abs() < 1e-9);

        let start = (320.0 - step * 3.7) / 2.0;
        assert!((scale.position(0) - start).abs() < 1e-9);
        assert!((scale.position(1) - (start + step)).abs() < 1e-9);
        assert!((scale.center(0) - (start + step * 0.35)).abs() < 1e-9);
    }
}
