//! Waveform samples received from the push channel and their sparkline form

/// Glyph ramp used for inline sparklines, lowest to highest.
const SPARK_GLYPHS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// The last waveform received for a row, with its sample range.
#[derive(Debug, Clone, PartialEq)]
pub struct Waveform {
    samples: Vec<f64>,
    /// `(min, max)` over the finite samples; `None` if there are none
    range: Option<(f64, f64)>,
}

impl Waveform {
    pub fn new(samples: Vec<f64>) -> Self {
        let range = sample_range(&samples);
        Self { samples, range }
    }

    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    pub fn range(&self) -> Option<(f64, f64)> {
        self.range
    }

    pub fn is_empty(&self) -> bool {
        self.range.is_none()
    }

    /// Resample into `width` buckets and scale each bucket mean into
    /// `0..=max_level`, relative to the waveform's own min/max.
    ///
    /// A flat waveform maps to the middle level.
    pub fn levels(&self, width: usize, max_level: u64) -> Vec<u64> {
        let Some((min, max)) = self.range else {
            return Vec::new();
        };
        if width == 0 {
            return Vec::new();
        }

        let finite: Vec<f64> = self.samples.iter().copied().filter(|s| s.is_finite()).collect();
        let buckets = width.min(finite.len());
        let span = max - min;

        (0..buckets)
            .map(|b| {
                let start = b * finite.len() / buckets;
                let end = ((b + 1) * finite.len() / buckets).max(start + 1);
                let chunk = &finite[start..end];
                let mean = chunk.iter().sum::<f64>() / chunk.len() as f64;
                if span <= f64::EPSILON {
                    max_level / 2
                } else {
                    let scaled = (mean - min) / span * max_level as f64;
                    (scaled.round() as u64).min(max_level)
                }
            })
            .collect()
    }

    /// Inline sparkline string at most `width` glyphs wide.
    pub fn sparkline(&self, width: usize) -> String {
        let top = (SPARK_GLYPHS.len() - 1) as u64;
        self.levels(width, top)
            .into_iter()
            .map(|level| SPARK_GLYPHS[level as usize])
            .collect()
    }
}

/// Min and max over the finite samples.
pub fn sample_range(samples: &[f64]) -> Option<(f64, f64)> {
    samples
        .iter()
        .copied()
        .filter(|s| s.is_finite())
        .fold(None, |acc, s| match acc {
            None => Some((s, s)),
            Some((lo, hi)) => Some((lo.min(s), hi.max(s))),
        })
}
