use crate::generator::template::shift_wave;
use anyhow::Context;
use chrono::{Duration, NaiveDateTime};
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use spillcore::ingest::columns::HEADER;

const TIMESTAMP_LAYOUT: &str = "%Y-%m-%d %H:%M:%S";

/// Configuration for a synthetic detector export.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub rows: usize,
    pub seed: u64,
    /// First detection, `%Y-%m-%d %H:%M:%S`.
    pub start: String,
    pub interval_secs: i64,
    /// Every n-th row carries a corrupt wastage cell; 0 disables.
    pub invalid_every: usize,
    /// Wastage is written as a fraction (0..1) instead of a percentage.
    pub fractional: bool,
    pub noise: f64,
    pub alert_threshold: f64,
    pub period: usize,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            rows: 2000,
            seed: 0,
            start: "2024-03-01 06:00:00".into(),
            interval_secs: 15,
            invalid_every: 0,
            fractional: false,
            noise: 4.0,
            alert_threshold: 30.0,
            period: 480,
        }
    }
}

/// Writes a seeded CSV export with the detector's header layout.
pub fn build_spillage_csv(config: &GeneratorConfig) -> anyhow::Result<String> {
    let start = NaiveDateTime::parse_from_str(&config.start, TIMESTAMP_LAYOUT)
        .with_context(|| format!("parsing generator start time '{}'", config.start))?;
    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(HEADER).context("writing header")?;

    for row in 0..config.rows {
        let offset = i64::try_from(row)
            .ok()
            .and_then(|r| r.checked_mul(config.interval_secs))
            .context("overflow computing detection offset")?;
        let detected_at = start + Duration::seconds(offset);

        let jitter = if config.noise > 0.0 {
            rng.gen_range(-config.noise..config.noise)
        } else {
            0.0
        };
        let wastage = (5.0 + 35.0 * shift_wave(row, config.period) + jitter).clamp(0.0, 100.0);
        let detection_secs = 2.0 + rng.gen_range(0.0..18.0) * (wastage / 40.0 + 0.25);
        let alert = if wastage >= config.alert_threshold {
            "Alert"
        } else {
            "Normal"
        };

        let corrupt =
            config.invalid_every > 0 && row % config.invalid_every == config.invalid_every - 1;
        let wastage_cell = if corrupt {
            "N/A".to_string()
        } else if config.fractional {
            format!("{:.4}", wastage / 100.0)
        } else {
            format!("{wastage:.2}")
        };

        writer
            .write_record([
                detected_at.format(TIMESTAMP_LAYOUT).to_string(),
                wastage_cell,
                format!("{detection_secs:.2}"),
                alert.to_string(),
            ])
            .with_context(|| format!("writing row {row}"))?;
    }

    let bytes = writer.into_inner().context("flushing csv writer")?;
    String::from_utf8(bytes).context("generated csv is not utf-8")
}
