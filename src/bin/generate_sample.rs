//! Writes `sample_sensor.csv`: a week of 10-minute readings from a simulated
//! urban sensor, with a few corrupt cells so the cleaning step has work to do.

use anyhow::{Context, Result};
use chrono::{Duration, NaiveDate};

/// Daily temperature cycle plus noise.
fn temperature(minutes: f64, rng: &mut SimpleRng) -> f64 {
    let day_phase = (minutes / 1440.0) * 2.0 * std::f64::consts::PI;
    22.0 + 5.0 * (day_phase - std::f64::consts::FRAC_PI_2).sin() + rng.gauss(0.0, 0.4)
}

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let output_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "sample_sensor.csv".to_string());

    let start = NaiveDate::from_ymd_opt(2024, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .context("invalid start date")?;
    let readings = 7 * 24 * 6;

    let mut writer = csv::Writer::from_path(&output_path)
        .with_context(|| format!("creating {output_path}"))?;
    writer.write_record(["Time", "temperature", "humidity", "station"])?;

    let mut corrupt = 0;
    for i in 0..readings {
        let minutes = (i * 10) as f64;
        let time = start + Duration::minutes(i * 10);
        let temp = temperature(minutes, &mut rng);
        let humidity = (70.0 - 1.5 * (temp - 22.0) + rng.gauss(0.0, 2.0)).clamp(0.0, 100.0);

        // ~2% of rows get a broken timestamp or a non-numeric reading.
        let roll = rng.next_f64();
        let time_field = if roll < 0.01 {
            corrupt += 1;
            "ERR".to_string()
        } else {
            time.format("%Y-%m-%d %H:%M:%S").to_string()
        };
        let temp_field = if (0.01..0.02).contains(&roll) {
            corrupt += 1;
            String::new()
        } else {
            format!("{temp:.2}")
        };

        writer.write_record([
            time_field,
            temp_field,
            format!("{humidity:.1}"),
            "EAFIT-01".to_string(),
        ])?;
    }
    writer.flush()?;

    println!("Wrote {readings} readings ({corrupt} corrupt) to {output_path}");
    Ok(())
}
