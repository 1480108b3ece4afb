use std::fs::File;

use anyhow::{Context, Result};
use chrono::{Duration, NaiveDate, Timelike};
use flate2::write::GzEncoder;
use flate2::Compression;

/// Pickup hot spots: (lat, lon, spread in degrees, weight).
const HOT_SPOTS: &[(f64, f64, f64, f64)] = &[
    (40.7580, -73.9855, 0.012, 0.35), // Midtown
    (40.7128, -74.0060, 0.010, 0.20), // Financial District
    (40.6413, -73.7781, 0.006, 0.10), // JFK
    (40.7769, -73.8740, 0.005, 0.08), // LaGuardia
    (40.6782, -73.9442, 0.025, 0.17), // Brooklyn
    (40.7282, -73.7949, 0.030, 0.10), // Queens
];

const BASES: &[(&str, f64)] = &[
    ("B02512", 0.05),
    ("B02598", 0.25),
    ("B02617", 0.35),
    ("B02682", 0.30),
    ("B02764", 0.05),
];

/// Relative pickup volume per hour of day, loosely shaped like weekday demand.
const HOURLY_WEIGHT: [f64; 24] = [
    3.0, 2.0, 1.5, 1.5, 1.5, 2.0, 3.5, 5.0, 5.5, 4.5, 4.0, 4.0,
    4.5, 4.5, 5.0, 5.5, 6.0, 7.0, 7.5, 7.0, 6.5, 6.0, 5.5, 4.5,
];

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
        let result = (self.state[1].wrapping_mul(5)).rotate_left(7).wrapping_mul(9);
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

    /// Index drawn proportionally to `weights`.
    fn weighted(&mut self, weights: impl Iterator<Item = f64> + Clone) -> usize {
        let total: f64 = weights.clone().sum();
        let mut pick = self.next_f64() * total;
        let mut last = 0;
        for (i, w) in weights.enumerate() {
            if pick < w {
                return i;
            }
            pick -= w;
            last = i;
        }
        last
    }
}

fn main() -> Result<()> {
    let rows: usize = std::env::args()
        .nth(1)
        .map(|s| s.parse::<usize>())
        .transpose()
        .context("row count must be a non-negative integer")?
        .unwrap_or(200_000);
    let output_path = "pickups.csv.gz";

    let mut rng = SimpleRng::new(42);
    let month_start = NaiveDate::from_ymd_opt(2014, 9, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .context("invalid month start")?;

    // Draw then sort so the file is in time order like the upstream export.
    let mut pickups = Vec::with_capacity(rows);
    for _ in 0..rows {
        let day = (rng.next_f64() * 30.0) as i64;
        let hour = rng.weighted(HOURLY_WEIGHT.iter().copied()) as i64;
        let second = (rng.next_f64() * 3600.0) as i64;
        let ts = month_start + Duration::days(day) + Duration::hours(hour) + Duration::seconds(second);

        let (lat, lon, spread, _) = HOT_SPOTS[rng.weighted(HOT_SPOTS.iter().map(|h| h.3))];
        let base = BASES[rng.weighted(BASES.iter().map(|b| b.1))].0;
        pickups.push((ts, rng.gauss(lat, spread), rng.gauss(lon, spread), base));
    }
    pickups.sort_by_key(|p| p.0);

    let file = File::create(output_path).context("creating output file")?;
    let mut writer = csv::Writer::from_writer(GzEncoder::new(file, Compression::default()));
    writer.write_record(["Date/Time", "Lat", "Lon", "Base"])?;
    for (ts, lat, lon, base) in &pickups {
        // Upstream layout: 9/1/2014 0:01:00 (no zero padding on month, day, hour).
        let stamp = format!("{} {}:{:02}:00", ts.format("%-m/%-d/%Y"), ts.hour(), ts.minute());
        writer.write_record([stamp, format!("{lat:.4}"), format!("{lon:.4}"), base.to_string()])?;
    }
    writer.flush().context("flushing CSV")?;
    writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("flushing CSV: {}", e.error()))?
        .finish()
        .context("finishing gzip stream")?;

    println!("Wrote {rows} pickups to {output_path}");
    Ok(())
}
