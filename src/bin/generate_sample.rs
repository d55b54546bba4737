use std::path::Path;

use anyhow::{Context, Result};
use chrono::{Duration, NaiveDate, NaiveDateTime};

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

    fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }
}

fn ts(date: NaiveDate, hour: u32, minute: u32) -> String {
    NaiveDateTime::new(date, chrono::NaiveTime::from_hms_opt(hour, minute, 0).unwrap())
        .format("%Y-%m-%d %H:%M:%S")
        .to_string()
}

fn write_csv(dir: &Path, name: &str, header: &[&str], rows: &[Vec<String>]) -> Result<()> {
    let path = dir.join(name);
    let mut writer = csv::Writer::from_path(&path)
        .with_context(|| format!("creating {}", path.display()))?;
    writer.write_record(header)?;
    for row in rows {
        writer.write_record(row)?;
    }
    writer.flush()?;
    println!("wrote {} ({} rows)", path.display(), rows.len());
    Ok(())
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let dir = Path::new("data");
    std::fs::create_dir_all(dir).context("creating data directory")?;

    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let days: Vec<NaiveDate> = (0..60).map(|i| start + Duration::days(i)).collect();

    // Daily summaries.
    let mut calories = Vec::new();
    let mut activity = Vec::new();
    let mut sleep = Vec::new();
    let mut stress = Vec::new();
    let mut energy = Vec::new();
    let mut body = Vec::new();
    let mut antiox = Vec::new();

    // Intra-day readings.
    let mut heart = Vec::new();
    let mut spo2 = Vec::new();
    let mut bp = Vec::new();
    let mut ecg = Vec::new();
    let mut falls = Vec::new();

    let mut body_fat = 15.0;
    let mut muscle = 38.0;

    for (i, &day) in days.iter().enumerate() {
        // Training load waves over the week.
        let load = 1.0 + 0.3 * ((i as f64) * std::f64::consts::PI / 3.5).sin();

        calories.push(vec![
            ts(day, 21, 0),
            format!("{:.0}", rng.gauss(2200.0 * load, 150.0)),
        ]);
        activity.push(vec![
            ts(day, 21, 0),
            format!("{:.0}", rng.gauss(85.0 * load, 20.0).max(0.0)),
        ]);
        sleep.push(vec![
            ts(day, 7, 0),
            format!("{:.0}", rng.gauss(90.0, 15.0).max(30.0)),
            format!("{:.0}", rng.gauss(240.0, 30.0).max(120.0)),
            format!("{:.0}", rng.gauss(100.0, 20.0).max(40.0)),
        ]);
        stress.push(vec![
            ts(day, 20, 0),
            format!("{:.0}", rng.gauss(45.0 * load, 10.0).clamp(5.0, 95.0)),
        ]);
        energy.push(vec![
            ts(day, 8, 0),
            format!("{:.0}", rng.gauss(78.0 / load, 9.0).clamp(20.0, 100.0)),
        ]);

        body_fat += rng.gauss(-0.01, 0.05);
        muscle += rng.gauss(0.01, 0.04);
        body.push(vec![
            ts(day, 7, 30),
            format!("{body_fat:.1}"),
            format!("{muscle:.1}"),
        ]);
        antiox.push(vec![
            ts(day, 9, 0),
            format!("{:.0}", rng.gauss(55.0, 8.0).clamp(10.0, 100.0)),
        ]);

        // Heart rate: several readings per day, higher during training hours.
        for hour in [6u32, 10, 14, 17, 22] {
            let base = if hour == 17 { 135.0 * load } else { 68.0 };
            heart.push(vec![
                ts(day, hour, 15),
                format!("{:.0}", rng.gauss(base, 12.0).clamp(42.0, 210.0)),
            ]);
        }

        for hour in [3u32, 12, 23] {
            spo2.push(vec![
                ts(day, hour, 45),
                format!("{:.0}", rng.gauss(97.0, 1.4).clamp(88.0, 100.0)),
            ]);
        }

        bp.push(vec![
            ts(day, 8, 30),
            format!("{:.0}", rng.gauss(121.0, 6.0)),
            format!("{:.0}", rng.gauss(78.0, 5.0)),
        ]);

        ecg.push(vec![
            ts(day, 12, 30),
            if rng.chance(0.06) { "1" } else { "0" }.to_string(),
        ]);

        if rng.chance(0.05) {
            falls.push(vec![ts(day, 16, 10), "1".to_string()]);
        }
    }

    write_csv(dir, "calories.csv", &["timestamp", "calories"], &calories)?;
    write_csv(dir, "activity.csv", &["timestamp", "active_minutes"], &activity)?;
    write_csv(dir, "heart_rate.csv", &["timestamp", "bpm"], &heart)?;
    write_csv(dir, "sleep.csv", &["timestamp", "deep", "light", "rem"], &sleep)?;
    write_csv(dir, "stress.csv", &["timestamp", "stress_score"], &stress)?;
    write_csv(dir, "energy.csv", &["timestamp", "energy_score"], &energy)?;
    write_csv(dir, "spo2.csv", &["timestamp", "oxygen_percent"], &spo2)?;
    write_csv(dir, "bp.csv", &["timestamp", "systolic", "diastolic"], &bp)?;
    write_csv(dir, "ecg.csv", &["timestamp", "abnormal_flag"], &ecg)?;
    write_csv(dir, "falls.csv", &["timestamp", "fall_detected"], &falls)?;
    write_csv(dir, "body_comp.csv", &["timestamp", "body_fat", "muscle_mass"], &body)?;
    write_csv(dir, "antioxidants.csv", &["timestamp", "antioxidant_level"], &antiox)?;

    println!("generated {} days of telemetry in {}", days.len(), dir.display());
    Ok(())
}
