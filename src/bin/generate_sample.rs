use anyhow::{Context, Result};

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

/// Daily cycle: warmest mid-afternoon, humidity moving the other way.
fn diurnal(hour: f64, base: f64, amplitude: f64) -> f64 {
    base + amplitude * (2.0 * std::f64::consts::PI * (hour - 9.0) / 24.0).sin()
}

fn main() -> Result<()> {
    env_logger::init();
    let output_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "environment_data.csv".to_string());

    let mut rng = SimpleRng::new(42);

    // (location, base temperature, base humidity)
    let locations = [("Greenhouse", 24.0, 70.0), ("Office", 21.0, 45.0), ("Roof", 15.0, 60.0)];
    let hours = 72;

    let mut writer = csv::Writer::from_path(&output_path)
        .with_context(|| format!("creating {output_path}"))?;
    writer.write_record(["Time", "Temperature (°C)", "Humidity (%)", "Location"])?;

    let mut rows = 0usize;
    for hour in 0..hours {
        let h = hour as f64;
        for &(name, base_t, base_h) in &locations {
            let temperature = diurnal(h, base_t, 4.0) + rng.gauss(0.0, 0.4);
            let humidity = (diurnal(h, base_h, -8.0) + rng.gauss(0.0, 1.5)).clamp(0.0, 100.0);

            // Roughly one in fifty humidity readings goes missing.
            let humidity_cell = if rng.next_f64() < 0.02 {
                String::new()
            } else {
                format!("{humidity:.1}")
            };

            writer.write_record([
                hour.to_string(),
                format!("{temperature:.1}"),
                humidity_cell,
                name.to_string(),
            ])?;
            rows += 1;
        }
    }
    writer.flush().context("flushing CSV")?;

    log::info!("Generated {rows} readings");
    println!(
        "Wrote {rows} readings ({hours} hours × {} locations) to {output_path}",
        locations.len()
    );
    Ok(())
}
