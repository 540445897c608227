//! Writes a deterministic `sample_signals.csv` for manual testing.

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

    fn range(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }
}

fn main() {
    let mut rng = SimpleRng::new(42);
    let n_rows = 60;

    let output_path = "sample_signals.csv";
    let file = std::fs::File::create(output_path).expect("Failed to create output file");
    let mut writer = csv::Writer::from_writer(file);

    writer
        .write_record([
            "Time created",
            "Dev bought own token (SOL)",
            "Dev sold %",
            "ATH market cap",
            "ROI",
            "X's",
        ])
        .expect("Failed to write header");

    for _ in 0..n_rows {
        let time_created = (rng.range(1.0, 6.0)).floor();
        let dev_bought = (rng.range(0.1, 2.0) * 100.0).round() / 100.0;
        // Devs mostly dump everything; a minority hold some.
        let dev_sold = if rng.next_f64() < 0.6 {
            100.0
        } else {
            (rng.range(30.0, 95.0)).round()
        };
        let ath_cap = (rng.range(1.0, 40.0) * 1e7).round();
        let roi = (rng.range(1.0, 25.0)).round();
        // Multiplier is long-tailed: most launches fizzle below 10x.
        let multiplier = if rng.next_f64() < 0.8 {
            (rng.range(1.0, 9.0)).round()
        } else {
            (rng.range(10.0, 50.0)).round()
        };

        writer
            .write_record([
                format!("{time_created}"),
                format!("{dev_bought}"),
                format!("{dev_sold}"),
                format!("{ath_cap}"),
                format!("{roi}"),
                format!("{multiplier}"),
            ])
            .expect("Failed to write row");
    }

    writer.flush().expect("Failed to flush CSV");
    println!("Wrote {n_rows} signals to {output_path}");
}
