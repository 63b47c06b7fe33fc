use std::path::PathBuf;

use anyhow::{Context, Result};

const PROGRAMS: [&str; 6] = [
    "Engenharia Civil",
    "Engenharia Elétrica",
    "Engenharia Mecânica",
    "Engenharia Química",
    "Engenharia de Produção",
    "Engenharia Ambiental",
];

const YEARS: [i32; 5] = [2017, 2018, 2019, 2023, 2024];

const HEADER: [&str; 11] = [
    "Ano",
    "Curso",
    "Posição",
    "Posição Nota dos concluintes",
    "Nota em avaliação do Mercado",
    "Nota em qualidade de ensino",
    "Nota em Professores com doutorado e mestrado",
    "Nota dos concluintes",
    "Nota em Tempo de Dedicação dos Professores",
    "Nota em Permanência dos alunos",
    "Nota em avaliação dos docentes",
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

    /// Uniform integer in `lo..=hi`.
    fn range(&mut self, lo: i64, hi: i64) -> i64 {
        let span = (hi - lo + 1) as u64;
        lo + (self.next_u64() % span) as i64
    }

    /// Uniform float in `[lo, hi)`, rounded to two decimals.
    fn score(&mut self, lo: f64, hi: f64) -> f64 {
        let unit = (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64;
        ((lo + unit * (hi - lo)) * 100.0).round() / 100.0
    }
}

/// One output row. The completer position is sometimes a rank bucket,
/// which is how the published ranking reports programs outside the top 200.
fn make_row(rng: &mut SimpleRng, year: i32, program: &str, position: i64) -> Vec<String> {
    let completers = if rng.range(0, 3) == 0 {
        "201-250".to_string()
    } else {
        rng.range(1, 200).to_string()
    };

    let mut row = vec![
        year.to_string(),
        program.to_string(),
        position.to_string(),
        completers,
    ];
    for _ in 0..7 {
        row.push(format!("{:.2}", rng.score(0.0, 10.0)));
    }
    row
}

/// Write the header and every sample row to `out`. Returns the row count.
fn write_sample<W: std::io::Write>(out: W) -> Result<usize> {
    let mut writer = csv::WriterBuilder::new().delimiter(b';').from_writer(out);
    writer.write_record(HEADER)?;

    let mut rng = SimpleRng::new(42);
    let mut rows = 0usize;

    for (p, program) in PROGRAMS.iter().enumerate() {
        // The last program only appears in the latest edition.
        let years: &[i32] = if p == PROGRAMS.len() - 1 {
            &YEARS[YEARS.len() - 1..]
        } else {
            &YEARS
        };

        let mut position = rng.range(5, 60);
        for &year in years {
            position = (position + rng.range(-6, 6)).max(1);
            writer.write_record(make_row(&mut rng, year, program, position))?;
            rows += 1;
        }
    }

    writer.flush().context("flushing CSV")?;
    Ok(rows)
}

fn main() -> Result<()> {
    env_logger::init();

    let out_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("data/cursos.csv"));

    if let Some(dir) = out_path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    }

    let file = std::fs::File::create(&out_path)
        .with_context(|| format!("creating {}", out_path.display()))?;
    let rows = write_sample(file)?;

    log::info!("Wrote {rows} rows to {}", out_path.display());
    println!("Wrote {rows} rows to {}", out_path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shipped_data_matches_generator() {
        let mut buf = Vec::new();
        let rows = write_sample(&mut buf).unwrap();
        assert_eq!(rows, (PROGRAMS.len() - 1) * YEARS.len() + 1);

        let shipped = include_str!("../../data/cursos.csv");
        assert_eq!(String::from_utf8(buf).unwrap(), shipped);
    }

    #[test]
    fn generator_is_deterministic() {
        let (mut a, mut b) = (Vec::new(), Vec::new());
        write_sample(&mut a).unwrap();
        write_sample(&mut b).unwrap();
        assert_eq!(a, b);
    }
}
