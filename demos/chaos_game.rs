use std::io::Cursor;

use flamekit::{Flame, InMemorySink, IterationSession, SessionOpts};

const WIDTH: usize = 72;
const HEIGHT: usize = 36;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_target(false)
        .init();

    // Sierpinski triangle with a swirl of julia3Dq and a final lazysusan.
    let json = r#"
{
  "name": "demo",
  "layers": [
    {
      "xforms": [
        { "weight": 1.0, "color": 0.0, "affine": [0.5, 0.0, 0.0, 0.5, 0.0, 0.0],
          "variations": [ { "name": "linear", "amount": 1.0 } ] },
        { "weight": 1.0, "color": 0.5, "affine": [0.5, 0.0, 0.0, 0.5, 0.5, 0.0],
          "variations": [ { "name": "linear", "amount": 0.9 }, { "name": "blur", "amount": 0.02 } ] },
        { "weight": 1.0, "color": 1.0, "affine": [0.5, 0.0, 0.0, 0.5, 0.0, 0.5],
          "variations": [ { "name": "julia3Dq", "amount": 0.4, "params": { "power": 3 } },
                          { "name": "linear", "amount": 0.6 } ] }
      ],
      "final_xforms": [
        { "variations": [ { "name": "lazysusan", "amount": 1.0, "params": { "spin": 0.3 } } ] }
      ]
    }
  ]
}
"#;

    let flame = Flame::from_json_reader(Cursor::new(json))?;
    let opts = SessionOpts {
        iterations: 200_000,
        parallel: true,
        seed: 42,
        ..SessionOpts::default()
    };
    let session = IterationSession::new(&flame, opts)?;
    let mut sink = InMemorySink::new();
    let stats = session.run(&mut sink)?;

    let mut grid = vec![0u32; WIDTH * HEIGHT];
    for (_, p) in sink.points() {
        let gx = ((p.x + 1.5) / 3.0 * WIDTH as f64).floor();
        let gy = ((p.y + 1.5) / 3.0 * HEIGHT as f64).floor();
        if (0.0..WIDTH as f64).contains(&gx) && (0.0..HEIGHT as f64).contains(&gy) {
            grid[gy as usize * WIDTH + gx as usize] += 1;
        }
    }

    let max = grid.iter().copied().max().unwrap_or(0).max(1) as f64;
    let ramp = [' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];
    for row in grid.chunks(WIDTH).rev() {
        let line: String = row
            .iter()
            .map(|&c| {
                let t = (c as f64).ln_1p() / max.ln_1p();
                ramp[((t * (ramp.len() - 1) as f64).round() as usize).min(ramp.len() - 1)]
            })
            .collect();
        println!("{line}");
    }

    eprintln!(
        "plotted {} of {} iterations on {} workers",
        stats.plotted, stats.iterations, stats.workers
    );
    Ok(())
}
