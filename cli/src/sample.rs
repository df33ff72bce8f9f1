//! Bar sources for the demo: a seeded-or-not random walk, or a JSON file.

use std::path::Path;

use anyhow::Context;
use corelib::{Bar, BarSequence};
use rand::Rng;

/// Per-bar movement scale of the random walk.
const VOLATILITY: f64 = 1.2;

/// Prices never walk below one cent.
const FLOOR: f64 = 0.01;

/// Random-walk OHLCV bars, `step_secs` apart starting at `start_time`.
///
/// Each close drifts from the previous one, the open sits near the previous
/// close, and high/low wrap both. Prices are rounded to cents.
pub fn generate_bars<R: Rng + ?Sized>(
    points: usize,
    start_price: f64,
    start_time: i64,
    step_secs: i64,
    rng: &mut R,
) -> Vec<Bar> {
    let step_secs = step_secs.max(1);
    let mut last_close = start_price.max(FLOOR);

    (0..points)
        .map(|i| {
            let time = start_time + i as i64 * step_secs;

            let close = (last_close + rng.gen_range(-0.5..0.5) * VOLATILITY).max(FLOOR);
            let open = (last_close + rng.gen_range(-0.5..0.5) * VOLATILITY * 0.4).max(FLOOR);

            let high = open.max(close) + rng.gen_range(0.0..1.0) * VOLATILITY * 0.8;
            let low = (open.min(close) - rng.gen_range(0.0..1.0) * VOLATILITY * 0.8).max(FLOOR);
            let volume = (100.0_f64 + rng.gen_range(0.0..500.0)).floor();

            last_close = close;

            Bar::new(time, cents(open), cents(high), cents(low), cents(close)).with_volume(volume)
        })
        .collect()
}

fn cents(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Reads a JSON array of bars and validates it as a sequence.
pub fn load_bars(path: &Path) -> anyhow::Result<BarSequence> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading bars from {}", path.display()))?;
    parse_bars(&raw).with_context(|| format!("parsing bars from {}", path.display()))
}

pub fn parse_bars(json: &str) -> anyhow::Result<BarSequence> {
    let bars: Vec<Bar> = serde_json::from_str(json)?;
    Ok(BarSequence::new(bars)?)
}

#[cfg(test)]
mod tests {
    use corelib::BarError;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    #[test]
    fn generated_bars_form_a_valid_sequence() {
        let mut rng = StdRng::seed_from_u64(7);
        let bars = generate_bars(500, 100.0, 1_700_000_000, 60, &mut rng);

        assert_eq!(bars.len(), 500);
        assert_eq!(bars[0].time, 1_700_000_000);
        assert_eq!(bars[499].time, 1_700_000_000 + 499 * 60);

        for b in &bars {
            assert!(b.low >= FLOOR);
            assert!(b.low <= b.open.min(b.close));
            assert!(b.high >= b.open.max(b.close));
            assert_eq!(b.close, cents(b.close));
            assert!(b.volume.is_some_and(|v| (100.0..600.0).contains(&v)));
        }

        assert!(BarSequence::new(bars).is_ok());
    }

    #[test]
    fn same_seed_same_walk() {
        let a = generate_bars(20, 50.0, 0, 60, &mut StdRng::seed_from_u64(1));
        let b = generate_bars(20, 50.0, 0, 60, &mut StdRng::seed_from_u64(1));
        assert_eq!(a, b);
    }

    #[test]
    fn parses_bars_with_and_without_volume() {
        let seq = parse_bars(
            r#"[
                {"time": 60, "open": 1, "high": 2, "low": 0.5, "close": 1.5, "volume": 10},
                {"time": 120, "open": 1.5, "high": 2, "low": 1, "close": 1.8}
            ]"#,
        )
        .unwrap();

        assert_eq!(seq.len(), 2);
        assert_eq!(seq[0].volume, Some(10.0));
        assert_eq!(seq[1].volume, None);
    }

    #[test]
    fn rejects_out_of_order_file() {
        let err = parse_bars(
            r#"[
                {"time": 120, "open": 1, "high": 1, "low": 1, "close": 1},
                {"time": 60, "open": 1, "high": 1, "low": 1, "close": 1}
            ]"#,
        )
        .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<BarError>(),
            Some(BarError::NonIncreasingTime { index: 1, .. })
        ));
    }
}
