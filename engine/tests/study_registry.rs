//! Registry-level behaviour of the built-in studies.

use std::collections::BTreeMap;

use corelib::{Bar, StudyOutput};
use engine::StudyError;
use engine::studies::{BollingerBands, MovingAverage, MovingAverageParams, bollinger};
use engine::study::{Indicator, LineStudyInstance, StudyDefinition, StudyInstance, StudyRegistry};
use proptest::prelude::*;
use serde_json::json;

/// Minimal render target: output id -> drawn values.
#[derive(Default)]
struct Chart {
    lines: BTreeMap<String, Vec<f64>>,
}

fn draw(chart: &mut Chart, outputs: Vec<StudyOutput>) -> Box<dyn StudyInstance> {
    let ids: Vec<String> = outputs.iter().map(|o| o.id.clone()).collect();
    for o in outputs {
        chart
            .lines
            .insert(o.id, o.points.iter().map(|p| p.value).collect());
    }
    Box::new(LineStudyInstance::new("chart", ids, |_| {}))
}

/// Moving average registered under an arbitrary id and name.
struct Named {
    id: String,
    name: &'static str,
}

impl Indicator for Named {
    type Params = MovingAverageParams;

    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        self.name
    }

    fn defaults(&self) -> MovingAverageParams {
        MovingAverageParams::default()
    }

    fn compute(&self, bars: &[Bar], params: &MovingAverageParams) -> Vec<StudyOutput> {
        MovingAverage.compute(bars, params)
    }
}

fn named(id: &str, name: &'static str) -> StudyDefinition<Chart> {
    let indicator = Named {
        id: id.to_string(),
        name,
    };
    StudyDefinition::new(indicator, draw).unwrap()
}

fn registry() -> StudyRegistry<Chart> {
    let reg = StudyRegistry::new();
    reg.register(StudyDefinition::new(BollingerBands, draw).unwrap())
        .unwrap();
    reg.register(StudyDefinition::new(MovingAverage, draw).unwrap())
        .unwrap();
    reg
}

fn bars(closes: &[f64]) -> Vec<Bar> {
    closes
        .iter()
        .enumerate()
        .map(|(i, c)| Bar::new(1_700_000_000 + i as i64 * 86_400, *c, *c, *c, *c))
        .collect()
}

#[test]
fn bollinger_with_period_override() {
    let reg = registry();
    let mut chart = Chart::default();

    let inst = reg
        .attach(
            &mut chart,
            &bars(&[1.0, 2.0, 3.0, 4.0, 5.0]),
            "bollinger",
            Some(&json!({ "period": 3 })),
        )
        .unwrap();

    let middle = &chart.lines[bollinger::MIDDLE];
    assert_eq!(middle.len(), 3);
    assert_eq!(middle[0], 2.0);
    assert_eq!(chart.lines.len(), 3);

    inst.remove();
}

#[test]
fn outputs_are_ordered_upper_middle_lower() {
    let reg = registry();
    let def = reg.get(BollingerBands::ID).unwrap();

    let out = def.compute(&bars(&[1.0; 25]), None).unwrap();
    let ids: Vec<&str> = out.iter().map(|o| o.id.as_str()).collect();

    assert_eq!(ids, vec![bollinger::UPPER, bollinger::MIDDLE, bollinger::LOWER]);
    // default period 20 over 25 bars
    assert!(out.iter().all(|o| o.len() == 6));
}

#[test]
fn defaults_are_exposed_as_json() {
    let reg = registry();
    let def = reg.get("bollinger").unwrap();

    assert_eq!(def.defaults()["period"], json!(20));
    assert_eq!(def.defaults()["width"], json!(2.0));
    assert_eq!(def.name(), "Bollinger Bands");
}

#[test]
fn zero_period_override_behaves_as_one() {
    let reg = registry();
    let def = reg.get("sma").unwrap();

    let out = def
        .compute(&bars(&[3.0, 6.0, 9.0]), Some(&json!({ "period": 0 })))
        .unwrap();

    let values: Vec<f64> = out[0].points.iter().map(|p| p.value).collect();
    assert_eq!(values, vec![3.0, 6.0, 9.0]);
}

#[test]
fn std_dev_key_sets_band_width() {
    let reg = registry();
    let closes = [1.0, 2.0, 3.0, 4.0, 5.0];

    let mut by_alias = Chart::default();
    reg.attach(
        &mut by_alias,
        &bars(&closes),
        "bollinger",
        Some(&json!({ "period": 3, "stdDev": 1.0 })),
    )
    .unwrap()
    .remove();

    let mut by_width = Chart::default();
    reg.attach(
        &mut by_width,
        &bars(&closes),
        "bollinger",
        Some(&json!({ "period": 3, "width": 1.0 })),
    )
    .unwrap()
    .remove();

    assert_eq!(by_alias.lines, by_width.lines);
    // sd of [1, 2, 3] is sqrt(2/3)
    let upper = by_alias.lines[bollinger::UPPER][0];
    assert!((upper - (2.0 + (2.0f64 / 3.0).sqrt())).abs() < 1e-12);
}

#[test]
fn canonical_key_wins_over_alias() {
    let reg = registry();
    let def = reg.get("bollinger").unwrap();

    let merged = def
        .merge_params(Some(&json!({ "stdDev": 9.0, "width": 0.5 })))
        .unwrap();

    assert_eq!(merged["width"], json!(0.5));
    assert!(!merged.contains_key("stdDev"));
}

#[test]
fn period_far_beyond_bar_count_yields_empty_outputs() {
    let reg = registry();
    let mut chart = Chart::default();
    let closes = [1.0, 2.0, 3.0];

    for period in [json!(1e20), json!(1e15), json!(u64::MAX)] {
        let inst = reg
            .attach(&mut chart, &bars(&closes), "bollinger", Some(&json!({ "period": period })))
            .unwrap();
        assert_eq!(chart.lines.len(), 3);
        assert!(chart.lines.values().all(Vec::is_empty));
        inst.remove();

        let out = reg
            .get("sma")
            .unwrap()
            .compute(&bars(&closes), Some(&json!({ "period": period })))
            .unwrap();
        assert!(out[0].is_empty());
    }
}

#[test]
fn empty_bars_attach_with_empty_outputs() {
    let reg = registry();
    let mut chart = Chart::default();

    let inst = reg.attach(&mut chart, &[], "bollinger", None).unwrap();

    assert_eq!(chart.lines.len(), 3);
    assert!(chart.lines.values().all(Vec::is_empty));
    inst.remove();
}

proptest! {
    #[test]
    fn unknown_ids_never_render(id in "[a-z]{1,12}") {
        prop_assume!(id != "bollinger" && id != "sma");
        let reg = registry();
        let mut chart = Chart::default();

        let err = reg.attach(&mut chart, &bars(&[1.0, 2.0]), &id, None).unwrap_err();

        prop_assert_eq!(err, StudyError::UnknownStudy(id));
        prop_assert!(chart.lines.is_empty());
    }

    #[test]
    fn duplicate_registration_keeps_first(id in "[a-z]{1,8}", other in "[a-z]{1,8}") {
        let reg: StudyRegistry<Chart> = StudyRegistry::new();
        reg.register(named(&id, "first")).unwrap();

        let err = reg.register(named(&id, "second")).unwrap_err();

        prop_assert_eq!(err, StudyError::DuplicateId(id.clone()));
        prop_assert_eq!(reg.len(), 1);
        let first = reg.get(&id).unwrap();
        prop_assert_eq!(first.name(), "first");

        // a different id is still free
        if other != id {
            prop_assert!(reg.register(named(&other, "other")).is_ok());
            prop_assert_eq!(reg.len(), 2);
        }
    }

    #[test]
    fn bands_are_ordered_and_sized(
        closes in prop::collection::vec(1.0f64..1_000.0, 0..80),
        period in 1usize..30,
        width in 0.0f64..4.0,
    ) {
        let reg = registry();
        let def = reg.get("bollinger").unwrap();

        let out = def
            .compute(&bars(&closes), Some(&json!({ "period": period, "width": width })))
            .unwrap();

        let expected = closes.len().saturating_sub(period - 1);
        for o in &out {
            prop_assert_eq!(o.len(), expected);
        }

        for i in 0..expected {
            let (u, m, l) = (out[0].points[i], out[1].points[i], out[2].points[i]);
            prop_assert_eq!(u.time, m.time);
            prop_assert_eq!(m.time, l.time);
            prop_assert!(l.value <= m.value + 1e-9);
            prop_assert!(m.value <= u.value + 1e-9);
        }
    }
}
