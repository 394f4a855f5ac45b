//! Integration tests for the generation and classification engine.
//!
//! Tests cover:
//! - OHLC invariant for every generated candle, across random seeds
//! - Classifier totality and the documented ratio scenarios
//! - Engulfing containment for every draw
//! - Seeded reproducibility of patterns, walks and questions
//! - Question choice-set integrity and Doji distractor filtering
//! - Walk length boundaries and the prediction round built from a walk
//! - Export through the port trait

mod common;

use approx::assert_abs_diff_eq;
use candlequiz::domain::archetype::Archetype;
use candlequiz::domain::candle::CandleSeries;
use candlequiz::domain::classifier::{
    DOJI_RATIO_THRESHOLD, Label, classify, explain_candle, explain_context,
};
use candlequiz::domain::error::QuizError;
use candlequiz::domain::pattern::{generate_pattern, generate_pattern_named};
use candlequiz::domain::question_bank::{QuestionBank, build_question};
use candlequiz::domain::session::{PredictionRound, ScoreBoard};
use candlequiz::domain::walk::{WalkParams, generate_walk, generate_walk_with};
use candlequiz::ports::export_port::ExportPort;
use common::*;
use proptest::prelude::*;
use std::path::Path;

mod ohlc_invariant {
    use super::*;

    proptest! {
        #[test]
        fn every_pattern_candle_is_well_formed(seed in any::<u64>()) {
            let mut rng = seeded(seed);
            for archetype in Archetype::ALL {
                let series = generate_pattern(archetype, &mut rng).unwrap();
                prop_assert_eq!(series.len(), archetype.candle_count());
                for c in &series {
                    prop_assert!(c.low() <= c.open().min(c.close()));
                    prop_assert!(c.high() >= c.open().max(c.close()));
                }
            }
        }

        #[test]
        fn every_walk_candle_is_well_formed(seed in any::<u64>(), length in 2usize..60) {
            let series = generate_walk(length, &mut seeded(seed)).unwrap();
            prop_assert_eq!(series.len(), length);
            for c in &series {
                prop_assert!(c.low() <= c.open().min(c.close()));
                prop_assert!(c.high() >= c.open().max(c.close()));
            }
        }

        #[test]
        fn wide_sigma_walks_stay_well_formed(seed in any::<u64>(), sigma in 0.01f64..25.0) {
            let params = WalkParams { sigma, ..WalkParams::default() };
            let series = generate_walk_with(20, &params, &mut seeded(seed)).unwrap();
            assert_ohlc_invariant(&series);
        }
    }
}

mod classification {
    use super::*;

    #[test]
    fn tiny_body_scenario() {
        let c = candle(100.0, 101.0, 99.0, 100.05);
        assert_abs_diff_eq!(c.body() / c.range(), 0.025, epsilon = 1e-9);
        assert_eq!(classify(&c).to_string(), "Doji / indecision");
    }

    #[test]
    fn strong_bullish_scenario() {
        let c = candle(100.0, 101.6, 99.9, 101.5);
        assert_abs_diff_eq!(c.body() / c.range(), 1.5 / 1.7, epsilon = 1e-9);
        assert_eq!(classify(&c).to_string(), "Bullish candle");
    }

    #[test]
    fn zero_range_is_indecision() {
        let c = candle(55.5, 55.5, 55.5, 55.5);
        assert_eq!(classify(&c), Label::Indecision);
        assert!(explain_candle(&c).contains("indecision"));
    }

    #[test]
    fn threshold_is_the_documented_constant() {
        assert_eq!(DOJI_RATIO_THRESHOLD, 0.2);
    }

    proptest! {
        #[test]
        fn classify_is_total(
            open in 50.0f64..150.0,
            close in 50.0f64..150.0,
            up in 0.0f64..5.0,
            down in 0.0f64..5.0,
        ) {
            let c = candle(open, open.max(close) + up, open.min(close) - down, close);
            let label = classify(&c);
            prop_assert!(Label::ALL.contains(&label));
            if c.range() > 0.0 && c.body() / c.range() >= DOJI_RATIO_THRESHOLD {
                prop_assert_eq!(label == Label::Bullish, close > open);
            }
        }
    }

    #[test]
    fn context_narrative_needs_three_candles() {
        let two = CandleSeries::new(vec![
            candle(100.0, 101.0, 99.0, 100.5),
            candle(100.5, 101.0, 99.5, 100.0),
        ]);
        assert!(matches!(
            explain_context(&two),
            Err(QuizError::InsufficientHistory { have: 2, need: 3 })
        ));
    }

    #[test]
    fn context_narrative_is_deterministic() {
        let series = generate_walk(8, &mut seeded(17)).unwrap();
        assert_eq!(
            explain_context(&series).unwrap(),
            explain_context(&series).unwrap()
        );
    }
}

mod engulfing {
    use super::*;

    proptest! {
        #[test]
        fn bullish_second_body_contains_first(seed in any::<u64>()) {
            let series = generate_pattern_named("Bullish Engulfing", &mut seeded(seed)).unwrap();
            prop_assert_eq!(series.len(), 2);
            let (first, second) = (series.candles()[0], series.candles()[1]);
            prop_assert!(first.close() < first.open());
            prop_assert!(second.close() > second.open());
            prop_assert!(second.open().min(second.close()) <= first.open().min(first.close()));
            prop_assert!(second.open().max(second.close()) >= first.open().max(first.close()));
        }

        #[test]
        fn bearish_second_body_contains_first(seed in any::<u64>()) {
            let series = generate_pattern(Archetype::BearishEngulfing, &mut seeded(seed)).unwrap();
            let (first, second) = (series.candles()[0], series.candles()[1]);
            prop_assert!(second.body_bottom() <= first.body_bottom());
            prop_assert!(second.body_top() >= first.body_top());
        }
    }
}

mod determinism {
    use super::*;

    proptest! {
        #[test]
        fn same_seed_same_outputs(seed in any::<u64>()) {
            for archetype in Archetype::ALL {
                prop_assert_eq!(
                    generate_pattern(archetype, &mut seeded(seed)).unwrap(),
                    generate_pattern(archetype, &mut seeded(seed)).unwrap()
                );
                prop_assert_eq!(
                    build_question(archetype, &mut seeded(seed)).unwrap(),
                    build_question(archetype, &mut seeded(seed)).unwrap()
                );
            }
            prop_assert_eq!(
                generate_walk(10, &mut seeded(seed)).unwrap(),
                generate_walk(10, &mut seeded(seed)).unwrap()
            );
        }
    }

    #[test]
    fn different_seeds_usually_differ() {
        let a = generate_walk(10, &mut seeded(1)).unwrap();
        let b = generate_walk(10, &mut seeded(2)).unwrap();
        assert_ne!(a, b);
    }
}

mod questions {
    use super::*;

    proptest! {
        #[test]
        fn choice_set_integrity(seed in any::<u64>()) {
            let mut rng = seeded(seed);
            for archetype in Archetype::ALL {
                let q = build_question(archetype, &mut rng).unwrap();
                prop_assert_eq!(q.choices.len(), 4);
                for (i, a) in q.choices.iter().enumerate() {
                    for b in &q.choices[i + 1..] {
                        prop_assert_ne!(a, b);
                    }
                }
                prop_assert_eq!(
                    q.choices.iter().filter(|c| **c == q.correct_answer).count(),
                    1
                );
            }
        }

        #[test]
        fn doji_distractors_never_overlap(seed in any::<u64>()) {
            let q = build_question(Archetype::Doji, &mut seeded(seed)).unwrap();
            for choice in q.choices.iter().filter(|c| **c != q.correct_answer) {
                let lower = choice.to_lowercase();
                for keyword in ["indecision", "reversal", "pause"] {
                    prop_assert!(!lower.contains(keyword), "{} contains {}", choice, keyword);
                }
            }
        }
    }

    #[test]
    fn every_distractor_eventually_appears_for_hammer() {
        let bank = QuestionBank::default();
        let mut rng = seeded(4);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..500 {
            let q = bank.build_question(Archetype::Hammer, &mut rng).unwrap();
            seen.extend(q.choices.into_iter().filter(|c| c != "Bullish reversal likely"));
        }
        // Seven in the pool, two filtered by the Hammer keywords.
        assert_eq!(seen.len(), 5);
        assert!(!seen.iter().any(|c| c.to_lowercase().contains("bullish")));
    }
}

mod walks {
    use super::*;

    #[test]
    fn length_one_fails() {
        assert!(matches!(
            generate_walk(1, &mut seeded(0)),
            Err(QuizError::InvalidLength { length: 1, minimum: 2 })
        ));
    }

    #[test]
    fn length_two_succeeds() {
        assert_eq!(generate_walk(2, &mut seeded(0)).unwrap().len(), 2);
    }

    #[test]
    fn prediction_round_from_walk() {
        let series = generate_walk(10, &mut seeded(12)).unwrap();
        let round = PredictionRound::from_series(&series, DOJI_RATIO_THRESHOLD).unwrap();
        assert_eq!(round.visible.len(), 9);
        assert_eq!(&round.hidden, series.last().unwrap());
        assert_eq!(round.answer, classify(&round.hidden));
        assert!(explain_context(&round.visible).is_ok());
    }

    #[test]
    fn scoreboard_threads_through_rounds() {
        let mut board = ScoreBoard::new();
        let mut rng = seeded(33);
        for _ in 0..20 {
            let series = generate_walk(5, &mut rng).unwrap();
            let round = PredictionRound::from_series(&series, DOJI_RATIO_THRESHOLD).unwrap();
            board = board.record(round.is_correct(Label::Bullish));
        }
        assert_eq!(board.total(), 20);
        assert!(board.best_streak <= board.correct);
    }
}

mod export {
    use super::*;

    #[test]
    fn export_port_receives_series() {
        let port = RecordingExportPort::new();
        let series = generate_pattern(Archetype::BullishEngulfing, &mut seeded(2)).unwrap();
        port.export(&series, "Bullish Engulfing", Path::new("/tmp/pair.svg"))
            .unwrap();
        let calls = port.calls.borrow();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, 2);
        assert_eq!(calls[0].1, "Bullish Engulfing");
    }
}
