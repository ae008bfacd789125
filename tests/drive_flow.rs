// Integration tests: ledger edits flowing into classification and analytics

#[cfg(test)]
mod tests {
    use sideline::config::Config;
    use sideline::engine::analytics::aggregate;
    use sideline::engine::classifier::PlayTextClassifier;
    use sideline::{DriveLedger, Field, FieldEdit, Gain, Side};
    use std::path::Path;

    fn shipped_config() -> Config {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("config.toml");
        Config::load(&path).expect("shipped config.toml should parse")
    }

    fn edit(ledger: DriveLedger, side: Side, row: usize, field: &str, raw: &str) -> DriveLedger {
        let field: Field = field.parse().unwrap();
        ledger.set_field(side, row, FieldEdit::parse(field, raw))
    }

    #[test]
    fn test_first_down_cascades_into_next_row() {
        let mut ledger = DriveLedger::new(10);
        ledger = edit(ledger, Side::Offense, 0, "yard", "-25");
        ledger = edit(ledger, Side::Offense, 0, "down", "1st");
        ledger = edit(ledger, Side::Offense, 0, "dist", "10");
        ledger = edit(ledger, Side::Offense, 0, "gain", "+12");

        let next = ledger.record(Side::Offense, 1).unwrap();
        assert_eq!(next.down, Some(1));
        assert_eq!(next.distance, Some(10));
        assert_eq!(next.yard_line, Some(-37));
        assert!(ledger.record(Side::Offense, 2).unwrap().is_empty(), "cascade is one step");
        assert!(ledger.record(Side::Defense, 1).unwrap().is_empty(), "sides are independent");
    }

    #[test]
    fn test_short_fourth_down_flips_possession() {
        let mut ledger = DriveLedger::new(10);
        ledger = edit(ledger, Side::Offense, 0, "yard", "+40");
        ledger = edit(ledger, Side::Offense, 0, "down", "4");
        ledger = edit(ledger, Side::Offense, 0, "dist", "5");
        ledger = edit(ledger, Side::Offense, 0, "gain", "3");

        let next = ledger.record(Side::Offense, 1).unwrap();
        assert_eq!((next.down, next.distance), (Some(1), Some(10)));
        assert_eq!(next.yard_line, None, "new possession spot is not guessed");
    }

    #[test]
    fn test_corrected_spot_rewrites_gain() {
        let mut ledger = DriveLedger::new(10);
        ledger = edit(ledger, Side::Offense, 0, "yard", "-25");
        ledger = edit(ledger, Side::Offense, 0, "gain", "12");
        ledger = edit(ledger, Side::Offense, 1, "yard", "-40");

        assert_eq!(
            ledger.record(Side::Offense, 0).unwrap().gain,
            Some(Gain::Yards(15))
        );
    }

    #[test]
    fn test_turnover_keeps_its_marker() {
        let mut ledger = DriveLedger::new(10);
        ledger = edit(ledger, Side::Defense, 0, "yard", "-30");
        ledger = edit(ledger, Side::Defense, 0, "down", "2");
        ledger = edit(ledger, Side::Defense, 0, "dist", "6");
        ledger = edit(ledger, Side::Defense, 0, "gain", "INT");
        ledger = edit(ledger, Side::Defense, 1, "yard", "+20");

        let first = ledger.record(Side::Defense, 0).unwrap();
        assert_eq!(first.gain, Some(Gain::Interception));
        let next = ledger.record(Side::Defense, 1).unwrap();
        assert_eq!((next.down, next.distance), (Some(1), Some(10)));
    }

    #[test]
    fn test_new_drive_row_is_left_alone() {
        let mut ledger = DriveLedger::new(10);
        ledger = edit(ledger, Side::Offense, 1, "nd", "yes");
        ledger = edit(ledger, Side::Offense, 1, "yard", "-20");
        ledger = edit(ledger, Side::Offense, 0, "yard", "+10");
        ledger = edit(ledger, Side::Offense, 0, "down", "3");
        ledger = edit(ledger, Side::Offense, 0, "dist", "8");
        ledger = edit(ledger, Side::Offense, 0, "gain", "2");

        let next = ledger.record(Side::Offense, 1).unwrap();
        assert_eq!(next.yard_line, Some(-20));
        assert_eq!((next.down, next.distance), (Some(1), Some(10)));
        assert_eq!(
            ledger.record(Side::Offense, 0).unwrap().gain,
            Some(Gain::Yards(2)),
            "no inference across a drive boundary"
        );
    }

    #[test]
    fn test_longest_formation_wins_with_shipped_dictionaries() {
        let config = shipped_config();
        let classifier =
            PlayTextClassifier::new(&config.dictionaries.formations, &config.dictionaries.plays);

        assert_eq!(classifier.detect_formation("Trips Rt. Up Travel"), Some("Trips Rt. Up"));
        assert_eq!(classifier.detect_plays("Trips Rt. Up Travel"), vec!["Travel"]);
        assert_eq!(classifier.detect_formation("trips rgt slant"), Some("Trips Rt"));
        assert_eq!(classifier.detect_plays("Doubles Y-Stick"), vec!["Stick", "Y-Stick"]);
        assert_eq!(classifier.detect_formation("Stacked"), None);
    }

    #[test]
    fn test_drive_aggregates_by_call() {
        let config = shipped_config();
        let classifier =
            PlayTextClassifier::new(&config.dictionaries.formations, &config.dictionaries.plays);

        let mut ledger = DriveLedger::new(20);
        ledger = edit(ledger, Side::Offense, 0, "yard", "-25");
        ledger = edit(ledger, Side::Offense, 0, "down", "1");
        ledger = edit(ledger, Side::Offense, 0, "dist", "10");
        ledger = edit(ledger, Side::Offense, 0, "call", "Trips Rt Slant");
        ledger = edit(ledger, Side::Offense, 0, "gain", "12");
        ledger = edit(ledger, Side::Offense, 1, "call", "Doubles Inside Zone");
        ledger = edit(ledger, Side::Offense, 1, "gain", "2");
        ledger = edit(ledger, Side::Offense, 2, "call", "Doubles Inside Zone");
        ledger = edit(ledger, Side::Offense, 2, "gain", "8");

        let report = aggregate(
            ledger.records(Side::Offense),
            true,
            &classifier,
            &config.analytics,
        );
        assert_eq!(report.plays, 3);

        assert_eq!(report.by_play[0].label, "Slant");
        assert_eq!(report.by_play[0].explosive_rate, 1.0);
        let zone = report
            .by_play
            .iter()
            .find(|b| b.label == "Inside Zone")
            .unwrap();
        assert_eq!(zone.plays, 2);
        assert_eq!(zone.success_rate, 0.5);
        assert_eq!(zone.avg_gain, 5.0);

        let downs: Vec<(&str, u32)> = report
            .by_down
            .iter()
            .map(|b| (b.label.as_str(), b.plays))
            .collect();
        assert_eq!(downs, vec![("1st Down", 2), ("2nd Down", 1)]);

        let combos = report.by_formation_play.unwrap();
        assert!(combos.iter().any(|b| b.label == "Trips Rt + Slant"));
        assert!(combos.iter().any(|b| b.label == "Doubles + Inside Zone" && b.plays == 2));

        let doubles = report
            .by_keyword
            .iter()
            .find(|b| b.label == "doubles")
            .unwrap();
        assert_eq!(doubles.plays, 2);
    }

    #[test]
    fn test_defense_counts_stops_and_takeaways() {
        let config = shipped_config();
        let classifier =
            PlayTextClassifier::new(&config.dictionaries.formations, &config.dictionaries.plays);

        let mut ledger = DriveLedger::new(10);
        ledger = edit(ledger, Side::Defense, 0, "call", "Empty Mesh");
        ledger = edit(ledger, Side::Defense, 0, "gain", "1");
        ledger = edit(ledger, Side::Defense, 1, "call", "Empty Mesh");
        ledger = edit(ledger, Side::Defense, 1, "gain", "TO");

        let report = aggregate(
            ledger.records(Side::Defense),
            false,
            &classifier,
            &config.analytics,
        );
        assert!(report.by_formation_play.is_none());
        let mesh = &report.by_play[0];
        assert_eq!(mesh.label, "Mesh");
        assert_eq!(mesh.success_rate, 1.0);
        assert_eq!(mesh.avg_gain, 0.5);
        assert!(report.by_down.is_empty(), "downs were never entered");
    }
}
