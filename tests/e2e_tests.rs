//! End-to-end replay tests
//!
//! These tests validate the complete replay pipeline using predefined CSV
//! fixtures. Each fixture directory under tests/fixtures/ holds:
//! - `input.csv` - the operation log (`op,user,amount`)
//! - `expected_balances.csv` - `user,amount` per stored balance
//! - `expected_history.csv` - `user,kind,amount` per history record
//!
//! Timestamps and global sequence ids depend on scheduling, so the reports
//! are projected onto their deterministic columns before comparison. Every
//! fixture is replayed with the default batch size and with tiny batches.

#[cfg(test)]
mod tests {
    use point_ledger::cli::ReportKind;
    use point_ledger::{ReplayConfig, Replayer};
    use rstest::rstest;
    use std::fs;
    use std::io::Write;
    use std::path::Path;
    use tempfile::NamedTempFile;

    /// Replay `input.csv` and return the chosen report as text
    fn replay(fixture_dir: &str, report: ReportKind, batch_size: usize) -> String {
        let input_path = format!("{}/input.csv", fixture_dir);
        assert!(
            Path::new(&input_path).exists(),
            "Input file not found: {}",
            input_path
        );

        let replayer = Replayer::new(ReplayConfig::new(batch_size, 4));
        let mut temp_output = NamedTempFile::new().expect("Failed to create temp file");

        replayer
            .run(Path::new(&input_path), report, &mut temp_output)
            .unwrap_or_else(|e| panic!("Failed to replay {}: {}", input_path, e));
        temp_output.flush().expect("Failed to flush temp file");

        fs::read_to_string(temp_output.path())
            .unwrap_or_else(|e| panic!("Failed to read temp output file: {}", e))
    }

    /// Keep only the named columns of a CSV document
    fn project(csv_text: &str, columns: &[&str]) -> String {
        let mut reader = csv::Reader::from_reader(csv_text.as_bytes());
        let headers = reader.headers().expect("report has a header").clone();
        let indices: Vec<usize> = columns
            .iter()
            .map(|column| {
                headers
                    .iter()
                    .position(|header| header == *column)
                    .unwrap_or_else(|| panic!("Missing column {}", column))
            })
            .collect();

        let mut projected = columns.join(",");
        projected.push('\n');
        for record in reader.records() {
            let record = record.expect("valid report row");
            let fields: Vec<&str> = indices.iter().map(|&i| &record[i]).collect();
            projected.push_str(&fields.join(","));
            projected.push('\n');
        }
        projected
    }

    fn run_test_fixture(fixture_name: &str, batch_size: usize) {
        let fixture_dir = format!("tests/fixtures/{}", fixture_name);

        let cases = [
            (ReportKind::Balances, "expected_balances.csv", &["user", "amount"][..]),
            (
                ReportKind::History,
                "expected_history.csv",
                &["user", "kind", "amount"][..],
            ),
        ];

        for (report, expected_file, columns) in cases {
            let expected_path = format!("{}/{}", fixture_dir, expected_file);
            let expected = fs::read_to_string(&expected_path)
                .unwrap_or_else(|e| panic!("Failed to read expected file {}: {}", expected_path, e));

            let actual = project(&replay(&fixture_dir, report, batch_size), columns);

            assert_eq!(
                actual, expected,
                "\n\nOutput mismatch for fixture: {} ({:?}, batch size {})\n\nActual output:\n{}\n\nExpected output:\n{}\n",
                fixture_name, report, batch_size, actual, expected
            );
        }
    }

    #[rstest]
    #[case("happy_path")]
    #[case("insufficient_balance")]
    #[case("invalid_arguments")]
    #[case("malformed_data")]
    #[case("interleaved_users")]
    fn test_fixtures(#[case] fixture: &str, #[values(1000, 2)] batch_size: usize) {
        run_test_fixture(fixture, batch_size);
    }

    #[test]
    fn test_history_ids_follow_insertion_order_per_user() {
        let output = replay("tests/fixtures/interleaved_users", ReportKind::History, 1000);
        let mut reader = csv::Reader::from_reader(output.as_bytes());

        let rows: Vec<(i64, u64)> = reader
            .records()
            .map(|record| {
                let record = record.unwrap();
                (record[1].parse().unwrap(), record[0].parse().unwrap())
            })
            .collect();

        assert_eq!(rows.len(), 9);
        assert!(rows
            .windows(2)
            .filter(|pair| pair[0].0 == pair[1].0)
            .all(|pair| pair[0].1 < pair[1].1));
    }
}
