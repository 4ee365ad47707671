use watch_trends::{Error, PeakOutput, Stage, TrendRow, run};

use crate::utils::{HEADER, scratch_dir, test_config, viewing_csv, viewing_line, write_file};

#[test]
fn test_three_year_scenario() -> watch_trends::Result<()> {
    let dir = scratch_dir();
    let config = test_config(&dir);
    write_file(
        &dir,
        "input.csv",
        &viewing_csv(&[2020, 2020, 2021, 2021, 2021, 2022]),
    );

    let summary = run(&config)?;

    assert_eq!(summary.rows_read, 6);
    assert_eq!(summary.distinct_years, 3);
    assert_eq!(summary.peak, Some(TrendRow::new(Some(2021), 3)));
    assert_eq!(summary.stage, Stage::Stopped);
    assert_eq!(summary.peak_path, None);
    assert_eq!(
        std::fs::read_to_string(&config.output_path)?,
        "WatchedYear,MoviesWatched\n2020,2\n2021,3\n2022,1\n"
    );
    Ok(())
}

#[test]
fn test_single_row_scenario() -> watch_trends::Result<()> {
    let dir = scratch_dir();
    let config = test_config(&dir);
    write_file(&dir, "input.csv", &viewing_csv(&[2019]));

    let summary = run(&config)?;

    assert_eq!(summary.peak, Some(TrendRow::new(Some(2019), 1)));
    assert_eq!(
        std::fs::read_to_string(&config.output_path)?,
        "WatchedYear,MoviesWatched\n2019,1\n"
    );
    Ok(())
}

#[test]
fn test_row_with_extra_fields_is_still_counted() -> watch_trends::Result<()> {
    let dir = scratch_dir();
    let config = test_config(&dir);
    let mut content = viewing_csv(&[2020, 2021]);
    content.push_str(&format!("{},EXTRA,MORE\n", viewing_line(2, "2021")));
    write_file(&dir, "input.csv", &content);

    let summary = run(&config)?;

    assert_eq!(summary.rows_read, 3);
    assert_eq!(summary.peak, Some(TrendRow::new(Some(2021), 2)));
    assert_eq!(
        std::fs::read_to_string(&config.output_path)?,
        "WatchedYear,MoviesWatched\n2020,1\n2021,2\n"
    );
    Ok(())
}

#[test]
fn test_header_only_input_is_not_a_failure() -> watch_trends::Result<()> {
    let dir = scratch_dir();
    let peak_path = dir.path().join("out").join("peak.csv");
    let config = test_config(&dir).with_peak_output(PeakOutput::ConsoleAndCsv(peak_path.clone()));
    write_file(&dir, "input.csv", &format!("{HEADER}\n"));

    let summary = run(&config)?;

    assert_eq!(summary.rows_read, 0);
    assert_eq!(summary.distinct_years, 0);
    assert_eq!(summary.peak, None);
    assert_eq!(
        std::fs::read_to_string(&config.output_path)?,
        "WatchedYear,MoviesWatched\n"
    );
    assert_eq!(
        std::fs::read_to_string(&peak_path)?,
        "WatchedYear,MoviesWatched\n"
    );
    Ok(())
}

#[test]
fn test_rerun_overwrites_with_identical_bytes() -> watch_trends::Result<()> {
    let dir = scratch_dir();
    let config = test_config(&dir).with_batch_size(2);
    write_file(
        &dir,
        "input.csv",
        &viewing_csv(&[2015, 2016, 2015, 2017, 2016, 2015, 2018]),
    );

    run(&config)?;
    let first = std::fs::read(&config.output_path)?;
    run(&config)?;
    let second = std::fs::read(&config.output_path)?;

    assert_eq!(first, second);
    assert_eq!(
        String::from_utf8_lossy(&second),
        "WatchedYear,MoviesWatched\n2015,3\n2016,2\n2017,1\n2018,1\n"
    );
    Ok(())
}

#[test]
fn test_peak_table_can_be_persisted() -> watch_trends::Result<()> {
    let dir = scratch_dir();
    let peak_path = dir.path().join("out").join("peak.csv");
    let config = test_config(&dir).with_peak_output(PeakOutput::ConsoleAndCsv(peak_path.clone()));
    write_file(&dir, "input.csv", &viewing_csv(&[2010, 2011, 2011]));

    let summary = run(&config)?;

    assert_eq!(summary.peak_path.as_deref(), Some(peak_path.as_path()));
    assert_eq!(
        std::fs::read_to_string(&peak_path)?,
        "WatchedYear,MoviesWatched\n2011,2\n"
    );
    Ok(())
}

#[test]
fn test_missing_input_aborts_before_output() {
    let dir = scratch_dir();
    let config = test_config(&dir);

    let err = run(&config).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<Error>(),
        Some(Error::InputNotFound { .. })
    ));
    assert!(!config.output_path.exists());
}

#[test]
fn test_unwritable_output_aborts_after_aggregation() {
    let dir = scratch_dir();
    let mut config = test_config(&dir);
    config.output_path = dir.path().join("missing").join("trends.csv");
    write_file(&dir, "input.csv", &viewing_csv(&[2020, 2021]));

    let err = run(&config).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<Error>(),
        Some(Error::OutputDirectoryMissing { .. })
    ));
    assert!(dir.path().join("missing").metadata().is_err());
}
