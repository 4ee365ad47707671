use watch_trends::reader::{load_viewing_records, load_viewing_records_from, read_header};
use watch_trends::schema::SchemaIssue;
use watch_trends::{Error, ParsePolicy};

use crate::utils::{HEADER, scratch_dir, test_config, viewing_csv, viewing_line, write_file};

#[test]
fn test_load_typed_records() -> watch_trends::Result<()> {
    let dir = scratch_dir();
    let config = test_config(&dir);
    write_file(
        &dir,
        "input.csv",
        &format!(
            "{HEADER}\n7,55,\"Crouching Tiger, Hidden Dragon\",Action,4.25,3,2001,CN,Teen,Hulu,120,false,Free\n"
        ),
    );

    let dataset = load_viewing_records(&config)?;
    assert_eq!(dataset.num_rows(), 1);
    assert!(dataset.header_report.compatible);

    let records = dataset.records()?;
    let record = &records[0];
    assert_eq!(record.user_id, Some(7));
    assert_eq!(record.movie_id, Some(55));
    assert_eq!(
        record.movie_title.as_deref(),
        Some("Crouching Tiger, Hidden Dragon")
    );
    assert_eq!(record.rating, Some(4.25));
    assert_eq!(record.watched_year, Some(2001));
    assert_eq!(record.watch_time, Some(120));
    assert_eq!(record.is_binge_watched, Some(false));
    assert_eq!(record.subscription_status.as_deref(), Some("Free"));
    Ok(())
}

#[test]
fn test_batch_size_controls_partitions() -> watch_trends::Result<()> {
    let dir = scratch_dir();
    let config = test_config(&dir).with_batch_size(3);
    write_file(&dir, "input.csv", &viewing_csv(&[2020; 10]));

    let dataset = load_viewing_records(&config)?;
    assert_eq!(dataset.num_rows(), 10);
    assert_eq!(dataset.num_partitions(), 4);
    Ok(())
}

#[test]
fn test_header_only_file_loads_empty() -> watch_trends::Result<()> {
    let dir = scratch_dir();
    let config = test_config(&dir);
    write_file(&dir, "input.csv", &format!("{HEADER}\n"));

    let dataset = load_viewing_records(&config)?;
    assert_eq!(dataset.num_rows(), 0);
    Ok(())
}

#[test]
fn test_permissive_policy_nulls_malformed_fields() -> watch_trends::Result<()> {
    let dir = scratch_dir();
    let config = test_config(&dir);
    let content = format!(
        "{HEADER}\n{}\n{}\n1,10,Short Row\n",
        viewing_line(0, "2020"),
        viewing_line(1, "not-a-year"),
    );
    write_file(&dir, "input.csv", &content);

    let dataset = load_viewing_records(&config)?;
    assert_eq!(dataset.num_rows(), 3);
    assert_eq!(dataset.nulled_values, 1);

    let records = dataset.records()?;
    assert_eq!(records[0].watched_year, Some(2020));
    assert_eq!(records[1].watched_year, None);
    assert_eq!(records[1].movie_title.as_deref(), Some("Movie 1"));
    assert_eq!(records[2].movie_title.as_deref(), Some("Short Row"));
    assert_eq!(records[2].watched_year, None);
    Ok(())
}

#[test]
fn test_strict_policy_rejects_malformed_fields() {
    let dir = scratch_dir();
    let config = test_config(&dir).with_parse_policy(ParsePolicy::Strict);
    let content = format!(
        "{HEADER}\n{}\n{}\n",
        viewing_line(0, "2020"),
        viewing_line(1, "not-a-year"),
    );
    write_file(&dir, "input.csv", &content);

    let err = load_viewing_records(&config).unwrap_err();
    match err.downcast_ref::<Error>() {
        Some(Error::MalformedField { column, .. }) => assert_eq!(column, "WatchedYear"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_strict_policy_rejects_short_rows() {
    let dir = scratch_dir();
    let config = test_config(&dir).with_parse_policy(ParsePolicy::Strict);
    write_file(&dir, "input.csv", &format!("{HEADER}\n1,10,Short Row\n"));

    assert!(load_viewing_records(&config).is_err());
}

#[test]
fn test_permissive_policy_drops_extra_fields() -> watch_trends::Result<()> {
    let dir = scratch_dir();
    let config = test_config(&dir);
    let content = format!(
        "{HEADER}\n{}\n{},EXTRA\n",
        viewing_line(0, "2020"),
        viewing_line(1, "2021"),
    );
    write_file(&dir, "input.csv", &content);

    let dataset = load_viewing_records(&config)?;
    assert_eq!(dataset.num_rows(), 2);
    assert_eq!(dataset.trimmed_rows, 1);
    assert_eq!(dataset.nulled_values, 0);

    let records = dataset.records()?;
    assert_eq!(records[1].watched_year, Some(2021));
    assert_eq!(records[1].subscription_status.as_deref(), Some("Premium"));
    Ok(())
}

#[test]
fn test_strict_policy_rejects_extra_fields() {
    let dir = scratch_dir();
    let config = test_config(&dir).with_parse_policy(ParsePolicy::Strict);
    let content = format!("{HEADER}\n{},EXTRA\n", viewing_line(0, "2020"));
    write_file(&dir, "input.csv", &content);

    let err = load_viewing_records(&config).unwrap_err();
    assert!(err.to_string().contains("Failed to scan CSV file"));
}

#[test]
fn test_renamed_header_column() -> watch_trends::Result<()> {
    let dir = scratch_dir();
    let renamed = HEADER.replace("WatchedYear", "Year");
    let path = write_file(
        &dir,
        "renamed.csv",
        &format!("{renamed}\n{}\n", viewing_line(0, "2018")),
    );

    assert_eq!(read_header(&path, b',')?.len(), 13);

    // Permissive reads by position and keeps the year
    let permissive = test_config(&dir);
    let dataset = load_viewing_records_from(&path, &permissive)?;
    assert!(!dataset.header_report.compatible);
    assert!(dataset.header_report.issues.contains(&SchemaIssue::MissingColumn {
        name: "WatchedYear".to_string()
    }));
    assert_eq!(dataset.records()?[0].watched_year, Some(2018));

    // Strict refuses the file
    let strict = test_config(&dir).with_parse_policy(ParsePolicy::Strict);
    let err = load_viewing_records_from(&path, &strict).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<Error>(),
        Some(Error::SchemaMismatch { .. })
    ));
    Ok(())
}

#[test]
fn test_missing_input_is_reported() {
    let dir = scratch_dir();
    let config = test_config(&dir);

    let err = load_viewing_records(&config).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<Error>(),
        Some(Error::InputNotFound { .. })
    ));
}
