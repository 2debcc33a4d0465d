use super::*;

#[test]
fn written_records_read_back() {
    let samples = vec![
        TrackSample::new([0.0, 1.0, 1.5e6, -2.0, 3.0e5, 1.0e-5, 2.5e6, -2.0, 3.1e5, 2.0e-5]),
        TrackSample::new([7.0, 8.0, 0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8]),
    ];

    let mut buf = Vec::new();
    write_records(&mut buf, &samples).unwrap();
    let text = String::from_utf8(buf.clone()).unwrap();
    assert_eq!(text.lines().count(), 2);

    let parsed = parse_records(buf.as_slice()).unwrap();
    assert_eq!(parsed.skipped, 0);
    assert_eq!(parsed.samples, samples);
}

#[test]
fn malformed_lines_are_skipped_not_fatal() {
    let text = "\
1 2 3 4 5 6 7 8 9 10
1 2 3 4 5 6 7 8 9
1 2 3 four 5 6 7 8 9 10

1 2 3 4 5 6 7 8 9 10 11
10 9 8 7 6 5 4 3 2 1
";
    let parsed = parse_records(text.as_bytes()).unwrap();
    assert_eq!(parsed.samples.len(), 2);
    assert_eq!(parsed.skipped, 3);
    assert_eq!(parsed.samples[1].fields[0], 10.0);
}

#[test]
fn parse_record_tolerates_repeated_whitespace() {
    let s = parse_record("  0 0\t1.0  0 0 5   2.0 0 0 6 ").unwrap();
    assert_eq!(s.start(), [1.0, 0.0, 0.0]);
    assert_eq!(s.end_time(), 6.0);
}

#[test]
fn parse_record_reports_field_count() {
    let err = parse_record("1 2 3").unwrap_err();
    assert!(err.to_string().contains("found 3"));
}
