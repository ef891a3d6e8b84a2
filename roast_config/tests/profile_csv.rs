use roast_config::{load_profile_csv, write_profile_csv};
use std::io::Write;
use tempfile::tempdir;

#[test]
fn written_profiles_load_back() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("roast.csv");

    let time = [0.0, 1.0, 2.0];
    let cold = [19.5, 19.6, 19.7];
    let hot = [20.0, 25.0, 40.0];
    let cracks = [false, false, true];
    write_profile_csv(&path, &time, &cold, &hot, &cracks).expect("write CSV");

    let cols = load_profile_csv(&path).expect("load CSV");
    assert_eq!(cols.time, time);
    assert_eq!(cols.cold, cold);
    assert_eq!(cols.hot, hot);
    assert_eq!(cols.cracks, cracks);
}

#[test]
fn header_row_comes_first() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("roast.csv");
    write_profile_csv(&path, &[0.0], &[19.5], &[20.0], &[false]).expect("write CSV");

    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.starts_with("time,cold,hot,cracks"));
}

#[test]
fn rejects_unequal_columns() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("roast.csv");
    let err = write_profile_csv(&path, &[0.0, 1.0], &[19.5], &[20.0], &[false])
        .expect_err("unequal columns");
    assert!(format!("{err}").contains("equal length"));
}

#[test]
fn rejects_wrong_headers() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bad.csv");
    let mut f = std::fs::File::create(&path).unwrap();
    writeln!(f, "time,hot,cold,cracks").unwrap();
    writeln!(f, "0,20.0,19.5,0").unwrap();

    let err = load_profile_csv(&path).expect_err("wrong header order");
    assert!(format!("{err}").contains("must have headers 'time,cold,hot,cracks'"));
}

#[test]
fn rejects_non_flag_crack_values() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bad.csv");
    let mut f = std::fs::File::create(&path).unwrap();
    writeln!(f, "time,cold,hot,cracks").unwrap();
    writeln!(f, "0,19.5,20.0,2").unwrap();

    let err = load_profile_csv(&path).expect_err("crack flag out of range");
    assert!(format!("{err}").contains("cracks must be 0 or 1"));
}
