use climate_forecast::data::{DataLoader, SeriesProvider, TimeSeries};
use climate_forecast::AnalysisError;
use pretty_assertions::assert_eq;
use rstest::rstest;
use std::io::Write;
use tempfile::{tempdir, NamedTempFile};
use weather_data::{Month, MonthlyClimateGenerator};

const HEADER: &str = "Year,Jan,Feb,Mar,Apr,May,Jun,Jul,Aug,Sep,Oct,Nov,Dec";

#[test]
fn test_load_table_from_csv() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "{}", HEADER).unwrap();
    writeln!(file, "2000,20.1,22.0,25.3,28.0,32.2,30.0,28.1,27.0,26.4,24.0,22.2,20.5").unwrap();
    writeln!(file, "2001,19.8,22.4,24.9,27.6,31.9,30.3,27.7,27.2,26.0,23.8,21.9,20.1").unwrap();
    writeln!(file, "2002,20.6,21.7,25.1,28.3,32.5,29.8,28.4,26.9,26.2,24.3,22.0,20.9").unwrap();

    let table = DataLoader::from_csv(file.path()).unwrap();
    assert_eq!(table.len(), 3);
    assert_eq!(table.years(), &[2000, 2001, 2002]);
    assert_eq!(table.column(Month::Jan), &[20.1, 19.8, 20.6]);

    let may = table.month_series(Month::May).unwrap();
    assert_eq!(may.values(), &[32.2, 31.9, 32.5]);
}

#[test]
fn test_single_month_csv() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "year,January").unwrap();
    writeln!(file, "1990,18").unwrap();
    writeln!(file, "1991,19.5").unwrap();

    let series = DataLoader::series_from_csv(file.path(), Month::Jan).unwrap();
    assert_eq!(series.periods(), &[1990, 1991]);
    assert_eq!(series.values(), &[18.0, 19.5]);

    assert!(matches!(
        DataLoader::series_from_csv(file.path(), Month::Feb),
        Err(AnalysisError::DataError(_))
    ));
}

#[test]
fn test_month_columns_need_exact_names() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "Year,Marketing,Mar,Mayor").unwrap();
    writeln!(file, "1990,1.0,25.0,7.0").unwrap();
    writeln!(file, "1991,2.0,26.5,8.0").unwrap();

    let march = DataLoader::series_from_csv(file.path(), Month::Mar).unwrap();
    assert_eq!(march.values(), &[25.0, 26.5]);

    assert!(matches!(
        DataLoader::series_from_csv(file.path(), Month::May),
        Err(AnalysisError::DataError(_))
    ));
}

#[test]
fn test_csv_round_trip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("climate.csv");
    let table = MonthlyClimateGenerator::new(42).generate().unwrap();

    DataLoader::write_csv(&table, &path).unwrap();
    let loaded = DataLoader::from_csv(&path).unwrap();

    assert_eq!(loaded.years(), table.years());
    for month in Month::ALL {
        for (a, b) in loaded.column(month).iter().zip(table.column(month)) {
            assert!((a - b).abs() < 1e-9);
        }
    }
}

#[test]
fn test_missing_year_column() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "Jan,Feb").unwrap();
    writeln!(file, "20.0,22.0").unwrap();

    assert!(matches!(
        DataLoader::series_from_csv(file.path(), Month::Jan),
        Err(AnalysisError::DataError(_))
    ));
}

#[test]
fn test_missing_file() {
    let result = DataLoader::from_csv("/nonexistent/climate.csv");
    assert!(matches!(result, Err(AnalysisError::Io(_))));
}

#[test]
fn test_series_slicing() {
    let series = TimeSeries::from_values(1920, (0..10).map(f64::from).collect()).unwrap();
    let middle = series.slice(2, 5).unwrap();

    assert_eq!(middle.periods(), &[1922, 1923, 1924]);
    assert!(series.slice(5, 5).is_err());
    assert!(series.slice(0, 11).is_err());
}

#[rstest]
#[case::empty(r#"{"periods":[],"values":[]}"#)]
#[case::length_mismatch(r#"{"periods":[2000,2001],"values":[1.0,2.0,3.0]}"#)]
#[case::unordered(r#"{"periods":[2001,2000],"values":[1.0,2.0]}"#)]
fn test_deserialized_series_is_validated(#[case] json: &str) {
    let err = serde_json::from_str::<TimeSeries>(json).unwrap_err();
    assert!(err.to_string().contains("Data error"), "{}", err);
}

#[test]
fn test_series_json_round_trip() {
    let series = TimeSeries::new(vec![1999, 2001], vec![1.5, -0.5]).unwrap();
    let json = serde_json::to_string(&series).unwrap();
    let back: TimeSeries = serde_json::from_str(&json).unwrap();

    assert_eq!(back, series);
    assert_eq!(back.last_period(), 2001);
}

#[test]
fn test_consecutive_years_must_be_representable() {
    let last = TimeSeries::from_values(i32::MAX - 1, vec![1.0, 2.0]).unwrap();
    assert_eq!(last.last_period(), i32::MAX);

    assert!(matches!(
        TimeSeries::from_values(i32::MAX - 1, vec![1.0, 2.0, 3.0]),
        Err(AnalysisError::DataError(_))
    ));
}
