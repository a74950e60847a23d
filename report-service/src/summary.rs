use std::collections::BTreeMap;

use csv::StringRecord;

use crate::domain::{Averages, EquipmentRecord, SummaryResult};
use crate::error::ReportError;
use crate::loader::CsvTable;

pub const TYPE_COLUMN: &str = "type";
pub const FLOWRATE_COLUMN: &str = "flowrate";
pub const PRESSURE_COLUMN: &str = "pressure";
pub const TEMPERATURE_COLUMN: &str = "temperature";

pub const REQUIRED_COLUMNS: [&str; 4] = [
    TYPE_COLUMN,
    FLOWRATE_COLUMN,
    PRESSURE_COLUMN,
    TEMPERATURE_COLUMN,
];

struct ColumnLayout {
    equipment_type: usize,
    flowrate: usize,
    pressure: usize,
    temperature: usize,
}

impl ColumnLayout {
    fn resolve(table: &CsvTable) -> Result<Self, ReportError> {
        let index_of = |column: &str| {
            table
                .column_index(column)
                .ok_or_else(|| ReportError::SchemaError {
                    column: column.to_string(),
                })
        };

        Ok(Self {
            equipment_type: index_of(TYPE_COLUMN)?,
            flowrate: index_of(FLOWRATE_COLUMN)?,
            pressure: index_of(PRESSURE_COLUMN)?,
            temperature: index_of(TEMPERATURE_COLUMN)?,
        })
    }
}

/// Magnitude above which an f64 carries no fractional digits.
const NO_FRACTION_THRESHOLD: f64 = 1e15;

/// Round to two decimal places, halves away from zero.
///
/// Values too large to have a fractional part are returned unchanged, so
/// scaling by 100 cannot overflow.
pub fn round2(value: f64) -> f64 {
    if !value.is_finite() || value.abs() >= NO_FRACTION_THRESHOLD {
        return value;
    }
    (value * 100.0).round() / 100.0
}

fn column_average(sum: f64, count: f64, column: &str) -> Result<f64, ReportError> {
    let mean = sum / count;
    if !mean.is_finite() {
        return Err(ReportError::AverageOutOfRangeError {
            column: column.to_string(),
        });
    }
    Ok(round2(mean))
}

fn parse_numeric(
    record: &StringRecord,
    index: usize,
    column: &str,
    row: usize,
) -> Result<f64, ReportError> {
    let raw = record.get(index).unwrap_or("");
    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(ReportError::DataTypeError {
            column: column.to_string(),
            row,
            value: raw.to_string(),
        }),
    }
}

/// Validate the table and convert every row into an [`EquipmentRecord`].
///
/// Schema problems are reported before emptiness, and emptiness before cell
/// level type errors. Rows are numbered from 1, header excluded.
pub fn equipment_records(table: &CsvTable) -> Result<Vec<EquipmentRecord>, ReportError> {
    let layout = ColumnLayout::resolve(table)?;

    if table.is_empty() {
        return Err(ReportError::EmptyDatasetError);
    }

    table
        .rows()
        .iter()
        .enumerate()
        .map(|(i, record)| {
            let row = i + 1;
            Ok(EquipmentRecord {
                equipment_type: record.get(layout.equipment_type).unwrap_or("").to_string(),
                flowrate: parse_numeric(record, layout.flowrate, FLOWRATE_COLUMN, row)?,
                pressure: parse_numeric(record, layout.pressure, PRESSURE_COLUMN, row)?,
                temperature: parse_numeric(record, layout.temperature, TEMPERATURE_COLUMN, row)?,
            })
        })
        .collect()
}

pub fn summarize_records(records: &[EquipmentRecord]) -> Result<SummaryResult, ReportError> {
    if records.is_empty() {
        return Err(ReportError::EmptyDatasetError);
    }

    let mut type_distribution: BTreeMap<String, usize> = BTreeMap::new();
    let (mut flowrate, mut pressure, mut temperature) = (0.0, 0.0, 0.0);

    for record in records {
        *type_distribution
            .entry(record.equipment_type.clone())
            .or_insert(0) += 1;
        flowrate += record.flowrate;
        pressure += record.pressure;
        temperature += record.temperature;
    }

    let count = records.len() as f64;

    Ok(SummaryResult {
        total_count: records.len(),
        type_distribution,
        averages: Averages {
            flowrate: column_average(flowrate, count, FLOWRATE_COLUMN)?,
            pressure: column_average(pressure, count, PRESSURE_COLUMN)?,
            temperature: column_average(temperature, count, TEMPERATURE_COLUMN)?,
        },
    })
}

pub fn summarize(table: &CsvTable) -> Result<SummaryResult, ReportError> {
    let records = equipment_records(table)?;
    summarize_records(&records)
}

pub fn summarize_csv(content: &[u8]) -> Result<SummaryResult, ReportError> {
    let table = CsvTable::from_bytes(content)?;
    summarize(&table)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
type,flowrate,pressure,temperature
Pump,10.0,5.0,100
Valve,20.0,6.5,110
Pump,15.0,5.5,105
";

    #[test]
    fn summarizes_hand_computed_fixture() {
        let summary = summarize_csv(SAMPLE.as_bytes()).unwrap();

        assert_eq!(summary.total_count, 3);
        assert_eq!(summary.type_distribution.get("Pump"), Some(&2));
        assert_eq!(summary.type_distribution.get("Valve"), Some(&1));
        assert_eq!(summary.averages.flowrate, 15.0);
        assert_eq!(summary.averages.pressure, 5.67);
        assert_eq!(summary.averages.temperature, 105.0);
    }

    #[test]
    fn distribution_sums_to_total_count() {
        let fixtures = [
            SAMPLE.to_string(),
            "type,flowrate,pressure,temperature\nA,1,1,1\n".to_string(),
            (0..57)
                .map(|i| format!("T{},{},{},{}\n", i % 7, i, i * 2, i * 3))
                .fold(
                    "type,flowrate,pressure,temperature\n".to_string(),
                    |acc, line| acc + &line,
                ),
        ];

        for fixture in fixtures {
            let rows = fixture.lines().count() - 1;
            let summary = summarize_csv(fixture.as_bytes()).unwrap();
            assert_eq!(summary.total_count, rows);
            assert_eq!(
                summary.type_distribution.values().sum::<usize>(),
                summary.total_count
            );
        }
    }

    #[test]
    fn type_grouping_is_case_sensitive() {
        let csv = "type,flowrate,pressure,temperature\nPump,1,1,1\npump,1,1,1\nPUMP,1,1,1\n";
        let summary = summarize_csv(csv.as_bytes()).unwrap();
        assert_eq!(summary.type_distribution.len(), 3);
    }

    #[test]
    fn capitalized_headers_are_accepted() {
        let csv = "Type,Flowrate,Pressure,Temperature\nPump,2,4,6\n";
        let summary = summarize_csv(csv.as_bytes()).unwrap();
        assert_eq!(summary.averages.pressure, 4.0);
    }

    #[test]
    fn integer_and_float_cells_mix() {
        let csv = "type,flowrate,pressure,temperature\nPump,1,2.5,3\nPump, 2 ,3.5,4\n";
        let summary = summarize_csv(csv.as_bytes()).unwrap();
        assert_eq!(summary.averages.flowrate, 1.5);
        assert_eq!(summary.averages.pressure, 3.0);
        assert_eq!(summary.averages.temperature, 3.5);
    }

    #[test]
    fn averages_round_to_two_decimals() {
        let csv = "type,flowrate,pressure,temperature\nA,1,0,0\nA,1,0,0\nA,2,0,0\n";
        let summary = summarize_csv(csv.as_bytes()).unwrap();
        assert_eq!(summary.averages.flowrate, 1.33);
        assert_eq!(round2(2.0 / 3.0), 0.67);
        assert_eq!(round2(-2.0 / 3.0), -0.67);
    }

    #[test]
    fn huge_averages_stay_finite() {
        assert_eq!(round2(1e307), 1e307);
        assert_eq!(round2(-1e307), -1e307);
        assert_eq!(round2(f64::MAX), f64::MAX);

        let csv = "type,flowrate,pressure,temperature\nPump,1e307,1,1\n";
        let summary = summarize_csv(csv.as_bytes()).unwrap();
        assert_eq!(summary.averages.flowrate, 1e307);
        assert!(summary.averages.flowrate.is_finite());
    }

    #[test]
    fn overflowing_column_sum_is_rejected() {
        let csv = "type,flowrate,pressure,temperature\nPump,1,1e308,1\nPump,1,1e308,1\n";
        match summarize_csv(csv.as_bytes()) {
            Err(ReportError::AverageOutOfRangeError { column }) => assert_eq!(column, "pressure"),
            other => panic!("expected out of range error, got {:?}", other),
        }
    }

    #[test]
    fn missing_column_is_a_schema_error() {
        let csv = "type,flowrate,temperature\nPump,1,3\n";
        match summarize_csv(csv.as_bytes()) {
            Err(ReportError::SchemaError { column }) => assert_eq!(column, "pressure"),
            other => panic!("expected schema error, got {:?}", other),
        }
    }

    #[test]
    fn empty_file_is_a_schema_error() {
        match summarize_csv(b"") {
            Err(ReportError::SchemaError { column }) => assert_eq!(column, "type"),
            other => panic!("expected schema error, got {:?}", other),
        }
    }

    #[test]
    fn header_only_is_an_empty_dataset() {
        let result = summarize_csv(b"type,flowrate,pressure,temperature\n");
        assert!(matches!(result, Err(ReportError::EmptyDatasetError)));
    }

    #[test]
    fn non_numeric_cell_names_column_and_row() {
        let csv = "type,flowrate,pressure,temperature\nPump,1,1,1\nPump,1,high,1\n";
        match summarize_csv(csv.as_bytes()) {
            Err(ReportError::DataTypeError { column, row, value }) => {
                assert_eq!(column, "pressure");
                assert_eq!(row, 2);
                assert_eq!(value, "high");
            }
            other => panic!("expected data type error, got {:?}", other),
        }
    }

    #[test]
    fn empty_and_non_finite_cells_are_rejected() {
        let empty = "type,flowrate,pressure,temperature\nPump,,1,1\n";
        assert!(matches!(
            summarize_csv(empty.as_bytes()),
            Err(ReportError::DataTypeError { .. })
        ));

        let nan = "type,flowrate,pressure,temperature\nPump,1,NaN,1\n";
        assert!(matches!(
            summarize_csv(nan.as_bytes()),
            Err(ReportError::DataTypeError { .. })
        ));
    }

    #[test]
    fn summarizing_no_records_is_rejected() {
        assert!(matches!(
            summarize_records(&[]),
            Err(ReportError::EmptyDatasetError)
        ));
    }
}
