//! Export of a cleaned [`Dataset`] into a typed polars [`DataFrame`].

use crate::profiler::parse_datetime;
use crate::types::{CellValue, ColumnType, Dataset};
use crate::utils::parse_number;
use polars::prelude::*;
use tracing::debug;

fn numeric_value(value: &CellValue) -> Option<f64> {
    match value {
        CellValue::Number(n) => Some(*n),
        CellValue::Text(s) => parse_number(s),
        CellValue::Null => None,
    }
}

fn timestamp_millis(value: &CellValue) -> Option<i64> {
    let text = value.display_text()?;
    parse_datetime(&text).map(|dt| dt.and_utc().timestamp_millis())
}

impl Dataset {
    /// Convert into a [`DataFrame`] with one typed column per dataset column.
    ///
    /// - `numeric` → `Float64`; text that does not parse as a number is null
    /// - `date` → `Datetime(ms)`; unparseable values are null
    /// - `categorical`/`text` → `String` using each value's string form
    pub fn to_dataframe(&self) -> PolarsResult<DataFrame> {
        let mut columns: Vec<Column> = Vec::with_capacity(self.columns.len());

        for (idx, column) in self.columns.iter().enumerate() {
            let name: PlSmallStr = column.name.as_str().into();
            let values = self.rows.iter().map(|row| row.get_index(idx).unwrap_or(&CellValue::Null));

            let series = match column.column_type {
                ColumnType::Numeric => {
                    let data: Vec<Option<f64>> = values.map(numeric_value).collect();
                    Series::new(name, data)
                }
                ColumnType::Date => {
                    let data: Vec<Option<i64>> = values.map(timestamp_millis).collect();
                    Series::new(name, data).cast(&DataType::Datetime(TimeUnit::Milliseconds, None))?
                }
                ColumnType::Categorical | ColumnType::Text => {
                    let data: Vec<Option<String>> = values
                        .map(|v| v.display_text().map(|s| s.into_owned()))
                        .collect();
                    Series::new(name, data)
                }
            };

            columns.push(series.into());
        }

        let df = DataFrame::new(columns)?;
        debug!("Exported dataset to a {}x{} DataFrame", df.height(), df.width());
        Ok(df)
    }
}
