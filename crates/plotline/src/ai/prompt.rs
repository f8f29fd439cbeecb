//! Prompt construction and response parsing shared by the chart advisors.

use crate::chart::{ChartRequest, ChartSpec, ChartType};
use crate::utils::truncate_str;
use anyhow::{Result, anyhow};
use tracing::debug;

/// Longest response excerpt quoted in a parse error.
const ERROR_EXCERPT_CHARS: usize = 200;

/// Build the chart-recommendation prompt for `request`.
pub fn build_chart_prompt(request: &ChartRequest<'_>) -> Result<String> {
    let columns = request
        .columns
        .iter()
        .map(|c| format!("{} ({})", c.name, c.column_type))
        .collect::<Vec<_>>()
        .join(", ");
    let rows = serde_json::to_string_pretty(&request.rows)?;
    let chart_types = ChartType::ALL
        .iter()
        .map(|t| format!("\"{}\"", t.as_str()))
        .collect::<Vec<_>>()
        .join(" | ");

    Ok(format!(
        "You are a data visualization expert. Look at this dataset and recommend \
         the chart that best shows it.\n\n\
         COLUMNS (name and type):\n{columns}\n\n\
         SAMPLE ROWS ({count} shown):\n{rows}\n\n\
         Respond with ONLY a JSON object of exactly this shape:\n\
         {{\n\
         \x20 \"chart_type\": {chart_types},\n\
         \x20 \"x\": \"column for the x-axis\",\n\
         \x20 \"y\": \"column for the primary y-axis\",\n\
         \x20 \"y2\": \"column for a secondary y-axis, or null\",\n\
         \x20 \"size\": \"column encoded as bubble size, or null\",\n\
         \x20 \"color\": \"column encoded as color or group, or null\",\n\
         \x20 \"title\": \"chart title\",\n\
         \x20 \"x_label\": \"x-axis label\",\n\
         \x20 \"y_label\": \"y-axis label\",\n\
         \x20 \"reasoning\": \"two or three sentences on why this chart fits\"\n\
         }}\n\n\
         RULES:\n\
         - Bar charts for comparing a numeric column across categories\n\
         - Line charts when one axis is a date or time\n\
         - Scatter or bubble charts when two or more numeric columns are worth comparing\n\
         - Histograms for the distribution of a single numeric column\n\
         - Pie charts only for fewer than 7 categories that sum to a meaningful whole\n\
         - Use exact column names from the list above, never invented ones",
        count = request.rows.len(),
    ))
}

/// Remove Markdown code fences around a model response.
fn strip_code_fences(text: &str) -> String {
    text.replace("```json", "").replace("```", "").trim().to_string()
}

/// Parse a model response into a [`ChartSpec`].
///
/// Code fences are stripped first. If the remainder is not a JSON object,
/// the outermost `{...}` slice is tried before giving up.
pub fn parse_chart_spec(response: &str) -> Result<ChartSpec> {
    let cleaned = strip_code_fences(response);

    let first_err = match serde_json::from_str::<ChartSpec>(&cleaned) {
        Ok(spec) => return Ok(spec),
        Err(e) => e,
    };

    if let (Some(start), Some(end)) = (cleaned.find('{'), cleaned.rfind('}')) {
        if start < end {
            debug!("Retrying chart spec parse on the embedded JSON object");
            if let Ok(spec) = serde_json::from_str::<ChartSpec>(&cleaned[start..=end]) {
                return Ok(spec);
            }
        }
    }

    Err(anyhow!(
        "Could not parse chart spec ({}): {}",
        first_err,
        truncate_str(&cleaned, ERROR_EXCERPT_CHARS)
    ))
}
