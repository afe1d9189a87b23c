use crate::{
    error::CleanupError,
    table::{Cell, InvoiceTable},
    textutil::contains_ignore_case,
};

pub const DEFAULT_METRIC_COLUMN: &str = "percentual_cip";
pub const DEFAULT_NUMERATOR_LABELS: [&str; 1] = ["CIP ILUM PUB PREF MUNICIPAL"];
pub const DEFAULT_DENOMINATOR_LABELS: [&str; 2] =
    ["Energia Ativa Fornecida TE", "Energia Ativa Fornecida TUSD"];

/// Percentage of the line items matching `numerator` relative to those matching `denominator`.
///
/// A line item matches a label if its text in `label_column` contains the label, ignoring case.
#[derive(Clone, Debug, PartialEq)]
pub struct PercentageMetric {
    /// Column that receives the percentage.
    pub column: String,
    pub label_column: String,
    /// Column holding numeric values, see [super::money::normalize_monetary].
    pub value_column: String,
    pub numerator: Vec<String>,
    pub denominator: Vec<String>,
}

/// Values that went into a [PercentageMetric].
#[derive(Clone, Debug, PartialEq)]
pub struct MetricReport {
    pub numerator: Vec<LabelSum>,
    pub denominator: Vec<LabelSum>,
    pub percentage: f64,
}

impl MetricReport {
    pub fn numerator_total(&self) -> f64 {
        self.numerator.iter().map(|sum| sum.total).sum()
    }

    pub fn denominator_total(&self) -> f64 {
        self.denominator.iter().map(|sum| sum.total).sum()
    }
}

/// Numeric values of the line items matching a single label.
#[derive(Clone, Debug, PartialEq)]
pub struct LabelSum {
    pub label: String,
    pub values: Vec<f64>,
    pub total: f64,
}

/// Computes `metric` over `table`, writing the percentage into its column on the records matching
/// any numerator label. Every other record has no value in that column.
///
/// The percentage is `0` when the denominator total is not positive.
pub fn apply_percentage_metric(
    table: &mut InvoiceTable,
    metric: &PercentageMetric,
) -> Result<MetricReport, CleanupError> {
    let label_index = require_column(table, &metric.label_column)?;
    let value_index = require_column(table, &metric.value_column)?;

    let sum_label = |label: &String| -> LabelSum {
        let values: Vec<f64> = table
            .records()
            .iter()
            .filter(|record| label_matches(&record[label_index], label))
            .filter_map(|record| record[value_index].as_number())
            .collect();
        if values.is_empty() {
            log::info!("No line item {label:?} found.");
        } else {
            log::info!("Values of line item {label:?}: {values:?}.");
        }
        LabelSum {
            label: label.clone(),
            total: values.iter().sum(),
            values,
        }
    };
    let denominator: Vec<LabelSum> = metric.denominator.iter().map(&sum_label).collect();
    let numerator: Vec<LabelSum> = metric.numerator.iter().map(&sum_label).collect();

    let mut report = MetricReport {
        numerator,
        denominator,
        percentage: 0.0,
    };
    let numerator_total = report.numerator_total();
    let denominator_total = report.denominator_total();
    log::info!("Sum of {:?}: {denominator_total}.", metric.denominator);

    if denominator_total > 0.0 {
        report.percentage = numerator_total / denominator_total * 100.0;
        log::info!(
            "{:?} is {:.2}% of {:?}.",
            metric.numerator,
            report.percentage,
            metric.denominator
        );
    } else {
        log::warn!(
            "Sum of {:?} is not positive, so {} is set to 0.",
            metric.denominator,
            metric.column
        );
    }

    let metric_index = table.ensure_column(&metric.column);
    for record in table.records_mut() {
        let matches_numerator = metric
            .numerator
            .iter()
            .any(|label| label_matches(&record[label_index], label));
        record[metric_index] = if matches_numerator {
            Cell::Number(report.percentage)
        } else {
            Cell::Missing
        };
    }

    Ok(report)
}

fn require_column(table: &InvoiceTable, column: &str) -> Result<usize, CleanupError> {
    table
        .column_index(column)
        .ok_or_else(|| CleanupError::MissingColumn(column.to_string()))
}

fn label_matches(cell: &Cell, label: &str) -> bool {
    cell.as_text()
        .is_some_and(|text| contains_ignore_case(text, label))
}
