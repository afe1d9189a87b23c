use serde::Deserialize;

use crate::{
    cleanup::{
        header::{DEFAULT_EXPECTED_HEADER, DEFAULT_NOISE_PATTERNS, HeaderRules},
        metric::{
            DEFAULT_DENOMINATOR_LABELS, DEFAULT_METRIC_COLUMN, DEFAULT_NUMERATOR_LABELS,
            PercentageMetric,
        },
        subtotal::DEFAULT_SUBTOTAL_MARKER,
        summary::{DEFAULT_SUMMARY_FIELDS, SummaryFields},
    },
    error::ConfigError,
    locator::{ExtractionMethod, TableArea, TableRegion},
};

/// Extraction and cleanup parameters for the invoices of a single provider.
#[derive(Clone, Debug)]
pub struct Provider {
    pub id: String,
    /// Display name. Its lowercase form names the directory holding the provider's PDFs.
    pub name: String,
    /// Region of the itemised billing table.
    pub table: TableRegion,
    /// Region of the summary table, and the fields to take from it.
    pub summary: Option<(TableRegion, SummaryFields)>,
    /// If `false`, the extracted grid is output without cleanup.
    pub fix: bool,
    pub header: HeaderRules,
    pub subtotal_marker: String,
    pub metric: PercentageMetric,
}

impl Provider {
    pub fn pdf_dir_name(&self) -> String {
        self.name.to_lowercase()
    }
}

#[derive(Deserialize, Debug)]
pub(super) struct YamlProvider {
    name: String,
    #[serde(default = "default_page")]
    page: i32,
    #[serde(default)]
    flavor: ExtractionMethod,
    table_area: TableArea,
    #[serde(default)]
    columns: Vec<f32>,
    #[serde(default)]
    strip_text: String,
    #[serde(default)]
    password: Option<String>,
    #[serde(default = "default_true")]
    fix: bool,
    #[serde(default)]
    header_area: Option<TableArea>,
    #[serde(default)]
    header_columns: Vec<f32>,
    #[serde(default = "default_summary_fields")]
    summary_fields: Vec<String>,
    #[serde(default = "default_summary_row")]
    summary_row: usize,
    #[serde(default = "default_expected_header")]
    expected_header: Vec<String>,
    #[serde(default = "default_noise_patterns")]
    noise_patterns: Vec<String>,
    #[serde(default = "default_subtotal_marker")]
    subtotal_marker: String,
    #[serde(default = "default_label_column")]
    label_column: String,
    #[serde(default = "default_value_column")]
    value_column: String,
    #[serde(default)]
    metric: YamlMetric,
}

#[derive(Deserialize, Debug)]
struct YamlMetric {
    #[serde(default = "default_metric_column")]
    column: String,
    #[serde(default = "default_numerator")]
    numerator: Vec<String>,
    #[serde(default = "default_denominator")]
    denominator: Vec<String>,
}

impl Default for YamlMetric {
    fn default() -> Self {
        Self {
            column: default_metric_column(),
            numerator: default_numerator(),
            denominator: default_denominator(),
        }
    }
}

fn default_page() -> i32 {
    1
}

fn default_true() -> bool {
    true
}

fn default_summary_fields() -> Vec<String> {
    DEFAULT_SUMMARY_FIELDS.map(String::from).to_vec()
}

fn default_summary_row() -> usize {
    1
}

fn default_expected_header() -> Vec<String> {
    DEFAULT_EXPECTED_HEADER.map(String::from).to_vec()
}

fn default_noise_patterns() -> Vec<String> {
    DEFAULT_NOISE_PATTERNS.map(String::from).to_vec()
}

fn default_subtotal_marker() -> String {
    DEFAULT_SUBTOTAL_MARKER.to_string()
}

fn default_label_column() -> String {
    "Itens_de_Fatura".to_string()
}

fn default_value_column() -> String {
    "Valor_(R$)".to_string()
}

fn default_metric_column() -> String {
    DEFAULT_METRIC_COLUMN.to_string()
}

fn default_numerator() -> Vec<String> {
    DEFAULT_NUMERATOR_LABELS.map(String::from).to_vec()
}

fn default_denominator() -> Vec<String> {
    DEFAULT_DENOMINATOR_LABELS.map(String::from).to_vec()
}

impl YamlProvider {
    /// Validates and creates a [Provider] from self. `id` is the key of the provider within the
    /// configuration.
    pub(super) fn prepare(self, id: String) -> Result<Provider, ConfigError> {
        let invalid = |reason: String| ConfigError::InvalidProvider {
            provider: id.clone(),
            reason,
        };

        if !self.table_area.is_valid() {
            return Err(invalid(format!("table_area {:?} is inverted", self.table_area)));
        }
        if let Some(area) = &self.header_area {
            if !area.is_valid() {
                return Err(invalid(format!("header_area {area:?} is inverted")));
            }
        }
        if self.header_area.is_some()
            && !self.header_columns.is_empty()
            && self.header_columns.len() + 1 < self.summary_fields.len()
        {
            return Err(invalid(format!(
                "{} header column boundaries make {} columns, too few for {} summary_fields",
                self.header_columns.len(),
                self.header_columns.len() + 1,
                self.summary_fields.len(),
            )));
        }
        if !self.columns.is_empty() && self.columns.len() + 1 != self.expected_header.len() {
            return Err(invalid(format!(
                "{} column boundaries make {} columns, but expected_header has {} names",
                self.columns.len(),
                self.columns.len() + 1,
                self.expected_header.len(),
            )));
        }
        for column in [&self.label_column, &self.value_column] {
            if !self.expected_header.contains(column) {
                return Err(invalid(format!("{column:?} is not in expected_header")));
            }
        }
        if self.expected_header.contains(&self.metric.column) {
            return Err(invalid(format!(
                "metric column {:?} clashes with expected_header",
                self.metric.column
            )));
        }

        let region = |area: TableArea, mut columns: Vec<f32>| {
            columns.sort_by(f32::total_cmp);
            TableRegion {
                page: self.page,
                method: self.flavor,
                area,
                columns,
                strip_text: self.strip_text.clone(),
                password: self.password.clone(),
            }
        };
        let table = region(self.table_area, self.columns.clone());
        let summary = self.header_area.map(|area| {
            (
                region(area, self.header_columns.clone()),
                SummaryFields {
                    names: self.summary_fields.clone(),
                    row: self.summary_row,
                },
            )
        });

        Ok(Provider {
            name: self.name,
            table,
            summary,
            fix: self.fix,
            header: HeaderRules {
                expected_header: self.expected_header,
                required_column: self.value_column.clone(),
                noise_patterns: self.noise_patterns,
            },
            subtotal_marker: self.subtotal_marker,
            metric: PercentageMetric {
                column: self.metric.column,
                label_column: self.label_column,
                value_column: self.value_column,
                numerator: self.metric.numerator,
                denominator: self.metric.denominator,
            },
            id,
        })
    }
}
