use crate::format::{BenchmarkReport, VariantSummary};
use crate::output::Theme;
use rich_rust::prelude::*;

/// Renders per-variant statistics as a table, one row per variant.
pub struct SummaryTable<'a> {
    title: String,
    rows: &'a [VariantSummary],
    theme: &'a Theme,
}

impl<'a> SummaryTable<'a> {
    pub fn new(title: impl Into<String>, rows: &'a [VariantSummary], theme: &'a Theme) -> Self {
        Self {
            title: title.into(),
            rows,
            theme,
        }
    }

    #[must_use]
    pub fn from_report(report: &'a BenchmarkReport, theme: &'a Theme) -> Self {
        let title = format!(
            "{} iterations, {} warmup{} discarded",
            report.iterations,
            report.discarded,
            if report.discarded == 1 { "" } else { "s" }
        );
        Self::new(title, &report.variants, theme)
    }

    #[must_use]
    pub fn build(&self) -> Table {
        let mut table = Table::new()
            .box_style(self.theme.box_style)
            .border_style(self.theme.table_border.clone())
            .title(Text::styled(&self.title, self.theme.table_title.clone()));

        table = table.with_column(Column::new("Variant").min_width(8));
        for name in ["Mean (ms)", "Median (ms)", "Min (ms)", "Max (ms)"] {
            table = table.with_column(
                Column::new(name)
                    .justify(JustifyMethod::Right)
                    .min_width(10),
            );
        }
        table = table.with_column(
            Column::new("Runs")
                .justify(JustifyMethod::Right)
                .min_width(4),
        );

        for row in self.rows {
            table.add_row(Row::new(vec![
                Cell::new(Text::styled(
                    &row.label,
                    self.theme.variant_style(row.flag),
                )),
                Cell::new(Text::new(format!("{:.2}", row.mean_ms))),
                Cell::new(Text::new(format!("{:.2}", row.median_ms))),
                Cell::new(Text::new(format!("{:.2}", row.min_ms))),
                Cell::new(Text::new(format!("{:.2}", row.max_ms))),
                Cell::new(Text::new(row.runs.to_string())),
            ]));
        }

        table
    }
}
