//! Chart builders for reviewing model performance and monthly finance
//! distributions.
//!
//! Each function returns an ECharts configuration built with charming; how
//! the chart is rendered (notebook, static page, server) is the caller's
//! concern.

use charming::{
    Chart,
    component::{Axis, Grid, Legend, Title},
    element::{AxisType, Tooltip, Trigger},
    series::{Line, Scatter},
};
use time::Month;

use crate::{features::percentile, finance::UserMonthFinance};

/// Which column of the finance table a chart summarises.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinanceColumn {
    /// Total incoming amount per user-month.
    Income,
    /// Total outgoing amount per user-month.
    Expenses,
    /// Income minus expenses per user-month.
    Net,
}

impl FinanceColumn {
    fn label(self) -> &'static str {
        match self {
            FinanceColumn::Income => "in",
            FinanceColumn::Expenses => "out",
            FinanceColumn::Net => "net",
        }
    }

    fn value(self, row: &UserMonthFinance) -> f64 {
        match self {
            FinanceColumn::Income => row.income,
            FinanceColumn::Expenses => row.expenses,
            FinanceColumn::Net => row.net,
        }
    }
}

/// A predicted-vs-true scatter chart for one regression model.
pub fn regressor_output_chart(y_true: &[f64], y_pred: &[f64], model_name: &str) -> Chart {
    let points: Vec<Vec<f64>> = y_true
        .iter()
        .zip(y_pred)
        .map(|(&truth, &prediction)| vec![truth, prediction])
        .collect();

    Chart::new()
        .title(
            Title::new()
                .text(format!("Regression performance of {model_name}"))
                .subtext("Predicted vs true"),
        )
        .tooltip(Tooltip::new().trigger(Trigger::Item))
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .contain_label(true),
        )
        .x_axis(Axis::new().type_(AxisType::Value).name("y_true"))
        .y_axis(Axis::new().type_(AxisType::Value).name("y_pred"))
        .series(Scatter::new().name(model_name).data(points))
}

/// A per-month summary of one finance column: mean and the 25th, 50th, 75th,
/// and 90th percentiles across users.
pub fn monthly_finance_chart(rows: &[UserMonthFinance], column: FinanceColumn) -> Chart {
    let months = sorted_months(rows);
    let labels: Vec<String> = months.iter().map(|&month| month_label(month)).collect();

    let mut means = Vec::with_capacity(months.len());
    let mut quantiles: Vec<Vec<f64>> = vec![Vec::new(); 4];

    for &month in &months {
        let mut values: Vec<f64> = rows
            .iter()
            .filter(|row| row.month == month)
            .map(|row| column.value(row))
            .collect();
        values.sort_by(f64::total_cmp);

        means.push(values.iter().sum::<f64>() / values.len() as f64);
        for (i, q) in [25.0, 50.0, 75.0, 90.0].into_iter().enumerate() {
            quantiles[i].push(percentile(&values, q));
        }
    }

    let mut chart = Chart::new()
        .title(Title::new().text(format!("Monthly {} distribution", column.label())))
        .tooltip(Tooltip::new().trigger(Trigger::Axis))
        .legend(Legend::new())
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .contain_label(true),
        )
        .x_axis(Axis::new().type_(AxisType::Category).data(labels))
        .y_axis(Axis::new().type_(AxisType::Value))
        .series(Line::new().name("mean").data(means));

    for (name, values) in ["q25", "q50", "q75", "q90"].into_iter().zip(quantiles) {
        chart = chart.series(Line::new().name(name).data(values));
    }

    chart
}

/// A per-holdout-month comparison of one metric across models.
///
/// `scores` pairs each model name with its score for every month in
/// `months`, in the same order.
pub fn model_comparison_chart(
    metric_name: &str,
    months: &[Month],
    scores: &[(String, Vec<f64>)],
) -> Chart {
    let labels: Vec<String> = months.iter().map(|&month| month_label(month)).collect();

    let mut chart = Chart::new()
        .title(Title::new().text(format!("Model comparison by {metric_name}")))
        .tooltip(Tooltip::new().trigger(Trigger::Axis))
        .legend(Legend::new())
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .contain_label(true),
        )
        .x_axis(Axis::new().type_(AxisType::Category).data(labels))
        .y_axis(Axis::new().type_(AxisType::Value).name(metric_name));

    for (model, values) in scores {
        chart = chart.series(Line::new().name(model).data(values.clone()));
    }

    chart
}

fn sorted_months(rows: &[UserMonthFinance]) -> Vec<Month> {
    let mut months: Vec<Month> = Vec::new();

    for row in rows {
        if !months.contains(&row.month) {
            months.push(row.month);
        }
    }

    months.sort_by_key(|&month| u8::from(month));
    months
}

fn month_label(month: Month) -> String {
    match month {
        Month::January => "Jan",
        Month::February => "Feb",
        Month::March => "Mar",
        Month::April => "Apr",
        Month::May => "May",
        Month::June => "Jun",
        Month::July => "Jul",
        Month::August => "Aug",
        Month::September => "Sep",
        Month::October => "Oct",
        Month::November => "Nov",
        Month::December => "Dec",
    }
    .to_string()
}

#[cfg(test)]
mod tests {
    use time::Month;

    use super::sorted_months;
    use crate::finance::UserMonthFinance;

    fn row(user_id: &str, month: Month) -> UserMonthFinance {
        UserMonthFinance {
            user_id: user_id.to_owned(),
            month,
            income: 10.0,
            count_in: 1,
            expenses: 0.0,
            count_out: 0,
            net: 10.0,
        }
    }

    #[test]
    fn sorted_months_are_unique_and_chronological() {
        let rows = vec![
            row("u1", Month::July),
            row("u2", Month::February),
            row("u3", Month::July),
            row("u4", Month::April),
        ];

        let months = sorted_months(&rows);

        assert_eq!(months, vec![Month::February, Month::April, Month::July]);
    }
}
