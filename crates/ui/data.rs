use unicode_width::UnicodeWidthStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Bar,
    Pie,
}

impl ChartKind {
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "bar" => Some(ChartKind::Bar),
            "pie" => Some(ChartKind::Pie),
            _ => None,
        }
    }

    pub fn toggle(&self) -> Self {
        match self {
            ChartKind::Bar => ChartKind::Pie,
            ChartKind::Pie => ChartKind::Bar,
        }
    }
}

/// One chart slice: a hierarchy label and one value per series.
#[derive(Debug, Clone, PartialEq)]
pub struct SliceRow {
    pub label: String,
    pub values: Vec<f64>,
}

/// Standardized chart input: title, series names in display order, and one
/// row per hierarchy key. An empty `rows` is valid and renders as a
/// neutral notice.
#[derive(Debug, Clone)]
pub struct Figure {
    pub title: String,
    pub series: Vec<String>,
    pub rows: Vec<SliceRow>,
    pub kind: ChartKind,
}

impl Figure {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// A multi-series comparison has no pie form; it renders as grouped
    /// bars whatever the requested kind.
    pub fn effective_kind(&self) -> ChartKind {
        if self.series.len() > 1 {
            ChartKind::Bar
        } else {
            self.kind
        }
    }

    pub fn max_value(&self) -> f64 {
        self.rows
            .iter()
            .flat_map(|row| row.values.iter().copied())
            .fold(0.0, f64::max)
    }

    /// (label, value, percent-of-total) over the first series, for the pie
    /// rendering. An all-zero series yields zero percents.
    pub fn shares(&self) -> Vec<(String, f64, f64)> {
        let total: f64 = self.rows.iter().filter_map(|row| row.values.first()).sum();
        self.rows
            .iter()
            .map(|row| {
                let value = row.values.first().copied().unwrap_or(0.0);
                let percent = if total > 0.0 { value / total * 100.0 } else { 0.0 };
                (row.label.clone(), value, percent)
            })
            .collect()
    }
}

/// Counts use no decimals, rates and household sizes keep two.
pub fn format_value(value: f64) -> String {
    if value.fract().abs() < 1e-9 {
        format!("{:.0}", value)
    } else {
        format!("{:.2}", value)
    }
}

/// Column widths for the full-table rendering: the label column plus one
/// column per series, each wide enough for its header and values.
pub fn table_constraint_len_calculator(figure: &Figure) -> Vec<u16> {
    let label_len = figure
        .rows
        .iter()
        .map(|row| UnicodeWidthStr::width(row.label.as_str()))
        .max()
        .unwrap_or(0);
    let mut widths = vec![label_len];
    for (i, name) in figure.series.iter().enumerate() {
        let value_len = figure
            .rows
            .iter()
            .map(|row| format_value(row.values.get(i).copied().unwrap_or(0.0)).len())
            .max()
            .unwrap_or(0);
        widths.push(value_len.max(UnicodeWidthStr::width(name.as_str())));
    }

    #[allow(clippy::cast_possible_truncation)]
    widths.into_iter().map(|len| len as u16).collect()
}

pub fn constraint_len_calculator(shares: &[(String, f64, f64)]) -> (u16, u16, u16) {
    let label_len = shares
        .iter()
        .map(|(label, _, _)| UnicodeWidthStr::width(label.as_str()))
        .max()
        .unwrap_or(0);
    let value_len = shares
        .iter()
        .map(|(_, value, _)| format_value(*value).len())
        .max()
        .unwrap_or(0);
    let share_len = shares
        .iter()
        .map(|(_, _, percent)| format!("{:.1}%", percent).len())
        .max()
        .unwrap_or(0);

    #[allow(clippy::cast_possible_truncation)]
    (label_len as u16, value_len as u16, share_len as u16)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn figure() -> Figure {
        Figure {
            title: "Total Population by Province".to_string(),
            series: vec!["TOTAL POPULATION".to_string()],
            rows: vec![
                SliceRow {
                    label: "Punjab".to_string(),
                    values: vec![300.0],
                },
                SliceRow {
                    label: "Sindh".to_string(),
                    values: vec![100.0],
                },
            ],
            kind: ChartKind::Pie,
        }
    }

    #[test]
    fn shares_sum_to_one_hundred_percent() {
        let shares = figure().shares();
        assert_eq!(shares.len(), 2);
        assert_eq!(shares[0], ("Punjab".to_string(), 300.0, 75.0));
        assert_eq!(shares[1], ("Sindh".to_string(), 100.0, 25.0));
        let total: f64 = shares.iter().map(|(_, _, percent)| percent).sum();
        assert_eq!(total, 100.0);
    }

    #[test]
    fn comparison_figures_never_render_as_pie() {
        let mut fig = figure();
        assert_eq!(fig.effective_kind(), ChartKind::Pie);
        fig.series.push("MALE (RURAL)".to_string());
        assert_eq!(fig.effective_kind(), ChartKind::Bar);
    }

    #[test]
    fn empty_figure_shares_are_empty() {
        let mut fig = figure();
        fig.rows.clear();
        assert!(fig.is_empty());
        assert!(fig.shares().is_empty());
        assert_eq!(fig.max_value(), 0.0);
    }

    #[test]
    fn format_value_keeps_decimals_for_rates() {
        assert_eq!(format_value(33080.0), "33080");
        assert_eq!(format_value(2.43), "2.43");
    }

    #[test]
    fn constraint_len_calculator() {
        let shares = figure().shares();
        let (label_len, value_len, share_len) = super::constraint_len_calculator(&shares);
        assert_eq!(6, label_len);
        assert_eq!(3, value_len);
        assert_eq!(5, share_len);
    }

    #[test]
    fn table_constraint_len_calculator() {
        let mut fig = figure();
        fig.series.push("MALE (RURAL)".to_string());
        fig.rows[0].values.push(150.0);
        fig.rows[1].values.push(50.0);
        // "TOTAL POPULATION" and "MALE (RURAL)" headers outsize the values.
        let widths = super::table_constraint_len_calculator(&fig);
        assert_eq!(widths, vec![6, 16, 12]);
    }
}
