//! Conversion of a ranking into a bar chart description.

use log::debug;

pub use crate::config::*;

/// The categorical palette used to fill the bars (Tableau 10).
pub const PALETTE: [&str; 10] = [
    "#4c78a8", "#f58518", "#e45756", "#72b7b2", "#54a24b", "#eeca3b", "#b279a2", "#ff9da6",
    "#9d755d", "#bab0ac",
];

/// The headroom added above the largest bar.
pub const DOMAIN_PADDING: f64 = 1.1;

pub const VALUE_TITLE: &str = "Percentage";

/// The upper bound of the value axis for the given values: the largest value
/// times [`DOMAIN_PADDING`], or 0 when there is no value.
pub fn domain_upper_bound(values: &[f64]) -> f64 {
    values
        .iter()
        .cloned()
        .reduce(f64::max)
        .map(|max| max * DOMAIN_PADDING)
        .unwrap_or(0.0)
}

/// Describes the ranking as a horizontal bar chart.
///
/// The bars follow the order of the ranking (largest first). Every identifier gets its
/// own color; the colors are distinct for up to ten bars. An empty ranking gives a chart
/// without bars and a `[0, 0]` value axis.
pub fn build_spec(ranked: &RankedSubset, column: &str) -> Result<ChartSpec, RankingErrors> {
    if ranked.column != column {
        return Err(RankingErrors::UnknownColumn(column.to_string()));
    }

    let values: Vec<f64> = ranked.rows.iter().map(|r| r.value).collect();
    let upper = domain_upper_bound(&values);

    let bars: Vec<Bar> = ranked
        .rows
        .iter()
        .enumerate()
        .map(|(idx, r)| Bar {
            category: r.id.clone(),
            value: r.value,
            color: PALETTE[idx % PALETTE.len()].to_string(),
            tooltip: vec![
                (ranked.id_column.clone(), r.id.clone()),
                (column.to_string(), r.value.to_string()),
            ],
        })
        .collect();

    debug!(
        "build_spec: column {:?}: {} bars, domain [0, {}]",
        column,
        bars.len(),
        upper
    );
    Ok(ChartSpec {
        category_field: ranked.id_column.clone(),
        value_field: column.to_string(),
        value_title: VALUE_TITLE.to_string(),
        value_domain: (0.0, upper),
        category_sort: SortOrder::Descending,
        bars,
        show_legend: false,
        interactive: true,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{top_n, Row, Table, TOP_N};

    fn ranked(rows: &[(&str, f64)]) -> RankedSubset {
        RankedSubset {
            id_column: "Country".to_string(),
            column: "X".to_string(),
            rows: rows
                .iter()
                .map(|(id, value)| RankedRow {
                    id: id.to_string(),
                    value: *value,
                })
                .collect(),
        }
    }

    #[test]
    fn end_to_end_example() {
        let table = Table::new(
            &["Country".to_string(), "X".to_string()],
            vec![
                Row {
                    id: "A".to_string(),
                    values: vec![Some(10.0)],
                },
                Row {
                    id: "B".to_string(),
                    values: vec![Some(90.0)],
                },
                Row {
                    id: "C".to_string(),
                    values: vec![Some(50.0)],
                },
            ],
        )
        .unwrap();
        let r = top_n(&table, "X", 2).unwrap();
        let spec = build_spec(&r, "X").unwrap();
        assert_eq!(spec.value_domain.0, 0.0);
        assert!((spec.value_domain.1 - 99.0).abs() < 1e-9);
        let categories: Vec<&str> = spec.bars.iter().map(|b| b.category.as_str()).collect();
        assert_eq!(categories, vec!["B", "C"]);
        assert_eq!(spec.category_sort, SortOrder::Descending);
    }

    #[test]
    fn domain_is_padded_max() {
        let spec = build_spec(&ranked(&[("A", 0.37), ("B", 0.12)]), "X").unwrap();
        assert_eq!(spec.value_domain, (0.0, 0.37 * 1.1));
    }

    #[test]
    fn empty_ranking_collapses_domain() {
        let spec = build_spec(&ranked(&[]), "X").unwrap();
        assert_eq!(spec.value_domain, (0.0, 0.0));
        assert!(spec.bars.is_empty());
    }

    #[test]
    fn tooltips_and_colors() {
        let spec = build_spec(&ranked(&[("A", 3.0), ("B", 2.0), ("C", 1.0)]), "X").unwrap();
        assert_eq!(
            spec.bars[1].tooltip,
            vec![
                ("Country".to_string(), "B".to_string()),
                ("X".to_string(), "2".to_string())
            ]
        );
        let mut colors: Vec<&str> = spec.bars.iter().map(|b| b.color.as_str()).collect();
        colors.dedup();
        assert_eq!(colors.len(), 3);
        assert!(!spec.show_legend);
        assert!(spec.interactive);
    }

    #[test]
    fn ten_bars_have_distinct_colors() {
        let rows: Vec<(String, f64)> = (0..TOP_N)
            .map(|i| (format!("c{}", i), (TOP_N - i) as f64))
            .collect();
        let refs: Vec<(&str, f64)> = rows.iter().map(|(s, v)| (s.as_str(), *v)).collect();
        let spec = build_spec(&ranked(&refs), "X").unwrap();
        let mut colors: Vec<String> = spec.bars.iter().map(|b| b.color.clone()).collect();
        colors.sort();
        colors.dedup();
        assert_eq!(colors.len(), TOP_N);
    }

    #[test]
    fn column_must_match_the_ranking() {
        assert_eq!(
            build_spec(&ranked(&[("A", 1.0)]), "Y"),
            Err(RankingErrors::UnknownColumn("Y".to_string()))
        );
    }
}
