// Rendering of chart descriptions as Vega-Lite documents.

use serde_json::json;
use serde_json::Map as JSMap;
use serde_json::Value as JSValue;

use top_ranking::{ChartSpec, SortOrder};

pub const VEGA_LITE_SCHEMA: &str = "https://vega.github.io/schema/vega-lite/v5.json";

/// Converts a chart description into a Vega-Lite document.
///
/// The data of the chart is inlined. The fingerprint of the dataset, if any, is kept
/// in the `usermeta` section, which renderers ignore.
pub fn chart_spec_to_json(spec: &ChartSpec, title: &str, fingerprint: Option<&str>) -> JSValue {
    let values: Vec<JSValue> = spec
        .bars
        .iter()
        .map(|bar| {
            let mut row: JSMap<String, JSValue> = JSMap::new();
            row.insert(spec.category_field.clone(), json!(bar.category));
            row.insert(spec.value_field.clone(), json!(bar.value));
            JSValue::Object(row)
        })
        .collect();

    let sort = match spec.category_sort {
        SortOrder::Descending => "-x",
        SortOrder::Ascending => "x",
    };
    let color_domain: Vec<&str> = spec.bars.iter().map(|b| b.category.as_str()).collect();
    let color_range: Vec<&str> = spec.bars.iter().map(|b| b.color.as_str()).collect();
    let tooltip: Vec<JSValue> = tooltip_fields(spec)
        .into_iter()
        .map(|field| {
            let field_type = if field == spec.category_field {
                "nominal"
            } else {
                "quantitative"
            };
            json!({ "field": field, "type": field_type })
        })
        .collect();
    let legend = if spec.show_legend {
        json!({})
    } else {
        JSValue::Null
    };

    let mut js = json!({
        "$schema": VEGA_LITE_SCHEMA,
        "title": title,
        "data": { "values": values },
        "mark": { "type": "bar" },
        "encoding": {
            "x": {
                "field": spec.value_field,
                "type": "quantitative",
                "title": spec.value_title,
                "scale": { "domain": [spec.value_domain.0, spec.value_domain.1] }
            },
            "y": {
                "field": spec.category_field,
                "type": "nominal",
                "sort": sort
            },
            "tooltip": tooltip,
            "color": {
                "field": spec.category_field,
                "type": "nominal",
                "scale": { "domain": color_domain, "range": color_range },
                "legend": legend
            }
        }
    });

    if spec.interactive {
        // Pan and zoom along the value axis.
        js["params"] = json!([{
            "name": "zoom",
            "select": { "type": "interval", "encodings": ["x"] },
            "bind": "scales"
        }]);
    }
    if let Some(fp) = fingerprint {
        js["usermeta"] = json!({ "datasetFingerprint": fp });
    }
    js
}

/// The fields shown in the tooltips, as described by the bars. A chart without bars
/// falls back to the category and the value.
fn tooltip_fields(spec: &ChartSpec) -> Vec<String> {
    match spec.bars.first() {
        Some(bar) => bar.tooltip.iter().map(|(field, _)| field.clone()).collect(),
        None => vec![spec.category_field.clone(), spec.value_field.clone()],
    }
}
