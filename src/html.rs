//! Self-contained HTML dashboard.
//!
//! Three tabbed pages with inline CSS and JavaScript. Only one page is
//! visible at a time; the overview page is shown first.

use chrono::NaiveDate;

use crate::aggregate::{Aggregate, QuarterlySales, SalesSummary, TOP_N};
use crate::charts::ChartSet;
use crate::format::{escape_html, format_count, format_currency, format_percent};

pub const REPORT_TITLE: &str = "Superstore Executive Dashboard";

/// Tab identifiers with their button labels, in display order.
pub const PAGES: [(&str, &str); 3] = [
    ("overview", "Overview"),
    ("categories", "Categories"),
    ("customers", "Customers"),
];

/// Render the full dashboard document.
pub fn render_dashboard(summary: &SalesSummary, charts: &ChartSet, generated_on: NaiveDate) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Superstore Sales Executive Dashboard</title>
    <style>{css}</style>
</head>
<body>
{header}
{tabs}
{overview}
{categories}
{customers}
{footer}
<script>{js}</script>
</body>
</html>"#,
        css = inline_css(),
        js = inline_javascript(),
        header = render_header(summary),
        tabs = render_tabs(),
        overview = render_overview(summary, &charts.overview),
        categories = render_categories(summary, &charts.categories),
        customers = render_customers(summary, &charts.customers),
        footer = render_footer(summary, generated_on),
    )
}

fn render_header(summary: &SalesSummary) -> String {
    let period = match summary.date_range {
        Some(range) => format!("{} – {} • ", range.first.format("%Y"), range.last.format("%Y")),
        None => String::new(),
    };
    format!(
        r#"<div class="header">
    <h1>{REPORT_TITLE}</h1>
    <div class="subtitle">{period}Sales Performance Analysis</div>
</div>"#
    )
}

fn render_tabs() -> String {
    let buttons: Vec<String> = PAGES
        .iter()
        .enumerate()
        .map(|(i, (id, label))| {
            let class = if i == 0 { r#" class="active""# } else { "" };
            format!(r#"    <button{class} onclick="openTab('{id}', this)">{label}</button>"#)
        })
        .collect();
    format!("<div class=\"tab\">\n{}\n</div>", buttons.join("\n"))
}

fn render_page(id: &str, active: bool, body: &str) -> String {
    let class = if active { "content active" } else { "content" };
    format!("<div id=\"{id}\" class=\"{class}\">\n{body}\n</div>")
}

fn render_image(base64_png: &str, alt: &str) -> String {
    format!(r#"    <img src="data:image/png;base64,{base64_png}" alt="{alt}">"#)
}

fn render_metric(value: &str, label: &str) -> String {
    format!(r#"        <div class="metric"><big>{value}</big><small>{label}</small></div>"#)
}

/// Two-column table of aggregate entries, optionally with a share column.
fn render_table(title: &str, aggregate: &Aggregate, with_shares: bool) -> String {
    let shares = aggregate.shares();
    let rows: Vec<String> = aggregate
        .entries()
        .iter()
        .zip(&shares)
        .map(|(entry, share)| {
            let share_cell = if with_shares {
                format!("<td>{}</td>", format_percent(share.value))
            } else {
                String::new()
            };
            format!(
                "<tr><td>{}</td><td>{}</td>{}</tr>",
                escape_html(&entry.key),
                format_currency(entry.value),
                share_cell
            )
        })
        .collect();
    format!(
        "    <table class=\"legend\"><caption>{}</caption>\n    {}\n    </table>",
        escape_html(title),
        rows.join("\n    ")
    )
}

fn render_quarterly_table(quarterly: &QuarterlySales) -> String {
    let rows: Vec<String> = quarterly
        .years
        .iter()
        .map(|year| {
            let cells: Vec<String> = year
                .quarters
                .iter()
                .map(|q| format!("<td>{}</td>", format_currency(*q)))
                .collect();
            format!(
                "<tr><td>{}</td>{}<td><b>{}</b></td></tr>",
                year.year,
                cells.concat(),
                format_currency(year.total)
            )
        })
        .collect();
    format!(
        "    <table class=\"legend\"><caption>Quarterly Revenue by Year</caption>\n    \
         <tr><th>Year</th><th>Q1</th><th>Q2</th><th>Q3</th><th>Q4</th><th>Total</th></tr>\n    {}\n    </table>",
        rows.join("\n    ")
    )
}

fn render_overview(summary: &SalesSummary, chart: &str) -> String {
    let m = &summary.metrics;
    let metrics = [
        render_metric(&format_currency(m.total_sales), "Total Revenue"),
        render_metric(&format_count(m.total_orders), "Unique Orders"),
        render_metric(&format_currency(m.average_order_value), "Avg Order Value"),
        render_metric(&escape_html(m.top_region.as_deref().unwrap_or("N/A")), "Top Region"),
    ];

    let mut body = format!("    <div class=\"metrics\">\n{}\n    </div>\n", metrics.join("\n"));
    body.push_str(&render_image(chart, "Sales by region and quarterly revenue by year"));
    body.push_str("\n    <div class=\"tables\">\n");
    body.push_str(&render_table("Sales by Region", &summary.by_region.canonical, false));
    body.push('\n');
    body.push_str(&render_quarterly_table(&summary.by_quarter));
    body.push_str("\n    </div>");

    if !summary.by_region.unrecognized.is_empty() {
        body.push('\n');
        body.push_str(&render_table(
            "Regions outside West / East / Central / South (not charted)",
            &summary.by_region.unrecognized,
            false,
        ));
    }

    render_page(PAGES[0].0, true, &body)
}

fn render_categories(summary: &SalesSummary, chart: &str) -> String {
    let body = format!(
        "    <h2>Category &amp; Sub-Category Performance</h2>\n{}\n    <div class=\"tables\">\n{}\n{}\n    </div>",
        render_image(chart, "Sales by category and top sub-categories"),
        render_table("Sales by Category", &summary.by_category, false),
        render_table(
            &format!("Top {TOP_N} Sub-Categories by Sales"),
            &summary.top_sub_categories,
            false
        ),
    );
    render_page(PAGES[1].0, false, &body)
}

fn render_customers(summary: &SalesSummary, chart: &str) -> String {
    let body = format!(
        "    <h2>Customer Insights</h2>\n{}\n    <div class=\"tables\">\n{}\n{}\n    </div>",
        render_image(chart, "Sales by customer segment and top customers"),
        render_table("Sales by Customer Segment", &summary.by_segment, true),
        render_table(&format!("Top {TOP_N} Customers by Sales"), &summary.top_customers, false),
    );
    render_page(PAGES[2].0, false, &body)
}

fn render_footer(summary: &SalesSummary, generated_on: NaiveDate) -> String {
    let report = &summary.normalization;
    let dropped = if report.dropped() > 0 {
        format!(
            " • {} of {} rows excluded (invalid date or sales)",
            format_count(report.dropped()),
            format_count(report.rows_read)
        )
    } else {
        String::new()
    };
    format!(
        r#"<div class="footer">
    Superstore Sales Analysis • Generated on {}{}
</div>"#,
        generated_on.format("%B %d, %Y"),
        dropped
    )
}

fn inline_css() -> &'static str {
    r#"
body {margin:0;background:#f1f5f9;font-family:'Segoe UI',sans-serif}
.header {background:#4f46e5;color:white;padding:80px;text-align:center}
h1 {font-size:52px;margin:0}
h2 {text-align:center;color:#4f46e5;padding:20px;font-size:28px}
.subtitle {font-size:28px;margin:10px 0;opacity:0.9}
.tab {background:#4338ca;padding:15px;text-align:center}
.tab button {background:none;border:none;color:white;padding:14px 32px;font-size:18px;cursor:pointer;transition:0.3s;border-radius:8px}
.tab button:hover {background:#312e81}
.tab button.active {background:#1e1b4b;font-weight:bold}
.content {display:none;padding:40px;background:white;min-height:100vh}
.content.active {display:block}
.metrics {display:grid;grid-template-columns:repeat(auto-fit,minmax(250px,1fr));gap:30px;margin:50px 0}
.metric {background:linear-gradient(135deg,#667eea,#764ba2);color:white;padding:40px;border-radius:20px;text-align:center}
big {font-size:44px;font-weight:bold;display:block;margin-bottom:8px}
small {font-size:18px}
img {max-width:100%;border-radius:20px;box-shadow:0 20px 40px rgba(0,0,0,0.3);margin:30px 0}
.tables {display:flex;flex-wrap:wrap;gap:40px;justify-content:space-around}
table.legend {border-collapse:collapse;font-size:16px;margin:20px 0}
table.legend caption {font-weight:bold;font-size:20px;color:#1e293b;padding:10px}
table.legend td, table.legend th {padding:6px 16px;border-bottom:1px solid #e2e8f0;text-align:right}
table.legend td:first-child {text-align:left}
.footer {text-align:center;padding:40px;color:#666;font-size:14px}
"#
}

fn inline_javascript() -> &'static str {
    r#"
function openTab(tabName, button) {
    document.querySelectorAll('.content').forEach(tab => tab.classList.remove('active'));
    document.querySelectorAll('.tab button').forEach(btn => btn.classList.remove('active'));
    document.getElementById(tabName).classList.add('active');
    button.classList.add('active');
}
"#
}
