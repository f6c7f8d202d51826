use crate::calendar::{CalendarView, DateRange};
use crate::models::{
    format_display_date, ActivityStats, CalendarEvent, Customer, CustomerField, Severity,
    StatusMessage, TrainingField, NOT_AVAILABLE,
};
use crate::state::{CustomerView, TrainingView};
use crate::stats::max_duration;
use crate::view::{SortDirection, SortState};
use chrono::{Local, NaiveDate};
use std::fmt::Write;

pub fn render_home() -> String {
    let body = r#"<section class="cards">
      <a class="card" href="/customers"><span class="label">Customers</span><span class="hint">Search, edit and export</span></a>
      <a class="card" href="/trainings"><span class="label">Trainings</span><span class="hint">Sessions and their customers</span></a>
      <a class="card" href="/calendar"><span class="label">Calendar</span><span class="hint">Month, week and day views</span></a>
      <a class="card" href="/statistics"><span class="label">Statistics</span><span class="hint">Minutes per activity</span></a>
    </section>"#;
    render_page("Personal Trainer", "Manage customers and their trainings.", None, body)
}

pub fn render_customers(state: &CustomerView) -> String {
    let mut body = String::new();

    let _ = write!(
        body,
        r#"<section class="toolbar">
      <form method="get" action="/customers" class="search">
        <input type="search" name="q" value="{query}" placeholder="Search by name, email, phone..." />
        <button type="submit" class="btn-sub">Search</button>
      </form>
      <a class="btn-link" href="/customers/refresh">Refresh</a>
      <a class="btn-link" href="/customers/export.csv">Export CSV</a>
    </section>"#,
        query = escape(state.filter.global_query()),
    );

    body.push_str(r#"<details class="panel"><summary>Filter by field</summary><form method="get" action="/customers" class="grid-form">"#);
    for field in CustomerField::ALL {
        let _ = write!(
            body,
            r#"<label>{label}<input name="{key}" value="{value}" /></label>"#,
            label = field.label(),
            key = field.key(),
            value = escape(state.filter.field_query(&field)),
        );
    }
    body.push_str(r#"<button type="submit" class="btn-sub">Apply</button></form></details>"#);

    body.push_str(r#"<details class="panel"><summary>Add customer</summary><form method="post" action="/customers" class="grid-form">"#);
    body.push_str(&customer_inputs(None));
    body.push_str(r#"<button type="submit" class="btn-add">Save</button></form></details>"#);

    body.push_str(r#"<table><thead><tr>"#);
    for field in CustomerField::ALL {
        body.push_str(&sort_header("/customers/sort", field.key(), field.label(), active_direction(&state.sort, field)));
    }
    body.push_str("<th>Actions</th></tr></thead><tbody>");

    let rows = state.rows();
    if rows.is_empty() {
        body.push_str(&empty_row(8, state.loading));
    }
    for customer in &rows {
        body.push_str("<tr>");
        for field in CustomerField::ALL {
            let _ = write!(body, "<td>{}</td>", escape(customer.field(field)));
        }
        let _ = write!(
            body,
            r#"<td class="actions">
          <details><summary>Edit</summary><form method="post" action="/customers/edit" class="grid-form">
            <input type="hidden" name="href" value="{href}" />{inputs}
            <button type="submit" class="btn-sub">Save</button></form></details>
          {delete}
        </td>"#,
            href = escape(customer.self_href()),
            inputs = customer_inputs(Some(customer)),
            delete = delete_form(
                "/customers/delete",
                customer.self_href(),
                &format!("Delete customer {}?", customer.full_name()),
            ),
        );
        body.push_str("</tr>");
    }
    body.push_str("</tbody></table>");

    render_page("Customers", "All customers of the trainer.", state.status.as_ref(), &body)
}

pub fn render_trainings(state: &TrainingView, customers: &[Customer]) -> String {
    let mut body = String::new();

    let _ = write!(
        body,
        r#"<section class="toolbar">
      <form method="get" action="/trainings" class="search">
        <input type="search" name="q" value="{query}" placeholder="Search trainings..." />
        <button type="submit" class="btn-sub">Search</button>
      </form>
      <a class="btn-link" href="/trainings/refresh">Refresh</a>
    </section>"#,
        query = escape(state.filter.global_query()),
    );

    body.push_str(r#"<details class="panel"><summary>Add training</summary><form method="post" action="/trainings" class="grid-form">"#);
    body.push_str(r#"<label>Customer<select name="customer" required><option value="">Select customer</option>"#);
    for customer in customers {
        let _ = write!(
            body,
            r#"<option value="{href}">{name}</option>"#,
            href = escape(customer.self_href()),
            name = escape(&customer.full_name()),
        );
    }
    let now = Local::now().format("%Y-%m-%dT%H:%M");
    let _ = write!(
        body,
        r#"</select></label>
        <label>Date<input type="datetime-local" name="date" value="{now}" required /></label>
        <label>Activity<input name="activity" required /></label>
        <label>Duration (min)<input type="number" name="duration" min="0" required /></label>
        <button type="submit" class="btn-add">Save</button></form></details>"#
    );

    body.push_str("<table><thead><tr>");
    for field in TrainingField::ALL {
        body.push_str(&sort_header("/trainings/sort", field.key(), field.label(), active_direction(&state.sort, field)));
    }
    body.push_str("<th>Actions</th></tr></thead><tbody>");

    let rows = state.rows();
    if rows.is_empty() {
        body.push_str(&empty_row(5, state.loading));
    }
    for joined in &rows {
        let training = &joined.training;
        let date = training
            .date
            .map(|date| format_display_date(&date))
            .unwrap_or_else(|| NOT_AVAILABLE.to_string());
        let duration = training
            .duration
            .map(|minutes| minutes.to_string())
            .unwrap_or_else(|| NOT_AVAILABLE.to_string());
        let activity = training.activity.as_deref().unwrap_or(NOT_AVAILABLE);
        let _ = write!(
            body,
            "<tr><td>{date}</td><td>{activity}</td><td>{duration}</td><td>{customer}</td><td class=\"actions\">{delete}</td></tr>",
            date = escape(&date),
            activity = escape(activity),
            duration = escape(&duration),
            customer = escape(&joined.customer_name()),
            delete = delete_form(
                "/trainings/delete",
                training.self_href(),
                &format!("Delete training {activity}?"),
            ),
        );
    }
    body.push_str("</tbody></table>");

    render_page("Trainings", "Training sessions with their customers.", state.status.as_ref(), &body)
}

pub fn render_calendar(
    view: CalendarView,
    anchor: NaiveDate,
    previous: NaiveDate,
    next: NaiveDate,
    range: DateRange,
    events: &[CalendarEvent],
) -> String {
    let mut body = String::new();
    body.push_str(r#"<section class="toolbar"><div class="tabs">"#);
    for option in [CalendarView::Month, CalendarView::Week, CalendarView::Day] {
        let class = if option == view { "tab active" } else { "tab" };
        let _ = write!(
            body,
            r#"<a class="{class}" href="/calendar?view={name}&date={anchor}">{name}</a>"#,
            name = option.as_str(),
        );
    }
    let today = Local::now().date_naive();
    let _ = write!(
        body,
        r#"</div><nav class="tabs">
        <a class="tab" href="/calendar?view={v}&date={previous}">Previous</a>
        <a class="tab" href="/calendar?view={v}&date={today}">Today</a>
        <a class="tab" href="/calendar?view={v}&date={next}">Next</a>
      </nav></section>
      <p class="hint">{start} to {end}</p>"#,
        v = view.as_str(),
        start = range.start.format("%d.%m.%Y"),
        end = (range.end - chrono::Duration::days(1)).format("%d.%m.%Y"),
    );

    if events.is_empty() {
        body.push_str(r#"<p class="hint">No trainings in this period.</p>"#);
    } else {
        body.push_str(r#"<ul class="events">"#);
        for event in events {
            let start = event.start.with_timezone(&Local);
            let end = event.end.with_timezone(&Local);
            let _ = write!(
                body,
                r#"<li><span class="when">{day} {from}–{to}</span><span class="what">{title}</span></li>"#,
                day = start.format("%a %d.%m."),
                from = start.format("%H:%M"),
                to = end.format("%H:%M"),
                title = escape(&event.title),
            );
        }
        body.push_str("</ul>");
    }

    render_page("Calendar", "Trainings on the calendar.", None, &body)
}

pub fn render_statistics(stats: &[ActivityStats]) -> String {
    const BAR_WIDTH: i64 = 48;
    const GAP: i64 = 24;
    const HEIGHT: i64 = 260;
    const LABEL_SPACE: i64 = 40;

    let max = max_duration(stats).max(1);
    let width = (stats.len() as i64 * (BAR_WIDTH + GAP) + GAP).max(320);
    let mut svg = format!(
        r#"<svg id="chart" viewBox="0 0 {width} {total}" role="img" aria-label="Minutes per activity">"#,
        total = HEIGHT + LABEL_SPACE,
    );
    let _ = write!(
        svg,
        r#"<line class="chart-axis" x1="0" y1="{HEIGHT}" x2="{width}" y2="{HEIGHT}" />"#
    );
    for (slot, point) in stats.iter().enumerate() {
        let scaled = i128::from(point.duration.max(0)) * i128::from(HEIGHT - 20) / i128::from(max);
        let bar_height = scaled as i64;
        let x = GAP + slot as i64 * (BAR_WIDTH + GAP);
        let y = HEIGHT - bar_height;
        let _ = write!(
            svg,
            r#"<rect class="chart-bar" x="{x}" y="{y}" width="{BAR_WIDTH}" height="{bar_height}"><title>{label}: {minutes} min</title></rect>
            <text class="chart-value" x="{cx}" y="{vy}" text-anchor="middle">{minutes}</text>
            <text class="chart-label" x="{cx}" y="{ly}" text-anchor="middle">{label}</text>"#,
            label = escape(&point.activity),
            minutes = point.duration,
            cx = x + BAR_WIDTH / 2,
            vy = (y - 6).max(12),
            ly = HEIGHT + 20,
        );
    }
    svg.push_str("</svg>");

    let body = if stats.is_empty() {
        r#"<p class="hint">No trainings yet.</p>"#.to_string()
    } else {
        format!(r#"<div class="chart-card">{svg}</div>"#)
    };
    render_page("Statistics", "Training minutes per activity.", None, &body)
}

fn customer_inputs(customer: Option<&Customer>) -> String {
    let mut inputs = String::new();
    for field in CustomerField::ALL {
        let value = customer.map(|c| c.field(field)).unwrap_or_default();
        let _ = write!(
            inputs,
            r#"<label>{label}<input name="{key}" value="{value}" /></label>"#,
            label = field.label(),
            key = field.key(),
            value = escape(value),
        );
    }
    inputs
}

fn delete_form(action: &str, href: &str, prompt: &str) -> String {
    // The blocking confirm() decides the submitted `confirmed` value.
    format!(
        r#"<form method="post" action="{action}" class="inline" onsubmit="this.confirmed.value = window.confirm({prompt}) ? 'true' : 'false'; return this.confirmed.value === 'true';">
          <input type="hidden" name="href" value="{href}" />
          <input type="hidden" name="confirmed" value="false" />
          <button type="submit" class="btn-danger">Delete</button>
        </form>"#,
        href = escape(href),
        prompt = escape(&js_string(prompt)),
    )
}

fn active_direction<K: PartialEq>(sort: &SortState<K>, key: K) -> Option<SortDirection> {
    (sort.key == key).then_some(sort.direction)
}

fn sort_header(base: &str, key: &str, label: &str, active: Option<SortDirection>) -> String {
    let (class, marker) = match active {
        Some(SortDirection::Asc) => (" class=\"active\"", " ▲"),
        Some(SortDirection::Desc) => (" class=\"active\"", " ▼"),
        None => ("", ""),
    };
    format!(r#"<th{class}><a href="{base}/{key}">{label}{marker}</a></th>"#)
}

fn empty_row(columns: usize, loading: bool) -> String {
    let text = if loading { "Loading..." } else { "No rows." };
    format!(r#"<tr><td colspan="{columns}" class="hint">{text}</td></tr>"#)
}

fn render_page(title: &str, subtitle: &str, status: Option<&StatusMessage>, body: &str) -> String {
    let status = match status {
        Some(message) => {
            let kind = match message.severity {
                Severity::Success => "ok",
                Severity::Error => "error",
            };
            format!(
                r#"<p class="status" data-type="{kind}" role="alert">{}</p>"#,
                escape(&message.text)
            )
        }
        None => String::new(),
    };
    LAYOUT_HTML
        .replace("{{TITLE}}", &escape(title))
        .replace("{{SUBTITLE}}", &escape(subtitle))
        .replace("{{STATUS}}", &status)
        .replace("{{BODY}}", body)
}

pub fn escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

fn js_string(value: &str) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "\"\"".to_string())
}

const LAYOUT_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>{{TITLE}} · Personal Trainer</title>
  <style>
    @import url('https://fonts.googleapis.com/css2?family=Space+Grotesk:wght@400;500;600&family=Fraunces:wght@600&display=swap');

    :root {
      --bg-1: #f8f3e6;
      --bg-2: #f5d3a7;
      --ink: #2b2a28;
      --accent: #ff6b4a;
      --accent-2: #2f4858;
      --danger: #c63b2b;
      --card: rgba(255, 255, 255, 0.86);
      --shadow: 0 24px 60px rgba(47, 72, 88, 0.18);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: radial-gradient(circle at top, var(--bg-2), transparent 60%),
        linear-gradient(135deg, var(--bg-1), #ffe9d4 60%, #f9f2e9 100%);
      color: var(--ink);
      font-family: "Space Grotesk", "Trebuchet MS", sans-serif;
      padding: 24px 18px 48px;
    }

    .topnav {
      display: flex;
      gap: 18px;
      justify-content: center;
      margin-bottom: 20px;
    }

    .topnav a {
      color: var(--accent-2);
      font-weight: 600;
      text-decoration: none;
    }

    .app {
      width: min(1200px, 100%);
      margin: 0 auto;
      background: var(--card);
      backdrop-filter: blur(12px);
      border-radius: 28px;
      box-shadow: var(--shadow);
      padding: 32px;
      display: grid;
      gap: 22px;
    }

    h1 {
      font-family: "Fraunces", "Georgia", serif;
      font-weight: 600;
      font-size: clamp(1.8rem, 4vw, 2.6rem);
      margin: 0;
    }

    .subtitle,
    .hint {
      margin: 0;
      color: #6f6a65;
    }

    .cards {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(200px, 1fr));
      gap: 16px;
    }

    .card {
      background: white;
      border-radius: 18px;
      padding: 18px;
      border: 1px solid rgba(47, 72, 88, 0.08);
      display: grid;
      gap: 8px;
      color: inherit;
      text-decoration: none;
    }

    .card .label {
      font-size: 1.2rem;
      font-weight: 600;
      color: var(--accent-2);
    }

    .toolbar {
      display: flex;
      flex-wrap: wrap;
      gap: 12px;
      align-items: center;
      justify-content: space-between;
    }

    .search {
      display: flex;
      gap: 8px;
    }

    input,
    select {
      font: inherit;
      padding: 8px 12px;
      border-radius: 12px;
      border: 1px solid rgba(47, 72, 88, 0.2);
    }

    .search input {
      width: min(400px, 60vw);
    }

    .grid-form {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(180px, 1fr));
      gap: 10px;
      padding-top: 10px;
    }

    .grid-form label {
      display: grid;
      gap: 4px;
      font-size: 0.85rem;
      color: #8b857d;
    }

    button,
    .btn-link {
      appearance: none;
      border: none;
      border-radius: 999px;
      padding: 8px 16px;
      font: inherit;
      font-weight: 600;
      cursor: pointer;
      text-decoration: none;
    }

    .btn-add {
      background: var(--accent);
      color: white;
    }

    .btn-sub,
    .btn-link {
      background: var(--accent-2);
      color: white;
    }

    .btn-danger {
      background: transparent;
      color: var(--danger);
    }

    .panel summary,
    .actions summary {
      cursor: pointer;
      font-weight: 600;
      color: var(--accent-2);
    }

    table {
      width: 100%;
      border-collapse: collapse;
      background: white;
      border-radius: 18px;
      overflow: hidden;
    }

    th,
    td {
      text-align: left;
      padding: 10px 12px;
      border-bottom: 1px solid rgba(47, 72, 88, 0.08);
      vertical-align: top;
    }

    th a {
      color: inherit;
      text-decoration: none;
    }

    th.active a {
      color: var(--accent);
    }

    .inline {
      display: inline;
    }

    .tabs {
      display: flex;
      gap: 6px;
      padding: 6px;
      background: rgba(47, 72, 88, 0.08);
      border-radius: 999px;
    }

    .tab {
      border-radius: 999px;
      padding: 8px 14px;
      font-weight: 600;
      color: #6b645d;
      text-decoration: none;
      text-transform: capitalize;
    }

    .tab.active {
      background: white;
      color: var(--accent-2);
    }

    .events {
      list-style: none;
      margin: 0;
      padding: 0;
      display: grid;
      gap: 8px;
    }

    .events li {
      display: flex;
      gap: 16px;
      background: white;
      border-radius: 14px;
      padding: 10px 14px;
    }

    .events .when {
      color: #8b857d;
      min-width: 180px;
    }

    .chart-card {
      background: white;
      border-radius: 20px;
      padding: 16px;
      overflow-x: auto;
    }

    #chart {
      min-width: 100%;
      height: 320px;
      display: block;
    }

    .chart-bar {
      fill: var(--accent);
    }

    .chart-axis {
      stroke: rgba(47, 72, 88, 0.25);
    }

    .chart-label,
    .chart-value {
      fill: #7a746d;
      font-size: 11px;
    }

    .status {
      font-size: 0.95rem;
      padding: 10px 14px;
      border-radius: 12px;
      margin: 0;
    }

    .status[data-type="error"] {
      color: var(--danger);
      background: rgba(198, 59, 43, 0.08);
    }

    .status[data-type="ok"] {
      color: #2d7a4b;
      background: rgba(45, 122, 75, 0.08);
    }
  </style>
</head>
<body>
  <nav class="topnav">
    <a href="/">Home</a>
    <a href="/customers">Customers</a>
    <a href="/trainings">Trainings</a>
    <a href="/calendar">Calendar</a>
    <a href="/statistics">Statistics</a>
  </nav>
  <main class="app">
    <header>
      <h1>{{TITLE}}</h1>
      <p class="subtitle">{{SUBTITLE}}</p>
    </header>
    {{STATUS}}
    {{BODY}}
  </main>
  <script>
    const status = document.querySelector('.status');
    if (status) {
      setTimeout(() => status.remove(), 6000);
    }
  </script>
</body>
</html>
"#;
