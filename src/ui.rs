use crate::clock::format_minutes;
use crate::models::{Recipient, StatsResponse};

pub fn render_index<'a>(recipients: impl IntoIterator<Item = &'a Recipient>) -> String {
    let items: String = recipients
        .into_iter()
        .map(|recipient| {
            format!(
                r#"<li><a href="/recipients/{id}">{name}</a></li>"#,
                id = recipient.id,
                name = escape_html(&recipient.display_name),
            )
        })
        .collect();
    let list = if items.is_empty() {
        r#"<p class="hint">Nobody registered yet. POST /api/recipients to start.</p>"#.to_string()
    } else {
        format!("<ul>{items}</ul>")
    };

    PAGE_HTML
        .replace("{{TITLE}}", "Baby Log")
        .replace("{{SUBTITLE}}", "Sleep and feeding journal.")
        .replace("{{BODY}}", &list)
        .replace("{{SCRIPT}}", "")
}

pub fn render_dashboard(
    recipient: &Recipient,
    report: &StatsResponse,
    open_since: Option<&str>,
) -> String {
    let session = match open_since {
        Some(start) => format!("Sleeping since {}", escape_html(start)),
        None => "Awake".to_string(),
    };
    let body = DASHBOARD_HTML
        .replace("{{ID}}", &recipient.id.to_string())
        .replace("{{SESSION}}", &session)
        .replace("{{DAY_ML}}", &report.today.feeding_ml.day.to_string())
        .replace("{{NIGHT_ML}}", &report.today.feeding_ml.night.to_string())
        .replace("{{DAY_SLEEP}}", &format_minutes(report.today.sleep_minutes.day))
        .replace("{{NIGHT_SLEEP}}", &format_minutes(report.today.sleep_minutes.night))
        .replace("{{REPORT}}", &escape_html(&report.text));

    PAGE_HTML
        .replace("{{TITLE}}", &escape_html(&recipient.display_name))
        .replace("{{SUBTITLE}}", &format!("Journal #{}", recipient.id))
        .replace("{{BODY}}", &body)
        .replace("{{SCRIPT}}", &DASHBOARD_SCRIPT.replace("{{ID}}", &recipient.id.to_string()))
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            '{' => out.push_str("&#123;"),
            '}' => out.push_str("&#125;"),
            _ => out.push(ch),
        }
    }
    out
}

const DASHBOARD_HTML: &str = r#"
    <p id="session" class="hint">{{SESSION}}</p>

    <section class="panel">
      <div class="stat"><span class="label">Day feeding</span><span class="value">{{DAY_ML}} ml</span></div>
      <div class="stat"><span class="label">Night feeding</span><span class="value">{{NIGHT_ML}} ml</span></div>
      <div class="stat"><span class="label">Day sleep</span><span class="value">{{DAY_SLEEP}}</span></div>
      <div class="stat"><span class="label">Night sleep</span><span class="value">{{NIGHT_SLEEP}}</span></div>
    </section>

    <section class="actions">
      <button class="btn-main" data-action="sleep/begin" type="button">Sleep now</button>
      <button class="btn-alt" data-action="sleep/end" type="button">Wake up now</button>
      <form id="feed-form">
        <input id="amount" type="number" min="0" step="10" placeholder="ml" required />
        <button class="btn-main" type="submit">Save feeding</button>
      </form>
    </section>
    <p id="status" class="status"></p>

    <section class="chart-area">
      <div class="tabs">
        <button class="tab active" data-metric="feeding" type="button">Feeding</button>
        <button class="tab" data-metric="sleep" type="button">Sleep</button>
        <select id="period">
          <option value="7d">7 days</option>
          <option value="30d">30 days</option>
          <option value="all">All time</option>
        </select>
      </div>
      <div class="chart-card"><img id="chart" alt="chart" src="/api/recipients/{{ID}}/chart?metric=feeding&period=7d" /></div>
    </section>

    <pre class="report">{{REPORT}}</pre>
"#;

const DASHBOARD_SCRIPT: &str = r#"
  <script>
    const base = '/api/recipients/{{ID}}';
    const statusEl = document.getElementById('status');
    const chartEl = document.getElementById('chart');
    const periodEl = document.getElementById('period');
    const tabs = Array.from(document.querySelectorAll('.tab'));
    let metric = 'feeding';

    const setStatus = (message, type) => {
      statusEl.textContent = message;
      statusEl.dataset.type = type || '';
    };

    const post = async (path, body) => {
      const res = await fetch(`${base}/${path}`, {
        method: 'POST',
        headers: { 'Content-Type': 'application/json' },
        body: JSON.stringify(body || {}),
      });
      if (!res.ok) {
        throw new Error(await res.text());
      }
      return res.json();
    };

    const refreshChart = () => {
      chartEl.src = `${base}/chart?metric=${metric}&period=${periodEl.value}&t=${Date.now()}`;
    };

    document.querySelectorAll('[data-action]').forEach((button) => {
      button.addEventListener('click', async () => {
        try {
          const data = await post(button.dataset.action);
          setStatus(data.message || 'Saved', 'ok');
          setTimeout(() => window.location.reload(), 600);
        } catch (err) {
          setStatus(err.message, 'error');
        }
      });
    });

    document.getElementById('feed-form').addEventListener('submit', async (event) => {
      event.preventDefault();
      const amount = Number(document.getElementById('amount').value);
      try {
        const data = await post('feedings', { amount });
        setStatus(data.message, 'ok');
        setTimeout(() => window.location.reload(), 600);
      } catch (err) {
        setStatus(err.message, 'error');
      }
    });

    tabs.forEach((tab) => {
      tab.addEventListener('click', () => {
        tabs.forEach((item) => item.classList.toggle('active', item === tab));
        metric = tab.dataset.metric;
        refreshChart();
      });
    });
    periodEl.addEventListener('change', refreshChart);
  </script>
"#;

const PAGE_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>{{TITLE}}</title>
  <style>
    :root {
      --bg-1: #f8f3e6;
      --bg-2: #d7e6f5;
      --ink: #2b2a28;
      --accent: #ff6b4a;
      --accent-2: #2f4858;
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
        linear-gradient(135deg, var(--bg-1), #eef4fb 60%, #f9f2e9 100%);
      color: var(--ink);
      font-family: "Trebuchet MS", sans-serif;
      display: grid;
      place-items: center;
      padding: 32px 18px 48px;
    }

    .app {
      width: min(860px, 100%);
      background: var(--card);
      border-radius: 28px;
      box-shadow: var(--shadow);
      padding: 36px;
      display: grid;
      gap: 24px;
    }

    h1 {
      font-family: "Georgia", serif;
      font-size: clamp(2rem, 4vw, 2.6rem);
      margin: 0;
    }

    .subtitle,
    .hint {
      margin: 0;
      color: #5f5c57;
    }

    .panel,
    .actions {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(180px, 1fr));
      gap: 16px;
    }

    .stat {
      background: white;
      border-radius: 18px;
      padding: 18px;
      border: 1px solid rgba(47, 72, 88, 0.08);
      display: grid;
      gap: 8px;
    }

    .stat .label {
      font-size: 0.85rem;
      text-transform: uppercase;
      letter-spacing: 0.12em;
      color: #8b857d;
    }

    .stat .value {
      font-size: 1.5rem;
      font-weight: 600;
      color: var(--accent-2);
    }

    button {
      border: none;
      border-radius: 999px;
      padding: 14px 20px;
      font-size: 1rem;
      font-weight: 600;
      cursor: pointer;
    }

    .btn-main {
      background: var(--accent);
      color: white;
    }

    .btn-alt {
      background: var(--accent-2);
      color: white;
    }

    #feed-form {
      display: flex;
      gap: 8px;
    }

    #amount {
      width: 90px;
      border-radius: 12px;
      border: 1px solid rgba(47, 72, 88, 0.2);
      padding: 8px;
    }

    .tabs {
      display: flex;
      gap: 6px;
      align-items: center;
    }

    .tab {
      background: transparent;
      color: #6b645d;
    }

    .tab.active {
      background: white;
      color: var(--accent-2);
    }

    .chart-card {
      background: white;
      border-radius: 20px;
      padding: 16px;
    }

    #chart {
      width: 100%;
      display: block;
    }

    .report {
      white-space: pre-wrap;
      font-family: inherit;
      margin: 0;
    }

    .status[data-type="error"] {
      color: #c63b2b;
    }

    .status[data-type="ok"] {
      color: #2d7a4b;
    }
  </style>
</head>
<body>
  <main class="app">
    <header>
      <h1>{{TITLE}}</h1>
      <p class="subtitle">{{SUBTITLE}}</p>
    </header>
{{BODY}}
  </main>
{{SCRIPT}}
</body>
</html>
"#;
