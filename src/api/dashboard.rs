use crate::AppState;
use axum::{response::Html, routing::get, Router};

/// The embedded viewer page. It connects to `/ws`, renders the universe
/// immediately, and repaints the table on every snapshot push.
const DASHBOARD_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>Vigil &mdash; Futures Trend Signals</title>
  <style>
    body { font-family: sans-serif; background: #f0f2f5; padding: 20px; }
    h1 { text-align: center; }
    table { width: 90%; max-width: 900px; margin: 20px auto; border-collapse: collapse; background: #fff; }
    th, td { padding: 8px 12px; border: 1px solid #ccc; text-align: center; }
    th { background: #4a90e2; color: #fff; }
    tr.long { background: #d4edda; color: #155724; }
    tr.short { background: #f8d7da; color: #721c24; }
    tr.failed { color: #888; }
    #status { text-align: center; color: #666; }
  </style>
</head>
<body>
  <h1>Futures Trend Signals</h1>
  <p id="status">connecting&hellip;</p>
  <table id="signals">
    <thead>
      <tr><th>Symbol</th><th>Signal</th><th>Confidence (%)</th></tr>
    </thead>
    <tbody></tbody>
  </table>
  <script>
    const status = document.getElementById('status');
    const tbody = document.querySelector('#signals tbody');

    function rowClass(verdict) {
      if (verdict === 'long') return 'long';
      if (verdict === 'short') return 'short';
      if (verdict === 'no_recommendation') return '';
      return 'failed';
    }

    function render(results) {
      tbody.innerHTML = '';
      results.forEach(row => {
        const tr = document.createElement('tr');
        tr.className = rowClass(row.verdict);
        const confidence = row.confidence == null ? '-' : row.confidence.toFixed(1);
        tr.innerHTML =
          `<td>${row.symbol}</td><td>${row.verdict}</td><td>${confidence}</td>`;
        tbody.appendChild(tr);
      });
    }

    function connect() {
      const proto = location.protocol === 'https:' ? 'wss' : 'ws';
      const socket = new WebSocket(`${proto}://${location.host}/ws`);

      socket.onopen = () => { status.textContent = 'live'; };
      socket.onmessage = event => {
        const msg = JSON.parse(event.data);
        if (msg.type === 'update') render(msg.results);
      };
      socket.onclose = () => {
        status.textContent = 'disconnected, retrying…';
        setTimeout(connect, 3000);
      };
    }

    connect();
  </script>
</body>
</html>
"#;

async fn index() -> Html<&'static str> {
    Html(DASHBOARD_HTML)
}

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(index))
}
