//! Static informational page

use axum::response::Html;

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html>
<head>
    <title>Zodiac Fortune App</title>
    <style>
        body { font-family: Arial, sans-serif; padding: 20px; text-align: center; }
        h1 { color: #667eea; }
        .endpoint { background: #f5f5f5; padding: 10px; margin: 10px; border-radius: 5px; }
    </style>
</head>
<body>
    <h1>Zodiac Fortune Backend API</h1>
    <p>The reading store is connected and the server is running.</p>

    <div class="endpoint">
        <strong>GET /api/health</strong><br>
        Health check and database connection test
    </div>

    <div class="endpoint">
        <strong>POST /api/save-reading</strong><br>
        Save a zodiac reading
    </div>

    <div class="endpoint">
        <strong>GET /api/readings?limit=50</strong><br>
        Most recent saved readings
    </div>

    <div class="endpoint">
        <strong>GET /api/stats</strong><br>
        Reading totals, counts per birth month, and photos taken
    </div>
</body>
</html>
"#;

pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}
