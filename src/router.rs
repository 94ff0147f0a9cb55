use crate::dashboard::Dashboard;
use crate::domain::DashboardView;
use crate::errors::ServerError;
use crate::responses::{html_response, json_response, redirect_response, text_response, ResultResp};
use crate::templates;
use astra::Request;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

pub fn handle(req: Request, app: &Dashboard) -> ResultResp {
    let method = req.method().as_str();
    let path = req.uri().path();

    match (method, path) {
        ("GET", "/") => {
            let view = select_from_query(&req, app)?;
            html_response(templates::pages::dashboard_page(&view))
        }
        ("GET", "/api/summary") => {
            let view = select_from_query(&req, app)?;
            json_response(&*view)
        }
        ("POST", "/refresh") => {
            // Background thread; the handle is dropped and the thread detaches.
            match app.spawn_refresh() {
                Some(_) => info!("dashboard refresh started"),
                None => info!("dashboard refresh already running"),
            }
            redirect_response("/")
        }
        ("GET", "/health") => text_response("ok"),
        _ => Err(ServerError::NotFound),
    }
}

/// Apply `?month=N` if present, otherwise keep the current selection.
fn select_from_query(req: &Request, app: &Dashboard) -> Result<Arc<DashboardView>, ServerError> {
    let params = parse_query(req);

    match params.get("month") {
        Some(raw) => {
            let month0 = raw
                .trim()
                .parse::<u32>()
                .map_err(|_| ServerError::BadRequest(format!("invalid month '{raw}'")))?;
            app.select_month(month0)
        }
        None => Ok(app.snapshot()),
    }
}

fn parse_query(req: &Request) -> HashMap<String, String> {
    let mut map = HashMap::new();

    if let Some(q) = req.uri().query() {
        for pair in q.split('&') {
            let mut parts = pair.splitn(2, '=');
            if let (Some(k), Some(v)) = (parts.next(), parts.next()) {
                map.insert(k.to_string(), v.to_string());
            }
        }
    }

    map
}
