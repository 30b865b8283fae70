use async_trait::async_trait;
use maestro::{Error, HttpRequest, HttpResponse, Transport};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, RequestMode, RequestRedirect, Response};

/// Same-origin fetch so the session cookie goes along
pub struct FetchTransport;

#[async_trait(?Send)]
impl Transport for FetchTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, Error> {
        fetch(request).await.map_err(js_error)
    }
}

async fn fetch(request: HttpRequest) -> Result<HttpResponse, JsValue> {
    let window = crate::window();
    let body = request.body.map(|body| body.to_string());
    let request = query(&request.url, request.method.as_str(), body.as_deref())?;
    let resp_value = JsFuture::from(window.fetch_with_request(&request)).await?;
    let resp: Response = resp_value.dyn_into()?;
    let status = resp.status();
    let text = JsFuture::from(resp.text()?).await?;
    Ok(HttpResponse {
        status,
        body: text.as_string().unwrap_or_default(),
    })
}

fn query(url: &str, method: &str, body: Option<&str>) -> Result<Request, JsValue> {
    let opts = RequestInit::new();
    opts.set_method(method);
    opts.set_mode(RequestMode::Cors);
    // A redirect comes back as status 0 instead of the page it points at
    opts.set_redirect(RequestRedirect::Manual);
    if let Some(body) = body {
        opts.set_body(&JsValue::from_str(body));
    }
    let request = Request::new_with_str_and_init(url, &opts)?;
    if body.is_some() {
        request.headers().set("Content-Type", "application/json")?;
    }
    Ok(request)
}

pub fn js_error(e: JsValue) -> Error {
    Error::transport(e.as_string().unwrap_or_else(|| format!("{:?}", e)))
}
