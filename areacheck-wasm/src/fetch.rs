use async_trait::async_trait;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Headers, Request, RequestCache, RequestCredentials, RequestInit, Response, Window};

use areacheck_core::{Evaluator, EvaluatorError, EvaluatorRequest, EvaluatorResponse};

fn network(e: JsValue) -> EvaluatorError {
    EvaluatorError::Network(e.as_string().unwrap_or_else(|| format!("{:?}", e)))
}

/// Sends evaluator requests through `window.fetch`.
pub struct FetchEvaluator {
    window: Window,
}

impl FetchEvaluator {
    pub fn new(window: Window) -> Self {
        FetchEvaluator { window }
    }

    fn build(&self, request: &EvaluatorRequest) -> Result<Request, JsValue> {
        let init = RequestInit::new();
        init.set_method(request.method.as_str());
        if request.no_store {
            init.set_cache(RequestCache::NoStore);
        }
        if request.include_credentials {
            init.set_credentials(RequestCredentials::Include);
        }
        let headers = Headers::new()?;
        for (name, value) in &request.headers {
            headers.set(name, value)?;
        }
        init.set_headers(&headers);
        if let Some(body) = &request.body {
            init.set_body(&JsValue::from_str(body));
        }
        Request::new_with_str_and_init(&request.url, &init)
    }

    async fn fetch(&self, request: &EvaluatorRequest) -> Result<EvaluatorResponse, JsValue> {
        let request = self.build(request)?;
        let response: Response = JsFuture::from(self.window.fetch_with_request(&request))
            .await?
            .dyn_into()?;
        let body = JsFuture::from(response.text()?).await?;
        Ok(EvaluatorResponse {
            status: response.status(),
            body: body.as_string().unwrap_or_default(),
        })
    }
}

#[async_trait(?Send)]
impl Evaluator for FetchEvaluator {
    async fn send(&self, request: &EvaluatorRequest) -> Result<EvaluatorResponse, EvaluatorError> {
        self.fetch(request).await.map_err(network)
    }
}
