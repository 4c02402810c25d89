use actix_web::{
    Error, HttpMessage, HttpRequest,
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    http::header::{HeaderName, HeaderValue},
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::{rc::Rc, time::Instant};
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Идентификатор запроса, доступный обработчикам через extensions
#[derive(Clone, Debug)]
pub struct RequestIdValue(pub String);

/// Request id текущего запроса для логов, `-` если middleware не подключён
pub fn request_id(req: &HttpRequest) -> String {
    req.extensions()
        .get::<RequestIdValue>()
        .map(|value| value.0.clone())
        .unwrap_or_else(|| "-".to_string())
}

/// Middleware добавляющий request id и access-лог
pub struct RequestId;

impl<S, B> Transform<S, ServiceRequest> for RequestId
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = RequestIdMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequestIdMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct RequestIdMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for RequestIdMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let id = Uuid::new_v4().to_string();
        let method = req.method().to_string();
        let path = req.path().to_string();
        let started = Instant::now();

        req.extensions_mut().insert(RequestIdValue(id.clone()));
        let fut = self.service.call(req);

        Box::pin(async move {
            let mut resp = fut.await?;
            log::info!(
                "request_id={} {} {} -> {} in {}ms",
                id,
                method,
                path,
                resp.status().as_u16(),
                started.elapsed().as_millis()
            );
            if let Ok(value) = HeaderValue::from_str(&id) {
                resp.headers_mut()
                    .insert(HeaderName::from_static(REQUEST_ID_HEADER), value);
            }
            Ok(resp)
        })
    }
}
