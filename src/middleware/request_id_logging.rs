//! Binds the request id to the request's logger.

use super::request_id::request_id;
use super::{BoxFuture, Middleware, Next};
use crate::core::{Request, ResponseWriter};

/// Field name of the request id on enriched loggers.
pub const REQUEST_ID_FIELD: &str = "request_id";

/// Enriches the context logger with a `request_id` field.
///
/// Must run after [`RequestId`](super::RequestId); without an id in the
/// context the request passes through untouched.
#[derive(Clone, Copy, Debug, Default)]
pub struct RequestIdLogging;

impl Middleware for RequestIdLogging {
    fn name(&self) -> &'static str {
        "request_id_logging"
    }

    fn priority(&self) -> i32 {
        -90
    }

    fn handle<'a>(
        &'a self,
        mut req: Request,
        w: &'a mut dyn ResponseWriter,
        next: Next<'a>,
    ) -> BoxFuture<'a, ()> {
        let ctx = req.context();
        if let Some(id) = request_id(ctx) {
            let logger = ctx.logger().with().str(REQUEST_ID_FIELD, id).logger();
            let ctx = ctx.with_logger(logger);
            req.set_context(ctx);
        }
        next.run(req, w)
    }
}
