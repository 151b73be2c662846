//! HTTP server assembly.

use std::net::TcpListener;

use actix_web::{dev::Server, web, App, HttpServer};
use tracing_actix_web::TracingLogger;

use crate::chat::ChatService;
use crate::routes;

/// Builds the actix server on an already-bound listener.
///
/// The returned `Server` must be awaited to start serving.
pub fn run(listener: TcpListener, service: ChatService) -> Result<Server, std::io::Error> {
    let service = web::Data::new(service);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .service(routes::chat::chat)
            .service(routes::health::health)
            .app_data(service.clone())
    })
    .listen(listener)?
    .run();

    Ok(server)
}
