//! Stub HTTP services for exercising the blocking clients.

use axum::Router;

/// Serve `app` on an ephemeral localhost port from a background thread and
/// return its base URL (`http://127.0.0.1:<port>`).
pub(crate) fn spawn_stub(app: Router) -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.set_nonblocking(true).unwrap();
    let addr = listener.local_addr().unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async move {
            let listener = tokio::net::TcpListener::from_std(listener).unwrap();
            axum::serve(listener, app).await.unwrap();
        });
    });

    format!("http://{addr}")
}

/// A localhost URL nothing can listen behind. Port 0 is never a listening
/// port, so a connect is refused even while stubs grab ephemeral ports.
pub(crate) fn unreachable_url() -> String {
    "http://127.0.0.1:0".to_string()
}
