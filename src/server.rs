use std::{net::SocketAddr, sync::Arc, time::Duration};

use axum::{Extension, Router, routing::get};
use tokio::{
    net::TcpListener,
    sync::{Mutex, oneshot},
    task::JoinHandle,
};

use crate::{
    Error, Res,
    api::{self, CodeSender},
    config, warning,
};

const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

/// Local listener that captures the OAuth redirect.
///
/// The server runs on its own task from [`CallbackServer::bind`] until the
/// code arrives, the wait times out, or [`CallbackServer::shutdown`] is called.
pub struct CallbackServer {
    local_addr: SocketAddr,
    code_rx: oneshot::Receiver<String>,
    shutdown_tx: oneshot::Sender<()>,
    handle: JoinHandle<std::io::Result<()>>,
}

pub fn router(sender: CodeSender) -> Router {
    Router::new()
        .route(config::CALLBACK_PATH, get(api::callback))
        .layer(Extension(sender))
}

impl CallbackServer {
    pub async fn bind(addr: SocketAddr) -> Res<Self> {
        let listener = TcpListener::bind(addr).await?;
        let local_addr = listener.local_addr()?;

        let (code_tx, code_rx) = oneshot::channel();
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let app = router(Arc::new(Mutex::new(Some(code_tx))));

        let handle = tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                })
                .await
        });

        Ok(Self {
            local_addr,
            code_rx,
            shutdown_tx,
            handle,
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Waits for the redirect to deliver a code, then stops the listener.
    pub async fn wait_for_code(mut self, timeout: Duration) -> Res<String> {
        let received = tokio::time::timeout(timeout, &mut self.code_rx).await;
        self.shutdown().await;

        match received {
            Ok(Ok(code)) => Ok(code),
            Ok(Err(_)) => Err(Error::Auth("callback listener stopped early".to_string())),
            Err(_) => Err(Error::Auth(format!(
                "no authorization callback within {} seconds",
                timeout.as_secs()
            ))),
        }
    }

    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(());

        let mut handle = self.handle;
        match tokio::time::timeout(SHUTDOWN_GRACE, &mut handle).await {
            Ok(Ok(Ok(()))) => {}
            Ok(Ok(Err(e))) => warning!("Callback listener failed: {}", e),
            Ok(Err(e)) => warning!("Callback listener task failed: {}", e),
            Err(_) => handle.abort(),
        }
    }
}
